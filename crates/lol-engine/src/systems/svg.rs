//! Level geometry from vector paths.
//!
//! Curves are flattened into straight runs with lyon, and every run becomes
//! an SVG-line entity heroes can walk on.

use glam::Vec2;
use lyon::math::Point;
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};

use crate::api::types::EntityId;
use crate::core::level::Level;

/// Maps path coordinates into the world: `world = point * stretch + offset`.
/// A negative `stretch.y` flips Y-down drawings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgPlacement {
    pub offset: Vec2,
    pub stretch: Vec2,
}

impl Default for SvgPlacement {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            stretch: Vec2::ONE,
        }
    }
}

impl SvgPlacement {
    fn map(&self, p: Point) -> Vec2 {
        Vec2::new(p.x, p.y) * self.stretch + self.offset
    }
}

impl Level {
    /// Turn a path into line entities. `tolerance` bounds the distance
    /// between a curve and its flattened runs.
    pub fn make_svg_lines(&mut self, path: &Path, tolerance: f32, placement: SvgPlacement) -> Vec<EntityId> {
        let mut ids = Vec::new();
        for event in path.iter().flattened(tolerance) {
            let (from, to) = match event {
                PathEvent::Line { from, to } => (from, to),
                PathEvent::End { last, first, close: true } if last != first => (last, first),
                _ => continue,
            };
            let (a, b) = (placement.map(from), placement.map(to));
            if a != b {
                ids.push(self.make_svg_line(a, b));
            }
        }
        log::debug!("svg path flattened into {} lines", ids.len());
        ids
    }
}

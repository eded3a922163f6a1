//! Cell sequencing for animated entities.
//!
//! An [`Animation`] is a list of atlas cells, each shown for its own
//! duration. An [`Animator`] plays one animation at a time, falling back to a
//! default animation or to an index-selected cell when nothing is playing.

use crate::core::rng::Rng;

/// A sequence of atlas cells with per-frame durations.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Frames as (col, row) pairs in the atlas.
    pub frames: Vec<(f32, f32)>,
    /// Seconds each frame stays on screen. Same length as `frames`.
    pub durations: Vec<f32>,
    pub looping: bool,
}

impl Animation {
    /// Explicit frames, each with its own duration.
    pub fn new(frames: Vec<(f32, f32)>, durations: Vec<f32>, looping: bool) -> Self {
        assert_eq!(
            frames.len(),
            durations.len(),
            "every animation frame needs a duration"
        );
        assert!(!frames.is_empty(), "animation needs at least one frame");
        Self {
            frames,
            durations,
            looping,
        }
    }

    /// Consecutive columns of one atlas row, all frames the same length.
    pub fn horizontal_strip(row: f32, start_col: f32, frame_count: u32, frame_duration: f32, looping: bool) -> Self {
        let frames = (0..frame_count).map(|i| (start_col + i as f32, row)).collect();
        let durations = vec![frame_duration; frame_count as usize];
        Self::new(frames, durations, looping)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn total_duration(&self) -> f32 {
        self.durations.iter().sum()
    }
}

/// Per-entity animation state.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    /// Cells for the index-driven mode (goodie counts, random projectile images).
    pub cells: Vec<(f32, f32)>,
    pub cell_index: usize,
    /// Animation restored by [`Animator::reset_to_default`].
    pub default: Option<Animation>,
    current: Option<Animation>,
    frame_index: usize,
    elapsed: f32,
    finished: bool,
}

impl Animator {
    /// An animator that loops `animation` as its default.
    pub fn playing(animation: Animation) -> Self {
        Self {
            default: Some(animation.clone()),
            current: Some(animation),
            ..Default::default()
        }
    }

    /// An animator that shows one of `cells`, chosen by index.
    pub fn with_cells(cells: Vec<(f32, f32)>) -> Self {
        Self {
            cells,
            ..Default::default()
        }
    }

    /// Switch animation, restarting from its first frame.
    pub fn set_animation(&mut self, animation: Animation) {
        self.current = Some(animation);
        self.frame_index = 0;
        self.elapsed = 0.0;
        self.finished = false;
    }

    /// Go back to the default animation, or to the indexed cell if none.
    pub fn reset_to_default(&mut self) {
        self.current = self.default.clone();
        self.frame_index = 0;
        self.elapsed = 0.0;
        self.finished = false;
    }

    /// Stop animating and show `cells[index]`.
    pub fn set_index(&mut self, index: usize) {
        self.current = None;
        self.cell_index = index;
        self.frame_index = 0;
        self.elapsed = 0.0;
    }

    /// Stop animating and show a random cell.
    pub fn set_random_index(&mut self, rng: &mut Rng) {
        let index = rng.next_int(self.cells.len() as u32) as usize;
        self.set_index(index);
    }

    pub fn current(&self) -> Option<&Animation> {
        self.current.as_ref()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// A non-looping animation that has shown its last frame for its full duration.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `dt` seconds. At most one frame per call; the frame clock
    /// restarts from zero on every advance.
    pub fn tick(&mut self, dt: f32) {
        let Some(animation) = &self.current else {
            return;
        };

        self.elapsed += dt;
        let duration = animation.durations[self.frame_index];
        if self.elapsed <= duration {
            return;
        }

        let last = animation.frame_count() - 1;
        if self.frame_index == last && !animation.looping {
            self.finished = true;
            return;
        }
        self.frame_index = (self.frame_index + 1) % animation.frame_count();
        self.elapsed = 0.0;
    }

    /// The (col, row) to draw right now.
    pub fn current_cell(&self) -> Option<(f32, f32)> {
        match &self.current {
            Some(animation) => animation.frames.get(self.frame_index).copied(),
            None => self.cells.get(self.cell_index).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> Animation {
        Animation::horizontal_strip(0.0, 0.0, 4, 0.1, true)
    }

    #[test]
    fn horizontal_strip_frames() {
        let anim = walk();
        assert_eq!(anim.frame_count(), 4);
        assert_eq!(anim.frames[3], (3.0, 0.0));
        assert!((anim.total_duration() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn advances_one_frame_per_tick() {
        let mut animator = Animator::playing(walk());
        assert_eq!(animator.current_cell(), Some((0.0, 0.0)));

        // Even a long tick moves only one frame.
        animator.tick(0.35);
        assert_eq!(animator.frame_index(), 1);
        assert_eq!(animator.current_cell(), Some((1.0, 0.0)));

        animator.tick(0.05);
        assert_eq!(animator.frame_index(), 1);
    }

    #[test]
    fn looping_wraps_to_first_frame() {
        let mut animator = Animator::playing(walk());
        for _ in 0..4 {
            animator.tick(0.11);
        }
        assert_eq!(animator.frame_index(), 0);
        assert!(!animator.is_finished());
    }

    #[test]
    fn non_looping_holds_last_frame() {
        let mut animator = Animator::default();
        animator.set_animation(Animation::horizontal_strip(0.0, 0.0, 3, 0.1, false));
        for _ in 0..10 {
            animator.tick(0.11);
        }
        assert_eq!(animator.frame_index(), 2);
        assert!(animator.is_finished());
    }

    #[test]
    fn per_frame_durations() {
        let mut animator = Animator::default();
        animator.set_animation(Animation::new(vec![(0.0, 0.0), (1.0, 0.0)], vec![0.5, 0.1], true));
        animator.tick(0.2);
        assert_eq!(animator.frame_index(), 0);
        animator.tick(0.4);
        assert_eq!(animator.frame_index(), 1);
        animator.tick(0.11);
        assert_eq!(animator.frame_index(), 0);
    }

    #[test]
    fn switching_resets_clock() {
        let mut animator = Animator::playing(walk());
        animator.tick(0.11);
        animator.tick(0.05);
        animator.set_animation(Animation::horizontal_strip(1.0, 0.0, 2, 0.1, true));
        assert_eq!(animator.frame_index(), 0);
        animator.tick(0.06);
        assert_eq!(animator.frame_index(), 0);
        assert_eq!(animator.current_cell(), Some((0.0, 1.0)));
    }

    #[test]
    fn reset_to_default_restores_loop() {
        let mut animator = Animator::playing(walk());
        animator.set_animation(Animation::horizontal_strip(5.0, 0.0, 1, 0.1, false));
        animator.reset_to_default();
        assert_eq!(animator.current(), Some(&walk()));
    }

    #[test]
    fn index_mode_selects_cell() {
        let mut animator = Animator::with_cells(vec![(0.0, 2.0), (1.0, 2.0), (2.0, 2.0)]);
        assert_eq!(animator.current_cell(), Some((0.0, 2.0)));
        animator.set_index(2);
        assert_eq!(animator.current_cell(), Some((2.0, 2.0)));
        animator.tick(1.0);
        assert_eq!(animator.current_cell(), Some((2.0, 2.0)));

        let mut rng = Rng::new(9);
        animator.set_random_index(&mut rng);
        assert!(animator.cell_index < 3);
    }

    #[test]
    #[should_panic]
    fn mismatched_durations_panic() {
        Animation::new(vec![(0.0, 0.0)], vec![], true);
    }
}

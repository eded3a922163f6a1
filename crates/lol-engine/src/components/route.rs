//! Waypoint following for kinematic bodies.

use glam::Vec2;

/// An ordered list of waypoints. Always at least two.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<Vec2>,
}

impl Route {
    pub fn new(points: Vec<Vec2>) -> Self {
        assert!(
            points.len() >= 2,
            "a route needs at least 2 waypoints, got {}",
            points.len()
        );
        Self { points }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// What the owner of a route-driven body should do after a `drive` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteStep {
    /// Keep the current velocity.
    Idle,
    SetVelocity(Vec2),
    /// Jump back to the first waypoint and head out again.
    Restart { position: Vec2, velocity: Vec2 },
    /// Final waypoint reached: zero the velocity.
    Stop,
}

/// Drives a body along a [`Route`] by setting its linear velocity.
///
/// Arrival at a waypoint is detected by comparing, per axis, the sign of the
/// vector from the previous waypoint with the sign of the vector from the
/// target. A fast body can overshoot before the turn is noticed.
#[derive(Debug, Clone)]
pub struct RouteDriver {
    route: Route,
    speed: f32,
    looping: bool,
    next_index: usize,
    done: bool,
}

impl RouteDriver {
    pub fn new(route: Route, speed: f32, looping: bool) -> Self {
        Self {
            route,
            speed,
            looping,
            next_index: 1,
            done: false,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Where to teleport the body and which velocity to give it when the
    /// route begins.
    pub fn start(&mut self) -> (Vec2, Vec2) {
        self.next_index = 1;
        self.done = false;
        let points = self.route.points();
        (points[0], self.velocity_toward(points[0], points[1]))
    }

    /// Check progress from the body's current position.
    pub fn drive(&mut self, position: Vec2) -> RouteStep {
        if self.done || !self.reached_target(position) {
            return RouteStep::Idle;
        }

        self.next_index += 1;
        if self.next_index < self.route.len() {
            let target = self.route.points()[self.next_index];
            return RouteStep::SetVelocity(self.velocity_toward(position, target));
        }

        if self.looping {
            let (position, velocity) = self.start();
            RouteStep::Restart { position, velocity }
        } else {
            self.done = true;
            RouteStep::Stop
        }
    }

    fn reached_target(&self, position: Vec2) -> bool {
        let points = self.route.points();
        let from_source = position - points[self.next_index - 1];
        let from_goal = position - points[self.next_index];
        axis_passed(from_source.x, from_goal.x) && axis_passed(from_source.y, from_goal.y)
    }

    fn velocity_toward(&self, from: Vec2, to: Vec2) -> Vec2 {
        (to - from).normalize_or_zero() * self.speed
    }
}

fn axis_passed(from_source: f32, from_goal: f32) -> bool {
    from_goal == 0.0
        || (from_source > 0.0 && from_goal > 0.0)
        || (from_source < 0.0 && from_goal < 0.0)
}

use glam::Vec2;

/// Pointers tracked at once.
pub const MAX_POINTERS: usize = 4;

/// One pointer as the host last saw it. Positions are in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub down: bool,
    pub pos: Vec2,
}

/// Everything the host reports in one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub pointers: [PointerState; MAX_POINTERS],
    /// Back/escape key held.
    pub back: bool,
}

/// Input event types the engine understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { index: usize, pos: Vec2 },
    PointerMove { index: usize, pos: Vec2 },
    PointerUp { index: usize, pos: Vec2 },
    /// The back key went down. Holding it does not repeat.
    Back,
}

/// Turns polled snapshots into edge events by diffing against the last poll.
#[derive(Debug, Default)]
pub struct InputPoller {
    last: InputSnapshot,
}

impl InputPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, snapshot: InputSnapshot) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for (index, (now, before)) in snapshot.pointers.iter().zip(&self.last.pointers).enumerate() {
            match (before.down, now.down) {
                (false, true) => events.push(InputEvent::PointerDown { index, pos: now.pos }),
                (true, false) => events.push(InputEvent::PointerUp { index, pos: now.pos }),
                (true, true) if now.pos != before.pos => {
                    events.push(InputEvent::PointerMove { index, pos: now.pos })
                }
                _ => {}
            }
        }

        if snapshot.back && !self.last.back {
            events.push(InputEvent::Back);
        }

        self.last = snapshot;
        events
    }

    /// Forget held state, e.g. after a screen change.
    pub fn reset(&mut self) {
        self.last = InputSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touching(index: usize, x: f32, y: f32) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        snapshot.pointers[index] = PointerState {
            down: true,
            pos: Vec2::new(x, y),
        };
        snapshot
    }

    #[test]
    fn pointer_lifecycle() {
        let mut poller = InputPoller::new();
        assert_eq!(
            poller.poll(touching(1, 10.0, 20.0)),
            vec![InputEvent::PointerDown { index: 1, pos: Vec2::new(10.0, 20.0) }]
        );
        assert!(poller.poll(touching(1, 10.0, 20.0)).is_empty());
        assert_eq!(
            poller.poll(touching(1, 12.0, 20.0)),
            vec![InputEvent::PointerMove { index: 1, pos: Vec2::new(12.0, 20.0) }]
        );

        let mut released = touching(1, 12.0, 20.0);
        released.pointers[1].down = false;
        assert_eq!(
            poller.poll(released),
            vec![InputEvent::PointerUp { index: 1, pos: Vec2::new(12.0, 20.0) }]
        );
    }

    #[test]
    fn back_is_edge_triggered() {
        let mut poller = InputPoller::new();
        let held = InputSnapshot {
            back: true,
            ..Default::default()
        };
        assert_eq!(poller.poll(held), vec![InputEvent::Back]);
        assert!(poller.poll(held).is_empty());
        assert!(poller.poll(InputSnapshot::default()).is_empty());
        assert_eq!(poller.poll(held), vec![InputEvent::Back]);
    }

    #[test]
    fn reset_makes_held_pointer_fresh() {
        let mut poller = InputPoller::new();
        poller.poll(touching(0, 1.0, 1.0));
        poller.reset();
        assert_eq!(poller.poll(touching(0, 1.0, 1.0)).len(), 1);
    }
}

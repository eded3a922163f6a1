//! Splash / help / chooser / play navigation with full-screen overlays.

use crate::core::score::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Help { page: u32 },
    Chooser,
    /// Levels are numbered from 1.
    Play { level: u32 },
}

/// Shown over a level; the level is suspended while one is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Pre,
    Pause,
    Post(Outcome),
}

#[derive(Debug, Clone)]
pub struct ScreenMachine {
    screen: Screen,
    overlay: Option<Overlay>,
    level_count: u32,
    help_pages: u32,
    unlocked: u32,
    show_pre: bool,
    pending_start: Option<u32>,
}

impl ScreenMachine {
    pub fn new(level_count: u32, help_pages: u32) -> Self {
        Self {
            screen: Screen::Splash,
            overlay: None,
            level_count,
            help_pages,
            unlocked: 1,
            show_pre: false,
            pending_start: None,
        }
    }

    /// Show the pre-level overlay whenever a level starts.
    pub fn with_pre_overlay(mut self, show: bool) -> Self {
        self.show_pre = show;
        self
    }

    /// Unlock every level up to and including `level`.
    pub fn with_unlocked(mut self, level: u32) -> Self {
        self.unlocked = level.clamp(1, self.level_count.max(1));
        self
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn unlocked(&self) -> u32 {
        self.unlocked
    }

    pub fn level_count(&self) -> u32 {
        self.level_count
    }

    /// True while an overlay hides the level: timers and physics stop.
    pub fn is_suspended(&self) -> bool {
        self.overlay.is_some()
    }

    /// The level that must be (re)built, if a transition just started one.
    pub fn take_level_start(&mut self) -> Option<u32> {
        self.pending_start.take()
    }

    fn start_level(&mut self, level: u32) {
        log::info!("starting level {}", level);
        self.screen = Screen::Play { level };
        self.overlay = if self.show_pre { Some(Overlay::Pre) } else { None };
        self.pending_start = Some(level);
    }

    pub fn tap_play(&mut self) -> bool {
        if self.screen != Screen::Splash {
            return false;
        }
        self.screen = Screen::Chooser;
        true
    }

    pub fn tap_help(&mut self) -> bool {
        if self.screen != Screen::Splash || self.help_pages == 0 {
            return false;
        }
        self.screen = Screen::Help { page: 0 };
        true
    }

    /// Next help page; past the last one goes back to the splash screen.
    pub fn next_help_page(&mut self) -> bool {
        let Screen::Help { page } = self.screen else {
            return false;
        };
        self.screen = if page + 1 < self.help_pages {
            Screen::Help { page: page + 1 }
        } else {
            Screen::Splash
        };
        true
    }

    /// Start `level` from the chooser. Locked or unknown levels are refused.
    pub fn choose(&mut self, level: u32) -> bool {
        if self.screen != Screen::Chooser || level == 0 || level > self.level_count {
            return false;
        }
        if level > self.unlocked {
            log::debug!("level {} is locked", level);
            return false;
        }
        self.start_level(level);
        true
    }

    pub fn pause(&mut self) -> bool {
        if !matches!(self.screen, Screen::Play { .. }) || self.overlay.is_some() {
            return false;
        }
        self.overlay = Some(Overlay::Pause);
        true
    }

    /// Close a pre or pause overlay. The post overlay only leaves via
    /// `replay`, `advance` or `back`.
    pub fn dismiss_overlay(&mut self) -> bool {
        match self.overlay {
            Some(Overlay::Pre) | Some(Overlay::Pause) => {
                self.overlay = None;
                true
            }
            _ => false,
        }
    }

    /// The level ended. A win unlocks the next level.
    pub fn finish(&mut self, outcome: Outcome) -> bool {
        let Screen::Play { level } = self.screen else {
            return false;
        };
        if matches!(self.overlay, Some(Overlay::Post(_))) {
            return false;
        }
        if outcome == Outcome::Won && level == self.unlocked && level < self.level_count {
            self.unlocked = level + 1;
        }
        self.overlay = Some(Overlay::Post(outcome));
        true
    }

    pub fn replay(&mut self) -> bool {
        match (self.screen, self.overlay) {
            (Screen::Play { level }, Some(Overlay::Post(_))) => {
                self.start_level(level);
                true
            }
            _ => false,
        }
    }

    /// Next level when it exists and is unlocked, otherwise the chooser.
    pub fn advance(&mut self) -> bool {
        match (self.screen, self.overlay) {
            (Screen::Play { level }, Some(Overlay::Post(_))) => {
                if level < self.level_count && level < self.unlocked {
                    self.start_level(level + 1);
                } else {
                    self.screen = Screen::Chooser;
                    self.overlay = None;
                }
                true
            }
            _ => false,
        }
    }

    /// Back key: chooser returns to splash, every other screen to the chooser.
    pub fn back(&mut self) -> bool {
        self.overlay = None;
        match self.screen {
            Screen::Splash => false,
            Screen::Chooser => {
                self.screen = Screen::Splash;
                true
            }
            Screen::Help { .. } | Screen::Play { .. } => {
                self.screen = Screen::Chooser;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_chooser() -> ScreenMachine {
        let mut m = ScreenMachine::new(3, 2);
        assert!(m.tap_play());
        m
    }

    #[test]
    fn splash_to_help_pages_and_back() {
        let mut m = ScreenMachine::new(3, 2);
        assert!(m.tap_help());
        assert_eq!(m.screen(), Screen::Help { page: 0 });
        assert!(m.next_help_page());
        assert_eq!(m.screen(), Screen::Help { page: 1 });
        assert!(m.next_help_page());
        assert_eq!(m.screen(), Screen::Splash);
    }

    #[test]
    fn locked_levels_are_refused() {
        let mut m = at_chooser();
        assert!(!m.choose(2));
        assert!(!m.choose(0));
        assert!(!m.choose(4));
        assert!(m.choose(1));
        assert_eq!(m.screen(), Screen::Play { level: 1 });
        assert_eq!(m.take_level_start(), Some(1));
        assert_eq!(m.take_level_start(), None);
    }

    #[test]
    fn win_unlocks_and_advances() {
        let mut m = at_chooser();
        m.choose(1);
        assert!(m.finish(Outcome::Won));
        assert!(m.is_suspended());
        assert_eq!(m.unlocked(), 2);
        assert!(m.advance());
        assert_eq!(m.screen(), Screen::Play { level: 2 });
        assert!(!m.is_suspended());
    }

    #[test]
    fn loss_replays_same_level() {
        let mut m = at_chooser();
        m.choose(1);
        m.take_level_start();
        m.finish(Outcome::Lost);
        assert_eq!(m.overlay(), Some(Overlay::Post(Outcome::Lost)));
        assert!(!m.dismiss_overlay());
        assert!(m.replay());
        assert_eq!(m.take_level_start(), Some(1));
        assert_eq!(m.unlocked(), 1);
    }

    #[test]
    fn advancing_after_loss_or_last_level_goes_to_chooser() {
        let mut m = at_chooser();
        m.choose(1);
        m.finish(Outcome::Lost);
        m.advance();
        assert_eq!(m.screen(), Screen::Chooser);

        let mut m = ScreenMachine::new(1, 0);
        m.tap_play();
        m.choose(1);
        m.finish(Outcome::Won);
        m.advance();
        assert_eq!(m.screen(), Screen::Chooser);
    }

    #[test]
    fn pause_and_pre_overlays_suspend() {
        let mut m = ScreenMachine::new(2, 0).with_pre_overlay(true);
        m.tap_play();
        m.choose(1);
        assert_eq!(m.overlay(), Some(Overlay::Pre));
        assert!(!m.pause());
        assert!(m.dismiss_overlay());
        assert!(m.pause());
        assert!(m.is_suspended());
        assert!(m.dismiss_overlay());
        assert!(!m.is_suspended());
    }

    #[test]
    fn back_navigation() {
        let mut m = at_chooser();
        m.choose(1);
        m.pause();
        assert!(m.back());
        assert_eq!(m.screen(), Screen::Chooser);
        assert!(!m.is_suspended());
        assert!(m.back());
        assert_eq!(m.screen(), Screen::Splash);
        assert!(!m.back());
    }

    #[test]
    fn finish_only_once() {
        let mut m = at_chooser();
        m.choose(1);
        assert!(m.finish(Outcome::Lost));
        assert!(!m.finish(Outcome::Won));
        assert_eq!(m.unlocked(), 1);
    }
}

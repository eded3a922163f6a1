use std::collections::HashMap;

use glam::Vec2;
use lol_engine::{
    build_render_buffer, AssetManifest, EntityId, Game, GameConfig, GameEvent, InputEvent, InputPoller,
    InputSnapshot, Level, MediaRegistry, Outcome, Overlay, PointerState, RenderBuffer, Screen, ScreenMachine,
};

/// Runs one game: owns the screen machine and, while a level is on screen,
/// the level itself.
///
/// Each concrete game creates a `thread_local!` GameRunner through
/// `export_game!`, because wasm-bindgen cannot export generic structs.
pub struct GameRunner<G: Game> {
    game: G,
    config: GameConfig,
    machine: ScreenMachine,
    media: MediaRegistry,
    level: Option<Level>,
    poller: InputPoller,
    snapshot: InputSnapshot,
    viewport: Vec2,
    render_buffer: RenderBuffer,
    /// Flat buffer of sound event IDs for SharedArrayBuffer reads.
    sound_buffer: Vec<u32>,
    events: Vec<GameEvent>,
    /// Screen changes since the last tick, published with its events.
    pending: Vec<GameEvent>,
    strengths: HashMap<EntityId, i32>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let machine = Self::machine_for(&config);

        Self {
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            sound_buffer: Vec::with_capacity(config.max_sounds),
            events: Vec::with_capacity(config.max_events),
            pending: Vec::new(),
            game,
            config,
            machine,
            media: MediaRegistry::new(),
            level: None,
            poller: InputPoller::new(),
            snapshot: InputSnapshot::default(),
            viewport: Vec2::ZERO,
            strengths: HashMap::new(),
        }
    }

    fn machine_for(config: &GameConfig) -> ScreenMachine {
        ScreenMachine::new(config.level_count, config.help_pages).with_pre_overlay(config.show_pre_overlay)
    }

    /// Re-read the game's configuration and return to the splash screen.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.machine = Self::machine_for(&self.config);
        self.level = None;
        self.poller.reset();
        self.push_screen_event();
    }

    /// Replace the media registry. Levels built afterwards resolve names
    /// against it; a malformed manifest leaves the current one in place.
    pub fn load_manifest(&mut self, json: &str) {
        match AssetManifest::from_json(json) {
            Ok(manifest) => {
                self.media = MediaRegistry::from_manifest(&manifest);
                log::info!(
                    "manifest: {} atlases, {} images, {} sounds",
                    manifest.atlases.len(),
                    manifest.images.len(),
                    manifest.sounds.len()
                );
            }
            Err(e) => log::error!("failed to parse asset manifest: {}", e),
        }
    }

    // ---- Input ----

    /// Record a pointer; it is compared against the previous poll on the next tick.
    pub fn set_pointer(&mut self, index: usize, down: bool, x: f32, y: f32) {
        if let Some(pointer) = self.snapshot.pointers.get_mut(index) {
            *pointer = PointerState {
                down,
                pos: Vec2::new(x, y),
            };
        }
    }

    pub fn set_back_key(&mut self, held: bool) {
        self.snapshot.back = held;
    }

    /// Size of the canvas in pixels.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    // ---- Screens ----

    pub fn screen(&self) -> Screen {
        self.machine.screen()
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.machine.overlay()
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn tap_play(&mut self) {
        let changed = self.machine.tap_play();
        self.after_transition(changed);
    }

    pub fn tap_help(&mut self) {
        let changed = self.machine.tap_help();
        self.after_transition(changed);
    }

    pub fn next_help_page(&mut self) {
        let changed = self.machine.next_help_page();
        self.after_transition(changed);
    }

    pub fn choose(&mut self, level: u32) {
        let changed = self.machine.choose(level);
        self.after_transition(changed);
    }

    pub fn pause(&mut self) {
        let changed = self.machine.pause();
        self.after_transition(changed);
    }

    pub fn dismiss_overlay(&mut self) {
        let changed = self.machine.dismiss_overlay();
        self.after_transition(changed);
    }

    pub fn replay(&mut self) {
        let changed = self.machine.replay();
        self.after_transition(changed);
    }

    pub fn advance(&mut self) {
        let changed = self.machine.advance();
        self.after_transition(changed);
    }

    pub fn back(&mut self) {
        let changed = self.machine.back();
        self.after_transition(changed);
    }

    fn after_transition(&mut self, changed: bool) {
        if !changed {
            return;
        }
        if let Some(index) = self.machine.take_level_start() {
            self.start_level(index);
        }
        if !matches!(self.machine.screen(), Screen::Play { .. }) && self.level.take().is_some() {
            log::debug!("level dropped");
        }
        self.push_screen_event();
    }

    fn start_level(&mut self, index: u32) {
        let mut level = Level::new(&self.config, self.media.clone());
        self.game.configure_level(&mut level, index);
        log::info!("level {} started with {} entities", index, level.scene.len());
        self.level = Some(level);
        self.strengths.clear();
    }

    // ---- Frame ----

    /// Run one frame: input, simulation, trigger delivery, outcome, then
    /// the render, sound and event buffers.
    pub fn tick(&mut self, dt: f32) {
        self.events.clear();
        self.sound_buffer.clear();

        for event in self.poller.poll(self.snapshot) {
            self.handle_input(event);
        }

        if let Screen::Play { level: index } = self.machine.screen() {
            if !self.machine.is_suspended() {
                self.run_level(index, dt);
            }
        }

        match self.level.as_mut() {
            Some(level) => {
                build_render_buffer(level.scene.iter(), &level.camera, &mut self.render_buffer);
                let sounds = level.take_sounds();
                self.sound_buffer
                    .extend(sounds.iter().take(self.config.max_sounds).map(|s| s.0));
            }
            None => self.render_buffer.clear(),
        }
        self.events.append(&mut self.pending);
        self.render_buffer.instances.truncate(self.config.max_instances);
        self.events.truncate(self.config.max_events);
    }

    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Back => self.back(),
            InputEvent::PointerDown { pos, .. } => {
                if self.machine.is_suspended() {
                    return;
                }
                let viewport = self.viewport;
                if let Some(level) = self.level.as_mut() {
                    let world = level.camera.screen_to_world(pos, viewport);
                    level.touch_down(world);
                }
            }
            InputEvent::PointerMove { .. } | InputEvent::PointerUp { .. } => {}
        }
    }

    fn run_level(&mut self, index: u32, dt: f32) {
        let Some(level) = self.level.as_mut() else {
            return;
        };
        level.tick(dt);

        // Handlers may fire further triggers, e.g. by defeating an enemy.
        loop {
            let triggers = level.take_triggers();
            if triggers.is_empty() {
                break;
            }
            for trigger in triggers {
                self.game.on_trigger(level, index, trigger);
            }
        }

        for entity in level.scene.iter().filter(|e| e.visible) {
            let Some(hero) = entity.hero() else { continue };
            let last = self.strengths.insert(entity.id, hero.strength);
            if last.is_some_and(|s| s != hero.strength) {
                self.events.push(GameEvent::new(
                    GameEvent::HERO_STRENGTH,
                    entity.id.0 as f32,
                    hero.strength as f32,
                ));
            }
        }

        if let Some(outcome) = level.score.outcome() {
            if self.machine.finish(outcome) {
                let kind = match outcome {
                    Outcome::Won => GameEvent::LEVEL_WON,
                    Outcome::Lost => GameEvent::LEVEL_LOST,
                };
                log::info!("level {} {:?}", index, outcome);
                self.events.push(GameEvent::new(kind, index as f32, 0.0));
                self.push_screen_event();
            }
        }
    }

    /// `a` = screen (0 splash, 1 help, 2 chooser, 3 play), `b` = page or
    /// level, `c` = overlay (0 none, 1 pre, 2 pause, 3 won, 4 lost).
    fn push_screen_event(&mut self) {
        let (screen, detail) = match self.machine.screen() {
            Screen::Splash => (0.0, 0.0),
            Screen::Help { page } => (1.0, page as f32),
            Screen::Chooser => (2.0, 0.0),
            Screen::Play { level } => (3.0, level as f32),
        };
        let overlay = match self.machine.overlay() {
            None => 0.0,
            Some(Overlay::Pre) => 1.0,
            Some(Overlay::Pause) => 2.0,
            Some(Overlay::Post(Outcome::Won)) => 3.0,
            Some(Overlay::Post(Outcome::Lost)) => 4.0,
        };
        self.pending.push(GameEvent {
            c: overlay,
            ..GameEvent::new(GameEvent::SCREEN_CHANGED, screen, detail)
        });
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn sound_events_ptr(&self) -> *const u32 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn sound_events(&self) -> &[u32] {
        &self.sound_buffer
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    /// Centre of the active level's camera, or of the world between levels.
    pub fn camera_center(&self) -> Vec2 {
        match &self.level {
            Some(level) => level.camera.center,
            None => Vec2::new(self.config.world_width, self.config.world_height) / 2.0,
        }
    }

    pub fn unlocked_levels(&self) -> u32 {
        self.machine.unlocked()
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.config.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}

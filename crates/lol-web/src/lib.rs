pub mod runner;

pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates the `thread_local!` storage for the GameRunner, a `with_runner()`
/// helper, and every export the host page calls: init and tick, pointer and
/// back-key input, screen navigation, and the frame's data accessors.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use lol_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// lol_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: a type implementing `lol_engine::Game` with a `new()` constructor
/// - `$game_name`: a string literal used in log messages
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// `None` (and a warning) when called before `game_init()`.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: not initialized, call game_init() first", $game_name);
                        None
                    }
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_load_manifest(json: &str) {
            with_runner(|r| r.load_manifest(json));
        }

        // ---- Input ----

        #[wasm_bindgen]
        pub fn game_set_pointer(index: u32, down: bool, x: f32, y: f32) {
            with_runner(|r| r.set_pointer(index as usize, down, x, y));
        }

        #[wasm_bindgen]
        pub fn game_set_back_key(held: bool) {
            with_runner(|r| r.set_back_key(held));
        }

        #[wasm_bindgen]
        pub fn game_set_viewport(width: f32, height: f32) {
            with_runner(|r| r.set_viewport(width, height));
        }

        // ---- Screens ----

        #[wasm_bindgen]
        pub fn game_tap_play() {
            with_runner(|r| r.tap_play());
        }

        #[wasm_bindgen]
        pub fn game_tap_help() {
            with_runner(|r| r.tap_help());
        }

        #[wasm_bindgen]
        pub fn game_next_help_page() {
            with_runner(|r| r.next_help_page());
        }

        #[wasm_bindgen]
        pub fn game_choose_level(level: u32) {
            with_runner(|r| r.choose(level));
        }

        #[wasm_bindgen]
        pub fn game_pause() {
            with_runner(|r| r.pause());
        }

        #[wasm_bindgen]
        pub fn game_dismiss_overlay() {
            with_runner(|r| r.dismiss_overlay());
        }

        #[wasm_bindgen]
        pub fn game_replay() {
            with_runner(|r| r.replay());
        }

        #[wasm_bindgen]
        pub fn game_advance() {
            with_runner(|r| r.advance());
        }

        #[wasm_bindgen]
        pub fn game_back() {
            with_runner(|r| r.back());
        }

        #[wasm_bindgen]
        pub fn get_unlocked_levels() -> u32 {
            with_runner(|r| r.unlocked_levels()).unwrap_or(0)
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const u32 {
            with_runner(|r| r.sound_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_camera_x() -> f32 {
            with_runner(|r| r.camera_center().x).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_camera_y() -> f32 {
            with_runner(|r| r.camera_center().y).unwrap_or(0.0)
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_sounds() -> u32 {
            with_runner(|r| r.max_sounds()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_instance_floats() -> u32 {
            lol_engine::RenderInstance::FLOATS as u32
        }

        #[wasm_bindgen]
        pub fn get_event_floats() -> u32 {
            lol_engine::GameEvent::FLOATS as u32
        }
    };
}

//! Tsundoku Pile - a physically stacked visualization of unread books
//!
//! Core modules:
//! - `sim`: Deterministic pile simulation (physics world, spawning, overflow towers)
//! - `render`: Frame construction and DOM synchronization
//! - `settings`: Visual preferences persisted in LocalStorage

pub mod render;
pub mod settings;
pub mod sim;

pub use settings::PileSettings;

/// Pile configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the physics runner cadence)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Physics step interval for the host scheduler (milliseconds)
    pub const STEP_INTERVAL_MS: i32 = 16;

    /// Stage dimensions
    pub const STAGE_W: f32 = 920.0;
    pub const DEFAULT_STAGE_H: f32 = 240.0;
    /// Inset from the stage edges to the overflow boundaries
    pub const DEFAULT_INSET: f32 = 32.0;

    /// Plank dimensions
    pub const ITEM_HEIGHT: f32 = 12.0;
    pub const MIN_ITEM_WIDTH: f32 = 80.0;
    pub const MAX_ITEM_WIDTH: f32 = 160.0;
    /// Horizontal spawn spread around stage center
    pub const SPAWN_SPREAD: f32 = 50.0;

    /// Downward gravity (pixels/s², screen coordinates)
    pub const GRAVITY: f32 = 900.0;

    /// Overflow towers
    pub const TOWER_COUNT: usize = 3;
    pub const TOWER_CAPACITY: usize = 16;
    /// Horizontal tower offsets from stage center
    pub const TOWER_OFFSETS: [f32; TOWER_COUNT] = [-180.0, 0.0, 180.0];
    /// Max horizontal jitter applied to stacked entries
    pub const TOWER_JITTER: f32 = 12.0;

    /// Per-pass addition ceiling when populating from empty
    pub const MAX_ADD_COLD: u32 = 20;
    /// Per-pass addition ceiling once the pile is established
    pub const MAX_ADD_WARM: u32 = 6;

    /// Reconciliation debounce (milliseconds)
    pub const DEBOUNCE_COLD_MS: i32 = 10;
    pub const DEBOUNCE_WARM_MS: i32 = 50;

    /// Live planks drawn per frame (simulation count is not capped)
    pub const MAX_DRAWN_LIVE: usize = 200;
}

/// Maximum representable total once surface spawning has stopped:
/// three towers at capacity.
pub fn tower_capacity_total() -> u32 {
    (consts::TOWER_COUNT * consts::TOWER_CAPACITY) as u32
}

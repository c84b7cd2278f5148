//! Deterministic pile simulation
//!
//! All pile behavior lives here. This module must stay pure and testable:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The host glue drives it from three cooperative tasks: a fixed-cadence
//! physics step (which also runs the boundary sweep), a frame-sync loop,
//! and a debounced reconciliation pass per target-count change.

pub mod boundary;
pub mod engine;
pub mod reconcile;
pub mod spawn;
pub mod state;
pub mod towers;

pub use boundary::sweep;
pub use engine::PhysicsWorld;
pub use reconcile::{coerce_target, debounce_delay_ms, reconcile};
pub use spawn::{random_width, spawn_direct, spawn_live};
pub use state::{Boundary, LiveItem, PileState, SimFlags};
pub use towers::{StackEntry, Tower, Towers};

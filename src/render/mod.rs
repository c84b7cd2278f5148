//! Frame construction and DOM synchronization

pub mod frame;
#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use frame::{live_sprites, tower_sprites, Sprite};

//! Pile state and core simulation types
//!
//! Flags live as fields on [`PileState`] rather than module globals, so
//! multiple piles can coexist without cross-instance coupling.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rapier2d::prelude::RigidBodyHandle;

use super::towers::Towers;
use crate::consts::*;

/// Border palette (white, black, blue, red, yellow)
pub const BORDER_COLORS: [&str; 5] = ["#ffffff", "#000000", "#60a5fa", "#f87171", "#facc15"];
/// Fill palette (page tones)
pub const FILL_COLORS: [&str; 2] = ["#ffe9ab", "#d9cdab"];

/// Draw a random border color. Independent of the fill draw.
pub fn pick_border(rng: &mut Pcg32) -> &'static str {
    BORDER_COLORS[rng.random_range(0..BORDER_COLORS.len())]
}

/// Draw a random fill color. Independent of the border draw.
pub fn pick_fill(rng: &mut Pcg32) -> &'static str {
    FILL_COLORS[rng.random_range(0..FILL_COLORS.len())]
}

/// A book currently owned and positioned by the physics engine.
///
/// Position, rotation and velocity belong to the engine for the item's
/// lifetime; retirement destroys the body and hands width/colors to a tower.
#[derive(Debug, Clone)]
pub struct LiveItem {
    /// Stable identity, used to key visual elements
    pub id: u32,
    pub width: f32,
    pub border: &'static str,
    pub fill: &'static str,
    pub body: RigidBodyHandle,
}

/// Left/right overflow boundaries, derived from the stage width and inset.
/// Computed once at initialization, read every simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub left: f32,
    pub right: f32,
}

impl Boundary {
    /// Boundaries for a stage centered in a container of the given width.
    pub fn from_container(container_width: f32, inset: f32) -> Self {
        let stage_left = container_width / 2.0 - STAGE_W / 2.0;
        let stage_right = container_width / 2.0 + STAGE_W / 2.0;
        Self {
            left: stage_left + inset,
            right: stage_right - inset,
        }
    }
}

/// Latch flags shared by the boundary monitor, tower manager and reconciler.
#[derive(Debug, Clone, Copy)]
pub struct SimFlags {
    /// One-way latch: cleared on the first boundary overflow, after which new
    /// items skip physics and go straight to towers. Never set back by drains.
    pub allow_surface_spawn: bool,
    /// Every tower at capacity; no further items can be created. Cleared when
    /// a drain brings any tower below capacity.
    pub all_full: bool,
}

impl Default for SimFlags {
    fn default() -> Self {
        Self {
            allow_surface_spawn: true,
            all_full: false,
        }
    }
}

/// Complete pile state: live items, towers, latches, target and RNG.
///
/// Owned by the component instance. Mutated only from the host's cooperative
/// callbacks (step, sweep, reconcile), never concurrently.
#[derive(Debug)]
pub struct PileState {
    /// Externally supplied target unread count
    pub target: u32,
    /// Live items, in creation order (newest last)
    pub items: Vec<LiveItem>,
    pub towers: Towers,
    pub flags: SimFlags,
    pub boundary: Boundary,
    /// Horizontal center of the host container
    pub stage_center: f32,
    pub rng: Pcg32,
    next_id: u32,
}

impl PileState {
    pub fn new(seed: u64, container_width: f32, inset: f32) -> Self {
        Self {
            target: 0,
            items: Vec::new(),
            towers: Towers::new(),
            flags: SimFlags::default(),
            boundary: Boundary::from_container(container_width, inset),
            stage_center: container_width / 2.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a stable item id
    pub fn next_item_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn live_count(&self) -> u32 {
        self.items.len() as u32
    }

    /// Current total: live items plus everything stacked in towers
    pub fn total(&self) -> u32 {
        self.live_count() + self.towers.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_from_container() {
        let b = Boundary::from_container(1000.0, 32.0);
        assert_eq!(b.left, 1000.0 / 2.0 - STAGE_W / 2.0 + 32.0);
        assert_eq!(b.right, 1000.0 / 2.0 + STAGE_W / 2.0 - 32.0);
        assert!(b.left < b.right);
    }

    #[test]
    fn test_item_ids_are_monotonic() {
        let mut state = PileState::new(7, STAGE_W, DEFAULT_INSET);
        let a = state.next_item_id();
        let b = state.next_item_id();
        assert!(b > a);
    }

    #[test]
    fn test_palette_draws_are_from_palettes() {
        let mut state = PileState::new(7, STAGE_W, DEFAULT_INSET);
        for _ in 0..32 {
            let border = pick_border(&mut state.rng);
            let fill = pick_fill(&mut state.rng);
            assert!(BORDER_COLORS.contains(&border));
            assert!(FILL_COLORS.contains(&fill));
        }
    }
}

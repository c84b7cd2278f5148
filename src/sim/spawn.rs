//! Item spawner
//!
//! Two paths into the pile: `spawn_live` drops a physics plank above the
//! stage, `spawn_direct` bypasses physics once overflow has begun and stacks
//! straight onto a tower.

use rand::Rng;
use rand_pcg::Pcg32;

use super::engine::PhysicsWorld;
use super::state::{pick_border, pick_fill, LiveItem, PileState};
use crate::consts::*;

/// Random plank width shared by both spawn paths.
pub fn random_width(rng: &mut Pcg32) -> f32 {
    rng.random_range(MIN_ITEM_WIDTH..MAX_ITEM_WIDTH).floor()
}

/// Create a live plank above the stage center with randomized pose and
/// material, and independently drawn border/fill colors.
pub fn spawn_live(state: &mut PileState, world: &mut PhysicsWorld, width: f32) {
    let x = state.stage_center + state.rng.random_range(-SPAWN_SPREAD..SPAWN_SPREAD);
    let y = -40.0 - state.rng.random_range(0.0..80.0);
    let angle = state.rng.random_range(-0.1..0.1);
    let density = 0.002 + state.rng.random_range(0.0..0.001);
    let friction = state.rng.random_range(0.15..0.25);

    let border = pick_border(&mut state.rng);
    let fill = pick_fill(&mut state.rng);

    let body = world.add_plank(x, y, width, angle, density, friction);
    let id = state.next_item_id();
    state.items.push(LiveItem {
        id,
        width,
        border,
        fill,
        body,
    });
}

/// Stack a new book directly onto a tower, skipping physics entirely.
///
/// Returns false when no tower has capacity; the reconciler stops on that.
pub fn spawn_direct(state: &mut PileState, width: f32) -> bool {
    let border = pick_border(&mut state.rng);
    let fill = pick_fill(&mut state.rng);
    state
        .towers
        .place(&mut state.rng, &mut state.flags, width, border, fill)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_live_starts_above_stage_near_center() {
        let mut state = PileState::new(1, STAGE_W, DEFAULT_INSET);
        let mut world = PhysicsWorld::new(STAGE_W, DEFAULT_STAGE_H);

        for _ in 0..16 {
            let w = random_width(&mut state.rng);
            spawn_live(&mut state, &mut world, w);
        }
        assert_eq!(state.live_count(), 16);
        assert_eq!(world.dynamic_count(), 16);

        for item in &state.items {
            let (pos, _) = world.pose(item.body).unwrap();
            assert!(pos.y < 0.0, "spawned above the visible stage");
            assert!((pos.x - state.stage_center).abs() <= SPAWN_SPREAD + 1.0);
        }
    }

    #[test]
    fn test_random_width_stays_in_range() {
        let mut state = PileState::new(2, STAGE_W, DEFAULT_INSET);
        for _ in 0..64 {
            let w = random_width(&mut state.rng);
            assert!(w >= MIN_ITEM_WIDTH && w < MAX_ITEM_WIDTH);
            assert_eq!(w, w.floor());
        }
    }

    #[test]
    fn test_spawn_direct_fills_towers_then_fails() {
        let mut state = PileState::new(3, STAGE_W, DEFAULT_INSET);
        for _ in 0..TOWER_COUNT * TOWER_CAPACITY {
            assert!(spawn_direct(&mut state, 100.0));
        }
        assert!(!spawn_direct(&mut state, 100.0));
        assert!(state.flags.all_full);
    }
}

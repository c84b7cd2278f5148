//! Boundary monitor
//!
//! Runs once after every physics step. Items whose center has crossed the
//! left/right overflow boundary are retired: removed from the engine and
//! stacked onto a background tower. The first crossing permanently stops
//! surface spawning for the session.
//!
//! Crossing items are identified on a snapshot first and removed in a second
//! pass, so removal never interacts with iteration order.

use super::engine::PhysicsWorld;
use super::state::PileState;

/// Scan live items against the boundary and retire any crossers.
pub fn sweep(state: &mut PileState, world: &mut PhysicsWorld) {
    let boundary = state.boundary;
    let crossing: Vec<u32> = state
        .items
        .iter()
        .filter_map(|item| {
            let (pos, _) = world.pose(item.body)?;
            (pos.x < boundary.left || pos.x > boundary.right).then_some(item.id)
        })
        .collect();

    for id in crossing {
        let Some(idx) = state.items.iter().position(|item| item.id == id) else {
            continue;
        };
        let item = state.items.remove(idx);

        if state.flags.allow_surface_spawn {
            state.flags.allow_surface_spawn = false;
            log::info!("pile overflowed the stage, routing new books to towers");
        }

        world.remove(item.body);
        state.towers.place(
            &mut state.rng,
            &mut state.flags,
            item.width,
            item.border,
            item.fill,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::spawn::spawn_live;
    use crate::sim::state::Boundary;

    #[test]
    fn test_items_inside_boundary_stay_live() {
        let mut state = PileState::new(11, STAGE_W, DEFAULT_INSET);
        let mut world = PhysicsWorld::new(STAGE_W, DEFAULT_STAGE_H);
        spawn_live(&mut state, &mut world, 120.0);

        world.step();
        sweep(&mut state, &mut world);

        assert_eq!(state.live_count(), 1);
        assert_eq!(state.towers.total(), 0);
        assert!(state.flags.allow_surface_spawn);
    }

    #[test]
    fn test_crossing_item_is_retired_to_a_tower() {
        let mut state = PileState::new(12, STAGE_W, DEFAULT_INSET);
        let mut world = PhysicsWorld::new(STAGE_W, DEFAULT_STAGE_H);
        spawn_live(&mut state, &mut world, 120.0);
        spawn_live(&mut state, &mut world, 130.0);

        // Narrow the boundary past the spawn range so both items now count
        // as crossers without simulating sideways motion.
        state.boundary = Boundary {
            left: state.stage_center + SPAWN_SPREAD + 10.0,
            right: state.stage_center + SPAWN_SPREAD + 20.0,
        };
        sweep(&mut state, &mut world);

        // Retired from physics, present in exactly one place.
        assert_eq!(state.live_count(), 0);
        assert_eq!(world.dynamic_count(), 0);
        assert_eq!(state.towers.total(), 2);
        assert!(!state.flags.allow_surface_spawn, "overflow latches the flag");
    }

    #[test]
    fn test_sweep_visits_every_crosser_once() {
        let mut state = PileState::new(13, STAGE_W, DEFAULT_INSET);
        let mut world = PhysicsWorld::new(STAGE_W, DEFAULT_STAGE_H);
        for _ in 0..8 {
            spawn_live(&mut state, &mut world, 100.0);
        }

        state.boundary = Boundary {
            left: state.stage_center + SPAWN_SPREAD + 10.0,
            right: state.stage_center + SPAWN_SPREAD + 20.0,
        };
        sweep(&mut state, &mut world);

        assert_eq!(state.towers.total(), 8);
        assert_eq!(state.live_count(), 0);

        // A second sweep finds nothing left to retire.
        sweep(&mut state, &mut world);
        assert_eq!(state.towers.total(), 8);
    }
}

//! Count reconciler
//!
//! Moves the pile toward the externally supplied target count, one batched
//! pass at a time. Additions are rate-limited per pass so a bursty target
//! change cannot stall a frame; removals drain live items newest-first, then
//! towers LIFO. The host debounces passes with a short cancellable timer.

use super::engine::PhysicsWorld;
use super::spawn::{random_width, spawn_direct, spawn_live};
use super::state::PileState;
use crate::consts::*;

/// Coerce an externally supplied count to a usable target.
/// Negative and non-finite inputs are treated as zero.
pub fn coerce_target(raw: f64) -> u32 {
    if !raw.is_finite() || raw < 0.0 {
        return 0;
    }
    raw.floor().min(u32::MAX as f64) as u32
}

/// Debounce before a reconciliation pass. Short on first activation so the
/// initial population does not visibly pop in late.
pub fn debounce_delay_ms(state: &PileState) -> i32 {
    if state.total() == 0 {
        DEBOUNCE_COLD_MS
    } else {
        DEBOUNCE_WARM_MS
    }
}

/// One reconciliation pass toward `state.target`.
///
/// Returns true when the pass hit its per-pass ceiling with work remaining,
/// so the host should schedule a follow-up pass. Saturation (`all_full`) and
/// completed passes return false.
pub fn reconcile(state: &mut PileState, world: &mut PhysicsWorld) -> bool {
    let target = state.target;
    let current = state.total();

    if target > current {
        let ceiling = if current == 0 { MAX_ADD_COLD } else { MAX_ADD_WARM };
        let to_add = (target - current).min(ceiling);

        for _ in 0..to_add {
            if state.flags.all_full {
                break;
            }
            let width = random_width(&mut state.rng);
            if state.flags.allow_surface_spawn {
                spawn_live(state, world, width);
            } else if !spawn_direct(state, width) {
                break;
            }
        }
    } else if target < current {
        let mut to_remove = current - target;

        // Live items first, most recently spawned first.
        while to_remove > 0 {
            let Some(item) = state.items.pop() else { break };
            world.remove(item.body);
            to_remove -= 1;
        }
        // Then towers, LIFO across towers; remove_last clears `all_full`
        // once any tower has spare capacity again.
        while to_remove > 0 {
            if !state.towers.remove_last(&mut state.flags) {
                break;
            }
            to_remove -= 1;
        }
    }

    state.total() < state.target && !state.flags.all_full
}

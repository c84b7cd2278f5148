//! Per-frame sprite layout
//!
//! Live planks copy their pose out of the physics engine every animation
//! frame. Towers need no per-frame work: entry `j` sits at `j * ITEM_HEIGHT`
//! above the tower base, derived purely from stack index.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{PhysicsWorld, PileState, Towers};

/// One rectangle to paint. `id` is the stable item id for live planks and
/// `None` for tower entries (towers are rebuilt wholesale on change).
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub id: Option<u32>,
    pub pos: Vec2,
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    pub border: &'static str,
    pub fill: &'static str,
}

/// Sprites for live planks, capped at [`MAX_DRAWN_LIVE`]. The simulation
/// keeps stepping items beyond the cap; they just are not painted.
pub fn live_sprites(state: &PileState, world: &PhysicsWorld) -> Vec<Sprite> {
    state
        .items
        .iter()
        .take(MAX_DRAWN_LIVE)
        .filter_map(|item| {
            let (pos, rotation) = world.pose(item.body)?;
            Some(Sprite {
                id: Some(item.id),
                pos,
                rotation,
                width: item.width,
                height: ITEM_HEIGHT,
                border: item.border,
                fill: item.fill,
            })
        })
        .collect()
}

/// Sprites for all tower entries. `floor_y` is the y of the stage floor;
/// stacks grow upward from it at each tower's horizontal offset.
pub fn tower_sprites(towers: &Towers, stage_center: f32, floor_y: f32) -> Vec<Sprite> {
    towers
        .towers
        .iter()
        .flat_map(|tower| {
            tower.entries.iter().enumerate().map(move |(j, entry)| Sprite {
                id: None,
                pos: Vec2::new(
                    stage_center + tower.offset_x + entry.offset,
                    floor_y - (j as f32 + 1.0) * ITEM_HEIGHT,
                ),
                rotation: entry.rotation,
                width: entry.width,
                height: ITEM_HEIGHT,
                border: entry.border,
                fill: entry.fill,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::{spawn_direct, spawn_live};

    #[test]
    fn test_tower_y_derives_from_stack_index() {
        let mut state = PileState::new(21, STAGE_W, DEFAULT_INSET);
        for _ in 0..6 {
            assert!(spawn_direct(&mut state, 100.0));
        }

        let floor_y = DEFAULT_STAGE_H;
        let sprites = tower_sprites(&state.towers, state.stage_center, floor_y);
        assert_eq!(sprites.len(), 6);

        // Entries of one tower stack in ITEM_HEIGHT increments off the floor.
        for tower in &state.towers.towers {
            for (j, entry) in tower.entries.iter().enumerate() {
                let expected_y = floor_y - (j as f32 + 1.0) * ITEM_HEIGHT;
                let sprite = sprites
                    .iter()
                    .find(|s| {
                        (s.pos.y - expected_y).abs() < 0.01
                            && (s.pos.x - (state.stage_center + tower.offset_x + entry.offset))
                                .abs()
                                < 0.01
                    })
                    .expect("each entry maps to a sprite at its stack slot");
                assert_eq!(sprite.rotation, 0.0);
            }
        }
    }

    #[test]
    fn test_live_sprites_carry_pose_and_identity() {
        let mut state = PileState::new(22, STAGE_W, DEFAULT_INSET);
        let mut world = PhysicsWorld::new(STAGE_W, DEFAULT_STAGE_H);
        spawn_live(&mut state, &mut world, 120.0);
        spawn_live(&mut state, &mut world, 140.0);

        let sprites = live_sprites(&state, &world);
        assert_eq!(sprites.len(), 2);
        for (item, sprite) in state.items.iter().zip(&sprites) {
            assert_eq!(sprite.id, Some(item.id));
            assert_eq!(sprite.width, item.width);
            let (pos, rot) = world.pose(item.body).unwrap();
            assert_eq!(sprite.pos, pos);
            assert_eq!(sprite.rotation, rot);
        }
    }

    #[test]
    fn test_live_draw_cap() {
        let mut state = PileState::new(23, STAGE_W, DEFAULT_INSET);
        let mut world = PhysicsWorld::new(STAGE_W, DEFAULT_STAGE_H);
        for _ in 0..MAX_DRAWN_LIVE + 5 {
            spawn_live(&mut state, &mut world, 100.0);
        }

        let sprites = live_sprites(&state, &world);
        assert_eq!(sprites.len(), MAX_DRAWN_LIVE);
        // The simulated count is unaffected by the draw cap.
        assert_eq!(state.live_count() as usize, MAX_DRAWN_LIVE + 5);
        assert_eq!(world.dynamic_count(), MAX_DRAWN_LIVE + 5);
    }
}

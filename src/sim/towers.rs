//! Overflow stack manager
//!
//! Three fixed-capacity background towers holding retired books. Entries are
//! visual-only: no physics, rotation fixed upright, y derived from stack
//! index at render time. Placement picks a tower with spare capacity
//! uniformly at random; removal is LIFO across all towers by placement
//! sequence.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::SimFlags;
use crate::consts::*;

/// One stacked book. Created on retirement or direct spawn, destroyed only
/// when the reconciler shrinks the total.
#[derive(Debug, Clone)]
pub struct StackEntry {
    pub width: f32,
    /// Small horizontal jitter, visual only
    pub offset: f32,
    /// Towers render upright
    pub rotation: f32,
    pub border: &'static str,
    pub fill: &'static str,
    /// Global placement order, newest highest
    seq: u64,
}

#[derive(Debug, Clone)]
pub struct Tower {
    pub capacity: usize,
    /// LIFO: last added is topmost
    pub entries: Vec<StackEntry>,
    /// Horizontal offset from stage center
    pub offset_x: f32,
}

impl Tower {
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }
}

#[derive(Debug, Clone)]
pub struct Towers {
    pub towers: [Tower; TOWER_COUNT],
    next_seq: u64,
    /// Bumped on every mutation so renderers can skip untouched frames
    pub revision: u64,
}

impl Towers {
    pub fn new() -> Self {
        let towers = TOWER_OFFSETS.map(|offset_x| Tower {
            capacity: TOWER_CAPACITY,
            entries: Vec::with_capacity(TOWER_CAPACITY),
            offset_x,
        });
        Self {
            towers,
            next_seq: 0,
            revision: 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.towers.iter().map(|t| t.count() as u32).sum()
    }

    fn all_at_capacity(&self) -> bool {
        self.towers.iter().all(Tower::is_full)
    }

    /// Stack a retired book onto a random tower with spare capacity.
    ///
    /// Returns false when every tower is full, latching `all_full` and
    /// clearing `allow_surface_spawn` so upstream stops creating items.
    pub fn place(
        &mut self,
        rng: &mut Pcg32,
        flags: &mut SimFlags,
        width: f32,
        border: &'static str,
        fill: &'static str,
    ) -> bool {
        let open: Vec<usize> = (0..TOWER_COUNT)
            .filter(|&i| !self.towers[i].is_full())
            .collect();
        if open.is_empty() {
            flags.all_full = true;
            flags.allow_surface_spawn = false;
            log::debug!("all towers full, overflow saturated");
            return false;
        }
        let idx = open[rng.random_range(0..open.len())];

        let seq = self.next_seq;
        self.next_seq += 1;
        self.towers[idx].entries.push(StackEntry {
            width: width.floor().clamp(MIN_ITEM_WIDTH, MAX_ITEM_WIDTH),
            offset: rng.random_range(-TOWER_JITTER..TOWER_JITTER).round(),
            rotation: 0.0,
            border,
            fill,
            seq,
        });
        self.revision += 1;

        if self.all_at_capacity() {
            flags.all_full = true;
            flags.allow_surface_spawn = false;
        }
        true
    }

    /// Pop the most recently placed entry across all towers.
    ///
    /// Clears `all_full` once any tower has spare capacity again;
    /// `allow_surface_spawn` stays latched.
    pub fn remove_last(&mut self, flags: &mut SimFlags) -> bool {
        let target = (0..TOWER_COUNT)
            .filter(|&i| self.towers[i].count() > 0)
            .max_by_key(|&i| (self.towers[i].entries.last().map(|e| e.seq), i));
        let Some(idx) = target else {
            return false;
        };

        self.towers[idx].entries.pop();
        self.revision += 1;
        if !self.all_at_capacity() {
            flags.all_full = false;
        }
        true
    }
}

impl Default for Towers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_place_respects_capacity() {
        let mut towers = Towers::new();
        let mut rng = rng();
        let mut flags = SimFlags::default();

        for _ in 0..TOWER_COUNT * TOWER_CAPACITY {
            assert!(towers.place(&mut rng, &mut flags, 100.0, "#ffffff", "#d9cdab"));
        }
        for tower in &towers.towers {
            assert!(tower.count() <= tower.capacity);
        }
        assert_eq!(towers.total(), (TOWER_COUNT * TOWER_CAPACITY) as u32);
    }

    #[test]
    fn test_all_full_latches_and_rejects() {
        let mut towers = Towers::new();
        let mut rng = rng();
        let mut flags = SimFlags::default();

        for _ in 0..TOWER_COUNT * TOWER_CAPACITY {
            towers.place(&mut rng, &mut flags, 100.0, "#ffffff", "#d9cdab");
        }
        assert!(flags.all_full);
        assert!(!flags.allow_surface_spawn);

        // Saturated: further placements fail and leave counts untouched.
        assert!(!towers.place(&mut rng, &mut flags, 100.0, "#ffffff", "#d9cdab"));
        assert_eq!(towers.total(), (TOWER_COUNT * TOWER_CAPACITY) as u32);
    }

    #[test]
    fn test_remove_is_lifo_by_placement_order() {
        let mut towers = Towers::new();
        let mut rng = rng();
        let mut flags = SimFlags::default();

        for _ in 0..5 {
            towers.place(&mut rng, &mut flags, 100.0, "#ffffff", "#d9cdab");
        }
        // The newest entry has the highest sequence; find its tower.
        let newest_tower = (0..TOWER_COUNT)
            .filter(|&i| towers.towers[i].count() > 0)
            .max_by_key(|&i| towers.towers[i].entries.last().unwrap().seq)
            .unwrap();
        let before = towers.towers[newest_tower].count();

        assert!(towers.remove_last(&mut flags));
        assert_eq!(towers.towers[newest_tower].count(), before - 1);
        assert_eq!(towers.total(), 4);
    }

    #[test]
    fn test_remove_unlatches_all_full_but_not_surface_spawn() {
        let mut towers = Towers::new();
        let mut rng = rng();
        let mut flags = SimFlags::default();

        for _ in 0..TOWER_COUNT * TOWER_CAPACITY {
            towers.place(&mut rng, &mut flags, 100.0, "#ffffff", "#d9cdab");
        }
        assert!(flags.all_full);

        assert!(towers.remove_last(&mut flags));
        assert!(!flags.all_full);
        // One-way latch: drains never re-enable physics spawning.
        assert!(!flags.allow_surface_spawn);
    }

    #[test]
    fn test_remove_from_empty_returns_false() {
        let mut towers = Towers::new();
        let mut flags = SimFlags::default();
        assert!(!towers.remove_last(&mut flags));
    }

    #[test]
    fn test_place_clamps_width_and_zeroes_rotation() {
        let mut towers = Towers::new();
        let mut rng = rng();
        let mut flags = SimFlags::default();

        towers.place(&mut rng, &mut flags, 999.0, "#ffffff", "#d9cdab");
        towers.place(&mut rng, &mut flags, 1.0, "#ffffff", "#d9cdab");

        for entry in towers.towers.iter().flat_map(|t| &t.entries) {
            assert!(entry.width >= MIN_ITEM_WIDTH && entry.width <= MAX_ITEM_WIDTH);
            assert_eq!(entry.rotation, 0.0);
            assert!(entry.offset.abs() <= TOWER_JITTER);
        }
    }
}

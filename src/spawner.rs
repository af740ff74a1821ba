/// Enemy placement policy: periodic spawns with anti-clustering on the y axis.
///
/// New enemies enter at the right field edge.  To keep them from stacking
/// into a wall, the spawner remembers the last few accepted vertical
/// positions and tries to place each newcomer well away from all of them.

use std::collections::VecDeque;

use rand::Rng;

use crate::config::Config;
use crate::entities::{Enemy, Rect};

/// Placement attempts before giving up on the separation constraint.
const MAX_ATTEMPTS: u32 = 10;

#[derive(Clone, Debug)]
pub struct Spawner {
    recent_y: VecDeque<i32>,
    depth: usize,
}

impl Spawner {
    pub fn new(depth: usize) -> Self {
        Spawner {
            recent_y: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// Forget all recorded placements (field reset).
    pub fn clear(&mut self) {
        self.recent_y.clear();
    }

    pub fn history(&self) -> impl Iterator<Item = i32> + '_ {
        self.recent_y.iter().copied()
    }

    /// Pick a vertical position for a new enemy.
    ///
    /// Up to `MAX_ATTEMPTS` uniform draws inside the margin-reduced band;
    /// the first candidate farther than `min_separation` from every recent
    /// placement wins and is recorded.  If none qualifies, an unconstrained
    /// draw over the full sprite range is returned unrecorded — spawning
    /// never stalls.
    pub fn pick_y(&mut self, rng: &mut impl Rng, cfg: &Config) -> i32 {
        let band_top = cfg.hud_margin;
        let band_bottom = cfg.field_h - cfg.enemy_size - cfg.hud_margin;
        for _ in 0..MAX_ATTEMPTS {
            let y = rng.gen_range(band_top..=band_bottom);
            if self
                .recent_y
                .iter()
                .all(|&used| (y - used).abs() > cfg.min_separation)
            {
                self.record(y);
                return y;
            }
        }
        log::debug!("spawn placement fell back to an unconstrained draw");
        rng.gen_range(0..=cfg.field_h - cfg.enemy_size)
    }

    fn record(&mut self, y: i32) {
        self.recent_y.push_back(y);
        if self.recent_y.len() > self.depth {
            self.recent_y.pop_front();
        }
    }

    /// Build a fresh enemy at the right edge of the field.
    pub fn spawn(&mut self, rng: &mut impl Rng, cfg: &Config) -> Enemy {
        let y = self.pick_y(rng, cfg);
        Enemy {
            rect: Rect::new(cfg.field_w, y, cfg.enemy_size, cfg.enemy_size),
            speed: rng.gen_range(cfg.enemy_speed_min..=cfg.enemy_speed_max),
            sprite: rng.gen_range(0..cfg.enemy_sprites),
        }
    }
}

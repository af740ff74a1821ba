/// Tunable constants for the whole simulation.
///
/// Every number the update cycle depends on lives here so the core logic
/// stays free of magic values.  `validate` runs once at startup and rejects
/// configurations that would make the simulation meaningless.

use anyhow::{bail, Result};

/// How a session moves from one phase to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressionPolicy {
    /// Phase is derived from cumulative score against a fixed threshold table.
    ScoreThresholds,
    /// A flag rises after a dwell time; touching it advances exactly one phase.
    TimedFlag,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Logical play-field size.  The terminal renderer scales to fit.
    pub field_w: i32,
    pub field_h: i32,
    /// Top/bottom band reserved for the HUD; player movement and enemy
    /// spawn placement stay out of it.
    pub hud_margin: i32,

    pub player_size: i32,
    /// Displacement per tick per held direction.
    pub player_speed: i32,
    pub player_start_x: i32,

    pub enemy_size: i32,
    pub enemy_speed_min: i32,
    pub enemy_speed_max: i32,
    /// Number of cosmetic enemy variants.
    pub enemy_sprites: u8,

    pub projectile_size: i32,
    pub projectile_speed: i32,

    /// Wall-clock interval between enemy spawns, independent of frame rate.
    pub spawn_interval_ms: u64,
    /// A spawn candidate must differ by more than this from every recent
    /// placement to be accepted without fallback.
    pub min_separation: i32,
    /// How many accepted y-positions the spawner remembers.
    pub history_depth: usize,

    /// Ascending score thresholds, one per phase step (ScoreThresholds only).
    pub thresholds: Vec<u32>,
    /// Score added per destroyed enemy.
    pub kill_reward: u32,
    /// When set, score wraps to zero at this value and grants a life.
    pub life_reward_threshold: Option<u32>,
    pub starting_lives: u32,
    pub policy: ProgressionPolicy,

    pub flag_w: i32,
    pub flag_h: i32,
    /// Units the flag climbs per tick until it reaches its resting spot.
    pub flag_rise_speed: i32,
    /// Opacity gained per tick while the flag fades in.
    pub flag_alpha_step: u8,
    pub flag_right_margin: i32,
    pub flag_bottom_margin: i32,
    /// Phase time that must elapse before the flag appears (TimedFlag only).
    pub flag_dwell_ms: u64,

    /// Phase-intro pause (phase name + lives).
    pub vignette_ms: u64,
    /// Game-over and success screens share this dwell.
    pub endscreen_ms: u64,
    /// Short celebration after the flag is collected.
    pub flourish_ms: u64,
}

impl Config {
    /// Stock configuration for a policy.  The two policies ship with the
    /// reward scheme they were designed around: threshold progression pays
    /// 10 per kill with no life bonus, flag progression pays 1 per kill and
    /// converts every 100 points into an extra life.
    pub fn for_policy(policy: ProgressionPolicy) -> Self {
        let (kill_reward, life_reward_threshold) = match policy {
            ProgressionPolicy::ScoreThresholds => (10, None),
            ProgressionPolicy::TimedFlag => (1, Some(100)),
        };
        Config {
            field_w: 1536,
            field_h: 1024,
            hud_margin: 50,
            player_size: 120,
            player_speed: 5,
            player_start_x: 100,
            enemy_size: 120,
            enemy_speed_min: 3,
            enemy_speed_max: 8,
            enemy_sprites: 12,
            projectile_size: 65,
            projectile_speed: 10,
            spawn_interval_ms: 400,
            min_separation: 130,
            history_depth: 10,
            thresholds: vec![
                100, 200, 300, 450, 600, 750, 950, 1150, 1350, 1600, 1850, 2100, 2500,
            ],
            kill_reward,
            life_reward_threshold,
            starting_lives: 5,
            policy,
            flag_w: 90,
            flag_h: 140,
            flag_rise_speed: 6,
            flag_alpha_step: 5,
            flag_right_margin: 30,
            flag_bottom_margin: 20,
            flag_dwell_ms: 24_000,
            vignette_ms: 3_000,
            endscreen_ms: 5_000,
            flourish_ms: 300,
        }
    }

    /// Vertical spawn point: player centred in the field.
    pub fn player_start_y(&self) -> i32 {
        (self.field_h - self.player_size) / 2
    }

    /// Reject configurations that would produce undefined runtime behaviour.
    pub fn validate(&self) -> Result<()> {
        if self.field_w <= 0 || self.field_h <= 0 {
            bail!(
                "field dimensions must be positive, got {}x{}",
                self.field_w,
                self.field_h
            );
        }
        let tallest = self.enemy_size.max(self.player_size);
        if self.field_h <= 2 * self.hud_margin + tallest {
            bail!(
                "vertical play band is empty: field height {} cannot fit a \
                 {}-unit sprite between two {}-unit margins",
                self.field_h,
                tallest,
                self.hud_margin
            );
        }
        if self.player_size <= 0 || self.enemy_size <= 0 || self.projectile_size <= 0 {
            bail!("entity sizes must be positive");
        }
        if self.player_size >= self.field_w || self.enemy_size >= self.field_w {
            bail!("entity sizes must fit inside the field width {}", self.field_w);
        }
        if self.player_speed <= 0 || self.projectile_speed <= 0 {
            bail!("player and projectile speeds must be positive");
        }
        if self.enemy_speed_min <= 0 || self.enemy_speed_min > self.enemy_speed_max {
            bail!(
                "enemy speed range {}..={} is invalid",
                self.enemy_speed_min,
                self.enemy_speed_max
            );
        }
        if self.spawn_interval_ms == 0 {
            bail!("spawn interval must be non-zero");
        }
        if self.history_depth == 0 {
            bail!("spawn history depth must be at least 1");
        }
        if self.vignette_ms == 0
            || self.endscreen_ms == 0
            || self.flourish_ms == 0
            || self.flag_dwell_ms == 0
        {
            bail!("dwell durations must be non-zero");
        }
        if self.starting_lives == 0 {
            bail!("starting lives must be at least 1");
        }
        if self.kill_reward == 0 {
            bail!("kill reward must be non-zero");
        }
        if let Some(threshold) = self.life_reward_threshold {
            if threshold == 0 {
                bail!("life reward threshold must be non-zero when set");
            }
        }
        match self.policy {
            ProgressionPolicy::ScoreThresholds => {
                if self.thresholds.is_empty() {
                    bail!("score-threshold policy needs a non-empty threshold table");
                }
                if !self.thresholds.windows(2).all(|w| w[0] < w[1]) {
                    bail!("threshold table must be strictly ascending");
                }
            }
            ProgressionPolicy::TimedFlag => {
                if self.flag_w <= 0 || self.flag_h <= 0 {
                    bail!("flag size must be positive");
                }
                if self.flag_rise_speed <= 0 || self.flag_alpha_step == 0 {
                    bail!("flag rise speed and fade step must be positive");
                }
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_policy(ProgressionPolicy::TimedFlag)
    }
}

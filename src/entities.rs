/// All game entity types — positional data plus bounding-box geometry.
///
/// Entities own their velocity and know how to advance themselves by one
/// tick and whether they have left the field; everything else (spawning,
/// collisions, scoring) lives in the update cycle.

use crate::config::Config;
use crate::session::SessionState;
use crate::spawner::Spawner;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Strict AABB overlap — touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Positional state only; the life counter belongs to `SessionState`.
#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
}

impl Player {
    pub fn at_start(cfg: &Config) -> Self {
        Player {
            rect: Rect::new(
                cfg.player_start_x,
                cfg.player_start_y(),
                cfg.player_size,
                cfg.player_size,
            ),
        }
    }

    /// Back to the spawn point.
    pub fn reposition(&mut self, cfg: &Config) {
        self.rect.x = cfg.player_start_x;
        self.rect.y = cfg.player_start_y();
    }
}

// ── Enemy ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
    /// Leftward units per tick, fixed per instance.
    pub speed: i32,
    /// Cosmetic variant id; no behavioural effect.
    pub sprite: u8,
}

impl Enemy {
    pub fn advance(&mut self) {
        self.rect.x -= self.speed;
    }

    /// Gone once the right edge clears the left field boundary.
    pub fn is_out_of_bounds(&self) -> bool {
        self.rect.right() < 0
    }
}

// ── Projectile ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    pub rect: Rect,
    pub speed: i32,
}

impl Projectile {
    /// Leaves the muzzle at the player's right edge, vertically centred.
    pub fn fired_by(player: &Player, cfg: &Config) -> Self {
        let y = player.rect.y + (player.rect.h - cfg.projectile_size) / 2;
        Projectile {
            rect: Rect::new(
                player.rect.right(),
                y,
                cfg.projectile_size,
                cfg.projectile_size,
            ),
            speed: cfg.projectile_speed,
        }
    }

    pub fn advance(&mut self) {
        self.rect.x += self.speed;
    }

    pub fn is_out_of_bounds(&self, field_w: i32) -> bool {
        self.rect.x > field_w
    }
}

// ── Flag ─────────────────────────────────────────────────────────────────────

/// The timed progression collectible.  Starts below the field, climbs to its
/// resting spot near the bottom-right corner while fading in.
#[derive(Clone, Debug)]
pub struct Flag {
    pub rect: Rect,
    pub target_bottom: i32,
    pub alpha: u8,
    pub rise_speed: i32,
    pub alpha_step: u8,
}

impl Flag {
    pub fn rising(cfg: &Config) -> Self {
        Flag {
            rect: Rect::new(
                cfg.field_w - cfg.flag_right_margin - cfg.flag_w,
                cfg.field_h,
                cfg.flag_w,
                cfg.flag_h,
            ),
            target_bottom: cfg.field_h - cfg.flag_bottom_margin,
            alpha: 0,
            rise_speed: cfg.flag_rise_speed,
            alpha_step: cfg.flag_alpha_step,
        }
    }

    pub fn advance(&mut self) {
        if self.rect.bottom() > self.target_bottom {
            self.rect.y -= self.rise_speed;
        }
        self.alpha = self.alpha.saturating_add(self.alpha_step);
    }
}

// ── Input & cues ─────────────────────────────────────────────────────────────

/// Input sampled once per tick.  Directional fields reflect held keys; the
/// `_edge` fields and everything below them are single-press events.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub up_edge: bool,
    pub down_edge: bool,
    pub fire: bool,
    pub confirm: bool,
    pub escape: bool,
    pub quit: bool,
}

/// Sound cues raised by the simulation.  Playback is the presentation
/// layer's problem; a no-op player is a valid collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Shot,
    Impact,
    FlagCollected,
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire world.  Cloneable so the pure tick can return a new copy
/// without mutating the original; the orchestrator owns the only live one.
#[derive(Clone, Debug)]
pub struct World {
    pub session: SessionState,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub flag: Option<Flag>,
    pub spawner: Spawner,
    /// Wall-clock timestamp of the last enemy spawn.
    pub last_spawn_ms: u64,
}

impl World {
    pub fn new(cfg: &Config, now_ms: u64) -> Self {
        World {
            session: SessionState::new(cfg.starting_lives, now_ms),
            player: Player::at_start(cfg),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            flag: None,
            spawner: Spawner::new(cfg.history_depth),
            last_spawn_ms: now_ms,
        }
    }
}

/// Pure per-tick simulation.
///
/// `tick` takes the current world, this tick's sampled input and a
/// monotonic millisecond timestamp, and returns a brand-new world along
/// with any sound cues raised on the way.  All randomness comes through
/// the injected RNG so callers control determinism (tests use a seeded
/// one).  Collision resolution order within a tick is fixed:
/// projectile/enemy first, then player/enemy, then player/flag — a life
/// loss consumes the tick and the flag check is skipped.

use rand::Rng;

use crate::config::{Config, ProgressionPolicy};
use crate::entities::{Cue, Flag, InputState, Projectile, World};
use crate::session::{
    phase_for_score, phase_name, Screen, SessionState, FIRST_PHASE, LAST_PHASE, SUCCESS_PHASE,
};

/// What one tick produced.
#[derive(Clone, Debug)]
pub struct TickResult {
    pub world: World,
    pub cues: Vec<Cue>,
    /// Set when the player picked Quit from the menu.
    pub quit: bool,
}

/// Advance the whole game by one tick.
pub fn tick(
    world: &World,
    input: &InputState,
    now_ms: u64,
    rng: &mut impl Rng,
    cfg: &Config,
) -> TickResult {
    let mut world = world.clone();
    let mut cues = Vec::new();
    let mut quit = false;

    match world.session.screen {
        Screen::Menu => quit = menu_step(&mut world, input, now_ms, cfg),
        Screen::Instructions | Screen::Credits => {
            if input.escape {
                world.session.screen = Screen::Menu;
            }
        }
        Screen::Vignette { until_ms } => {
            if now_ms >= until_ms {
                world.session.screen = Screen::Playing;
            }
        }
        Screen::Flourish { until_ms } => {
            if now_ms >= until_ms {
                finish_flag_capture(&mut world, now_ms, cfg);
            }
        }
        Screen::GameOver { until_ms } | Screen::Success { until_ms } => {
            if now_ms >= until_ms {
                reset_session(&mut world, now_ms, cfg);
            }
        }
        Screen::Playing => playing_step(&mut world, input, now_ms, rng, cfg, &mut cues),
    }

    TickResult { world, cues, quit }
}

/// Full reset back to the menu; game over and success share it verbatim.
pub fn reset_session(world: &mut World, now_ms: u64, cfg: &Config) {
    world.session = SessionState::new(cfg.starting_lives, now_ms);
    clear_field(world, now_ms, cfg);
}

// ── Menu ─────────────────────────────────────────────────────────────────────

fn menu_step(world: &mut World, input: &InputState, now_ms: u64, cfg: &Config) -> bool {
    if input.up_edge {
        world.session.menu_up();
    }
    if input.down_edge {
        world.session.menu_down();
    }
    if input.confirm {
        match world.session.selected_item() {
            "Play" => enter_phase(world, FIRST_PHASE, now_ms, cfg),
            "Instructions" => world.session.screen = Screen::Instructions,
            "Credits" => world.session.screen = Screen::Credits,
            _ => return true, // Quit
        }
    }
    false
}

// ── Phase transitions & resets ───────────────────────────────────────────────

/// Move to a new phase: clear the field and queue the one-shot vignette.
fn enter_phase(world: &mut World, phase: u8, now_ms: u64, cfg: &Config) {
    log::debug!("entering phase {} ({})", phase, phase_name(phase));
    world.session.phase = phase;
    world.session.phase_started_ms = now_ms;
    world.session.flag_spawned = false;
    world.session.screen = Screen::Vignette {
        until_ms: now_ms + cfg.vignette_ms,
    };
    clear_field(world, now_ms, cfg);
}

/// Remove every transient entity and put the player back on its mark.
fn clear_field(world: &mut World, now_ms: u64, cfg: &Config) {
    world.enemies.clear();
    world.projectiles.clear();
    world.flag = None;
    world.spawner.clear();
    world.player.reposition(cfg);
    world.last_spawn_ms = now_ms;
}

// ── Gameplay tick ────────────────────────────────────────────────────────────

fn playing_step(
    world: &mut World,
    input: &InputState,
    now_ms: u64,
    rng: &mut impl Rng,
    cfg: &Config,
    cues: &mut Vec<Cue>,
) {
    maybe_spawn_flag(world, now_ms, cfg);
    maybe_spawn_enemy(world, now_ms, rng, cfg);

    move_player(world, input, cfg);
    if input.fire {
        world
            .projectiles
            .push(Projectile::fired_by(&world.player, cfg));
        cues.push(Cue::Shot);
    }

    advance_entities(world, cfg);

    resolve_shot_hits(world, cfg, cues);
    if resolve_player_hit(world, now_ms, cfg) {
        return;
    }
    resolve_flag_capture(world, now_ms, cfg, cues);

    if cfg.policy == ProgressionPolicy::ScoreThresholds && world.session.in_play() {
        let implied = phase_for_score(world.session.score, &cfg.thresholds);
        if implied >= SUCCESS_PHASE {
            world.session.phase = SUCCESS_PHASE;
            world.session.screen = Screen::Success {
                until_ms: now_ms + cfg.endscreen_ms,
            };
        } else if implied > world.session.phase {
            enter_phase(world, implied, now_ms, cfg);
        }
    }
}

/// TimedFlag policy: raise the flag once the phase dwell has elapsed, at
/// most once per phase timer window.
fn maybe_spawn_flag(world: &mut World, now_ms: u64, cfg: &Config) {
    if cfg.policy != ProgressionPolicy::TimedFlag
        || world.session.flag_spawned
        || world.flag.is_some()
    {
        return;
    }
    if now_ms.saturating_sub(world.session.phase_started_ms) >= cfg.flag_dwell_ms {
        log::debug!("flag raised for phase {}", world.session.phase);
        world.flag = Some(Flag::rising(cfg));
        world.session.flag_spawned = true;
    }
}

/// The spawn timer runs on its own wall-clock interval, independent of the
/// tick rate.
fn maybe_spawn_enemy(world: &mut World, now_ms: u64, rng: &mut impl Rng, cfg: &Config) {
    if now_ms.saturating_sub(world.last_spawn_ms) >= cfg.spawn_interval_ms {
        let enemy = world.spawner.spawn(rng, cfg);
        world.enemies.push(enemy);
        world.last_spawn_ms = now_ms;
    }
}

fn move_player(world: &mut World, input: &InputState, cfg: &Config) {
    let r = &mut world.player.rect;
    if input.up {
        r.y -= cfg.player_speed;
    }
    if input.down {
        r.y += cfg.player_speed;
    }
    if input.left {
        r.x -= cfg.player_speed;
    }
    if input.right {
        r.x += cfg.player_speed;
    }
    r.x = r.x.clamp(0, cfg.field_w - r.w);
    r.y = r.y.clamp(cfg.hud_margin, cfg.field_h - cfg.hud_margin - r.h);
}

fn advance_entities(world: &mut World, cfg: &Config) {
    for enemy in &mut world.enemies {
        enemy.advance();
    }
    world.enemies.retain(|e| !e.is_out_of_bounds());

    for shot in &mut world.projectiles {
        shot.advance();
    }
    world
        .projectiles
        .retain(|s| !s.is_out_of_bounds(cfg.field_w));

    if let Some(flag) = &mut world.flag {
        flag.advance();
    }
}

// ── Collision resolution ─────────────────────────────────────────────────────

/// Projectile/enemy overlaps: greedy first-match pairing, each entity
/// consumed by at most one pair per tick.
fn resolve_shot_hits(world: &mut World, cfg: &Config, cues: &mut Vec<Cue>) {
    let mut dead_enemies: Vec<usize> = Vec::new();
    let mut spent_shots: Vec<usize> = Vec::new();

    for (si, shot) in world.projectiles.iter().enumerate() {
        for (ei, enemy) in world.enemies.iter().enumerate() {
            if dead_enemies.contains(&ei) {
                continue;
            }
            if shot.rect.intersects(&enemy.rect) {
                dead_enemies.push(ei);
                spent_shots.push(si);
                break;
            }
        }
    }

    if dead_enemies.is_empty() {
        return;
    }

    let mut ei = 0;
    world.enemies.retain(|_| {
        let keep = !dead_enemies.contains(&ei);
        ei += 1;
        keep
    });
    let mut si = 0;
    world.projectiles.retain(|_| {
        let keep = !spent_shots.contains(&si);
        si += 1;
        keep
    });

    for _ in 0..dead_enemies.len() {
        cues.push(Cue::Impact);
        world.session.score += cfg.kill_reward;
        if let Some(threshold) = cfg.life_reward_threshold {
            if world.session.score >= threshold {
                world.session.score = 0;
                world.session.lives += 1;
                log::debug!("life reward, {} lives", world.session.lives);
            }
        }
    }
}

/// Player/enemy contact: the full life-loss reset.  Returns true if it fired.
fn resolve_player_hit(world: &mut World, now_ms: u64, cfg: &Config) -> bool {
    let hit = world
        .enemies
        .iter()
        .any(|e| e.rect.intersects(&world.player.rect));
    if !hit {
        return false;
    }

    world.session.lives = world.session.lives.saturating_sub(1);
    log::debug!("player hit, {} lives left", world.session.lives);
    clear_field(world, now_ms, cfg);
    world.session.phase_started_ms = now_ms;
    world.session.flag_spawned = false;

    if world.session.lives == 0 {
        world.session.screen = Screen::GameOver {
            until_ms: now_ms + cfg.endscreen_ms,
        };
    } else if world.session.lives <= cfg.starting_lives {
        world.session.screen = Screen::Vignette {
            until_ms: now_ms + cfg.vignette_ms,
        };
    }
    true
}

fn resolve_flag_capture(world: &mut World, now_ms: u64, cfg: &Config, cues: &mut Vec<Cue>) {
    let touched = world
        .flag
        .as_ref()
        .map_or(false, |f| f.rect.intersects(&world.player.rect));
    if touched {
        cues.push(Cue::FlagCollected);
        world.session.screen = Screen::Flourish {
            until_ms: now_ms + cfg.flourish_ms,
        };
    }
}

/// Runs when the capture flourish expires: one phase forward, or the
/// success screen from the last phase.
fn finish_flag_capture(world: &mut World, now_ms: u64, cfg: &Config) {
    world.flag = None;
    world.session.flag_spawned = false;
    if world.session.phase < LAST_PHASE {
        enter_phase(world, world.session.phase + 1, now_ms, cfg);
    } else {
        world.session.phase = SUCCESS_PHASE;
        world.session.screen = Screen::Success {
            until_ms: now_ms + cfg.endscreen_ms,
        };
    }
}

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use pampas_hero::compute::tick;
use pampas_hero::config::{Config, ProgressionPolicy};
use pampas_hero::display;
use pampas_hero::entities::{Cue, InputState, World};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate refreshes the window before it expires.
const HOLD_WINDOW: u64 = 4;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "pampas_hero", about = "Terminal side-scrolling shooter")]
struct Args {
    /// Phase progression rule.
    #[arg(long, value_enum, default_value_t = PolicyArg::Flag)]
    policy: PolicyArg,
    /// Seed the RNG for a deterministic run.
    #[arg(long)]
    seed: Option<u64>,
    /// Ring the terminal bell on impact cues.
    #[arg(long)]
    sound: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Phases advance on score thresholds.
    Score,
    /// Phases advance by collecting the timed flag.
    Flag,
}

impl From<PolicyArg> for ProgressionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Score => ProgressionPolicy::ScoreThresholds,
            PolicyArg::Flag => ProgressionPolicy::TimedFlag,
        }
    }
}

// ── Cue playback ──────────────────────────────────────────────────────────────

/// Sound-cue sink.  The simulation only emits cue values; whether anything
/// audible happens is up to the player chosen at startup.
trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

struct SilentCues;

impl CuePlayer for SilentCues {
    fn play(&mut self, _cue: Cue) {}
}

/// Terminal bell on the percussive cues.
struct BellCues;

impl CuePlayer for BellCues {
    fn play(&mut self, cue: Cue) {
        if matches!(cue, Cue::Impact | Cue::FlagCollected) {
            let _ = std::io::stderr().write_all(b"\x07");
        }
    }
}

// ── Input helpers ─────────────────────────────────────────────────────────────

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: instead of acting on each key event individually, a
/// `key_frame` map records the frame number of the last press/repeat event
/// for every key.  Each frame the directional keys still "fresh" (within
/// `HOLD_WINDOW` frames) are treated as held, so diagonal movement and
/// shoot-while-moving work on terminals with and without key-release
/// events.  Menu navigation, fire, confirm and escape stay edge-triggered.
fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    cues: &mut dyn CuePlayer,
    cfg: &Config,
) -> std::io::Result<()> {
    let epoch = Instant::now();
    let mut world = World::new(cfg, 0);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let now_ms = epoch.elapsed().as_millis() as u64;

        let mut input = InputState::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => input.quit = true,
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            input.quit = true;
                        }
                        KeyCode::Esc => input.escape = true,
                        KeyCode::Enter => input.confirm = true,
                        KeyCode::Char(' ') => input.fire = true,
                        KeyCode::Up => input.up_edge = true,
                        KeyCode::Down => input.down_edge = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        input.up = any_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w')], frame);
        input.down = any_held(&key_frame, &[KeyCode::Down, KeyCode::Char('s')], frame);
        input.left = any_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a')], frame);
        input.right = any_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d')], frame);

        // The quit signal works everywhere, including mid-dwell.
        if input.quit {
            return Ok(());
        }

        let result = tick(&world, &input, now_ms, rng, cfg);
        world = result.world;
        for cue in result.cues {
            cues.play(cue);
        }
        if result.quit {
            return Ok(());
        }

        display::render(out, &world, cfg)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = Config::for_policy(args.policy.into());
    cfg.validate().context("invalid configuration")?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut cues: Box<dyn CuePlayer> = if args.sound {
        Box::new(BellCues)
    } else {
        Box::new(SilentCues)
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &mut rng, cues.as_mut(), &cfg);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.map_err(Into::into)
}

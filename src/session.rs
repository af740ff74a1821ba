/// Session-level state: which screen is up, phase number, score, lives.
///
/// Phase 0 is the menu, 1..=13 are the playable phases, 14 is the terminal
/// success state.  Dwelling screens carry their own expiry timestamp so the
/// update loop can stay cooperative — nothing ever blocks.

pub const FIRST_PHASE: u8 = 1;
pub const LAST_PHASE: u8 = 13;
pub const SUCCESS_PHASE: u8 = 14;

pub const MENU_ITEMS: [&str; 4] = ["Play", "Instructions", "Credits", "Quit"];

/// Names shown in the per-phase vignette, one per playable phase.
const PHASE_NAMES: [&str; 13] = [
    "Bagé",
    "Pelotas",
    "Rio Grande",
    "Aceguá",
    "Lajeado",
    "Gramado",
    "Quaraí",
    "Farroupilha",
    "Torres",
    "Bento Gonçalves",
    "Porto Alegre",
    "Santa Vitória do Palmar",
    "Piratini",
];

pub fn phase_name(phase: u8) -> &'static str {
    if (FIRST_PHASE..=LAST_PHASE).contains(&phase) {
        PHASE_NAMES[(phase - FIRST_PHASE) as usize]
    } else {
        ""
    }
}

/// Phase implied by a cumulative score: one step past every threshold met,
/// so crossing the final table entry lands on `SUCCESS_PHASE`.
pub fn phase_for_score(score: u32, thresholds: &[u32]) -> u8 {
    let crossed = thresholds.iter().filter(|&&t| score >= t).count() as u8;
    FIRST_PHASE + crossed
}

// ── Screens ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Instructions,
    Credits,
    /// Phase-intro pause showing phase name and lives; gameplay resumes on expiry.
    Vignette { until_ms: u64 },
    Playing,
    /// Short celebration between touching the flag and the phase advance.
    Flourish { until_ms: u64 },
    GameOver { until_ms: u64 },
    Success { until_ms: u64 },
}

// ── Session state ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SessionState {
    pub screen: Screen,
    pub phase: u8,
    pub score: u32,
    pub lives: u32,
    pub menu_index: usize,
    /// When the current phase (or the last life-loss reset) began.
    pub phase_started_ms: u64,
    /// The flag spawns at most once per phase timer window.
    pub flag_spawned: bool,
}

impl SessionState {
    pub fn new(lives: u32, now_ms: u64) -> Self {
        SessionState {
            screen: Screen::Menu,
            phase: 0,
            score: 0,
            lives,
            menu_index: 0,
            phase_started_ms: now_ms,
            flag_spawned: false,
        }
    }

    pub fn in_play(&self) -> bool {
        matches!(self.screen, Screen::Playing)
    }

    pub fn menu_up(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }

    pub fn menu_down(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }

    pub fn selected_item(&self) -> &'static str {
        MENU_ITEMS[self.menu_index]
    }
}

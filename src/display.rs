/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// world.  No game logic is performed; this module only scales logical
/// field coordinates onto terminal cells and translates state into
/// crossterm commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::config::Config;
use crate::entities::World;
use crate::session::{phase_name, Screen, LAST_PHASE, MENU_ITEMS};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TITLE: Color = Color::Cyan;
const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PHASE: Color = Color::White;
const C_PLAYER: Color = Color::White;
const C_PROJECTILE: Color = Color::Cyan;
const C_FLAG_FADED: Color = Color::DarkGrey;
const C_FLAG: Color = Color::Green;
const C_SELECTED: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

/// One glyph/colour pair per enemy sprite variant; the modulo in
/// `draw_field` keeps any out-of-range id harmless.
const ENEMY_GLYPHS: [&str; 12] = [
    "<◉}", "<▣}", "<✶}", "<Ω}", "<Ψ}", "<Φ}", "<Θ}", "<Δ}", "<Ξ}", "<◆}", "<¤}", "<§}",
];
const ENEMY_COLORS: [Color; 12] = [
    Color::Red,
    Color::Green,
    Color::Magenta,
    Color::Yellow,
    Color::Blue,
    Color::Cyan,
    Color::DarkRed,
    Color::DarkGreen,
    Color::DarkMagenta,
    Color::DarkYellow,
    Color::DarkCyan,
    Color::White,
];

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps logical field coordinates onto terminal cells.
struct Viewport {
    cols: u16,
    rows: u16,
    field_w: i32,
    field_h: i32,
}

impl Viewport {
    fn new(cfg: &Config) -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Viewport {
            cols: cols.max(2),
            rows: rows.max(2),
            field_w: cfg.field_w,
            field_h: cfg.field_h,
        })
    }

    fn cell(&self, x: i32, y: i32) -> (u16, u16) {
        let cx = (x.max(0) as i64 * (self.cols - 1) as i64 / self.field_w.max(1) as i64) as u16;
        let cy = (y.max(0) as i64 * (self.rows - 1) as i64 / self.field_h.max(1) as i64) as u16;
        (cx.min(self.cols - 1), cy.min(self.rows - 1))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame for whatever screen is up.
pub fn render<W: Write>(out: &mut W, world: &World, cfg: &Config) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let vp = Viewport::new(cfg)?;

    match world.session.screen {
        Screen::Menu => draw_menu(out, &vp, world)?,
        Screen::Instructions => draw_instructions(out, &vp)?,
        Screen::Credits => draw_credits(out, &vp)?,
        Screen::Vignette { .. } => draw_vignette(out, &vp, world)?,
        Screen::GameOver { .. } => {
            draw_card(out, &vp, "GAME  OVER", Color::Red, world.session.score)?
        }
        Screen::Success { .. } => {
            draw_card(out, &vp, "VICTORY!", Color::Green, world.session.score)?
        }
        Screen::Playing | Screen::Flourish { .. } => draw_field(out, &vp, world)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.rows - 1))?;
    out.flush()?;
    Ok(())
}

fn print_centered<W: Write>(
    out: &mut W,
    vp: &Viewport,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (vp.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row.min(vp.rows - 1)))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Menu & static screens ─────────────────────────────────────────────────────

fn draw_menu<W: Write>(out: &mut W, vp: &Viewport, world: &World) -> std::io::Result<()> {
    let cy = vp.rows / 2;
    print_centered(out, vp, cy.saturating_sub(6), "★  HERO OF THE PAMPAS  ★", C_TITLE)?;

    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        let (marker, color) = if i == world.session.menu_index {
            ("▶ ", C_SELECTED)
        } else {
            ("  ", Color::White)
        };
        print_centered(out, vp, row, &format!("{}{}", marker, item), color)?;
    }

    print_centered(
        out,
        vp,
        cy + 4,
        "↑ ↓ : Select   ENTER : Confirm   Q : Quit",
        C_HINT,
    )?;
    Ok(())
}

fn draw_instructions<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let cy = vp.rows / 2;
    let lines = [
        "Arrow keys / WASD move the hero",
        "SPACE hurls a gourd at the invaders",
        "Touch the rising flag to claim the next town",
    ];
    for (i, line) in lines.iter().enumerate() {
        print_centered(out, vp, cy.saturating_sub(2) + i as u16, line, Color::White)?;
    }
    print_centered(out, vp, cy + 3, "ESC : Back", C_HINT)?;
    Ok(())
}

fn draw_credits<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let cy = vp.rows / 2;
    print_centered(out, vp, cy.saturating_sub(1), "A tale of the southern plains", Color::White)?;
    print_centered(out, vp, cy + 3, "ESC : Back", C_HINT)?;
    Ok(())
}

// ── Vignette & end cards ──────────────────────────────────────────────────────

fn draw_vignette<W: Write>(out: &mut W, vp: &Viewport, world: &World) -> std::io::Result<()> {
    let cy = vp.rows / 2;
    let title = format!(
        "Phase {} — {}",
        world.session.phase,
        phase_name(world.session.phase)
    );
    print_centered(out, vp, cy.saturating_sub(1), &title, C_PHASE)?;
    print_centered(
        out,
        vp,
        cy + 1,
        &format!("Lives: {}", world.session.lives),
        C_HUD_LIVES,
    )?;
    Ok(())
}

fn draw_card<W: Write>(
    out: &mut W,
    vp: &Viewport,
    title: &str,
    color: Color,
    score: u32,
) -> std::io::Result<()> {
    let cy = vp.rows / 2;
    print_centered(out, vp, cy.saturating_sub(1), title, color)?;
    print_centered(
        out,
        vp,
        cy + 1,
        &format!("Final Score: {}", score),
        C_HUD_SCORE,
    )?;
    Ok(())
}

// ── Play field ────────────────────────────────────────────────────────────────

fn draw_field<W: Write>(out: &mut W, vp: &Viewport, world: &World) -> std::io::Result<()> {
    draw_border(out, vp)?;
    draw_hud(out, vp, world)?;

    for enemy in &world.enemies {
        let (cx, cy) = vp.cell(enemy.rect.x, enemy.rect.y);
        let variant = (enemy.sprite % ENEMY_GLYPHS.len() as u8) as usize;
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(style::SetForegroundColor(ENEMY_COLORS[variant]))?;
        out.queue(Print(ENEMY_GLYPHS[variant]))?;
    }

    for shot in &world.projectiles {
        let (cx, cy) = vp.cell(shot.rect.x, shot.rect.y);
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(style::SetForegroundColor(C_PROJECTILE))?;
        out.queue(Print("»"))?;
    }

    if let Some(flag) = &world.flag {
        let (cx, cy) = vp.cell(flag.rect.x, flag.rect.y);
        let color = if flag.alpha < 128 { C_FLAG_FADED } else { C_FLAG };
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print("⚑"))?;
    }

    let (px, py) = vp.cell(world.player.rect.x, world.player.rect.y);
    out.queue(cursor::MoveTo(px, py))?;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(Print("}▶"))?;

    draw_controls_hint(out, vp)?;
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let w = vp.cols as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..vp.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.cols - 1, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, vp: &Viewport, world: &World) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", world.session.score)))?;

    // Phase name — centre
    if (1..=LAST_PHASE).contains(&world.session.phase) {
        let label = format!(
            "Phase {} — {}",
            world.session.phase,
            phase_name(world.session.phase)
        );
        print_centered(out, vp, 0, &label, C_PHASE)?;
    }

    // Lives — right
    let hearts: String = "♥".repeat(world.session.lives.min(10) as usize);
    let lives_text = format!("Lives: {}", hearts);
    let rx = vp
        .cols
        .saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, vp.rows - 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑ ↓ ← → / WASD : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

//! Terminal rendering.  All terminal output lives here.
//!
//! `TermSurface` is the game's canvas: sprites are rasterised into a buffer
//! of coloured cells, and `present` writes the buffer plus HUD and overlay to
//! the terminal in one flush.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use space_shooter::assets::{Sprite, CELL_H, CELL_W};
use space_shooter::collision::Rect;
use space_shooter::config::CHROME_ROWS;
use space_shooter::render::{Canvas, Hud};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_NORMAL: Color = Color::Green;
const C_HUD_HARD: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_DEBUG_BOX: Color = Color::Red;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::Reset,
};

pub struct TermSurface {
    cols: u16,
    /// Playfield rows; the terminal has `CHROME_ROWS` more.
    rows: u16,
    cells: Vec<Cell>,
    score: u32,
    game_over: bool,
    hard_mode: bool,
}

impl TermSurface {
    pub fn new(cols: u16, terminal_rows: u16, hard_mode: bool) -> Self {
        let rows = terminal_rows.saturating_sub(CHROME_ROWS);
        TermSurface {
            cols,
            rows,
            cells: vec![BLANK; usize::from(cols) * usize::from(rows)],
            score: 0,
            game_over: false,
            hard_mode,
        }
    }

    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= i32::from(self.cols) || row >= i32::from(self.rows) {
            return;
        }
        let index = row as usize * usize::from(self.cols) + col as usize;
        self.cells[index] = cell;
    }

    /// Write one complete frame.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        draw_hud(out, self)?;

        for (row, line) in self.cells.chunks(usize::from(self.cols).max(1)).enumerate() {
            out.queue(cursor::MoveTo(0, row as u16 + 1))?;
            draw_runs(out, line)?;
        }

        draw_controls_hint(out, self)?;
        if self.game_over {
            draw_game_over(out, self)?;
        }

        out.queue(style::ResetColor)?;
        out.flush()?;
        Ok(())
    }
}

fn to_cell(x: f32, y: f32) -> (i32, i32) {
    ((x / CELL_W).round() as i32, (y / CELL_H).round() as i32)
}

impl Canvas for TermSurface {
    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: f32, y: f32, rotation: f32) {
        let (col0, row0) = to_cell(x, y);
        for (r, line) in sprite.frame(rotation).iter().enumerate() {
            for (c, &glyph) in line.iter().enumerate() {
                if glyph != ' ' {
                    let cell = Cell {
                        glyph,
                        color: sprite.color,
                    };
                    self.put(col0 + c as i32, row0 + r as i32, cell);
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: &Rect) {
        let (left, top) = to_cell(rect.x, rect.y);
        let (right, bottom) = to_cell(rect.x + rect.width, rect.y + rect.height);
        let (right, bottom) = ((right - 1).max(left), (bottom - 1).max(top));
        let edge = |glyph| Cell {
            glyph,
            color: C_DEBUG_BOX,
        };
        for col in left..=right {
            self.put(col, top, edge('-'));
            self.put(col, bottom, edge('-'));
        }
        for row in top..=bottom {
            self.put(left, row, edge('|'));
            self.put(right, row, edge('|'));
        }
        for (col, row) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
            self.put(col, row, edge('+'));
        }
    }
}

impl Hud for TermSurface {
    fn show_score(&mut self, score: u32) {
        self.score = score;
    }

    fn show_game_over(&mut self, visible: bool) {
        self.game_over = visible;
    }
}

// ── Playfield rows ────────────────────────────────────────────────────────────

/// Print a row, switching colour only where it changes.
fn draw_runs<W: Write>(out: &mut W, line: &[Cell]) -> std::io::Result<()> {
    let mut run = String::new();
    let mut color = None;
    for cell in line {
        if color != Some(cell.color) {
            if let Some(c) = color {
                out.queue(style::SetForegroundColor(c))?;
                out.queue(Print(&run))?;
                run.clear();
            }
            color = Some(cell.color);
        }
        run.push(cell.glyph);
    }
    if let Some(c) = color {
        out.queue(style::SetForegroundColor(c))?;
        out.queue(Print(&run))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, surface: &TermSurface) -> std::io::Result<()> {
    let width = usize::from(surface.cols);
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(Print(" ".repeat(width)))?;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", surface.score)))?;

    let (mode, color) = if surface.hard_mode {
        ("[ HARD ]", C_HUD_HARD)
    } else {
        ("[ NORMAL ]", C_HUD_NORMAL)
    };
    let mx = (surface.cols / 2).saturating_sub(mode.len() as u16 / 2);
    out.queue(cursor::MoveTo(mx, 0))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(mode))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, surface: &TermSurface) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, surface.rows + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← ↑ → ↓ : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, surface: &TermSurface) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", surface.score);
    let lines: [(&str, Color); 3] = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let hint = "R - Play Again  Q - Quit";

    let cx = surface.cols / 2;
    let total_rows = lines.len() as u16 + 2;
    let start_row = (surface.rows / 2 + 1).saturating_sub(total_rows / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row + 1))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}

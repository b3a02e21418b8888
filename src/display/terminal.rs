/// A `Canvas` backed by a grid of terminal cells.
///
/// Drawing goes into an in-memory cell buffer; `flush` writes the whole
/// grid out with crossterm in one go.  Each cell covers `cell_w` x `cell_h`
/// canvas pixels.

use std::io::Write;

use crossterm::{
    cursor,
    event::{
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    style::{self, Color, Print},
    QueueableCommand,
};

use crate::engine::{Canvas, TextStyle};
use crate::entities::{Sprite, SpriteTable};
use crate::session::{InputEvent, KEY_DOWN, KEY_ENTER, KEY_ESCAPE, KEY_P, KEY_SPACE, KEY_UP};

const C_TEXT: Color = Color::White;
const C_SHADOW_BG: Color = Color::Black;
const C_DEFAULT: Color = Color::Grey;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Option<Color>,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: C_DEFAULT,
    bg: None,
};

pub struct TerminalCanvas {
    width: i32,
    height: i32,
    cell_w: i32,
    cell_h: i32,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    offset: (f64, f64),
    saved: Vec<(f64, f64)>,
    sprites: SpriteTable,
}

impl TerminalCanvas {
    pub fn new(width: i32, height: i32, cell_w: i32, cell_h: i32, sprites: SpriteTable) -> Self {
        let cell_w = cell_w.max(1);
        let cell_h = cell_h.max(1);
        let cols = (width / cell_w).max(1) as usize;
        let rows = (height / cell_h).max(1) as usize;
        TerminalCanvas {
            width,
            height,
            cell_w,
            cell_h,
            cols,
            rows,
            cells: vec![BLANK; cols * rows],
            offset: (0.0, 0.0),
            saved: Vec::new(),
            sprites,
        }
    }

    /// Grid size in cells.
    pub fn grid(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    fn to_cell(&self, x: f64, y: f64) -> (i64, i64) {
        let px = x + self.offset.0;
        let py = y + self.offset.1;
        (
            (px / self.cell_w as f64).floor() as i64,
            (py / self.cell_h as f64).floor() as i64,
        )
    }

    fn put(&mut self, col: i64, row: i64, cell: Cell) {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return;
        }
        let index = row as usize * self.cols + col as usize;
        self.cells[index] = cell;
    }

    fn fill(&mut self, x: f64, y: f64, w: f64, h: f64, cell: Cell) {
        let (c0, r0) = self.to_cell(x, y);
        let (c1, r1) = self.to_cell(x + w - 1.0, y + h - 1.0);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.put(col, row, cell);
            }
        }
    }

    fn look(&self, sprite: &Sprite) -> (char, bool, Color) {
        match self.sprites.entry(&sprite.name) {
            Some(entry) => (
                entry.glyph,
                entry.fill,
                entry.color.as_deref().map_or(C_DEFAULT, parse_color),
            ),
            None => ('?', false, C_DEFAULT),
        }
    }

    /// Write the grid to the terminal.
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row as u16))?;
            let mut fg = None;
            let mut bg: Option<Option<Color>> = None;
            for cell in &self.cells[row * self.cols..(row + 1) * self.cols] {
                if fg != Some(cell.fg) {
                    out.queue(style::SetForegroundColor(cell.fg))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    out.queue(style::SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
                    bg = Some(cell.bg);
                }
                out.queue(Print(cell.ch))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()
    }
}

impl Canvas for TerminalCanvas {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.cells.fill(BLANK);
        self.offset = (0.0, 0.0);
        self.saved.clear();
    }

    fn save(&mut self) {
        self.saved.push(self.offset);
    }

    fn restore(&mut self) {
        if let Some(offset) = self.saved.pop() {
            self.offset = offset;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset.0 += dx;
        self.offset.1 += dy;
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: f64, y: f64) {
        let (ch, fill, fg) = self.look(sprite);
        let cell = Cell { ch, fg, bg: None };
        if fill {
            self.fill(x, y, sprite.width(), sprite.height(), cell);
        } else {
            // Stand the glyph on the sprite's bottom edge, centred.
            let (col, row) = self.to_cell(
                x + sprite.width() / 2.0,
                y + (sprite.height() - 1.0).max(0.0),
            );
            self.put(col, row, cell);
        }
    }

    fn draw_nine_slice(&mut self, sprite: &Sprite, x: f64, y: f64, w: f64, h: f64) {
        let (ch, _, fg) = self.look(sprite);
        self.fill(x, y, w, h, Cell { ch, fg, bg: None });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        let bg = match style {
            TextStyle::Plain => None,
            TextStyle::Shadow => Some(C_SHADOW_BG),
        };
        let (col, row) = self.to_cell(x, y);
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i64, row, Cell { ch, fg: C_TEXT, bg });
        }
    }
}

/// Colour names used by the sprite table.
pub fn parse_color(name: &str) -> Color {
    match name {
        "black" => Color::Black,
        "white" => Color::White,
        "grey" => Color::Grey,
        "dark_grey" => Color::DarkGrey,
        "red" => Color::Red,
        "dark_red" => Color::DarkRed,
        "green" => Color::Green,
        "dark_green" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "dark_yellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "dark_blue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "dark_magenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "dark_cyan" => Color::DarkCyan,
        _ => C_DEFAULT,
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Code sent for keys with no numeric code of their own.
pub const KEY_UNIDENTIFIED: u16 = 0;

/// What the host loop should do with one terminal event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostInput {
    Event(InputEvent),
    Quit,
    Ignore,
}

/// Numeric code for a key, using the familiar DOM key codes where one exists.
pub fn key_code(code: KeyCode) -> u16 {
    match code {
        KeyCode::Backspace => 8,
        KeyCode::Tab | KeyCode::BackTab => 9,
        KeyCode::Enter => KEY_ENTER,
        KeyCode::Esc => KEY_ESCAPE,
        KeyCode::PageUp => 33,
        KeyCode::PageDown => 34,
        KeyCode::End => 35,
        KeyCode::Home => 36,
        KeyCode::Left => 37,
        KeyCode::Up => KEY_UP,
        KeyCode::Right => 39,
        KeyCode::Down => KEY_DOWN,
        KeyCode::Insert => 45,
        KeyCode::Delete => 46,
        KeyCode::F(n) => 111 + n as u16,
        KeyCode::Char(' ') => KEY_SPACE,
        KeyCode::Char('p') | KeyCode::Char('P') => KEY_P,
        KeyCode::Char(c) if c.is_ascii() => c.to_ascii_uppercase() as u16,
        _ => KEY_UNIDENTIFIED,
    }
}

/// Map a crossterm event onto the session's raw input model.  Every key
/// press becomes a key event except Ctrl-C, which quits.
pub fn translate(ev: Event) -> HostInput {
    match ev {
        Event::Key(KeyEvent { code, kind, modifiers, .. }) => {
            if kind != KeyEventKind::Press {
                return HostInput::Ignore;
            }
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return HostInput::Quit;
            }
            HostInput::Event(InputEvent::Key(key_code(code)))
        }
        Event::Mouse(MouseEvent { kind, column, row, .. }) => match kind {
            // Aim at the middle of the cell under the pointer.
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                HostInput::Event(InputEvent::PointerMove {
                    x: column as f64 + 0.5,
                    y: row as f64 + 0.5,
                })
            }
            MouseEventKind::Up(MouseButton::Left) => HostInput::Event(InputEvent::PointerUp),
            _ => HostInput::Ignore,
        },
        _ => HostInput::Ignore,
    }
}

//! Applies parser actions to a [`ScreenBuffer`], tracks modes and tab stops,
//! and renders the live or scrolled-back view as styled output (spec.md §4.3).

use std::collections::BTreeSet;

use ratatui::style::{Color as RatColor, Modifier, Style};
use ratatui::text::{Line, Span};

use super::action::Action;
use super::buffer::ScreenBuffer;
use super::cell::{Attrs, Cell, Color};
use super::parser::Parser;

const DEFAULT_WHEEL_STEP: usize = 3;
const TAB_STOP_WIDTH: usize = 8;

pub struct Emulator {
    parser: Parser,
    buffer: ScreenBuffer,
    tab_stops: BTreeSet<usize>,
    title: Option<String>,
    scroll_offset: usize,
}

impl Emulator {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            parser: Parser::new(),
            buffer: ScreenBuffer::new(width, height),
            tab_stops: default_tab_stops(width),
            title: None,
            scroll_offset: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn buffer(&self) -> &ScreenBuffer {
        &self.buffer
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.buffer.resize(width, height);
        self.tab_stops = default_tab_stops(self.buffer.width());
    }

    /// Cap the scrollback at `max` rows (spec.md §3 `MaxScrollback`,
    /// SPEC_FULL.md §A.3 `settings.history_buffer`). Evicts from the front
    /// immediately if the buffer already holds more than `max`.
    pub fn set_max_scrollback(&mut self, max: usize) {
        self.buffer.set_max_scrollback(max);
    }

    pub fn write(&mut self, data: &[u8]) {
        let actions = self.parser.parse(data);
        for action in actions {
            self.apply(action);
        }
        self.scroll_offset = 0;
    }

    pub fn wheel_up(&mut self, lines: usize) {
        let lines = if lines == 0 { DEFAULT_WHEEL_STEP } else { lines };
        self.scroll_offset = (self.scroll_offset + lines).min(self.buffer.scrollback_len());
    }

    pub fn wheel_down(&mut self, lines: usize) {
        let lines = if lines == 0 { DEFAULT_WHEEL_STEP } else { lines };
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Text(text) => {
                for c in text.chars() {
                    self.buffer.put_rune(c);
                }
            }
            Action::Bell => {}
            Action::Backspace => self.buffer.move_cursor_relative(0, -1),
            Action::Tab => self.advance_to_tab_stop(),
            Action::LineFeed => self.line_feed(),
            Action::CarriageReturn => self.buffer.move_cursor_column(1),

            Action::CursorUp(n) => self.buffer.move_cursor_relative(-(n as i64), 0),
            Action::CursorDown(n) => self.buffer.move_cursor_relative(n as i64, 0),
            Action::CursorForward(n) => self.buffer.move_cursor_relative(0, n as i64),
            Action::CursorBackward(n) => self.buffer.move_cursor_relative(0, -(n as i64)),
            Action::CursorPosition { row, col } => self.buffer.move_cursor(row as i64, col as i64),
            Action::CursorNextLine(n) => {
                self.buffer.move_cursor_relative(n as i64, 0);
                self.buffer.move_cursor_column(1);
            }
            Action::CursorPrevLine(n) => {
                self.buffer.move_cursor_relative(-(n as i64), 0);
                self.buffer.move_cursor_column(1);
            }
            Action::CursorColumn(n) => self.buffer.move_cursor_column(n as i64),

            Action::EraseDisplay(mode) => self.buffer.erase_display(mode),
            Action::EraseLine(mode) => self.buffer.erase_line(mode),

            Action::ScrollUp(n) => self.buffer.scroll_up(n as usize),
            Action::ScrollDown(n) => self.buffer.scroll_down(n as usize),

            Action::Sgr(params) => self.buffer.set_sgr(&params),

            Action::SaveCursor => self.buffer.save_cursor(),
            Action::RestoreCursor => self.buffer.restore_cursor(),

            Action::SetMode(codes) => self.set_modes(&codes, true),
            Action::ResetMode(codes) => self.set_modes(&codes, false),

            Action::InsertLines(n) => self.buffer.insert_lines(n as usize),
            Action::DeleteLines(n) => self.buffer.delete_lines(n as usize),
            Action::InsertChars(n) => self.buffer.insert_chars(n as usize),
            Action::DeleteChars(n) => self.buffer.delete_chars(n as usize),

            Action::SetTitle(title) => self.title = Some(title),
        }
    }

    fn line_feed(&mut self) {
        let (_, row) = self.buffer.cursor();
        let (_, bottom) = self.buffer.scroll_region();
        if row >= bottom {
            self.buffer.scroll_up(1);
        } else {
            self.buffer.move_cursor_relative(1, 0);
        }
    }

    fn advance_to_tab_stop(&mut self) {
        let (col, _) = self.buffer.cursor();
        let next = self.tab_stops.iter().find(|&&stop| stop > col).copied().unwrap_or(self.buffer.width() - 1);
        let delta = next as i64 - col as i64;
        self.buffer.move_cursor_relative(0, delta);
    }

    fn set_modes(&mut self, codes: &[i64], enable: bool) {
        for &code in codes {
            match code {
                25 => self.buffer.cursor_visible = enable,
                7 => self.buffer.auto_wrap = enable,
                6 => self.buffer.origin_mode = enable,
                _ => {}
            }
        }
    }

    pub fn render(&self) -> Vec<Line<'static>> {
        let height = self.buffer.height();
        let scroll_lines = self.scroll_offset.min(height);

        let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(height);

        if scroll_lines > 0 {
            let total_scrollback = self.buffer.scrollback_len();
            let start = total_scrollback.saturating_sub(scroll_lines);
            for i in start..total_scrollback {
                if let Some(row) = self.buffer.scrollback_row(i) {
                    rows.push(row.to_vec());
                }
            }
        }

        let live_needed = height - scroll_lines;
        for y in 0..live_needed.min(self.buffer.height()) {
            rows.push(self.buffer.row(y).to_vec());
        }

        let cursor = if self.scroll_offset == 0 && self.buffer.cursor_visible { Some(self.buffer.cursor()) } else { None };

        rows.into_iter()
            .take(height)
            .enumerate()
            .map(|(y, row)| render_row(&row, cursor.filter(|&(_, cy)| cy == y)))
            .collect()
    }
}

fn default_tab_stops(width: usize) -> BTreeSet<usize> {
    (TAB_STOP_WIDTH..width).step_by(TAB_STOP_WIDTH).collect()
}

fn render_row(row: &[Cell], cursor_col: Option<(usize, usize)>) -> Line<'static> {
    let cursor_x = cursor_col.map(|(x, _)| x);
    let spans: Vec<Span<'static>> = row
        .iter()
        .enumerate()
        .map(|(x, cell)| {
            let is_cursor = cursor_x == Some(x);
            cell_span(cell, is_cursor)
        })
        .collect();
    Line::from(spans)
}

fn cell_span(cell: &Cell, is_cursor: bool) -> Span<'static> {
    let (mut fg, mut bg) = (cell.fg, cell.bg);
    if cell.attrs.reverse || is_cursor {
        std::mem::swap(&mut fg, &mut bg);
    }

    let has_style = is_cursor || fg != Color::Default || bg != Color::Default || has_visible_attrs(&cell.attrs);

    if !has_style {
        return Span::raw(cell.glyph.to_string());
    }

    let mut style = Style::default();
    if fg != Color::Default {
        style = style.fg(to_ratatui_color(fg));
    }
    if bg != Color::Default {
        style = style.bg(to_ratatui_color(bg));
    }
    if cell.attrs.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if cell.attrs.dim {
        style = style.add_modifier(Modifier::DIM);
    }
    if cell.attrs.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if cell.attrs.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if cell.attrs.blink {
        style = style.add_modifier(Modifier::SLOW_BLINK);
    }
    if cell.attrs.hidden {
        style = style.add_modifier(Modifier::HIDDEN);
    }
    if cell.attrs.strike {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }

    Span::styled(cell.glyph.to_string(), style)
}

fn has_visible_attrs(attrs: &Attrs) -> bool {
    attrs.bold || attrs.dim || attrs.italic || attrs.underline || attrs.blink || attrs.hidden || attrs.strike
}

fn to_ratatui_color(color: Color) -> RatColor {
    match color {
        Color::Default => RatColor::Reset,
        Color::Indexed(idx) => match idx {
            0 => RatColor::Black,
            1 => RatColor::Red,
            2 => RatColor::Green,
            3 => RatColor::Yellow,
            4 => RatColor::Blue,
            5 => RatColor::Magenta,
            6 => RatColor::Cyan,
            7 => RatColor::Gray,
            8 => RatColor::DarkGray,
            9 => RatColor::LightRed,
            10 => RatColor::LightGreen,
            11 => RatColor::LightYellow,
            12 => RatColor::LightBlue,
            13 => RatColor::LightMagenta,
            14 => RatColor::LightCyan,
            15 => RatColor::White,
            _ => RatColor::Indexed(idx),
        },
        Color::Rgb(r, g, b) => RatColor::Rgb(r, g, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_scenario() {
        let mut emu = Emulator::new(80, 24);
        emu.write(b"hello");
        assert_eq!(emu.buffer().cursor(), (5, 0));
    }

    #[test]
    fn wrap_scenario() {
        let mut emu = Emulator::new(5, 2);
        emu.write(b"abcdefg");
        assert_eq!(emu.buffer().get_line(0), "abcde");
        assert_eq!(emu.buffer().get_line(1), "fg   ");
        assert_eq!(emu.buffer().cursor(), (2, 1));
    }

    #[test]
    fn color_scenario() {
        let mut emu = Emulator::new(10, 1);
        emu.write(b"\x1b[31mA\x1b[0mB");
        let row = emu.buffer().row(0);
        assert_eq!(row[0].glyph, 'A');
        assert_eq!(row[0].fg, Color::Indexed(1));
        assert_eq!(row[1].glyph, 'B');
        assert_eq!(row[1].fg, Color::Default);
    }

    #[test]
    fn render_produces_exactly_height_rows() {
        let mut emu = Emulator::new(20, 6);
        emu.write(b"line one\r\nline two");
        assert_eq!(emu.render().len(), 6);
    }

    #[test]
    fn write_snaps_scroll_offset_to_live_region() {
        let mut emu = Emulator::new(5, 2);
        for i in 0..5 {
            emu.write(format!("row{}\r\n", i).as_bytes());
        }
        emu.wheel_up(3);
        assert!(emu.scroll_offset() > 0);
        emu.write(b"x");
        assert_eq!(emu.scroll_offset(), 0);
    }

    #[test]
    fn tab_advances_to_next_stop_or_last_column() {
        let mut emu = Emulator::new(20, 1);
        emu.write(b"\t");
        assert_eq!(emu.buffer().cursor(), (8, 0));
        emu.write(b"\t");
        assert_eq!(emu.buffer().cursor(), (16, 0));
        emu.write(b"\t");
        assert_eq!(emu.buffer().cursor(), (19, 0));
    }

    #[test]
    fn mode_toggle_hides_cursor() {
        let mut emu = Emulator::new(10, 1);
        emu.write(b"\x1b[?25l");
        assert!(!emu.buffer().cursor_visible);
        emu.write(b"\x1b[?25h");
        assert!(emu.buffer().cursor_visible);
    }
}

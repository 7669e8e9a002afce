//! The 2-D cell grid: cursor, scrollback, scroll region, and SGR state
//! (spec.md §4.2). All operations mutate in place and are O(W+H) or O(n) in
//! the number of affected rows.

use std::collections::VecDeque;

use super::cell::{Attrs, Cell, Color};

const DEFAULT_MAX_SCROLLBACK: usize = 1000;

#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    width: usize,
    height: usize,
    lines: Vec<Vec<Cell>>,
    scrollback: VecDeque<Vec<Cell>>,
    max_scrollback: usize,
    cursor_x: usize,
    cursor_y: usize,
    saved_x: usize,
    saved_y: usize,
    saved_attrs: (Color, Color, Attrs),
    fg: Color,
    bg: Color,
    attrs: Attrs,
    scroll_top: usize,
    scroll_bottom: usize,
    pub cursor_visible: bool,
    pub auto_wrap: bool,
    pub origin_mode: bool,
}

impl ScreenBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            lines: vec![vec![Cell::blank(); width]; height],
            scrollback: VecDeque::new(),
            max_scrollback: DEFAULT_MAX_SCROLLBACK,
            cursor_x: 0,
            cursor_y: 0,
            saved_x: 0,
            saved_y: 0,
            saved_attrs: (Color::Default, Color::Default, Attrs::default()),
            fg: Color::Default,
            bg: Color::Default,
            attrs: Attrs::default(),
            scroll_top: 0,
            scroll_bottom: height - 1,
            cursor_visible: true,
            auto_wrap: true,
            origin_mode: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn scroll_region(&self) -> (usize, usize) {
        (self.scroll_top, self.scroll_bottom)
    }

    pub fn scrollback_len(&self) -> usize {
        self.scrollback.len()
    }

    pub fn set_max_scrollback(&mut self, max: usize) {
        self.max_scrollback = max;
        while self.scrollback.len() > self.max_scrollback {
            self.scrollback.pop_front();
        }
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        &self.lines[y]
    }

    pub fn scrollback_row(&self, index_from_top: usize) -> Option<&[Cell]> {
        self.scrollback.get(index_from_top).map(|row| row.as_slice())
    }

    pub fn current_attrs(&self) -> (Color, Color, Attrs) {
        (self.fg, self.bg, self.attrs)
    }

    fn blank_cell(&self) -> Cell {
        Cell::blank_with(self.fg, self.bg, self.attrs)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return;
        }

        let mut new_lines = vec![vec![Cell::blank(); width]; height];
        for (y, row) in new_lines.iter_mut().enumerate().take(height) {
            if let Some(old_row) = self.lines.get(y) {
                let copy_len = old_row.len().min(width);
                row[..copy_len].copy_from_slice(&old_row[..copy_len]);
            }
        }

        self.lines = new_lines;
        self.width = width;
        self.height = height;
        self.scroll_bottom = height - 1;
        if self.scroll_top >= height {
            self.scroll_top = 0;
        }
        self.cursor_x = self.cursor_x.min(width - 1);
        self.cursor_y = self.cursor_y.min(height - 1);
    }

    pub fn put_rune(&mut self, r: char) {
        if self.cursor_y >= self.height {
            return;
        }

        let cell = Cell { glyph: r, fg: self.fg, bg: self.bg, attrs: self.attrs };
        self.lines[self.cursor_y][self.cursor_x] = cell;

        self.cursor_x += 1;
        if self.cursor_x >= self.width {
            if self.auto_wrap {
                self.cursor_x = 0;
                self.cursor_y += 1;
                if self.cursor_y > self.scroll_bottom {
                    self.scroll_up(1);
                    self.cursor_y = self.scroll_bottom;
                }
            } else {
                self.cursor_x = self.width - 1;
            }
        }
    }

    /// `row`/`col` are 1-indexed, per spec.md §4.2.
    pub fn move_cursor(&mut self, row: i64, col: i64) {
        let mut row = row - 1;
        let col = col - 1;

        if self.origin_mode {
            row += self.scroll_top as i64;
        }

        self.cursor_y = row.clamp(0, self.height as i64 - 1) as usize;
        self.cursor_x = col.clamp(0, self.width as i64 - 1) as usize;
    }

    pub fn move_cursor_relative(&mut self, dy: i64, dx: i64) {
        let y = self.cursor_y as i64 + dy;
        let x = self.cursor_x as i64 + dx;
        self.cursor_y = y.clamp(0, self.height as i64 - 1) as usize;
        self.cursor_x = x.clamp(0, self.width as i64 - 1) as usize;
    }

    /// Set only the column (1-indexed), leaving the row untouched. Unlike
    /// `move_cursor`, this never re-applies the origin-mode `scroll_top`
    /// bias — callers that already hold an absolute row (carriage return,
    /// CNL/CPL, column positioning) use this instead of re-deriving the row
    /// through `move_cursor`, which would double-bias it under origin mode.
    pub fn move_cursor_column(&mut self, col: i64) {
        self.cursor_x = (col - 1).clamp(0, self.width as i64 - 1) as usize;
    }

    pub fn erase_display(&mut self, mode: u8) {
        let blank = self.blank_cell();
        match mode {
            0 => {
                for x in self.cursor_x..self.width {
                    self.lines[self.cursor_y][x] = blank;
                }
                for y in (self.cursor_y + 1)..self.height {
                    self.lines[y].fill(blank);
                }
            }
            1 => {
                for y in 0..self.cursor_y {
                    self.lines[y].fill(blank);
                }
                for x in 0..=self.cursor_x.min(self.width - 1) {
                    self.lines[self.cursor_y][x] = blank;
                }
            }
            2 | 3 => {
                for row in &mut self.lines {
                    row.fill(blank);
                }
                if mode == 3 {
                    self.scrollback.clear();
                }
            }
            _ => {}
        }
    }

    pub fn erase_line(&mut self, mode: u8) {
        if self.cursor_y >= self.height {
            return;
        }
        let blank = self.blank_cell();
        let row = &mut self.lines[self.cursor_y];
        match mode {
            0 => row[self.cursor_x..].fill(blank),
            1 => row[..=self.cursor_x.min(self.width - 1)].fill(blank),
            2 => row.fill(blank),
            _ => {}
        }
    }

    pub fn scroll_up(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let blank = self.blank_cell();

        for _ in 0..n {
            if self.scroll_top >= self.lines.len() {
                break;
            }
            let evicted = self.lines[self.scroll_top].clone();
            self.scrollback.push_back(evicted);
            if self.scrollback.len() > self.max_scrollback {
                self.scrollback.pop_front();
            }

            for y in self.scroll_top..self.scroll_bottom {
                self.lines.swap(y, y + 1);
            }
            self.lines[self.scroll_bottom].fill(blank);
        }
    }

    pub fn scroll_down(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let blank = self.blank_cell();

        for _ in 0..n {
            let mut y = self.scroll_bottom;
            while y > self.scroll_top {
                self.lines.swap(y, y - 1);
                y -= 1;
            }
            self.lines[self.scroll_top].fill(blank);
        }
    }

    pub fn insert_lines(&mut self, n: usize) {
        if self.cursor_y < self.scroll_top || self.cursor_y > self.scroll_bottom {
            return;
        }
        let blank = self.blank_cell();
        let n = n.min(self.scroll_bottom - self.cursor_y + 1);

        let mut y = self.scroll_bottom;
        while y >= self.cursor_y + n {
            self.lines.swap(y, y - n);
            y -= 1;
        }
        for y in self.cursor_y..self.cursor_y + n {
            self.lines[y].fill(blank);
        }
    }

    pub fn delete_lines(&mut self, n: usize) {
        if self.cursor_y < self.scroll_top || self.cursor_y > self.scroll_bottom {
            return;
        }
        let blank = self.blank_cell();
        let region = self.scroll_bottom - self.cursor_y + 1;
        let n = n.min(region);
        let shift = region - n;

        for y in self.cursor_y..self.cursor_y + shift {
            self.lines.swap(y, y + n);
        }
        for y in (self.cursor_y + shift)..=self.scroll_bottom {
            self.lines[y].fill(blank);
        }
    }

    pub fn insert_chars(&mut self, n: usize) {
        if self.cursor_y >= self.height {
            return;
        }
        let blank = self.blank_cell();
        let n = n.min(self.width - self.cursor_x);
        let row = &mut self.lines[self.cursor_y];

        let mut x = self.width - 1;
        while x >= self.cursor_x + n {
            row[x] = row[x - n];
            if x == self.cursor_x + n {
                break;
            }
            x -= 1;
        }
        for cell in row.iter_mut().skip(self.cursor_x).take(n) {
            *cell = blank;
        }
    }

    pub fn delete_chars(&mut self, n: usize) {
        if self.cursor_y >= self.height {
            return;
        }
        let blank = self.blank_cell();
        let n = n.min(self.width - self.cursor_x);
        let row = &mut self.lines[self.cursor_y];

        for x in self.cursor_x..self.width - n {
            row[x] = row[x + n];
        }
        for cell in row.iter_mut().skip(self.width - n) {
            *cell = blank;
        }
    }

    pub fn save_cursor(&mut self) {
        self.saved_x = self.cursor_x;
        self.saved_y = self.cursor_y;
        self.saved_attrs = (self.fg, self.bg, self.attrs);
    }

    pub fn restore_cursor(&mut self) {
        self.cursor_x = self.saved_x;
        self.cursor_y = self.saved_y;
        (self.fg, self.bg, self.attrs) = self.saved_attrs;
    }

    pub fn set_sgr(&mut self, params: &[i64]) {
        let mut i = 0;
        while i < params.len() {
            let param = params[i];
            match param {
                0 => {
                    self.fg = Color::Default;
                    self.bg = Color::Default;
                    self.attrs = Attrs::default();
                }
                1 => self.attrs.bold = true,
                2 => self.attrs.dim = true,
                3 => self.attrs.italic = true,
                4 => self.attrs.underline = true,
                5 => self.attrs.blink = true,
                7 => self.attrs.reverse = true,
                8 => self.attrs.hidden = true,
                9 => self.attrs.strike = true,
                22 => {
                    self.attrs.bold = false;
                    self.attrs.dim = false;
                }
                23 => self.attrs.italic = false,
                24 => self.attrs.underline = false,
                25 => self.attrs.blink = false,
                27 => self.attrs.reverse = false,
                28 => self.attrs.hidden = false,
                29 => self.attrs.strike = false,
                30..=37 => self.fg = Color::Indexed((param - 30) as u8),
                39 => self.fg = Color::Default,
                40..=47 => self.bg = Color::Indexed((param - 40) as u8),
                49 => self.bg = Color::Default,
                90..=97 => self.fg = Color::Indexed((param - 90 + 8) as u8),
                100..=107 => self.bg = Color::Indexed((param - 100 + 8) as u8),
                38 | 48 => {
                    let target_fg = param == 38;
                    match params.get(i + 1) {
                        Some(5) => {
                            if let Some(&idx) = params.get(i + 2) {
                                let color = Color::Indexed(idx.clamp(0, 255) as u8);
                                if target_fg {
                                    self.fg = color;
                                } else {
                                    self.bg = color;
                                }
                            }
                            i += 2;
                        }
                        Some(2) => {
                            if let (Some(&r), Some(&g), Some(&b)) = (params.get(i + 2), params.get(i + 3), params.get(i + 4)) {
                                let color = Color::Rgb(r.clamp(0, 255) as u8, g.clamp(0, 255) as u8, b.clamp(0, 255) as u8);
                                if target_fg {
                                    self.fg = color;
                                } else {
                                    self.bg = color;
                                }
                            }
                            i += 4;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    pub fn get_line(&self, y: usize) -> String {
        self.lines.get(y).map(|row| row.iter().map(|c| c.glyph).collect()).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        let blank = self.blank_cell();
        for row in &mut self.lines {
            row.fill(blank);
        }
        self.cursor_x = 0;
        self.cursor_y = 0;
    }

    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        if top < bottom && bottom < self.height {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_places_glyphs_and_advances_cursor() {
        let mut buf = ScreenBuffer::new(80, 24);
        for c in "hello".chars() {
            buf.put_rune(c);
        }
        assert_eq!(buf.get_line(0)[..5].to_string(), "hello");
        assert_eq!(buf.cursor(), (5, 0));
    }

    #[test]
    fn wrap_carries_overflow_to_next_row() {
        let mut buf = ScreenBuffer::new(5, 2);
        for c in "abcdefg".chars() {
            buf.put_rune(c);
        }
        assert_eq!(buf.get_line(0), "abcde");
        assert_eq!(buf.get_line(1), "fg   ");
        assert_eq!(buf.cursor(), (2, 1));
    }

    #[test]
    fn erase_line_modes_match_spec_scenario() {
        let mut make = || {
            let mut buf = ScreenBuffer::new(5, 1);
            for c in "XXXXX".chars() {
                buf.put_rune(c);
            }
            buf.move_cursor(1, 3);
            buf
        };

        let mut b0 = make();
        b0.erase_line(0);
        assert_eq!(b0.get_line(0), "XX   ");

        let mut b1 = make();
        b1.erase_line(1);
        assert_eq!(b1.get_line(0), "   XX");

        let mut b2 = make();
        b2.erase_line(2);
        assert_eq!(b2.get_line(0), "     ");
    }

    #[test]
    fn scrollback_keeps_evicted_rows() {
        // Drive it the way the real line-feed action would: write a row,
        // linefeed (scroll_up when past scroll_bottom), repeat.
        let mut buf = ScreenBuffer::new(3, 2);
        let rows = ["AAA", "BBB", "CCC"];
        for (i, row) in rows.iter().enumerate() {
            buf.move_cursor(1, 1);
            for c in row.chars() {
                buf.put_rune(c);
            }
            if i < rows.len() - 1 {
                buf.move_cursor_relative(1, 0);
                if buf.cursor().1 == buf.height() - 1 && i > 0 {
                    buf.scroll_up(1);
                }
            }
        }
        assert_eq!(buf.scrollback_len(), 1);
        assert_eq!(buf.scrollback_row(0).map(|row| row.iter().map(|c| c.glyph).collect::<String>()), Some("AAA".to_string()));
    }

    #[test]
    fn sgr_reset_restores_defaults() {
        let mut buf = ScreenBuffer::new(10, 1);
        buf.set_sgr(&[31, 1]);
        buf.set_sgr(&[0]);
        let (fg, bg, attrs) = buf.current_attrs();
        assert_eq!(fg, Color::Default);
        assert_eq!(bg, Color::Default);
        assert_eq!(attrs, Attrs::default());
    }

    #[test]
    fn save_restore_cursor_round_trips() {
        let mut buf = ScreenBuffer::new(10, 10);
        buf.move_cursor(3, 4);
        buf.set_sgr(&[31]);
        buf.save_cursor();
        buf.move_cursor(9, 9);
        buf.set_sgr(&[0]);
        buf.restore_cursor();
        assert_eq!(buf.cursor(), (3, 2));
        assert_eq!(buf.current_attrs().0, Color::Indexed(1));
    }

    #[test]
    fn move_cursor_column_leaves_row_untouched_under_origin_mode() {
        let mut buf = ScreenBuffer::new(10, 10);
        buf.origin_mode = true;
        buf.set_scroll_region(2, 8);
        buf.move_cursor_relative(3, 0);
        let row_before = buf.cursor().1;
        buf.move_cursor_column(5);
        assert_eq!(buf.cursor(), (4, row_before));
    }

    #[test]
    fn delete_lines_with_count_past_region_end_clears_without_panicking() {
        let mut buf = ScreenBuffer::new(5, 24);
        buf.move_cursor(1, 1);
        buf.delete_lines(99);
        for y in 0..24 {
            assert_eq!(buf.get_line(y), "     ");
        }
    }

    #[test]
    fn resize_is_idempotent() {
        let mut buf = ScreenBuffer::new(10, 10);
        buf.resize(20, 5);
        let after_first = buf.get_line(0);
        buf.resize(20, 5);
        assert_eq!(buf.get_line(0), after_first);
    }
}

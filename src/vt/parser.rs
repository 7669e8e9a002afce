//! Byte-oriented VT/ANSI parser: consumes bytes one at a time, emits
//! [`Action`]s. Partial sequences are retained in parser state across calls so
//! feeding a byte stream in any chunking yields the same final actions.

use super::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    Csi,
    CsiParam,
    CsiIntermediate,
    Osc,
}

#[derive(Debug)]
pub struct Parser {
    state: State,
    params: Vec<i64>,
    num_buffer: Vec<u8>,
    intermediate: Vec<u8>,
    osc_buffer: Vec<u8>,
    osc_esc_pending: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            params: Vec::with_capacity(16),
            num_buffer: Vec::new(),
            intermediate: Vec::new(),
            osc_buffer: Vec::new(),
            osc_esc_pending: false,
        }
    }

    pub fn parse(&mut self, data: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut text_start: Option<usize> = None;

        macro_rules! flush_text {
            ($i:expr) => {
                if let Some(start) = text_start.take() {
                    actions.push(Action::Text(String::from_utf8_lossy(&data[start..$i]).into_owned()));
                }
            };
        }

        let mut i = 0;
        while i < data.len() {
            let b = data[i];

            match self.state {
                State::Ground => match b {
                    0x07 => {
                        flush_text!(i);
                        actions.push(Action::Bell);
                    }
                    0x08 => {
                        flush_text!(i);
                        actions.push(Action::Backspace);
                    }
                    0x09 => {
                        flush_text!(i);
                        actions.push(Action::Tab);
                    }
                    0x0A | 0x0B | 0x0C => {
                        flush_text!(i);
                        actions.push(Action::LineFeed);
                    }
                    0x0D => {
                        flush_text!(i);
                        actions.push(Action::CarriageReturn);
                    }
                    0x1B => {
                        flush_text!(i);
                        self.enter_escape();
                    }
                    _ => {
                        if text_start.is_none() {
                            text_start = Some(i);
                        }
                    }
                },

                State::Escape => {
                    self.state = State::Ground;
                    match b {
                        b'[' => self.state = State::Csi,
                        b']' => self.state = State::Osc,
                        b'7' => actions.push(Action::SaveCursor),
                        b'8' => actions.push(Action::RestoreCursor),
                        b'M' => actions.push(Action::ScrollDown(1)),
                        b'D' => actions.push(Action::ScrollUp(1)),
                        _ => {}
                    }
                }

                State::Csi => {
                    if b.is_ascii_digit() {
                        self.num_buffer.push(b);
                        self.state = State::CsiParam;
                    } else if b == b';' {
                        self.params.push(0);
                        self.state = State::CsiParam;
                    } else if b == b'?' || b == b'>' || b == b'<' {
                        // Private-mode prefix; consumed without changing semantics.
                        self.state = State::CsiParam;
                    } else {
                        if let Some(action) = self.process_csi(b) {
                            actions.push(action);
                        }
                        self.reset_csi();
                    }
                }

                State::CsiParam => {
                    if b.is_ascii_digit() {
                        self.num_buffer.push(b);
                    } else if b == b';' {
                        self.flush_num_buffer();
                    } else if (0x20..=0x2F).contains(&b) {
                        self.flush_num_buffer();
                        self.intermediate.push(b);
                        self.state = State::CsiIntermediate;
                    } else {
                        self.flush_num_buffer();
                        if let Some(action) = self.process_csi(b) {
                            actions.push(action);
                        }
                        self.reset_csi();
                    }
                }

                State::CsiIntermediate => {
                    if (0x20..=0x2F).contains(&b) {
                        self.intermediate.push(b);
                    } else {
                        if let Some(action) = self.process_csi(b) {
                            actions.push(action);
                        }
                        self.reset_csi();
                    }
                }

                State::Osc => {
                    if self.osc_esc_pending {
                        self.osc_esc_pending = false;
                        if b == b'\\' {
                            if let Some(action) = self.process_osc() {
                                actions.push(action);
                            }
                            self.reset_osc();
                            i += 1;
                            continue;
                        }
                        // Not a real ST terminator; keep the ESC as literal data.
                        self.osc_buffer.push(0x1B);
                    }

                    if b == 0x07 {
                        if let Some(action) = self.process_osc() {
                            actions.push(action);
                        }
                        self.reset_osc();
                    } else if b == 0x1B {
                        self.osc_esc_pending = true;
                    } else {
                        self.osc_buffer.push(b);
                    }
                }
            }

            i += 1;
        }

        flush_text!(data.len());
        actions
    }

    fn enter_escape(&mut self) {
        self.state = State::Escape;
        self.params.clear();
        self.num_buffer.clear();
        self.intermediate.clear();
    }

    fn reset_csi(&mut self) {
        self.state = State::Ground;
        self.params.clear();
        self.num_buffer.clear();
        self.intermediate.clear();
    }

    fn reset_osc(&mut self) {
        self.state = State::Ground;
        self.osc_buffer.clear();
        self.osc_esc_pending = false;
    }

    fn flush_num_buffer(&mut self) {
        if self.num_buffer.is_empty() {
            self.params.push(0);
        } else {
            let n: i64 = std::str::from_utf8(&self.num_buffer).ok().and_then(|s| s.parse().ok()).unwrap_or(0);
            self.params.push(n);
            self.num_buffer.clear();
        }
    }

    fn first_param_or(&self, default: i64) -> i64 {
        match self.params.first() {
            Some(0) | None => default,
            Some(n) => *n,
        }
    }

    fn process_csi(&mut self, final_byte: u8) -> Option<Action> {
        let n = self.first_param_or(1).max(0) as u32;

        match final_byte {
            b'A' => Some(Action::CursorUp(n)),
            b'B' => Some(Action::CursorDown(n)),
            b'C' => Some(Action::CursorForward(n)),
            b'D' => Some(Action::CursorBackward(n)),
            b'E' => Some(Action::CursorNextLine(n)),
            b'F' => Some(Action::CursorPrevLine(n)),
            b'G' => Some(Action::CursorColumn(n)),
            b'H' | b'f' => {
                let row = match self.params.first() {
                    Some(0) | None => 1,
                    Some(v) => (*v).max(0) as u32,
                };
                let col = match self.params.get(1) {
                    Some(0) | None => 1,
                    Some(v) => (*v).max(0) as u32,
                };
                Some(Action::CursorPosition { row, col })
            }
            b'J' => Some(Action::EraseDisplay(self.params.first().copied().unwrap_or(0).clamp(0, 255) as u8)),
            b'K' => Some(Action::EraseLine(self.params.first().copied().unwrap_or(0).clamp(0, 255) as u8)),
            b'L' => Some(Action::InsertLines(n)),
            b'M' => Some(Action::DeleteLines(n)),
            b'P' => Some(Action::DeleteChars(n)),
            b'S' => Some(Action::ScrollUp(n)),
            b'T' => Some(Action::ScrollDown(n)),
            b'@' => Some(Action::InsertChars(n)),
            b'm' => {
                if self.params.is_empty() {
                    Some(Action::Sgr(vec![0]))
                } else {
                    Some(Action::Sgr(self.params.clone()))
                }
            }
            b'h' => Some(Action::SetMode(self.params.clone())),
            b'l' => Some(Action::ResetMode(self.params.clone())),
            b's' => Some(Action::SaveCursor),
            b'u' => Some(Action::RestoreCursor),
            _ => None,
        }
    }

    fn process_osc(&mut self) -> Option<Action> {
        if self.osc_buffer.is_empty() {
            return None;
        }

        let raw = String::from_utf8_lossy(&self.osc_buffer).into_owned();
        let mut parts = raw.splitn(2, ';');
        let ps: i64 = parts.next()?.parse().ok()?;
        let pt = parts.next()?;

        match ps {
            0 | 2 => Some(Action::SetTitle(pt.to_string())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_coalesces_into_one_action() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"hello");
        assert_eq!(actions, vec![Action::Text("hello".to_string())]);
    }

    #[test]
    fn csi_cursor_position_defaults_to_one_one() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b[H");
        assert_eq!(actions, vec![Action::CursorPosition { row: 1, col: 1 }]);
    }

    #[test]
    fn csi_zero_param_is_coerced_to_one() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b[0A");
        assert_eq!(actions, vec![Action::CursorUp(1)]);
    }

    #[test]
    fn sgr_with_no_params_defaults_to_reset() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b[m");
        assert_eq!(actions, vec![Action::Sgr(vec![0])]);
    }

    #[test]
    fn private_mode_prefix_is_consumed() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b[?25h");
        assert_eq!(actions, vec![Action::SetMode(vec![25])]);
    }

    #[test]
    fn osc_set_title_terminated_by_bel() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b]0;my title\x07");
        assert_eq!(actions, vec![Action::SetTitle("my title".to_string())]);
    }

    #[test]
    fn osc_set_title_terminated_by_st() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1b]2;other title\x1b\\");
        assert_eq!(actions, vec![Action::SetTitle("other title".to_string())]);
    }

    #[test]
    fn unknown_escape_produces_no_action() {
        let mut parser = Parser::new();
        let actions = parser.parse(b"\x1bZ");
        assert!(actions.is_empty());
    }

    #[test]
    fn parser_is_chunk_invariant() {
        let input: &[u8] = b"\x1b[31mhello\x1b[0m world\x1b]0;title\x07more";
        let mut whole = Parser::new();
        let all_at_once = whole.parse(input);

        let mut chunked = Parser::new();
        let mut split_actions = Vec::new();
        for byte in input {
            split_actions.extend(chunked.parse(std::slice::from_ref(byte)));
        }

        // Coalescing differs per chunking but the two streams describe the
        // same edits when replayed, so compare rendered text, not raw actions.
        let collapse = |actions: Vec<Action>| -> String {
            actions
                .into_iter()
                .filter_map(|a| match a {
                    Action::Text(t) => Some(t),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("")
        };
        assert_eq!(collapse(all_at_once), collapse(split_actions));
    }

    #[test]
    fn st_terminator_split_across_chunks_still_terminates_osc() {
        let mut parser = Parser::new();
        let mut actions = parser.parse(b"\x1b]0;hi");
        assert!(actions.is_empty());
        actions.extend(parser.parse(b"\x1b"));
        assert!(actions.is_empty());
        actions.extend(parser.parse(b"\\"));
        assert_eq!(actions, vec![Action::SetTitle("hi".to_string())]);
    }
}

//! Key→bytes translation for terminal capture mode (spec.md §4.7).

use crossterm::event::{KeyCode, KeyModifiers};

pub fn translate(code: KeyCode, modifiers: KeyModifiers) -> Option<Vec<u8>> {
    if modifiers.contains(KeyModifiers::CONTROL)
        && let KeyCode::Char(ch) = code
    {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_lowercase() {
            let byte = (lower as u8) - b'a' + 1;
            return Some(vec![byte]);
        }
    }

    match code {
        KeyCode::Enter => Some(b"\r".to_vec()),
        KeyCode::Backspace => Some(vec![0x7f]),
        KeyCode::Tab => Some(b"\t".to_vec()),
        KeyCode::Esc => Some(vec![0x1b]),
        KeyCode::Up => Some(b"\x1b[A".to_vec()),
        KeyCode::Down => Some(b"\x1b[B".to_vec()),
        KeyCode::Right => Some(b"\x1b[C".to_vec()),
        KeyCode::Left => Some(b"\x1b[D".to_vec()),
        KeyCode::Home => Some(b"\x1b[H".to_vec()),
        KeyCode::End => Some(b"\x1b[F".to_vec()),
        KeyCode::PageUp => Some(b"\x1b[5~".to_vec()),
        KeyCode::PageDown => Some(b"\x1b[6~".to_vec()),
        KeyCode::Delete => Some(b"\x1b[3~".to_vec()),
        KeyCode::Insert => Some(b"\x1b[2~".to_vec()),
        KeyCode::Char(ch) => Some(ch.to_string().into_bytes()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_enter_and_backspace() {
        assert_eq!(translate(KeyCode::Enter, KeyModifiers::NONE), Some(b"\r".to_vec()));
        assert_eq!(translate(KeyCode::Backspace, KeyModifiers::NONE), Some(vec![0x7f]));
    }

    #[test]
    fn translates_arrows_as_csi_sequences() {
        assert_eq!(translate(KeyCode::Up, KeyModifiers::NONE), Some(b"\x1b[A".to_vec()));
        assert_eq!(translate(KeyCode::Left, KeyModifiers::NONE), Some(b"\x1b[D".to_vec()));
    }

    #[test]
    fn translates_ctrl_letter_to_control_byte() {
        assert_eq!(translate(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(vec![0x03]));
        assert_eq!(translate(KeyCode::Char('a'), KeyModifiers::CONTROL), Some(vec![0x01]));
    }

    #[test]
    fn translates_printable_rune_as_utf8() {
        assert_eq!(translate(KeyCode::Char('é'), KeyModifiers::NONE), Some("é".as_bytes().to_vec()));
    }
}

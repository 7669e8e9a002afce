//! Maps the config file's `theme.palette` hex strings (spec.md §1 "styling
//! tokens" — deliberately out of scope, supplied externally) onto the
//! ratatui colors the chrome actually draws with.

use ratatui::style::Color;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub warning: Color,
    pub danger: Color,
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(0x1e, 0x1e, 0x2e),
            foreground: Color::Rgb(0xcd, 0xd6, 0xf4),
            accent: Color::Rgb(0x89, 0xb4, 0xfa),
            warning: Color::Rgb(0xf9, 0xe2, 0xaf),
            danger: Color::Rgb(0xf3, 0x8b, 0xa8),
            success: Color::Rgb(0xa6, 0xe3, 0xa1),
        }
    }
}

/// Read the current theme out of the live, hot-reloadable `config::CONFIG`
/// rather than caching it, so a config-file edit is reflected immediately.
pub fn current() -> Theme {
    let palette = &config::CONFIG.read().unwrap_or_else(|poison| poison.into_inner()).theme.palette;
    let default = Theme::default();
    Theme {
        background: lookup(palette, "background").unwrap_or(default.background),
        foreground: lookup(palette, "foreground").unwrap_or(default.foreground),
        accent: lookup(palette, "accent").unwrap_or(default.accent),
        warning: lookup(palette, "warning").unwrap_or(default.warning),
        danger: lookup(palette, "danger").unwrap_or(default.danger),
        success: lookup(palette, "success").unwrap_or(default.success),
    }
}

fn lookup(palette: &std::collections::HashMap<String, String>, key: &str) -> Option<Color> {
    palette.get(key).and_then(|value| parse_hex_color(value))
}

fn parse_hex_color(value: &str) -> Option<Color> {
    let normalized = value.trim().strip_prefix('#').unwrap_or(value.trim());
    if normalized.len() != 6 || !normalized.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&normalized[0..2], 16).ok()?;
    let g = u8::from_str_radix(&normalized[2..4], 16).ok()?;
    let b = u8::from_str_radix(&normalized[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

pub fn truncate_to_display_width(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let mut output = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let char_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if char_width > 0 && used + char_width > max_width {
            break;
        }
        output.push(ch);
        used += char_width;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors_case_insensitively() {
        assert_eq!(parse_hex_color("#ABCDEF"), Some(Color::Rgb(0xab, 0xcd, 0xef)));
        assert_eq!(parse_hex_color("abcdef"), Some(Color::Rgb(0xab, 0xcd, 0xef)));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(parse_hex_color("not-a-color"), None);
        assert_eq!(parse_hex_color("#abc"), None);
    }

    #[test]
    fn truncate_stops_at_display_width() {
        assert_eq!(truncate_to_display_width("hello", 3), "hel");
        assert_eq!(truncate_to_display_width("hello", 0), "");
    }
}

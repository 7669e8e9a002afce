//! Shared timestamp formatting for the debug and SSH transcript logs.

use chrono::Local;

#[derive(Debug, Clone, Copy)]
pub struct LogFormatter {
    with_timestamp: bool,
    with_level: bool,
}

impl LogFormatter {
    pub fn new(with_timestamp: bool, with_level: bool) -> Self {
        Self { with_timestamp, with_level }
    }

    pub fn format(&self, level: Option<&str>, message: &str) -> String {
        let mut out = String::new();
        if self.with_timestamp {
            out.push('[');
            out.push_str(&Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string());
            out.push(']');
            out.push(' ');
        }
        if self.with_level
            && let Some(level) = level
        {
            out.push('[');
            out.push_str(level);
            out.push(']');
            out.push(' ');
        }
        out.push_str(message);
        out
    }
}

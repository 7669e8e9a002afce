//! The value type occupying a single screen position.

/// A cell's foreground/background color. `Default` means "no explicit color,
/// let the renderer pick its own default" — the ANSI `-1` sentinel from the
/// original byte-oriented model, widened per the truecolor design note so RGB
/// SGR sequences don't have to be discarded or lossily rounded to a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Indexed(u8),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attrs {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub reverse: bool,
    pub hidden: bool,
    pub strike: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            fg: Color::Default,
            bg: Color::Default,
            attrs: Attrs::default(),
        }
    }
}

impl Cell {
    pub fn blank() -> Self {
        Self::default()
    }

    /// A blank cell carrying the given attribute state (used when erasing so
    /// the cleared area takes the current SGR colors, per spec.md §4.2).
    pub fn blank_with(fg: Color, bg: Color, attrs: Attrs) -> Self {
        Self { glyph: ' ', fg, bg, attrs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_space_with_default_colors() {
        let cell = Cell::default();
        assert_eq!(cell.glyph, ' ');
        assert_eq!(cell.fg, Color::Default);
        assert_eq!(cell.bg, Color::Default);
        assert_eq!(cell.attrs, Attrs::default());
    }
}

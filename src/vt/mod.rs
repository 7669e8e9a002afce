//! VT parser, screen buffer, and emulator (spec.md §4.1-§4.3): turns a raw
//! byte stream from a remote shell into a styled cell grid.

mod action;
mod buffer;
mod cell;
mod emulator;
mod parser;

pub use action::Action;
pub use buffer::ScreenBuffer;
pub use cell::{Attrs, Cell, Color};
pub use emulator::Emulator;
pub use parser::Parser;

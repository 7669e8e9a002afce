//! The synchronous ratatui front end: sidebar, tabbed terminals, and the
//! connect/host-key/confirm overlays (spec.md §2, §4.7).

mod app;
mod input;
mod keys;
mod render;
mod state;
mod ui;
mod widgets;

pub use app::run::run;

//! Event loop: polls terminal input, drains the session event bus, and
//! redraws (spec.md §4.6 "the UI loop owns the one `Receiver`").

use std::time::Duration;

use crossbeam_channel::Receiver;
use crossterm::event::{self, Event as TermEvent};
use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::events::Event;
use crate::tui::input;
use crate::tui::render;
use crate::tui::state::{AppState, Overlay};

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState, events: &Receiver<Event>) -> crate::Result<()> {
    loop {
        while let Ok(event) = events.try_recv() {
            apply_session_event(app, event);
        }

        terminal.draw(|frame| render::draw(frame, app)).map_err(crate::Error::Ui)?;

        if app.should_exit {
            break;
        }

        if event::poll(EVENT_POLL_INTERVAL).map_err(crate::Error::Ui)? {
            match event::read().map_err(crate::Error::Ui)? {
                TermEvent::Key(key) => input::handle_key(app, key),
                TermEvent::Resize(width, height) => handle_resize(app, width, height),
                _ => {}
            }
        }

        if app.should_exit {
            break;
        }
    }

    Ok(())
}

fn handle_resize(app: &mut AppState, width: u16, height: u16) {
    app.handle_terminal_resize(width, height);
    app.last_terminal_size = (width, height);

    let sidebar_width = app.sidebar_width;
    let terminal_width = width.saturating_sub(sidebar_width).max(1);
    let terminal_height = height.saturating_sub(1).max(1);

    if let Some(tab) = app.active_tab_mut() {
        let host_id = tab.host_id;
        tab.emulator.resize(terminal_width as usize, terminal_height as usize);
        let _ = app.registry.resize(host_id, terminal_width, terminal_height);
    }
}

fn apply_session_event(app: &mut AppState, event: Event) {
    let host_id = event.host_id();

    match event {
        Event::Connecting { message, .. } | Event::Authenticating { message, .. } => {
            if let Some(tab) = app.tab_for_host_mut(host_id) {
                tab.push_progress(message);
            }
        }
        Event::HostKey { host_id, info } => {
            if app.overlay.is_none() {
                app.overlay = Some(Overlay::HostKey(crate::tui::state::HostKeyPromptState { host_id, info, save: true }));
            }
        }
        Event::Connected { .. } => {
            if let Some(tab) = app.tab_for_host_mut(host_id) {
                tab.clear_progress();
            }
            app.refresh_hosts();
        }
        Event::Output { bytes, .. } => {
            if let Some(tab) = app.tab_for_host_mut(host_id) {
                tab.emulator.write(&bytes);
            }
        }
        Event::Error { message, .. } => {
            if let Some(tab) = app.tab_for_host_mut(host_id) {
                tab.push_progress(format!("error: {message}"));
            }
            if app.overlay.is_none() {
                app.overlay = Some(Overlay::ConnectionError(crate::tui::state::ConnectionErrorState { host_id, message: message.clone() }));
            }
            app.status_message = Some(message);
        }
        Event::Disconnected { .. } => {
            if let Some(tab) = app.tab_for_host_mut(host_id) {
                tab.push_progress("disconnected");
            }
        }
    }
}

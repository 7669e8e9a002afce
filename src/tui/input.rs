//! Global key routing (spec.md §4.7 "Screen Manager & Input Routing"):
//! dispatches to the modal overlay if one is open, otherwise to terminal
//! capture passthrough or the sidebar/tab shortcuts.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::repository::Host;
use crate::tui::state::{AppState, CaptureMode, ConfirmAction, ConfirmState, ConnectField, Overlay, Tab};

use super::keys;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    if let Some(overlay) = app.overlay.take() {
        app.overlay = handle_overlay_key(app, overlay, key);
        return;
    }

    if app.filter_active {
        handle_filter_key(app, key);
        return;
    }

    if let Some(tab) = app.active_tab()
        && tab.capture == CaptureMode::Terminal
    {
        handle_capture_key(app, key);
        return;
    }

    handle_global_key(app, key);
}

fn handle_capture_key(app: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Char(']') && key.modifiers.contains(KeyModifiers::CONTROL) {
        if let Some(tab) = app.active_tab_mut() {
            tab.toggle_capture();
        }
        return;
    }

    let host_id = app.active_tab().map(|tab| tab.host_id);
    if let Some(host_id) = host_id
        && let Some(bytes) = keys::translate(key.code, key.modifiers)
        && let Err(err) = app.registry.send_input(host_id, bytes)
    {
        app.status_message = Some(err.to_string());
    }
}

fn handle_global_key(app: &mut AppState, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        app.should_exit = true;
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(']') {
        if let Some(tab) = app.active_tab_mut() {
            tab.toggle_capture();
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::ALT)
        && let KeyCode::Char(digit) = key.code
        && let Some(index) = digit.to_digit(10)
    {
        app.jump_to_tab(index as usize);
        return;
    }

    match key.code {
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => app.prev_tab(),
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::Char('/') => app.filter_active = true,
        KeyCode::Char('n') => app.open_connect_popup_new(),
        KeyCode::Char('e') => {
            if let Some(host) = app.selected_host().cloned() {
                app.open_connect_popup_edit(&host);
            }
        }
        KeyCode::Char('d') => {
            if let Some(host) = app.selected_host() {
                app.overlay = Some(Overlay::Confirm(ConfirmState { action: ConfirmAction::DeleteHost(host.id), message: format!("Delete host '{}'?", host.name) }));
            }
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => app.close_tab(app.active_tab),
        KeyCode::Enter => connect_selected_host(app),
        KeyCode::Esc => app.status_message = None,
        _ => {}
    }
}

fn connect_selected_host(app: &mut AppState) {
    let Some(host) = app.selected_host().cloned() else {
        return;
    };

    if let Some(index) = app.tab_index_for_host(host.id) {
        app.active_tab = index;
        if let Some(tab) = app.active_tab_mut() {
            tab.capture = CaptureMode::Terminal;
        }
        return;
    }

    let size = app.last_terminal_size;
    app.registry.initiate(host.clone(), size);
    app.tabs.push(Tab::new(&host, size.0, size.1));
    app.active_tab = app.tabs.len() - 1;
}

fn handle_filter_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.filter_active = false,
        KeyCode::Backspace => app.filter.backspace(),
        KeyCode::Delete => app.filter.delete(),
        KeyCode::Left => app.filter.move_left(),
        KeyCode::Right => app.filter.move_right(),
        KeyCode::Home => app.filter.move_home(),
        KeyCode::End => app.filter.move_end(),
        KeyCode::Char(ch) => app.filter.insert_char(ch),
        _ => {}
    }
    app.selected_row = 0;
}

fn handle_overlay_key(app: &mut AppState, overlay: Overlay, key: KeyEvent) -> Option<Overlay> {
    match overlay {
        Overlay::Connect(mut state) => {
            match key.code {
                KeyCode::Esc => return None,
                KeyCode::Tab | KeyCode::Down => state.focus = state.focus.next(),
                KeyCode::BackTab | KeyCode::Up => state.focus = state.focus.prev(),
                KeyCode::Left if state.focus == ConnectField::Mode => state.toggle_mode(),
                KeyCode::Right if state.focus == ConnectField::Mode => state.toggle_mode(),
                KeyCode::Left if state.focus == ConnectField::Credential => state.prev_credential(),
                KeyCode::Right if state.focus == ConnectField::Credential => state.next_credential(),
                KeyCode::Enter if state.focus == ConnectField::Cancel => return None,
                KeyCode::Enter if state.focus == ConnectField::Connect => return submit_connect_popup(app, state),
                KeyCode::Enter => state.focus = state.focus.next(),
                KeyCode::Backspace => edit_field(&mut state, |field| field.backspace()),
                KeyCode::Delete => edit_field(&mut state, |field| field.delete()),
                KeyCode::Left => edit_field(&mut state, |field| field.move_left()),
                KeyCode::Right => edit_field(&mut state, |field| field.move_right()),
                KeyCode::Home => edit_field(&mut state, |field| field.move_home()),
                KeyCode::End => edit_field(&mut state, |field| field.move_end()),
                KeyCode::Char(ch) => edit_field(&mut state, |field| field.insert_char(ch)),
                _ => {}
            }
            Some(Overlay::Connect(state))
        }
        Overlay::HostKey(mut state) => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                app.registry.continue_after_host_key(state.host_id, state.save);
                None
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                app.registry.reject_host_key(state.host_id);
                None
            }
            KeyCode::Char('s') => {
                state.save = !state.save;
                Some(Overlay::HostKey(state))
            }
            _ => Some(Overlay::HostKey(state)),
        },
        Overlay::Confirm(state) => match key.code {
            KeyCode::Char('y') => {
                apply_confirm(app, state.action);
                None
            }
            KeyCode::Char('n') | KeyCode::Esc => None,
            _ => Some(Overlay::Confirm(state)),
        },
        Overlay::ConnectionError(state) => match key.code {
            KeyCode::Char('r') | KeyCode::Enter => {
                retry_connection(app, state.host_id);
                None
            }
            KeyCode::Char('c') | KeyCode::Esc => {
                cancel_connection(app, state.host_id);
                None
            }
            _ => Some(Overlay::ConnectionError(state)),
        },
    }
}

/// Retry (spec.md §4.4 "offers Retry (which rebuilds the session from
/// scratch)"): ask the registry to rebuild the session, then reset the
/// tab's progress popup so the new attempt's lines don't mix with the old.
fn retry_connection(app: &mut AppState, host_id: crate::repository::Id) {
    if let Some(tab) = app.tab_for_host_mut(host_id) {
        tab.progress_log.clear();
        tab.push_progress("retrying...");
    }
    if let Err(err) = app.registry.retry(host_id) {
        app.status_message = Some(err.to_string());
    }
}

/// Cancel (spec.md §4.4 "or Cancel (which releases resources and closes the
/// tab)"): close the session and the tab bound to it, if still open.
fn cancel_connection(app: &mut AppState, host_id: crate::repository::Id) {
    app.registry.close(host_id);
    if let Some(index) = app.tab_index_for_host(host_id) {
        app.close_tab(index);
    }
}

fn edit_field(state: &mut crate::tui::state::ConnectPopupState, f: impl Fn(&mut crate::tui::state::TextField)) {
    match state.focus {
        ConnectField::Name => f(&mut state.name),
        ConnectField::Hostname => f(&mut state.hostname),
        ConnectField::Port => f(&mut state.port),
        _ => {}
    }
}

fn submit_connect_popup(app: &mut AppState, mut state: crate::tui::state::ConnectPopupState) -> Option<Overlay> {
    match state.build_host() {
        Ok(host) => {
            let saved = save_host(app, host);
            match saved {
                Ok(host) => {
                    app.refresh_hosts();
                    app.status_message = Some(format!("saved host '{}'", host.name));
                    None
                }
                Err(err) => {
                    state.error = Some(err);
                    Some(Overlay::Connect(state))
                }
            }
        }
        Err(err) => {
            state.error = Some(err);
            Some(Overlay::Connect(state))
        }
    }
}

fn save_host(app: &AppState, host: Host) -> Result<Host, String> {
    if host.id == 0 {
        app.repository.create_host(host).map_err(|err| err.to_string())
    } else {
        app.repository.update_host(host).map_err(|err| err.to_string())
    }
}

fn apply_confirm(app: &mut AppState, action: ConfirmAction) {
    match action {
        ConfirmAction::DeleteHost(id) => {
            app.registry.close(id);
            if let Some(index) = app.tab_index_for_host(id) {
                app.close_tab(index);
            }
            let _ = app.repository.delete_host(id);
            app.refresh_hosts();
        }
    }
}

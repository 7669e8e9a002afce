//! Top-level TUI state: the host sidebar, the open tabs, and whatever
//! overlay is currently modal.

use std::io;
use std::sync::Arc;

use crate::repository::{CredentialType, Host, Id, Repository};
use crate::ssh::SessionRegistry;

use super::overlay_state::{ConnectPopupState, CredentialOption, Overlay};
use super::tab_state::Tab;
use super::text_field::TextField;

pub const SIDEBAR_MIN_WIDTH: u16 = 15;
pub const SIDEBAR_MAX_WIDTH: u16 = 50;

pub struct AppState {
    pub repository: Arc<dyn Repository>,
    pub registry: Arc<SessionRegistry>,

    pub hosts: Vec<Host>,
    pub filter: TextField,
    pub filter_active: bool,
    pub selected_row: usize,

    pub tabs: Vec<Tab>,
    pub active_tab: usize,

    pub overlay: Option<Overlay>,
    pub status_message: Option<String>,

    pub sidebar_width: u16,
    pub last_terminal_size: (u16, u16),
    pub should_exit: bool,
    pub dirty: bool,
}

impl AppState {
    pub fn new(repository: Arc<dyn Repository>, registry: Arc<SessionRegistry>, terminal_size: (u16, u16)) -> io::Result<Self> {
        let hosts = repository.list_hosts().map_err(|err| io::Error::other(err.to_string()))?;
        let sidebar_width = Self::clamp_sidebar_width(28, terminal_size.0);

        Ok(Self {
            repository,
            registry,
            hosts,
            filter: TextField::new(""),
            filter_active: false,
            selected_row: 0,
            tabs: Vec::new(),
            active_tab: 0,
            overlay: None,
            status_message: None,
            sidebar_width,
            last_terminal_size: terminal_size,
            should_exit: false,
            dirty: true,
        })
    }

    fn clamp_sidebar_width(width: u16, term_width: u16) -> u16 {
        let max_for_terminal = term_width.saturating_sub(20).max(1);
        let upper = SIDEBAR_MAX_WIDTH.min(max_for_terminal);
        let lower = SIDEBAR_MIN_WIDTH.min(upper);
        width.clamp(lower, upper)
    }

    pub fn handle_terminal_resize(&mut self, term_width: u16, term_height: u16) {
        if term_width == 0 || term_height == 0 {
            return;
        }
        let (prev_width, prev_height) = self.last_terminal_size;
        if prev_width == term_width && prev_height == term_height {
            return;
        }

        if prev_width > 0 && term_width != prev_width {
            let scaled = ((self.sidebar_width as u32 * term_width as u32) + (prev_width as u32 / 2)) / prev_width as u32;
            self.sidebar_width = Self::clamp_sidebar_width(scaled as u16, term_width);
        } else {
            self.sidebar_width = Self::clamp_sidebar_width(self.sidebar_width, term_width);
        }

        self.last_terminal_size = (term_width, term_height);
        self.dirty = true;
    }

    pub fn refresh_hosts(&mut self) {
        if let Ok(hosts) = self.repository.list_hosts() {
            self.hosts = hosts;
            self.selected_row = self.selected_row.min(self.hosts.len().saturating_sub(1));
        }
    }

    pub fn visible_hosts(&self) -> Vec<&Host> {
        let query = self.filter.value().to_lowercase();
        self.hosts
            .iter()
            .filter(|host| query.is_empty() || host.name.to_lowercase().contains(&query) || host.hostname.to_lowercase().contains(&query))
            .collect()
    }

    pub fn selected_host(&self) -> Option<&Host> {
        self.visible_hosts().into_iter().nth(self.selected_row)
    }

    pub fn move_selection(&mut self, delta: i32) {
        let count = self.visible_hosts().len();
        if count == 0 {
            self.selected_row = 0;
            return;
        }
        let current = self.selected_row as i32;
        self.selected_row = (current + delta).clamp(0, count as i32 - 1) as usize;
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active_tab)
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        self.tabs.get_mut(self.active_tab)
    }

    pub fn tab_index_for_host(&self, host_id: Id) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.host_id == host_id)
    }

    pub fn tab_for_host_mut(&mut self, host_id: Id) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.host_id == host_id)
    }

    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active_tab = (self.active_tab + 1) % self.tabs.len();
        }
    }

    pub fn prev_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active_tab = if self.active_tab == 0 { self.tabs.len() - 1 } else { self.active_tab - 1 };
        }
    }

    pub fn jump_to_tab(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.active_tab = index;
        }
    }

    /// Close the tab at `index`, closing its session first (spec.md §3
    /// "registry must drop the session before releasing its network
    /// handles"). Closing the last tab is a no-op (spec.md §4.7).
    pub fn close_tab(&mut self, index: usize) {
        if self.tabs.len() <= 1 || index >= self.tabs.len() {
            return;
        }
        let host_id = self.tabs[index].host_id;
        self.registry.close(host_id);
        self.tabs.remove(index);
        if self.active_tab >= self.tabs.len() {
            self.active_tab = self.tabs.len() - 1;
        }
    }

    pub fn credential_options(&self) -> Vec<CredentialOption> {
        let mut options = Vec::new();
        if let Ok(identities) = self.repository.list_identities() {
            options.extend(identities.into_iter().map(|identity| CredentialOption { id: identity.id, kind: CredentialType::Identity, label: format!("{} ({})", identity.name, identity.username) }));
        }
        if let Ok(keys) = self.repository.list_keys() {
            options.extend(keys.into_iter().map(|key| CredentialOption { id: key.id, kind: CredentialType::Key, label: format!("{} ({})", key.name, key.username) }));
        }
        options
    }

    pub fn open_connect_popup_new(&mut self) {
        self.overlay = Some(Overlay::Connect(ConnectPopupState::new(self.credential_options())));
    }

    pub fn open_connect_popup_edit(&mut self, host: &Host) {
        self.overlay = Some(Overlay::Connect(ConnectPopupState::from_host(host, self.credential_options())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::SshLogger;
    use crate::repository::InMemoryRepository;
    use std::path::Path;

    fn app(terminal_size: (u16, u16)) -> AppState {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let handle = runtime.handle().clone();
        std::mem::forget(runtime);
        let repository: Arc<dyn Repository> = Arc::new(InMemoryRepository::new());
        let registry = Arc::new(SessionRegistry::new(handle, repository.clone(), Arc::new(SshLogger::new(Path::new("/tmp")))));
        AppState::new(repository, registry, terminal_size).unwrap()
    }

    #[test]
    fn terminal_resize_scales_sidebar_width_proportionally() {
        let mut app = app((100, 30));
        app.last_terminal_size = (100, 30);
        app.sidebar_width = 25;

        app.handle_terminal_resize(160, 30);
        assert_eq!(app.sidebar_width, 40);
    }

    #[test]
    fn terminal_resize_clamps_sidebar_width_for_small_windows() {
        let mut app = app((120, 30));
        app.last_terminal_size = (120, 30);
        app.sidebar_width = 30;

        app.handle_terminal_resize(30, 30);
        assert_eq!(app.sidebar_width, 10);
    }

    #[test]
    fn closing_the_last_tab_is_a_no_op() {
        let mut app = app((100, 30));
        let host = Host { id: 1, name: "a".into(), hostname: "h".into(), port: 22, mode: crate::repository::ConnectionMode::Ssh, credential_id: 1, credential_type: CredentialType::Identity, last_connected_at: None };
        app.tabs.push(Tab::new(&host, 80, 24));
        app.close_tab(0);
        assert_eq!(app.tabs.len(), 1);
    }
}

//! TUI state model split by feature domain.

mod app_state;
mod overlay_state;
mod tab_state;
mod text_field;

pub use app_state::{AppState, SIDEBAR_MAX_WIDTH, SIDEBAR_MIN_WIDTH};
pub use overlay_state::{ConfirmAction, ConfirmState, ConnectField, ConnectPopupState, ConnectionErrorState, CredentialOption, HostKeyPromptState, Overlay};
pub use tab_state::{CaptureMode, Tab};
pub use text_field::TextField;

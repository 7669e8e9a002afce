//! Process-wide configuration: loaded once at startup into a global
//! [`CONFIG`] static, reloadable in place by [`config_watcher`].

mod errors;
mod loader;
mod paths;
mod settings;
mod watcher;

pub use errors::ConfigError;
pub use loader::ConfigLoader;
pub use paths::{app_dir, database_path, log_dir, set_override_dir};
pub use settings::{Config, Settings, Theme};
pub use watcher::config_watcher;

use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

pub static CONFIG: Lazy<Arc<RwLock<Config>>> = Lazy::new(|| Arc::new(RwLock::new(Config::default())));

/// Load configuration from disk and install it as the process-wide instance.
/// Must be called once at startup before any other module reads [`CONFIG`].
pub fn init(dev_mode: bool) -> Result<(), ConfigError> {
    let loaded = ConfigLoader::new(dev_mode).load()?;
    *CONFIG.write().unwrap_or_else(|poison| poison.into_inner()) = loaded;
    Ok(())
}

//! Per-application directory resolution (spec.md §6 Filesystem).

use std::path::PathBuf;

use super::ConfigError;

const APP_DIR_NAME: &str = "haven";
const DB_FILE_NAME: &str = "haven.db";
const CONFIG_FILE_NAME: &str = "haven-config.yaml";

/// Root directory for this app's persisted state. In dev mode this is the
/// current working directory; otherwise the platform config directory. An
/// explicit override (`--config-dir`) takes precedence over both.
pub fn app_dir(dev_mode: bool) -> Result<PathBuf, ConfigError> {
    if let Some(override_dir) = OVERRIDE_DIR.get() {
        return Ok(override_dir.clone());
    }

    if dev_mode {
        return std::env::current_dir().map_err(ConfigError::from);
    }

    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join(APP_DIR_NAME))
}

static OVERRIDE_DIR: once_cell::sync::OnceCell<PathBuf> = once_cell::sync::OnceCell::new();

/// Install an explicit config/database directory override. Must be called, if
/// at all, before any other config/repository call resolves a path.
pub fn set_override_dir(dir: PathBuf) {
    let _ = OVERRIDE_DIR.set(dir);
}

pub fn ensure_app_dir(dev_mode: bool) -> Result<PathBuf, ConfigError> {
    let dir = app_dir(dev_mode)?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&dir)?.permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&dir, perms)?;
        }
    }
    Ok(dir)
}

pub fn config_file_path(dev_mode: bool) -> Result<PathBuf, ConfigError> {
    Ok(ensure_app_dir(dev_mode)?.join(CONFIG_FILE_NAME))
}

pub fn database_path(dev_mode: bool) -> Result<PathBuf, ConfigError> {
    Ok(ensure_app_dir(dev_mode)?.join(DB_FILE_NAME))
}

pub fn log_dir(dev_mode: bool) -> Result<PathBuf, ConfigError> {
    Ok(ensure_app_dir(dev_mode)?.join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_mode_resolves_to_cwd() {
        let dir = app_dir(true).unwrap();
        assert_eq!(dir, std::env::current_dir().unwrap());
    }
}

//! Config discovery, default-template bootstrap, and reload.

use std::fs;

use super::paths;
use super::settings::Config;
use super::ConfigError;
use crate::log_debug;

const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../../templates/default-config.yaml");

pub struct ConfigLoader {
    dev_mode: bool,
}

impl ConfigLoader {
    pub fn new(dev_mode: bool) -> Self {
        Self { dev_mode }
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let path = paths::config_file_path(self.dev_mode)?;
        if !path.exists() {
            log_debug!("No configuration file at {:?}, writing defaults", path);
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        log_debug!("Loading configuration from {:?}", path);
        let content = fs::read_to_string(&path)?;
        let mut config: Config = serde_yml::from_str(&content)?;
        config.config_path = path;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config: Config = serde_yml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("template should parse");
        assert!(config.settings.host_panel_width > 0);
    }
}

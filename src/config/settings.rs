//! Deserialized configuration shape.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub show_title: bool,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default)]
    pub ssh_logging: bool,
    #[serde(default = "default_history_buffer")]
    pub history_buffer: usize,
    #[serde(default = "default_host_panel_width")]
    pub host_panel_width: u16,
    #[serde(default = "default_host_info_height")]
    pub host_info_height: u16,
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_true() -> bool {
    true
}

fn default_history_buffer() -> usize {
    5000
}

fn default_host_panel_width() -> u16 {
    32
}

fn default_host_info_height() -> u16 {
    8
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_title: true,
            debug_mode: false,
            ssh_logging: false,
            history_buffer: default_history_buffer(),
            host_panel_width: default_host_panel_width(),
            host_info_height: default_host_info_height(),
            dev_mode: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Theme {
    #[serde(default)]
    pub palette: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub theme: Theme,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            theme: Theme::default(),
            config_path: PathBuf::new(),
        }
    }
}

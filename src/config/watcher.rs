//! Configuration file watching and hot-reloading.

use super::loader::ConfigLoader;
use super::CONFIG;
use crate::{log_debug, log_error, log_info, log_warn};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::{
    path::PathBuf,
    sync::mpsc,
    thread,
    time::Duration,
};

fn event_targets_config_file(event: &Event, config_file_name: &str) -> bool {
    event.paths.iter().any(|path| path.file_name().and_then(|segment| segment.to_str()).map(|name| name == config_file_name).unwrap_or(false))
}

fn should_reload_for_event(event: &Event, config_file_name: &str) -> bool {
    (event.kind.is_modify() || event.kind.is_create()) && event_targets_config_file(event, config_file_name)
}

/// Start watching the configuration file for changes. Returns `None` (hot-reload
/// disabled) rather than failing startup if the watcher cannot be created.
pub fn config_watcher(dev_mode: bool) -> Option<RecommendedWatcher> {
    let (tx, rx) = mpsc::channel();

    log_debug!("Initializing configuration file watcher");

    let config_path = CONFIG.read().unwrap_or_else(|poison| poison.into_inner()).config_path.clone();
    let config_file_name = config_path.file_name().and_then(|segment| segment.to_str()).unwrap_or("").to_string();
    let config_file_name_clone = config_file_name.clone();

    let mut watcher = match RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res
                && should_reload_for_event(&event, &config_file_name_clone)
            {
                let _ = tx.send(());
            }
        },
        notify::Config::default(),
    ) {
        Ok(watcher) => watcher,
        Err(err) => {
            log_error!("Failed to create file watcher: {}", err);
            log_warn!("Configuration hot-reload disabled");
            return None;
        }
    };

    let fallback = PathBuf::from(".");
    let watch_path = config_path.parent().unwrap_or(&fallback).to_path_buf();
    log_info!("Watching configuration directory: {:?}", watch_path);

    if let Err(err) = watcher.watch(&watch_path, RecursiveMode::NonRecursive) {
        log_error!("Failed to watch config directory: {}", err);
        return None;
    }

    if let Err(err) = thread::Builder::new().name("config-watcher".to_string()).spawn(move || {
        loop {
            match rx.recv() {
                Ok(()) => {
                    while rx.recv_timeout(Duration::from_millis(500)).is_ok() {}
                    match ConfigLoader::new(dev_mode).load() {
                        Ok(new_config) => {
                            *CONFIG.write().unwrap_or_else(|poison| poison.into_inner()) = new_config;
                            log_info!("Configuration reloaded");
                        }
                        Err(err) => log_error!("Configuration reload failed: {}", err),
                    }
                }
                Err(_) => break,
            }
        }
    }) {
        log_error!("Failed to spawn config watcher thread: {}", err);
        return None;
    }

    Some(watcher)
}

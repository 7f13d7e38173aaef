use anyhow::{Context, Result};
use cmake_targets_core::watch::FileWatch;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;
use tracing::{info, warn};

use super::{discoverer_for, is_configured};
use crate::cli::ProjectArgs;
use crate::config::{load_config, resolve_project};
use crate::display::{print_targets, print_targets_json};

const TICK: Duration = Duration::from_millis(200);

pub fn watch_command(args: &ProjectArgs, json: bool) -> Result<()> {
    let project = resolve_project(args)?;
    let (provider, discoverer) = discoverer_for(&project);
    let refresh = discoverer.subscribe();

    // Edits to the config file are fed back through the provider, which
    // turns each changed key into a refresh of its own
    let (config_tx, config_rx) = mpsc::channel();
    let _config_watch = match &project.config_file {
        Some(path) => Some(
            FileWatch::new(path, move || {
                let _ = config_tx.send(());
            })
            .with_context(|| format!("Failed to watch {}", path.display()))?,
        ),
        None => None,
    };

    let list = || -> Result<()> {
        match discoverer.targets() {
            Ok(targets) if json => print_targets_json(&targets)?,
            Ok(targets) => {
                let location = discoverer.location();
                print_targets(&location, &targets, is_configured(&location));
            }
            Err(e) => warn!("Discovery failed: {}", e),
        }
        Ok(())
    };

    list()?;
    loop {
        if config_rx.try_recv().is_ok() {
            while config_rx.try_recv().is_ok() {}
            if let Some(path) = &project.config_file {
                match load_config(Some(path), args) {
                    Ok(config) => {
                        let changed = provider.apply(&config);
                        info!("Reloaded {} ({} key(s) changed)", path.display(), changed);
                    }
                    Err(e) => warn!("{:#}", e),
                }
            }
        }

        match refresh.recv_timeout(TICK) {
            Ok(reason) => {
                let skipped = refresh.try_iter().count();
                info!("Refreshing ({:?}, {} more pending)", reason, skipped);
                list()?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}

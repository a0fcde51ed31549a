/*
 *  main.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use env_logger::Env;
use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};

use statusdial::{
    config,
    display::DisplayManager,
    input,
    network::ConnectivityMonitor,
    presence::SlackClient,
    ControllerSettings,
    Runtime,
    StatusController,
    SystemClock,
};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Waits for SIGINT, SIGTERM or SIGHUP and returns once one arrives.
async fn signal_handler() -> std::io::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = config::load()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_deref().unwrap_or("info")))
        .format_timestamp_secs()
        .init();

    info!("{} - one knob, one status", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);
    match config.source.as_ref() {
        Some(path) => info!("Using config {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    if !config.has_slack_token() {
        warn!("No Slack token configured, starting in setup mode");
    }

    let settings: ControllerSettings = config.controller_settings();
    let input = input::open_source(&config)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let loop_shutdown = Arc::clone(&shutdown);

    // panel I/O and the Slack calls block, keep them off the async workers
    let mut worker = tokio::task::spawn_blocking(move || -> Result<(), BoxError> {
        let display = DisplayManager::new(&config.display())?;
        let slack = SlackClient::new(&config.slack())?;
        let controller = StatusController::new(config.catalog(), display, slack, SystemClock, settings);
        let monitor = ConnectivityMonitor::from_config(&config);

        let mut runtime = Runtime::new(
            controller,
            input,
            monitor,
            config.poll_interval(),
            config.network_poll_interval(),
        );
        runtime.run(&loop_shutdown);
        Ok(())
    });

    tokio::select! {
        res = signal_handler() => {
            if let Err(e) = res {
                error!("Signal handling failed: {}", e);
            }
            shutdown.store(true, Ordering::Relaxed);
        }
        res = &mut worker => {
            info!("Main loop ended on its own");
            return res?;
        }
    }

    // let the loop blank the panel before we go
    worker.await??;
    info!("Main application exiting.");
    Ok(())
}

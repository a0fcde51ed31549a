/*
 *  config.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layered configuration - defaults, YAML file, CLI overrides
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

use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::catalog::{StatusCatalog, StatusEntry};
use crate::constants::{
    DEFAULT_PIN_A, DEFAULT_PIN_B, DEFAULT_PIN_BUTTON, MAX_CATALOG_SIZE, MAX_EXPIRY_MINUTES, PROFILE_REFRESH_INTERVAL, REDRAW_INTERVAL,
    SCREEN_OFF_INTERVAL, STATUS_ICON_CHARS_MAX,
};
use crate::display::ControllerSettings;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub display: Option<DisplayConfig>,
    pub slack: Option<SlackConfig>,
    pub network: Option<NetworkConfig>,
    pub input: Option<InputConfig>,
    pub timing: Option<TimingConfig>,
    /// Shown under the clock on the WiFi screen
    pub timezone_label: Option<String>,
    /// Catalog entries, compiled defaults when absent
    pub status_list: Option<Vec<StatusEntry>>,
    /// YAML file the settings were read from, logged once the logger is up
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub rotate_deg: Option<u16>,
    pub invert: Option<bool>,
    pub brightness: Option<u8>,     // 0-255
    pub driver: Option<DriverKind>,
    pub bus: Option<BusConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlackConfig {
    /// User OAuth token (xoxp-...). No token = device stays in configure mode
    pub token: Option<String>,
    pub api_base: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    /// SSID label for the WiFi screen
    pub ssid: Option<String>,
    /// Access point name shown on the configure screen
    pub ap_ssid: Option<String>,
    /// Where the configuration page lives
    pub portal_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InputConfig {
    pub source: Option<InputKind>,
    /// BCM numbering
    pub pin_a: Option<u8>,
    pub pin_b: Option<u8>,
    pub pin_button: Option<u8>,
    pub steps_per_click: Option<u8>,
    pub debounce_ms: Option<u64>,
    pub long_press_ms: Option<u64>,
    pub double_click_ms: Option<u64>,
}

impl InputConfig {
    /// Encoder A, encoder B and button pins with the BCM defaults filled in
    pub fn pins(&self) -> [u8; 3] {
        [
            self.pin_a.unwrap_or(DEFAULT_PIN_A),
            self.pin_b.unwrap_or(DEFAULT_PIN_B),
            self.pin_button.unwrap_or(DEFAULT_PIN_BUTTON),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimingConfig {
    pub refresh_secs: Option<u64>,
    pub screen_off_mins: Option<u64>,
    pub redraw_ms: Option<u64>,
    pub poll_ms: Option<u64>,
    pub network_poll_ms: Option<u64>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "statusdial", about = "StatusDial - one knob, one status", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Slack user token (xoxp-...)
    #[arg(long)]
    pub slack_token: Option<String>,
    /// Input source: console | gpio
    #[arg(long)]
    pub input: Option<InputKind>,
    /// Run without a panel (mock driver)
    #[arg(long, action = ArgAction::SetTrue)]
    pub headless: bool,
    #[arg(long)]
    pub display_rotate_deg: Option<u16>,
    #[arg(long, action = ArgAction::Set)]
    pub display_invert: Option<bool>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Same layering as `load`, with the CLI supplied by the caller.
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // defaults, then YAML, then CLI
    let mut cfg = Config::default();

    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
            cfg.source = Some(p.clone());
        } else {
            return Err(ConfigError::Validation(format!(
                "no config at {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
        cfg.source = Some(p);
    }

    apply_cli_overrides(&mut cfg, cli);

    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/statusdial/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/statusdial/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/statusdial.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["statusdial.yaml", "config.yaml", "config/statusdial.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

pub fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    if src.timezone_label.is_some() { dst.timezone_label = src.timezone_label; }
    if src.status_list.is_some()    { dst.status_list = src.status_list; }
    if src.slack.is_some()          { dst.slack = src.slack; }
    if src.network.is_some()        { dst.network = src.network; }
    if src.input.is_some()          { dst.input = src.input; }
    if src.timing.is_some()         { dst.timing = src.timing; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()       { dst.width = src.width; }
    if src.height.is_some()      { dst.height = src.height; }
    if src.rotate_deg.is_some()  { dst.rotate_deg = src.rotate_deg; }
    if src.invert.is_some()      { dst.invert = src.invert; }
    if src.brightness.is_some()  { dst.brightness = src.brightness; }
    if src.driver.is_some()      { dst.driver = src.driver; }
    if src.bus.is_some()         { dst.bus = src.bus; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }

    if let Some(token) = cli.slack_token.as_ref() {
        cfg.slack.get_or_insert_with(SlackConfig::default).token = Some(token.clone());
    }
    if let Some(kind) = cli.input {
        cfg.input.get_or_insert_with(InputConfig::default).source = Some(kind);
    }

    let any_display = cli.headless
        || cli.display_rotate_deg.is_some()
        || cli.display_invert.is_some();

    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.headless                      { display.driver = Some(DriverKind::Mock); }
        if cli.display_rotate_deg.is_some()  { display.rotate_deg = cli.display_rotate_deg; }
        if cli.display_invert.is_some()      { display.invert = cli.display_invert; }
    }
}

/// Reject settings the device cannot run with.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(display) = cfg.display.as_ref() {
        if let (Some(w), Some(h)) = (display.width, display.height) {
            if w == 0 || h == 0 {
                return Err(ConfigError::Validation("display width/height must be > 0".into()));
            }
        }
        if let Some(rot) = display.rotate_deg {
            match rot {
                0 | 90 | 180 | 270 => {},
                _ => return Err(ConfigError::Validation("display rotate_deg must be 0|90|180|270".into()))
            }
        }
    }

    if let Some(list) = cfg.status_list.as_ref() {
        if list.is_empty() {
            return Err(ConfigError::Validation("status_list is empty".into()));
        }
        if list.len() > MAX_CATALOG_SIZE {
            return Err(ConfigError::Validation(format!(
                "status_list has {} entries, max {}", list.len(), MAX_CATALOG_SIZE
            )));
        }
        for (index, entry) in list.iter().enumerate() {
            if entry.title.trim().is_empty() {
                return Err(ConfigError::Validation(format!("status_list item {index}: missing title")));
            }
            let icon = entry.icon.as_str();
            if icon.len() < 2 || !icon.starts_with(':') || !icon.ends_with(':') {
                return Err(ConfigError::Validation(format!(
                    "status_list item {index}: icon '{icon}' must include wrapping ':'"
                )));
            }
            if icon.len() > STATUS_ICON_CHARS_MAX {
                return Err(ConfigError::Validation(format!(
                    "status_list item {index}: icon longer than {STATUS_ICON_CHARS_MAX} chars"
                )));
            }
            if entry.default_expiry_minutes > MAX_EXPIRY_MINUTES {
                return Err(ConfigError::Validation(format!(
                    "status_list item {index}: expiry must be 0..={MAX_EXPIRY_MINUTES}"
                )));
            }
        }
    }

    if let Some(input) = cfg.input.as_ref() {
        if input.steps_per_click == Some(0) {
            return Err(ConfigError::Validation("input steps_per_click must be > 0".into()));
        }
        let [a, b, button] = input.pins();
        if a == b || a == button || b == button {
            return Err(ConfigError::Validation(format!(
                "input pins must be distinct (A={a} B={b} button={button})"
            )));
        }
    }
    Ok(())
}

impl Config {
    /// Catalog built from `status_list`, or the compiled defaults.
    pub fn catalog(&self) -> StatusCatalog {
        match self.status_list.as_ref() {
            Some(list) => StatusCatalog::new(list.clone()),
            None => StatusCatalog::default(),
        }
    }

    pub fn slack(&self) -> SlackConfig {
        self.slack.clone().unwrap_or_default()
    }

    pub fn network(&self) -> NetworkConfig {
        self.network.clone().unwrap_or_default()
    }

    pub fn input(&self) -> InputConfig {
        self.input.clone().unwrap_or_default()
    }

    /// Panel settings; an absent driver means the stock SSD1306 on /dev/i2c-1 @ 0x3C.
    pub fn display(&self) -> DisplayConfig {
        let mut display = self.display.clone().unwrap_or_default();
        let driver = *display.driver.get_or_insert(DriverKind::Ssd1306);
        if driver == DriverKind::Ssd1306 && display.bus.is_none() {
            display.bus = Some(BusConfig::I2c {
                bus: "/dev/i2c-1".to_string(),
                address: 0x3C,
                speed_hz: None,
            });
        }
        display
    }

    pub fn has_slack_token(&self) -> bool {
        self.slack.as_ref()
            .and_then(|s| s.token.as_ref())
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Timer settings for the controller, defaults filled in.
    pub fn controller_settings(&self) -> ControllerSettings {
        let timing = self.timing.clone().unwrap_or_default();
        ControllerSettings {
            refresh_interval: timing.refresh_secs.map(Duration::from_secs).unwrap_or(PROFILE_REFRESH_INTERVAL),
            screen_off_interval: timing.screen_off_mins
                .map(|m| Duration::from_secs(m * 60))
                .unwrap_or(SCREEN_OFF_INTERVAL),
            redraw_interval: timing.redraw_ms.map(Duration::from_millis).unwrap_or(REDRAW_INTERVAL),
            timezone_label: self.timezone_label.clone().unwrap_or_default(),
        }
    }

    /// Main loop sleep between polls
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.timing.as_ref().and_then(|t| t.poll_ms).unwrap_or(10))
    }

    /// How often the connectivity observer samples the host
    pub fn network_poll_interval(&self) -> Duration {
        Duration::from_millis(self.timing.as_ref().and_then(|t| t.network_poll_ms).unwrap_or(1_000))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BusConfig {
    I2c {
        bus: String,        // e.g. "/dev/i2c-1"
        address: u8,        // e.g. 0x3C (I2C addresses are 7-bit, stored in u8)
        speed_hz: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Ssd1306,
    /// No panel, frames are kept in memory only
    Mock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Keyboard lines on stdin
    Console,
    /// Rotary encoder on the GPIO header
    Gpio,
}

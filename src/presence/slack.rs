/*
 *  presence/slack.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Slack Web API presence client (users.profile.get / users.profile.set)
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

use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::{PresenceClient, RemoteProfile};
use crate::config::SlackConfig;

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

/// Error type for presence service calls.
#[derive(Debug, Error)]
pub enum PresenceError {
    /// Network issues, timeouts, TLS, malformed JSON body
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(StatusCode),
    /// Slack answered `ok: false`
    #[error("Slack API error: {0}")]
    Api(String),
    #[error("Slack response missing 'profile'")]
    MissingProfile,
    #[error("No Slack token configured")]
    NoToken,
}

/// Body of both users.profile.get and users.profile.set responses.
#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub profile: Option<SlackProfile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SlackProfile {
    #[serde(default)]
    pub display_name_normalized: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub status_emoji: String,
    #[serde(default)]
    pub status_expiration: i64,
}

#[derive(Debug, Serialize)]
struct SetProfileRequest<'a> {
    profile: StatusPayload<'a>,
}

#[derive(Debug, Serialize)]
struct StatusPayload<'a> {
    status_text: &'a str,
    status_emoji: &'a str,
    status_expiration: i64,
}

/// Turn a decoded response into a profile, or the reason it isn't one.
pub fn profile_from_response(response: ProfileResponse) -> Result<RemoteProfile, PresenceError> {
    if !response.ok {
        return Err(PresenceError::Api(
            response.error.unwrap_or_else(|| "unknown_error".to_string()),
        ));
    }
    let profile = response.profile.ok_or(PresenceError::MissingProfile)?;

    let display_name = [
        profile.display_name_normalized,
        profile.display_name,
        profile.real_name,
    ]
    .into_iter()
    .find(|n| !n.is_empty())
    .unwrap_or_default();

    Ok(RemoteProfile {
        display_name,
        status_text: profile.status_text,
        status_icon: profile.status_emoji,
        expiration_epoch: profile.status_expiration,
        is_error: false,
    })
}

/// Blocking Slack client. Every call is bounded by the configured timeouts.
#[derive(Debug)]
pub struct SlackClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl SlackClient {
    /// Creates a new `SlackClient` with populated headers and timeouts.
    pub fn new(config: &SlackConfig) -> Result<Self, PresenceError> {
        const VERSION: &str = concat!("StatusDial ", env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(VERSION));
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms.unwrap_or(3_000)))
            .timeout(Duration::from_millis(config.timeout_ms.unwrap_or(8_000)))
            .default_headers(headers)
            .build()?;

        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            api_base,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn token(&self) -> Result<&str, PresenceError> {
        self.token.as_deref().ok_or(PresenceError::NoToken)
    }

    fn decode(response: reqwest::blocking::Response) -> Result<RemoteProfile, PresenceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(PresenceError::Status(status));
        }
        let body: ProfileResponse = response.json()?;
        profile_from_response(body)
    }

    /// GET users.profile.get
    pub fn get_profile(&self) -> Result<RemoteProfile, PresenceError> {
        let url = format!("{}/users.profile.get", self.api_base);
        let response = self.client.get(&url).bearer_auth(self.token()?).send()?;
        Self::decode(response)
    }

    /// POST users.profile.set
    pub fn set_profile(&self, title: &str, icon: &str, expire_epoch: i64) -> Result<RemoteProfile, PresenceError> {
        let url = format!("{}/users.profile.set", self.api_base);
        let request = SetProfileRequest {
            profile: StatusPayload {
                status_text: title,
                status_emoji: icon,
                status_expiration: expire_epoch,
            },
        };
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token()?)
            .json(&request)
            .send()?;
        Self::decode(response)
    }
}

impl PresenceClient for SlackClient {
    fn fetch_current_status(&mut self) -> RemoteProfile {
        debug!("Fetching current Slack status");
        match self.get_profile() {
            Ok(profile) => {
                debug!(
                    "Profile: name=[{}] text=[{}] emoji=[{}] expiration={}",
                    profile.display_name, profile.status_text, profile.status_icon, profile.expiration_epoch
                );
                profile
            }
            Err(e) => {
                warn!("Slack profile fetch failed: {}", e);
                RemoteProfile::error()
            }
        }
    }

    fn set_status(&mut self, title: &str, icon: &str, expire_epoch: i64) -> RemoteProfile {
        info!("Sending Slack status [{}] {} expire={}", title, icon, expire_epoch);
        match self.set_profile(title, icon, expire_epoch) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Slack status send failed: {}", e);
                RemoteProfile::error()
            }
        }
    }
}

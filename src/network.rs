/*
 *  network.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Connectivity / configuration observer - edge triggered state changes
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

use local_ip_address::local_ip;
use log::{debug, info};
use std::net::IpAddr;

use crate::config::Config;

/// Lifecycle of the network / configuration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Booting,
    /// No credentials yet, the user has to configure the device
    Unconfigured,
    Connecting,
    Online,
}

/// What the diagnostic screens show about the network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkInfo {
    pub ssid: Option<String>,
    pub link_up: bool,
    pub ip: Option<IpAddr>,
    pub ap_ssid: String,
    pub portal_url: String,
}

/// One look at the host network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStatus {
    pub link_up: bool,
    pub ip: Option<IpAddr>,
}

pub trait LinkSensor {
    fn sample(&mut self) -> LinkStatus;
}

/// Reads the host routing table for the outbound address.
#[derive(Debug, Default)]
pub struct HostLink;

impl LinkSensor for HostLink {
    fn sample(&mut self) -> LinkStatus {
        match local_ip() {
            Ok(ip) if !ip.is_loopback() && !ip.is_unspecified() => LinkStatus { link_up: true, ip: Some(ip) },
            Ok(_) => LinkStatus { link_up: false, ip: None },
            Err(e) => {
                debug!("No local address: {}", e);
                LinkStatus { link_up: false, ip: None }
            }
        }
    }
}

/// Emits a `ConnectivityState` exactly once per change.
pub struct ConnectivityMonitor<P: LinkSensor = HostLink> {
    sensor: P,
    configured: bool,
    state: ConnectivityState,
    info: NetworkInfo,
}

impl ConnectivityMonitor<HostLink> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(HostLink, config)
    }
}

impl<P: LinkSensor> ConnectivityMonitor<P> {
    pub fn new(sensor: P, config: &Config) -> Self {
        let network = config.network();
        let ap_ssid = network.ap_ssid.unwrap_or_else(|| "StatusDial".to_string());
        Self {
            sensor,
            configured: config.has_slack_token(),
            state: ConnectivityState::Booting,
            info: NetworkInfo {
                ssid: network.ssid,
                link_up: false,
                ip: None,
                ap_ssid,
                portal_url: network.portal_url.unwrap_or_default(),
            },
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn info(&self) -> &NetworkInfo {
        &self.info
    }

    /// Sample the host and return the new state if it changed.
    pub fn poll(&mut self) -> Option<ConnectivityState> {
        let result = self.sensor.sample();
        self.info.link_up = result.link_up;
        self.info.ip = result.ip;

        if self.info.portal_url.is_empty() {
            if let Some(ip) = result.ip {
                self.info.portal_url = format!("http://{}/", ip);
            }
        }

        let next = if !self.configured {
            ConnectivityState::Unconfigured
        } else if result.link_up && result.ip.is_some() {
            ConnectivityState::Online
        } else {
            ConnectivityState::Connecting
        };

        if next != self.state {
            info!("Connectivity {:?} -> {:?}", self.state, next);
            self.state = next;
            Some(next)
        } else {
            None
        }
    }
}

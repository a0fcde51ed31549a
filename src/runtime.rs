/*
 *  runtime.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  The cooperative loop: input, connectivity, controller tick, sleep
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

use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::clock::Clock;
use crate::display::screens::render_blank;
use crate::display::{StatusController, Surface};
use crate::input::InputSource;
use crate::network::{ConnectivityMonitor, LinkSensor};
use crate::pacer::Pacer;
use crate::presence::PresenceClient;

/// Everything the loop owns. Runs on one thread; nothing here is shared.
pub struct Runtime<S, P, C, I, N>
where
    S: Surface,
    P: PresenceClient,
    C: Clock,
    I: InputSource,
    N: LinkSensor,
{
    controller: StatusController<S, P, C>,
    input: I,
    monitor: ConnectivityMonitor<N>,
    network_poll: Pacer,
    poll_interval: Duration,
}

impl<S, P, C, I, N> Runtime<S, P, C, I, N>
where
    S: Surface,
    P: PresenceClient,
    C: Clock,
    I: InputSource,
    N: LinkSensor,
{
    pub fn new(
        controller: StatusController<S, P, C>,
        input: I,
        monitor: ConnectivityMonitor<N>,
        poll_interval: Duration,
        network_poll_interval: Duration,
    ) -> Self {
        Self {
            controller,
            input,
            monitor,
            network_poll: Pacer::new(network_poll_interval),
            poll_interval,
        }
    }

    pub fn controller(&self) -> &StatusController<S, P, C> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut StatusController<S, P, C> {
        &mut self.controller
    }

    /// One pass: drain input, maybe sample the network, tick the controller.
    pub fn step(&mut self, now: Instant) {
        for event in self.input.poll_events() {
            debug!("input {:?}", event);
            self.controller.handle_input(event);
        }

        if self.network_poll.should_fire(now) {
            let change = self.monitor.poll();
            self.controller.set_network_info(self.monitor.info().clone());
            if let Some(state) = change {
                self.controller.on_connectivity(state);
            }
        }

        self.controller.tick();
    }

    /// Loop until `shutdown` is raised, then blank the panel.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        info!("Entering main loop (poll {:?})", self.poll_interval);
        // first frame before anything else happens
        self.controller.render();

        while !shutdown.load(Ordering::Relaxed) {
            self.step(Instant::now());
            std::thread::sleep(self.poll_interval);
        }

        info!("Main loop stopping, clearing display");
        render_blank(self.controller.surface_mut()).unwrap_or_else(|e| error!("Failed to clear display: {}", e));
    }
}

/*
 *  tests/controller_integration.rs
 *
 *  StatusDial - one knob, one status
 *  (c) 2020-26 Stuart Hunter
 *
 *  Controller, runtime and surface driven end to end with fakes
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

use embedded_graphics::pixelcolor::BinaryColor;
use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use statusdial::config::{Config, DisplayConfig, DriverKind, SlackConfig};
use statusdial::display::{DisplayError, DisplayManager};
use statusdial::input::ChannelInput;
use statusdial::network::{ConnectivityMonitor, LinkSensor, LinkStatus};
use statusdial::{
    Clock, ConnectivityState, ControllerSettings, Direction, InputEvent, ManualClock, RemoteProfile, Runtime, Screen,
    StatusCatalog, StatusController, Surface,
};

const EPOCH: i64 = 1_700_000_000;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Text(String),
    Present,
    Fetch,
    Set { title: String, icon: String, expire: i64 },
}

type Log = Arc<Mutex<Vec<Event>>>;

fn take(log: &Log) -> Vec<Event> {
    std::mem::take(&mut *log.lock().unwrap())
}

fn texts(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Text(t) => Some(t.clone()),
            _ => None,
        })
        .collect()
}

/// Records what would have been drawn
struct RecordingSurface {
    log: Log,
    text_size: u8,
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        128
    }

    fn height(&self) -> u32 {
        64
    }

    fn clear(&mut self) {}

    fn set_text_size(&mut self, size: u8) {
        self.text_size = size;
    }

    fn text_size(&self) -> u8 {
        self.text_size
    }

    fn set_color(&mut self, _color: BinaryColor) {}

    fn move_to(&mut self, _x: i32, _y: i32) {}

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.log.lock().unwrap().push(Event::Text(text.to_string()));
        Ok(())
    }

    fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _color: BinaryColor) -> Result<(), DisplayError> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.log.lock().unwrap().push(Event::Present);
        Ok(())
    }
}

/// Answers from a script, falls back to a fixed profile
struct ScriptedPresence {
    log: Log,
    replies: VecDeque<RemoteProfile>,
}

fn shane(status: &str, icon: &str) -> RemoteProfile {
    RemoteProfile {
        display_name: "Shane Powell".to_string(),
        status_text: status.to_string(),
        status_icon: icon.to_string(),
        expiration_epoch: 0,
        is_error: false,
    }
}

impl ScriptedPresence {
    fn next(&mut self) -> RemoteProfile {
        self.replies.pop_front().unwrap_or_else(|| shane("Available", ":white_check_mark:"))
    }
}

impl statusdial::PresenceClient for ScriptedPresence {
    fn fetch_current_status(&mut self) -> RemoteProfile {
        self.log.lock().unwrap().push(Event::Fetch);
        self.next()
    }

    fn set_status(&mut self, title: &str, icon: &str, expire_epoch: i64) -> RemoteProfile {
        self.log.lock().unwrap().push(Event::Set {
            title: title.to_string(),
            icon: icon.to_string(),
            expire: expire_epoch,
        });
        self.next()
    }
}

type TestController = StatusController<RecordingSurface, ScriptedPresence, ManualClock>;

fn controller(replies: Vec<RemoteProfile>) -> (TestController, Log, ManualClock) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let clock = ManualClock::new(EPOCH);
    let surface = RecordingSurface { log: Arc::clone(&log), text_size: 1 };
    let presence = ScriptedPresence { log: Arc::clone(&log), replies: replies.into() };
    let ctl = StatusController::new(
        StatusCatalog::default(),
        surface,
        presence,
        clock.clone(),
        ControllerSettings::default(),
    );
    (ctl, log, clock)
}

/// Online, first refresh done, log cleared
fn online(replies: Vec<RemoteProfile>) -> (TestController, Log, ManualClock) {
    let (mut ctl, log, clock) = controller(replies);
    ctl.on_connectivity(ConnectivityState::Online);
    ctl.tick();
    take(&log);
    (ctl, log, clock)
}

fn sets(events: &[Event]) -> Vec<&Event> {
    events.iter().filter(|e| matches!(e, Event::Set { .. })).collect()
}

#[test]
fn test_boot_splash_then_online_refresh() {
    let (mut ctl, log, _clock) = controller(vec![shane("Lunch", ":hamburger:")]);
    assert_eq!(ctl.state().screen(), Screen::Boot);

    ctl.render();
    assert!(texts(&take(&log)).iter().any(|t| t.starts_with("StatusDial v")));

    ctl.on_connectivity(ConnectivityState::Online);
    assert_eq!(ctl.state().screen(), Screen::Main);
    ctl.tick();

    let events = take(&log);
    let fetch_at = events.iter().position(|e| *e == Event::Fetch).unwrap();
    // placeholder drawn and presented before the call
    assert!(events[..fetch_at].contains(&Event::Text("...".to_string())));
    assert!(events[..fetch_at].contains(&Event::Present));
    assert!(!events[..fetch_at].contains(&Event::Text("Shane".to_string())));

    let after = texts(&events[fetch_at..]);
    assert!(after.contains(&"Shane".to_string()));
    assert!(after.contains(&"Lunch".to_string()));
    assert_eq!(ctl.profile().status_icon, ":hamburger:");
}

#[test]
fn test_click_on_main_sends_default_expiry() {
    let (mut ctl, log, _clock) = online(vec![shane("Available", ""), shane("Lunch", ":hamburger:")]);

    ctl.handle_input(InputEvent::Rotate(Direction::Increase));
    ctl.handle_input(InputEvent::Rotate(Direction::Increase));
    assert_eq!(ctl.catalog().entry_at(ctl.state().highlighted()).title, "Lunch");
    take(&log);

    ctl.handle_input(InputEvent::Click);
    let events = take(&log);

    let set_at = events.iter().position(|e| matches!(e, Event::Set { .. })).unwrap();
    assert_eq!(
        events[set_at],
        Event::Set { title: "Lunch".to_string(), icon: ":hamburger:".to_string(), expire: EPOCH + 3600 }
    );
    assert!(events[..set_at].contains(&Event::Text("Sending...".to_string())));
    assert!(events[..set_at].contains(&Event::Present));
    assert_eq!(ctl.state().screen(), Screen::Main);
    assert_eq!(ctl.profile().status_text, "Lunch");
}

#[test]
fn test_edited_expiry_is_sent() {
    let (mut ctl, log, _clock) = online(vec![]);
    ctl.handle_input(InputEvent::Rotate(Direction::Increase));
    ctl.handle_input(InputEvent::Rotate(Direction::Increase));

    ctl.handle_input(InputEvent::DoubleClick);
    assert_eq!(ctl.state().screen(), Screen::SetExpire);
    assert_eq!(ctl.state().edit_expiry_minutes(), 60);

    for _ in 0..45 {
        ctl.handle_input(InputEvent::Rotate(Direction::Decrease));
    }
    assert_eq!(ctl.state().edit_expiry_minutes(), 15);
    take(&log);

    ctl.handle_input(InputEvent::Click);
    let events = take(&log);
    assert_eq!(
        sets(&events),
        vec![&Event::Set { title: "Lunch".to_string(), icon: ":hamburger:".to_string(), expire: EPOCH + 900 }]
    );

    // MAIN with the sending bar is on the glass before the call goes out
    let set_at = events.iter().position(|e| matches!(e, Event::Set { .. })).unwrap();
    let before = texts(&events[..set_at]);
    assert!(before.contains(&"Sending...".to_string()));
    assert!(!before.contains(&"Expire In".to_string()));
    assert!(events[..set_at].contains(&Event::Present));
    assert_eq!(ctl.state().screen(), Screen::Main);
}

#[test]
fn test_failed_send_shows_error() {
    let (mut ctl, log, _clock) = online(vec![shane("Available", ""), RemoteProfile::error()]);
    ctl.handle_input(InputEvent::Rotate(Direction::Increase));
    take(&log);

    ctl.handle_input(InputEvent::Click);
    assert_eq!(sets(&take(&log)).len(), 1);
    assert!(ctl.profile().is_error);
    assert_eq!(ctl.state().screen(), Screen::Main);
    assert_eq!(ctl.state().highlighted(), 1);

    ctl.tick();
    let drawn = texts(&take(&log));
    assert!(drawn.contains(&"ERROR".to_string()));
    assert!(!drawn.contains(&"Shane".to_string()));
}

#[test]
fn test_expiry_follows_wall_clock_step() {
    let (mut ctl, log, clock) = online(vec![]);
    // NTP lands after boot, monotonic time is untouched
    clock.set_epoch(EPOCH + 7200);
    ctl.handle_input(InputEvent::Rotate(Direction::Increase));
    ctl.handle_input(InputEvent::Click);

    assert_eq!(
        sets(&take(&log)),
        vec![&Event::Set { title: "Coffee".to_string(), icon: ":coffee:".to_string(), expire: EPOCH + 7200 + 900 }]
    );
}

#[test]
fn test_zero_expiry_sends_zero_epoch() {
    let (mut ctl, log, _clock) = online(vec![]);
    // Available, no default expiry
    ctl.handle_input(InputEvent::Click);
    let events = take(&log);
    assert_eq!(
        sets(&events),
        vec![&Event::Set {
            title: "Available".to_string(),
            icon: ":white_check_mark:".to_string(),
            expire: 0
        }]
    );
}

#[test]
fn test_long_click_cancels_edit() {
    let (mut ctl, log, _clock) = online(vec![]);
    ctl.handle_input(InputEvent::DoubleClick);
    ctl.handle_input(InputEvent::Rotate(Direction::Increase));
    ctl.handle_input(InputEvent::LongClick);

    assert_eq!(ctl.state().screen(), Screen::Main);
    assert!(sets(&take(&log)).is_empty());
}

#[test]
fn test_scroll_follows_highlight() {
    let (mut ctl, _log, _clock) = online(vec![]);
    for _ in 0..5 {
        ctl.handle_input(InputEvent::Rotate(Direction::Increase));
    }
    assert_eq!((ctl.state().highlighted(), ctl.state().scroll_offset()), (5, 3));
    for _ in 0..2 {
        ctl.handle_input(InputEvent::Rotate(Direction::Decrease));
    }
    assert_eq!((ctl.state().highlighted(), ctl.state().scroll_offset()), (3, 3));
}

#[test]
fn test_failed_fetch_shows_error_keeps_selection() {
    let (mut ctl, log, clock) = online(vec![shane("Available", ""), RemoteProfile::error()]);
    for _ in 0..4 {
        ctl.handle_input(InputEvent::Rotate(Direction::Increase));
    }
    let before = (ctl.state().highlighted(), ctl.state().scroll_offset());

    clock.advance(Duration::from_secs(61));
    ctl.tick();

    assert!(ctl.profile().is_error);
    assert!(texts(&take(&log)).contains(&"ERROR".to_string()));
    assert_eq!((ctl.state().highlighted(), ctl.state().scroll_offset()), before);
}

#[test]
fn test_refresh_only_on_main() {
    let (mut ctl, log, clock) = online(vec![]);

    clock.advance(Duration::from_secs(30));
    ctl.tick();
    assert!(!take(&log).contains(&Event::Fetch));

    clock.advance(Duration::from_secs(31));
    ctl.tick();
    assert!(take(&log).contains(&Event::Fetch));

    ctl.handle_input(InputEvent::LongClick);
    assert_eq!(ctl.state().screen(), Screen::Wifi);
    clock.advance(Duration::from_secs(120));
    ctl.tick();
    assert!(!take(&log).contains(&Event::Fetch));
}

#[test]
fn test_locked_main_request_is_silent() {
    let (mut ctl, log, _clock) = controller(vec![]);
    ctl.on_connectivity(ConnectivityState::Connecting);
    assert_eq!(ctl.state().screen(), Screen::Wifi);
    assert!(ctl.state().settings_locked());
    ctl.render();
    take(&log);

    assert!(!ctl.request_screen(Screen::Main));
    assert!(!ctl.state().is_dirty());
    assert_eq!(ctl.state().screen(), Screen::Wifi);

    // long click counts as input, but still stays put
    ctl.handle_input(InputEvent::LongClick);
    assert_eq!(ctl.state().screen(), Screen::Wifi);
}

#[test]
fn test_unconfigured_goes_to_ap_and_clicks_are_ignored() {
    let (mut ctl, log, _clock) = controller(vec![]);
    ctl.on_connectivity(ConnectivityState::Unconfigured);
    assert_eq!(ctl.state().screen(), Screen::Ap);

    ctl.handle_input(InputEvent::Click);
    ctl.handle_input(InputEvent::DoubleClick);
    assert_eq!(ctl.state().screen(), Screen::Ap);
    assert!(sets(&take(&log)).is_empty());

    ctl.on_connectivity(ConnectivityState::Online);
    assert_eq!(ctl.state().screen(), Screen::Main);
    assert!(!ctl.state().settings_locked());
}

#[test]
fn test_screen_saver_and_wake() {
    let (mut ctl, log, clock) = online(vec![]);

    clock.advance(Duration::from_secs(60 * 60));
    ctl.tick();
    assert!(ctl.is_blanked());
    let blank = take(&log);
    assert!(blank.contains(&Event::Present));

    // blanked once, later ticks leave the panel alone
    clock.advance(Duration::from_secs(1));
    ctl.tick();
    assert!(!take(&log).contains(&Event::Present));

    ctl.handle_input(InputEvent::Rotate(Direction::Increase));
    ctl.tick();
    assert!(!ctl.is_blanked());
    assert!(take(&log).contains(&Event::Present));
}

struct FixedLink(Arc<Mutex<LinkStatus>>);

impl LinkSensor for FixedLink {
    fn sample(&mut self) -> LinkStatus {
        *self.0.lock().unwrap()
    }
}

#[test]
fn test_runtime_step_routes_input_and_connectivity() {
    let (ctl, log, clock) = controller(vec![shane("Coffee", ":coffee:")]);
    let config = Config {
        slack: Some(SlackConfig { token: Some("xoxp-test".to_string()), ..Default::default() }),
        ..Default::default()
    };
    let link = Arc::new(Mutex::new(LinkStatus::default()));
    let monitor = ConnectivityMonitor::new(FixedLink(Arc::clone(&link)), &config);
    let (tx, input) = ChannelInput::new();

    let mut runtime = Runtime::new(ctl, input, monitor, Duration::from_millis(10), Duration::from_secs(1));

    runtime.step(clock.now());
    assert_eq!(runtime.controller().state().screen(), Screen::Wifi);

    *link.lock().unwrap() = LinkStatus { link_up: true, ip: Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7))) };
    clock.advance(Duration::from_secs(1));
    runtime.step(clock.now());
    assert_eq!(runtime.controller().state().screen(), Screen::Main);
    assert_eq!(runtime.controller().network_info().portal_url, "http://10.0.0.7/");
    assert!(take(&log).contains(&Event::Fetch));

    tx.send(InputEvent::Rotate(Direction::Increase)).unwrap();
    tx.send(InputEvent::Click).unwrap();
    runtime.step(clock.now());
    assert_eq!(
        sets(&take(&log)),
        vec![&Event::Set { title: "Coffee".to_string(), icon: ":coffee:".to_string(), expire: EPOCH + 1 + 15 * 60 }]
    );
}

#[test]
fn test_main_screen_lights_mock_panel() {
    let display = DisplayConfig { driver: Some(DriverKind::Mock), ..Default::default() };
    let manager = DisplayManager::new(&display).unwrap();
    let presence = ScriptedPresence { log: Arc::new(Mutex::new(Vec::new())), replies: VecDeque::new() };
    let clock = ManualClock::new(EPOCH);

    let mut ctl = StatusController::new(
        StatusCatalog::default(),
        manager,
        presence,
        clock,
        ControllerSettings::default(),
    );
    ctl.on_connectivity(ConnectivityState::Online);
    ctl.tick();

    let frame = ctl.surface().frame();
    assert!(frame.count_on() > 0);
    // highlight band of the first selection line is lit
    assert_eq!(frame.pixel(127, 9), Some(BinaryColor::On));
}

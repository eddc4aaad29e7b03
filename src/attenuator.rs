//! The attenuator control loop.
//!
//! One [`Attenuator`] is owned by the firmware's control task and
//! ticked every `LOOP_TICK_MS`. A tick never blocks and runs its stages
//! in a fixed order, so later stages always see this tick's inputs:
//!
//! 1. debounce the three switches
//! 2. center-button gesture → command / menu / lockout
//! 3. dial rotation → command (skipped under lockout)
//! 4. status LED blink (only while synchronised with the pack)
//! 5. left toggle → pack on / off
//! 6. bargraph lifecycle and animation
//! 7. heartbeat expiry → waiting for pack
//!
//! Pack messages are applied with [`Attenuator::receive`] before the tick.

use crate::bargraph::{Bargraph, BargraphPattern};
use crate::command::{Command, CommandSink};
use crate::config::AttenuatorConfig;
use crate::dial::{DialController, DialInput, DialTick, MenuLevel};
use crate::link::{PackLinkState, PackMessage};
use crate::switch::{DebouncedSwitch, Edge};
use crate::timer::Countdown;

/// Raw switch and encoder levels for one tick.
///
/// Switch fields are true while the line reads engaged (low).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub center: bool,
    pub left_toggle: bool,
    pub right_toggle: bool,
    pub encoder_a: bool,
    pub encoder_b: bool,
}

/// Everything the status page shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub link: PackLinkState,
    pub menu: MenuLevel,
    pub lockout: bool,
    pub left_toggle_on: bool,
    pub right_toggle_on: bool,
}

pub struct Attenuator<B> {
    config: AttenuatorConfig,
    center: DebouncedSwitch,
    left: DebouncedSwitch,
    right: DebouncedSwitch,
    dial: DialController,
    link: PackLinkState,
    heartbeat: Countdown,
    blink: Countdown,
    status_led: bool,
    bargraph: B,
}

impl<B: Bargraph> Attenuator<B> {
    /// `boot` is the input state at power-up; levels already engaged
    /// then do not count as edges.
    pub fn new(config: AttenuatorConfig, bargraph: B, boot: &RawInputs, now_ms: u64) -> Self {
        let debounce = config.switch_debounce_ms;
        let mut heartbeat = Countdown::new();
        heartbeat.start(config.pack_sync_timeout_ms, now_ms);
        let mut blink = Countdown::new();
        blink.start(config.status_blink_ms, now_ms);

        Self {
            center: DebouncedSwitch::new(debounce, boot.center, now_ms),
            left: DebouncedSwitch::new(debounce, boot.left_toggle, now_ms),
            right: DebouncedSwitch::new(debounce, boot.right_toggle, now_ms),
            dial: DialController::new(&config, boot.encoder_a),
            link: PackLinkState::default(),
            heartbeat,
            blink,
            status_led: false,
            bargraph,
            config,
        }
    }

    /// Apply a message from the pack and restart the heartbeat.
    pub fn receive(&mut self, msg: PackMessage, now_ms: u64) {
        if self.link.waiting_for_pack {
            #[cfg(feature = "defmt")]
            defmt::info!("Link: pack synchronised");
        }
        self.link.apply(msg);
        self.heartbeat.start(self.config.pack_sync_timeout_ms, now_ms);
    }

    /// Run one loop iteration.
    pub fn tick<S: CommandSink>(&mut self, raw: &RawInputs, now_ms: u64, sink: &mut S) -> DialTick {
        self.center.update(raw.center, now_ms);
        self.left.update(raw.left_toggle, now_ms);
        self.right.update(raw.right_toggle, now_ms);

        let input = DialInput {
            center: self.center.edge(),
            right_toggle_on: self.right.is_engaged(),
            encoder_a: raw.encoder_a,
            encoder_b: raw.encoder_b,
        };
        let dial = self.dial.poll(&input, &self.link, now_ms, sink);

        if !self.link.waiting_for_pack && self.blink.just_finished(now_ms) {
            self.status_led = !self.status_led;
            self.blink.restart(now_ms);
        }

        self.poll_left_toggle(sink);
        self.poll_bargraph(now_ms);

        if self.heartbeat.just_finished(now_ms) {
            #[cfg(feature = "defmt")]
            if !self.link.waiting_for_pack {
                defmt::warn!("Link: pack went silent");
            }
            self.link.waiting_for_pack = true;
            self.heartbeat.restart(now_ms);
        }

        dial
    }

    fn poll_left_toggle<S: CommandSink>(&mut self, sink: &mut S) {
        match self.left.edge() {
            Some(Edge::Pressed) => {
                sink.send(Command::TurnPackOn);
                self.link.pack_on = true;
                #[cfg(feature = "defmt")]
                defmt::info!("Left toggle: pack on");
            }
            Some(Edge::Released) => {
                sink.send(Command::TurnPackOff);
                self.link.pack_on = false;
                #[cfg(feature = "defmt")]
                defmt::info!("Left toggle: pack off");
            }
            None => {}
        }
    }

    fn poll_bargraph(&mut self, now_ms: u64) {
        if self.link.pack_on {
            let fault = self.link.overheating || self.link.alarm;
            if self.bargraph.is_off() && !fault {
                self.bargraph.reset();
                self.bargraph.set_pattern(BargraphPattern::PowerRamp);
            }
        } else if !self.left.is_engaged() {
            self.bargraph.off();
        }

        self.bargraph.update(self.link.speed_multiplier, now_ms);
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            link: self.link,
            menu: self.dial.menu(),
            lockout: self.dial.is_locked_out(),
            left_toggle_on: self.left.is_engaged(),
            right_toggle_on: self.right.is_engaged(),
        }
    }

    pub fn link(&self) -> &PackLinkState {
        &self.link
    }

    pub fn dial(&self) -> &DialController {
        &self.dial
    }

    pub fn bargraph(&self) -> &B {
        &self.bargraph
    }

    /// Level the status LED should show.
    pub fn status_led(&self) -> bool {
        self.status_led
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bargraph::BargraphState;

    type Sink = heapless::Vec<Command, 8>;

    fn attenuator() -> Attenuator<BargraphState> {
        let config = AttenuatorConfig {
            switch_debounce_ms: 0,
            ..AttenuatorConfig::default()
        };
        Attenuator::new(config, BargraphState::new(), &RawInputs::default(), 0)
    }

    #[test]
    fn waits_for_pack_at_boot_and_led_stays_put() {
        let mut att = attenuator();
        let mut sink = Sink::new();
        for t in 1..=2_000 {
            att.tick(&RawInputs::default(), t, &mut sink);
        }
        assert!(att.link().waiting_for_pack);
        assert!(!att.status_led());
        assert!(sink.is_empty());
    }

    #[test]
    fn led_blinks_once_synchronised() {
        let mut att = attenuator();
        let mut sink = Sink::new();
        att.receive(PackMessage::Sync, 0);
        let mut toggles = 0;
        let mut last = att.status_led();
        for t in 1..=1_000 {
            if t % 500 == 0 {
                att.receive(PackMessage::Sync, t);
            }
            att.tick(&RawInputs::default(), t, &mut sink);
            if att.status_led() != last {
                toggles += 1;
                last = att.status_led();
            }
        }
        assert_eq!(toggles, 2);
    }

    #[test]
    fn heartbeat_expiry_sets_waiting() {
        let mut att = attenuator();
        let mut sink = Sink::new();
        att.receive(PackMessage::Sync, 10);
        att.tick(&RawInputs::default(), 3_009, &mut sink);
        assert!(!att.link().waiting_for_pack);
        att.tick(&RawInputs::default(), 3_010, &mut sink);
        assert!(att.link().waiting_for_pack);
    }

    #[test]
    fn bargraph_waits_out_overheat() {
        let mut att = attenuator();
        let mut sink = Sink::new();
        att.receive(PackMessage::Overheating(true), 0);
        let on = RawInputs {
            left_toggle: true,
            ..RawInputs::default()
        };
        att.tick(&on, 1, &mut sink);
        assert!(att.link().pack_on);
        assert!(att.bargraph().is_off());

        att.receive(PackMessage::Overheating(false), 2);
        att.tick(&on, 2, &mut sink);
        assert!(!att.bargraph().is_off());
        assert_eq!(att.bargraph().pattern(), BargraphPattern::PowerRamp);
    }

    #[test]
    fn status_reflects_dial_and_toggles() {
        let mut att = attenuator();
        let mut sink = Sink::new();
        let right = RawInputs {
            right_toggle: true,
            ..RawInputs::default()
        };
        att.tick(&right, 1, &mut sink);
        let status = att.status();
        assert!(status.right_toggle_on);
        assert!(!status.left_toggle_on);
        assert_eq!(status.menu, MenuLevel::Level1);
        assert!(!status.lockout);
    }
}

//! Rotary dial with center push-button.
//!
//! [`DialController`] owns everything the dial needs across ticks: the
//! press disambiguator, the quadrature accumulator, the menu level, the
//! lockout flag and the overheat-cancel turn counter. The main loop
//! keeps exactly one and calls [`DialController::poll`] once per tick.
//!
//! ## Components
//!
//! - **press**: short / double / long / lockout gesture resolution
//! - **rotary**: quadrature position and turn hold-off
//! - **dispatch**: gesture + menu level → pack command

pub mod dispatch;
pub mod press;
pub mod rotary;

use crate::command::CommandSink;
use crate::config::AttenuatorConfig;
use crate::link::PackLinkState;
use crate::switch::Edge;
use dispatch::OverheatCancel;
use press::{PressDisambiguator, PressResolution};
use rotary::{RotaryAccumulator, Rotation};

/// One classified interaction, recomputed every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InteractionEvent {
    NoAction,
    ShortPress,
    DoublePress,
    LongPress,
    RotateCw,
    RotateCcw,
}

/// Which dispatch table the dial uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuLevel {
    #[default]
    Level1,
    Level2,
}

impl MenuLevel {
    pub fn toggled(self) -> Self {
        match self {
            MenuLevel::Level1 => MenuLevel::Level2,
            MenuLevel::Level2 => MenuLevel::Level1,
        }
    }
}

/// Debounced inputs the dial reads on one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DialInput {
    /// Center button edge this tick.
    pub center: Option<Edge>,
    /// Right toggle debounced level.
    pub right_toggle_on: bool,
    pub encoder_a: bool,
    pub encoder_b: bool,
}

/// What the dial resolved on one tick.
///
/// `press` is one of the button events (or `NoAction`); `rotation` is
/// `RotateCw`, `RotateCcw` or `NoAction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialTick {
    pub press: InteractionEvent,
    pub rotation: InteractionEvent,
}

impl DialTick {
    pub const IDLE: DialTick = DialTick {
        press: InteractionEvent::NoAction,
        rotation: InteractionEvent::NoAction,
    };
}

#[derive(Clone, Copy, Debug)]
pub struct DialController {
    press: PressDisambiguator,
    rotary: RotaryAccumulator,
    overheat: OverheatCancel,
    overheat_min_speed: u8,
    menu: MenuLevel,
    lockout: bool,
}

impl DialController {
    /// `encoder_a` is the phase A level at boot.
    pub fn new(config: &AttenuatorConfig, encoder_a: bool) -> Self {
        Self {
            press: PressDisambiguator::new(config.double_tap_ms, config.long_press_ms),
            rotary: RotaryAccumulator::new(
                config.rotary_divisor,
                config.rotary_debounce_ms,
                encoder_a,
            ),
            overheat: OverheatCancel::new(config.overheat_cancel_turns),
            overheat_min_speed: config.overheat_cancel_min_speed,
            menu: MenuLevel::Level1,
            lockout: false,
        }
    }

    /// Run the dial for one tick, sending any resulting command to `sink`.
    pub fn poll<S: CommandSink>(
        &mut self,
        input: &DialInput,
        link: &PackLinkState,
        now_ms: u64,
        sink: &mut S,
    ) -> DialTick {
        // Phase lines are tracked even under lockout.
        self.rotary.sample(input.encoder_a, input.encoder_b);

        let press = self.poll_press(input, now_ms, sink);
        let rotation = if self.lockout {
            InteractionEvent::NoAction
        } else {
            self.poll_rotation(link, now_ms, sink)
        };

        DialTick { press, rotation }
    }

    fn poll_press<S: CommandSink>(&mut self, input: &DialInput, now_ms: u64, sink: &mut S) -> InteractionEvent {
        let event = match self.press.update(input.center, input.right_toggle_on, now_ms) {
            PressResolution::Pending => InteractionEvent::NoAction,
            PressResolution::Short => InteractionEvent::ShortPress,
            PressResolution::Double => InteractionEvent::DoublePress,
            PressResolution::Long => InteractionEvent::LongPress,
            PressResolution::LockoutToggle => {
                self.lockout = !self.lockout;
                #[cfg(feature = "defmt")]
                defmt::info!("Dial: lockout={}", self.lockout);
                return InteractionEvent::NoAction;
            }
        };

        if event == InteractionEvent::LongPress {
            self.menu = self.menu.toggled();
            #[cfg(feature = "defmt")]
            defmt::info!("Dial: menu {:?}", self.menu);
        } else if let Some(cmd) = dispatch::button_command(event, self.menu) {
            sink.send(cmd);
        }

        event
    }

    fn poll_rotation<S: CommandSink>(&mut self, link: &PackLinkState, now_ms: u64, sink: &mut S) -> InteractionEvent {
        let Some(rotation) = self.rotary.poll(now_ms) else {
            return InteractionEvent::NoAction;
        };

        if link.firing && link.speed_multiplier > self.overheat_min_speed {
            if let Some(cmd) = self.overheat.turn() {
                sink.send(cmd);
            }
        } else {
            sink.send(dispatch::rotation_command(rotation, self.menu));
        }

        match rotation {
            Rotation::Clockwise => InteractionEvent::RotateCw,
            Rotation::CounterClockwise => InteractionEvent::RotateCcw,
        }
    }

    pub fn menu(&self) -> MenuLevel {
        self.menu
    }

    pub fn is_locked_out(&self) -> bool {
        self.lockout
    }

    /// Whether a center press gesture is still being resolved.
    pub fn is_pressed(&self) -> bool {
        self.press.is_pressed()
    }

    pub fn tap_count(&self) -> u8 {
        self.press.tap_count()
    }

    pub fn overheat_turns(&self) -> u8 {
        self.overheat.turns()
    }
}

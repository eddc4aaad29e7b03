//! Bargraph lifecycle.
//!
//! The control loop only decides when the bargraph turns on, which
//! pattern it runs and when it is cleared. How segments are lit is up
//! to the [`Bargraph`] implementation.

use crate::config::{BARGRAPH_RAMP_MS, BARGRAPH_SEGMENTS};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BargraphPattern {
    #[default]
    None,
    /// Idle animation while the pack is powered.
    PowerRamp,
}

pub trait Bargraph {
    fn is_off(&self) -> bool;
    /// Clear all segments and enable the device.
    fn reset(&mut self);
    fn set_pattern(&mut self, pattern: BargraphPattern);
    /// Clear all segments and disable the device.
    fn off(&mut self);
    /// Advance the animation. Higher `speed_multiplier` divides the step delay.
    fn update(&mut self, speed_multiplier: u8, now_ms: u64);
}

/// State-only bargraph: tracks the lit level of a ramp bouncing between
/// empty and full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BargraphState {
    on: bool,
    pattern: BargraphPattern,
    level: u8,
    rising: bool,
    next_step_ms: Option<u64>,
}

impl BargraphState {
    pub const fn new() -> Self {
        Self {
            on: false,
            pattern: BargraphPattern::None,
            level: 0,
            rising: true,
            next_step_ms: None,
        }
    }

    pub fn pattern(&self) -> BargraphPattern {
        self.pattern
    }

    /// Number of lit segments.
    pub fn level(&self) -> u8 {
        self.level
    }

    fn step(&mut self) {
        if self.rising {
            self.level += 1;
            if self.level >= BARGRAPH_SEGMENTS {
                self.rising = false;
            }
        } else {
            self.level -= 1;
            if self.level == 0 {
                self.rising = true;
            }
        }
    }
}

impl Default for BargraphState {
    fn default() -> Self {
        Self::new()
    }
}

impl Bargraph for BargraphState {
    fn is_off(&self) -> bool {
        !self.on
    }

    fn reset(&mut self) {
        self.on = true;
        self.level = 0;
        self.rising = true;
        self.next_step_ms = None;
    }

    fn set_pattern(&mut self, pattern: BargraphPattern) {
        self.pattern = pattern;
    }

    fn off(&mut self) {
        self.on = false;
        self.pattern = BargraphPattern::None;
        self.level = 0;
        self.next_step_ms = None;
    }

    fn update(&mut self, speed_multiplier: u8, now_ms: u64) {
        if !self.on || self.pattern != BargraphPattern::PowerRamp {
            return;
        }

        let delay = BARGRAPH_RAMP_MS / u64::from(speed_multiplier.max(1));
        match self.next_step_ms {
            None => self.next_step_ms = Some(now_ms + delay),
            Some(due) if now_ms >= due => {
                self.step();
                self.next_step_ms = Some(now_ms + delay);
            }
            Some(_) => {}
        }
    }
}

//! Center push-button disambiguation.
//!
//! One press can end up as a short press, the first half of a double
//! press, a long press, or (with the right toggle flipped mid-hold) a
//! lockout toggle. Nothing is decided early: while a press is still
//! open and no timer has run out, the tick yields nothing.
//!
//! Priority on every tick while a press is open:
//!
//! 1. release with at least one tap already counted → double press
//! 2. double-tap window over with exactly one tap → short press
//! 3. long-press time over → lockout toggle if the right toggle moved
//!    since the press started, otherwise long press
//!
//! A release that resolves nothing is counted as a tap.

use crate::switch::Edge;
use crate::timer::Countdown;

/// What the button resolved to on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressResolution {
    Pending,
    Short,
    Double,
    Long,
    /// Long hold with the right toggle flipped: consumed silently.
    LockoutToggle,
}

/// State kept only while a press gesture is being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenPress {
    double_tap: Countdown,
    long_press: Countdown,
    taps: u8,
    right_toggle_at_start: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ButtonState {
    Idle,
    Pressed(OpenPress),
}

#[derive(Clone, Copy, Debug)]
pub struct PressDisambiguator {
    state: ButtonState,
    double_tap_ms: u64,
    long_press_ms: u64,
}

impl PressDisambiguator {
    pub const fn new(double_tap_ms: u64, long_press_ms: u64) -> Self {
        Self {
            state: ButtonState::Idle,
            double_tap_ms,
            long_press_ms,
        }
    }

    /// Whether a gesture is currently open.
    pub fn is_pressed(&self) -> bool {
        matches!(self.state, ButtonState::Pressed(_))
    }

    /// Taps counted for the open gesture (0 when idle).
    pub fn tap_count(&self) -> u8 {
        match &self.state {
            ButtonState::Idle => 0,
            ButtonState::Pressed(open) => open.taps,
        }
    }

    /// Advance one tick.
    ///
    /// `edge` is this tick's debounced edge of the center button and
    /// `right_toggle_on` the current debounced right toggle level.
    pub fn update(&mut self, edge: Option<Edge>, right_toggle_on: bool, now_ms: u64) -> PressResolution {
        if edge == Some(Edge::Pressed) {
            let taps = self.tap_count();
            let mut open = OpenPress {
                double_tap: Countdown::new(),
                long_press: Countdown::new(),
                taps,
                right_toggle_at_start: right_toggle_on,
            };
            open.double_tap.start(self.double_tap_ms, now_ms);
            open.long_press.start(self.long_press_ms, now_ms);
            self.state = ButtonState::Pressed(open);
        }

        let ButtonState::Pressed(open) = &mut self.state else {
            return PressResolution::Pending;
        };

        let released = edge == Some(Edge::Released);

        let resolution = if released && open.taps >= 1 {
            PressResolution::Double
        } else if open.double_tap.expired(now_ms) && open.taps == 1 {
            PressResolution::Short
        } else if open.long_press.expired(now_ms) {
            if open.right_toggle_at_start != right_toggle_on {
                PressResolution::LockoutToggle
            } else {
                PressResolution::Long
            }
        } else {
            if released {
                open.taps = open.taps.saturating_add(1);
            }
            PressResolution::Pending
        };

        if resolution != PressResolution::Pending {
            // Leaving `Pressed` drops both timers and the tap count.
            self.state = ButtonState::Idle;
        }

        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAP: u64 = 300;
    const LONG: u64 = 1000;

    fn machine() -> PressDisambiguator {
        PressDisambiguator::new(TAP, LONG)
    }

    /// Run idle ticks from `from` to `to` inclusive, collecting resolutions.
    fn idle(m: &mut PressDisambiguator, from: u64, to: u64, toggle: bool) -> heapless::Vec<(u64, PressResolution), 8> {
        let mut out = heapless::Vec::new();
        for t in from..=to {
            let r = m.update(None, toggle, t);
            if r != PressResolution::Pending {
                let _ = out.push((t, r));
            }
        }
        out
    }

    #[test]
    fn idle_ticks_stay_pending() {
        let mut m = machine();
        assert!(idle(&mut m, 0, 5_000, false).is_empty());
        assert!(!m.is_pressed());
    }

    #[test]
    fn single_tap_resolves_when_window_closes() {
        let mut m = machine();
        assert_eq!(m.update(Some(Edge::Pressed), false, 0), PressResolution::Pending);
        assert_eq!(m.update(Some(Edge::Released), false, 80), PressResolution::Pending);
        assert_eq!(m.tap_count(), 1);

        let events = idle(&mut m, 81, 2_000, false);
        assert_eq!(events.as_slice(), &[(TAP, PressResolution::Short)]);
        assert_eq!(m.tap_count(), 0);
    }

    #[test]
    fn second_release_is_a_double() {
        let mut m = machine();
        m.update(Some(Edge::Pressed), false, 0);
        m.update(Some(Edge::Released), false, 60);
        m.update(Some(Edge::Pressed), false, 150);
        assert_eq!(m.update(Some(Edge::Released), false, 210), PressResolution::Double);
        assert!(!m.is_pressed());
        assert!(idle(&mut m, 211, 3_000, false).is_empty());
    }

    #[test]
    fn hold_past_long_press_time() {
        let mut m = machine();
        m.update(Some(Edge::Pressed), false, 0);
        let events = idle(&mut m, 1, 1_500, false);
        assert_eq!(events.as_slice(), &[(LONG, PressResolution::Long)]);
        // Late release of the already-resolved press is ignored.
        assert_eq!(m.update(Some(Edge::Released), false, 1_600), PressResolution::Pending);
        assert_eq!(m.tap_count(), 0);
    }

    #[test]
    fn right_toggle_flipped_during_hold_toggles_lockout() {
        let mut m = machine();
        m.update(Some(Edge::Pressed), false, 0);
        assert!(idle(&mut m, 1, 400, false).is_empty());
        let events = idle(&mut m, 401, 1_200, true);
        assert_eq!(events.as_slice(), &[(LONG, PressResolution::LockoutToggle)]);
    }

    #[test]
    fn right_toggle_flipped_and_back_is_a_plain_long_press() {
        let mut m = machine();
        m.update(Some(Edge::Pressed), false, 0);
        idle(&mut m, 1, 300, true);
        let events = idle(&mut m, 301, 1_200, false);
        assert_eq!(events.as_slice(), &[(LONG, PressResolution::Long)]);
    }

    #[test]
    fn release_after_window_still_counts_as_short() {
        let mut m = machine();
        m.update(Some(Edge::Pressed), false, 0);
        assert!(idle(&mut m, 1, 500, false).is_empty());
        assert_eq!(m.update(Some(Edge::Released), false, 501), PressResolution::Pending);
        assert_eq!(m.update(None, false, 502), PressResolution::Short);
    }

    #[test]
    fn release_on_the_long_press_boundary_is_long() {
        let mut m = machine();
        m.update(Some(Edge::Pressed), false, 0);
        idle(&mut m, 1, LONG - 1, false);
        assert_eq!(m.update(Some(Edge::Released), false, LONG), PressResolution::Long);
    }
}

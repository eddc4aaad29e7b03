//! Quadrature reading of the dial and turn detection.

use crate::timer::Countdown;

/// Direction of a detected dial turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Raw quadrature position plus its scaled reading.
///
/// The divisor only scales the reading. It is kept as a float, so every
/// raw step still changes it and no detents are merged; coarsening comes
/// from the hold-off alone.
#[derive(Clone, Copy, Debug)]
pub struct RotaryAccumulator {
    raw_position: i32,
    smoothed: f32,
    last_smoothed: f32,
    last_phase_a: bool,
    divisor: f32,
    debounce: Countdown,
    debounce_ms: u64,
}

impl RotaryAccumulator {
    pub const fn new(divisor: f32, debounce_ms: u64, phase_a: bool) -> Self {
        Self {
            raw_position: 0,
            smoothed: 0.0,
            last_smoothed: 0.0,
            last_phase_a: phase_a,
            divisor,
            debounce: Countdown::new(),
            debounce_ms,
        }
    }

    /// Sample both phase lines.
    ///
    /// Only a change on phase A moves the position: A equal to B is a
    /// clockwise step, anything else counter-clockwise.
    pub fn sample(&mut self, phase_a: bool, phase_b: bool) {
        if phase_a == self.last_phase_a {
            return;
        }
        self.last_phase_a = phase_a;

        if phase_a == phase_b {
            self.raw_position = self.raw_position.wrapping_add(1);
        } else {
            self.raw_position = self.raw_position.wrapping_sub(1);
        }
        self.smoothed = self.raw_position as f32 / self.divisor;
    }

    /// Compare against the previous poll and report a turn.
    ///
    /// A turn seen while the hold-off from the previous turn is still
    /// running is swallowed. The comparison baseline always moves on.
    pub fn poll(&mut self, now_ms: u64) -> Option<Rotation> {
        let direction = if self.smoothed > self.last_smoothed {
            Some(Rotation::Clockwise)
        } else if self.smoothed < self.last_smoothed {
            Some(Rotation::CounterClockwise)
        } else {
            None
        };
        self.last_smoothed = self.smoothed;

        let direction = direction?;
        if self.debounce.is_running(now_ms) {
            return None;
        }
        self.debounce.start(self.debounce_ms, now_ms);
        Some(direction)
    }

    pub fn raw_position(&self) -> i32 {
        self.raw_position
    }

    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One quadrature half-step clockwise from the current A level.
    fn step_cw(r: &mut RotaryAccumulator, a: &mut bool) {
        *a = !*a;
        r.sample(*a, *a);
    }

    fn step_ccw(r: &mut RotaryAccumulator, a: &mut bool) {
        *a = !*a;
        r.sample(*a, !*a);
    }

    #[test]
    fn unchanged_phase_a_does_not_move() {
        let mut r = RotaryAccumulator::new(2.5, 80, false);
        for _ in 0..10 {
            r.sample(false, true);
            r.sample(false, false);
        }
        assert_eq!(r.raw_position(), 0);
        assert_eq!(r.poll(0), None);
    }

    #[test]
    fn position_is_scaled_by_divisor() {
        let mut r = RotaryAccumulator::new(2.5, 80, false);
        let mut a = false;
        for _ in 0..5 {
            step_cw(&mut r, &mut a);
        }
        assert_eq!(r.raw_position(), 5);
        assert_eq!(r.smoothed(), 2.0);
        for _ in 0..10 {
            step_ccw(&mut r, &mut a);
        }
        assert_eq!(r.raw_position(), -5);
        assert_eq!(r.smoothed(), -2.0);
    }

    #[test]
    fn reports_direction() {
        let mut r = RotaryAccumulator::new(2.5, 80, false);
        let mut a = false;
        step_cw(&mut r, &mut a);
        assert_eq!(r.poll(0), Some(Rotation::Clockwise));
        step_ccw(&mut r, &mut a);
        assert_eq!(r.poll(100), Some(Rotation::CounterClockwise));
        assert_eq!(r.poll(200), None);
    }

    #[test]
    fn hold_off_swallows_rapid_turns() {
        let mut r = RotaryAccumulator::new(2.5, 80, false);
        let mut a = false;
        step_cw(&mut r, &mut a);
        assert_eq!(r.poll(0), Some(Rotation::Clockwise));
        for t in 1..80 {
            step_ccw(&mut r, &mut a);
            assert_eq!(r.poll(t), None, "t={}", t);
        }
        step_cw(&mut r, &mut a);
        assert_eq!(r.poll(80), Some(Rotation::Clockwise));
    }

    #[test]
    fn divisor_does_not_merge_steps() {
        let mut r = RotaryAccumulator::new(2.5, 80, false);
        let mut a = false;
        let mut turns = 0;
        for i in 0..5u64 {
            step_cw(&mut r, &mut a);
            if r.poll(i * 100).is_some() {
                turns += 1;
            }
        }
        assert_eq!(turns, 5);
    }
}

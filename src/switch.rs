//! Debounced switch edges for toggles and the encoder push-button.
//!
//! All switches are active-low with internal pull-ups; callers pass in
//! whether the line currently reads "engaged" (low). The debounced
//! level only changes once the raw level has been stable for the
//! debounce period, and the change is reported as an edge for exactly
//! one `update` call.

/// Debounced edge on a switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Became engaged (pressed / toggled on).
    Pressed,
    /// Became disengaged (released / toggled off).
    Released,
}

#[derive(Clone, Copy, Debug)]
pub struct DebouncedSwitch {
    debounce_ms: u64,
    engaged: bool,
    last_raw: bool,
    last_raw_change_ms: u64,
    edge: Option<Edge>,
}

impl DebouncedSwitch {
    /// Create a switch whose debounced level starts at `engaged`.
    ///
    /// Capturing the boot level means a toggle already on at power-up
    /// does not produce an edge on the first tick.
    pub const fn new(debounce_ms: u64, engaged: bool, now_ms: u64) -> Self {
        Self {
            debounce_ms,
            engaged,
            last_raw: engaged,
            last_raw_change_ms: now_ms,
            edge: None,
        }
    }

    /// Feed the raw level for this tick.
    pub fn update(&mut self, raw_engaged: bool, now_ms: u64) {
        self.edge = None;

        if raw_engaged != self.last_raw {
            self.last_raw = raw_engaged;
            self.last_raw_change_ms = now_ms;
        }

        let stable_for = now_ms.saturating_sub(self.last_raw_change_ms);
        if self.last_raw != self.engaged && stable_for >= self.debounce_ms {
            self.engaged = self.last_raw;
            self.edge = Some(if self.engaged {
                Edge::Pressed
            } else {
                Edge::Released
            });
        }
    }

    /// Edge produced by the last `update`, if any.
    pub fn edge(&self) -> Option<Edge> {
        self.edge
    }

    pub fn is_pressed(&self) -> bool {
        self.edge == Some(Edge::Pressed)
    }

    pub fn is_released(&self) -> bool {
        self.edge == Some(Edge::Released)
    }

    /// Debounced level.
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

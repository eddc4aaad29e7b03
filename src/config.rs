//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// Center button gestures

/// Window after a press in which a second press counts as a double tap (ms).
pub const CENTER_DOUBLE_TAP_MS: u64 = 300;

/// Hold time after which a press becomes a long press (ms).
pub const CENTER_LONG_PRESS_MS: u64 = 1000;

// Rotary dial

/// Hold-off after a dispatched rotation before the next one is accepted (ms).
pub const ROTARY_DEBOUNCE_MS: u64 = 80;

/// Raw quadrature steps are divided by this to get the compared value.
pub const ROTARY_DIVISOR: f32 = 2.5;

/// Dial turns needed to cancel an overheat warning while firing fast.
pub const OVERHEAT_CANCEL_TURNS: u8 = 5;

/// Rotation only counts towards overheat cancel above this speed multiplier.
pub const OVERHEAT_CANCEL_MIN_SPEED: u8 = 2;

// Switches

/// Toggle / push-button debounce time (ms).
pub const SWITCH_DEBOUNCE_MS: u64 = 50;

// Pack link

/// Silence from the pack longer than this marks the link as lost (ms).
pub const PACK_SYNC_TIMEOUT_MS: u64 = 3000;

/// Status LED blink half-period while synchronised with the pack (ms).
pub const STATUS_BLINK_MS: u64 = 500;

/// Serial baud rate to the pack controller.
pub const PACK_BAUD: u32 = 9600;

/// Start / end markers around every serial frame.
pub const FRAME_START: u8 = 0x7E;
pub const FRAME_END: u8 = 0x81;

/// Full frame length: start, id, value (LE u16), end.
pub const FRAME_LEN: usize = 5;

// Bargraph

/// Number of bargraph segments driven by the ramp pattern.
pub const BARGRAPH_SEGMENTS: u8 = 28;

/// Base delay between ramp steps at speed multiplier 1 (ms).
pub const BARGRAPH_RAMP_MS: u64 = 40;

// Main loop

/// Control loop period (ms).
pub const LOOP_TICK_MS: u64 = 1;

/// Depth of the outbound command queue between the loop and the UART task.
pub const COMMAND_QUEUE_DEPTH: usize = 8;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; the actual `embassy_nrf::peripherals::*` pins
// are picked in `main.rs`.  Adjust for your custom PCB.
//
//   Left toggle     → P0.11
//   Right toggle    → P0.12
//   Encoder center  → P0.24
//   Encoder A       → P0.25
//   Encoder B       → P1.00
//   Pack UART RXD   → P0.08
//   Pack UART TXD   → P0.06
//   Status LED      → P0.13

/// Runtime copy of the timing constants.
///
/// Boards that need different feel (or tests that want zero debounce)
/// override individual fields on top of `Default`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttenuatorConfig {
    pub double_tap_ms: u64,
    pub long_press_ms: u64,
    pub rotary_debounce_ms: u64,
    pub rotary_divisor: f32,
    pub overheat_cancel_turns: u8,
    pub overheat_cancel_min_speed: u8,
    pub switch_debounce_ms: u64,
    pub pack_sync_timeout_ms: u64,
    pub status_blink_ms: u64,
}

impl Default for AttenuatorConfig {
    fn default() -> Self {
        Self {
            double_tap_ms: CENTER_DOUBLE_TAP_MS,
            long_press_ms: CENTER_LONG_PRESS_MS,
            rotary_debounce_ms: ROTARY_DEBOUNCE_MS,
            rotary_divisor: ROTARY_DIVISOR,
            overheat_cancel_turns: OVERHEAT_CANCEL_TURNS,
            overheat_cancel_min_speed: OVERHEAT_CANCEL_MIN_SPEED,
            switch_debounce_ms: SWITCH_DEBOUNCE_MS,
            pack_sync_timeout_ms: PACK_SYNC_TIMEOUT_MS,
            status_blink_ms: STATUS_BLINK_MS,
        }
    }
}

//! Control core for the attenuator accessory.
//!
//! Everything that decides *what* the attenuator does lives here and is
//! plain `no_std` logic that runs on the host:
//!
//! - [`dial`] - rotary dial + center button → gestures → pack commands
//! - [`attenuator`] - the per-tick control loop tying switches, dial,
//!   bargraph and pack heartbeat together
//! - [`link`] - serial framing and pack state
//! - [`web`] - dashboard routes onto the same command vocabulary
//!
//! Usage: `cargo test --lib` / `cargo test --test integration`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and only wires these modules to GPIO and UARTE.

#![cfg_attr(not(test), no_std)]

pub mod attenuator;
pub mod bargraph;
pub mod command;
pub mod config;
pub mod dial;
pub mod error;
pub mod link;
pub mod switch;
pub mod timer;
pub mod web;

pub use attenuator::{Attenuator, RawInputs, StatusSnapshot};
pub use command::{Command, CommandSink};
pub use dial::{InteractionEvent, MenuLevel};

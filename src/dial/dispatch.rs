//! Gesture → command mapping.
//!
//! | Gesture      | Level 1           | Level 2              |
//! |--------------|-------------------|----------------------|
//! | short press  | music start/stop  | next track           |
//! | double press | toggle mute       | previous track       |
//! | long press   | go to level 2     | go to level 1        |
//! | turn CW      | master volume up  | effects volume up    |
//! | turn CCW     | master volume down| effects volume down  |

use super::rotary::Rotation;
use super::{InteractionEvent, MenuLevel};
use crate::command::Command;

/// Command for a center-button event at the given menu level.
///
/// Long press has no command; it only switches menu level.
pub fn button_command(event: InteractionEvent, menu: MenuLevel) -> Option<Command> {
    match (event, menu) {
        (InteractionEvent::ShortPress, MenuLevel::Level1) => Some(Command::MusicStartStop),
        (InteractionEvent::ShortPress, MenuLevel::Level2) => Some(Command::MusicNextTrack),
        (InteractionEvent::DoublePress, MenuLevel::Level1) => Some(Command::ToggleMute),
        (InteractionEvent::DoublePress, MenuLevel::Level2) => Some(Command::MusicPrevTrack),
        _ => None,
    }
}

/// Volume command for a dial turn outside the overheat-cancel condition.
pub fn rotation_command(rotation: Rotation, menu: MenuLevel) -> Command {
    match (rotation, menu) {
        (Rotation::Clockwise, MenuLevel::Level1) => Command::VolumeIncrease,
        (Rotation::Clockwise, MenuLevel::Level2) => Command::VolumeSoundEffectsIncrease,
        (Rotation::CounterClockwise, MenuLevel::Level1) => Command::VolumeDecrease,
        (Rotation::CounterClockwise, MenuLevel::Level2) => Command::VolumeSoundEffectsDecrease,
    }
}

/// Counts turns, either direction, towards an overheat warning cancel.
#[derive(Clone, Copy, Debug)]
pub struct OverheatCancel {
    turns: u8,
    required: u8,
}

impl OverheatCancel {
    pub const fn new(required: u8) -> Self {
        Self { turns: 0, required }
    }

    /// Register one turn. Returns the cancel command on every
    /// `required`-th turn and starts counting again.
    pub fn turn(&mut self) -> Option<Command> {
        self.turns = self.turns.saturating_add(1);
        if self.turns >= self.required {
            self.turns = 0;
            Some(Command::WarningCancelled)
        } else {
            None
        }
    }

    pub fn turns(&self) -> u8 {
        self.turns
    }
}

//! Outbound commands to the pack controller.
//!
//! Every action the dial, the toggles, or the web dashboard can take is
//! one of these. Sending is fire-and-forget: the pack never acknowledges
//! an individual command.

/// A command for the pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    TurnPackOn,
    TurnPackOff,
    Attenuate,
    Vent,
    LockoutStart,
    LockoutCancel,
    /// Dismiss the overheat warning during a long, fast firing.
    WarningCancelled,
    ToggleMute,
    /// Master volume.
    VolumeIncrease,
    VolumeDecrease,
    VolumeSoundEffectsIncrease,
    VolumeSoundEffectsDecrease,
    VolumeMusicIncrease,
    VolumeMusicDecrease,
    MusicStartStop,
    MusicPauseResume,
    MusicNextTrack,
    MusicPrevTrack,
    MusicLoopToggle,
    /// Play a specific track number.
    MusicSelect(u16),
}

impl Command {
    /// Wire id byte.
    pub const fn id(&self) -> u8 {
        match self {
            Command::TurnPackOn => 0x01,
            Command::TurnPackOff => 0x02,
            Command::Attenuate => 0x03,
            Command::Vent => 0x04,
            Command::LockoutStart => 0x05,
            Command::LockoutCancel => 0x06,
            Command::WarningCancelled => 0x07,
            Command::ToggleMute => 0x10,
            Command::VolumeIncrease => 0x11,
            Command::VolumeDecrease => 0x12,
            Command::VolumeSoundEffectsIncrease => 0x13,
            Command::VolumeSoundEffectsDecrease => 0x14,
            Command::VolumeMusicIncrease => 0x15,
            Command::VolumeMusicDecrease => 0x16,
            Command::MusicStartStop => 0x20,
            Command::MusicPauseResume => 0x21,
            Command::MusicNextTrack => 0x22,
            Command::MusicPrevTrack => 0x23,
            Command::MusicLoopToggle => 0x24,
            Command::MusicSelect(_) => 0x25,
        }
    }

    /// Wire value; zero for commands without a parameter.
    pub const fn value(&self) -> u16 {
        match self {
            Command::MusicSelect(track) => *track,
            _ => 0,
        }
    }
}

/// Where dispatched commands go.
///
/// The firmware backs this with a channel to the UART task; tests
/// capture into a `heapless::Vec`.
pub trait CommandSink {
    fn send(&mut self, cmd: Command);
}

/// Capture sink. Commands beyond capacity are dropped, same as a full
/// serial queue.
impl<const N: usize> CommandSink for heapless::Vec<Command, N> {
    fn send(&mut self, cmd: Command) {
        let _ = self.push(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Command; 20] = [
        Command::TurnPackOn,
        Command::TurnPackOff,
        Command::Attenuate,
        Command::Vent,
        Command::LockoutStart,
        Command::LockoutCancel,
        Command::WarningCancelled,
        Command::ToggleMute,
        Command::VolumeIncrease,
        Command::VolumeDecrease,
        Command::VolumeSoundEffectsIncrease,
        Command::VolumeSoundEffectsDecrease,
        Command::VolumeMusicIncrease,
        Command::VolumeMusicDecrease,
        Command::MusicStartStop,
        Command::MusicPauseResume,
        Command::MusicNextTrack,
        Command::MusicPrevTrack,
        Command::MusicLoopToggle,
        Command::MusicSelect(0),
    ];

    #[test]
    fn ids_are_unique() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.id(), b.id(), "{:?} and {:?} share an id", a, b);
            }
        }
    }

    #[test]
    fn only_music_select_carries_a_value() {
        assert_eq!(Command::MusicSelect(42).value(), 42);
        for cmd in &ALL[..19] {
            assert_eq!(cmd.value(), 0);
        }
    }

    #[test]
    fn vec_sink_drops_overflow() {
        let mut sink: heapless::Vec<Command, 2> = heapless::Vec::new();
        sink.send(Command::TurnPackOn);
        sink.send(Command::Vent);
        sink.send(Command::TurnPackOff);
        assert_eq!(sink.as_slice(), &[Command::TurnPackOn, Command::Vent]);
    }
}

//! Serial link to the pack controller.
//!
//! Both directions use the same 5-byte frame:
//!
//! ```text
//! [FRAME_START][id][value lo][value hi][FRAME_END]
//! ```
//!
//! Outbound ids come from [`Command::id`]; inbound ids decode into
//! [`PackMessage`] and are folded into [`PackLinkState`].

use crate::command::Command;
use crate::config::{FRAME_END, FRAME_LEN, FRAME_START};
use crate::error::FrameError;

/// Frame bytes for an outbound command.
pub fn encode_command(cmd: Command) -> [u8; FRAME_LEN] {
    let [lo, hi] = cmd.value().to_le_bytes();
    [FRAME_START, cmd.id(), lo, hi, FRAME_END]
}

/// A status update from the pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PackMessage {
    /// Keep-alive with no payload.
    Sync,
    PackPower(bool),
    Firing(bool),
    Overheating(bool),
    Alarm(bool),
    SpeedMultiplier(u8),
    VolumeMaster(u8),
    VolumeEffects(u8),
    VolumeMusic(u8),
    MusicTrack(u16),
    /// Operating mode id (0 original, 1 super hero).
    Mode(u8),
    /// Year/theme id.
    Theme(u8),
    Cyclotron(CyclotronState),
    WandConnected(bool),
    WandPower(bool),
    /// Boost output in hundredths of a volt.
    BatteryVoltage(u16),
    MusicStart(u16),
    MusicEnd(u16),
}

/// Cyclotron health as reported by the pack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CyclotronState {
    #[default]
    Normal,
    Active,
    Warning,
    Critical,
    Recovery,
}

impl CyclotronState {
    /// Unknown codes read as `Normal`.
    pub const fn from_code(code: u16) -> Self {
        match code {
            1 => CyclotronState::Active,
            2 => CyclotronState::Warning,
            3 => CyclotronState::Critical,
            4 => CyclotronState::Recovery,
            _ => CyclotronState::Normal,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CyclotronState::Normal => "Normal",
            CyclotronState::Active => "Active",
            CyclotronState::Warning => "Warning",
            CyclotronState::Critical => "Critical",
            CyclotronState::Recovery => "Recovery",
        }
    }
}

impl PackMessage {
    fn from_parts(id: u8, value: u16) -> Result<Self, FrameError> {
        let flag = value != 0;
        let byte = value.min(u8::MAX as u16) as u8;
        let msg = match id {
            0x01 => PackMessage::Sync,
            0x02 => PackMessage::PackPower(flag),
            0x03 => PackMessage::Firing(flag),
            0x04 => PackMessage::Overheating(flag),
            0x05 => PackMessage::Alarm(flag),
            0x06 => PackMessage::SpeedMultiplier(byte),
            0x07 => PackMessage::Mode(byte),
            0x08 => PackMessage::Theme(byte),
            0x09 => PackMessage::Cyclotron(CyclotronState::from_code(value)),
            0x0A => PackMessage::WandConnected(flag),
            0x0B => PackMessage::WandPower(flag),
            0x0C => PackMessage::BatteryVoltage(value),
            0x10 => PackMessage::VolumeMaster(byte),
            0x11 => PackMessage::VolumeEffects(byte),
            0x12 => PackMessage::VolumeMusic(byte),
            0x20 => PackMessage::MusicTrack(value),
            0x21 => PackMessage::MusicStart(value),
            0x22 => PackMessage::MusicEnd(value),
            other => return Err(FrameError::UnknownId(other)),
        };
        Ok(msg)
    }
}

/// Decode one complete frame.
pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> Result<PackMessage, FrameError> {
    if frame[0] != FRAME_START {
        return Err(FrameError::BadStart);
    }
    if frame[4] != FRAME_END {
        return Err(FrameError::BadEnd);
    }
    PackMessage::from_parts(frame[1], u16::from_le_bytes([frame[2], frame[3]]))
}

/// Byte-at-a-time frame decoder.
///
/// Bytes before a start marker are discarded, so a reader that joins
/// mid-frame resynchronises on the next frame. A frame with a bad end
/// marker is rescanned from its next start byte, so a truncated frame
/// does not swallow the one behind it.
#[derive(Clone, Debug, Default)]
pub struct FrameReader {
    buf: [u8; FRAME_LEN],
    len: usize,
}

impl FrameReader {
    pub const fn new() -> Self {
        Self {
            buf: [0; FRAME_LEN],
            len: 0,
        }
    }

    /// Feed one byte; returns a result once a full frame has arrived.
    pub fn push(&mut self, byte: u8) -> Option<Result<PackMessage, FrameError>> {
        if self.len == 0 && byte != FRAME_START {
            return None;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        if self.len < FRAME_LEN {
            return None;
        }
        self.len = 0;
        let result = decode_frame(&self.buf);
        if matches!(result, Err(FrameError::BadEnd)) {
            self.rescan();
        }
        Some(result)
    }

    fn rescan(&mut self) {
        if let Some(i) = self.buf[1..].iter().position(|&b| b == FRAME_START) {
            let start = i + 1;
            self.buf.copy_within(start.., 0);
            self.len = FRAME_LEN - start;
        }
    }
}

/// What the attenuator knows about the pack.
///
/// Mostly written by pack messages; `pack_on` is also driven by the
/// left toggle and `waiting_for_pack` by the heartbeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackLinkState {
    pub pack_on: bool,
    pub firing: bool,
    pub overheating: bool,
    pub alarm: bool,
    /// Cyclotron speed-up factor; never below 1.
    pub speed_multiplier: u8,
    pub waiting_for_pack: bool,
    pub volume_master: u8,
    pub volume_effects: u8,
    pub volume_music: u8,
    pub music_track: u16,
    /// First and last track numbers on the pack's card.
    pub music_start: u16,
    pub music_end: u16,
    pub mode_id: u8,
    pub theme_id: u8,
    pub cyclotron: CyclotronState,
    pub wand_connected: bool,
    pub wand_powered: bool,
    /// Hundredths of a volt.
    pub battery_centivolts: u16,
}

impl Default for PackLinkState {
    fn default() -> Self {
        Self {
            pack_on: false,
            firing: false,
            overheating: false,
            alarm: false,
            speed_multiplier: 1,
            waiting_for_pack: true,
            volume_master: 0,
            volume_effects: 0,
            volume_music: 0,
            music_track: 0,
            music_start: 0,
            music_end: 0,
            mode_id: 0,
            theme_id: 0,
            cyclotron: CyclotronState::Normal,
            wand_connected: false,
            wand_powered: false,
            battery_centivolts: 0,
        }
    }
}

impl PackLinkState {
    /// Fold a pack message in. Any message counts as contact.
    pub fn apply(&mut self, msg: PackMessage) {
        self.waiting_for_pack = false;
        match msg {
            PackMessage::Sync => {}
            PackMessage::PackPower(on) => self.pack_on = on,
            PackMessage::Firing(on) => self.firing = on,
            PackMessage::Overheating(on) => self.overheating = on,
            PackMessage::Alarm(on) => self.alarm = on,
            PackMessage::SpeedMultiplier(s) => self.speed_multiplier = s.max(1),
            PackMessage::VolumeMaster(v) => self.volume_master = v,
            PackMessage::VolumeEffects(v) => self.volume_effects = v,
            PackMessage::VolumeMusic(v) => self.volume_music = v,
            PackMessage::MusicTrack(t) => self.music_track = t,
            PackMessage::MusicStart(t) => self.music_start = t,
            PackMessage::MusicEnd(t) => self.music_end = t,
            PackMessage::Mode(m) => self.mode_id = m,
            PackMessage::Theme(t) => self.theme_id = t,
            PackMessage::Cyclotron(c) => self.cyclotron = c,
            PackMessage::WandConnected(on) => self.wand_connected = on,
            PackMessage::WandPower(on) => self.wand_powered = on,
            PackMessage::BatteryVoltage(cv) => self.battery_centivolts = cv,
        }
    }
}

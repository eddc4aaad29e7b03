//! Web dashboard command surface.
//!
//! The dashboard mirrors the dial: every button on the page maps onto a
//! [`Command`] from the same vocabulary the physical controls use. This
//! module owns that mapping and the JSON shape of the status pushes, so
//! the wireless front-end only moves bytes.

use core::fmt::{self, Write};

use crate::attenuator::StatusSnapshot;
use crate::command::Command;
use crate::dial::MenuLevel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Put,
    Delete,
}

/// What a dashboard request resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    /// Forward to the pack.
    Command(Command),
    /// Current status snapshot as JSON.
    Status,
    /// Device preferences.
    Config,
    /// Reboot the device.
    Restart,
}

/// Resolve a request line. `path` may carry a query string.
pub fn route(method: Method, path: &str) -> Option<Route> {
    let (path, query) = match path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path, None),
    };

    match method {
        Method::Get => match path {
            "/status" => Some(Route::Status),
            "/config/attenuator" => Some(Route::Config),
            _ => None,
        },
        Method::Delete => match path {
            "/restart" => Some(Route::Restart),
            _ => None,
        },
        Method::Put => command_for(path, query).map(Route::Command),
    }
}

fn command_for(path: &str, query: Option<&str>) -> Option<Command> {
    let cmd = match path {
        "/pack/on" => Command::TurnPackOn,
        "/pack/off" => Command::TurnPackOff,
        "/pack/attenuate" => Command::Attenuate,
        "/pack/vent" => Command::Vent,
        "/pack/lockout/start" => Command::LockoutStart,
        "/pack/lockout/cancel" => Command::LockoutCancel,
        "/volume/toggle" => Command::ToggleMute,
        "/volume/master/up" => Command::VolumeIncrease,
        "/volume/master/down" => Command::VolumeDecrease,
        "/volume/effects/up" => Command::VolumeSoundEffectsIncrease,
        "/volume/effects/down" => Command::VolumeSoundEffectsDecrease,
        "/volume/music/up" => Command::VolumeMusicIncrease,
        "/volume/music/down" => Command::VolumeMusicDecrease,
        "/music/startstop" => Command::MusicStartStop,
        "/music/pauseresume" => Command::MusicPauseResume,
        "/music/next" => Command::MusicNextTrack,
        "/music/prev" => Command::MusicPrevTrack,
        "/music/loop" => Command::MusicLoopToggle,
        "/music/select" => Command::MusicSelect(track_param(query?)?),
        _ => return None,
    };
    Some(cmd)
}

fn track_param(query: &str) -> Option<u16> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "track")
        .and_then(|(_, value)| value.parse().ok())
}

/// Messages arriving on the status event stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamMessage<'a> {
    /// Client keep-alive.
    Heartbeat,
    Other(&'a str),
}

pub fn parse_stream_message(text: &str) -> StreamMessage<'_> {
    match text.trim() {
        "heartbeat" => StreamMessage::Heartbeat,
        other => StreamMessage::Other(other),
    }
}

fn on_off(on: bool, yes: &'static str, no: &'static str) -> &'static str {
    if on {
        yes
    } else {
        no
    }
}

fn mode_name(id: u8) -> &'static str {
    match id {
        0 => "Original",
        1 => "Super Hero",
        _ => "Unknown",
    }
}

fn theme_name(id: u8) -> &'static str {
    match id {
        2 => "1984",
        3 => "1989",
        4 => "Afterlife",
        5 => "Frozen Empire",
        _ => "Unknown",
    }
}

/// Render a status snapshot as the flat JSON object the dashboard reads.
pub fn write_status_json<W: Write>(status: &StatusSnapshot, out: &mut W) -> fmt::Result {
    let link = &status.link;
    let temperature = if link.overheating {
        "Venting"
    } else if link.alarm {
        "Alarm"
    } else {
        "Normal"
    };
    let menu = match status.menu {
        MenuLevel::Level1 => 1,
        MenuLevel::Level2 => 2,
    };

    // The dashboard ignores objects without non-empty `mode` and `theme`.
    write!(out, "{{")?;
    write!(out, "\"mode\":\"{}\",", mode_name(link.mode_id))?;
    write!(out, "\"modeID\":{},", link.mode_id)?;
    write!(out, "\"theme\":\"{}\",", theme_name(link.theme_id))?;
    write!(out, "\"themeID\":{},", link.theme_id)?;
    write!(out, "\"pack\":\"{}\",", on_off(link.pack_on, "Powered", "Idle"))?;
    write!(out, "\"firing\":\"{}\",", on_off(link.firing, "Firing", "Idle"))?;
    write!(out, "\"temperature\":\"{}\",", temperature)?;
    write!(out, "\"cyclotron\":\"{}\",", link.cyclotron.name())?;
    write!(out, "\"wand\":\"{}\",", on_off(link.wand_connected, "Connected", "Disconnected"))?;
    write!(out, "\"wandPower\":\"{}\",", on_off(link.wand_powered, "Powered", "Idle"))?;
    write!(
        out,
        "\"battVoltage\":{}.{:02},",
        link.battery_centivolts / 100,
        link.battery_centivolts % 100
    )?;
    write!(out, "\"speed\":{},", link.speed_multiplier)?;
    write!(out, "\"volMaster\":{},", link.volume_master)?;
    write!(out, "\"volEffects\":{},", link.volume_effects)?;
    write!(out, "\"volMusic\":{},", link.volume_music)?;
    write!(out, "\"musicStart\":{},", link.music_start)?;
    write!(out, "\"musicEnd\":{},", link.music_end)?;
    write!(out, "\"musicCurrent\":{},", link.music_track)?;
    write!(out, "\"menu\":{},", menu)?;
    write!(out, "\"lockout\":{},", status.lockout)?;
    write!(out, "\"link\":\"{}\"", on_off(link.waiting_for_pack, "Waiting", "Synchronized"))?;
    write!(out, "}}")
}

/// Fixed-size buffer large enough for any status object.
pub type StatusJson = heapless::String<512>;

pub fn status_json(status: &StatusSnapshot) -> Result<StatusJson, fmt::Error> {
    let mut out = StatusJson::new();
    write_status_json(status, &mut out)?;
    Ok(out)
}

//! Error types for the serial link plumbing.
//!
//! The dial / dispatch core cannot fail; only the pack link can.
//! We avoid `alloc` - all error variants carry only fixed-size data.

/// Top-level error type used by the firmware tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// UARTE read or write failed.
    Serial,

    /// A frame from the pack could not be decoded.
    Frame(FrameError),

    /// Outbound command queue was full; the command was dropped.
    ChannelFull,
}

/// Reasons an inbound frame is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// First byte was not the start marker.
    BadStart,
    /// Last byte was not the end marker.
    BadEnd,
    /// Well-formed frame carrying an id we do not understand.
    UnknownId(u8),
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

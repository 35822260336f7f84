use core::fmt;

use crate::encoder::EncodeError;
use crate::transport::TransportError;

/// Error type for queue and reconciler operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The command name or code has no encoder mapping
    UnknownCommand,
    /// The backlog already holds `MAX_QUEUE_DEPTH` entries
    QueueFull,
    /// The transmitter throttled the request, backoff already applied
    RateLimited,
    /// Any other transport failure
    Transport,
    /// The axis has no effect in the current device mode
    AxisLocked,
}

impl From<EncodeError> for Error {
    fn from(error: EncodeError) -> Self {
        match error {
            EncodeError::UnknownCommand(_) => Self::UnknownCommand,
        }
    }
}

impl From<TransportError> for Error {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::RateLimited => Self::RateLimited,
            TransportError::Failed => Self::Transport,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand => f.write_str("unknown IR command"),
            Self::QueueFull => f.write_str("command queue full"),
            Self::RateLimited => f.write_str("too many IR commands"),
            Self::Transport => f.write_str("IR transmission failed"),
            Self::AxisLocked => f.write_str("axis is locked in the current mode"),
        }
    }
}

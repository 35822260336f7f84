use crate::command::{Command, Frame};

/// Failure reported by the IR transmitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The transmitter refused the frame because too many were sent recently
    RateLimited,
    Failed,
}

/// Abstract infrared transmitter
///
/// Implement this trait to support different hardware platforms.
/// The command queue is generic over this trait and is the only caller.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Transmit a pre-encoded frame `repetitions` times
    async fn transmit(&mut self, frame: &Frame, repetitions: u8) -> Result<(), TransportError>;

    /// Transmit a symbolic command resolved by the transmitter itself
    async fn transmit_named(
        &mut self,
        command: Command,
        repetitions: u8,
    ) -> Result<(), TransportError>;
}

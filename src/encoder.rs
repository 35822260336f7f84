//! Frame encoding contract and the reference NEC encoder.

use crate::command::Frame;

/// Error returned by a [`FrameEncoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    UnknownCommand(u32),
}

/// Converts a command code into a transmittable frame.
///
/// Implementations must be pure: the same code always yields the same frame.
pub trait FrameEncoder {
    fn encode(&self, code: u32) -> Result<Frame, EncodeError>;
}

/// NEC encoder producing one symbol per data bit.
///
/// The frame is `address, !address, command, !command`, each byte sent
/// least significant bit first.
#[derive(Debug, Clone, Copy)]
pub struct NecEncoder {
    address: u8,
}

impl NecEncoder {
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    pub const fn address(&self) -> u8 {
        self.address
    }
}

impl Default for NecEncoder {
    fn default() -> Self {
        Self::new(0x00)
    }
}

impl FrameEncoder for NecEncoder {
    fn encode(&self, code: u32) -> Result<Frame, EncodeError> {
        let command = u8::try_from(code).map_err(|_| EncodeError::UnknownCommand(code))?;

        let bytes = [self.address, !self.address, command, !command];
        let mut symbols = [0u8; 32];
        for (i, byte) in bytes.iter().enumerate() {
            for bit in 0..8 {
                symbols[i * 8 + bit] = (byte >> bit) & 1;
            }
        }

        Frame::from_symbols(&symbols).ok_or(EncodeError::UnknownCommand(code))
    }
}

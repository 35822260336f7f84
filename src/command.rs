//! Command vocabulary of the projector remote and transmittable frames.

use heapless::Vec;

const COMMAND_NAME_POWER: &str = "Power";
const COMMAND_NAME_TIMER: &str = "Timer";
const COMMAND_NAME_NEBULA: &str = "Nebula";
const COMMAND_NAME_NEBULA_BRIGHTNESS_UP: &str = "NebulaBrightness+";
const COMMAND_NAME_NEBULA_BRIGHTNESS_DOWN: &str = "NebulaBrightness-";
const COMMAND_NAME_NEBULA_SPEED_UP: &str = "NebulaSpeed+";
const COMMAND_NAME_NEBULA_SPEED_DOWN: &str = "NebulaSpeed-";
const COMMAND_NAME_STAR: &str = "Star";
const COMMAND_NAME_STAR_BREATHING_UP: &str = "StarBreathing+";
const COMMAND_NAME_STAR_BREATHING_DOWN: &str = "StarBreathing-";
const COMMAND_NAME_STAR_BRIGHTNESS_UP: &str = "StarBrightness+";
const COMMAND_NAME_STAR_BRIGHTNESS_DOWN: &str = "StarBrightness-";
const COMMAND_NAME_REPEAT: &str = "Repeat";

const COMMAND_CODE_POWER: u8 = 0x45;
const COMMAND_CODE_TIMER: u8 = 0x47;
const COMMAND_CODE_NEBULA: u8 = 0x44;
const COMMAND_CODE_NEBULA_BRIGHTNESS_UP: u8 = 0x09;
const COMMAND_CODE_NEBULA_BRIGHTNESS_DOWN: u8 = 0x15;
const COMMAND_CODE_NEBULA_SPEED_UP: u8 = 0x43;
const COMMAND_CODE_NEBULA_SPEED_DOWN: u8 = 0x40;
const COMMAND_CODE_STAR: u8 = 0xFF;
const COMMAND_CODE_STAR_BREATHING_UP: u8 = 0x19;
const COMMAND_CODE_STAR_BREATHING_DOWN: u8 = 0x46;
const COMMAND_CODE_STAR_BRIGHTNESS_UP: u8 = 0x0D;
const COMMAND_CODE_STAR_BRIGHTNESS_DOWN: u8 = 0x07;

/// Maximum number of pulse symbols a frame can hold
pub const FRAME_CAPACITY: usize = 64;

/// Symbolic projector commands known to the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Power,
    Timer,
    Nebula,
    NebulaBrightnessUp,
    NebulaBrightnessDown,
    NebulaSpeedUp,
    NebulaSpeedDown,
    Star,
    StarBreathingUp,
    StarBreathingDown,
    StarBrightnessUp,
    StarBrightnessDown,
    /// NEC "hold" signal used for long-press bursts
    Repeat,
}

impl Command {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Power => COMMAND_NAME_POWER,
            Self::Timer => COMMAND_NAME_TIMER,
            Self::Nebula => COMMAND_NAME_NEBULA,
            Self::NebulaBrightnessUp => COMMAND_NAME_NEBULA_BRIGHTNESS_UP,
            Self::NebulaBrightnessDown => COMMAND_NAME_NEBULA_BRIGHTNESS_DOWN,
            Self::NebulaSpeedUp => COMMAND_NAME_NEBULA_SPEED_UP,
            Self::NebulaSpeedDown => COMMAND_NAME_NEBULA_SPEED_DOWN,
            Self::Star => COMMAND_NAME_STAR,
            Self::StarBreathingUp => COMMAND_NAME_STAR_BREATHING_UP,
            Self::StarBreathingDown => COMMAND_NAME_STAR_BREATHING_DOWN,
            Self::StarBrightnessUp => COMMAND_NAME_STAR_BRIGHTNESS_UP,
            Self::StarBrightnessDown => COMMAND_NAME_STAR_BRIGHTNESS_DOWN,
            Self::Repeat => COMMAND_NAME_REPEAT,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Some(match s {
            COMMAND_NAME_POWER => Self::Power,
            COMMAND_NAME_TIMER => Self::Timer,
            COMMAND_NAME_NEBULA => Self::Nebula,
            COMMAND_NAME_NEBULA_BRIGHTNESS_UP => Self::NebulaBrightnessUp,
            COMMAND_NAME_NEBULA_BRIGHTNESS_DOWN => Self::NebulaBrightnessDown,
            COMMAND_NAME_NEBULA_SPEED_UP => Self::NebulaSpeedUp,
            COMMAND_NAME_NEBULA_SPEED_DOWN => Self::NebulaSpeedDown,
            COMMAND_NAME_STAR => Self::Star,
            COMMAND_NAME_STAR_BREATHING_UP => Self::StarBreathingUp,
            COMMAND_NAME_STAR_BREATHING_DOWN => Self::StarBreathingDown,
            COMMAND_NAME_STAR_BRIGHTNESS_UP => Self::StarBrightnessUp,
            COMMAND_NAME_STAR_BRIGHTNESS_DOWN => Self::StarBrightnessDown,
            COMMAND_NAME_REPEAT => Self::Repeat,
            _ => return None,
        })
    }

    /// NEC command byte of the physical button.
    ///
    /// `Repeat` is not a button and has no code.
    pub const fn code(self) -> Option<u8> {
        Some(match self {
            Self::Power => COMMAND_CODE_POWER,
            Self::Timer => COMMAND_CODE_TIMER,
            Self::Nebula => COMMAND_CODE_NEBULA,
            Self::NebulaBrightnessUp => COMMAND_CODE_NEBULA_BRIGHTNESS_UP,
            Self::NebulaBrightnessDown => COMMAND_CODE_NEBULA_BRIGHTNESS_DOWN,
            Self::NebulaSpeedUp => COMMAND_CODE_NEBULA_SPEED_UP,
            Self::NebulaSpeedDown => COMMAND_CODE_NEBULA_SPEED_DOWN,
            Self::Star => COMMAND_CODE_STAR,
            Self::StarBreathingUp => COMMAND_CODE_STAR_BREATHING_UP,
            Self::StarBreathingDown => COMMAND_CODE_STAR_BREATHING_DOWN,
            Self::StarBrightnessUp => COMMAND_CODE_STAR_BRIGHTNESS_UP,
            Self::StarBrightnessDown => COMMAND_CODE_STAR_BRIGHTNESS_DOWN,
            Self::Repeat => return None,
        })
    }

    /// Returns true if the projector ignores this command while powered off
    pub const fn requires_power(self) -> bool {
        !matches!(self, Self::Power | Self::Timer | Self::Repeat)
    }
}

/// Encoded pulse sequence, ready to be handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    symbols: Vec<u8, FRAME_CAPACITY>,
}

impl Frame {
    /// Build a frame from raw pulse symbols.
    ///
    /// Returns `None` if the sequence does not fit into [`FRAME_CAPACITY`].
    pub fn from_symbols(symbols: &[u8]) -> Option<Self> {
        Vec::from_slice(symbols).ok().map(|symbols| Self { symbols })
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Unit of work accepted by the command queue.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandFrame {
    /// Symbolic command resolved by the transport
    Named { command: Command, long_press: bool },
    /// Pre-encoded frame, optionally followed by a repeat burst
    Raw { frame: Frame, repeat: bool },
    /// Frame produced by the encoder from a bare command code
    Single(Frame),
}

impl CommandFrame {
    /// Returns true if the frame is followed by a repeat burst
    pub const fn has_burst(&self) -> bool {
        match self {
            Self::Named { long_press, .. } => *long_press,
            Self::Raw { repeat, .. } => *repeat,
            Self::Single(_) => false,
        }
    }
}

//! Stateless button remotes for simple IR receivers such as LED candles.
//!
//! A remote maps buttons to bare command codes and sends them through the
//! shared queue. It keeps no shadow state.

use crate::encoder::FrameEncoder;
use crate::error::Error;
use crate::intent::Outcome;
use crate::notify::{Notice, Notifier};
use crate::queue::CommandQueue;
use crate::transport::Transport;

const TIMER_NAME_2H: &str = "2h";
const TIMER_NAME_4H: &str = "4h";
const TIMER_NAME_6H: &str = "6h";
const TIMER_NAME_8H: &str = "8h";

/// Command codes of one remote model.
///
/// Buttons the model lacks are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSet {
    pub on: u32,
    pub off: u32,
    pub timer_2h: Option<u32>,
    pub timer_4h: Option<u32>,
    pub timer_6h: Option<u32>,
    pub timer_8h: Option<u32>,
    pub dim_up: Option<u32>,
    pub dim_down: Option<u32>,
    pub mode_candle: Option<u32>,
    pub mode_light: Option<u32>,
}

/// HEMA LED candle remote
pub const HEMA: CommandSet = CommandSet {
    on: 0x45,
    off: 0x47,
    timer_2h: Some(0x44),
    timer_4h: Some(0x43),
    timer_6h: Some(0x07),
    timer_8h: Some(0x09),
    dim_up: None,
    dim_down: None,
    mode_candle: None,
    mode_light: None,
};

/// Deluxe Homeart candle remote
pub const DELUXE: CommandSet = CommandSet {
    on: 0x0C,
    off: 0x5E,
    timer_2h: Some(0x46),
    timer_4h: Some(0x40),
    timer_6h: Some(0x15),
    timer_8h: Some(0x19),
    dim_up: None,
    dim_down: None,
    mode_candle: None,
    mode_light: None,
};

/// Timer buttons found on candle remotes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerDuration {
    Hours2,
    Hours4,
    Hours6,
    Hours8,
}

impl TimerDuration {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hours2 => TIMER_NAME_2H,
            Self::Hours4 => TIMER_NAME_4H,
            Self::Hours6 => TIMER_NAME_6H,
            Self::Hours8 => TIMER_NAME_8H,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            TIMER_NAME_2H => Some(Self::Hours2),
            TIMER_NAME_4H => Some(Self::Hours4),
            TIMER_NAME_6H => Some(Self::Hours6),
            TIMER_NAME_8H => Some(Self::Hours8),
            _ => None,
        }
    }
}

/// Dim buttons of ten-button remotes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DimDirection {
    Up,
    Down,
}

/// Mode buttons of ten-button remotes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandleMode {
    /// Flickering candle effect
    Candle,
    /// Steady light
    Light,
}

impl CommandSet {
    pub const fn timer(&self, duration: TimerDuration) -> Option<u32> {
        match duration {
            TimerDuration::Hours2 => self.timer_2h,
            TimerDuration::Hours4 => self.timer_4h,
            TimerDuration::Hours6 => self.timer_6h,
            TimerDuration::Hours8 => self.timer_8h,
        }
    }

    pub const fn dim(&self, direction: DimDirection) -> Option<u32> {
        match direction {
            DimDirection::Up => self.dim_up,
            DimDirection::Down => self.dim_down,
        }
    }

    pub const fn mode(&self, mode: CandleMode) -> Option<u32> {
        match mode {
            CandleMode::Candle => self.mode_candle,
            CandleMode::Light => self.mode_light,
        }
    }
}

/// Per-device settings of a remote
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteConfig {
    /// Press "on" before every timer button, for receivers that ignore
    /// timer presses while off
    pub send_on_before_timer: bool,
}

/// Button remote sharing the transmission queue with other devices
pub struct Remote<'q, T, E, N>
where
    T: Transport,
    E: FrameEncoder,
    N: Notifier,
{
    queue: &'q CommandQueue<T, E>,
    commands: CommandSet,
    config: RemoteConfig,
    notifier: N,
}

impl<'q, T, E, N> Remote<'q, T, E, N>
where
    T: Transport,
    E: FrameEncoder,
    N: Notifier,
{
    pub const fn new(
        queue: &'q CommandQueue<T, E>,
        commands: CommandSet,
        config: RemoteConfig,
        notifier: N,
    ) -> Self {
        Self {
            queue,
            commands,
            config,
            notifier,
        }
    }

    pub const fn commands(&self) -> &CommandSet {
        &self.commands
    }

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    pub async fn press_on(&self) -> Result<Outcome, Error> {
        self.press(self.commands.on).await?;
        Ok(Outcome::Applied)
    }

    pub async fn press_off(&self) -> Result<Outcome, Error> {
        self.press(self.commands.off).await?;
        Ok(Outcome::Applied)
    }

    /// Press a timer button.
    ///
    /// Models without the button report [`Outcome::Unchanged`].
    pub async fn press_timer(&self, duration: TimerDuration) -> Result<Outcome, Error> {
        let Some(code) = self.commands.timer(duration) else {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("remote: no {} timer button", duration.as_str());
            return Ok(Outcome::Unchanged);
        };

        if self.config.send_on_before_timer {
            self.press(self.commands.on).await?;
        }
        self.press(code).await?;
        Ok(Outcome::Applied)
    }

    /// Press a dim button, if the model has it
    pub async fn press_dim(&self, direction: DimDirection) -> Result<Outcome, Error> {
        let Some(code) = self.commands.dim(direction) else {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("remote: no dim {:?} button", direction);
            return Ok(Outcome::Unchanged);
        };
        self.press(code).await?;
        Ok(Outcome::Applied)
    }

    /// Press a mode button, if the model has it
    pub async fn press_mode(&self, mode: CandleMode) -> Result<Outcome, Error> {
        let Some(code) = self.commands.mode(mode) else {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("remote: no {:?} mode button", mode);
            return Ok(Outcome::Unchanged);
        };
        self.press(code).await?;
        Ok(Outcome::Applied)
    }

    async fn press(&self, code: u32) -> Result<(), Error> {
        let result = self.queue.submit_code(code).await;
        if result == Err(Error::UnknownCommand) {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("remote: unknown command code 0x{:X}", code);
            self.notifier.notify(Notice::UnknownCommand(Some(code)));
        }
        result
    }
}

//! Stepped axes: quantities the hardware only exposes as `+`/`-` pulses.

use crate::command::Command;

const AXIS_NAME_NEBULA_BRIGHTNESS: &str = "nebula_dim";
const AXIS_NAME_NEBULA_SPEED: &str = "nebula_speed";
const AXIS_NAME_STAR_BREATHING: &str = "star_breathing";
const AXIS_NAME_STAR_BRIGHTNESS: &str = "star_brightness";

const NEBULA_BRIGHTNESS_MAX: i32 = 4;
const NEBULA_SPEED_MAX: i32 = 4;
const STAR_BREATHING_MAX: i32 = 3;
const STAR_BRIGHTNESS_MAX: i32 = 2;

const NEBULA_BRIGHTNESS_DEFAULT: i32 = 2;
const NEBULA_SPEED_DEFAULT: i32 = 2;
const STAR_BREATHING_DEFAULT: i32 = 2;
const STAR_BRIGHTNESS_DEFAULT: i32 = 1;

/// Star breathing level at which the stars shine steadily.
///
/// Star brightness only has an effect at this level.
pub const STAR_BREATHING_ALWAYS_ON: i32 = 0;

/// Known stepped axes of the projector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisId {
    NebulaBrightness,
    NebulaSpeed,
    StarBreathing,
    StarBrightness,
}

impl AxisId {
    pub const ALL: [Self; 4] = [
        Self::NebulaBrightness,
        Self::NebulaSpeed,
        Self::StarBreathing,
        Self::StarBrightness,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NebulaBrightness => AXIS_NAME_NEBULA_BRIGHTNESS,
            Self::NebulaSpeed => AXIS_NAME_NEBULA_SPEED,
            Self::StarBreathing => AXIS_NAME_STAR_BREATHING,
            Self::StarBrightness => AXIS_NAME_STAR_BRIGHTNESS,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            AXIS_NAME_NEBULA_BRIGHTNESS => Some(Self::NebulaBrightness),
            AXIS_NAME_NEBULA_SPEED => Some(Self::NebulaSpeed),
            AXIS_NAME_STAR_BREATHING => Some(Self::StarBreathing),
            AXIS_NAME_STAR_BRIGHTNESS => Some(Self::StarBrightness),
            _ => None,
        }
    }

    /// Highest level the axis can reach; the lowest is always 0
    pub const fn max(self) -> i32 {
        match self {
            Self::NebulaBrightness => NEBULA_BRIGHTNESS_MAX,
            Self::NebulaSpeed => NEBULA_SPEED_MAX,
            Self::StarBreathing => STAR_BREATHING_MAX,
            Self::StarBrightness => STAR_BRIGHTNESS_MAX,
        }
    }

    /// Level the projector falls back to after power-on
    pub const fn boot_default(self) -> i32 {
        match self {
            Self::NebulaBrightness => NEBULA_BRIGHTNESS_DEFAULT,
            Self::NebulaSpeed => NEBULA_SPEED_DEFAULT,
            Self::StarBreathing => STAR_BREATHING_DEFAULT,
            Self::StarBrightness => STAR_BRIGHTNESS_DEFAULT,
        }
    }

    /// Commands moving the axis one level up and down
    pub const fn step_commands(self) -> (Command, Command) {
        match self {
            Self::NebulaBrightness => (Command::NebulaBrightnessUp, Command::NebulaBrightnessDown),
            Self::NebulaSpeed => (Command::NebulaSpeedUp, Command::NebulaSpeedDown),
            Self::StarBreathing => (Command::StarBreathingUp, Command::StarBreathingDown),
            Self::StarBrightness => (Command::StarBrightnessUp, Command::StarBrightnessDown),
        }
    }
}

/// Ordered pulse sequence bringing an axis to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub command: Command,
    pub steps: u32,
}

/// Shadow copy of one stepped axis.
///
/// `min <= level <= max` holds whenever no stepping sequence is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisState {
    pub level: i32,
    pub min: i32,
    pub max: i32,
    pub step_up: Command,
    pub step_down: Command,
}

impl AxisState {
    /// Create the axis at its hardware boot default
    pub const fn new(id: AxisId) -> Self {
        let (step_up, step_down) = id.step_commands();
        Self {
            level: id.boot_default(),
            min: 0,
            max: id.max(),
            step_up,
            step_down,
        }
    }

    /// Create the axis at `level`, clamped to its bounds
    pub const fn with_level(id: AxisId, level: i32) -> Self {
        let mut axis = Self::new(id);
        axis.level = axis.clamp(level);
        axis
    }

    pub const fn clamp(&self, level: i32) -> i32 {
        if level < self.min {
            self.min
        } else if level > self.max {
            self.max
        } else {
            level
        }
    }

    /// Pulses needed to move from the current level to `target`.
    ///
    /// Returns None if the axis already sits at the target.
    pub const fn plan(&self, target: i32) -> Option<StepPlan> {
        let diff = target - self.level;
        if diff == 0 {
            return None;
        }
        let command = if diff > 0 { self.step_up } else { self.step_down };
        Some(StepPlan {
            command,
            steps: diff.unsigned_abs(),
        })
    }

    /// Map a fractional capability value in `[0, 1]` to a level
    pub fn level_from_fraction(&self, value: f32) -> i32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let level = libm::roundf(value * self.max as f32) as i32;
        self.clamp(level)
    }

    /// Current level as a fraction of the range
    pub fn fraction(&self) -> f32 {
        if self.max == self.min {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = (self.level - self.min) as f32 / (self.max - self.min) as f32;
        fraction
    }
}

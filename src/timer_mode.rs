//! Sleep timer of the projector.
//!
//! A short press on the timer button arms the 45 minute timer and then
//! alternates between the 45 and 90 minute timers. A long press clears the
//! timer from any state.

const TIMER_NAME_OFF: &str = "off";
const TIMER_NAME_45_MIN: &str = "45min";
const TIMER_NAME_90_MIN: &str = "90min";

/// Sleep timer state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimerMode {
    #[default]
    Off,
    Min45,
    Min90,
}

/// Button presses needed to reach a timer state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerPlan {
    ShortPresses(u32),
    LongPress,
}

impl TimerMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => TIMER_NAME_OFF,
            Self::Min45 => TIMER_NAME_45_MIN,
            Self::Min90 => TIMER_NAME_90_MIN,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            TIMER_NAME_OFF => Some(Self::Off),
            TIMER_NAME_45_MIN => Some(Self::Min45),
            TIMER_NAME_90_MIN => Some(Self::Min90),
            _ => None,
        }
    }

    /// State after one short press
    pub const fn next(self) -> Self {
        match self {
            Self::Off | Self::Min90 => Self::Min45,
            Self::Min45 => Self::Min90,
        }
    }

    /// Presses needed to move from this state to `target`.
    ///
    /// Returns None if the timer already is in the target state.
    pub const fn plan_to(self, target: Self) -> Option<TimerPlan> {
        if self as u8 == target as u8 {
            return None;
        }
        if matches!(target, Self::Off) {
            return Some(TimerPlan::LongPress);
        }

        let mut presses = 1;
        let mut mode = self.next();
        while mode as u8 != target as u8 {
            mode = mode.next();
            presses += 1;
        }
        Some(TimerPlan::ShortPresses(presses))
    }
}

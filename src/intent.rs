//! Intents accepted by the reconciler and the results it hands back.

use crate::axis::AxisId;
use crate::shadow::Switch;
use crate::timer_mode::TimerMode;

/// Capability write coming from the host platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapabilityWrite {
    /// Turn a boolean axis on or off
    Switch(Switch, bool),
    /// Move a stepped axis to an absolute level
    Level(AxisId, i32),
    /// Move a stepped axis to a fraction of its range, `[0, 1]`
    Fraction(AxisId, f32),
}

/// Represents a request to change the projector state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent<'a> {
    Capability(CapabilityWrite),
    /// Send a named command as-is, e.g. from an automation flow
    Flow { command: &'a str, long_press: bool },
    Timer(TimerMode),
}

/// Result of a successfully handled intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Commands were transmitted and the shadow state updated
    Applied,
    /// The shadow state already matched, nothing was transmitted
    Unchanged,
    /// The projector is off; the change was recorded for the next power-on
    Deferred,
    /// The projector is off and the command cannot be recorded
    Blocked,
}

/// Events raised by scheduled tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The power-off cooldown elapsed
    PowerOffConfirmed,
}

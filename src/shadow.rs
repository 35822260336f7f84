//! Shadow state of the projector and its persisted record.
//!
//! The IR channel is write-only, so this state is the only record of what the
//! hardware is doing. It is persisted as one scalar per axis or flag.

use crate::axis::{AxisId, AxisState};
use crate::persistence::{KeyValueStore, PersistenceError, StoreValue};
use crate::timer_mode::TimerMode;

/// Presence of this key marks an initialized device
pub const KEY_POWER: &str = "power_state";
pub const KEY_NEBULA_ON: &str = "nebula_state";
pub const KEY_STAR_ON: &str = "star_state";
pub const KEY_NEBULA_BRIGHTNESS: &str = "nebula_brightness";
pub const KEY_NEBULA_SPEED: &str = "nebula_speed";
pub const KEY_STAR_BREATHING: &str = "star_breathing";
pub const KEY_STAR_BRIGHTNESS: &str = "star_brightness";
pub const KEY_TIMER: &str = "timer_mode";

/// Boolean axes, toggled by a single button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Switch {
    Power,
    Nebula,
    Star,
}

const fn storage_key(id: AxisId) -> &'static str {
    match id {
        AxisId::NebulaBrightness => KEY_NEBULA_BRIGHTNESS,
        AxisId::NebulaSpeed => KEY_NEBULA_SPEED,
        AxisId::StarBreathing => KEY_STAR_BREATHING,
        AxisId::StarBrightness => KEY_STAR_BRIGHTNESS,
    }
}

/// Everything the reconciler knows about the projector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceShadowState {
    pub power: bool,
    pub nebula_on: bool,
    pub star_on: bool,
    pub nebula_brightness: AxisState,
    pub nebula_speed: AxisState,
    pub star_breathing: AxisState,
    pub star_brightness: AxisState,
    pub timer: TimerMode,
}

impl DeviceShadowState {
    /// First-run state: powered off, both sub-systems on, axes at defaults
    pub const fn new() -> Self {
        Self {
            power: false,
            nebula_on: true,
            star_on: true,
            nebula_brightness: AxisState::new(AxisId::NebulaBrightness),
            nebula_speed: AxisState::new(AxisId::NebulaSpeed),
            star_breathing: AxisState::new(AxisId::StarBreathing),
            star_brightness: AxisState::new(AxisId::StarBrightness),
            timer: TimerMode::Off,
        }
    }

    pub const fn axis(&self, id: AxisId) -> &AxisState {
        match id {
            AxisId::NebulaBrightness => &self.nebula_brightness,
            AxisId::NebulaSpeed => &self.nebula_speed,
            AxisId::StarBreathing => &self.star_breathing,
            AxisId::StarBrightness => &self.star_brightness,
        }
    }

    pub fn axis_mut(&mut self, id: AxisId) -> &mut AxisState {
        match id {
            AxisId::NebulaBrightness => &mut self.nebula_brightness,
            AxisId::NebulaSpeed => &mut self.nebula_speed,
            AxisId::StarBreathing => &mut self.star_breathing,
            AxisId::StarBrightness => &mut self.star_brightness,
        }
    }

    pub const fn switch(&self, switch: Switch) -> bool {
        match switch {
            Switch::Power => self.power,
            Switch::Nebula => self.nebula_on,
            Switch::Star => self.star_on,
        }
    }

    pub fn set_switch(&mut self, switch: Switch, on: bool) {
        match switch {
            Switch::Power => self.power = on,
            Switch::Nebula => self.nebula_on = on,
            Switch::Star => self.star_on = on,
        }
    }

    /// Reset everything the projector resets on its own when it boots.
    ///
    /// Nebula brightness is reset too, so a level recorded while off is
    /// always replayed from a known starting point.
    pub fn apply_boot_defaults(&mut self) {
        self.nebula_on = true;
        self.star_on = true;
        for id in AxisId::ALL {
            self.axis_mut(id).level = id.boot_default();
        }
        self.timer = TimerMode::Off;
    }

    /// Reset the star settings the projector resets when stars come back on
    pub fn apply_star_defaults(&mut self) {
        self.star_breathing.level = AxisId::StarBreathing.boot_default();
        self.star_brightness.level = AxisId::StarBrightness.boot_default();
    }

    /// Read the persisted record.
    ///
    /// Returns None on first run, when the power key was never written.
    /// Missing or malformed entries fall back to defaults.
    pub fn load<S: KeyValueStore>(store: &S) -> Option<Self> {
        let power = store.get(KEY_POWER)?.as_flag().unwrap_or(false);
        let flag = |key, default| {
            store
                .get(key)
                .and_then(|value| value.as_flag())
                .unwrap_or(default)
        };

        let mut state = Self::new();
        state.power = power;
        state.nebula_on = flag(KEY_NEBULA_ON, true);
        state.star_on = flag(KEY_STAR_ON, true);
        for id in AxisId::ALL {
            if let Some(level) = store.get(storage_key(id)).and_then(|value| value.as_level()) {
                *state.axis_mut(id) = AxisState::with_level(id, level);
            }
        }
        state.timer = store
            .get(KEY_TIMER)
            .and_then(|value| value.as_text().and_then(TimerMode::parse_from_str))
            .unwrap_or_default();

        Some(state)
    }

    /// Write one scalar per axis and flag.
    ///
    /// Every key is attempted; the first failure is reported.
    pub fn persist<S: KeyValueStore>(&self, store: &mut S) -> Result<(), PersistenceError> {
        let mut result = Ok(());
        let mut write = |key: &str, value: StoreValue| {
            if let Err(error) = store.set(key, value) {
                if result.is_ok() {
                    result = Err(error);
                }
            }
        };

        write(KEY_POWER, StoreValue::Flag(self.power));
        write(KEY_NEBULA_ON, StoreValue::Flag(self.nebula_on));
        write(KEY_STAR_ON, StoreValue::Flag(self.star_on));
        for id in AxisId::ALL {
            write(storage_key(id), StoreValue::Level(self.axis(id).level));
        }
        if let Some(timer) = StoreValue::text(self.timer.as_str()) {
            write(KEY_TIMER, timer);
        }

        result
    }
}

impl Default for DeviceShadowState {
    fn default() -> Self {
        Self::new()
    }
}

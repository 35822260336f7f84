//! Shadow-state reconciler of the projector.
//!
//! Translates intents into ordered queue submissions, keeps the shadow state
//! in sync with what was transmitted and persists it after every change.
//! While the projector is off, changes are only recorded and replayed by the
//! restoration sequence on the next power-on.

mod restore;
mod stepping;

use embassy_time::{Duration, Instant, Timer};

use crate::axis::{AxisId, STAR_BREATHING_ALWAYS_ON};
use crate::command::Command;
use crate::encoder::FrameEncoder;
use crate::error::Error;
use crate::intent::{CapabilityWrite, Event, Intent, Outcome};
use crate::notify::{Notice, Notifier};
use crate::persistence::KeyValueStore;
use crate::queue::CommandQueue;
use crate::schedule::ScheduledTask;
use crate::shadow::{DeviceShadowState, Switch};
use crate::timer_mode::TimerMode;
use crate::transport::Transport;

const STEP_SETTLE: Duration = Duration::from_millis(200);
const TIMER_PRESS_SETTLE: Duration = Duration::from_millis(300);
const BOOT_SETTLE: Duration = Duration::from_millis(250);
const STAGE_SETTLE: Duration = Duration::from_millis(250);
const STAR_STAGE_SETTLE: Duration = Duration::from_millis(500);
const AUTO_OFF_DELAY: Duration = Duration::from_millis(0);

/// Pauses the hardware needs to register consecutive changes
#[derive(Debug, Clone, Copy)]
pub struct SettleTimings {
    /// After each axis step pulse
    pub step: Duration,
    /// After each short press of the timer button
    pub timer_press: Duration,
    /// Between power-on and the first restoration stage
    pub boot: Duration,
    /// Between restoration stages
    pub stage: Duration,
    /// After the star breathing and star brightness stages
    pub star_stage: Duration,
}

/// Configuration of the reconciler
#[derive(Debug, Clone, Copy)]
pub struct ReconcilerConfig {
    pub timings: SettleTimings,
    /// Cooldown after power-off before the off state is confirmed
    pub auto_off_delay: Duration,
}

impl ReconcilerConfig {
    pub const DEFAULT: Self = Self {
        timings: SettleTimings {
            step: STEP_SETTLE,
            timer_press: TIMER_PRESS_SETTLE,
            boot: BOOT_SETTLE,
            stage: STAGE_SETTLE,
            star_stage: STAR_STAGE_SETTLE,
        },
        auto_off_delay: AUTO_OFF_DELAY,
    };
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Owner of the projector shadow state
pub struct Reconciler<'q, T, E, S, N>
where
    T: Transport,
    E: FrameEncoder,
    S: KeyValueStore,
    N: Notifier,
{
    // External dependencies and configuration
    queue: &'q CommandQueue<T, E>,
    store: S,
    notifier: N,
    config: ReconcilerConfig,

    // Internal state
    state: DeviceShadowState,
    auto_off: ScheduledTask,
}

impl<'q, T, E, S, N> Reconciler<'q, T, E, S, N>
where
    T: Transport,
    E: FrameEncoder,
    S: KeyValueStore,
    N: Notifier,
{
    /// Create a reconciler from the persisted record.
    ///
    /// On first run the defaults are used and persisted right away.
    pub fn new(
        queue: &'q CommandQueue<T, E>,
        store: S,
        notifier: N,
        config: ReconcilerConfig,
    ) -> Self {
        let loaded = DeviceShadowState::load(&store);
        let first_run = loaded.is_none();
        let mut reconciler = Self {
            queue,
            store,
            notifier,
            config,
            state: loaded.unwrap_or_default(),
            auto_off: ScheduledTask::new(),
        };

        #[cfg(feature = "esp32-log")]
        esp_println::println!(
            "reconciler: initialized with {} state: {:?}",
            if first_run { "default" } else { "saved" },
            reconciler.state
        );

        if first_run {
            reconciler.persist();
        }
        reconciler
    }

    pub const fn state(&self) -> &DeviceShadowState {
        &self.state
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Dispatch an intent to the matching operation
    pub async fn handle(&mut self, intent: Intent<'_>) -> Result<Outcome, Error> {
        match intent {
            Intent::Capability(CapabilityWrite::Switch(Switch::Power, on)) => {
                self.set_power(on).await
            }
            Intent::Capability(CapabilityWrite::Switch(switch, on)) => {
                self.set_switch(switch, on).await
            }
            Intent::Capability(CapabilityWrite::Level(axis, level)) => {
                self.set_level(axis, level).await
            }
            Intent::Capability(CapabilityWrite::Fraction(axis, value)) => {
                self.set_fraction(axis, value).await
            }
            Intent::Flow {
                command,
                long_press,
            } => self.send_flow(command, long_press).await,
            Intent::Timer(mode) => self.set_timer(mode).await,
        }
    }

    /// Turn the projector on or off.
    ///
    /// Power-off persists the current state first and arms the auto-off task.
    /// Power-on cancels it and replays the recorded state onto the projector.
    pub async fn set_power(&mut self, on: bool) -> Result<Outcome, Error> {
        if self.state.power == on {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("reconciler: power already {}, nothing sent", on);
            return Ok(Outcome::Unchanged);
        }

        if !on {
            self.persist();
            self.toggle(Switch::Power, false).await?;
            self.auto_off
                .arm(Instant::now(), self.config.auto_off_delay);
            self.persist();
            return Ok(Outcome::Applied);
        }

        self.toggle(Switch::Power, true).await?;
        self.auto_off.cancel();
        let restored = self.restore_after_power_on().await;
        self.persist();
        restored.map(|()| Outcome::Applied)
    }

    /// Turn the nebula or the stars on or off
    pub async fn set_switch(&mut self, switch: Switch, on: bool) -> Result<Outcome, Error> {
        if switch == Switch::Power {
            return self.set_power(on).await;
        }
        if !self.state.power {
            self.state.set_switch(switch, on);
            let notice = match switch {
                Switch::Star => Notice::ProjectorOffStars,
                Switch::Nebula | Switch::Power => Notice::ProjectorOffNebula,
            };
            return Ok(self.defer(notice));
        }

        let outcome = self.toggle(switch, on).await?;
        if outcome == Outcome::Applied && switch == Switch::Star && on {
            let restored = self.restore_star_settings().await;
            self.persist();
            return restored.map(|()| outcome);
        }
        if outcome == Outcome::Applied {
            self.persist();
        }
        Ok(outcome)
    }

    /// Move a stepped axis to `level`, clamped to its bounds
    pub async fn set_level(&mut self, axis: AxisId, level: i32) -> Result<Outcome, Error> {
        let level = self.state.axis(axis).clamp(level);
        if !self.state.power {
            self.state.axis_mut(axis).level = level;
            let notice = match axis {
                AxisId::NebulaBrightness => Notice::ProjectorOffBrightness,
                _ => Notice::ProjectorOff,
            };
            return Ok(self.defer(notice));
        }

        if axis == AxisId::StarBrightness
            && self.state.star_breathing.level != STAR_BREATHING_ALWAYS_ON
        {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("reconciler: star brightness only works without breathing");
            return Err(Error::AxisLocked);
        }

        let outcome = self.step_axis(axis, level).await?;
        if outcome == Outcome::Applied {
            self.persist();
        }
        Ok(outcome)
    }

    /// Move a stepped axis to a fraction of its range
    pub async fn set_fraction(&mut self, axis: AxisId, value: f32) -> Result<Outcome, Error> {
        let level = self.state.axis(axis).level_from_fraction(value);
        self.set_level(axis, level).await
    }

    /// Move the sleep timer to `mode`
    pub async fn set_timer(&mut self, mode: TimerMode) -> Result<Outcome, Error> {
        if !self.state.power {
            self.state.timer = mode;
            return Ok(self.defer(Notice::ProjectorOff));
        }

        let outcome = self.step_timer(mode).await?;
        if outcome == Outcome::Applied {
            self.persist();
        }
        Ok(outcome)
    }

    /// Send a named command without touching the shadow state.
    ///
    /// Commands the projector ignores while off are blocked with a notice.
    pub async fn send_flow(&mut self, name: &str, long_press: bool) -> Result<Outcome, Error> {
        let Some(command) = Command::parse_from_str(name) else {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("reconciler: unknown flow command {}", name);
            self.notifier.notify(Notice::UnknownCommand(None));
            return Err(Error::UnknownCommand);
        };

        if command.requires_power() && !self.state.power {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("reconciler: {} blocked, projector is off", name);
            self.notifier.notify(Notice::ProjectorOff);
            return Ok(Outcome::Blocked);
        }

        self.queue.submit_command(command, long_press).await?;
        Ok(Outcome::Applied)
    }

    /// Deadline of the next scheduled task, if any
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.auto_off.deadline()
    }

    /// Collect scheduled tasks whose deadline has passed
    pub fn poll_scheduled(&mut self, now: Instant) -> Option<Event> {
        if !self.auto_off.take_expired(now) {
            return None;
        }
        #[cfg(feature = "esp32-log")]
        esp_println::println!("reconciler: power off confirmed after cooldown");
        self.state.power = false;
        Some(Event::PowerOffConfirmed)
    }

    /// Sleep until the next scheduled task fires.
    ///
    /// Returns None immediately if nothing is scheduled.
    pub async fn wait_scheduled(&mut self) -> Option<Event> {
        let deadline = self.auto_off.deadline()?;
        Timer::at(deadline).await;
        self.poll_scheduled(Instant::now())
    }

    /// Record a change made while the projector is off
    fn defer(&mut self, notice: Notice) -> Outcome {
        #[cfg(feature = "esp32-log")]
        esp_println::println!("reconciler: projector off, change saved for next power on");
        self.persist();
        self.notifier.notify(notice);
        Outcome::Deferred
    }

    /// Write the shadow state to the store.
    ///
    /// Failures are logged only: the in-memory state stays authoritative.
    fn persist(&mut self) {
        if let Err(_error) = self.state.persist(&mut self.store) {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("persistence: failed to save state: {:?}", _error);
        }
    }
}

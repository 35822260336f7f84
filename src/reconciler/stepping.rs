//! Translation of target states into button presses.

use embassy_time::Timer;

use super::Reconciler;
use crate::axis::AxisId;
use crate::command::Command;
use crate::encoder::FrameEncoder;
use crate::error::Error;
use crate::intent::Outcome;
use crate::notify::Notifier;
use crate::persistence::KeyValueStore;
use crate::shadow::Switch;
use crate::timer_mode::{TimerMode, TimerPlan};
use crate::transport::Transport;

impl<T, E, S, N> Reconciler<'_, T, E, S, N>
where
    T: Transport,
    E: FrameEncoder,
    S: KeyValueStore,
    N: Notifier,
{
    /// Pulse an axis from its shadow level to `target`.
    ///
    /// The shadow level only moves once every pulse went out; a failed pulse
    /// leaves it untouched and stops the sequence.
    pub(super) async fn step_axis(&mut self, axis: AxisId, target: i32) -> Result<Outcome, Error> {
        let current = self.state.axis(axis);
        let target = current.clamp(target);
        let Some(plan) = current.plan(target) else {
            return Ok(Outcome::Unchanged);
        };

        #[cfg(feature = "esp32-log")]
        esp_println::println!(
            "reconciler: stepping {} {} -> {} ({} x {})",
            axis.as_str(),
            current.level,
            target,
            plan.steps,
            plan.command.as_str()
        );

        for _step in 0..plan.steps {
            if let Err(error) = self.queue.submit_command(plan.command, false).await {
                #[cfg(feature = "esp32-log")]
                esp_println::println!(
                    "reconciler: {} step {} failed: {:?}",
                    axis.as_str(),
                    _step,
                    error
                );
                return Err(error);
            }
            Timer::after(self.config.timings.step).await;
        }

        self.state.axis_mut(axis).level = target;
        Ok(Outcome::Applied)
    }

    /// Press the toggle button of a boolean axis if it differs from `on`.
    ///
    /// Sub-system buttons switch on with a short press and off with a long one.
    pub(super) async fn toggle(&mut self, switch: Switch, on: bool) -> Result<Outcome, Error> {
        if self.state.switch(switch) == on {
            return Ok(Outcome::Unchanged);
        }

        let (command, long_press) = match switch {
            Switch::Power => (Command::Power, false),
            Switch::Nebula => (Command::Nebula, !on),
            Switch::Star => (Command::Star, !on),
        };
        self.queue.submit_command(command, long_press).await?;
        self.state.set_switch(switch, on);
        Ok(Outcome::Applied)
    }

    /// Press the timer button until the timer reaches `mode`
    pub(super) async fn step_timer(&mut self, mode: TimerMode) -> Result<Outcome, Error> {
        let Some(plan) = self.state.timer.plan_to(mode) else {
            return Ok(Outcome::Unchanged);
        };

        #[cfg(feature = "esp32-log")]
        esp_println::println!(
            "reconciler: timer {} -> {} ({:?})",
            self.state.timer.as_str(),
            mode.as_str(),
            plan
        );

        match plan {
            TimerPlan::LongPress => {
                self.queue.submit_command(Command::Timer, true).await?;
            }
            TimerPlan::ShortPresses(presses) => {
                for _ in 0..presses {
                    self.queue.submit_command(Command::Timer, false).await?;
                    Timer::after(self.config.timings.timer_press).await;
                }
            }
        }

        self.state.timer = mode;
        Ok(Outcome::Applied)
    }
}

//! Replay of the recorded state after the projector resets itself.

use embassy_time::{Duration, Timer};

use super::Reconciler;
use crate::axis::{AxisId, STAR_BREATHING_ALWAYS_ON};
use crate::encoder::FrameEncoder;
use crate::error::Error;
use crate::intent::Outcome;
use crate::notify::Notifier;
use crate::persistence::KeyValueStore;
use crate::shadow::{DeviceShadowState, Switch};
use crate::transport::Transport;

impl<T, E, S, N> Reconciler<'_, T, E, S, N>
where
    T: Transport,
    E: FrameEncoder,
    S: KeyValueStore,
    N: Notifier,
{
    /// Bring the freshly booted projector back to the recorded state.
    ///
    /// Stages run in a fixed order: nebula switch, nebula brightness, nebula
    /// speed, star switch, star breathing, star brightness and the timer.
    /// Star brightness is only replayed if breathing ends at always-on.
    /// A failed stage aborts the sequence and the shadow state falls back to
    /// the recorded targets, so the next power-on replays them again.
    pub(super) async fn restore_after_power_on(&mut self) -> Result<(), Error> {
        let targets = self.state;

        Timer::after(self.config.timings.boot).await;
        self.state.apply_boot_defaults();

        #[cfg(feature = "esp32-log")]
        esp_println::println!("restore: replaying {:?}", targets);

        let result = self.replay(&targets).await;
        if let Err(_error) = result {
            #[cfg(feature = "esp32-log")]
            esp_println::println!("restore: aborted, keeping targets: {:?}", _error);
            self.state = targets;
            return result;
        }

        #[cfg(feature = "esp32-log")]
        esp_println::println!("restore: done");
        Ok(())
    }

    async fn replay(&mut self, targets: &DeviceShadowState) -> Result<(), Error> {
        let timings = self.config.timings;

        self.restore_switch(Switch::Nebula, targets.nebula_on, timings.stage)
            .await?;
        self.restore_axis(
            AxisId::NebulaBrightness,
            targets.nebula_brightness.level,
            timings.stage,
        )
        .await?;
        self.restore_axis(AxisId::NebulaSpeed, targets.nebula_speed.level, timings.stage)
            .await?;
        self.restore_switch(Switch::Star, targets.star_on, timings.stage)
            .await?;
        self.restore_axis(
            AxisId::StarBreathing,
            targets.star_breathing.level,
            timings.star_stage,
        )
        .await?;
        if targets.star_breathing.level == STAR_BREATHING_ALWAYS_ON {
            self.restore_axis(
                AxisId::StarBrightness,
                targets.star_brightness.level,
                timings.star_stage,
            )
            .await?;
        }
        self.step_timer(targets.timer).await?;
        Ok(())
    }

    /// Replay breathing and brightness after the stars were switched back on.
    ///
    /// The projector resets both to their defaults when the stars come on.
    pub(super) async fn restore_star_settings(&mut self) -> Result<(), Error> {
        let breathing = self.state.star_breathing.level;
        let brightness = self.state.star_brightness.level;
        let stage = self.config.timings.stage;

        Timer::after(stage).await;
        self.state.apply_star_defaults();

        #[cfg(feature = "esp32-log")]
        esp_println::println!(
            "restore: stars on, replaying breathing {} brightness {}",
            breathing,
            brightness
        );

        self.restore_axis(AxisId::StarBreathing, breathing, stage)
            .await?;
        if breathing == STAR_BREATHING_ALWAYS_ON {
            self.restore_axis(AxisId::StarBrightness, brightness, stage)
                .await?;
        }
        Ok(())
    }

    async fn restore_switch(
        &mut self,
        switch: Switch,
        on: bool,
        settle: Duration,
    ) -> Result<(), Error> {
        if self.toggle(switch, on).await? == Outcome::Applied {
            Timer::after(settle).await;
        }
        Ok(())
    }

    async fn restore_axis(&mut self, axis: AxisId, level: i32, settle: Duration) -> Result<(), Error> {
        self.step_axis(axis, level).await?;
        Timer::after(settle).await;
        Ok(())
    }
}

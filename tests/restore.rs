mod common;

mod tests {
    use embassy_futures::block_on;
    use myrtio_ir_remote::shadow::{KEY_NEBULA_BRIGHTNESS, KEY_POWER};
    use myrtio_ir_remote::{
        AxisId, Command, DeviceShadowState, Error, Outcome, Reconciler, StoreValue, TimerMode,
        TransportError,
    };

    use crate::common::{
        CollectingNotifier, MemoryStore, RecordingTransport, fast_queue, fast_reconciler_config,
    };

    fn powered_off(configure: impl FnOnce(&mut DeviceShadowState)) -> MemoryStore {
        let mut state = DeviceShadowState::new();
        configure(&mut state);
        MemoryStore::seeded(&state)
    }

    #[test]
    fn test_deferred_change_is_replayed_on_power_on() {
        let transport = RecordingTransport::new();
        let queue = fast_queue(transport.clone());
        let mut reconciler = Reconciler::new(
            &queue,
            MemoryStore::new(),
            CollectingNotifier::new(),
            fast_reconciler_config(),
        );

        let outcome = block_on(reconciler.set_level(AxisId::NebulaBrightness, 3));
        assert_eq!(outcome, Ok(Outcome::Deferred));
        assert!(transport.sent().is_empty());

        assert_eq!(block_on(reconciler.set_power(true)), Ok(Outcome::Applied));
        assert_eq!(
            transport.commands(),
            [Command::Power, Command::NebulaBrightnessUp]
        );
        assert_eq!(reconciler.state().nebula_brightness.level, 3);
    }

    #[test]
    fn test_restore_runs_stages_in_order() {
        let transport = RecordingTransport::new();
        let queue = fast_queue(transport.clone());
        let mut saved = DeviceShadowState::new();
        saved.nebula_on = false;
        saved.nebula_brightness.level = 0;
        saved.nebula_speed.level = 4;
        saved.star_breathing.level = 0;
        saved.star_brightness.level = 2;
        saved.timer = TimerMode::Min90;
        let store = MemoryStore::seeded(&saved);
        let mut reconciler = Reconciler::new(
            &queue,
            store.clone(),
            CollectingNotifier::new(),
            fast_reconciler_config(),
        );

        block_on(reconciler.set_power(true)).unwrap();
        assert_eq!(
            transport.commands(),
            [
                Command::Power,
                Command::Nebula,
                Command::Repeat,
                Command::NebulaBrightnessDown,
                Command::NebulaBrightnessDown,
                Command::NebulaSpeedUp,
                Command::NebulaSpeedUp,
                Command::StarBreathingDown,
                Command::StarBreathingDown,
                Command::StarBrightnessUp,
                Command::Timer,
                Command::Timer,
            ]
        );

        let mut expected = saved;
        expected.power = true;
        assert_eq!(*reconciler.state(), expected);
        assert_eq!(store.value(KEY_POWER), Some(StoreValue::Flag(true)));
    }

    #[test]
    fn test_star_brightness_skipped_while_breathing() {
        let transport = RecordingTransport::new();
        let queue = fast_queue(transport.clone());
        let store = powered_off(|state| {
            state.star_breathing.level = 3;
            state.star_brightness.level = 0;
        });
        let mut reconciler = Reconciler::new(
            &queue,
            store,
            CollectingNotifier::new(),
            fast_reconciler_config(),
        );

        block_on(reconciler.set_power(true)).unwrap();
        assert_eq!(
            transport.commands(),
            [Command::Power, Command::StarBreathingUp]
        );
        assert_eq!(reconciler.state().star_breathing.level, 3);
        assert_eq!(
            reconciler.state().star_brightness.level,
            AxisId::StarBrightness.boot_default()
        );
    }

    #[test]
    fn test_restore_from_defaults_sends_only_power() {
        let transport = RecordingTransport::new();
        let queue = fast_queue(transport.clone());
        let mut reconciler = Reconciler::new(
            &queue,
            MemoryStore::new(),
            CollectingNotifier::new(),
            fast_reconciler_config(),
        );

        block_on(reconciler.set_power(true)).unwrap();
        assert_eq!(transport.commands(), [Command::Power]);
    }

    #[test]
    fn test_failed_stage_keeps_saved_targets() {
        let transport = RecordingTransport::new();
        // Power, first brightness step, then the second step fails
        transport.fail_at(2, TransportError::Failed);
        let queue = fast_queue(transport.clone());
        let store = powered_off(|state| {
            state.nebula_brightness.level = 4;
            state.nebula_speed.level = 0;
        });
        let mut reconciler = Reconciler::new(
            &queue,
            store.clone(),
            CollectingNotifier::new(),
            fast_reconciler_config(),
        );

        assert_eq!(block_on(reconciler.set_power(true)), Err(Error::Transport));
        assert_eq!(
            transport.commands(),
            [Command::Power, Command::NebulaBrightnessUp]
        );

        let state = reconciler.state();
        assert!(state.power);
        assert_eq!(state.nebula_brightness.level, 4);
        assert_eq!(state.nebula_speed.level, 0);
        assert_eq!(store.value(KEY_POWER), Some(StoreValue::Flag(true)));
        assert_eq!(store.value(KEY_NEBULA_BRIGHTNESS), Some(StoreValue::Level(4)));
    }

    #[test]
    fn test_next_power_cycle_replays_after_failed_restore() {
        let transport = RecordingTransport::new();
        transport.fail_at(2, TransportError::Failed);
        let queue = fast_queue(transport.clone());
        let store = powered_off(|state| state.nebula_brightness.level = 4);
        let mut reconciler = Reconciler::new(
            &queue,
            store.clone(),
            CollectingNotifier::new(),
            fast_reconciler_config(),
        );

        assert!(block_on(reconciler.set_power(true)).is_err());
        block_on(reconciler.set_power(false)).unwrap();
        transport.clear();

        assert_eq!(block_on(reconciler.set_power(true)), Ok(Outcome::Applied));
        assert_eq!(
            transport.commands(),
            [
                Command::Power,
                Command::NebulaBrightnessUp,
                Command::NebulaBrightnessUp
            ]
        );
        assert_eq!(reconciler.state().nebula_brightness.level, 4);
        assert_eq!(store.value(KEY_NEBULA_BRIGHTNESS), Some(StoreValue::Level(4)));
    }

    #[test]
    fn test_failed_power_press_skips_restore() {
        let transport = RecordingTransport::new();
        transport.fail_at(0, TransportError::RateLimited);
        let queue = fast_queue(transport.clone());
        let mut reconciler = Reconciler::new(
            &queue,
            powered_off(|state| state.nebula_speed.level = 0),
            CollectingNotifier::new(),
            fast_reconciler_config(),
        );

        assert_eq!(block_on(reconciler.set_power(true)), Err(Error::RateLimited));
        assert!(transport.sent().is_empty());
        assert!(!reconciler.state().power);
        assert_eq!(reconciler.state().nebula_speed.level, 0);
    }
}

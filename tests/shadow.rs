mod common;

mod tests {
    use myrtio_ir_remote::shadow::{KEY_NEBULA_SPEED, KEY_POWER, KEY_TIMER};
    use myrtio_ir_remote::{
        AxisId, DeviceShadowState, KeyValueStore, PersistenceError, StoreValue, TimerMode,
    };

    use crate::common::MemoryStore;

    #[test]
    fn test_empty_store_is_first_run() {
        assert_eq!(DeviceShadowState::load(&MemoryStore::new()), None);
    }

    #[test]
    fn test_persisted_state_loads_back() {
        let mut state = DeviceShadowState::new();
        state.power = true;
        state.star_on = false;
        state.nebula_speed.level = 0;
        state.timer = TimerMode::Min45;

        let mut store = MemoryStore::new();
        state.persist(&mut store).unwrap();
        assert_eq!(DeviceShadowState::load(&store), Some(state));
    }

    #[test]
    fn test_bad_entries_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(KEY_POWER, StoreValue::Flag(true)).unwrap();
        store.set(KEY_NEBULA_SPEED, StoreValue::Level(99)).unwrap();
        store
            .set(KEY_TIMER, StoreValue::text("forever").unwrap())
            .unwrap();

        let state = DeviceShadowState::load(&store).unwrap();
        assert!(state.power);
        assert!(state.nebula_on);
        assert_eq!(state.nebula_speed.level, AxisId::NebulaSpeed.max());
        assert_eq!(state.timer, TimerMode::Off);
    }

    #[test]
    fn test_persist_reports_store_failure() {
        let mut store = MemoryStore::new();
        store.set_failing(true);
        assert_eq!(
            DeviceShadowState::new().persist(&mut store),
            Err(PersistenceError::DriverError)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_boot_defaults() {
        let mut state = DeviceShadowState::new();
        state.power = true;
        state.nebula_on = false;
        state.nebula_brightness.level = 4;
        state.star_breathing.level = 0;
        state.timer = TimerMode::Min90;

        state.apply_boot_defaults();
        let mut expected = DeviceShadowState::new();
        expected.power = true;
        assert_eq!(state, expected);
    }
}

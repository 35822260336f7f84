mod tests {
    use myrtio_ir_remote::{TimerMode, TimerPlan};

    #[test]
    fn test_short_press_cycle() {
        assert_eq!(TimerMode::Off.next(), TimerMode::Min45);
        assert_eq!(TimerMode::Min45.next(), TimerMode::Min90);
        assert_eq!(TimerMode::Min90.next(), TimerMode::Min45);
    }

    #[test]
    fn test_plan_to() {
        assert_eq!(
            TimerMode::Min90.plan_to(TimerMode::Min45),
            Some(TimerPlan::ShortPresses(1))
        );
        assert_eq!(
            TimerMode::Off.plan_to(TimerMode::Min90),
            Some(TimerPlan::ShortPresses(2))
        );
        assert_eq!(
            TimerMode::Min45.plan_to(TimerMode::Off),
            Some(TimerPlan::LongPress)
        );
        assert_eq!(TimerMode::Min45.plan_to(TimerMode::Min45), None);
        assert_eq!(TimerMode::Off.plan_to(TimerMode::Off), None);
    }

    #[test]
    fn test_timer_names() {
        assert_eq!(TimerMode::parse_from_str("90min"), Some(TimerMode::Min90));
        assert_eq!(TimerMode::Min45.as_str(), "45min");
        assert_eq!(TimerMode::parse_from_str("2h"), None);
        assert_eq!(TimerMode::default(), TimerMode::Off);
    }
}

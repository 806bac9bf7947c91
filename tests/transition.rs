mod tests {
    use embassy_time::{Duration, Instant};
    use klystron_core::color::Rgb;
    use klystron_core::transition::{Easing, Ramp};

    #[test]
    fn test_ramp_u8() {
        let mut ramp = Ramp::new(0u8);
        assert_eq!(ramp.value(), 0);
        assert!(!ramp.is_running());
        ramp.go(
            100,
            Duration::from_millis(100),
            Easing::Linear,
            Instant::from_millis(0),
        );
        assert!(ramp.is_running());

        assert_eq!(ramp.update(Instant::from_millis(50)), 50);
        assert_eq!(ramp.update(Instant::from_millis(100)), 100);
        assert!(!ramp.is_running());
    }

    #[test]
    fn test_ramp_keeps_wall_clock_pace() {
        let mut ramp = Ramp::new(0.0f32);
        ramp.go(
            10.0,
            Duration::from_millis(1000),
            Easing::Linear,
            Instant::from_millis(0),
        );
        // a single late update lands where the clock says
        assert_eq!(ramp.update(Instant::from_millis(750)), 7.5);
        assert_eq!(ramp.update(Instant::from_millis(5000)), 10.0);
    }

    #[test]
    fn test_ramp_zero_duration_jumps() {
        let mut ramp = Ramp::new(1.0f32);
        ramp.go(
            5.0,
            Duration::from_millis(0),
            Easing::QuadraticIn,
            Instant::from_millis(10),
        );
        assert_eq!(ramp.value(), 5.0);
        assert!(!ramp.is_running());
    }

    #[test]
    fn test_retarget_starts_from_present_value() {
        let mut ramp = Ramp::new(0u8);
        ramp.go(
            200,
            Duration::from_millis(100),
            Easing::Linear,
            Instant::from_millis(0),
        );
        assert_eq!(ramp.update(Instant::from_millis(50)), 100);
        ramp.go(
            0,
            Duration::from_millis(100),
            Easing::Linear,
            Instant::from_millis(50),
        );
        assert_eq!(ramp.update(Instant::from_millis(100)), 50);
        assert_eq!(ramp.target(), 0);
    }

    #[test]
    fn test_easing_curves() {
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
        assert_eq!(Easing::QuadraticIn.apply(0.5), 0.25);
        assert_eq!(Easing::QuadraticOut.apply(0.5), 0.75);
        assert_eq!(Easing::QuadraticInOut.apply(0.5), 0.5);
        assert_eq!(Easing::QuadraticIn.apply(2.0), 1.0);
    }

    #[test]
    fn test_ramp_rgb() {
        let mut ramp = Ramp::new(Rgb::new(0, 0, 0));
        ramp.go(
            Rgb::new(255, 255, 255),
            Duration::from_millis(100),
            Easing::Linear,
            Instant::from_millis(0),
        );
        assert!(ramp.is_running());
        assert_eq!(
            ramp.update(Instant::from_millis(100)),
            Rgb::new(255, 255, 255)
        );
    }
}

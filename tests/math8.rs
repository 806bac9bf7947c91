mod tests {
    use embassy_time::Duration;
    use klystron_core::math8::{progress, round_u16, round_u8, scale8, scale8_video};

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(255, 255), 255);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_scale8_video_keeps_lit_channels() {
        assert_eq!(scale8_video(1, 1), 1);
        assert_eq!(scale8_video(0, 200), 0);
        assert_eq!(scale8_video(200, 0), 0);
        assert!(scale8_video(10, 10) >= 1);
    }

    #[test]
    fn test_progress() {
        let total = Duration::from_millis(100);
        assert_eq!(progress(Duration::from_millis(0), total), 0.0);
        assert_eq!(progress(Duration::from_millis(50), total), 0.5);
        assert_eq!(progress(Duration::from_millis(150), total), 1.0);
        assert_eq!(
            progress(Duration::from_millis(10), Duration::from_millis(0)),
            1.0
        );
    }

    #[test]
    fn test_rounding_saturates() {
        assert_eq!(round_u8(127.5), 128);
        assert_eq!(round_u8(-4.0), 0);
        assert_eq!(round_u8(300.0), 255);
        assert_eq!(round_u16(70_000.0), u16::MAX);
        assert_eq!(round_u16(99.4), 99);
    }
}

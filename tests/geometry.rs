mod tests {
    use embassy_time::{Duration, Instant};
    use klystron_core::color::{BLACK, RED, Rgb};
    use klystron_core::geometry::{
        RING_CAPACITY, block_index, mask_beyond, paint_block, tube_positions,
    };
    use klystron_core::{AnimationConfig, AnimationController, PatternId, RingSelector, RingSize};

    type Ring = AnimationController<(), RING_CAPACITY, 4>;

    #[test]
    fn test_classify() {
        assert_eq!(RingSize::classify(0), RingSize::Four);
        assert_eq!(RingSize::classify(0x500), RingSize::TwentyFour);
        assert_eq!(RingSize::classify(0x900), RingSize::ThirtyTwo);
        assert_eq!(RingSize::classify(0xFFF), RingSize::Forty);
    }

    #[test]
    fn test_first_reading_is_not_a_change() {
        let mut selector = RingSelector::new();
        assert_eq!(selector.size(), None);
        assert_eq!(selector.update(0x500), None);
        assert_eq!(selector.size(), Some(RingSize::TwentyFour));
    }

    #[test]
    fn test_hysteresis() {
        let mut selector = RingSelector::new();
        selector.update(0x500);

        // inside the band above the threshold
        assert_eq!(selector.update(0x850), None);
        assert_eq!(selector.update(0x900), Some(RingSize::ThirtyTwo));

        // inside the band below the threshold
        assert_eq!(selector.update(0x790), None);
        assert_eq!(selector.update(0x770), Some(RingSize::TwentyFour));
    }

    #[test]
    fn test_tube_positions() {
        assert_eq!(RingSize::Four.tubes(), [0, 1, 2, 3]);
        assert_eq!(RingSize::TwentyFour.tubes(), [3, 9, 13, 19]);
        assert_eq!(tube_positions(40), [5, 15, 23, 33]);
        // unsupported counts fall back to the full ring
        assert_eq!(tube_positions(17), [5, 15, 23, 33]);
    }

    #[test]
    fn test_block_wraps_around() {
        assert_eq!(block_index(0, 0, 3, 40), 39);
        assert_eq!(block_index(39, 2, 3, 40), 0);

        let mut leds = [BLACK; 8];
        paint_block(&mut leds, 0, 3, RED);
        assert_eq!(leds[7], RED);
        assert_eq!(leds[0], RED);
        assert_eq!(leds[1], RED);
        assert_eq!(leds[2], BLACK);
    }

    #[test]
    fn test_mask_beyond() {
        let mut leds = [RED; 6];
        mask_beyond(&mut leds, 4);
        assert_eq!(leds, [RED, RED, RED, RED, BLACK, BLACK]);
        mask_beyond(&mut leds, 10);
        assert_eq!(leds[0], RED);
    }

    fn run_masked(id: PatternId, config: AnimationConfig) -> [Rgb; RING_CAPACITY] {
        let mut ring = Ring::new();
        ring.set_active_leds(RingSize::TwentyFour.count());
        ring.play(id.to_slot(), config, Instant::from_millis(0));
        for step in 1..=100u64 {
            ring.update(Duration::from_millis(4), Instant::from_millis(step * 4));
        }
        let mut pixels = [BLACK; RING_CAPACITY];
        pixels.copy_from_slice(ring.pixels());
        pixels
    }

    #[test]
    fn test_patterns_stay_within_active_ring() {
        let config = AnimationConfig::default().with_color(RED).with_speed(400);
        let cases = [
            (PatternId::Rotate, config),
            (PatternId::RotateFade, config.with_fade(4, 64)),
            (PatternId::FeedbackRainbow, AnimationConfig::default()),
        ];
        for (id, config) in cases {
            let pixels = run_masked(id, config);
            assert!(
                pixels[24..].iter().all(|pixel| *pixel == BLACK),
                "{:?} leaked past the active ring",
                id
            );
            assert!(pixels[..24].iter().any(|pixel| *pixel != BLACK));
        }
    }
}

mod tests {
    use embassy_time::{Duration, Instant};
    use klystron_core::color::{BLACK, RED, Rgb};
    use klystron_core::geometry::tube_positions;
    use klystron_core::{AnimationConfig, AnimationController, PatternId};

    const TICK: Duration = Duration::from_millis(4);

    /// Controller plus the time of its last update
    struct Strip<const N: usize> {
        controller: AnimationController<(), N, 4>,
        now: u64,
    }

    impl<const N: usize> Strip<N> {
        fn play(pattern: PatternId, config: AnimationConfig) -> Self {
            let mut controller = AnimationController::new();
            controller.play(pattern.to_slot(), config, Instant::from_millis(0));
            Self { controller, now: 0 }
        }

        /// Update in 4 ms ticks up to `ms` after the start
        fn run_to(&mut self, ms: u64) {
            while self.now < ms {
                self.now += 4;
                self.controller.update(TICK, Instant::from_millis(self.now));
            }
        }

        fn pixels(&self) -> &[Rgb] {
            self.controller.pixels()
        }

        fn lit(&self) -> Vec<usize> {
            self.pixels()
                .iter()
                .enumerate()
                .filter(|(_, pixel)| **pixel != BLACK)
                .map(|(i, _)| i)
                .collect()
        }
    }

    fn red(speed: u16) -> AnimationConfig {
        AnimationConfig::default().with_color(RED).with_speed(speed)
    }

    #[test]
    fn test_fill_lights_one_pixel_per_step() {
        let mut strip = Strip::<15>::play(PatternId::Fill, red(1000));
        assert!(strip.lit().is_empty());

        strip.run_to(988);
        assert!(strip.controller.is_running());
        assert_eq!(strip.lit().len(), 14);

        strip.run_to(992);
        assert!(!strip.controller.is_running());
        assert_eq!(strip.lit().len(), 15);
    }

    #[test]
    fn test_waterfall_stacks_from_the_bottom() {
        // 15 pixels take 120 drop steps, 40 ms each at this speed
        let mut strip = Strip::<15>::play(PatternId::Waterfall, red(4800));
        assert_eq!(strip.lit(), [14]);

        // the first drop falls 14 pixels before the next one appears
        strip.run_to(560);
        assert_eq!(strip.lit(), [0]);
        strip.run_to(600);
        assert_eq!(strip.lit(), [0, 14]);

        strip.run_to(4756);
        assert!(strip.controller.is_running());
        strip.run_to(4760);
        assert!(!strip.controller.is_running());
        assert_eq!(strip.lit().len(), 15);
        assert!(strip.pixels().iter().all(|pixel| *pixel == RED));
    }

    #[test]
    fn test_fade_out_finishes_dark() {
        let mut strip = Strip::<8>::play(PatternId::FadeOut, red(300));
        assert!(strip.pixels().iter().all(|pixel| *pixel == RED));

        strip.run_to(252);
        assert!(strip.controller.is_running());
        assert!(!strip.lit().is_empty());

        strip.run_to(256);
        assert!(!strip.controller.is_running());
        assert!(strip.lit().is_empty());
    }

    #[test]
    fn test_fade_in_finishes_at_full_color() {
        let mut strip = Strip::<8>::play(PatternId::FadeIn, red(1024));
        assert!(strip.lit().is_empty());

        strip.run_to(512);
        let half = strip.pixels()[0];
        assert!(half != BLACK && half != RED);

        strip.run_to(1020);
        assert!(strip.controller.is_running());
        strip.run_to(1024);
        assert!(!strip.controller.is_running());
        assert!(strip.pixels().iter().all(|pixel| *pixel == RED));
    }

    #[test]
    fn test_cylon_fade_out_finishes_dark() {
        let config = red(1000).with_fade(262, 0);
        let mut strip = Strip::<24>::play(PatternId::CylonFadeOut, config);

        strip.run_to(4);
        assert_eq!(strip.lit().len(), 1);

        strip.run_to(1000);
        assert!(strip.controller.is_running());
        strip.run_to(1004);
        assert!(!strip.controller.is_running());
        assert!(strip.lit().is_empty());
    }

    #[test]
    fn test_strobe_alternates_even_and_odd() {
        let mut strip = Strip::<8>::play(PatternId::Strobe, red(100));

        strip.run_to(48);
        assert!(strip.lit().is_empty());

        strip.run_to(52);
        assert_eq!(strip.lit(), [0, 2, 4, 6]);

        strip.run_to(100);
        assert_eq!(strip.lit(), [1, 3, 5, 7]);

        strip.run_to(152);
        assert_eq!(strip.lit(), [0, 2, 4, 6]);
    }

    #[test]
    fn test_cylon_wraps() {
        let mut strip = Strip::<8>::play(PatternId::Cylon, red(100));
        assert_eq!(strip.lit(), [0]);

        strip.run_to(700);
        assert_eq!(strip.lit(), [7]);
        strip.run_to(800);
        assert_eq!(strip.lit(), [0]);
    }

    #[test]
    fn test_cylon_bounces() {
        let config = red(100).with_bounce(true);
        let mut strip = Strip::<8>::play(PatternId::Cylon, config);

        strip.run_to(700);
        assert_eq!(strip.lit(), [7]);
        strip.run_to(800);
        assert_eq!(strip.lit(), [6]);
        strip.run_to(1400);
        assert_eq!(strip.lit(), [0]);
        strip.run_to(1500);
        assert_eq!(strip.lit(), [1]);
    }

    #[test]
    fn test_shift_rotate_lights_every_fourth_pixel() {
        let mut strip = Strip::<16>::play(PatternId::ShiftRotate, red(160));
        assert_eq!(strip.lit(), [0, 4, 8, 12]);

        strip.run_to(12);
        assert_eq!(strip.lit(), [3, 7, 11, 15]);

        let config = red(160).with_clockwise(false);
        let mut strip = Strip::<16>::play(PatternId::ShiftRotate, config);
        strip.run_to(12);
        assert_eq!(strip.lit(), [1, 5, 9, 13]);
    }

    #[test]
    fn test_slime_refills_each_tube() {
        let tubes = tube_positions(40);
        let config = red(400).with_fade(64, 4);
        let mut strip = Strip::<40>::play(PatternId::Slime, config);
        for tube in tubes {
            assert_eq!(strip.pixels()[tube], RED);
        }

        // four 25 ms substeps drip the first tube, then it refills
        strip.run_to(76);
        let dripping = strip.pixels()[tubes[0]];
        assert!(dripping != BLACK && dripping != RED);
        assert_eq!(strip.pixels()[tubes[1]], RED);

        strip.run_to(100);
        assert_eq!(strip.pixels()[tubes[0]], RED);

        strip.run_to(128);
        assert_eq!(strip.pixels()[tubes[0]], RED);
        assert_ne!(strip.pixels()[tubes[1]], RED);
    }
}

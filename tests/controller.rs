mod tests {
    use embassy_time::{Duration, Instant};
    use klystron_core::color::{BLACK, RED, Rgb};
    use klystron_core::{Action, AnimationConfig, AnimationController, Easing, PatternId};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Cue {
        First,
        Second,
    }

    type Controller = AnimationController<Cue, 8, 4>;

    const TICK: Duration = Duration::from_millis(4);

    fn red(speed: u16) -> AnimationConfig {
        AnimationConfig::default().with_color(RED).with_speed(speed)
    }

    fn lit(pixels: &[Rgb]) -> usize {
        pixels.iter().filter(|pixel| **pixel != BLACK).count()
    }

    #[test]
    fn test_play_starts_immediately() {
        let mut controller = Controller::new();
        assert!(!controller.is_running());

        controller.play(PatternId::Drain.to_slot(), red(80), Instant::from_millis(0));
        assert!(controller.is_running());
        assert_eq!(lit(controller.pixels()), 8);
        assert_eq!(
            controller.current_animation().map(|slot| slot.id()),
            Some(PatternId::Drain)
        );
    }

    #[test]
    fn test_finite_animation_ends() {
        let mut controller = Controller::new();
        controller.play(PatternId::Drain.to_slot(), red(80), Instant::from_millis(0));

        let mut now = 0;
        while controller.is_running() && now < 1000 {
            now += 4;
            controller.update(TICK, Instant::from_millis(now));
        }
        assert!(!controller.is_running());
        assert_eq!(lit(controller.pixels()), 0);
    }

    #[test]
    fn test_instant_actions_chain_in_one_update() {
        let mut controller = Controller::new();
        let now = Instant::from_millis(0);
        controller
            .enqueue(Action::play_pattern(PatternId::Cylon, red(1000)), now)
            .unwrap();
        controller
            .enqueue(
                Action::change_speed(500, Duration::from_millis(0), Easing::Linear),
                now,
            )
            .unwrap();
        controller.enqueue(Action::callback(Cue::First), now).unwrap();

        assert_eq!(controller.take_cue(), Some(Cue::First));
        let speed = controller
            .current_animation()
            .map(|slot| slot.base().speed());
        assert_eq!(speed, Some(500));
    }

    #[test]
    fn test_wait_holds_the_queue() {
        let mut controller = Controller::new();
        let now = Instant::from_millis(0);
        controller
            .enqueue(Action::wait(Duration::from_millis(20)), now)
            .unwrap();
        controller.enqueue(Action::callback(Cue::First), now).unwrap();
        controller.enqueue(Action::callback(Cue::Second), now).unwrap();

        for step in 1..5 {
            controller.update(TICK, Instant::from_millis(step * 4));
            assert_eq!(controller.take_cue(), None);
        }
        controller.update(TICK, Instant::from_millis(20));
        assert_eq!(controller.take_cue(), Some(Cue::First));
        assert_eq!(controller.take_cue(), Some(Cue::Second));
        assert!(!controller.is_running());
    }

    #[test]
    fn test_enqueue_overflow_returns_action() {
        let mut controller = Controller::new();
        let now = Instant::from_millis(0);
        // the first wait starts at once and leaves the queue
        for _ in 0..5 {
            controller
                .enqueue(Action::wait(Duration::from_millis(100)), now)
                .unwrap();
        }
        let rejected = controller.enqueue(Action::callback(Cue::First), now);
        assert!(matches!(rejected, Err(Action::Callback(Cue::First))));
    }

    #[test]
    fn test_stop_drops_pending_cues() {
        let mut controller = Controller::new();
        let now = Instant::from_millis(0);
        controller
            .enqueue(Action::wait(Duration::from_millis(8)), now)
            .unwrap();
        controller.enqueue(Action::callback(Cue::First), now).unwrap();
        controller.stop();

        controller.update(TICK, Instant::from_millis(4));
        controller.update(TICK, Instant::from_millis(8));
        assert_eq!(controller.take_cue(), None);
        assert!(!controller.is_running());
    }

    #[test]
    fn test_play_replaces_queue() {
        let mut controller = Controller::new();
        let now = Instant::from_millis(0);
        controller
            .enqueue(Action::wait(Duration::from_millis(8)), now)
            .unwrap();
        controller.enqueue(Action::callback(Cue::First), now).unwrap();
        controller.play(PatternId::Scroll.to_slot(), red(800), now);

        controller.update(TICK, Instant::from_millis(4));
        controller.update(TICK, Instant::from_millis(8));
        assert_eq!(controller.take_cue(), None);
        assert!(controller.is_running());
    }

    #[test]
    fn test_retarget_without_animation_is_ignored() {
        let mut controller = Controller::new();
        let now = Instant::from_millis(0);
        controller
            .enqueue(
                Action::change_color(RED, Duration::from_millis(100), Easing::Linear),
                now,
            )
            .unwrap();
        assert!(controller.current_animation().is_none());
        assert!(!controller.is_running());
    }

    #[test]
    fn test_pixels_beyond_active_count_stay_dark() {
        let mut controller = Controller::new();
        controller.set_active_leds(4);
        controller.play(PatternId::Drain.to_slot(), red(80), Instant::from_millis(0));
        controller.update(TICK, Instant::from_millis(4));

        assert_eq!(controller.active_leds(), 4);
        assert!(controller.pixels()[4..].iter().all(|pixel| *pixel == BLACK));
        assert_eq!(lit(&controller.pixels()[..4]), 4);
    }
}

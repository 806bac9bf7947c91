mod tests {
    use klystron_core::easter_egg::{
        PRIMARY_AWAITING, PRIMARY_DUE, PRIMARY_IDLE, SOUND_PAIRS, TICKS_PER_SECOND,
    };
    use klystron_core::{EasterEggTimer, EggSound};

    /// Tick until the call sound is due, returning it
    fn run_to_call(egg: &mut EasterEggTimer) -> EggSound {
        assert_eq!(egg.poll(true, false), None);
        let mut ticks = 0u32;
        while egg.primary() > PRIMARY_DUE {
            egg.on_tick();
            ticks += 1;
        }
        assert!(ticks + PRIMARY_DUE >= 30 * TICKS_PER_SECOND);
        assert!(ticks < 120 * TICKS_PER_SECOND);
        egg.poll(true, false).unwrap()
    }

    #[test]
    fn test_disabled_timer_stays_idle() {
        let mut egg = EasterEggTimer::new(7);
        assert_eq!(egg.poll(false, false), None);
        assert_eq!(egg.primary(), PRIMARY_IDLE);
    }

    #[test]
    fn test_call_then_reply_on_fire() {
        let mut egg = EasterEggTimer::new(42);
        let EggSound::Call(call) = run_to_call(&mut egg) else {
            panic!("expected a call sound");
        };
        assert_eq!(egg.primary(), PRIMARY_AWAITING);
        assert_eq!(egg.response(), 3 * TICKS_PER_SECOND);

        egg.fire();
        let Some(EggSound::Reply(reply)) = egg.poll(true, false) else {
            panic!("expected a reply sound");
        };
        assert!(SOUND_PAIRS.contains(&(call, reply)));
        assert_eq!(egg.primary(), PRIMARY_IDLE);
    }

    #[test]
    fn test_window_closes_without_fire() {
        let mut egg = EasterEggTimer::new(3);
        run_to_call(&mut egg);
        for _ in 0..=3 * TICKS_PER_SECOND {
            egg.on_tick();
        }
        assert_eq!(egg.primary(), PRIMARY_IDLE);
        egg.fire();
        // the late fire re-arms instead of replying
        assert_eq!(egg.poll(true, false), None);
        assert!(egg.primary() > PRIMARY_DUE);
    }

    #[test]
    fn test_song_parks_the_timer() {
        let mut egg = EasterEggTimer::new(9);
        egg.poll(true, false);
        assert!(egg.primary() > PRIMARY_DUE);
        assert_eq!(egg.poll(true, true), None);
        assert_eq!(egg.primary(), PRIMARY_IDLE);
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let mut first = EasterEggTimer::new(1234);
        let mut second = EasterEggTimer::new(1234);
        first.poll(true, false);
        second.poll(true, false);
        assert_eq!(first.primary(), second.primary());
    }
}

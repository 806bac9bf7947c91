mod tests {
    use embassy_time::{Duration, Instant};
    use klystron_core::color::{BLACK, Rgb};
    use klystron_core::{
        DeviceVariant, Dial, OutputDriver, Pack, PackConfig, PackIo, Renderer, TickScheduler,
        VoiceSink, Zone,
    };

    #[derive(Debug, Default)]
    struct RecordingDriver {
        writes: Vec<(Zone, Vec<Rgb>)>,
    }

    impl RecordingDriver {
        fn last(&self, zone: Zone) -> &[Rgb] {
            self.writes
                .iter()
                .rev()
                .find(|(written, _)| *written == zone)
                .map(|(_, colors)| colors.as_slice())
                .unwrap()
        }
    }

    impl OutputDriver for RecordingDriver {
        fn write(&mut self, zone: Zone, colors: &[Rgb]) {
            self.writes.push((zone, colors.to_vec()));
        }
    }

    struct PoweredIo;

    impl PackIo for PoweredIo {
        fn power_switch(&self) -> bool {
            true
        }

        fn pack_power_switch(&self) -> bool {
            false
        }

        fn pack_power_request(&self) -> bool {
            false
        }

        fn clear_pack_power_request(&mut self) {}

        fn fire(&self) -> bool {
            false
        }

        fn fire_tap(&self) -> bool {
            false
        }

        fn clear_fire_tap(&mut self) {}

        fn vent(&self) -> bool {
            false
        }

        fn song_switch(&self) -> bool {
            false
        }

        fn song_toggle(&self) -> bool {
            false
        }

        fn clear_song_toggle(&mut self) {}

        fn dial(&self, dial: Dial) -> u16 {
            match dial {
                Dial::Speed => 2048,
                Dial::Ring => 0x500,
            }
        }

        fn set_vent_light(&mut self, _on: bool) {}

        fn signal_wand(&mut self, _busy: bool) {}
    }

    struct SilentVoice;

    impl VoiceSink for SilentVoice {
        fn start(&mut self, _index: u8) {}

        fn is_playing(&self) -> bool {
            false
        }

        fn stop(&mut self) {}
    }

    fn lit(colors: &[Rgb]) -> usize {
        colors.iter().filter(|color| **color != BLACK).count()
    }

    /// Runs a powered pack through the scheduler for `ms`
    fn run(pack: &mut Pack, scheduler: &mut TickScheduler<RecordingDriver>, ms: u64) {
        let mut io = PoweredIo;
        let mut voice = SilentVoice;
        for step in 1..=ms / 4 {
            let now = Instant::from_millis(step * 4);
            pack.process(now, &mut io, &mut voice);
            scheduler.tick(pack, now);
        }
    }

    #[test]
    fn test_writes_every_zone_once_per_tick() {
        let mut pack = Pack::new(PackConfig::new(DeviceVariant::SnapRed));
        let mut scheduler = TickScheduler::new(Renderer::new(RecordingDriver::default()));

        scheduler.tick(&mut pack, Instant::from_millis(0));

        let writes = &scheduler.renderer().output().writes;
        let zones: Vec<Zone> = writes.iter().map(|(zone, _)| *zone).collect();
        let lengths: Vec<usize> = writes.iter().map(|(_, colors)| colors.len()).collect();
        assert_eq!(zones, Zone::ALL);
        assert_eq!(lengths, [15, 40, 16]);
        assert_eq!(scheduler.renderer().frames(), 1);
    }

    #[test]
    fn test_ring_masked_beyond_active_size() {
        let mut pack = Pack::new(PackConfig::new(DeviceVariant::SnapRed));
        let mut scheduler = TickScheduler::new(Renderer::new(RecordingDriver::default()));

        run(&mut pack, &mut scheduler, 500);

        assert_eq!(pack.active_ring_leds(), 24);
        let ring = scheduler.renderer().output().last(Zone::Cyclotron);
        assert!(lit(&ring[..24]) > 0);
        assert_eq!(lit(&ring[24..]), 0);
    }

    #[test]
    fn test_zero_brightness_blanks_output() {
        let mut pack = Pack::new(PackConfig::new(DeviceVariant::SnapRed));
        let mut scheduler = TickScheduler::new(Renderer::new(RecordingDriver::default()));

        run(&mut pack, &mut scheduler, 500);
        assert!(lit(scheduler.renderer().output().last(Zone::Powercell)) > 0);

        pack.set_brightness(0, Duration::from_millis(0), Instant::from_millis(500));
        scheduler.tick(&mut pack, Instant::from_millis(504));

        let output = scheduler.renderer().output();
        for zone in Zone::ALL {
            assert_eq!(lit(output.last(zone)), 0, "{zone:?} still lit");
        }
    }

    #[test]
    fn test_deadlines_advance_by_period() {
        let mut pack = Pack::new(PackConfig::new(DeviceVariant::SnapRed));
        let mut scheduler = TickScheduler::new(Renderer::new(RecordingDriver::default()));
        assert_eq!(scheduler.period(), Duration::from_millis(4));

        let result = scheduler.tick(&mut pack, Instant::from_millis(0));
        assert_eq!(result.next_deadline, Instant::from_millis(4));
        assert_eq!(result.sleep_duration, Duration::from_millis(4));

        let result = scheduler.tick(&mut pack, Instant::from_millis(4));
        assert_eq!(result.next_deadline, Instant::from_millis(8));
    }

    #[test]
    fn test_drift_resets_schedule() {
        let mut pack = Pack::new(PackConfig::new(DeviceVariant::SnapRed));
        let mut scheduler = TickScheduler::new(Renderer::new(RecordingDriver::default()));

        scheduler.tick(&mut pack, Instant::from_millis(0));
        let result = scheduler.tick(&mut pack, Instant::from_millis(100));
        assert_eq!(result.next_deadline, Instant::from_millis(104));
        assert_eq!(result.sleep_duration, Duration::from_millis(4));

        // slightly late ticks keep the cadence
        let result = scheduler.tick(&mut pack, Instant::from_millis(105));
        assert_eq!(result.next_deadline, Instant::from_millis(108));
        assert_eq!(result.sleep_duration, Duration::from_millis(3));
    }

    #[test]
    fn test_behind_schedule_sleeps_zero() {
        let mut pack = Pack::new(PackConfig::new(DeviceVariant::SnapRed));
        let renderer = Renderer::new(RecordingDriver::default());
        let mut scheduler = TickScheduler::with_period(renderer, Duration::from_millis(10));

        scheduler.tick(&mut pack, Instant::from_millis(0));
        let result = scheduler.tick(&mut pack, Instant::from_millis(25));
        assert_eq!(result.next_deadline, Instant::from_millis(20));
        assert_eq!(result.sleep_duration, Duration::from_millis(0));
    }
}

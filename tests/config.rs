mod tests {
    use klystron_core::color::RED;
    use klystron_core::config::{FireCue, dip};
    use klystron_core::{DeviceVariant, FireMode, PackConfig};

    #[test]
    fn test_variant_from_dip_switches() {
        assert_eq!(DeviceVariant::from_dip_switches(0), DeviceVariant::SnapRed);
        assert_eq!(
            DeviceVariant::from_dip_switches(dip::PACK_SELECT_0),
            DeviceVariant::FadeRed
        );
        assert_eq!(
            DeviceVariant::from_dip_switches(dip::PACK_SELECT_1),
            DeviceVariant::TvgFade
        );
        assert_eq!(
            DeviceVariant::from_dip_switches(dip::PACK_SELECT),
            DeviceVariant::Afterlife
        );
        assert_eq!(
            DeviceVariant::from_dip_switches(dip::PACK_SELECT | dip::HEAT),
            DeviceVariant::AfterlifeTvg
        );
    }

    #[test]
    fn test_config_from_dip_switches() {
        let config = PackConfig::from_dip_switches(dip::PACK_SELECT_1 | dip::HEAT | dip::HUM);
        assert_eq!(config.variant, DeviceVariant::TvgFade);
        assert!(config.features.overheat);
        assert!(config.features.hum);
        assert!(!config.features.easter_egg);
        assert!(config.cycles_modes());

        let snap = PackConfig::from_dip_switches(dip::EASTER_EGG);
        assert!(snap.features.easter_egg);
        assert!(!snap.cycles_modes());
    }

    #[test]
    fn test_from_raw() {
        assert_eq!(DeviceVariant::from_raw(4), Some(DeviceVariant::AfterlifeTvg));
        assert_eq!(DeviceVariant::from_raw(5), None);
        assert_eq!(FireMode::from_raw(7), Some(FireMode::MesonCollider));
        assert_eq!(FireMode::from_raw(8), None);
    }

    #[test]
    fn test_mode_cycle_wraps() {
        let mut mode = FireMode::ProtonStream;
        for _ in 0..FireMode::COUNT {
            mode = mode.next();
        }
        assert_eq!(mode, FireMode::ProtonStream);
        assert_eq!(FireMode::MesonCollider.next(), FireMode::ProtonStream);
    }

    #[test]
    fn test_major_changes() {
        let major: Vec<_> = (0..8)
            .filter_map(|raw| FireMode::from_raw(raw))
            .filter_map(|mode| mode.major_change().map(|change| (mode, change.first_sound)))
            .collect();
        assert_eq!(
            major,
            [
                (FireMode::BosonDart, 23),
                (FireMode::SlimeTether, 24),
                (FireMode::ShockBlast, 33),
                (FireMode::MesonCollider, 43),
            ]
        );
    }

    #[test]
    fn test_fire_sounds() {
        let snap = DeviceVariant::SnapRed.fire_sounds(FireMode::ProtonStream);
        assert_eq!(snap.get(FireCue::Start), Some(61));
        let tvg = DeviceVariant::TvgFade.fire_sounds(FireMode::BosonDart);
        assert_eq!(tvg.get(FireCue::Start), Some(21));
        assert_eq!(tvg.get(FireCue::End), None);
        assert!(DeviceVariant::TvgFade.waits_for_fire_start(FireMode::BosonDart));
        assert!(!DeviceVariant::SnapRed.waits_for_fire_start(FireMode::ProtonStream));
    }

    #[test]
    fn test_afterlife_ring_stays_red() {
        let colors = DeviceVariant::Afterlife.colors(FireMode::SlimeBlower);
        assert_eq!(colors.cyclotron, RED);
        let tvg = DeviceVariant::AfterlifeTvg.colors(FireMode::SlimeBlower);
        assert_ne!(tvg.cyclotron, RED);
    }

    #[test]
    fn test_hum_sounds() {
        assert_eq!(DeviceVariant::SnapRed.hum_sound(FireMode::ProtonStream), 13);
        assert_eq!(DeviceVariant::TvgFade.hum_sound(FireMode::BosonDart), 60);
        assert_eq!(DeviceVariant::Afterlife.hum_sound(FireMode::ProtonStream), 120);
        assert_eq!(DeviceVariant::TvgFade.hum_sound(FireMode::SlimeTether), 25);
    }
}

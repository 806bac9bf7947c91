//! Static pack configuration
//!
//! Device variant, fire modes, feature switches and the per-variant tables
//! for sounds, heat, colors and choreography timings.

use embassy_time::Duration;

use crate::color::{BLUE, GREEN, ORANGE, RED, Rgb, WHITE};
use crate::geometry::RING_CAPACITY;
use crate::heat::HeatSettings;

/// Fixed tick period of the animation/heat timer
pub const TICK_INTERVAL: Duration = Duration::from_millis(4);

pub const POWERCELL_LEDS: usize = 15;
pub const CYCLOTRON_LEDS: usize = RING_CAPACITY;
pub const FUTURE_LEDS: usize = 16;

/// Fastest and slowest gauge cycle selectable with the speed dial
pub const ADJ_MIN_MS: u16 = 400;
pub const ADJ_MAX_MS: u16 = 1300;
/// Largest dial reading
pub const DIAL_MAX: u16 = 4095;
/// Classic ring period, the middle of the dial range
pub const RING_CLASSIC_SPEED_MS: u16 = ADJ_MIN_MS + ((ADJ_MAX_MS - ADJ_MIN_MS) >> 1);

/// Songs are sounds `SONG_BASE_SOUND..SONG_BASE_SOUND + SONG_COUNT`
pub const SONG_COUNT: u8 = 4;
pub const SONG_BASE_SOUND: u8 = 96;
pub const SONG_DEBOUNCE: Duration = Duration::from_millis(500);

pub const SLIME_QUOTE_COUNT: u8 = 4;
pub const SLIME_QUOTE_BASE_SOUND: u8 = 150;

/// Upper bound on every mode change choreography wait
pub const MODE_CHANGE_TIMEOUT: Duration = Duration::from_millis(5000);
/// Period of the autovent strobe
pub const AUTOVENT_CYCLE_MS: u16 = 250;
/// Hold after a fire start cue before the state machine moves on
pub const FIRE_START_HOLD: Duration = Duration::from_millis(750);

/// Ring speed multiplier at the start of the ring-style spin-up
pub const RING_SPIN_UP_START: f32 = 5.0;
pub const RING_SPIN_UP: Duration = Duration::from_millis(6000);
/// Ring cylon period at a speed multiplier of 1
pub const RING_NOMINAL_SPEED_MS: u16 = 1000;
pub const COOLDOWN_SLOWDOWN: Duration = Duration::from_millis(1000);
pub const COOLDOWN_SPEEDUP: Duration = Duration::from_millis(4000);

/// Fixed sound indices
pub mod sound {
    pub const STARTUP_CLASSIC: u8 = 10;
    pub const STARTUP_TVG: u8 = 58;
    pub const STARTUP_AFTERLIFE: u8 = 121;
    pub const CHIME: u8 = 12;
    pub const OVERHEAT_BEEP: u8 = 53;
    pub const AUTOVENT: u8 = 54;
    pub const VENT: u8 = 55;
    pub const STANDBY: u8 = 59;
    pub const AFTERLIFE_POWERUP_HIGH: u8 = 125;
}

/// DIP switch bits
pub mod dip {
    pub const PACK_SELECT_0: u8 = 0x01;
    pub const PACK_SELECT_1: u8 = 0x02;
    pub const PACK_SELECT: u8 = PACK_SELECT_0 | PACK_SELECT_1;
    pub const HEAT: u8 = 0x04;
    pub const EASTER_EGG: u8 = 0x08;
    pub const HUM: u8 = 0x10;
}

const HEAT_SETTINGS: [HeatSettings; 5] = [
    HeatSettings {
        start_beep: 6 * 250,
        start_autovent: 10 * 250,
        cool_factor: 1,
    },
    HeatSettings {
        start_beep: 7 * 250,
        start_autovent: 11 * 250,
        cool_factor: 1,
    },
    HeatSettings {
        start_beep: 8 * 250,
        start_autovent: 13 * 250,
        cool_factor: 1,
    },
    HeatSettings {
        start_beep: 7 * 250,
        start_autovent: 11 * 250,
        cool_factor: 1,
    },
    HeatSettings {
        start_beep: 8 * 250,
        start_autovent: 13 * 250,
        cool_factor: 1,
    },
];

const SHORT_POWERUP_SOUNDS: [u8; 5] = [93, 94, 94, 124, 124];

const POWERDOWN_SEQUENCES: [PowerdownSequence; 5] = [
    PowerdownSequence {
        sound: 11,
        powercell: PowercellShutdown::InstantOff,
        powercell_ms: 0,
        cyclotron: CyclotronShutdown::InstantOff,
        cyclotron_ms: 0,
    },
    PowerdownSequence {
        sound: 11,
        powercell: PowercellShutdown::Drain,
        powercell_ms: 2900,
        cyclotron: CyclotronShutdown::FadeOut,
        cyclotron_ms: 2900,
    },
    PowerdownSequence {
        sound: 59,
        powercell: PowercellShutdown::Drain,
        powercell_ms: 3100,
        cyclotron: CyclotronShutdown::FadeOut,
        cyclotron_ms: 3100,
    },
    PowerdownSequence {
        sound: 11,
        powercell: PowercellShutdown::Drain,
        powercell_ms: 2900,
        cyclotron: CyclotronShutdown::FadeOut,
        cyclotron_ms: 2900,
    },
    PowerdownSequence {
        sound: 11,
        powercell: PowercellShutdown::Drain,
        powercell_ms: 2900,
        cyclotron: CyclotronShutdown::FadeOut,
        cyclotron_ms: 2900,
    },
];

// Indexed by mode for the TVG variants, then snap, fade and afterlife sets
const FIRE_SOUNDS: [FireSounds; 11] = [
    FireSounds::new(19, 16, 20, 18),
    FireSounds::new(21, 0, 22, 0),
    FireSounds::new(27, 28, 0, 29),
    FireSounds::new(30, 0, 0, 29),
    FireSounds::new(36, 37, 38, 39),
    FireSounds::new(40, 0, 41, 0),
    FireSounds::new(46, 47, 48, 49),
    FireSounds::new(50, 0, 51, 0),
    FireSounds::new(61, 62, 110, 111),
    FireSounds::new(61, 62, 110, 111),
    FireSounds::new(126, 127, 128, 129),
];

const SLEEP_ALIGN_MS: [u64; 11] = [1100, 0, 0, 0, 1600, 0, 1800, 0, 150, 300, 300];

const FIRE_TABLE_SNAP: usize = 8;
const FIRE_TABLE_FADE: usize = 9;
const FIRE_TABLE_AFTERLIFE: usize = 10;

/// Hardware and behavior profile of the pack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeviceVariant {
    SnapRed = 0,
    FadeRed = 1,
    TvgFade = 2,
    Afterlife = 3,
    AfterlifeTvg = 4,
}

impl DeviceVariant {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::SnapRed,
            1 => Self::FadeRed,
            2 => Self::TvgFade,
            3 => Self::Afterlife,
            4 => Self::AfterlifeTvg,
            _ => return None,
        })
    }

    /// Decode the pack select bits
    ///
    /// With both select bits set the heat bit picks the TVG afterlife pack.
    pub const fn from_dip_switches(bits: u8) -> Self {
        match bits & dip::PACK_SELECT {
            dip::PACK_SELECT_0 => Self::FadeRed,
            dip::PACK_SELECT_1 => Self::TvgFade,
            dip::PACK_SELECT if bits & dip::HEAT != 0 => Self::AfterlifeTvg,
            dip::PACK_SELECT => Self::Afterlife,
            _ => Self::SnapRed,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }

    /// Afterlife style ring: a spinning cylon instead of tube positions
    pub const fn is_ring_style(self) -> bool {
        matches!(self, Self::Afterlife | Self::AfterlifeTvg)
    }

    /// Four-position ring that crossfades between tubes
    pub const fn has_fading_ring(self) -> bool {
        matches!(self, Self::FadeRed | Self::TvgFade)
    }

    pub const fn supports_mode_cycling(self) -> bool {
        matches!(self, Self::TvgFade | Self::AfterlifeTvg)
    }

    pub const fn heat_settings(self) -> HeatSettings {
        HEAT_SETTINGS[self.index()]
    }

    pub const fn startup_sound(self) -> u8 {
        match self {
            Self::SnapRed | Self::FadeRed => sound::STARTUP_CLASSIC,
            Self::TvgFade => sound::STARTUP_TVG,
            Self::Afterlife | Self::AfterlifeTvg => sound::STARTUP_AFTERLIFE,
        }
    }

    /// Short power-up cue for standby transitions
    pub const fn short_powerup_sound(self, higher: bool) -> u8 {
        if higher && self.is_ring_style() {
            return sound::AFTERLIFE_POWERUP_HIGH;
        }
        SHORT_POWERUP_SOUNDS[self.index()]
    }

    pub const fn powerdown(self) -> PowerdownSequence {
        POWERDOWN_SEQUENCES[self.index()]
    }

    const fn fire_table_index(self, mode: FireMode) -> usize {
        match self {
            Self::SnapRed => FIRE_TABLE_SNAP,
            Self::FadeRed => FIRE_TABLE_FADE,
            Self::TvgFade | Self::AfterlifeTvg => mode as usize,
            Self::Afterlife => FIRE_TABLE_AFTERLIFE,
        }
    }

    pub const fn fire_sounds(self, mode: FireMode) -> FireSounds {
        FIRE_SOUNDS[self.fire_table_index(mode)]
    }

    /// TVG start cues of odd modes are long and must finish before firing on
    pub const fn waits_for_fire_start(self, mode: FireMode) -> bool {
        self.supports_mode_cycling() && self.fire_table_index(mode) & 1 == 1
    }

    /// Delay aligning the wand lights with the vent sound
    pub const fn sleep_align(self, mode: FireMode) -> Duration {
        Duration::from_millis(SLEEP_ALIGN_MS[self.fire_table_index(mode)])
    }

    /// Idle hum for a fire mode
    pub const fn hum_sound(self, mode: FireMode) -> u8 {
        match mode {
            FireMode::ProtonStream | FireMode::BosonDart => match self {
                Self::SnapRed => 13,
                Self::FadeRed | Self::TvgFade => 60,
                Self::Afterlife | Self::AfterlifeTvg => 120,
            },
            FireMode::SlimeBlower | FireMode::SlimeTether => 25,
            FireMode::StasisStream | FireMode::ShockBlast => 34,
            FireMode::OverloadPulse | FireMode::MesonCollider => 44,
        }
    }

    /// Zone colors for a fire mode on this variant
    pub const fn colors(self, mode: FireMode) -> ZoneColors {
        let mut colors = mode.colors();
        if matches!(self, Self::Afterlife) {
            colors.cyclotron = RED;
        }
        colors
    }
}

/// Selected weapon mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FireMode {
    ProtonStream = 0,
    BosonDart = 1,
    SlimeBlower = 2,
    SlimeTether = 3,
    StasisStream = 4,
    ShockBlast = 5,
    OverloadPulse = 6,
    MesonCollider = 7,
}

impl FireMode {
    pub const COUNT: usize = 8;

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::ProtonStream,
            1 => Self::BosonDart,
            2 => Self::SlimeBlower,
            3 => Self::SlimeTether,
            4 => Self::StasisStream,
            5 => Self::ShockBlast,
            6 => Self::OverloadPulse,
            7 => Self::MesonCollider,
            _ => return None,
        })
    }

    /// Next mode in the cycle, wrapping to the first
    pub const fn next(self) -> Self {
        match self {
            Self::ProtonStream => Self::BosonDart,
            Self::BosonDart => Self::SlimeBlower,
            Self::SlimeBlower => Self::SlimeTether,
            Self::SlimeTether => Self::StasisStream,
            Self::StasisStream => Self::ShockBlast,
            Self::ShockBlast => Self::OverloadPulse,
            Self::OverloadPulse => Self::MesonCollider,
            Self::MesonCollider => Self::ProtonStream,
        }
    }

    pub const fn is_slime(self) -> bool {
        matches!(self, Self::SlimeBlower | Self::SlimeTether)
    }

    pub const fn colors(self) -> ZoneColors {
        let (powercell, cyclotron) = match self {
            Self::ProtonStream | Self::BosonDart => (BLUE, RED),
            Self::SlimeBlower | Self::SlimeTether => (GREEN, GREEN),
            Self::StasisStream | Self::ShockBlast => (BLUE, BLUE),
            Self::OverloadPulse | Self::MesonCollider => (ORANGE, ORANGE),
        };
        ZoneColors {
            powercell,
            cyclotron,
            future: WHITE,
        }
    }

    /// Choreographed change when leaving this mode, if it is a major one
    pub const fn major_change(self) -> Option<MajorChange> {
        Some(match self {
            Self::BosonDart => MajorChange::new(23, 0),
            Self::SlimeTether => MajorChange::new(24, 32),
            Self::ShockBlast => MajorChange::new(33, 42),
            Self::MesonCollider => MajorChange::new(43, 0),
            _ => return None,
        })
    }
}

/// Two-cue sound sequence of a major mode change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MajorChange {
    pub first_sound: u8,
    /// Zero when the change has a single cue
    pub second_sound: u8,
}

impl MajorChange {
    const fn new(first_sound: u8, second_sound: u8) -> Self {
        Self {
            first_sound,
            second_sound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneColors {
    pub powercell: Rgb,
    pub cyclotron: Rgb,
    pub future: Rgb,
}

/// Which of the fire sounds to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireCue {
    Start,
    End,
    BeepFire,
    BeepEnd,
}

/// Fire sound set, zero meaning "no sound"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireSounds {
    pub start: u8,
    pub end: u8,
    pub beep_fire: u8,
    pub beep_end: u8,
}

impl FireSounds {
    const fn new(start: u8, end: u8, beep_fire: u8, beep_end: u8) -> Self {
        Self {
            start,
            end,
            beep_fire,
            beep_end,
        }
    }

    pub const fn get(self, cue: FireCue) -> Option<u8> {
        let index = match cue {
            FireCue::Start => self.start,
            FireCue::End => self.end,
            FireCue::BeepFire => self.beep_fire,
            FireCue::BeepEnd => self.beep_end,
        };
        if index == 0 { None } else { Some(index) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowercellShutdown {
    InstantOff,
    Drain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclotronShutdown {
    InstantOff,
    FadeOut,
}

/// Power-down choreography of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerdownSequence {
    pub sound: u8,
    pub powercell: PowercellShutdown,
    pub powercell_ms: u16,
    pub cyclotron: CyclotronShutdown,
    pub cyclotron_ms: u16,
}

/// Optional behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    /// Heat drives the overheat warning and autovent
    pub overheat: bool,
    pub easter_egg: bool,
    /// Keep an idle hum playing
    pub hum: bool,
    /// Fire taps cycle the fire mode on variants that support it
    pub mode_cycling: bool,
}

impl Features {
    pub const fn from_dip_switches(bits: u8) -> Self {
        Self {
            overheat: bits & dip::HEAT != 0,
            easter_egg: bits & dip::EASTER_EGG != 0,
            hum: bits & dip::HUM != 0,
            mode_cycling: DeviceVariant::from_dip_switches(bits).supports_mode_cycling(),
        }
    }
}

/// Everything the pack needs to know about its hardware setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackConfig {
    pub variant: DeviceVariant,
    pub features: Features,
    /// Mode selected at power-up on mode cycling variants
    pub startup_mode: FireMode,
    /// Ring rotation direction
    pub clockwise: bool,
    /// Seed of the easter egg timer
    pub seed: u64,
}

impl PackConfig {
    pub const fn new(variant: DeviceVariant) -> Self {
        Self {
            variant,
            features: Features {
                overheat: false,
                easter_egg: false,
                hum: false,
                mode_cycling: variant.supports_mode_cycling(),
            },
            startup_mode: FireMode::ProtonStream,
            clockwise: true,
            seed: 0x4B4C_5953,
        }
    }

    pub const fn from_dip_switches(bits: u8) -> Self {
        let mut config = Self::new(DeviceVariant::from_dip_switches(bits));
        config.features = Features::from_dip_switches(bits);
        config
    }

    #[must_use]
    pub const fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    #[must_use]
    pub const fn with_startup_mode(mut self, mode: FireMode) -> Self {
        self.startup_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub const fn cycles_modes(&self) -> bool {
        self.features.mode_cycling && self.variant.supports_mode_cycling()
    }
}

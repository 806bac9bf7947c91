//! Pack state machine
//!
//! [`Pack`] owns every piece of mutable pack state: the context, the three
//! zone controllers, the heat model and the easter egg timer. Two entry
//! points drive it:
//!
//! - [`Pack::tick`] every [`TICK_INTERVAL`] advances animations, heat and the
//!   easter egg timer;
//! - [`Pack::process`] from the polling loop reads inputs, runs the state
//!   body and advances the current choreography script.

mod choreography;
mod monitors;
mod script;
mod states;

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

pub use script::{SCRIPT_CAPACITY, Step, Task, ZoneSet};

use crate::animation::{AnimationConfig, PatternId};
use crate::color::Rgb;
use crate::config::{
    ADJ_MAX_MS, ADJ_MIN_MS, CYCLOTRON_LEDS, DIAL_MAX, FUTURE_LEDS, FireMode, POWERCELL_LEDS,
    PackConfig, RING_CLASSIC_SPEED_MS, RING_NOMINAL_SPEED_MS, TICK_INTERVAL, ZoneColors,
};
use crate::controller::AnimationController;
use crate::easter_egg::EasterEggTimer;
use crate::geometry::RingSelector;
use crate::heat::HeatModel;
use crate::io::{Dial, PackIo, VoiceSink};
use crate::math8::round_u16;
use crate::renderer::Zone;
use crate::transition::{Easing, Ramp};
use monitors::Monitors;
use script::Script;

/// Actions that can be pending per zone
pub const ZONE_QUEUE: usize = 8;

/// Slowest ring speed multiplier that still turns the ring
const RING_SPEED_EPSILON: f32 = 0.01;

pub type PowercellController = AnimationController<PackCue, POWERCELL_LEDS, ZONE_QUEUE>;
pub type CyclotronController = AnimationController<PackCue, CYCLOTRON_LEDS, ZONE_QUEUE>;
pub type FutureController = AnimationController<PackCue, FUTURE_LEDS, ZONE_QUEUE>;

/// High level pack state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PackState {
    Off = 0,
    PackStandby = 1,
    WandStandby = 2,
    Idle = 3,
    Fire = 4,
    FireCooldown = 5,
    SlimeFire = 6,
    Overheat = 7,
    OverheatBeep = 8,
    Autovent = 9,
    Feedback = 10,
}

impl PackState {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Off,
            1 => Self::PackStandby,
            2 => Self::WandStandby,
            3 => Self::Idle,
            4 => Self::Fire,
            5 => Self::FireCooldown,
            6 => Self::SlimeFire,
            7 => Self::Overheat,
            8 => Self::OverheatBeep,
            9 => Self::Autovent,
            10 => Self::Feedback,
            _ => return None,
        })
    }

    /// States in which holding fire heats the barrel
    pub const fn heats_while_firing(self) -> bool {
        matches!(self, Self::Fire | Self::SlimeFire | Self::Overheat)
    }
}

/// Cue raised from a zone's action queue back to the pack
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PackCue {
    /// Ramp the ring speed multiplier
    RingSpeed { multiplier: f32, duration: Duration },
    /// Ring power-down fade finished
    StopCyclotron,
    /// Ring-style cooldown finished
    CooldownDone,
}

/// Mode and state of the pack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackContext {
    startup_mode: FireMode,
    mode: FireMode,
    state: PackState,
}

impl PackContext {
    pub const fn new(startup_mode: FireMode, mode: FireMode) -> Self {
        Self {
            startup_mode,
            mode,
            state: PackState::Off,
        }
    }

    pub const fn startup_mode(&self) -> FireMode {
        self.startup_mode
    }

    pub const fn mode(&self) -> FireMode {
        self.mode
    }

    pub const fn state(&self) -> PackState {
        self.state
    }
}

/// Ring size preview bookkeeping
#[derive(Debug, Clone, Copy, Default)]
struct FeedbackPreview {
    needs_start: bool,
    deadline: Option<Instant>,
}

pub struct Pack {
    config: PackConfig,
    context: PackContext,
    colors: ZoneColors,
    powercell: PowercellController,
    cyclotron: CyclotronController,
    future: FutureController,
    heat: HeatModel,
    egg: EasterEggTimer,
    ring: RingSelector,
    /// Ring-style rotation speed relative to nominal
    ring_speed: Ramp<f32>,
    /// Global output brightness
    brightness: Ramp<u8>,
    script: Script,
    monitors: Monitors,
    feedback: FeedbackPreview,
    firing: bool,
}

impl Pack {
    pub fn new(config: PackConfig) -> Self {
        let mode = if config.variant.supports_mode_cycling() {
            config.startup_mode
        } else {
            FireMode::ProtonStream
        };
        Self {
            config,
            context: PackContext::new(config.startup_mode, mode),
            colors: config.variant.colors(mode),
            powercell: PowercellController::new(),
            cyclotron: CyclotronController::new(),
            future: FutureController::new(),
            heat: HeatModel::new(config.variant.heat_settings()),
            egg: EasterEggTimer::new(config.seed),
            ring: RingSelector::new(),
            ring_speed: Ramp::new(1.0),
            brightness: Ramp::new(u8::MAX),
            script: Script::new(),
            monitors: Monitors::new(),
            feedback: FeedbackPreview::default(),
            firing: false,
        }
    }

    /// Advance animations, heat and the easter egg by one tick
    pub fn tick(&mut self, now: Instant) {
        self.powercell.update(TICK_INTERVAL, now);
        self.cyclotron.update(TICK_INTERVAL, now);
        self.future.update(TICK_INTERVAL, now);
        self.brightness.update(now);
        self.heat.on_tick(self.firing);
        self.egg.on_tick();
    }

    /// Run one pass of the state machine
    pub fn process<I, V>(&mut self, now: Instant, io: &mut I, voice: &mut V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        self.drain_cues(now, io, voice);
        if self.script.is_empty() {
            self.song_monitor(now, io, voice);
        }
        self.apply_ring_speed(now);
        self.firing = self.context.state.heats_while_firing() && io.fire();

        if self.script.is_empty() {
            self.run_state(now, io, voice);
        }
        self.advance_script(now, io, voice);
    }

    pub const fn config(&self) -> &PackConfig {
        &self.config
    }

    pub const fn context(&self) -> &PackContext {
        &self.context
    }

    pub const fn state(&self) -> PackState {
        self.context.state
    }

    pub const fn mode(&self) -> FireMode {
        self.context.mode
    }

    pub const fn colors(&self) -> ZoneColors {
        self.colors
    }

    pub const fn heat(&self) -> &HeatModel {
        &self.heat
    }

    pub const fn easter_egg(&self) -> &EasterEggTimer {
        &self.egg
    }

    /// Whether the last process saw the user firing
    pub const fn is_firing(&self) -> bool {
        self.firing
    }

    pub const fn is_song_playing(&self) -> bool {
        self.monitors.song_playing()
    }

    /// A choreography script is running
    pub fn is_busy(&self) -> bool {
        !self.script.is_empty()
    }

    pub const fn powercell(&self) -> &PowercellController {
        &self.powercell
    }

    pub const fn cyclotron(&self) -> &CyclotronController {
        &self.cyclotron
    }

    pub const fn future(&self) -> &FutureController {
        &self.future
    }

    pub fn zone_pixels(&self, zone: Zone) -> &[Rgb] {
        match zone {
            Zone::Powercell => self.powercell.pixels(),
            Zone::Cyclotron => self.cyclotron.pixels(),
            Zone::Future => self.future.pixels(),
        }
    }

    /// Number of ring pixels in use
    pub const fn active_ring_leds(&self) -> usize {
        self.cyclotron.active_leds()
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness.value()
    }

    pub fn set_brightness(&mut self, brightness: u8, duration: Duration, now: Instant) {
        self.brightness.go(brightness, duration, Easing::Linear, now);
    }

    /// Current ring speed multiplier
    pub const fn ring_speed(&self) -> f32 {
        self.ring_speed.value()
    }

    fn set_state(&mut self, state: PackState) {
        #[cfg(feature = "esp32-log")]
        if state != self.context.state {
            println!("[Pack.set_state] {:?} -> {:?}", self.context.state, state);
        }
        self.context.state = state;
    }

    /// Change the mode and refresh the zone colors
    fn set_mode(&mut self, mode: FireMode) {
        self.context.mode = mode;
        self.refresh_colors();
    }

    fn refresh_colors(&mut self) {
        self.colors = self.config.variant.colors(self.context.mode);
    }

    /// Mode the pack returns to while off
    fn home_mode(&self) -> FireMode {
        if self.config.variant.supports_mode_cycling() {
            self.context.startup_mode
        } else {
            FireMode::ProtonStream
        }
    }

    fn drain_cues<I, V>(&mut self, now: Instant, io: &mut I, voice: &mut V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        while let Some(cue) = self
            .cyclotron
            .take_cue()
            .or_else(|| self.powercell.take_cue())
            .or_else(|| self.future.take_cue())
        {
            self.handle_cue(cue, now, io, voice);
        }
    }

    fn handle_cue<I, V>(&mut self, cue: PackCue, now: Instant, io: &mut I, voice: &mut V)
    where
        I: PackIo,
        V: VoiceSink,
    {
        match cue {
            PackCue::RingSpeed {
                multiplier,
                duration,
            } => self.ring_speed_go(multiplier, duration, now),
            PackCue::StopCyclotron => self.cyclotron.stop(),
            PackCue::CooldownDone => {
                voice.stop();
                self.hum(voice);
                self.play_powercell_scroll(io, now);
                self.set_state(PackState::Idle);
            }
        }
    }

    /// Start a sound, ending any song in progress
    fn start_sound<V: VoiceSink>(&mut self, voice: &mut V, index: u8) {
        self.monitors.song_interrupted();
        if voice.is_playing() {
            voice.stop();
        }
        voice.start(index);
    }

    /// Ramp the ring speed multiplier from its present value
    fn ring_speed_go(&mut self, multiplier: f32, duration: Duration, now: Instant) {
        let current = self.ring_speed.update(now);
        let easing = if multiplier > current {
            Easing::QuadraticIn
        } else {
            Easing::QuadraticOut
        };
        self.ring_speed.go(multiplier, duration, easing, now);
    }

    fn ring_speed_jump(&mut self, multiplier: f32, now: Instant) {
        let instant = Duration::from_millis(0);
        self.ring_speed.go(multiplier, instant, Easing::Linear, now);
    }

    fn apply_ring_speed(&mut self, now: Instant) {
        if !self.config.variant.is_ring_style() {
            return;
        }
        let speed = ring_period_ms(self.ring_speed.update(now));
        if let Some(animation) = self.cyclotron.current_animation_mut() {
            animation.set_speed(speed, Duration::from_millis(0), Easing::Linear, now);
        }
    }

    fn powercell_config(&self, speed: u16) -> AnimationConfig {
        AnimationConfig::default()
            .with_color(self.colors.powercell)
            .with_speed(speed)
    }

    fn cyclotron_config(&self, speed: u16) -> AnimationConfig {
        AnimationConfig::default()
            .with_color(self.colors.cyclotron)
            .with_speed(speed)
            .with_clockwise(self.config.clockwise)
    }

    fn future_config(&self, speed: u16) -> AnimationConfig {
        AnimationConfig::default()
            .with_color(self.colors.future)
            .with_speed(speed)
    }

    fn play_powercell(&mut self, id: PatternId, speed: u16, now: Instant) {
        let config = self.powercell_config(speed);
        self.powercell.play(id.to_slot(), config, now);
    }

    fn play_cyclotron(&mut self, id: PatternId, speed: u16, now: Instant) {
        let config = self.cyclotron_config(speed);
        self.cyclotron.play(id.to_slot(), config, now);
    }

    /// Gauge scroll at the dial speed
    fn play_powercell_scroll<I: PackIo>(&mut self, io: &I, now: Instant) {
        let speed = gauge_cycle_ms(io.dial(Dial::Speed), None);
        self.play_powercell(PatternId::Scroll, speed, now);
    }

    /// Resting ring pattern of the variant and mode
    fn play_cyclotron_nominal(&mut self, now: Instant) {
        let variant = self.config.variant;
        let (id, config) = if variant.is_ring_style() {
            (
                PatternId::Cylon,
                self.cyclotron_config(RING_NOMINAL_SPEED_MS),
            )
        } else if variant.has_fading_ring() {
            let id = if self.context.mode.is_slime() {
                PatternId::Slime
            } else {
                PatternId::RotateFade
            };
            (
                id,
                self.cyclotron_config(RING_CLASSIC_SPEED_MS)
                    .with_fade(RING_FADE_AMOUNT, RING_FADE_STEPS),
            )
        } else {
            (
                PatternId::Rotate,
                self.cyclotron_config(RING_CLASSIC_SPEED_MS),
            )
        };
        self.cyclotron.play(id.to_slot(), config, now);
    }

    fn hum<V: VoiceSink>(&mut self, voice: &mut V) {
        if self.config.features.hum && !voice.is_playing() {
            let index = self.config.variant.hum_sound(self.context.mode);
            self.start_sound(voice, index);
        }
    }
}

/// Crossfade parameters of the fading ring patterns
const RING_FADE_AMOUNT: u16 = 4;
const RING_FADE_STEPS: u16 = 64;

/// Gauge cycle time for a speed dial reading
///
/// Higher readings run faster. With `heat`, the gauge speeds up further as
/// the barrel approaches the autovent threshold.
#[allow(clippy::cast_possible_truncation)]
pub fn gauge_cycle_ms(raw: u16, heat: Option<&HeatModel>) -> u16 {
    let span = u32::from(ADJ_MAX_MS - ADJ_MIN_MS);
    let inverted = u32::from(DIAL_MAX - raw.min(DIAL_MAX));
    let mut ms = u32::from(ADJ_MIN_MS) + ((span * inverted) >> 12);
    if let Some(heat) = heat {
        let divisor = u32::from(heat.settings().start_autovent >> 7);
        let factor = if divisor > 0 {
            u32::from(heat.value()) * 3 / (divisor * 2)
        } else {
            0
        };
        ms = (ms * 256u32.saturating_sub(factor)) >> 8;
    }
    ms.clamp(u32::from(ADJ_MIN_MS >> 2), u32::from(ADJ_MAX_MS)) as u16
}

/// Ring-style speed multiplier selected with the speed dial, 10 to 20
pub fn ring_speed_target(raw: u16) -> f32 {
    let raw = u32::from(raw.min(DIAL_MAX));
    #[allow(clippy::cast_precision_loss)]
    let steps = (10 * raw / u32::from(DIAL_MAX)) as f32;
    10.0 + steps
}

/// Ring cylon period for a speed multiplier
///
/// Multipliers close to zero freeze the ring.
pub fn ring_period_ms(multiplier: f32) -> u16 {
    if multiplier < RING_SPEED_EPSILON {
        return u16::MAX;
    }
    round_u16(f32::from(RING_NOMINAL_SPEED_MS) / multiplier)
}

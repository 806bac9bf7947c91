//! Zone animations with compile-time known pattern variants
//!
//! All animations are stored in an enum to avoid heap allocations.
//! Each pattern implements the [`Animation`] trait and owns an
//! [`AnimationBase`] carrying the color, speed and brightness ramps.

mod cylon;
mod fade;
mod feedback;
mod linear;
mod rotate;

use embassy_time::{Duration, Instant};

pub use cylon::{CylonAnimation, CylonFadeOutAnimation};
pub use fade::FadeAnimation;
pub use feedback::{FEEDBACK_DURATION, FeedbackRainbowAnimation};
pub use linear::{
    DrainAnimation, FillAnimation, ScrollAnimation, StrobeAnimation, WaterfallAnimation,
};
pub use rotate::{RotateAnimation, RotateFadeAnimation, ShiftRotateAnimation, SlimeAnimation};

use crate::color::{BLACK, Rgb, scale_color};
use crate::transition::{Easing, Ramp};

const PATTERN_ID_ROTATE: u8 = 0;
const PATTERN_ID_ROTATE_FADE: u8 = 1;
const PATTERN_ID_SLIME: u8 = 2;
const PATTERN_ID_SHIFT_ROTATE: u8 = 3;
const PATTERN_ID_SCROLL: u8 = 4;
const PATTERN_ID_FILL: u8 = 5;
const PATTERN_ID_DRAIN: u8 = 6;
const PATTERN_ID_WATERFALL: u8 = 7;
const PATTERN_ID_STROBE: u8 = 8;
const PATTERN_ID_CYLON: u8 = 9;
const PATTERN_ID_CYLON_FADE_OUT: u8 = 10;
const PATTERN_ID_FADE_IN: u8 = 11;
const PATTERN_ID_FADE_OUT: u8 = 12;
const PATTERN_ID_FEEDBACK_RAINBOW: u8 = 13;

/// Parameters an animation is started with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    /// Number of pixels the pattern runs on
    pub num_leds: usize,
    pub color: Rgb,
    /// Pattern period in milliseconds, meaning depends on the pattern
    pub speed: u16,
    pub brightness: u8,
    pub clockwise: bool,
    pub fade_amount: u16,
    pub steps: u16,
    pub bounce: bool,
    /// Width of the color block lit at each tube position (1-5)
    pub block_width: u8,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            num_leds: 0,
            color: BLACK,
            speed: 1000,
            brightness: 255,
            clockwise: true,
            fade_amount: 0,
            steps: 0,
            bounce: false,
            block_width: 1,
        }
    }
}

impl AnimationConfig {
    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: u16) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_leds(mut self, num_leds: usize) -> Self {
        self.num_leds = num_leds;
        self
    }

    #[must_use]
    pub fn with_clockwise(mut self, clockwise: bool) -> Self {
        self.clockwise = clockwise;
        self
    }

    /// Set substep crossfade parameters used by `RotateFade` and `Slime`
    #[must_use]
    pub fn with_fade(mut self, fade_amount: u16, steps: u16) -> Self {
        self.fade_amount = fade_amount;
        self.steps = steps;
        self
    }

    #[must_use]
    pub fn with_bounce(mut self, bounce: bool) -> Self {
        self.bounce = bounce;
        self
    }

    #[must_use]
    pub fn with_block_width(mut self, block_width: u8) -> Self {
        self.block_width = block_width;
        self
    }
}

/// State shared by every pattern: the config and three ramps
#[derive(Debug, Clone)]
pub struct AnimationBase {
    config: AnimationConfig,
    color: Ramp<Rgb>,
    speed: Ramp<u16>,
    brightness: Ramp<u8>,
}

impl Default for AnimationBase {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationBase {
    pub const fn new() -> Self {
        Self {
            config: AnimationConfig {
                num_leds: 0,
                color: BLACK,
                speed: 1000,
                brightness: 255,
                clockwise: true,
                fade_amount: 0,
                steps: 0,
                bounce: false,
                block_width: 1,
            },
            color: Ramp::new(BLACK),
            speed: Ramp::new(0),
            brightness: Ramp::new(0),
        }
    }

    /// Store the config and jump every ramp to its configured value
    pub fn start(&mut self, config: AnimationConfig, now: Instant) {
        let instant = Duration::from_millis(0);
        self.config = config;
        self.color.go(config.color, instant, Easing::Linear, now);
        self.speed.go(config.speed, instant, Easing::Linear, now);
        self.brightness.go(config.brightness, instant, Easing::Linear, now);
    }

    pub fn update(&mut self, now: Instant) {
        self.color.update(now);
        self.speed.update(now);
        self.brightness.update(now);
    }

    pub const fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Current pattern color, dimmed by the brightness ramp
    pub fn color(&self) -> Rgb {
        scale_color(self.color.value(), self.brightness.value())
    }

    /// Current speed in milliseconds
    pub fn speed(&self) -> u16 {
        self.speed.value()
    }

    pub fn brightness(&self) -> u8 {
        self.brightness.value()
    }

    pub fn set_color(&mut self, color: Rgb, duration: Duration, easing: Easing, now: Instant) {
        self.color.go(color, duration, easing, now);
    }

    pub fn set_speed(&mut self, speed: u16, duration: Duration, easing: Easing, now: Instant) {
        self.speed.go(speed, duration, easing, now);
    }

    pub fn set_brightness(
        &mut self,
        brightness: u8,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) {
        self.brightness.go(brightness, duration, easing, now);
    }

    /// Pixels of `leds` the pattern is allowed to touch
    pub(crate) fn active<'a>(&self, leds: &'a mut [Rgb]) -> &'a mut [Rgb] {
        let count = self.config.num_leds.min(leds.len());
        &mut leds[..count]
    }
}

/// Fixed step pacing driven by the tick delta
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StepTimer {
    elapsed: u32,
}

impl StepTimer {
    pub(crate) const fn new() -> Self {
        Self { elapsed: 0 }
    }

    /// Accumulate `dt` and return how many steps of `step_ms` are due
    ///
    /// Time left over after the last due step carries into the next call.
    /// A zero step is due once per call.
    pub(crate) fn advance(&mut self, dt: u32, step_ms: u32) -> u32 {
        if step_ms == 0 {
            self.elapsed = 0;
            return 1;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        let due = self.elapsed / step_ms;
        self.elapsed %= step_ms;
        due
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed = 0;
    }
}

pub trait Animation {
    fn base(&self) -> &AnimationBase;

    fn base_mut(&mut self) -> &mut AnimationBase;

    /// Start against a fresh config, painting the first frame into `leds`
    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]);

    /// Advance by `dt` milliseconds
    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]);

    /// Check if the animation finished on its own
    fn is_done(&self) -> bool {
        false
    }
}

/// Animation slot - enum containing all possible patterns
#[derive(Debug, Clone)]
pub enum AnimationSlot {
    Rotate(RotateAnimation),
    RotateFade(RotateFadeAnimation),
    Slime(SlimeAnimation),
    ShiftRotate(ShiftRotateAnimation),
    Scroll(ScrollAnimation),
    Fill(FillAnimation),
    Drain(DrainAnimation),
    Waterfall(WaterfallAnimation),
    Strobe(StrobeAnimation),
    Cylon(CylonAnimation),
    CylonFadeOut(CylonFadeOutAnimation),
    Fade(FadeAnimation),
    FeedbackRainbow(FeedbackRainbowAnimation),
}

/// Known pattern ids that can be requested
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PatternId {
    Rotate = PATTERN_ID_ROTATE,
    RotateFade = PATTERN_ID_ROTATE_FADE,
    Slime = PATTERN_ID_SLIME,
    ShiftRotate = PATTERN_ID_SHIFT_ROTATE,
    Scroll = PATTERN_ID_SCROLL,
    Fill = PATTERN_ID_FILL,
    Drain = PATTERN_ID_DRAIN,
    Waterfall = PATTERN_ID_WATERFALL,
    Strobe = PATTERN_ID_STROBE,
    Cylon = PATTERN_ID_CYLON,
    CylonFadeOut = PATTERN_ID_CYLON_FADE_OUT,
    FadeIn = PATTERN_ID_FADE_IN,
    FadeOut = PATTERN_ID_FADE_OUT,
    FeedbackRainbow = PATTERN_ID_FEEDBACK_RAINBOW,
}

impl PatternId {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PATTERN_ID_ROTATE => Self::Rotate,
            PATTERN_ID_ROTATE_FADE => Self::RotateFade,
            PATTERN_ID_SLIME => Self::Slime,
            PATTERN_ID_SHIFT_ROTATE => Self::ShiftRotate,
            PATTERN_ID_SCROLL => Self::Scroll,
            PATTERN_ID_FILL => Self::Fill,
            PATTERN_ID_DRAIN => Self::Drain,
            PATTERN_ID_WATERFALL => Self::Waterfall,
            PATTERN_ID_STROBE => Self::Strobe,
            PATTERN_ID_CYLON => Self::Cylon,
            PATTERN_ID_CYLON_FADE_OUT => Self::CylonFadeOut,
            PATTERN_ID_FADE_IN => Self::FadeIn,
            PATTERN_ID_FADE_OUT => Self::FadeOut,
            PATTERN_ID_FEEDBACK_RAINBOW => Self::FeedbackRainbow,
            _ => return None,
        })
    }

    pub fn to_slot(self) -> AnimationSlot {
        match self {
            Self::Rotate => AnimationSlot::Rotate(RotateAnimation::new()),
            Self::RotateFade => AnimationSlot::RotateFade(RotateFadeAnimation::new()),
            Self::Slime => AnimationSlot::Slime(SlimeAnimation::new()),
            Self::ShiftRotate => AnimationSlot::ShiftRotate(ShiftRotateAnimation::new()),
            Self::Scroll => AnimationSlot::Scroll(ScrollAnimation::new()),
            Self::Fill => AnimationSlot::Fill(FillAnimation::new()),
            Self::Drain => AnimationSlot::Drain(DrainAnimation::new()),
            Self::Waterfall => AnimationSlot::Waterfall(WaterfallAnimation::new()),
            Self::Strobe => AnimationSlot::Strobe(StrobeAnimation::new()),
            Self::Cylon => AnimationSlot::Cylon(CylonAnimation::new()),
            Self::CylonFadeOut => AnimationSlot::CylonFadeOut(CylonFadeOutAnimation::new()),
            Self::FadeIn => AnimationSlot::Fade(FadeAnimation::fade_in()),
            Self::FadeOut => AnimationSlot::Fade(FadeAnimation::fade_out()),
            Self::FeedbackRainbow => {
                AnimationSlot::FeedbackRainbow(FeedbackRainbowAnimation::new(FEEDBACK_DURATION))
            }
        }
    }
}

impl AnimationSlot {
    fn as_animation(&self) -> &dyn Animation {
        match self {
            Self::Rotate(animation) => animation,
            Self::RotateFade(animation) => animation,
            Self::Slime(animation) => animation,
            Self::ShiftRotate(animation) => animation,
            Self::Scroll(animation) => animation,
            Self::Fill(animation) => animation,
            Self::Drain(animation) => animation,
            Self::Waterfall(animation) => animation,
            Self::Strobe(animation) => animation,
            Self::Cylon(animation) => animation,
            Self::CylonFadeOut(animation) => animation,
            Self::Fade(animation) => animation,
            Self::FeedbackRainbow(animation) => animation,
        }
    }

    fn as_animation_mut(&mut self) -> &mut dyn Animation {
        match self {
            Self::Rotate(animation) => animation,
            Self::RotateFade(animation) => animation,
            Self::Slime(animation) => animation,
            Self::ShiftRotate(animation) => animation,
            Self::Scroll(animation) => animation,
            Self::Fill(animation) => animation,
            Self::Drain(animation) => animation,
            Self::Waterfall(animation) => animation,
            Self::Strobe(animation) => animation,
            Self::Cylon(animation) => animation,
            Self::CylonFadeOut(animation) => animation,
            Self::Fade(animation) => animation,
            Self::FeedbackRainbow(animation) => animation,
        }
    }

    pub fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.as_animation_mut().start(config, now, leds);
    }

    pub fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.as_animation_mut().update(dt, now, leds);
    }

    pub fn is_done(&self) -> bool {
        self.as_animation().is_done()
    }

    pub fn base(&self) -> &AnimationBase {
        self.as_animation().base()
    }

    pub fn set_color(&mut self, color: Rgb, duration: Duration, easing: Easing, now: Instant) {
        self.as_animation_mut()
            .base_mut()
            .set_color(color, duration, easing, now);
    }

    pub fn set_speed(&mut self, speed: u16, duration: Duration, easing: Easing, now: Instant) {
        self.as_animation_mut()
            .base_mut()
            .set_speed(speed, duration, easing, now);
    }

    pub fn set_brightness(
        &mut self,
        brightness: u8,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) {
        self.as_animation_mut()
            .base_mut()
            .set_brightness(brightness, duration, easing, now);
    }

    /// Get the pattern ID for external observation
    pub fn id(&self) -> PatternId {
        match self {
            Self::Rotate(_) => PatternId::Rotate,
            Self::RotateFade(_) => PatternId::RotateFade,
            Self::Slime(_) => PatternId::Slime,
            Self::ShiftRotate(_) => PatternId::ShiftRotate,
            Self::Scroll(_) => PatternId::Scroll,
            Self::Fill(_) => PatternId::Fill,
            Self::Drain(_) => PatternId::Drain,
            Self::Waterfall(_) => PatternId::Waterfall,
            Self::Strobe(_) => PatternId::Strobe,
            Self::Cylon(_) => PatternId::Cylon,
            Self::CylonFadeOut(_) => PatternId::CylonFadeOut,
            Self::Fade(fade) if fade.is_fade_out() => PatternId::FadeOut,
            Self::Fade(_) => PatternId::FadeIn,
            Self::FeedbackRainbow(_) => PatternId::FeedbackRainbow,
        }
    }

    pub fn as_feedback_mut(&mut self) -> Option<&mut FeedbackRainbowAnimation> {
        match self {
            Self::FeedbackRainbow(animation) => Some(animation),
            _ => None,
        }
    }
}

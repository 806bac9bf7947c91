//! Ring size preview
//!
//! Shown on the ring while the pack is off and the size dial is turned: a
//! rotating hue sweep across the populated pixels only.

use embassy_time::{Duration, Instant};

use super::{Animation, AnimationBase, AnimationConfig};
use crate::color::{BLACK, Rgb, fill_rainbow, fill_solid};
use crate::geometry::mask_beyond;

/// How long a preview stays up after the last dial change
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(5000);

/// Milliseconds per hue step of the sweep
const HUE_PERIOD_MS: u32 = 10;

#[derive(Debug, Clone)]
pub struct FeedbackRainbowAnimation {
    base: AnimationBase,
    elapsed_ms: u32,
    duration_ms: u32,
}

impl Default for FeedbackRainbowAnimation {
    fn default() -> Self {
        Self::new(FEEDBACK_DURATION)
    }
}

impl FeedbackRainbowAnimation {
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(duration: Duration) -> Self {
        Self {
            base: AnimationBase::new(),
            elapsed_ms: 0,
            duration_ms: duration.as_millis() as u32,
        }
    }

    /// Rebind to a new pixel count and extend the preview
    ///
    /// Keeps the elapsed time so the hue sweep continues without a jump.
    #[allow(clippy::cast_possible_truncation)]
    pub fn update_config(&mut self, config: AnimationConfig, extend: Duration, now: Instant) {
        self.base.start(config, now);
        self.duration_ms = self.duration_ms.saturating_add(extend.as_millis() as u32);
    }

    pub const fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }
}

impl Animation for FeedbackRainbowAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.elapsed_ms = 0;
        fill_solid(leds, BLACK);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt);
        let start_hue = ((self.elapsed_ms / HUE_PERIOD_MS) & 0xFF) as u8;
        let count = self.base.config().num_leds.min(leds.len());
        let hue_step = if count == 0 { 0 } else { (255 / count) as u8 };
        fill_rainbow(&mut leds[..count], start_hue, hue_step);
        mask_beyond(leds, count);
    }

    fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

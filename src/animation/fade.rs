use embassy_time::Instant;

use super::{Animation, AnimationBase, AnimationConfig, StepTimer};
use crate::color::{BLACK, Rgb, fill_solid, scale_color};

/// Number of brightness substeps in one fade
const FADE_STEPS: u32 = 256;

/// Whole strip fade in or out over 256 substeps of `speed / 256` each
#[derive(Debug, Clone, Default)]
pub struct FadeAnimation {
    base: AnimationBase,
    timer: StepTimer,
    fade_out: bool,
    level: u8,
    done: bool,
}

impl FadeAnimation {
    pub const fn fade_in() -> Self {
        Self::new(false)
    }

    pub const fn fade_out() -> Self {
        Self::new(true)
    }

    const fn new(fade_out: bool) -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
            fade_out,
            level: 0,
            done: false,
        }
    }

    pub const fn is_fade_out(&self) -> bool {
        self.fade_out
    }
}

impl Animation for FadeAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.level = 0;
        self.done = false;
        self.timer.reset();
        let initial = if self.fade_out { self.base.color() } else { BLACK };
        fill_solid(self.base.active(leds), initial);
    }

    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        if self.done {
            return;
        }
        let due = self.timer.advance(dt, u32::from(self.base.speed()) / FADE_STEPS);
        if due == 0 {
            return;
        }
        for _ in 0..due {
            if self.level < 255 {
                self.level += 1;
            } else {
                self.done = true;
                break;
            }
        }
        let scale = if self.fade_out { 255 - self.level } else { self.level };
        let color = scale_color(self.base.color(), scale);
        fill_solid(self.base.active(leds), color);
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

//! Single pixel sweeps

use embassy_time::Instant;

use super::{Animation, AnimationBase, AnimationConfig, StepTimer};
use crate::color::{BLACK, Rgb, fill_solid, scale_color};

/// Fractional bits of the sweep position accumulator
const POSITION_FRACTION_BITS: u32 = 14;
const POSITION_FRACTION_MASK: u32 = (1 << POSITION_FRACTION_BITS) - 1;
const FADE_MAX: u16 = u16::MAX;

fn draw_eye(leds: &mut [Rgb], position: usize, color: Rgb) {
    fill_solid(leds, BLACK);
    if let Some(led) = leds.get_mut(position) {
        *led = color;
    }
}

/// Single pixel sweeping the strip, stepping once per `speed` milliseconds
///
/// Wraps around, or bounces between the ends when `bounce` is set.
#[derive(Debug, Clone, Default)]
pub struct CylonAnimation {
    base: AnimationBase,
    timer: StepTimer,
    position: usize,
    forward: bool,
}

impl CylonAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
            position: 0,
            forward: true,
        }
    }

    pub const fn position(&self) -> usize {
        self.position
    }
}

impl Animation for CylonAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.position = 0;
        self.forward = true;
        self.timer.reset();
        let color = self.base.color();
        draw_eye(self.base.active(leds), self.position, color);
    }

    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        let due = self.timer.advance(dt, u32::from(self.base.speed()));
        if due == 0 {
            return;
        }
        let bounce = self.base.config().bounce;
        let color = self.base.color();
        let leds = self.base.active(leds);
        let count = leds.len();

        for _ in 0..due {
            if bounce && count > 1 {
                self.position = if self.forward {
                    self.position + 1
                } else {
                    self.position.saturating_sub(1)
                };
                if self.position >= count - 1 || self.position == 0 {
                    self.forward = !self.forward;
                }
            } else if count > 0 {
                self.position = (self.position + 1) % count;
            }
        }
        draw_eye(leds, self.position, color);
    }
}

/// Sweep that dims continuously until dark
///
/// The position is kept as an integer plus a 14-bit fraction, advanced by
/// `speed * dt / 16` each update, so the sweep rate follows the speed ramp
/// smoothly. The fade grows by `fade_amount` per update on a 16-bit scale.
#[derive(Debug, Clone, Default)]
pub struct CylonFadeOutAnimation {
    base: AnimationBase,
    accumulator: u32,
    position: usize,
    fade: u16,
    done: bool,
}

impl CylonFadeOutAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            accumulator: 0,
            position: 0,
            fade: 0,
            done: false,
        }
    }
}

impl Animation for CylonFadeOutAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, _leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.accumulator = 0;
        self.position = 0;
        self.fade = 0;
        self.done = false;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        if self.done {
            return;
        }
        let fade_amount = self.base.config().fade_amount;
        let base_color = self.base.color();
        let leds = self.base.active(leds);
        let count = leds.len();
        if count == 0 {
            self.done = true;
            return;
        }

        self.accumulator = self
            .accumulator
            .saturating_add(u32::from(self.base.speed()).saturating_mul(dt) / 16);
        if self.accumulator > POSITION_FRACTION_MASK {
            leds[self.position % count] = BLACK;
            let advance = (self.accumulator >> POSITION_FRACTION_BITS) as usize;
            self.position = (self.position + advance) % count;
            self.accumulator &= POSITION_FRACTION_MASK;
        }

        let keep = 255 - (self.fade >> 8) as u8;
        leds[self.position % count] = scale_color(base_color, keep);

        self.fade = self.fade.saturating_add(fade_amount);
        if self.fade >= FADE_MAX {
            self.done = true;
            fill_solid(leds, BLACK);
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

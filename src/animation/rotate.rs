//! Ring rotation patterns
//!
//! Classic rotation lights a block at one of the four tube positions and
//! steps around the ring. The fade variants crossfade between positions over
//! a number of substeps.

use embassy_time::Instant;

use super::{Animation, AnimationBase, AnimationConfig, StepTimer};
use crate::color::{BLACK, Rgb, fill_solid, scale_color, scale_color_video};
use crate::geometry::{map_block, paint_block, tube_positions};

const TUBE_COUNT: usize = 4;

const fn next_tube(index: usize, clockwise: bool) -> usize {
    let step = if clockwise { 1 } else { TUBE_COUNT - 1 };
    (index + step) % TUBE_COUNT
}

/// Default substeps and fade amount to 1 when left unset
fn with_substep_defaults(mut config: AnimationConfig) -> AnimationConfig {
    if config.steps == 0 {
        config.steps = 1;
    }
    if config.fade_amount == 0 {
        config.fade_amount = 1;
    }
    config
}

/// Block stepping between the four tube positions every quarter period
#[derive(Debug, Clone, Default)]
pub struct RotateAnimation {
    base: AnimationBase,
    timer: StepTimer,
    index: usize,
}

impl RotateAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
            index: 0,
        }
    }
}

impl Animation for RotateAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.index = 0;
        self.timer.reset();
        fill_solid(self.base.active(leds), BLACK);
    }

    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        let step = u32::from(self.base.speed() / 4);
        if step == 0 {
            return;
        }
        let due = self.timer.advance(dt, step);
        if due == 0 {
            return;
        }
        let config = *self.base.config();
        let color = self.base.color();
        let leds = self.base.active(leds);
        let tubes = tube_positions(leds.len());

        paint_block(leds, tubes[self.index], config.block_width, BLACK);
        for _ in 0..due {
            self.index = next_tube(self.index, config.clockwise);
        }
        paint_block(leds, tubes[self.index], config.block_width, color);
    }
}

/// Rotation that crossfades the outgoing and incoming tube positions
#[derive(Debug, Clone, Default)]
pub struct RotateFadeAnimation {
    base: AnimationBase,
    timer: StepTimer,
    index: usize,
    previous: usize,
    fade: u16,
}

impl RotateFadeAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
            index: 0,
            previous: 0,
            fade: 255,
        }
    }
}

impl Animation for RotateFadeAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(with_substep_defaults(config), now);
        self.index = 0;
        self.previous = 0;
        self.fade = 255;
        self.timer.reset();

        let block_width = self.base.config().block_width;
        let color = self.base.color();
        let leds = self.base.active(leds);
        fill_solid(leds, BLACK);
        let tubes = tube_positions(leds.len());
        paint_block(leds, tubes[self.index], block_width, color);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        let config = *self.base.config();
        let step = u32::from(self.base.speed() / 4) / u32::from(config.steps);
        let due = self.timer.advance(dt, step);
        let color = self.base.color();
        let leds = self.base.active(leds);
        let tubes = tube_positions(leds.len());

        for _ in 0..due {
            let fade = self.fade.min(255) as u8;
            paint_block(
                leds,
                tubes[self.index],
                config.block_width,
                scale_color_video(color, fade),
            );
            paint_block(
                leds,
                tubes[self.previous],
                config.block_width,
                scale_color_video(color, 255 - fade),
            );

            if self.fade < 255 {
                self.fade = self.fade.saturating_add(config.fade_amount).min(255);
            } else {
                self.fade = 0;
                self.previous = self.index;
                self.index = next_tube(self.index, config.clockwise);
            }
        }
    }
}

/// All tube positions lit, one position at a time drips dark and refills
#[derive(Debug, Clone, Default)]
pub struct SlimeAnimation {
    base: AnimationBase,
    timer: StepTimer,
    index: usize,
    substep: u16,
    fade: u16,
}

impl SlimeAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
            index: 0,
            substep: 0,
            fade: 0,
        }
    }
}

impl Animation for SlimeAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(with_substep_defaults(config), now);
        self.index = 0;
        self.substep = 0;
        self.fade = 0;
        self.timer.reset();

        let block_width = self.base.config().block_width;
        let color = self.base.color();
        let leds = self.base.active(leds);
        fill_solid(leds, BLACK);
        for tube in tube_positions(leds.len()) {
            paint_block(leds, tube, block_width, color);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        let config = *self.base.config();
        let step = u32::from(self.base.speed() / 4) / u32::from(config.steps);
        let due = self.timer.advance(dt, step);
        let color = self.base.color();
        let leds = self.base.active(leds);
        let tubes = tube_positions(leds.len());

        for _ in 0..due {
            self.substep += 1;
            self.fade = self.fade.saturating_add(config.fade_amount).min(255);
            let keep = 255 - self.fade as u8;
            map_block(leds, tubes[self.index], config.block_width, |led| {
                scale_color(led, keep)
            });

            if self.substep >= config.steps {
                self.fade = 0;
                self.substep = 0;
                paint_block(leds, tubes[self.index], config.block_width, color);
                self.index = next_tube(self.index, config.clockwise);
            }
        }
    }
}

/// Every fourth pixel lit, the comb shifts one pixel per step
#[derive(Debug, Clone, Default)]
pub struct ShiftRotateAnimation {
    base: AnimationBase,
    timer: StepTimer,
    offset: usize,
}

impl ShiftRotateAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
            offset: 0,
        }
    }

    fn paint(&self, leds: &mut [Rgb]) {
        let color = self.base.color();
        for (i, led) in leds.iter_mut().enumerate() {
            *led = if (i + self.offset) % TUBE_COUNT == 0 {
                color
            } else {
                BLACK
            };
        }
    }
}

impl Animation for ShiftRotateAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.offset = 0;
        self.timer.reset();
        let leds = self.base.active(leds);
        self.paint(leds);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        let leds = self.base.active(leds);
        let step = u32::from(self.base.speed()) / leds.len().max(1) as u32;
        let due = self.timer.advance(dt, step);
        if due == 0 {
            return;
        }
        let shift = if self.base.config().clockwise { 1 } else { 3 };
        for _ in 0..due {
            self.offset = (self.offset + shift) & 0x3;
        }
        self.paint(leds);
    }
}

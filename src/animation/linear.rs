//! Strip patterns for the gauge and exhaust zones

use embassy_time::Instant;

use super::{Animation, AnimationBase, AnimationConfig, StepTimer};
use crate::color::{BLACK, Rgb, fill_solid, is_black};

#[allow(clippy::cast_possible_truncation)]
fn per_pixel_step(speed: u16, count: usize) -> u32 {
    u32::from(speed) / count.max(1) as u32
}

/// Single lit pixel running up the strip, clearing when it wraps
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimation {
    base: AnimationBase,
    timer: StepTimer,
    position: usize,
}

impl ScrollAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
            position: 0,
        }
    }
}

impl Animation for ScrollAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.position = 0;
        self.timer.reset();
        fill_solid(self.base.active(leds), BLACK);
    }

    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        let color = self.base.color();
        let leds = self.base.active(leds);
        if leds.is_empty() {
            return;
        }
        let due = self.timer.advance(dt, per_pixel_step(self.base.speed(), leds.len()));
        for _ in 0..due {
            if self.position >= leds.len() {
                self.position = 0;
            }
            if self.position == 0 {
                fill_solid(leds, BLACK);
            }
            leds[self.position] = color;
            self.position = (self.position + 1) % leds.len();
        }
    }
}

/// Lights pixels one at a time from the bottom until the strip is full
#[derive(Debug, Clone, Default)]
pub struct FillAnimation {
    base: AnimationBase,
    timer: StepTimer,
    position: usize,
    done: bool,
}

impl FillAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
            position: 0,
            done: false,
        }
    }
}

impl Animation for FillAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.position = 0;
        self.done = false;
        self.timer.reset();
        fill_solid(self.base.active(leds), BLACK);
    }

    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        if self.done {
            return;
        }
        let color = self.base.color();
        let leds = self.base.active(leds);
        let due = self.timer.advance(dt, per_pixel_step(self.base.speed(), leds.len()));
        for _ in 0..due {
            if let Some(led) = leds.get_mut(self.position) {
                *led = color;
            }
            self.position += 1;
            if self.position >= leds.len() {
                self.done = true;
                break;
            }
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

/// Starts full and shifts the strip down one pixel per step until dark
#[derive(Debug, Clone, Default)]
pub struct DrainAnimation {
    base: AnimationBase,
    timer: StepTimer,
    done: bool,
}

impl DrainAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
            done: false,
        }
    }
}

impl Animation for DrainAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.done = false;
        self.timer.reset();
        let color = self.base.color();
        fill_solid(self.base.active(leds), color);
    }

    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        if self.done {
            return;
        }
        let leds = self.base.active(leds);
        let due = self.timer.advance(dt, per_pixel_step(self.base.speed(), leds.len()));
        for _ in 0..due {
            if leds.is_empty() {
                self.done = true;
                return;
            }
            leds.copy_within(1.., 0);
            let last = leds.len() - 1;
            leds[last] = BLACK;
            if leds.iter().all(|led| is_black(*led)) {
                self.done = true;
                return;
            }
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

/// Pixels drop from the top and stack up from the bottom
///
/// Every drop travels one pixel per step, so a strip of `n` pixels takes
/// `n * (n + 1) / 2` steps to fill.
#[derive(Debug, Clone, Default)]
pub struct WaterfallAnimation {
    base: AnimationBase,
    timer: StepTimer,
    /// Highest free index of the stack
    stack_top: usize,
    /// Distance the current drop has fallen; 0 spawns a new drop
    fallen: usize,
    done: bool,
}

impl WaterfallAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
            stack_top: 0,
            fallen: 0,
            done: false,
        }
    }
}

impl Animation for WaterfallAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.done = false;
        self.timer.reset();
        let color = self.base.color();
        let leds = self.base.active(leds);
        fill_solid(leds, BLACK);
        if let Some(top) = leds.last_mut() {
            *top = color;
        }
        self.stack_top = leds.len().saturating_sub(1);
        self.fallen = 1;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        if self.done {
            return;
        }
        let leds = self.base.active(leds);
        let count = leds.len();
        if count == 0 {
            self.done = true;
            return;
        }
        let total_steps = (count * (count + 1)) >> 1;
        let step = u32::from(self.base.speed()) / total_steps as u32;
        let color = self.base.color();
        for _ in 0..self.timer.advance(dt, step) {
            if self.fallen == 0 {
                leds[count - 1] = color;
                if self.stack_top == 0 {
                    self.done = true;
                    return;
                }
            } else if self.fallen < count {
                leds[count - 1 - self.fallen] = leds[count - self.fallen];
                leds[count - self.fallen] = BLACK;
            }

            self.fallen += 1;
            if self.fallen > self.stack_top {
                self.fallen = 0;
                self.stack_top = self.stack_top.saturating_sub(1);
            }
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

/// Alternates even and odd pixels every half period
#[derive(Debug, Clone, Default)]
pub struct StrobeAnimation {
    base: AnimationBase,
    timer: StepTimer,
}

impl StrobeAnimation {
    pub const fn new() -> Self {
        Self {
            base: AnimationBase::new(),
            timer: StepTimer::new(),
        }
    }
}

impl Animation for StrobeAnimation {
    fn base(&self) -> &AnimationBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AnimationBase {
        &mut self.base
    }

    fn start(&mut self, config: AnimationConfig, now: Instant, _leds: &mut [Rgb]) {
        self.base.start(config, now);
        self.timer.reset();
    }

    fn update(&mut self, dt: u32, now: Instant, leds: &mut [Rgb]) {
        self.base.update(now);
        let due = self.timer.advance(dt, u32::from(self.base.speed() / 2));
        let color = self.base.color();
        let leds = self.base.active(leds);
        for _ in 0..due {
            let offset = match leds.first() {
                Some(first) if is_black(*first) => 1,
                _ => 0,
            };
            for (i, led) in leds.iter_mut().enumerate() {
                *led = if (i + offset) % 2 == 1 { color } else { BLACK };
            }
        }
    }
}

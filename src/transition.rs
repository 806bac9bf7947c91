use embassy_time::{Duration, Instant};

use crate::color::Rgb;
use crate::math8::{progress, round_u8, round_u16};

/// Easing curve applied to a ramp segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
}

impl Easing {
    /// Map linear progress (0.0-1.0) onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => t * (2.0 - t),
            Self::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let k = -2.0 * t + 2.0;
                    1.0 - k * k / 2.0
                }
            }
        }
    }
}

/// Values that a [`Ramp`] can move between
pub trait Interpolate: Copy + PartialEq {
    /// Value at fraction `t` (0.0-1.0) of the way from `from` to `to`
    fn interpolate(from: Self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Interpolate for u8 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        round_u8(f32::interpolate(f32::from(from), f32::from(to), t))
    }
}

impl Interpolate for u16 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        round_u16(f32::interpolate(f32::from(from), f32::from(to), t))
    }
}

impl Interpolate for Rgb {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        Rgb {
            r: u8::interpolate(from.r, to.r, t),
            g: u8::interpolate(from.g, to.g, t),
            b: u8::interpolate(from.b, to.b, t),
        }
    }
}

/// Time based ramp of a single value
///
/// Progress is sampled from the `now` passed to [`Ramp::update`], so a ramp
/// keeps wall-clock pace even when the caller skips updates.
#[derive(Debug, Clone)]
pub struct Ramp<T: Interpolate> {
    value: T,
    origin: T,
    target: T,
    easing: Easing,
    duration: Duration,
    started_at: Instant,
    running: bool,
}

impl<T: Interpolate> Ramp<T> {
    pub const fn new(initial: T) -> Self {
        Self {
            value: initial,
            origin: initial,
            target: initial,
            easing: Easing::Linear,
            duration: Duration::from_millis(0),
            started_at: Instant::from_millis(0),
            running: false,
        }
    }

    /// Start a new segment from the present value towards `target`
    ///
    /// A zero duration jumps straight to the target.
    pub fn go(&mut self, target: T, duration: Duration, easing: Easing, now: Instant) {
        self.origin = self.value;
        self.target = target;
        self.easing = easing;
        self.duration = duration;
        self.started_at = now;
        if duration.as_millis() == 0 {
            self.value = target;
            self.running = false;
        } else {
            self.running = true;
        }
    }

    /// Advance to `now` and return the new value
    ///
    /// Once the segment has elapsed the value stays pinned at the target.
    pub fn update(&mut self, now: Instant) -> T {
        if !self.running {
            return self.value;
        }
        let elapsed = now
            .checked_duration_since(self.started_at)
            .unwrap_or(Duration::from_millis(0));
        if elapsed >= self.duration {
            self.value = self.target;
            self.running = false;
            return self.value;
        }
        let t = self.easing.apply(progress(elapsed, self.duration));
        self.value = T::interpolate(self.origin, self.target, t);
        self.value
    }

    /// Last computed value
    pub const fn value(&self) -> T {
        self.value
    }

    pub const fn target(&self) -> T {
        self.target
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }
}

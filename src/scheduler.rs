//! Tick pacing
//!
//! Drives [`Pack::tick`] and the renderer at [`TICK_INTERVAL`] without
//! async/await or platform timers. The caller sleeps between ticks.

use embassy_time::{Duration, Instant};

use crate::config::TICK_INTERVAL;
use crate::pack::Pack;
use crate::{OutputDriver, Renderer};

/// Result of a tick
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// The deadline for the next tick
    pub next_deadline: Instant,
    /// How long to wait until the next tick, zero when behind schedule
    pub sleep_duration: Duration,
}

/// Tick scheduler with drift correction
///
/// ```ignore
/// let mut scheduler = TickScheduler::new(Renderer::new(driver));
///
/// loop {
///     let now = Instant::now();
///     pack.process(now, &mut io, &mut voice);
///     let result = scheduler.tick(&mut pack, now);
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct TickScheduler<O: OutputDriver> {
    renderer: Renderer<O>,
    next_tick: Instant,
    period: Duration,
}

impl<O: OutputDriver> TickScheduler<O> {
    pub fn new(renderer: Renderer<O>) -> Self {
        Self::with_period(renderer, TICK_INTERVAL)
    }

    pub fn with_period(renderer: Renderer<O>, period: Duration) -> Self {
        Self {
            renderer,
            next_tick: Instant::from_millis(0),
            period,
        }
    }

    /// Advance the pack by one tick and commit the frame
    ///
    /// Falling more than two periods behind resets the schedule to `now`
    /// instead of bursting through the backlog.
    pub fn tick(&mut self, pack: &mut Pack, now: Instant) -> TickResult {
        let max_drift = self.period.as_millis() * 2;
        if now.as_millis() > self.next_tick.as_millis() + max_drift {
            self.next_tick = now;
        }

        pack.tick(now);
        self.renderer.commit(pack);

        self.next_tick += self.period;
        let sleep_duration = self
            .next_tick
            .checked_duration_since(now)
            .unwrap_or(Duration::from_millis(0));

        TickResult {
            next_deadline: self.next_tick,
            sleep_duration,
        }
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    pub fn renderer(&self) -> &Renderer<O> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<O> {
        &mut self.renderer
    }
}

use embassy_time::{Duration, Instant};
use heapless::Deque;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::action::Action;
use crate::animation::{AnimationConfig, AnimationSlot};
use crate::color::{BLACK, Rgb, fill_solid};
use crate::geometry::mask_beyond;

/// Per-zone animation controller
///
/// Owns the zone's pixel buffer, its current animation and a FIFO of
/// actions sequenced ahead of it.
///
/// `LEDS` is the physical pixel count of the zone, `QUEUE` the number of
/// actions (and raised cues) that can be pending at once.
#[derive(Debug)]
pub struct AnimationController<C, const LEDS: usize, const QUEUE: usize> {
    queue: Deque<Action<C>, QUEUE>,
    action: Option<Action<C>>,
    animation: Option<AnimationSlot>,
    cues: Deque<C, QUEUE>,
    pixels: [Rgb; LEDS],
    active: usize,
}

impl<C, const LEDS: usize, const QUEUE: usize> Default for AnimationController<C, LEDS, QUEUE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, const LEDS: usize, const QUEUE: usize> AnimationController<C, LEDS, QUEUE> {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
            action: None,
            animation: None,
            cues: Deque::new(),
            pixels: [BLACK; LEDS],
            active: LEDS,
        }
    }

    /// Replace everything with `animation`, started right away
    pub fn play(&mut self, animation: AnimationSlot, config: AnimationConfig, now: Instant) {
        self.queue.clear();
        self.action = None;
        self.install(animation, config, now);
    }

    /// Replace everything with a single action, started right away
    pub fn play_action(&mut self, action: Action<C>, now: Instant) {
        self.queue.clear();
        self.action = None;
        self.animation = None;
        self.start_action(action, now);
    }

    /// Append an action to the queue
    ///
    /// Starts it at once when nothing is executing.
    /// Returns the action if the queue is full.
    pub fn enqueue(&mut self, action: Action<C>, now: Instant) -> Result<(), Action<C>> {
        self.queue.push_back(action)?;
        if self.action.is_none() {
            self.start_next(now);
        }
        Ok(())
    }

    /// Advance the current action and animation by one tick
    #[allow(clippy::cast_possible_truncation)]
    pub fn update(&mut self, dt: Duration, now: Instant) {
        if let Some(action) = self.action.as_mut() {
            if action.update(dt) {
                self.action = None;
                self.start_next(now);
            }
        }

        if let Some(animation) = self.animation.as_mut() {
            animation.update(dt.as_millis() as u32, now, &mut self.pixels);
            if animation.is_done() {
                self.animation = None;
            }
        }

        mask_beyond(&mut self.pixels, self.active);
    }

    /// Drop the queue, the current action and the animation
    ///
    /// No cue of a dropped action is raised. Pixels keep their last frame.
    pub fn stop(&mut self) {
        self.queue.clear();
        self.action = None;
        self.animation = None;
    }

    pub fn is_running(&self) -> bool {
        self.action.is_some() || self.animation.is_some() || !self.queue.is_empty()
    }

    pub const fn current_animation(&self) -> Option<&AnimationSlot> {
        self.animation.as_ref()
    }

    pub fn current_animation_mut(&mut self) -> Option<&mut AnimationSlot> {
        self.animation.as_mut()
    }

    /// Next cue raised by a callback action
    pub fn take_cue(&mut self) -> Option<C> {
        self.cues.pop_front()
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Blank the whole buffer
    pub fn clear(&mut self) {
        fill_solid(&mut self.pixels, BLACK);
    }

    /// Number of pixels animations run on
    pub const fn active_leds(&self) -> usize {
        self.active
    }

    /// Change the number of pixels animations run on
    ///
    /// The buffer is blanked so no pixel stays lit outside the new size.
    pub fn set_active_leds(&mut self, count: usize) {
        self.active = count.min(LEDS);
        self.clear();
    }

    fn install(&mut self, mut animation: AnimationSlot, config: AnimationConfig, now: Instant) {
        let config = config.with_leds(self.active);
        animation.start(config, now, &mut self.pixels);
        mask_beyond(&mut self.pixels, self.active);
        self.animation = Some(animation);
    }

    fn start_next(&mut self, now: Instant) {
        while self.action.is_none() {
            let Some(next) = self.queue.pop_front() else {
                break;
            };
            self.start_action(next, now);
        }
    }

    /// Start an action, keeping it as current only if it is still running
    fn start_action(&mut self, action: Action<C>, now: Instant) {
        match action {
            Action::PlayAnimation(animation, config) => {
                self.install(animation, config, now);
            }
            Action::ChangeColor {
                color,
                duration,
                easing,
            } => {
                if let Some(animation) = self.animation.as_mut() {
                    animation.set_color(color, duration, easing, now);
                }
            }
            Action::ChangeSpeed {
                speed,
                duration,
                easing,
            } => {
                if let Some(animation) = self.animation.as_mut() {
                    animation.set_speed(speed, duration, easing, now);
                }
            }
            Action::ChangeBrightness {
                brightness,
                duration,
                easing,
            } => {
                if let Some(animation) = self.animation.as_mut() {
                    animation.set_brightness(brightness, duration, easing, now);
                }
            }
            Action::Callback(cue) => {
                if self.cues.push_back(cue).is_err() {
                    #[cfg(feature = "esp32-log")]
                    println!("[AnimationController.start_action] cue dropped, outbox full");
                }
            }
            wait @ Action::Wait { .. } => {
                self.action = Some(wait);
            }
        }
    }
}

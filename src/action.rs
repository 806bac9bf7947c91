use embassy_time::Duration;

use crate::animation::{AnimationConfig, AnimationSlot, PatternId};
use crate::color::Rgb;
use crate::transition::Easing;

/// One-shot directive sequenced ahead of a zone's animation
///
/// `C` is the cue type raised by [`Action::Callback`]; the controller hands
/// raised cues back to its owner.
#[derive(Debug, Clone)]
pub enum Action<C> {
    /// Hold the queue until `duration` of tick time has accumulated
    Wait { duration: Duration, elapsed: Duration },
    /// Install and start an animation, completing immediately
    PlayAnimation(AnimationSlot, AnimationConfig),
    /// Retarget the color ramp of the current animation
    ChangeColor {
        color: Rgb,
        duration: Duration,
        easing: Easing,
    },
    /// Retarget the speed ramp of the current animation
    ChangeSpeed {
        speed: u16,
        duration: Duration,
        easing: Easing,
    },
    /// Retarget the brightness ramp of the current animation
    ChangeBrightness {
        brightness: u8,
        duration: Duration,
        easing: Easing,
    },
    /// Raise a cue to the controller owner
    Callback(C),
}

impl<C> Action<C> {
    pub const fn wait(duration: Duration) -> Self {
        Self::Wait {
            duration,
            elapsed: Duration::from_millis(0),
        }
    }

    pub const fn play(animation: AnimationSlot, config: AnimationConfig) -> Self {
        Self::PlayAnimation(animation, config)
    }

    /// Play a pattern by id
    pub fn play_pattern(id: PatternId, config: AnimationConfig) -> Self {
        Self::PlayAnimation(id.to_slot(), config)
    }

    pub const fn change_color(color: Rgb, duration: Duration, easing: Easing) -> Self {
        Self::ChangeColor {
            color,
            duration,
            easing,
        }
    }

    pub const fn change_speed(speed: u16, duration: Duration, easing: Easing) -> Self {
        Self::ChangeSpeed {
            speed,
            duration,
            easing,
        }
    }

    pub const fn change_brightness(brightness: u8, duration: Duration, easing: Easing) -> Self {
        Self::ChangeBrightness {
            brightness,
            duration,
            easing,
        }
    }

    pub const fn callback(cue: C) -> Self {
        Self::Callback(cue)
    }

    /// Advance a running action by `dt`
    ///
    /// Returns true once the action is complete. Everything except `Wait`
    /// completes as soon as it has started.
    pub fn update(&mut self, dt: Duration) -> bool {
        match self {
            Self::Wait { duration, elapsed } => {
                *elapsed += dt;
                *elapsed >= *duration
            }
            _ => true,
        }
    }
}

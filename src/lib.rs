#![no_std]

pub mod action;
pub mod animation;
pub mod color;
pub mod config;
pub mod controller;
pub mod easter_egg;
pub mod geometry;
pub mod heat;
pub mod io;
pub mod math8;
pub mod pack;
pub mod renderer;
pub mod scheduler;
pub mod transition;

pub use action::Action;
pub use animation::{AnimationConfig, AnimationSlot, PatternId};
pub use config::{DeviceVariant, Features, FireMode, PackConfig, ZoneColors};
pub use controller::AnimationController;
pub use easter_egg::{EasterEggTimer, EggSound};
pub use geometry::{RingSelector, RingSize};
pub use heat::{HeatModel, HeatSettings};
pub use io::{Dial, PackIo, SoundWait, SwitchLatch, VoiceSink};
pub use pack::{Pack, PackContext, PackCue, PackState};
pub use renderer::{Renderer, Zone};
pub use scheduler::{TickResult, TickScheduler};
pub use transition::{Easing, Ramp};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The pack renders into it once per tick, one call per zone.
pub trait OutputDriver {
    /// Write the colors of one zone
    fn write(&mut self, zone: Zone, colors: &[Rgb]);
}

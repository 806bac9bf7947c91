#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::{Rgb, scale_color};
use crate::geometry::{RING_CAPACITY, mask_beyond};
use crate::pack::Pack;

/// Physical LED zones of the pack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Powercell,
    Cyclotron,
    Future,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Powercell, Zone::Cyclotron, Zone::Future];
}

/// Pushes the zone buffers of a [`Pack`] to the output driver
///
/// Each commit copies a zone into the frame buffer, applies the global
/// brightness, blanks ring pixels beyond the active ring size and hands the
/// result to the driver.
pub struct Renderer<O: OutputDriver> {
    output: O,
    frame_buffer: [Rgb; RING_CAPACITY],
    frames: u32,
}

impl<O: OutputDriver> Renderer<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            frame_buffer: [Rgb::default(); RING_CAPACITY],
            frames: 0,
        }
    }

    /// Write every zone once
    pub fn commit(&mut self, pack: &Pack) {
        let brightness = pack.brightness();
        for zone in Zone::ALL {
            let pixels = pack.zone_pixels(zone);
            let len = pixels.len().min(self.frame_buffer.len());
            let frame = &mut self.frame_buffer[..len];
            for (out, pixel) in frame.iter_mut().zip(pixels) {
                *out = scale_color(*pixel, brightness);
            }
            if zone == Zone::Cyclotron {
                mask_beyond(frame, pack.active_ring_leds());
            }
            self.output.write(zone, frame);
        }
        self.frames = self.frames.wrapping_add(1);

        #[cfg(feature = "esp32-log")]
        if self.frames % 2500 == 0 {
            println!("[Renderer.commit] {} frames", self.frames);
        }
    }

    /// Frames committed so far
    pub const fn frames(&self) -> u32 {
        self.frames
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}

//! Named colors used by the pack zones

use super::{Rgb, rgb_from_u32};

pub const BLACK: Rgb = rgb_from_u32(0x00_0000);
pub const RED: Rgb = rgb_from_u32(0xFF_0000);
pub const GREEN: Rgb = rgb_from_u32(0x00_8000);
pub const BLUE: Rgb = rgb_from_u32(0x00_00FF);
pub const ORANGE: Rgb = rgb_from_u32(0xFF_A500);
pub const WHITE: Rgb = rgb_from_u32(0xFF_FFFF);

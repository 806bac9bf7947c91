mod palette;
mod utils;

pub use palette::{BLACK, BLUE, GREEN, ORANGE, RED, WHITE};
use smart_leds::{RGB8, hsv::Hsv as HSV};
pub use utils::{
    fill_rainbow, fill_solid, hsv2rgb, is_black, rgb_from_u32, scale_color, scale_color_video,
};

pub type Rgb = RGB8;
pub type Hsv = HSV;

//! Ring zone geometry
//!
//! The ring can be populated with 4, 24, 32 or 40 pixels. Classic patterns
//! light blocks centered on four "tube" positions, which depend on the
//! populated size. The size itself is picked with a dial, so the selector
//! keeps a hysteresis band around each class boundary.

use crate::color::{BLACK, Rgb};

/// Physical pixel capacity of the ring zone
pub const RING_CAPACITY: usize = 40;

/// Widest color block a tube position can carry
pub const MAX_BLOCK_WIDTH: u8 = 5;

/// Dial hysteresis around every class threshold
pub const RING_HYSTERESIS: u16 = 0x80;

const THRESHOLD_24: u16 = 0x180;
const THRESHOLD_32: u16 = 0x800;
const THRESHOLD_40: u16 = 0xE80;

// 1-based tube positions per populated size
const TUBES_4: [u8; 4] = [1, 2, 3, 4];
const TUBES_24: [u8; 4] = [4, 10, 14, 20];
const TUBES_32: [u8; 4] = [5, 13, 19, 27];
const TUBES_40: [u8; 4] = [6, 16, 24, 34];

/// Supported populated sizes of the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RingSize {
    Four = 4,
    TwentyFour = 24,
    ThirtyTwo = 32,
    Forty = 40,
}

impl RingSize {
    pub const fn from_count(count: usize) -> Option<Self> {
        Some(match count {
            4 => Self::Four,
            24 => Self::TwentyFour,
            32 => Self::ThirtyTwo,
            40 => Self::Forty,
            _ => return None,
        })
    }

    pub const fn count(self) -> usize {
        self as usize
    }

    /// Map a raw dial reading (0-4095) straight onto a size class
    pub const fn classify(raw: u16) -> Self {
        if raw < THRESHOLD_24 {
            Self::Four
        } else if raw < THRESHOLD_32 {
            Self::TwentyFour
        } else if raw < THRESHOLD_40 {
            Self::ThirtyTwo
        } else {
            Self::Forty
        }
    }

    /// Zero-based pixel index of each tube position
    pub const fn tubes(self) -> [usize; 4] {
        let one_based = match self {
            Self::Four => TUBES_4,
            Self::TwentyFour => TUBES_24,
            Self::ThirtyTwo => TUBES_32,
            Self::Forty => TUBES_40,
        };
        [
            one_based[0] as usize - 1,
            one_based[1] as usize - 1,
            one_based[2] as usize - 1,
            one_based[3] as usize - 1,
        ]
    }

    /// Size class after applying hysteresis to a new reading
    ///
    /// Moves at most one class per reading.
    const fn step(self, raw: u16) -> Self {
        match self {
            Self::Four if raw > THRESHOLD_24 + RING_HYSTERESIS => Self::TwentyFour,
            Self::TwentyFour if raw < THRESHOLD_24 - RING_HYSTERESIS => Self::Four,
            Self::TwentyFour if raw > THRESHOLD_32 + RING_HYSTERESIS => Self::ThirtyTwo,
            Self::ThirtyTwo if raw < THRESHOLD_32 - RING_HYSTERESIS => Self::TwentyFour,
            Self::ThirtyTwo if raw > THRESHOLD_40 + RING_HYSTERESIS => Self::Forty,
            Self::Forty if raw < THRESHOLD_40 - RING_HYSTERESIS => Self::ThirtyTwo,
            other => other,
        }
    }
}

/// Tube positions for any pixel count
///
/// Counts that are not a supported ring size use the full ring table.
pub fn tube_positions(count: usize) -> [usize; 4] {
    RingSize::from_count(count)
        .unwrap_or(RingSize::Forty)
        .tubes()
}

/// Index of pixel `offset` of a block of `width` centered on `tube`
///
/// Wraps around the ring in both directions.
pub const fn block_index(tube: usize, offset: usize, width: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (tube + offset + count - ((width >> 1) % count)) % count
}

/// Paint a block of `width` pixels centered on `tube`
pub fn paint_block(leds: &mut [Rgb], tube: usize, width: u8, color: Rgb) {
    let count = leds.len();
    let width = usize::from(width.clamp(1, MAX_BLOCK_WIDTH));
    for offset in 0..width {
        let index = block_index(tube, offset, width, count);
        if let Some(led) = leds.get_mut(index) {
            *led = color;
        }
    }
}

/// Apply `f` to every pixel of the block centered on `tube`
pub fn map_block(leds: &mut [Rgb], tube: usize, width: u8, mut f: impl FnMut(Rgb) -> Rgb) {
    let count = leds.len();
    let width = usize::from(width.clamp(1, MAX_BLOCK_WIDTH));
    for offset in 0..width {
        let index = block_index(tube, offset, width, count);
        if let Some(led) = leds.get_mut(index) {
            *led = f(*led);
        }
    }
}

/// Blank every pixel at or above `active`
pub fn mask_beyond(leds: &mut [Rgb], active: usize) {
    if let Some(tail) = leds.get_mut(active..) {
        for led in tail {
            *led = BLACK;
        }
    }
}

/// Dial driven ring size selector with hysteresis
#[derive(Debug, Clone, Default)]
pub struct RingSelector {
    current: Option<RingSize>,
}

impl RingSelector {
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Currently selected size, if a reading has been taken
    pub const fn size(&self) -> Option<RingSize> {
        self.current
    }

    /// Feed a dial reading
    ///
    /// The first reading is classified without hysteresis and is not reported
    /// as a change. Later readings return `Some` only when the class moves.
    pub fn update(&mut self, raw: u16) -> Option<RingSize> {
        let Some(current) = self.current else {
            self.current = Some(RingSize::classify(raw));
            return None;
        };
        let next = current.step(raw);
        if next == current {
            return None;
        }
        self.current = Some(next);
        Some(next)
    }
}

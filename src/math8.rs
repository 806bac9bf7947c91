use embassy_time::Duration;

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// A scale of 255 leaves the value untouched.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Scale an 8-bit value, never dimming a lit channel to zero
///
/// Matches the "video" scaling used by LED drivers: a non-zero value scaled by
/// a non-zero factor stays at least 1.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8_video(value: u8, scale: u8) -> u8 {
    let scaled = ((value as u16 * scale as u16) >> 8) as u8;
    if value != 0 && scale != 0 {
        scaled.saturating_add(1)
    } else {
        scaled
    }
}

/// Fraction of `duration` covered by `elapsed`, clamped to `0.0..=1.0`
#[allow(clippy::cast_precision_loss)]
pub fn progress(elapsed: Duration, duration: Duration) -> f32 {
    let total = duration.as_millis();
    if total == 0 || elapsed.as_millis() >= total {
        return 1.0;
    }
    elapsed.as_millis() as f32 / total as f32
}

/// Round a float to the nearest `u8`, saturating at the bounds
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_u8(value: f32) -> u8 {
    libm::roundf(value).clamp(0.0, 255.0) as u8
}

/// Round a float to the nearest `u16`, saturating at the bounds
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_u16(value: f32) -> u16 {
    libm::roundf(value).clamp(0.0, f32::from(u16::MAX)) as u16
}

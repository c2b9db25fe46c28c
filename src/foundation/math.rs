/// Slack used when converting accumulated seconds into frame indices.
pub(crate) const FRAME_EPSILON: f64 = 1e-9;

/// Round half-up to a whole pixel count, never below 1.
pub(crate) fn round_pixels(x: f64) -> u32 {
    let r = (x + 0.5).floor();
    if r.is_nan() || r < 1.0 {
        1
    } else if r >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        r as u32
    }
}

/// `true` for finite values strictly greater than zero.
pub(crate) fn is_positive_finite(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Decimal digit count of `n` (`0` has one digit).
pub(crate) fn decimal_width(n: u64) -> usize {
    let mut n = n;
    let mut w = 1;
    while n >= 10 {
        n /= 10;
        w += 1;
    }
    w
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

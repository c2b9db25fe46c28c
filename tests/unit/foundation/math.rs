use super::*;

#[test]
fn round_pixels_is_half_up_and_at_least_one() {
    assert_eq!(round_pixels(1.5), 2);
    assert_eq!(round_pixels(2.5), 3);
    assert_eq!(round_pixels(2.4999), 2);
    assert_eq!(round_pixels(0.2), 1);
    assert_eq!(round_pixels(-4.0), 1);
    assert_eq!(round_pixels(f64::NAN), 1);
    assert_eq!(round_pixels(1e20), u32::MAX);
}

#[test]
fn positive_finite_guard() {
    assert!(is_positive_finite(0.001));
    assert!(!is_positive_finite(0.0));
    assert!(!is_positive_finite(-1.0));
    assert!(!is_positive_finite(f64::INFINITY));
    assert!(!is_positive_finite(f64::NAN));
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(255, 128), 128);
}

#[test]
fn decimal_width_counts_digits() {
    assert_eq!(decimal_width(0), 1);
    assert_eq!(decimal_width(9), 1);
    assert_eq!(decimal_width(10), 2);
    assert_eq!(decimal_width(19), 2);
    assert_eq!(decimal_width(1000), 4);
}

use super::*;
use crate::foundation::math::round_pixels;

#[test]
fn parses_short_and_long_names() {
    assert_eq!("px".parse::<Units>().unwrap(), Units::Pixels);
    assert_eq!("Inches".parse::<Units>().unwrap(), Units::Inches);
    assert_eq!(" cm ".parse::<Units>().unwrap(), Units::Centimeters);
    assert_eq!("mm".parse::<Units>().unwrap(), Units::Millimeters);
    assert_eq!("pt".parse::<Units>().unwrap(), Units::Points);
    assert_eq!("%".parse::<Units>().unwrap(), Units::Percent);
}

#[test]
fn display_roundtrips_through_from_str() {
    for u in Units::ALL {
        assert_eq!(u.to_string().parse::<Units>().unwrap(), u);
    }
}

#[test]
fn unknown_unit_is_invalid_unit() {
    let err = "furlongs".parse::<Units>().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUnit { ref unit, .. } if unit == "furlongs"));
}

#[test]
fn conversion_factors_follow_pixels_per_inch() {
    let ppi = 300.0;
    assert_eq!(Units::Pixels.conversion_factor(ppi), Some(1.0));
    assert_eq!(Units::Inches.conversion_factor(ppi), Some(300.0));
    assert_eq!(Units::Points.conversion_factor(ppi), Some(300.0 / 72.0));
    assert!((Units::Centimeters.conversion_factor(ppi).unwrap() - 300.0 / 2.54).abs() < 1e-12);
    assert!((Units::Millimeters.conversion_factor(ppi).unwrap() - 300.0 / 25.4).abs() < 1e-12);
    assert_eq!(Units::Percent.conversion_factor(ppi), None);
}

#[test]
fn convert_between_physical_units() {
    let cm = convert_length(1.0, Units::Inches, Units::Centimeters, 72.0).unwrap();
    assert!((cm - 2.54).abs() < 1e-12);
    let mm = convert_length(210.0, Units::Millimeters, Units::Centimeters, 72.0).unwrap();
    assert!((mm - 21.0).abs() < 1e-12);
    let px = convert_length(1.0, Units::Inches, Units::Pixels, 300.0).unwrap();
    assert!((px - 300.0).abs() < 1e-12);
    assert!(convert_length(50.0, Units::Percent, Units::Pixels, 72.0).is_err());
}

#[test]
fn inches_pixels_inches_roundtrip_within_rounding_tolerance() {
    for ppi in [72.0, 96.0, 150.0, 300.0] {
        for inches in [0.5, 1.0, 3.333, 8.5, 11.0, 17.77] {
            let px = convert_length(inches, Units::Inches, Units::Pixels, ppi).unwrap();
            let rounded = f64::from(round_pixels(px));
            let back = convert_length(rounded, Units::Pixels, Units::Inches, ppi).unwrap();
            assert!(
                (back - inches).abs() <= 0.5 / ppi + 1e-12,
                "{inches} in @ {ppi}ppi came back as {back}"
            );
        }
    }
}

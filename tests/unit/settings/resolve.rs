use super::*;

fn resolve(s: &Settings) -> ResolvedGeometry {
    resolve_geometry(s, &DisplayHints::default()).unwrap()
}

#[test]
fn explicit_pixels_pass_through() {
    let g = resolve(&Settings::new().with_dimensions(100.0, 100.0));
    assert_eq!((g.pixel_width, g.pixel_height), (100, 100));
    assert_eq!(g.units, Units::Pixels);
    assert_eq!(g.pixels_per_inch, 72.0);
    assert_eq!(g.pixel_ratio, 1.0);
    assert!(!g.exporting);
}

#[test]
fn a4_preset_converts_into_requested_units() {
    let g = resolve(&Settings::new().with_preset("A4"));
    assert_eq!(g.units, Units::Pixels);
    assert_eq!((g.pixel_width, g.pixel_height), (595, 842));

    let g = resolve(
        &Settings::new()
            .with_preset("a4")
            .with_units(Units::Centimeters)
            .with_pixels_per_inch(300.0),
    );
    assert!((g.output_width - 21.0).abs() < 1e-9);
    assert!((g.output_height - 29.7).abs() < 1e-9);
    assert_eq!((g.pixel_width, g.pixel_height), (2480, 3508));
}

#[test]
fn pixel_ratio_scales_pixels_but_not_units() {
    let g = resolve(
        &Settings::new()
            .with_dimensions(2.0, 1.0)
            .with_units(Units::Inches)
            .with_pixel_ratio(2.0),
    );
    assert_eq!((g.pixel_width, g.pixel_height), (288, 144));
    assert_eq!((g.output_width, g.output_height), (2.0, 1.0));
    assert_eq!((g.style_width, g.style_height), (144.0, 72.0));
}

#[test]
fn display_hint_ratio_applies_only_without_explicit_ratio() {
    let hints = DisplayHints {
        pixel_ratio: Some(3.0),
        viewport: None,
    };
    let s = Settings::new().with_dimensions(10.0, 10.0);
    let g = resolve_geometry(&s, &hints).unwrap();
    assert_eq!(g.pixel_width, 30);

    let g = resolve_geometry(&s.clone().with_pixel_ratio(1.0), &hints).unwrap();
    assert_eq!(g.pixel_width, 10);
}

#[test]
fn rounding_is_half_up() {
    let g = resolve(&Settings::new().with_dimensions(10.5, 2.5));
    assert_eq!((g.pixel_width, g.pixel_height), (11, 3));
    let g = resolve(&Settings::new().with_dimensions(0.1, 0.1));
    assert_eq!((g.pixel_width, g.pixel_height), (1, 1));
}

#[test]
fn unknown_preset_is_reported_by_name() {
    let err = resolve_geometry(
        &Settings::new().with_preset("not-a-real-preset"),
        &DisplayHints::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownPreset { ref name } if name == "not-a-real-preset"));
}

#[test]
fn invalid_dimensions_name_the_axis() {
    for (w, h, axis) in [
        (-3.0, 10.0, "dimensions[0]"),
        (10.0, 0.0, "dimensions[1]"),
        (f64::NAN, 1.0, "dimensions[0]"),
        (1.0, f64::INFINITY, "dimensions[1]"),
    ] {
        let err = resolve_geometry(
            &Settings::new().with_dimensions(w, h),
            &DisplayHints::default(),
        )
        .unwrap_err();
        match err {
            ConfigError::InvalidDimensions { detail } => assert!(detail.contains(axis), "{detail}"),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn invalid_unit_and_settings_are_rejected() {
    let s = Settings {
        units: Some("furlong".to_owned()),
        ..Settings::new().with_dimensions(1.0, 1.0)
    };
    assert!(matches!(
        resolve_geometry(&s, &DisplayHints::default()),
        Err(ConfigError::InvalidUnit { .. })
    ));

    let s = Settings::new()
        .with_dimensions(1.0, 1.0)
        .with_export_pixel_ratio(-1.0);
    assert!(matches!(
        resolve_geometry(&s, &DisplayHints::default()),
        Err(ConfigError::InvalidSetting {
            field: "exportPixelRatio",
            ..
        })
    ));

    let s = Settings::new().with_dimensions(1.0, 1.0).with_bleed(-0.5);
    assert!(matches!(
        resolve_geometry(&s, &DisplayHints::default()),
        Err(ConfigError::InvalidSetting { field: "bleed", .. })
    ));
}

#[test]
fn percent_units_need_a_viewport() {
    let s = Settings::new()
        .with_dimensions(50.0, 25.0)
        .with_units(Units::Percent);
    assert!(matches!(
        resolve_geometry(&s, &DisplayHints::default()),
        Err(ConfigError::InvalidUnit { .. })
    ));

    let hints = DisplayHints {
        pixel_ratio: None,
        viewport: Some((800.0, 600.0)),
    };
    let g = resolve_geometry(&s, &hints).unwrap();
    assert_eq!((g.pixel_width, g.pixel_height), (400, 150));

    let s = Settings::new().with_preset("a4").with_units(Units::Percent);
    assert!(matches!(
        resolve_geometry(&s, &hints),
        Err(ConfigError::InvalidUnit { .. })
    ));
}

#[test]
fn missing_dimensions_fill_the_viewport() {
    assert!(matches!(
        resolve_geometry(&Settings::new(), &DisplayHints::default()),
        Err(ConfigError::InvalidDimensions { .. })
    ));
    let hints = DisplayHints {
        pixel_ratio: Some(2.0),
        viewport: Some((640.0, 480.0)),
    };
    let g = resolve_geometry(&Settings::new(), &hints).unwrap();
    assert_eq!((g.pixel_width, g.pixel_height), (1280, 960));
    assert_eq!((g.output_width, g.output_height), (640.0, 480.0));
}

#[test]
fn orientation_swaps_when_needed() {
    let g = resolve(
        &Settings::new()
            .with_preset("a4")
            .with_orientation(Orientation::Landscape),
    );
    assert_eq!((g.pixel_width, g.pixel_height), (842, 595));
    let g = resolve(
        &Settings::new()
            .with_dimensions(300.0, 100.0)
            .with_orientation(Orientation::Portrait),
    );
    assert_eq!((g.pixel_width, g.pixel_height), (100, 300));
    let g = resolve(
        &Settings::new()
            .with_dimensions(300.0, 100.0)
            .with_orientation(Orientation::Landscape),
    );
    assert_eq!((g.pixel_width, g.pixel_height), (300, 100));
}

#[test]
fn bleed_grows_output_on_every_side() {
    let g = resolve(
        &Settings::new()
            .with_preset("letter")
            .with_units(Units::Inches)
            .with_bleed(0.125),
    );
    assert_eq!((g.trim_width, g.trim_height), (8.5, 11.0));
    assert_eq!((g.output_width, g.output_height), (8.75, 11.25));
    assert_eq!((g.pixel_width, g.pixel_height), (630, 810));
}

#[test]
fn export_ratio_overrides_display_ratio() {
    let g = resolve(
        &Settings::new()
            .with_dimensions(100.0, 50.0)
            .with_pixel_ratio(2.0)
            .with_export_pixel_ratio(4.0),
    );
    assert_eq!(g.pixel_width, 200);

    let e = g.for_export(None);
    assert!(e.exporting);
    assert_eq!(e.pixel_ratio, 4.0);
    assert_eq!((e.pixel_width, e.pixel_height), (400, 200));

    let e = g.for_export(Some(1.0));
    assert_eq!((e.pixel_width, e.pixel_height), (100, 50));

    let plain = resolve(&Settings::new().with_dimensions(100.0, 50.0));
    assert_eq!(plain.for_export(None).pixel_width, 100);
}

#[test]
fn display_hint_never_sizes_exports() {
    let hints = DisplayHints {
        pixel_ratio: Some(2.0),
        viewport: None,
    };
    let s = Settings::new().with_dimensions(100.0, 50.0);
    let g = resolve_geometry(&s, &hints).unwrap();
    assert!(!g.pixel_ratio_explicit);
    assert_eq!(g.pixel_width, 200);
    let e = g.for_export(None);
    assert_eq!((e.pixel_width, e.pixel_height, e.pixel_ratio), (100, 50, 1.0));

    let g = resolve_geometry(&s.with_pixel_ratio(3.0), &hints).unwrap();
    assert!(g.pixel_ratio_explicit);
    assert_eq!(g.for_export(None).pixel_width, 300);
}

#[test]
fn resolution_is_idempotent_through_inverse() {
    let hints = DisplayHints {
        pixel_ratio: Some(1.5),
        viewport: Some((1024.0, 768.0)),
    };
    let cases = vec![
        Settings::new().with_dimensions(100.0, 100.0),
        Settings::new().with_preset("A3").with_units(Units::Millimeters),
        Settings::new()
            .with_preset("letter")
            .with_units(Units::Centimeters)
            .with_pixels_per_inch(300.0)
            .with_bleed(0.3)
            .with_orientation(Orientation::Landscape),
        Settings::new()
            .with_dimensions(33.3, 12.7)
            .with_units(Units::Points)
            .with_export_pixel_ratio(2.0),
        Settings::new()
            .with_dimensions(50.0, 50.0)
            .with_units(Units::Percent),
        Settings::new(),
    ];
    for s in cases {
        let a = resolve_geometry(&s, &hints).unwrap();
        let b = resolve_geometry(&s, &hints).unwrap();
        assert_eq!(a, b);
        let c = resolve_geometry(&a.to_settings(), &hints).unwrap();
        assert_eq!(a, c, "inverse of {s:?}");
    }
}

use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0).is_err());
    assert_eq!(Fps::new(30).unwrap().get(), 30);
    assert_eq!(Fps::default(), Fps::DEFAULT);
}

#[test]
fn fps_frames_secs_roundtrip_floor() {
    let fps = Fps::new(24).unwrap();
    for f in [0u64, 1, 23, 24, 123, 10_000] {
        let secs = fps.frames_to_secs(f);
        assert_eq!(fps.secs_to_frames_floor(secs), f);
    }
}

#[test]
fn accumulated_steps_land_on_exact_frames() {
    let fps = Fps::new(10).unwrap();
    let mut t = 0.0;
    for f in 1..=100u64 {
        t += fps.frame_duration_secs();
        assert_eq!(fps.secs_to_frames_floor(t), f);
    }
}

#[test]
fn frame_count_is_ceil_of_duration_times_fps() {
    let fps = Fps::new(10).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(2.0), 20);
    assert_eq!(fps.secs_to_frames_ceil(2.05), 21);
    assert_eq!(fps.secs_to_frames_ceil(1e-6), 1);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 0);

    let fps = Fps::new(30).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(0.1), 3);
}

#[test]
fn fps_deserializes_with_validation() {
    let fps: Fps = serde_json::from_str("60").unwrap();
    assert_eq!(fps.get(), 60);
    assert!(serde_json::from_str::<Fps>("0").is_err());
}

#[test]
fn canvas_rgba_len() {
    let c = Canvas {
        width: 3,
        height: 2,
    };
    assert_eq!(c.rgba_len(), 24);
}

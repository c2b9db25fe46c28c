use super::*;

fn looped(duration: f64, fps: u32) -> AnimationClock {
    AnimationClock::new(Timing::looped(duration, fps).unwrap())
}

fn timing(settings: Settings) -> Timing {
    Timing::from_settings(&settings).unwrap()
}

#[test]
fn frame_count_law() {
    for (d, fps, expected) in [
        (2.0, 10, 20),
        (1.0, 24, 24),
        (0.5, 30, 15),
        (1.01, 10, 11),
        (0.01, 24, 1),
        (3.3, 30, 99),
    ] {
        assert_eq!(
            Timing::looped(d, fps).unwrap().total_frames,
            Some(expected),
            "{d}s at {fps}"
        );
    }
}

#[test]
fn timing_defaults_and_validation() {
    let t = timing(Settings::new());
    assert!(t.is_static());
    assert_eq!(t.fps.get(), 24);
    assert!(t.looping);

    let t = timing(Settings::new().with_duration(1.0));
    assert!(t.animate);
    let t = timing(Settings::new().with_duration(1.0).with_animate(false));
    assert!(t.is_static());
    let t = timing(Settings::new().with_animate(true));
    assert!(t.is_static(), "no loop length means a single frame");

    let t = timing(Settings::new().with_total_frames(12).with_fps(6));
    assert_eq!(t.duration, Some(2.0));
    assert!(t.animate);

    assert!(Timing::from_settings(&Settings::new().with_fps(0)).is_err());
    assert!(Timing::from_settings(&Settings::new().with_duration(-1.0)).is_err());
    assert!(Timing::from_settings(&Settings::new().with_total_frames(0)).is_err());
    assert!(
        Timing::from_settings(
            &Settings::new()
                .with_duration(2.0)
                .with_fps(10)
                .with_total_frames(25)
        )
        .is_err()
    );
    assert!(
        Timing::from_settings(
            &Settings::new()
                .with_duration(2.0)
                .with_fps(10)
                .with_total_frames(21)
        )
        .is_ok()
    );
}

#[test]
fn static_clock_emits_once_then_idles() {
    let mut c = AnimationClock::new(Timing::still());
    assert_eq!(c.advance(0.1), None, "idle clocks do not tick");
    c.start();
    let ctx = c.advance(0.5).unwrap();
    assert_eq!(ctx.frame, 0);
    assert_eq!(ctx.time, 0.0);
    assert_eq!(ctx.total_frames, None);
    assert_eq!(ctx.playhead, 0.0);
    assert!(!ctx.exporting);
    assert_eq!(c.state(), ClockState::Idle);
    assert_eq!(c.advance(0.5), None);
    c.start();
    assert!(c.advance(0.0).is_some(), "explicit start re-arms the still frame");
}

#[test]
fn realtime_loop_wraps_frame_and_time() {
    let mut c = looped(1.0, 4);
    c.start();
    let first = c.advance(9.0).unwrap();
    assert_eq!((first.frame, first.time, first.delta_time), (0, 0.0, 0.0));

    let mut frames = Vec::new();
    for _ in 0..8 {
        let ctx = c.advance(0.25).unwrap();
        assert_eq!(ctx.time, ctx.frame as f64 / 4.0);
        assert!((0.0..1.0).contains(&ctx.playhead));
        frames.push(ctx.frame);
    }
    assert_eq!(frames, vec![1, 2, 3, 0, 1, 2, 3, 0]);
    assert_eq!(c.elapsed(), 2.0);
}

#[test]
fn first_frame_of_each_loop_starts_at_zero() {
    let mut c = looped(2.0, 10);
    c.start();
    c.advance(0.0).unwrap();
    let mut ctx = None;
    for _ in 0..20 {
        ctx = c.advance(0.1);
    }
    let ctx = ctx.unwrap();
    assert_eq!((ctx.frame, ctx.time, ctx.playhead), (0, 0.0, 0.0));
    assert!((c.elapsed() - 2.0).abs() < 1e-9);
}

#[test]
fn non_looping_clock_holds_last_frame_and_pauses() {
    let mut c = AnimationClock::new(timing(
        Settings::new().with_duration(1.0).with_fps(10).with_loop(false),
    ));
    c.start();
    c.advance(0.0);
    let ctx = c.advance(5.0).unwrap();
    assert_eq!(ctx.frame, 9);
    assert_eq!(ctx.time, 1.0);
    assert_eq!(c.state(), ClockState::Paused);
    assert!(c.is_finished());
    assert_eq!(c.advance(1.0), None);

    c.resume();
    assert_eq!(c.state(), ClockState::Running);
    assert_eq!(c.advance(0.3).unwrap().frame, 0, "resuming a finished clock restarts");
}

#[test]
fn fixed_playback_ignores_wall_time() {
    let mut c = AnimationClock::new(timing(
        Settings::new()
            .with_duration(1.0)
            .with_fps(10)
            .with_playback_rate(PlaybackRate::Fixed),
    ));
    c.start();
    c.advance(3.0);
    for n in 1..=12u64 {
        let ctx = c.advance(3.0).unwrap();
        assert_eq!(ctx.frame, n % 10);
        assert!((ctx.time - (n % 10) as f64 / 10.0).abs() < 1e-12);
        assert_eq!(c.elapsed(), n as f64 / 10.0);
    }
}

#[test]
fn throttle_waits_for_a_full_interval() {
    let mut c = AnimationClock::new(timing(
        Settings::new()
            .with_duration(1.0)
            .with_fps(10)
            .with_playback_rate(PlaybackRate::Throttle),
    ));
    c.start();
    c.advance(0.0).unwrap();
    assert_eq!(c.advance(0.04), None);
    assert_eq!(c.advance(0.04), None);
    let ctx = c.advance(0.04).unwrap();
    assert!((ctx.delta_time - 0.12).abs() < 1e-12);
    assert_eq!(ctx.frame, 1);
}

#[test]
fn transport_controls() {
    let mut c = looped(2.0, 10);
    c.toggle();
    assert_eq!(c.state(), ClockState::Running);
    c.advance(0.0);
    c.advance(0.35);
    c.toggle();
    assert_eq!(c.state(), ClockState::Paused);
    assert_eq!(c.advance(1.0), None);
    assert_eq!(c.current().frame, 3);
    c.toggle();
    assert_eq!(c.advance(0.1).unwrap().frame, 4);

    c.seek_frame(25);
    let ctx = c.advance(1.0).unwrap();
    assert_eq!((ctx.frame, ctx.delta_time), (5, 0.0));
    assert_eq!(ctx.time, 0.5);

    c.restart();
    let ctx = c.advance(1.0).unwrap();
    assert_eq!((ctx.frame, ctx.time), (0, 0.0));

    c.stop();
    assert_eq!(c.state(), ClockState::Stopped);
    c.start();
    c.resume();
    c.restart();
    assert_eq!(c.state(), ClockState::Stopped);
    assert_eq!(c.advance(0.1), None);
}

#[test]
fn export_path_is_frame_exact_and_restores_position() {
    let mut c = looped(2.0, 10);
    c.start();
    c.advance(0.0);
    c.advance(0.73);
    let before = c.current();

    assert_eq!(c.begin_export(None).unwrap(), 20);
    assert_eq!(c.state(), ClockState::Exporting);
    assert_eq!(c.advance(0.1), None, "interactive ticks are detached");
    let mut seen = Vec::new();
    while let Some(ctx) = c.step_export() {
        assert!(ctx.exporting);
        assert_eq!(ctx.time, ctx.frame as f64 / 10.0);
        assert_eq!(ctx.playhead, ctx.frame as f64 / 20.0);
        assert_eq!(c.current(), ctx);
        seen.push(ctx.frame);
    }
    assert_eq!(seen, (0..20).collect::<Vec<_>>());

    c.end_export();
    assert_eq!(c.state(), ClockState::Running);
    assert_eq!(c.current(), before);
}

#[test]
fn export_needs_a_frame_count() {
    let mut c = AnimationClock::new(Timing::still());
    assert!(matches!(
        c.begin_export(None),
        Err(ExportError::IndeterminateDuration)
    ));
    assert_eq!(c.begin_export(Some(3)).unwrap(), 3);
    let ctx = c.step_export().unwrap();
    assert_eq!(ctx.total_frames, Some(3));
    assert_eq!(ctx.duration, Some(3.0 / 24.0));
    assert!(matches!(
        c.begin_export(Some(2)),
        Err(ExportError::InvalidRequest(_))
    ));
    c.end_export();
    assert_eq!(c.state(), ClockState::Idle);
    assert!(matches!(
        c.begin_export(Some(0)),
        Err(ExportError::InvalidRequest(_))
    ));
}

#[test]
fn stop_mid_export_prevents_further_frames() {
    let mut c = looped(1.0, 10);
    c.begin_export(None).unwrap();
    c.step_export().unwrap();
    c.stop();
    assert_eq!(c.step_export(), None);
    c.end_export();
    assert_eq!(c.state(), ClockState::Stopped);
}

#[test]
fn export_and_wall_clock_paths_agree() {
    for (d, fps) in [(2.0, 10), (1.0, 24), (0.75, 60), (3.0, 30)] {
        let mut exported = looped(d, fps);
        let total = exported.begin_export(None).unwrap();
        let export_times: Vec<(u64, f64)> = std::iter::from_fn(|| exported.step_export())
            .map(|c| (c.frame, c.time))
            .collect();

        let mut live = looped(d, fps);
        live.start();
        let mut live_times = vec![live.advance(0.0).map(|c| (c.frame, c.time)).unwrap()];
        for _ in 1..total * 3 {
            let c = live.advance(1.0 / f64::from(fps)).unwrap();
            live_times.push((c.frame, c.time));
        }

        assert_eq!(export_times.len() as u64, total);
        for ((fa, ta), (fb, tb)) in export_times.iter().cycle().zip(&live_times) {
            assert_eq!(fa, fb);
            assert!((ta - tb).abs() < 1e-9, "{ta} vs {tb}");
        }
    }
}

use super::*;
use crate::render::raster::RasterAdapter;
use crate::settings::model::Settings;
use crate::sketch::renderer::Renderer;

#[test]
fn manual_scheduler_clones_share_state() {
    let host = ManualScheduler::new();
    let mut handed_out = host.clone();
    handed_out.schedule();
    assert!(host.is_armed());
    handed_out.cancel();
    assert!(!host.is_armed());
    assert_eq!((host.scheduled(), host.cancelled()), (1, 1));
}

#[test]
fn drive_pumps_until_disarmed() {
    let settings = Settings::new()
        .with_dimensions(4.0, 4.0)
        .with_duration(1.0)
        .with_fps(5)
        .with_loop(false);
    let mut ctl = SketchController::initialize(settings, RasterAdapter::new(), |_| {
        Ok(Renderer::function(|_| Ok(())))
    })
    .unwrap();

    let outcomes = drive(&mut ctl, 0.2, 100).unwrap();
    let frames: Vec<u64> = outcomes
        .iter()
        .filter_map(|o| match o {
            TickOutcome::Rendered(ctx) => Some(ctx.frame),
            _ => None,
        })
        .collect();
    assert_eq!(frames, vec![0, 1, 2, 3, 4, 4]);
    assert!(!ctl.is_tick_armed());
}

#[test]
fn drive_respects_the_tick_cap() {
    let settings = Settings::new()
        .with_dimensions(4.0, 4.0)
        .with_duration(1.0);
    let mut ctl = SketchController::initialize(settings, RasterAdapter::new(), |_| {
        Ok(Renderer::function(|_| Ok(())))
    })
    .unwrap();
    assert_eq!(drive(&mut ctl, 0.01, 7).unwrap().len(), 7);
    assert!(ctl.is_tick_armed());
}

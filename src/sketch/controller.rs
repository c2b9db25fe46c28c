use crate::animation::clock::{AnimationClock, ClockState, FrameContext, Timing};
use crate::foundation::error::{EaselError, EaselResult, ExportError, RuntimeError};
use crate::foundation::math::is_positive_finite;
use crate::render::adapter::{FrameRGBA, RenderAdapter, SurfaceRequest};
use crate::settings::model::Settings;
use crate::settings::resolve::{ResolvedGeometry, resolve_geometry};
use crate::sketch::preload::{LoadGate, Preload};
use crate::sketch::props::FrameProps;
use crate::sketch::renderer::{Lifecycle, Renderer, SetupFn};
use crate::sketch::scheduler::{ManualScheduler, TickScheduler};
use std::task::Poll;

/// Result of one [`SketchController::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// The sketch drew this frame.
    Rendered(FrameContext),
    /// Preload has not finished; nothing was drawn.
    Waiting,
    /// Nothing to draw (static frame already shown, or paused).
    Idle,
    /// The controller is stopped.
    Stopped,
}

/// Configures a [`SketchController`] before it is initialized.
pub struct ControllerBuilder<A: RenderAdapter> {
    settings: Settings,
    adapter: A,
    scheduler: Option<Box<dyn TickScheduler>>,
    preload: Option<Box<dyn Preload>>,
}

impl<A: RenderAdapter> ControllerBuilder<A> {
    /// Use `scheduler` as the tick source (default: a private [`ManualScheduler`]).
    pub fn scheduler(mut self, scheduler: impl TickScheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    /// Hold setup and the first frame until `preload` is ready.
    pub fn preload(mut self, preload: impl Preload + 'static) -> Self {
        self.preload = Some(Box::new(preload));
        self
    }

    /// Resolve settings, create the surface, start the clock, and run setup unless a preload
    /// is pending.
    ///
    /// Settings are fully validated before the adapter is asked for a surface, so a
    /// configuration error never leaves a surface behind.
    #[tracing::instrument(name = "initialize", skip_all)]
    pub fn build<F>(self, sketch: F) -> EaselResult<SketchController<A>>
    where
        F: FnOnce(&mut FrameProps<'_, A::Surface>) -> anyhow::Result<Renderer<A::Surface>>
            + 'static,
    {
        let Self {
            settings,
            mut adapter,
            scheduler,
            preload,
        } = self;

        let geometry = resolve_geometry(&settings, &adapter.display_hints())?;
        let timing = Timing::from_settings(&settings)?;
        settings.encoding_quality()?;

        let surface = adapter
            .create_surface(&SurfaceRequest::new(&settings, &geometry))
            .map_err(|source| RuntimeError::AdapterFailed {
                stage: "create surface",
                source,
            })?;
        tracing::debug!(
            width = geometry.pixel_width,
            height = geometry.pixel_height,
            context = %settings.context_kind(),
            "surface created"
        );

        let setup: SetupFn<A::Surface> = Box::new(sketch);
        let mut controller = SketchController {
            settings,
            adapter,
            geometry,
            export_geometry: None,
            surface,
            clock: AnimationClock::new(timing),
            renderer: None,
            setup: Some(setup),
            gate: LoadGate::new(preload),
            scheduler: scheduler.unwrap_or_else(|| Box::new(ManualScheduler::new())),
            armed: false,
            redraw_pending: false,
            unloaded: false,
        };
        controller.clock.start();
        if controller.gate.is_open() {
            controller.run_setup()?;
        }
        controller.arm();
        Ok(controller)
    }
}

/// Owns one run of a sketch: geometry, clock, surface, and the sketch's renderer.
///
/// Single-threaded and cooperative: the host calls [`SketchController::tick`] whenever the
/// scheduler it supplied fires. Independent controllers share nothing.
pub struct SketchController<A: RenderAdapter> {
    settings: Settings,
    adapter: A,
    geometry: ResolvedGeometry,
    export_geometry: Option<ResolvedGeometry>,
    surface: A::Surface,
    clock: AnimationClock,
    renderer: Option<Renderer<A::Surface>>,
    setup: Option<SetupFn<A::Surface>>,
    gate: LoadGate,
    scheduler: Box<dyn TickScheduler>,
    armed: bool,
    redraw_pending: bool,
    unloaded: bool,
}

impl<A: RenderAdapter> SketchController<A> {
    /// Start configuring a controller.
    pub fn builder(settings: Settings, adapter: A) -> ControllerBuilder<A> {
        ControllerBuilder {
            settings,
            adapter,
            scheduler: None,
            preload: None,
        }
    }

    /// Initialize with defaults: no preload and a private manual scheduler.
    pub fn initialize<F>(settings: Settings, adapter: A, sketch: F) -> EaselResult<Self>
    where
        F: FnOnce(&mut FrameProps<'_, A::Surface>) -> anyhow::Result<Renderer<A::Surface>>
            + 'static,
    {
        Self::builder(settings, adapter).build(sketch)
    }

    /// Settings currently in effect.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Interactive geometry.
    pub fn geometry(&self) -> &ResolvedGeometry {
        &self.geometry
    }

    /// The animation clock.
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Clock state.
    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    /// The drawing surface.
    pub fn surface(&self) -> &A::Surface {
        &self.surface
    }

    /// The render adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// `true` once preload finished and setup ran.
    pub fn is_ready(&self) -> bool {
        self.gate.is_open() && self.renderer.is_some()
    }

    /// `true` while the controller wants another tick.
    pub fn is_tick_armed(&self) -> bool {
        self.armed
    }

    /// Props for the current clock position, without ticking.
    pub fn frame_props(&mut self) -> FrameProps<'_, A::Surface> {
        let ctx = self.clock.current();
        FrameProps::new(&mut self.surface, &self.geometry, &ctx)
    }

    /// Advance the clock by `elapsed` seconds and draw the resulting frame.
    ///
    /// Runs `update` then `render`. A failing sketch stops the controller and the error is
    /// returned; no further frame is drawn after it.
    pub fn tick(&mut self, elapsed: f64) -> EaselResult<TickOutcome> {
        if self.clock.state() == ClockState::Stopped {
            self.disarm();
            return Ok(TickOutcome::Stopped);
        }
        match self.gate.poll() {
            Poll::Pending => return Ok(TickOutcome::Waiting),
            Poll::Ready(Err(err)) => {
                tracing::warn!(error = %err, "preload failed; stopping");
                self.shutdown();
                return Err(err.into());
            }
            Poll::Ready(Ok(())) => {}
        }
        self.run_setup()?;

        let ctx = match self.clock.advance(elapsed) {
            Some(ctx) => ctx,
            None if self.redraw_pending => self.clock.current(),
            None => {
                self.disarm();
                return Ok(TickOutcome::Idle);
            }
        };
        self.redraw_pending = false;
        tracing::trace!(frame = ctx.frame, time = ctx.time, "tick");
        self.draw(ctx)?;

        if self.clock.state() == ClockState::Running {
            self.arm();
        } else {
            self.disarm();
        }
        Ok(TickOutcome::Rendered(ctx))
    }

    /// Re-resolve geometry from `settings` and resize (or recreate, when the context kind
    /// changed) the surface. Clock phase and timing are left untouched.
    #[tracing::instrument(skip_all)]
    pub fn resize(&mut self, settings: Settings) -> EaselResult<()> {
        if self.clock.state() == ClockState::Stopped {
            return Err(RuntimeError::Stopped.into());
        }
        let geometry = resolve_geometry(&settings, &self.adapter.display_hints())?;
        let request = SurfaceRequest::new(&settings, &geometry);
        if settings.context_kind() != self.settings.context_kind() {
            match self.adapter.create_surface(&request) {
                Ok(surface) => self.surface = surface,
                Err(source) => return Err(self.adapter_failed("recreate surface", source)),
            }
        } else if let Err(source) = self.adapter.resize_surface(&mut self.surface, &request) {
            return Err(self.adapter_failed("resize surface", source));
        }
        tracing::debug!(
            width = geometry.pixel_width,
            height = geometry.pixel_height,
            "surface resized"
        );
        self.settings = settings;
        self.geometry = geometry;

        if let Some(renderer) = self.renderer.as_mut() {
            let ctx = self.clock.current();
            let mut props = FrameProps::new(&mut self.surface, &self.geometry, &ctx);
            if let Err(source) = renderer.resize(&mut props) {
                return Err(self.fail(ctx.frame, "resize", source));
            }
        }
        self.redraw_pending = true;
        self.arm();
        Ok(())
    }

    /// Start or resume playback.
    pub fn play(&mut self) {
        match self.clock.state() {
            ClockState::Idle if !self.clock.timing().is_static() => self.clock.start(),
            ClockState::Paused => self.clock.resume(),
            _ => {}
        }
        if self.clock.state() == ClockState::Running {
            self.arm();
        }
    }

    /// Hold the current frame.
    pub fn pause(&mut self) {
        self.clock.pause();
        if self.clock.state() == ClockState::Paused {
            self.disarm();
        }
    }

    /// Flip between playing and paused.
    pub fn toggle_play(&mut self) {
        if self.clock.state() == ClockState::Running {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Reset time to 0 and play from the first frame.
    pub fn restart(&mut self) {
        self.clock.restart();
        if self.clock.state() == ClockState::Running {
            self.arm();
        }
    }

    /// Jump to `frame`; the next tick draws it.
    pub fn seek_frame(&mut self, frame: u64) {
        self.clock.seek_frame(frame);
        if self.clock.state() == ClockState::Running {
            self.arm();
        }
    }

    /// Stop for good: no further ticks, the sketch's `unload` hook runs once.
    pub fn stop(&mut self) {
        self.shutdown();
    }

    /// Put the clock into export mode for `frame_count` frames (default: the loop length).
    pub(crate) fn begin_export_run(&mut self, frame_count: Option<u64>) -> Result<u64, ExportError> {
        self.clock.begin_export(frame_count)
    }

    /// Advance the export run to its next frame, if any remain.
    pub(crate) fn next_export_frame(&mut self) -> Option<FrameContext> {
        self.clock.step_export()
    }

    /// Detach the interactive tick source and size the surface for export.
    pub(crate) fn begin_export_session(
        &mut self,
        pixel_ratio: Option<f64>,
    ) -> EaselResult<()> {
        match self.clock.state() {
            ClockState::Stopped => return Err(RuntimeError::Stopped.into()),
            ClockState::Exporting => {
                return Err(ExportError::InvalidRequest(
                    "an export is already running".to_owned(),
                )
                .into());
            }
            _ => {}
        }
        if !self.is_ready() {
            return Err(RuntimeError::NotReady("preload has not finished").into());
        }
        if let Some(r) = pixel_ratio.filter(|r| !is_positive_finite(*r)) {
            return Err(ExportError::InvalidRequest(format!(
                "pixel ratio must be a finite number > 0, got {r}"
            ))
            .into());
        }

        self.disarm();
        let geometry = self.geometry.for_export(pixel_ratio);
        if geometry.canvas() != self.geometry.canvas() {
            let request = SurfaceRequest::new(&self.settings, &geometry);
            if let Err(source) = self.adapter.resize_surface(&mut self.surface, &request) {
                return Err(self.adapter_failed("resize surface for export", source));
            }
        }
        self.export_geometry = Some(geometry);
        Ok(())
    }

    /// Geometry frames are captured with while an export session is open.
    pub(crate) fn capture_geometry(&self) -> &ResolvedGeometry {
        self.export_geometry.as_ref().unwrap_or(&self.geometry)
    }

    /// `pre_export`, draw, snapshot, `post_export`, in that order.
    pub(crate) fn capture_frame(&mut self, ctx: FrameContext) -> EaselResult<FrameRGBA> {
        self.run_lifecycle(Lifecycle::PreExport, ctx.frame)?;
        self.draw(ctx)?;
        let frame = match self.adapter.snapshot(&self.surface) {
            Ok(frame) => frame,
            Err(source) => return Err(self.adapter_failed("snapshot surface", source)),
        };
        self.run_lifecycle(Lifecycle::PostExport, ctx.frame)?;
        Ok(frame)
    }

    pub(crate) fn run_lifecycle(&mut self, hook: Lifecycle, frame: u64) -> EaselResult<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };
        match renderer.lifecycle(hook) {
            Ok(()) => Ok(()),
            Err(source) => Err(self.fail(frame, hook.phase(), source)),
        }
    }

    /// Restore interactive geometry and clock position, then re-arm so the next tick redraws
    /// the interactive frame.
    pub(crate) fn end_export_session(&mut self) -> EaselResult<()> {
        self.clock.end_export();
        self.export_geometry = None;
        if self.clock.state() == ClockState::Stopped {
            return Ok(());
        }
        let request = SurfaceRequest::new(&self.settings, &self.geometry);
        if let Err(source) = self.adapter.resize_surface(&mut self.surface, &request) {
            return Err(self.adapter_failed("restore surface after export", source));
        }
        self.redraw_pending = true;
        self.arm();
        Ok(())
    }

    fn run_setup(&mut self) -> EaselResult<()> {
        let Some(setup) = self.setup.take() else {
            return Ok(());
        };
        let ctx = self.clock.current();
        let mut props = FrameProps::new(&mut self.surface, &self.geometry, &ctx);
        match setup(&mut props) {
            Ok(renderer) => {
                tracing::debug!(?renderer, "sketch set up");
                self.renderer = Some(renderer);
                Ok(())
            }
            Err(source) => Err(self.fail(ctx.frame, "setup", source)),
        }
    }

    fn draw(&mut self, ctx: FrameContext) -> EaselResult<()> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Err(RuntimeError::NotReady("sketch setup has not run").into());
        };
        let geometry = self.export_geometry.as_ref().unwrap_or(&self.geometry);
        let mut props = FrameProps::new(&mut self.surface, geometry, &ctx);
        let res = match renderer.update(&mut props) {
            Ok(()) => renderer.render(&mut props).map_err(|e| ("render", e)),
            Err(e) => Err(("update", e)),
        };
        match res {
            Ok(()) => Ok(()),
            Err((phase, source)) => Err(self.fail(ctx.frame, phase, source)),
        }
    }

    fn fail(&mut self, frame: u64, phase: &'static str, source: anyhow::Error) -> EaselError {
        let msg = format!("{source:#}");
        tracing::warn!(frame, phase, error = %msg, "sketch threw; stopping");
        self.shutdown();
        RuntimeError::SketchThrew {
            frame,
            phase,
            source,
        }
        .into()
    }

    fn adapter_failed(&mut self, stage: &'static str, source: anyhow::Error) -> EaselError {
        let msg = format!("{source:#}");
        tracing::warn!(stage, error = %msg, "render adapter failed; stopping");
        self.shutdown();
        RuntimeError::AdapterFailed { stage, source }.into()
    }

    fn arm(&mut self) {
        self.armed = true;
        self.scheduler.schedule();
    }

    fn disarm(&mut self) {
        if self.armed {
            self.armed = false;
            self.scheduler.cancel();
        }
    }

    fn shutdown(&mut self) {
        self.clock.stop();
        self.disarm();
        self.unload();
    }

    fn unload(&mut self) {
        if self.unloaded {
            return;
        }
        self.unloaded = true;
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        if let Err(err) = renderer.lifecycle(Lifecycle::Unload) {
            let msg = format!("{err:#}");
            tracing::warn!(error = %msg, "sketch unload failed");
        }
    }
}

impl<A: RenderAdapter> Drop for SketchController<A> {
    fn drop(&mut self) {
        self.disarm();
        self.unload();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sketch/controller.rs"]
mod tests;

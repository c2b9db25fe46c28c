use crate::sketch::props::FrameProps;

/// Lifecycle hooks of a capability-object sketch. Only `render` is required.
pub trait SketchHooks<S> {
    /// Draw one frame.
    fn render(&mut self, props: &mut FrameProps<'_, S>) -> anyhow::Result<()>;

    /// Called before `render` on every frame.
    fn update(&mut self, _props: &mut FrameProps<'_, S>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called after the surface was resized or recreated.
    fn resize(&mut self, _props: &mut FrameProps<'_, S>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called right before each exported frame is drawn.
    fn pre_export(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called right after each exported frame is captured.
    fn post_export(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once before the first frame of a sequence export.
    fn begin_record(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once after the last frame of a sequence export (completed or not).
    fn end_record(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once when the controller stops or is dropped.
    fn unload(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Per-frame drawing function.
pub type RenderFn<S> = Box<dyn FnMut(&mut FrameProps<'_, S>) -> anyhow::Result<()>>;

/// Sketch entry point: runs once (after preload) and returns the renderer.
pub type SetupFn<S> = Box<dyn FnOnce(&mut FrameProps<'_, S>) -> anyhow::Result<Renderer<S>>>;

/// What a sketch's setup returned, decided once.
pub enum Renderer<S> {
    /// A plain per-frame function; every other hook is a no-op.
    Function(RenderFn<S>),
    /// A capability object.
    Hooks(Box<dyn SketchHooks<S>>),
}

impl<S> Renderer<S> {
    /// Wrap a per-frame function.
    pub fn function(f: impl FnMut(&mut FrameProps<'_, S>) -> anyhow::Result<()> + 'static) -> Self {
        Self::Function(Box::new(f))
    }

    /// Wrap a capability object.
    pub fn hooks(hooks: impl SketchHooks<S> + 'static) -> Self {
        Self::Hooks(Box::new(hooks))
    }

    pub(crate) fn render(&mut self, props: &mut FrameProps<'_, S>) -> anyhow::Result<()> {
        match self {
            Self::Function(f) => f(props),
            Self::Hooks(h) => h.render(props),
        }
    }

    pub(crate) fn update(&mut self, props: &mut FrameProps<'_, S>) -> anyhow::Result<()> {
        match self {
            Self::Function(_) => Ok(()),
            Self::Hooks(h) => h.update(props),
        }
    }

    pub(crate) fn resize(&mut self, props: &mut FrameProps<'_, S>) -> anyhow::Result<()> {
        match self {
            Self::Function(_) => Ok(()),
            Self::Hooks(h) => h.resize(props),
        }
    }

    pub(crate) fn lifecycle(&mut self, hook: Lifecycle) -> anyhow::Result<()> {
        let Self::Hooks(h) = self else {
            return Ok(());
        };
        match hook {
            Lifecycle::PreExport => h.pre_export(),
            Lifecycle::PostExport => h.post_export(),
            Lifecycle::BeginRecord => h.begin_record(),
            Lifecycle::EndRecord => h.end_record(),
            Lifecycle::Unload => h.unload(),
        }
    }
}

impl<S> std::fmt::Debug for Renderer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Renderer::Function"),
            Self::Hooks(_) => f.write_str("Renderer::Hooks"),
        }
    }
}

/// Props-free hooks, named by the phase reported on failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    PreExport,
    PostExport,
    BeginRecord,
    EndRecord,
    Unload,
}

impl Lifecycle {
    pub(crate) fn phase(self) -> &'static str {
        match self {
            Self::PreExport => "pre_export",
            Self::PostExport => "post_export",
            Self::BeginRecord => "begin_record",
            Self::EndRecord => "end_record",
            Self::Unload => "unload",
        }
    }
}

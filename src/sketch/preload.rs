use crate::foundation::error::ConfigError;
use std::sync::mpsc;
use std::task::Poll;

/// Asynchronous setup work that must finish before the first frame.
///
/// The controller polls it once per tick; it is never polled again after it returns `Ready`.
pub trait Preload {
    /// `Ready(Ok)` to open the gate, `Ready(Err)` to fail the run, `Pending` to keep waiting.
    fn poll_ready(&mut self) -> Poll<anyhow::Result<()>>;
}

/// Preload driven by a polling closure.
pub struct PollFn<F>(F);

/// Adapt a polling closure into a [`Preload`].
pub fn poll_fn<F>(f: F) -> PollFn<F>
where
    F: FnMut() -> Poll<anyhow::Result<()>>,
{
    PollFn(f)
}

impl<F> Preload for PollFn<F>
where
    F: FnMut() -> Poll<anyhow::Result<()>>,
{
    fn poll_ready(&mut self) -> Poll<anyhow::Result<()>> {
        (self.0)()
    }
}

/// Completion sent from a loader thread. A dropped sender counts as a failure.
impl Preload for mpsc::Receiver<anyhow::Result<()>> {
    fn poll_ready(&mut self) -> Poll<anyhow::Result<()>> {
        match self.try_recv() {
            Ok(res) => Poll::Ready(res),
            Err(mpsc::TryRecvError::Empty) => Poll::Pending,
            Err(mpsc::TryRecvError::Disconnected) => Poll::Ready(Err(anyhow::anyhow!(
                "preload channel closed before completion"
            ))),
        }
    }
}

/// The pending -> ready lifecycle gate in front of setup.
pub(crate) enum LoadGate {
    Pending(Box<dyn Preload>),
    Ready,
    Failed,
}

impl LoadGate {
    pub(crate) fn new(preload: Option<Box<dyn Preload>>) -> Self {
        match preload {
            Some(p) => Self::Pending(p),
            None => Self::Ready,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Poll a pending preload. Failure closes the gate for good; later polls report `Pending`
    /// forever since the run is already over.
    pub(crate) fn poll(&mut self) -> Poll<Result<(), ConfigError>> {
        let polled = match self {
            Self::Ready => return Poll::Ready(Ok(())),
            Self::Failed => return Poll::Pending,
            Self::Pending(preload) => preload.poll_ready(),
        };
        match polled {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(())) => {
                *self = Self::Ready;
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Err(source)) => {
                *self = Self::Failed;
                Poll::Ready(Err(ConfigError::PreloadFailed { source }))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sketch/preload.rs"]
mod tests;

use crate::animation::clock::{ClockState, FrameContext};
use crate::export::encode::{Encoding, encode_frame};
use crate::export::request::{ExportKind, ExportRequest};
use crate::foundation::error::{EaselResult, ExportError};
use crate::foundation::math::{decimal_width, is_positive_finite};
use crate::render::adapter::RenderAdapter;
use crate::settings::model::Settings;
use crate::sketch::controller::SketchController;
use crate::sketch::renderer::Lifecycle;
use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag for sequence exports. Clones share the flag and may be
/// triggered from any thread; it is only read between frames.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the export to stop before its next frame.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`CancelToken::cancel`] was called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One encoded frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedFrame {
    /// Frame index (0 for single exports).
    pub index: u64,
    /// Encoded payload.
    pub data: Vec<u8>,
    /// File name whose lexical order matches frame order.
    pub suggested_name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoding of `data`.
    pub encoding: Encoding,
    /// Effective density of the captured pixels (`pixelsPerInch * pixel ratio`).
    pub pixels_per_inch: f64,
}

/// Frames of one export, in index order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportResult {
    /// Captured frames.
    pub frames: Vec<ExportedFrame>,
}

impl ExportResult {
    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Indices of the captured frames.
    pub fn indices(&self) -> Vec<u64> {
        self.frames.iter().map(|f| f.index).collect()
    }
}

/// How an export ended. Cancellation is a successful partial result, not an error.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportOutcome {
    /// Every requested frame was captured.
    Complete(ExportResult),
    /// Cancelled (or the controller stopped) between frames; the frames are valid.
    Cancelled(ExportResult),
}

impl ExportOutcome {
    /// `true` for [`ExportOutcome::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Frames captured, whatever the outcome.
    pub fn result(&self) -> &ExportResult {
        match self {
            Self::Complete(r) | Self::Cancelled(r) => r,
        }
    }

    /// Frames of a complete export; a cancellation becomes
    /// [`ExportError::CancelledMidSequence`].
    pub fn into_result(self) -> Result<ExportResult, ExportError> {
        match self {
            Self::Complete(r) => Ok(r),
            Self::Cancelled(r) => Err(ExportError::CancelledMidSequence { produced: r.len() }),
        }
    }
}

/// `[prefix][name or "sketch"][suffix][-index].[ext]`.
///
/// Sequence indices are zero-padded to the digit count of `total`, so lexical order is frame
/// order.
pub fn suggested_name(settings: &Settings, encoding: Encoding, index: Option<(u64, u64)>) -> String {
    let mut name = String::new();
    name.push_str(settings.prefix.as_deref().unwrap_or(""));
    name.push_str(settings.name.as_deref().unwrap_or("sketch"));
    name.push_str(settings.suffix.as_deref().unwrap_or(""));
    if let Some((index, total)) = index {
        let width = decimal_width(total.max(1));
        let _ = write!(name, "-{index:0width$}");
    }
    name.push('.');
    name.push_str(encoding.extension());
    name
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SequenceState {
    Running,
    Complete,
    Cancelled,
    Failed,
}

/// A running sequence export: a lazy, finite, non-restartable iterator of encoded frames in
/// increasing index order.
///
/// Every frame it yields is also kept, so [`SequenceExport::finish`] reports all produced frames
/// whether the caller streamed them, drained them, or cancelled part way.
///
/// Interactive ticks are detached for its whole lifetime (it holds the controller mutably).
/// Ending it in any way, including dropping it early, restores the controller's geometry, clock
/// position and tick source.
pub struct SequenceExport<'a, A: RenderAdapter> {
    controller: &'a mut SketchController<A>,
    token: CancelToken,
    encoding: Encoding,
    quality: f64,
    total_frames: u64,
    produced: Vec<ExportedFrame>,
    state: SequenceState,
    closed: bool,
}

impl<A: RenderAdapter> SequenceExport<'_, A> {
    /// Number of frames the run will produce if not cancelled.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Frames produced so far.
    pub fn produced(&self) -> usize {
        self.produced.len()
    }

    /// A handle that cancels this export.
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Stop before the next frame.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Stop the controller itself. The frame in flight (if any) has already completed; no
    /// further frame is produced.
    pub fn stop_controller(&mut self) {
        self.controller.stop();
    }

    /// Drain the remaining frames and end the export. The result holds every frame produced,
    /// including those already taken through the iterator.
    pub fn finish(mut self) -> EaselResult<ExportOutcome> {
        for frame in self.by_ref() {
            frame?;
        }
        let cancelled = self.state == SequenceState::Cancelled;
        self.close()?;
        let result = ExportResult {
            frames: std::mem::take(&mut self.produced),
        };
        Ok(if cancelled {
            ExportOutcome::Cancelled(result)
        } else {
            ExportOutcome::Complete(result)
        })
    }

    fn capture(&mut self, ctx: FrameContext) -> EaselResult<ExportedFrame> {
        let frame = self.controller.capture_frame(ctx)?;
        let data = encode_frame(&frame, self.encoding, self.quality, ctx.frame)?;
        let geometry = self.controller.capture_geometry();
        Ok(ExportedFrame {
            index: ctx.frame,
            data,
            suggested_name: suggested_name(
                self.controller.settings(),
                self.encoding,
                Some((ctx.frame, self.total_frames)),
            ),
            width: frame.width,
            height: frame.height,
            encoding: self.encoding,
            pixels_per_inch: geometry.pixels_per_inch * geometry.pixel_ratio,
        })
    }

    fn close(&mut self) -> EaselResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.state == SequenceState::Running {
            self.state = SequenceState::Cancelled;
        }

        let produced = self.produced.len();
        let last = produced.saturating_sub(1) as u64;
        let record = if self.controller.state() == ClockState::Stopped {
            Ok(())
        } else {
            self.controller.run_lifecycle(Lifecycle::EndRecord, last)
        };
        let restore = self.controller.end_export_session();
        match self.state {
            SequenceState::Cancelled => tracing::info!(
                produced,
                total = self.total_frames,
                "sequence export cancelled"
            ),
            SequenceState::Complete => tracing::info!(produced, "sequence export complete"),
            _ => tracing::info!(produced, "sequence export failed"),
        }
        record.and(restore)
    }
}

impl<A: RenderAdapter> Iterator for SequenceExport<'_, A> {
    type Item = EaselResult<ExportedFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != SequenceState::Running {
            return None;
        }
        if self.token.is_cancelled() {
            self.state = SequenceState::Cancelled;
            return None;
        }
        let Some(ctx) = self.controller.next_export_frame() else {
            self.state = if self.controller.state() == ClockState::Stopped {
                SequenceState::Cancelled
            } else {
                SequenceState::Complete
            };
            return None;
        };
        match self.capture(ctx) {
            Ok(frame) => {
                self.produced.push(frame.clone());
                Some(Ok(frame))
            }
            Err(err) => {
                self.state = SequenceState::Failed;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state != SequenceState::Running {
            return (0, Some(0));
        }
        let left = (self.total_frames as usize).saturating_sub(self.produced.len());
        (0, Some(left))
    }
}

impl<A: RenderAdapter> Drop for SequenceExport<'_, A> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(error = %err, "restoring controller after export failed");
        }
    }
}

impl<A: RenderAdapter> SketchController<A> {
    /// Run `request` to completion: a single capture, or a whole sequence drained with
    /// [`SequenceExport::finish`].
    pub fn export(&mut self, request: &ExportRequest) -> EaselResult<ExportOutcome> {
        match request.kind {
            ExportKind::Single => self.export_single(request).map(ExportOutcome::Complete),
            ExportKind::Sequence => self.export_sequence(request)?.finish(),
        }
    }

    /// Capture the current frame: `pre_export`, one draw with `exporting = true`, snapshot,
    /// `post_export`.
    #[tracing::instrument(skip_all)]
    pub fn export_single(&mut self, request: &ExportRequest) -> EaselResult<ExportResult> {
        if request.kind != ExportKind::Single {
            return Err(ExportError::InvalidRequest(
                "export_single needs a single-frame request".to_owned(),
            )
            .into());
        }
        let (encoding, quality) = self.output_format(request)?;
        self.begin_export_session(request.pixel_ratio)?;
        tracing::info!(%encoding, "single export started");

        let ctx = FrameContext {
            exporting: true,
            ..self.clock().current()
        };
        let geometry = self.capture_geometry().clone();
        let captured = self.capture_frame(ctx);
        let restored = self.end_export_session();
        let frame = captured?;
        restored?;

        let data = encode_frame(&frame, encoding, quality, 0)?;
        tracing::info!(bytes = data.len(), "single export complete");
        Ok(ExportResult {
            frames: vec![ExportedFrame {
                index: 0,
                data,
                suggested_name: suggested_name(self.settings(), encoding, None),
                width: frame.width,
                height: frame.height,
                encoding,
                pixels_per_inch: geometry.pixels_per_inch * geometry.pixel_ratio,
            }],
        })
    }

    /// Start a sequence export with a fresh [`CancelToken`].
    pub fn export_sequence(&mut self, request: &ExportRequest) -> EaselResult<SequenceExport<'_, A>> {
        self.export_sequence_with(request, CancelToken::new())
    }

    /// Start a sequence export observing `token`.
    ///
    /// Fails with [`ExportError::IndeterminateDuration`] when neither the clock nor the request
    /// gives a frame count.
    #[tracing::instrument(skip_all)]
    pub fn export_sequence_with(
        &mut self,
        request: &ExportRequest,
        token: CancelToken,
    ) -> EaselResult<SequenceExport<'_, A>> {
        if request.kind != ExportKind::Sequence {
            return Err(ExportError::InvalidRequest(
                "export_sequence needs a sequence request".to_owned(),
            )
            .into());
        }
        let (encoding, quality) = self.output_format(request)?;
        self.begin_export_session(request.pixel_ratio)?;

        let total_frames = match self.begin_export_run(request.frame_count) {
            Ok(n) => n,
            Err(err) => {
                if let Err(restore) = self.end_export_session() {
                    tracing::warn!(error = %restore, "restoring controller after export failed");
                }
                return Err(err.into());
            }
        };
        if let Err(err) = self.run_lifecycle(Lifecycle::BeginRecord, 0) {
            if let Err(restore) = self.end_export_session() {
                tracing::warn!(error = %restore, "restoring controller after export failed");
            }
            return Err(err);
        }
        tracing::info!(total_frames, %encoding, "sequence export started");

        Ok(SequenceExport {
            controller: self,
            token,
            encoding,
            quality,
            total_frames,
            produced: Vec::new(),
            state: SequenceState::Running,
            closed: false,
        })
    }

    fn output_format(&self, request: &ExportRequest) -> EaselResult<(Encoding, f64)> {
        let encoding = request
            .encoding
            .or(self.settings().encoding)
            .unwrap_or_default();
        let quality = match request.quality {
            Some(q) if is_positive_finite(q) && q <= 1.0 => q,
            Some(q) => {
                return Err(ExportError::InvalidRequest(format!(
                    "quality must be in (0, 1], got {q}"
                ))
                .into());
            }
            None => self.settings().encoding_quality()?,
        };
        Ok((encoding, quality))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;

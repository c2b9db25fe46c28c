use crate::foundation::core::Fps;
use crate::foundation::error::{ConfigError, ExportError};
use crate::foundation::math::FRAME_EPSILON;
use crate::settings::model::{PlaybackRate, Settings, positive_or};

/// Timing policy derived from [`Settings`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Frame rate.
    pub fps: Fps,
    /// Loop length in seconds, when known.
    pub duration: Option<f64>,
    /// Loop length in frames (`ceil(duration * fps)`), when known.
    pub total_frames: Option<u64>,
    /// Whether the clock runs at all.
    pub animate: bool,
    /// Wrap at the end of the loop instead of holding the last frame.
    pub looping: bool,
    /// Interactive playback policy.
    pub playback: PlaybackRate,
}

impl Timing {
    /// A single static frame at the default frame rate.
    pub fn still() -> Self {
        Self {
            fps: Fps::DEFAULT,
            duration: None,
            total_frames: None,
            animate: false,
            looping: true,
            playback: PlaybackRate::Realtime,
        }
    }

    /// An animated loop of `duration` seconds at `fps`.
    pub fn looped(duration: f64, fps: u32) -> Result<Self, ConfigError> {
        Self::from_settings(
            &Settings::new()
                .with_duration(duration)
                .with_fps(fps)
                .with_animate(true),
        )
    }

    /// Validate and derive timing from settings.
    ///
    /// `duration` and `totalFrames` may both be given as long as they agree within one frame.
    /// `animate` defaults to `true` exactly when one of them is present.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let fps = Fps::new(settings.fps.unwrap_or(Fps::DEFAULT.get()))?;
        let duration = match settings.duration {
            Some(_) => Some(positive_or("duration", settings.duration, 0.0)?),
            None => None,
        };
        if settings.total_frames == Some(0) {
            return Err(ConfigError::invalid_setting(
                "totalFrames",
                "must be > 0, got 0",
            ));
        }

        let (duration, total_frames) = match (duration, settings.total_frames) {
            (None, None) => (None, None),
            (Some(d), None) => (Some(d), Some(fps.secs_to_frames_ceil(d))),
            (None, Some(n)) => (Some(fps.frames_to_secs(n)), Some(n)),
            (Some(d), Some(n)) => {
                let derived = fps.secs_to_frames_ceil(d);
                if derived.abs_diff(n) > 1 {
                    return Err(ConfigError::invalid_setting(
                        "totalFrames",
                        format!(
                            "{n} frames disagrees with duration {d}s at {} fps ({derived} frames)",
                            fps.get()
                        ),
                    ));
                }
                (Some(d), Some(n))
            }
        };

        Ok(Self {
            fps,
            duration,
            total_frames,
            animate: settings.animate.unwrap_or(total_frames.is_some()),
            looping: settings.looping.unwrap_or(true),
            playback: settings.playback_rate.unwrap_or_default(),
        })
    }

    /// `true` when the clock produces exactly one frame.
    pub fn is_static(&self) -> bool {
        !self.animate || self.total_frames.is_none()
    }
}

/// Lifecycle of an [`AnimationClock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    /// Not started, or a static clock that already emitted its frame.
    Idle,
    /// Producing frames from `advance`.
    Running,
    /// Holding the current frame.
    Paused,
    /// Driven frame-by-frame by an export.
    Exporting,
    /// Terminal; nothing more is produced.
    Stopped,
}

/// Timing snapshot handed to the drawing routine.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameContext {
    /// Seconds into the current loop: wraps at `duration` when looping, so the same frame index
    /// carries the same time on every loop and on the export path.
    pub time: f64,
    /// Frame index, wrapped into `0..total_frames` when the loop length is known.
    pub frame: u64,
    /// Loop length in frames, `None` for static or unbounded runs.
    pub total_frames: Option<u64>,
    /// `frame / total_frames`, or 0 when the length is unknown.
    pub playhead: f64,
    /// Seconds since the previous emitted frame (0 for the first).
    pub delta_time: f64,
    /// `true` while an export is capturing this frame.
    pub exporting: bool,
    /// Loop length in seconds, when known.
    pub duration: Option<f64>,
    /// Frame rate.
    pub fps: u32,
}

#[derive(Clone, Copy, Debug)]
struct Position {
    state: ClockState,
    time: f64,
    frame: u64,
    delta_time: f64,
    anchor_time: f64,
    ticks: u64,
    pending: f64,
    first_pending: bool,
}

#[derive(Clone, Copy, Debug)]
struct ExportRun {
    saved: Position,
    total_frames: u64,
    duration: f64,
    next: u64,
    current: Option<FrameContext>,
}

/// Deterministic animation clock.
///
/// Interactive ticks feed elapsed wall time to [`AnimationClock::advance`]; exports step whole
/// frames with [`AnimationClock::step_export`], where `time = frame / fps` exactly. Both paths
/// derive the frame index the same way, so they agree for the same index.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    timing: Timing,
    pos: Position,
    export: Option<ExportRun>,
}

impl AnimationClock {
    /// A new, idle clock at time 0.
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            pos: Position {
                state: ClockState::Idle,
                time: 0.0,
                frame: 0,
                delta_time: 0.0,
                anchor_time: 0.0,
                ticks: 0,
                pending: 0.0,
                first_pending: false,
            },
            export: None,
        }
    }

    /// Timing policy.
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClockState {
        self.pos.state
    }

    /// Loop length in frames as seen by interactive frames (`None` for static clocks).
    pub fn total_frames(&self) -> Option<u64> {
        if self.timing.is_static() {
            None
        } else {
            self.timing.total_frames
        }
    }

    /// `true` once a non-looping clock has reached its last frame.
    pub fn is_finished(&self) -> bool {
        match (self.total_frames(), self.timing.duration) {
            (Some(_), Some(d)) => !self.timing.looping && self.pos.time >= d - FRAME_EPSILON,
            _ => false,
        }
    }

    /// Leave `Idle` and arm the first frame. No-op in any other state.
    pub fn start(&mut self) {
        if self.pos.state == ClockState::Idle {
            self.pos.state = ClockState::Running;
            self.pos.first_pending = true;
        }
    }

    /// Hold the current frame.
    pub fn pause(&mut self) {
        if self.pos.state == ClockState::Running {
            self.pos.state = ClockState::Paused;
        }
    }

    /// Continue after [`AnimationClock::pause`]. A finished non-looping clock restarts instead.
    pub fn resume(&mut self) {
        if self.pos.state != ClockState::Paused {
            return;
        }
        if self.is_finished() {
            self.restart();
            return;
        }
        self.pos.state = ClockState::Running;
        self.pos.pending = 0.0;
    }

    /// Flip between running and paused; starts an idle animated clock.
    pub fn toggle(&mut self) {
        match self.pos.state {
            ClockState::Running => self.pause(),
            ClockState::Paused => self.resume(),
            ClockState::Idle if !self.timing.is_static() => self.start(),
            _ => {}
        }
    }

    /// Enter the terminal state. Valid from every state, including mid-export.
    pub fn stop(&mut self) {
        self.pos.state = ClockState::Stopped;
    }

    /// Reset time to 0 and run from the first frame. The only operation besides
    /// [`AnimationClock::seek_frame`] that moves time backwards.
    pub fn restart(&mut self) {
        if matches!(self.pos.state, ClockState::Stopped | ClockState::Exporting) {
            return;
        }
        self.jump_to(0.0, 0);
        self.pos.state = ClockState::Running;
    }

    /// Jump to frame `frame` (wrapped when looping, clamped otherwise). The next
    /// [`AnimationClock::advance`] emits it with `delta_time = 0`.
    pub fn seek_frame(&mut self, frame: u64) {
        if matches!(self.pos.state, ClockState::Stopped | ClockState::Exporting) {
            return;
        }
        let Some(total) = self.total_frames() else {
            return;
        };
        let frame = if self.timing.looping {
            frame % total
        } else {
            frame.min(total - 1)
        };
        self.jump_to(self.timing.fps.frames_to_secs(frame), frame);
        if self.pos.state == ClockState::Idle {
            self.pos.state = ClockState::Running;
        }
    }

    fn jump_to(&mut self, time: f64, frame: u64) {
        self.pos.time = time;
        self.pos.frame = frame;
        self.pos.delta_time = 0.0;
        self.pos.anchor_time = time;
        self.pos.ticks = 0;
        self.pos.pending = 0.0;
        self.pos.first_pending = true;
    }

    /// Frame for the current position, without advancing.
    pub fn current(&self) -> FrameContext {
        if let Some(ctx) = self.export.as_ref().and_then(|run| run.current) {
            return ctx;
        }
        let total_frames = self.total_frames();
        FrameContext {
            time: self.loop_time(),
            frame: self.pos.frame,
            total_frames,
            playhead: playhead(self.pos.frame, total_frames),
            delta_time: self.pos.delta_time,
            exporting: false,
            duration: total_frames.and(self.timing.duration),
            fps: self.timing.fps.get(),
        }
    }

    /// Feed `elapsed` wall-clock seconds and produce the next interactive frame, if any.
    ///
    /// Only a running clock produces frames. The first call after start, restart or seek emits
    /// the armed position with `delta_time = 0` and ignores `elapsed`. Static clocks emit that
    /// single frame and fall back to `Idle`. Throttled playback returns `None` until a whole
    /// frame interval has accumulated.
    pub fn advance(&mut self, elapsed: f64) -> Option<FrameContext> {
        if self.pos.state != ClockState::Running {
            return None;
        }
        let Some(total) = self.total_frames() else {
            let first = std::mem::take(&mut self.pos.first_pending);
            self.pos.delta_time = 0.0;
            self.pos.state = ClockState::Idle;
            return first.then(|| self.current());
        };
        if self.pos.first_pending {
            self.pos.first_pending = false;
            self.pos.delta_time = 0.0;
            return Some(self.current());
        }

        let elapsed = if elapsed.is_finite() {
            elapsed.max(0.0)
        } else {
            0.0
        };
        let fps = self.timing.fps;
        let before = self.pos.time;
        match self.timing.playback {
            PlaybackRate::Realtime => self.pos.time += elapsed,
            PlaybackRate::Fixed => {
                self.pos.ticks += 1;
                self.pos.time = self.pos.anchor_time + fps.frames_to_secs(self.pos.ticks);
            }
            PlaybackRate::Throttle => {
                self.pos.pending += elapsed;
                if self.pos.pending + FRAME_EPSILON < fps.frame_duration_secs() {
                    return None;
                }
                self.pos.time += self.pos.pending;
                self.pos.pending = 0.0;
            }
        }

        match self.timing.duration {
            Some(duration) if !self.timing.looping && self.pos.time >= duration - FRAME_EPSILON => {
                self.pos.time = duration.max(before);
                self.pos.frame = total - 1;
                self.pos.state = ClockState::Paused;
            }
            _ => self.pos.frame = fps.secs_to_frames_floor(self.loop_time()).min(total - 1),
        }
        self.pos.delta_time = self.pos.time - before;
        Some(self.current())
    }

    /// Seconds since start (or the last restart/seek), never wrapped. [`FrameContext::time`]
    /// is this value folded into the loop.
    pub fn elapsed(&self) -> f64 {
        self.pos.time
    }

    /// Interactive time folded into `[0, duration)` for looping clocks.
    ///
    /// Values within [`FRAME_EPSILON`] of a loop boundary snap onto it, so frame 0 of every loop
    /// has `time == 0` exactly as on the export path.
    fn loop_time(&self) -> f64 {
        let time = self.pos.time;
        let Some(duration) = self.timing.duration.filter(|_| self.timing.looping) else {
            return time;
        };
        let loops = ((time + FRAME_EPSILON) / duration).floor();
        let wrapped = time - loops * duration;
        if wrapped < FRAME_EPSILON { 0.0 } else { wrapped }
    }

    /// Detach from interactive time and prepare a deterministic export run.
    ///
    /// `frame_count` overrides the loop length; without it the clock needs a known loop. Returns
    /// the number of frames the run will produce.
    pub fn begin_export(&mut self, frame_count: Option<u64>) -> Result<u64, ExportError> {
        match self.pos.state {
            ClockState::Stopped => {
                return Err(ExportError::InvalidRequest("clock is stopped".to_owned()));
            }
            ClockState::Exporting => {
                return Err(ExportError::InvalidRequest(
                    "an export is already running".to_owned(),
                ));
            }
            _ => {}
        }
        if frame_count == Some(0) {
            return Err(ExportError::InvalidRequest(
                "frame count must be > 0".to_owned(),
            ));
        }
        let total_frames = frame_count
            .or(self.total_frames())
            .ok_or(ExportError::IndeterminateDuration)?;
        let duration = match (frame_count, self.timing.duration) {
            (None, Some(d)) => d,
            _ => self.timing.fps.frames_to_secs(total_frames),
        };

        self.export = Some(ExportRun {
            saved: self.pos,
            total_frames,
            duration,
            next: 0,
            current: None,
        });
        self.pos.state = ClockState::Exporting;
        Ok(total_frames)
    }

    /// Next export frame in strictly increasing order, or `None` once the run is exhausted or
    /// the clock was stopped.
    pub fn step_export(&mut self) -> Option<FrameContext> {
        if self.pos.state != ClockState::Exporting {
            return None;
        }
        let fps = self.timing.fps;
        let run = self.export.as_mut()?;
        if run.next >= run.total_frames {
            return None;
        }
        let frame = run.next;
        run.next += 1;
        let ctx = FrameContext {
            time: fps.frames_to_secs(frame),
            frame,
            total_frames: Some(run.total_frames),
            playhead: playhead(frame, Some(run.total_frames)),
            delta_time: if frame == 0 {
                0.0
            } else {
                fps.frame_duration_secs()
            },
            exporting: true,
            duration: Some(run.duration),
            fps: fps.get(),
        };
        run.current = Some(ctx);
        Some(ctx)
    }

    /// Frames produced so far by the current export run.
    pub fn export_progress(&self) -> Option<(u64, u64)> {
        self.export.as_ref().map(|r| (r.next, r.total_frames))
    }

    /// Leave export mode and restore the interactive position saved by
    /// [`AnimationClock::begin_export`]. A clock stopped mid-export stays stopped.
    pub fn end_export(&mut self) {
        let Some(run) = self.export.take() else {
            return;
        };
        if self.pos.state == ClockState::Stopped {
            return;
        }
        self.pos = run.saved;
    }
}

fn playhead(frame: u64, total_frames: Option<u64>) -> f64 {
    match total_frames {
        Some(total) if total > 0 => frame as f64 / total as f64,
        _ => 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;

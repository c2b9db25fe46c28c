use crate::animation::clock::FrameContext;
use crate::settings::resolve::ResolvedGeometry;
use crate::settings::units::Units;

/// Everything a drawing routine sees for one frame.
///
/// `width`/`height` are in the sketch's `units` (bleed included); the surface itself is
/// `pixel_width x pixel_height` device pixels.
#[derive(Debug)]
pub struct FrameProps<'a, S> {
    /// The adapter's drawing surface.
    pub context: &'a mut S,
    /// Output width in `units`.
    pub width: f64,
    /// Output height in `units`.
    pub height: f64,
    /// Width in `units` without bleed.
    pub trim_width: f64,
    /// Height in `units` without bleed.
    pub trim_height: f64,
    /// Bleed on every side, in `units`.
    pub bleed: f64,
    /// Surface width in device pixels.
    pub pixel_width: u32,
    /// Surface height in device pixels.
    pub pixel_height: u32,
    /// Pixel ratio the surface was sized with.
    pub pixel_ratio: f64,
    /// Units of `width`/`height`.
    pub units: Units,
    /// DPI used for physical units.
    pub pixels_per_inch: f64,
    /// Seconds since start.
    pub time: f64,
    /// Frame index.
    pub frame: u64,
    /// Loop length in frames, when known.
    pub total_frames: Option<u64>,
    /// `frame / total_frames`, or 0.
    pub playhead: f64,
    /// Seconds since the previous frame.
    pub delta_time: f64,
    /// `true` while an export captures this frame.
    pub exporting: bool,
    /// Loop length in seconds, when known.
    pub duration: Option<f64>,
    /// Frame rate.
    pub fps: u32,
}

impl<'a, S> FrameProps<'a, S> {
    pub(crate) fn new(
        context: &'a mut S,
        geometry: &ResolvedGeometry,
        frame: &FrameContext,
    ) -> Self {
        Self {
            context,
            width: geometry.output_width,
            height: geometry.output_height,
            trim_width: geometry.trim_width,
            trim_height: geometry.trim_height,
            bleed: geometry.bleed,
            pixel_width: geometry.pixel_width,
            pixel_height: geometry.pixel_height,
            pixel_ratio: geometry.pixel_ratio,
            units: geometry.units,
            pixels_per_inch: geometry.pixels_per_inch,
            time: frame.time,
            frame: frame.frame,
            total_frames: frame.total_frames,
            playhead: frame.playhead,
            delta_time: frame.delta_time,
            exporting: frame.exporting,
            duration: frame.duration,
            fps: frame.fps,
        }
    }

    /// Timing part of these props.
    pub fn frame_context(&self) -> FrameContext {
        FrameContext {
            time: self.time,
            frame: self.frame,
            total_frames: self.total_frames,
            playhead: self.playhead,
            delta_time: self.delta_time,
            exporting: self.exporting,
            duration: self.duration,
            fps: self.fps,
        }
    }

    /// Device pixels per output unit on the x axis.
    pub fn scale_x(&self) -> f64 {
        f64::from(self.pixel_width) / self.width
    }

    /// Device pixels per output unit on the y axis.
    pub fn scale_y(&self) -> f64 {
        f64::from(self.pixel_height) / self.height
    }
}

use crate::export::encode::Encoding;

/// Single capture or whole sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// One frame at the current clock position.
    Single,
    /// Every frame from 0 to `totalFrames - 1`.
    Sequence,
}

/// What to export and how. Unset options fall back to the sketch's settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRequest {
    /// Single or sequence.
    pub kind: ExportKind,
    /// Frames to capture in a sequence, overriding the loop length.
    pub frame_count: Option<u64>,
    /// Output encoding (default: settings `encoding`, else png).
    pub encoding: Option<Encoding>,
    /// Lossy quality in `(0, 1]` (default: settings `encodingQuality`).
    pub quality: Option<f64>,
    /// Pixel ratio for the capture (default: `exportPixelRatio`, else the display ratio).
    pub pixel_ratio: Option<f64>,
}

impl ExportRequest {
    /// Capture the current frame.
    pub fn single() -> Self {
        Self::new(ExportKind::Single)
    }

    /// Capture the whole loop.
    pub fn sequence() -> Self {
        Self::new(ExportKind::Sequence)
    }

    fn new(kind: ExportKind) -> Self {
        Self {
            kind,
            frame_count: None,
            encoding: None,
            quality: None,
            pixel_ratio: None,
        }
    }

    /// Override the number of sequence frames.
    pub fn frame_count(mut self, n: u64) -> Self {
        self.frame_count = Some(n);
        self
    }

    /// Choose the encoding.
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Choose the lossy quality.
    pub fn quality(mut self, quality: f64) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Override the capture pixel ratio.
    pub fn pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = Some(ratio);
        self
    }
}

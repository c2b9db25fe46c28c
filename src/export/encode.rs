use crate::foundation::error::ExportError;
use crate::render::adapter::FrameRGBA;
use image::codecs::jpeg::JpegEncoder;
use std::fmt;
use std::io::Cursor;

/// Image encoding of exported frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// JPEG; alpha is flattened over opaque white.
    Jpeg,
    /// Tightly packed straight-alpha RGBA8 bytes, no container.
    Raw,
}

impl Encoding {
    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Raw => "raw",
        }
    }

    /// File extension used in suggested names.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Raw => "raw",
        }
    }

    /// MIME type, where one exists.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Raw => "application/octet-stream",
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" | "image/png" => Ok(Self::Png),
            "jpg" | "jpeg" | "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "raw" | "rgba" => Ok(Self::Raw),
            other => Err(format!(
                "unknown encoding '{other}', expected png, jpeg or raw"
            )),
        }
    }
}

impl From<Encoding> for String {
    fn from(value: Encoding) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode a captured frame. `quality` in `(0, 1]` only affects JPEG.
pub fn encode_frame(
    frame: &FrameRGBA,
    encoding: Encoding,
    quality: f64,
    index: u64,
) -> Result<Vec<u8>, ExportError> {
    let err = |detail: String| ExportError::Encode {
        index,
        encoding: encoding.as_str(),
        detail,
    };
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(err(format!(
            "{}x{} frame has {} bytes, expected {expected}",
            frame.width,
            frame.height,
            frame.data.len()
        )));
    }

    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut rgba);
    }

    let mut buf = Vec::new();
    match encoding {
        Encoding::Raw => return Ok(rgba),
        Encoding::Png => {
            let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
                .ok_or_else(|| err("frame buffer does not match its size".to_owned()))?;
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| err(e.to_string()))?;
        }
        Encoding::Jpeg => {
            let rgb = flatten_over_white(&rgba);
            let img = image::RgbImage::from_raw(frame.width, frame.height, rgb)
                .ok_or_else(|| err("frame buffer does not match its size".to_owned()))?;
            let q = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
            image::DynamicImage::ImageRgb8(img)
                .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, q))
                .map_err(|e| err(e.to_string()))?;
        }
    }
    Ok(buf)
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn flatten_over_white(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = u32::from(px[3]);
        for &c in &px[..3] {
            out.push(((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;

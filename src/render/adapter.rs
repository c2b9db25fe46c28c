use crate::foundation::core::Canvas;
use crate::settings::model::{ContextKind, Settings};
use crate::settings::resolve::{DisplayHints, ResolvedGeometry};

/// A captured surface as RGBA8 pixels.
///
/// Adapters say whether `data` is premultiplied alpha; encoders convert as needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Everything an adapter needs to create (or resize) a drawing surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceRequest {
    /// Requested surface kind.
    pub context: ContextKind,
    /// Opaque surface-creation attributes from settings.
    pub attributes: Option<serde_json::Value>,
    /// Adapter-specific settings blocks (`gui`, `p5`, ...), untouched.
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// Surface size in device pixels.
    pub size: Canvas,
    /// Pixel ratio the size was resolved with.
    pub pixel_ratio: f64,
}

impl SurfaceRequest {
    /// Request for `geometry`, carrying the pass-through parts of `settings`.
    pub fn new(settings: &Settings, geometry: &ResolvedGeometry) -> Self {
        Self {
            context: settings.context_kind(),
            attributes: settings.attributes.clone(),
            extra: settings.extra.clone(),
            size: geometry.canvas(),
            pixel_ratio: geometry.pixel_ratio,
        }
    }
}

/// The rendering backend seam. The runtime never draws; it only sizes, hands out, and reads back
/// the surface an adapter owns the implementation of.
pub trait RenderAdapter {
    /// Drawing surface handed to the sketch as `context`.
    type Surface: 'static;

    /// Display facts used while resolving settings (device pixel ratio, viewport size).
    fn display_hints(&self) -> DisplayHints {
        DisplayHints::default()
    }

    /// Create a surface of `request.size`.
    fn create_surface(&mut self, request: &SurfaceRequest) -> anyhow::Result<Self::Surface>;

    /// Resize an existing surface. Contents after a resize are unspecified.
    fn resize_surface(
        &mut self,
        surface: &mut Self::Surface,
        request: &SurfaceRequest,
    ) -> anyhow::Result<()>;

    /// Read back the surface's current pixels.
    fn snapshot(&mut self, surface: &Self::Surface) -> anyhow::Result<FrameRGBA>;
}

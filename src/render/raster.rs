use crate::foundation::core::Canvas;
use crate::foundation::math::mul_div255_u8;
use crate::render::adapter::{FrameRGBA, RenderAdapter, SurfaceRequest};
use crate::settings::model::ContextKind;
use crate::settings::resolve::DisplayHints;

/// In-memory RGBA8 surface, premultiplied alpha, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    size: Canvas,
    data: Vec<u8>,
}

impl Raster {
    /// Transparent surface of `size`.
    pub fn new(size: Canvas) -> Self {
        Self {
            size,
            data: vec![0; size.rgba_len()],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replace every pixel with `rgba` (straight alpha).
    pub fn clear(&mut self, rgba: [u8; 4]) {
        let px = premultiply(rgba);
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Composite `rgba` (straight alpha) source-over onto one pixel. Out-of-bounds writes are
    /// ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.offset(x, y) {
            let src = premultiply(rgba);
            over(&mut self.data[i..i + 4], src);
        }
    }

    /// Composite a rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, rgba: [u8; 4]) {
        let clip = |start: i64, len: u32, max: u32| {
            let lo = start.clamp(0, i64::from(max));
            let hi = (start + i64::from(len)).clamp(0, i64::from(max));
            (lo as u32, hi as u32)
        };
        let (x0, x1) = clip(x, w, self.size.width);
        let (y0, y1) = clip(y, h, self.size.height);
        let src = premultiply(rgba);
        for py in y0..y1 {
            for px in x0..x1 {
                if let Some(i) = self.offset(px, py) {
                    over(&mut self.data[i..i + 4], src);
                }
            }
        }
    }

    /// Stored (premultiplied) value of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.width && y < self.size.height)
            .then(|| (y as usize * self.size.width as usize + x as usize) * 4)
    }

    fn resize(&mut self, size: Canvas) {
        self.size = size;
        self.data.clear();
        self.data.resize(size.rgba_len(), 0);
    }
}

fn premultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let a16 = u16::from(a);
    [
        mul_div255_u8(u16::from(r), a16),
        mul_div255_u8(u16::from(g), a16),
        mul_div255_u8(u16::from(b), a16),
        a,
    ]
}

fn over(dst: &mut [u8], src: [u8; 4]) {
    let inv = 255 - u16::from(src[3]);
    for (d, s) in dst.iter_mut().zip(src) {
        *d = s.saturating_add(mul_div255_u8(u16::from(*d), inv));
    }
}

/// CPU reference adapter backing `2d` sketches with a [`Raster`].
#[derive(Debug, Default)]
pub struct RasterAdapter {
    hints: DisplayHints,
    created: usize,
    resized: usize,
}

impl RasterAdapter {
    /// Adapter without display hints (pixel ratio 1, no viewport).
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a device pixel ratio to the settings resolver.
    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.hints.pixel_ratio = Some(ratio);
        self
    }

    /// Report a viewport size (CSS pixels) for percent units and size-less settings.
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.hints.viewport = Some((width, height));
        self
    }

    /// Surfaces created so far.
    pub fn surfaces_created(&self) -> usize {
        self.created
    }

    /// Resizes performed so far.
    pub fn surfaces_resized(&self) -> usize {
        self.resized
    }
}

impl RenderAdapter for RasterAdapter {
    type Surface = Raster;

    fn display_hints(&self) -> DisplayHints {
        self.hints
    }

    fn create_surface(&mut self, request: &SurfaceRequest) -> anyhow::Result<Raster> {
        if request.context != ContextKind::TwoD {
            anyhow::bail!(
                "raster adapter only provides `2d` surfaces, got `{}`",
                request.context
            );
        }
        self.created += 1;
        Ok(Raster::new(request.size))
    }

    fn resize_surface(&mut self, surface: &mut Raster, request: &SurfaceRequest) -> anyhow::Result<()> {
        if surface.size != request.size {
            surface.resize(request.size);
            self.resized += 1;
        }
        Ok(())
    }

    fn snapshot(&mut self, surface: &Raster) -> anyhow::Result<FrameRGBA> {
        Ok(FrameRGBA {
            width: surface.width(),
            height: surface.height(),
            data: surface.data.clone(),
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;

use super::*;
use crate::settings::model::Settings;
use crate::settings::resolve::resolve_geometry;

fn request(settings: &Settings, adapter: &RasterAdapter) -> SurfaceRequest {
    let geometry = resolve_geometry(settings, &adapter.display_hints()).unwrap();
    SurfaceRequest::new(settings, &geometry)
}

#[test]
fn opaque_fill_is_stored_as_is() {
    let mut r = Raster::new(Canvas {
        width: 4,
        height: 3,
    });
    r.fill_rect(1, 1, 2, 5, [10, 20, 30, 255]);
    assert_eq!(r.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(r.pixel(1, 1), Some([10, 20, 30, 255]));
    assert_eq!(r.pixel(2, 2), Some([10, 20, 30, 255]));
    assert_eq!(r.pixel(3, 2), Some([0, 0, 0, 0]));
    assert_eq!(r.pixel(4, 0), None);
}

#[test]
fn translucent_pixels_composite_over() {
    let mut r = Raster::new(Canvas {
        width: 1,
        height: 1,
    });
    r.clear([255, 255, 255, 255]);
    r.put_pixel(0, 0, [0, 0, 0, 128]);
    let [c, _, _, a] = r.pixel(0, 0).unwrap();
    assert_eq!(a, 255);
    assert!((126..=128).contains(&c), "{c}");

    r.put_pixel(9, 9, [1, 2, 3, 4]);
    r.fill_rect(-5, -5, 2, 2, [1, 2, 3, 255]);
    assert_eq!(r.pixel(0, 0).unwrap()[3], 255);
}

#[test]
fn adapter_creates_resizes_and_snapshots() {
    let mut adapter = RasterAdapter::new().with_pixel_ratio(2.0);
    let settings = Settings::new().with_dimensions(3.0, 2.0);
    let req = request(&settings, &adapter);
    assert_eq!(
        req.size,
        Canvas {
            width: 6,
            height: 4
        }
    );

    let mut surface = adapter.create_surface(&req).unwrap();
    surface.clear([1, 2, 3, 255]);
    assert_eq!(adapter.surfaces_created(), 1);

    let frame = adapter.snapshot(&surface).unwrap();
    assert_eq!((frame.width, frame.height), (6, 4));
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 6 * 4 * 4);

    let bigger = request(&settings.clone().with_pixel_ratio(3.0), &adapter);
    adapter.resize_surface(&mut surface, &bigger).unwrap();
    adapter.resize_surface(&mut surface, &bigger).unwrap();
    assert_eq!((surface.width(), surface.height()), (9, 6));
    assert_eq!(adapter.surfaces_resized(), 1);
}

#[test]
fn non_2d_contexts_are_refused() {
    let mut adapter = RasterAdapter::new();
    let settings = Settings::new()
        .with_dimensions(2.0, 2.0)
        .with_context(ContextKind::WebGl);
    let err = adapter
        .create_surface(&request(&settings, &adapter))
        .unwrap_err();
    assert!(err.to_string().contains("webgl"));
    assert_eq!(adapter.surfaces_created(), 0);
}

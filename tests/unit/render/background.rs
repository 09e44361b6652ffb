use std::io::Cursor;
use std::sync::Arc;

use super::*;
use crate::assets::loader::MemoryFetcher;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

fn stop(position: f64, color: Rgba8) -> ColorStop {
    ColorStop { position, color }
}

fn solid_png(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn image_theme(file_ref: &str) -> ThemeDescriptor {
    ThemeDescriptor {
        id: "stadium".to_string(),
        label: String::new(),
        kind: ThemeKind::Image {
            file_ref: file_ref.to_string(),
        },
        effects_tag: None,
    }
}

#[test]
fn sample_stops_clamps_and_interpolates() {
    let stops = vec![
        stop(0.2, Rgba8::rgb(0, 0, 0)),
        stop(0.6, Rgba8::rgb(200, 100, 0)),
    ];
    assert_eq!(sample_stops(&stops, 0.0), Rgba8::rgb(0, 0, 0));
    assert_eq!(sample_stops(&stops, 0.4), Rgba8::rgb(100, 50, 0));
    assert_eq!(sample_stops(&stops, 0.9), Rgba8::rgb(200, 100, 0));
}

#[test]
fn stops_are_made_monotonic() {
    let stops = normalized_stops(vec![
        stop(0.5, BRAND_GOLD),
        stop(0.1, BRAND_GREEN),
        stop(7.0, BRAND_GOLD),
    ]);
    let pos: Vec<f64> = stops.iter().map(|s| s.position).collect();
    assert_eq!(pos, vec![0.5, 0.5, 1.0]);
}

#[test]
fn default_gradient_runs_gold_to_green_downwards() {
    let c = canvas(2, 200);
    let px = gradient_pixels(&default_gradient(), c);
    let top = &px[0..4];
    let bottom_idx = (199 * 2) * 4;
    let bottom = &px[bottom_idx..bottom_idx + 4];
    assert!(top[0] >= BRAND_GOLD.r - 1);
    assert!(bottom[0] <= BRAND_GREEN.r + 1);
    assert!(bottom[1] <= BRAND_GREEN.g + 1);
    assert_eq!(top[3], 255);
}

#[test]
fn horizontal_gradient_ignores_rows() {
    let spec = GradientSpec {
        shape: GradientShape::Linear,
        direction: GradientDirection::ToRight,
        stops: vec![stop(0.0, Rgba8::rgb(0, 0, 0)), stop(1.0, Rgba8::rgb(255, 0, 0))],
    };
    let c = canvas(10, 3);
    let px = gradient_pixels(&spec, c);
    let row = |y: usize| px[y * 40..(y + 1) * 40].to_vec();
    assert_eq!(row(0), row(2));
    assert!(px[0] < px[36]);
}

#[test]
fn radial_center_takes_first_stop() {
    let spec = GradientSpec {
        shape: GradientShape::Radial,
        direction: GradientDirection::ToBottom,
        stops: vec![stop(0.0, Rgba8::rgb(9, 9, 9)), stop(1.0, Rgba8::rgb(250, 250, 250))],
    };
    let px = gradient_pixels(&spec, canvas(3, 3));
    assert_eq!(&px[16..20], &[9, 9, 9, 255]);
}

#[test]
fn cover_scale_fills_the_larger_ratio() {
    let c = canvas(1080, 1920);
    assert_eq!(cover_scale(100, 50, c), 38.4);
    assert_eq!(cover_scale(2160, 3840, c), 0.5);
}

#[test]
fn missing_or_empty_theme_uses_built_in_gradient() {
    let mut s = Surface::new(canvas(4, 4)).unwrap();
    let mut loader = AssetLoader::new(MemoryFetcher::new());

    assert_eq!(
        paint_background(&mut s, &mut loader, None),
        FillStyle::Gradient(default_gradient())
    );

    let empty = ThemeDescriptor {
        id: "blank".to_string(),
        label: String::new(),
        kind: ThemeKind::Gradient(GradientSpec::default()),
        effects_tag: None,
    };
    assert_eq!(
        paint_background(&mut s, &mut loader, Some(&empty)),
        FillStyle::Gradient(default_gradient())
    );
}

#[test]
fn unknown_theme_id_resolves_to_none() {
    let cat = Catalog::new(vec![image_theme("a.png")], Vec::new());
    assert!(resolve_theme(&cat, Some("stadium")).is_some());
    assert!(resolve_theme(&cat, Some("nope")).is_none());
    assert!(resolve_theme(&cat, Some("  ")).is_none());
    assert!(resolve_theme(&cat, None).is_none());
}

#[test]
fn broken_image_theme_falls_back_to_gradient() {
    let mut s = Surface::new(canvas(4, 4)).unwrap();
    let mut loader = AssetLoader::new(MemoryFetcher::new());
    let fill = paint_background(&mut s, &mut loader, Some(&image_theme("themes/gone.jpg")));
    assert_eq!(fill, FillStyle::Gradient(default_gradient()));
    assert!(!s.snapshot().tainted);
}

#[test]
fn image_theme_is_dimmed_and_taints_when_opaque() {
    let mut mem = MemoryFetcher::new();
    mem.insert_opaque("https://cdn.example/bg.png", solid_png([200, 150, 0, 255]));
    let mut loader = AssetLoader::new(Arc::new(mem));
    let mut s = Surface::new(canvas(4, 4)).unwrap();

    let fill = paint_background(
        &mut s,
        &mut loader,
        Some(&image_theme("https://cdn.example/bg.png")),
    );
    assert_eq!(
        fill,
        FillStyle::Image {
            file_ref: "https://cdn.example/bg.png".to_string()
        }
    );
    let frame = s.snapshot();
    assert!(frame.tainted);
    let [r, g, _, a] = frame.pixel(2, 2).unwrap();
    assert!((130..=150).contains(&r), "overlay should dim red, got {r}");
    assert!(g < 150);
    assert_eq!(a, 255);
}

use crate::assets::loader::AssetLoader;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::FanwallResult;
use crate::model::catalog::{
    Catalog, ColorStop, GradientDirection, GradientShape, GradientSpec, ThemeDescriptor, ThemeKind,
};
use crate::render::palette::{BRAND_GOLD, BRAND_GREEN};
use crate::render::surface::{
    Surface, affine_to_cpu, image_placement, prepared_to_image, rgba_premul_to_image,
};

/// Dark veil drawn over image themes so text stays readable.
pub const IMAGE_OVERLAY: Rgba8 = Rgba8::rgba(0, 0, 0, 77);

/// What the background was actually painted with.
#[derive(Clone, Debug, PartialEq)]
pub enum FillStyle {
    /// Procedural gradient (the theme's own, or the built-in one).
    Gradient(GradientSpec),
    /// Bitmap theme, scaled to cover.
    Image {
        /// Source the bitmap was loaded from.
        file_ref: String,
    },
}

/// Built-in two-stop brand gradient, gold at the top to green at the bottom.
pub fn default_gradient() -> GradientSpec {
    GradientSpec {
        shape: GradientShape::Linear,
        direction: GradientDirection::ToBottom,
        stops: vec![
            ColorStop {
                position: 0.0,
                color: BRAND_GOLD,
            },
            ColorStop {
                position: 1.0,
                color: BRAND_GREEN,
            },
        ],
    }
}

/// Look up `theme_id`, logging why the built-in gradient will be used instead.
pub(crate) fn resolve_theme<'a>(
    catalog: &'a Catalog,
    theme_id: Option<&str>,
) -> Option<&'a ThemeDescriptor> {
    let id = theme_id.map(str::trim).filter(|s| !s.is_empty())?;
    match catalog.theme(id) {
        Ok(t) => Some(t),
        Err(e) => {
            tracing::warn!(error = %e, "using built-in gradient");
            None
        }
    }
}

/// Paint the full-canvas background for `theme` and report the fill used.
pub(crate) fn paint_background(
    surface: &mut Surface,
    loader: &mut AssetLoader,
    theme: Option<&ThemeDescriptor>,
) -> FillStyle {
    let spec = match theme.map(|t| &t.kind) {
        Some(ThemeKind::Image { file_ref }) => match paint_image_theme(surface, loader, file_ref) {
            Ok(()) => {
                return FillStyle::Image {
                    file_ref: file_ref.clone(),
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "image theme unavailable, using built-in gradient");
                default_gradient()
            }
        },
        Some(ThemeKind::Gradient(g)) if !g.stops.is_empty() => g.clone(),
        _ => default_gradient(),
    };

    if let Err(e) = paint_gradient(surface, &spec) {
        tracing::warn!(error = %e, "gradient paint failed");
    }
    FillStyle::Gradient(spec)
}

fn paint_gradient(surface: &mut Surface, spec: &GradientSpec) -> FanwallResult<()> {
    let canvas = surface.canvas();
    let bytes = gradient_pixels(spec, canvas);
    let img = rgba_premul_to_image(&bytes, canvas.width, canvas.height)?;
    surface.draw(|ctx| {
        ctx.set_paint(img);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(canvas.width),
            f64::from(canvas.height),
        ));
    });
    Ok(())
}

fn paint_image_theme(
    surface: &mut Surface,
    loader: &mut AssetLoader,
    file_ref: &str,
) -> FanwallResult<()> {
    let loaded = loader.load_image(file_ref)?;
    let img = prepared_to_image(&loaded.image)?;
    let canvas = surface.canvas();
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    let scale = cover_scale(loaded.image.width, loaded.image.height, canvas);
    let place = image_placement(
        loaded.image.width,
        loaded.image.height,
        scale,
        cw / 2.0,
        ch / 2.0,
    );
    let (iw, ih) = (
        f64::from(loaded.image.width),
        f64::from(loaded.image.height),
    );

    surface.draw(|ctx| {
        let mut clip = vello_cpu::kurbo::BezPath::new();
        clip.move_to((0.0, 0.0));
        clip.line_to((cw, 0.0));
        clip.line_to((cw, ch));
        clip.line_to((0.0, ch));
        clip.close_path();
        ctx.push_clip_layer(&clip);
        ctx.set_transform(affine_to_cpu(place));
        ctx.set_paint(img);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        ctx.pop_layer();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(IMAGE_OVERLAY.to_cpu());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, cw, ch));
    });
    if loaded.tainted {
        surface.mark_tainted();
    }
    Ok(())
}

/// Uniform scale that makes a `w` x `h` image cover the canvas.
pub fn cover_scale(w: u32, h: u32, canvas: Canvas) -> f64 {
    let sx = f64::from(canvas.width) / f64::from(w.max(1));
    let sy = f64::from(canvas.height) / f64::from(h.max(1));
    sx.max(sy)
}

/// Rasterize `spec` over the whole canvas as premultiplied RGBA8.
///
/// Linear gradients follow CSS geometry: the gradient line passes through the canvas center and
/// corner directions are perpendicular to the opposite diagonal. Radial gradients are circles
/// centered on the canvas reaching the farthest corner.
pub fn gradient_pixels(spec: &GradientSpec, canvas: Canvas) -> Vec<u8> {
    let stops = normalized_stops(if spec.stops.is_empty() {
        default_gradient().stops
    } else {
        spec.stops.clone()
    });

    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let (cx, cy) = (w / 2.0, h / 2.0);
    let mut bytes = vec![0u8; canvas.area().saturating_mul(4)];

    let t_at: Box<dyn Fn(f64, f64) -> f64> = match spec.shape {
        GradientShape::Linear => {
            let (dx, dy) = direction_vector(spec.direction, w, h);
            let len = (w * dx).abs() + (h * dy).abs();
            Box::new(move |x, y| {
                if len <= 0.0 {
                    0.0
                } else {
                    ((x - cx) * dx + (y - cy) * dy) / len + 0.5
                }
            })
        }
        GradientShape::Radial => {
            let r = cx.hypot(cy);
            Box::new(move |x, y| {
                if r <= 0.0 {
                    0.0
                } else {
                    (x - cx).hypot(y - cy) / r
                }
            })
        }
    };

    for y in 0..canvas.height {
        let py = f64::from(y) + 0.5;
        for x in 0..canvas.width {
            let px = f64::from(x) + 0.5;
            let c = sample_stops(&stops, t_at(px, py)).premul();
            let idx = ((y as usize) * (canvas.width as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&c.to_array());
        }
    }
    bytes
}

fn direction_vector(dir: GradientDirection, w: f64, h: f64) -> (f64, f64) {
    let corner = |sx: f64, sy: f64| {
        let (vx, vy) = (sx * h, sy * w);
        let n = vx.hypot(vy);
        if n <= 0.0 { (0.0, 1.0) } else { (vx / n, vy / n) }
    };
    match dir {
        GradientDirection::ToBottom => (0.0, 1.0),
        GradientDirection::ToTop => (0.0, -1.0),
        GradientDirection::ToRight => (1.0, 0.0),
        GradientDirection::ToLeft => (-1.0, 0.0),
        GradientDirection::ToBottomRight => corner(1.0, 1.0),
        GradientDirection::ToBottomLeft => corner(-1.0, 1.0),
        GradientDirection::ToTopRight => corner(1.0, -1.0),
        GradientDirection::ToTopLeft => corner(-1.0, -1.0),
    }
}

/// Clamp positions to `[0, 1]` and make them non-decreasing, keeping input order.
fn normalized_stops(mut stops: Vec<ColorStop>) -> Vec<ColorStop> {
    let mut floor = 0.0f64;
    for s in &mut stops {
        let p = if s.position.is_finite() {
            s.position.clamp(0.0, 1.0)
        } else {
            floor
        };
        s.position = p.max(floor);
        floor = s.position;
    }
    stops
}

/// Color at `t` for stops already normalized.
pub(crate) fn sample_stops(stops: &[ColorStop], t: f64) -> Rgba8 {
    let Some(first) = stops.first() else {
        return BRAND_GOLD;
    };
    if t <= first.position {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.position {
            let span = b.position - a.position;
            if span <= 0.0 {
                return b.color;
            }
            return a.color.lerp(b.color, ((t - a.position) / span) as f32);
        }
    }
    stops.last().map_or(first.color, |s| s.color)
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;

use rand::Rng;
use rand::rngs::StdRng;

use crate::foundation::core::{BezPath, Point, Rgba8};
use crate::model::catalog::{EffectsTag, ThemeDescriptor, ThemeKind};
use crate::render::palette::WHITE;
use crate::render::surface::{DrawState, Surface, bezpath_to_cpu, circle_path};

/// Layer opacity of every decorative overlay.
pub const EFFECT_ALPHA: f32 = 0.12;
/// Arcs drawn by [`EffectsTag::Arcs`].
pub const ARC_COUNT: usize = 7;
/// Strokes drawn by [`EffectsTag::Sweeps`].
pub const SWEEP_COUNT: usize = 5;
/// Flares drawn by [`EffectsTag::Flares`].
pub const FLARE_COUNT: usize = 4;

const SWEEP_SPACING: f64 = 36.0;
const FLARE_RINGS: usize = 5;
/// Paint alpha of one flare ring; nested rings stack toward the core.
const FLARE_RING_ALPHA: u8 = 51;

/// Effects routine for `theme`, if any. Image themes never get one.
pub fn effects_for(theme: Option<&ThemeDescriptor>) -> Option<EffectsTag> {
    let theme = theme?;
    match (&theme.kind, theme.effects_tag) {
        (ThemeKind::Gradient(_), Some(tag)) if tag != EffectsTag::Unknown => Some(tag),
        _ => None,
    }
}

/// Draw the decorative overlay for `theme`. Returns whether anything was drawn.
///
/// Positions are random per call; density and opacity are fixed. The surface state is back at
/// its default afterwards.
pub(crate) fn paint_effects(
    surface: &mut Surface,
    theme: Option<&ThemeDescriptor>,
    rng: &mut StdRng,
) -> bool {
    let Some(tag) = effects_for(theme) else {
        return false;
    };
    let canvas = surface.canvas();
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));

    let strokes: Vec<(BezPath, f64)> = match tag {
        EffectsTag::Arcs => arcs(rng, w, h),
        EffectsTag::Sweeps => sweeps(rng, w, h),
        EffectsTag::Flares | EffectsTag::Unknown => Vec::new(),
    };
    let flares: Vec<(Point, f64)> = match tag {
        EffectsTag::Flares => (0..FLARE_COUNT)
            .map(|_| {
                let c = Point::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
                (c, rng.gen_range(0.08..0.2) * w.min(h))
            })
            .collect(),
        _ => Vec::new(),
    };

    surface.scoped(DrawState::with_alpha(EFFECT_ALPHA), |s| {
        s.draw(|ctx| {
            ctx.set_paint(WHITE.to_cpu());
            for (path, width) in &strokes {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            for (c, r) in &flares {
                draw_flare(ctx, *c, *r);
            }
        });
    });
    true
}

/// Concentric translucent discs, brightest at the core.
pub(crate) fn draw_flare(ctx: &mut vello_cpu::RenderContext, center: Point, radius: f64) {
    ctx.set_paint(Rgba8::rgba(255, 255, 255, FLARE_RING_ALPHA).to_cpu());
    for i in 0..FLARE_RINGS {
        let k = 1.0 - (i as f64) / (FLARE_RINGS as f64);
        ctx.fill_path(&circle_path(center.x, center.y, radius * k));
    }
}

fn arcs(rng: &mut StdRng, w: f64, h: f64) -> Vec<(BezPath, f64)> {
    use kurbo::Shape;

    (0..ARC_COUNT)
        .map(|_| {
            let center = Point::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
            let r = rng.gen_range(0.15..0.6) * w;
            let arc = kurbo::Arc::new(
                center,
                (r, r),
                rng.gen_range(0.0..std::f64::consts::TAU),
                rng.gen_range(0.5..2.0),
                0.0,
            );
            (arc.to_path(0.5), rng.gen_range(2.0..8.0))
        })
        .collect()
}

fn sweeps(rng: &mut StdRng, w: f64, h: f64) -> Vec<(BezPath, f64)> {
    let y0 = rng.gen_range(0.1..0.9) * h;
    let bend = rng.gen_range(-0.25..0.25) * h;
    let tilt = rng.gen_range(-0.1..0.1) * h;
    (0..SWEEP_COUNT)
        .map(|i| {
            let dy = (i as f64) * SWEEP_SPACING;
            let mut p = BezPath::new();
            p.move_to((-0.1 * w, y0 + dy));
            p.curve_to(
                (0.3 * w, y0 + bend + dy),
                (0.7 * w, y0 - bend + tilt + dy),
                (1.1 * w, y0 + tilt + dy),
            );
            (p, 3.0)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/effects.rs"]
mod tests;

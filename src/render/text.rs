use crate::assets::fonts::{FontCache, FontFace, TextBrushRgba8, TextStyle};
use crate::foundation::core::{Point, Rgba8, Vec2};
use crate::model::request::FontId;
use crate::render::frame::{TextRole, TextRun};
use crate::render::palette::BRAND_GOLD;
use crate::render::surface::{DrawState, Outline, Shadow, Surface};

/// Upper bounds (inclusive) of the text-length buckets; longer text falls in the last bucket.
pub const LENGTH_BUCKETS: [usize; 6] = [8, 12, 16, 20, 25, 30];

/// Letter-spacing applied by most caps-only display fonts.
pub const CAPS_LETTER_SPACING: f32 = 2.0;
/// Letter-spacing for Bebas Neue, whose glyphs sit very tight.
pub const BEBAS_LETTER_SPACING: f32 = 4.0;

/// Themes dark enough that text gets a gold outline.
pub const DARK_THEME_IDS: [&str; 2] = ["midnight", "night-game"];

/// Outline stroke width for dark themes.
pub const OUTLINE_WIDTH: f64 = 3.0;

pub(crate) const TEXT_SHADOW: Shadow = Shadow {
    color: Rgba8::rgba(0, 0, 0, 128),
    offset: Vec2::new(2.0, 2.0),
    blur_radius: 6,
    sigma: 3.0,
};

/// Size and casing rules for one font.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Render in uppercase regardless of input.
    pub caps: bool,
    /// Extra advance per glyph, in pixels.
    pub letter_spacing: f32,
    /// Base size per length bucket, non-increasing.
    pub sizes: [f32; 7],
    /// Shape with bold weight.
    pub bold: bool,
}

const fn spec(caps: bool, letter_spacing: f32, bold: bool, sizes: [f32; 7]) -> FontSpec {
    FontSpec {
        caps,
        letter_spacing,
        sizes,
        bold,
    }
}

/// The size/casing table, one row per font.
pub fn font_spec(font: FontId) -> FontSpec {
    match font {
        FontId::Inter => spec(false, 0.0, true, [120., 100., 84., 72., 62., 54., 46.]),
        FontId::Montserrat => spec(false, 0.0, true, [116., 96., 80., 70., 60., 52., 44.]),
        FontId::BebasNeue => spec(
            true,
            BEBAS_LETTER_SPACING,
            false,
            [150., 126., 106., 92., 80., 70., 60.],
        ),
        FontId::Oswald => spec(
            true,
            CAPS_LETTER_SPACING,
            true,
            [130., 110., 92., 80., 68., 60., 52.],
        ),
        FontId::Anton => spec(
            true,
            CAPS_LETTER_SPACING,
            false,
            [136., 114., 96., 82., 70., 62., 54.],
        ),
        FontId::Graduate => spec(
            true,
            CAPS_LETTER_SPACING,
            false,
            [110., 92., 76., 66., 56., 50., 42.],
        ),
        FontId::PermanentMarker => spec(false, 0.0, false, [118., 98., 82., 70., 60., 52., 44.]),
        FontId::Pacifico => spec(false, 0.0, false, [112., 94., 78., 68., 58., 50., 42.]),
    }
}

/// Bucket index for a text of `len` characters.
pub fn bucket_index(len: usize) -> usize {
    LENGTH_BUCKETS
        .iter()
        .position(|&max| len <= max)
        .unwrap_or(LENGTH_BUCKETS.len())
}

/// Base size for `font` and a text of `len` characters, before the multiplier.
pub fn base_font_size(font: FontId, len: usize) -> f32 {
    font_spec(font).sizes[bucket_index(len)]
}

/// Final pixel size: base size times `multiplier`, rounded to the nearest integer.
pub fn font_size_px(font: FontId, len: usize, multiplier: f64) -> f32 {
    (f64::from(base_font_size(font, len)) * multiplier).round().max(1.0) as f32
}

/// Apply the font's casing rule.
pub fn apply_casing(font: FontId, text: &str) -> String {
    if font_spec(font).caps {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

/// Whether `theme_id` names one of the dark themes.
pub fn is_dark_theme(theme_id: Option<&str>) -> bool {
    theme_id.is_some_and(|id| DARK_THEME_IDS.contains(&id))
}

pub(crate) fn dark_outline() -> Outline {
    Outline {
        color: BRAND_GOLD,
        width: OUTLINE_WIDTH,
    }
}

/// One text element, already cased and sized.
#[derive(Clone, Debug)]
pub(crate) struct TextSpec<'a> {
    pub(crate) role: TextRole,
    pub(crate) text: &'a str,
    pub(crate) font: FontId,
    pub(crate) size_px: f32,
    pub(crate) letter_spacing: f32,
    pub(crate) bold: bool,
    pub(crate) color: Rgba8,
    pub(crate) center_x: f64,
    pub(crate) baseline_y: f64,
}

impl<'a> TextSpec<'a> {
    /// Styled per the font table (casing is the caller's job).
    pub(crate) fn styled(role: TextRole, text: &'a str, font: FontId, size_px: f32) -> Self {
        let fs = font_spec(font);
        Self {
            role,
            text,
            font,
            size_px,
            letter_spacing: fs.letter_spacing,
            bold: fs.bold,
            color: Rgba8::rgb(255, 255, 255),
            center_x: 0.0,
            baseline_y: 0.0,
        }
    }

    pub(crate) fn at(mut self, center_x: f64, baseline_y: f64) -> Self {
        self.center_x = center_x;
        self.baseline_y = baseline_y;
        self
    }

    pub(crate) fn color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum GlyphPaint {
    Fill(Rgba8),
    Stroke(Rgba8, f64),
}

/// Draw `spec` using the surface's current shadow/outline state and log the run.
///
/// Text whose font (and the fallback font) cannot be loaded is logged but not rasterized.
pub(crate) fn draw_text(surface: &mut Surface, fonts: &mut FontCache, spec: &TextSpec<'_>) {
    let state = *surface.state();
    surface.record_text(TextRun {
        role: spec.role,
        text: spec.text.to_string(),
        font_px: spec.size_px,
        letter_spacing: spec.letter_spacing,
        outlined: state.outline.is_some(),
        center: Point::new(spec.center_x, spec.baseline_y),
    });

    if spec.text.is_empty() {
        return;
    }
    let Some(face) = fonts.resolve(spec.font) else {
        tracing::warn!(role = ?spec.role, "no font available, text not rasterized");
        return;
    };

    let style = TextStyle {
        size_px: spec.size_px,
        letter_spacing: spec.letter_spacing,
        bold: spec.bold,
        brush: brush(spec.color),
    };
    let layout = match fonts.layout(&face, spec.text, &style) {
        Ok(l) => l,
        Err(e) => {
            tracing::warn!(role = ?spec.role, error = %e, "text layout failed");
            return;
        }
    };

    let origin = centered_origin(&layout, spec.center_x, spec.baseline_y);

    if let Some(shadow) = state.shadow {
        let at = origin + shadow.offset;
        let res = surface.draw_blurred(shadow.blur_radius, shadow.sigma, |ctx| {
            paint_glyphs(ctx, &face, &layout, at, GlyphPaint::Fill(shadow.color));
        });
        if let Err(e) = res {
            tracing::warn!(error = %e, "text shadow skipped");
        }
    }

    surface.draw(|ctx| {
        if let Some(outline) = state.outline {
            paint_glyphs(
                ctx,
                &face,
                &layout,
                origin,
                GlyphPaint::Stroke(outline.color, outline.width),
            );
        }
        paint_glyphs(ctx, &face, &layout, origin, GlyphPaint::Fill(spec.color));
    });
}

/// Draw `spec` as one scoped element: `state` is installed just for this text.
pub(crate) fn draw_text_scoped(
    surface: &mut Surface,
    fonts: &mut FontCache,
    state: DrawState,
    spec: &TextSpec<'_>,
) {
    surface.scoped(state, |s| draw_text(s, fonts, spec));
}

fn brush(c: Rgba8) -> TextBrushRgba8 {
    TextBrushRgba8 {
        r: c.r,
        g: c.g,
        b: c.b,
        a: c.a,
    }
}

/// Top-left layout origin centering the first line on `center_x`, baseline on `baseline_y`.
pub(crate) fn centered_origin(
    layout: &parley::Layout<TextBrushRgba8>,
    center_x: f64,
    baseline_y: f64,
) -> Vec2 {
    let width = f64::from(layout.width());
    let baseline = layout
        .lines()
        .next()
        .map(|l| f64::from(l.metrics().baseline))
        .unwrap_or(0.0);
    Vec2::new(center_x - width / 2.0, baseline_y - baseline)
}

pub(crate) fn paint_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    face: &FontFace,
    layout: &parley::Layout<TextBrushRgba8>,
    origin: Vec2,
    paint: GlyphPaint,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
    match paint {
        GlyphPaint::Fill(c) => ctx.set_paint(c.to_cpu()),
        GlyphPaint::Stroke(c, width) => {
            ctx.set_paint(c.to_cpu());
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        }
    }

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = ctx
                .glyph_run(&face.data)
                .font_size(run.run().font_size());
            match paint {
                GlyphPaint::Fill(_) => builder.fill_glyphs(glyphs),
                GlyphPaint::Stroke(..) => builder.stroke_glyphs(glyphs),
            }
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;

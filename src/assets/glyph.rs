use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::fonts::FontCache;
use crate::foundation::core::Canvas;
use crate::model::request::FontId;
use crate::render::frame::TextRole;
use crate::render::palette::{BRAND_GREEN, SLATE, WHITE};
use crate::render::surface::{Surface, circle_path};
use crate::render::text::{TextSpec, draw_text};

/// Edge length of a fallback badge, in pixels.
pub const GLYPH_SIZE: u32 = 96;

const GLYPH_FONT: FontId = FontId::Inter;
const GLYPH_TEXT_PX: f32 = 36.0;

/// Up to two uppercase initials: first letters of the first two words, or `?` for empty input.
pub fn initials(text: &str) -> String {
    let mut words = text.split_whitespace();
    let out: String = match (words.next(), words.next()) {
        (Some(a), Some(b)) => a.chars().take(1).chain(b.chars().take(1)).collect(),
        (Some(a), None) => a.chars().take(2).collect(),
        _ => String::new(),
    };
    if out.is_empty() {
        "?".to_string()
    } else {
        out.to_uppercase()
    }
}

/// Circular badge with solid fill and centered bold initials.
///
/// Never fails: without a usable font the badge is a plain disc.
pub fn create_fallback_glyph(text: &str, is_primary: bool, fonts: &mut FontCache) -> PreparedImage {
    let fill = if is_primary { BRAND_GREEN } else { SLATE };
    let edge = f64::from(GLYPH_SIZE);
    let label = initials(text);

    let Ok(canvas) = Canvas::new(GLYPH_SIZE, GLYPH_SIZE) else {
        return blank();
    };
    let Ok(mut surface) = Surface::new(canvas) else {
        return blank();
    };
    surface.clear_to_transparent();

    surface.draw(|ctx| {
        ctx.set_paint(fill.to_cpu());
        ctx.fill_path(&circle_path(edge / 2.0, edge / 2.0, edge / 2.0));
    });

    let mut spec = TextSpec::styled(TextRole::Custom, &label, GLYPH_FONT, GLYPH_TEXT_PX)
        .at(edge / 2.0, edge / 2.0 + f64::from(GLYPH_TEXT_PX) * 0.35)
        .color(WHITE);
    spec.bold = true;
    spec.letter_spacing = 0.0;
    draw_text(&mut surface, fonts, &spec);

    let frame = surface.snapshot();
    PreparedImage {
        width: frame.width,
        height: frame.height,
        rgba8_premul: frame.data,
    }
}

fn blank() -> PreparedImage {
    PreparedImage {
        width: GLYPH_SIZE,
        height: GLYPH_SIZE,
        rgba8_premul: Arc::new(vec![0; (GLYPH_SIZE * GLYPH_SIZE * 4) as usize]),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/glyph.rs"]
mod tests;

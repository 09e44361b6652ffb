use crate::assets::decode::PreparedImage;
use crate::assets::fonts::FontCache;
use crate::assets::glyph::create_fallback_glyph;
use crate::assets::loader::AssetLoader;
use crate::foundation::core::Rgba8;
use crate::layout::solver::{Layout, MAX_MATCHES};
use crate::model::request::{FontId, Match};
use crate::render::clock::{TBD, format_match_date, format_match_time};
use crate::render::frame::TextRole;
use crate::render::palette::WHITE;
use crate::render::surface::{
    DrawState, Surface, affine_to_cpu, circle_path, image_placement, prepared_to_image,
};
use crate::render::text::{TextSpec, draw_text_scoped};

/// Gap between a badge edge and the logo drawn inside it.
pub const LOGO_INSET: f64 = 6.0;
/// Kickoff date size.
pub const MATCH_DATE_PX: f32 = 28.0;
/// Kickoff time size.
pub const MATCH_TIME_PX: f32 = 26.0;

const MATCH_FONT: FontId = FontId::Inter;

/// Short date and compact time for a fixture, or `TBD` for both on a bad timestamp.
pub fn match_labels(m: &Match) -> (String, String) {
    match m.kickoff_utc() {
        Ok(at) => (format_match_date(at), format_match_time(at)),
        Err(e) => {
            tracing::warn!(opponent = %m.opponent_name, error = %e, "kickoff shown as TBD");
            (TBD.to_string(), TBD.to_string())
        }
    }
}

/// Draw up to [`MAX_MATCHES`] fixtures in one evenly spaced row, in input order.
pub(crate) fn draw_match_row(
    surface: &mut Surface,
    loader: &mut AssetLoader,
    fonts: &mut FontCache,
    layout: &Layout,
    matches: &[Match],
    text_color: Rgba8,
) {
    let shown = &matches[..matches.len().min(MAX_MATCHES)];
    let centers = layout.match_slot_centers(shown.len());

    for (m, &cx) in shown.iter().zip(centers.iter()) {
        draw_badge(surface, loader, fonts, layout, m, cx);

        let (date, time) = match_labels(m);
        let date_spec = TextSpec::styled(TextRole::MatchDate, &date, MATCH_FONT, MATCH_DATE_PX)
            .at(cx, layout.match_date_y)
            .color(text_color);
        draw_text_scoped(surface, fonts, DrawState::default(), &date_spec);

        let time_spec = TextSpec::styled(TextRole::MatchTime, &time, MATCH_FONT, MATCH_TIME_PX)
            .at(cx, layout.match_time_y)
            .color(text_color);
        draw_text_scoped(surface, fonts, DrawState::default(), &time_spec);
    }
}

fn draw_badge(
    surface: &mut Surface,
    loader: &mut AssetLoader,
    fonts: &mut FontCache,
    layout: &Layout,
    m: &Match,
    cx: f64,
) {
    let cy = layout.match_logo_center_y;
    let r = layout.match_logo_radius;

    let (logo, tainted) = load_logo(loader, fonts, m);
    let inner = (2.0 * (r - LOGO_INSET)).max(1.0);
    let scale = inner / f64::from(logo.width.max(logo.height).max(1));
    let place = image_placement(logo.width, logo.height, scale, cx, cy);
    let paint = match prepared_to_image(&logo) {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!(opponent = %m.opponent_name, error = %e, "logo not drawable");
            None
        }
    };
    let (lw, lh) = (f64::from(logo.width), f64::from(logo.height));

    surface.scoped(DrawState::default(), |s| {
        s.draw(|ctx| {
            let disc = circle_path(cx, cy, r);
            ctx.set_paint(WHITE.to_cpu());
            ctx.fill_path(&disc);
            if let Some(img) = paint {
                ctx.push_clip_layer(&disc);
                ctx.set_transform(affine_to_cpu(place));
                ctx.set_paint(img);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, lw, lh));
                ctx.pop_layer();
            }
        });
        if tainted {
            s.mark_tainted();
        }
    });
}

fn load_logo(loader: &mut AssetLoader, fonts: &mut FontCache, m: &Match) -> (PreparedImage, bool) {
    let src = m.logo_ref.as_deref().map(str::trim).filter(|s| !s.is_empty());
    if let Some(src) = src {
        match loader.load_image(src) {
            Ok(loaded) => return (loaded.image, loaded.tainted),
            Err(e) => {
                tracing::warn!(
                    opponent = %m.opponent_name,
                    error = %e,
                    "logo unavailable, using badge"
                );
            }
        }
    }
    (create_fallback_glyph(m.badge_text(), m.is_home, fonts), false)
}

#[cfg(test)]
#[path = "../../tests/unit/render/schedule.rs"]
mod tests;

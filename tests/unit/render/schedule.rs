use std::io::Cursor;

use super::*;
use crate::assets::fonts::{NoFonts, RetryPolicy};
use crate::assets::loader::MemoryFetcher;
use crate::foundation::core::Canvas;
use crate::layout::solver::compute_layout;
use crate::render::palette::{BRAND_GREEN, SLATE};

fn fixture(name: &str, kickoff: Option<&str>, is_home: bool) -> Match {
    Match {
        opponent_name: name.to_string(),
        opponent_short_code: String::new(),
        logo_ref: None,
        kickoff: kickoff.map(str::to_string),
        is_home,
    }
}

fn red_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([220, 0, 0, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 2)
}

struct Rig {
    surface: Surface,
    loader: AssetLoader,
    fonts: FontCache,
    layout: Layout,
}

fn rig(fetcher: MemoryFetcher) -> Rig {
    let canvas = Canvas::new(720, 1280).unwrap();
    Rig {
        surface: Surface::new(canvas).unwrap(),
        loader: AssetLoader::new(fetcher),
        fonts: FontCache::new(NoFonts, RetryPolicy::once()),
        layout: compute_layout(canvas, 0.4, 0.15),
    }
}

impl Rig {
    fn draw(&mut self, matches: &[Match]) -> crate::render::frame::Frame {
        draw_match_row(
            &mut self.surface,
            &mut self.loader,
            &mut self.fonts,
            &self.layout,
            matches,
            WHITE,
        );
        self.surface.snapshot()
    }

    fn badge_pixel(&self, frame: &crate::render::frame::Frame, cx: f64) -> [u8; 4] {
        frame
            .pixel(cx.round() as u32, self.layout.match_logo_center_y.round() as u32)
            .unwrap()
    }
}

#[test]
fn labels_follow_display_timezone() {
    let m = fixture("Seattle Sounders", Some("2025-07-06T02:30:00Z"), true);
    assert_eq!(match_labels(&m), ("7/5".to_string(), "7:30p".to_string()));
}

#[test]
fn bad_kickoff_is_tbd_for_both_fields() {
    for kickoff in [None, Some(""), Some("next saturday")] {
        let m = fixture("LAFC", kickoff, false);
        assert_eq!(match_labels(&m), (TBD.to_string(), TBD.to_string()));
    }
}

#[test]
fn row_keeps_input_order_and_caps_at_six() {
    let mut r = rig(MemoryFetcher::new());
    let matches: Vec<Match> = (0..8)
        .map(|i| fixture(&format!("Club {i}"), Some("2025-07-06T02:30:00Z"), i % 2 == 0))
        .collect();
    let frame = r.draw(&matches);

    let dates: Vec<_> = frame.runs(TextRole::MatchDate).collect();
    let times: Vec<_> = frame.runs(TextRole::MatchTime).collect();
    assert_eq!(dates.len(), MAX_MATCHES);
    assert_eq!(times.len(), MAX_MATCHES);

    let centers = r.layout.match_slot_centers(MAX_MATCHES);
    for (run, cx) in dates.iter().zip(centers.iter()) {
        assert_eq!(run.center.x, *cx);
        assert_eq!(run.center.y, r.layout.match_date_y);
        assert_eq!(run.text, "7/5");
    }
    assert!(times.iter().all(|t| t.center.y == r.layout.match_time_y));
}

#[test]
fn missing_logos_get_home_and_away_badges() {
    let mut r = rig(MemoryFetcher::new());
    let frame = r.draw(&[
        fixture("Portland Timbers", None, true),
        fixture("Austin FC", None, false),
    ]);
    let centers = r.layout.match_slot_centers(2);
    assert!(close(r.badge_pixel(&frame, centers[0]), BRAND_GREEN.premul().to_array()));
    assert!(close(r.badge_pixel(&frame, centers[1]), SLATE.premul().to_array()));
    assert_eq!(frame.runs(TextRole::MatchTime).count(), 2);
    assert!(frame.runs(TextRole::MatchTime).all(|t| t.text == TBD));
}

#[test]
fn loaded_logo_sits_on_white_disc() {
    let mut mem = MemoryFetcher::new();
    mem.insert("logos/sea.png", red_png());
    let mut r = rig(mem);
    let mut m = fixture("Seattle Sounders", Some("2025-07-06T02:30:00Z"), false);
    m.logo_ref = Some("logos/sea.png".to_string());
    let frame = r.draw(&[m]);

    let cx = r.layout.match_slot_centers(1)[0];
    assert!(close(r.badge_pixel(&frame, cx), [220, 0, 0, 255]));

    // Ring between the logo and the disc edge stays white.
    let edge_x = (cx + r.layout.match_logo_radius - LOGO_INSET / 2.0).round() as u32;
    let y = r.layout.match_logo_center_y.round() as u32;
    let [red, green, blue, _] = frame.pixel(edge_x, y).unwrap();
    assert!(red > 200 && green > 200 && blue > 200);
}

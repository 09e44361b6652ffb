use std::collections::HashMap;

use super::*;
use crate::assets::fonts::{NoFonts, RetryPolicy};

fn fonts() -> FontCache {
    FontCache::new(NoFonts, RetryPolicy::once())
}

fn px(img: &PreparedImage, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * img.width + x) * 4) as usize;
    let d = &img.rgba8_premul;
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

#[test]
fn initials_take_first_letters() {
    assert_eq!(initials("Seattle Sounders"), "SS");
    assert_eq!(initials("lafc"), "LA");
    assert_eq!(initials("  "), "?");
    assert_eq!(initials("Real Salt Lake"), "RS");
}

#[test]
fn glyph_is_a_filled_disc_with_transparent_corners() {
    let mut f = fonts();
    let img = create_fallback_glyph("Portland Timbers", true, &mut f);
    assert_eq!((img.width, img.height), (GLYPH_SIZE, GLYPH_SIZE));
    assert_eq!(px(&img, 0, 0)[3], 0);
    assert_eq!(px(&img, GLYPH_SIZE / 2, 8), BRAND_GREEN.premul().to_array());
}

#[test]
fn secondary_glyph_uses_slate() {
    let mut f = fonts();
    let img = create_fallback_glyph("Austin FC", false, &mut f);
    assert_eq!(px(&img, GLYPH_SIZE / 2, 8), SLATE.premul().to_array());
}

#[test]
fn initials_are_drawn_inside_the_disc() {
    let bytes = std::fs::read("tests/data/fonts/Tuffy.ttf").unwrap();
    let mut f = FontCache::new(HashMap::from([(FontId::Inter, bytes)]), RetryPolicy::once());
    let plain = create_fallback_glyph("Seattle Sounders", true, &mut fonts());
    let img = create_fallback_glyph("Seattle Sounders", true, &mut f);

    let green = BRAND_GREEN.premul().to_array();
    let mut white = 0;
    for y in 24..72 {
        for x in 16..80 {
            assert_eq!(px(&plain, x, y), green);
            let p = px(&img, x, y);
            if p[0] > 200 && p[1] > 200 && p[2] > 200 {
                white += 1;
            }
        }
    }
    assert!(white > 30, "only {white} initial pixels");
    assert_eq!(px(&img, 0, 0)[3], 0);
}

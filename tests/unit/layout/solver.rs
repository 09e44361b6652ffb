use super::*;

fn phone() -> Canvas {
    Canvas::new(1080, 1920).unwrap()
}

#[test]
fn patch_geometry_follows_ratio_and_short_edge() {
    let l = compute_layout(phone(), 0.4, 0.15);
    assert_eq!(l.center_x, 540.0);
    assert_eq!(l.patch_center_y, 768.0);
    assert_eq!(l.patch_radius, 216.0);
    assert_eq!(l.text_y(true), 768.0 + PATCH_TEXT_OFFSET);
    assert_eq!(l.text_y(false), 768.0 + NO_PATCH_TEXT_OFFSET);
    assert!(l.text_y(false) < l.text_y(true));
}

#[test]
fn out_of_range_ratios_clamp_to_bounds() {
    for (raw, expect) in [(-1.0, 0.2), (0.0, 0.2), (0.19, 0.2), (0.81, 0.8), (5.0, 0.8)] {
        let l = compute_layout(phone(), raw, 0.2);
        assert_eq!(l.patch_position_ratio, expect);
        assert_eq!(l.patch_center_y, 1920.0 * expect);
        assert_eq!(l, compute_layout(phone(), expect, 0.2));
    }
    for (raw, expect) in [(-0.5, 0.1), (0.05, 0.1), (0.41, 0.4), (2.0, 0.4)] {
        let l = compute_layout(phone(), 0.5, raw);
        assert_eq!(l.match_row_margin_ratio, expect);
        assert_eq!(l, compute_layout(phone(), 0.5, expect));
    }
    let l = compute_layout(phone(), f64::NAN, f64::NAN);
    assert_eq!(l.patch_position_ratio, 0.2);
    assert_eq!(l.match_row_margin_ratio, 0.1);
}

#[test]
fn match_row_never_reaches_footer() {
    let sizes = [
        (1080u32, 1920u32),
        (1080, 2340),
        (1170, 2532),
        (1290, 2796),
        (1440, 3200),
        (2160, 3840),
    ];
    for (w, h) in sizes {
        let canvas = Canvas::new(w, h).unwrap();
        for step in 0..=30 {
            let ratio = 0.1 + 0.01 * step as f64;
            let l = compute_layout(canvas, 0.5, ratio);
            assert!(
                l.match_row_bottom_y <= f64::from(h) - FOOTER_MARGIN - MATCH_ROW_BUFFER,
                "{w}x{h} ratio {ratio}: row bottom {} collides with footer",
                l.match_row_bottom_y
            );
            assert!(l.match_time_y <= l.match_row_bottom_y);
            assert!(l.match_row_bottom_y < l.footer_y);
        }
    }
}

#[test]
fn margin_is_clamped_to_safe_window() {
    let l = compute_layout(phone(), 0.5, 0.1);
    assert_eq!(l.match_row_bottom_margin, MIN_SAFE_MARGIN);

    let l = compute_layout(phone(), 0.5, 0.2);
    assert_eq!(l.match_row_bottom_margin, 384.0);

    let short = Canvas::new(400, 480).unwrap();
    let l = compute_layout(short, 0.5, 0.4);
    assert_eq!(l.match_row_bottom_margin, MIN_SAFE_MARGIN);
}

#[test]
fn six_slots_are_evenly_spaced_inside_band() {
    let l = compute_layout(phone(), 0.4, 0.15);
    let xs = l.match_slot_centers(6);
    assert_eq!(xs.len(), 6);
    let gap = xs[1] - xs[0];
    for pair in xs.windows(2) {
        assert!((pair[1] - pair[0] - gap).abs() < 1e-9);
    }
    assert!(xs[0] > l.match_band_left);
    assert!(xs[5] < l.match_band_left + l.match_band_width);
    assert!(((xs[0] + xs[5]) / 2.0 - l.center_x).abs() < 1e-9);

    assert_eq!(l.match_slot_centers(9).len(), MAX_MATCHES);
    assert!(l.match_slot_centers(0).is_empty());
}

#[test]
fn layout_is_deterministic() {
    assert_eq!(
        compute_layout(phone(), 0.37, 0.22),
        compute_layout(phone(), 0.37, 0.22)
    );
}

use super::*;
use crate::render::frame::TextRole;
use crate::render::palette::WHITE;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

fn white_square(ctx: &mut vello_cpu::RenderContext) {
    ctx.set_paint(WHITE.to_cpu());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 8.0, 8.0));
}

#[test]
fn zero_sized_canvas_has_no_surface() {
    let err = Surface::new(Canvas {
        width: 0,
        height: 10,
    })
    .err()
    .unwrap();
    assert!(matches!(err, FanwallError::SurfaceUnavailable(_)));
    assert!(err.is_fatal());
}

#[test]
fn fresh_surface_is_opaque_black() {
    let s = Surface::new(canvas(4, 3)).unwrap();
    let f = s.snapshot();
    assert_eq!((f.width, f.height), (4, 3));
    assert!(f.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    assert!(!f.tainted);
    assert!(f.text_log.is_empty());
}

#[test]
fn draw_composites_at_state_alpha() {
    let mut s = Surface::new(canvas(8, 8)).unwrap();
    s.scoped(DrawState::with_alpha(0.5), |s| s.draw(white_square));
    let f = s.snapshot();
    assert_eq!(f.pixel(4, 4), Some([128, 128, 128, 255]));
}

#[test]
fn scoped_restores_default_state() {
    let mut s = Surface::new(canvas(2, 2)).unwrap();
    let seen = s.scoped(DrawState::with_alpha(0.25), |s| s.state().alpha);
    assert_eq!(seen, 0.25);
    assert_eq!(*s.state(), DrawState::default());
}

#[test]
fn reset_clears_pixels_log_and_taint() {
    let mut s = Surface::new(canvas(8, 8)).unwrap();
    s.draw(white_square);
    s.mark_tainted();
    s.record_text(TextRun {
        role: TextRole::Footer,
        text: "x".to_string(),
        font_px: 10.0,
        letter_spacing: 0.0,
        outlined: false,
        center: kurbo::Point::new(1.0, 1.0),
    });
    assert!(s.snapshot().tainted);

    s.reset();
    let f = s.snapshot();
    assert_eq!(f.pixel(4, 4), Some([0, 0, 0, 255]));
    assert!(!f.tainted);
    assert!(f.text_log.is_empty());
}

#[test]
fn fill_and_clear_cover_the_whole_frame() {
    let mut s = Surface::new(canvas(3, 3)).unwrap();
    s.fill(Rgba8::rgb(10, 20, 30));
    assert!(s.snapshot().data.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
    s.clear_to_transparent();
    assert!(s.snapshot().data.iter().all(|&b| b == 0));
}

#[test]
fn kernel_is_normalized_and_symmetric() {
    let k = gaussian_kernel_q16(6, 3.0).unwrap();
    assert_eq!(k.len(), 13);
    assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
    for i in 0..k.len() / 2 {
        assert_eq!(k[i], k[k.len() - 1 - i]);
    }
    assert_eq!(gaussian_kernel_q16(0, 0.0).unwrap(), vec![1 << 16]);
    assert!(gaussian_kernel_q16(3, 0.0).is_err());
}

#[test]
fn blur_keeps_uniform_color() {
    let src: Vec<u8> = [40u8, 80, 120, 255].repeat(5 * 4);
    let mut dst = vec![0u8; src.len()];
    let mut tmp = vec![0u8; src.len()];
    let k = gaussian_kernel_q16(2, 1.0).unwrap();
    blur_rgba8_premul_q16(&src, &mut dst, &mut tmp, 5, 4, &k);
    assert_eq!(dst, src);
}

#[test]
fn zero_opacity_over_is_a_no_op() {
    let mut dst = vec![1u8, 2, 3, 255];
    premul_over_in_place_opacity(&mut dst, &[255, 255, 255, 255], 0.0);
    assert_eq!(dst, vec![1, 2, 3, 255]);
    premul_over_in_place_opacity(&mut dst, &[0, 0, 0, 0], 1.0);
    assert_eq!(dst, vec![1, 2, 3, 255]);
}

#[test]
fn placement_centers_scaled_image() {
    let a = image_placement(100, 50, 2.0, 300.0, 400.0);
    let tl = a * kurbo::Point::new(0.0, 0.0);
    let br = a * kurbo::Point::new(100.0, 50.0);
    assert_eq!((tl.x, tl.y), (200.0, 350.0));
    assert_eq!((br.x, br.y), (400.0, 450.0));
}

#[test]
fn pixmap_rejects_length_mismatch() {
    assert!(pixmap_from_premul_bytes(&[0; 12], 2, 2).is_err());
    assert!(pixmap_from_premul_bytes(&[0; 16], 2, 2).is_ok());
}

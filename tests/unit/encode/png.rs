use std::sync::Arc;

use super::*;

fn frame(w: u32, h: u32, px: [u8; 4]) -> Frame {
    Frame {
        width: w,
        height: h,
        data: Arc::new(px.repeat((w * h) as usize)),
        tainted: false,
        text_log: Vec::new(),
    }
}

#[test]
fn unpremultiply_restores_straight_color() {
    let f = frame(1, 1, [64, 32, 0, 128]);
    assert_eq!(unpremultiply(&f), vec![128, 64, 0, 128]);
    assert_eq!(unpremultiply(&frame(1, 1, [0, 0, 0, 0])), vec![0, 0, 0, 0]);
    assert_eq!(unpremultiply(&frame(1, 1, [9, 8, 7, 255])), vec![9, 8, 7, 255]);
}

#[test]
fn png_decodes_back_to_same_size() {
    let f = frame(5, 3, [10, 200, 30, 255]);
    let bytes = encode_png(&f).unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (5, 3));
    assert_eq!(img.get_pixel(4, 2).0, [10, 200, 30, 255]);
}

#[test]
fn mismatched_buffer_is_rejected() {
    let mut f = frame(2, 2, [0, 0, 0, 255]);
    f.width = 3;
    assert!(matches!(encode_png(&f), Err(FanwallError::Validation(_))));
}

#[test]
fn write_creates_parent_dirs() {
    let dir = std::env::temp_dir().join(format!("fanwall-png-{}", std::process::id()));
    let path = dir.join("nested").join("wall.png");
    write_png(&frame(2, 2, [1, 2, 3, 255]), &path).unwrap();
    assert!(path.is_file());
    std::fs::remove_dir_all(&dir).unwrap();
}

use std::io::Cursor;

use super::*;

#[test]
fn decode_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn svg_is_sniffed_and_rasterized_to_edge() {
    let svg = br##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
  <rect width="20" height="10" fill="#00482b"/>
</svg>"##;
    let prepared = decode_image(svg).unwrap();
    assert_eq!(prepared.width, SVG_RASTER_EDGE);
    assert_eq!(prepared.height, SVG_RASTER_EDGE / 2);
    let mid = ((prepared.height / 2 * prepared.width + prepared.width / 2) * 4) as usize;
    assert_eq!(prepared.rgba8_premul[mid + 3], 255);
}

#[test]
fn garbage_bytes_fail() {
    assert!(decode_image(b"definitely not an image").is_err());
    assert!(parse_svg(b"<svg").is_err());
}

use crate::foundation::error::{FanwallError, FanwallResult};

/// Longer edge, in pixels, of rasterized SVG logos and patches.
pub const SVG_RASTER_EDGE: u32 = 512;

/// Raster size for `tree` with its longer edge scaled to `max_edge`, aspect preserved.
pub fn svg_raster_size(tree: &usvg::Tree, max_edge: u32) -> FanwallResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(FanwallError::image_load("svg has invalid width/height"));
    }
    let scale = (max_edge as f32) / w.max(h);
    let rw = ((w * scale).round() as u32).max(1);
    let rh = ((h * scale).round() as u32).max(1);
    Ok((rw, rh))
}

/// Rasterize `tree` into premultiplied RGBA8 of exactly `width` x `height`.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> FanwallResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| FanwallError::image_load("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

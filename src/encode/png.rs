use std::io::Cursor;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{FanwallError, FanwallResult};
use crate::render::frame::Frame;

/// Straight-alpha RGBA8 copy of a frame's premultiplied pixels.
pub fn unpremultiply(frame: &Frame) -> Vec<u8> {
    let mut out = frame.data.as_ref().clone();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

/// Encode `frame` as PNG bytes.
pub fn encode_png(frame: &Frame) -> FanwallResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, unpremultiply(frame))
        .ok_or_else(|| FanwallError::validation("frame buffer does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| FanwallError::serde(format!("png encode: {e}")))?;
    Ok(buf)
}

/// Encode `frame` and write it to `path`, creating parent directories.
pub fn write_png(frame: &Frame, path: impl AsRef<Path>) -> FanwallResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let bytes = encode_png(frame)?;
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;

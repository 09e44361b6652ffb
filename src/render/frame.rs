use std::sync::Arc;

use crate::foundation::core::Point;
use crate::foundation::math::Fnv1a64;

/// Which scene element produced a text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    /// The user's custom text under (or in place of) the patch.
    Custom,
    /// Live clock above the patch.
    Time,
    /// Long-form date above the patch.
    Date,
    /// Kickoff date under a match badge.
    MatchDate,
    /// Kickoff time under a match badge.
    MatchTime,
    /// Tagline at the bottom edge.
    Footer,
    /// Diagnostic label on an error placeholder.
    Error,
}

/// A single piece of text as it was handed to the rasterizer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextRun {
    /// Producing element.
    pub role: TextRole,
    /// Final glyph string, after casing rules.
    pub text: String,
    /// Font size in pixels.
    pub font_px: f32,
    /// Extra advance per glyph, in pixels.
    pub letter_spacing: f32,
    /// Whether an outline stroke was drawn beneath the fill.
    pub outlined: bool,
    /// Horizontal center and baseline of the run.
    pub center: Point,
}

/// A completed render pass.
///
/// Frames are immutable once produced; the pixel buffer is shared, so cloning is cheap.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub data: Arc<Vec<u8>>,
    /// Whether any opaque (non-CORS) image contributed to the pixels.
    pub tainted: bool,
    /// Every text run drawn, in paint order.
    pub text_log: Vec<TextRun>,
}

impl Frame {
    /// Premultiplied pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Stable 64-bit digest of the dimensions and pixel bytes.
    pub fn digest(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.data);
        h.finish()
    }

    /// Text runs produced by `role`, in paint order.
    pub fn runs(&self, role: TextRole) -> impl Iterator<Item = &TextRun> {
        self.text_log.iter().filter(move |r| r.role == role)
    }
}

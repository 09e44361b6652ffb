use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::foundation::error::{FanwallError, FanwallResult};
use crate::model::request::FontId;

/// Face used when a requested font cannot be provided.
pub const FALLBACK_FONT: FontId = FontId::Inter;

/// Source of font bytes.
pub trait FontProvider {
    /// Return the raw TTF/OTF bytes for `font`.
    fn load_font(&self, font: FontId) -> FanwallResult<Vec<u8>>;
}

/// Reads `<root>/<FontId::file_name()>`.
#[derive(Clone, Debug)]
pub struct DirFontProvider {
    root: PathBuf,
}

impl DirFontProvider {
    /// Serve font files from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FontProvider for DirFontProvider {
    fn load_font(&self, font: FontId) -> FanwallResult<Vec<u8>> {
        let path = self.root.join(Path::new(font.file_name()));
        std::fs::read(&path)
            .with_context(|| format!("read font '{}'", path.display()))
            .map_err(|e| FanwallError::font_load(format!("{font}: {e:#}")))
    }
}

impl FontProvider for HashMap<FontId, Vec<u8>> {
    fn load_font(&self, font: FontId) -> FanwallResult<Vec<u8>> {
        self.get(&font)
            .cloned()
            .ok_or_else(|| FanwallError::font_load(format!("{font}: not bundled")))
    }
}

/// Provider with no fonts at all; text is laid out logically but never rasterized.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFonts;

impl FontProvider for NoFonts {
    fn load_font(&self, font: FontId) -> FanwallResult<Vec<u8>> {
        Err(FanwallError::font_load(format!("{font}: no font provider")))
    }
}

/// Bounded retry schedule for font loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each further attempt.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let max_attempts = std::env::var("FANWALL_FONT_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(3);
        Self {
            max_attempts,
            base_backoff: Duration::from_millis(25),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no sleeping.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            base_backoff: Duration::ZERO,
        }
    }

    fn backoff_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.base_backoff.saturating_mul(1u32 << (attempt - 1).min(16))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// A registered face ready for layout and glyph rasterization.
#[derive(Clone)]
pub(crate) struct FontFace {
    pub(crate) id: FontId,
    pub(crate) family: String,
    pub(crate) data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("id", &self.id)
            .field("family", &self.family)
            .finish()
    }
}

enum FontSlot {
    Ready(Arc<FontFace>),
    Failed,
}

/// Session-owned font cache.
///
/// Each font is requested from the provider at most `max_attempts` times per session. Failures are
/// remembered so later passes fall back immediately instead of blocking again.
pub struct FontCache {
    provider: Box<dyn FontProvider>,
    policy: RetryPolicy,
    slots: HashMap<FontId, FontSlot>,
    engine: TextLayoutEngine,
}

impl FontCache {
    /// Fresh cache over `provider`.
    pub fn new(provider: impl FontProvider + 'static, policy: RetryPolicy) -> Self {
        Self {
            provider: Box::new(provider),
            policy,
            slots: HashMap::new(),
            engine: TextLayoutEngine::new(),
        }
    }

    /// Make sure `font` is loaded; `false` once all attempts failed.
    pub fn ensure_loaded(&mut self, font: FontId) -> bool {
        self.face(font).is_some()
    }

    /// Whether a load of `font` has been attempted and failed.
    pub fn has_failed(&self, font: FontId) -> bool {
        matches!(self.slots.get(&font), Some(FontSlot::Failed))
    }

    pub(crate) fn face(&mut self, font: FontId) -> Option<Arc<FontFace>> {
        match self.slots.get(&font) {
            Some(FontSlot::Ready(face)) => return Some(face.clone()),
            Some(FontSlot::Failed) => return None,
            None => {}
        }

        match self.load_with_retries(font) {
            Ok(face) => {
                let face = Arc::new(face);
                self.slots.insert(font, FontSlot::Ready(face.clone()));
                Some(face)
            }
            Err(e) => {
                tracing::warn!(%font, error = %e, "font unavailable, using fallback face");
                self.slots.insert(font, FontSlot::Failed);
                None
            }
        }
    }

    /// Requested face, else the fallback face, else nothing.
    pub(crate) fn resolve(&mut self, font: FontId) -> Option<Arc<FontFace>> {
        self.face(font).or_else(|| {
            if font == FALLBACK_FONT {
                None
            } else {
                self.face(FALLBACK_FONT)
            }
        })
    }

    pub(crate) fn layout(
        &mut self,
        face: &FontFace,
        text: &str,
        style: &TextStyle,
    ) -> FanwallResult<parley::Layout<TextBrushRgba8>> {
        self.engine.layout(text, &face.family, style)
    }

    fn load_with_retries(&mut self, font: FontId) -> FanwallResult<FontFace> {
        let attempts = self.policy.max_attempts.max(1);
        let mut last_err = None;
        for attempt in 0..attempts {
            let wait = self.policy.backoff_before(attempt);
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
            match self.provider.load_font(font) {
                Ok(bytes) => {
                    let family = self.engine.register(&bytes)?;
                    let data = vello_cpu::peniko::FontData::new(
                        vello_cpu::peniko::Blob::from(bytes),
                        0,
                    );
                    return Ok(FontFace {
                        id: font,
                        family,
                        data,
                    });
                }
                Err(e) => {
                    tracing::debug!(%font, attempt, error = %e, "font load attempt failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| FanwallError::font_load(format!("{font}: no attempts"))))
    }
}

/// Shaping parameters for one text element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TextStyle {
    pub(crate) size_px: f32,
    pub(crate) letter_spacing: f32,
    pub(crate) bold: bool,
    pub(crate) brush: TextBrushRgba8,
}

/// Stateful helper for building Parley text layouts from registered fonts.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register font bytes and return the primary family name.
    pub(crate) fn register(&mut self, font_bytes: &[u8]) -> FanwallResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            FanwallError::font_load("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| FanwallError::font_load("registered font family has no name"))?
            .to_string();
        Ok(family_name)
    }

    /// Shape and lay out a single line of text.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        family: &str,
        style: &TextStyle,
    ) -> FanwallResult<parley::Layout<TextBrushRgba8>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(FanwallError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(style.brush));
        if style.letter_spacing != 0.0 {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(
                style.letter_spacing,
            ));
        }
        if style.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;

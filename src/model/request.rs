use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{FanwallError, FanwallResult};

/// Maximum number of characters of custom text that are ever rendered.
pub const MAX_CUSTOM_TEXT_CHARS: usize = 50;

/// Label rendered when the custom text is empty.
pub const FALLBACK_LABEL: &str = "Supporter";

/// Accepted range for [`RenderRequest::font_size_multiplier`].
pub const FONT_SIZE_MULTIPLIER_RANGE: (f64, f64) = (0.7, 1.5);

/// Fixed set of fonts the text styler knows how to size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontId {
    /// Neutral sans-serif, also the fallback face.
    #[default]
    Inter,
    /// Geometric sans-serif.
    Montserrat,
    /// Condensed display face, caps-only with wide tracking.
    BebasNeue,
    /// Condensed gothic, caps-only.
    Oswald,
    /// Heavy display face, caps-only.
    Anton,
    /// Collegiate slab, caps-only.
    Graduate,
    /// Marker script.
    PermanentMarker,
    /// Brush script.
    Pacifico,
}

impl FontId {
    /// All known fonts, in catalog order.
    pub const ALL: [FontId; 8] = [
        FontId::Inter,
        FontId::Montserrat,
        FontId::BebasNeue,
        FontId::Oswald,
        FontId::Anton,
        FontId::Graduate,
        FontId::PermanentMarker,
        FontId::Pacifico,
    ];

    /// Font file name looked up by directory-backed font providers.
    pub fn file_name(self) -> &'static str {
        match self {
            FontId::Inter => "Inter-Regular.ttf",
            FontId::Montserrat => "Montserrat-Bold.ttf",
            FontId::BebasNeue => "BebasNeue-Regular.ttf",
            FontId::Oswald => "Oswald-Bold.ttf",
            FontId::Anton => "Anton-Regular.ttf",
            FontId::Graduate => "Graduate-Regular.ttf",
            FontId::PermanentMarker => "PermanentMarker-Regular.ttf",
            FontId::Pacifico => "Pacifico-Regular.ttf",
        }
    }

    /// Stable snake_case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            FontId::Inter => "inter",
            FontId::Montserrat => "montserrat",
            FontId::BebasNeue => "bebas_neue",
            FontId::Oswald => "oswald",
            FontId::Anton => "anton",
            FontId::Graduate => "graduate",
            FontId::PermanentMarker => "permanent_marker",
            FontId::Pacifico => "pacifico",
        }
    }
}

impl std::fmt::Display for FontId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upcoming fixture, as delivered by the match data provider.
///
/// Matches are expected in ascending kickoff order; the compositor never re-sorts them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Match {
    /// Full opponent name.
    pub opponent_name: String,
    /// Short opponent code, e.g. `"SEA"`.
    #[serde(default)]
    pub opponent_short_code: String,
    /// URL or asset-relative path of the opponent logo.
    #[serde(default)]
    pub logo_ref: Option<String>,
    /// Kickoff instant as an RFC 3339 string.
    #[serde(default)]
    pub kickoff: Option<String>,
    /// Whether the fixture is played at home.
    #[serde(default)]
    pub is_home: bool,
}

impl Match {
    /// Parse the kickoff timestamp.
    pub fn kickoff_utc(&self) -> FanwallResult<DateTime<Utc>> {
        let raw = self
            .kickoff
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                FanwallError::date_parse(format!(
                    "missing kickoff for '{}'",
                    self.opponent_name
                ))
            })?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| FanwallError::date_parse(format!("kickoff '{raw}': {e}")))
    }

    /// Text used to synthesize a fallback badge for this opponent.
    pub fn badge_text(&self) -> &str {
        if self.opponent_short_code.trim().is_empty() {
            &self.opponent_name
        } else {
            &self.opponent_short_code
        }
    }
}

/// The single input to the compositor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderRequest {
    /// Target bitmap width in pixels.
    pub canvas_width: u32,
    /// Target bitmap height in pixels.
    pub canvas_height: u32,
    /// Theme catalog id; absent or unknown ids use the built-in gradient.
    pub theme_id: Option<String>,
    /// Whether to draw the patch emblem.
    pub patch_enabled: bool,
    /// Patch catalog id.
    pub patch_image_ref: Option<String>,
    /// Custom text; truncated to [`MAX_CUSTOM_TEXT_CHARS`].
    pub custom_text: String,
    /// Font used for the custom text and the footer.
    pub font_id: FontId,
    /// Scale applied to the bucketed base font size.
    pub font_size_multiplier: f64,
    /// Color for every text element.
    pub text_color: Rgba8,
    /// Fraction of canvas height where the patch center sits (clamped to `[0.2, 0.8]`).
    pub patch_position_ratio: f64,
    /// Fraction of canvas height kept below the match row (clamped to `[0.1, 0.4]`).
    pub match_row_margin_ratio: f64,
    /// Draw the live clock block (preview only).
    pub include_date_time: bool,
    /// Upcoming fixtures; only the first six are drawn.
    pub matches: Vec<Match>,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            canvas_width: 1080,
            canvas_height: 1920,
            theme_id: None,
            patch_enabled: true,
            patch_image_ref: None,
            custom_text: String::new(),
            font_id: FontId::default(),
            font_size_multiplier: 1.0,
            text_color: Rgba8::rgb(255, 255, 255),
            patch_position_ratio: 0.4,
            match_row_margin_ratio: 0.15,
            include_date_time: false,
            matches: Vec::new(),
        }
    }
}

impl RenderRequest {
    /// Parse a request from JSON text.
    pub fn from_json_str(s: &str) -> FanwallResult<Self> {
        serde_json::from_str(s).map_err(|e| FanwallError::serde(format!("render request: {e}")))
    }

    /// Load a request from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> FanwallResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read render request '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Validated canvas dimensions.
    pub fn canvas(&self) -> FanwallResult<Canvas> {
        Canvas::new(self.canvas_width, self.canvas_height)
    }

    /// Text actually rendered: truncated, with the fallback label for empty input.
    pub fn effective_text(&self) -> String {
        if self.custom_text.trim().is_empty() {
            return FALLBACK_LABEL.to_string();
        }
        self.custom_text
            .chars()
            .take(MAX_CUSTOM_TEXT_CHARS)
            .collect()
    }

    /// Multiplier clamped to [`FONT_SIZE_MULTIPLIER_RANGE`].
    pub fn effective_font_multiplier(&self) -> f64 {
        let (lo, hi) = FONT_SIZE_MULTIPLIER_RANGE;
        crate::foundation::math::clamp_f64(self.font_size_multiplier, lo, hi)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/request.rs"]
mod tests;

use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{FanwallError, FanwallResult};
use crate::model::request::Match;

/// Gradient geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientShape {
    /// Gradient along a straight line across the canvas.
    #[default]
    Linear,
    /// Gradient radiating from the canvas center.
    Radial,
}

/// Direction tag of a linear gradient, CSS style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    /// Top edge to bottom edge.
    #[default]
    ToBottom,
    /// Bottom edge to top edge.
    ToTop,
    /// Left edge to right edge.
    ToRight,
    /// Right edge to left edge.
    ToLeft,
    /// Top-left corner to bottom-right corner.
    ToBottomRight,
    /// Top-right corner to bottom-left corner.
    ToBottomLeft,
    /// Bottom-left corner to top-right corner.
    ToTopRight,
    /// Bottom-right corner to top-left corner.
    ToTopLeft,
}

/// A single `(position, color)` gradient stop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorStop {
    /// Offset along the gradient in `[0, 1]`.
    pub position: f64,
    /// Stop color.
    pub color: Rgba8,
}

/// Procedural gradient description.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientSpec {
    /// Linear or radial.
    #[serde(default)]
    pub shape: GradientShape,
    /// Direction for linear gradients; ignored for radial ones.
    #[serde(default)]
    pub direction: GradientDirection,
    /// Ordered stops; empty means the built-in brand gradient.
    #[serde(default)]
    pub stops: Vec<ColorStop>,
}

/// Background source of a theme.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThemeKind {
    /// Procedural gradient.
    Gradient(GradientSpec),
    /// Bundled or remote bitmap.
    Image {
        /// Image reference passed to the asset loader.
        file_ref: String,
    },
}

/// Decorative overlay routine selected by a gradient theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectsTag {
    /// Scattered translucent arcs.
    Arcs,
    /// Parallel curved strokes sweeping across the canvas.
    Sweeps,
    /// Soft radial flares.
    Flares,
    /// Tags this build does not know; drawn as no overlay.
    #[serde(other)]
    Unknown,
}

/// One entry of the theme catalog.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ThemeDescriptor {
    /// Catalog id referenced by requests.
    pub id: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Gradient or image source.
    #[serde(flatten)]
    pub kind: ThemeKind,
    /// Optional decorative overlay.
    #[serde(default)]
    pub effects_tag: Option<EffectsTag>,
}

/// One entry of the patch catalog.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PatchDescriptor {
    /// Catalog id referenced by requests.
    pub id: String,
    /// Image reference passed to the asset loader.
    pub file_ref: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
}

/// Source of background themes.
pub trait ThemeCatalog {
    /// List every available theme.
    fn list_themes(&self) -> FanwallResult<Vec<ThemeDescriptor>>;
}

/// Source of patch emblems.
pub trait PatchCatalog {
    /// List every available patch.
    fn list_patches(&self) -> FanwallResult<Vec<PatchDescriptor>>;
}

/// Source of upcoming fixtures, sorted ascending by kickoff.
pub trait MatchProvider {
    /// Return at most `n` upcoming matches.
    fn next_matches(&self, n: usize) -> FanwallResult<Vec<Match>>;
}

impl ThemeCatalog for Vec<ThemeDescriptor> {
    fn list_themes(&self) -> FanwallResult<Vec<ThemeDescriptor>> {
        Ok(self.clone())
    }
}

impl PatchCatalog for Vec<PatchDescriptor> {
    fn list_patches(&self) -> FanwallResult<Vec<PatchDescriptor>> {
        Ok(self.clone())
    }
}

impl MatchProvider for Vec<Match> {
    fn next_matches(&self, n: usize) -> FanwallResult<Vec<Match>> {
        Ok(self.iter().take(n).cloned().collect())
    }
}

/// Immutable snapshot of both catalogs, taken once per session.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    themes: Vec<ThemeDescriptor>,
    patches: Vec<PatchDescriptor>,
}

impl Catalog {
    /// Build a snapshot from already-listed entries.
    pub fn new(themes: Vec<ThemeDescriptor>, patches: Vec<PatchDescriptor>) -> Self {
        Self { themes, patches }
    }

    /// Snapshot both providers. A failing provider contributes an empty list.
    pub fn from_providers(themes: &dyn ThemeCatalog, patches: &dyn PatchCatalog) -> Self {
        let themes = themes.list_themes().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "theme catalog unavailable, using built-in gradient only");
            Vec::new()
        });
        let patches = patches.list_patches().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "patch catalog unavailable");
            Vec::new()
        });
        Self { themes, patches }
    }

    /// All themes.
    pub fn themes(&self) -> &[ThemeDescriptor] {
        &self.themes
    }

    /// All patches.
    pub fn patches(&self) -> &[PatchDescriptor] {
        &self.patches
    }

    /// Resolve a theme id.
    pub fn theme(&self, id: &str) -> FanwallResult<&ThemeDescriptor> {
        self.themes
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| FanwallError::theme_resolution(format!("unknown theme '{id}'")))
    }

    /// Resolve a patch id.
    pub fn patch(&self, id: &str) -> Option<&PatchDescriptor> {
        self.patches.iter().find(|p| p.id == id)
    }
}

/// Load a JSON array of catalog entries or matches from disk.
pub fn load_json_list<T: serde::de::DeserializeOwned>(
    path: impl AsRef<Path>,
) -> FanwallResult<Vec<T>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read catalog '{}'", path.display()))?;
    serde_json::from_str(&text)
        .map_err(|e| FanwallError::serde(format!("catalog '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/model/catalog.rs"]
mod tests;

//! Fanwall composites personalized supporter wallpapers for phones.
//!
//! A single [`RenderRequest`] describes the wallpaper: background theme, patch emblem, custom
//! text, optional live clock and the upcoming fixtures. The [`Compositor`] draws it in one
//! deterministic pass onto a CPU surface:
//!
//! - background (gradient or cover-scaled image) and an optional decorative overlay
//! - circular patch with a gold ring
//! - styled custom text, then the optional date/time block
//! - the match schedule row and the footer tagline
//!
//! Asset, theme, font and timestamp failures degrade to fallbacks inside the frame; only an
//! unusable surface aborts a pass. [`PreviewSession`] adds latest-request-wins scheduling on top.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod encode;
pub(crate) mod layout;
pub(crate) mod model;
pub(crate) mod render;
pub(crate) mod session;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Circle, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{FanwallError, FanwallResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::fonts::{DirFontProvider, FontCache, FontProvider, NoFonts, RetryPolicy};
pub use crate::assets::glyph::{GLYPH_SIZE, create_fallback_glyph, initials};
#[cfg(feature = "http")]
pub use crate::assets::loader::HttpFetcher;
pub use crate::assets::loader::{
    AssetLoader, DirFetcher, FetchMode, ImageFetcher, LoadedImage, MemoryFetcher, SourceFetcher,
};
pub use crate::encode::png::{encode_png, write_png};
pub use crate::layout::solver::{Layout, compute_layout};
pub use crate::model::catalog::{
    Catalog, ColorStop, EffectsTag, GradientDirection, GradientShape, GradientSpec, MatchProvider,
    PatchCatalog, PatchDescriptor, ThemeCatalog, ThemeDescriptor, ThemeKind, load_json_list,
};
pub use crate::model::color::parse_hex;
pub use crate::model::request::{
    FALLBACK_LABEL, FontId, MAX_CUSTOM_TEXT_CHARS, Match, RenderRequest,
};
pub use crate::render::background::{FillStyle, default_gradient};
pub use crate::render::clock::{
    Clock, DISPLAY_TZ, FixedClock, SystemClock, TBD, format_clock_time, format_long_date,
    format_match_date, format_match_time,
};
pub use crate::render::frame::{Frame, TextRole, TextRun};
pub use crate::render::scene::{Compositor, CompositorOpts, FOOTER_TAGLINE, PassReport};
pub use crate::render::schedule::match_labels;
pub use crate::render::text::{
    DARK_THEME_IDS, FontSpec, LENGTH_BUCKETS, apply_casing, base_font_size, bucket_index,
    font_size_px, font_spec, is_dark_theme,
};
pub use crate::session::preview::PreviewSession;
pub use crate::session::queue::RenderQueue;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assets::fonts::{FontCache, FontProvider, RetryPolicy};
use crate::assets::loader::{AssetLoader, ImageFetcher};
use crate::foundation::core::Canvas;
use crate::foundation::error::FanwallResult;
use crate::layout::solver::{Layout, compute_layout};
use crate::model::catalog::{Catalog, PatchDescriptor};
use crate::model::request::{FontId, RenderRequest};
use crate::render::background::{FillStyle, paint_background, resolve_theme};
use crate::render::clock::{Clock, SystemClock, format_clock_time, format_long_date};
use crate::render::effects::paint_effects;
use crate::render::frame::{Frame, TextRole};
use crate::render::palette::{BRAND_GOLD, ERROR_RED, WHITE};
use crate::render::schedule::draw_match_row;
use crate::render::surface::{
    DrawState, Surface, affine_to_cpu, circle_path, image_placement, prepared_to_image,
};
use crate::render::text::{
    TEXT_SHADOW, TextSpec, apply_casing, dark_outline, draw_text_scoped, font_size_px,
    is_dark_theme,
};

/// Tagline drawn at the bottom of every wallpaper.
pub const FOOTER_TAGLINE: &str = "Matchday Ready";
/// Footer size.
pub const FOOTER_PX: f32 = 32.0;
/// Live clock size.
pub const CLOCK_TIME_PX: f32 = 96.0;
/// Long-form date size.
pub const CLOCK_DATE_PX: f32 = 36.0;
/// Width of the gold ring around the patch.
pub const PATCH_RING_WIDTH: f64 = 8.0;
/// Error placeholder label size.
pub const ERROR_LABEL_PX: f32 = 40.0;

/// Knobs that are fixed for the lifetime of a compositor.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositorOpts {
    /// Seed for decorative effects; `None` seeds from entropy.
    pub effects_seed: Option<u64>,
    /// Retry schedule for font loads.
    pub font_retry: RetryPolicy,
    /// Minimum time between two completed preview passes.
    pub min_render_interval: Duration,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            effects_seed: None,
            font_retry: RetryPolicy::default(),
            min_render_interval: Duration::from_millis(50),
        }
    }
}

/// Summary of one pass, for logging and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct PassReport {
    /// Coordinates used.
    pub layout: Layout,
    /// Background actually painted.
    pub fill: FillStyle,
    /// Whether an effects overlay was drawn.
    pub effects: bool,
    /// Whether the patch slot was reserved (enabled and resolvable).
    pub patch_slot: bool,
    /// Whether the patch image itself was drawn.
    pub patch_drawn: bool,
}

/// Draws wallpapers.
///
/// Owns the drawing surface, the asset and font caches, and the effects RNG. Every call to
/// [`Compositor::render`] is one complete pass that starts from a reset surface.
pub struct Compositor {
    catalog: Catalog,
    loader: AssetLoader,
    fonts: FontCache,
    clock: Box<dyn Clock>,
    rng: StdRng,
    surface: Option<Surface>,
    opts: CompositorOpts,
    last_report: Option<PassReport>,
}

impl Compositor {
    /// Compositor over a catalog snapshot, an image source and a font source.
    pub fn new(
        catalog: Catalog,
        fetcher: impl ImageFetcher + 'static,
        fonts: impl FontProvider + 'static,
        opts: CompositorOpts,
    ) -> Self {
        let rng = match opts.effects_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog,
            loader: AssetLoader::new(fetcher),
            fonts: FontCache::new(fonts, opts.font_retry),
            clock: Box::new(SystemClock),
            rng,
            surface: None,
            opts,
            last_report: None,
        }
    }

    /// Replace the clock used by the date/time block.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Catalog snapshot.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Options this compositor was built with.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Report of the most recent successful pass.
    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    /// Render a preview frame, including the date/time block if requested.
    ///
    /// Only `FanwallError::SurfaceUnavailable` is returned; every other failure degrades to a
    /// fallback inside the frame.
    pub fn render(&mut self, req: &RenderRequest) -> FanwallResult<Frame> {
        self.render_pass(req, req.include_date_time)
    }

    /// Render the frame handed to the export collaborator: never includes the date/time block.
    pub fn render_export(&mut self, req: &RenderRequest) -> FanwallResult<Frame> {
        self.render_pass(req, false)
    }

    #[tracing::instrument(
        skip_all,
        fields(w = req.canvas_width, h = req.canvas_height, export = !with_clock)
    )]
    fn render_pass(&mut self, req: &RenderRequest, with_clock: bool) -> FanwallResult<Frame> {
        let canvas = req.canvas()?;
        let mut surface = match self.surface.take() {
            Some(s) if s.canvas() == canvas => s,
            _ => Surface::new(canvas)?,
        };

        surface.reset();
        let layout = compute_layout(canvas, req.patch_position_ratio, req.match_row_margin_ratio);

        let theme = resolve_theme(&self.catalog, req.theme_id.as_deref()).cloned();
        let fill = paint_background(&mut surface, &mut self.loader, theme.as_ref());
        let effects = paint_effects(&mut surface, theme.as_ref(), &mut self.rng);

        let patch = if req.patch_enabled {
            resolve_patch(&self.catalog, req.patch_image_ref.as_deref()).cloned()
        } else {
            None
        };
        let patch_drawn = patch
            .as_ref()
            .is_some_and(|p| self.draw_patch(&mut surface, &layout, p));

        let dark = is_dark_theme(theme.as_ref().map(|t| t.id.as_str()));
        self.draw_custom_text(&mut surface, &layout, req, patch.is_some(), dark);

        if with_clock {
            self.draw_date_time(&mut surface, &layout, req, dark);
        }

        if !req.matches.is_empty() {
            draw_match_row(
                &mut surface,
                &mut self.loader,
                &mut self.fonts,
                &layout,
                &req.matches,
                req.text_color,
            );
        }

        self.draw_footer(&mut surface, &layout, req, dark);

        let frame = surface.snapshot();
        self.surface = Some(surface);

        let report = PassReport {
            layout,
            fill,
            effects,
            patch_slot: patch.is_some(),
            patch_drawn,
        };
        tracing::debug!(
            fill = ?report.fill,
            effects = report.effects,
            patch_slot = report.patch_slot,
            patch_drawn = report.patch_drawn,
            "pass complete"
        );
        self.last_report = Some(report);
        Ok(frame)
    }

    fn draw_patch(
        &mut self,
        surface: &mut Surface,
        layout: &Layout,
        patch: &PatchDescriptor,
    ) -> bool {
        let loaded = match self.loader.load_image(&patch.file_ref) {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(
                    patch = %patch.id,
                    error = %e,
                    "patch unavailable, slot left empty"
                );
                return false;
            }
        };
        let img = match prepared_to_image(&loaded.image) {
            Ok(i) => i,
            Err(e) => {
                tracing::warn!(
                    patch = %patch.id,
                    error = %e,
                    "patch not drawable, slot left empty"
                );
                return false;
            }
        };

        let (cx, cy, r) = (layout.center_x, layout.patch_center_y, layout.patch_radius);
        let (iw, ih) = (loaded.image.width, loaded.image.height);
        let scale = 2.0 * r / f64::from(iw.max(ih).max(1));
        let place = image_placement(iw, ih, scale, cx, cy);

        surface.scoped(DrawState::default(), |s| {
            s.draw(|ctx| {
                let disc = circle_path(cx, cy, r);
                ctx.push_clip_layer(&disc);
                ctx.set_transform(affine_to_cpu(place));
                ctx.set_paint(img);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(iw),
                    f64::from(ih),
                ));
                ctx.pop_layer();

                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(BRAND_GOLD.to_cpu());
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(PATCH_RING_WIDTH));
                ctx.stroke_path(&disc);
            });
            if loaded.tainted {
                s.mark_tainted();
            }
        });
        true
    }

    fn draw_custom_text(
        &mut self,
        surface: &mut Surface,
        layout: &Layout,
        req: &RenderRequest,
        patch_shown: bool,
        dark: bool,
    ) {
        let raw = req.effective_text();
        let size = font_size_px(
            req.font_id,
            raw.chars().count(),
            req.effective_font_multiplier(),
        );
        let text = apply_casing(req.font_id, &raw);
        let spec = TextSpec::styled(TextRole::Custom, &text, req.font_id, size)
            .at(layout.center_x, layout.text_y(patch_shown))
            .color(req.text_color);
        let state = DrawState {
            shadow: Some(TEXT_SHADOW),
            outline: dark.then(dark_outline),
            ..DrawState::default()
        };
        draw_text_scoped(surface, &mut self.fonts, state, &spec);
    }

    fn draw_date_time(
        &mut self,
        surface: &mut Surface,
        layout: &Layout,
        req: &RenderRequest,
        dark: bool,
    ) {
        let now = self.clock.now();
        let state = DrawState {
            outline: dark.then(dark_outline),
            ..DrawState::default()
        };

        let time = format_clock_time(now);
        let mut time_spec = TextSpec::styled(TextRole::Time, &time, FontId::Inter, CLOCK_TIME_PX)
            .at(layout.center_x, layout.time_y)
            .color(req.text_color);
        time_spec.letter_spacing = 0.0;
        draw_text_scoped(surface, &mut self.fonts, state, &time_spec);

        let date = format_long_date(now);
        let mut date_spec = TextSpec::styled(TextRole::Date, &date, FontId::Inter, CLOCK_DATE_PX)
            .at(layout.center_x, layout.date_y)
            .color(req.text_color);
        date_spec.bold = false;
        draw_text_scoped(surface, &mut self.fonts, state, &date_spec);
    }

    fn draw_footer(
        &mut self,
        surface: &mut Surface,
        layout: &Layout,
        req: &RenderRequest,
        dark: bool,
    ) {
        let text = apply_casing(req.font_id, FOOTER_TAGLINE);
        let spec = TextSpec::styled(TextRole::Footer, &text, req.font_id, FOOTER_PX)
            .at(layout.center_x, layout.footer_y)
            .color(req.text_color);
        let state = DrawState {
            outline: dark.then(dark_outline),
            ..DrawState::default()
        };
        draw_text_scoped(surface, &mut self.fonts, state, &spec);
    }

    /// Flat red frame with a short diagnostic label, shown when a pass cannot run at all.
    pub fn render_error_frame(&mut self, canvas: Canvas, message: &str) -> Frame {
        let mut surface = match Surface::new(canvas) {
            Ok(s) => s,
            Err(_) => return fallback_error_frame(canvas, message),
        };
        surface.fill(ERROR_RED);

        let label: String = message.chars().take(60).collect();
        let cx = f64::from(canvas.width) / 2.0;
        let cy = f64::from(canvas.height) / 2.0;
        let spec = TextSpec::styled(TextRole::Error, &label, FontId::Inter, ERROR_LABEL_PX)
            .at(cx, cy)
            .color(WHITE);
        draw_text_scoped(&mut surface, &mut self.fonts, DrawState::default(), &spec);
        surface.snapshot()
    }
}

/// Resolve a patch reference by catalog id, or by file reference.
pub(crate) fn resolve_patch<'a>(
    catalog: &'a Catalog,
    patch_ref: Option<&str>,
) -> Option<&'a PatchDescriptor> {
    let r = patch_ref.map(str::trim).filter(|s| !s.is_empty())?;
    let found = catalog
        .patch(r)
        .or_else(|| catalog.patches().iter().find(|p| p.file_ref == r));
    if found.is_none() {
        tracing::warn!(patch_ref = r, "patch reference not in catalog");
    }
    found
}

fn fallback_error_frame(canvas: Canvas, message: &str) -> Frame {
    let px = ERROR_RED.premul().to_array();
    let data: Vec<u8> = std::iter::repeat_n(px, canvas.area()).flatten().collect();
    Frame {
        width: canvas.width,
        height: canvas.height,
        data: std::sync::Arc::new(data),
        tainted: false,
        text_log: vec![crate::render::frame::TextRun {
            role: TextRole::Error,
            text: message.to_string(),
            font_px: ERROR_LABEL_PX,
            letter_spacing: 0.0,
            outlined: false,
            center: crate::foundation::core::Point::new(
                f64::from(canvas.width) / 2.0,
                f64::from(canvas.height) / 2.0,
            ),
        }],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;

use crate::foundation::core::Canvas;
use crate::foundation::math::clamp_f64;

/// Accepted range for the patch anchor ratio.
pub const PATCH_POSITION_RANGE: (f64, f64) = (0.2, 0.8);
/// Accepted range for the match-row bottom margin ratio.
pub const MATCH_ROW_MARGIN_RANGE: (f64, f64) = (0.1, 0.4);

/// Patch radius as a fraction of the shorter canvas edge.
pub const PATCH_RADIUS_FRACTION: f64 = 0.2;
/// Custom-text baseline offset below the patch center when the patch is drawn.
pub const PATCH_TEXT_OFFSET: f64 = 330.0;
/// Custom-text baseline offset below the anchor when the patch is hidden.
pub const NO_PATCH_TEXT_OFFSET: f64 = 40.0;

/// Clock baseline distance above the top of the patch circle.
pub const TIME_OFFSET_ABOVE_PATCH: f64 = 120.0;
/// Date baseline distance above the top of the patch circle.
pub const DATE_OFFSET_ABOVE_PATCH: f64 = 60.0;

/// Footer baseline distance from the bottom edge.
pub const FOOTER_MARGIN: f64 = 60.0;
/// Radius of each opponent badge in the match row.
pub const MATCH_LOGO_RADIUS: f64 = 45.0;
/// Height reserved under the badges for the date and time labels.
pub const MATCH_LABEL_BLOCK: f64 = 80.0;
/// Date label baseline below the badge bottom.
pub const MATCH_DATE_GAP: f64 = 35.0;
/// Time label baseline below the badge bottom.
pub const MATCH_TIME_GAP: f64 = 70.0;
/// Estimated full height of the match row.
pub const ESTIMATED_MATCH_ROW_HEIGHT: f64 = 2.0 * MATCH_LOGO_RADIUS + MATCH_LABEL_BLOCK;
/// Clearance kept between the match row and the footer.
pub const MATCH_ROW_BUFFER: f64 = 30.0;
/// Smallest bottom margin the match row may use.
pub const MIN_SAFE_MARGIN: f64 = FOOTER_MARGIN + ESTIMATED_MATCH_ROW_HEIGHT + MATCH_ROW_BUFFER;
/// Fraction of the canvas width spanned by the match row.
pub const MATCH_BAND_FRACTION: f64 = 0.9;
/// Maximum number of matches drawn.
pub const MAX_MATCHES: usize = 6;

/// Every absolute coordinate a render pass needs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Layout {
    /// Target canvas.
    pub canvas: Canvas,
    /// Horizontal center line.
    pub center_x: f64,
    /// Patch ratio after clamping.
    pub patch_position_ratio: f64,
    /// Margin ratio after clamping.
    pub match_row_margin_ratio: f64,
    /// Patch circle center.
    pub patch_center_y: f64,
    /// Patch circle radius.
    pub patch_radius: f64,
    /// Custom-text baseline when the patch is drawn.
    pub text_y_with_patch: f64,
    /// Custom-text baseline when the patch is hidden.
    pub text_y_without_patch: f64,
    /// Clock baseline.
    pub time_y: f64,
    /// Date baseline.
    pub date_y: f64,
    /// Distance between the canvas bottom and the match row bottom.
    pub match_row_bottom_margin: f64,
    /// Bottom edge of the match row.
    pub match_row_bottom_y: f64,
    /// Center line of the opponent badges.
    pub match_logo_center_y: f64,
    /// Badge radius.
    pub match_logo_radius: f64,
    /// Kickoff date baseline.
    pub match_date_y: f64,
    /// Kickoff time baseline.
    pub match_time_y: f64,
    /// Left edge of the match band.
    pub match_band_left: f64,
    /// Width of the match band.
    pub match_band_width: f64,
    /// Footer baseline.
    pub footer_y: f64,
}

impl Layout {
    /// Custom-text baseline for the given patch visibility.
    pub fn text_y(&self, patch_shown: bool) -> f64 {
        if patch_shown {
            self.text_y_with_patch
        } else {
            self.text_y_without_patch
        }
    }

    /// Horizontal badge centers for `n` matches, left to right.
    ///
    /// The band is split into `n` equal slots (at most [`MAX_MATCHES`]); each badge sits in the
    /// middle of its slot.
    pub fn match_slot_centers(&self, n: usize) -> Vec<f64> {
        let n = n.min(MAX_MATCHES);
        if n == 0 {
            return Vec::new();
        }
        let slot = self.match_band_width / n as f64;
        (0..n)
            .map(|i| self.match_band_left + slot * (i as f64 + 0.5))
            .collect()
    }
}

/// Derive the full coordinate set from canvas size and the two position ratios.
///
/// Pure and deterministic: identical inputs always give identical layouts.
#[tracing::instrument(level = "trace")]
pub fn compute_layout(
    canvas: Canvas,
    patch_position_ratio: f64,
    match_row_margin_ratio: f64,
) -> Layout {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);

    let patch_ratio = clamp_f64(
        patch_position_ratio,
        PATCH_POSITION_RANGE.0,
        PATCH_POSITION_RANGE.1,
    );
    let margin_ratio = clamp_f64(
        match_row_margin_ratio,
        MATCH_ROW_MARGIN_RANGE.0,
        MATCH_ROW_MARGIN_RANGE.1,
    );

    let patch_center_y = h * patch_ratio;
    let patch_radius = w.min(h) * PATCH_RADIUS_FRACTION;
    let patch_top = patch_center_y - patch_radius;

    let computed_margin = margin_ratio * h;
    let match_row_bottom_margin = computed_margin
        .min(h - MIN_SAFE_MARGIN)
        .max(MIN_SAFE_MARGIN);
    let match_row_bottom_y = h - match_row_bottom_margin;
    let match_logo_center_y = match_row_bottom_y - MATCH_LABEL_BLOCK - MATCH_LOGO_RADIUS;
    let badge_bottom = match_logo_center_y + MATCH_LOGO_RADIUS;

    let match_band_width = w * MATCH_BAND_FRACTION;

    Layout {
        canvas,
        center_x: w / 2.0,
        patch_position_ratio: patch_ratio,
        match_row_margin_ratio: margin_ratio,
        patch_center_y,
        patch_radius,
        text_y_with_patch: patch_center_y + PATCH_TEXT_OFFSET,
        text_y_without_patch: patch_center_y + NO_PATCH_TEXT_OFFSET,
        time_y: patch_top - TIME_OFFSET_ABOVE_PATCH,
        date_y: patch_top - DATE_OFFSET_ABOVE_PATCH,
        match_row_bottom_margin,
        match_row_bottom_y,
        match_logo_center_y,
        match_logo_radius: MATCH_LOGO_RADIUS,
        match_date_y: badge_bottom + MATCH_DATE_GAP,
        match_time_y: badge_bottom + MATCH_TIME_GAP,
        match_band_left: (w - match_band_width) / 2.0,
        match_band_width,
        footer_y: h - FOOTER_MARGIN,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;

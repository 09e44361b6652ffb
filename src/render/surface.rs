use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, BezPath, Canvas, Rgba8, Vec2};
use crate::foundation::error::{FanwallError, FanwallResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::frame::{Frame, TextRun};
use crate::render::palette::BLACK;

/// Blurred, offset copy of an element painted beneath it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shadow {
    pub(crate) color: Rgba8,
    pub(crate) offset: Vec2,
    pub(crate) blur_radius: u32,
    pub(crate) sigma: f32,
}

/// Stroke painted beneath a glyph fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Outline {
    pub(crate) color: Rgba8,
    pub(crate) width: f64,
}

/// Transient per-element drawing state.
///
/// The surface holds exactly one of these. [`Surface::scoped`] installs a state for the duration
/// of one element and resets it to the default on both sides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawState {
    pub(crate) alpha: f32,
    pub(crate) shadow: Option<Shadow>,
    pub(crate) outline: Option<Outline>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            shadow: None,
            outline: None,
        }
    }
}

impl DrawState {
    pub(crate) fn with_alpha(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct BlurKernelKey {
    radius_px: u32,
    sigma_bits: u32,
}

/// The frame buffer and drawing context owned by one render pass at a time.
///
/// `vello_cpu` renders into a fresh buffer, so every element is drawn into a scratch layer and then
/// composited premultiplied-over onto the frame. No rasterizer state survives between elements.
pub(crate) struct Surface {
    canvas: Canvas,
    frame: vello_cpu::Pixmap,
    layer: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    state: DrawState,
    blur_kernels: HashMap<BlurKernelKey, Arc<Vec<u32>>>,
    blur_scratch_a: Vec<u8>,
    blur_scratch_b: Vec<u8>,
    tainted: bool,
    text_log: Vec<TextRun>,
}

impl Surface {
    pub(crate) fn new(canvas: Canvas) -> FanwallResult<Self> {
        let (w, h) = dims_u16(canvas)?;
        let mut out = Self {
            canvas,
            frame: vello_cpu::Pixmap::new(w, h),
            layer: vello_cpu::Pixmap::new(w, h),
            ctx: vello_cpu::RenderContext::new(w, h),
            state: DrawState::default(),
            blur_kernels: HashMap::new(),
            blur_scratch_a: Vec::new(),
            blur_scratch_b: Vec::new(),
            tainted: false,
            text_log: Vec::new(),
        };
        out.reset();
        Ok(out)
    }

    pub(crate) fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Opaque black, default state, empty text log.
    pub(crate) fn reset(&mut self) {
        clear_pixmap(&mut self.frame, BLACK.premul().to_array());
        clear_pixmap_to_transparent(&mut self.layer);
        self.reset_ctx();
        self.state = DrawState::default();
        self.tainted = false;
        self.text_log.clear();
    }

    /// Flat opaque fill of the whole frame.
    pub(crate) fn fill(&mut self, color: Rgba8) {
        clear_pixmap(&mut self.frame, color.premul().to_array());
    }

    /// Transparent frame, for off-screen badges.
    pub(crate) fn clear_to_transparent(&mut self) {
        clear_pixmap_to_transparent(&mut self.frame);
    }

    pub(crate) fn state(&self) -> &DrawState {
        &self.state
    }

    /// Run `f` with `state` installed, resetting to the default before and after.
    pub(crate) fn scoped<R>(&mut self, state: DrawState, f: impl FnOnce(&mut Self) -> R) -> R {
        self.state = DrawState::default();
        self.reset_ctx();
        self.state = state;
        let out = f(self);
        self.state = DrawState::default();
        self.reset_ctx();
        out
    }

    /// Draw one layer with `f` and composite it onto the frame at the current alpha.
    pub(crate) fn draw(&mut self, f: impl FnOnce(&mut vello_cpu::RenderContext)) {
        self.render_layer(f);
        premul_over_in_place_opacity(
            self.frame.data_as_u8_slice_mut(),
            self.layer.data_as_u8_slice(),
            self.state.alpha,
        );
    }

    /// Draw one layer with `f`, blur it, and composite it at the current alpha.
    pub(crate) fn draw_blurred(
        &mut self,
        radius_px: u32,
        sigma: f32,
        f: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> FanwallResult<()> {
        self.render_layer(f);

        let key = BlurKernelKey {
            radius_px,
            sigma_bits: sigma.to_bits(),
        };
        let kernel = match self.blur_kernels.get(&key) {
            Some(k) => k.clone(),
            None => {
                let k = Arc::new(gaussian_kernel_q16(radius_px, sigma)?);
                self.blur_kernels.insert(key, k.clone());
                k
            }
        };

        let expected = self.canvas.area().saturating_mul(4);
        self.blur_scratch_a.resize(expected, 0);
        self.blur_scratch_b.resize(expected, 0);
        blur_rgba8_premul_q16(
            self.layer.data_as_u8_slice(),
            &mut self.blur_scratch_b,
            &mut self.blur_scratch_a,
            self.canvas.width,
            self.canvas.height,
            &kernel,
        );
        premul_over_in_place_opacity(
            self.frame.data_as_u8_slice_mut(),
            &self.blur_scratch_b,
            self.state.alpha,
        );
        Ok(())
    }

    pub(crate) fn mark_tainted(&mut self) {
        self.tainted = true;
    }

    pub(crate) fn record_text(&mut self, run: TextRun) {
        self.text_log.push(run);
    }

    /// Snapshot the current frame buffer.
    pub(crate) fn snapshot(&self) -> Frame {
        Frame {
            width: self.canvas.width,
            height: self.canvas.height,
            data: Arc::new(self.frame.data_as_u8_slice().to_vec()),
            tainted: self.tainted,
            text_log: self.text_log.clone(),
        }
    }

    fn render_layer(&mut self, f: impl FnOnce(&mut vello_cpu::RenderContext)) {
        self.reset_ctx();
        f(&mut self.ctx);
        self.ctx.flush();
        clear_pixmap_to_transparent(&mut self.layer);
        self.ctx.render_to_pixmap(&mut self.layer);
        self.reset_ctx();
    }

    fn reset_ctx(&mut self) {
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

fn dims_u16(canvas: Canvas) -> FanwallResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| FanwallError::surface_unavailable("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| FanwallError::surface_unavailable("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(FanwallError::surface_unavailable(
            "surface dimensions must be positive",
        ));
    }
    Ok((w, h))
}

pub(crate) fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba_premul: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba_premul);
    }
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Circle outline as a `vello_cpu` path.
pub(crate) fn circle_path(cx: f64, cy: f64, r: f64) -> vello_cpu::kurbo::BezPath {
    use kurbo::Shape;
    bezpath_to_cpu(&kurbo::Circle::new((cx, cy), r).to_path(0.1))
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> FanwallResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| FanwallError::image_load("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FanwallError::image_load("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(FanwallError::image_load("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> FanwallResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn prepared_to_image(img: &PreparedImage) -> FanwallResult<vello_cpu::Image> {
    rgba_premul_to_image(&img.rgba8_premul, img.width, img.height)
}

/// Transform drawing a `w` x `h` image at `scale`, centered at `(cx, cy)`.
pub(crate) fn image_placement(w: u32, h: u32, scale: f64, cx: f64, cy: f64) -> Affine {
    let dw = f64::from(w) * scale;
    let dh = f64::from(h) * scale;
    Affine::translate((cx - dw / 2.0, cy - dh / 2.0)) * Affine::scale(scale)
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> FanwallResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FanwallError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

pub(crate) fn blur_rgba8_premul_q16(
    src: &[u8],
    dst: &mut [u8],
    tmp: &mut [u8],
    width: u32,
    height: u32,
    kernel_q16: &[u32],
) {
    if kernel_q16.len() == 1 {
        dst.copy_from_slice(src);
        return;
    }

    horizontal_blur_q16(src, tmp, width, height, kernel_q16);
    vertical_blur_q16(tmp, dst, width, height, kernel_q16);
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

/// `dst = src * opacity over dst`, both premultiplied and of equal length.
pub(crate) fn premul_over_in_place_opacity(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = (opacity.clamp(0.0, 1.0) * 255.0).round() as u16;
    if op == 0 {
        return;
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let s = if op == 255 {
            [s[0], s[1], s[2], s[3]]
        } else {
            [
                mul_div255_u8(u16::from(s[0]), op),
                mul_div255_u8(u16::from(s[1]), op),
                mul_div255_u8(u16::from(s[2]), op),
                mul_div255_u8(u16::from(s[3]), op),
            ]
        };
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = s[3].saturating_add(mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            d[c] = s[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

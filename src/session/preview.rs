use std::sync::Arc;
use std::time::Instant;

use crate::foundation::core::Canvas;
use crate::foundation::error::FanwallResult;
use crate::model::request::RenderRequest;
use crate::render::frame::Frame;
use crate::render::scene::Compositor;
use crate::session::queue::RenderQueue;

/// Canvas used for an error placeholder when no earlier frame fixes the size.
pub const ERROR_CANVAS: (u32, u32) = (1080, 1920);

/// Drives a compositor from a stream of parameter changes.
///
/// Holds the last completed frame, which stays readable while later passes run. A pass that
/// cannot obtain a surface replaces it with an explicit error placeholder.
pub struct PreviewSession {
    compositor: Compositor,
    queue: RenderQueue,
    current: Option<Arc<Frame>>,
    last_error: Option<String>,
    passes: u64,
}

impl PreviewSession {
    /// Session over `compositor`, throttled by its `min_render_interval`.
    pub fn new(compositor: Compositor) -> Self {
        let queue = RenderQueue::new(compositor.opts().min_render_interval);
        Self {
            compositor,
            queue,
            current: None,
            last_error: None,
            passes: 0,
        }
    }

    /// A parameter changed. Returns whether at least one pass ran.
    pub fn request(&mut self, req: RenderRequest, now: Instant) -> bool {
        match self.queue.submit(req, now) {
            Some(start) => {
                self.run(start, now);
                true
            }
            None => false,
        }
    }

    /// Run the pending request if it is due. Returns whether a pass ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.queue.poll(now) {
            Some(start) => {
                self.run(start, now);
                true
            }
            None => false,
        }
    }

    /// Last completed frame (or error placeholder).
    pub fn current(&self) -> Option<Arc<Frame>> {
        self.current.clone()
    }

    /// Diagnostic of the last failed pass, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Completed passes, including failed ones.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Queue state.
    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Compositor state.
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Render the export variant of `req` (no live clock) outside the preview cycle.
    pub fn export(&mut self, req: &RenderRequest) -> FanwallResult<Frame> {
        self.compositor.render_export(req)
    }

    fn run(&mut self, mut req: RenderRequest, now: Instant) {
        loop {
            self.render_one(&req);
            match self.queue.complete(now) {
                Some(next) => req = next,
                None => break,
            }
        }
    }

    fn render_one(&mut self, req: &RenderRequest) {
        self.passes += 1;
        match self.compositor.render(req) {
            Ok(frame) => {
                self.current = Some(Arc::new(frame));
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "render pass aborted");
                let canvas = self
                    .current
                    .as_ref()
                    .and_then(|f| Canvas::new(f.width, f.height).ok())
                    .or_else(|| Canvas::new(ERROR_CANVAS.0, ERROR_CANVAS.1).ok());
                let message = format!("Render failed: {e}");
                if let Some(canvas) = canvas {
                    self.current = Some(Arc::new(
                        self.compositor.render_error_frame(canvas, &message),
                    ));
                }
                self.last_error = Some(message);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview.rs"]
mod tests;

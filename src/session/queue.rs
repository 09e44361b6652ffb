use std::time::{Duration, Instant};

use crate::model::request::RenderRequest;

/// Latest-request-wins scheduler with one in-flight slot and one pending slot.
///
/// A request submitted while a pass is running, or within `min_interval` of the last completed
/// pass, replaces whatever was pending. Nothing is ever queued behind the pending slot.
#[derive(Debug)]
pub struct RenderQueue {
    min_interval: Duration,
    in_flight: bool,
    pending: Option<RenderRequest>,
    last_completed: Option<Instant>,
    superseded: u64,
}

impl RenderQueue {
    /// Empty queue.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            in_flight: false,
            pending: None,
            last_completed: None,
            superseded: 0,
        }
    }

    /// Offer `req`. Returns it back if a pass may start right now (the queue is then in flight);
    /// otherwise it becomes the pending request.
    pub fn submit(&mut self, req: RenderRequest, now: Instant) -> Option<RenderRequest> {
        if self.in_flight || self.cooling_down(now) {
            if self.pending.replace(req).is_some() {
                self.superseded += 1;
                tracing::debug!(superseded = self.superseded, "pending render request replaced");
            } else {
                tracing::debug!(in_flight = self.in_flight, "render request deferred");
            }
            return None;
        }
        self.in_flight = true;
        Some(req)
    }

    /// Mark the in-flight pass finished. A pending request, if any, is returned and starts at once.
    pub fn complete(&mut self, now: Instant) -> Option<RenderRequest> {
        self.in_flight = false;
        self.last_completed = Some(now);
        let next = self.pending.take();
        if next.is_some() {
            self.in_flight = true;
        }
        next
    }

    /// Start the pending request once the minimum interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<RenderRequest> {
        if self.in_flight || self.cooling_down(now) {
            return None;
        }
        let next = self.pending.take();
        if next.is_some() {
            self.in_flight = true;
        }
        next
    }

    /// Whether a pass currently owns the surface.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether a request is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// How many pending requests were replaced before they could start.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    /// Earliest instant at which [`RenderQueue::poll`] can start the pending request.
    pub fn ready_at(&self) -> Option<Instant> {
        if self.pending.is_none() {
            return None;
        }
        Some(
            self.last_completed
                .map_or_else(Instant::now, |t| t + self.min_interval),
        )
    }

    fn cooling_down(&self, now: Instant) -> bool {
        self.last_completed
            .is_some_and(|t| now.saturating_duration_since(t) < self.min_interval)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/queue.rs"]
mod tests;

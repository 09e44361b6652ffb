use super::*;

fn req(text: &str) -> RenderRequest {
    RenderRequest {
        custom_text: text.to_string(),
        ..RenderRequest::default()
    }
}

const GAP: Duration = Duration::from_millis(50);

#[test]
fn idle_queue_starts_immediately() {
    let mut q = RenderQueue::new(GAP);
    let t0 = Instant::now();
    assert_eq!(q.submit(req("a"), t0).unwrap().custom_text, "a");
    assert!(q.is_in_flight());
    assert!(!q.has_pending());
}

#[test]
fn latest_pending_wins_while_in_flight() {
    let mut q = RenderQueue::new(GAP);
    let t0 = Instant::now();
    q.submit(req("a"), t0).unwrap();
    assert!(q.submit(req("b"), t0).is_none());
    assert!(q.submit(req("c"), t0).is_none());
    assert!(q.submit(req("d"), t0).is_none());
    assert_eq!(q.superseded(), 2);

    let next = q.complete(t0 + Duration::from_millis(5)).unwrap();
    assert_eq!(next.custom_text, "d");
    assert!(q.is_in_flight());
    assert!(q.complete(t0 + Duration::from_millis(10)).is_none());
    assert!(!q.is_in_flight());
}

#[test]
fn cooldown_defers_until_interval_elapsed() {
    let mut q = RenderQueue::new(GAP);
    let t0 = Instant::now();
    q.submit(req("a"), t0).unwrap();
    q.complete(t0);

    let soon = t0 + Duration::from_millis(10);
    assert!(q.submit(req("b"), soon).is_none());
    assert_eq!(q.ready_at(), Some(t0 + GAP));
    assert!(q.poll(t0 + Duration::from_millis(49)).is_none());

    let started = q.poll(t0 + GAP).unwrap();
    assert_eq!(started.custom_text, "b");
    assert!(q.is_in_flight());
    assert!(q.poll(t0 + GAP * 3).is_none());
}

#[test]
fn submit_after_cooldown_starts_directly() {
    let mut q = RenderQueue::new(GAP);
    let t0 = Instant::now();
    q.submit(req("a"), t0).unwrap();
    q.complete(t0);
    assert!(q.submit(req("b"), t0 + GAP).is_some());
    assert_eq!(q.ready_at(), None);
}

#[test]
fn zero_interval_never_throttles() {
    let mut q = RenderQueue::new(Duration::ZERO);
    let t0 = Instant::now();
    q.submit(req("a"), t0).unwrap();
    q.complete(t0);
    assert!(q.submit(req("b"), t0).is_some());
}

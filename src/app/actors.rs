use std::time::{Duration, Instant};

/// Redraw bookkeeping. Discrete changes mark a redraw directly; running
/// animations request one frame per `frame_interval`.
pub(crate) struct UiActor {
    needs_redraw: bool,
    last_frame_at: Instant,
    frame_interval: Duration,
}

impl UiActor {
    pub(crate) fn new(now: Instant, frame_interval: Duration) -> Self {
        Self {
            needs_redraw: true,
            last_frame_at: now,
            frame_interval,
        }
    }

    pub(crate) fn mark_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub(crate) fn clear_redraw(&mut self) {
        self.needs_redraw = false;
        self.last_frame_at = Instant::now();
    }

    pub(crate) fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub(crate) fn should_request_animation_frame(&self, animating: bool) -> bool {
        animating && self.last_frame_at.elapsed() >= self.frame_interval
    }

    pub(crate) fn frame_interval(&self) -> Duration {
        self.frame_interval
    }
}

/// How long the loop may sleep: until the controller's next deadline, one
/// animation frame, or the idle poll timeout, whichever is first.
pub(crate) fn select_wake_timeout(
    now: Duration,
    next_deadline: Option<Duration>,
    animating: bool,
    frame_interval: Duration,
    idle_timeout: Duration,
) -> Duration {
    let mut timeout = idle_timeout;
    if let Some(deadline) = next_deadline {
        timeout = timeout.min(deadline.saturating_sub(now));
    }
    if animating {
        timeout = timeout.min(frame_interval);
    }
    timeout
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{UiActor, select_wake_timeout};

    #[test]
    fn ui_actor_redraw_flag_roundtrip() {
        let now = Instant::now();
        let mut actor = UiActor::new(now, Duration::from_millis(33));
        assert!(actor.needs_redraw());
        actor.clear_redraw();
        assert!(!actor.needs_redraw());
        actor.mark_redraw();
        assert!(actor.needs_redraw());
    }

    #[test]
    fn animation_frames_wait_for_the_interval() {
        let mut actor = UiActor::new(Instant::now(), Duration::from_secs(60));
        actor.clear_redraw();
        assert!(!actor.should_request_animation_frame(true));

        let actor = UiActor::new(Instant::now(), Duration::ZERO);
        assert!(actor.should_request_animation_frame(true));
        assert!(!actor.should_request_animation_frame(false));
    }

    #[test]
    fn wake_timeout_prefers_the_earliest_event() {
        let idle = Duration::from_millis(250);
        let frame = Duration::from_millis(33);
        let now = Duration::from_millis(1_000);

        assert_eq!(select_wake_timeout(now, None, false, frame, idle), idle);
        assert_eq!(
            select_wake_timeout(now, Some(Duration::from_millis(1_010)), false, frame, idle),
            Duration::from_millis(10)
        );
        assert_eq!(
            select_wake_timeout(now, Some(Duration::from_millis(900)), false, frame, idle),
            Duration::ZERO
        );
        assert_eq!(select_wake_timeout(now, None, true, frame, idle), frame);
    }
}

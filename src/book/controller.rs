use std::time::Duration;

use tracing::{debug, trace};

use super::confetti::{ConfettiField, DEFAULT_BURST_SIZE};
use super::fit::{ContentFit, ContentMeasure, fit_pages};
use super::history::{CELEBRATION_URL, LaunchParams, NavigationEntry, NavigationHistory, page_url};
use super::layout::{BookTransform, ViewportPx, compute_transform};
use super::state::{BookClasses, BookState, PageView, Phase};
use super::timeline::{Continuation, Timeline};

pub const DECLINE_MESSAGE: &str = "Oops! That button seems broken... 😉";
pub const DECLINE_MESSAGE_COLOR: &str = "#c0392b";

/// Delays that line up with the host's CSS-style transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipTimings {
    pub flip_transition: Duration,
    pub celebration_fade_in: Duration,
    pub celebration_fade_out: Duration,
    pub content_fit_delay: Duration,
    pub response_fade_in: Duration,
    pub confetti_count: usize,
}

impl Default for FlipTimings {
    fn default() -> Self {
        Self {
            flip_transition: Duration::from_millis(500),
            celebration_fade_in: Duration::from_millis(10),
            celebration_fade_out: Duration::from_millis(500),
            content_fit_delay: Duration::from_millis(50),
            response_fade_in: Duration::from_millis(500),
            confetti_count: DEFAULT_BURST_SIZE,
        }
    }
}

/// Where a pointer interaction landed inside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Plain page surface.
    Surface,
    /// An embedded button; never turns the page.
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    Forward { index: usize },
    Backward { index: usize },
    Ignored,
}

/// Celebration overlay classes. `active` is the model; `hidden` and
/// `visible` trail it through the fade delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CelebrationOverlay {
    pub active: bool,
    pub hidden: bool,
    pub visible: bool,
}

impl Default for CelebrationOverlay {
    fn default() -> Self {
        Self {
            active: false,
            hidden: true,
            visible: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeclineMarker {
    pub broken: bool,
    pub message: Option<&'static str>,
    pub message_color: Option<&'static str>,
    pub message_opacity: f32,
    pub presses: usize,
}

/// What `advance` changed, so the host knows whether to redraw or measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceOutcome {
    pub changed: bool,
    pub fit_requested: bool,
}

/// Page-flip view-state machine. `BookState` is the single source of truth;
/// every visual the host draws is derived from it on demand.
#[derive(Debug, Clone)]
pub struct BookViewController {
    state: BookState,
    preview: bool,
    timings: FlipTimings,
    history: NavigationHistory,
    timeline: Timeline,
    celebration: CelebrationOverlay,
    confetti: ConfettiField,
    decline: DeclineMarker,
    viewport: Option<ViewportPx>,
    transform: Option<BookTransform>,
    fits: Vec<Option<ContentFit>>,
}

impl BookViewController {
    /// Builds the controller for a freshly loaded page. `query` is the launch
    /// URL's query string; it becomes the URL of the initial history entry.
    pub fn load(total_pages: usize, query: &str, timings: FlipTimings, now: Duration) -> Self {
        Self::load_with_confetti(total_pages, query, timings, ConfettiField::default(), now)
    }

    pub fn load_with_confetti(
        total_pages: usize,
        query: &str,
        timings: FlipTimings,
        confetti: ConfettiField,
        now: Duration,
    ) -> Self {
        let params = LaunchParams::from_query(query);
        let initial_page = params.resolve_page(total_pages);
        let mut controller = Self {
            state: BookState::new(total_pages, initial_page),
            preview: params.preview,
            timings,
            history: NavigationHistory::new(NavigationEntry::default(), ""),
            timeline: Timeline::default(),
            celebration: CelebrationOverlay::default(),
            confetti,
            decline: DeclineMarker::default(),
            viewport: None,
            transform: None,
            fits: vec![None; total_pages],
        };
        controller
            .history
            .replace(NavigationEntry::page(initial_page), query);
        debug!(
            total_pages,
            initial_page,
            preview = controller.preview,
            "book loaded"
        );
        controller.jump(initial_page, now);
        controller
    }

    /// Forces preview padding regardless of the launch query.
    pub fn set_preview(&mut self, preview: bool, now: Duration) {
        if self.preview == preview {
            return;
        }
        self.preview = preview;
        self.refresh_layout(now);
    }

    pub fn click_page(&mut self, index: usize, target: ClickTarget, now: Duration) -> FlipOutcome {
        if target == ClickTarget::Control {
            trace!(index, "click on embedded control ignored");
            return FlipOutcome::Ignored;
        }

        let current = self.state.current_page();
        if index == current && index < self.state.total_pages() {
            let Some(index) = self.state.flip_forward() else {
                return FlipOutcome::Ignored;
            };
            self.push_page_entry();
            self.refresh_layout(now);
            debug!(index, current_page = self.state.current_page(), "flipped forward");
            return FlipOutcome::Forward { index };
        }

        if current > 0 && index == current - 1 {
            let Some(index) = self.state.flip_backward() else {
                return FlipOutcome::Ignored;
            };
            self.timeline.schedule(
                now,
                self.timings.flip_transition,
                Continuation::ReleaseZHold { index },
            );
            self.push_page_entry();
            self.refresh_layout(now);
            debug!(index, current_page = self.state.current_page(), "flipped backward");
            return FlipOutcome::Backward { index };
        }

        trace!(index, current, "click on non-adjacent page ignored");
        FlipOutcome::Ignored
    }

    /// Flips whichever page sits on top of the right-hand stack.
    pub fn flip_next(&mut self, now: Duration) -> FlipOutcome {
        self.click_page(self.state.current_page(), ClickTarget::Surface, now)
    }

    /// Flips whichever page sits on top of the left-hand stack.
    pub fn flip_previous(&mut self, now: Duration) -> FlipOutcome {
        match self.state.current_page().checked_sub(1) {
            Some(index) => self.click_page(index, ClickTarget::Surface, now),
            None => FlipOutcome::Ignored,
        }
    }

    /// Restores the view from a history entry. A missing entry stands for the
    /// cover with the overlay closed.
    pub fn pop_state(&mut self, entry: Option<NavigationEntry>, now: Duration) {
        let entry = entry.unwrap_or_default();
        debug!(page = entry.page, celebration = entry.celebration, "history pop");

        if entry.celebration {
            self.celebration.active = true;
            self.celebration.hidden = false;
            self.timeline.schedule(
                now,
                self.timings.celebration_fade_in,
                Continuation::RevealCelebration {
                    launch_confetti: false,
                },
            );
        } else {
            self.celebration.active = false;
            self.celebration.visible = false;
            self.timeline.schedule(
                now,
                self.timings.celebration_fade_out,
                Continuation::HideCelebration,
            );
        }

        self.jump(entry.page, now);
    }

    /// Moves one step back in history. `false` when there is nowhere to go.
    pub fn history_back(&mut self, now: Duration) -> bool {
        match self.history.back() {
            Some(entry) => {
                self.pop_state(Some(entry), now);
                true
            }
            None => false,
        }
    }

    pub fn history_forward(&mut self, now: Duration) -> bool {
        match self.history.forward() {
            Some(entry) => {
                self.pop_state(Some(entry), now);
                true
            }
            None => false,
        }
    }

    /// The "yes" control. Never touches the page position.
    pub fn accept(&mut self, now: Duration) {
        self.history.push(
            NavigationEntry::celebration(self.state.current_page()),
            CELEBRATION_URL,
        );
        self.celebration.active = true;
        self.celebration.hidden = false;
        self.timeline.schedule(
            now,
            self.timings.celebration_fade_in,
            Continuation::RevealCelebration {
                launch_confetti: true,
            },
        );
        debug!(current_page = self.state.current_page(), "celebration accepted");
    }

    /// The "no" control. Purely cosmetic: marks the control broken and shows
    /// a fixed message.
    pub fn decline(&mut self, now: Duration) {
        self.decline.broken = true;
        self.decline.message = Some(DECLINE_MESSAGE);
        self.decline.message_color = Some(DECLINE_MESSAGE_COLOR);
        self.decline.message_opacity = 0.0;
        self.decline.presses = self.decline.presses.saturating_add(1);
        self.timeline.schedule(
            now,
            self.timings.response_fade_in,
            Continuation::RevealResponse,
        );
        trace!(presses = self.decline.presses, "decline pressed");
    }

    pub fn resize(&mut self, viewport: ViewportPx, now: Duration) {
        self.viewport = Some(viewport);
        self.refresh_layout(now);
    }

    /// Runs every continuation due at `now` and retires finished confetti.
    pub fn advance(&mut self, now: Duration) -> AdvanceOutcome {
        let mut outcome = AdvanceOutcome::default();
        for (due, continuation) in self.timeline.take_due(now) {
            match continuation {
                Continuation::ReleaseZHold { index } => {
                    self.state.release_hold(index);
                    outcome.changed = true;
                }
                Continuation::RevealCelebration { launch_confetti } => {
                    if self.celebration.active {
                        self.celebration.visible = true;
                        if launch_confetti {
                            self.confetti.burst(due, self.timings.confetti_count);
                        }
                        outcome.changed = true;
                    }
                }
                Continuation::HideCelebration => {
                    if !self.celebration.active {
                        self.celebration.hidden = true;
                        outcome.changed = true;
                    }
                }
                Continuation::RevealResponse => {
                    self.decline.message_opacity = 1.0;
                    outcome.changed = true;
                }
                Continuation::FitContent => {
                    outcome.fit_requested = true;
                }
            }
        }

        if self.confetti.prune(now) > 0 {
            outcome.changed = true;
        }
        outcome
    }

    pub fn fit_content(&mut self, measure: &impl ContentMeasure) {
        self.fits = fit_pages(measure, self.state.total_pages());
    }

    /// Earliest moment `advance` has work to do.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.timeline.next_deadline(), self.confetti.next_finish()) {
            (Some(left), Some(right)) => Some(left.min(right)),
            (left, right) => left.or(right),
        }
    }

    pub fn has_pending_work(&self) -> bool {
        !self.timeline.is_empty() || !self.confetti.is_empty()
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn classes(&self) -> BookClasses {
        self.state.classes()
    }

    pub fn pages(&self) -> Vec<PageView> {
        self.state.pages()
    }

    pub fn page(&self, index: usize) -> Option<PageView> {
        self.state.page(index)
    }

    pub fn state(&self) -> &BookState {
        &self.state
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn current_url(&self) -> &str {
        self.history.current_url()
    }

    pub fn celebration(&self) -> CelebrationOverlay {
        self.celebration
    }

    pub fn confetti(&self) -> &ConfettiField {
        &self.confetti
    }

    pub fn decline_marker(&self) -> DeclineMarker {
        self.decline
    }

    pub fn transform(&self) -> Option<BookTransform> {
        self.transform
    }

    pub fn content_fit(&self, index: usize) -> Option<ContentFit> {
        self.fits.get(index).copied().flatten()
    }

    pub fn pending_continuations(&self) -> impl Iterator<Item = &Continuation> {
        self.timeline.pending()
    }

    fn push_page_entry(&mut self) {
        let page = self.state.current_page();
        self.history.push(NavigationEntry::page(page), page_url(page));
    }

    /// Shared apply routine for every page position change that does not
    /// animate a single page.
    fn jump(&mut self, target: usize, now: Duration) {
        self.state.jump_to(target);
        if self.viewport.is_some() {
            self.refresh_layout(now);
        } else {
            self.timeline.schedule(
                now,
                self.timings.content_fit_delay,
                Continuation::FitContent,
            );
        }
    }

    /// Recomputes the responsive transform when the host reported a viewport
    /// and queues a content-fit pass once layout settles.
    fn refresh_layout(&mut self, now: Duration) {
        let Some(viewport) = self.viewport else {
            return;
        };
        self.transform = Some(compute_transform(
            viewport,
            self.state.phase().is_open(),
            self.preview,
        ));
        self.timeline.schedule(
            now,
            self.timings.content_fit_delay,
            Continuation::FitContent,
        );
    }
}

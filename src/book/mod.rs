//! Page-flip view state for a diary rendered as a book.
//!
//! Everything here is synchronous and clock-agnostic: callers pass the time
//! since start and call [`BookViewController::advance`] when a deadline
//! passes.

mod confetti;
mod controller;
mod fit;
mod history;
mod layout;
mod state;
mod timeline;

pub use confetti::{CONFETTI_COLORS, ConfettiField, ConfettiParticle, DEFAULT_BURST_SIZE};
pub use controller::{
    AdvanceOutcome, BookViewController, CelebrationOverlay, ClickTarget, DECLINE_MESSAGE,
    DECLINE_MESSAGE_COLOR, DeclineMarker, FlipOutcome, FlipTimings,
};
pub use fit::{ContentFit, ContentMeasure, fit_page, fit_pages};
pub use history::{
    CELEBRATION_URL, LaunchParams, NavigationEntry, NavigationHistory, page_url,
    parse_leading_int,
};
pub use layout::{
    BASE_HEIGHT, BASE_WIDTH, BookTransform, MAX_SCALE, MIN_SCALE, MOBILE_BREAKPOINT, ViewportPx,
    compute_transform,
};
pub use state::{BookClasses, BookState, PageView, Phase};
pub use timeline::{Continuation, Timeline};

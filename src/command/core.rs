use std::time::Duration;

use crate::app::AppState;
use crate::book::{BookViewController, ClickTarget, FlipOutcome, Phase};

use super::types::{ActionId, CommandOutcome};

pub(crate) fn next_page(
    app: &mut AppState,
    book: &mut BookViewController,
    now: Duration,
) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::NextPage);
    let outcome = book.flip_next(now);
    report_flip(app, book, outcome, "already at the back cover")
}

pub(crate) fn prev_page(
    app: &mut AppState,
    book: &mut BookViewController,
    now: Duration,
) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::PrevPage);
    let outcome = book.flip_previous(now);
    report_flip(app, book, outcome, "already at the front cover")
}

pub(crate) fn click_page(
    app: &mut AppState,
    book: &mut BookViewController,
    leaf: usize,
    target: ClickTarget,
    now: Duration,
) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::ClickPage);
    let outcome = book.click_page(leaf, target, now);
    if outcome == FlipOutcome::Ignored {
        // Clicks on leaves that are not on top of a stack do nothing, and the
        // status line keeps whatever it said before.
        return CommandOutcome::Noop;
    }
    report_flip(app, book, outcome, "")
}

pub(crate) fn history_back(
    app: &mut AppState,
    book: &mut BookViewController,
    now: Duration,
) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::HistoryBack);
    if !book.history_back(now) {
        app.status.message = "history: no older entry".to_string();
        return CommandOutcome::Noop;
    }
    app.status.message = format!("history: {}", location_label(book));
    CommandOutcome::Applied
}

pub(crate) fn history_forward(
    app: &mut AppState,
    book: &mut BookViewController,
    now: Duration,
) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::HistoryForward);
    if !book.history_forward(now) {
        app.status.message = "history: no newer entry".to_string();
        return CommandOutcome::Noop;
    }
    app.status.message = format!("history: {}", location_label(book));
    CommandOutcome::Applied
}

pub(crate) fn accept(
    app: &mut AppState,
    book: &mut BookViewController,
    now: Duration,
) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::Accept);
    book.accept(now);
    app.status.message = "yes!".to_string();
    CommandOutcome::Applied
}

pub(crate) fn decline(
    app: &mut AppState,
    book: &mut BookViewController,
    now: Duration,
) -> CommandOutcome {
    app.status.last_action_id = Some(ActionId::Decline);
    book.decline(now);
    app.status.message = "the no button does not seem to work".to_string();
    CommandOutcome::Applied
}

pub(crate) fn set_debug_status_visible(
    app: &mut AppState,
    visible: bool,
    action_id: ActionId,
) -> CommandOutcome {
    app.status.last_action_id = Some(action_id);
    if app.debug_status_visible == visible {
        app.status.message = if visible {
            "debug status already visible".to_string()
        } else {
            "debug status already hidden".to_string()
        };
        return CommandOutcome::Noop;
    }

    app.debug_status_visible = visible;
    app.status.message = if visible {
        "debug status shown".to_string()
    } else {
        "debug status hidden".to_string()
    };
    CommandOutcome::Applied
}

pub(crate) fn location_label(book: &BookViewController) -> String {
    match book.phase() {
        Phase::FrontClosed => "front cover".to_string(),
        Phase::BackClosed => "back cover".to_string(),
        Phase::Open => format!(
            "spread {}-{} of {}",
            book.current_page(),
            book.current_page() + 1,
            book.total_pages()
        ),
    }
}

fn report_flip(
    app: &mut AppState,
    book: &BookViewController,
    outcome: FlipOutcome,
    edge_message: &str,
) -> CommandOutcome {
    match outcome {
        FlipOutcome::Forward { .. } | FlipOutcome::Backward { .. } => {
            app.status.message = location_label(book);
            CommandOutcome::Applied
        }
        FlipOutcome::Ignored => {
            app.status.message = edge_message.to_string();
            CommandOutcome::Noop
        }
    }
}

use std::time::Duration;

use crate::app::AppState;
use crate::book::BookViewController;
use crate::event::{AppEvent, NavReason};

use super::core::{
    accept, click_page, decline, history_back, history_forward, next_page, prev_page,
    set_debug_status_visible,
};
use super::types::{ActionId, Command, CommandOutcome};

#[derive(Debug, Clone)]
pub struct CommandDispatchResult {
    pub outcome: CommandOutcome,
    pub emitted_events: Vec<AppEvent>,
}

/// Applies `cmd`. `book` is `None` while the diary is locked, in which case
/// only chrome commands do anything.
pub fn dispatch(
    app: &mut AppState,
    book: Option<&mut BookViewController>,
    cmd: Command,
    now: Duration,
) -> CommandDispatchResult {
    let action_id = cmd.action_id();
    let prev_mode = app.mode;

    let (outcome, mut emitted_events) = match book {
        Some(book) => dispatch_to_book(app, book, &cmd, now),
        None => (dispatch_locked(app, &cmd), Vec::new()),
    };

    if app.mode != prev_mode {
        emitted_events.push(AppEvent::ModeChanged {
            from: prev_mode,
            to: app.mode,
        });
    }
    emitted_events.push(AppEvent::CommandExecuted {
        id: action_id,
        outcome,
    });

    CommandDispatchResult {
        outcome,
        emitted_events,
    }
}

fn dispatch_to_book(
    app: &mut AppState,
    book: &mut BookViewController,
    cmd: &Command,
    now: Duration,
) -> (CommandOutcome, Vec<AppEvent>) {
    let previous_page = book.current_page();
    let previously_celebrating = book.celebration().active;

    let outcome = match *cmd {
        Command::NextPage => next_page(app, book, now),
        Command::PrevPage => prev_page(app, book, now),
        Command::ClickPage { leaf, target } => click_page(app, book, leaf, target, now),
        Command::HistoryBack => history_back(app, book, now),
        Command::HistoryForward => history_forward(app, book, now),
        Command::Accept => accept(app, book, now),
        Command::Decline => decline(app, book, now),
        _ => dispatch_chrome(app, cmd),
    };

    let mut events = Vec::new();
    if book.current_page() != previous_page {
        events.push(AppEvent::PageChanged {
            from: previous_page,
            to: book.current_page(),
            reason: nav_reason(cmd),
        });
    }
    if book.celebration().active != previously_celebrating {
        events.push(AppEvent::CelebrationChanged {
            active: book.celebration().active,
        });
    }
    (outcome, events)
}

fn dispatch_locked(app: &mut AppState, cmd: &Command) -> CommandOutcome {
    if cmd.is_chrome_only() {
        return dispatch_chrome(app, cmd);
    }
    app.status.last_action_id = Some(ActionId::Locked);
    app.status.message = "this diary is locked".to_string();
    CommandOutcome::Noop
}

fn dispatch_chrome(app: &mut AppState, cmd: &Command) -> CommandOutcome {
    match cmd {
        Command::DebugStatusShow => set_debug_status_visible(app, true, ActionId::DebugStatusShow),
        Command::DebugStatusHide => {
            set_debug_status_visible(app, false, ActionId::DebugStatusHide)
        }
        Command::DebugStatusToggle => {
            let visible = !app.debug_status_visible;
            set_debug_status_visible(app, visible, ActionId::DebugStatusToggle)
        }
        Command::Quit => {
            app.status.last_action_id = Some(ActionId::Quit);
            app.status.message = "quit requested".to_string();
            CommandOutcome::QuitRequested
        }
        _ => CommandOutcome::Noop,
    }
}

fn nav_reason(command: &Command) -> NavReason {
    match command {
        Command::ClickPage { .. } => NavReason::Click,
        Command::HistoryBack | Command::HistoryForward => NavReason::History,
        _ => NavReason::Step,
    }
}

use crossterm::event::Event;

use crate::app::Mode;
use crate::command::{ActionId, Command, CommandOutcome};
use crate::media::PhotoResult;

/// Why the open spread moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavReason {
    /// Single flip from the keyboard.
    Step,
    /// Pointer click on a page.
    Click,
    /// History traversal, which may move several leaves at once.
    History,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    CommandExecuted {
        id: ActionId,
        outcome: CommandOutcome,
    },
    PageChanged {
        from: usize,
        to: usize,
        reason: NavReason,
    },
    CelebrationChanged {
        active: bool,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
    },
}

#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(Event),
    InputError(String),
    Command(Command),
    App(AppEvent),
    PhotoReady(PhotoResult),
    Wake,
}

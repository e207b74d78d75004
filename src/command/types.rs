use crate::book::ClickTarget;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NextPage,
    PrevPage,
    ClickPage { leaf: usize, target: ClickTarget },
    HistoryBack,
    HistoryForward,
    Accept,
    Decline,
    DebugStatusShow,
    DebugStatusHide,
    DebugStatusToggle,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    NextPage,
    PrevPage,
    ClickPage,
    HistoryBack,
    HistoryForward,
    Accept,
    Decline,
    DebugStatusShow,
    DebugStatusHide,
    DebugStatusToggle,
    Quit,
    Input,
    PhotoWorker,
    Locked,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NextPage => "next-page",
            Self::PrevPage => "prev-page",
            Self::ClickPage => "click-page",
            Self::HistoryBack => "history-back",
            Self::HistoryForward => "history-forward",
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::DebugStatusShow => "debug-status-show",
            Self::DebugStatusHide => "debug-status-hide",
            Self::DebugStatusToggle => "debug-status-toggle",
            Self::Quit => "quit",
            Self::Input => "input",
            Self::PhotoWorker => "photo-worker",
            Self::Locked => "locked",
        }
    }
}

impl Command {
    pub fn action_id(&self) -> ActionId {
        match self {
            Self::NextPage => ActionId::NextPage,
            Self::PrevPage => ActionId::PrevPage,
            Self::ClickPage { .. } => ActionId::ClickPage,
            Self::HistoryBack => ActionId::HistoryBack,
            Self::HistoryForward => ActionId::HistoryForward,
            Self::Accept => ActionId::Accept,
            Self::Decline => ActionId::Decline,
            Self::DebugStatusShow => ActionId::DebugStatusShow,
            Self::DebugStatusHide => ActionId::DebugStatusHide,
            Self::DebugStatusToggle => ActionId::DebugStatusToggle,
            Self::Quit => ActionId::Quit,
        }
    }

    /// Commands that only touch the host chrome and still work on a locked
    /// diary.
    pub fn is_chrome_only(&self) -> bool {
        matches!(
            self,
            Self::DebugStatusShow | Self::DebugStatusHide | Self::DebugStatusToggle | Self::Quit
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Noop,
    QuitRequested,
}

#[cfg(test)]
mod tests {
    use crate::book::ClickTarget;

    use super::{ActionId, Command};

    #[test]
    fn command_action_id_maps_book_variants() {
        assert_eq!(
            Command::ClickPage {
                leaf: 2,
                target: ClickTarget::Surface,
            }
            .action_id(),
            ActionId::ClickPage
        );
        assert_eq!(Command::HistoryBack.action_id(), ActionId::HistoryBack);
        assert_eq!(Command::Accept.action_id().as_str(), "accept");
    }

    #[test]
    fn only_chrome_commands_survive_a_lock() {
        assert!(Command::Quit.is_chrome_only());
        assert!(Command::DebugStatusToggle.is_chrome_only());
        assert!(!Command::NextPage.is_chrome_only());
        assert!(!Command::Decline.is_chrome_only());
    }
}

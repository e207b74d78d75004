use crate::command::ActionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The book is on screen and takes input.
    Reading,
    /// An unpaid diary opened by someone other than its author.
    Locked,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: String,
    pub last_action_id: Option<ActionId>,
}

/// Counters for the debug status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhotoStats {
    pub requested: usize,
    pub decoded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: Mode,
    pub debug_status_visible: bool,
    pub status: StatusState,
    pub photos: PhotoStats,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::Reading,
            debug_status_visible: false,
            status: StatusState::default(),
            photos: PhotoStats::default(),
        }
    }
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    /// Everything above the status bar. The book's viewport, banner included.
    pub stage: Rect,
    pub banner: Option<Rect>,
    /// Part of the stage the book may occupy.
    pub viewer: Rect,
    pub status: Rect,
}

pub fn split_layout(area: Rect, debug_status_visible: bool, preview_banner: bool) -> UiLayout {
    let status_height = if debug_status_visible { 2 } else { 1 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(status_height)])
        .split(area);

    let stage = chunks[0];
    let (banner, viewer) = if preview_banner && stage.height > 1 {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(stage);
        (Some(rows[0]), rows[1])
    } else {
        (None, stage)
    };

    UiLayout {
        stage,
        banner,
        viewer,
        status: chunks[1],
    }
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

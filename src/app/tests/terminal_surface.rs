use ratatui::layout::{Rect, Size};
use ratatui::widgets::Paragraph;

use super::super::terminal_session::TerminalSurface;
use super::{CELL_PX, TestTerminalSurface};

#[test]
fn terminal_surface_supports_size_clear_and_draw() {
    let mut session = TestTerminalSurface::new(80, 24).expect("test terminal should initialize");
    let size = session.size().expect("size should resolve");
    assert_eq!(size, Size::new(80, 24));
    assert_eq!(session.cell_px(), Some(CELL_PX));

    session.clear().expect("clear should succeed");
    session
        .draw(|frame| {
            frame.render_widget(Paragraph::new("ok"), Rect::new(0, 0, 2, 1));
        })
        .expect("draw should succeed");
    assert!(session.text().starts_with("ok"));
}

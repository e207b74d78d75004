use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::{AppState, Mode};

use super::layout::UiLayout;

/// Everything the status bar shows besides `AppState`.
#[derive(Debug, Clone, Default)]
pub struct ChromeInfo<'a> {
    pub title: &'a str,
    pub location: String,
    pub url: &'a str,
    pub phase: &'a str,
    pub pending: usize,
    pub fit: String,
    pub photo_protocol: &'a str,
    pub photo_cache_hit_rate: f64,
    pub photos_in_flight: usize,
}

pub fn draw_chrome(frame: &mut Frame<'_>, layout: UiLayout, app: &AppState, info: &ChromeInfo<'_>) {
    let mode = match app.mode {
        Mode::Reading => "READ",
        Mode::Locked => "LOCKED",
    };
    let status_text = if app.mode == Mode::Locked {
        format!("{} | {mode}", info.title)
    } else {
        format!("{} | {} | {} | {mode}", info.title, info.location, info.url)
    };

    let status = Paragraph::new(status_text)
        .style(Style::default())
        .wrap(Wrap { trim: true });
    if app.debug_status_visible && layout.status.height >= 2 {
        let top = Rect::new(layout.status.x, layout.status.y, layout.status.width, 1);
        frame.render_widget(status, top);

        let command_id = app
            .status
            .last_action_id
            .map(|id| id.as_str())
            .unwrap_or("-");
        let message = if app.status.message.is_empty() {
            "-"
        } else {
            app.status.message.as_str()
        };
        let debug_text = format!(
            "cmd={command_id} | msg={message} | phase={} | timers={} | fit={} | photos=req {} ok {} err {} flight {} | hit={:.0}% | proto={}",
            info.phase,
            info.pending,
            info.fit,
            app.photos.requested,
            app.photos.decoded,
            app.photos.failed,
            info.photos_in_flight,
            info.photo_cache_hit_rate * 100.0,
            info.photo_protocol,
        );
        let bottom = Rect::new(
            layout.status.x,
            layout.status.y + 1,
            layout.status.width,
            layout.status.height.saturating_sub(1).max(1),
        );
        let debug = Paragraph::new(debug_text)
            .style(Style::default())
            .wrap(Wrap { trim: true });
        frame.render_widget(debug, bottom);
        return;
    }

    frame.render_widget(status, layout.status);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::app::{AppState, Mode};
    use crate::command::ActionId;

    use super::{ChromeInfo, draw_chrome};
    use crate::ui::split_layout;

    fn render(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(200, 4)).expect("test terminal");
        let info = ChromeInfo {
            title: "Our Story",
            location: "spread 1-2 of 4".to_string(),
            url: "?page=1",
            phase: "open",
            ..ChromeInfo::default()
        };
        terminal
            .draw(|frame| {
                let layout = split_layout(frame.area(), app.debug_status_visible, false);
                draw_chrome(frame, layout, app, &info);
            })
            .expect("draw frame");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn status_line_shows_location_and_url() {
        let text = render(&AppState::default());
        assert!(text.contains("Our Story | spread 1-2 of 4 | ?page=1 | READ"));
        assert!(!text.contains("cmd="));
    }

    #[test]
    fn debug_line_reports_last_command() {
        let mut app = AppState::default();
        app.debug_status_visible = true;
        app.status.last_action_id = Some(ActionId::Accept);
        let text = render(&app);
        assert!(text.contains("cmd=accept"));
        assert!(text.contains("phase=open"));
    }

    #[test]
    fn locked_status_hides_navigation() {
        let mut app = AppState::default();
        app.mode = Mode::Locked;
        let text = render(&app);
        assert!(text.contains("Our Story | LOCKED"));
        assert!(!text.contains("?page=1"));
    }
}

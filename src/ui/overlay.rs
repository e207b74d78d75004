use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::book::{CelebrationOverlay, ConfettiParticle};

use super::color::hex_color;
use super::layout::centered_rect;
use super::text::wrap_text;

const CARD_WIDTH_PX: f32 = 800.0;
const CARD_HEIGHT_PX: f32 = 400.0;
const CARD_MIN_CELLS: (u16, u16) = (16, 5);
const HEART: Color = Color::Rgb(0xe9, 0x1e, 0x63);
const CONFETTI_GLYPHS: [&str; 4] = ["▪", "▴", "◆", "●"];

pub const LOCKED_TITLE: &str = "🔒 Locked";
pub const LOCKED_MESSAGE: &str = "This diary hasn't been unlocked by the author yet.";
pub const PREVIEW_BANNER: &str = "Preview mode: only you can see this diary until it is unlocked";

/// Success card over the book. Drawn dimmed while fading in or out.
pub fn draw_celebration(
    frame: &mut Frame<'_>,
    stage: Rect,
    overlay: CelebrationOverlay,
    card_scale: f32,
    cell_px: (u16, u16),
    message: &str,
) {
    if overlay.hidden || stage.width == 0 || stage.height == 0 {
        return;
    }

    let width = cells(CARD_WIDTH_PX * card_scale, cell_px.0).max(CARD_MIN_CELLS.0);
    let height = cells(CARD_HEIGHT_PX * card_scale, cell_px.1).max(CARD_MIN_CELLS.1);
    let card = centered_rect(stage, width, height);
    frame.render_widget(Clear, card);

    let mut style = Style::default().fg(HEART).bg(Color::White);
    if !overlay.visible {
        style = style.add_modifier(Modifier::DIM);
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(style);
    let inner = block.inner(card);
    frame.render_widget(block, card);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut lines = vec![Line::from("❤"), Line::default()];
    lines.extend(wrap_text(message, inner.width).into_iter().map(|line| {
        Line::from(Span::styled(line, Style::default().add_modifier(Modifier::BOLD)))
    }));
    let text_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered_rect(inner, inner.width, text_height),
    );
}

/// Falling particles in viewport space. Out-of-stage positions are skipped.
pub fn draw_confetti(
    frame: &mut Frame<'_>,
    stage: Rect,
    particles: &[ConfettiParticle],
    now: Duration,
    cell_px: (u16, u16),
) {
    if stage.width == 0 || stage.height == 0 {
        return;
    }

    let buffer = frame.buffer_mut();
    for particle in particles {
        let (x_frac, y_frac, drift_px) = particle.position(now);
        let x = f32::from(stage.width) * x_frac + drift_px / f32::from(cell_px.0.max(1));
        let y = f32::from(stage.height) * y_frac;
        if !(0.0..f32::from(stage.width)).contains(&x) || !(0.0..f32::from(stage.height)).contains(&y)
        {
            continue;
        }

        let glyph = CONFETTI_GLYPHS[(particle.rotation_deg as usize / 90) % CONFETTI_GLYPHS.len()];
        let mut style = Style::default().fg(hex_color(particle.color).unwrap_or(Color::White));
        if particle.opacity < 0.5 {
            style = style.add_modifier(Modifier::DIM);
        }
        if let Some(cell) = buffer.cell_mut((stage.x + x as u16, stage.y + y as u16)) {
            cell.set_symbol(glyph).set_style(style);
        }
    }
}

pub fn draw_locked(frame: &mut Frame<'_>, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let popup = centered_rect(area, area.width.min(56), area.height.min(6));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let mut lines = vec![
        Line::from(Span::styled(
            LOCKED_TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    lines.extend(wrap_text(LOCKED_MESSAGE, inner.width).into_iter().map(Line::from));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

pub fn draw_preview_banner(frame: &mut Frame<'_>, area: Rect) {
    let banner = Paragraph::new(PREVIEW_BANNER)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Black).bg(Color::Yellow));
    frame.render_widget(banner, area);
}

fn cells(px: f32, cell: u16) -> u16 {
    if !px.is_finite() || px <= 0.0 {
        return 0;
    }
    (px / f32::from(cell.max(1))).round().min(f32::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::book::{CelebrationOverlay, ConfettiField};

    use super::{
        LOCKED_MESSAGE, draw_celebration, draw_confetti, draw_locked, draw_preview_banner,
    };

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn hidden_celebration_draws_nothing() {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).expect("test terminal");
        terminal
            .draw(|frame| {
                draw_celebration(
                    frame,
                    frame.area(),
                    CelebrationOverlay::default(),
                    1.0,
                    (10, 20),
                    "Yay",
                );
            })
            .expect("draw frame");
        assert!(!buffer_text(&terminal).contains("Yay"));

        let overlay = CelebrationOverlay {
            active: true,
            hidden: false,
            visible: true,
        };
        terminal
            .draw(|frame| {
                draw_celebration(frame, frame.area(), overlay, 0.5, (10, 20), "Yay");
            })
            .expect("draw frame");
        assert!(buffer_text(&terminal).contains("Yay"));
    }

    #[test]
    fn confetti_lands_inside_the_stage() {
        let mut field = ConfettiField::with_seed(7);
        field.burst(Duration::ZERO, 40);
        let stage = Rect::new(0, 0, 40, 20);
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).expect("test terminal");
        terminal
            .draw(|frame| {
                draw_confetti(
                    frame,
                    stage,
                    field.particles(),
                    Duration::from_millis(700),
                    (10, 20),
                );
            })
            .expect("draw frame");

        let drawn = buffer_text(&terminal)
            .chars()
            .filter(|ch| "▪▴◆●".contains(*ch))
            .count();
        assert!(drawn > 0);
        assert!(drawn <= 40);
    }

    #[test]
    fn locked_placeholder_and_banner_render_text() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).expect("test terminal");
        terminal
            .draw(|frame| {
                draw_locked(frame, Rect::new(0, 1, 80, 11));
                draw_preview_banner(frame, Rect::new(0, 0, 80, 1));
            })
            .expect("draw frame");
        let text = buffer_text(&terminal);
        assert!(text.contains("Locked"));
        assert!(text.contains(&LOCKED_MESSAGE[..20]));
        assert!(text.contains("Preview mode"));
    }
}

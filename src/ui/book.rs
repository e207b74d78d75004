//! Draws the leaves of the book. The geometry helpers here are shared with
//! hit-testing and content fitting so all three agree on where things are.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::book::{ContentFit, DeclineMarker};
use crate::diary::{DiaryPage, Leaf};
use crate::error::AppResult;
use crate::media::{PhotoKey, PhotoPresenter};

use super::color::hex_color;
use super::layout::centered_rect;
use super::text::{clip_lines, wrap_text};

const PAPER: Color = Color::Rgb(0xfd, 0xf6, 0xe3);
const INK: Color = Color::Rgb(0x3b, 0x2f, 0x2f);
const COVER: Color = Color::Rgb(0x8e, 0x44, 0x53);
const BUTTON_ROWS: u16 = 3;
const MESSAGE_ROWS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryLayout {
    pub photo: Option<Rect>,
    pub text: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposalLayout {
    pub question: Rect,
    pub yes: Rect,
    pub no: Rect,
    pub message: Rect,
}

/// How the host wants the photo slot of a story leaf filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoView {
    None,
    /// Decoded or in flight under this key.
    Local(PhotoKey),
    /// Points somewhere the viewer does not fetch from.
    Unavailable,
}

#[derive(Debug, Clone, Copy)]
pub struct LeafView<'a> {
    pub index: usize,
    pub leaf: Leaf<'a>,
    pub area: Rect,
    pub fit: Option<ContentFit>,
    pub photo: PhotoView,
    /// Mid-way through a backward turn.
    pub turning: bool,
}

pub fn leaf_inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

pub fn story_layout(inner: Rect, page: &DiaryPage, fit: Option<ContentFit>) -> StoryLayout {
    if !page.has_photo() {
        return StoryLayout {
            photo: None,
            text: inner,
        };
    }
    if !page.has_text() {
        return StoryLayout {
            photo: Some(inner),
            text: Rect::new(inner.x, inner.bottom(), inner.width, 0),
        };
    }

    let pct = fit.unwrap_or_default().photo_max_height_pct;
    let photo_rows = (u32::from(inner.height) * u32::from(pct) / 100) as u16;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(photo_rows), Constraint::Min(0)])
        .split(inner);
    StoryLayout {
        photo: (photo_rows > 0).then_some(rows[0]),
        text: rows[1],
    }
}

pub fn proposal_layout(inner: Rect, yes_label: &str, no_label: &str) -> ProposalLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(BUTTON_ROWS),
            Constraint::Length(MESSAGE_ROWS),
        ])
        .split(inner);
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    ProposalLayout {
        question: rows[0],
        yes: centered_rect(halves[0], button_width(yes_label), BUTTON_ROWS),
        no: centered_rect(halves[1], button_width(no_label), BUTTON_ROWS),
        message: rows[2],
    }
}

fn button_width(label: &str) -> u16 {
    u16::try_from(label.width()).unwrap_or(u16::MAX).saturating_add(4)
}

/// Draws one leaf. Photo encode failures come back as errors after the rest
/// of the leaf has been drawn.
pub fn draw_leaf(
    frame: &mut Frame<'_>,
    view: &LeafView<'_>,
    decline: DeclineMarker,
    photos: &mut PhotoPresenter,
) -> AppResult<()> {
    if view.area.width < 3 || view.area.height < 3 {
        return Ok(());
    }
    frame.render_widget(Clear, view.area);

    let border_style = if view.turning {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .style(Style::default().bg(PAPER).fg(INK));
    if let Leaf::Story(page) = view.leaf {
        block = block.title_bottom(Line::from(format!(" {} ", page.page_number)).centered());
    }
    let inner = block.inner(view.area);
    frame.render_widget(block, view.area);

    match view.leaf {
        Leaf::Cover { title, description } => {
            draw_cover(frame, view.area, inner, title, description);
            Ok(())
        }
        Leaf::Story(page) => draw_story(frame, inner, page, view, photos),
        Leaf::Proposal {
            question,
            yes_label,
            no_label,
        } => {
            draw_proposal(frame, inner, question, yes_label, no_label, decline);
            Ok(())
        }
    }
}

pub fn draw_back_cover(frame: &mut Frame<'_>, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .style(Style::default().bg(COVER).fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let mark = Paragraph::new("♥").alignment(Alignment::Center);
    frame.render_widget(mark, centered_rect(inner, inner.width, 1));
}

fn draw_cover(frame: &mut Frame<'_>, area: Rect, inner: Rect, title: &str, description: &str) {
    frame.render_widget(
        Block::default().style(Style::default().bg(COVER).fg(Color::White)),
        area,
    );
    let mut lines: Vec<Line<'_>> = wrap_text(title, inner.width)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().add_modifier(Modifier::BOLD))))
        .collect();
    lines.push(Line::default());
    lines.extend(
        wrap_text(description, inner.width)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().add_modifier(Modifier::ITALIC)))),
    );
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let text_area = centered_rect(inner, inner.width, height);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);
}

fn draw_story(
    frame: &mut Frame<'_>,
    inner: Rect,
    page: &DiaryPage,
    view: &LeafView<'_>,
    photos: &mut PhotoPresenter,
) -> AppResult<()> {
    let layout = story_layout(inner, page, view.fit);

    let text = clip_lines(
        wrap_text(&page.text, layout.text.width),
        layout.text.height,
        layout.text.width,
    );
    let lines: Vec<Line<'_>> = text.into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines), layout.text);

    let Some(photo_area) = layout.photo else {
        return Ok(());
    };
    let placeholder = match view.photo {
        PhotoView::None => return Ok(()),
        PhotoView::Unavailable => "photo not available offline",
        PhotoView::Local(key) => {
            if photos.has_failed(&key) {
                "photo could not be loaded"
            } else if photos.render(frame, photo_area, &key)? {
                return Ok(());
            } else {
                "loading photo…"
            }
        }
    };
    let placeholder = Paragraph::new(placeholder)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(placeholder, centered_rect(photo_area, photo_area.width, 1));
    Ok(())
}

fn draw_proposal(
    frame: &mut Frame<'_>,
    inner: Rect,
    question: &str,
    yes_label: &str,
    no_label: &str,
    decline: DeclineMarker,
) {
    let layout = proposal_layout(inner, yes_label, no_label);

    let question_lines: Vec<Line<'_>> = wrap_text(question, layout.question.width)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().add_modifier(Modifier::BOLD))))
        .collect();
    let height = u16::try_from(question_lines.len()).unwrap_or(u16::MAX);
    frame.render_widget(
        Paragraph::new(question_lines).alignment(Alignment::Center),
        centered_rect(layout.question, layout.question.width, height),
    );

    draw_button(
        frame,
        layout.yes,
        yes_label,
        Style::default().fg(Color::White).bg(Color::Rgb(0xe9, 0x1e, 0x63)),
    );
    let no_style = if decline.broken {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
    } else {
        Style::default().fg(INK)
    };
    draw_button(frame, layout.no, no_label, no_style);

    if let Some(message) = decline.message
        && decline.message_opacity > 0.0
    {
        let mut style = decline
            .message_color
            .and_then(hex_color)
            .map(|color| Style::default().fg(color))
            .unwrap_or_default();
        if decline.message_opacity < 1.0 {
            style = style.add_modifier(Modifier::DIM);
        }
        let lines: Vec<Line<'_>> = wrap_text(message, layout.message.width)
            .into_iter()
            .map(Line::from)
            .collect();
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).style(style),
            layout.message,
        );
    }
}

fn draw_button(frame: &mut Frame<'_>, area: Rect, label: &str, style: Style) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(style);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(label).alignment(Alignment::Center), inner);
}

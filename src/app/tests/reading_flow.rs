use std::time::Duration;

use crate::book::{ClickTarget, Phase};
use crate::command::{Command, CommandOutcome, dispatch};
use crate::ui::{PREVIEW_BANNER, leaf_inner, proposal_layout};

use super::{TestTerminalSurface, open_app, sample_diary};

fn center(area: ratatui::layout::Rect) -> (u16, u16) {
    (area.x + area.width / 2, area.y + area.height / 2)
}

#[test]
fn front_cover_renders_and_a_click_opens_the_book() {
    let mut app = open_app(sample_diary(true), "", false);
    let mut surface = TestTerminalSurface::new(100, 30).expect("test terminal");

    let plan = app.plan_frame(&surface).expect("plan");
    assert!(plan.resized);
    let geometry = plan.geometry.expect("book is laid out");
    assert!(geometry.left.is_none());
    let cover = geometry.right.expect("cover slot");
    assert_eq!(cover.leaf, 0);

    app.render_frame(&mut surface, &plan, 0).expect("render");
    let text = surface.text();
    assert!(text.contains("for you"));
    assert!(text.contains("front cover"));

    let (column, row) = center(cover.area);
    let command = app
        .command_for_click(&surface, column, row)
        .expect("click resolves");
    assert_eq!(
        command,
        Some(Command::ClickPage {
            leaf: 0,
            target: ClickTarget::Surface
        })
    );

    let now = app.now();
    let result = dispatch(&mut app.state, app.book.as_mut(), command.expect("command"), now);
    assert_eq!(result.outcome, CommandOutcome::Applied);
    let book = app.book.as_ref().expect("book");
    assert_eq!(book.current_page(), 1);
    assert_eq!(book.phase(), Phase::Open);

    let plan = app.plan_frame(&surface).expect("plan");
    let geometry = plan.geometry.expect("book is laid out");
    assert_eq!(geometry.left.map(|slot| slot.leaf), Some(0));
    assert_eq!(geometry.right.map(|slot| slot.leaf), Some(1));
    app.render_frame(&mut surface, &plan, 0).expect("render");
    assert!(surface.text().contains("where it started"));
}

#[test]
fn yes_button_starts_the_celebration() {
    // Four leaves: cover, two story pages, proposal.
    let mut app = open_app(sample_diary(true), "?page=3", false);
    let surface = TestTerminalSurface::new(100, 30).expect("test terminal");

    let plan = app.plan_frame(&surface).expect("plan");
    let proposal = plan
        .geometry
        .and_then(|geometry| geometry.right)
        .expect("proposal slot");
    assert_eq!(proposal.leaf, 3);

    let controls = proposal_layout(
        leaf_inner(proposal.area),
        &app.diary.yes_label,
        &app.diary.no_label,
    );
    let (column, row) = center(controls.yes);
    let command = app
        .command_for_click(&surface, column, row)
        .expect("click resolves");
    assert_eq!(command, Some(Command::Accept));

    let now = app.now();
    dispatch(&mut app.state, app.book.as_mut(), Command::Accept, now);
    let book = app.book.as_mut().expect("book");
    assert!(book.celebration().active);
    assert_eq!(book.current_page(), 3);

    // Past the fade-in the card is fully shown and confetti is falling.
    book.advance(now + Duration::from_secs(1));
    assert!(book.celebration().visible);
    assert!(!book.confetti().is_empty());
}

#[test]
fn no_button_breaks_without_turning_the_page() {
    let mut app = open_app(sample_diary(true), "?page=3", false);
    let surface = TestTerminalSurface::new(100, 30).expect("test terminal");

    let plan = app.plan_frame(&surface).expect("plan");
    let proposal = plan
        .geometry
        .and_then(|geometry| geometry.right)
        .expect("proposal slot");
    let controls = proposal_layout(
        leaf_inner(proposal.area),
        &app.diary.yes_label,
        &app.diary.no_label,
    );
    let (column, row) = center(controls.no);
    let command = app
        .command_for_click(&surface, column, row)
        .expect("click resolves");
    assert_eq!(command, Some(Command::Decline));

    let now = app.now();
    dispatch(&mut app.state, app.book.as_mut(), Command::Decline, now);
    let book = app.book.as_ref().expect("book");
    assert!(book.decline_marker().broken);
    assert_eq!(book.current_page(), 3);
}

#[test]
fn locked_diary_renders_the_placeholder() {
    let mut app = open_app(sample_diary(false), "", false);
    let mut surface = TestTerminalSurface::new(100, 30).expect("test terminal");

    let plan = app.plan_frame(&surface).expect("plan");
    assert!(plan.geometry.is_none());
    app.render_frame(&mut surface, &plan, 0).expect("render");

    let text = surface.text();
    assert!(text.contains("unlocked by the author"));
    assert!(text.contains("LOCKED"));
    assert_eq!(app.command_for_click(&surface, 50, 15).expect("click"), None);
}

#[test]
fn author_preview_shows_the_banner() {
    let mut app = open_app(sample_diary(false), "", true);
    let mut surface = TestTerminalSurface::new(100, 30).expect("test terminal");

    let plan = app.plan_frame(&surface).expect("plan");
    assert!(plan.layout.banner.is_some());
    app.render_frame(&mut surface, &plan, 0).expect("render");
    assert!(surface.text().contains(PREVIEW_BANNER));
}

#[test]
fn resizing_the_terminal_reaches_the_controller() {
    let mut app = open_app(sample_diary(true), "", false);
    let small = TestTerminalSurface::new(60, 20).expect("test terminal");
    let large = TestTerminalSurface::new(160, 50).expect("test terminal");

    assert!(app.plan_frame(&small).expect("plan").resized);
    assert!(!app.plan_frame(&small).expect("plan").resized);
    let before = app.book.as_ref().and_then(|book| book.transform()).expect("transform");

    assert!(app.plan_frame(&large).expect("plan").resized);
    let after = app.book.as_ref().and_then(|book| book.transform()).expect("transform");
    assert!(after.scale > before.scale);
}

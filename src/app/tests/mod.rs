use std::convert::Infallible;
use std::io;
use std::path::PathBuf;

use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Size;

use crate::app::{App, LaunchOptions};
use crate::config::Config;
use crate::diary::{Diary, DiaryPage};

use super::terminal_session::TerminalSurface;

mod reading_flow;
mod terminal_surface;

const CELL_PX: (u16, u16) = (10, 20);

/// In-memory terminal with a fixed cell size, so layout math is repeatable.
pub(super) struct TestTerminalSurface {
    terminal: Terminal<TestBackend>,
}

impl TestTerminalSurface {
    pub(super) fn new(width: u16, height: u16) -> io::Result<Self> {
        let terminal = infallible_to_io(Terminal::new(TestBackend::new(width, height)))?;
        Ok(Self { terminal })
    }

    pub(super) fn text(&self) -> String {
        self.terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }
}

impl TerminalSurface for TestTerminalSurface {
    fn size(&self) -> io::Result<Size> {
        infallible_to_io(self.terminal.size())
    }

    fn cell_px(&self) -> Option<(u16, u16)> {
        Some(CELL_PX)
    }

    fn clear(&mut self) -> io::Result<()> {
        infallible_to_io(self.terminal.clear())
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        infallible_to_io(self.terminal.draw(render)).map(|_| ())
    }
}

fn infallible_to_io<T>(result: Result<T, Infallible>) -> io::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => match err {},
    }
}

pub(super) fn sample_diary(is_paid: bool) -> Diary {
    Diary {
        title: "Us".to_string(),
        description: "for you".to_string(),
        is_paid,
        pages: vec![
            DiaryPage {
                page_number: 1,
                text: "where it started".to_string(),
                image_url: "first.png".to_string(),
            },
            DiaryPage {
                page_number: 2,
                text: "and where it goes".to_string(),
                image_url: String::new(),
            },
        ],
        ..Diary::default()
    }
}

pub(super) fn open_app(diary: Diary, query: &str, viewer_is_author: bool) -> App {
    App::new(
        diary,
        PathBuf::from("/tmp/sbk-tests"),
        LaunchOptions {
            query: query.to_string(),
            viewer_is_author,
        },
        Config::default(),
    )
}

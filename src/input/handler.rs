use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};

use crate::command::Command;
use crate::error::AppResult;

use crate::app::App;
use crate::app::terminal_session::TerminalSurface;

#[derive(Debug, Default)]
pub(crate) struct InputEventOutcome {
    pub(crate) command: Option<Command>,
    pub(crate) redraw: bool,
}

impl App {
    pub(crate) fn handle_input_event(
        &mut self,
        event: Event,
        session: &mut impl TerminalSurface,
    ) -> AppResult<InputEventOutcome> {
        match event {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                Ok(InputEventOutcome {
                    command: self.command_for_key(key),
                    redraw: false,
                })
            }
            Event::Mouse(mouse) => {
                let command = match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.command_for_click(&*session, mouse.column, mouse.row)?
                    }
                    MouseEventKind::ScrollDown if self.book.is_some() => Some(Command::NextPage),
                    MouseEventKind::ScrollUp if self.book.is_some() => Some(Command::PrevPage),
                    _ => None,
                };
                Ok(InputEventOutcome {
                    command,
                    redraw: false,
                })
            }
            Event::Resize(_, _) => {
                session.clear()?;
                Ok(InputEventOutcome {
                    command: None,
                    redraw: true,
                })
            }
            _ => Ok(InputEventOutcome::default()),
        }
    }
}

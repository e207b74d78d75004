use crossterm::event::KeyEvent;
use tracing::{debug, info};

use crate::command::Command;
use crate::error::AppResult;
use crate::event::AppEvent;
use crate::input::keymap::{KeymapPreset, map_key_to_command_with_preset};

use super::core::App;
use super::terminal_session::TerminalSurface;
use super::view_ops::hit_test;

impl App {
    pub(crate) fn command_for_key(&self, key: KeyEvent) -> Option<Command> {
        let preset = KeymapPreset::parse(&self.config.keymap.preset);
        map_key_to_command_with_preset(key, self.state.mode, preset)
    }

    /// Resolves a left click against the geometry the next frame will show.
    pub(crate) fn command_for_click(
        &mut self,
        session: &impl TerminalSurface,
        column: u16,
        row: u16,
    ) -> AppResult<Option<Command>> {
        let plan = self.plan_frame(session)?;
        let Some(geometry) = plan.geometry else {
            return Ok(None);
        };
        let command = hit_test(&geometry, &self.diary, column, row);
        debug!(column, row, ?command, "click resolved");
        Ok(command)
    }

    /// Bus events only feed the log; state already changed in dispatch.
    pub(crate) fn handle_app_event(&self, event: &AppEvent) {
        match event {
            AppEvent::PageChanged { from, to, reason } => {
                let url = self.book.as_ref().map_or("", |book| book.current_url());
                debug!(from, to, ?reason, url, "page changed");
            }
            AppEvent::CelebrationChanged { active } => {
                info!(active, "celebration changed");
            }
            AppEvent::ModeChanged { from, to } => {
                debug!(?from, ?to, "mode changed");
            }
            AppEvent::CommandExecuted { id, outcome } => {
                debug!(action = id.as_str(), ?outcome, "command executed");
            }
        }
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Mode;
use crate::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Emacs,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "default" => Self::Default,
            "emacs" => Self::Emacs,
            _ => Self::Default,
        }
    }
}

pub fn map_key_to_command(key: KeyEvent, mode: Mode) -> Option<Command> {
    map_key_to_command_with_preset(key, mode, KeymapPreset::Default)
}

pub fn map_key_to_command_with_preset(
    key: KeyEvent,
    mode: Mode,
    preset: KeymapPreset,
) -> Option<Command> {
    match mode {
        Mode::Reading => match preset {
            KeymapPreset::Default => map_reading_key_default(key),
            KeymapPreset::Emacs => map_reading_key_emacs(key),
        },
        Mode::Locked => map_locked_key(key),
    }
}

fn map_reading_key_default(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('o') => Some(Command::HistoryBack),
            KeyCode::Char('i') => Some(Command::HistoryForward),
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Left => Some(Command::HistoryBack),
            KeyCode::Right => Some(Command::HistoryForward),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('l') | KeyCode::Char(' ') | KeyCode::Right | KeyCode::PageDown => {
            Some(Command::NextPage)
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp | KeyCode::Backspace => {
            Some(Command::PrevPage)
        }
        // Terminals send Ctrl-I as Tab.
        KeyCode::Tab => Some(Command::HistoryForward),
        KeyCode::Char('y') => Some(Command::Accept),
        KeyCode::Char('n') => Some(Command::Decline),
        KeyCode::Char('d') => Some(Command::DebugStatusToggle),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

fn map_reading_key_emacs(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Char('v') => Some(Command::PrevPage),
            KeyCode::Char('<') => Some(Command::HistoryBack),
            KeyCode::Char('>') => Some(Command::HistoryForward),
            _ => None,
        };
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('n') | KeyCode::Char('f') | KeyCode::Char('v') => {
                Some(Command::NextPage)
            }
            KeyCode::Char('p') | KeyCode::Char('b') => Some(Command::PrevPage),
            KeyCode::Char('o') => Some(Command::HistoryBack),
            KeyCode::Char('i') => Some(Command::HistoryForward),
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    map_reading_key_default(key)
}

fn map_locked_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('d') => Some(Command::DebugStatusToggle),
        _ => None,
    }
}

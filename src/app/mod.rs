mod actors;
mod core;
mod event_bus;
mod event_loop;
mod frame_ops;
mod input_ops;
mod measure;
mod state;
pub(crate) mod terminal_session;
mod view_ops;

#[cfg(test)]
mod tests;

pub use core::{App, LaunchOptions, PhotoSubsystem};
pub use state::{AppState, Mode, PhotoStats, StatusState};

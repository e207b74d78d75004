mod core;
mod dispatch;
mod types;

pub(crate) use core::location_label;
pub use dispatch::{CommandDispatchResult, dispatch};
pub use types::{ActionId, Command, CommandOutcome};

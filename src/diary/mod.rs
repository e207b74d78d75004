//! Diary content handed to the viewer: the cover, the story pages and the
//! closing proposal.

mod access;
mod model;

pub use access::DiaryAccess;
pub use model::{Diary, DiaryPage, Leaf, MAX_STORY_PAGES};

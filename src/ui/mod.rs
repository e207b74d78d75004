mod book;
mod chrome;
mod color;
mod layout;
mod overlay;
mod text;

pub use book::{
    LeafView, PhotoView, ProposalLayout, StoryLayout, draw_back_cover, draw_leaf, leaf_inner,
    proposal_layout, story_layout,
};
pub use chrome::{ChromeInfo, draw_chrome};
pub use color::hex_color;
pub use layout::{UiLayout, split_layout};
pub use overlay::{
    LOCKED_MESSAGE, LOCKED_TITLE, PREVIEW_BANNER, draw_celebration, draw_confetti, draw_locked,
    draw_preview_banner,
};
pub use text::{clip_lines, wrap_text};

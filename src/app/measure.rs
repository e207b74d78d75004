use ratatui::layout::Rect;

use crate::book::{ContentFit, ContentMeasure};
use crate::diary::{Diary, Leaf};
use crate::ui;

/// Content measurement against the cell grid of one leaf.
///
/// Glyphs have a fixed size in a terminal, so only the photo share changes
/// what fits. Text that still overflows at the photo floor drives the font
/// down to its floor too, and is drawn clipped.
pub(crate) struct TerminalMeasure<'a> {
    diary: &'a Diary,
    inner: Rect,
}

impl<'a> TerminalMeasure<'a> {
    /// `page_area` is the outer rect of a leaf, borders included.
    pub(crate) fn new(diary: &'a Diary, page_area: Rect) -> Self {
        Self {
            diary,
            inner: ui::leaf_inner(Rect::new(0, 0, page_area.width, page_area.height)),
        }
    }
}

impl ContentMeasure for TerminalMeasure<'_> {
    fn has_text(&self, page: usize) -> bool {
        matches!(self.diary.leaf(page), Some(Leaf::Story(story)) if story.has_text())
    }

    fn has_photo(&self, page: usize) -> bool {
        matches!(self.diary.leaf(page), Some(Leaf::Story(story)) if story.has_photo())
    }

    fn overflows(&self, page: usize, fit: ContentFit) -> bool {
        let Some(Leaf::Story(story)) = self.diary.leaf(page) else {
            return false;
        };
        let layout = ui::story_layout(self.inner, story, Some(fit));
        let lines = ui::wrap_text(&story.text, layout.text.width).len();
        lines > usize::from(layout.text.height)
    }
}

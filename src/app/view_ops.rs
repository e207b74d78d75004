//! Maps the controller's pixel-space transform onto terminal cells, and
//! terminal cells back onto leaves and controls.

use std::path::Path;

use ratatui::layout::{Position, Rect};

use crate::book::{BookTransform, BookViewController, ClickTarget, Phase, ViewportPx};
use crate::command::Command;
use crate::diary::{Diary, Leaf};
use crate::media::{PhotoKey, area_bounds_px};
use crate::ui::{self, PhotoView, UiLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LeafSlot {
    pub(crate) leaf: usize,
    pub(crate) area: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BookGeometry {
    pub(crate) book: Rect,
    pub(crate) left: Option<LeafSlot>,
    pub(crate) right: Option<LeafSlot>,
    /// Every leaf turned; the left slot shows the back cover.
    pub(crate) back_cover: bool,
}

impl BookGeometry {
    pub(crate) fn slots(&self) -> impl Iterator<Item = LeafSlot> + '_ {
        self.left.into_iter().chain(self.right)
    }

    /// Area of one visible leaf, used as the page box for content fitting.
    pub(crate) fn page_area(&self) -> Option<Rect> {
        self.right.or(self.left).map(|slot| slot.area)
    }
}

/// Stage size in pixels, with the banner row reported separately.
pub(crate) fn viewport_px(layout: &UiLayout, cell_px: (u16, u16)) -> ViewportPx {
    let (cell_w, cell_h) = (f32::from(cell_px.0.max(1)), f32::from(cell_px.1.max(1)));
    let viewport = ViewportPx::new(
        f32::from(layout.stage.width) * cell_w,
        f32::from(layout.stage.height) * cell_h,
    );
    match layout.banner {
        Some(banner) => viewport.with_banner(f32::from(banner.height) * cell_h),
        None => viewport,
    }
}

pub(crate) fn book_geometry(
    viewer: Rect,
    transform: &BookTransform,
    book: &BookViewController,
    cell_px: (u16, u16),
) -> BookGeometry {
    let (cell_w, cell_h) = (f32::from(cell_px.0.max(1)), f32::from(cell_px.1.max(1)));
    let (visual_w, visual_h) = transform.visual_size();
    let width = to_cells(visual_w, cell_w).max(1);
    let height = to_cells(visual_h, cell_h).max(1);
    let top = i32::from(viewer.y) + i32::from(to_cells(transform.visual_top(), cell_h));
    // `visual_left` is zero when the book is wider than the stage, so a wide
    // spread stays pinned to the start edge and overflows to the right.
    let left = i32::from(viewer.x) + i32::from(to_cells(transform.visual_left(), cell_w));

    let full = (left, top, width, height);
    let current = book.current_page();
    let (left_slot, right_slot, back_cover) = match book.phase() {
        Phase::FrontClosed => (None, slot(0, full, viewer), false),
        Phase::Open => {
            let half = width / 2;
            let left_half = (left, top, half, height);
            let right_half = (left + i32::from(half), top, width - half, height);
            (
                slot(current - 1, left_half, viewer),
                slot(current, right_half, viewer),
                false,
            )
        }
        Phase::BackClosed => match book.total_pages().checked_sub(1) {
            Some(last) => (slot(last, full, viewer), None, true),
            None => (None, None, true),
        },
    };

    BookGeometry {
        book: clip(full, viewer),
        left: left_slot,
        right: right_slot,
        back_cover,
    }
}

/// What a left click at `(column, row)` means.
pub(crate) fn hit_test(
    geometry: &BookGeometry,
    diary: &Diary,
    column: u16,
    row: u16,
) -> Option<Command> {
    let position = Position::new(column, row);
    let slot = geometry
        .slots()
        .find(|slot| slot.area.contains(position))?;

    let is_face_up = geometry.right == Some(slot);
    if is_face_up
        && let Some(Leaf::Proposal {
            yes_label,
            no_label,
            ..
        }) = diary.leaf(slot.leaf)
    {
        let controls = ui::proposal_layout(ui::leaf_inner(slot.area), yes_label, no_label);
        if controls.yes.contains(position) {
            return Some(Command::Accept);
        }
        if controls.no.contains(position) {
            return Some(Command::Decline);
        }
    }

    Some(Command::ClickPage {
        leaf: slot.leaf,
        target: ClickTarget::Surface,
    })
}

/// Photo slot contents for one visible leaf.
pub(crate) fn photo_view(
    diary: &Diary,
    diary_dir: &Path,
    book: &BookViewController,
    slot: LeafSlot,
    cell_px: (u16, u16),
) -> PhotoView {
    let Some(Leaf::Story(page)) = diary.leaf(slot.leaf) else {
        return PhotoView::None;
    };
    if !page.has_photo() {
        return PhotoView::None;
    }
    if diary.photo_path(slot.leaf, diary_dir).is_none() {
        return PhotoView::Unavailable;
    }

    let layout = ui::story_layout(ui::leaf_inner(slot.area), page, book.content_fit(slot.leaf));
    let Some(photo_area) = layout.photo else {
        return PhotoView::None;
    };
    let (max_width, max_height) = area_bounds_px(photo_area, cell_px);
    PhotoView::Local(PhotoKey {
        leaf: slot.leaf,
        max_width,
        max_height,
    })
}

fn to_cells(px: f32, cell: f32) -> u16 {
    if !px.is_finite() || px <= 0.0 {
        return 0;
    }
    (px / cell).round().min(f32::from(u16::MAX)) as u16
}

fn slot(leaf: usize, rect: (i32, i32, u16, u16), viewer: Rect) -> Option<LeafSlot> {
    let area = clip(rect, viewer);
    (area.width > 0 && area.height > 0).then_some(LeafSlot { leaf, area })
}

fn clip((x, y, width, height): (i32, i32, u16, u16), viewer: Rect) -> Rect {
    let left = x.max(i32::from(viewer.x));
    let top = y.max(i32::from(viewer.y));
    let right = (x + i32::from(width)).min(i32::from(viewer.right()));
    let bottom = (y + i32::from(height)).min(i32::from(viewer.bottom()));
    if right <= left || bottom <= top {
        return Rect::new(viewer.x, viewer.y, 0, 0);
    }
    Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    )
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use ratatui::layout::Rect;

    use crate::book::{BookViewController, ClickTarget, FlipTimings};
    use crate::command::Command;
    use crate::diary::{Diary, DiaryPage};
    use crate::ui::{self, PhotoView, split_layout};

    use super::{book_geometry, hit_test, photo_view, viewport_px};

    const CELL: (u16, u16) = (10, 20);

    fn diary(pages: usize) -> Diary {
        Diary {
            pages: (1..=pages)
                .map(|page_number| DiaryPage {
                    page_number,
                    text: format!("page {page_number}"),
                    image_url: String::new(),
                })
                .collect(),
            ..Diary::default()
        }
    }

    fn open_book(diary: &Diary, query: &str, area: Rect) -> (BookViewController, Rect) {
        let mut book = BookViewController::load(
            diary.leaf_count(),
            query,
            FlipTimings::default(),
            Duration::ZERO,
        );
        let layout = split_layout(area, false, false);
        book.resize(viewport_px(&layout, CELL), Duration::ZERO);
        (book, layout.viewer)
    }

    #[test]
    fn viewport_reports_banner_height() {
        let layout = split_layout(Rect::new(0, 0, 100, 30), false, true);
        let viewport = viewport_px(&layout, CELL);
        assert_eq!(viewport.width, 1000.0);
        assert_eq!(viewport.height, 580.0);
        assert_eq!(viewport.banner_height, Some(20.0));
    }

    #[test]
    fn closed_book_is_one_centered_leaf() {
        let diary = diary(2);
        let (book, viewer) = open_book(&diary, "", Rect::new(0, 0, 200, 50));
        let transform = book.transform().expect("transform after resize");
        let geometry = book_geometry(viewer, &transform, &book, CELL);

        assert_eq!(geometry.left, None);
        let right = geometry.right.expect("cover slot");
        assert_eq!(right.leaf, 0);
        assert_eq!(right.area, geometry.book);
        let center = right.area.x + right.area.width / 2;
        assert!(center.abs_diff(viewer.width / 2) <= 1);
    }

    #[test]
    fn open_spread_splits_book_in_halves() {
        let diary = diary(3);
        let (book, viewer) = open_book(&diary, "page=2", Rect::new(0, 0, 200, 50));
        let transform = book.transform().expect("transform after resize");
        let geometry = book_geometry(viewer, &transform, &book, CELL);

        let left = geometry.left.expect("left leaf");
        let right = geometry.right.expect("right leaf");
        assert_eq!((left.leaf, right.leaf), (1, 2));
        assert_eq!(left.area.right(), right.area.x);
        assert_eq!(left.area.y, right.area.y);
        assert!(!geometry.back_cover);
    }

    #[test]
    fn narrow_viewer_pins_spread_to_start() {
        let diary = diary(3);
        let (book, viewer) = open_book(&diary, "page=1", Rect::new(0, 0, 12, 40));
        let transform = book.transform().expect("transform after resize");
        assert_eq!(transform.visual_left(), 0.0);
        let (visual_w, _) = transform.visual_size();
        let book_width = (visual_w / f32::from(CELL.0)).round() as u16;
        assert!(book_width > viewer.width);

        let geometry = book_geometry(viewer, &transform, &book, CELL);
        let left = geometry.left.expect("left leaf");
        assert_eq!(left.area.x, viewer.x);
        assert_eq!(left.area.width, book_width / 2);
        let right = geometry.right.expect("right leaf");
        assert_eq!(right.area.x, viewer.x + book_width / 2);
        assert_eq!(right.area.right(), viewer.right());
    }

    #[test]
    fn back_cover_shows_last_leaf_on_the_left() {
        let diary = diary(1);
        let total = diary.leaf_count();
        let (book, viewer) = open_book(&diary, &format!("page={total}"), Rect::new(0, 0, 200, 50));
        let transform = book.transform().expect("transform after resize");
        let geometry = book_geometry(viewer, &transform, &book, CELL);

        assert!(geometry.back_cover);
        assert_eq!(geometry.left.map(|slot| slot.leaf), Some(total - 1));
        assert_eq!(geometry.right, None);
    }

    #[test]
    fn clicks_resolve_to_pages_and_controls() {
        let diary = diary(1);
        let proposal = diary.leaf_count() - 1;
        let (book, viewer) = open_book(&diary, &format!("page={proposal}"), Rect::new(0, 0, 200, 50));
        let transform = book.transform().expect("transform after resize");
        let geometry = book_geometry(viewer, &transform, &book, CELL);

        let left = geometry.left.expect("story leaf");
        assert_eq!(
            hit_test(&geometry, &diary, left.area.x + 1, left.area.y + 1),
            Some(Command::ClickPage {
                leaf: proposal - 1,
                target: ClickTarget::Surface,
            })
        );

        let right = geometry.right.expect("proposal leaf");
        let controls = ui::proposal_layout(ui::leaf_inner(right.area), &diary.yes_label, &diary.no_label);
        assert_eq!(
            hit_test(&geometry, &diary, controls.yes.x + 1, controls.yes.y + 1),
            Some(Command::Accept)
        );
        assert_eq!(
            hit_test(&geometry, &diary, controls.no.x + 1, controls.no.y + 1),
            Some(Command::Decline)
        );
        assert_eq!(
            hit_test(&geometry, &diary, right.area.x + 1, right.area.y + 1),
            Some(Command::ClickPage {
                leaf: proposal,
                target: ClickTarget::Surface,
            })
        );
        assert_eq!(hit_test(&geometry, &diary, 0, 0), None);
    }

    #[test]
    fn photo_view_distinguishes_local_and_remote_images() {
        let mut diary = diary(2);
        diary.pages[0].image_url = "photos/first.png".to_string();
        diary.pages[1].image_url = "https://example.com/second.png".to_string();
        let (book, viewer) = open_book(&diary, "page=2", Rect::new(0, 0, 200, 50));
        let transform = book.transform().expect("transform after resize");
        let geometry = book_geometry(viewer, &transform, &book, CELL);
        let dir = Path::new("/tmp/diary");

        let left = geometry.left.expect("first story leaf");
        match photo_view(&diary, dir, &book, left, CELL) {
            PhotoView::Local(key) => {
                assert_eq!(key.leaf, 1);
                assert!(key.max_width > 0 && key.max_height > 0);
            }
            other => panic!("expected a local photo, got {other:?}"),
        }
        let right = geometry.right.expect("second story leaf");
        assert_eq!(photo_view(&diary, dir, &book, right, CELL), PhotoView::Unavailable);
    }
}

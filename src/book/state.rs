use std::collections::BTreeSet;

/// Coarse shape of the book, derived from the current page alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing flipped yet; only the cover is visible.
    FrontClosed,
    /// Two-page spread.
    Open,
    /// Every page flipped; only the back is visible.
    BackClosed,
}

impl Phase {
    pub fn of(current_page: usize, total_pages: usize) -> Self {
        if current_page >= total_pages {
            Self::BackClosed
        } else if current_page == 0 {
            Self::FrontClosed
        } else {
            Self::Open
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FrontClosed => "closed",
            Self::Open => "open",
            Self::BackClosed => "closed-back",
        }
    }
}

/// Visual class flags carried by the book container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookClasses {
    pub open: bool,
    pub closed_back: bool,
}

impl From<Phase> for BookClasses {
    fn from(phase: Phase) -> Self {
        Self {
            open: phase == Phase::Open,
            closed_back: phase == Phase::BackClosed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    pub index: usize,
    pub flipped: bool,
    pub z_index: usize,
}

/// Stacking order of a page resting on the left stack.
pub fn flipped_z_index(index: usize) -> usize {
    index + 1
}

/// Stacking order of a page resting on the right stack.
pub fn resting_z_index(index: usize, total_pages: usize) -> usize {
    total_pages.saturating_sub(index)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookState {
    current_page: usize,
    total_pages: usize,
    /// Unflipped pages still drawn at their flipped height while the
    /// backward turn animation plays.
    held_z: BTreeSet<usize>,
}

impl BookState {
    pub fn new(total_pages: usize, current_page: usize) -> Self {
        Self {
            current_page: sanitize_page(current_page, total_pages),
            total_pages,
            held_z: BTreeSet::new(),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn phase(&self) -> Phase {
        Phase::of(self.current_page, self.total_pages)
    }

    pub fn classes(&self) -> BookClasses {
        self.phase().into()
    }

    pub fn is_held(&self, index: usize) -> bool {
        self.held_z.contains(&index)
    }

    pub fn page(&self, index: usize) -> Option<PageView> {
        if index >= self.total_pages {
            return None;
        }

        let flipped = index < self.current_page;
        let z_index = if flipped || self.held_z.contains(&index) {
            flipped_z_index(index)
        } else {
            resting_z_index(index, self.total_pages)
        };
        Some(PageView {
            index,
            flipped,
            z_index,
        })
    }

    pub fn pages(&self) -> Vec<PageView> {
        (0..self.total_pages)
            .filter_map(|index| self.page(index))
            .collect()
    }

    pub(crate) fn flip_forward(&mut self) -> Option<usize> {
        if self.current_page >= self.total_pages {
            return None;
        }
        let index = self.current_page;
        self.held_z.remove(&index);
        self.current_page += 1;
        Some(index)
    }

    pub(crate) fn flip_backward(&mut self) -> Option<usize> {
        if self.current_page == 0 {
            return None;
        }
        self.current_page -= 1;
        let index = self.current_page;
        self.held_z.insert(index);
        Some(index)
    }

    /// Rebuilds the whole book for `target` in one pass, dropping any
    /// in-flight z holds.
    pub(crate) fn jump_to(&mut self, target: usize) {
        self.current_page = sanitize_page(target, self.total_pages);
        self.held_z.clear();
    }

    /// Settles the z-order of one page after its backward turn. Depends only
    /// on the page index, so late or repeated calls are harmless.
    pub(crate) fn release_hold(&mut self, index: usize) {
        self.held_z.remove(&index);
    }
}

/// Out-of-range pages fall back to the front cover.
pub fn sanitize_page(page: usize, total_pages: usize) -> usize {
    if page > total_pages { 0 } else { page }
}

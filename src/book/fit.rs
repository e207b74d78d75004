//! Shrinks page content until it stops overflowing its page.

const FONT_START_CENTIREM: u16 = 120;
const FONT_FLOOR_CENTIREM: u16 = 60;
const FONT_STEP_CENTIREM: u16 = 5;

const PHOTO_START_PCT: u8 = 45;
const PHOTO_FLOOR_PCT: u8 = 20;
const PHOTO_STEP_PCT: u8 = 2;

/// Sizing applied to one page's content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentFit {
    /// Photo region cap, as a percentage of the content height.
    pub photo_max_height_pct: u8,
    /// Text size in hundredths of a rem.
    pub font_centirem: u16,
}

impl Default for ContentFit {
    fn default() -> Self {
        Self {
            photo_max_height_pct: PHOTO_START_PCT,
            font_centirem: FONT_START_CENTIREM,
        }
    }
}

impl ContentFit {
    pub fn font_rem(&self) -> f32 {
        f32::from(self.font_centirem) / 100.0
    }
}

/// Answers layout questions about page content. Hosts implement this with
/// whatever text measurement they have.
pub trait ContentMeasure {
    /// Pages without text are left untouched.
    fn has_text(&self, page: usize) -> bool;

    fn has_photo(&self, page: usize) -> bool;

    fn overflows(&self, page: usize, fit: ContentFit) -> bool;
}

/// Photo first, then text. `None` for pages that carry no text.
pub fn fit_page(measure: &impl ContentMeasure, page: usize) -> Option<ContentFit> {
    if !measure.has_text(page) {
        return None;
    }

    let mut fit = ContentFit::default();
    if measure.has_photo(page) {
        while measure.overflows(page, fit) && fit.photo_max_height_pct > PHOTO_FLOOR_PCT {
            fit.photo_max_height_pct = fit
                .photo_max_height_pct
                .saturating_sub(PHOTO_STEP_PCT)
                .max(PHOTO_FLOOR_PCT);
        }
    }

    while measure.overflows(page, fit) && fit.font_centirem > FONT_FLOOR_CENTIREM {
        fit.font_centirem = fit
            .font_centirem
            .saturating_sub(FONT_STEP_CENTIREM)
            .max(FONT_FLOOR_CENTIREM);
    }
    Some(fit)
}

pub fn fit_pages(measure: &impl ContentMeasure, total_pages: usize) -> Vec<Option<ContentFit>> {
    (0..total_pages).map(|page| fit_page(measure, page)).collect()
}

#[cfg(test)]
mod tests {
    use super::{ContentFit, ContentMeasure, fit_page, fit_pages};

    /// Content height budget of 100 units: photo takes its percentage, text
    /// takes `chars * font`.
    struct Budget {
        chars: Vec<u32>,
        photos: Vec<bool>,
    }

    impl ContentMeasure for Budget {
        fn has_text(&self, page: usize) -> bool {
            self.chars.get(page).is_some_and(|chars| *chars > 0)
        }

        fn has_photo(&self, page: usize) -> bool {
            self.photos.get(page).copied().unwrap_or(false)
        }

        fn overflows(&self, page: usize, fit: ContentFit) -> bool {
            let photo = if self.has_photo(page) {
                u32::from(fit.photo_max_height_pct)
            } else {
                0
            };
            let text = self.chars[page] * u32::from(fit.font_centirem) / 100;
            photo + text > 100
        }
    }

    fn budget(chars: Vec<u32>, photos: Vec<bool>) -> Budget {
        Budget { chars, photos }
    }

    #[test]
    fn content_that_fits_keeps_defaults() {
        let measure = budget(vec![10], vec![true]);
        assert_eq!(fit_page(&measure, 0), Some(ContentFit::default()));
    }

    #[test]
    fn photo_shrinks_before_text() {
        // 50 chars at 1.2rem = 60, photo 45 -> 105; photo 39 gives 99.
        let measure = budget(vec![50], vec![true]);
        let fit = fit_page(&measure, 0).expect("page has text");
        assert_eq!(fit.photo_max_height_pct, 39);
        assert_eq!(fit.font_centirem, 120);
    }

    #[test]
    fn text_shrinks_once_photo_hits_floor() {
        // photo floor 20 leaves 80 units; 80 chars need font <= 1.0.
        let measure = budget(vec![80], vec![true]);
        let fit = fit_page(&measure, 0).expect("page has text");
        assert_eq!(fit.photo_max_height_pct, 20);
        assert_eq!(fit.font_centirem, 100);
    }

    #[test]
    fn text_stops_at_floor_even_if_still_overflowing() {
        let measure = budget(vec![1000], vec![false]);
        let fit = fit_page(&measure, 0).expect("page has text");
        assert_eq!(fit.photo_max_height_pct, 45);
        assert_eq!(fit.font_centirem, 60);
        assert!((fit.font_rem() - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn pages_are_fitted_independently() {
        let measure = budget(vec![0, 50, 10], vec![false, true, false]);
        let fits = fit_pages(&measure, 3);
        assert_eq!(fits[0], None);
        assert_eq!(fits[1].map(|fit| fit.photo_max_height_pct), Some(39));
        assert_eq!(fits[2], Some(ContentFit::default()));
    }
}

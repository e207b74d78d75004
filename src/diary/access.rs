/// Who gets to see a diary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaryAccess {
    /// Unpaid and opened by someone other than the author.
    Locked,
    /// Unpaid, opened by the author: shown with the preview banner.
    Preview,
    Full,
}

impl DiaryAccess {
    pub fn resolve(is_paid: bool, viewer_is_author: bool) -> Self {
        match (is_paid, viewer_is_author) {
            (true, _) => Self::Full,
            (false, true) => Self::Preview,
            (false, false) => Self::Locked,
        }
    }

    pub fn is_locked(self) -> bool {
        self == Self::Locked
    }

    pub fn is_preview(self) -> bool {
        self == Self::Preview
    }
}

#[cfg(test)]
mod tests {
    use super::DiaryAccess;

    #[test]
    fn paid_diaries_are_always_fully_visible() {
        assert_eq!(DiaryAccess::resolve(true, false), DiaryAccess::Full);
        assert_eq!(DiaryAccess::resolve(true, true), DiaryAccess::Full);
    }

    #[test]
    fn unpaid_diaries_lock_strangers_and_preview_authors() {
        assert!(DiaryAccess::resolve(false, false).is_locked());
        assert!(DiaryAccess::resolve(false, true).is_preview());
    }
}

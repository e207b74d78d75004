use std::collections::VecDeque;

const HISTORY_CAPACITY: usize = 64;

pub const CELEBRATION_URL: &str = "#love";

/// Snapshot stored with each history entry. Self-contained: replaying it
/// rebuilds the whole view without looking at the previous entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationEntry {
    pub page: usize,
    pub celebration: bool,
}

impl NavigationEntry {
    pub fn page(page: usize) -> Self {
        Self {
            page,
            celebration: false,
        }
    }

    pub fn celebration(page: usize) -> Self {
        Self {
            page,
            celebration: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryRecord {
    entry: NavigationEntry,
    url: String,
}

/// Session history with a cursor, mirroring how a browser tab keeps its
/// back/forward list.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    records: VecDeque<HistoryRecord>,
    cursor: usize,
}

impl NavigationHistory {
    pub fn new(initial: NavigationEntry, url: impl Into<String>) -> Self {
        let mut records = VecDeque::with_capacity(HISTORY_CAPACITY);
        records.push_back(HistoryRecord {
            entry: initial,
            url: url.into(),
        });
        Self { records, cursor: 0 }
    }

    pub fn current(&self) -> Option<NavigationEntry> {
        self.records.get(self.cursor).map(|record| record.entry)
    }

    pub fn current_url(&self) -> &str {
        self.records
            .get(self.cursor)
            .map(|record| record.url.as_str())
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.records.len()
    }

    /// Drops everything ahead of the cursor and makes `entry` the new top.
    pub fn push(&mut self, entry: NavigationEntry, url: impl Into<String>) {
        self.records.truncate(self.cursor + 1);
        if self.records.len() >= HISTORY_CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(HistoryRecord {
            entry,
            url: url.into(),
        });
        self.cursor = self.records.len() - 1;
    }

    pub fn replace(&mut self, entry: NavigationEntry, url: impl Into<String>) {
        let record = HistoryRecord {
            entry,
            url: url.into(),
        };
        match self.records.get_mut(self.cursor) {
            Some(slot) => *slot = record,
            None => {
                self.records.push_back(record);
                self.cursor = self.records.len() - 1;
            }
        }
    }

    pub fn back(&mut self) -> Option<NavigationEntry> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    pub fn forward(&mut self) -> Option<NavigationEntry> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }
}

pub fn page_url(page: usize) -> String {
    format!("?page={page}")
}

/// Values read from the launch URL's query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaunchParams {
    /// Raw requested page; validated against the book length on load.
    pub page: Option<i64>,
    pub preview: bool,
}

impl LaunchParams {
    pub fn from_query(query: &str) -> Self {
        let query = query.trim();
        let query = query.strip_prefix('?').unwrap_or(query);
        let query = query.split('#').next().unwrap_or("");

        let mut params = Self::default();
        let mut page_seen = false;
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "page" if !page_seen => {
                    page_seen = true;
                    params.page = parse_leading_int(value);
                }
                "preview" => params.preview = value == "true",
                _ => {}
            }
        }
        params
    }

    /// Requested page if it lands inside the book, otherwise the cover.
    pub fn resolve_page(&self, total_pages: usize) -> usize {
        match self.page {
            Some(page) if page >= 0 && (page as u64) <= total_pages as u64 => page as usize,
            _ => 0,
        }
    }
}

/// Lenient integer parse: optional whitespace and sign, then as many digits
/// as are present. `"3abc"` reads as 3, `"abc"` does not parse.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let end = digits
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::{
        HISTORY_CAPACITY, LaunchParams, NavigationEntry, NavigationHistory, page_url,
        parse_leading_int,
    };

    #[test]
    fn push_discards_forward_entries() {
        let mut history = NavigationHistory::new(NavigationEntry::page(0), "");
        history.push(NavigationEntry::page(1), page_url(1));
        history.push(NavigationEntry::page(2), page_url(2));

        assert_eq!(history.back(), Some(NavigationEntry::page(1)));
        history.push(NavigationEntry::celebration(1), "#love");

        assert!(!history.can_go_forward());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current_url(), "#love");
    }

    #[test]
    fn back_and_forward_walk_the_cursor() {
        let mut history = NavigationHistory::new(NavigationEntry::page(0), "?page=0");
        history.push(NavigationEntry::page(1), page_url(1));

        assert_eq!(history.back(), Some(NavigationEntry::page(0)));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some(NavigationEntry::page(1)));
        assert_eq!(history.forward(), None);
        assert_eq!(history.current_url(), "?page=1");
    }

    #[test]
    fn replace_overwrites_current_entry_only() {
        let mut history = NavigationHistory::new(NavigationEntry::page(0), "");
        history.replace(NavigationEntry::page(2), "?page=2");
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), Some(NavigationEntry::page(2)));
    }

    #[test]
    fn history_is_bounded() {
        let mut history = NavigationHistory::new(NavigationEntry::page(0), "");
        for page in 0..(HISTORY_CAPACITY * 2) {
            history.push(NavigationEntry::page(page), page_url(page));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(
            history.current(),
            Some(NavigationEntry::page(HISTORY_CAPACITY * 2 - 1))
        );
    }

    #[test]
    fn launch_query_reads_page_and_preview() {
        let params = LaunchParams::from_query("?page=2&preview=true");
        assert_eq!(params.page, Some(2));
        assert!(params.preview);
        assert_eq!(params.resolve_page(3), 2);

        let params = LaunchParams::from_query("preview=false&page=7");
        assert!(!params.preview);
        assert_eq!(params.resolve_page(3), 0);
    }

    #[test]
    fn malformed_pages_resolve_to_cover() {
        for query in ["", "?page=", "?page=abc", "?page=-1", "?page=99"] {
            assert_eq!(LaunchParams::from_query(query).resolve_page(4), 0, "{query}");
        }
        assert_eq!(LaunchParams::from_query("?page=3xyz").resolve_page(4), 3);
    }

    #[test]
    fn leading_int_parse_is_lenient() {
        assert_eq!(parse_leading_int(" 12px"), Some(12));
        assert_eq!(parse_leading_int("+4"), Some(4));
        assert_eq!(parse_leading_int("-0"), Some(0));
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("x1"), None);
    }
}

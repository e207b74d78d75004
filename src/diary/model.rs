use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

use super::access::DiaryAccess;

pub const MAX_STORY_PAGES: usize = 10;

const DEFAULT_TITLE: &str = "Our Story";
const DEFAULT_DESCRIPTION: &str = "A diary of us...";
const DEFAULT_FINAL_QUESTION: &str = "Will you be my Valentine?";
const DEFAULT_YES_LABEL: &str = "Yes! ❤️";
const DEFAULT_NO_LABEL: &str = "No";
const DEFAULT_SUCCESS_MESSAGE: &str = "Yay! ❤️ I love you!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryPage {
    /// 1-based position in the story.
    pub page_number: usize,
    pub text: String,
    pub image_url: String,
}

impl DiaryPage {
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn has_photo(&self) -> bool {
        !self.image_url.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diary {
    pub slug: Option<String>,
    pub title: String,
    pub description: String,
    pub is_paid: bool,
    pub final_question: String,
    pub yes_label: String,
    pub no_label: String,
    pub success_message: String,
    pub pages: Vec<DiaryPage>,
}

impl Default for Diary {
    fn default() -> Self {
        Self {
            slug: None,
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            is_paid: false,
            final_question: DEFAULT_FINAL_QUESTION.to_string(),
            yes_label: DEFAULT_YES_LABEL.to_string(),
            no_label: DEFAULT_NO_LABEL.to_string(),
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            pages: Vec::new(),
        }
    }
}

/// Wire shape. Every field is optional; blank strings keep the default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawDiary {
    slug: Option<String>,
    title: Option<String>,
    description: Option<String>,
    is_paid: Option<bool>,
    final_question: Option<String>,
    yes_label: Option<String>,
    no_label: Option<String>,
    success_message: Option<String>,
    pages: Option<Vec<RawPage>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPage {
    text: Option<String>,
    image_url: Option<String>,
}

/// One leaf of the rendered book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaf<'a> {
    Cover {
        title: &'a str,
        description: &'a str,
    },
    Story(&'a DiaryPage),
    Proposal {
        question: &'a str,
        yes_label: &'a str,
        no_label: &'a str,
    },
}

impl Diary {
    /// Diary a new author starts from.
    pub fn starter(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            pages: vec![
                DiaryPage {
                    page_number: 1,
                    text: "Chapter 1: The Beginning...".to_string(),
                    image_url: String::new(),
                },
                DiaryPage {
                    page_number: 2,
                    text: "Our story continues...".to_string(),
                    image_url: String::new(),
                },
            ],
            ..Self::default()
        }
    }

    pub fn from_json(raw: &str, context: &str) -> AppResult<Self> {
        let raw = serde_json::from_str::<RawDiary>(raw)
            .map_err(|source| AppError::diary_parse(context, source))?;
        Ok(Self::from_raw(raw))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read diary: {}", path.display()))
        })?;
        let diary = Self::from_json(&raw, &path.display().to_string())?;
        debug!(
            path = %path.display(),
            pages = diary.pages.len(),
            paid = diary.is_paid,
            "diary loaded"
        );
        Ok(diary)
    }

    fn from_raw(raw: RawDiary) -> Self {
        let defaults = Self::default();
        let mut pages = raw.pages.unwrap_or_default();
        if pages.len() > MAX_STORY_PAGES {
            warn!(
                pages = pages.len(),
                kept = MAX_STORY_PAGES,
                "diary has too many pages; extra pages dropped"
            );
            pages.truncate(MAX_STORY_PAGES);
        }

        Self {
            slug: raw.slug.filter(|slug| !slug.trim().is_empty()),
            title: non_blank_or(raw.title, defaults.title),
            description: non_blank_or(raw.description, defaults.description),
            is_paid: raw.is_paid.unwrap_or(false),
            final_question: non_blank_or(raw.final_question, defaults.final_question),
            yes_label: non_blank_or(raw.yes_label, defaults.yes_label),
            no_label: non_blank_or(raw.no_label, defaults.no_label),
            success_message: non_blank_or(raw.success_message, defaults.success_message),
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(index, page)| DiaryPage {
                    page_number: index + 1,
                    text: page.text.unwrap_or_default(),
                    image_url: page.image_url.unwrap_or_default(),
                })
                .collect(),
        }
    }

    pub fn access(&self, viewer_is_author: bool) -> DiaryAccess {
        DiaryAccess::resolve(self.is_paid, viewer_is_author)
    }

    /// Cover, story pages, proposal.
    pub fn leaf_count(&self) -> usize {
        self.pages.len() + 2
    }

    pub fn leaf(&self, index: usize) -> Option<Leaf<'_>> {
        if index == 0 {
            return Some(Leaf::Cover {
                title: &self.title,
                description: &self.description,
            });
        }
        if let Some(page) = self.pages.get(index - 1) {
            return Some(Leaf::Story(page));
        }
        (index == self.pages.len() + 1).then_some(Leaf::Proposal {
            question: &self.final_question,
            yes_label: &self.yes_label,
            no_label: &self.no_label,
        })
    }

    /// Local file behind a page photo. Remote URLs are not fetched.
    pub fn photo_path(&self, leaf_index: usize, base_dir: &Path) -> Option<PathBuf> {
        let Some(Leaf::Story(page)) = self.leaf(leaf_index) else {
            return None;
        };
        if !page.has_photo() {
            return None;
        }

        let url = page.image_url.trim();
        if url.contains("://") && !url.starts_with("file://") {
            return None;
        }
        let local = url.strip_prefix("file://").unwrap_or(url);
        let path = Path::new(local);
        Some(if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        })
    }
}

fn non_blank_or(value: Option<String>, fallback: String) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(fallback)
}

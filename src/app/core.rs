use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::book::{BookViewController, ViewportPx};
use crate::command::ActionId;
use crate::config::Config;
use crate::diary::{Diary, DiaryAccess};
use crate::media::{FsPhotoSource, PhotoCache, PhotoPresenter, PhotoSource};

use super::state::{AppState, Mode};

pub struct PhotoSubsystem {
    pub presenter: PhotoPresenter,
    pub cache: PhotoCache,
    pub source: Arc<dyn PhotoSource>,
}

/// How the diary was opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// URL-style query, e.g. `?page=2&preview=true`.
    pub query: String,
    pub viewer_is_author: bool,
}

pub struct App {
    pub state: AppState,
    pub diary: Diary,
    /// Relative photo paths resolve against this directory.
    pub diary_dir: PathBuf,
    pub access: DiaryAccess,
    /// `None` while the diary is locked.
    pub book: Option<BookViewController>,
    pub photos: PhotoSubsystem,
    pub config: Config,
    pub(super) last_viewport: Option<ViewportPx>,
    started_at: Instant,
}

impl App {
    pub fn new(diary: Diary, diary_dir: PathBuf, options: LaunchOptions, config: Config) -> Self {
        Self::new_with_source(diary, diary_dir, options, config, Arc::new(FsPhotoSource))
    }

    pub fn new_with_source(
        diary: Diary,
        diary_dir: PathBuf,
        options: LaunchOptions,
        config: Config,
        source: Arc<dyn PhotoSource>,
    ) -> Self {
        let access = diary.access(options.viewer_is_author);
        let mut state = AppState::default();

        let book = if access.is_locked() {
            state.mode = Mode::Locked;
            state.status.last_action_id = Some(ActionId::Locked);
            state.status.message = "this diary is locked".to_string();
            None
        } else {
            let mut book = BookViewController::load(
                diary.leaf_count(),
                &options.query,
                config.flip_timings(),
                Duration::ZERO,
            );
            if access.is_preview() {
                book.set_preview(true, Duration::ZERO);
            }
            Some(book)
        };
        info!(
            title = %diary.title,
            leaves = diary.leaf_count(),
            access = ?access,
            "diary opened"
        );

        Self {
            state,
            diary,
            diary_dir,
            access,
            book,
            photos: PhotoSubsystem {
                presenter: PhotoPresenter::default(),
                cache: PhotoCache::new(
                    config.cache.photo_max_entries,
                    config.cache.photo_memory_budget_bytes(),
                ),
                source,
            },
            config,
            last_viewport: None,
            started_at: Instant::now(),
        }
    }

    /// Time on the controller's clock.
    pub fn now(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn is_preview(&self) -> bool {
        self.book
            .as_ref()
            .is_some_and(BookViewController::is_preview)
    }
}

use std::collections::HashSet;
use std::time::Duration;

use ratatui::layout::Rect;
use ratatui::widgets::Clear;
use tracing::{debug, warn};

use crate::book::BookViewController;
use crate::command::{ActionId, location_label};
use crate::error::AppResult;
use crate::media::{PhotoKey, PhotoResult, PhotoWorker};
use crate::ui::{self, ChromeInfo, LeafView, PhotoView, UiLayout};

use super::core::App;
use super::measure::TerminalMeasure;
use super::terminal_session::TerminalSurface;
use super::view_ops::{BookGeometry, book_geometry, photo_view, viewport_px};

/// Screen layout for one frame, computed before drawing so input and photo
/// requests see the same geometry the frame will show.
#[derive(Debug, Clone, Copy)]
pub(super) struct FramePlan {
    pub(super) layout: UiLayout,
    pub(super) geometry: Option<BookGeometry>,
    pub(super) cell_px: (u16, u16),
    pub(super) resized: bool,
}

impl App {
    pub(super) fn resolve_cell_px(&self, session: &impl TerminalSurface) -> (u16, u16) {
        self.photos
            .presenter
            .detected_cell_px()
            .or_else(|| session.cell_px())
            .filter(|(width, height)| *width > 0 && *height > 0)
            .unwrap_or(self.config.render.cell_px)
    }

    /// Lays out the screen and hands any viewport change to the controller.
    pub(super) fn plan_frame(&mut self, session: &impl TerminalSurface) -> AppResult<FramePlan> {
        let area: Rect = session.size()?.into();
        let cell_px = self.resolve_cell_px(session);
        let layout = ui::split_layout(area, self.state.debug_status_visible, self.is_preview());
        let now = self.now();

        let Some(book) = self.book.as_mut() else {
            return Ok(FramePlan {
                layout,
                geometry: None,
                cell_px,
                resized: false,
            });
        };

        let viewport = viewport_px(&layout, cell_px);
        let resized = self.last_viewport != Some(viewport);
        if resized {
            debug!(
                width = viewport.width,
                height = viewport.height,
                banner = ?viewport.banner_height,
                "viewport changed"
            );
            book.resize(viewport, now);
            self.last_viewport = Some(viewport);
        }
        let geometry = book
            .transform()
            .map(|transform| book_geometry(layout.viewer, &transform, book, cell_px));

        Ok(FramePlan {
            layout,
            geometry,
            cell_px,
            resized,
        })
    }

    pub(super) fn run_content_fit(&mut self, plan: &FramePlan) {
        let (Some(book), Some(area)) = (
            self.book.as_mut(),
            plan.geometry.as_ref().and_then(BookGeometry::page_area),
        ) else {
            return;
        };
        book.fit_content(&TerminalMeasure::new(&self.diary, area));
        debug!(width = area.width, height = area.height, "content fitted");
    }

    /// Installs cached photos for visible leaves and queues decodes for the
    /// rest. Returns whether anything new can be drawn.
    pub(super) fn request_visible_photos(
        &mut self,
        plan: &FramePlan,
        worker: &mut PhotoWorker,
    ) -> bool {
        let (Some(book), Some(geometry)) = (self.book.as_ref(), plan.geometry.as_ref()) else {
            return false;
        };
        if geometry.back_cover {
            return false;
        }

        let visible: Vec<PhotoKey> = geometry
            .slots()
            .filter_map(|slot| {
                match photo_view(&self.diary, &self.diary_dir, book, slot, plan.cell_px) {
                    PhotoView::Local(key) => Some(key),
                    PhotoView::None | PhotoView::Unavailable => None,
                }
            })
            .collect();
        let keep: HashSet<PhotoKey> = visible.iter().copied().collect();
        self.photos.presenter.retain(|key| keep.contains(key));

        let mut installed = false;
        for key in visible {
            if self.photos.presenter.is_settled(&key) || worker.is_in_flight(&key) {
                continue;
            }
            if let Some(frame) = self.photos.cache.get(&key) {
                if let Err(err) = self.photos.presenter.install(key, frame) {
                    warn!(leaf = key.leaf, error = %err, "cached photo could not be encoded");
                    self.photos.presenter.mark_failed(key);
                }
                installed = true;
                continue;
            }
            let Some(path) = self.diary.photo_path(key.leaf, &self.diary_dir) else {
                continue;
            };
            if worker.request(key, path) {
                self.state.photos.requested += 1;
            }
        }
        installed
    }

    pub(super) fn apply_photo_result(&mut self, completed: PhotoResult) {
        let PhotoResult {
            key,
            result,
            elapsed,
        } = completed;
        match result {
            Ok(frame) => {
                debug!(
                    leaf = key.leaf,
                    width = frame.width,
                    height = frame.height,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "photo ready"
                );
                self.state.photos.decoded += 1;
                if let Err(err) = self.photos.presenter.install(key, &frame) {
                    warn!(leaf = key.leaf, error = %err, "photo could not be encoded");
                    self.photos.presenter.mark_failed(key);
                    self.state.photos.failed += 1;
                }
                self.photos.cache.insert(key, frame);
            }
            Err(err) => {
                warn!(leaf = key.leaf, error = %err, "photo failed to load");
                self.photos.presenter.mark_failed(key);
                self.state.photos.failed += 1;
                self.state.status.last_action_id = Some(ActionId::PhotoWorker);
                self.state.status.message = format!("photo on page {} failed: {err}", key.leaf);
            }
        }
    }

    pub(super) fn render_frame(
        &mut self,
        session: &mut impl TerminalSurface,
        plan: &FramePlan,
        photos_in_flight: usize,
    ) -> AppResult<()> {
        let now = self.now();
        let Self {
            state,
            diary,
            diary_dir,
            book,
            photos,
            ..
        } = self;

        let info = chrome_info(
            &diary.title,
            book.as_ref(),
            plan,
            photos.presenter.protocol_label(),
            photos.cache.hit_rate(),
            photos_in_flight,
        );
        let mut draw_error = None;

        session.draw(|frame| {
            ui::draw_chrome(frame, plan.layout, state, &info);
            if let Some(banner) = plan.layout.banner {
                ui::draw_preview_banner(frame, banner);
            }
            frame.render_widget(Clear, plan.layout.viewer);

            let Some(book) = book.as_ref() else {
                ui::draw_locked(frame, plan.layout.stage);
                return;
            };
            if let Some(geometry) = plan.geometry.as_ref() {
                for slot in geometry.slots() {
                    if geometry.back_cover {
                        ui::draw_back_cover(frame, slot.area);
                        continue;
                    }
                    let Some(leaf) = diary.leaf(slot.leaf) else {
                        continue;
                    };
                    let view = LeafView {
                        index: slot.leaf,
                        leaf,
                        area: slot.area,
                        fit: book.content_fit(slot.leaf),
                        photo: photo_view(diary, diary_dir, book, slot, plan.cell_px),
                        turning: book.state().is_held(slot.leaf),
                    };
                    if let Err(err) =
                        ui::draw_leaf(frame, &view, book.decline_marker(), &mut photos.presenter)
                    {
                        draw_error.get_or_insert(err);
                    }
                }
            }

            let card_scale = book.transform().map_or(1.0, |transform| transform.card_scale);
            ui::draw_celebration(
                frame,
                plan.layout.stage,
                book.celebration(),
                card_scale,
                plan.cell_px,
                &diary.success_message,
            );
            ui::draw_confetti(
                frame,
                plan.layout.stage,
                book.confetti().particles(),
                now,
                plan.cell_px,
            );
        })?;

        if let Some(err) = draw_error {
            warn!(error = %err, "photo draw failed");
            state.status.last_action_id = Some(ActionId::PhotoWorker);
            state.status.message = format!("photo error: {err}");
        }
        Ok(())
    }

    /// Whether the controller has anything animating between deadlines.
    pub(super) fn is_animating(&self) -> bool {
        self.book
            .as_ref()
            .is_some_and(|book| !book.confetti().is_empty())
    }

    pub(super) fn next_deadline(&self) -> Option<Duration> {
        self.book.as_ref().and_then(BookViewController::next_deadline)
    }
}

fn chrome_info<'a>(
    title: &'a str,
    book: Option<&'a BookViewController>,
    plan: &FramePlan,
    photo_protocol: &'a str,
    photo_cache_hit_rate: f64,
    photos_in_flight: usize,
) -> ChromeInfo<'a> {
    let Some(book) = book else {
        return ChromeInfo {
            title,
            photo_protocol,
            ..ChromeInfo::default()
        };
    };

    let fit = plan
        .geometry
        .and_then(|geometry| geometry.right.or(geometry.left))
        .and_then(|slot| book.content_fit(slot.leaf))
        .map_or_else(
            || "-".to_string(),
            |fit| format!("photo {}% font {:.2}rem", fit.photo_max_height_pct, fit.font_rem()),
        );
    ChromeInfo {
        title,
        location: location_label(book),
        url: book.current_url(),
        phase: book.phase().as_str(),
        pending: book.pending_continuations().count(),
        fit,
        photo_protocol,
        photo_cache_hit_rate,
        photos_in_flight,
    }
}

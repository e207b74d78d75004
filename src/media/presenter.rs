use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Clear;
use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;
use ratatui_image::{FilterType, Resize, StatefulImage};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

use super::cache::PhotoKey;
use super::frame::RgbaFrame;
use super::image_ops::create_protocol_with_picker;

const PHOTO_RESIZE_FILTER: FilterType = FilterType::Nearest;
const ENCODE_FAILURE_MESSAGE: &str = "failed to encode terminal image";

enum PhotoSlot {
    Ready(Box<StatefulProtocol>),
    Failed,
}

/// Terminal-side photo state: one encoded protocol per photo key, drawn
/// with ratatui-image.
pub struct PhotoPresenter {
    picker: Picker,
    protocol_label: &'static str,
    terminal_initialized: bool,
    graphics_detected: bool,
    slots: HashMap<PhotoKey, PhotoSlot>,
}

impl Default for PhotoPresenter {
    fn default() -> Self {
        Self {
            picker: Picker::halfblocks(),
            protocol_label: protocol_type_label(ProtocolType::Halfblocks),
            terminal_initialized: false,
            graphics_detected: false,
            slots: HashMap::new(),
        }
    }
}

impl PhotoPresenter {
    /// Probes the terminal for a graphics protocol. Falls back to halfblocks.
    pub fn initialize_terminal(&mut self) {
        if self.terminal_initialized {
            return;
        }

        match Picker::from_query_stdio() {
            Ok(picker) => {
                self.protocol_label = protocol_type_label(picker.protocol_type());
                self.picker = picker;
                self.graphics_detected = true;
                self.slots.clear();
                debug!(protocol = self.protocol_label, "terminal graphics detected");
            }
            Err(err) => {
                warn!(error = ?err, "terminal graphics query failed; using halfblocks");
            }
        }
        self.terminal_initialized = true;
    }

    pub fn protocol_label(&self) -> &'static str {
        self.protocol_label
    }

    /// Cell size reported by the terminal, if the graphics query answered.
    pub fn detected_cell_px(&self) -> Option<(u16, u16)> {
        let (width, height) = self.picker.font_size();
        (self.graphics_detected && width > 0 && height > 0).then_some((width, height))
    }

    pub fn install(&mut self, key: PhotoKey, frame: &RgbaFrame) -> AppResult<()> {
        match create_protocol_with_picker(&self.picker, frame) {
            Ok(protocol) => {
                self.slots.insert(key, PhotoSlot::Ready(Box::new(protocol)));
                Ok(())
            }
            Err(err) => {
                self.slots.insert(key, PhotoSlot::Failed);
                Err(err)
            }
        }
    }

    pub fn mark_failed(&mut self, key: PhotoKey) {
        self.slots.insert(key, PhotoSlot::Failed);
    }

    /// Known either way: ready to draw or known broken.
    pub fn is_settled(&self, key: &PhotoKey) -> bool {
        self.slots.contains_key(key)
    }

    pub fn has_failed(&self, key: &PhotoKey) -> bool {
        matches!(self.slots.get(key), Some(PhotoSlot::Failed))
    }

    /// Drops encoded photos that no longer match any drawn key.
    pub fn retain(&mut self, mut keep: impl FnMut(&PhotoKey) -> bool) {
        self.slots.retain(|key, _| keep(key));
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `Ok(false)` when the photo is not ready yet.
    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect, key: &PhotoKey) -> AppResult<bool> {
        if area.width == 0 || area.height == 0 {
            return Ok(false);
        }
        let Some(PhotoSlot::Ready(protocol)) = self.slots.get_mut(key) else {
            return Ok(false);
        };

        let target = protocol.size_for(Resize::Fit(Some(PHOTO_RESIZE_FILTER)), area);
        let render_area = center_rect_within(area, target.width, target.height);
        frame.render_widget(Clear, render_area);
        frame.render_stateful_widget(
            StatefulImage::<StatefulProtocol>::default()
                .resize(Resize::Fit(Some(PHOTO_RESIZE_FILTER))),
            render_area,
            protocol.as_mut(),
        );

        if let Some(result) = protocol.last_encoding_result()
            && result.is_err()
        {
            self.slots.insert(*key, PhotoSlot::Failed);
            return Err(AppError::unsupported(ENCODE_FAILURE_MESSAGE));
        }
        Ok(true)
    }
}

fn protocol_type_label(protocol: ProtocolType) -> &'static str {
    match protocol {
        ProtocolType::Halfblocks => "halfblocks",
        ProtocolType::Sixel => "sixel",
        ProtocolType::Kitty => "kitty",
        ProtocolType::Iterm2 => "iterm2",
    }
}

pub(crate) fn center_rect_within(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

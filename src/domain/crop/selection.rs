// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/selection.rs
//
// Crop selection state and drag handle types.
// Inspired by cosmic-viewer (https://codeberg.org/bhh by Bryan Hyland

use super::region::{CropOptions, CropRegion};
use crate::constant::HANDLE_HIT_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragHandle {
    #[default]
    None,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
    Move,
}

/// Selection over one image. The region is always non-empty, inside the
/// image, of the locked ratio, and at least the effective minimum size.
#[derive(Debug, Clone)]
pub struct CropSelection {
    pub region: (f32, f32, f32, f32),
    pub is_dragging: bool,
    pub drag_handle: DragHandle,
    pub drag_start: Option<(f32, f32)>,
    pub drag_start_region: Option<(f32, f32, f32, f32)>,
    img_width: f32,
    img_height: f32,
    options: CropOptions,
}

impl CropSelection {
    pub fn new(img_width: u32, img_height: u32, options: CropOptions) -> Self {
        let (img_width, img_height) = (img_width as f32, img_height as f32);
        Self {
            region: options.initial_region(img_width, img_height),
            is_dragging: false,
            drag_handle: DragHandle::None,
            drag_start: None,
            drag_start_region: None,
            img_width,
            img_height,
            options,
        }
    }

    /// Which handle (if any) sits under the point.
    pub fn hit_test(&self, x: f32, y: f32) -> DragHandle {
        let (rx, ry, rw, rh) = self.region;

        let handles = [
            ((rx, ry), DragHandle::TopLeft),
            ((rx + rw, ry), DragHandle::TopRight),
            ((rx, ry + rh), DragHandle::BottomLeft),
            ((rx + rw, ry + rh), DragHandle::BottomRight),
            ((rx + rw / 2.0, ry), DragHandle::Top),
            ((rx + rw / 2.0, ry + rh), DragHandle::Bottom),
            ((rx, ry + rh / 2.0), DragHandle::Left),
            ((rx + rw, ry + rh / 2.0), DragHandle::Right),
        ];

        for (center, handle) in handles {
            if point_in_handle((x, y), center) {
                return handle;
            }
        }

        if x >= rx && x <= rx + rw && y >= ry && y <= ry + rh {
            return DragHandle::Move;
        }

        DragHandle::None
    }

    pub fn start_handle_drag(&mut self, handle: DragHandle, x: f32, y: f32) {
        if handle == DragHandle::None {
            return;
        }
        self.is_dragging = true;
        self.drag_handle = handle;
        self.drag_start = Some((x, y));
        self.drag_start_region = Some(self.region);
    }

    pub fn update_drag(&mut self, x: f32, y: f32) {
        if !self.is_dragging {
            return;
        }
        let (Some((start_x, start_y)), Some(start_region)) = (self.drag_start, self.drag_start_region)
        else {
            return;
        };
        let (dx, dy) = (x - start_x, y - start_y);

        self.region = match self.drag_handle {
            DragHandle::None => return,
            DragHandle::Move => {
                let (rx, ry, rw, rh) = start_region;
                let new_x = (rx + dx).max(0.0).min(self.img_width - rw);
                let new_y = (ry + dy).max(0.0).min(self.img_height - rh);
                (new_x, new_y, rw, rh)
            }
            DragHandle::TopLeft
            | DragHandle::TopRight
            | DragHandle::BottomLeft
            | DragHandle::BottomRight => self.resize_corner(start_region, dx, dy),
            DragHandle::Top | DragHandle::Bottom => self.resize_vertical(start_region, dy),
            DragHandle::Left | DragHandle::Right => self.resize_horizontal(start_region, dx),
        };
    }

    /// Corner drag: the opposite corner stays fixed.
    fn resize_corner(&self, start: (f32, f32, f32, f32), dx: f32, dy: f32) -> (f32, f32, f32, f32) {
        let (rx, ry, rw, rh) = start;
        let ratio = self.options.aspect_ratio;
        let (min_w, _) = self.options.effective_min(self.img_width, self.img_height);

        // Anchor point plus the direction the moving corner grows in.
        let (ax, ay, dir_x, dir_y) = match self.drag_handle {
            DragHandle::TopLeft => (rx + rw, ry + rh, -1.0, -1.0),
            DragHandle::TopRight => (rx, ry + rh, 1.0, -1.0),
            DragHandle::BottomLeft => (rx + rw, ry, -1.0, 1.0),
            _ => (rx, ry, 1.0, 1.0),
        };

        let want_w = rw + dx * dir_x;
        let want_h = rh + dy * dir_y;
        let room_x = if dir_x > 0.0 { self.img_width - ax } else { ax };
        let room_y = if dir_y > 0.0 { self.img_height - ay } else { ay };
        let max_w = room_x.min(room_y * ratio);

        let w = want_w.max(want_h * ratio).max(min_w).min(max_w);
        let h = w / ratio;
        let new_x = if dir_x > 0.0 { ax } else { ax - w };
        let new_y = if dir_y > 0.0 { ay } else { ay - h };
        (new_x, new_y, w, h)
    }

    /// Top/bottom edge drag: the opposite edge stays fixed, width follows
    /// the ratio around the horizontal center.
    fn resize_vertical(&self, start: (f32, f32, f32, f32), dy: f32) -> (f32, f32, f32, f32) {
        let (rx, ry, rw, rh) = start;
        let ratio = self.options.aspect_ratio;
        let (_, min_h) = self.options.effective_min(self.img_width, self.img_height);
        let center_x = rx + rw / 2.0;
        let half_room_x = center_x.min(self.img_width - center_x);

        let (want_h, room_y) = if self.drag_handle == DragHandle::Top {
            (rh - dy, ry + rh)
        } else {
            (rh + dy, self.img_height - ry)
        };
        let max_h = room_y.min(2.0 * half_room_x / ratio);

        let h = want_h.max(min_h).min(max_h);
        let w = h * ratio;
        let new_y = if self.drag_handle == DragHandle::Top { ry + rh - h } else { ry };
        (center_x - w / 2.0, new_y, w, h)
    }

    /// Left/right edge drag: the opposite edge stays fixed, height follows
    /// the ratio around the vertical center.
    fn resize_horizontal(&self, start: (f32, f32, f32, f32), dx: f32) -> (f32, f32, f32, f32) {
        let (rx, ry, rw, rh) = start;
        let ratio = self.options.aspect_ratio;
        let (min_w, _) = self.options.effective_min(self.img_width, self.img_height);
        let center_y = ry + rh / 2.0;
        let half_room_y = center_y.min(self.img_height - center_y);

        let (want_w, room_x) = if self.drag_handle == DragHandle::Left {
            (rw - dx, rx + rw)
        } else {
            (rw + dx, self.img_width - rx)
        };
        let max_w = room_x.min(2.0 * half_room_y * ratio);

        let w = want_w.max(min_w).min(max_w);
        let h = w / ratio;
        let new_x = if self.drag_handle == DragHandle::Left { rx + rw - w } else { rx };
        (new_x, center_y - h / 2.0, w, h)
    }

    /// Finish the current gesture. Returns true when the region moved.
    pub fn end_drag(&mut self) -> bool {
        let changed = self
            .drag_start_region
            .is_some_and(|start| self.as_pixel_rect() != to_pixel_rect(start));

        self.is_dragging = false;
        self.drag_handle = DragHandle::None;
        self.drag_start = None;
        self.drag_start_region = None;
        changed
    }

    /// Drop any in-progress gesture and go back to the initial region.
    pub fn reset(&mut self) {
        self.region = self.options.initial_region(self.img_width, self.img_height);
        self.is_dragging = false;
        self.drag_handle = DragHandle::None;
        self.drag_start = None;
        self.drag_start_region = None;
    }

    pub fn as_pixel_rect(&self) -> CropRegion {
        to_pixel_rect(self.region)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_pixel_rect((x, y, w, h): (f32, f32, f32, f32)) -> CropRegion {
    CropRegion::new(x as u32, y as u32, w as u32, h as u32)
}

fn point_in_handle((x, y): (f32, f32), (cx, cy): (f32, f32)) -> bool {
    let half = HANDLE_HIT_SIZE / 2.0;
    x >= cx - half && x <= cx + half && y >= cy - half && y <= cy + half
}

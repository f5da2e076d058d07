// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/library.rs
//
// Interactive crop library seam and the built-in gesture implementation.

use anyhow::bail;

use super::region::{CropOptions, CropRegion};
use super::selection::{CropSelection, DragHandle};

/// A live crop session over one image.
///
/// Pointer coordinates are in source-image pixels; mapping from screen
/// space is the host's concern.
pub trait CropSession: Send {
    /// Current crop rectangle.
    fn value(&self) -> CropRegion;

    /// Begin a gesture. Returns the handle that was grabbed.
    fn pointer_down(&mut self, x: f32, y: f32) -> DragHandle;

    /// Continue the current gesture.
    fn pointer_move(&mut self, x: f32, y: f32);

    /// End the current gesture. Returns the new rectangle if it changed.
    fn pointer_up(&mut self) -> Option<CropRegion>;

    /// Release everything the session holds. Further gestures are ignored.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}

/// Factory for crop sessions.
pub trait CropLibrary: Send + Sync {
    fn start(
        &self,
        width: u32,
        height: u32,
        options: CropOptions,
    ) -> anyhow::Result<Box<dyn CropSession>>;
}

/// Built-in crop library driven by pointer gestures.
#[derive(Debug, Default, Clone, Copy)]
pub struct GestureCropper;

impl CropLibrary for GestureCropper {
    fn start(
        &self,
        width: u32,
        height: u32,
        options: CropOptions,
    ) -> anyhow::Result<Box<dyn CropSession>> {
        if width == 0 || height == 0 {
            bail!("Cannot crop an empty image ({width}x{height})");
        }
        if !options.is_valid() {
            bail!("Invalid crop aspect ratio {}", options.aspect_ratio);
        }

        let session = GestureSession {
            selection: CropSelection::new(width, height, options),
            destroyed: false,
        };
        log::debug!(
            "Crop session started on {width}x{height}, initial {:?}",
            session.value()
        );
        Ok(Box::new(session))
    }
}

#[derive(Debug)]
struct GestureSession {
    selection: CropSelection,
    destroyed: bool,
}

impl CropSession for GestureSession {
    fn value(&self) -> CropRegion {
        self.selection.as_pixel_rect()
    }

    fn pointer_down(&mut self, x: f32, y: f32) -> DragHandle {
        if self.destroyed {
            return DragHandle::None;
        }
        let handle = self.selection.hit_test(x, y);
        self.selection.start_handle_drag(handle, x, y);
        handle
    }

    fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.destroyed {
            self.selection.update_drag(x, y);
        }
    }

    fn pointer_up(&mut self) -> Option<CropRegion> {
        if self.destroyed {
            return None;
        }
        self.selection.end_drag().then(|| self.value())
    }

    fn destroy(&mut self) {
        self.selection.reset();
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_rejects_empty_image() {
        assert!(GestureCropper.start(0, 10, CropOptions::default()).is_err());
    }

    #[test]
    fn gesture_reports_change_only_on_release() {
        let mut session = GestureCropper.start(400, 300, CropOptions::default()).unwrap();
        assert_eq!(session.pointer_down(200.0, 150.0), DragHandle::Move);
        session.pointer_move(150.0, 150.0);
        assert_eq!(session.value(), CropRegion::new(0, 0, 300, 300));
        assert_eq!(session.pointer_up(), Some(CropRegion::new(0, 0, 300, 300)));
        // Releasing again without a gesture reports nothing.
        assert_eq!(session.pointer_up(), None);
    }

    #[test]
    fn destroyed_session_ignores_gestures() {
        let mut session = GestureCropper.start(400, 300, CropOptions::default()).unwrap();
        session.destroy();
        assert!(session.is_destroyed());
        assert_eq!(session.pointer_down(200.0, 150.0), DragHandle::None);
        session.pointer_move(0.0, 0.0);
        assert_eq!(session.pointer_up(), None);
    }
}

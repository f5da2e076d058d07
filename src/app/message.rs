// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/message.rs
//
// Widget events: user input, host broadcasts, and internal completions.

use crate::app::container::Binding;
use crate::domain::raster::SelectedFile;

#[derive(Debug)]
pub enum WidgetEvent {
    // Container drag and drop.
    DragOver,
    Drop(Vec<SelectedFile>),

    // File picker.
    ClickableAreaClicked,
    FileChosen(Option<SelectedFile>),

    // Delete control.
    DeleteClicked,

    // Crop gestures, in source-image pixels.
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp,

    // Host broadcast.
    CleanSlot {
        name: String,
    },

    // Prefetch of the previously uploaded image finished.
    RemoteImageFetched(anyhow::Result<SelectedFile>),
}

impl WidgetEvent {
    /// Binding that must be registered for the event to be delivered.
    pub fn binding(&self) -> Option<Binding> {
        match self {
            WidgetEvent::DragOver | WidgetEvent::Drop(_) => Some(Binding::DragAndDrop),
            WidgetEvent::ClickableAreaClicked | WidgetEvent::FileChosen(_) => {
                Some(Binding::ClickableArea)
            }
            WidgetEvent::DeleteClicked => Some(Binding::DeleteButton),
            WidgetEvent::CleanSlot { .. } => Some(Binding::SlotBroadcast),
            WidgetEvent::PointerDown { .. }
            | WidgetEvent::PointerMove { .. }
            | WidgetEvent::PointerUp
            | WidgetEvent::RemoteImageFetched(_) => None,
        }
    }
}

// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/mod.rs
//
// Widget layer: lifecycle, events, and the seams to the host application.

pub mod container;
pub mod fetch;
pub mod host;
pub mod message;
pub mod model;
pub mod picker;
pub mod upload;
pub mod widget;

pub use container::{Binding, Container, ImageElement, MemoryContainer, Part};
pub use fetch::{HttpFetcher, RemoteImageFetcher};
pub use host::{ChannelHostSink, HostEvent, HostSink, LogHostSink, SlotBroadcast, SlotBus};
pub use message::WidgetEvent;
pub use model::WidgetOptions;
pub use picker::{FilePicker, NoFilePicker, PathPicker};
pub use upload::{DirUploadChannel, HttpUploadChannel, UploadChannel};
pub use widget::{Collaborators, CropUploadWidget};

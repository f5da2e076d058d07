#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use cropdrop::app::{
    Collaborators, CropUploadWidget, HostEvent, HostSink, MemoryContainer, UploadChannel,
    WidgetOptions,
};
use cropdrop::{CroppedBlob, SelectedFile, WidgetConfig};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

#[derive(Default)]
pub struct RecordingUpload {
    uploads: Mutex<Vec<(String, CroppedBlob)>>,
}

impl RecordingUpload {
    pub fn uploads(&self) -> Vec<(String, CroppedBlob)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<(String, CroppedBlob)> {
        self.uploads.lock().unwrap().last().cloned()
    }
}

impl UploadChannel for RecordingUpload {
    fn upload(&self, name: &str, blob: CroppedBlob) {
        self.uploads.lock().unwrap().push((name.to_string(), blob));
    }
}

#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl HostSink for RecordingHost {
    fn push_event(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct TestCtx {
    pub upload: Arc<RecordingUpload>,
    pub host: Arc<RecordingHost>,
}

impl TestCtx {
    pub fn new() -> Self {
        Self {
            upload: Arc::new(RecordingUpload::default()),
            host: Arc::new(RecordingHost::default()),
        }
    }

    pub fn deps(&self) -> Collaborators {
        Collaborators::new(self.upload.clone(), self.host.clone())
    }

    pub fn attach(&self, config: &WidgetConfig) -> CropUploadWidget<MemoryContainer> {
        self.attach_with(config, self.deps())
    }

    pub fn attach_with(
        &self,
        config: &WidgetConfig,
        deps: Collaborators,
    ) -> CropUploadWidget<MemoryContainer> {
        CropUploadWidget::attach(
            MemoryContainer::for_config(config),
            deps,
            WidgetOptions::default(),
        )
        .unwrap()
    }
}

/// PNG-encoded gradient of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    }));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn png_file(name: &str, width: u32, height: u32) -> SelectedFile {
    SelectedFile::new(name, png_bytes(width, height))
}

pub fn avatar_config() -> WidgetConfig {
    WidgetConfig::new("avatar", "user:42")
}

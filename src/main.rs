// SPDX-License-Identifier: GPL-3.0-or-later
// src/main.rs
//
// Command line front end: drive one widget against a file or remote image.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;

use cropdrop::app::{
    Collaborators, CropUploadWidget, DirUploadChannel, HttpUploadChannel, LogHostSink,
    MemoryContainer, PathPicker, UploadChannel, WidgetEvent, WidgetOptions,
};
use cropdrop::{AppConfig, CropOptions, WidgetConfig};

#[derive(Debug, Parser)]
#[command(name = "cropdrop", version, about)]
pub struct Args {
    /// Image to select through the file picker.
    pub file: Option<PathBuf>,

    /// Upload slot name.
    #[arg(long, default_value = "avatar")]
    pub name: String,

    /// Deletion reference reported when `--delete` is given.
    #[arg(long, default_value = "")]
    pub reference: String,

    /// URL of a previously uploaded image to start from.
    #[arg(long)]
    pub remote: Option<String>,

    /// Directory to write blobs into.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// HTTP endpoint to PUT blobs to.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Move the crop rectangle by DX DY source pixels.
    #[arg(long = "move", num_args = 2, value_names = ["DX", "DY"], allow_negative_numbers = true)]
    pub shift: Option<Vec<f32>>,

    /// Drag the bottom-right corner by N source pixels (negative shrinks).
    #[arg(long, allow_negative_numbers = true)]
    pub grow: Option<f32>,

    /// Delete the image after cropping.
    #[arg(long)]
    pub delete: bool,

    /// Config file (defaults to the user config directory).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Persist the effective output settings to the config file.
    #[arg(long)]
    pub save_config: bool,
}

enum Uploader {
    Http(HttpUploadChannel),
    Dir(DirUploadChannel),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config_path = args.config.clone().or_else(AppConfig::default_path);
    let mut config = match &config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if args.out.is_some() {
        config.output_dir = args.out.clone();
    }
    if args.endpoint.is_some() {
        config.upload_endpoint = args.endpoint.clone();
    }
    if args.save_config {
        let path = config_path.as_ref().context("No config directory on this system")?;
        config.save(path)?;
        log::info!("Saved config to {}", path.display());
    }

    let uploader = match (&config.upload_endpoint, &config.output_dir) {
        (Some(endpoint), _) => Uploader::Http(HttpUploadChannel::new(endpoint.clone())),
        (None, Some(dir)) => Uploader::Dir(DirUploadChannel::new(dir.clone())),
        (None, None) => bail!("Neither --endpoint nor --out given, and no default output directory"),
    };
    let upload: Arc<dyn UploadChannel> = match &uploader {
        Uploader::Http(channel) => Arc::new(channel.clone()),
        Uploader::Dir(channel) => Arc::new(channel.clone()),
    };

    let mut widget_config = WidgetConfig::new(args.name.clone(), args.reference.clone());
    if let Some(url) = &args.remote {
        widget_config = widget_config.with_uploaded_image(url.clone());
    }

    let deps = Collaborators::new(upload, Arc::new(LogHostSink))
        .with_picker(PathPicker::new(args.file.clone()));
    let options = WidgetOptions {
        crop: CropOptions::default().with_min_size(config.min_crop_size, config.min_crop_size),
        jpeg_quality: config.jpeg_quality,
    };
    let mut widget =
        CropUploadWidget::attach(MemoryContainer::for_config(&widget_config), deps, options)?;

    if args.remote.is_some() && args.file.is_none() {
        let event = widget
            .next_event()
            .await
            .context("Widget closed before the remote image arrived")?;
        widget.handle(event)?;
    } else {
        widget.handle(WidgetEvent::ClickableAreaClicked)?;
    }

    let Some(region) = widget.crop_region() else {
        bail!("No image loaded");
    };
    log::info!("Initial crop {region:?}");

    if let Some(delta) = &args.shift {
        let (cx, cy) = (
            region.x as f32 + region.width as f32 / 2.0,
            region.y as f32 + region.height as f32 / 2.0,
        );
        drag(&mut widget, (cx, cy), (cx + delta[0], cy + delta[1]))?;
    }
    if let Some(amount) = args.grow
        && let Some(region) = widget.crop_region()
    {
        let corner = ((region.x + region.width) as f32, (region.y + region.height) as f32);
        drag(&mut widget, corner, (corner.0 + amount, corner.1 + amount))?;
    }

    if let Some(region) = widget.crop_region() {
        println!(
            "{} {}x{}+{}+{} ({} exports)",
            widget.config().upload_name,
            region.width,
            region.height,
            region.x,
            region.y,
            widget.exports()
        );
    }

    if args.delete {
        widget.handle(WidgetEvent::DeleteClicked)?;
    }

    widget.detach();
    if let Uploader::Http(channel) = &uploader {
        channel.wait_idle().await;
    }
    Ok(())
}

fn drag(
    widget: &mut CropUploadWidget<MemoryContainer>,
    from: (f32, f32),
    to: (f32, f32),
) -> anyhow::Result<()> {
    widget.handle(WidgetEvent::PointerDown { x: from.0, y: from.1 })?;
    widget.handle(WidgetEvent::PointerMove { x: to.0, y: to.1 })?;
    widget.handle(WidgetEvent::PointerUp)
}

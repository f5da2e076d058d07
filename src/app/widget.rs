// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/widget.rs
//
// The crop-upload widget: attach/detach lifecycle and event handling.

use std::sync::Arc;

use anyhow::Context;
use image::GenericImageView;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::app::container::{Binding, Container, ImageElement, Part};
use crate::app::fetch::{HttpFetcher, RemoteImageFetcher};
use crate::app::host::{HostEvent, HostSink, SlotBroadcast, SlotBus};
use crate::app::message::WidgetEvent;
use crate::app::model::{ActiveImage, Session, WidgetOptions};
use crate::app::picker::{FilePicker, NoFilePicker};
use crate::app::upload::UploadChannel;
use crate::config::WidgetConfig;
use crate::domain::crop::{CropLibrary, CropRegion, GestureCropper};
use crate::domain::raster::{self, SelectedFile};

/// External collaborators injected into a widget.
pub struct Collaborators {
    pub upload: Arc<dyn UploadChannel>,
    pub host: Arc<dyn HostSink>,
    pub picker: Box<dyn FilePicker>,
    pub cropper: Box<dyn CropLibrary>,
    pub fetcher: Arc<dyn RemoteImageFetcher>,
    pub slots: Option<SlotBus>,
}

impl Collaborators {
    /// Upload channel and host sink are required; everything else has a
    /// default (no picker, gesture cropper, HTTP fetcher, no slot bus).
    pub fn new(upload: Arc<dyn UploadChannel>, host: Arc<dyn HostSink>) -> Self {
        Self {
            upload,
            host,
            picker: Box::new(NoFilePicker),
            cropper: Box::new(GestureCropper),
            fetcher: Arc::new(HttpFetcher::default()),
            slots: None,
        }
    }

    pub fn with_picker(mut self, picker: impl FilePicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    pub fn with_cropper(mut self, cropper: impl CropLibrary + 'static) -> Self {
        self.cropper = Box::new(cropper);
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn RemoteImageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_slot_bus(mut self, bus: SlotBus) -> Self {
        self.slots = Some(bus);
        self
    }
}

pub struct CropUploadWidget<C: Container> {
    container: C,
    config: WidgetConfig,
    options: WidgetOptions,
    deps: Collaborators,
    session: Option<Session>,
    attached: bool,
    cancel: CancellationToken,
    /// Pending fetch of the previously uploaded image, if any.
    prefetch: Option<CancellationToken>,
    inbox_tx: mpsc::UnboundedSender<WidgetEvent>,
    inbox_rx: mpsc::UnboundedReceiver<WidgetEvent>,
    slot_rx: Option<broadcast::Receiver<SlotBroadcast>>,
    next_image_id: u64,
    exports: u64,
}

impl<C: Container> CropUploadWidget<C> {
    /// Attach a widget to `container`, reading its configuration from the
    /// container's dataset and registering every binding.
    ///
    /// When the dataset names a previously uploaded image, the delete
    /// control is shown and the image is fetched on the current tokio
    /// runtime; the result arrives through [`Self::next_event`].
    pub fn attach(
        mut container: C,
        deps: Collaborators,
        options: WidgetOptions,
    ) -> anyhow::Result<Self> {
        let config = WidgetConfig::from_dataset(&container.dataset())?;

        let runtime = match &config.uploaded_image {
            Some(url) => Some(
                tokio::runtime::Handle::try_current()
                    .with_context(|| format!("Prefetching {url} requires a tokio runtime"))?,
            ),
            None => None,
        };

        for binding in Binding::ALL {
            container.bind(binding);
        }
        let slot_rx = deps.slots.as_ref().map(SlotBus::subscribe);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let mut widget = Self {
            container,
            config,
            options,
            deps,
            session: None,
            attached: true,
            cancel: CancellationToken::new(),
            prefetch: None,
            inbox_tx,
            inbox_rx,
            slot_rx,
            next_image_id: 0,
            exports: 0,
        };
        log::debug!("Attached widget for slot {}", widget.config.upload_name);

        if let (Some(runtime), Some(url)) = (runtime, widget.config.uploaded_image.clone()) {
            widget.container.set_hidden(Part::DeleteButton, false);
            widget.spawn_prefetch(&runtime, url);
        }

        Ok(widget)
    }

    /// Detach from the container. The session goes away with its image
    /// element and any pending fetch is cancelled. Idempotent.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.cancel.cancel();
        self.prefetch = None;

        if let Some(session) = self.session.take() {
            let element = session.destroy();
            self.container.remove_image(element.id);
        }
        for binding in Binding::ALL {
            self.container.unbind(binding);
        }
        self.slot_rx = None;
        log::debug!("Detached widget for slot {}", self.config.upload_name);
    }

    fn spawn_prefetch(&mut self, runtime: &tokio::runtime::Handle, url: String) {
        let token = self.cancel.child_token();
        self.prefetch = Some(token.clone());
        let tx = self.inbox_tx.clone();
        let fetch = self.deps.fetcher.fetch(&url);

        runtime.spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    log::debug!("Prefetch of {url} cancelled");
                    return;
                }
                result = fetch => result,
            };
            if token.is_cancelled() {
                return;
            }
            // The widget may already be gone.
            let _ = tx.send(WidgetEvent::RemoteImageFetched(result));
        });
    }

    /// Handle one event. Events for unregistered bindings, or for a
    /// detached widget, are dropped.
    pub fn handle(&mut self, event: WidgetEvent) -> anyhow::Result<()> {
        if !self.attached {
            log::debug!("Ignoring {event:?} on detached widget");
            return Ok(());
        }
        if let Some(binding) = event.binding()
            && !self.container.is_bound(binding)
        {
            log::debug!("Ignoring {event:?}, {binding:?} not bound");
            return Ok(());
        }

        match event {
            // Accepting the drag is all that is needed.
            WidgetEvent::DragOver => Ok(()),
            WidgetEvent::Drop(files) => self.select_file(files.into_iter().next()),
            WidgetEvent::ClickableAreaClicked => {
                let file = self.deps.picker.pick();
                self.select_file(file)
            }
            WidgetEvent::FileChosen(file) => self.select_file(file),
            WidgetEvent::DeleteClicked => {
                self.delete();
                Ok(())
            }
            WidgetEvent::PointerDown { x, y } => {
                if let Some(session) = &mut self.session {
                    session.crop_mut().pointer_down(x, y);
                }
                Ok(())
            }
            WidgetEvent::PointerMove { x, y } => {
                if let Some(session) = &mut self.session {
                    session.crop_mut().pointer_move(x, y);
                }
                Ok(())
            }
            WidgetEvent::PointerUp => {
                let changed = self
                    .session
                    .as_mut()
                    .and_then(|session| session.crop_mut().pointer_up());
                match changed {
                    Some(region) => self.export(region),
                    None => Ok(()),
                }
            }
            WidgetEvent::CleanSlot { name } => {
                self.clean(&name);
                Ok(())
            }
            WidgetEvent::RemoteImageFetched(result) => {
                // The slot was cleaned while the fetch was in flight.
                if self.prefetch.take().is_none_or(|token| token.is_cancelled()) {
                    log::debug!("Dropping stale prefetch result");
                    return Ok(());
                }
                if let Err(e) = result.and_then(|file| self.start_session(file)) {
                    log::error!("Failed to load previously uploaded image: {e:#}");
                }
                Ok(())
            }
        }
    }

    /// Wait for the next internal event (prefetch completion or slot
    /// broadcast). Never resolves while nothing is pending.
    pub async fn next_event(&mut self) -> Option<WidgetEvent> {
        loop {
            let received = {
                let inbox = &mut self.inbox_rx;
                let slots = &mut self.slot_rx;
                tokio::select! {
                    event = inbox.recv() => return event,
                    msg = recv_slot(slots) => msg,
                }
            };
            match received {
                Ok(SlotBroadcast { name }) => return Some(WidgetEvent::CleanSlot { name }),
                Err(RecvError::Lagged(missed)) => {
                    log::warn!("Slot bus lagged, {missed} broadcasts missed");
                }
                Err(RecvError::Closed) => self.slot_rx = None,
            }
        }
    }

    /// Handle every internal event that is already waiting. Returns how many
    /// were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.try_next_event() {
            if let Err(e) = self.handle(event) {
                log::error!("{e:#}");
            }
            handled += 1;
        }
        handled
    }

    fn try_next_event(&mut self) -> Option<WidgetEvent> {
        if let Ok(event) = self.inbox_rx.try_recv() {
            return Some(event);
        }
        let rx = self.slot_rx.as_mut()?;
        loop {
            match rx.try_recv() {
                Ok(SlotBroadcast { name }) => return Some(WidgetEvent::CleanSlot { name }),
                Err(TryRecvError::Lagged(missed)) => {
                    log::warn!("Slot bus lagged, {missed} broadcasts missed");
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Closed) => {
                    self.slot_rx = None;
                    return None;
                }
            }
        }
    }

    fn select_file(&mut self, file: Option<SelectedFile>) -> anyhow::Result<()> {
        match file {
            Some(file) => self.start_session(file),
            None => Ok(()),
        }
    }

    /// Replace the current session with one over `file`, then export the
    /// initial rectangle.
    ///
    /// Decoding happens first, so a bad file leaves the current session in
    /// place.
    fn start_session(&mut self, file: SelectedFile) -> anyhow::Result<()> {
        let image = raster::decode(&file)?;
        let (width, height) = image.dimensions();
        let crop = self.deps.cropper.start(width, height, self.options.crop)?;

        let name = self.config.upload_name.clone();
        self.clean(&name);
        self.container.set_hidden(Part::ClickableArea, true);

        self.next_image_id += 1;
        let element = ImageElement {
            id: self.next_image_id,
            width,
            height,
            source: file.name,
        };
        self.container.append_image(element.clone());
        self.session = Some(Session::new(ActiveImage { element, image }, crop));
        self.container.set_hidden(Part::DeleteButton, false);

        let region = self.crop_region().context("Session vanished during start")?;
        self.export(region)
    }

    /// Render `region` and hand it to the upload channel.
    fn export(&mut self, region: CropRegion) -> anyhow::Result<()> {
        let Some(session) = &self.session else {
            return Ok(());
        };
        let blob = raster::render_jpeg(session.image(), region, self.options.jpeg_quality)?;
        log::debug!(
            "Exporting {blob:?} from {:?} for slot {}",
            region,
            self.config.upload_name
        );
        self.deps.upload.upload(&self.config.upload_name, blob);
        self.exports += 1;
        Ok(())
    }

    /// Drop the session if `name` is this widget's slot, and abandon a
    /// pending prefetch. Returns true when the name matched. Cleaning an
    /// empty widget is a no-op.
    fn clean(&mut self, name: &str) -> bool {
        if name != self.config.upload_name {
            return false;
        }
        if let Some(token) = self.prefetch.take() {
            token.cancel();
            log::debug!("Cancelled prefetch for slot {name}");
        }
        if let Some(session) = self.session.take() {
            let element = session.destroy();
            self.container.remove_image(element.id);
            log::debug!("Released image {} for slot {name}", element.source);
        }
        true
    }

    fn delete(&mut self) {
        let name = self.config.upload_name.clone();
        self.clean(&name);
        self.container.set_hidden(Part::ClickableArea, false);
        self.container.set_hidden(Part::DeleteButton, true);
        self.deps.host.push_event(HostEvent::DeleteImage {
            reference: self.config.upload_ref.clone(),
        });
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn crop_region(&self) -> Option<CropRegion> {
        self.session.as_ref().map(Session::region)
    }

    /// Source element of the active image.
    pub fn active_image(&self) -> Option<&ImageElement> {
        self.session.as_ref().map(Session::element)
    }

    /// Number of blobs handed to the upload channel so far.
    pub fn exports(&self) -> u64 {
        self.exports
    }
}

impl<C: Container> Drop for CropUploadWidget<C> {
    fn drop(&mut self) {
        self.detach();
    }
}

async fn recv_slot(
    rx: &mut Option<broadcast::Receiver<SlotBroadcast>>,
) -> Result<SlotBroadcast, RecvError> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

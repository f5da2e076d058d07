// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/container.rs
//
// The element a widget is attached to, and an in-memory implementation.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::WidgetConfig;
use crate::constant::{
    ATTR_UPLOAD_NAME, ATTR_UPLOAD_REF, ATTR_UPLOADED_IMAGE, CLICKABLE_AREA_CLASS,
    DELETE_BUTTON_CLASS, DESTROY_EVENT,
};

/// Event wiring a widget registers on attach and removes on detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Binding {
    /// Drag-over suppression and drop handling on the container.
    DragAndDrop,
    /// Click on the clickable area opens the file picker.
    ClickableArea,
    /// Click on the delete control.
    DeleteButton,
    /// Host broadcast asking a slot to drop its session.
    SlotBroadcast,
}

impl Binding {
    pub const ALL: [Binding; 4] = [
        Binding::DragAndDrop,
        Binding::ClickableArea,
        Binding::DeleteButton,
        Binding::SlotBroadcast,
    ];

    /// DOM-style event name the binding listens for.
    pub fn event_name(self) -> &'static str {
        match self {
            Binding::DragAndDrop => "drop",
            Binding::ClickableArea | Binding::DeleteButton => "click",
            Binding::SlotBroadcast => DESTROY_EVENT,
        }
    }
}

/// Sub-elements whose visibility the widget toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Part {
    ClickableArea,
    DeleteButton,
}

impl Part {
    pub fn class(self) -> &'static str {
        match self {
            Part::ClickableArea => CLICKABLE_AREA_CLASS,
            Part::DeleteButton => DELETE_BUTTON_CLASS,
        }
    }
}

/// Image element shown inside the container while a session is live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageElement {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    /// File name or URL the image came from.
    pub source: String,
}

/// Host element a widget is attached to.
pub trait Container: Send {
    /// Data attributes (`data-*`) declared on the element.
    fn dataset(&self) -> BTreeMap<String, String>;

    fn bind(&mut self, binding: Binding);

    fn unbind(&mut self, binding: Binding);

    fn is_bound(&self, binding: Binding) -> bool;

    fn set_hidden(&mut self, part: Part, hidden: bool);

    fn is_hidden(&self, part: Part) -> bool;

    fn append_image(&mut self, element: ImageElement);

    fn remove_image(&mut self, id: u64);
}

/// Headless container. Starts with the clickable area shown and the delete
/// control hidden, matching the server-rendered markup.
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    dataset: BTreeMap<String, String>,
    bindings: BTreeSet<Binding>,
    hidden: BTreeSet<Part>,
    images: Vec<ImageElement>,
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl MemoryContainer {
    pub fn new(dataset: BTreeMap<String, String>) -> Self {
        Self {
            dataset,
            bindings: BTreeSet::new(),
            hidden: BTreeSet::from([Part::DeleteButton]),
            images: Vec::new(),
        }
    }

    /// Container whose dataset declares `config`.
    pub fn for_config(config: &WidgetConfig) -> Self {
        let mut dataset = BTreeMap::from([
            (ATTR_UPLOAD_NAME.to_string(), config.upload_name.clone()),
            (ATTR_UPLOAD_REF.to_string(), config.upload_ref.clone()),
        ]);
        if let Some(url) = &config.uploaded_image {
            dataset.insert(ATTR_UPLOADED_IMAGE.to_string(), url.clone());
        }
        Self::new(dataset)
    }

    pub fn images(&self) -> &[ImageElement] {
        &self.images
    }

    pub fn bindings(&self) -> impl Iterator<Item = Binding> + '_ {
        self.bindings.iter().copied()
    }
}

impl Container for MemoryContainer {
    fn dataset(&self) -> BTreeMap<String, String> {
        self.dataset.clone()
    }

    fn bind(&mut self, binding: Binding) {
        self.bindings.insert(binding);
    }

    fn unbind(&mut self, binding: Binding) {
        self.bindings.remove(&binding);
    }

    fn is_bound(&self, binding: Binding) -> bool {
        self.bindings.contains(&binding)
    }

    fn set_hidden(&mut self, part: Part, hidden: bool) {
        if hidden {
            self.hidden.insert(part);
        } else {
            self.hidden.remove(&part);
        }
    }

    fn is_hidden(&self, part: Part) -> bool {
        self.hidden.contains(&part)
    }

    fn append_image(&mut self, element: ImageElement) {
        self.images.push(element);
    }

    fn remove_image(&mut self, id: u64) {
        self.images.retain(|img| img.id != id);
    }
}

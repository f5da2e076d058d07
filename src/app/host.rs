// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/host.rs
//
// Bridge to the host application: outgoing events and the slot broadcast bus.

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

use crate::constant::{DELETE_EVENT, SLOT_BUS_CAPACITY};

/// Events pushed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// The user deleted the image; the host should drop server-side state.
    DeleteImage {
        #[serde(rename = "ref")]
        reference: String,
    },
}

impl HostEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::DeleteImage { .. } => DELETE_EVENT,
        }
    }
}

/// Receiver of host events.
pub trait HostSink: Send + Sync {
    fn push_event(&self, event: HostEvent);
}

/// Logs events instead of delivering them anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHostSink;

impl HostSink for LogHostSink {
    fn push_event(&self, event: HostEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => log::info!("host event {json}"),
            Err(e) => log::error!("Failed to serialise host event {}: {e}", event.name()),
        }
    }
}

/// Forwards events over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelHostSink {
    tx: mpsc::UnboundedSender<HostEvent>,
}

impl ChannelHostSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl HostSink for ChannelHostSink {
    fn push_event(&self, event: HostEvent) {
        if self.tx.send(event).is_err() {
            log::warn!("Host event receiver dropped");
        }
    }
}

/// Request for every widget owning `name` to drop its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBroadcast {
    pub name: String,
}

/// Host-wide broadcast bus for slot clean requests.
#[derive(Debug, Clone)]
pub struct SlotBus {
    tx: broadcast::Sender<SlotBroadcast>,
}

impl Default for SlotBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SLOT_BUS_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SlotBroadcast> {
        self.tx.subscribe()
    }

    /// Ask the slot `name` to clean up. Returns how many listeners got it.
    pub fn clean(&self, name: impl Into<String>) -> usize {
        let name = name.into();
        match self.tx.send(SlotBroadcast { name: name.clone() }) {
            Ok(receivers) => receivers,
            Err(_) => {
                log::debug!("No listeners for slot broadcast {name}");
                0
            }
        }
    }
}

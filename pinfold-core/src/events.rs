use std::fmt;

use async_trait::async_trait;
use pinfold_model::PinId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::Result;

/// Collection-changed notification published by the engine after every
/// incremental album mutation, so a presentation layer can refresh without
/// polling the store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AlbumEvent {
    /// A placeholder photo was inserted at `index`.
    PhotoInserted { pin_id: PinId, index: u32 },
    /// The photo at `index` received its downloaded bytes.
    PhotoFilled { pin_id: PinId, index: u32 },
    /// The download for `index` failed; the placeholder remains.
    PhotoFillFailed { pin_id: PinId, index: u32 },
    /// The photo at `index` was deleted.
    PhotoRemoved { pin_id: PinId, index: u32 },
    /// Every photo owned by the pin was deleted ahead of a reload.
    AlbumCleared { pin_id: PinId },
}

impl AlbumEvent {
    pub fn pin_id(&self) -> PinId {
        match self {
            AlbumEvent::PhotoInserted { pin_id, .. }
            | AlbumEvent::PhotoFilled { pin_id, .. }
            | AlbumEvent::PhotoFillFailed { pin_id, .. }
            | AlbumEvent::PhotoRemoved { pin_id, .. }
            | AlbumEvent::AlbumCleared { pin_id } => *pin_id,
        }
    }
}

#[async_trait]
pub trait AlbumEventPublisher: Send + Sync {
    async fn publish(&self, event: AlbumEvent) -> Result<()>;
}

/// Lightweight in-process event bus that fans out album notifications to
/// observers inside the host application.
pub struct InProcAlbumEventBus {
    sender: broadcast::Sender<AlbumEvent>,
    channel_capacity: usize,
}

impl fmt::Debug for InProcAlbumEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InProcAlbumEventBus")
            .field("channel_capacity", &self.channel_capacity)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

impl InProcAlbumEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            channel_capacity: capacity,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlbumEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl AlbumEventPublisher for InProcAlbumEventBus {
    async fn publish(&self, event: AlbumEvent) -> Result<()> {
        // A send with no subscribers is not an error; the engine publishes
        // unconditionally.
        let _ = self.sender.send(event);
        Ok(())
    }
}

use async_trait::async_trait;
use pinfold_model::{Photo, Pin, PinId};

use crate::error::Result;

mod memory;

pub use memory::InMemoryPinStore;

/// Repository port for pin and photo durability.
///
/// The engine owns no physical storage; every write is expected to be
/// durable ("save now") when the call returns, and a failed write surfaces
/// as [`crate::AlbumError::Persistence`]. Photos are keyed by
/// `(pin, index)`; `photos` enumerates them in ascending index order, and
/// index gaps left by deletions are preserved, never compacted.
#[async_trait]
pub trait PinStore: Send + Sync {
    // Pins
    async fn create_pin(&self, pin: &Pin) -> Result<()>;
    async fn pin(&self, id: PinId) -> Result<Option<Pin>>;
    async fn pins(&self) -> Result<Vec<Pin>>;
    /// Deletes the pin and cascades to every photo it owns.
    async fn delete_pin(&self, id: PinId) -> Result<()>;
    /// Writes the one-shot reverse-geocode cache.
    async fn update_pin_place(
        &self,
        id: PinId,
        place_name: &str,
        address: Option<&str>,
    ) -> Result<()>;

    // Photos
    async fn insert_photo(&self, photo: &Photo) -> Result<()>;
    async fn photo(&self, pin: PinId, index: u32) -> Result<Option<Photo>>;
    async fn photos(&self, pin: PinId) -> Result<Vec<Photo>>;
    async fn photo_count(&self, pin: PinId) -> Result<u32>;
    async fn update_photo_image(
        &self,
        pin: PinId,
        index: u32,
        image: &[u8],
    ) -> Result<()>;
    async fn delete_photo(&self, pin: PinId, index: u32) -> Result<()>;
}

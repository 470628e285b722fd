use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use pinfold_model::{Photo, Pin, PinId};
use tokio::sync::RwLock;

use crate::error::{AlbumError, Result};

use super::PinStore;

/// In-memory [`PinStore`] backed by a `BTreeMap` per pin, so enumeration is
/// index-ordered and deletion gaps survive. Reference implementation for
/// tests and single-session tooling.
#[derive(Debug, Default)]
pub struct InMemoryPinStore {
    inner: RwLock<HashMap<PinId, PinSlot>>,
}

#[derive(Debug, Clone)]
struct PinSlot {
    pin: Pin,
    photos: BTreeMap<u32, Photo>,
}

impl InMemoryPinStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PinStore for InMemoryPinStore {
    async fn create_pin(&self, pin: &Pin) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.contains_key(&pin.id) {
            return Err(AlbumError::Persistence(format!(
                "pin {} already exists",
                pin.id
            )));
        }
        inner.insert(
            pin.id,
            PinSlot {
                pin: pin.clone(),
                photos: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn pin(&self, id: PinId) -> Result<Option<Pin>> {
        let inner = self.inner.read().await;
        Ok(inner.get(&id).map(|slot| slot.pin.clone()))
    }

    async fn pins(&self) -> Result<Vec<Pin>> {
        let inner = self.inner.read().await;
        let mut pins: Vec<Pin> =
            inner.values().map(|slot| slot.pin.clone()).collect();
        pins.sort_by_key(|pin| (pin.created_at, pin.id));
        Ok(pins)
    }

    async fn delete_pin(&self, id: PinId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .remove(&id)
            .map(|_| ())
            .ok_or(AlbumError::PinNotFound(id))
    }

    async fn update_pin_place(
        &self,
        id: PinId,
        place_name: &str,
        address: Option<&str>,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        let slot = inner.get_mut(&id).ok_or(AlbumError::PinNotFound(id))?;
        slot.pin.place_name = Some(place_name.to_string());
        slot.pin.address = address.map(str::to_string);
        Ok(())
    }

    async fn insert_photo(&self, photo: &Photo) -> Result<()> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .get_mut(&photo.pin_id)
            .ok_or(AlbumError::PinNotFound(photo.pin_id))?;
        if slot.photos.contains_key(&photo.index) {
            return Err(AlbumError::Persistence(format!(
                "pin {} already has a photo at index {}",
                photo.pin_id, photo.index
            )));
        }
        slot.photos.insert(photo.index, photo.clone());
        Ok(())
    }

    async fn photo(&self, pin: PinId, index: u32) -> Result<Option<Photo>> {
        let inner = self.inner.read().await;
        let slot = inner.get(&pin).ok_or(AlbumError::PinNotFound(pin))?;
        Ok(slot.photos.get(&index).cloned())
    }

    async fn photos(&self, pin: PinId) -> Result<Vec<Photo>> {
        let inner = self.inner.read().await;
        let slot = inner.get(&pin).ok_or(AlbumError::PinNotFound(pin))?;
        Ok(slot.photos.values().cloned().collect())
    }

    async fn photo_count(&self, pin: PinId) -> Result<u32> {
        let inner = self.inner.read().await;
        let slot = inner.get(&pin).ok_or(AlbumError::PinNotFound(pin))?;
        Ok(slot.photos.len() as u32)
    }

    async fn update_photo_image(
        &self,
        pin: PinId,
        index: u32,
        image: &[u8],
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        let slot = inner.get_mut(&pin).ok_or(AlbumError::PinNotFound(pin))?;
        let photo = slot.photos.get_mut(&index).ok_or_else(|| {
            AlbumError::Persistence(format!(
                "pin {pin} has no photo at index {index}"
            ))
        })?;
        photo.image = image.to_vec();
        Ok(())
    }

    async fn delete_photo(&self, pin: PinId, index: u32) -> Result<()> {
        let mut inner = self.inner.write().await;
        let slot = inner.get_mut(&pin).ok_or(AlbumError::PinNotFound(pin))?;
        slot.photos.remove(&index).map(|_| ()).ok_or_else(|| {
            AlbumError::Persistence(format!(
                "pin {pin} has no photo at index {index}"
            ))
        })
    }
}

use std::sync::Arc;

use dashmap::DashSet;
use pinfold_model::{BoundingBox, Pin, PinId};
use tracing::{debug, info};

use crate::error::{AlbumError, Result};
use crate::events::{AlbumEvent, AlbumEventPublisher};
use crate::fetch::ImageFetcher;
use crate::geocode::ReverseGeocoder;
use crate::materialize::PhotoMaterializer;
use crate::search::{SearchClient, fetch_spread_page};
use crate::store::PinStore;

/// Orchestrates pin-photo acquisition: bounding box, search, random page
/// selection, and materialization, plus reload and deletion against the same
/// persisted state.
///
/// At most one acquisition runs per pin at a time; a second
/// `load_photos`/`reload_photos` on a busy pin fails fast with
/// [`AlbumError::OperationInFlight`]. Operations on distinct pins are
/// independent. There are no retries and no cancellation: a started
/// acquisition runs to completion or first fatal error.
pub struct AlbumCoordinator {
    search: Arc<dyn SearchClient>,
    store: Arc<dyn PinStore>,
    geocoder: Arc<dyn ReverseGeocoder>,
    events: Arc<dyn AlbumEventPublisher>,
    materializer: PhotoMaterializer,
    per_page: u32,
    in_flight: DashSet<PinId>,
}

impl std::fmt::Debug for AlbumCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlbumCoordinator")
            .field("per_page", &self.per_page)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl AlbumCoordinator {
    pub fn new(
        search: Arc<dyn SearchClient>,
        fetcher: Arc<dyn ImageFetcher>,
        store: Arc<dyn PinStore>,
        geocoder: Arc<dyn ReverseGeocoder>,
        events: Arc<dyn AlbumEventPublisher>,
        per_page: u32,
    ) -> Self {
        let materializer = PhotoMaterializer::new(
            store.clone(),
            fetcher,
            events.clone(),
        );
        Self {
            search,
            store,
            geocoder,
            events,
            materializer,
            per_page,
            in_flight: DashSet::new(),
        }
    }

    /// Creates and immediately persists a pin at the given coordinates.
    pub async fn place_pin(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Pin> {
        let pin = Pin::try_new(latitude, longitude)?;
        self.store.create_pin(&pin).await?;
        info!(pin_id = %pin.id, latitude, longitude, "placed pin");
        Ok(pin)
    }

    /// Acquires a photo collection for the pin: clamped bounding box,
    /// unpaged search, random page selection, then placeholder-then-fill
    /// materialization against the existing collection (additive). Intended
    /// for pins with no photos yet.
    pub async fn load_photos(&self, pin_id: PinId) -> Result<()> {
        let _guard = self.begin(pin_id)?;
        self.load_photos_locked(pin_id).await
    }

    /// Discards every photo the pin owns, then runs the load path against
    /// the now-empty collection.
    pub async fn reload_photos(&self, pin_id: PinId) -> Result<()> {
        let _guard = self.begin(pin_id)?;
        let photos = self.store.photos(pin_id).await?;
        // Descending index order so removals never shift later indices.
        for photo in photos.iter().rev() {
            self.store.delete_photo(pin_id, photo.index).await?;
        }
        self.events
            .publish(AlbumEvent::AlbumCleared { pin_id })
            .await?;
        info!(%pin_id, discarded = photos.len(), "album cleared for reload");
        self.load_photos_locked(pin_id).await
    }

    /// Removes the single photo at `index`. Remaining photos keep their
    /// indices; the resulting gap is expected and preserved.
    pub async fn delete_photo(&self, pin_id: PinId, index: u32) -> Result<()> {
        self.store.delete_photo(pin_id, index).await?;
        self.events
            .publish(AlbumEvent::PhotoRemoved { pin_id, index })
            .await
    }

    /// Deletes the pin, cascading to every photo it owns.
    pub async fn delete_pin(&self, pin_id: PinId) -> Result<()> {
        self.store.delete_pin(pin_id).await?;
        info!(%pin_id, "deleted pin");
        Ok(())
    }

    /// Populates the pin's reverse-geocode cache, at most once per pin: a
    /// pin whose `place_name` is already set is returned as-is without
    /// querying the geocoder.
    pub async fn ensure_place_name(
        &self,
        pin_id: PinId,
    ) -> Result<Option<String>> {
        let pin = self.require_pin(pin_id).await?;
        if pin.place_name.is_some() {
            return Ok(pin.place_name);
        }
        let Some(mark) =
            self.geocoder.lookup(pin.latitude, pin.longitude).await?
        else {
            return Ok(None);
        };
        let place_name = mark.display_name();
        self.store
            .update_pin_place(pin_id, &place_name, mark.name.as_deref())
            .await?;
        debug!(%pin_id, %place_name, "cached reverse-geocode result");
        Ok(Some(place_name))
    }

    async fn load_photos_locked(&self, pin_id: PinId) -> Result<()> {
        let pin = self.require_pin(pin_id).await?;
        let bbox = BoundingBox::around(pin.latitude, pin.longitude);
        debug!(%pin_id, %bbox, per_page = self.per_page, "starting search");
        let page = fetch_spread_page(
            self.search.as_ref(),
            &bbox,
            Some(self.per_page),
        )
        .await?;
        info!(
            %pin_id,
            records = page.records.len(),
            "materializing search results"
        );
        self.materializer.materialize(pin_id, &page.records).await
    }

    async fn require_pin(&self, pin_id: PinId) -> Result<Pin> {
        self.store
            .pin(pin_id)
            .await?
            .ok_or(AlbumError::PinNotFound(pin_id))
    }

    fn begin(&self, pin_id: PinId) -> Result<InFlightGuard<'_>> {
        if !self.in_flight.insert(pin_id) {
            return Err(AlbumError::OperationInFlight(pin_id));
        }
        Ok(InFlightGuard {
            registry: &self.in_flight,
            pin_id,
        })
    }
}

/// Releases a pin's in-flight token when the owning operation finishes,
/// whatever the outcome.
struct InFlightGuard<'a> {
    registry: &'a DashSet<PinId>,
    pin_id: PinId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.remove(&self.pin_id);
    }
}

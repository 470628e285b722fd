use std::sync::Arc;

use pinfold_model::{Photo, PinId};
use tracing::{debug, warn};
use url::Url;

use crate::error::{AlbumError, Result};
use crate::events::{AlbumEvent, AlbumEventPublisher};
use crate::fetch::ImageFetcher;
use crate::search::PhotoRecord;
use crate::store::PinStore;

/// Turns a page of search result records into persisted photos for a pin.
///
/// Two passes over the same records, in the order the search service
/// returned them. Pass 1 appends a placeholder photo for every record beyond
/// the pin's current count, persisting and publishing after each insertion
/// so the collection is renderable immediately. Pass 2 walks the page's
/// index range sequentially, downloading each photo's bytes and replacing
/// the placeholder; a failed download leaves the placeholder in place and
/// moves on.
pub struct PhotoMaterializer {
    store: Arc<dyn PinStore>,
    fetcher: Arc<dyn ImageFetcher>,
    events: Arc<dyn AlbumEventPublisher>,
}

impl std::fmt::Debug for PhotoMaterializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoMaterializer").finish_non_exhaustive()
    }
}

impl PhotoMaterializer {
    pub fn new(
        store: Arc<dyn PinStore>,
        fetcher: Arc<dyn ImageFetcher>,
        events: Arc<dyn AlbumEventPublisher>,
    ) -> Self {
        Self {
            store,
            fetcher,
            events,
        }
    }

    pub async fn materialize(
        &self,
        pin_id: PinId,
        records: &[PhotoRecord],
    ) -> Result<()> {
        self.insert_placeholders(pin_id, records).await?;
        self.fill(pin_id, records.len()).await
    }

    /// Pass 1: placeholder insertion. A record without an image URL is fatal
    /// for the page; placeholders inserted before it remain.
    async fn insert_placeholders(
        &self,
        pin_id: PinId,
        records: &[PhotoRecord],
    ) -> Result<()> {
        let mut count = self.store.photo_count(pin_id).await?;
        for (position, record) in records.iter().enumerate() {
            let raw_url = record
                .url
                .as_deref()
                .ok_or(AlbumError::MissingImageUrl { position })?;
            let source_url = Url::parse(raw_url)?;
            if (position as u32) < count {
                // Already persisted from an earlier page; leave untouched.
                continue;
            }
            let photo = Photo::placeholder(
                pin_id,
                count,
                record.title.clone(),
                source_url,
            );
            self.store.insert_photo(&photo).await?;
            self.events
                .publish(AlbumEvent::PhotoInserted {
                    pin_id,
                    index: count,
                })
                .await?;
            count += 1;
        }
        debug!(%pin_id, count, "placeholder pass complete");
        Ok(())
    }

    /// Pass 2: sequential fill of `[0, page_len)`, bounded by the persisted
    /// count. Per-item download failures are contained here.
    async fn fill(&self, pin_id: PinId, page_len: usize) -> Result<()> {
        for position in 0..page_len {
            let index = position as u32;
            if index >= self.store.photo_count(pin_id).await? {
                continue;
            }
            // Re-read: the photo may have been deleted while downloads for
            // earlier indices were in flight.
            let Some(photo) = self.store.photo(pin_id, index).await? else {
                continue;
            };
            match self.fetcher.fetch(&photo.source_url).await {
                Ok(image) => {
                    self.store
                        .update_photo_image(pin_id, index, &image)
                        .await?;
                    self.events
                        .publish(AlbumEvent::PhotoFilled { pin_id, index })
                        .await?;
                }
                Err(err) => {
                    warn!(
                        %pin_id,
                        index,
                        url = %photo.source_url,
                        error = %err,
                        "image download failed, keeping placeholder"
                    );
                    self.events
                        .publish(AlbumEvent::PhotoFillFailed {
                            pin_id,
                            index,
                        })
                        .await?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryPinStore;
    use async_trait::async_trait;
    use pinfold_model::Pin;
    use std::collections::HashSet;
    use tokio::sync::Mutex;

    struct StubFetcher {
        failing: HashSet<String>,
    }

    impl StubFetcher {
        fn reliable() -> Self {
            Self {
                failing: HashSet::new(),
            }
        }

        fn failing_on(urls: &[&str]) -> Self {
            Self {
                failing: urls.iter().map(|u| u.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl ImageFetcher for StubFetcher {
        async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
            if self.failing.contains(url.as_str()) {
                return Err(AlbumError::EmptyBody);
            }
            Ok(url.as_str().as_bytes().to_vec())
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<AlbumEvent>>,
    }

    #[async_trait]
    impl AlbumEventPublisher for RecordingPublisher {
        async fn publish(&self, event: AlbumEvent) -> Result<()> {
            self.events.lock().await.push(event);
            Ok(())
        }
    }

    fn records(urls: &[&str]) -> Vec<PhotoRecord> {
        urls.iter()
            .map(|url| PhotoRecord {
                title: None,
                url: Some(url.to_string()),
            })
            .collect()
    }

    async fn seeded_store() -> (Arc<InMemoryPinStore>, PinId) {
        let store = Arc::new(InMemoryPinStore::new());
        let pin = Pin::new(41.9, 12.5);
        store.create_pin(&pin).await.expect("create pin");
        (store, pin.id)
    }

    #[tokio::test]
    async fn placeholders_are_inserted_before_any_fill() {
        let (store, pin_id) = seeded_store().await;
        let events = Arc::new(RecordingPublisher::default());
        let materializer = PhotoMaterializer::new(
            store.clone(),
            Arc::new(StubFetcher::reliable()),
            events.clone(),
        );

        let page = records(&[
            "https://live.example.com/0_m.jpg",
            "https://live.example.com/1_m.jpg",
            "https://live.example.com/2_m.jpg",
        ]);
        materializer
            .materialize(pin_id, &page)
            .await
            .expect("materialize");

        let log = events.events.lock().await;
        let inserted: Vec<&AlbumEvent> = log
            .iter()
            .filter(|e| matches!(e, AlbumEvent::PhotoInserted { .. }))
            .collect();
        assert_eq!(inserted.len(), 3);
        // Every insertion precedes every fill.
        let first_fill = log
            .iter()
            .position(|e| matches!(e, AlbumEvent::PhotoFilled { .. }))
            .expect("fills happened");
        let last_insert = log
            .iter()
            .rposition(|e| matches!(e, AlbumEvent::PhotoInserted { .. }))
            .expect("inserts happened");
        assert!(last_insert < first_fill);

        let photos = store.photos(pin_id).await.expect("photos");
        assert_eq!(photos.len(), 3);
        assert!(photos.iter().all(|p| !p.is_placeholder()));
    }

    #[tokio::test]
    async fn a_failed_download_keeps_its_placeholder_only() {
        let (store, pin_id) = seeded_store().await;
        let events = Arc::new(RecordingPublisher::default());
        let materializer = PhotoMaterializer::new(
            store.clone(),
            Arc::new(StubFetcher::failing_on(&[
                "https://live.example.com/2_m.jpg",
            ])),
            events.clone(),
        );

        let urls: Vec<String> = (0..5)
            .map(|i| format!("https://live.example.com/{i}_m.jpg"))
            .collect();
        let url_refs: Vec<&str> =
            urls.iter().map(String::as_str).collect();
        materializer
            .materialize(pin_id, &records(&url_refs))
            .await
            .expect("materialize reports success");

        let photos = store.photos(pin_id).await.expect("photos");
        assert_eq!(photos.len(), 5);
        for photo in &photos {
            if photo.index == 2 {
                assert!(photo.is_placeholder());
            } else {
                assert!(!photo.is_placeholder());
            }
        }

        let log = events.events.lock().await;
        assert!(log.iter().any(|e| matches!(
            e,
            AlbumEvent::PhotoFillFailed { index: 2, .. }
        )));
    }

    #[tokio::test]
    async fn a_record_without_a_url_stops_the_placeholder_pass() {
        let (store, pin_id) = seeded_store().await;
        let materializer = PhotoMaterializer::new(
            store.clone(),
            Arc::new(StubFetcher::reliable()),
            Arc::new(RecordingPublisher::default()),
        );

        let mut page = records(&[
            "https://live.example.com/0_m.jpg",
            "https://live.example.com/1_m.jpg",
        ]);
        page.push(PhotoRecord {
            title: Some("no url".into()),
            url: None,
        });
        page.push(PhotoRecord {
            title: None,
            url: Some("https://live.example.com/3_m.jpg".into()),
        });

        let err = materializer
            .materialize(pin_id, &page)
            .await
            .expect_err("missing url is fatal");
        assert!(matches!(
            err,
            AlbumError::MissingImageUrl { position: 2 }
        ));

        // The two placeholders inserted before the bad record remain.
        let photos = store.photos(pin_id).await.expect("photos");
        assert_eq!(photos.len(), 2);
        assert!(photos.iter().all(Photo::is_placeholder));
    }

    #[tokio::test]
    async fn existing_photos_are_left_untouched_on_an_additive_pass() {
        let (store, pin_id) = seeded_store().await;
        let events = Arc::new(RecordingPublisher::default());
        let materializer = PhotoMaterializer::new(
            store.clone(),
            Arc::new(StubFetcher::reliable()),
            events.clone(),
        );

        let page = records(&[
            "https://live.example.com/0_m.jpg",
            "https://live.example.com/1_m.jpg",
        ]);
        materializer
            .materialize(pin_id, &page)
            .await
            .expect("first pass");
        materializer
            .materialize(pin_id, &page)
            .await
            .expect("second pass");

        // No new photos: both records sit below the persisted count.
        let photos = store.photos(pin_id).await.expect("photos");
        assert_eq!(photos.len(), 2);
        let log = events.events.lock().await;
        let inserted = log
            .iter()
            .filter(|e| matches!(e, AlbumEvent::PhotoInserted { .. }))
            .count();
        assert_eq!(inserted, 2);
    }

    #[tokio::test]
    async fn default_caption_is_applied_when_the_title_is_absent() {
        let (store, pin_id) = seeded_store().await;
        let materializer = PhotoMaterializer::new(
            store.clone(),
            Arc::new(StubFetcher::reliable()),
            Arc::new(RecordingPublisher::default()),
        );

        materializer
            .materialize(
                pin_id,
                &records(&["https://live.example.com/0_m.jpg"]),
            )
            .await
            .expect("materialize");

        let photo = store
            .photo(pin_id, 0)
            .await
            .expect("photo")
            .expect("present");
        assert_eq!(photo.caption, pinfold_model::pin::DEFAULT_CAPTION);
    }
}

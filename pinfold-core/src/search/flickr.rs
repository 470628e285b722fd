use std::time::Duration;

use async_trait::async_trait;
use pinfold_model::BoundingBox;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{AlbumError, Result};

use super::{PhotoRecord, SearchClient, SearchResultPage};

const SEARCH_METHOD: &str = "flickr.photos.search";
const MEDIUM_URL_EXTRA: &str = "url_m";
const RESPONSE_FORMAT: &str = "json";
const DISABLE_JSON_CALLBACK: &str = "1";
const USE_SAFE_SEARCH: &str = "1";
const OK_STATUS: &str = "ok";

/// Flickr REST implementation of [`SearchClient`].
///
/// Issues `flickr.photos.search` GET requests with the medium-resolution URL
/// extra, JSON response format, and safe search enabled.
pub struct FlickrSearchClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl std::fmt::Debug for FlickrSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlickrSearchClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl FlickrSearchClient {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: Url,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http,
            endpoint,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SearchClient for FlickrSearchClient {
    async fn search(
        &self,
        bbox: &BoundingBox,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<SearchResultPage> {
        let bbox = bbox.to_string();
        let mut request = self.http.get(self.endpoint.clone()).query(&[
            ("method", SEARCH_METHOD),
            ("api_key", self.api_key.as_str()),
            ("extras", MEDIUM_URL_EXTRA),
            ("format", RESPONSE_FORMAT),
            ("nojsoncallback", DISABLE_JSON_CALLBACK),
            ("safe_search", USE_SAFE_SEARCH),
            ("bbox", bbox.as_str()),
        ]);
        if let Some(limit) = limit {
            request = request.query(&[("per_page", limit.to_string())]);
        }
        if let Some(page) = page {
            request = request.query(&[("page", page.to_string())]);
        }

        debug!(bbox = %bbox, ?limit, ?page, "photo search request");
        let response = request.send().await?;

        let status = response.status();
        if status.as_u16() == 403 {
            return Err(AlbumError::Auth);
        }
        if !status.is_success() {
            return Err(AlbumError::Http(status.as_u16()));
        }

        let body = response.bytes().await?;
        decode_body(&body)
    }
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    stat: String,
    photos: Option<PhotosBody>,
}

#[derive(Debug, Deserialize)]
struct PhotosBody {
    pages: u32,
    photo: Vec<PhotoBody>,
}

#[derive(Debug, Deserialize)]
struct PhotoBody {
    title: Option<String>,
    url_m: Option<String>,
}

fn decode_body(body: &[u8]) -> Result<SearchResultPage> {
    if body.is_empty() {
        return Err(AlbumError::EmptyBody);
    }
    let envelope: SearchEnvelope = serde_json::from_slice(body)
        .map_err(|err| AlbumError::Decode(err.to_string()))?;
    if envelope.stat != OK_STATUS {
        warn!(stat = %envelope.stat, "search API reported a non-ok status");
    }
    let photos = envelope.photos.ok_or_else(|| {
        AlbumError::Decode("response has no photos object".to_string())
    })?;
    Ok(SearchResultPage {
        pages: photos.pages,
        records: photos
            .photo
            .into_iter()
            .map(|record| PhotoRecord {
                title: record.title,
                url: record.url_m,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_search_payload() {
        let body = br#"{
            "photos": {
                "page": 1,
                "pages": 12,
                "perpage": 10,
                "total": 117,
                "photo": [
                    {"id": "1", "title": "harbor", "url_m": "https://live.example.com/1_m.jpg"},
                    {"id": "2", "title": "", "url_m": "https://live.example.com/2_m.jpg"},
                    {"id": "3", "title": "no url here"}
                ]
            },
            "stat": "ok"
        }"#;
        let page = decode_body(body).expect("decode");
        assert_eq!(page.pages, 12);
        assert_eq!(page.records.len(), 3);
        assert_eq!(page.records[0].title.as_deref(), Some("harbor"));
        assert_eq!(
            page.records[0].url.as_deref(),
            Some("https://live.example.com/1_m.jpg")
        );
        assert_eq!(page.records[1].title.as_deref(), Some(""));
        assert_eq!(page.records[2].url, None);
    }

    #[test]
    fn empty_body_is_its_own_error() {
        assert!(matches!(decode_body(b""), Err(AlbumError::EmptyBody)));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(
            decode_body(b"jsonFlickrApi("),
            Err(AlbumError::Decode(_))
        ));
    }

    #[test]
    fn missing_photos_object_is_a_decode_error() {
        let body = br#"{"stat": "fail", "code": 100, "message": "Invalid API Key"}"#;
        assert!(matches!(decode_body(body), Err(AlbumError::Decode(_))));
    }
}

use url::Url;

/// Default search API endpoint (Flickr REST).
pub const DEFAULT_ENDPOINT: &str = "https://api.flickr.com/services/rest";
/// Default per-page result limit requested from the search API.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Default transport timeout for outbound HTTP, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub http: HttpConfig,
}

/// Photo-search service settings.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub endpoint: Url,
    pub per_page: u32,
}

impl SearchConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        SearchConfig {
            api_key: api_key.into(),
            endpoint: default_endpoint(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

pub(crate) fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT)
        .expect("default endpoint constant should parse")
}

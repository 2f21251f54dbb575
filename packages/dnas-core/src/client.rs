use crate::access_points::AccessPointsService;
use crate::active_clients::ActiveClientsService;
use crate::error::{Error, Result};
use crate::history::HistoryService;
use crate::map::MapService;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Timeout applied to the HTTP client built by [`Client::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// DNA Spaces deployment zone. Selects the API host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// `dnaspaces.io`, used for the Americas
    Io,
    /// `dnaspaces.eu`
    Eu,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Io => "io",
            Region::Eu => "eu",
        }
    }

    pub fn base_url(&self) -> String {
        format!("https://dnaspaces.{}/api/location/v1", self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "io" => Ok(Region::Io),
            "eu" => Ok(Region::Eu),
            other => Err(Error::InvalidRegion(other.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection to the DNA Spaces location API.
///
/// Read-only after construction, so a single client (or clones of it, which
/// share a connection pool) can serve concurrent calls.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for `region` ("io" or "eu") using a default HTTP
    /// client with a 10 second timeout.
    pub fn new(api_key: &str, region: &str) -> Result<Self> {
        let (api_key, region) = validate(api_key, region)?;
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self::assemble(api_key, region, http))
    }

    /// Create a client that sends requests through the supplied HTTP client.
    pub fn with_http_client(api_key: &str, region: &str, http: reqwest::Client) -> Result<Self> {
        let (api_key, region) = validate(api_key, region)?;
        Ok(Self::assemble(api_key, region, http))
    }

    fn assemble(api_key: String, region: Region, http: reqwest::Client) -> Self {
        tracing::debug!("DNA Spaces client created for region {}", region);
        Self {
            base_url: region.base_url(),
            api_key,
            http,
        }
    }

    /// Point the client at a local responder.
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Build a GET request for `path` below the base URL.
    pub(crate) fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(format!("{}{}", self.base_url, path))
    }

    /// Build a GET request for `path` followed by `id` as one encoded path
    /// segment, so `/`, `?` and `#` in an identifier stay part of it.
    pub(crate) fn get_item(&self, path: &str, id: &str) -> Result<reqwest::RequestBuilder> {
        let mut url = reqwest::Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.base_url.clone()))?
            .push(id);
        Ok(self.http.get(url))
    }

    pub fn access_points(&self) -> AccessPointsService<'_> {
        AccessPointsService::new(self)
    }

    pub fn active_clients(&self) -> ActiveClientsService<'_> {
        ActiveClientsService::new(self)
    }

    pub fn history(&self) -> HistoryService<'_> {
        HistoryService::new(self)
    }

    pub fn map(&self) -> MapService<'_> {
        MapService::new(self)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn validate(api_key: &str, region: &str) -> Result<(String, Region)> {
    if api_key.is_empty() {
        return Err(Error::MissingApiKey);
    }
    let region = region.parse::<Region>()?;
    Ok((api_key.to_string(), region))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_per_region() {
        let io = Client::new("key", "io").unwrap();
        assert_eq!(io.base_url(), "https://dnaspaces.io/api/location/v1");
        let eu = Client::new("key", "eu").unwrap();
        assert_eq!(eu.base_url(), "https://dnaspaces.eu/api/location/v1");
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let err = Client::new("", "io").unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[test]
    fn test_unknown_region_rejected() {
        for region in ["", "us", "IO", "com", "eu "] {
            let err = Client::new("key", region).unwrap_err();
            assert!(matches!(err, Error::InvalidRegion(_)), "region {:?}", region);
        }
    }

    #[test]
    fn test_custom_http_client() {
        let http = reqwest::Client::new();
        let client = Client::with_http_client("key", "eu", http).unwrap();
        assert_eq!(client.api_key(), "key");
        assert!(Client::with_http_client("", "eu", reqwest::Client::new()).is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let client = Client::new("super-secret", "io").unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_region_round_trip() {
        assert_eq!("io".parse::<Region>().unwrap(), Region::Io);
        assert_eq!(Region::Eu.to_string(), "eu");
    }
}

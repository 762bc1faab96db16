//! WeatherAPI.com `current.json` client.

use reqwest::Client;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use url::Url;

use crate::error::WeatherError;
use crate::types::{LocationQuery, WeatherResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
const REDACTED: &str = "REDACTED";

/// Anything that can answer a current-conditions lookup.
pub trait WeatherSource: Send + Sync {
    fn current_weather(
        &self,
        query: &LocationQuery,
    ) -> impl Future<Output = Result<WeatherResponse, WeatherError>> + Send;
}

#[derive(Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    api_key: String,
    base_url: Url,
}

impl fmt::Debug for WeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherProvider")
            .field("api_key", &REDACTED)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl WeatherProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        Ok(Self {
            client: Arc::new(client),
            api_key: api_key.into(),
            base_url,
        })
    }

    /// `{base}/current.json?key=<credential>&q=<query>`.
    ///
    /// `current.json` is appended as a path segment, so query parameters
    /// already on the base URL are kept and its fragment is dropped. The
    /// query is form-encoded: the decoded `q` parameter is the query exactly
    /// as given.
    pub fn request_url(&self, query: &LocationQuery) -> Result<Url, WeatherError> {
        let mut url = self.base_url.clone();
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push("current.json");
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("q", query.as_str());
        Ok(url)
    }

    /// Fetch current conditions for a location.
    ///
    /// The body is parsed as JSON whatever the HTTP status, since the API
    /// reports failures as `{"error": {...}}` with a 4xx status.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, query: &LocationQuery) -> Result<WeatherResponse, WeatherError> {
        let url = self.request_url(query)?;
        tracing::debug!("Requesting {}", redact_key(&url));

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let body: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| WeatherError::Parse(format!("HTTP {}: {}", status, e)))?;

        let response = WeatherResponse::from_value(body);
        if let Some(err) = response.remote_error() {
            tracing::warn!("Weather API returned an error (HTTP {}): {}", status, err);
            return Err(WeatherError::Remote(err));
        }

        tracing::debug!("Weather API responded with HTTP {}", status);
        Ok(response)
    }
}

impl WeatherSource for WeatherProvider {
    fn current_weather(
        &self,
        query: &LocationQuery,
    ) -> impl Future<Output = Result<WeatherResponse, WeatherError>> + Send {
        self.fetch(query)
    }
}

/// Copy of `url` with the credential replaced, safe to log.
pub fn redact_key(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { REDACTED.to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> WeatherProvider {
        WeatherProvider::new("secret-key", Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_request_url_carries_query_and_key() {
        let url = provider().request_url(&LocationQuery::from("10,10")).unwrap();
        assert_eq!(url.host_str(), Some("api.weatherapi.com"));
        assert_eq!(url.path(), "/v1/current.json");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("key".to_string(), "secret-key".to_string()),
                ("q".to_string(), "10,10".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_url_free_text_survives_encoding() {
        let query = LocationQuery::from("Saint-Étienne & Lyon");
        let url = provider().request_url(&query).unwrap();
        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned());
        assert_eq!(q.as_deref(), Some("Saint-Étienne & Lyon"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider =
            WeatherProvider::with_base_url("k", "http://localhost:9000/v1/", Duration::from_secs(1))
                .unwrap();
        let url = provider.request_url(&LocationQuery::from("x")).unwrap();
        assert_eq!(url.path(), "/v1/current.json");
    }

    #[test]
    fn test_base_url_with_query_and_fragment() {
        let provider = WeatherProvider::with_base_url(
            "k",
            "http://localhost:9000/v1?tenant=a#top",
            Duration::from_secs(1),
        )
        .unwrap();
        let url = provider.request_url(&LocationQuery::from("x")).unwrap();
        assert_eq!(url.path(), "/v1/current.json");
        assert_eq!(url.fragment(), None);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("tenant".to_string(), "a".to_string()),
                ("key".to_string(), "k".to_string()),
                ("q".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_bare_host_base_url() {
        let provider =
            WeatherProvider::with_base_url("k", "http://localhost:9000", Duration::from_secs(1))
                .unwrap();
        let url = provider.request_url(&LocationQuery::from("x")).unwrap();
        assert_eq!(url.path(), "/current.json");
    }

    #[test]
    fn test_cannot_be_a_base_url_rejected() {
        let err = WeatherProvider::with_base_url(
            "k",
            "mailto:weather@example.com",
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, WeatherError::Endpoint(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = WeatherProvider::with_base_url("k", "not a url", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, WeatherError::Endpoint(_)));
    }

    #[test]
    fn test_redact_key() {
        let url = provider().request_url(&LocationQuery::from("Paris")).unwrap();
        let redacted = redact_key(&url).to_string();
        assert!(!redacted.contains("secret-key"));
        assert!(redacted.contains("key=REDACTED"));
        assert!(redacted.contains("q=Paris"));
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", provider());
        assert!(!debug.contains("secret-key"));
    }
}

//! HTTP source implementation.
//!
//! The HTTP client is abstracted via a trait so the engine can be tested
//! without a network and so other HTTP libraries can be plugged in.
//! With the `http` feature (default), [`ReqwestClient`] provides a blocking
//! client with a per-request timeout.

use crate::config::RetryConfig;
#[cfg(feature = "http")]
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::remote::{DetailResponse, ListEntry, ListResponse, PokemonSource};
use pokedex_core::Pokemon;
use serde::de::DeserializeOwned;

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport.
pub trait HttpClient: Send + Sync {
    /// Sends a GET request and returns the response body.
    ///
    /// Non-success statuses must be reported as [`SyncError::Http`] and
    /// timeouts as [`SyncError::Timeout`].
    fn get(&self, url: &str) -> SyncResult<Vec<u8>>;
}

/// A [`PokemonSource`] backed by the PokeAPI REST endpoints.
///
/// Bodies are JSON. Retryable failures are retried according to the
/// configured [`RetryConfig`].
pub struct PokeApi<C: HttpClient> {
    base_url: String,
    client: C,
    retry: RetryConfig,
}

impl<C: HttpClient> PokeApi<C> {
    /// Creates a source over `client`. Requests are attempted once.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            retry: RetryConfig::no_retry(),
        }
    }

    /// Sets the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> SyncResult<T> {
        let body = self.get_with_retry(url)?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn get_with_retry(&self, url: &str) -> SyncResult<Vec<u8>> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            let delay = self.retry.delay_for_attempt(attempt);
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }

            match self.client.get(url) {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt + 1 < attempts => {
                    tracing::warn!(url, attempt, error = %e, "request failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(feature = "http")]
impl PokeApi<ReqwestClient> {
    /// Creates a source over a [`ReqwestClient`] configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &SyncConfig) -> SyncResult<Self> {
        let client = ReqwestClient::new(config.timeout)?;
        Ok(Self::new(config.api_base_url.clone(), client).with_retry(config.retry.clone()))
    }
}

impl<C: HttpClient> PokemonSource for PokeApi<C> {
    fn fetch_list(&self, limit: u32) -> SyncResult<Vec<ListEntry>> {
        let url = format!("{}/pokemon?limit={}", self.base_url, limit);
        let list: ListResponse = self.get_json(&url)?;
        Ok(list.results)
    }

    fn fetch_detail(&self, url: &str) -> SyncResult<Pokemon> {
        let detail: DetailResponse = self.get_json(url)?;
        Ok(detail.into())
    }
}

/// Blocking `reqwest` client with a request timeout.
#[cfg(feature = "http")]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl ReqwestClient {
    /// Creates a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: std::time::Duration) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::transport_fatal(e.to_string()))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> SyncResult<Vec<u8>> {
        let response = self.client.get(url).send().map_err(from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().map_err(from_reqwest)?;
        Ok(body.to_vec())
    }
}

#[cfg(feature = "http")]
fn from_reqwest(err: reqwest::Error) -> SyncError {
    if err.is_timeout() {
        SyncError::Timeout
    } else if err.is_connect() || err.is_request() || err.is_body() {
        SyncError::transport_retryable(err.to_string())
    } else if err.is_decode() {
        SyncError::Decode(err.to_string())
    } else {
        SyncError::transport_fatal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::time::Duration;

    /// Serves canned bodies per URL; queued errors are returned first.
    #[derive(Default)]
    struct TestClient {
        bodies: HashMap<String, String>,
        errors: Mutex<VecDeque<SyncError>>,
        requests: Mutex<Vec<String>>,
    }

    impl TestClient {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }

        fn queue_error(&self, err: SyncError) {
            self.errors.lock().push_back(err);
        }

        fn request_count(&self) -> usize {
            self.requests.lock().len()
        }
    }

    impl HttpClient for TestClient {
        fn get(&self, url: &str) -> SyncResult<Vec<u8>> {
            self.requests.lock().push(url.to_string());
            if let Some(err) = self.errors.lock().pop_front() {
                return Err(err);
            }
            self.bodies
                .get(url)
                .map(|b| b.as_bytes().to_vec())
                .ok_or_else(|| SyncError::Http {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }

    const BASE: &str = "https://api.test/v2";

    fn detail_json(id: i64, name: &str, kind: &str, attack: i32) -> String {
        format!(
            r#"{{"id": {id}, "name": "{name}",
                "sprites": {{"other": {{"official-artwork": {{"front_default": "https://img/{id}.png"}}}}}},
                "types": [{{"type": {{"name": "{kind}"}}}}],
                "stats": [{{"base_stat": {attack}, "stat": {{"name": "attack"}}}}]}}"#
        )
    }

    fn two_starters() -> TestClient {
        TestClient::default()
            .with(
                "https://api.test/v2/pokemon?limit=2",
                r#"{"results": [
                    {"name": "bulbasaur", "url": "https://api.test/v2/pokemon/1/"},
                    {"name": "charmander", "url": "https://api.test/v2/pokemon/4/"}
                ]}"#,
            )
            .with(
                "https://api.test/v2/pokemon/1/",
                &detail_json(1, "bulbasaur", "grass", 49),
            )
            .with(
                "https://api.test/v2/pokemon/4/",
                &detail_json(4, "charmander", "fire", 52),
            )
    }

    #[test]
    fn fetch_all_resolves_list_and_details() {
        let api = PokeApi::new(BASE, two_starters());
        let all = api.fetch_all(2).unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "bulbasaur");
        assert_eq!(all[1].types, vec!["fire"]);
        assert_eq!(all[1].attack(), 52);
        assert_eq!(all[1].image_url, "https://img/4.png");
        assert_eq!(api.client().request_count(), 3);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = PokeApi::new("https://api.test/v2/", two_starters());
        assert_eq!(api.base_url(), BASE);
        assert_eq!(api.fetch_list(2).unwrap().len(), 2);
    }

    #[test]
    fn detail_failure_fails_whole_fetch() {
        let client = two_starters().with("https://api.test/v2/pokemon/4/", "not json");
        let api = PokeApi::new(BASE, client);

        let err = api.fetch_all(2).unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
    }

    #[test]
    fn no_retry_by_default() {
        let api = PokeApi::new(BASE, two_starters());
        api.client().queue_error(SyncError::Timeout);

        let err = api.fetch_list(2).unwrap_err();
        assert!(matches!(err, SyncError::Timeout));
        assert_eq!(api.client().request_count(), 1);
    }

    #[test]
    fn retryable_errors_are_retried() {
        let retry = RetryConfig::new(3)
            .with_initial_delay(Duration::from_millis(1))
            .without_jitter();
        let api = PokeApi::new(BASE, two_starters()).with_retry(retry);
        api.client().queue_error(SyncError::Timeout);
        api.client().queue_error(SyncError::transport_retryable("reset"));

        let list = api.fetch_list(2).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(api.client().request_count(), 3);
    }

    #[test]
    fn fatal_errors_are_not_retried() {
        let retry = RetryConfig::new(5).with_initial_delay(Duration::from_millis(1));
        let api = PokeApi::new(BASE, two_starters()).with_retry(retry);
        api.client().queue_error(SyncError::transport_fatal("bad certificate"));

        assert!(api.fetch_list(2).is_err());
        assert_eq!(api.client().request_count(), 1);
    }

    #[test]
    fn retries_stop_at_max_attempts() {
        let retry = RetryConfig::new(2)
            .with_initial_delay(Duration::from_millis(1))
            .without_jitter();
        let api = PokeApi::new(BASE, two_starters()).with_retry(retry);
        for _ in 0..3 {
            api.client().queue_error(SyncError::Http {
                status: 503,
                url: BASE.into(),
            });
        }

        let err = api.fetch_list(2).unwrap_err();
        assert!(matches!(err, SyncError::Http { status: 503, .. }));
        assert_eq!(api.client().request_count(), 2);
    }

    #[cfg(feature = "http")]
    #[test]
    fn from_config_uses_configured_base_url() {
        let config = SyncConfig::new("http://127.0.0.1:9/api/v2").with_timeout(Duration::from_millis(200));
        let api = PokeApi::from_config(&config).unwrap();
        assert_eq!(api.base_url(), "http://127.0.0.1:9/api/v2");
    }
}

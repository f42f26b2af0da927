use std::future::Future;
use std::time::Duration;
use log::{debug, info};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use crate::error::LookupFailure;
use crate::geocode::{GeocodeProvider, GeocodeResult, Suggestion, SuggestionSource};
use crate::google::model::{AutocompleteResponse, GeocodeResponse};
use crate::utils::retry_wrapper;

pub mod model;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
const UA: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const AUTOCOMPLETE_PATH: &str = "/maps/api/place/autocomplete/json";

/// Settings for talking to the Maps web services
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub language: Option<String>,
    pub region: Option<String>,
    /// extra attempts for transient failures, 0 disables retrying
    pub retries: usize,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: None,
            region: None,
            retries: 0,
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the Google geocoding and place autocomplete endpoints
pub struct GoogleMapsClient {
    client: Client,
    config: ClientConfig,
}

impl GoogleMapsClient {
    pub fn new(config: ClientConfig) -> Result<Self, LookupFailure> {
        Ok(
            Self {
                client: Client::builder()
                    .default_headers(Self::default_headers())
                    .timeout(config.timeout)
                    .build()?,
                config,
            }
        )
    }

    fn default_headers() -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(USER_AGENT, HeaderValue::from_static(UA));
        map.insert(ACCEPT, HeaderValue::from_static("application/json"));
        map
    }

    /// query parameters shared by every endpoint, the key last
    fn common_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(language) = &self.config.language {
            params.push(("language", language.as_str()));
        }
        if let Some(region) = &self.config.region {
            params.push(("region", region.as_str()));
        }
        params.push(("key", self.config.api_key.as_str()));
        params
    }

    /// GET `path` and decode the JSON body
    ///
    /// * `params` - endpoint specific query parameters, the common ones are appended
    async fn fetch_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T, LookupFailure> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut query = params.to_vec();
        query.extend(self.common_params());
        Ok(
            self.client
                .get(&url)
                .query(&query)
                .send()
                .await?
                .error_for_status()?
                .json::<T>()
                .await?
        )
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn geocode_address(&self, address: &str) -> Result<Vec<GeocodeResult>, LookupFailure> {
        info!("geocoding [{}]", address);
        let results = retry_wrapper(self.config.retries, || async {
            let resp: GeocodeResponse = self.fetch_json(GEOCODE_PATH, &[("address", address)]).await?;
            Vec::<GeocodeResult>::try_from(resp)
        }).await?;
        debug!("geocode of [{}] returned [{}] results", address, results.len());
        Ok(results)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn autocomplete(&self, input: &str) -> Result<Vec<Suggestion>, LookupFailure> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }
        let suggestions = retry_wrapper(self.config.retries, || async {
            let resp: AutocompleteResponse = self.fetch_json(AUTOCOMPLETE_PATH, &[("input", input)]).await?;
            Vec::<Suggestion>::try_from(resp)
        }).await?;
        debug!("autocomplete of [{}] returned [{}] suggestions", input, suggestions.len());
        Ok(suggestions)
    }
}

impl GeocodeProvider for GoogleMapsClient {
    fn geocode(&self, query: &str) -> impl Future<Output = Result<Vec<GeocodeResult>, LookupFailure>> + Send {
        self.geocode_address(query)
    }
}

impl SuggestionSource for GoogleMapsClient {
    fn suggest(&self, input: &str) -> impl Future<Output = Result<Vec<Suggestion>, LookupFailure>> + Send {
        self.autocomplete(input)
    }
}

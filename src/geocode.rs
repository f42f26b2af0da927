use std::collections::HashSet;
use std::future::Future;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::error::LookupFailure;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// One tagged fragment of a geocoded address, e.g. the locality or the route.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AddressComponent {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    #[serde(default)]
    pub types: HashSet<String>,
}

impl AddressComponent {
    pub fn new<I, S>(long_name: Option<&str>, short_name: Option<&str>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            long_name: long_name.map(str::to_owned),
            short_name: short_name.map(str::to_owned),
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// true if every given tag is present
    pub fn has_all(&self, tags: &[&str]) -> bool {
        tags.iter().all(|tag| self.types.contains(*tag))
    }
}

/// A single candidate returned by the geocoding provider
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub coordinate: Coordinate,
    pub address_components: Vec<AddressComponent>,
}

/// An autocomplete entry. `description` is what gets geocoded on selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub description: String,
}

/// Turns a free-text address into zero or more candidates.
pub trait GeocodeProvider {
    fn geocode(&self, query: &str) -> impl Future<Output = Result<Vec<GeocodeResult>, LookupFailure>> + Send;
}

/// Completes partial input into address suggestions.
pub trait SuggestionSource {
    fn suggest(&self, input: &str) -> impl Future<Output = Result<Vec<Suggestion>, LookupFailure>> + Send;
}

/// Geocode `query` and keep only the first candidate.
pub async fn lookup_first<P: GeocodeProvider>(provider: &P, query: &str) -> Result<GeocodeResult, LookupFailure> {
    let results = provider.geocode(query).await?;
    debug!("got [{}] candidates for [{}]", results.len(), query);
    results.into_iter().next()
        .ok_or_else(|| LookupFailure::ZeroResults { query: query.to_string() })
}


#[cfg(test)]
mod tests {
    use super::fake::{place, FakeProvider};
    use super::*;

    #[tokio::test]
    async fn lookup_first_takes_the_first_candidate() {
        let provider = FakeProvider::default()
            .with("main st", place("1 Main St", 1.0, 2.0, vec![]))
            .with("main st", place("1 Main Street", 3.0, 4.0, vec![]));

        let result = lookup_first(&provider, "main st").await.unwrap();
        assert_eq!(result.formatted_address, "1 Main St");
    }

    #[tokio::test]
    async fn lookup_first_reports_zero_results() {
        let provider = FakeProvider::default();
        let err = lookup_first(&provider, "atlantis").await.unwrap_err();
        assert!(matches!(err, LookupFailure::ZeroResults { query } if query == "atlantis"));
    }

    #[tokio::test]
    async fn lookup_first_passes_rejections_through() {
        let provider = FakeProvider::default().rejecting("x", "OVER_QUERY_LIMIT");
        let err = lookup_first(&provider, "x").await.unwrap_err();
        assert!(matches!(err, LookupFailure::Rejected { status, .. } if status == "OVER_QUERY_LIMIT"));
    }

    #[test]
    fn has_all_requires_every_tag() {
        let component = AddressComponent::new(Some("Springfield"), None, ["locality", "political"]);
        assert!(component.has_all(&["locality", "political"]));
        assert!(component.has_all(&["locality"]));
        assert!(!component.has_all(&["locality", "postal_code"]));
    }
}

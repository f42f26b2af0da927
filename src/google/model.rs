use serde::Deserialize;
use crate::error::LookupFailure;
use crate::geocode::{AddressComponent, Coordinate, GeocodeResult, Suggestion};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// Body of `/maps/api/geocode/json`
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeCandidate {
    pub formatted_address: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: Coordinate,
}

/// Body of `/maps/api/place/autocomplete/json`
#[derive(Debug, Deserialize)]
pub struct AutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Prediction {
    pub place_id: String,
    pub description: String,
}

/// `ZERO_RESULTS` is an empty answer, every other non-OK status is a rejection
fn check_status(status: String, error_message: Option<String>) -> Result<bool, LookupFailure> {
    match status.as_str() {
        STATUS_OK => Ok(true),
        STATUS_ZERO_RESULTS => Ok(false),
        _ => Err(LookupFailure::Rejected { status, message: error_message }),
    }
}

impl From<GeocodeCandidate> for GeocodeResult {
    fn from(candidate: GeocodeCandidate) -> Self {
        Self {
            formatted_address: candidate.formatted_address,
            coordinate: candidate.geometry.location,
            address_components: candidate.address_components,
        }
    }
}

impl TryFrom<GeocodeResponse> for Vec<GeocodeResult> {
    type Error = LookupFailure;

    fn try_from(resp: GeocodeResponse) -> Result<Self, Self::Error> {
        if !check_status(resp.status, resp.error_message)? {
            return Ok(Vec::new());
        }
        Ok(resp.results.into_iter().map(GeocodeResult::from).collect())
    }
}

impl From<Prediction> for Suggestion {
    fn from(prediction: Prediction) -> Self {
        Self {
            id: prediction.place_id,
            description: prediction.description,
        }
    }
}

impl TryFrom<AutocompleteResponse> for Vec<Suggestion> {
    type Error = LookupFailure;

    fn try_from(resp: AutocompleteResponse) -> Result<Self, Self::Error> {
        if !check_status(resp.status, resp.error_message)? {
            return Ok(Vec::new());
        }
        Ok(resp.predictions.into_iter().map(Suggestion::from).collect())
    }
}

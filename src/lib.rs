//! Address lookup and normalization against the Google geocoding API.
//!
//! [`place::normalize`] turns a geocode candidate into a [`place::PlaceRecord`];
//! [`session::SearchSession`] keeps the displayed record and ignores lookups
//! that finish after a newer one.

pub mod batch;
pub mod error;
pub mod geocode;
pub mod google;
pub mod place;
pub mod record;
pub mod session;
mod utils;

pub use error::LookupFailure;
pub use geocode::{AddressComponent, Coordinate, GeocodeProvider, GeocodeResult, Suggestion, SuggestionSource};
pub use place::{normalize, Address, PlaceRecord};

use serde::Serialize;
use crate::place::PlaceRecord;

/// One flat CSV row per geocoded query
#[derive(Debug, Serialize)]
pub struct Record {
    pub query: String,
    display_name: String,
    lat: f64,
    lng: f64,
    street: String,
    number: String,
    number_extension: String,
    addition: String,
    postal_code: String,
    city: String,
    state: String,
    country_code: String,
}

impl Record {
    pub fn from_query_and_place(query: String, place: PlaceRecord) -> Self {
        Self {
            query,
            display_name: place.display_name,
            lat: place.coordinate.lat,
            lng: place.coordinate.lng,
            street: place.address.street,
            number: place.address.number,
            number_extension: place.address.number_extension,
            addition: place.address.addition,
            postal_code: place.postal_code,
            city: place.address.city,
            state: place.state,
            country_code: place.country_code,
        }
    }
}

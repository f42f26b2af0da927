use serde::Serialize;
use crate::geocode::{AddressComponent, Coordinate, GeocodeResult};

/// Structured place fields derived from one geocode result
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub display_name: String,
    pub coordinate: Coordinate,
    pub postal_code: String,
    pub state: String,
    pub country_code: String,
    pub address: Address,
}

/// `number_extension` and `addition` have no provider tag mapped to them and stay empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub number: String,
    pub number_extension: String,
    pub addition: String,
    pub postal_code: String,
    pub city: String,
}

/// Build a fresh record from `result`, applying the tag rules to each component in order.
///
/// Later components overwrite fields written by earlier ones.
pub fn normalize(result: &GeocodeResult) -> PlaceRecord {
    let mut place = PlaceRecord {
        display_name: result.formatted_address.clone(),
        coordinate: result.coordinate,
        ..Default::default()
    };
    for component in &result.address_components {
        place.apply(component);
    }
    place
}

impl PlaceRecord {
    fn apply(&mut self, component: &AddressComponent) {
        if component.types.is_empty() {
            return;
        }
        let long_name = present(&component.long_name);
        let short_name = present(&component.short_name);

        if let Some(name) = long_name.filter(|_| component.has_all(&["street_number"])) {
            self.address.number = name.to_string();
        }
        if let Some(name) = long_name.filter(|_| component.has_all(&["route"])) {
            self.address.street = name.to_string();
        }
        if let Some(name) = long_name.filter(|_| component.has_all(&["locality", "political"])) {
            self.address.city = name.to_string();
        }
        if let Some(name) = long_name.filter(|_| component.has_all(&["administrative_area_level_1", "political"])) {
            self.state = name.to_string();
        }
        if let Some(name) = short_name.filter(|_| component.has_all(&["country", "political"])) {
            self.country_code = name.to_string();
        }
        if let Some(name) = long_name.filter(|_| component.has_all(&["postal_code"])) {
            self.address.postal_code = name.to_string();
            self.postal_code = name.to_string();
        }
    }
}

/// empty names count as missing
fn present(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn result(components: Vec<AddressComponent>) -> GeocodeResult {
        GeocodeResult {
            formatted_address: "1 Main St".to_string(),
            coordinate: Coordinate { lat: 1.0, lng: 2.0 },
            address_components: components,
        }
    }

    #[test]
    fn empty_components_leave_defaults() {
        let place = normalize(&result(vec![]));
        assert_eq!(
            place,
            PlaceRecord {
                display_name: "1 Main St".to_string(),
                coordinate: Coordinate { lat: 1.0, lng: 2.0 },
                ..Default::default()
            }
        );
    }

    #[test]
    fn full_address_is_mapped() {
        let place = normalize(&result(vec![
            AddressComponent::new(Some("1"), None, ["street_number"]),
            AddressComponent::new(Some("Main St"), None, ["route"]),
            AddressComponent::new(Some("Springfield"), None, ["locality", "political"]),
            AddressComponent::new(Some("Illinois"), None, ["administrative_area_level_1", "political"]),
            AddressComponent::new(None, Some("US"), ["country", "political"]),
            AddressComponent::new(Some("62701"), None, ["postal_code"]),
        ]));

        assert_eq!(
            place,
            PlaceRecord {
                display_name: "1 Main St".to_string(),
                coordinate: Coordinate { lat: 1.0, lng: 2.0 },
                postal_code: "62701".to_string(),
                state: "Illinois".to_string(),
                country_code: "US".to_string(),
                address: Address {
                    street: "Main St".to_string(),
                    number: "1".to_string(),
                    number_extension: String::new(),
                    addition: String::new(),
                    postal_code: "62701".to_string(),
                    city: "Springfield".to_string(),
                },
            }
        );
    }

    #[test]
    fn later_postal_code_wins() {
        let place = normalize(&result(vec![
            AddressComponent::new(Some("1000"), None, ["postal_code"]),
            AddressComponent::new(Some("2000"), None, ["postal_code"]),
        ]));
        assert_eq!(place.postal_code, "2000");
        assert_eq!(place.address.postal_code, "2000");
    }

    #[test]
    fn country_needs_short_name() {
        let place = normalize(&result(vec![
            AddressComponent::new(Some("United States"), None, ["country", "political"]),
        ]));
        assert_eq!(place.country_code, "");
    }

    #[test]
    fn locality_without_political_is_ignored() {
        let place = normalize(&result(vec![
            AddressComponent::new(Some("Springfield"), None, ["locality"]),
            AddressComponent::new(Some("Illinois"), None, ["administrative_area_level_1"]),
        ]));
        assert_eq!(place.address.city, "");
        assert_eq!(place.state, "");
    }

    #[test]
    fn empty_name_counts_as_missing() {
        let place = normalize(&result(vec![
            AddressComponent::new(Some("Main St"), None, ["route"]),
            AddressComponent::new(Some(""), None, ["route"]),
            AddressComponent::new(Some("US"), Some(""), ["country", "political"]),
        ]));
        assert_eq!(place.address.street, "Main St");
        assert_eq!(place.country_code, "");
    }

    #[test]
    fn missing_name_only_skips_that_rule() {
        // a component tagged both ways with just a short name still sets the country code
        let place = normalize(&result(vec![
            AddressComponent::new(None, Some("NL"), ["country", "political", "postal_code"]),
        ]));
        assert_eq!(place.country_code, "NL");
        assert_eq!(place.postal_code, "");
    }

    #[test]
    fn input_is_left_untouched() {
        let input = result(vec![AddressComponent::new(Some("1"), None, ["street_number"])]);
        let before = input.clone();
        let _ = normalize(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn serializes_with_form_field_names() {
        let place = normalize(&result(vec![
            AddressComponent::new(Some("62701"), None, ["postal_code"]),
        ]));
        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(json["displayName"], "1 Main St");
        assert_eq!(json["postalCode"], "62701");
        assert_eq!(json["countryCode"], "");
        assert_eq!(json["address"]["numberExtension"], "");
        assert_eq!(json["coordinate"]["lng"], 2.0);
    }
}

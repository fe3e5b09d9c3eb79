// Location string resolution.
//
// Three sources, in order of preference:
// 1. The product's own title, used verbatim with no network call.
// 2. The nearest populated place: "12 km W of Springfield, IL".
// 3. The enclosing Flinn-Engdahl region name.
// If none of them produce anything, the location is an empty string.

use tracing::{debug, warn};

use super::client::{Place, PlacesQuery, PlacesService};
use super::compass::{compass_direction, reverse_azimuth};
use crate::retry::{with_retry, RetryPolicy};

/// Country code left out of location strings.
pub const HOME_COUNTRY: &str = "US";

/// Turns coordinates (or a title) into a location string.
pub struct LocationResolver<'a> {
    service: &'a dyn PlacesService,
    policy: RetryPolicy,
}

impl<'a> LocationResolver<'a> {
    pub fn new(service: &'a dyn PlacesService, policy: RetryPolicy) -> Self {
        Self { service, policy }
    }

    /// Resolve a location for an event. Never fails; worst case is "".
    pub async fn resolve(&self, latitude: f64, longitude: f64, title: Option<&str>) -> String {
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            return title.to_string();
        }

        let query = PlacesQuery::around(latitude, longitude);
        let query = &query;
        let service = self.service;
        let places = match with_retry(&self.policy, "Geoserve places", move || {
            service.nearby_places(query)
        })
        .await
        {
            Ok(places) => places,
            Err(exhausted) => {
                warn!(error = %exhausted, "Failure communicating with Geoserve, no location");
                return String::new();
            }
        };

        if let Some(nearest) = nearest_place(&places) {
            return describe_place(nearest);
        }

        match self.service.regions(latitude, longitude).await {
            Ok(regions) => {
                let name = regions.first_region_name().unwrap_or_default().to_string();
                if name.is_empty() {
                    debug!(latitude, longitude, "No region found for coordinates");
                }
                name
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Geoserve region lookup failed");
                String::new()
            }
        }
    }
}

/// The place with the smallest distance.
pub fn nearest_place(places: &[Place]) -> Option<&Place> {
    places.iter().min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// "{distance} km {compass} of {name}, {admin1}[, {country}]".
///
/// Distance is truncated to whole kilometres. The compass direction is
/// taken from the reversed azimuth, since Geoserve reports the bearing
/// from the event to the place.
pub fn describe_place(place: &Place) -> String {
    let direction = compass_direction(reverse_azimuth(place.azimuth));
    let country = if place.country_code == HOME_COUNTRY {
        ""
    } else {
        place.country_code.as_str()
    };

    let named: Vec<&str> = [place.name.as_str(), place.admin1_name.as_str(), country]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    format!(
        "{} km {} of {}",
        place.distance.trunc() as i64,
        direction,
        named.join(", ")
    )
}

// HTTP client for the USGS Geoserve places and regions endpoints.
//
// `places.json?type=geonames` returns populated places ranked by distance
// from the query point; `regions.json?type=fe` returns the enclosing
// Flinn-Engdahl region. Both come back as GeoJSON feature collections
// keyed by the requested type.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Default Geoserve endpoint.
pub const DEFAULT_GEOSERVE_URL: &str = "https://earthquake.usgs.gov/ws/geoserve";

/// Search radius for nearby places.
pub const PLACES_RADIUS_KM: f64 = 250.0;

/// Smallest population a place needs to be named in a location string.
pub const PLACES_MIN_POPULATION: u64 = 1000;

/// A GeoJSON feature collection. Missing `features` reads as empty.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection<P> {
    #[serde(default = "Vec::new")]
    pub features: Vec<Feature<P>>,
}

/// A GeoJSON feature; only the properties matter here.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature<P> {
    pub properties: P,
}

/// One populated place near the query point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub admin1_name: String,
    #[serde(default)]
    pub country_code: String,
    /// Distance from the query point, kilometres
    pub distance: f64,
    /// Azimuth from the query point to the place, degrees
    pub azimuth: f64,
}

/// Response from `places.json?type=geonames`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlacesResponse {
    pub geonames: Option<FeatureCollection<Place>>,
}

impl PlacesResponse {
    pub fn into_places(self) -> Vec<Place> {
        self.geonames
            .map(|fc| fc.features.into_iter().map(|f| f.properties).collect())
            .unwrap_or_default()
    }
}

/// Properties of a Flinn-Engdahl region feature.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionProperties {
    pub name: Option<String>,
}

/// Response from `regions.json?type=fe`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionsResponse {
    pub fe: Option<FeatureCollection<RegionProperties>>,
}

impl RegionsResponse {
    /// Name of the first region feature, if the response has one.
    pub fn first_region_name(&self) -> Option<&str> {
        self.fe
            .as_ref()?
            .features
            .first()?
            .properties
            .name
            .as_deref()
    }
}

/// Parameters for a nearby-places search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacesQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub max_radius_km: f64,
    pub min_population: u64,
}

impl PlacesQuery {
    /// The standard search: 250 km radius, population of at least 1000.
    pub fn around(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            max_radius_km: PLACES_RADIUS_KM,
            min_population: PLACES_MIN_POPULATION,
        }
    }
}

/// Something that can answer place and region questions for a coordinate.
#[async_trait]
pub trait PlacesService: Send + Sync {
    /// Places within the query radius, nearest first. Empty is a valid answer.
    async fn nearby_places(&self, query: &PlacesQuery) -> Result<Vec<Place>>;

    /// Regions enclosing the coordinate.
    async fn regions(&self, latitude: f64, longitude: f64) -> Result<RegionsResponse>;
}

/// Geoserve client over reqwest.
pub struct GeoserveClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeoserveClient {
    /// Create a new Geoserve client pointing at the given base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("quakegate/0.1 (shakemap origin receiver)")
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `{base}/{endpoint}` and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!(endpoint = endpoint, "Geoserve GET request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Geoserve request failed: {endpoint}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Geoserve {endpoint} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize Geoserve {endpoint} response"))
    }
}

#[async_trait]
impl PlacesService for GeoserveClient {
    async fn nearby_places(&self, query: &PlacesQuery) -> Result<Vec<Place>> {
        let resp: PlacesResponse = self
            .get_json(
                "places.json",
                &[
                    ("latitude", query.latitude.to_string()),
                    ("longitude", query.longitude.to_string()),
                    ("maxradiuskm", query.max_radius_km.to_string()),
                    ("minpopulation", query.min_population.to_string()),
                    ("type", "geonames".to_string()),
                ],
            )
            .await?;
        Ok(resp.into_places())
    }

    async fn regions(&self, latitude: f64, longitude: f64) -> Result<RegionsResponse> {
        self.get_json(
            "regions.json",
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("type", "fe".to_string()),
            ],
        )
        .await
    }
}

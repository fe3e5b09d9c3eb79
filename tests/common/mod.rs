// Shared stubs for the integration tests.
//
// Each stub stands in for one external service and counts how often it
// was called, so tests can assert that a gate or a fast path never
// reached the network.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use quakegate::catalog::client::{CatalogService, DEFAULT_COMCAT_URL};
use quakegate::config::Config;
use quakegate::filter::DEFAULT_ALLOWED_SOURCE;
use quakegate::geoserve::client::{
    Place, PlacesQuery, PlacesService, RegionsResponse, DEFAULT_GEOSERVE_URL,
};
use quakegate::notification::Notification;
use quakegate::queue::client::{QueueMessage, QueueSink, DEFAULT_QUEUE_PORT};

/// Reference "now" for every test: 2024-01-02T00:00:00Z.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
}

/// Twelve hours before `now()`.
pub const RECENT_EVENT_TIME: &str = "2024-01-01T12:00:00.000Z";

/// Three days before `now()`.
pub const OLD_EVENT_TIME: &str = "2023-12-30T00:00:00.000Z";

/// A reviewed "us" earthquake origin that passes every gate.
pub fn reviewed_origin() -> Notification {
    Notification {
        product_type: Some("origin".to_string()),
        status: Some("UPDATE".to_string()),
        action: Some("EVENT_ADDED".to_string()),
        source: Some("us".to_string()),
        event_source_code: Some("2024abcd".to_string()),
        event_type: vec!["earthquake".to_string()],
        review_status: vec!["reviewed".to_string()],
        title: Vec::new(),
        magnitude: Some(5.1),
        latitude: Some(34.0),
        longitude: Some(-118.0),
        depth: Some(10.0),
        event_time: Some(RECENT_EVENT_TIME.to_string()),
    }
}

/// A config whose install and data directories are both `dir`.
pub fn config_in(dir: &Path) -> Config {
    Config {
        install_path: dir.to_path_buf(),
        data_path: dir.to_path_buf(),
        queue_port: DEFAULT_QUEUE_PORT,
        allowed_source: DEFAULT_ALLOWED_SOURCE.to_string(),
        comcat_url: DEFAULT_COMCAT_URL.to_string(),
        geoserve_url: DEFAULT_GEOSERVE_URL.to_string(),
    }
}

pub fn place(name: &str, admin1: &str, country: &str, distance: f64, azimuth: f64) -> Place {
    Place {
        name: name.to_string(),
        admin1_name: admin1.to_string(),
        country_code: country.to_string(),
        distance,
        azimuth,
    }
}

// ── Catalog ────────────────────────────────────────────────────────

pub struct StubCatalog {
    /// Number of leading calls that fail; u32::MAX fails forever
    pub failures: u32,
    pub calls: AtomicU32,
}

impl StubCatalog {
    pub fn working() -> Self {
        Self {
            failures: 0,
            calls: AtomicU32::new(0),
        }
    }

    pub fn down() -> Self {
        Self {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        }
    }

    pub fn flaky(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogService for StubCatalog {
    async fn fetch_detail(&self, event_id: &str) -> Result<serde_json::Value> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            anyhow::bail!("ComCat unavailable");
        }
        Ok(serde_json::json!({ "id": event_id, "properties": {} }))
    }
}

// ── Places ─────────────────────────────────────────────────────────

pub struct StubPlaces {
    pub places: Vec<Place>,
    pub regions: Result<RegionsResponse, String>,
    pub places_down: bool,
    pub place_calls: AtomicU32,
    pub region_calls: AtomicU32,
    pub last_query: Mutex<Option<PlacesQuery>>,
}

impl StubPlaces {
    pub fn with_places(places: Vec<Place>) -> Self {
        Self {
            places,
            regions: Ok(RegionsResponse::default()),
            places_down: false,
            place_calls: AtomicU32::new(0),
            region_calls: AtomicU32::new(0),
            last_query: Mutex::new(None),
        }
    }

    /// No places nearby; regions answer with the given raw JSON.
    pub fn with_regions_json(json: &str) -> Self {
        let regions = serde_json::from_str(json).map_err(|e| e.to_string());
        Self {
            regions,
            ..Self::with_places(Vec::new())
        }
    }

    pub fn down() -> Self {
        Self {
            places_down: true,
            ..Self::with_places(Vec::new())
        }
    }

    pub fn place_calls(&self) -> u32 {
        self.place_calls.load(Ordering::SeqCst)
    }

    pub fn region_calls(&self) -> u32 {
        self.region_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlacesService for StubPlaces {
    async fn nearby_places(&self, query: &PlacesQuery) -> Result<Vec<Place>> {
        self.place_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(*query);
        if self.places_down {
            anyhow::bail!("Geoserve unavailable");
        }
        Ok(self.places.clone())
    }

    async fn regions(&self, _latitude: f64, _longitude: f64) -> Result<RegionsResponse> {
        self.region_calls.fetch_add(1, Ordering::SeqCst);
        match &self.regions {
            Ok(regions) => Ok(regions.clone()),
            Err(e) => anyhow::bail!("bad regions response: {e}"),
        }
    }
}

// ── Queue ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingQueue {
    pub messages: Mutex<Vec<QueueMessage>>,
}

impl RecordingQueue {
    pub fn sent(&self) -> Vec<QueueMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueSink for RecordingQueue {
    async fn send(&self, message: &QueueMessage) -> Result<()> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// A queue whose delivery always fails.
pub struct BrokenQueue;

#[async_trait]
impl QueueSink for BrokenQueue {
    async fn send(&self, _message: &QueueMessage) -> Result<()> {
        anyhow::bail!("connection refused")
    }
}

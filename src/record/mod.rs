// Queue-ready event records.
//
// EventRecord is what the ShakeMap queue receives for an origin; the
// much smaller CancelRecord goes out when a product is deleted. Field
// names match the keys the queue reads.

pub mod builder;
pub mod network;

use serde::{Serialize, Serializer};

/// Normalized record for an accepted origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub id: String,
    pub netid: String,
    /// Human-readable network name, empty if the code isn't known
    pub network: String,
    /// Origin time exactly as PDL sent it
    pub time: String,
    pub lat: f64,
    pub lon: f64,
    pub depth: f64,
    pub mag: f64,
    pub locstring: String,
    #[serde(serialize_with = "comma_separated")]
    pub alt_eventids: Vec<String>,
    /// "Event added" or "Origin updated"
    pub action: String,
    /// "true", "false" or "unknown"
    pub reviewed: String,
}

/// Record sent with a `cancel` message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelRecord {
    pub id: String,
    pub netid: String,
    #[serde(serialize_with = "comma_separated")]
    pub alt_eventids: Vec<String>,
}

impl CancelRecord {
    pub fn new(event_id: &str, netid: &str) -> Self {
        Self {
            id: event_id.to_string(),
            netid: netid.to_string(),
            alt_eventids: vec![event_id.to_string()],
        }
    }
}

/// The queue reads alternate ids as one comma-separated string.
fn comma_separated<S: Serializer>(ids: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ids.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_record_serializes_alt_ids_as_string() {
        let record = CancelRecord::new("us2024abcd", "us");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "us2024abcd",
                "netid": "us",
                "alt_eventids": "us2024abcd",
            })
        );
    }
}

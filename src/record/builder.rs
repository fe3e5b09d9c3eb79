// EventRecord assembly: pure, no I/O.

use super::network::network_name;
use super::EventRecord;
use crate::notification::Notification;

/// The fields of a notification that made it through the filter.
///
/// Unlike Notification, nothing here is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrigin {
    pub event_id: String,
    pub netid: String,
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    pub magnitude: f64,
    pub action: String,
    pub review_status: Option<String>,
    pub title: Option<String>,
}

impl ValidatedOrigin {
    /// Pull the required fields out of a notification, or `None` if any is missing.
    pub fn from_notification(n: &Notification) -> Option<Self> {
        n.event_timestamp()?;
        Some(Self {
            event_id: n.event_id()?,
            netid: n.source.clone()?,
            time: n.event_time.clone()?,
            latitude: n.latitude?,
            longitude: n.longitude?,
            depth: n.depth?,
            magnitude: n.magnitude?,
            action: n.action.clone().unwrap_or_default(),
            review_status: n.review_status_first().map(str::to_string),
            title: n.title_text(),
        })
    }
}

/// Queue label for an indexer action.
pub fn action_label(action: &str) -> &'static str {
    if action == "EVENT_ADDED" {
        "Event added"
    } else {
        "Origin updated"
    }
}

/// Queue flag for a review status.
pub fn review_flag(review_status: Option<&str>) -> &'static str {
    match review_status {
        Some("reviewed") => "true",
        Some("automatic") => "false",
        _ => "unknown",
    }
}

/// Build the queue record for an accepted origin.
pub fn build_event_record(origin: &ValidatedOrigin, location: String) -> EventRecord {
    EventRecord {
        id: origin.event_id.clone(),
        netid: origin.netid.clone(),
        network: network_name(&origin.netid).unwrap_or_default().to_string(),
        time: origin.time.clone(),
        lat: origin.latitude,
        lon: origin.longitude,
        depth: origin.depth,
        mag: origin.magnitude,
        locstring: location,
        alt_eventids: vec![origin.event_id.clone()],
        action: action_label(&origin.action).to_string(),
        reviewed: review_flag(origin.review_status.as_deref()).to_string(),
    }
}

// Inbound PDL notification: the attributes of one origin product.
//
// PDL invokes the receiver once per product with the product's
// properties as command-line flags. Nothing here is validated: every
// attribute may be absent, and the filter gates decide what absence means.

pub mod args;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Timestamp format PDL uses for `eventtime` (fractional seconds optional).
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// The attributes of one origin product, as delivered by PDL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notification {
    /// Product type ("origin", "trump-origin", "shakemap", ...)
    pub product_type: Option<String>,
    /// Product status ("UPDATE" or "DELETE")
    pub status: Option<String>,
    /// Indexer action ("EVENT_ADDED", "EVENT_UPDATED", ...)
    pub action: Option<String>,
    /// Contributing network code ("us", "ci", ...)
    pub source: Option<String>,
    /// Network-local event code ("2024abcd")
    pub event_source_code: Option<String>,
    /// Event type, split into words ("earthquake", "quarry blast", ...)
    pub event_type: Vec<String>,
    /// Review status list; only the first element is meaningful
    pub review_status: Vec<String>,
    /// Human-written location title, split into words
    pub title: Vec<String>,
    pub magnitude: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub depth: Option<f64>,
    /// Origin time in `EVENT_TIME_FORMAT`
    pub event_time: Option<String>,
}

impl Notification {
    /// Event type words joined back together; empty when absent.
    pub fn event_type_text(&self) -> String {
        self.event_type.join(" ")
    }

    /// Title words joined back together, or `None` if no title was sent.
    pub fn title_text(&self) -> Option<String> {
        if self.title.is_empty() {
            None
        } else {
            Some(self.title.join(" "))
        }
    }

    /// First element of the review-status list, if any.
    pub fn review_status_first(&self) -> Option<&str> {
        self.review_status.first().map(String::as_str)
    }

    /// Event identifier (`source` + `eventsourcecode`), once both are known.
    pub fn event_id(&self) -> Option<String> {
        match (self.source.as_deref(), self.event_source_code.as_deref()) {
            (Some(source), Some(code)) if !code.is_empty() => Some(format!("{source}{code}")),
            _ => None,
        }
    }

    /// Parsed origin time, or `None` if absent or malformed.
    pub fn event_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.event_time.as_deref()?;
        parse_event_time(raw)
    }
}

/// Parse a PDL event time string as UTC.
pub fn parse_event_time(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), EVENT_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

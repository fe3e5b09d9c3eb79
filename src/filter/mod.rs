// Product filter: decides what to do with one origin notification.
//
// The decision is a fixed, ordered chain of gates (see `gates::GATES`).
// Each gate either passes, ignores the product with a reason, or (only
// the DELETE gate) turns it into a cancel. The first gate that doesn't
// pass decides the outcome and no later gate runs, which matters because
// later gates assume earlier ones checked field presence.
//
// Nothing here logs the final decision or exits the process; the caller
// gets a Decision value and handles that.

pub mod gates;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::catalog::resolver::{CatalogResolver, Confirmation};
use crate::notification::Notification;
use crate::record::builder::ValidatedOrigin;
use crate::record::CancelRecord;
use gates::{Gate, Verdict, GATES};

/// Producer whose origins we act on.
pub const DEFAULT_ALLOWED_SOURCE: &str = "us";

/// Unconfirmed events older than this are assumed to have been handled already.
pub const UNCONFIRMED_AGE_CUTOFF_SECS: i64 = 86_400;

/// Tunable parts of the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPolicy {
    /// The only product source that gets through
    pub allowed_source: String,
    /// How old an event may be and still run without catalog confirmation
    pub unconfirmed_age_cutoff: Duration,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            allowed_source: DEFAULT_ALLOWED_SOURCE.to_string(),
            unconfirmed_age_cutoff: Duration::seconds(UNCONFIRMED_AGE_CUTOFF_SECS),
        }
    }
}

/// Why a notification was dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum IgnoreReason {
    ProductType(Option<String>),
    Status(Option<String>),
    Action(Option<String>),
    EventType(String),
    MissingEventId,
    Source(Option<String>),
    MissingParameters { event_id: String },
    OlderThanCutoff { event_id: String, age_secs: i64 },
    NotReviewed { event_id: String, review_status: Option<String> },
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<none>")
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::ProductType(t) => write!(f, "No action on product type {}", or_none(t)),
            IgnoreReason::Status(s) => write!(f, "No action on status {}", or_none(s)),
            IgnoreReason::Action(a) => write!(f, "No action on action {}", or_none(a)),
            IgnoreReason::EventType(t) => write!(f, "No action on event types of '{t}'"),
            IgnoreReason::MissingEventId => write!(f, "No event ID, skipping"),
            IgnoreReason::Source(s) => write!(f, "Undesirable product source: {}", or_none(s)),
            IgnoreReason::MissingParameters { event_id } => {
                write!(f, "Missing event parameters for event {event_id}, skipping")
            }
            IgnoreReason::OlderThanCutoff { event_id, age_secs } => write!(
                f,
                "Event {event_id} is unconfirmed and older than cutoff ({age_secs}s), skipping"
            ),
            IgnoreReason::NotReviewed {
                event_id,
                review_status,
            } => write!(
                f,
                "Event id {event_id} is not reviewed (review status={})",
                or_none(review_status)
            ),
        }
    }
}

/// What to do with a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Drop it. Not an error.
    Ignore(IgnoreReason),
    /// Tell the queue to cancel the event.
    Cancel(CancelRecord),
    /// Build a record and queue the event.
    Proceed(ValidatedOrigin),
}

/// Runs the gate chain.
pub struct ProductFilter<'a> {
    catalog: CatalogResolver<'a>,
    policy: FilterPolicy,
}

impl<'a> ProductFilter<'a> {
    pub fn new(catalog: CatalogResolver<'a>, policy: FilterPolicy) -> Self {
        Self { catalog, policy }
    }

    /// Evaluate every gate in order against `notification`.
    ///
    /// `now` is the reference time for the unconfirmed-event age check.
    pub async fn evaluate(&self, notification: &Notification, now: DateTime<Utc>) -> Decision {
        for gate in GATES {
            let verdict = match gate {
                Gate::Check { check, .. } => check(notification, &self.policy),
                Gate::CatalogConfirmation => self.confirm_with_catalog(notification, now).await,
            };

            match verdict {
                Verdict::Pass => debug!(gate = gate.name(), "Gate passed"),
                Verdict::Ignore(reason) => return Decision::Ignore(reason),
                Verdict::Cancel(record) => return Decision::Cancel(record),
            }
        }

        match ValidatedOrigin::from_notification(notification) {
            Some(origin) => Decision::Proceed(origin),
            None => Decision::Ignore(IgnoreReason::MissingParameters {
                event_id: notification.event_id().unwrap_or_default(),
            }),
        }
    }

    /// Catalog gate: a reachable catalog always passes; an unreachable one
    /// passes only events younger than the cutoff.
    async fn confirm_with_catalog(&self, n: &Notification, now: DateTime<Utc>) -> Verdict {
        let Some(event_id) = n.event_id() else {
            return Verdict::Ignore(IgnoreReason::MissingEventId);
        };

        match self.catalog.confirm(&event_id).await {
            Confirmation::Confirmed => Verdict::Pass,
            Confirmation::Unknown => {
                let Some(origin_time) = n.event_timestamp() else {
                    return Verdict::Ignore(IgnoreReason::MissingParameters { event_id });
                };
                let age = now - origin_time;
                if age > self.policy.unconfirmed_age_cutoff {
                    Verdict::Ignore(IgnoreReason::OlderThanCutoff {
                        event_id,
                        age_secs: age.num_seconds(),
                    })
                } else {
                    info!(
                        event_id = event_id.as_str(),
                        age_secs = age.num_seconds(),
                        "Event is unconfirmed but recent, processing anyway"
                    );
                    Verdict::Pass
                }
            }
        }
    }
}

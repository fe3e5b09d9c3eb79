// The gate table.
//
// Order is significant. Gates after `delete_cancels` may assume the
// event id can be built; the catalog gate and everything after it may
// assume every numeric field and the origin time are present.

use super::{FilterPolicy, IgnoreReason};
use crate::notification::Notification;
use crate::record::CancelRecord;

/// Product types that describe an origin.
pub const ORIGIN_TYPES: &[&str] = &["origin", "trump-origin"];

/// Product statuses we act on.
pub const STATUSES: &[&str] = &["UPDATE", "DELETE"];

/// Indexer actions we act on.
pub const ACTIONS: &[&str] = &["EVENT_ADDED", "EVENT_UPDATED"];

/// Outcome of a single gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Ignore(IgnoreReason),
    Cancel(CancelRecord),
}

/// A synchronous check.
pub type CheckFn = fn(&Notification, &FilterPolicy) -> Verdict;

/// One step of the filter.
pub enum Gate {
    Check { name: &'static str, check: CheckFn },
    /// Needs the catalog, so the driver runs it itself.
    CatalogConfirmation,
}

impl Gate {
    pub fn name(&self) -> &'static str {
        match self {
            Gate::Check { name, .. } => *name,
            Gate::CatalogConfirmation => "catalog-confirmation",
        }
    }
}

/// Every gate, in evaluation order.
pub const GATES: &[Gate] = &[
    Gate::Check { name: "product-type", check: product_type },
    Gate::Check { name: "status", check: status },
    Gate::Check { name: "action", check: action },
    Gate::Check { name: "event-type", check: event_type },
    Gate::Check { name: "event-id", check: event_id_present },
    Gate::Check { name: "source", check: allowed_source },
    Gate::Check { name: "delete", check: delete_cancels },
    Gate::Check { name: "parameters", check: parameters_complete },
    Gate::CatalogConfirmation,
    Gate::Check { name: "review-status", check: reviewed },
];

fn is_one_of(value: Option<&str>, allowed: &[&str]) -> bool {
    value.is_some_and(|v| allowed.contains(&v))
}

pub fn product_type(n: &Notification, _: &FilterPolicy) -> Verdict {
    if is_one_of(n.product_type.as_deref(), ORIGIN_TYPES) {
        Verdict::Pass
    } else {
        Verdict::Ignore(IgnoreReason::ProductType(n.product_type.clone()))
    }
}

pub fn status(n: &Notification, _: &FilterPolicy) -> Verdict {
    if is_one_of(n.status.as_deref(), STATUSES) {
        Verdict::Pass
    } else {
        Verdict::Ignore(IgnoreReason::Status(n.status.clone()))
    }
}

pub fn action(n: &Notification, _: &FilterPolicy) -> Verdict {
    if is_one_of(n.action.as_deref(), ACTIONS) {
        Verdict::Pass
    } else {
        Verdict::Ignore(IgnoreReason::Action(n.action.clone()))
    }
}

/// Plain "origin" products must be earthquakes; "trump-origin" is exempt.
pub fn event_type(n: &Notification, _: &FilterPolicy) -> Verdict {
    let event_type = n.event_type_text();
    if n.product_type.as_deref() == Some("origin") && event_type != "earthquake" {
        Verdict::Ignore(IgnoreReason::EventType(event_type))
    } else {
        Verdict::Pass
    }
}

pub fn event_id_present(n: &Notification, _: &FilterPolicy) -> Verdict {
    match n.event_source_code.as_deref() {
        Some(code) if !code.is_empty() => Verdict::Pass,
        _ => Verdict::Ignore(IgnoreReason::MissingEventId),
    }
}

pub fn allowed_source(n: &Notification, policy: &FilterPolicy) -> Verdict {
    if n.source.as_deref() == Some(policy.allowed_source.as_str()) {
        Verdict::Pass
    } else {
        Verdict::Ignore(IgnoreReason::Source(n.source.clone()))
    }
}

/// DELETE short-circuits everything after it.
pub fn delete_cancels(n: &Notification, _: &FilterPolicy) -> Verdict {
    if n.status.as_deref() != Some("DELETE") {
        return Verdict::Pass;
    }
    match (n.event_id(), n.source.as_deref()) {
        (Some(event_id), Some(netid)) => Verdict::Cancel(CancelRecord::new(&event_id, netid)),
        _ => Verdict::Ignore(IgnoreReason::MissingEventId),
    }
}

/// Origin time (parseable), location, depth and magnitude must all be present.
pub fn parameters_complete(n: &Notification, _: &FilterPolicy) -> Verdict {
    let complete = n.event_timestamp().is_some()
        && n.latitude.is_some()
        && n.longitude.is_some()
        && n.depth.is_some()
        && n.magnitude.is_some();

    if complete {
        Verdict::Pass
    } else {
        Verdict::Ignore(IgnoreReason::MissingParameters {
            event_id: n.event_id().unwrap_or_default(),
        })
    }
}

/// Only operator-reviewed events run. Uses the first review-status entry.
pub fn reviewed(n: &Notification, _: &FilterPolicy) -> Verdict {
    if n.review_status_first() == Some("reviewed") {
        Verdict::Pass
    } else {
        Verdict::Ignore(IgnoreReason::NotReviewed {
            event_id: n.event_id().unwrap_or_default(),
            review_status: n.review_status_first().map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Notification {
        Notification {
            product_type: Some("origin".to_string()),
            status: Some("UPDATE".to_string()),
            action: Some("EVENT_ADDED".to_string()),
            source: Some("us".to_string()),
            event_source_code: Some("2024abcd".to_string()),
            event_type: vec!["earthquake".to_string()],
            review_status: vec!["reviewed".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_gate_order() {
        let names: Vec<&str> = GATES.iter().map(Gate::name).collect();
        assert_eq!(
            names,
            vec![
                "product-type",
                "status",
                "action",
                "event-type",
                "event-id",
                "source",
                "delete",
                "parameters",
                "catalog-confirmation",
                "review-status",
            ]
        );
    }

    #[test]
    fn test_trump_origin_skips_event_type_check() {
        let mut n = origin();
        n.product_type = Some("trump-origin".to_string());
        n.event_type = vec!["explosion".to_string()];
        assert_eq!(event_type(&n, &FilterPolicy::default()), Verdict::Pass);
    }

    #[test]
    fn test_missing_event_type_fails_for_origin() {
        let mut n = origin();
        n.event_type.clear();
        assert_eq!(
            event_type(&n, &FilterPolicy::default()),
            Verdict::Ignore(IgnoreReason::EventType(String::new()))
        );
    }

    #[test]
    fn test_multiword_event_type_is_joined() {
        let mut n = origin();
        n.event_type = vec!["quarry".to_string(), "blast".to_string()];
        assert_eq!(
            event_type(&n, &FilterPolicy::default()),
            Verdict::Ignore(IgnoreReason::EventType("quarry blast".to_string()))
        );
    }

    #[test]
    fn test_source_uses_policy() {
        let n = origin();
        let policy = FilterPolicy {
            allowed_source: "ci".to_string(),
            ..Default::default()
        };
        assert_eq!(
            allowed_source(&n, &policy),
            Verdict::Ignore(IgnoreReason::Source(Some("us".to_string())))
        );
    }

    #[test]
    fn test_update_passes_delete_gate() {
        assert_eq!(delete_cancels(&origin(), &FilterPolicy::default()), Verdict::Pass);
    }

    #[test]
    fn test_zero_depth_counts_as_present() {
        let mut n = origin();
        n.latitude = Some(0.0);
        n.longitude = Some(0.0);
        n.depth = Some(0.0);
        n.magnitude = Some(4.0);
        n.event_time = Some("2024-01-01T00:00:00Z".to_string());
        assert_eq!(parameters_complete(&n, &FilterPolicy::default()), Verdict::Pass);
    }

    #[test]
    fn test_review_status_uses_first_element() {
        let mut n = origin();
        n.review_status = vec!["automatic".to_string(), "reviewed".to_string()];
        assert!(matches!(
            reviewed(&n, &FilterPolicy::default()),
            Verdict::Ignore(IgnoreReason::NotReviewed { .. })
        ));
    }
}

// Catalog confirmation with bounded retry.
//
// ComCat is asked whether it knows the event. Any answer counts as
// confirmation; three straight failures mean we simply don't know, and
// the caller falls back to judging the event by its age.

use tracing::warn;

use super::client::CatalogService;
use crate::retry::{with_retry, RetryPolicy};

/// What the catalog had to say about an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The catalog answered (content is irrelevant).
    Confirmed,
    /// The catalog could not be reached after every retry.
    Unknown,
}

/// Wraps a CatalogService with the retry policy.
pub struct CatalogResolver<'a> {
    service: &'a dyn CatalogService,
    policy: RetryPolicy,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(service: &'a dyn CatalogService, policy: RetryPolicy) -> Self {
        Self { service, policy }
    }

    /// Probe the catalog for `event_id`. Never fails.
    pub async fn confirm(&self, event_id: &str) -> Confirmation {
        let service = self.service;
        let result = with_retry(&self.policy, "ComCat", move || service.fetch_detail(event_id)).await;

        match result {
            Ok(_) => Confirmation::Confirmed,
            Err(exhausted) => {
                warn!(
                    event_id = event_id,
                    error = %exhausted,
                    "Unable to retrieve event data from ComCat for event {event_id}"
                );
                Confirmation::Unknown
            }
        }
    }
}

// Origin dispatch pipeline: filter -> locate -> build -> queue.
//
// One notification in, at most one queue message out. The pipeline
// returns what it did; logging the summary and picking an exit code is
// up to the caller.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::filter::{Decision, IgnoreReason, ProductFilter};
use crate::geoserve::resolver::LocationResolver;
use crate::notification::Notification;
use crate::queue::client::{QueueMessage, QueueSink};
use crate::record::builder::build_event_record;
use crate::record::EventRecord;

/// What happened to a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Filtered out; nothing was sent.
    Ignored(IgnoreReason),
    /// A cancel was sent for this event id.
    Cancelled(String),
    /// An origin was sent with this record.
    Queued(EventRecord),
}

/// Everything needed to handle one notification.
pub struct Pipeline<'a> {
    filter: ProductFilter<'a>,
    locations: LocationResolver<'a>,
    queue: &'a dyn QueueSink,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        filter: ProductFilter<'a>,
        locations: LocationResolver<'a>,
        queue: &'a dyn QueueSink,
    ) -> Self {
        Self {
            filter,
            locations,
            queue,
        }
    }

    /// Run a notification through the pipeline.
    ///
    /// Only a failed queue delivery is an error.
    pub async fn process(
        &self,
        notification: &Notification,
        now: DateTime<Utc>,
    ) -> Result<Dispatch> {
        match self.filter.evaluate(notification, now).await {
            Decision::Ignore(reason) => Ok(Dispatch::Ignored(reason)),

            Decision::Cancel(record) => {
                let event_id = record.id.clone();
                info!(event_id = event_id.as_str(), "Sending cancel event to queue");
                self.queue.send(&QueueMessage::cancel(record)).await?;
                Ok(Dispatch::Cancelled(event_id))
            }

            Decision::Proceed(origin) => {
                let location = self
                    .locations
                    .resolve(origin.latitude, origin.longitude, origin.title.as_deref())
                    .await;
                let record = build_event_record(&origin, location);

                info!(
                    event_id = record.id.as_str(),
                    locstring = record.locstring.as_str(),
                    "Sending event to queue"
                );
                self.queue.send(&QueueMessage::origin(record.clone())).await?;
                Ok(Dispatch::Queued(record))
            }
        }
    }
}

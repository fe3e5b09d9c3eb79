// One receiver run: config check, argument check, dispatch.
//
// The binary builds the real services and logging, then hands over to
// `run`. Everything that decides the exit status lives here so it can be
// driven with stub services.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::catalog::client::CatalogService;
use crate::catalog::resolver::CatalogResolver;
use crate::config::Config;
use crate::filter::{FilterPolicy, ProductFilter};
use crate::geoserve::client::PlacesService;
use crate::geoserve::resolver::LocationResolver;
use crate::notification::Notification;
use crate::pipeline::{Dispatch, Pipeline};
use crate::queue::client::QueueSink;
use crate::retry::RetryPolicy;

/// External services a run talks to.
pub struct Services<'a> {
    pub catalog: &'a dyn CatalogService,
    pub places: &'a dyn PlacesService,
    pub queue: &'a dyn QueueSink,
    pub retry: RetryPolicy,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The notification went through the pipeline.
    Dispatched(Dispatch),
    /// PDL sent arguments that couldn't be parsed; nothing was done.
    UnparsedArguments,
    /// The ShakeMap data directory is missing; nothing was contacted.
    InvalidDataDir,
    /// The queue could not be reached.
    QueueFailed,
}

impl Outcome {
    /// Process exit status: 0 for any decision, 1 for a fault.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Dispatched(_) | Outcome::UnparsedArguments => 0,
            Outcome::InvalidDataDir | Outcome::QueueFailed => 1,
        }
    }
}

/// Handle one PDL invocation.
///
/// The data directory is checked before the arguments are looked at, so a
/// misconfigured install fails loudly on every product.
pub async fn run(
    parsed: Result<Notification, clap::Error>,
    config: &Config,
    services: &Services<'_>,
    now: DateTime<Utc>,
) -> Outcome {
    if let Err(e) = config.require_data_dir() {
        error!(error = %e, "Invalid ShakeMap data directory");
        return Outcome::InvalidDataDir;
    }

    let notification = match parsed {
        Ok(notification) => notification,
        Err(e) => {
            warn!(error = ?e.kind(), "Could not parse PDL arguments, no action taken");
            return Outcome::UnparsedArguments;
        }
    };

    let filter = ProductFilter::new(
        CatalogResolver::new(services.catalog, services.retry),
        FilterPolicy {
            allowed_source: config.allowed_source.clone(),
            ..FilterPolicy::default()
        },
    );
    let pipeline = Pipeline::new(
        filter,
        LocationResolver::new(services.places, services.retry),
        services.queue,
    );

    match pipeline.process(&notification, now).await {
        Ok(dispatch) => {
            match &dispatch {
                Dispatch::Ignored(reason) => info!("{reason}"),
                Dispatch::Cancelled(event_id) => info!("Sent cancel event {event_id} to queue"),
                Dispatch::Queued(record) => info!("Sent event {} to queue", record.id),
            }
            Outcome::Dispatched(dispatch)
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), port = config.queue_port, "Queue delivery failed");
            Outcome::QueueFailed
        }
    }
}

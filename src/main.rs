use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use clap::error::ErrorKind;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quakegate::app::{self, Services};
use quakegate::catalog::client::ComcatClient;
use quakegate::config::{Config, LOG_FILE_NAME};
use quakegate::geoserve::client::GeoserveClient;
use quakegate::notification::args::{lossy_args, parse_notification};
use quakegate::queue::client::TcpQueueClient;
use quakegate::retry::RetryPolicy;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // PDL arguments first, so --help and --version work without a profile.
    // Product text isn't guaranteed to be UTF-8.
    let parsed = parse_notification(lossy_args(std::env::args_os()));
    if let Err(e) = &parsed {
        if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            e.exit();
        }
    }

    let config = Config::load();
    let _log_guard = init_logging(config.as_ref().ok().map(Config::log_dir));
    let config = config?;

    let comcat = ComcatClient::new(&config.comcat_url)?;
    let geoserve = GeoserveClient::new(&config.geoserve_url)?;
    let queue = TcpQueueClient::new(config.queue_port);
    let services = Services {
        catalog: &comcat,
        places: &geoserve,
        queue: &queue,
        retry: RetryPolicy::default(),
    };

    let outcome = app::run(parsed, &config, &services, Utc::now()).await;
    Ok(ExitCode::from(outcome.exit_code()))
}

/// Console logging on stderr, plus a daily-rolling file when `log_dir` is usable.
///
/// The returned guard must stay alive until exit so buffered file lines flush.
fn init_logging(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quakegate=info"));

    let (file_layer, guard) = match log_dir.as_deref().and_then(open_log_file) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn open_log_file(dir: &Path) -> Option<RollingFileAppender> {
    std::fs::create_dir_all(dir).ok()?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)
        .ok()
}

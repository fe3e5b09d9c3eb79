// PDL invocation arguments → Notification.
//
// PDL hands every product property to the receiver as `--key=value`,
// sometimes wrapped in quotes, and always with many keys we don't care
// about. Arguments are normalized first (quotes stripped, split at the
// first `=`, re-split on whitespace, unknown flags dropped with their
// values) and then parsed with clap. Numeric properties are kept as text
// until conversion so a malformed value becomes "absent" rather than a
// parse failure.

use std::ffi::OsString;

use clap::Parser;

use super::Notification;

/// Flags the receiver understands. Anything else PDL sends is discarded.
pub const KNOWN_FLAGS: &[&str] = &[
    "--type",
    "--status",
    "--action",
    "--source",
    "--property-title",
    "--property-event-type",
    "--property-review-status",
    "--property-eventsourcecode",
    "--property-magnitude",
    "--property-latitude",
    "--property-longitude",
    "--property-depth",
    "--property-eventtime",
    "--help",
    "--version",
];

/// quakegate: decide whether a PDL origin product should start or cancel
/// a ShakeMap run, and tell the local queue.
#[derive(Debug, Parser)]
#[command(name = "quakegate", version, about, args_override_self = true)]
pub struct PdlArgs {
    /// Product type
    #[arg(long = "type")]
    pub product_type: Option<String>,

    /// Product status (UPDATE, DELETE)
    #[arg(long)]
    pub status: Option<String>,

    /// Event action type (EVENT_ADDED, EVENT_UPDATED, ...)
    #[arg(long)]
    pub action: Option<String>,

    /// Product source ("us", "nc", etc.)
    #[arg(long)]
    pub source: Option<String>,

    /// Event location
    #[arg(long, num_args = 0..)]
    pub property_title: Vec<String>,

    /// Event type (earthquake, explosion, etc.)
    #[arg(long, num_args = 0..)]
    pub property_event_type: Vec<String>,

    /// Event review status ("automatic", "reviewed")
    #[arg(long, num_args = 0..)]
    pub property_review_status: Vec<String>,

    /// Event source code (e.g. 2008abcd)
    #[arg(long)]
    pub property_eventsourcecode: Option<String>,

    /// Event magnitude
    #[arg(long, allow_hyphen_values = true)]
    pub property_magnitude: Option<String>,

    /// Event latitude
    #[arg(long, allow_hyphen_values = true)]
    pub property_latitude: Option<String>,

    /// Event longitude
    #[arg(long, allow_hyphen_values = true)]
    pub property_longitude: Option<String>,

    /// Event depth
    #[arg(long, allow_hyphen_values = true)]
    pub property_depth: Option<String>,

    /// Event time
    #[arg(long)]
    pub property_eventtime: Option<String>,
}

impl PdlArgs {
    /// Convert parsed flags into a Notification. Unparseable numbers become `None`.
    pub fn into_notification(self) -> Notification {
        Notification {
            product_type: self.product_type,
            status: self.status,
            action: self.action,
            source: self.source,
            event_source_code: self.property_eventsourcecode,
            event_type: self.property_event_type,
            review_status: self.property_review_status,
            title: self.property_title,
            magnitude: parse_number(self.property_magnitude.as_deref()),
            latitude: parse_number(self.property_latitude.as_deref()),
            longitude: parse_number(self.property_longitude.as_deref()),
            depth: parse_number(self.property_depth.as_deref()),
            event_time: self.property_eventtime,
        }
    }
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Rewrite a raw PDL argv into something clap can parse.
///
/// The first element (program name) passes through untouched.
pub fn normalize_args<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = raw.into_iter();
    let program = iter
        .next()
        .map(|s| s.as_ref().to_string())
        .unwrap_or_else(|| "quakegate".to_string());

    let cleaned: Vec<String> = iter
        .map(|arg| arg.as_ref().replace('"', "").replacen('=', " ", 1))
        .collect();
    let joined = cleaned.join(" ");

    let mut out = vec![program];
    let mut keep = false;
    for token in joined.split_whitespace() {
        if token.starts_with("--") {
            keep = KNOWN_FLAGS.contains(&token);
        }
        if keep {
            out.push(token.to_string());
        }
    }
    out
}

/// Raw process arguments as text. Bytes that aren't UTF-8 become U+FFFD.
pub fn lossy_args<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    raw.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Normalize and parse a raw PDL argv.
pub fn parse_notification<I, S>(raw: I) -> Result<Notification, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args = PdlArgs::try_parse_from(normalize_args(raw))?;
    Ok(args.into_notification())
}

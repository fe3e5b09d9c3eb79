// quakegate: PDL origin receiver for ShakeMap
//
// This is the library root. Each module corresponds to one stage of
// turning an origin notification into (at most) one queue message.

pub mod app;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod geoserve;
pub mod notification;
pub mod pipeline;
pub mod queue;
pub mod record;
pub mod retry;

// Geoserve: nearby places and Flinn-Engdahl regions for a coordinate.
//
// Used only to build a human-readable location string when the origin
// product didn't carry a title. Every failure here degrades to an empty
// location; nothing in this module can stop an event from being queued.

pub mod client;
pub mod compass;
pub mod resolver;

//! Bus arrival estimator over the Open Bus Stride GTFS API.
//!
//! Resolves a line number to its logical routes, a route to its ordered
//! stops, and a stop plus a reference moment to the scheduled arrival times
//! of the rides nearest that moment.

pub mod domain;
pub mod estimator;
pub mod stride;
pub mod web;

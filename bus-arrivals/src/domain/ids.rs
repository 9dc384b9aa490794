//! Schedule identifier types.
//!
//! The schedule source identifies routes, rides and stops by positive
//! integers. Each kind gets its own newtype so a stop id can never be passed
//! where a ride id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator used when an id set is sent to the schedule source as a filter.
pub const JOIN_SEPARATOR: char = ',';

/// Error returned when parsing an invalid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier {input:?}: {reason}")]
pub struct InvalidId {
    input: String,
    reason: &'static str,
}

impl InvalidId {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

fn parse_positive(s: &str) -> Result<i64, InvalidId> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(InvalidId::new(s, "must not be empty"));
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InvalidId::new(s, "must be an integer"))?;
    if value <= 0 {
        return Err(InvalidId::new(s, "must be positive"));
    }
    Ok(value)
}

macro_rules! schedule_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identifier as returned by the schedule source.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw integer value.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_positive(s).map(Self)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

schedule_id! {
    /// Identifier of one raw GTFS route entry.
    ///
    /// A single logical bus line is usually backed by several of these (one per
    /// service period), see [`BusRoute`](super::BusRoute).
    RouteId
}

schedule_id! {
    /// Identifier of one ride, i.e. one scheduled run of a route.
    RideId
}

schedule_id! {
    /// Identifier of a physical stop.
    StopId
}

/// Serialize an id set as the comma-separated string the schedule source
/// expects for list filters.
///
/// Order and duplicates are preserved.
pub fn join_ids<T: fmt::Display>(ids: impl IntoIterator<Item = T>) -> String {
    let mut out = String::new();
    for (i, id) in ids.into_iter().enumerate() {
        if i > 0 {
            out.push(JOIN_SEPARATOR);
        }
        out.push_str(&id.to_string());
    }
    out
}

/// Parse a comma-separated id list, as produced by [`join_ids`].
///
/// An empty (or all-whitespace) input is an empty list.
pub fn parse_id_list<T>(s: &str) -> Result<Vec<T>, InvalidId>
where
    T: FromStr<Err = InvalidId>,
{
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(JOIN_SEPARATOR).map(str::parse).collect()
}

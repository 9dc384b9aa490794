//! Logical bus routes and their merge rules.
//!
//! The schedule source returns one raw route entry per service period, so a
//! single line in a single direction usually shows up several times with
//! different ids. A [`BusRoute`] is the logical line; [`RouteSet`] folds raw
//! entries into logical routes by [`RouteKey`].

use std::collections::HashMap;
use std::fmt;

use super::RouteId;

/// Separator between origin and destination in a GTFS route long name.
const LONG_NAME_SEPARATOR: &str = "<->";

/// Canonical identity of a logical route.
///
/// Two raw entries with the same operator and the same long name describe the
/// same line, direction and alternative. The long name already encodes the
/// direction/alternative suffix (e.g. `"...-1#"`), so it is sufficient on its
/// own once qualified by operator.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RouteKey(String);

impl RouteKey {
    /// Build the key for an operator and route long name.
    pub fn new(operator_ref: &str, long_name: &str) -> Self {
        Self(format!("{operator_ref}|{long_name}"))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteKey({})", self.0)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A logical bus line, backed by one or more raw route ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusRoute {
    /// Merge key.
    pub key: RouteKey,
    /// Public line number (GTFS short name), e.g. "480".
    pub line_number: String,
    /// Operator reference as used by the schedule source.
    pub operator_ref: String,
    /// Operator display name.
    pub agency_name: String,
    /// Origin, parsed from the long name.
    pub from_name: String,
    /// Destination, parsed from the long name.
    pub to_name: String,
    /// GTFS direction code.
    pub direction: String,
    /// Route alternative ("#" for the main variant).
    pub alternative: String,
    /// Every raw route id merged into this route, in discovery order.
    pub route_ids: Vec<RouteId>,
}

impl BusRoute {
    /// Merge a later-discovered entry with the same key into this route.
    ///
    /// The earlier entry (`self`) keeps all of its display attributes; the
    /// later entry only contributes its ids, appended after the existing ones.
    /// Duplicate ids are kept as the source reported them.
    pub fn absorb(&mut self, later: BusRoute) {
        debug_assert_eq!(self.key, later.key, "absorbing a route with another key");
        self.route_ids.extend(later.route_ids);
    }
}

/// Split a GTFS long name into `(origin, destination)` display names.
///
/// Long names look like `"Origin-City<->Destination-City-1#"`: the trailing
/// `-<direction><alternative>` suffix is dropped from the destination. A name
/// without the separator is treated as origin only.
pub fn split_long_name(long_name: &str) -> (String, String) {
    match long_name.split_once(LONG_NAME_SEPARATOR) {
        Some((from, to)) => (from.trim().to_string(), strip_direction_suffix(to).to_string()),
        None => (long_name.trim().to_string(), String::new()),
    }
}

fn strip_direction_suffix(s: &str) -> &str {
    let s = s.trim();
    match s.rsplit_once('-') {
        Some((head, tail)) if tail.starts_with(|c: char| c.is_ascii_digit()) => head.trim_end(),
        _ => s,
    }
}

/// Ordered map of logical routes keyed by [`RouteKey`].
///
/// Iteration order is the order in which each distinct key was first
/// inserted. Inserting a route whose key is already present merges it into the
/// existing entry with [`BusRoute::absorb`].
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    routes: Vec<BusRoute>,
    index: HashMap<RouteKey, usize>,
}

impl RouteSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route, merging it into an earlier entry with the same key.
    pub fn insert(&mut self, route: BusRoute) {
        match self.index.get(&route.key) {
            Some(&pos) => self.routes[pos].absorb(route),
            None => {
                self.index.insert(route.key.clone(), self.routes.len());
                self.routes.push(route);
            }
        }
    }

    /// Number of distinct logical routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes have been inserted.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Look up a route by key.
    pub fn get(&self, key: &RouteKey) -> Option<&BusRoute> {
        self.index.get(key).map(|&pos| &self.routes[pos])
    }

    /// Iterate routes in first-discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &BusRoute> {
        self.routes.iter()
    }

    /// Consume the set, returning routes in first-discovery order.
    pub fn into_vec(self) -> Vec<BusRoute> {
        self.routes
    }
}

impl FromIterator<BusRoute> for RouteSet {
    fn from_iter<I: IntoIterator<Item = BusRoute>>(iter: I) -> Self {
        let mut set = RouteSet::new();
        for route in iter {
            set.insert(route);
        }
        set
    }
}

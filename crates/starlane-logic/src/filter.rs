//! The `LocationFilter` constraint tree.
//!
//! A filter describes what a planet or system must look like: explicit
//! planets or systems, attribute tags, owning governments, distance from a
//! fixed system ("near") or from the caller's current system ("distance"),
//! plus nested filters the location must *not* match and filters one of
//! its linked neighbours must match.
//!
//! Every constraint is optional. Absent constraints are `None` or empty
//! collections, never a magic number, so a filter with all fields empty
//! matches everything.
//!
//! Nested filters are owned values, so a filter is always a finite tree.
//! Filters are immutable once built; [`LocationFilter::rebind_origin`]
//! returns a new filter rather than editing in place.
//!
//! ```
//! use starlane_logic::distance::HopRange;
//! use starlane_logic::filter::LocationFilter;
//! use starlane_logic::universe::SystemId;
//!
//! let filter = LocationFilter::default()
//!     .with_attribute_group(["desert"])
//!     .with_origin_distance(HopRange::new(1, 3));
//! assert!(!filter.is_empty());
//!
//! let anchored = filter.rebind_origin(SystemId(4));
//! assert_eq!(anchored.origin_distance, None);
//! assert_eq!(anchored.near.unwrap().center, SystemId(4));
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::distance::HopRange;
use crate::matching;
use crate::universe::{GovernmentId, PlanetId, ShipSnapshot, SystemId, Universe};

/// Hop window measured from a fixed system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearConstraint {
    pub center: SystemId,
    pub range: HopRange,
}

/// Requirements a planet, system or ship must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFilter {
    /// Planet must be one of these (ignored when empty).
    pub planets: BTreeSet<PlanetId>,
    /// Candidate must carry at least one tag from every group.
    pub attributes: Vec<BTreeSet<String>>,
    /// System must be one of these (ignored when empty).
    pub systems: BTreeSet<SystemId>,
    /// Owner must be one of these (ignored when empty).
    pub governments: BTreeSet<GovernmentId>,
    pub near: Option<NearConstraint>,
    /// Window measured from the origin supplied at match time.
    pub origin_distance: Option<HopRange>,
    /// Candidate must match none of these.
    pub not_filters: Vec<LocationFilter>,
    /// Some linked neighbour of the system must match all of these.
    pub neighbor_filters: Vec<LocationFilter>,
}

impl LocationFilter {
    /// True when the filter places no requirement at all.
    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
            && self.attributes.is_empty()
            && self.systems.is_empty()
            && self.governments.is_empty()
            && self.near.is_none()
            && self.origin_distance.is_none()
            && self.not_filters.is_empty()
            && self.neighbor_filters.is_empty()
    }

    /// True if any node of the tree still depends on a match-time origin.
    pub fn uses_origin(&self) -> bool {
        self.origin_distance.is_some()
            || self.not_filters.iter().any(LocationFilter::uses_origin)
            || self.neighbor_filters.iter().any(LocationFilter::uses_origin)
    }

    /// Anchor every "distance" constraint in the tree to `origin`.
    ///
    /// Each node holding an origin window and no near constraint gets
    /// `near = origin` with that window and loses the origin window. A node
    /// that already has a near constraint keeps both untouched.
    pub fn rebind_origin(&self, origin: SystemId) -> LocationFilter {
        let mut result = self.clone();
        if let (Some(range), None) = (result.origin_distance, result.near) {
            result.near = Some(NearConstraint {
                center: origin,
                range,
            });
            result.origin_distance = None;
        }
        result.not_filters = self
            .not_filters
            .iter()
            .map(|f| f.rebind_origin(origin))
            .collect();
        result.neighbor_filters = self
            .neighbor_filters
            .iter()
            .map(|f| f.rebind_origin(origin))
            .collect();
        result
    }

    pub fn matches_planet<U: Universe + ?Sized>(
        &self,
        universe: &U,
        planet: PlanetId,
        origin: Option<SystemId>,
    ) -> bool {
        matching::matches_planet(universe, self, planet, origin)
    }

    pub fn matches_system<U: Universe + ?Sized>(
        &self,
        universe: &U,
        system: SystemId,
        origin: Option<SystemId>,
    ) -> bool {
        matching::matches_system(universe, self, system, origin)
    }

    pub fn matches_ship<U: Universe + ?Sized>(&self, universe: &U, ship: &ShipSnapshot) -> bool {
        matching::matches_ship(universe, self, ship)
    }

    // ── Builders ───────────────────────────────────────────────────────

    pub fn with_planet(mut self, planet: PlanetId) -> Self {
        self.planets.insert(planet);
        self
    }

    pub fn with_system(mut self, system: SystemId) -> Self {
        self.systems.insert(system);
        self
    }

    pub fn with_government(mut self, government: GovernmentId) -> Self {
        self.governments.insert(government);
        self
    }

    /// Add one attribute group: any one of `tags` satisfies it.
    pub fn with_attribute_group<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .push(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_near(mut self, center: SystemId, range: HopRange) -> Self {
        self.near = Some(NearConstraint { center, range });
        self
    }

    pub fn with_origin_distance(mut self, range: HopRange) -> Self {
        self.origin_distance = Some(range);
        self
    }

    pub fn with_not(mut self, filter: LocationFilter) -> Self {
        self.not_filters.push(filter);
        self
    }

    pub fn with_neighbor(mut self, filter: LocationFilter) -> Self {
        self.neighbor_filters.push(filter);
        self
    }
}

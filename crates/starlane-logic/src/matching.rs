//! Matching a `LocationFilter` against planets, systems and ships.
//!
//! Planets and systems have separate entry points. Both test attribute
//! groups and the owning government against the candidate's own tags and
//! owner via [`attributes_and_owner_pass`]; the system-level location checks
//! (explicit systems, near window, origin window, neighbours) then run on
//! the candidate system, or on the planet's system for a planet.
//!
//! | Check | Planet | System | Ship |
//! |-------|--------|--------|------|
//! | explicit planets | planet itself | never matches | planet landed on |
//! | attributes / government | planet | system | ship |
//! | explicit systems, near, origin, neighbours | planet's system | system | ship's system |
//! | not-filters | as planet | as system | as ship |
//!
//! Every check short-circuits on failure. Unknown ids never match. There
//! is no error path: a contradictory filter just matches nothing.

use std::collections::BTreeSet;

use crate::distance::within_hops;
use crate::filter::LocationFilter;
use crate::universe::{GovernmentId, PlanetId, ShipSnapshot, SystemId, Universe};

/// Does `planet` satisfy `filter`, with `origin` as the current system?
pub fn matches_planet<U: Universe + ?Sized>(
    universe: &U,
    filter: &LocationFilter,
    planet: PlanetId,
    origin: Option<SystemId>,
) -> bool {
    let Some(record) = universe.planet(planet) else {
        return false;
    };
    if !filter.planets.is_empty() && !filter.planets.contains(&planet) {
        return false;
    }
    if !attributes_and_owner_pass(filter, &record.attributes, record.government) {
        return false;
    }
    if !system_location_passes(universe, filter, record.system, origin) {
        return false;
    }
    !filter
        .not_filters
        .iter()
        .any(|not| matches_planet(universe, not, planet, origin))
}

/// Does `system` satisfy `filter`, with `origin` as the current system?
///
/// A filter that names explicit planets never matches a bare system.
pub fn matches_system<U: Universe + ?Sized>(
    universe: &U,
    filter: &LocationFilter,
    system: SystemId,
    origin: Option<SystemId>,
) -> bool {
    let Some(record) = universe.system(system) else {
        return false;
    };
    if !filter.planets.is_empty() {
        return false;
    }
    if !attributes_and_owner_pass(filter, &record.attributes, record.government) {
        return false;
    }
    if !system_location_passes(universe, filter, system, origin) {
        return false;
    }
    !filter
        .not_filters
        .iter()
        .any(|not| matches_system(universe, not, system, origin))
}

/// Does the ship satisfy `filter`?
///
/// The ship's current system doubles as the origin. A ship in hyperspace
/// only matches the empty filter.
pub fn matches_ship<U: Universe + ?Sized>(
    universe: &U,
    filter: &LocationFilter,
    ship: &ShipSnapshot,
) -> bool {
    let Some(system) = ship.system else {
        return filter.is_empty();
    };
    if universe.system(system).is_none() {
        return false;
    }
    if !filter.planets.is_empty()
        && !ship
            .landed_on
            .is_some_and(|planet| filter.planets.contains(&planet))
    {
        return false;
    }
    if !attributes_and_owner_pass(filter, &ship.attributes, ship.government) {
        return false;
    }
    if !system_location_passes(universe, filter, system, Some(system)) {
        return false;
    }
    !filter
        .not_filters
        .iter()
        .any(|not| matches_ship(universe, not, ship))
}

/// Attribute groups and government, tested against one candidate's view.
///
/// Every group needs at least one of its tags present. An unowned
/// candidate fails a non-empty government set.
pub fn attributes_and_owner_pass(
    filter: &LocationFilter,
    attributes: &BTreeSet<String>,
    owner: Option<GovernmentId>,
) -> bool {
    let groups_ok = filter
        .attributes
        .iter()
        .all(|group| !group.is_disjoint(attributes));
    if !groups_ok {
        return false;
    }
    filter.governments.is_empty() || owner.is_some_and(|gov| filter.governments.contains(&gov))
}

/// Checks that depend only on where the system sits in the link graph.
fn system_location_passes<U: Universe + ?Sized>(
    universe: &U,
    filter: &LocationFilter,
    system: SystemId,
    origin: Option<SystemId>,
) -> bool {
    if !filter.systems.is_empty() && !filter.systems.contains(&system) {
        return false;
    }
    if let Some(near) = filter.near {
        if !within_hops(universe, near.center, system, near.range) {
            return false;
        }
    }
    // Without an origin the window has nothing to measure from.
    if let (Some(range), Some(origin)) = (filter.origin_distance, origin) {
        if !within_hops(universe, origin, system, range) {
            return false;
        }
    }
    neighbors_pass(universe, filter, system, origin)
}

/// One linked neighbour must satisfy every neighbour filter at once.
fn neighbors_pass<U: Universe + ?Sized>(
    universe: &U,
    filter: &LocationFilter,
    system: SystemId,
    origin: Option<SystemId>,
) -> bool {
    if filter.neighbor_filters.is_empty() {
        return true;
    }
    universe.links(system).iter().any(|&neighbor| {
        filter
            .neighbor_filters
            .iter()
            .all(|f| matches_system(universe, f, neighbor, origin))
    })
}

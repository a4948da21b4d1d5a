//! Random selection of a location that satisfies a filter.
//!
//! The pickers walk the whole universe once, in its fixed enumeration
//! order, and keep a single candidate using reservoir sampling: the k-th
//! match replaces the held candidate with probability `1/k`. Every match
//! ends up equally likely without ever collecting the match list.
//!
//! All randomness comes from the caller's `rand::Rng`, so a seeded
//! generator reproduces the same pick.

use rand::Rng;

use crate::filter::LocationFilter;
use crate::matching::{matches_planet, matches_system};
use crate::universe::{PlanetId, SystemId, Universe};

/// Size-1 reservoir over a stream of unknown length.
#[derive(Debug, Clone)]
pub struct Reservoir<T> {
    held: Option<T>,
    seen: u64,
}

impl<T> Default for Reservoir<T> {
    fn default() -> Self {
        Self {
            held: None,
            seen: 0,
        }
    }
}

impl<T> Reservoir<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer the next item of the stream.
    pub fn offer<R: Rng + ?Sized>(&mut self, item: T, rng: &mut R) {
        self.seen += 1;
        if rng.gen_range(0..self.seen) == 0 {
            self.held = Some(item);
        }
    }

    /// Number of items offered so far.
    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn into_inner(self) -> Option<T> {
        self.held
    }
}

/// Pick a uniformly random system matching `filter` as seen from `origin`.
pub fn pick_system<U, R>(
    universe: &U,
    filter: &LocationFilter,
    origin: Option<SystemId>,
    rng: &mut R,
) -> Option<SystemId>
where
    U: Universe + ?Sized,
    R: Rng + ?Sized,
{
    let anchored = anchor(filter, origin);
    let mut reservoir = Reservoir::new();
    for &system in universe.system_ids() {
        if matches_system(universe, &anchored, system, origin) {
            reservoir.offer(system, rng);
        }
    }
    log::debug!(
        "pick_system: {} of {} systems match",
        reservoir.seen(),
        universe.system_ids().len()
    );
    reservoir.into_inner()
}

/// Pick a uniformly random landable planet matching `filter`.
///
/// Planets that need landing clearance are only eligible when
/// `has_clearance` is set.
pub fn pick_planet<U, R>(
    universe: &U,
    filter: &LocationFilter,
    origin: Option<SystemId>,
    has_clearance: bool,
    rng: &mut R,
) -> Option<PlanetId>
where
    U: Universe + ?Sized,
    R: Rng + ?Sized,
{
    let anchored = anchor(filter, origin);
    let mut reservoir = Reservoir::new();
    let mut examined = 0usize;
    for &system in universe.system_ids() {
        for &planet in universe.planets_in(system) {
            examined += 1;
            if is_eligible_planet(universe, &anchored, planet, origin, has_clearance) {
                reservoir.offer(planet, rng);
            }
        }
    }
    log::debug!(
        "pick_planet: {} of {} planets match (clearance: {})",
        reservoir.seen(),
        examined,
        has_clearance
    );
    reservoir.into_inner()
}

/// Every matching system, in enumeration order.
pub fn matching_systems<U: Universe + ?Sized>(
    universe: &U,
    filter: &LocationFilter,
    origin: Option<SystemId>,
) -> Vec<SystemId> {
    let anchored = anchor(filter, origin);
    universe
        .system_ids()
        .iter()
        .copied()
        .filter(|&s| matches_system(universe, &anchored, s, origin))
        .collect()
}

/// Every planet [`pick_planet`] could return, in enumeration order.
pub fn matching_planets<U: Universe + ?Sized>(
    universe: &U,
    filter: &LocationFilter,
    origin: Option<SystemId>,
    has_clearance: bool,
) -> Vec<PlanetId> {
    let anchored = anchor(filter, origin);
    universe
        .system_ids()
        .iter()
        .flat_map(|&s| universe.planets_in(s).iter().copied())
        .filter(|&p| is_eligible_planet(universe, &anchored, p, origin, has_clearance))
        .collect()
}

fn anchor(filter: &LocationFilter, origin: Option<SystemId>) -> LocationFilter {
    match origin {
        Some(origin) => filter.rebind_origin(origin),
        None => filter.clone(),
    }
}

fn is_eligible_planet<U: Universe + ?Sized>(
    universe: &U,
    filter: &LocationFilter,
    planet: PlanetId,
    origin: Option<SystemId>,
    has_clearance: bool,
) -> bool {
    let Some(record) = universe.planet(planet) else {
        return false;
    };
    if !record.landable || (record.requires_clearance && !has_clearance) {
        return false;
    }
    matches_planet(universe, filter, planet, origin)
}

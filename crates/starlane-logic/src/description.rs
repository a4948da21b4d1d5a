//! Declarative filter descriptions.
//!
//! A [`FilterDescription`] is the already-parsed, name-based form of a
//! filter, as it would arrive from mission data or a JSON scenario file.
//! Building one against a [`Universe`] resolves every name to an id and
//! checks the shape of the filter:
//!
//! - every name must exist in the universe
//! - attribute groups must not be empty
//! - hop windows must have `min <= max`
//!
//! `near` without bounds means `0..=1`; a `distance` without `min` means
//! `0..=max`.
//!
//! ```
//! use starlane_logic::description::{validate_description, FilterDescription};
//! use starlane_logic::error::FilterError;
//! use starlane_logic::universe::StarMap;
//!
//! let map = StarMap::from_json(r#"{ "systems": [ { "name": "Sol" } ] }"#).unwrap();
//! let desc: FilterDescription = serde_json::from_str(
//!     r#"{ "systems": ["Sol", "Vulcan"], "attributes": [[]] }"#,
//! ).unwrap();
//!
//! let errors = validate_description(&desc, &map);
//! assert_eq!(errors, vec![
//!     FilterError::UnknownSystem("Vulcan".into()),
//!     FilterError::EmptyAttributeGroup(0),
//! ]);
//! ```

use serde::{Deserialize, Serialize};

use crate::distance::HopRange;
use crate::error::FilterError;
use crate::filter::{LocationFilter, NearConstraint};
use crate::universe::Universe;

/// Upper bound of a `near` window when none is given.
pub const DEFAULT_NEAR_MAX: u32 = 1;

/// Name-based description of a [`LocationFilter`]. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDescription {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub planets: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub systems: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub governments: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub near: Option<NearDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceDescription>,
    #[serde(rename = "not", skip_serializing_if = "Vec::is_empty")]
    pub not_filters: Vec<FilterDescription>,
    #[serde(rename = "neighbor", skip_serializing_if = "Vec::is_empty")]
    pub neighbor_filters: Vec<FilterDescription>,
}

/// `near <system> [min] [max]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearDescription {
    pub system: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

/// `distance [min] <max>`, measured from the caller's origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    pub max: u32,
}

/// Every problem in `desc`, nested filters included. Empty means buildable.
pub fn validate_description<U: Universe + ?Sized>(
    desc: &FilterDescription,
    universe: &U,
) -> Vec<FilterError> {
    let mut errors = Vec::new();
    build_into(desc, universe, &mut errors);
    errors
}

/// Build a filter, failing on the first problem found.
pub fn build_filter<U: Universe + ?Sized>(
    desc: &FilterDescription,
    universe: &U,
) -> Result<LocationFilter, FilterError> {
    let mut errors = Vec::new();
    let filter = build_into(desc, universe, &mut errors);
    match errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(filter),
    }
}

/// Name-based description of `filter`; ids the universe doesn't know are dropped.
pub fn describe_filter<U: Universe + ?Sized>(
    filter: &LocationFilter,
    universe: &U,
) -> FilterDescription {
    let planets = filter
        .planets
        .iter()
        .filter_map(|&id| universe.planet(id).map(|p| p.name.clone()))
        .collect();
    let systems = filter
        .systems
        .iter()
        .filter_map(|&id| universe.system(id).map(|s| s.name.clone()))
        .collect();
    let governments = filter
        .governments
        .iter()
        .filter_map(|&id| universe.government(id).map(|g| g.name.clone()))
        .collect();
    let near = filter.near.and_then(|near| {
        universe.system(near.center).map(|center| NearDescription {
            system: center.name.clone(),
            min: Some(near.range.min),
            max: Some(near.range.max),
        })
    });

    FilterDescription {
        planets,
        systems,
        governments,
        attributes: filter
            .attributes
            .iter()
            .map(|group| group.iter().cloned().collect())
            .collect(),
        near,
        distance: filter.origin_distance.map(|range| DistanceDescription {
            min: Some(range.min),
            max: range.max,
        }),
        not_filters: filter
            .not_filters
            .iter()
            .map(|f| describe_filter(f, universe))
            .collect(),
        neighbor_filters: filter
            .neighbor_filters
            .iter()
            .map(|f| describe_filter(f, universe))
            .collect(),
    }
}

impl LocationFilter {
    pub fn from_description<U: Universe + ?Sized>(
        desc: &FilterDescription,
        universe: &U,
    ) -> Result<Self, FilterError> {
        build_filter(desc, universe)
    }

    pub fn describe<U: Universe + ?Sized>(&self, universe: &U) -> FilterDescription {
        describe_filter(self, universe)
    }
}

fn build_into<U: Universe + ?Sized>(
    desc: &FilterDescription,
    universe: &U,
    errors: &mut Vec<FilterError>,
) -> LocationFilter {
    let mut filter = LocationFilter::default();

    for name in &desc.planets {
        match universe.find_planet(name) {
            Some(id) => {
                filter.planets.insert(id);
            }
            None => errors.push(FilterError::UnknownPlanet(name.clone())),
        }
    }
    for name in &desc.systems {
        match universe.find_system(name) {
            Some(id) => {
                filter.systems.insert(id);
            }
            None => errors.push(FilterError::UnknownSystem(name.clone())),
        }
    }
    for name in &desc.governments {
        match universe.find_government(name) {
            Some(id) => {
                filter.governments.insert(id);
            }
            None => errors.push(FilterError::UnknownGovernment(name.clone())),
        }
    }

    for (index, group) in desc.attributes.iter().enumerate() {
        if group.is_empty() {
            errors.push(FilterError::EmptyAttributeGroup(index));
            continue;
        }
        filter.attributes.push(group.iter().cloned().collect());
    }

    if let Some(near) = &desc.near {
        let range = HopRange::new(near.min.unwrap_or(0), near.max.unwrap_or(DEFAULT_NEAR_MAX));
        check_range("near", range, errors);
        match universe.find_system(&near.system) {
            Some(center) => filter.near = Some(NearConstraint { center, range }),
            None => errors.push(FilterError::UnknownSystem(near.system.clone())),
        }
    }

    if let Some(distance) = &desc.distance {
        let range = HopRange::new(distance.min.unwrap_or(0), distance.max);
        check_range("distance", range, errors);
        filter.origin_distance = Some(range);
    }

    filter.not_filters = desc
        .not_filters
        .iter()
        .map(|d| build_into(d, universe, errors))
        .collect();
    filter.neighbor_filters = desc
        .neighbor_filters
        .iter()
        .map(|d| build_into(d, universe, errors))
        .collect();

    filter
}

fn check_range(what: &'static str, range: HopRange, errors: &mut Vec<FilterError>) {
    if range.is_unsatisfiable() {
        errors.push(FilterError::InvertedRange {
            what,
            min: range.min,
            max: range.max,
        });
    }
}

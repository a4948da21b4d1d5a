//! Integration tests for the location filter pipeline.
//!
//! Exercises: StarMapData → StarMap → FilterDescription → LocationFilter
//! → matching → rebinding → random pick.
//!
//! All tests are pure logic over a small hand-built star map.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use starlane_logic::description::{validate_description, FilterDescription};
use starlane_logic::distance::{hop_distance, HopRange};
use starlane_logic::error::FilterError;
use starlane_logic::filter::LocationFilter;
use starlane_logic::select::{matching_planets, matching_systems, pick_planet, pick_system};
use starlane_logic::universe::{PlanetId, ShipSnapshot, StarMap, SystemId, Universe};

// ── Helpers ────────────────────────────────────────────────────────────

/// Hub-and-spoke map with a detached pocket.
///
/// ```text
///   Rim1 - Core - Rim2 - Edge
///            |
///          Rim3          Lost1 - Lost2
/// ```
fn star_map() -> StarMap {
    StarMap::from_json(
        r#"{
            "governments": ["Union", "Guild"],
            "systems": [
                { "name": "Core", "government": "Union", "attributes": ["core"],
                  "links": ["Rim1", "Rim2", "Rim3"],
                  "planets": [
                      { "name": "Capital", "attributes": ["urban", "shipyard"] },
                      { "name": "Vault", "attributes": ["urban"], "requires_clearance": true }
                  ] },
                { "name": "Rim1", "government": "Union",
                  "planets": [ { "name": "Orchard", "attributes": ["farm"] } ] },
                { "name": "Rim2", "government": "Guild", "links": ["Edge"],
                  "planets": [ { "name": "Quarry", "attributes": ["mine", "desert"] } ] },
                { "name": "Rim3", "government": "Guild",
                  "planets": [ { "name": "Dune", "attributes": ["desert", "farm"] } ] },
                { "name": "Edge", "attributes": ["frontier"],
                  "planets": [ { "name": "Outpost", "attributes": ["mine"] },
                               { "name": "Storm", "attributes": ["gas"], "landable": false } ] },
                { "name": "Lost1", "links": ["Lost2"] },
                { "name": "Lost2" }
            ]
        }"#,
    )
    .expect("fixture star map loads")
}

fn system(map: &StarMap, name: &str) -> SystemId {
    map.find_system(name).unwrap()
}

fn planet(map: &StarMap, name: &str) -> PlanetId {
    map.find_planet(name).unwrap()
}

fn build(map: &StarMap, json: &str) -> LocationFilter {
    let desc: FilterDescription = serde_json::from_str(json).unwrap();
    LocationFilter::from_description(&desc, map).unwrap()
}

fn names(map: &StarMap, ids: &[SystemId]) -> Vec<String> {
    ids.iter()
        .map(|&id| map.system(id).unwrap().name.clone())
        .collect()
}

// ── Matching ───────────────────────────────────────────────────────────

#[test]
fn empty_description_matches_all_locations() {
    let map = star_map();
    let filter = build(&map, "{}");
    assert!(filter.is_empty());
    assert_eq!(matching_systems(&map, &filter, None).len(), map.system_count());
    for p in map.planet_ids() {
        assert!(filter.matches_planet(&map, p, None));
    }
}

#[test]
fn desert_farm_conjunction() {
    let map = star_map();
    let filter = build(&map, r#"{ "attributes": [["desert"], ["farm", "mine"]] }"#);
    let found: Vec<_> = map
        .planet_ids()
        .filter(|&p| filter.matches_planet(&map, p, None))
        .collect();
    assert_eq!(found, vec![planet(&map, "Quarry"), planet(&map, "Dune")]);
}

#[test]
fn guild_planets_outside_rim3() {
    let map = star_map();
    let filter = build(
        &map,
        r#"{ "governments": ["Guild"], "not": [ { "systems": ["Rim3"] } ] }"#,
    );
    assert!(filter.matches_planet(&map, planet(&map, "Quarry"), None));
    assert!(!filter.matches_planet(&map, planet(&map, "Dune"), None));
    assert!(!filter.matches_planet(&map, planet(&map, "Capital"), None));
}

#[test]
fn near_core_window() {
    let map = star_map();
    let core = system(&map, "Core");

    let filter = build(&map, r#"{ "near": { "system": "Core" } }"#);
    assert_eq!(
        names(&map, &matching_systems(&map, &filter, None)),
        vec!["Core", "Rim1", "Rim2", "Rim3"]
    );

    let ring = build(&map, r#"{ "near": { "system": "Core", "min": 2, "max": 2 } }"#);
    assert_eq!(names(&map, &matching_systems(&map, &ring, None)), vec!["Edge"]);
    assert_eq!(hop_distance(&map, core, system(&map, "Edge"), None), Some(2));
}

#[test]
fn disconnected_pocket_is_unreachable() {
    let map = star_map();
    assert_eq!(
        hop_distance(&map, system(&map, "Core"), system(&map, "Lost2"), None),
        None
    );
    let filter = build(&map, r#"{ "near": { "system": "Lost1", "min": 0, "max": 10 } }"#);
    assert_eq!(
        names(&map, &matching_systems(&map, &filter, None)),
        vec!["Lost1", "Lost2"]
    );
}

#[test]
fn frontier_neighbor() {
    let map = star_map();
    let filter = build(&map, r#"{ "neighbor": [ { "attributes": [["frontier"]] } ] }"#);
    assert_eq!(names(&map, &matching_systems(&map, &filter, None)), vec!["Rim2"]);
    assert!(filter.matches_planet(&map, planet(&map, "Quarry"), None));
}

#[test]
fn origin_distance_matches_rebound_filter() {
    let map = star_map();
    let filter = build(
        &map,
        r#"{ "distance": { "min": 1, "max": 2 }, "not": [ { "distance": { "max": 1 }, "governments": ["Guild"] } ] }"#,
    );
    assert!(filter.uses_origin());
    for &origin in map.system_ids() {
        let bound = filter.rebind_origin(origin);
        assert!(!bound.uses_origin());
        for &s in map.system_ids() {
            assert_eq!(
                bound.matches_system(&map, s, None),
                filter.matches_system(&map, s, Some(origin)),
                "origin {origin:?}, system {s:?}"
            );
        }
        for p in map.planet_ids() {
            assert_eq!(
                bound.matches_planet(&map, p, None),
                filter.matches_planet(&map, p, Some(origin)),
                "origin {origin:?}, planet {p:?}"
            );
        }
    }
}

#[test]
fn ship_at_edge() {
    let map = star_map();
    let union = map.find_government("Union").unwrap();
    let ship = ShipSnapshot {
        system: Some(system(&map, "Edge")),
        landed_on: Some(planet(&map, "Outpost")),
        government: Some(union),
        attributes: ["scout".to_string()].into_iter().collect(),
    };
    let filter = build(
        &map,
        r#"{ "governments": ["Union"], "planets": ["Outpost"], "near": { "system": "Core", "min": 2, "max": 3 } }"#,
    );
    assert!(filter.matches_ship(&map, &ship));

    let guild_only = build(&map, r#"{ "governments": ["Guild"] }"#);
    assert!(!guild_only.matches_ship(&map, &ship));
}

// ── Building ───────────────────────────────────────────────────────────

#[test]
fn build_reports_every_problem() {
    let map = star_map();
    let desc: FilterDescription = serde_json::from_str(
        r#"{
            "planets": ["Nowhere"],
            "attributes": [["ok"], []],
            "distance": { "min": 5, "max": 1 },
            "neighbor": [ { "governments": ["Empire"] } ]
        }"#,
    )
    .unwrap();
    let errors = validate_description(&desc, &map);
    assert_eq!(
        errors,
        vec![
            FilterError::UnknownPlanet("Nowhere".into()),
            FilterError::EmptyAttributeGroup(1),
            FilterError::InvertedRange {
                what: "distance",
                min: 5,
                max: 1,
            },
            FilterError::UnknownGovernment("Empire".into()),
        ]
    );
    assert_eq!(
        LocationFilter::from_description(&desc, &map).unwrap_err(),
        FilterError::UnknownPlanet("Nowhere".into())
    );
}

#[test]
fn hand_built_inverted_window_matches_nothing() {
    let map = star_map();
    let filter = LocationFilter::default().with_near(system(&map, "Core"), HopRange::new(3, 1));
    assert!(matching_systems(&map, &filter, None).is_empty());
    assert!(matching_planets(&map, &filter, None, true).is_empty());
}

// ── Selection ──────────────────────────────────────────────────────────

#[test]
fn pick_system_is_uniform_over_matches() {
    let map = star_map();
    let filter = build(&map, r#"{ "near": { "system": "Core", "min": 1, "max": 1 } }"#);
    let expected = matching_systems(&map, &filter, None);
    assert_eq!(expected.len(), 3);

    let mut rng = StdRng::seed_from_u64(2024);
    let trials = 30_000;
    let mut counts: BTreeMap<SystemId, u32> = BTreeMap::new();
    for _ in 0..trials {
        let picked = pick_system(&map, &filter, None, &mut rng).unwrap();
        *counts.entry(picked).or_default() += 1;
    }
    assert_eq!(counts.len(), 3);
    for id in expected {
        let freq = counts[&id] as f64 / trials as f64;
        assert!((freq - 1.0 / 3.0).abs() < 0.02, "{id:?} picked {freq:.3}");
    }
}

#[test]
fn pick_planet_with_origin_and_clearance() {
    let map = star_map();
    let filter = build(&map, r#"{ "distance": { "max": 0 }, "attributes": [["urban"]] }"#);
    let core = Some(system(&map, "Core"));

    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..100 {
        assert_eq!(
            pick_planet(&map, &filter, core, false, &mut rng),
            Some(planet(&map, "Capital"))
        );
    }
    assert_eq!(
        matching_planets(&map, &filter, core, true),
        vec![planet(&map, "Capital"), planet(&map, "Vault")]
    );
    assert_eq!(
        pick_planet(&map, &filter, Some(system(&map, "Edge")), true, &mut rng),
        None
    );
}

#[test]
fn unlandable_planets_are_never_picked() {
    let map = star_map();
    let filter = build(&map, r#"{ "systems": ["Edge"] }"#);
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..100 {
        assert_eq!(
            pick_planet(&map, &filter, None, true, &mut rng),
            Some(planet(&map, "Outpost"))
        );
    }
}

#[test]
fn seeded_picks_are_reproducible() {
    let map = star_map();
    let filter = build(&map, "{}");
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..20)
            .map(|_| pick_system(&map, &filter, None, &mut rng))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(77), run(77));
}

//! Starlane Headless Filter Harness
//!
//! Validates the location filter engine against the bundled star map and
//! scenario files. Runs entirely in-process: no game loop, no rendering.
//!
//! Usage:
//!   cargo run -p starlane-simtest
//!   cargo run -p starlane-simtest -- --verbose --seed 7 --trials 5000

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use starlane_logic::description::{validate_description, FilterDescription};
use starlane_logic::distance::{hop_distance, HopRange};
use starlane_logic::filter::LocationFilter;
use starlane_logic::select::{matching_planets, matching_systems, pick_planet, pick_system};
use starlane_logic::universe::{StarMap, SystemId, Universe};

// ── Data files ──────────────────────────────────────────────────────────
const UNIVERSE_JSON: &str = include_str!("../../../data/universe.json");
const SCENARIOS_JSON: &str = include_str!("../../../data/scenarios.json");

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    filter: FilterDescription,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    has_clearance: bool,
    #[serde(default)]
    expect_systems: Option<Vec<String>>,
    #[serde(default)]
    expect_planets: Option<Vec<String>>,
}

struct Options {
    verbose: bool,
    seed: u64,
    trials: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verbose: false,
            seed: 42,
            trials: 10_000,
        }
    }
}

impl Options {
    fn from_args() -> Self {
        let mut options = Options::default();
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--verbose" => options.verbose = true,
                "--seed" => {
                    if let Some(seed) = args.next().and_then(|v| v.parse().ok()) {
                        options.seed = seed;
                    }
                }
                "--trials" => {
                    if let Some(trials) = args.next().and_then(|v| v.parse().ok()) {
                        options.trials = trials;
                    }
                }
                other => eprintln!("ignoring unknown argument {other}"),
            }
        }
        options
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let options = Options::from_args();
    println!("=== Starlane Filter Harness ===\n");

    let map = match StarMap::from_json(UNIVERSE_JSON) {
        Ok(map) => map,
        Err(e) => {
            println!("  ✗ universe_load: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Star map shape
    results.extend(validate_star_map(&map, &options));

    // 2. Scenario filters
    results.extend(validate_scenarios(&map, &options));

    // 3. Pick uniformity
    results.extend(validate_uniformity(&map, &options));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Star Map ─────────────────────────────────────────────────────────

fn validate_star_map(map: &StarMap, _options: &Options) -> Vec<TestResult> {
    println!("--- Star Map ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "map_not_empty".into(),
        passed: map.system_count() > 0 && map.planet_count() > 0,
        detail: format!(
            "{} systems, {} planets",
            map.system_count(),
            map.planet_count()
        ),
    });

    let asymmetric: Vec<_> = map
        .system_ids()
        .iter()
        .flat_map(|&a| map.links(a).iter().map(move |&b| (a, b)))
        .filter(|&(a, b)| !map.links(b).contains(&a))
        .collect();
    results.push(TestResult {
        name: "links_symmetric".into(),
        passed: asymmetric.is_empty(),
        detail: format!("{} one-way links", asymmetric.len()),
    });

    let mut mismatched = 0;
    for &a in map.system_ids() {
        for &b in map.system_ids() {
            if hop_distance(map, a, b, None) != hop_distance(map, b, a, None) {
                mismatched += 1;
            }
        }
    }
    results.push(TestResult {
        name: "distance_symmetric".into(),
        passed: mismatched == 0,
        detail: format!("{} asymmetric pairs", mismatched),
    });

    let isolated: Vec<_> = map
        .system_ids()
        .iter()
        .filter(|&&s| map.links(s).is_empty())
        .filter_map(|&s| map.system(s).map(|sys| sys.name.as_str()))
        .collect();
    results.push(TestResult {
        name: "isolated_systems".into(),
        passed: true,
        detail: if isolated.is_empty() {
            "none".into()
        } else {
            isolated.join(", ")
        },
    });

    results
}

// ── 2. Scenarios ────────────────────────────────────────────────────────

fn validate_scenarios(map: &StarMap, options: &Options) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();

    let scenarios: Vec<Scenario> = match serde_json::from_str(SCENARIOS_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "scenarios_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let mut rng = StdRng::seed_from_u64(options.seed);
    for scenario in &scenarios {
        results.extend(run_scenario(map, scenario, &mut rng));
    }
    results
}

fn run_scenario(map: &StarMap, scenario: &Scenario, rng: &mut StdRng) -> Vec<TestResult> {
    let mut results = Vec::new();
    let name = &scenario.name;

    let errors = validate_description(&scenario.filter, map);
    if !errors.is_empty() {
        results.push(TestResult {
            name: format!("{name}_build"),
            passed: false,
            detail: errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        });
        return results;
    }
    let filter = match LocationFilter::from_description(&scenario.filter, map) {
        Ok(f) => f,
        Err(e) => {
            results.push(TestResult {
                name: format!("{name}_build"),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let origin = match scenario.origin.as_deref() {
        None => None,
        Some(origin_name) => match map.find_system(origin_name) {
            Some(id) => Some(id),
            None => {
                results.push(TestResult {
                    name: format!("{name}_origin"),
                    passed: false,
                    detail: format!("unknown origin {origin_name}"),
                });
                return results;
            }
        },
    };

    if let Some(expected) = &scenario.expect_systems {
        let found = system_names(map, &matching_systems(map, &filter, origin));
        results.push(TestResult {
            name: format!("{name}_systems"),
            passed: &found == expected,
            detail: format!("found [{}]", found.join(", ")),
        });

        let picked = pick_system(map, &filter, origin, rng)
            .and_then(|id| map.system(id).map(|s| s.name.clone()));
        let ok = match &picked {
            Some(p) => expected.contains(p),
            None => expected.is_empty(),
        };
        results.push(TestResult {
            name: format!("{name}_pick_system"),
            passed: ok,
            detail: format!("picked {:?}", picked),
        });
    }

    if let Some(expected) = &scenario.expect_planets {
        let found: Vec<String> = matching_planets(map, &filter, origin, scenario.has_clearance)
            .iter()
            .filter_map(|&p| map.planet(p).map(|p| p.name.clone()))
            .collect();
        results.push(TestResult {
            name: format!("{name}_planets"),
            passed: &found == expected,
            detail: format!("found [{}]", found.join(", ")),
        });

        let picked = pick_planet(map, &filter, origin, scenario.has_clearance, rng)
            .and_then(|id| map.planet(id).map(|p| p.name.clone()));
        let ok = match &picked {
            Some(p) => expected.contains(p),
            None => expected.is_empty(),
        };
        results.push(TestResult {
            name: format!("{name}_pick_planet"),
            passed: ok,
            detail: format!("picked {:?}", picked),
        });
    }

    if let Some(origin) = origin {
        let bound = filter.rebind_origin(origin);
        let differing = map
            .system_ids()
            .iter()
            .filter(|&&s| {
                bound.matches_system(map, s, None) != filter.matches_system(map, s, Some(origin))
            })
            .count();
        results.push(TestResult {
            name: format!("{name}_rebind"),
            passed: differing == 0,
            detail: format!("{} systems disagree after rebinding", differing),
        });
    }

    let rebuilt = LocationFilter::from_description(&filter.describe(map), map);
    results.push(TestResult {
        name: format!("{name}_describe"),
        passed: rebuilt.as_ref() == Ok(&filter),
        detail: "describe → build round trip".into(),
    });

    results
}

fn system_names(map: &StarMap, ids: &[SystemId]) -> Vec<String> {
    ids.iter()
        .filter_map(|&id| map.system(id).map(|s| s.name.clone()))
        .collect()
}

// ── 3. Uniformity ───────────────────────────────────────────────────────

fn validate_uniformity(map: &StarMap, options: &Options) -> Vec<TestResult> {
    println!("--- Pick Uniformity ---");
    let mut results = Vec::new();

    let Some(sol) = map.find_system("Sol") else {
        results.push(TestResult {
            name: "uniformity_setup".into(),
            passed: false,
            detail: "Sol missing from star map".into(),
        });
        return results;
    };

    let filter = LocationFilter::default().with_near(sol, HopRange::up_to(1));
    let expected = matching_systems(map, &filter, None);
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut counts: BTreeMap<SystemId, u32> = BTreeMap::new();
    let mut strays = 0;
    for _ in 0..options.trials {
        match pick_system(map, &filter, None, &mut rng) {
            Some(id) if expected.contains(&id) => *counts.entry(id).or_default() += 1,
            _ => strays += 1,
        }
    }

    results.push(TestResult {
        name: "uniformity_only_matches".into(),
        passed: strays == 0,
        detail: format!("{} picks outside the match set", strays),
    });

    let target = 1.0 / expected.len().max(1) as f64;
    let worst = expected
        .iter()
        .map(|id| {
            let freq = counts.get(id).copied().unwrap_or(0) as f64 / options.trials.max(1) as f64;
            (freq - target).abs()
        })
        .fold(0.0f64, f64::max);
    results.push(TestResult {
        name: "uniformity_spread".into(),
        passed: worst < 0.05,
        detail: format!(
            "{} matches, target {:.3}, worst deviation {:.3} over {} trials",
            expected.len(),
            target,
            worst,
            options.trials
        ),
    });

    results
}

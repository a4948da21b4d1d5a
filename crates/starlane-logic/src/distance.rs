//! Hop distance over the system link graph.
//!
//! Plain breadth-first search, expanded one ring at a time so the walk can
//! stop as soon as the ring passes the caller's bound. Proximity filters
//! usually test windows of a few hops, so bounded queries touch only a
//! small neighbourhood of the reference system. Nothing is cached between
//! calls.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::universe::{SystemId, Universe};

/// Inclusive hop window `min..=max`.
///
/// A range with `max < min` is legal to hold but contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopRange {
    pub min: u32,
    pub max: u32,
}

impl HopRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// `0..=max`.
    pub fn up_to(max: u32) -> Self {
        Self { min: 0, max }
    }

    pub fn contains(&self, hops: u32) -> bool {
        self.min <= hops && hops <= self.max
    }

    /// True when no hop count can ever fall inside.
    pub fn is_unsatisfiable(&self) -> bool {
        self.max < self.min
    }
}

/// Minimum number of jumps from `from` to `to`.
///
/// Returns `Some(0)` when both are the same system, `None` when `to` cannot
/// be reached, or is farther than `max_hops` when a bound is given.
pub fn hop_distance<U: Universe + ?Sized>(
    universe: &U,
    from: SystemId,
    to: SystemId,
    max_hops: Option<u32>,
) -> Option<u32> {
    if universe.system(from).is_none() || universe.system(to).is_none() {
        return None;
    }
    if from == to {
        return Some(0);
    }

    let mut visited = BTreeSet::new();
    let mut queue: VecDeque<(SystemId, u32)> = VecDeque::new();
    visited.insert(from);
    queue.push_back((from, 0));

    while let Some((current, hops)) = queue.pop_front() {
        let next_hops = hops + 1;
        if max_hops.is_some_and(|max| next_hops > max) {
            // Queue is ordered by hop count; everything left is as far.
            return None;
        }
        for &next in universe.links(current) {
            if next == to {
                return Some(next_hops);
            }
            if visited.insert(next) {
                queue.push_back((next, next_hops));
            }
        }
    }

    None
}

/// Whether `to` lies within `range` jumps of `from`.
pub fn within_hops<U: Universe + ?Sized>(
    universe: &U,
    from: SystemId,
    to: SystemId,
    range: HopRange,
) -> bool {
    if range.is_unsatisfiable() {
        return false;
    }
    hop_distance(universe, from, to, Some(range.max)).is_some_and(|hops| range.contains(hops))
}

/// Every system within `max_hops` of `from`, with its distance, in BFS order.
///
/// `from` itself comes first at distance 0.
pub fn systems_within<U: Universe + ?Sized>(
    universe: &U,
    from: SystemId,
    max_hops: u32,
) -> Vec<(SystemId, u32)> {
    if universe.system(from).is_none() {
        return Vec::new();
    }

    let mut visited = BTreeSet::new();
    let mut out = vec![(from, 0)];
    let mut queue: VecDeque<(SystemId, u32)> = VecDeque::new();
    visited.insert(from);
    queue.push_back((from, 0));

    while let Some((current, hops)) = queue.pop_front() {
        if hops >= max_hops {
            continue;
        }
        for &next in universe.links(current) {
            if visited.insert(next) {
                out.push((next, hops + 1));
                queue.push_back((next, hops + 1));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::fixtures::{chain, sys};
    use crate::universe::{StarMap, StarMapData, SystemData};

    fn two_islands() -> StarMap {
        // A - B    C - D   (no bridge)
        let mk = |name: &str, links: &[&str]| SystemData {
            name: name.into(),
            links: links.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        StarMap::from_data(&StarMapData {
            governments: vec![],
            systems: vec![mk("A", &["B"]), mk("B", &[]), mk("C", &["D"]), mk("D", &[])],
        })
        .unwrap()
    }

    #[test]
    fn same_system_is_zero() {
        let map = chain(&["A", "B"]);
        let a = sys(&map, "A");
        assert_eq!(hop_distance(&map, a, a, None), Some(0));
        assert_eq!(hop_distance(&map, a, a, Some(0)), Some(0));
    }

    #[test]
    fn chain_distances() {
        let map = chain(&["A", "B", "C", "D"]);
        let a = sys(&map, "A");
        assert_eq!(hop_distance(&map, a, sys(&map, "B"), None), Some(1));
        assert_eq!(hop_distance(&map, a, sys(&map, "D"), None), Some(3));
    }

    #[test]
    fn distance_is_symmetric() {
        let map = chain(&["A", "B", "C", "D", "E"]);
        for &x in map.system_ids() {
            for &y in map.system_ids() {
                assert_eq!(
                    hop_distance(&map, x, y, None),
                    hop_distance(&map, y, x, None),
                    "asymmetric between {x:?} and {y:?}"
                );
            }
        }
    }

    #[test]
    fn bound_cuts_search_short() {
        let map = chain(&["A", "B", "C", "D"]);
        let a = sys(&map, "A");
        let d = sys(&map, "D");
        assert_eq!(hop_distance(&map, a, d, Some(2)), None);
        assert_eq!(hop_distance(&map, a, d, Some(3)), Some(3));
    }

    #[test]
    fn unreachable_is_none() {
        let map = two_islands();
        assert_eq!(hop_distance(&map, sys(&map, "A"), sys(&map, "D"), None), None);
    }

    #[test]
    fn unknown_system_is_none() {
        let map = chain(&["A"]);
        assert_eq!(hop_distance(&map, SystemId(7), SystemId(7), None), None);
    }

    #[test]
    fn shortest_path_wins_in_cycle() {
        // Ring A-B-C-D-E-A: A to D is 2 going backwards.
        let mk = |name: &str, link: &str| SystemData {
            name: name.into(),
            links: vec![link.into()],
            ..Default::default()
        };
        let map = StarMap::from_data(&StarMapData {
            governments: vec![],
            systems: vec![mk("A", "B"), mk("B", "C"), mk("C", "D"), mk("D", "E"), mk("E", "A")],
        })
        .unwrap();
        assert_eq!(hop_distance(&map, sys(&map, "A"), sys(&map, "D"), None), Some(2));
    }

    #[test]
    fn range_inclusive_bounds() {
        let map = chain(&["A", "B", "C"]);
        let a = sys(&map, "A");
        assert!(within_hops(&map, a, a, HopRange::new(0, 0)));
        assert!(!within_hops(&map, a, sys(&map, "B"), HopRange::new(0, 0)));
        assert!(within_hops(&map, a, sys(&map, "B"), HopRange::new(1, 1)));
        assert!(!within_hops(&map, a, a, HopRange::new(1, 1)));
        assert!(within_hops(&map, a, sys(&map, "C"), HopRange::new(1, 2)));
    }

    #[test]
    fn inverted_range_never_contains() {
        let map = chain(&["A", "B"]);
        let a = sys(&map, "A");
        let range = HopRange::new(2, 1);
        assert!(range.is_unsatisfiable());
        assert!(!within_hops(&map, a, a, range));
        assert!(!within_hops(&map, a, sys(&map, "B"), range));
    }

    #[test]
    fn systems_within_lists_rings_in_order() {
        let map = chain(&["A", "B", "C", "D"]);
        let b = sys(&map, "B");
        let found = systems_within(&map, b, 1);
        assert_eq!(found[0], (b, 0));
        assert_eq!(found.len(), 3);
        assert!(found.contains(&(sys(&map, "A"), 1)));
        assert!(found.contains(&(sys(&map, "C"), 1)));
        assert!(!found.iter().any(|&(s, _)| s == sys(&map, "D")));
    }

    #[test]
    fn systems_within_zero_is_self() {
        let map = chain(&["A", "B"]);
        let a = sys(&map, "A");
        assert_eq!(systems_within(&map, a, 0), vec![(a, 0)]);
    }
}

//! Location filters for Starlane.
//!
//! This crate decides whether a planet, a star system or a ship satisfies
//! a declaratively described set of requirements, and picks a random
//! location that does. It is independent of any renderer or game loop:
//! functions take a read-only [`universe::Universe`] and plain data, and
//! return plain results.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`description`] | Declarative filter description, validation, build/describe |
//! | [`distance`] | Bounded BFS hop distance over the link graph |
//! | [`error`] | Build and star map loading errors |
//! | [`filter`] | `LocationFilter` constraint tree and origin rebinding |
//! | [`matching`] | Planet / system / ship matching |
//! | [`select`] | Reservoir-sampled random pick of a matching location |
//! | [`universe`] | Universe accessor trait and the in-memory `StarMap` |
//!
//! ```
//! use starlane_logic::description::FilterDescription;
//! use starlane_logic::filter::LocationFilter;
//! use starlane_logic::universe::{StarMap, Universe};
//!
//! let map = StarMap::from_json(r#"{
//!     "systems": [
//!         { "name": "Sol", "links": ["Alpha Centauri"] },
//!         { "name": "Alpha Centauri" }
//!     ]
//! }"#).unwrap();
//!
//! let desc: FilterDescription =
//!     serde_json::from_str(r#"{ "near": { "system": "Sol", "max": 1 } }"#).unwrap();
//! let filter = LocationFilter::from_description(&desc, &map).unwrap();
//!
//! let centauri = map.find_system("Alpha Centauri").unwrap();
//! assert!(filter.matches_system(&map, centauri, None));
//! ```

pub mod description;
pub mod distance;
pub mod error;
pub mod filter;
pub mod matching;
pub mod select;
pub mod universe;

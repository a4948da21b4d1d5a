//! Errors raised while loading a star map or building a filter.
//!
//! Once a `LocationFilter` exists, every operation on it is total: a
//! contradictory or unreachable constraint just fails to match. Errors only
//! surface at construction time.

use thiserror::Error;

/// A problem found while turning a `FilterDescription` into a filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown planet \"{0}\"")]
    UnknownPlanet(String),
    #[error("unknown system \"{0}\"")]
    UnknownSystem(String),
    #[error("unknown government \"{0}\"")]
    UnknownGovernment(String),
    /// An attribute group with no tags could never be satisfied.
    #[error("attribute group {0} is empty")]
    EmptyAttributeGroup(usize),
    /// A hop range whose maximum is below its minimum.
    #[error("{what} range is inverted: min {min} > max {max}")]
    InvertedRange {
        what: &'static str,
        min: u32,
        max: u32,
    },
}

/// A problem found while loading `StarMapData`.
#[derive(Debug, Error)]
pub enum StarMapError {
    #[error("star map JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate system \"{0}\"")]
    DuplicateSystem(String),
    #[error("duplicate planet \"{0}\"")]
    DuplicatePlanet(String),
    #[error("duplicate government \"{0}\"")]
    DuplicateGovernment(String),
    #[error("system \"{system}\" links to unknown system \"{target}\"")]
    UnknownLink { system: String, target: String },
    #[error("system \"{0}\" links to itself")]
    SelfLink(String),
    #[error("\"{location}\" is owned by unknown government \"{government}\"")]
    UnknownGovernment { location: String, government: String },
}

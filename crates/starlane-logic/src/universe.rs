//! Read-only view of the game universe.
//!
//! Filters never own universe data. They consult it through the
//! [`Universe`] trait: attribute tags, owning governments, which planets a
//! system holds and which systems it links to. [`StarMap`] is the in-memory
//! implementation used by the harness and the tests, loaded from
//! [`StarMapData`] (JSON).
//!
//! Ids are dense indices assigned in file order, so enumerating systems is
//! deterministic and repeatable: two sweeps over the same map visit the
//! same systems in the same order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::StarMapError;

/// Identifies a star system (node of the link graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SystemId(pub u32);

/// Identifies a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanetId(pub u32);

/// Identifies a government (faction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GovernmentId(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Government {
    pub id: GovernmentId,
    pub name: String,
}

/// A star system: a node of the link graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub government: Option<GovernmentId>,
    pub attributes: BTreeSet<String>,
    pub planets: Vec<PlanetId>,
    /// Directly linked systems. Always symmetric.
    pub links: Vec<SystemId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub system: SystemId,
    pub government: Option<GovernmentId>,
    pub attributes: BTreeSet<String>,
    /// Whether a ship can land here at all.
    pub landable: bool,
    /// Landing needs special clearance from the owner.
    pub requires_clearance: bool,
}

/// The part of a ship a location filter can test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipSnapshot {
    /// Current system; `None` while in hyperspace.
    pub system: Option<SystemId>,
    pub landed_on: Option<PlanetId>,
    pub government: Option<GovernmentId>,
    /// Category and outfit tags of the ship.
    pub attributes: BTreeSet<String>,
}

/// Read-only accessor consumed by the matcher and the selector.
///
/// Implementations must enumerate systems in a fixed order.
pub trait Universe {
    /// Every system, in a fixed and repeatable order.
    fn system_ids(&self) -> &[SystemId];
    fn system(&self, id: SystemId) -> Option<&StarSystem>;
    fn planet(&self, id: PlanetId) -> Option<&Planet>;
    fn government(&self, id: GovernmentId) -> Option<&Government>;

    fn find_system(&self, name: &str) -> Option<SystemId>;
    fn find_planet(&self, name: &str) -> Option<PlanetId>;
    fn find_government(&self, name: &str) -> Option<GovernmentId>;

    /// Systems directly linked to `id`. Empty for unknown ids.
    fn links(&self, id: SystemId) -> &[SystemId] {
        self.system(id).map(|s| s.links.as_slice()).unwrap_or(&[])
    }

    /// Planets of system `id`. Empty for unknown ids.
    fn planets_in(&self, id: SystemId) -> &[PlanetId] {
        self.system(id).map(|s| s.planets.as_slice()).unwrap_or(&[])
    }
}

// ============================================================================
// SERIALIZED FORM
// ============================================================================

/// Star map as authored in JSON. Everything is referenced by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StarMapData {
    pub governments: Vec<String>,
    pub systems: Vec<SystemData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemData {
    pub name: String,
    pub government: Option<String>,
    pub attributes: BTreeSet<String>,
    /// Links may be declared on either end; the loaded map is symmetric.
    pub links: Vec<String>,
    pub planets: Vec<PlanetData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetData {
    pub name: String,
    /// `None` inherits the system's government.
    pub government: Option<String>,
    pub attributes: BTreeSet<String>,
    pub landable: bool,
    pub requires_clearance: bool,
}

impl Default for PlanetData {
    fn default() -> Self {
        Self {
            name: String::new(),
            government: None,
            attributes: BTreeSet::new(),
            landable: true,
            requires_clearance: false,
        }
    }
}

// ============================================================================
// STAR MAP
// ============================================================================

/// In-memory universe. Ids index directly into the backing vectors.
#[derive(Debug, Clone, Default)]
pub struct StarMap {
    order: Vec<SystemId>,
    systems: Vec<StarSystem>,
    planets: Vec<Planet>,
    governments: Vec<Government>,
    system_names: BTreeMap<String, SystemId>,
    planet_names: BTreeMap<String, PlanetId>,
    government_names: BTreeMap<String, GovernmentId>,
}

impl StarMap {
    /// Parse and load a star map from JSON.
    pub fn from_json(json: &str) -> Result<Self, StarMapError> {
        let data: StarMapData = serde_json::from_str(json)?;
        Self::from_data(&data)
    }

    /// Load a star map, resolving every name reference.
    pub fn from_data(data: &StarMapData) -> Result<Self, StarMapError> {
        let mut map = StarMap::default();

        for name in &data.governments {
            let id = GovernmentId(map.governments.len() as u32);
            if map.government_names.insert(name.clone(), id).is_some() {
                return Err(StarMapError::DuplicateGovernment(name.clone()));
            }
            map.governments.push(Government {
                id,
                name: name.clone(),
            });
        }

        for sys in &data.systems {
            let id = SystemId(map.systems.len() as u32);
            if map.system_names.insert(sys.name.clone(), id).is_some() {
                return Err(StarMapError::DuplicateSystem(sys.name.clone()));
            }
            let government = map.resolve_government(&sys.name, sys.government.as_deref())?;
            map.order.push(id);
            map.systems.push(StarSystem {
                id,
                name: sys.name.clone(),
                government,
                attributes: sys.attributes.clone(),
                planets: Vec::new(),
                links: Vec::new(),
            });
        }

        for (index, sys) in data.systems.iter().enumerate() {
            let id = SystemId(index as u32);
            for target in &sys.links {
                let other = map.system_names.get(target).copied().ok_or_else(|| {
                    StarMapError::UnknownLink {
                        system: sys.name.clone(),
                        target: target.clone(),
                    }
                })?;
                if other == id {
                    return Err(StarMapError::SelfLink(sys.name.clone()));
                }
                map.add_link(id, other);
            }

            for planet in &sys.planets {
                let planet_id = PlanetId(map.planets.len() as u32);
                if map
                    .planet_names
                    .insert(planet.name.clone(), planet_id)
                    .is_some()
                {
                    return Err(StarMapError::DuplicatePlanet(planet.name.clone()));
                }
                let government = match planet.government.as_deref() {
                    Some(name) => map.resolve_government(&planet.name, Some(name))?,
                    None => map.systems[index].government,
                };
                map.planets.push(Planet {
                    id: planet_id,
                    name: planet.name.clone(),
                    system: id,
                    government,
                    attributes: planet.attributes.clone(),
                    landable: planet.landable,
                    requires_clearance: planet.requires_clearance,
                });
                map.systems[index].planets.push(planet_id);
            }
        }

        Ok(map)
    }

    fn resolve_government(
        &self,
        location: &str,
        name: Option<&str>,
    ) -> Result<Option<GovernmentId>, StarMapError> {
        match name {
            None => Ok(None),
            Some(name) => self
                .government_names
                .get(name)
                .copied()
                .map(Some)
                .ok_or_else(|| StarMapError::UnknownGovernment {
                    location: location.to_string(),
                    government: name.to_string(),
                }),
        }
    }

    /// Record an undirected link, ignoring duplicates.
    fn add_link(&mut self, a: SystemId, b: SystemId) {
        let forward = &mut self.systems[a.0 as usize].links;
        if !forward.contains(&b) {
            forward.push(b);
        }
        if !self.systems[b.0 as usize].links.contains(&a) {
            log::debug!(
                "linked {} <-> {}",
                self.systems[a.0 as usize].name,
                self.systems[b.0 as usize].name
            );
            self.systems[b.0 as usize].links.push(a);
        }
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    /// Every planet, grouped by system in system order.
    pub fn planet_ids(&self) -> impl Iterator<Item = PlanetId> + '_ {
        self.order
            .iter()
            .flat_map(move |&sys| self.planets_in(sys).iter().copied())
    }
}

impl Universe for StarMap {
    fn system_ids(&self) -> &[SystemId] {
        &self.order
    }

    fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(id.0 as usize)
    }

    fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id.0 as usize)
    }

    fn government(&self, id: GovernmentId) -> Option<&Government> {
        self.governments.get(id.0 as usize)
    }

    fn find_system(&self, name: &str) -> Option<SystemId> {
        self.system_names.get(name).copied()
    }

    fn find_planet(&self, name: &str) -> Option<PlanetId> {
        self.planet_names.get(name).copied()
    }

    fn find_government(&self, name: &str) -> Option<GovernmentId> {
        self.government_names.get(name).copied()
    }
}

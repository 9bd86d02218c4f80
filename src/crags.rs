/// Crag registry for the conditions service.
///
/// Defines the built-in list of crags along with the metadata the dashboard
/// shows and the two attributes the simulator needs (aspect and surface
/// type). A TOML registry file can replace the built-in list; see
/// `load_crags` and the `crags.toml` shipped at the repository root.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::model::{Aspect, ConditionsError, CragProfile, SurfaceType};

// ---------------------------------------------------------------------------
// Crag metadata
// ---------------------------------------------------------------------------

/// A climbing area the service reports on.
#[derive(Debug, Clone, PartialEq)]
pub struct Crag {
    /// Short stable identifier, used on the command line and in logs.
    pub id: String,
    pub name: String,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
    /// Direction the main face points.
    pub aspect: Aspect,
    pub rock_type: String,
    pub surface: SurfaceType,
    /// Free-form drainage note, display only.
    pub drainage: Option<String>,
}

impl Crag {
    /// The part of the crag the simulator depends on.
    pub fn profile(&self) -> CragProfile {
        CragProfile {
            aspect: self.aspect,
            surface: self.surface,
        }
    }
}

/// Static registry row.
pub struct CragEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub aspect: Aspect,
    pub rock_type: &'static str,
    pub surface: SurfaceType,
    pub drainage: &'static str,
}

impl From<&CragEntry> for Crag {
    fn from(e: &CragEntry) -> Self {
        Crag {
            id: e.id.to_string(),
            name: e.name.to_string(),
            latitude: e.latitude,
            longitude: e.longitude,
            aspect: e.aspect,
            rock_type: e.rock_type.to_string(),
            surface: e.surface,
            drainage: Some(e.drainage.to_string()),
        }
    }
}

/// Western Massachusetts crags covered out of the box.
pub static CRAG_REGISTRY: &[CragEntry] = &[
    CragEntry {
        id: "farley",
        name: "Farley",
        latitude: 42.6186,
        longitude: -72.4346,
        aspect: Aspect::SE,
        rock_type: "Gneiss",
        surface: SurfaceType::Route,
        drainage: "Good",
    },
    CragEntry {
        id: "mormon",
        name: "Mormon Hollow",
        latitude: 42.6015,
        longitude: -72.4170,
        aspect: Aspect::S,
        rock_type: "Gneiss",
        surface: SurfaceType::Route,
        drainage: "Fair",
    },
    CragEntry {
        id: "rose",
        name: "Rose Ledge",
        latitude: 42.6787,
        longitude: -72.4764,
        aspect: Aspect::SW,
        rock_type: "Gneiss",
        surface: SurfaceType::Route,
        drainage: "Good",
    },
    CragEntry {
        id: "hanging",
        name: "Hanging Mountain",
        latitude: 42.0620,
        longitude: -73.0760,
        aspect: Aspect::SE,
        rock_type: "Granite",
        surface: SurfaceType::Route,
        drainage: "Good",
    },
    CragEntry {
        id: "gb",
        name: "Great Barrington",
        latitude: 42.1620,
        longitude: -73.3360, // East Mountain area
        aspect: Aspect::W,
        rock_type: "Quartzite/Gneiss",
        surface: SurfaceType::Boulder,
        drainage: "Moderate",
    },
    CragEntry {
        id: "hideaway",
        name: "The Hideaway",
        latitude: 42.6220,
        longitude: -72.4550, // wooded, near Farley
        aspect: Aspect::N,
        rock_type: "Gneiss",
        surface: SurfaceType::Boulder,
        drainage: "Poor",
    },
];

/// The built-in registry as owned records.
pub fn builtin_crags() -> Vec<Crag> {
    CRAG_REGISTRY.iter().map(Crag::from).collect()
}

/// Looks up a crag by id. Returns `None` if not found.
pub fn find_crag<'a>(crags: &'a [Crag], id: &str) -> Option<&'a Crag> {
    crags.iter().find(|c| c.id == id)
}

// ---------------------------------------------------------------------------
// TOML registry
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RegistryFile {
    crags: Vec<RawCrag>,
}

#[derive(Debug, Deserialize)]
struct RawCrag {
    id: String,
    name: String,
    latitude: f64,
    longitude: f64,
    aspect: String,
    rock_type: String,
    surface: String,
    drainage: Option<String>,
}

/// Loads a registry file from disk.
pub fn load_crags<P: AsRef<Path>>(path: P) -> Result<Vec<Crag>, ConditionsError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        ConditionsError::Config(format!("cannot read crag registry {}: {}", path.display(), e))
    })?;
    parse_crags(&text)
}

/// Parses registry TOML and validates the result.
pub fn parse_crags(text: &str) -> Result<Vec<Crag>, ConditionsError> {
    let file: RegistryFile = toml::from_str(text)
        .map_err(|e| ConditionsError::Config(format!("invalid crag registry: {}", e)))?;

    if file.crags.is_empty() {
        return Err(ConditionsError::Config("crag registry is empty".to_string()));
    }

    let mut seen = HashSet::new();
    let mut crags = Vec::with_capacity(file.crags.len());
    for raw in file.crags {
        if !seen.insert(raw.id.clone()) {
            return Err(ConditionsError::Config(format!("duplicate crag id '{}'", raw.id)));
        }
        if !(-90.0..=90.0).contains(&raw.latitude) || !(-180.0..=180.0).contains(&raw.longitude) {
            return Err(ConditionsError::Config(format!(
                "crag '{}' has out-of-range coordinates ({}, {})",
                raw.id, raw.latitude, raw.longitude
            )));
        }
        crags.push(Crag {
            aspect: raw.aspect.parse()?,
            surface: raw.surface.parse()?,
            id: raw.id,
            name: raw.name,
            latitude: raw.latitude,
            longitude: raw.longitude,
            rock_type: raw.rock_type,
            drainage: raw.drainage,
        });
    }
    Ok(crags)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Serializable snapshots of a [`MapRegistry`] and a JSON file store.
//!
//! Path identities are process-local, so snapshots only keep endpoints and
//! waypoints; restored paths receive fresh ids.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Map, MapRegistry, Path, Result, Vec3, WayfinderError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub current: Option<String>,
    #[serde(default)]
    pub maps: Vec<MapSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub name: String,
    #[serde(default)]
    pub paths: Vec<PathSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSnapshot {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub waypoints: Vec<Vec3>,
}

impl MapRegistry {
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            current: Some(self.current_map().name().to_string()),
            maps: self.maps().iter().map(MapSnapshot::from).collect(),
        }
    }

    /// Rebuilds a registry from a snapshot. Empty names are rejected; the
    /// default map is recreated when missing and an unknown current map falls
    /// back to it.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self> {
        let mut maps = Vec::with_capacity(snapshot.maps.len());
        for map_snapshot in snapshot.maps {
            let mut map = Map::new(map_snapshot.name)?;
            for path_snapshot in map_snapshot.paths {
                let mut path = Path::new(path_snapshot.source, path_snapshot.destination)?;
                for waypoint in path_snapshot.waypoints {
                    path.append_waypoint(waypoint);
                }
                map.insert_path(path);
            }
            maps.push(map);
        }
        Ok(MapRegistry::from_maps(maps, snapshot.current.as_deref()))
    }
}

impl RegistrySnapshot {
    fn check_finite(&self) -> Result<()> {
        for map in &self.maps {
            for path in &map.paths {
                if let Some(index) = path.waypoints.iter().position(|w| !w.is_finite()) {
                    return Err(WayfinderError::invalid_argument(format!(
                        "waypoint {index} of `{}` -> `{}` in `{}` is not finite",
                        path.source, path.destination, map.name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl From<&Map> for MapSnapshot {
    fn from(map: &Map) -> Self {
        Self {
            name: map.name().to_string(),
            paths: map.paths().iter().map(PathSnapshot::from).collect(),
        }
    }
}

impl From<&Path> for PathSnapshot {
    fn from(path: &Path) -> Self {
        Self {
            source: path.source().to_string(),
            destination: path.destination().to_string(),
            waypoints: path.waypoints().to_vec(),
        }
    }
}

/// Durable home for map data, wired in by the host.
pub trait MapStore {
    fn load(&self) -> Result<MapRegistry>;

    fn save(&self, registry: &MapRegistry) -> Result<()>;
}

/// Stores the registry as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonMapStore {
    path: PathBuf,
}

impl JsonMapStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "maps.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MapStore for JsonMapStore {
    /// A missing file yields a fresh registry holding only the default map.
    fn load(&self) -> Result<MapRegistry> {
        if !self.path.exists() {
            tracing::debug!(path = ?self.path, "map store not found; starting empty");
            return Ok(MapRegistry::new());
        }

        let json = std::fs::read_to_string(&self.path)?;
        let snapshot: RegistrySnapshot = serde_json::from_str(&json)?;
        MapRegistry::from_snapshot(snapshot)
    }

    /// Refuses registries holding non-finite waypoints, which JSON cannot
    /// represent. The file is replaced by renaming a sibling temp file, so a
    /// failed save leaves the previous contents intact.
    fn save(&self, registry: &MapRegistry) -> Result<()> {
        let snapshot = registry.snapshot();
        snapshot.check_finite()?;
        let json = serde_json::to_string_pretty(&snapshot)?;

        let staging = self.staging_path();
        std::fs::write(&staging, json)?;
        if let Err(err) = std::fs::rename(&staging, &self.path) {
            let _ = std::fs::remove_file(&staging);
            return Err(err.into());
        }
        tracing::debug!(path = ?self.path, maps = registry.maps().len(), "saved maps");
        Ok(())
    }
}

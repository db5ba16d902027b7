use std::hash::{Hash, Hasher};

use crate::{
    names,
    search::{self, RouteAction, Suggestions},
    Path, PathId, Result, WayfinderError,
};

/// Named collection of [`Path`]s.
///
/// Several paths may share the same (source, destination) pair; lookups by
/// endpoints return the first one in insertion order. Equality and hashing
/// use the name only, case-insensitively.
#[derive(Debug, Clone)]
pub struct Map {
    name: String,
    paths: Vec<Path>,
}

impl Map {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(WayfinderError::invalid_argument("map name must not be empty"));
        }
        Ok(Self {
            name,
            paths: Vec::new(),
        })
    }

    /// Builds a map from a name the caller already knows to be non-empty.
    pub(crate) fn unchecked(name: String) -> Self {
        Self {
            name,
            paths: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` when this map is addressed by `name`, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        names::equals(&self.name, name)
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Creates an empty path and appends it to the map.
    pub fn create_path(
        &mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Result<&mut Path> {
        let path = Path::new(source, destination)?;
        tracing::debug!(map = %self.name, id = %path.id(), "created path");
        self.paths.push(path);
        let index = self.paths.len() - 1;
        Ok(&mut self.paths[index])
    }

    /// Adopts an already built path, e.g. one restored from a snapshot.
    pub(crate) fn insert_path(&mut self, path: Path) {
        self.paths.push(path);
    }

    /// Removes the path with the given identity. Other paths that merely share
    /// its endpoints are left alone.
    pub fn remove_path(&mut self, id: PathId) -> Option<Path> {
        let index = self.paths.iter().position(|path| path.id() == id)?;
        tracing::debug!(map = %self.name, %id, "removed path");
        Some(self.paths.remove(index))
    }

    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.iter().find(|path| path.id() == id)
    }

    pub fn path_mut(&mut self, id: PathId) -> Option<&mut Path> {
        self.paths.iter_mut().find(|path| path.id() == id)
    }

    pub fn find_path(&self, source: &str, destination: &str) -> Option<&Path> {
        self.paths
            .iter()
            .find(|path| path.connects(source, destination))
    }

    pub fn find_path_mut(&mut self, source: &str, destination: &str) -> Option<&mut Path> {
        self.paths
            .iter_mut()
            .find(|path| path.connects(source, destination))
    }

    pub fn path_exists(&self, source: &str, destination: &str) -> bool {
        self.find_path(source, destination).is_some()
    }

    /// All paths whose source contains `partial`, ignoring case.
    pub fn filter_by_source_prefix(&self, partial: &str) -> Vec<&Path> {
        self.paths
            .iter()
            .filter(|path| names::contains(path.source(), partial))
            .collect()
    }

    /// All paths leaving exactly `source` whose destination contains
    /// `partial`, ignoring case.
    pub fn filter_by_destination_prefix(&self, source: &str, partial: &str) -> Vec<&Path> {
        self.paths
            .iter()
            .filter(|path| {
                names::equals(path.source(), source)
                    && names::contains(path.destination(), partial)
            })
            .collect()
    }

    pub fn source_suggestions(&self, partial: &str, limit: usize) -> Suggestions {
        let matches = self.filter_by_source_prefix(partial);
        search::suggest(matches.iter().map(|path| path.source()), partial, limit)
    }

    pub fn destination_suggestions(&self, source: &str, partial: &str, limit: usize) -> Suggestions {
        let matches = self.filter_by_destination_prefix(source, partial);
        search::suggest(
            matches.iter().map(|path| path.destination()),
            partial,
            limit,
        )
    }

    pub fn route_action(&self, source: &str, destination: &str) -> RouteAction {
        if self.path_exists(source, destination) {
            RouteAction::ShowIndications
        } else {
            RouteAction::CreatePath
        }
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.is_named(&other.name)
    }
}

impl Eq for Map {}

impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        names::fold(&self.name).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    fn gates() -> Map {
        let mut map = Map::new("Airport").unwrap();
        map.create_path("Gate A", "Gate B").unwrap();
        map.create_path("Gate A", "Gate C").unwrap();
        map
    }

    #[test]
    fn create_path_validates_and_appends() {
        let mut map = Map::new("Airport").unwrap();
        let path = map.create_path("Gate A", "Gate B").unwrap();
        assert_eq!(path.source(), "Gate A");
        assert_eq!(path.destination(), "Gate B");
        assert_eq!(path.waypoint_count(), 0);

        assert!(matches!(
            map.create_path("", "X"),
            Err(WayfinderError::InvalidArgument(_))
        ));
        assert!(matches!(
            map.create_path("X", ""),
            Err(WayfinderError::InvalidArgument(_))
        ));
        assert_eq!(map.path_count(), 1);
    }

    #[test]
    fn rejects_empty_name() {
        assert!(Map::new("").is_err());
    }

    #[test]
    fn finds_first_match_ignoring_case() {
        let mut map = gates();
        let first = map.find_path("gate a", "GATE B").unwrap().id();
        let duplicate = map.create_path("Gate A", "Gate B").unwrap().id();

        assert_ne!(first, duplicate);
        assert_eq!(map.find_path("Gate A", "Gate B").unwrap().id(), first);
        assert!(map.path_exists("GATE A", "gate c"));
        assert!(!map.path_exists("Gate B", "Gate A"));
    }

    #[test]
    fn removal_is_by_identity() {
        let mut map = gates();
        let original = map.find_path("Gate A", "Gate B").unwrap().id();
        let duplicate = map.create_path("Gate A", "Gate B").unwrap().id();

        let removed = map.remove_path(duplicate).unwrap();
        assert_eq!(removed.id(), duplicate);
        assert_eq!(map.find_path("Gate A", "Gate B").unwrap().id(), original);
        assert!(map.remove_path(duplicate).is_none());
        assert_eq!(map.path_count(), 2);
    }

    #[test]
    fn filters_by_source_and_destination() {
        let map = gates();

        let by_source = map.filter_by_source_prefix("gate");
        assert_eq!(by_source.len(), 2);
        assert_eq!(by_source[0].destination(), "Gate B");
        assert_eq!(by_source[1].destination(), "Gate C");

        let by_destination = map.filter_by_destination_prefix("Gate A", "c");
        assert_eq!(by_destination.len(), 1);
        assert_eq!(by_destination[0].destination(), "Gate C");

        assert!(map.filter_by_destination_prefix("Gate", "c").is_empty());
    }

    #[test]
    fn waypoints_are_editable_through_the_map() {
        let mut map = gates();
        let id = map.find_path("Gate A", "Gate C").unwrap().id();
        map.path_mut(id)
            .unwrap()
            .append_waypoint(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(map.path(id).unwrap().waypoint_count(), 1);
    }

    #[test]
    fn suggestions_and_route_action() {
        let mut map = gates();
        map.create_path("gate a", "Lounge").unwrap();

        let sources = map.source_suggestions("gate", 2);
        assert_eq!(sources.entries, vec!["Gate A"]);
        assert!(sources.offer_create);

        let destinations = map.destination_suggestions("Gate A", "gate b", 3);
        assert_eq!(destinations.entries, vec!["Gate B"]);
        assert!(!destinations.offer_create);

        assert_eq!(map.route_action("Gate A", "Gate C"), RouteAction::ShowIndications);
        assert_eq!(map.route_action("Gate A", "Gate Z"), RouteAction::CreatePath);
    }

    #[test]
    fn equality_is_by_name() {
        let a = Map::new("Paris").unwrap();
        let b = Map::new("PARIS").unwrap();
        assert_eq!(a, b);
    }
}

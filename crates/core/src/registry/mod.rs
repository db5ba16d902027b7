use crate::{
    names,
    search::{self, Suggestions},
    Map, Path, PathId, Result, WayfinderError,
};

/// Name of the map that always exists and can never be removed.
pub const DEFAULT_MAP_NAME: &str = "Default Map";

/// Catalogue of every known [`Map`], keyed by case-insensitive name, with
/// exactly one current map.
///
/// The default map is created on construction, always sits at the front of
/// the catalogue and survives every removal, so [`MapRegistry::current_map`]
/// can never fail.
#[derive(Debug, Clone)]
pub struct MapRegistry {
    maps: Vec<Map>,
    current: usize,
}

impl Default for MapRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MapRegistry {
    pub fn new() -> Self {
        Self {
            maps: vec![default_map()],
            current: 0,
        }
    }

    /// Makes the map called `name` current, creating it first when it does
    /// not exist yet.
    pub fn switch_to(&mut self, name: &str) -> Result<&mut Map> {
        if name.is_empty() {
            return Err(WayfinderError::invalid_argument("map name must not be empty"));
        }

        let index = match self.index_of(name) {
            Some(index) => index,
            None => {
                self.maps.push(Map::new(name)?);
                tracing::debug!(map = name, "created map");
                self.maps.len() - 1
            }
        };

        self.current = index;
        tracing::debug!(map = %self.maps[index].name(), "switched current map");
        Ok(&mut self.maps[index])
    }

    pub fn current_map(&self) -> &Map {
        &self.maps[self.current]
    }

    pub fn current_map_mut(&mut self) -> &mut Map {
        &mut self.maps[self.current]
    }

    /// Removes the map called `name`. The default map is silently kept.
    /// When the current map goes away the default map becomes current.
    pub fn remove(&mut self, name: &str) -> Option<Map> {
        if names::equals(name, DEFAULT_MAP_NAME) {
            tracing::debug!("ignoring removal of the default map");
            return None;
        }

        let index = self.index_of(name)?;
        let removed = self.maps.remove(index);
        if index == self.current {
            self.current = 0;
        } else if index < self.current {
            self.current -= 1;
        }

        tracing::debug!(map = %removed.name(), "removed map");
        Some(removed)
    }

    /// All maps whose name contains `partial`, ignoring case.
    pub fn filter_by_name_prefix(&self, partial: &str) -> Vec<&Map> {
        self.maps
            .iter()
            .filter(|map| names::contains(map.name(), partial))
            .collect()
    }

    pub fn name_suggestions(&self, partial: &str, limit: usize) -> Suggestions {
        let matches = self.filter_by_name_prefix(partial);
        search::suggest(matches.iter().map(|map| map.name()), partial, limit)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn map(&self, name: &str) -> Option<&Map> {
        self.maps.iter().find(|map| map.is_named(name))
    }

    pub fn map_mut(&mut self, name: &str) -> Option<&mut Map> {
        self.maps.iter_mut().find(|map| map.is_named(name))
    }

    pub fn maps(&self) -> &[Map] {
        &self.maps
    }

    /// Resolves a path by identity across every map.
    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.maps.iter().find_map(|map| map.path(id))
    }

    pub fn path_mut(&mut self, id: PathId) -> Option<&mut Path> {
        self.maps.iter_mut().find_map(|map| map.path_mut(id))
    }

    /// Removes the path `id` from whichever map owns it.
    pub fn remove_path(&mut self, id: PathId) -> Option<Path> {
        self.maps.iter_mut().find_map(|map| map.remove_path(id))
    }

    /// The map that owns the path `id`, if any.
    pub fn owner_of(&self, id: PathId) -> Option<&Map> {
        self.maps.iter().find(|map| map.path(id).is_some())
    }

    /// Rebuilds a registry from already validated maps. The default map is
    /// moved to (or created at) the front and `current` falls back to it when
    /// the requested name is unknown.
    pub(crate) fn from_maps(maps: Vec<Map>, current: Option<&str>) -> Self {
        let mut ordered: Vec<Map> = Vec::with_capacity(maps.len() + 1);
        let mut rest: Vec<Map> = Vec::with_capacity(maps.len());
        for map in maps {
            if map.is_named(DEFAULT_MAP_NAME) && ordered.is_empty() {
                ordered.push(map);
            } else if !rest.iter().chain(ordered.iter()).any(|seen| *seen == map) {
                rest.push(map);
            } else {
                tracing::warn!(map = %map.name(), "dropping duplicate map");
            }
        }
        if ordered.is_empty() {
            ordered.push(default_map());
        }
        ordered.extend(rest);

        let mut registry = Self {
            maps: ordered,
            current: 0,
        };
        if let Some(index) = current.and_then(|name| registry.index_of(name)) {
            registry.current = index;
        }
        registry
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.maps.iter().position(|map| map.is_named(name))
    }
}

fn default_map() -> Map {
    Map::unchecked(DEFAULT_MAP_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_only_the_default_map() {
        let registry = MapRegistry::new();
        assert_eq!(registry.maps().len(), 1);
        assert_eq!(registry.current_map().name(), DEFAULT_MAP_NAME);
    }

    #[test]
    fn default_map_cannot_be_removed() {
        let mut registry = MapRegistry::new();
        assert!(registry.remove(DEFAULT_MAP_NAME).is_none());
        assert!(registry.remove("default map").is_none());
        assert!(registry.exists(DEFAULT_MAP_NAME));
        assert_eq!(registry.current_map().name(), DEFAULT_MAP_NAME);
    }

    #[test]
    fn switching_is_case_insensitive() {
        let mut registry = MapRegistry::new();
        registry.switch_to("Paris").unwrap();
        registry.switch_to("paris").unwrap();

        assert_eq!(registry.maps().len(), 2);
        assert_eq!(registry.current_map().name(), "Paris");
    }

    #[test]
    fn switching_rejects_empty_names() {
        let mut registry = MapRegistry::new();
        assert!(matches!(
            registry.switch_to(""),
            Err(WayfinderError::InvalidArgument(_))
        ));
        assert_eq!(registry.current_map().name(), DEFAULT_MAP_NAME);
    }

    #[test]
    fn filters_names_by_substring() {
        let mut registry = MapRegistry::new();
        registry.switch_to("Rome").unwrap();

        let found: Vec<&str> = registry
            .filter_by_name_prefix("ro")
            .iter()
            .map(|map| map.name())
            .collect();
        assert_eq!(found, vec!["Rome"]);

        let suggestions = registry.name_suggestions("rom", 3);
        assert_eq!(suggestions.entries, vec!["Rome"]);
        assert!(suggestions.offer_create);
        assert!(!registry.name_suggestions("ROME", 3).offer_create);
    }

    #[test]
    fn removing_current_map_falls_back_to_default() {
        let mut registry = MapRegistry::new();
        registry.switch_to("Rome").unwrap();
        registry.switch_to("Milan").unwrap();

        let removed = registry.remove("milan").unwrap();
        assert_eq!(removed.name(), "Milan");
        assert_eq!(registry.current_map().name(), DEFAULT_MAP_NAME);
        assert!(registry.remove("Milan").is_none());
    }

    #[test]
    fn removing_an_earlier_map_keeps_current() {
        let mut registry = MapRegistry::new();
        registry.switch_to("Rome").unwrap();
        registry.switch_to("Milan").unwrap();

        registry.remove("Rome").unwrap();
        assert_eq!(registry.current_map().name(), "Milan");
    }

    #[test]
    fn resolves_paths_across_maps() {
        let mut registry = MapRegistry::new();
        let id = registry
            .switch_to("Rome")
            .unwrap()
            .create_path("Colosseum", "Forum")
            .unwrap()
            .id();
        registry.switch_to(DEFAULT_MAP_NAME).unwrap();

        assert_eq!(registry.path(id).unwrap().destination(), "Forum");
        assert_eq!(registry.owner_of(id).unwrap().name(), "Rome");
        assert!(registry.path_mut(id).is_some());

        assert_eq!(registry.remove_path(id).unwrap().id(), id);
        assert!(registry.path(id).is_none());
        assert!(registry.remove_path(id).is_none());
    }

    #[test]
    fn rebuilding_keeps_default_in_front() {
        let maps = vec![
            Map::new("Rome").unwrap(),
            Map::new(DEFAULT_MAP_NAME).unwrap(),
            Map::new("rome").unwrap(),
        ];
        let registry = MapRegistry::from_maps(maps, Some("ROME"));

        let names: Vec<&str> = registry.maps().iter().map(|map| map.name()).collect();
        assert_eq!(names, vec![DEFAULT_MAP_NAME, "Rome"]);
        assert_eq!(registry.current_map().name(), "Rome");
    }
}

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{names, Result, Vec3, WayfinderError};

static NEXT_PATH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Path`]. Two paths with the same endpoints
/// are equal by value but never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(u64);

impl PathId {
    fn next() -> Self {
        Self(NEXT_PATH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path#{}", self.0)
    }
}

/// Ordered sequence of world-anchored waypoints leading from `source` to
/// `destination`.
///
/// Equality and hashing only look at the endpoints, case-insensitively; use
/// [`Path::id`] when identity matters.
#[derive(Debug, Clone)]
pub struct Path {
    id: PathId,
    source: String,
    destination: String,
    waypoints: Vec<Vec3>,
}

impl Path {
    /// Creates an empty path. Both endpoints must be non-empty.
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let destination = destination.into();
        if source.is_empty() {
            return Err(WayfinderError::invalid_argument("path source must not be empty"));
        }
        if destination.is_empty() {
            return Err(WayfinderError::invalid_argument(
                "path destination must not be empty",
            ));
        }

        Ok(Self {
            id: PathId::next(),
            source,
            destination,
            waypoints: Vec::new(),
        })
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn append_waypoint(&mut self, position: Vec3) {
        self.waypoints.push(position);
    }

    pub fn replace_waypoint(&mut self, index: usize, position: Vec3) -> Result<()> {
        WayfinderError::check_index(index, self.waypoints.len())?;
        self.waypoints[index] = position;
        Ok(())
    }

    pub fn waypoint(&self, index: usize) -> Result<Vec3> {
        self.waypoints
            .get(index)
            .copied()
            .ok_or(WayfinderError::IndexOutOfRange {
                index,
                len: self.waypoints.len(),
            })
    }

    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
    }

    /// Walking length of the path on the floor plan: the sum of horizontal
    /// distances between consecutive waypoints. Height changes do not count.
    pub fn length(&self) -> f32 {
        let length: f64 = self
            .waypoints
            .windows(2)
            .map(|pair| f64::from(pair[0].planar_distance(pair[1])))
            .sum();
        length as f32
    }

    /// Returns `true` when the endpoints match `source` and `destination`
    /// ignoring case.
    pub fn connects(&self, source: &str, destination: &str) -> bool {
        names::equals(&self.source, source) && names::equals(&self.destination, destination)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.connects(&other.source, &other.destination)
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        names::fold(&self.source).hash(state);
        names::fold(&self.destination).hash(state);
    }
}

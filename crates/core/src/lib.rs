//! Core library for the Wayfinder AR navigation application.
//!
//! The crate stores named maps of recorded paths and drives the two runtime
//! workflows built on them: authoring a path by placing world-anchored
//! markers, and indicating a path by streaming its waypoints back as markers
//! once the user is close enough. Rendering, spatial tracking, dialogs and
//! storage are reached through small traits so hosts can plug in their own
//! platform layers.

pub mod config;
pub mod dialog;
pub mod error;
pub mod geometry;
pub mod input;
pub mod map;
pub mod markers;
pub mod names;
pub mod path;
pub mod registry;
pub mod render;
pub mod search;
pub mod session;
pub mod store;
pub mod wave;

pub use config::{InputConfig, MarkerStyle, NavigationConfig, WayfinderConfig};
pub use dialog::{Answer, ConfirmationDialog, PathDeletion};
pub use error::{Result, WayfinderError};
pub use geometry::{Vec2, Vec3};
pub use input::{
    Gesture, InputFrame, PlacementController, PlacementOutcome, SpatialProbe, TouchCoalescer,
    TouchPress,
};
pub use map::Map;
pub use markers::{Marker, MarkerStream};
pub use path::{Path, PathId};
pub use registry::{MapRegistry, DEFAULT_MAP_NAME};
pub use render::{HeadlessRenderer, MarkerId, MarkerRenderer, MarkerSpawn};
pub use search::{RouteAction, Suggestions};
pub use session::{NavigationSession, SessionMode, TickReport};
pub use store::{JsonMapStore, MapSnapshot, MapStore, PathSnapshot, RegistrySnapshot};
pub use wave::{Color, MarkerPulse, MarkerVisual};

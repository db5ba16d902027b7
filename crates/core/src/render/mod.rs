use std::fmt;

use serde::Serialize;

use crate::{wave::MarkerPulse, MarkerStyle, MarkerVisual, Vec3};

/// Everything a renderer needs to put a new marker into the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerSpawn {
    pub position: Vec3,
    /// Creation order within the current stream, starting at zero.
    pub ordinal: usize,
    /// Seconds the marker's pulse lags behind the first marker.
    pub phase_delay: f32,
}

/// Rendering backend abstraction. The core decides when markers appear and
/// disappear; the backend owns the actual scene objects.
pub trait MarkerRenderer {
    type Handle: Clone + PartialEq + fmt::Debug;

    fn instantiate_marker(&mut self, spawn: &MarkerSpawn) -> Self::Handle;

    fn destroy_marker(&mut self, handle: Self::Handle);
}

/// Identifier handed out by [`HeadlessRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerId(u64);

/// In-memory renderer that keeps track of live markers without drawing
/// anything. Useful for tests and for the command line driver.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    style: MarkerStyle,
    live: Vec<(MarkerId, MarkerSpawn)>,
    next_id: u64,
    created: usize,
    destroyed: usize,
}

impl HeadlessRenderer {
    pub fn new(style: MarkerStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn created_count(&self) -> usize {
        self.created
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    pub fn spawn_of(&self, id: MarkerId) -> Option<&MarkerSpawn> {
        self.live
            .iter()
            .find(|(live, _)| *live == id)
            .map(|(_, spawn)| spawn)
    }

    /// Samples the pulse of every live marker at `elapsed` seconds.
    pub fn frame(&self, elapsed: f32) -> Vec<(MarkerId, MarkerVisual)> {
        self.live
            .iter()
            .map(|(id, spawn)| {
                let pulse = MarkerPulse::from_style(&self.style, spawn.phase_delay);
                (*id, pulse.sample(elapsed))
            })
            .collect()
    }
}

impl MarkerRenderer for HeadlessRenderer {
    type Handle = MarkerId;

    fn instantiate_marker(&mut self, spawn: &MarkerSpawn) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.created += 1;
        self.live.push((id, *spawn));
        id
    }

    fn destroy_marker(&mut self, handle: MarkerId) {
        if let Some(index) = self.live.iter().position(|(id, _)| *id == handle) {
            self.live.remove(index);
            self.destroyed += 1;
        } else {
            tracing::warn!(?handle, "destroying unknown marker");
        }
    }
}

use crate::{MarkerRenderer, MarkerSpawn, Result, Vec3, WayfinderError};

/// A materialized marker: where it stands and the renderer object backing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker<H> {
    pub position: Vec3,
    pub handle: H,
}

/// Ordered set of markers currently present in the world.
///
/// The stream decides when markers are created and destroyed; the renderer it
/// owns holds the actual objects. Positions and handles are stored as pairs,
/// so they can never drift apart.
#[derive(Debug)]
pub struct MarkerStream<R: MarkerRenderer> {
    renderer: R,
    markers: Vec<Marker<R::Handle>>,
    wave_delay_step: f32,
}

impl<R: MarkerRenderer> MarkerStream<R> {
    /// Creates an empty stream. Each new marker's pulse lags the previous one
    /// by `wave_delay_step` seconds.
    pub fn new(renderer: R, wave_delay_step: f32) -> Self {
        Self {
            renderer,
            markers: Vec::new(),
            wave_delay_step,
        }
    }

    /// Puts a marker at `position` and returns its index.
    pub fn materialize(&mut self, position: Vec3) -> usize {
        let ordinal = self.markers.len();
        let spawn = MarkerSpawn {
            position,
            ordinal,
            phase_delay: self.wave_delay_step * ordinal as f32,
        };
        let handle = self.renderer.instantiate_marker(&spawn);
        tracing::debug!(ordinal, ?position, "materialized marker");
        self.markers.push(Marker { position, handle });
        ordinal
    }

    /// Removes the marker at `index` and every marker placed after it. Indices
    /// at or past the end leave the stream untouched.
    pub fn dematerialize_from(&mut self, index: usize) {
        if index >= self.markers.len() {
            return;
        }

        let removed = self.markers.len() - index;
        for marker in self.markers.drain(index..) {
            self.renderer.destroy_marker(marker.handle);
        }
        tracing::debug!(index, removed, "dematerialized markers");
    }

    pub fn dematerialize_all(&mut self) {
        self.dematerialize_from(0);
    }

    pub fn count(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn position_at(&self, index: usize) -> Result<Vec3> {
        self.markers
            .get(index)
            .map(|marker| marker.position)
            .ok_or(WayfinderError::IndexOutOfRange {
                index,
                len: self.markers.len(),
            })
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.markers.iter().map(|marker| marker.position)
    }

    pub fn markers(&self) -> &[Marker<R::Handle>] {
        &self.markers
    }

    /// Stream index of the marker backed by `handle`.
    pub fn index_of(&self, handle: &R::Handle) -> Option<usize> {
        self.markers.iter().position(|marker| &marker.handle == handle)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

//! Authoring and indication workflows.
//!
//! A [`NavigationSession`] is either idle, recording a path from the user's
//! marker placements, or streaming a recorded path back as markers while the
//! user walks it. Waypoints are only materialized once the viewpoint comes
//! within the loading distance, so the number of live markers stays bounded
//! by what is near the user.

use crate::{
    input::{Gesture, PlacementController, PlacementOutcome, SpatialProbe},
    InputFrame, MapRegistry, MarkerRenderer, MarkerStream, PathId, Result, WayfinderConfig,
    WayfinderError,
};

/// Current workflow of a [`NavigationSession`]. The active path only exists
/// outside `Idle`, and the indication cursor only exists while indicating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Idle,
    Authoring { path: PathId },
    Indicating { path: PathId, next_waypoint: usize },
}

impl SessionMode {
    fn label(&self) -> &'static str {
        match self {
            SessionMode::Idle => "idle",
            SessionMode::Authoring { .. } => "authoring",
            SessionMode::Indicating { .. } => "indicating",
        }
    }
}

/// Summary of what one [`NavigationSession::tick`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub materialized: usize,
    pub dematerialized: usize,
    pub gesture: Option<Gesture>,
}

/// State machine coordinating the marker stream with the path data in a
/// [`MapRegistry`].
///
/// The session refers to its active path by [`PathId`] and resolves it through
/// the registry passed to each call, so it never holds on to map data.
#[derive(Debug)]
pub struct NavigationSession<R: MarkerRenderer> {
    mode: SessionMode,
    stream: MarkerStream<R>,
    placement: PlacementController,
    loading_distance: f32,
}

impl<R: MarkerRenderer> NavigationSession<R> {
    pub fn new(renderer: R, config: &WayfinderConfig) -> Self {
        Self {
            mode: SessionMode::Idle,
            stream: MarkerStream::new(renderer, config.marker.wave_delay_step),
            placement: PlacementController::new(&config.input),
            loading_distance: config.navigation.loading_distance,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode == SessionMode::Idle
    }

    pub fn active_path(&self) -> Option<PathId> {
        match self.mode {
            SessionMode::Idle => None,
            SessionMode::Authoring { path } | SessionMode::Indicating { path, .. } => Some(path),
        }
    }

    /// Index of the next waypoint waiting to be materialized; zero unless
    /// indicating.
    pub fn next_waypoint_index(&self) -> usize {
        match self.mode {
            SessionMode::Indicating { next_waypoint, .. } => next_waypoint,
            SessionMode::Idle | SessionMode::Authoring { .. } => 0,
        }
    }

    pub fn loading_distance(&self) -> f32 {
        self.loading_distance
    }

    pub fn placement_enabled(&self) -> bool {
        self.placement.is_enabled()
    }

    pub fn markers(&self) -> &MarkerStream<R> {
        &self.stream
    }

    pub fn markers_mut(&mut self) -> &mut MarkerStream<R> {
        &mut self.stream
    }

    /// Starts recording markers for `path`. Existing waypoints are kept until
    /// the recording is committed.
    pub fn begin_authoring(&mut self, registry: &MapRegistry, path: PathId) -> Result<()> {
        self.ensure_idle("begin authoring")?;
        resolve(registry, path)?;

        self.stream.dematerialize_all();
        self.placement.enable();
        self.mode = SessionMode::Authoring { path };
        tracing::debug!(%path, "began authoring");
        Ok(())
    }

    /// Replaces the active path's waypoints with the recorded marker positions
    /// and returns to idle.
    pub fn commit_authoring(&mut self, registry: &mut MapRegistry) -> Result<()> {
        let SessionMode::Authoring { path: id } = self.mode else {
            return Err(self.wrong_mode("commit authoring"));
        };
        let path = registry.path_mut(id).ok_or_else(|| {
            WayfinderError::invalid_argument(format!("{id} no longer exists; discard instead"))
        })?;

        path.clear_waypoints();
        for position in self.stream.positions() {
            path.append_waypoint(position);
        }
        tracing::debug!(%id, waypoints = path.waypoint_count(), "committed path");

        self.finish_authoring();
        Ok(())
    }

    /// Drops the recorded markers and returns to idle without touching the
    /// path. Does nothing unless authoring.
    pub fn discard_authoring(&mut self) {
        if let SessionMode::Authoring { path } = self.mode {
            tracing::debug!(%path, "discarded authoring");
            self.finish_authoring();
        }
    }

    /// Removes every recorded marker but stays in authoring mode.
    pub fn clear_markers(&mut self) -> Result<()> {
        if !matches!(self.mode, SessionMode::Authoring { .. }) {
            return Err(self.wrong_mode("clear markers"));
        }
        self.stream.dematerialize_all();
        Ok(())
    }

    /// Starts streaming the waypoints of `path` as the viewpoint approaches
    /// them.
    pub fn begin_indicating(&mut self, registry: &MapRegistry, path: PathId) -> Result<()> {
        self.ensure_idle("begin indicating")?;
        resolve(registry, path)?;

        self.stream.dematerialize_all();
        self.mode = SessionMode::Indicating {
            path,
            next_waypoint: 0,
        };
        tracing::debug!(%path, "began indicating");
        Ok(())
    }

    /// Removes every indication marker and returns to idle. Does nothing
    /// unless indicating.
    pub fn end_indicating(&mut self) {
        if let SessionMode::Indicating { path, .. } = self.mode {
            self.stream.dematerialize_all();
            self.mode = SessionMode::Idle;
            tracing::debug!(%path, "ended indicating");
        }
    }

    /// Runs one update cycle: routes touches to marker placement while
    /// authoring, or streams nearby waypoints while indicating.
    pub fn tick<P>(
        &mut self,
        registry: &MapRegistry,
        frame: &InputFrame,
        probe: &mut P,
    ) -> TickReport
    where
        P: SpatialProbe<R::Handle>,
    {
        match self.mode {
            SessionMode::Idle => TickReport::default(),
            SessionMode::Authoring { .. } => {
                let mut report = TickReport::default();
                if let Some((gesture, outcome)) =
                    self.placement.process(frame, &mut self.stream, probe)
                {
                    report.gesture = Some(gesture);
                    match outcome {
                        PlacementOutcome::Placed { .. } => report.materialized = 1,
                        PlacementOutcome::Erased { removed, .. } => {
                            report.dematerialized = removed
                        }
                        PlacementOutcome::Ignored => {}
                    }
                }
                report
            }
            SessionMode::Indicating { .. } => TickReport {
                materialized: self.stream_waypoints(registry, frame),
                ..TickReport::default()
            },
        }
    }

    /// Materializes every consecutive pending waypoint closer than the loading
    /// distance to the viewpoint, stopping at the first one still out of
    /// reach. Returns how many were materialized.
    fn stream_waypoints(&mut self, registry: &MapRegistry, frame: &InputFrame) -> usize {
        let SessionMode::Indicating {
            path: id,
            next_waypoint,
        } = self.mode
        else {
            return 0;
        };
        let Some(path) = registry.path(id) else {
            tracing::warn!(%id, "indicated path disappeared; nothing to stream");
            return 0;
        };

        let mut cursor = next_waypoint;
        while let Some(&waypoint) = path.waypoints().get(cursor) {
            // NaN distances from lost tracking must stop the stream too.
            if !(frame.viewpoint.distance(waypoint) < self.loading_distance) {
                break;
            }
            self.stream.materialize(waypoint);
            cursor += 1;
        }

        self.mode = SessionMode::Indicating {
            path: id,
            next_waypoint: cursor,
        };
        cursor - next_waypoint
    }

    fn finish_authoring(&mut self) {
        self.placement.disable();
        self.stream.dematerialize_all();
        self.mode = SessionMode::Idle;
    }

    fn ensure_idle(&self, action: &str) -> Result<()> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(self.wrong_mode(action))
        }
    }

    fn wrong_mode(&self, action: &str) -> WayfinderError {
        WayfinderError::invalid_state(format!(
            "cannot {action} while {}",
            self.mode.label()
        ))
    }
}

fn resolve(registry: &MapRegistry, path: PathId) -> Result<()> {
    match registry.path(path) {
        Some(_) => Ok(()),
        None => Err(WayfinderError::invalid_argument(format!(
            "{path} does not exist in any map"
        ))),
    }
}

//! Touch input while authoring a path.
//!
//! Raw presses are buffered by [`TouchCoalescer`] until the configured latency
//! has passed without a new press, then released as a single [`Gesture`]
//! carrying the number of fingers seen. [`PlacementController`] turns gestures
//! into marker placement (one finger) or erasure (two fingers).

use serde::{Deserialize, Serialize};

use crate::{InputConfig, MarkerRenderer, MarkerStream, Vec2, Vec3};

/// A primary touch that began on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPress {
    /// Host clock in seconds.
    pub time: f32,
    pub position: Vec2,
}

/// Everything the host reports for one update tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    pub time: f32,
    pub viewpoint: Vec3,
    pub touches: Vec<TouchPress>,
}

impl InputFrame {
    pub fn new(time: f32, viewpoint: Vec3) -> Self {
        Self {
            time,
            viewpoint,
            touches: Vec::new(),
        }
    }

    pub fn with_touch(mut self, position: Vec2) -> Self {
        self.touches.push(TouchPress {
            time: self.time,
            position,
        });
        self
    }
}

/// Coalesced touch: how many fingers landed within the latency window and
/// where the last one did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gesture {
    pub fingers: u32,
    pub position: Vec2,
}

/// Buffered accumulator that merges presses arriving in quick succession.
#[derive(Debug, Clone)]
pub struct TouchCoalescer {
    latency: f32,
    pending: u32,
    last_time: f32,
    last_position: Vec2,
}

impl TouchCoalescer {
    pub fn new(latency: f32) -> Self {
        Self {
            latency,
            pending: 0,
            last_time: 0.0,
            last_position: Vec2::default(),
        }
    }

    /// Records a press. Every press restarts the latency window.
    pub fn press(&mut self, touch: TouchPress) {
        self.pending += 1;
        self.last_time = touch.time;
        self.last_position = touch.position;
    }

    /// Releases the buffered gesture once `now` is past the latency window.
    pub fn poll(&mut self, now: f32) -> Option<Gesture> {
        if self.pending == 0 || now - self.last_time <= self.latency {
            return None;
        }

        let gesture = Gesture {
            fingers: self.pending,
            position: self.last_position,
        };
        self.pending = 0;
        Some(gesture)
    }

    pub fn reset(&mut self) {
        self.pending = 0;
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }
}

/// Queries against the tracked physical environment.
pub trait SpatialProbe<H> {
    /// World position where a ray through `screen` meets a detected surface.
    fn raycast_surface(&mut self, screen: Vec2) -> Option<Vec3>;

    /// Marker hit by a ray through `screen` within `max_distance`.
    fn pick_marker(&mut self, screen: Vec2, max_distance: f32) -> Option<H>;

    /// Short vibration confirming an erase.
    fn haptic_pulse(&mut self) {}
}

/// What a gesture did to the marker stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlacementOutcome {
    Placed { index: usize },
    Erased { from: usize, removed: usize },
    /// Nothing was hit or the finger count has no meaning.
    Ignored,
}

/// Turns authoring gestures into marker stream edits. Disabled outside
/// authoring mode.
#[derive(Debug, Clone)]
pub struct PlacementController {
    enabled: bool,
    coalescer: TouchCoalescer,
    max_interaction_distance: f32,
}

impl PlacementController {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            enabled: false,
            coalescer: TouchCoalescer::new(config.touch_latency),
            max_interaction_distance: config.max_interaction_distance,
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.coalescer.reset();
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.coalescer.reset();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Feeds the frame's presses and applies a gesture if one is ready.
    pub fn process<R, P>(
        &mut self,
        frame: &InputFrame,
        stream: &mut MarkerStream<R>,
        probe: &mut P,
    ) -> Option<(Gesture, PlacementOutcome)>
    where
        R: MarkerRenderer,
        P: SpatialProbe<R::Handle>,
    {
        if !self.enabled {
            return None;
        }

        for touch in &frame.touches {
            self.coalescer.press(*touch);
        }
        let gesture = self.coalescer.poll(frame.time)?;
        let outcome = self.apply(gesture, stream, probe);
        tracing::debug!(fingers = gesture.fingers, ?outcome, "handled gesture");
        Some((gesture, outcome))
    }

    fn apply<R, P>(
        &self,
        gesture: Gesture,
        stream: &mut MarkerStream<R>,
        probe: &mut P,
    ) -> PlacementOutcome
    where
        R: MarkerRenderer,
        P: SpatialProbe<R::Handle>,
    {
        match gesture.fingers {
            1 => match probe.raycast_surface(gesture.position) {
                Some(hit) => PlacementOutcome::Placed {
                    index: stream.materialize(hit),
                },
                None => PlacementOutcome::Ignored,
            },
            2 => {
                let index = probe
                    .pick_marker(gesture.position, self.max_interaction_distance)
                    .and_then(|handle| stream.index_of(&handle));
                match index {
                    Some(from) => {
                        let removed = stream.count() - from;
                        stream.dematerialize_from(from);
                        probe.haptic_pulse();
                        PlacementOutcome::Erased { from, removed }
                    }
                    None => PlacementOutcome::Ignored,
                }
            }
            _ => PlacementOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HeadlessRenderer, MarkerId};

    /// Screen x maps straight onto the floor at world x; screen y < 0 misses.
    #[derive(Default)]
    struct FlatFloor {
        pulses: usize,
        pick: Option<MarkerId>,
    }

    impl SpatialProbe<MarkerId> for FlatFloor {
        fn raycast_surface(&mut self, screen: Vec2) -> Option<Vec3> {
            (screen.y >= 0.0).then(|| Vec3::new(screen.x, 0.0, 0.0))
        }

        fn pick_marker(&mut self, _screen: Vec2, _max_distance: f32) -> Option<MarkerId> {
            self.pick
        }

        fn haptic_pulse(&mut self) {
            self.pulses += 1;
        }
    }

    fn press(time: f32, x: f32) -> TouchPress {
        TouchPress {
            time,
            position: Vec2::new(x, 0.0),
        }
    }

    #[test]
    fn waits_for_the_latency_window() {
        let mut coalescer = TouchCoalescer::new(0.05);
        coalescer.press(press(1.0, 3.0));

        assert_eq!(coalescer.poll(1.02), None);
        let gesture = coalescer.poll(1.1).unwrap();
        assert_eq!(gesture.fingers, 1);
        assert_eq!(gesture.position, Vec2::new(3.0, 0.0));
        assert_eq!(coalescer.poll(1.2), None);
    }

    #[test]
    fn merges_presses_and_restarts_the_window() {
        let mut coalescer = TouchCoalescer::new(0.05);
        coalescer.press(press(1.0, 1.0));
        coalescer.press(press(1.04, 2.0));

        assert_eq!(coalescer.poll(1.07), None);
        let gesture = coalescer.poll(1.1).unwrap();
        assert_eq!(gesture.fingers, 2);
        assert_eq!(gesture.position, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn reset_drops_pending_presses() {
        let mut coalescer = TouchCoalescer::new(0.05);
        coalescer.press(press(0.0, 0.0));
        coalescer.reset();
        assert_eq!(coalescer.pending(), 0);
        assert_eq!(coalescer.poll(5.0), None);
    }

    fn controller() -> PlacementController {
        let mut controller = PlacementController::new(&InputConfig::default());
        controller.enable();
        controller
    }

    #[test]
    fn disabled_controller_ignores_touches() {
        let mut controller = PlacementController::new(&InputConfig::default());
        let mut stream = MarkerStream::new(HeadlessRenderer::default(), 0.2);
        let mut probe = FlatFloor::default();

        let frame = InputFrame::new(0.0, Vec3::ZERO).with_touch(Vec2::new(1.0, 0.0));
        assert!(controller.process(&frame, &mut stream, &mut probe).is_none());
        assert!(controller
            .process(&InputFrame::new(1.0, Vec3::ZERO), &mut stream, &mut probe)
            .is_none());
        assert_eq!(stream.count(), 0);
    }

    #[test]
    fn single_tap_places_a_marker_on_the_surface() {
        let mut controller = controller();
        let mut stream = MarkerStream::new(HeadlessRenderer::default(), 0.2);
        let mut probe = FlatFloor::default();

        let tap = InputFrame::new(0.0, Vec3::ZERO).with_touch(Vec2::new(4.0, 0.0));
        assert!(controller.process(&tap, &mut stream, &mut probe).is_none());

        let (gesture, outcome) = controller
            .process(&InputFrame::new(0.1, Vec3::ZERO), &mut stream, &mut probe)
            .unwrap();
        assert_eq!(gesture.fingers, 1);
        assert_eq!(outcome, PlacementOutcome::Placed { index: 0 });
        assert_eq!(stream.position_at(0).unwrap(), Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn tap_that_misses_the_surface_is_ignored() {
        let mut controller = controller();
        let mut stream = MarkerStream::new(HeadlessRenderer::default(), 0.2);
        let mut probe = FlatFloor::default();

        let tap = InputFrame::new(0.0, Vec3::ZERO).with_touch(Vec2::new(4.0, -1.0));
        controller.process(&tap, &mut stream, &mut probe);
        let (_, outcome) = controller
            .process(&InputFrame::new(0.1, Vec3::ZERO), &mut stream, &mut probe)
            .unwrap();
        assert_eq!(outcome, PlacementOutcome::Ignored);
        assert_eq!(stream.count(), 0);
    }

    #[test]
    fn two_finger_tap_erases_from_the_picked_marker() {
        let mut controller = controller();
        let mut stream = MarkerStream::new(HeadlessRenderer::default(), 0.2);
        for x in 0..4 {
            stream.materialize(Vec3::new(x as f32, 0.0, 0.0));
        }
        let mut probe = FlatFloor {
            pick: Some(stream.markers()[1].handle),
            ..FlatFloor::default()
        };

        let frame = InputFrame::new(0.0, Vec3::ZERO)
            .with_touch(Vec2::new(1.0, 0.0))
            .with_touch(Vec2::new(1.0, 0.0));
        controller.process(&frame, &mut stream, &mut probe);
        let (gesture, outcome) = controller
            .process(&InputFrame::new(0.1, Vec3::ZERO), &mut stream, &mut probe)
            .unwrap();

        assert_eq!(gesture.fingers, 2);
        assert_eq!(outcome, PlacementOutcome::Erased { from: 1, removed: 3 });
        assert_eq!(stream.count(), 1);
        assert_eq!(probe.pulses, 1);
    }

    #[test]
    fn three_fingers_do_nothing() {
        let mut controller = controller();
        let mut stream = MarkerStream::new(HeadlessRenderer::default(), 0.2);
        let mut probe = FlatFloor::default();

        let mut frame = InputFrame::new(0.0, Vec3::ZERO);
        for _ in 0..3 {
            frame = frame.with_touch(Vec2::new(1.0, 0.0));
        }
        controller.process(&frame, &mut stream, &mut probe);
        let (gesture, outcome) = controller
            .process(&InputFrame::new(0.1, Vec3::ZERO), &mut stream, &mut probe)
            .unwrap();
        assert_eq!(gesture.fingers, 3);
        assert_eq!(outcome, PlacementOutcome::Ignored);
    }
}

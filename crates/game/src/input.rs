//! Input intent.
//!
//! Key and controller events arrive whenever the host delivers them and are
//! folded into state tables here. Once per frame the resolver turns that
//! state into a single [`MovementIntent`]: advance or not, and which way.

use std::collections::HashSet;

use glam::Quat;

use crate::config::InputConfig;
use crate::frame::PresentationMode;
use crate::gaze::{DwellGaze, GazeEvaluator, GazeMode};

/// Number of hand controllers tracked.
pub const CONTROLLER_COUNT: usize = 2;

/// Which input drove this frame's intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentSource {
    Keyboard,
    Controller,
    Gaze,
}

/// Movement intent for a single frame. Never stored across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementIntent {
    /// Forward movement requested.
    pub advance: bool,

    /// Head orientation to steer by.
    pub heading: Quat,

    /// Input that produced this intent.
    pub source: IntentSource,
}

/// Pressed keys, by key code.
#[derive(Debug, Clone, Default)]
pub struct KeyStates {
    pressed: HashSet<String>,
}

impl KeyStates {
    pub fn set(&mut self, code: &str, pressed: bool) {
        if pressed {
            self.pressed.insert(code.to_string());
        } else {
            self.pressed.remove(code);
        }
    }

    pub fn is_pressed(&self, code: &str) -> bool {
        self.pressed.contains(code)
    }

    /// Check if any of the given keys is held.
    pub fn any_pressed(&self, codes: &[String]) -> bool {
        codes.iter().any(|c| self.is_pressed(c))
    }
}

/// Hand controller event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEventKind {
    Connected,
    Disconnected,
    SelectStart,
    SelectEnd,
}

/// An event from one of the hand controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerEvent {
    /// Controller index (0 or 1).
    pub index: usize,
    pub kind: ControllerEventKind,
}

impl ControllerEvent {
    pub fn new(index: usize, kind: ControllerEventKind) -> Self {
        Self { index, kind }
    }
}

/// Connection and trigger state of both hand controllers.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    connected: [bool; CONTROLLER_COUNT],
    select: [bool; CONTROLLER_COUNT],
    ever_connected: bool,
}

impl ControllerState {
    /// Apply one event. Events for unknown indices are ignored.
    pub fn handle(&mut self, event: ControllerEvent) {
        if event.index >= CONTROLLER_COUNT {
            log::debug!("ignoring event for controller {}", event.index);
            return;
        }

        let i = event.index;
        match event.kind {
            ControllerEventKind::Connected => {
                self.connected[i] = true;
                self.ever_connected = true;
            }
            ControllerEventKind::Disconnected => {
                self.connected[i] = false;
                self.select[i] = false;
            }
            ControllerEventKind::SelectStart => self.select[i] = true,
            ControllerEventKind::SelectEnd => self.select[i] = false,
        }
    }

    /// Either trigger held.
    pub fn select_pressed(&self) -> bool {
        self.select.iter().any(|&s| s)
    }

    pub fn is_connected(&self, index: usize) -> bool {
        self.connected.get(index).copied().unwrap_or(false)
    }

    /// A controller has connected at some point this session.
    pub fn ever_connected(&self) -> bool {
        self.ever_connected
    }
}

/// Resolves keyboard, controller and gaze input into one intent per frame.
///
/// Windowed sessions read the keyboard. Immersive sessions read the
/// controller triggers, plus gaze dwell once the controller timeout has run
/// out with no controller ever connecting. The timeout restarts with every
/// immersive session. Gaze stays enabled once it has been turned on.
#[derive(Debug)]
pub struct IntentResolver {
    config: InputConfig,
    keys: KeyStates,
    controllers: ControllerState,
    gaze: Box<dyn GazeEvaluator>,
    gaze_enabled: bool,

    /// The previous frame was immersive.
    in_session: bool,

    /// Seconds since the current immersive session started.
    session_time: f32,
}

impl IntentResolver {
    /// Create a resolver with the default dwell gaze evaluator.
    pub fn new(config: InputConfig) -> Self {
        let gaze = DwellGaze::new(config.dwell_time, config.dwell_tolerance);
        Self::with_gaze(config, Box::new(gaze))
    }

    /// Create a resolver with a custom gaze evaluator.
    pub fn with_gaze(config: InputConfig, gaze: Box<dyn GazeEvaluator>) -> Self {
        Self {
            config,
            keys: KeyStates::default(),
            controllers: ControllerState::default(),
            gaze,
            gaze_enabled: false,
            in_session: false,
            session_time: 0.0,
        }
    }

    pub fn key_down(&mut self, code: &str) {
        self.keys.set(code, true);
    }

    pub fn key_up(&mut self, code: &str) {
        self.keys.set(code, false);
    }

    pub fn controller_event(&mut self, event: ControllerEvent) {
        self.controllers.handle(event);
    }

    pub fn keys(&self) -> &KeyStates {
        &self.keys
    }

    pub fn controllers(&self) -> &ControllerState {
        &self.controllers
    }

    /// Gaze dwell has taken over from the missing controllers.
    pub fn gaze_enabled(&self) -> bool {
        self.gaze_enabled
    }

    /// Resolve this frame's intent.
    ///
    /// # Arguments
    ///
    /// * `mode` - Current presentation mode
    /// * `heading` - World orientation of the head
    /// * `delta_time` - Seconds since the last frame, unclamped
    pub fn resolve(
        &mut self,
        mode: PresentationMode,
        heading: Quat,
        delta_time: f32,
    ) -> MovementIntent {
        match mode {
            PresentationMode::Windowed => {
                self.in_session = false;
                MovementIntent {
                    advance: self.keys.any_pressed(&self.config.forward_keys),
                    heading,
                    source: IntentSource::Keyboard,
                }
            }
            PresentationMode::Immersive => self.resolve_immersive(heading, delta_time),
        }
    }

    fn resolve_immersive(&mut self, heading: Quat, delta_time: f32) -> MovementIntent {
        if self.in_session {
            self.update_controller_timeout(delta_time);
        } else {
            // The first frame of a session: its delta was spent windowed
            self.in_session = true;
            self.session_time = 0.0;
        }

        let gaze_move =
            self.gaze_enabled && self.gaze.evaluate(heading, delta_time) == GazeMode::Move;
        let trigger = self.controllers.select_pressed();

        let source = if trigger || !self.gaze_enabled {
            IntentSource::Controller
        } else {
            IntentSource::Gaze
        };

        MovementIntent {
            advance: trigger || gaze_move,
            heading,
            source,
        }
    }

    fn update_controller_timeout(&mut self, delta_time: f32) {
        if self.gaze_enabled || self.controllers.ever_connected() {
            return;
        }

        self.session_time += delta_time;
        if self.session_time >= self.config.controller_timeout {
            log::info!(
                "No controller after {:.1}s, enabling gaze dwell",
                self.session_time
            );
            self.gaze_enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Gaze evaluator that always reports the same mode.
    #[derive(Debug)]
    struct FixedGaze(GazeMode);

    impl GazeEvaluator for FixedGaze {
        fn evaluate(&mut self, _look: Quat, _delta_time: f32) -> GazeMode {
            self.0
        }
    }

    fn resolver_with_gaze(mode: GazeMode) -> IntentResolver {
        IntentResolver::with_gaze(InputConfig::default(), Box::new(FixedGaze(mode)))
    }

    #[test]
    fn test_keyboard_drives_windowed() {
        let mut resolver = IntentResolver::new(InputConfig::default());

        let intent = resolver.resolve(PresentationMode::Windowed, Quat::IDENTITY, 0.016);
        assert!(!intent.advance);
        assert_eq!(intent.source, IntentSource::Keyboard);

        resolver.key_down("ArrowUp");
        assert!(resolver.resolve(PresentationMode::Windowed, Quat::IDENTITY, 0.016).advance);

        resolver.key_up("ArrowUp");
        resolver.key_down("KeyS");
        assert!(!resolver.resolve(PresentationMode::Windowed, Quat::IDENTITY, 0.016).advance);
    }

    #[test]
    fn test_keyboard_ignored_when_immersive() {
        let mut resolver = IntentResolver::new(InputConfig::default());
        resolver.key_down("KeyW");

        let intent = resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 0.016);
        assert!(!intent.advance);
    }

    #[test]
    fn test_either_trigger_advances() {
        let mut resolver = IntentResolver::new(InputConfig::default());
        resolver.controller_event(ControllerEvent::new(0, ControllerEventKind::Connected));
        resolver.controller_event(ControllerEvent::new(1, ControllerEventKind::Connected));

        resolver.controller_event(ControllerEvent::new(1, ControllerEventKind::SelectStart));
        let intent = resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 0.016);
        assert!(intent.advance);
        assert_eq!(intent.source, IntentSource::Controller);

        resolver.controller_event(ControllerEvent::new(1, ControllerEventKind::SelectEnd));
        assert!(!resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 0.016).advance);
    }

    #[test]
    fn test_disconnect_releases_trigger() {
        let mut state = ControllerState::default();
        state.handle(ControllerEvent::new(0, ControllerEventKind::Connected));
        state.handle(ControllerEvent::new(0, ControllerEventKind::SelectStart));
        assert!(state.select_pressed());

        state.handle(ControllerEvent::new(0, ControllerEventKind::Disconnected));
        assert!(!state.select_pressed());
        assert!(!state.is_connected(0));
        assert!(state.ever_connected());
    }

    #[test]
    fn test_unknown_controller_index_ignored() {
        let mut state = ControllerState::default();
        state.handle(ControllerEvent::new(5, ControllerEventKind::SelectStart));
        assert!(!state.select_pressed());
        assert!(!state.is_connected(5));
    }

    #[test]
    fn test_gaze_enabled_after_timeout() {
        let mut resolver = resolver_with_gaze(GazeMode::Move);

        // Session start
        resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 0.5);

        for _ in 0..3 {
            let intent = resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 0.5);
            assert!(!intent.advance);
        }
        assert!(!resolver.gaze_enabled());

        // 2.0 seconds reached
        let intent = resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 0.5);
        assert!(resolver.gaze_enabled());
        assert!(intent.advance);
        assert_eq!(intent.source, IntentSource::Gaze);
    }

    #[test]
    fn test_timeout_only_counts_immersive_time() {
        let mut resolver = resolver_with_gaze(GazeMode::Move);

        for _ in 0..10 {
            resolver.resolve(PresentationMode::Windowed, Quat::IDENTITY, 0.5);
        }
        assert!(!resolver.gaze_enabled());
    }

    #[test]
    fn test_timeout_restarts_with_each_session() {
        let mut resolver = resolver_with_gaze(GazeMode::Move);

        resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 0.0);
        for _ in 0..3 {
            resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 0.5);
        }
        resolver.resolve(PresentationMode::Windowed, Quat::IDENTITY, 10.0);

        // The long windowed frame lands on the first frame of the new session
        resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 10.0);
        resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 0.6);
        assert!(!resolver.gaze_enabled());

        resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 1.5);
        assert!(resolver.gaze_enabled());
    }

    #[test]
    fn test_early_controller_cancels_gaze() {
        let mut resolver = resolver_with_gaze(GazeMode::Move);
        resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 1.0);
        resolver.controller_event(ControllerEvent::new(0, ControllerEventKind::Connected));

        for _ in 0..10 {
            let intent = resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 1.0);
            assert!(!intent.advance);
        }
        assert!(!resolver.gaze_enabled());
    }

    #[test]
    fn test_gaze_idle_does_not_advance() {
        let mut resolver = resolver_with_gaze(GazeMode::Idle);
        resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 0.0);
        let intent = resolver.resolve(PresentationMode::Immersive, Quat::IDENTITY, 5.0);

        assert!(resolver.gaze_enabled());
        assert!(!intent.advance);
        assert_eq!(intent.source, IntentSource::Gaze);
    }
}

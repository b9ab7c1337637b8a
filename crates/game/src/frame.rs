//! The per-frame orchestrator.
//!
//! [`Walkthrough::tick`] runs once per display refresh and processes exactly
//! one logical frame:
//!
//! 1. Drain world updates that finished loading since the last frame
//! 2. Measure the frame delta
//! 3. Resolve the movement intent
//! 4. If advancing: run locomotion, then the proximity check
//! 5. Detect presentation mode transitions (and ask for a resize)
//! 6. Update frame stats and hand the frame to the render delegate
//!
//! Nothing in a tick can fail. Missing pieces (no proxy yet, no board yet,
//! no point-of-interest data yet) turn the dependent step into a no-op.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use glam::{Quat, Vec3};
use walkthrough_physics::{CollisionProxy, LocomotionController, LocomotionReport, Pose};

use crate::config::WalkthroughConfig;
use crate::gaze::GazeEvaluator;
use crate::input::{ControllerEvent, IntentResolver, MovementIntent};
use crate::overlay::{BoardChange, InfoBoard, OverlayState, ProximityTriggerManager};
use crate::poi::PoiRegistry;
use crate::scene::SceneIndex;

/// Whether frames go to a head-mounted display or a regular window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationMode {
    #[default]
    Windowed,
    Immersive,
}

impl PresentationMode {
    pub fn from_presenting(presenting: bool) -> Self {
        if presenting {
            Self::Immersive
        } else {
            Self::Windowed
        }
    }
}

/// Head pose relative to the dolly, as reported by tracking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl HeadPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

/// Per-frame input from the host.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Monotonic timestamp of this frame.
    pub now: Instant,

    /// An immersive session is currently presenting.
    pub presenting: bool,

    pub head: HeadPose,
}

/// What the render delegate gets to draw from.
#[derive(Debug)]
pub struct FrameView<'a> {
    pub mode: PresentationMode,
    pub pose: &'a Pose,
    pub head: HeadPose,

    /// The info board, if visible.
    pub board: Option<&'a InfoBoard>,

    pub stats: &'a FrameStats,
}

/// Host-side rendering.
pub trait RenderDelegate {
    /// The presentation mode changed; recompute projection and viewport.
    fn resize(&mut self, mode: PresentationMode);

    /// Draw the scene for this frame.
    fn render(&mut self, view: &FrameView<'_>);
}

/// Results of background loads, applied at the top of the next tick.
#[derive(Debug)]
pub enum WorldUpdate {
    Scene(SceneIndex),
    CollisionProxy(CollisionProxy),
    PointsOfInterest(PoiRegistry),

    /// The info board has been built.
    OverlayReady,

    /// An asset failed; the walkthrough continues without it.
    LoadFailed { asset: String, reason: String },
}

/// Frame timing statistics.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    pub frames: u64,
    pub last_delta: f32,

    /// Exponentially smoothed frames per second.
    pub fps: f32,
}

impl FrameStats {
    const SMOOTHING: f32 = 0.1;

    pub fn record(&mut self, delta_time: f32) {
        self.frames += 1;
        self.last_delta = delta_time;

        if delta_time > 0.0 {
            let instant = 1.0 / delta_time;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps + (instant - self.fps) * Self::SMOOTHING
            };
        }
    }
}

/// Monotonic frame clock.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    /// Seconds since the previous call; zero on the first call.
    pub fn delta(&mut self, now: Instant) -> f32 {
        let delta = self
            .last
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last = Some(now);
        delta
    }
}

/// What a single tick did.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub delta_time: f32,
    pub intent: MovementIntent,

    /// Present when the dolly was asked to move.
    pub locomotion: Option<LocomotionReport>,

    pub board: BoardChange,

    /// The presentation mode changed this frame.
    pub mode_changed: bool,
}

/// The walkthrough session: dolly, input, board and loaded world.
#[derive(Debug)]
pub struct Walkthrough {
    pose: Pose,
    locomotion: LocomotionController,
    proximity: ProximityTriggerManager,
    resolver: IntentResolver,
    overlay: OverlayState,

    proxy: Option<CollisionProxy>,
    scene: Option<SceneIndex>,
    pois: Option<PoiRegistry>,

    mode: PresentationMode,
    clock: FrameClock,
    stats: FrameStats,

    updates_tx: Sender<WorldUpdate>,
    updates_rx: Receiver<WorldUpdate>,
}

impl Walkthrough {
    /// Create a session with the default dwell gaze evaluator.
    pub fn new(config: WalkthroughConfig) -> Self {
        let resolver = IntentResolver::new(config.input.clone());
        Self::with_resolver(config, resolver)
    }

    /// Create a session with a custom gaze evaluator.
    pub fn with_gaze(config: WalkthroughConfig, gaze: Box<dyn GazeEvaluator>) -> Self {
        let resolver = IntentResolver::with_gaze(config.input.clone(), gaze);
        Self::with_resolver(config, resolver)
    }

    fn with_resolver(config: WalkthroughConfig, resolver: IntentResolver) -> Self {
        let (updates_tx, updates_rx) = mpsc::channel();
        Self {
            pose: Pose::new(config.scene.spawn_position),
            locomotion: LocomotionController::new(config.locomotion),
            proximity: ProximityTriggerManager::new(config.proximity),
            resolver,
            overlay: OverlayState::new(),
            proxy: None,
            scene: None,
            pois: None,
            mode: PresentationMode::Windowed,
            clock: FrameClock::default(),
            stats: FrameStats::default(),
            updates_tx,
            updates_rx,
        }
    }

    /// Sender for background loaders.
    pub fn updates(&self) -> Sender<WorldUpdate> {
        self.updates_tx.clone()
    }

    pub fn key_down(&mut self, code: &str) {
        self.resolver.key_down(code);
    }

    pub fn key_up(&mut self, code: &str) {
        self.resolver.key_up(code);
    }

    pub fn controller_event(&mut self, event: ControllerEvent) {
        self.resolver.controller_event(event);
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn resolver(&self) -> &IntentResolver {
        &self.resolver
    }

    /// Presentation mode as of the last tick.
    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// The collision proxy has arrived and the dolly can move.
    pub fn is_world_ready(&self) -> bool {
        self.proxy.is_some()
    }

    /// Apply every update that has arrived since the last call.
    pub fn apply_pending_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            self.apply(update);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, update: WorldUpdate) {
        match update {
            WorldUpdate::Scene(scene) => {
                log::info!("Scene index ready: {} nodes", scene.len());
                self.scene = Some(scene);
            }
            WorldUpdate::CollisionProxy(proxy) => {
                log::info!("Collision proxy ready: {} triangles", proxy.triangle_count());
                if !self.locomotion.ground_snap(&mut self.pose, &proxy) {
                    log::warn!("No floor below dolly at {:?}", self.pose.position);
                }
                self.proxy = Some(proxy);
            }
            WorldUpdate::PointsOfInterest(registry) => {
                log::info!("Loaded {} points of interest", registry.len());
                if let Some(scene) = &self.scene {
                    for poi in registry.iter().filter(|p| scene.position(&p.key).is_none()) {
                        log::warn!("Point of interest {} has no scene node", poi.key);
                    }
                }
                self.pois = Some(registry);
            }
            WorldUpdate::OverlayReady => self.overlay.construct_board(),
            WorldUpdate::LoadFailed { asset, reason } => {
                log::error!("Failed to load {asset}: {reason}; continuing without it");
            }
        }
    }

    /// Run one frame.
    pub fn tick<R: RenderDelegate + ?Sized>(
        &mut self,
        input: &FrameInput,
        renderer: &mut R,
    ) -> TickReport {
        self.apply_pending_updates();

        // Input timers run on real time; only movement is clamped
        let elapsed = self.clock.delta(input.now);
        let delta_time = elapsed.min(self.locomotion.config.max_delta_time);
        let mode = PresentationMode::from_presenting(input.presenting);

        let heading = self.pose.look_orientation(input.head.orientation);
        let intent = self.resolver.resolve(mode, heading, elapsed);

        let mut report = TickReport {
            delta_time,
            intent,
            locomotion: None,
            board: BoardChange::Unchanged,
            mode_changed: false,
        };

        if intent.advance {
            report.locomotion = Some(self.move_dolly(mode, heading, delta_time));
            let viewer = self.pose.to_world(input.head.position);
            report.board = self.update_board(viewer);
        }

        if mode != self.mode {
            log::info!("Presentation mode {:?} -> {:?}", self.mode, mode);
            renderer.resize(mode);
            self.mode = mode;
            report.mode_changed = true;
        }

        self.stats.record(delta_time);
        log::trace!(
            "frame {} dt={:.4} fps={:.1}",
            self.stats.frames,
            delta_time,
            self.stats.fps
        );

        renderer.render(&FrameView {
            mode,
            pose: &self.pose,
            head: input.head,
            board: self.overlay.visible_board(),
            stats: &self.stats,
        });

        report
    }

    fn move_dolly(&mut self, mode: PresentationMode, heading: Quat, delta_time: f32) -> LocomotionReport {
        let collide = match mode {
            PresentationMode::Immersive => true,
            PresentationMode::Windowed => self.locomotion.config.windowed_collision,
        };

        let report = if collide {
            self.locomotion
                .step(&mut self.pose, heading, self.proxy.as_ref(), delta_time)
        } else {
            self.locomotion.step_free(&mut self.pose, heading, delta_time)
        };

        if report.blocked {
            log::debug!("Blocked by wall at {:?}", self.pose.position);
        }

        report
    }

    fn update_board(&mut self, viewer: Vec3) -> BoardChange {
        let (Some(registry), Some(scene)) = (&self.pois, &self.scene) else {
            return BoardChange::Unchanged;
        };

        self.proximity.update(
            &mut self.overlay,
            registry,
            scene,
            self.pose.position,
            viewer,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

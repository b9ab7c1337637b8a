//! Walkthrough Game Logic
//!
//! This crate contains everything that runs around the physics each frame:
//!
//! - Input intent (keyboard, hand controllers, gaze dwell)
//! - Points of interest and the proximity-triggered info board
//! - Scene index and asset loaders
//! - The per-frame orchestrator
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Walkthrough::tick                      │
//! │  ┌─────────┐   ┌────────────┐   ┌───────────┐   ┌──────────┐  │
//! │  │ Intent  │──►│ Locomotion │──►│ Proximity │──►│ Render   │  │
//! │  │ Resolver│   │ (physics)  │   │ Triggers  │   │ Delegate │  │
//! │  └─────────┘   └────────────┘   └───────────┘   └──────────┘  │
//! │        ▲ pending world updates drained at the top of a tick   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod gaze;
pub mod input;
pub mod loader;
pub mod overlay;
pub mod poi;
pub mod scene;

// Re-export main types
pub use config::WalkthroughConfig;
pub use error::LoadError;
pub use frame::{
    FrameInput, FrameStats, FrameView, HeadPose, PresentationMode, RenderDelegate, TickReport,
    Walkthrough, WorldUpdate,
};
pub use input::{ControllerEvent, ControllerEventKind, IntentSource, MovementIntent};
pub use overlay::{BoardChange, InfoBoard};
pub use poi::{PoiContent, PoiRegistry};
pub use scene::SceneIndex;

// Re-export physics types for convenience
pub use walkthrough_physics::{CollisionProxy, LocomotionConfig, Pose, ProxyMesh};

//! Walkthrough Physics
//!
//! Collision queries and dolly locomotion for walking through a static,
//! pre-built environment. There is no dynamics here: no mass, no velocity,
//! no multi-body contact. A single point is swept against a static triangle
//! mesh and a corrected position comes back.
//!
//! # Architecture
//!
//! - **Collision**: wraps the invisible collision proxy mesh and answers
//!   nearest-hit ray queries
//! - **Locomotion**: uses four ray queries per frame to advance, clamp and
//!   ground the dolly

pub mod collision;
pub mod locomotion;

// Re-export commonly used types
pub use collision::{CollisionProxy, ProxyError, ProxyMesh, RayHit};
pub use locomotion::{LocomotionConfig, LocomotionController, LocomotionReport, Pose};

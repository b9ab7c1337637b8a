//! Collision query surface.
//!
//! The environment ships a triangle mesh that is never drawn (the collision
//! proxy). This module builds it and answers ray queries against it.
//!
//! # Key Types
//!
//! - [`ProxyMesh`]: accumulates triangles from one or more sources
//! - [`CollisionProxy`]: the immutable, queryable mesh
//! - [`RayHit`]: nearest intersection along a ray

mod hit;
mod proxy;

pub use hit::RayHit;
pub use proxy::{CollisionProxy, ProxyError, ProxyMesh};

//! The collision proxy: an invisible triangle mesh used only for queries.
//!
//! The proxy is built once when the environment finishes loading and is
//! immutable afterwards, so any number of queries per frame are safe and
//! deterministic.

use glam::{Mat4, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::Ray;
use parry3d::shape::SharedShape;

use super::hit::RayHit;

/// Rays are cast this far at most. Larger than any walkable environment.
const MAX_RAY_DISTANCE: Real = 1.0e6;

/// Error type for collision proxy construction.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("collision proxy has no triangles")]
    Empty,

    #[error("triangle {triangle} references vertex {index}, but the source has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("collision backend rejected the mesh: {0}")]
    Rejected(String),
}

/// Triangle soup accumulated from one or more mesh sources.
///
/// Sources are baked into world space as they are added, so the finished
/// proxy needs no transform of its own.
#[derive(Debug, Clone, Default)]
pub struct ProxyMesh {
    vertices: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
}

impl ProxyMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append indexed triangles, transforming their vertices to world space.
    ///
    /// # Arguments
    ///
    /// * `vertices` - Vertex positions in the source's local space
    /// * `indices` - Triangles indexing into `vertices`
    /// * `transform` - Local-to-world matrix of the source
    pub fn add_triangles(
        &mut self,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        transform: Mat4,
    ) -> Result<(), ProxyError> {
        for (triangle, tri) in indices.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(ProxyError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        let base = self.vertices.len() as u32;
        self.vertices
            .extend(vertices.iter().map(|&v| transform.transform_point3(v)));
        self.indices
            .extend(indices.iter().map(|t| [t[0] + base, t[1] + base, t[2] + base]));

        Ok(())
    }

    /// Append a quad given its four corners in winding order.
    pub fn add_quad(&mut self, corners: [Vec3; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices.push([base, base + 1, base + 2]);
        self.indices.push([base, base + 2, base + 3]);
    }

    /// Append the six faces of an axis-aligned box.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3) {
        let corner = |x: f32, y: f32, z: f32| center + half_extents * Vec3::new(x, y, z);

        // -Y, +Y
        self.add_quad([
            corner(-1.0, -1.0, -1.0),
            corner(1.0, -1.0, -1.0),
            corner(1.0, -1.0, 1.0),
            corner(-1.0, -1.0, 1.0),
        ]);
        self.add_quad([
            corner(-1.0, 1.0, -1.0),
            corner(-1.0, 1.0, 1.0),
            corner(1.0, 1.0, 1.0),
            corner(1.0, 1.0, -1.0),
        ]);
        // -X, +X
        self.add_quad([
            corner(-1.0, -1.0, -1.0),
            corner(-1.0, -1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
            corner(-1.0, 1.0, -1.0),
        ]);
        self.add_quad([
            corner(1.0, -1.0, -1.0),
            corner(1.0, 1.0, -1.0),
            corner(1.0, 1.0, 1.0),
            corner(1.0, -1.0, 1.0),
        ]);
        // -Z, +Z
        self.add_quad([
            corner(-1.0, -1.0, -1.0),
            corner(-1.0, 1.0, -1.0),
            corner(1.0, 1.0, -1.0),
            corner(1.0, -1.0, -1.0),
        ]);
        self.add_quad([
            corner(-1.0, -1.0, 1.0),
            corner(1.0, -1.0, 1.0),
            corner(1.0, 1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
        ]);
    }

    /// Number of triangles accumulated so far.
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Check if no triangles have been added.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Finish the mesh and build the queryable proxy.
    pub fn build(self) -> Result<CollisionProxy, ProxyError> {
        if self.is_empty() {
            return Err(ProxyError::Empty);
        }

        let triangle_count = self.indices.len();
        let points: Vec<Point<Real>> = self
            .vertices
            .iter()
            .map(|v| Point::new(v.x, v.y, v.z))
            .collect();

        let shape = SharedShape::trimesh(points, self.indices)
            .map_err(|err| ProxyError::Rejected(format!("{err:?}")))?;

        Ok(CollisionProxy {
            shape,
            transform: Isometry::identity(),
            triangle_count,
        })
    }
}

/// The static collision proxy.
///
/// Answers nearest-hit ray queries. Never rendered, never mutated after
/// construction.
#[derive(Clone)]
pub struct CollisionProxy {
    shape: SharedShape,
    transform: Isometry<Real>,
    triangle_count: usize,
}

impl std::fmt::Debug for CollisionProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionProxy")
            .field("triangle_count", &self.triangle_count)
            .finish_non_exhaustive()
    }
}

impl CollisionProxy {
    /// Number of triangles in the proxy.
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Cast a ray and return the nearest intersection, if any.
    ///
    /// Surfaces are hit from either side. A zero direction never hits.
    ///
    /// # Arguments
    ///
    /// * `origin` - Ray starting position
    /// * `direction` - Ray direction (will be normalized)
    pub fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let toi = self
            .shape
            .cast_ray(&self.transform, &ray, MAX_RAY_DISTANCE, false)?;

        Some(RayHit::along(origin, dir, toi))
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Asset loaders.
//!
//! Loads the environment model and point-of-interest data. Loads run on
//! worker threads and report back through the orchestrator's update
//! channel, so a frame never waits on disk.
//!
//! Naming conventions in the model:
//! - any mesh node whose name contains the proxy marker (default `PROXY`)
//!   is collision geometry; it is baked into the collision proxy and never
//!   drawn
//! - every other named node is recorded in the scene index

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use glam::{Mat4, Vec3};
use walkthrough_physics::{CollisionProxy, ProxyMesh};

use crate::config::SceneConfig;
use crate::error::LoadError;
use crate::frame::WorldUpdate;
use crate::poi::PoiRegistry;
use crate::scene::SceneIndex;

/// Everything extracted from the environment model.
#[derive(Debug)]
pub struct LoadedWorld {
    pub scene: SceneIndex,

    /// `None` if the model has no proxy mesh.
    pub proxy: Option<CollisionProxy>,
}

/// Load a glTF/GLB environment from disk.
pub fn load_world(path: impl AsRef<Path>, config: &SceneConfig) -> Result<LoadedWorld, LoadError> {
    let (document, buffers, _images) = gltf::import(path.as_ref())?;
    build_world(&document, &buffers, config)
}

/// Load a glTF/GLB environment from memory.
pub fn load_world_from_bytes(data: &[u8], config: &SceneConfig) -> Result<LoadedWorld, LoadError> {
    let (document, buffers, _images) = gltf::import_slice(data)?;
    build_world(&document, &buffers, config)
}

/// Proxy triangles gathered during traversal, with the node that owns them.
#[derive(Default)]
struct ProxyBuild {
    /// Index and name of the node the proxy was baked from.
    owner: Option<(usize, String)>,
    mesh: ProxyMesh,
}

fn build_world(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    config: &SceneConfig,
) -> Result<LoadedWorld, LoadError> {
    let mut scene = SceneIndex::new();
    let mut proxy = ProxyBuild::default();

    if let Some(root) = document.default_scene().or_else(|| document.scenes().next()) {
        for node in root.nodes() {
            process_node(&node, Mat4::IDENTITY, buffers, config, &mut scene, &mut proxy)?;
        }
    }

    let anchors = scene.apply_anchors(&config.anchors);

    let proxy = if proxy.mesh.is_empty() {
        log::warn!("No '{}' mesh in model, movement stays disabled", config.proxy_marker);
        None
    } else {
        Some(proxy.mesh.build()?)
    };

    log::info!(
        "Loaded world: {} scene nodes ({} anchors), {} proxy triangles",
        scene.len(),
        anchors,
        proxy.as_ref().map_or(0, CollisionProxy::triangle_count)
    );

    Ok(LoadedWorld { scene, proxy })
}

/// Process a glTF node and its children recursively.
fn process_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    config: &SceneConfig,
    scene: &mut SceneIndex,
    proxy: &mut ProxyBuild,
) -> Result<(), LoadError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    let mesh_name = node.mesh().and_then(|m| m.name());
    let name = node.name().or(mesh_name).unwrap_or("");

    if !name.is_empty() {
        scene.insert(name, world.transform_point3(Vec3::ZERO));
    }

    if let Some(mesh) = node.mesh() {
        let marker = config.proxy_marker.as_str();
        let is_proxy = [node.name(), mesh_name]
            .into_iter()
            .flatten()
            .any(|n| n.contains(marker));

        if is_proxy {
            if let Some((index, owner)) = &proxy.owner {
                if *index != node.index() {
                    log::warn!("Ignoring extra proxy mesh {name}, already using {owner}");
                }
            } else {
                proxy.owner = Some((node.index(), name.to_string()));
                add_proxy_mesh(&mesh, world, buffers, &mut proxy.mesh)?;
            }
        }
    }

    for child in node.children() {
        process_node(&child, world, buffers, config, scene, proxy)?;
    }

    Ok(())
}

/// Bake every triangle primitive of a mesh into the proxy.
fn add_proxy_mesh(
    mesh: &gltf::Mesh,
    world: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut ProxyMesh,
) -> Result<(), LoadError> {
    let name = mesh.name().unwrap_or("unnamed");

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!("Skipping non-triangle primitive in {name}");
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .ok_or_else(|| LoadError::MissingPositions(name.to_string()))?
            .map(Vec3::from)
            .collect();

        // Unindexed primitives are sequential triangles
        let indices: Vec<u32> = reader
            .read_indices()
            .map(|iter| iter.into_u32().collect())
            .unwrap_or_else(|| (0..positions.len() as u32).collect());

        let triangles: Vec<[u32; 3]> = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        out.add_triangles(&positions, &triangles, world)?;
    }

    Ok(())
}

/// Load the environment on a worker thread.
///
/// On success sends the scene index, the collision proxy (if any) and then
/// `OverlayReady`; on failure sends `LoadFailed`.
pub fn spawn_world_loader(
    path: PathBuf,
    config: SceneConfig,
    updates: Sender<WorldUpdate>,
) -> Result<JoinHandle<()>, LoadError> {
    let handle = std::thread::Builder::new()
        .name("world-loader".to_string())
        .spawn(move || {
            let messages = match load_world(&path, &config) {
                Ok(world) => {
                    let mut messages = vec![WorldUpdate::Scene(world.scene)];
                    if let Some(proxy) = world.proxy {
                        messages.push(WorldUpdate::CollisionProxy(proxy));
                    }
                    messages.push(WorldUpdate::OverlayReady);
                    messages
                }
                Err(err) => vec![WorldUpdate::LoadFailed {
                    asset: path.display().to_string(),
                    reason: err.to_string(),
                }],
            };
            deliver(&updates, messages);
        })?;

    Ok(handle)
}

/// Load point-of-interest data on a worker thread.
pub fn spawn_poi_loader(
    path: PathBuf,
    updates: Sender<WorldUpdate>,
) -> Result<JoinHandle<()>, LoadError> {
    let handle = std::thread::Builder::new()
        .name("poi-loader".to_string())
        .spawn(move || {
            let message = match PoiRegistry::load(&path) {
                Ok(registry) => WorldUpdate::PointsOfInterest(registry),
                Err(err) => WorldUpdate::LoadFailed {
                    asset: path.display().to_string(),
                    reason: err.to_string(),
                },
            };
            deliver(&updates, vec![message]);
        })?;

    Ok(handle)
}

fn deliver(updates: &Sender<WorldUpdate>, messages: Vec<WorldUpdate>) {
    for message in messages {
        if updates.send(message).is_err() {
            log::debug!("Walkthrough dropped before load finished");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    /// Two nodes share one floor quad (20x20 at local y = 0) whose mesh is
    /// named `Floor_PROXY`. The first sits under `Building` at world y = 2;
    /// the second reuses the node name `Walls` at y = 10.
    const CAMPUS_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0, 4] }],
        "nodes": [
            { "name": "Building", "translation": [0, 1, 0], "children": [1, 2, 3] },
            { "name": "Walls", "mesh": 0, "translation": [0, 1, 0] },
            { "name": "LobbyShop_Door__1_", "translation": [-4, 0, -7] },
            { "name": "LobbyShop_Door__2_", "translation": [-2, 0, -7] },
            { "name": "Walls", "mesh": 0, "translation": [0, 10, 0] }
        ],
        "meshes": [{
            "name": "Floor_PROXY",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }]
        }],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3",
                "min": [-10, 0, -10], "max": [10, 0, 10]
            },
            { "bufferView": 1, "componentType": 5123, "count": 6, "type": "SCALAR" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 48, "target": 34962 },
            { "buffer": 0, "byteOffset": 48, "byteLength": 12, "target": 34963 }
        ],
        "buffers": [{
            "byteLength": 60,
            "uri": "data:application/octet-stream;base64,AAAgwQAAAAAAACDBAAAgwQAAAAAAACBBAAAgQQAAAAAAACBBAAAgQQAAAAAAACDBAAABAAIAAAACAAMA"
        }]
    }"#;

    fn load_campus() -> LoadedWorld {
        load_world_from_bytes(CAMPUS_GLTF.as_bytes(), &SceneConfig::default()).unwrap()
    }

    #[test]
    fn test_proxy_found_by_mesh_name() {
        let world = load_campus();
        let proxy = world.proxy.expect("mesh named Floor_PROXY");

        // Only the first proxy node is baked
        assert_eq!(proxy.triangle_count(), 2);

        // Parent and child translations compose to y = 2
        let hit = proxy
            .raycast(Vec3::new(0.3, 20.0, 1.7), Vec3::NEG_Y)
            .expect("floor below");
        assert!((hit.point.y - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_scene_nodes_and_anchor_indexed() {
        let world = load_campus();
        let scene = &world.scene;

        assert_eq!(scene.position("Building"), Some(Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(scene.position("Walls"), Some(Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(
            scene.position("LobbyShop_Door__1_"),
            Some(Vec3::new(-4.0, 1.0, -7.0))
        );

        let anchor = scene.position("LobbyShop").expect("midpoint anchor");
        assert!(anchor.abs_diff_eq(Vec3::new(-3.0, 1.0, -7.0), 1e-6));
    }

    #[test]
    fn test_model_without_proxy_marker() {
        let config = SceneConfig {
            proxy_marker: "COLLIDER".to_string(),
            ..SceneConfig::default()
        };
        let world = load_world_from_bytes(CAMPUS_GLTF.as_bytes(), &config).unwrap();

        assert!(world.proxy.is_none());
        assert!(world.scene.position("Walls").is_some());
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let result = load_world("/nonexistent/college.glb", &SceneConfig::default());
        assert!(matches!(result, Err(LoadError::Gltf(_))));
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        let result = load_world_from_bytes(b"not a gltf file", &SceneConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_load_is_reported_on_channel() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_poi_loader(PathBuf::from("/nonexistent/college.json"), tx).unwrap();
        handle.join().unwrap();

        match rx.try_recv() {
            Ok(WorldUpdate::LoadFailed { asset, .. }) => {
                assert!(asset.ends_with("college.json"));
            }
            other => panic!("expected LoadFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_world_loader_reports_failure() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_world_loader(
            PathBuf::from("/nonexistent/college.glb"),
            SceneConfig::default(),
            tx,
        )
        .unwrap();
        handle.join().unwrap();

        assert!(matches!(rx.try_recv(), Ok(WorldUpdate::LoadFailed { .. })));
        assert!(rx.try_recv().is_err());
    }
}

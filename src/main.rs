//! Walkthrough - Main Entry Point
//!
//! Runs a scripted headless session: a few windowed frames driven by the
//! keyboard, then an immersive session driven by a hand controller while
//! the head turns. Frames are logged instead of drawn.
//!
//! Usage: `walkthrough [config.json]`. Without `model_path`/`poi_path` in the
//! config a small built-in room is used.

use std::time::{Duration, Instant};

use glam::{Quat, Vec3};
use walkthrough_game::config::AnchorRule;
use walkthrough_game::loader::{spawn_poi_loader, spawn_world_loader};
use walkthrough_game::{
    ControllerEvent, ControllerEventKind, FrameInput, FrameView, HeadPose, LoadError,
    PoiRegistry, PresentationMode, RenderDelegate, SceneIndex, Walkthrough, WalkthroughConfig,
    WorldUpdate,
};
use walkthrough_physics::ProxyMesh;

const FRAME_TIME: f32 = 1.0 / 60.0;

const DEMO_POIS: &str = r#"{
    "Lobby": { "name": "Lobby", "info": "Main entrance. Visitor desk on the left." },
    "LobbyShop": { "name": "Campus Shop", "info": "Books, stationery and college merchandise." },
    "Library": { "name": "Library", "info": "Open 8am to 10pm on weekdays." }
}"#;

/// Render delegate that logs what it would draw.
#[derive(Default)]
struct LoggingRenderer {
    last_board: Option<String>,
}

impl RenderDelegate for LoggingRenderer {
    fn resize(&mut self, mode: PresentationMode) {
        log::info!("Resize for {:?} presentation", mode);
    }

    fn render(&mut self, view: &FrameView<'_>) {
        let board = view.board.map(|b| b.title.clone());
        if board != self.last_board {
            match &board {
                Some(title) => log::info!("Board visible: {title}"),
                None => log::info!("Board gone"),
            }
            self.last_board = board;
        }

        if view.stats.frames % 30 == 0 {
            log::info!(
                "Frame {} ({:?}) dolly at {:.2?}, {:.0} fps",
                view.stats.frames,
                view.mode,
                view.pose.position,
                view.stats.fps
            );
        }
    }
}

/// A 40x40 room with a floor, four walls and a pillar.
fn demo_world(walkthrough: &Walkthrough, anchors: &[AnchorRule]) -> Result<(), LoadError> {
    let mut mesh = ProxyMesh::new();
    mesh.add_quad([
        Vec3::new(-20.0, 0.0, -20.0),
        Vec3::new(-20.0, 0.0, 20.0),
        Vec3::new(20.0, 0.0, 20.0),
        Vec3::new(20.0, 0.0, -20.0),
    ]);
    mesh.add_box(Vec3::new(0.0, 2.5, -20.5), Vec3::new(20.5, 2.5, 0.5));
    mesh.add_box(Vec3::new(0.0, 2.5, 20.5), Vec3::new(20.5, 2.5, 0.5));
    mesh.add_box(Vec3::new(20.5, 2.5, 0.0), Vec3::new(0.5, 2.5, 20.5));
    mesh.add_box(Vec3::new(-20.5, 2.5, 0.0), Vec3::new(0.5, 2.5, 20.5));
    mesh.add_box(Vec3::new(6.0, 2.5, -6.0), Vec3::new(1.0, 2.5, 1.0));
    let proxy = mesh.build()?;

    let mut scene = SceneIndex::new();
    scene.insert("Lobby", Vec3::new(0.0, 0.0, 2.0));
    scene.insert("LobbyShop_Door__1_", Vec3::new(-4.0, 0.0, -7.0));
    scene.insert("LobbyShop_Door__2_", Vec3::new(-2.0, 0.0, -7.0));
    scene.insert("Library", Vec3::new(12.0, 0.0, -15.0));
    scene.apply_anchors(anchors);

    let registry = PoiRegistry::from_json_str(DEMO_POIS)?;

    let updates = walkthrough.updates();
    for update in [
        WorldUpdate::Scene(scene),
        WorldUpdate::CollisionProxy(proxy),
        WorldUpdate::PointsOfInterest(registry),
        WorldUpdate::OverlayReady,
    ] {
        if updates.send(update).is_err() {
            break;
        }
    }

    Ok(())
}

fn main() -> Result<(), LoadError> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {path}");
            WalkthroughConfig::load(path)?
        }
        None => WalkthroughConfig::default(),
    };
    let head_offset = config.scene.head_offset;

    let mut walkthrough = Walkthrough::new(config.clone());
    let mut loaders = Vec::new();
    match (&config.model_path, &config.poi_path) {
        (Some(model), Some(pois)) => {
            loaders.push(spawn_world_loader(
                model.clone(),
                config.scene.clone(),
                walkthrough.updates(),
            )?);
            loaders.push(spawn_poi_loader(pois.clone(), walkthrough.updates())?);
        }
        _ => demo_world(&walkthrough, &config.scene.anchors)?,
    }

    // Let the loaders finish so the script below runs against a full world
    for loader in loaders {
        if loader.join().is_err() {
            log::error!("Loader thread panicked");
        }
    }

    let mut renderer = LoggingRenderer::default();
    let start = Instant::now();
    let mut frame = 0u32;
    let mut next_input = |presenting: bool, yaw: f32| {
        frame += 1;
        FrameInput {
            now: start + Duration::from_secs_f32(frame as f32 * FRAME_TIME),
            presenting,
            head: HeadPose::new(head_offset, Quat::from_rotation_y(yaw)),
        }
    };

    // Windowed: walk toward the lobby with the keyboard
    walkthrough.key_down("KeyW");
    for _ in 0..120 {
        walkthrough.tick(&next_input(false, 0.0), &mut renderer);
    }
    walkthrough.key_up("KeyW");

    // Immersive: hold the trigger and turn toward the shop doors
    walkthrough.controller_event(ControllerEvent::new(0, ControllerEventKind::Connected));
    walkthrough.controller_event(ControllerEvent::new(0, ControllerEventKind::SelectStart));
    for i in 0..240 {
        let yaw = (i as f32 / 240.0) * 0.6;
        let report = walkthrough.tick(&next_input(true, yaw), &mut renderer);
        if report.locomotion.is_some_and(|l| l.blocked) {
            log::info!("Blocked at frame {i}");
        }
    }
    walkthrough.controller_event(ControllerEvent::new(0, ControllerEventKind::SelectEnd));

    log::info!(
        "Session over after {} frames, dolly at {:?}",
        walkthrough.stats().frames,
        walkthrough.pose().position
    );

    Ok(())
}

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ar_scan::coordinator::FrameCoordinator;
use ar_scan::detection::{DetectorSelection, ObjectDetector};
use ar_scan::sim::{FixedDetector, SceneConfig, ScriptedSession};
use ar_scan::system::SharedState;
use ar_scan::viz::LogRenderer;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let scene = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading scene from {}", path);
            SceneConfig::from_yaml_file(&path)?
        }
        None => {
            info!("No scene given, running built-in demo scene");
            SceneConfig::demo()
        }
    };

    let on_device: Arc<dyn ObjectDetector> = Arc::new(FixedDetector::from_script(&scene.on_device));
    let cloud = scene
        .cloud
        .as_ref()
        .map(|script| Arc::new(FixedDetector::from_script(script)) as Arc<dyn ObjectDetector>);

    let shared = SharedState::new(DetectorSelection::new(on_device, cloud));
    let mut coordinator = FrameCoordinator::new(shared, scene.coordinator.clone());
    let controls = coordinator.controls();

    let num_frames = scene.frames.len();
    let scan_at_frames = scene.scan_at_frames.clone();
    let mut session = ScriptedSession::new(scene);
    let mut renderer = LogRenderer::new();

    for i in 0..num_frames as u64 {
        if scan_at_frames.contains(&i) && !controls.request_scan() {
            warn!("Frame {}: scan refused, inference still running", i);
        }

        let report = coordinator.process_frame(&mut session, &mut renderer);
        for notification in &report.notifications {
            info!("Frame {}: {}", report.frame, notification);
        }
        if report.anchors_created > 0 {
            for draw in renderer.last_batch() {
                info!("  {} {}", draw.anchor, draw.text);
            }
        }

        // Roughly 30 fps
        std::thread::sleep(std::time::Duration::from_millis(33));
    }

    // Deliver a result still running at the end of the script.
    coordinator.wait_for_inference();
    let report = coordinator.process_frame(&mut session, &mut renderer);
    for notification in &report.notifications {
        info!("Frame {}: {}", report.frame, notification);
    }

    info!(
        "Done! {} anchors: {:?}",
        controls.anchor_count(),
        renderer
            .last_batch()
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
    );
    coordinator.shutdown();

    Ok(())
}

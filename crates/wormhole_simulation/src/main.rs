//! Headless симуляция WORMHOLE
//!
//! Один круг по туннелю на 60Hz с автоприцелом по ближайшей цели впереди.
//! Usage: wormhole_simulation [settings.json]

use wormhole_simulation::{log_info, log_warning, JsonSettingsStore, MemorySettingsStore, Session, DEFAULT_SEED};

const FRAME_MS: f64 = 1000.0 / 60.0;
const FIRE_EVERY: usize = 20;

fn main() {
    let mut session = Session::new(DEFAULT_SEED);

    let settings = match std::env::args().nth(1) {
        Some(path) => session.start_from_store(&JsonSettingsStore::new(path)),
        None => session.start_from_store(&MemorySettingsStore::new()),
    };
    log_info(&format!("Starting WORMHOLE headless run: {:?}", settings));

    // Полный круг при текущей difficulty
    let loop_ms = 10_000.0 / (0.06 * settings.difficulty as f64);
    let frames = (loop_ms / FRAME_MS).ceil() as usize;

    let mut scene_events = 0usize;
    let mut audio_cues = 0usize;

    for frame in 0..frames {
        session.tick(frame as f64 * FRAME_MS);

        if frame % FIRE_EVERY == 0 {
            let pose = session.camera_pose();
            let forward = pose.forward();
            let aim = session
                .live_targets()
                .into_iter()
                .filter(|target| (target.position - pose.position).dot(forward) > 0.0)
                .min_by(|a, b| {
                    let da = a.position.distance_squared(pose.position);
                    let db = b.position.distance_squared(pose.position);
                    da.total_cmp(&db)
                });

            match aim {
                Some(target) => {
                    session.fire_at(target.position);
                }
                None => {
                    session.fire();
                }
            }
        }

        // Host обязан вычитывать события каждый кадр
        scene_events += session.drain_scene_events().len();
        audio_cues += session.drain_audio_cues().len();

        if frame % 600 == 0 {
            match serde_json::to_string(&session.hud()) {
                Ok(hud) => log_info(&format!(
                    "Frame {}: {} (scene events: {}, audio cues: {})",
                    frame, hud, scene_events, audio_cues
                )),
                Err(err) => log_warning(&format!("HUD serialization failed: {}", err)),
            }
        }
    }

    let hud = session.hud();
    log_info(&format!(
        "Run complete: score={} ammo={} targets left={} scene events={} audio cues={}",
        hud.score, hud.ammo, hud.live_targets, scene_events, audio_cues
    ));
    session.quit();
}

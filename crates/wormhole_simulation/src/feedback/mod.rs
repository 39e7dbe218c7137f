//! Feedback streams для внешних collaborators (scene graph + audio)
//!
//! Core только пишет события (fire-and-forget). Host вычитывает их через
//! `Session::drain_scene_events` / `Session::drain_audio_cues` и сам решает,
//! что делать с визуальными proxy и звуком.

use bevy::prelude::*;
use serde::Serialize;

use crate::targets::TargetId;

/// Sound cue played on the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CueKind {
    LaserFire,
    TargetDestroyed,
}

impl CueKind {
    /// Asset name the host plays
    pub fn name(&self) -> &'static str {
        match self {
            CueKind::LaserFire => "laser-01",
            CueKind::TargetDestroyed => "blarmp",
        }
    }
}

/// Event: play(name, volume)
#[derive(Event, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioCue {
    pub cue: CueKind,
    pub volume: f32,
}

impl AudioCue {
    pub fn new(cue: CueKind, volume: f32) -> Self {
        Self { cue, volume }
    }
}

/// Event: scene-graph mutation request (add/remove visual proxies)
///
/// Projectile proxies адресуются по Entity (opaque id для рендера),
/// target proxies по TargetId.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    /// Session start: one proxy per live target
    TargetsPlaced { count: usize },
    ProjectileSpawned {
        projectile: Entity,
        origin: Vec3,
        impact: Vec3,
        color: Color,
    },
    /// Projectile reached its impact point and starts exploding
    ProjectileImpacted {
        projectile: Entity,
        position: Vec3,
        color: Color,
    },
    /// Expired projectile left the live set
    ProjectileRemoved { projectile: Entity },
    /// Target proxy must disappear (scale to zero)
    TargetRemoved { id: TargetId },
}

/// Регистрирует feedback events
pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AudioCue>().add_event::<SceneEvent>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names_match_assets() {
        assert_eq!(CueKind::LaserFire.name(), "laser-01");
        assert_eq!(CueKind::TargetDestroyed.name(), "blarmp");
    }

    #[test]
    fn test_audio_cue_serializes_for_host() {
        let json = serde_json::to_string(&AudioCue::new(CueKind::LaserFire, 0.5)).unwrap();
        assert_eq!(json, r#"{"cue":"LaserFire","volume":0.5}"#);
    }
}

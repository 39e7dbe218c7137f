//! Session facade: единственная точка входа для host'а (render loop, UI, input).
//!
//! Host вызывает `tick` каждый кадр, пробрасывает input и вычитывает
//! scene/audio события (они копятся в Session до drain).
//! Все вызовы синхронные и завершаются до следующего.

use bevy::ecs::event::{EventCursor, Events};
use bevy::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use crate::economy::{GameState, SessionPhase};
use crate::feedback::{AudioCue, SceneEvent};
use crate::intersection::RayIntersector;
use crate::navigation::{CameraPose, CameraRig, Crosshair, PointerInput};
use crate::path::TunnelPath;
use crate::projectile::Projectile;
use crate::session::{begin_session, end_session, FrameInput};
use crate::settings::{load_or_default, Settings, SettingsError, SettingsStore};
use crate::targets::{Target, TargetField};
use crate::tuning::SimulationTuning;
use crate::weapon::fire_weapon;

/// Discrete input from the host (pointer in window pixels, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Fire,
    TogglePause,
}

/// HUD state for UI display (committed state after the last call)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HudSnapshot {
    pub ammo: u32,
    pub score: u32,
    pub is_paused: bool,
    pub phase: SessionPhase,
    pub live_targets: usize,
    pub projectiles: usize,
    /// Camera path parameter in [0, 1)
    pub path_parameter: f32,
}

pub struct Session {
    app: App,
    path: Option<TunnelPath>,
    intersector: Option<Arc<dyn RayIntersector>>,
    scene_cursor: EventCursor<SceneEvent>,
    audio_cursor: EventCursor<AudioCue>,
    /// Feedback собранный после каждого вызова, ждёт drain от host'а
    scene_events: Vec<SceneEvent>,
    audio_cues: Vec<AudioCue>,
}

impl Session {
    /// Uninitialized session; `seed` drives target placement.
    pub fn new(seed: u64) -> Self {
        let mut app = crate::create_headless_app(seed);
        app.add_plugins(crate::SimulationPlugin);

        Self {
            app,
            path: None,
            intersector: None,
            scene_cursor: EventCursor::default(),
            audio_cursor: EventCursor::default(),
            scene_events: Vec::new(),
            audio_cues: Vec::new(),
        }
    }

    /// Replace the default wormhole loop (applies from the next start).
    pub fn with_path(mut self, path: TunnelPath) -> Self {
        self.path = Some(path);
        self
    }

    /// Replace the default TunnelIntersector (applies from the next start).
    pub fn with_intersector(mut self, intersector: Arc<dyn RayIntersector>) -> Self {
        self.intersector = Some(intersector);
        self
    }

    /// Override gameplay tuning (applies from the next start).
    pub fn with_tuning(mut self, tuning: SimulationTuning) -> Self {
        self.app.insert_resource(tuning);
        self
    }

    /// Start (or restart) with explicit settings. Invalid settings are rejected.
    pub fn start(&mut self, settings: Settings) -> Result<(), SettingsError> {
        let settings = settings.validate()?;
        self.begin(&settings);
        Ok(())
    }

    /// Start with settings from the store; failures fall back to defaults.
    pub fn start_from_store(&mut self, store: &dyn SettingsStore) -> Settings {
        let settings = load_or_default(store);
        self.begin(&settings);
        settings
    }

    fn begin(&mut self, settings: &Settings) {
        let path = self.path.clone().unwrap_or_else(TunnelPath::wormhole);
        begin_session(self.app.world_mut(), settings, path, self.intersector.clone());
        self.collect_feedback();
    }

    /// One frame. `elapsed_ms` is the host's monotonic timestamp.
    pub fn tick(&mut self, elapsed_ms: f64) {
        self.app.world_mut().insert_resource(FrameInput { elapsed_ms });
        self.app.update();
        self.collect_feedback();
    }

    /// Fire at the current crosshair. None = no-op (paused, no ammo, not started).
    pub fn fire(&mut self) -> Option<Entity> {
        let crosshair = self.crosshair();
        self.fire_at(crosshair)
    }

    /// Fire at an explicit world-space point.
    pub fn fire_at(&mut self, point: Vec3) -> Option<Entity> {
        let fired = fire_weapon(self.app.world_mut(), point);
        self.collect_feedback();
        fired
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let tuning = self
            .app
            .world()
            .get_resource::<SimulationTuning>()
            .map(|tuning| tuning.crosshair)
            .unwrap_or_default();

        if let Some(mut pointer) = self.app.world_mut().get_resource_mut::<PointerInput>() {
            pointer.update(Vec2::new(x, y), Vec2::new(width, height), &tuning);
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved {
                x,
                y,
                width,
                height,
            } => self.pointer_moved(x, y, width, height),
            InputEvent::Fire => {
                self.fire();
            }
            InputEvent::TogglePause => self.toggle_pause(),
        }
    }

    pub fn pause(&mut self) {
        self.set_paused(true);
    }

    pub fn resume(&mut self) {
        self.set_paused(false);
    }

    pub fn toggle_pause(&mut self) {
        let paused = self.is_paused();
        self.set_paused(!paused);
    }

    fn set_paused(&mut self, paused: bool) {
        let Some(mut state) = self.app.world_mut().get_resource_mut::<GameState>() else {
            return;
        };
        if !state.is_initialized() || state.is_paused == paused {
            return;
        }

        state.is_paused = paused;
        crate::logger::log_info(if paused { "Session paused" } else { "Session resumed" });
    }

    /// Tear down the session (safe to call repeatedly).
    pub fn quit(&mut self) {
        end_session(self.app.world_mut());
        self.collect_feedback();
    }

    fn game_state(&self) -> Option<&GameState> {
        self.app.world().get_resource::<GameState>()
    }

    pub fn ammo(&self) -> u32 {
        self.game_state().map_or(0, GameState::ammo)
    }

    pub fn score(&self) -> u32 {
        self.game_state().map_or(0, GameState::score)
    }

    pub fn is_paused(&self) -> bool {
        self.game_state().is_some_and(|state| state.is_paused)
    }

    pub fn is_running(&self) -> bool {
        self.game_state().is_some_and(GameState::is_running)
    }

    pub fn is_initialized(&self) -> bool {
        self.game_state().is_some_and(GameState::is_initialized)
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.app
            .world()
            .get_resource::<CameraRig>()
            .map(|rig| rig.pose)
            .unwrap_or_default()
    }

    /// Crosshair world position
    pub fn crosshair(&self) -> Vec3 {
        self.app
            .world()
            .get_resource::<Crosshair>()
            .map(|crosshair| crosshair.world_position)
            .unwrap_or_default()
    }

    pub fn live_targets(&self) -> Vec<Target> {
        self.app
            .world()
            .get_resource::<TargetField>()
            .map(TargetField::live_targets)
            .unwrap_or_default()
    }

    /// Live projectiles, ordered by entity index
    pub fn projectiles(&mut self) -> Vec<(Entity, Projectile)> {
        let world = self.app.world_mut();
        let mut query = world.query::<(Entity, &Projectile)>();
        let mut projectiles: Vec<_> = query
            .iter(world)
            .map(|(entity, projectile)| (entity, projectile.clone()))
            .collect();
        projectiles.sort_by_key(|(entity, _)| entity.index());
        projectiles
    }

    pub fn hud(&mut self) -> HudSnapshot {
        let state = self.game_state().cloned().unwrap_or_default();
        let path_parameter = self
            .app
            .world()
            .get_resource::<CameraRig>()
            .map_or(0.0, |rig| rig.parameter);

        HudSnapshot {
            ammo: state.ammo(),
            score: state.score(),
            is_paused: state.is_paused,
            phase: state.phase,
            live_targets: self.live_targets().len(),
            projectiles: self.projectiles().len(),
            path_parameter,
        }
    }

    /// Scene mutations since the last drain.
    pub fn drain_scene_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.scene_events)
    }

    /// Audio cues since the last drain.
    pub fn drain_audio_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.audio_cues)
    }

    /// Move fresh events out of the ECS buffers before they rotate away.
    fn collect_feedback(&mut self) {
        let world = self.app.world();
        if let Some(events) = world.get_resource::<Events<SceneEvent>>() {
            self.scene_events.extend(self.scene_cursor.read(events).copied());
        }
        if let Some(events) = world.get_resource::<Events<AudioCue>>() {
            self.audio_cues.extend(self.audio_cursor.read(events).copied());
        }
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

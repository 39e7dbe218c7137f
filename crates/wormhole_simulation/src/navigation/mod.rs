//! Navigation domain — камера едет по замкнутому туннелю
//!
//! Содержит:
//! - PathNavigator (pure: active time + difficulty → CameraPose)
//! - CameraRig (текущая поза камеры, resource)
//! - Crosshair / PointerInput (2D pointer → мировая точка прицела)
//! - Systems: advance_camera, update_crosshair

use bevy::prelude::*;

use crate::path::{PathSampler, TunnelPath};
use crate::economy::GameState;
use crate::session::{session_running, SessionClock, SimulationSet};
use crate::tuning::{CrosshairTuning, NavigationTuning, SimulationTuning};

/// Camera position + look-at point on the path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
        }
    }
}

impl CameraPose {
    /// Forward direction; -Z when position and look-at coincide.
    pub fn forward(&self) -> Vec3 {
        let forward = (self.look_at - self.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            Vec3::NEG_Z
        } else {
            forward
        }
    }

    /// Right/up/forward basis of a camera looking at `look_at` with world up +Y.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.forward();
        let mut right = forward.cross(Vec3::Y).normalize_or_zero();
        if right == Vec3::ZERO {
            // Смотрим строго вверх/вниз, берём произвольную горизонталь
            right = Vec3::X;
        }
        let up = right.cross(forward).normalize_or_zero();
        (right, up, forward)
    }

    /// Camera-space point (x right, y up, depth forward) → world space.
    pub fn to_world(&self, x: f32, y: f32, depth: f32) -> Vec3 {
        let (right, up, forward) = self.basis();
        self.position + right * x + up * y + forward * depth
    }
}

/// Pure navigator: deterministic for identical inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct PathNavigator {
    pub tuning: NavigationTuning,
}

impl PathNavigator {
    pub fn new(tuning: NavigationTuning) -> Self {
        Self { tuning }
    }

    /// Normalized path parameter for an elapsed time (ms) and difficulty.
    pub fn parameter_at(&self, elapsed_ms: f64, difficulty: f32) -> f32 {
        let time = elapsed_ms * self.tuning.base_speed * difficulty as f64;
        let looped = time.rem_euclid(self.tuning.loop_duration) / self.tuning.loop_duration;
        let p = looped as f32;
        if p >= 1.0 {
            0.0
        } else {
            p
        }
    }

    pub fn position_at<P: PathSampler>(&self, path: &P, elapsed_ms: f64, difficulty: f32) -> CameraPose {
        let p = self.parameter_at(elapsed_ms, difficulty);
        CameraPose {
            position: path.point_at(p),
            look_at: path.point_at((p + self.tuning.look_ahead).rem_euclid(1.0)),
        }
    }
}

/// Текущая поза камеры (пишется только в running ticks)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CameraRig {
    pub pose: CameraPose,
    pub parameter: f32,
}

/// Latest pointer position (window pixels), fed by the input collaborator
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PointerInput {
    /// Normalized device coordinates after the aspect fudge
    pub mapped: Vec2,
}

impl PointerInput {
    /// Map a pointer position in window pixels (origin top-left).
    pub fn update(&mut self, client: Vec2, window: Vec2, tuning: &CrosshairTuning) {
        if window.x <= 0.0 || window.y <= 0.0 {
            return;
        }

        let aspect = window.x / window.y;
        let ndc = Vec2::new(
            (client.x / window.x) * 2.0 - 1.0,
            -(client.y / window.y) * 2.0 + 1.0,
        );
        self.mapped = Vec2::new(ndc.x * aspect * tuning.fudge, ndc.y * tuning.fudge);
    }
}

/// Crosshair in world space (следует за камерой и pointer'ом)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Crosshair {
    pub world_position: Vec3,
}

impl Crosshair {
    pub fn place(pose: &CameraPose, pointer: &PointerInput, tuning: &CrosshairTuning) -> Self {
        Self {
            world_position: pose.to_world(pointer.mapped.x, pointer.mapped.y, tuning.depth),
        }
    }
}

/// Navigation Plugin: камера + crosshair (SimulationSet::Navigation)
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraRig>()
            .init_resource::<PointerInput>()
            .init_resource::<Crosshair>();

        app.add_systems(
            Update,
            (advance_camera, update_crosshair)
                .chain()
                .in_set(SimulationSet::Navigation)
                .run_if(session_running),
        );
    }
}

/// System: камера по active time (пауза замораживает параметр пути)
pub fn advance_camera(
    clock: Res<SessionClock>,
    state: Res<GameState>,
    tuning: Res<SimulationTuning>,
    path: Option<Res<TunnelPath>>,
    mut rig: ResMut<CameraRig>,
) {
    let Some(path) = path else {
        return;
    };

    let navigator = PathNavigator::new(tuning.navigation);
    rig.parameter = navigator.parameter_at(clock.active_ms(), state.difficulty);
    rig.pose = navigator.position_at(path.as_ref(), clock.active_ms(), state.difficulty);
}

/// System: crosshair follows the camera and the pointer
pub fn update_crosshair(
    rig: Res<CameraRig>,
    pointer: Res<PointerInput>,
    tuning: Res<SimulationTuning>,
    mut crosshair: ResMut<Crosshair>,
) {
    *crosshair = Crosshair::place(&rig.pose, &pointer, &tuning.crosshair);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> TunnelPath {
        TunnelPath::ring(20.0, 16).unwrap()
    }

    #[test]
    fn test_parameter_wraps_every_loop() {
        let navigator = PathNavigator::default();
        // 10_000 / 0.06 ms на круг при difficulty 1.0
        let loop_ms = 10_000.0 / 0.06;

        assert_eq!(navigator.parameter_at(0.0, 1.0), 0.0);
        assert!((navigator.parameter_at(loop_ms * 0.25, 1.0) - 0.25).abs() < 1e-5);
        assert!((navigator.parameter_at(loop_ms * 1.25, 1.0) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_difficulty_scales_speed() {
        let navigator = PathNavigator::default();
        let slow = navigator.parameter_at(10_000.0, 1.0);
        let fast = navigator.parameter_at(10_000.0, 2.0);
        assert!((fast - slow * 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_position_is_deterministic() {
        let path = ring();
        let navigator = PathNavigator::default();

        let a = navigator.position_at(&path, 12_345.0, 1.3);
        let b = navigator.position_at(&path, 12_345.0, 1.3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_look_at_is_ahead_on_path() {
        let path = ring();
        let navigator = PathNavigator::default();

        let pose = navigator.position_at(&path, 0.0, 1.0);
        assert!(pose.position.distance(path.point_at(0.0)) < 1e-4);
        assert!(pose.look_at.distance(path.point_at(0.03)) < 1e-4);
    }

    #[test]
    fn test_look_at_wraps_past_end() {
        let path = ring();
        let navigator = PathNavigator::default();
        let loop_ms = 10_000.0 / 0.06;

        let pose = navigator.position_at(&path, loop_ms * 0.99, 1.0);
        assert!(pose.look_at.distance(path.point_at(0.02)) < 1e-2);
    }

    #[test]
    fn test_crosshair_center_is_straight_ahead() {
        let pose = CameraPose {
            position: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -10.0),
        };
        let mut pointer = PointerInput::default();
        pointer.update(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0), &CrosshairTuning::default());

        let crosshair = Crosshair::place(&pose, &pointer, &CrosshairTuning::default());
        assert!(crosshair.world_position.distance(Vec3::new(0.0, 0.0, -1.0)) < 1e-5);
    }

    #[test]
    fn test_pointer_mapping_uses_aspect_fudge() {
        let mut pointer = PointerInput::default();
        let tuning = CrosshairTuning::default();

        // Правый верхний угол окна 800x400 (aspect 2)
        pointer.update(Vec2::new(800.0, 0.0), Vec2::new(800.0, 400.0), &tuning);
        assert!((pointer.mapped.x - 1.5).abs() < 1e-5);
        assert!((pointer.mapped.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_pointer_ignores_empty_window() {
        let mut pointer = PointerInput::default();
        pointer.update(Vec2::new(10.0, 10.0), Vec2::ZERO, &CrosshairTuning::default());
        assert_eq!(pointer.mapped, Vec2::ZERO);
    }

    #[test]
    fn test_camera_basis_is_orthonormal() {
        let pose = CameraPose {
            position: Vec3::new(1.0, 2.0, 3.0),
            look_at: Vec3::new(4.0, 1.0, -2.0),
        };
        let (right, up, forward) = pose.basis();

        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!(right.dot(forward).abs() < 1e-5);
        assert!(up.dot(forward).abs() < 1e-5);
        assert!(up.y > 0.0);
    }
}

//! Gameplay tuning (не persisted settings, а константы геймплея)
//!
//! Defaults = классический баланс игры. Resource можно подменить до старта
//! сессии (тесты используют это для экзотических случаев).

use bevy::prelude::*;

/// Вся tuning-таблица симуляции
#[derive(Resource, Debug, Clone, Default)]
pub struct SimulationTuning {
    pub navigation: NavigationTuning,
    pub targets: TargetTuning,
    pub weapon: WeaponTuning,
    pub projectile: ProjectileTuning,
    pub tunnel: TunnelTuning,
    pub crosshair: CrosshairTuning,
}

#[derive(Debug, Clone, Copy)]
pub struct NavigationTuning {
    /// Path time units per millisecond of active time (умножается на difficulty)
    pub base_speed: f64,
    /// Path time units for one full loop
    pub loop_duration: f64,
    /// Path parameter offset for the look-at point
    pub look_ahead: f32,
}

impl Default for NavigationTuning {
    fn default() -> Self {
        Self {
            base_speed: 0.06,
            loop_duration: 10_000.0,
            look_ahead: 0.03,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TargetTuning {
    pub count: usize,
    /// Max random offset added to the even spacing `i / count`
    pub jitter: f32,
    /// Lateral offset range applied on x and z
    pub lateral_min: f32,
    pub lateral_max: f32,
    /// Rotation per axis is drawn from `[0, max_rotation)`
    pub max_rotation: f32,
    /// Hue = hue_offset + p (wraps)
    pub hue_offset: f32,
    /// Edge length of the target box
    pub size: f32,
}

impl Default for TargetTuning {
    fn default() -> Self {
        Self {
            count: 55,
            jitter: 0.1,
            lateral_min: -0.4,
            lateral_max: 0.6,
            max_rotation: std::f32::consts::PI,
            hue_offset: 0.7,
            size: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WeaponTuning {
    pub hit_bonus: u32,
    pub ammo_reward: u32,
    /// Ray length; also the fallback impact distance when nothing is hit
    pub max_range: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            hit_bonus: 100,
            ammo_reward: 1,
            max_range: 40.0,
        }
    }
}

/// Как считать шаги анимации projectile за один tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepTiming {
    /// Один шаг на каждый running tick (frame-rate dependent, классическое поведение)
    PerFrame,
    /// steps = frame_delta_secs * reference_hz, не больше `MAX_CATCH_UP_STEPS`
    Scaled { reference_hz: f32 },
}

impl StepTiming {
    pub const MAX_CATCH_UP_STEPS: f32 = 4.0;

    /// Number of (possibly fractional) animation steps for a frame.
    pub fn steps_for(&self, frame_delta_ms: f64) -> f32 {
        match *self {
            StepTiming::PerFrame => 1.0,
            StepTiming::Scaled { reference_hz } => {
                let steps = (frame_delta_ms / 1000.0) as f32 * reference_hz;
                steps.clamp(0.0, Self::MAX_CATCH_UP_STEPS)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Distance per step at difficulty 1.0
    pub base_speed: f32,
    /// Traveling → Exploding when closer than this to the impact point
    pub impact_threshold: f32,
    pub scale_step: f32,
    pub opacity_decay: f32,
    pub opacity_epsilon: f32,
    pub min_scale: f32,
    pub timing: StepTiming,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            base_speed: 0.5,
            impact_threshold: 0.5,
            scale_step: 0.2,
            opacity_decay: 0.85,
            opacity_epsilon: 0.01,
            min_scale: 0.01,
            timing: StepTiming::PerFrame,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TunnelTuning {
    pub radius: f32,
    /// Ray marching step against the tube wall
    pub march_step: f32,
    /// Centerline samples used for the distance field
    pub centerline_samples: usize,
    pub surface_color: Color,
}

impl Default for TunnelTuning {
    fn default() -> Self {
        Self {
            radius: 0.65,
            march_step: 0.05,
            centerline_samples: 400,
            surface_color: Color::srgb_u8(0x00, 0xcc, 0xff),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CrosshairTuning {
    /// Distance of the crosshair plane in front of the camera
    pub depth: f32,
    /// Pointer NDC scale (x additionally scaled by the aspect ratio)
    pub fudge: f32,
}

impl Default for CrosshairTuning {
    fn default() -> Self {
        Self {
            depth: 1.0,
            fudge: 0.75,
        }
    }
}

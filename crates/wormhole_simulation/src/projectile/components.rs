//! Projectile component + state machine.
//!
//! Полёт чисто косметический: исход выстрела решён hit-scan'ом в момент fire,
//! projectile только летит к заранее известной impact point и взрывается.

use bevy::prelude::*;

use crate::targets::TargetId;
use crate::tuning::ProjectileTuning;

/// Bolt color до попадания (0xFFCC00)
pub const BOLT_COLOR: Color = Color::srgb(1.0, 0.8, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Traveling,
    Exploding,
    /// Terminal; ждёт sweep из live set
    Expired,
}

/// Impact point + color, решённые в момент выстрела
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub point: Vec3,
    pub color: Color,
    /// Target to remove at the Exploding transition
    pub target: Option<TargetId>,
}

/// Outcome of one `Projectile::step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileStep {
    /// Nothing changed (terminal state or zero steps)
    Idle,
    Traveled,
    /// Traveling → Exploding on this step
    Impacted { target: Option<TargetId> },
    Faded,
    /// Exploding → Expired on this step
    Expired,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub origin: Vec3,
    pub position: Vec3,
    /// Unit vector origin → impact (ZERO when they coincide)
    pub direction: Vec3,
    /// Distance per step
    pub speed: f32,
    pub impact: Impact,
    pub color: Color,
    pub scale: f32,
    pub opacity: f32,
    pub state: ProjectileState,
}

impl Projectile {
    pub fn new(origin: Vec3, impact: Impact, speed: f32) -> Self {
        Self {
            origin,
            position: origin,
            direction: (impact.point - origin).normalize_or_zero(),
            speed,
            impact,
            color: BOLT_COLOR,
            scale: 1.0,
            opacity: 1.0,
            state: ProjectileState::Traveling,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.state == ProjectileState::Expired
    }

    pub fn remaining_distance(&self) -> f32 {
        self.position.distance(self.impact.point)
    }

    /// Advance the state machine by `steps` animation steps.
    ///
    /// `steps` = 1.0 в режиме PerFrame; дробное значение в режиме Scaled.
    pub fn step(&mut self, steps: f32, tuning: &ProjectileTuning) -> ProjectileStep {
        if steps <= 0.0 {
            return ProjectileStep::Idle;
        }

        match self.state {
            ProjectileState::Traveling => {
                // Шаг не длиннее остатка: impact window нельзя перепрыгнуть
                let advance = (self.speed * steps).min(self.remaining_distance());
                self.position += self.direction * advance;

                if self.remaining_distance() < tuning.impact_threshold {
                    self.position = self.impact.point;
                    self.color = self.impact.color;
                    self.state = ProjectileState::Exploding;
                    return ProjectileStep::Impacted {
                        target: self.impact.target,
                    };
                }
                ProjectileStep::Traveled
            }
            ProjectileState::Exploding => {
                if self.opacity > tuning.opacity_epsilon {
                    self.scale += tuning.scale_step * steps;
                    self.opacity *= tuning.opacity_decay.powf(steps);
                    ProjectileStep::Faded
                } else {
                    self.opacity = 0.0;
                    self.scale = tuning.min_scale;
                    self.state = ProjectileState::Expired;
                    ProjectileStep::Expired
                }
            }
            ProjectileState::Expired => ProjectileStep::Idle,
        }
    }
}

//! Projectile events

use bevy::prelude::*;

use crate::targets::TargetId;

/// Event: projectile reached its impact point (Traveling → Exploding)
///
/// Target (если был) удаляется из TargetField именно здесь, а не при выстреле.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileImpacted {
    pub projectile: Entity,
    pub target: Option<TargetId>,
    pub position: Vec3,
    pub color: Color,
}

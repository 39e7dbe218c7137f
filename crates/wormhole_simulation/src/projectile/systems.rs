//! Projectile systems (flight, impact → target removal, sweep).

use bevy::prelude::*;

use crate::feedback::SceneEvent;
use crate::projectile::{Projectile, ProjectileImpacted, ProjectileStep};
use crate::session::SessionClock;
use crate::targets::{TargetField, TargetRemoved};
use crate::tuning::SimulationTuning;

/// System: один шаг state machine для каждого live projectile
pub fn advance_projectiles(
    clock: Res<SessionClock>,
    tuning: Res<SimulationTuning>,
    mut projectiles: Query<(Entity, &mut Projectile)>,
    mut impacts: EventWriter<ProjectileImpacted>,
    mut scene: EventWriter<SceneEvent>,
) {
    let steps = tuning.projectile.timing.steps_for(clock.frame_delta_ms());

    for (entity, mut projectile) in projectiles.iter_mut() {
        if let ProjectileStep::Impacted { target } = projectile.step(steps, &tuning.projectile) {
            impacts.write(ProjectileImpacted {
                projectile: entity,
                target,
                position: projectile.position,
                color: projectile.color,
            });
            scene.write(SceneEvent::ProjectileImpacted {
                projectile: entity,
                position: projectile.position,
                color: projectile.color,
            });
        }
    }
}

/// System: ProjectileImpacted → удаление цели из TargetField
///
/// Повторное удаление (цель уже убрана, например после quit): no-op.
pub fn remove_impacted_targets(
    mut impacts: EventReader<ProjectileImpacted>,
    mut field: ResMut<TargetField>,
    mut removed: EventWriter<TargetRemoved>,
    mut scene: EventWriter<SceneEvent>,
) {
    for impact in impacts.read() {
        let Some(id) = impact.target else {
            continue;
        };

        let Some(target) = field.remove_target(id) else {
            continue;
        };

        removed.write(TargetRemoved {
            id,
            position: target.position,
        });
        scene.write(SceneEvent::TargetRemoved { id });

        crate::logger::log(&format!(
            "💥 Target {:?} destroyed at {:?} ({} left)",
            id,
            target.position,
            field.len()
        ));
    }
}

/// System: Expired projectiles покидают live set (despawn = освобождение слота)
pub fn sweep_expired_projectiles(
    mut commands: Commands,
    projectiles: Query<(Entity, &Projectile)>,
    mut scene: EventWriter<SceneEvent>,
) {
    for (entity, projectile) in projectiles.iter() {
        if !projectile.is_expired() {
            continue;
        }

        commands.entity(entity).despawn();
        scene.write(SceneEvent::ProjectileRemoved { projectile: entity });
    }
}

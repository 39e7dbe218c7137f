//! Session lifecycle: start (build session-owned state) / quit (tear it down).
//!
//! Exclusive функции над World: вызываются между тиками, никогда не
//! пересекаются с системами.

use bevy::prelude::*;
use std::sync::Arc;

use crate::economy::GameState;
use crate::feedback::SceneEvent;
use crate::intersection::{RayIntersector, Raycaster, TunnelIntersector};
use crate::navigation::{CameraRig, Crosshair, PathNavigator, PointerInput};
use crate::path::TunnelPath;
use crate::projectile::Projectile;
use crate::session::SessionClock;
use crate::settings::Settings;
use crate::targets::{TargetField, TargetId};
use crate::tuning::SimulationTuning;
use crate::DeterministicRng;

/// Start (or restart) a session from validated settings.
///
/// `intersector` = None → TunnelIntersector по этому же path.
pub fn begin_session(
    world: &mut World,
    settings: &Settings,
    path: TunnelPath,
    intersector: Option<Arc<dyn RayIntersector>>,
) {
    if world
        .get_resource::<GameState>()
        .is_some_and(GameState::is_initialized)
    {
        end_session(world);
    }

    let tuning = world.get_resource::<SimulationTuning>().cloned().unwrap_or_default();

    let field = {
        let mut rng = world.get_resource_or_insert_with(|| DeterministicRng::new(crate::DEFAULT_SEED));
        TargetField::place_targets(&path, &tuning.targets, &mut rng.rng)
    };
    let target_count = field.len();

    let intersector: Arc<dyn RayIntersector> = match intersector {
        Some(intersector) => intersector,
        None => Arc::new(TunnelIntersector::from_path(&path, &tuning.tunnel)),
    };

    // Поза до первого тика: fire() сразу после start уже валиден
    let navigator = PathNavigator::new(tuning.navigation);
    let rig = CameraRig {
        pose: navigator.position_at(&path, 0.0, settings.difficulty),
        parameter: navigator.parameter_at(0.0, settings.difficulty),
    };
    let pointer = world.get_resource::<PointerInput>().copied().unwrap_or_default();
    let crosshair = Crosshair::place(&rig.pose, &pointer, &tuning.crosshair);

    world.insert_resource(field);
    world.insert_resource(path);
    world.insert_resource(Raycaster(intersector));
    world.insert_resource(rig);
    world.insert_resource(crosshair);
    world.insert_resource(SessionClock::default());
    world.insert_resource(GameState::from_settings(settings));

    world.send_event(SceneEvent::TargetsPlaced {
        count: target_count,
    });

    crate::logger::log_info(&format!(
        "Session started: difficulty={} ammo={} targets={}",
        settings.difficulty, settings.starting_ammo, target_count
    ));
}

/// Quit: despawn live projectiles, drop targets/path, GameState → uninitialized.
///
/// Безопасно вызывать повторно (второй вызов ничего не находит).
pub fn end_session(world: &mut World) {
    let mut query = world.query_filtered::<Entity, With<Projectile>>();
    let projectiles: Vec<Entity> = query.iter(world).collect();
    for &entity in &projectiles {
        world.despawn(entity);
        world.send_event(SceneEvent::ProjectileRemoved { projectile: entity });
    }

    let cleared: Vec<TargetId> = match world.get_resource_mut::<TargetField>() {
        Some(mut field) => {
            let ids = field.live_targets().iter().map(|target| target.id).collect();
            field.clear();
            ids
        }
        None => Vec::new(),
    };
    for &id in &cleared {
        world.send_event(SceneEvent::TargetRemoved { id });
    }

    world.remove_resource::<TunnelPath>();
    world.remove_resource::<Raycaster>();
    world.insert_resource(GameState::uninitialized());
    world.insert_resource(SessionClock::default());
    world.insert_resource(CameraRig::default());
    world.insert_resource(Crosshair::default());

    crate::logger::log_info(&format!(
        "Session ended: {} projectiles and {} targets torn down",
        projectiles.len(),
        cleared.len()
    ));
}

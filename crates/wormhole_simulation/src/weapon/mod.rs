//! Hit-scan weapon
//!
//! fire = (gate) → ammo - 1 → raycast по {live targets ∪ стенка туннеля} →
//! (попали в цель: +score, +ammo, claim) → spawn Projectile → audio cues.
//!
//! Исход выстрела решается мгновенно; Projectile только визуализирует полёт.

use bevy::prelude::*;

use crate::economy::GameState;
use crate::feedback::{AudioCue, CueKind, SceneEvent};
use crate::intersection::{HitCandidate, HitObject, RayIntersector, Raycaster};
use crate::navigation::CameraRig;
use crate::projectile::{Impact, Projectile, BOLT_COLOR};
use crate::targets::{TargetField, TargetId};
use crate::tuning::{SimulationTuning, WeaponTuning};

/// Hit-scan result for one shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotResolution {
    pub origin: Vec3,
    pub direction: Dir3,
    pub impact: Impact,
    /// None = луч ни во что не попал (fallback impact на max_range)
    pub hit: Option<HitObject>,
}

impl ShotResolution {
    pub fn hit_target(&self) -> Option<TargetId> {
        match self.hit {
            Some(HitObject::Target(id)) => Some(id),
            _ => None,
        }
    }
}

/// Ray direction camera → crosshair; degenerate ray falls back to camera forward.
pub fn shot_direction(origin: Vec3, crosshair: Vec3, forward: Vec3) -> Dir3 {
    Dir3::new(crosshair - origin)
        .or_else(|_| Dir3::new(forward))
        .unwrap_or(Dir3::NEG_Z)
}

/// Pure hit-scan: nearest hit among candidates, or the max-range fallback.
///
/// Target hit → impact = позиция цели + её цвет. Стенка → точка на стенке +
/// цвет поверхности. Ничего → `origin + direction * max_range` + цвет болта.
pub fn resolve_shot(
    origin: Vec3,
    forward: Vec3,
    crosshair: Vec3,
    candidates: &[HitCandidate],
    intersector: &dyn RayIntersector,
    tuning: &WeaponTuning,
) -> ShotResolution {
    let direction = shot_direction(origin, crosshair, forward);
    let hit = intersector.nearest_hit(origin, direction, tuning.max_range, candidates);

    let impact = match hit {
        Some(hit) => match hit.object {
            HitObject::Target(id) => Impact {
                point: target_position(candidates, id).unwrap_or(hit.point),
                color: hit.color,
                target: Some(id),
            },
            HitObject::TunnelSurface => Impact {
                point: hit.point,
                color: hit.color,
                target: None,
            },
        },
        None => Impact {
            point: origin + direction * tuning.max_range,
            color: BOLT_COLOR,
            target: None,
        },
    };

    ShotResolution {
        origin,
        direction,
        impact,
        hit: hit.map(|hit| hit.object),
    }
}

fn target_position(candidates: &[HitCandidate], id: TargetId) -> Option<Vec3> {
    candidates.iter().find_map(|candidate| match *candidate {
        HitCandidate::Target {
            id: candidate_id,
            position,
            ..
        } if candidate_id == id => Some(position),
        _ => None,
    })
}

/// Fire from the current camera pose towards `crosshair` (world space).
///
/// No-op (None, без изменений состояния) если сессия не running, на паузе,
/// или ammo == 0. Иначе возвращает Entity нового Projectile.
pub fn fire_weapon(world: &mut World, crosshair: Vec3) -> Option<Entity> {
    let can_fire = world
        .get_resource::<GameState>()
        .is_some_and(GameState::can_fire);
    if !can_fire {
        return None;
    }

    let Some(raycaster) = world.get_resource::<Raycaster>().cloned() else {
        crate::logger::log_warning("fire ignored: no intersection service in a running session");
        return None;
    };
    let tuning = world.get_resource::<SimulationTuning>().cloned().unwrap_or_default();
    let pose = world.get_resource::<CameraRig>().map(|rig| rig.pose).unwrap_or_default();

    let mut candidates = world
        .get_resource::<TargetField>()
        .map(TargetField::hit_candidates)
        .unwrap_or_default();
    candidates.push(HitCandidate::TunnelSurface);

    let shot = resolve_shot(
        pose.position,
        pose.forward(),
        crosshair,
        &candidates,
        raycaster.intersector(),
        &tuning.weapon,
    );

    // Economy: эффекты выстрела применяются сразу, не при impact
    let (volume, difficulty) = {
        let mut state = world.get_resource_mut::<GameState>()?;
        state.economy.decrement_ammo();
        if shot.hit_target().is_some() {
            state.economy.add_score(tuning.weapon.hit_bonus);
            for _ in 0..tuning.weapon.ammo_reward {
                state.economy.increment_ammo();
            }
        }
        (state.volume, state.difficulty)
    };

    if let Some(id) = shot.hit_target() {
        if let Some(mut field) = world.get_resource_mut::<TargetField>() {
            field.claim(id);
        }
    }

    let speed = tuning.projectile.base_speed * difficulty;
    let entity = world
        .spawn(Projectile::new(shot.origin, shot.impact, speed))
        .id();

    world.send_event(AudioCue::new(CueKind::LaserFire, volume));
    if shot.hit_target().is_some() {
        world.send_event(AudioCue::new(CueKind::TargetDestroyed, volume));
    }
    world.send_event(SceneEvent::ProjectileSpawned {
        projectile: entity,
        origin: shot.origin,
        impact: shot.impact.point,
        color: BOLT_COLOR,
    });

    match shot.hit {
        Some(HitObject::Target(id)) => crate::logger::log(&format!(
            "🎯 Shot {:?} hit target {:?} at {:?}",
            entity, id, shot.impact.point
        )),
        Some(HitObject::TunnelSurface) => crate::logger::log(&format!(
            "Shot {:?} hit tunnel wall at {:?}",
            entity, shot.impact.point
        )),
        None => crate::logger::log(&format!(
            "Shot {:?} hit nothing, fallback impact at {:?}",
            entity, shot.impact.point
        )),
    }

    Some(entity)
}

#[cfg(test)]
mod weapon_tests;

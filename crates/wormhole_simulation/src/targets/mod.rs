//! Targets domain — разрушаемые цели вдоль туннеля
//!
//! TargetField владеет целями эксклюзивно. Цели создаются одной пачкой при
//! старте сессии и удаляются по одной; удалённая цель никогда не возвращается
//! (id монотонные, API вставки нет).
//!
//! Попадание решается в момент выстрела (hit-scan): цель помечается как
//! claimed (больше не участвует в hit-test), а из live set удаляется позже,
//! когда projectile долетает до неё.

use bevy::prelude::*;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

use crate::intersection::HitCandidate;
use crate::path::PathSampler;
use crate::tuning::TargetTuning;

/// Stable target identifier (opaque для rendering collaborator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec3,
    /// Euler XYZ, радианы
    pub rotation: Vec3,
    /// Hit-feedback color (hue по параметру пути)
    pub color: Color,
    /// Path parameter the target was placed at
    pub parameter: f32,
    pub size: f32,
}

impl Target {
    pub fn as_candidate(&self) -> HitCandidate {
        HitCandidate::Target {
            id: self.id,
            position: self.position,
            rotation: self.rotation,
            half_extent: self.size * 0.5,
            color: self.color,
        }
    }
}

/// Hue ramp along the path: targets are visually ordered by parameter.
pub fn target_color(parameter: f32, hue_offset: f32) -> Color {
    let hue = (hue_offset + parameter).rem_euclid(1.0) * 360.0;
    Color::hsl(hue, 1.0, 0.5)
}

/// Live target set
#[derive(Resource, Debug, Clone, Default)]
pub struct TargetField {
    live: BTreeMap<TargetId, Target>,
    /// Hit at fire time, waiting for the projectile to arrive
    claimed: BTreeSet<TargetId>,
    removed_total: usize,
}

impl TargetField {
    /// Place `tuning.count` targets along the path (один раз на сессию).
    pub fn place_targets<P: PathSampler, R: Rng>(path: &P, tuning: &TargetTuning, rng: &mut R) -> Self {
        let mut live = BTreeMap::new();

        for i in 0..tuning.count {
            let jitter = if tuning.jitter > 0.0 {
                rng.gen_range(0.0..tuning.jitter)
            } else {
                0.0
            };
            let parameter = (i as f32 / tuning.count as f32 + jitter).rem_euclid(1.0);

            let mut position = path.point_at(parameter);
            position.x += rng.gen_range(tuning.lateral_min..tuning.lateral_max);
            position.z += rng.gen_range(tuning.lateral_min..tuning.lateral_max);

            let rotation = Vec3::new(
                rng.gen_range(0.0..tuning.max_rotation),
                rng.gen_range(0.0..tuning.max_rotation),
                rng.gen_range(0.0..tuning.max_rotation),
            );

            let id = TargetId(i as u32);
            live.insert(
                id,
                Target {
                    id,
                    position,
                    rotation,
                    color: target_color(parameter, tuning.hue_offset),
                    parameter,
                    size: tuning.size,
                },
            );
        }

        Self {
            live,
            claimed: BTreeSet::new(),
            removed_total: 0,
        }
    }

    /// Remove a target. Idempotent: an absent id is a no-op (returns None).
    pub fn remove_target(&mut self, id: TargetId) -> Option<Target> {
        self.claimed.remove(&id);
        let removed = self.live.remove(&id);
        if removed.is_some() {
            self.removed_total += 1;
        }
        removed
    }

    /// Mark a live target as already hit. False if absent or claimed before.
    pub fn claim(&mut self, id: TargetId) -> bool {
        self.live.contains_key(&id) && self.claimed.insert(id)
    }

    pub fn is_claimed(&self, id: TargetId) -> bool {
        self.claimed.contains(&id)
    }

    /// Read-only snapshot of every live target (claimed included), ordered by id
    pub fn live_targets(&self) -> Vec<Target> {
        self.live.values().copied().collect()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.live.get(&id)
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.live.contains_key(&id)
    }

    /// Hit-test candidates: live targets that are not claimed yet
    pub fn hit_candidates(&self) -> Vec<HitCandidate> {
        self.live
            .values()
            .filter(|target| !self.claimed.contains(&target.id))
            .map(Target::as_candidate)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn removed_total(&self) -> usize {
        self.removed_total
    }

    /// Teardown (quit): drop every target and the session statistics
    pub fn clear(&mut self) {
        self.live.clear();
        self.claimed.clear();
        self.removed_total = 0;
    }
}

/// Event: цель уничтожена (для scene collaborator и статистики)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TargetRemoved {
    pub id: TargetId,
    pub position: Vec3,
}

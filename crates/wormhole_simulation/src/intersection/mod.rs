//! Intersection service: ближайшее пересечение луча выстрела
//!
//! Candidate set = live targets (oriented boxes) ∪ внутренняя стенка туннеля.
//! Default реализация (TunnelIntersector) считает всё аналитически:
//! - target: ray vs OBB (луч переводится в локальный frame коробки → AABB slab test)
//! - tunnel: ray marching по distance-to-centerline, hit = выход из трубы
//!
//! Host может подставить свою реализацию (например, raycast движка рендера)
//! через `Session::with_intersector`.

use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::prelude::*;
use std::sync::Arc;

use crate::path::TunnelPath;
use crate::targets::TargetId;
use crate::tuning::TunnelTuning;

/// Bisection iterations when refining the tube wall crossing
const WALL_REFINE_ITERATIONS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitCandidate {
    Target {
        id: TargetId,
        position: Vec3,
        /// Euler XYZ, радианы
        rotation: Vec3,
        half_extent: f32,
        color: Color,
    },
    TunnelSurface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitObject {
    Target(TargetId),
    TunnelSurface,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
    pub object: HitObject,
    pub color: Color,
}

pub trait RayIntersector: Send + Sync {
    /// Nearest hit among `candidates` within `max_distance`, if any.
    fn nearest_hit(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        candidates: &[HitCandidate],
    ) -> Option<RayHit>;
}

/// Intersection service активной сессии
#[derive(Resource, Clone)]
pub struct Raycaster(pub Arc<dyn RayIntersector>);

impl Raycaster {
    pub fn intersector(&self) -> &dyn RayIntersector {
        self.0.as_ref()
    }
}

/// Ray vs oriented box. Returns the distance to the entry point (0 if inside).
pub fn ray_box_distance(
    origin: Vec3,
    direction: Dir3,
    max_distance: f32,
    center: Vec3,
    rotation: Vec3,
    half_extent: f32,
) -> Option<f32> {
    let orientation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
    let inverse = orientation.inverse();

    let local_direction = Dir3::new(inverse * direction.as_vec3()).ok()?;
    let ray = Ray3d {
        origin: inverse * (origin - center),
        direction: local_direction,
    };

    let cast = RayCast3d::from_ray(ray, max_distance);
    cast.aabb_intersection_at(&Aabb3d::new(Vec3::ZERO, Vec3::splat(half_extent)))
}

/// Analytic intersector over the tunnel centerline
#[derive(Debug, Clone)]
pub struct TunnelIntersector {
    /// Closed polyline approximating the path
    centerline: Vec<Vec3>,
    radius: f32,
    march_step: f32,
    surface_color: Color,
}

impl TunnelIntersector {
    pub fn from_path(path: &TunnelPath, tuning: &TunnelTuning) -> Self {
        Self {
            centerline: path.sample_centerline(tuning.centerline_samples.max(3)),
            radius: tuning.radius,
            march_step: tuning.march_step.max(1e-3),
            surface_color: tuning.surface_color,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Distance from a point to the closed centerline polyline
    pub fn distance_to_centerline(&self, point: Vec3) -> f32 {
        let count = self.centerline.len();
        let mut best = f32::INFINITY;

        for i in 0..count {
            let a = self.centerline[i];
            let b = self.centerline[(i + 1) % count];
            best = best.min(point_segment_distance(point, a, b));
        }

        best
    }

    fn is_inside(&self, point: Vec3) -> bool {
        self.distance_to_centerline(point) < self.radius
    }

    /// First inside → outside crossing of the tube wall (BackSide hit).
    pub fn wall_distance(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<f32> {
        // NaN range: `t >= max_distance` никогда не станет true
        if !max_distance.is_finite() || max_distance <= 0.0 {
            return None;
        }

        let direction = direction.as_vec3();
        let mut previous_t = 0.0;
        let mut previous_inside = self.is_inside(origin);

        loop {
            let t = (previous_t + self.march_step).min(max_distance);
            let inside = self.is_inside(origin + direction * t);

            if previous_inside && !inside {
                return Some(self.refine_wall(origin, direction, previous_t, t));
            }

            if t >= max_distance {
                return None;
            }
            previous_t = t;
            previous_inside = inside;
        }
    }

    fn refine_wall(&self, origin: Vec3, direction: Vec3, mut inside_t: f32, mut outside_t: f32) -> f32 {
        for _ in 0..WALL_REFINE_ITERATIONS {
            let middle = (inside_t + outside_t) * 0.5;
            if self.is_inside(origin + direction * middle) {
                inside_t = middle;
            } else {
                outside_t = middle;
            }
        }
        (inside_t + outside_t) * 0.5
    }
}

impl RayIntersector for TunnelIntersector {
    fn nearest_hit(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        candidates: &[HitCandidate],
    ) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;

        for candidate in candidates {
            let hit = match *candidate {
                HitCandidate::Target {
                    id,
                    position,
                    rotation,
                    half_extent,
                    color,
                } => ray_box_distance(origin, direction, max_distance, position, rotation, half_extent).map(
                    |distance| RayHit {
                        point: origin + direction * distance,
                        distance,
                        object: HitObject::Target(id),
                        color,
                    },
                ),
                HitCandidate::TunnelSurface => {
                    self.wall_distance(origin, direction, max_distance)
                        .map(|distance| RayHit {
                            point: origin + direction * distance,
                            distance,
                            object: HitObject::TunnelSurface,
                            color: self.surface_color,
                        })
                }
            };

            if let Some(hit) = hit {
                if nearest.map_or(true, |best| hit.distance < best.distance) {
                    nearest = Some(hit);
                }
            }
        }

        nearest
    }
}

fn point_segment_distance(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    let segment = b - a;
    let length_squared = segment.length_squared();
    if length_squared <= f32::EPSILON {
        return point.distance(a);
    }

    let t = ((point - a).dot(segment) / length_squared).clamp(0.0, 1.0);
    point.distance(a + segment * t)
}

//! Tunnel path (замкнутая Catmull-Rom кривая)
//!
//! Камера, цели и стенка туннеля используют один и тот же centerline.
//! Параметр p ∈ [0, 1) нормализован по длине дуги (постоянная скорость
//! вдоль кривой), p вне диапазона заворачивается по модулю 1.

use bevy::prelude::*;
use std::fmt;

/// Segment count of the arc-length lookup table
const ARC_LENGTH_DIVISIONS: usize = 1000;

/// Path service: точка на замкнутой кривой по нормализованному параметру
pub trait PathSampler {
    fn point_at(&self, p: f32) -> Vec3;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    TooFewControlPoints(usize),
    NonFiniteControlPoint(usize),
    ZeroLength,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::TooFewControlPoints(count) => {
                write!(f, "closed path needs at least 3 control points, got {}", count)
            }
            PathError::NonFiniteControlPoint(index) => {
                write!(f, "control point {} has a non-finite coordinate", index)
            }
            PathError::ZeroLength => write!(f, "control points collapse to a zero-length path"),
        }
    }
}

impl std::error::Error for PathError {}

/// Immutable closed curve (один на сессию)
#[derive(Resource, Debug, Clone)]
pub struct TunnelPath {
    control_points: Vec<Vec3>,
    /// Cumulative length at `k / ARC_LENGTH_DIVISIONS` of the raw parameter
    arc_lengths: Vec<f32>,
}

impl TunnelPath {
    pub fn new(control_points: Vec<Vec3>) -> Result<Self, PathError> {
        if control_points.len() < 3 {
            return Err(PathError::TooFewControlPoints(control_points.len()));
        }
        if let Some(index) = control_points.iter().position(|p| !p.is_finite()) {
            return Err(PathError::NonFiniteControlPoint(index));
        }

        // Все точки совпадают: длина кривой = шум округления, проверяем сами точки
        let first = control_points[0];
        let tolerance = first.abs().max_element().max(1.0) * 1e-5;
        if control_points.iter().all(|p| p.distance(first) <= tolerance) {
            return Err(PathError::ZeroLength);
        }

        Ok(Self::build(control_points))
    }

    /// Default wormhole loop: a wide ring that weaves vertically three times.
    pub fn wormhole() -> Self {
        const SEGMENTS: usize = 28;

        let points = (0..SEGMENTS)
            .map(|i| {
                let theta = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
                Vec3::new(
                    5.0 * theta.cos() + 1.5 * (2.0 * theta).cos(),
                    1.5 * (3.0 * theta).sin(),
                    5.0 * theta.sin() - 1.5 * (2.0 * theta).sin(),
                )
            })
            .collect();

        Self::build(points)
    }

    /// Flat circular loop in the XZ plane (calibration levels, tests).
    pub fn ring(radius: f32, segments: usize) -> Result<Self, PathError> {
        let points = (0..segments)
            .map(|i| {
                let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
                Vec3::new(radius * theta.cos(), 0.0, radius * theta.sin())
            })
            .collect();

        Self::new(points)
    }

    fn build(control_points: Vec<Vec3>) -> Self {
        let mut path = Self {
            control_points,
            arc_lengths: Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1),
        };

        let mut total = 0.0;
        let mut previous = path.raw_point(0.0);
        path.arc_lengths.push(0.0);
        for k in 1..=ARC_LENGTH_DIVISIONS {
            let point = path.raw_point(k as f32 / ARC_LENGTH_DIVISIONS as f32);
            total += point.distance(previous);
            path.arc_lengths.push(total);
            previous = point;
        }

        path
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.control_points
    }

    /// Total arc length of the loop
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// `count` points evenly spaced by arc length (the closing point is not repeated).
    pub fn sample_centerline(&self, count: usize) -> Vec<Vec3> {
        (0..count)
            .map(|i| self.point_at(i as f32 / count as f32))
            .collect()
    }

    /// Raw curve parameter for a normalized arc-length parameter
    fn raw_parameter(&self, p: f32) -> f32 {
        let mut p = p.rem_euclid(1.0);
        // rem_euclid может вернуть ровно 1.0 для -ε
        if p >= 1.0 {
            p = 0.0;
        }

        let target = p * self.length();
        let k = self
            .arc_lengths
            .partition_point(|&length| length <= target)
            .saturating_sub(1)
            .min(ARC_LENGTH_DIVISIONS - 1);

        let segment = self.arc_lengths[k + 1] - self.arc_lengths[k];
        let fraction = if segment > 0.0 {
            (target - self.arc_lengths[k]) / segment
        } else {
            0.0
        };

        (k as f32 + fraction) / ARC_LENGTH_DIVISIONS as f32
    }

    /// Uniform Catmull-Rom on the closed control loop, u ∈ [0, 1]
    fn raw_point(&self, u: f32) -> Vec3 {
        let count = self.control_points.len();
        let scaled = u.rem_euclid(1.0) * count as f32;
        let index = (scaled.floor() as usize).min(count - 1);
        let t = scaled - index as f32;

        let p0 = self.control_points[(index + count - 1) % count];
        let p1 = self.control_points[index];
        let p2 = self.control_points[(index + 1) % count];
        let p3 = self.control_points[(index + 2) % count];

        catmull_rom(p0, p1, p2, p3, t)
    }
}

impl PathSampler for TunnelPath {
    fn point_at(&self, p: f32) -> Vec3 {
        self.raw_point(self.raw_parameter(p))
    }
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    let c0 = -0.5 * t3 + t2 - 0.5 * t;
    let c1 = 1.5 * t3 - 2.5 * t2 + 1.0;
    let c2 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
    let c3 = 0.5 * t3 - 0.5 * t2;

    p0 * c0 + p1 * c1 + p2 * c2 + p3 * c3
}

#[cfg(test)]
mod path_tests;

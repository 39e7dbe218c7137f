//! Tests for the tunnel path.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use crate::path::{PathError, PathSampler, TunnelPath};

    fn assert_close(a: Vec3, b: Vec3, tolerance: f32) {
        assert!(
            a.distance(b) < tolerance,
            "{:?} vs {:?} (distance {})",
            a,
            b,
            a.distance(b)
        );
    }

    #[test]
    fn test_rejects_too_few_points() {
        let result = TunnelPath::new(vec![Vec3::ZERO, Vec3::X]);
        assert_eq!(result.unwrap_err(), PathError::TooFewControlPoints(2));
    }

    #[test]
    fn test_rejects_non_finite_points() {
        let result = TunnelPath::new(vec![Vec3::ZERO, Vec3::X, Vec3::new(f32::NAN, 0.0, 0.0)]);
        assert_eq!(result.unwrap_err(), PathError::NonFiniteControlPoint(2));
    }

    #[test]
    fn test_rejects_degenerate_loop() {
        let result = TunnelPath::new(vec![Vec3::ONE; 4]);
        assert_eq!(result.unwrap_err(), PathError::ZeroLength);
    }

    #[test]
    fn test_rejects_degenerate_loop_far_from_origin() {
        // Округление Catmull-Rom на больших координатах даёт ненулевую "длину"
        let point = Vec3::new(1_000.0, -250.0, 40.0);
        let result = TunnelPath::new(vec![point; 5]);
        assert_eq!(result.unwrap_err(), PathError::ZeroLength);
    }

    #[test]
    fn test_accepts_small_loop() {
        let path = TunnelPath::new(vec![Vec3::ZERO, Vec3::X * 0.01, Vec3::Z * 0.01]).unwrap();
        assert!(path.length() > 0.0);
    }

    #[test]
    fn test_starts_at_first_control_point() {
        let path = TunnelPath::wormhole();
        assert_close(path.point_at(0.0), path.control_points()[0], 1e-4);
    }

    #[test]
    fn test_periodicity() {
        let path = TunnelPath::wormhole();

        for i in 0..20 {
            let p = i as f32 * 0.05 + 0.013;
            let base = path.point_at(p);
            assert_close(base, path.point_at(p + 1.0), 1e-2);
            assert_close(base, path.point_at(p - 1.0), 1e-2);
            assert_close(base, path.point_at(p + 3.0), 1e-2);
        }
    }

    #[test]
    fn test_loop_is_closed() {
        let path = TunnelPath::wormhole();
        assert_close(path.point_at(0.0), path.point_at(0.99999), 0.01);
        assert_close(path.point_at(1.0), path.point_at(0.0), 1e-4);
    }

    #[test]
    fn test_arc_length_parameterization_is_even() {
        let path = TunnelPath::wormhole();
        let samples = path.sample_centerline(100);
        let expected = path.length() / 100.0;

        for pair in samples.windows(2) {
            let step = pair[0].distance(pair[1]);
            // хорда чуть короче дуги
            assert!(
                (step - expected).abs() < expected * 0.05,
                "step {} vs expected {}",
                step,
                expected
            );
        }
    }

    #[test]
    fn test_ring_stays_on_circle() {
        let path = TunnelPath::ring(20.0, 16).unwrap();

        for i in 0..50 {
            let point = path.point_at(i as f32 / 50.0);
            assert!(point.y.abs() < 1e-5);
            let radius = Vec2::new(point.x, point.z).length();
            assert!((radius - 20.0).abs() < 0.2, "radius {}", radius);
        }
    }

    #[test]
    fn test_wormhole_length_is_sane() {
        let path = TunnelPath::wormhole();
        assert!(path.length() > 25.0 && path.length() < 80.0, "length {}", path.length());
    }
}

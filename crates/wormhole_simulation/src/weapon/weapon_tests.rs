//! Tests for hit-scan resolution and fire_weapon.

#[cfg(test)]
mod tests {
    use bevy::ecs::event::Events;
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    use crate::economy::{Economy, GameState};
    use crate::feedback::{AudioCue, CueKind, SceneEvent};
    use crate::intersection::*;
    use crate::navigation::{CameraPose, CameraRig};
    use crate::path::TunnelPath;
    use crate::projectile::{Projectile, ProjectileState, BOLT_COLOR};
    use crate::settings::Settings;
    use crate::targets::{TargetField, TargetId};
    use crate::tuning::{SimulationTuning, TargetTuning, WeaponTuning};
    use crate::weapon::*;

    /// Всегда возвращает заранее заданный hit
    struct FixedIntersector(Option<RayHit>);

    impl RayIntersector for FixedIntersector {
        fn nearest_hit(&self, _: Vec3, _: Dir3, _: f32, _: &[HitCandidate]) -> Option<RayHit> {
            self.0
        }
    }

    const TARGET_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);
    const WALL_COLOR: Color = Color::srgb(0.0, 0.8, 1.0);

    fn target_hit(id: u32) -> RayHit {
        RayHit {
            point: Vec3::new(0.0, 0.0, -4.95),
            distance: 4.95,
            object: HitObject::Target(TargetId(id)),
            color: TARGET_COLOR,
        }
    }

    fn wall_hit() -> RayHit {
        RayHit {
            point: Vec3::new(0.0, 0.65, -3.0),
            distance: 3.07,
            object: HitObject::TunnelSurface,
            color: WALL_COLOR,
        }
    }

    fn candidates() -> Vec<HitCandidate> {
        vec![
            HitCandidate::Target {
                id: TargetId(3),
                position: Vec3::new(0.0, 0.0, -5.0),
                rotation: Vec3::ZERO,
                half_extent: 0.05,
                color: TARGET_COLOR,
            },
            HitCandidate::TunnelSurface,
        ]
    }

    #[test]
    fn test_target_hit_uses_target_position() {
        let shot = resolve_shot(
            Vec3::ZERO,
            Vec3::NEG_Z,
            Vec3::new(0.0, 0.0, -1.0),
            &candidates(),
            &FixedIntersector(Some(target_hit(3))),
            &WeaponTuning::default(),
        );

        assert_eq!(shot.hit_target(), Some(TargetId(3)));
        assert_eq!(shot.impact.point, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(shot.impact.color, TARGET_COLOR);
        assert_eq!(shot.impact.target, Some(TargetId(3)));
    }

    #[test]
    fn test_wall_hit_uses_surface_point() {
        let shot = resolve_shot(
            Vec3::ZERO,
            Vec3::NEG_Z,
            Vec3::new(0.0, 0.2, -1.0),
            &candidates(),
            &FixedIntersector(Some(wall_hit())),
            &WeaponTuning::default(),
        );

        assert_eq!(shot.hit, Some(HitObject::TunnelSurface));
        assert_eq!(shot.hit_target(), None);
        assert_eq!(shot.impact.point, Vec3::new(0.0, 0.65, -3.0));
        assert_eq!(shot.impact.color, WALL_COLOR);
    }

    #[test]
    fn test_miss_falls_back_to_max_range() {
        let tuning = WeaponTuning::default();
        let shot = resolve_shot(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::NEG_Z,
            Vec3::new(1.0, 0.0, -1.0),
            &candidates(),
            &FixedIntersector(None),
            &tuning,
        );

        assert_eq!(shot.hit, None);
        assert_eq!(shot.impact.point, Vec3::new(1.0, 0.0, -tuning.max_range));
        assert_eq!(shot.impact.color, BOLT_COLOR);
        assert_eq!(shot.impact.target, None);
    }

    #[test]
    fn test_degenerate_ray_uses_camera_forward() {
        assert_eq!(shot_direction(Vec3::ONE, Vec3::ONE, Vec3::X), Dir3::X);
        assert_eq!(shot_direction(Vec3::ONE, Vec3::ONE, Vec3::ZERO), Dir3::NEG_Z);
        assert_eq!(shot_direction(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0), Vec3::X), Dir3::Y);
    }

    /// World с running сессией и заданным intersector
    fn running_world(hit: Option<RayHit>) -> World {
        let mut world = World::new();

        let path = TunnelPath::ring(20.0, 16).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        world.insert_resource(TargetField::place_targets(&path, &TargetTuning::default(), &mut rng));
        world.insert_resource(GameState::from_settings(&Settings::default()));
        world.insert_resource(Raycaster(Arc::new(FixedIntersector(hit))));
        world.insert_resource(SimulationTuning::default());
        world.insert_resource(CameraRig {
            pose: CameraPose {
                position: Vec3::ZERO,
                look_at: Vec3::NEG_Z,
            },
            parameter: 0.0,
        });
        world.init_resource::<Events<AudioCue>>();
        world.init_resource::<Events<SceneEvent>>();
        world
    }

    fn audio_cues(world: &World) -> Vec<CueKind> {
        let events = world.resource::<Events<AudioCue>>();
        let mut cursor = events.get_cursor();
        cursor.read(events).map(|cue| cue.cue).collect()
    }

    fn projectiles(world: &mut World) -> Vec<Projectile> {
        let mut query = world.query::<&Projectile>();
        query.iter(world).cloned().collect()
    }

    #[test]
    fn test_fire_on_target_rewards_at_fire_time() {
        let mut world = running_world(Some(target_hit(3)));

        let entity = fire_weapon(&mut world, Vec3::new(0.0, 0.0, -1.0));
        assert!(entity.is_some());

        let state = world.resource::<GameState>();
        assert_eq!(state.ammo(), 10);
        assert_eq!(state.score(), 100);

        // Цель ещё live, но уже claimed
        let field = world.resource::<TargetField>();
        assert!(field.contains(TargetId(3)));
        assert!(field.is_claimed(TargetId(3)));

        let fired = projectiles(&mut world);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].state, ProjectileState::Traveling);
        assert_eq!(fired[0].impact.target, Some(TargetId(3)));
        assert!((fired[0].speed - 0.5).abs() < 1e-6);

        assert_eq!(audio_cues(&world), vec![CueKind::LaserFire, CueKind::TargetDestroyed]);
    }

    #[test]
    fn test_fire_on_wall_only_spends_ammo() {
        let mut world = running_world(Some(wall_hit()));

        assert!(fire_weapon(&mut world, Vec3::new(0.0, 0.2, -1.0)).is_some());

        let state = world.resource::<GameState>();
        assert_eq!(state.ammo(), 9);
        assert_eq!(state.score(), 0);
        assert_eq!(audio_cues(&world), vec![CueKind::LaserFire]);
        assert_eq!(projectiles(&mut world)[0].impact.color, WALL_COLOR);
    }

    #[test]
    fn test_projectile_speed_scales_with_difficulty() {
        let mut world = running_world(Some(wall_hit()));
        world.resource_mut::<GameState>().difficulty = 3.0;

        fire_weapon(&mut world, Vec3::new(0.0, 0.2, -1.0));
        assert!((projectiles(&mut world)[0].speed - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_fire_without_ammo_is_noop() {
        let mut world = running_world(Some(target_hit(3)));
        world.resource_mut::<GameState>().economy = Economy::new(0);

        assert!(fire_weapon(&mut world, Vec3::new(0.0, 0.0, -1.0)).is_none());

        let state = world.resource::<GameState>();
        assert_eq!(state.ammo(), 0);
        assert_eq!(state.score(), 0);
        assert!(!world.resource::<TargetField>().is_claimed(TargetId(3)));
        assert!(projectiles(&mut world).is_empty());
        assert!(audio_cues(&world).is_empty());
    }

    #[test]
    fn test_fire_while_paused_is_noop() {
        let mut world = running_world(Some(target_hit(3)));
        world.resource_mut::<GameState>().is_paused = true;

        assert!(fire_weapon(&mut world, Vec3::new(0.0, 0.0, -1.0)).is_none());
        assert_eq!(world.resource::<GameState>().ammo(), 10);
        assert!(projectiles(&mut world).is_empty());
    }

    #[test]
    fn test_fire_before_start_is_noop() {
        let mut world = running_world(Some(target_hit(3)));
        world.insert_resource(GameState::uninitialized());

        assert!(fire_weapon(&mut world, Vec3::new(0.0, 0.0, -1.0)).is_none());
        assert!(projectiles(&mut world).is_empty());
    }

    #[test]
    fn test_last_round_on_target_keeps_one_round() {
        let mut world = running_world(Some(target_hit(3)));
        world.resource_mut::<GameState>().economy = Economy::new(1);

        fire_weapon(&mut world, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(world.resource::<GameState>().ammo(), 1);
    }
}

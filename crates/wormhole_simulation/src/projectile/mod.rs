//! Projectile module (косметический полёт выстрела + взрыв)
//!
//! Содержит:
//! - Projectile (component, state machine Traveling → Exploding → Expired)
//! - ProjectileImpacted (event, триггер удаления цели)
//! - Systems: advance_projectiles, remove_impacted_targets, sweep_expired_projectiles
//!
//! Live set = все entities с Projectile. Despawn освобождает слот, Entity
//! generation защищает от устаревших ссылок у рендера.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

pub use components::*;
pub use events::*;

use crate::session::{session_running, SimulationSet};
use crate::targets::TargetRemoved;

/// Projectile Plugin
///
/// Порядок внутри tick:
/// 1. advance_projectiles (SimulationSet::Projectiles)
/// 2. remove_impacted_targets (SimulationSet::Projectiles, после шага)
/// 3. sweep_expired_projectiles (SimulationSet::Cleanup)
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ProjectileImpacted>().add_event::<TargetRemoved>();

        app.add_systems(
            Update,
            (
                (systems::advance_projectiles, systems::remove_impacted_targets)
                    .chain()
                    .in_set(SimulationSet::Projectiles),
                systems::sweep_expired_projectiles.in_set(SimulationSet::Cleanup),
            )
                .run_if(session_running),
        );
    }
}

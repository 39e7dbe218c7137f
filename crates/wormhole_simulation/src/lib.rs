//! WORMHOLE Simulation Core
//!
//! Headless gameplay ядро tunnel shooter'а на Bevy 0.16 ECS:
//! камера едет по замкнутому туннелю, игрок стреляет hit-scan'ом по целям,
//! выстрелы летят к заранее вычисленной точке и взрываются.
//!
//! Рендер, звук, UI и хранилище настроек являются внешними collaborators,
//! core общается с ними через `Session` (события + accessors).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod economy;
pub mod feedback;
pub mod intersection;
pub mod logger;
pub mod navigation;
pub mod path;
pub mod projectile;
pub mod session;
pub mod settings;
pub mod targets;
pub mod tuning;
pub mod weapon;

// Re-export основных типов
pub use economy::{Economy, GameState, SessionPhase};
pub use feedback::{AudioCue, CueKind, FeedbackPlugin, SceneEvent};
pub use intersection::{HitCandidate, HitObject, RayHit, RayIntersector, Raycaster, TunnelIntersector};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use navigation::{CameraPose, CameraRig, Crosshair, NavigationPlugin, PathNavigator, PointerInput};
pub use path::{PathError, PathSampler, TunnelPath};
pub use projectile::{Impact, Projectile, ProjectileImpacted, ProjectilePlugin, ProjectileState, ProjectileStep};
pub use session::{HudSnapshot, InputEvent, Session, SessionClock, SessionPlugin, SimulationSet};
pub use settings::{JsonSettingsStore, MemorySettingsStore, Settings, SettingsError, SettingsStore};
pub use targets::{Target, TargetField, TargetId, TargetRemoved};
pub use tuning::{SimulationTuning, StepTiming};
pub use weapon::{fire_weapon, resolve_shot, ShotResolution};

/// Seed по умолчанию (если host не задал свой)
pub const DEFAULT_SEED: u64 = 42;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app.add_plugins((FeedbackPlugin, SessionPlugin, NavigationPlugin, ProjectilePlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Tick'и гонит host через `App::update()` (Session::tick), поэтому
/// системы живут в Update, а не в FixedUpdate.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot состояния сессии для сравнения детерминизма
///
/// GameState + камера + live targets + projectiles (по Entity index),
/// сериализованные через Debug.
pub fn session_snapshot(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    if let Some(state) = world.get_resource::<GameState>() {
        snapshot.extend_from_slice(format!("{:?}", state).as_bytes());
    }
    if let Some(rig) = world.get_resource::<CameraRig>() {
        snapshot.extend_from_slice(format!("{:?}", rig).as_bytes());
    }
    if let Some(field) = world.get_resource::<TargetField>() {
        for target in field.live_targets() {
            snapshot.extend_from_slice(format!("{:?}", target).as_bytes());
        }
    }

    let mut query = world.query::<(Entity, &Projectile)>();
    let mut projectiles: Vec<_> = query.iter(world).collect();
    projectiles.sort_by_key(|(entity, _)| entity.index());

    for (entity, projectile) in projectiles {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", projectile).as_bytes());
    }

    snapshot
}

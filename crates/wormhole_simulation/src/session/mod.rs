//! Session domain — оркестрация одной игровой сессии
//!
//! Содержит:
//! - SessionClock / FrameInput (host timestamps → active time)
//! - SimulationSet (порядок фаз внутри tick)
//! - begin_session / end_session (exclusive lifecycle над World)
//! - Session (facade для host'а: tick, fire, pause, quit, HUD)
//!
//! Tick = одно `App::update()` в schedule Update:
//! Clock → Navigation → Projectiles → Cleanup. Всё кроме Clock пропускается,
//! пока сессия не running (пауза / до start / после quit).

use bevy::prelude::*;

pub mod clock;
pub mod controller;
pub mod lifecycle;

pub use clock::{advance_session_clock, FrameInput, SessionClock};
pub use controller::{HudSnapshot, InputEvent, Session};
pub use lifecycle::{begin_session, end_session};

use crate::economy::GameState;

/// Фазы tick'а (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Clock,
    Navigation,
    Projectiles,
    Cleanup,
}

/// Run condition: сессия запущена и не на паузе
pub fn session_running(state: Option<Res<GameState>>) -> bool {
    state.is_some_and(|state| state.is_running())
}

/// Session Plugin: базовые resources + clock
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameState>()
            .init_resource::<FrameInput>()
            .init_resource::<SessionClock>()
            .init_resource::<crate::targets::TargetField>()
            .init_resource::<crate::tuning::SimulationTuning>();

        app.configure_sets(
            Update,
            (
                SimulationSet::Clock,
                SimulationSet::Navigation,
                SimulationSet::Projectiles,
                SimulationSet::Cleanup,
            )
                .chain(),
        );

        // Clock идёт всегда: baseline должен обновляться и на паузе
        app.add_systems(Update, advance_session_clock.in_set(SimulationSet::Clock));
    }
}

//! Ammo/score bookkeeping и GameState сессии
//!
//! Инварианты:
//! - ammo ≥ 0 (u32 + decrement только при ammo > 0)
//! - score монотонно не убывает в пределах сессии

use bevy::prelude::*;
use serde::Serialize;

use crate::settings::Settings;

/// Ammo + score counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Economy {
    ammo: u32,
    score: u32,
}

impl Economy {
    pub fn new(starting_ammo: u32) -> Self {
        Self {
            ammo: starting_ammo,
            score: 0,
        }
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    /// Spend one round. Returns false (and changes nothing) when empty.
    pub fn decrement_ammo(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub fn increment_ammo(&mut self) {
        self.ammo = self.ammo.saturating_add(1);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn reset(&mut self, starting_ammo: u32) {
        *self = Self::new(starting_ammo);
    }
}

/// Фаза сессии
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// До start() и после quit()
    #[default]
    Uninitialized,
    Running,
}

/// Mutable aggregate сессии (владелец: Session / ECS world)
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameState {
    pub economy: Economy,
    pub is_paused: bool,
    /// Скорость навигации и projectiles (> 0, проверено в Settings::validate)
    pub difficulty: f32,
    /// Только пробрасывается в audio cues
    pub volume: f32,
    pub starting_ammo: u32,
    pub phase: SessionPhase,
}

impl Default for GameState {
    fn default() -> Self {
        Self::uninitialized()
    }
}

impl GameState {
    pub fn uninitialized() -> Self {
        let defaults = Settings::default();
        Self {
            economy: Economy::default(),
            is_paused: false,
            difficulty: defaults.difficulty,
            volume: defaults.volume,
            starting_ammo: defaults.starting_ammo,
            phase: SessionPhase::Uninitialized,
        }
    }

    /// Fresh running state from (already validated) settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            economy: Economy::new(settings.starting_ammo),
            is_paused: false,
            difficulty: settings.difficulty,
            volume: settings.volume,
            starting_ammo: settings.starting_ammo,
            phase: SessionPhase::Running,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Running and not paused: логика тика выполняется
    pub fn is_running(&self) -> bool {
        self.is_initialized() && !self.is_paused
    }

    /// WeaponSystem precondition
    pub fn can_fire(&self) -> bool {
        self.is_running() && self.economy.has_ammo()
    }

    pub fn ammo(&self) -> u32 {
        self.economy.ammo()
    }

    pub fn score(&self) -> u32 {
        self.economy.score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_economy_starts_with_ammo() {
        let economy = Economy::new(10);
        assert_eq!(economy.ammo(), 10);
        assert_eq!(economy.score(), 0);
    }

    #[test]
    fn test_decrement_never_goes_negative() {
        let mut economy = Economy::new(2);

        assert!(economy.decrement_ammo());
        assert!(economy.decrement_ammo());
        assert!(!economy.decrement_ammo());
        assert_eq!(economy.ammo(), 0);

        // Повторные попытки ничего не меняют
        assert!(!economy.decrement_ammo());
        assert_eq!(economy.ammo(), 0);
    }

    #[test]
    fn test_score_only_grows() {
        let mut economy = Economy::new(0);
        economy.add_score(100);
        economy.add_score(0);
        economy.add_score(100);
        assert_eq!(economy.score(), 200);

        economy.add_score(u32::MAX);
        assert_eq!(economy.score(), u32::MAX);
    }

    #[test]
    fn test_reset_restores_starting_ammo() {
        let mut economy = Economy::new(5);
        economy.decrement_ammo();
        economy.add_score(300);

        economy.reset(7);
        assert_eq!(economy, Economy::new(7));
    }

    #[test]
    fn test_game_state_gates() {
        let mut state = GameState::from_settings(&Settings::default());
        assert!(state.is_running());
        assert!(state.can_fire());

        state.is_paused = true;
        assert!(!state.is_running());
        assert!(!state.can_fire());

        state.is_paused = false;
        state.economy = Economy::new(0);
        assert!(state.is_running());
        assert!(!state.can_fire());
    }

    #[test]
    fn test_uninitialized_state_cannot_fire() {
        let state = GameState::uninitialized();
        assert!(!state.is_initialized());
        assert!(!state.can_fire());
        assert_eq!(state.ammo(), 0);
        assert_eq!(state.score(), 0);
    }
}

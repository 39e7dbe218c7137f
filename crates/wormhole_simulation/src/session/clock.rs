//! Session clock: host timestamps → frame delta + active time.

use bevy::prelude::*;

use crate::economy::GameState;

/// Latest host timestamp (ms), written by `Session::tick` before each update
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub elapsed_ms: f64,
}

/// Время сессии
///
/// Первый tick после start задаёт baseline (delta = 0). Active time растёт
/// только пока сессия running, поэтому пауза замораживает параметр пути.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionClock {
    last_elapsed_ms: Option<f64>,
    frame_delta_ms: f64,
    active_ms: f64,
}

impl SessionClock {
    /// Feed a host timestamp; `running` decides whether active time advances.
    pub fn advance(&mut self, elapsed_ms: f64, running: bool) {
        let delta = match self.last_elapsed_ms {
            // Часы хоста не должны идти назад, но если идут, стоим на месте
            Some(last) if elapsed_ms.is_finite() => (elapsed_ms - last).max(0.0),
            _ => 0.0,
        };

        if elapsed_ms.is_finite() {
            self.last_elapsed_ms = Some(elapsed_ms);
        }
        self.frame_delta_ms = delta;
        if running {
            self.active_ms += delta;
        }
    }

    pub fn frame_delta_ms(&self) -> f64 {
        self.frame_delta_ms
    }

    /// Running time since session start (pauses excluded)
    pub fn active_ms(&self) -> f64 {
        self.active_ms
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// System: FrameInput → SessionClock (runs every tick, paused or not)
pub fn advance_session_clock(
    input: Res<FrameInput>,
    state: Res<GameState>,
    mut clock: ResMut<SessionClock>,
) {
    clock.advance(input.elapsed_ms, state.is_running());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_sets_baseline() {
        let mut clock = SessionClock::default();
        clock.advance(5_000.0, true);

        assert_eq!(clock.frame_delta_ms(), 0.0);
        assert_eq!(clock.active_ms(), 0.0);

        clock.advance(5_016.0, true);
        assert_eq!(clock.frame_delta_ms(), 16.0);
        assert_eq!(clock.active_ms(), 16.0);
    }

    #[test]
    fn test_paused_ticks_do_not_accumulate() {
        let mut clock = SessionClock::default();
        clock.advance(0.0, true);
        clock.advance(100.0, true);
        clock.advance(900.0, false);
        clock.advance(1_000.0, true);

        // 100 до паузы + 100 после
        assert_eq!(clock.active_ms(), 200.0);
    }

    #[test]
    fn test_backwards_time_is_ignored() {
        let mut clock = SessionClock::default();
        clock.advance(1_000.0, true);
        clock.advance(500.0, true);

        assert_eq!(clock.frame_delta_ms(), 0.0);
        assert_eq!(clock.active_ms(), 0.0);
    }

    #[test]
    fn test_non_finite_timestamp_is_skipped() {
        let mut clock = SessionClock::default();
        clock.advance(0.0, true);
        clock.advance(f64::NAN, true);
        clock.advance(50.0, true);

        assert_eq!(clock.active_ms(), 50.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut clock = SessionClock::default();
        clock.advance(0.0, true);
        clock.advance(10.0, true);
        clock.reset();

        assert_eq!(clock, SessionClock::default());
    }
}

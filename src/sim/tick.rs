//! Fixed timestep state machine driver
//!
//! The per-frame update accumulates real time and advances the state in
//! fixed 120 Hz steps, so the spin tween and the reveal/announce one-shots
//! are deterministic for a given seed and input sequence.

use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick
///
/// One-shot flags; the caller clears them after they have been processed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// "Start Game" tapped
    pub start: bool,
    /// Wheel clicked/tapped
    pub spin: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Start => {
            if input.start {
                state.phase = GamePhase::Playing;
                log::info!("Start tapped; wheel is live");
            }
        }
        GamePhase::Playing => {
            // Re-clicking mid-spin replaces the spin (last tween wins) and
            // cancels the pending reveal/announce
            if input.spin {
                state.start_spin();
            }
            advance_spin(state, dt);
        }
        GamePhase::Revealing => {
            // Overlay is up; the wheel is no longer clickable, only the
            // pending announcement advances
            advance_spin(state, dt);
        }
        GamePhase::Ended => {}
    }
}

/// Drive the rotation tween and the two scheduled one-shots
fn advance_spin(state: &mut GameState, dt: f32) {
    let Some(spin) = state.spin.as_mut() else {
        return;
    };

    state.rotation = spin.tween.advance(dt);

    if spin.reveal_ticks > 0 {
        spin.reveal_ticks -= 1;
        if spin.reveal_ticks == 0 {
            state.phase = GamePhase::Revealing;
            log::info!("Wheel settled; revealing prize labels");
        }
    }

    if spin.announce_ticks > 0 {
        spin.announce_ticks -= 1;
        if spin.announce_ticks == 0 {
            let winner = spin.prize_index;
            state.winner = Some(winner);
            state.phase = GamePhase::Ended;
            state.spin = None;
            log::info!("Game over, won '{}'", state.prizes.label(winner));
        }
    }
}

/// Run `n` ticks with the same input (convenience for tests and the demo)
pub fn run_ticks(state: &mut GameState, input: &TickInput, n: u32) {
    let mut input = *input;
    for _ in 0..n {
        tick(state, &input, SIM_DT);
        // One-shot inputs apply to the first tick only
        input.start = false;
        input.spin = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::target_rotation_degrees;

    fn spin_input() -> TickInput {
        TickInput {
            spin: true,
            ..Default::default()
        }
    }

    fn start_playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    #[test]
    fn test_start_transition() {
        let mut state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Start);

        // No input: stays on the start screen
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Start);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);

        // Second trigger is a no-op
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.spin.is_none());
    }

    #[test]
    fn test_spin_reveals_then_announces() {
        let mut state = start_playing(99);
        tick(&mut state, &spin_input(), SIM_DT);
        let prize_index = state.spin.as_ref().unwrap().prize_index;

        // Just before the 4 s reveal
        run_ticks(&mut state, &TickInput::default(), REVEAL_DELAY_TICKS - 2);
        assert_eq!(state.phase, GamePhase::Playing);

        run_ticks(&mut state, &TickInput::default(), 1);
        assert_eq!(state.phase, GamePhase::Revealing);
        assert!(state.winner.is_none());

        // Announcement lands one second later
        run_ticks(
            &mut state,
            &TickInput::default(),
            ANNOUNCE_DELAY_TICKS - REVEAL_DELAY_TICKS,
        );
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.winner, Some(prize_index));
        assert!(state.spin.is_none());
    }

    #[test]
    fn test_wheel_settles_on_stop_angle() {
        let mut state = start_playing(7);
        tick(&mut state, &spin_input(), SIM_DT);
        let spin = state.spin.as_ref().unwrap();
        let expected =
            target_rotation_degrees(state.prizes.seg_angle(), spin.prize_index).to_radians();

        run_ticks(&mut state, &TickInput::default(), ANNOUNCE_DELAY_TICKS - 1);
        assert_eq!(state.phase, GamePhase::Ended);
        assert!(
            (state.rotation - expected).abs() < 1e-3,
            "settled at {} expected {}",
            state.rotation,
            expected
        );

        // Mod 360 the settled rotation is exactly the stop angle
        let stop_deg = crate::wrap_degrees(state.rotation.to_degrees());
        let spin_stop =
            crate::wrap_degrees(state.prizes.seg_angle() * state.winner.unwrap() as f32);
        assert!((stop_deg - spin_stop).abs() < 1e-2);
    }

    #[test]
    fn test_respin_cancels_pending_timers() {
        let mut state = start_playing(5);
        tick(&mut state, &spin_input(), SIM_DT);

        // Re-click two seconds in, well inside the 4 s window
        run_ticks(&mut state, &TickInput::default(), 2 * TICKS_PER_SEC);
        assert_eq!(state.phase, GamePhase::Playing);
        tick(&mut state, &spin_input(), SIM_DT);
        let second_index = state.spin.as_ref().unwrap().prize_index;

        // Run well past 4 s after the FIRST click: nothing fires, because
        // the first reveal was cancelled by the re-spin
        run_ticks(&mut state, &TickInput::default(), 3 * TICKS_PER_SEC - 100);
        assert_eq!(state.phase, GamePhase::Playing);

        // The second spin's reveal and announcement each fire exactly once
        run_ticks(&mut state, &TickInput::default(), ANNOUNCE_DELAY_TICKS);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.winner, Some(second_index));
    }

    #[test]
    fn test_announced_winner_matches_stop_segment() {
        let mut state = start_playing(1234);
        tick(&mut state, &spin_input(), SIM_DT);
        let prize_index = state.spin.as_ref().unwrap().prize_index;
        let expected_label = state.prizes.label(prize_index).to_string();

        run_ticks(&mut state, &TickInput::default(), ANNOUNCE_DELAY_TICKS);
        assert_eq!(state.winning_label(), Some(expected_label.as_str()));
    }

    #[test]
    fn test_no_spin_input_after_reveal() {
        let mut state = start_playing(3);
        tick(&mut state, &spin_input(), SIM_DT);
        run_ticks(&mut state, &TickInput::default(), REVEAL_DELAY_TICKS);
        assert_eq!(state.phase, GamePhase::Revealing);

        // Click during the reveal window: ignored, announcement unaffected
        let announce_before = state.spin.as_ref().unwrap().announce_ticks;
        tick(&mut state, &spin_input(), SIM_DT);
        let spin = state.spin.as_ref().unwrap();
        assert_eq!(spin.announce_ticks, announce_before - 1);

        run_ticks(&mut state, &TickInput::default(), announce_before);
        assert_eq!(state.phase, GamePhase::Ended);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(2024);
        let mut b = GameState::new(2024);

        let script = [
            TickInput {
                start: true,
                ..Default::default()
            },
            TickInput {
                spin: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                spin: true,
                ..Default::default()
            },
        ];
        for input in &script {
            tick(&mut a, input, SIM_DT);
            tick(&mut b, input, SIM_DT);
        }
        run_ticks(&mut a, &TickInput::default(), ANNOUNCE_DELAY_TICKS);
        run_ticks(&mut b, &TickInput::default(), ANNOUNCE_DELAY_TICKS);

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.winner, b.winner);
        assert!((a.rotation - b.rotation).abs() < 1e-6);
    }
}

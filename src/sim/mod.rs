//! Deterministic game core
//!
//! All session logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

pub use state::{GamePhase, GameState, PrizeTable, Spin, PRIZE_LABELS, target_rotation_degrees};
pub use tick::{TickInput, run_ticks, tick};

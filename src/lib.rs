//! Lucky Wheel - A spin-the-wheel prize game
//!
//! Core modules:
//! - `sim`: Deterministic game state machine (prize table, spin, timers)
//! - `scene`: Layers, layout, and phase-driven visibility
//! - `tween`: Property animation with easing curves
//! - `assets`: Named asset manifest and readiness gate
//! - `renderer`: WebGPU SDF rendering pipeline

pub mod assets;
pub mod error;
pub mod renderer;
pub mod scene;
pub mod sim;
pub mod tween;

pub use error::GameError;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Simulation rate in ticks per second
    pub const TICKS_PER_SEC: u32 = 120;

    /// Full wheel revolutions before settling on the stop angle
    pub const FULL_SPIN_TURNS: u32 = 10;
    /// Spin animation duration in seconds
    pub const SPIN_DURATION_SECS: f32 = 4.0;
    /// Delay from spin start until the jackpot overlay is revealed
    pub const REVEAL_DELAY_TICKS: u32 = 4 * TICKS_PER_SEC;
    /// Delay from spin start until the win announcement
    pub const ANNOUNCE_DELAY_TICKS: u32 = 5 * TICKS_PER_SEC;

    /// Arrow sprite scale factor
    pub const ARROW_SCALE: f32 = 0.5;
}

/// Normalized angle to [0, 360) degrees
#[inline]
pub fn wrap_degrees(mut deg: f32) -> f32 {
    deg %= 360.0;
    if deg < 0.0 {
        deg += 360.0;
    }
    deg
}

//! Game state and core types
//!
//! Everything the state machine needs lives here. The RNG is seeded and
//! owned by the state, so a full session (shuffle plus every prize draw)
//! replays exactly for a given seed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::error::GameError;
use crate::tween::{Easing, Tween};

/// Stock prize labels, in pre-shuffle order
pub const PRIZE_LABELS: [&str; 7] = ["Zero :(", "100", "200", "500", "1000", "2000", "JACKPOT!"];

/// Current phase of the session
///
/// One authoritative field instead of per-layer visibility booleans; the
/// scene derives what is attached and visible from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen showing, wheel hidden
    Start,
    /// Wheel showing and clickable (a spin may be in flight)
    Playing,
    /// Spin settled, jackpot overlay revealed, announcement pending
    Revealing,
    /// Win announced, session over until reload
    Ended,
}

/// The shuffled prize table
///
/// Shuffled once at construction; the resulting order is the authoritative
/// segment-index-to-label mapping for the whole session.
#[derive(Debug, Clone)]
pub struct PrizeTable {
    labels: Vec<String>,
}

impl PrizeTable {
    /// Build a table from arbitrary labels, shuffling in place
    pub fn from_labels<S: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        rng: &mut Pcg32,
    ) -> Result<Self, GameError> {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(GameError::EmptyPrizeList);
        }
        // Fisher-Yates via rand; every permutation equally likely
        labels.shuffle(rng);
        Ok(Self { labels })
    }

    /// The stock 7-prize table
    pub fn stock(rng: &mut Pcg32) -> Self {
        Self::from_labels(PRIZE_LABELS, rng).expect("stock prize list is non-empty")
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Angular width of one wheel segment, in degrees
    pub fn seg_angle(&self) -> f32 {
        360.0 / self.labels.len() as f32
    }

    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Target rotation for a spin, in degrees
///
/// Absolute value independent of the wheel's prior rotation: ten full
/// forward turns plus the stop angle for the drawn segment.
pub fn target_rotation_degrees(seg_angle: f32, prize_num: usize) -> f32 {
    FULL_SPIN_TURNS as f32 * 360.0 + seg_angle * prize_num as f32
}

/// An in-flight spin: the rotation tween plus the two scheduled one-shots
///
/// Replacing the whole record on a re-spin cancels the pending reveal and
/// announcement, so neither can fire twice per spin.
#[derive(Debug, Clone)]
pub struct Spin {
    /// Index into the shuffled prize table the wheel will stop on
    pub prize_index: usize,
    /// Rotation animation (radians)
    pub tween: Tween,
    /// Ticks until the jackpot overlay is revealed
    pub reveal_ticks: u32,
    /// Ticks until the win announcement
    pub announce_ticks: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Seeded RNG (shuffle at construction, one draw per spin)
    rng: Pcg32,
    /// Shuffled prize table
    pub prizes: PrizeTable,
    /// Current phase
    pub phase: GamePhase,
    /// Wheel rotation in radians
    pub rotation: f32,
    /// Active spin, if any
    pub spin: Option<Spin>,
    /// Winning prize index, set when the announcement fires
    pub winner: Option<usize>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// True once assets finished loading and the scene was built
    pub initialized: bool,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let prizes = PrizeTable::stock(&mut rng);
        log::info!("Prize order for this session: {:?}", prizes.labels());

        Self {
            seed,
            rng,
            prizes,
            phase: GamePhase::Start,
            rotation: 0.0,
            spin: None,
            winner: None,
            time_ticks: 0,
            initialized: false,
        }
    }

    /// Create a session with a custom prize list (generic n-segment wheel)
    pub fn with_labels<S: Into<String>>(
        seed: u64,
        labels: impl IntoIterator<Item = S>,
    ) -> Result<Self, GameError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let prizes = PrizeTable::from_labels(labels, &mut rng)?;
        Ok(Self {
            seed,
            rng,
            prizes,
            phase: GamePhase::Start,
            rotation: 0.0,
            spin: None,
            winner: None,
            time_ticks: 0,
            initialized: false,
        })
    }

    /// Mark assets loaded and the scene built. Idempotent.
    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Begin a spin: draw a segment, retarget the rotation tween, and
    /// schedule the reveal and announcement one-shots. Any spin already in
    /// flight is replaced wholesale, cancelling its pending timers.
    pub fn start_spin(&mut self) {
        let prize_index = self.rng.random_range(0..self.prizes.len());
        let target_deg = target_rotation_degrees(self.prizes.seg_angle(), prize_index);

        if self.spin.is_some() {
            log::info!("Re-spin while in flight; previous timers cancelled");
        }
        log::info!(
            "Spinning to segment {} ('{}'), target {:.1} deg",
            prize_index,
            self.prizes.label(prize_index),
            target_deg
        );

        self.spin = Some(Spin {
            prize_index,
            tween: Tween::new(
                self.rotation,
                target_deg.to_radians(),
                SPIN_DURATION_SECS,
                Easing::CubicOut,
            ),
            reveal_ticks: REVEAL_DELAY_TICKS,
            announce_ticks: ANNOUNCE_DELAY_TICKS,
        });
    }

    /// Announced prize label, once the win announcement has fired
    pub fn winning_label(&self) -> Option<&str> {
        self.winner.map(|i| self.prizes.label(i))
    }
}

//! # Opening hand land count simulation
//!
//! Estimates the distribution of lands in a 7 card opening hand by repeated random draws
//! without replacement.
use crate::card::Card;
use crate::deck::Deck;
use rand::prelude::*;
use rand::rngs::SmallRng;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

pub const OPENING_HAND_SIZE: usize = 7;

/// Largest pool, in physical cards, a request may draw from
pub const MAX_POOL_SIZE: usize = 100_000;

// How many trials run between checks of the abort flag
const ABORT_POLL_INTERVAL: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
  /// Draw from the library plus the commander rather than the library alone
  pub include_commander_in_pool: bool,
  /// Seed for reproducible runs, seeded from entropy when None
  pub seed: Option<u64>,
}

impl Default for SimulationConfig {
  fn default() -> Self {
    Self {
      include_commander_in_pool: true,
      seed: None,
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationRequest {
  pub deck_cards: Vec<Card>,
  pub trial_count: usize,
  pub target_land_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
  pub trial_count: usize,
  pub target_land_count: usize,
  /// Percentage of hands with at least `target_land_count` lands, rounded to 2 decimals
  pub success_rate: f64,
  /// Percentage of hands per land count 0..=7, each rounded to 2 decimals
  pub land_count_distribution: BTreeMap<usize, f64>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationError {
  #[error("Cannot simulate opening hands for an empty deck")]
  EmptyDeck,
  #[error("Trial count must be a positive integer, got {0}")]
  InvalidTrialCount(usize),
  #[error("Target land count must be between 0 and 7, got {0}")]
  TargetOutOfRange(usize),
  #[error("Deck of {0} cards is larger than the simulation limit of {}", MAX_POOL_SIZE)]
  PoolTooLarge(usize),
  #[error("A simulation is already in progress")]
  Busy,
  #[error("Malformed request: {0}")]
  MalformedRequest(String),
  #[error("Simulation worker unavailable: {0}")]
  WorkerUnavailable(String),
}

/// ErrorKind tells a caller whether to fix the input or simply retry
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  InvalidRequest,
  WorkerUnavailable,
}

/// The structured error shape handed to interactive callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
  pub error: String,
  pub kind: ErrorKind,
}

impl SimulationError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::WorkerUnavailable(_) => ErrorKind::WorkerUnavailable,
      _ => ErrorKind::InvalidRequest,
    }
  }
}

impl From<&SimulationError> for ErrorResponse {
  fn from(error: &SimulationError) -> Self {
    Self {
      error: error.to_string(),
      kind: error.kind(),
    }
  }
}

impl SimulationRequest {
  pub fn new(deck_cards: Vec<Card>, trial_count: usize, target_land_count: usize) -> Self {
    Self {
      deck_cards,
      trial_count,
      target_land_count,
    }
  }

  /// Builds a request drawing from `deck`, with the commander in the pool when configured
  pub fn from_deck(
    deck: &Deck,
    trial_count: usize,
    target_land_count: usize,
    config: &SimulationConfig,
  ) -> Self {
    Self::new(
      deck.pool(config.include_commander_in_pool),
      trial_count,
      target_land_count,
    )
  }

  /// Returns the number of physical cards in the pool
  pub fn pool_size(&self) -> usize {
    self
      .deck_cards
      .iter()
      .fold(0usize, |accum, c| accum.saturating_add(c.quantity))
  }

  pub fn validate(&self) -> Result<(), SimulationError> {
    if self.trial_count == 0 {
      return Err(SimulationError::InvalidTrialCount(self.trial_count));
    }
    if self.target_land_count > OPENING_HAND_SIZE {
      return Err(SimulationError::TargetOutOfRange(self.target_land_count));
    }
    let pool_size = self.pool_size();
    if pool_size == 0 {
      return Err(SimulationError::EmptyDeck);
    }
    if pool_size > MAX_POOL_SIZE {
      return Err(SimulationError::PoolTooLarge(pool_size));
    }
    Ok(())
  }
}

/// Expands cards into one land flag per physical copy.
/// Callers bound the pool first, see `SimulationRequest::validate`
pub fn land_flags(cards: &[Card]) -> Vec<bool> {
  let mut flags = Vec::new();
  for card in cards {
    let is_land = card.is_land();
    flags.extend(std::iter::repeat(is_land).take(card.quantity));
  }
  flags
}

pub(crate) fn rng_from_config(config: &SimulationConfig) -> SmallRng {
  match config.seed {
    Some(seed) => SmallRng::seed_from_u64(seed),
    None => SmallRng::from_entropy(),
  }
}

/// Runs one simulation request to completion on the calling thread
pub fn run_simulation(
  request: &SimulationRequest,
  config: &SimulationConfig,
) -> Result<SimulationResult, SimulationError> {
  let mut rng = rng_from_config(config);
  simulate(request, &mut rng, &AtomicBool::new(false))
}

/// Runs the trial loop, giving up with `WorkerUnavailable` once `abort` is set
pub(crate) fn simulate<R: Rng>(
  request: &SimulationRequest,
  rng: &mut R,
  abort: &AtomicBool,
) -> Result<SimulationResult, SimulationError> {
  request.validate()?;
  let mut pool = land_flags(&request.deck_cards);
  // Decks smaller than a hand draw every card
  let hand_size = std::cmp::min(OPENING_HAND_SIZE, pool.len());
  debug!(
    "Simulating {} opening hands of {} from a pool of {}",
    request.trial_count,
    hand_size,
    pool.len()
  );
  let mut histogram = [0usize; OPENING_HAND_SIZE + 1];
  for trial in 0..request.trial_count {
    if trial % ABORT_POLL_INTERVAL == 0 && abort.load(Ordering::Relaxed) {
      return Err(SimulationError::WorkerUnavailable(
        "simulation aborted by worker shutdown".to_string(),
      ));
    }
    // Every trial is an independent partial Fisher-Yates pass, so the pool does not
    // need to be restored between trials
    let (hand, _) = pool.partial_shuffle(rng, hand_size);
    let lands = hand.iter().filter(|is_land| **is_land).count();
    histogram[lands] += 1;
  }
  Ok(SimulationResult::from_histogram(
    &histogram,
    request.trial_count,
    request.target_land_count,
  ))
}

fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

impl SimulationResult {
  /// Builds the result from per land count hand tallies.
  /// Each bucket is rounded on its own, so the percentages may not sum to exactly 100
  pub fn from_histogram(histogram: &[usize], trial_count: usize, target_land_count: usize) -> Self {
    let percent = |count: usize| round2(100.0 * count as f64 / trial_count as f64);
    let successes = histogram.iter().skip(target_land_count).sum::<usize>();
    let land_count_distribution = (0..=OPENING_HAND_SIZE)
      .map(|lands| (lands, percent(histogram.get(lands).copied().unwrap_or(0))))
      .collect();
    Self {
      trial_count,
      target_land_count,
      success_rate: percent(successes),
      land_count_distribution,
    }
  }
}

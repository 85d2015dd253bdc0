//! # Deck statistics
//!
//! Folds every card of a deck (commander included) into the mana curve, type breakdown,
//! color sources, pip totals and functional role counts, then assigns a bracket.
//! All counts are weighted by card quantity.
use crate::bracket::{classify_bracket, BracketResult, BracketSignals};
use crate::card::{CardKind, ColorSourceCount, Pips};
use crate::classify::{classify, FunctionalRole, RoleSet};
use crate::deck::Deck;
use crate::rules::{name_key, Rules, DEFAULT_RULES};
use std::collections::{BTreeMap, HashSet};

/// ManaCurve counts non-land cards per converted mana cost, where the last bucket is 7+
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaCurve {
  pub counts: [usize; 8],
}

impl ManaCurve {
  pub const LABELS: [&'static str; 8] = ["0", "1", "2", "3", "4", "5", "6", "7+"];

  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, bucket: usize, quantity: usize) {
    let count = &mut self.counts[std::cmp::min(bucket, 7)];
    *count = count.saturating_add(quantity);
  }

  pub fn get(&self, bucket: usize) -> usize {
    self.counts[std::cmp::min(bucket, 7)]
  }

  pub fn total(&self) -> usize {
    self
      .counts
      .iter()
      .fold(0usize, |accum, n| accum.saturating_add(*n))
  }

  /// Returns (label, count) pairs in curve order
  pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
    Self::LABELS.iter().copied().zip(self.counts.iter().copied())
  }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalBuckets {
  pub ramp: usize,
  pub draw: usize,
  pub mass_land_destruction: usize,
  pub extra_turns: usize,
  pub tutors: usize,
  pub potential_combos: usize,
}

impl FunctionalBuckets {
  pub fn new() -> Self {
    Self::default()
  }

  /// Counts `quantity` copies toward every role in `roles`
  pub fn add(&mut self, roles: &RoleSet, quantity: usize) {
    for role in roles.roles() {
      let count = self.get_mut(role);
      *count = count.saturating_add(quantity);
    }
  }

  pub fn get(&self, role: FunctionalRole) -> usize {
    match role {
      FunctionalRole::Ramp => self.ramp,
      FunctionalRole::Draw => self.draw,
      FunctionalRole::MassLandDestruction => self.mass_land_destruction,
      FunctionalRole::ExtraTurn => self.extra_turns,
      FunctionalRole::Tutor => self.tutors,
      FunctionalRole::PotentialCombo => self.potential_combos,
    }
  }

  fn get_mut(&mut self, role: FunctionalRole) -> &mut usize {
    match role {
      FunctionalRole::Ramp => &mut self.ramp,
      FunctionalRole::Draw => &mut self.draw,
      FunctionalRole::MassLandDestruction => &mut self.mass_land_destruction,
      FunctionalRole::ExtraTurn => &mut self.extra_turns,
      FunctionalRole::Tutor => &mut self.tutors,
      FunctionalRole::PotentialCombo => &mut self.potential_combos,
    }
  }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDistribution {
  pub sources: ColorSourceCount,
  pub pips: Pips,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckAnalysis {
  pub deck_size: usize,
  pub land_count: usize,
  /// Average converted mana cost of the non-land cards
  pub average_cmc: f64,
  pub mana_curve: ManaCurve,
  pub color_distribution: ColorDistribution,
  pub type_breakdown: BTreeMap<CardKind, usize>,
  pub functional_buckets: FunctionalBuckets,
  pub bracket: BracketResult,
}

/// Analyzes a deck with the stock rules
pub fn analyze(deck: &Deck) -> DeckAnalysis {
  analyze_with_rules(deck, &DEFAULT_RULES)
}

pub fn analyze_with_rules(deck: &Deck, rules: &Rules) -> DeckAnalysis {
  let mut mana_curve = ManaCurve::new();
  let mut color_distribution = ColorDistribution::default();
  let mut type_breakdown: BTreeMap<CardKind, usize> =
    CardKind::PRIORITY.iter().map(|kind| (*kind, 0)).collect();
  let mut functional_buckets = FunctionalBuckets::new();
  let mut game_changers: Vec<String> = Vec::new();
  let mut seen_game_changers: HashSet<String> = HashSet::new();
  let mut deck_size: usize = 0;
  let mut land_count: usize = 0;
  let mut non_land_count: usize = 0;
  let mut non_land_cmc = 0.0;

  for card in deck.entries(true) {
    let quantity = card.quantity;
    let profile = classify(card, rules);
    deck_size = deck_size.saturating_add(quantity);
    if profile.is_land {
      land_count = land_count.saturating_add(quantity);
    } else {
      mana_curve.add(card.curve_bucket(), quantity);
      non_land_count = non_land_count.saturating_add(quantity);
      non_land_cmc += card.cmc as f64 * quantity as f64;
    }
    let kind_count = type_breakdown.entry(profile.kind).or_insert(0);
    *kind_count = kind_count.saturating_add(quantity);
    color_distribution
      .sources
      .count(&profile.produces, quantity);
    color_distribution.pips += profile.pips.scaled(quantity);
    functional_buckets.add(&profile.roles, quantity);
    // First spelling wins
    if profile.is_game_changer && seen_game_changers.insert(name_key(&card.name)) {
      game_changers.push(card.name.clone());
    }
  }

  let signals = BracketSignals {
    mass_land_destruction: functional_buckets.mass_land_destruction,
    extra_turns: functional_buckets.extra_turns,
    potential_combos: functional_buckets.potential_combos,
    tutors: functional_buckets.tutors,
    game_changers,
  };
  let bracket = classify_bracket(&signals, rules);
  let average_cmc = if non_land_count == 0 {
    0.0
  } else {
    non_land_cmc / non_land_count as f64
  };
  debug!(
    "Analyzed deck of {} cards ({} lands), bracket {}",
    deck_size, land_count, bracket.bracket
  );
  DeckAnalysis {
    deck_size,
    land_count,
    average_cmc,
    mana_curve,
    color_distribution,
    type_breakdown,
    functional_buckets,
    bracket,
  }
}

//! # Power brackets
//!
//! Assigns a deck one of five community power brackets from a handful of deck-level signals.
//! The brackets are checked in a fixed order and the first match wins; the order is part of
//! the definition, so bracket 5 is reached only by decks that fail every earlier test.
use crate::rules::Rules;

/// Bracket is a 1-5 power tier
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bracket {
  Exhibition = 1,
  Core = 2,
  Upgraded = 3,
  Optimized = 4,
  Cedh = 5,
}

impl Bracket {
  pub fn number(self) -> u8 {
    self as u8
  }

  pub fn name(self) -> &'static str {
    match self {
      Self::Exhibition => "Exhibition",
      Self::Core => "Core",
      Self::Upgraded => "Upgraded",
      Self::Optimized => "Optimized",
      Self::Cedh => "CEDH",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Self::Exhibition => {
        "Ultra-casual decks built around a theme, with no game changers, no mass land destruction, no extra turns, no combos and very few tutors."
      }
      Self::Core => {
        "Precon-level decks with no game changers, no mass land destruction, no extra turns, no combos and few tutors."
      }
      Self::Upgraded => {
        "Strong decks with up to three game changers and no mass land destruction or extra turns; tutors and late-game combos are allowed."
      }
      Self::Optimized => {
        "High-power decks with more than three game changers; anything goes short of a competitive tournament build."
      }
      Self::Cedh => "Competitive decks built to win as fast and consistently as possible.",
    }
  }
}

/// Thresholds used by the bracket decision list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketThresholds {
  pub exhibition_max_tutors: usize,
  pub core_max_tutors: usize,
  pub upgraded_max_game_changers: usize,
}

impl Default for BracketThresholds {
  fn default() -> Self {
    Self {
      exhibition_max_tutors: 2,
      core_max_tutors: 4,
      upgraded_max_game_changers: 3,
    }
  }
}

/// Deck-level inputs to bracket classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSignals {
  pub mass_land_destruction: usize,
  pub extra_turns: usize,
  pub potential_combos: usize,
  pub tutors: usize,
  /// Distinct game changer names in deck order
  pub game_changers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketResult {
  pub bracket: u8,
  pub name: String,
  pub description: String,
  pub game_changer_count: usize,
  pub tutor_count: usize,
  pub potential_combo_count: usize,
  pub no_mld: bool,
  pub no_extra_turns: bool,
  pub no_infinite_combo: bool,
  pub no_game_changers: bool,
  pub few_tutors: bool,
  pub game_changers: Vec<String>,
}

/// Runs the bracket decision list
pub fn bracket_for(signals: &BracketSignals, thresholds: &BracketThresholds) -> Bracket {
  let no_mld = signals.mass_land_destruction == 0;
  let no_extra_turns = signals.extra_turns == 0;
  let game_changers = signals.game_changers.len();
  let casual = no_mld && no_extra_turns && signals.potential_combos == 0 && game_changers == 0;
  if casual && signals.tutors <= thresholds.exhibition_max_tutors {
    Bracket::Exhibition
  } else if casual && signals.tutors <= thresholds.core_max_tutors {
    Bracket::Core
  } else if no_mld && no_extra_turns && game_changers <= thresholds.upgraded_max_game_changers {
    Bracket::Upgraded
  } else if game_changers > thresholds.upgraded_max_game_changers {
    Bracket::Optimized
  } else {
    Bracket::Cedh
  }
}

/// Classifies a deck into a bracket and reports the signals behind the decision
pub fn classify_bracket(signals: &BracketSignals, rules: &Rules) -> BracketResult {
  let thresholds = rules.thresholds();
  let bracket = bracket_for(signals, thresholds);
  debug!(
    "Bracket {} from {} game changers, {} tutors, {} potential combos",
    bracket.number(),
    signals.game_changers.len(),
    signals.tutors,
    signals.potential_combos
  );
  BracketResult {
    bracket: bracket.number(),
    name: bracket.name().to_string(),
    description: bracket.description().to_string(),
    game_changer_count: signals.game_changers.len(),
    tutor_count: signals.tutors,
    potential_combo_count: signals.potential_combos,
    no_mld: signals.mass_land_destruction == 0,
    no_extra_turns: signals.extra_turns == 0,
    no_infinite_combo: signals.potential_combos == 0,
    no_game_changers: signals.game_changers.is_empty(),
    few_tutors: signals.tutors <= thresholds.core_max_tutors,
    game_changers: signals.game_changers.clone(),
  }
}

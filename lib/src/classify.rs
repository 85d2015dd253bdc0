//! # Per-card classification
//!
//! Derives the mana a card produces, the colored pips it costs and the functional roles it
//! plays from its type line and rules text. Every predicate runs over lower-cased text,
//! predicates are independent of each other, and a card may hold any number of roles.
use crate::card::{pips_from_str, Card, CardKind, ColorSet, ManaColor, Pips};
use crate::rules::Rules;
use regex::Regex;

lazy_static! {
  // "add" up to the end of its sentence, e.g. "add {g}{g}" or "add one mana of any color"
  static ref ADD_CLAUSE_REGEX: Regex =
    Regex::new(r"\badd\b([^.]*)").expect("Failed to compile ADD_CLAUSE_REGEX regex");
  static ref MANA_SYMBOL_REGEX: Regex =
    Regex::new(r"\{([wubrgc])\}").expect("Failed to compile MANA_SYMBOL_REGEX regex");
  static ref ANY_COLOR_REGEX: Regex =
    Regex::new(r"any (?:one )?color|any combination of colors")
      .expect("Failed to compile ANY_COLOR_REGEX regex");
}

/// FunctionalRole is a deck-building role a card may fill
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FunctionalRole {
  Ramp,
  Draw,
  MassLandDestruction,
  ExtraTurn,
  Tutor,
  PotentialCombo,
}

impl FunctionalRole {
  pub const ALL: [FunctionalRole; 6] = [
    FunctionalRole::Ramp,
    FunctionalRole::Draw,
    FunctionalRole::MassLandDestruction,
    FunctionalRole::ExtraTurn,
    FunctionalRole::Tutor,
    FunctionalRole::PotentialCombo,
  ];

  #[inline]
  fn bit(self) -> u8 {
    1 << (self as u8)
  }
}

/// RoleSet is the set of roles a single card fills
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleSet {
  pub bits: u8,
}

impl RoleSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, role: FunctionalRole) {
    self.bits |= role.bit();
  }

  pub fn contains(&self, role: FunctionalRole) -> bool {
    self.bits & role.bit() != 0
  }

  pub fn is_empty(&self) -> bool {
    self.bits == 0
  }

  pub fn roles(self) -> impl Iterator<Item = FunctionalRole> {
    FunctionalRole::ALL
      .iter()
      .copied()
      .filter(move |role| self.contains(*role))
  }
}

/// CardProfile is everything the deck aggregator needs to know about one card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardProfile {
  pub kind: CardKind,
  pub is_land: bool,
  /// Colors of mana the card can produce
  pub produces: ColorSet,
  /// Colored pips of a single copy
  pub pips: Pips,
  pub roles: RoleSet,
  pub is_game_changer: bool,
}

/// Classifies a single card
pub fn classify(card: &Card, rules: &Rules) -> CardProfile {
  let text = card.oracle_text.to_lowercase();
  let is_land = card.is_land();
  let from_clauses = colors_from_add_clauses(&text);
  let produces = produced_colors(card, is_land, from_clauses, rules);
  let mut roles = RoleSet::new();
  let patterns = rules.role_patterns();
  if !is_land && (!from_clauses.is_empty() || patterns.land_fetch.is_match(&text)) {
    roles.insert(FunctionalRole::Ramp);
  }
  if patterns.draw.is_match(&text) {
    roles.insert(FunctionalRole::Draw);
  }
  if patterns.mass_land_destruction.is_match(&text) {
    roles.insert(FunctionalRole::MassLandDestruction);
  }
  if patterns.extra_turn.is_match(&text) {
    roles.insert(FunctionalRole::ExtraTurn);
  }
  if contains_any(&text, rules.tutor_phrases()) {
    roles.insert(FunctionalRole::Tutor);
  }
  if contains_any(&text, rules.combo_phrases()) {
    roles.insert(FunctionalRole::PotentialCombo);
  }
  CardProfile {
    kind: card.kind(),
    is_land,
    produces,
    pips: pips_from_str(&card.mana_cost),
    roles,
    is_game_changer: rules.is_game_changer(&card.name),
  }
}

fn contains_any(text: &str, phrases: &[String]) -> bool {
  phrases.iter().any(|phrase| text.contains(phrase.as_str()))
}

// Basic land types win over rules text, and rules text wins over color identity.
// A land with none of the three is a colorless source
fn produced_colors(card: &Card, is_land: bool, from_clauses: ColorSet, rules: &Rules) -> ColorSet {
  if is_land {
    let from_types = basic_land_colors(&card.type_line, rules);
    if !from_types.is_empty() {
      return from_types;
    }
  }
  if !from_clauses.is_empty() {
    return from_clauses;
  }
  if !is_land {
    return ColorSet::new();
  }
  if card.color_identity.is_empty() {
    ColorSet::colorless()
  } else {
    card.color_identity
  }
}

fn basic_land_colors(type_line: &str, rules: &Rules) -> ColorSet {
  let lower = type_line.to_lowercase();
  let words: Vec<&str> = lower.split(|c: char| !c.is_alphabetic()).collect();
  rules
    .basic_land_types()
    .iter()
    .filter(|(land_type, _)| words.contains(&land_type.as_str()))
    .map(|(_, color)| *color)
    .collect()
}

/// Returns the colors named by every "add ..." clause of lower-cased rules text
pub fn colors_from_add_clauses(text: &str) -> ColorSet {
  let mut produces = ColorSet::new();
  for clause in ADD_CLAUSE_REGEX.captures_iter(text) {
    let clause = &clause[1];
    if ANY_COLOR_REGEX.is_match(clause) {
      produces = produces.union(ColorSet::all_colors());
    }
    for symbol in MANA_SYMBOL_REGEX.captures_iter(clause) {
      match symbol[1].chars().next().and_then(ManaColor::from_char) {
        Some(color) => produces.insert(color),
        None => produces.insert_colorless(),
      }
    }
  }
  produces
}

#[cfg(test)]
mod tests {
  use crate::card::*;
  use crate::classify::*;
  use crate::rules::{Rules, RulesConfig, DEFAULT_RULES};

  fn profile(card: &Card) -> CardProfile {
    classify(card, &DEFAULT_RULES)
  }

  #[test]
  fn basic_land_types_produce_their_color() {
    let p = profile(&Card::new("Forest", "Basic Land — Forest").with_color_identity("G"));
    assert_eq!(p.produces, ColorSet::from_letters("G"));
    assert!(p.is_land);
    assert_eq!(p.kind, CardKind::Land);
    assert!(p.roles.is_empty());
  }

  #[test]
  fn dual_land_types_are_multicolor() {
    let card = Card::new("Breeding Pool", "Land — Forest Island")
      .with_oracle_text("As Breeding Pool enters, you may pay 2 life. If you don't, it enters tapped.");
    let p = profile(&card);
    assert_eq!(p.produces, ColorSet::from_letters("GU"));
    assert!(p.produces.is_multicolor());
  }

  #[test]
  fn any_color_clause_produces_all_colors() {
    let card = Card::new("Command Tower", "Land").with_oracle_text(
      "{T}: Add one mana of any color in your commander's color identity.",
    );
    let p = profile(&card);
    assert_eq!(p.produces, ColorSet::all_colors());
    assert!(!p.roles.contains(FunctionalRole::Ramp));
  }

  #[test]
  fn colorless_rock_is_ramp() {
    let card = Card::new("Sol Ring", "Artifact")
      .with_mana_cost("{1}")
      .with_oracle_text("{T}: Add {C}{C}.");
    let p = profile(&card);
    assert_eq!(p.produces, ColorSet::colorless());
    assert!(!p.produces.is_multicolor());
    assert!(p.roles.contains(FunctionalRole::Ramp));
    assert_eq!(p.pips.total(), 0);
  }

  #[test]
  fn mana_dork_is_ramp() {
    let card = Card::new("Birds of Paradise", "Creature — Bird")
      .with_mana_cost("{G}")
      .with_oracle_text("Flying\n{T}: Add one mana of any color.");
    let p = profile(&card);
    assert!(p.roles.contains(FunctionalRole::Ramp));
    assert_eq!(p.produces, ColorSet::all_colors());
    assert_eq!(p.pips, Pips::from_wubrg(0, 0, 0, 0, 1));
  }

  #[test]
  fn land_fetch_spell_is_ramp_and_tutor() {
    let card = Card::new("Cultivate", "Sorcery").with_mana_cost("{2}{G}").with_oracle_text(
      "Search your library for up to two basic land cards, reveal those cards, put one onto the battlefield tapped and the other into your hand, then shuffle.",
    );
    let p = profile(&card);
    assert!(p.roles.contains(FunctionalRole::Ramp));
    assert!(p.roles.contains(FunctionalRole::Tutor));
    assert_eq!(p.roles.roles().count(), 2);
    assert!(p.produces.is_empty());
  }

  #[test]
  fn land_without_clause_falls_back_to_identity() {
    let card = Card::new("Urborg, Tomb of Yawgmoth", "Legendary Land")
      .with_oracle_text("Each land is a Swamp in addition to its other land types.")
      .with_color_identity("B");
    assert_eq!(profile(&card).produces, ColorSet::from_letters("B"));
    let card = Card::new("Evolving Wilds", "Land").with_oracle_text(
      "{T}, Sacrifice Evolving Wilds: Search your library for a basic land card, put it onto the battlefield tapped, then shuffle.",
    );
    let p = profile(&card);
    assert_eq!(p.produces, ColorSet::colorless());
    assert!(!p.roles.contains(FunctionalRole::Ramp));
  }

  #[test]
  fn draw_family() {
    for text in &[
      "Draw a card.",
      "Target player draws two cards.",
      "Draw three cards, then discard a card.",
    ] {
      let card = Card::new("Draw", "Instant").with_oracle_text(text);
      assert!(profile(&card).roles.contains(FunctionalRole::Draw), "{}", text);
    }
    let card = Card::new("Drawn", "Instant").with_oracle_text("Withdraw from combat.");
    assert!(!profile(&card).roles.contains(FunctionalRole::Draw));
  }

  #[test]
  fn mass_land_destruction_family() {
    for text in &[
      "Destroy all lands.",
      "Destroy each land.",
      "Destroy all artifacts, creatures, and lands. They can't be regenerated.",
    ] {
      let card = Card::new("Boom", "Sorcery").with_oracle_text(text);
      assert!(
        profile(&card).roles.contains(FunctionalRole::MassLandDestruction),
        "{}",
        text
      );
    }
    let card = Card::new("Wrath", "Sorcery").with_oracle_text("Destroy all nonland permanents.");
    assert!(!profile(&card).roles.contains(FunctionalRole::MassLandDestruction));
  }

  #[test]
  fn extra_turn_and_combo() {
    let card = Card::new("Time Warp", "Sorcery").with_oracle_text("Target player takes an extra turn after this one.");
    assert!(profile(&card).roles.contains(FunctionalRole::ExtraTurn));
    let card = Card::new("Dramatic Reversal", "Instant").with_oracle_text("Untap all nonland permanents you control.");
    let p = profile(&card);
    assert!(p.roles.contains(FunctionalRole::PotentialCombo));
    assert!(!p.roles.contains(FunctionalRole::ExtraTurn));
  }

  #[test]
  fn role_patterns_come_from_rules() {
    let card = Card::new("Timetwister", "Sorcery").with_oracle_text(
      "Each player shuffles their hand and graveyard into their library, then draws seven cards.",
    );
    assert!(!profile(&card).roles.contains(FunctionalRole::Draw));
    let config: RulesConfig = serde_json::from_str(
      r#"{ "role_patterns": { "draw": "\\bdraws? (?:a|two|three|seven) cards?\\b" } }"#,
    )
    .unwrap();
    let rules = Rules::from_config(&config).unwrap();
    let p = classify(&card, &rules);
    assert!(p.roles.contains(FunctionalRole::Draw));
    assert!(!p.roles.contains(FunctionalRole::ExtraTurn));
  }

  #[test]
  fn game_changer_by_name() {
    let card = Card::new("Rhystic Study", "Enchantment").with_oracle_text(
      "Whenever an opponent casts a spell, you may draw a card unless that player pays {1}.",
    );
    let p = profile(&card);
    assert!(p.is_game_changer);
    assert!(p.roles.contains(FunctionalRole::Draw));
    assert!(p.produces.is_empty());
  }

  #[test]
  fn empty_card_never_panics() {
    let p = profile(&Card::default());
    assert!(p.roles.is_empty());
    assert!(p.produces.is_empty());
    assert_eq!(p.kind, CardKind::Other);
  }
}

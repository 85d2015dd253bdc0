//! # Internal card representation
//!
use crate::card::mana_cost::*;
use std::hash::{Hash, Hasher};

/// Card represents one validated entry of a deck
// NOTE: PartialEq, Eq and Hash are implemented below and only consider the id
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct Card {
  /// Unique id within a deck, defaults to the lower-cased card name
  pub id: String,
  /// String representing the card name
  pub name: String,
  /// String representing the card mana cost, in "{2}{W}{U/B}" style format. Empty for lands
  pub mana_cost: String,
  /// Converted mana cost
  pub cmc: f32,
  /// The full type line, such as "Legendary Creature — Elf Druid"
  pub type_line: String,
  /// Rules text, possibly empty
  pub oracle_text: String,
  /// Commander color identity
  pub color_identity: ColorSet,
  /// Number of physical copies, at least 1
  pub quantity: usize,
}

/// CardKind is the single type bucket a card is counted under.
/// Variants are declared in the order used to resolve multi-type cards
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardKind {
  Creature,
  Instant,
  Sorcery,
  Artifact,
  Enchantment,
  Planeswalker,
  Land,
  Other,
}

impl Card {
  /// Copies of a single card beyond this are clamped
  pub const MAX_QUANTITY: usize = 10_000;

  /// Returns a new single copy card with no cost and no rules text
  pub fn new(name: &str, type_line: &str) -> Self {
    Self {
      id: normalize_id(name),
      name: name.trim().to_string(),
      type_line: type_line.to_string(),
      quantity: 1,
      ..Self::default()
    }
  }

  /// Sets the mana cost string and derives the converted mana cost from it
  pub fn with_mana_cost(mut self, mana_cost: &str) -> Self {
    self.mana_cost = mana_cost.to_string();
    self.cmc = mana_value_of(&mana_symbols_from_str(mana_cost)) as f32;
    self
  }

  pub fn with_cmc(mut self, cmc: f32) -> Self {
    self.cmc = cmc.max(0.0);
    self
  }

  pub fn with_oracle_text(mut self, oracle_text: &str) -> Self {
    self.oracle_text = oracle_text.to_string();
    self
  }

  /// Sets the color identity from color letters such as "WU"
  pub fn with_color_identity(mut self, letters: &str) -> Self {
    self.color_identity = ColorSet::from_letters(letters);
    self
  }

  /// Sets the number of copies, clamped to `1..=MAX_QUANTITY`
  pub fn with_quantity(mut self, quantity: usize) -> Self {
    self.quantity = clamp_quantity(quantity);
    self
  }

  pub fn with_id(mut self, id: &str) -> Self {
    self.id = id.to_string();
    self
  }

  /// Returns the type bucket of the card
  pub fn kind(&self) -> CardKind {
    CardKind::from_type_line(&self.type_line)
  }

  /// Returns true if the type line mentions "land", ignoring case
  #[inline]
  pub fn is_land(&self) -> bool {
    self.type_line.to_lowercase().contains("land")
  }

  pub fn mana_symbols(&self) -> Vec<ManaSymbol> {
    mana_symbols_from_str(&self.mana_cost)
  }

  /// Returns the mana curve bucket of the card, where bucket 7 holds 7 and above
  pub fn curve_bucket(&self) -> usize {
    let cmc = if self.cmc.is_finite() { self.cmc.max(0.0) } else { 0.0 };
    std::cmp::min(cmc.floor() as usize, 7)
  }
}

impl PartialEq for Card {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Card {}

impl Hash for Card {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl Default for CardKind {
  fn default() -> Self {
    Self::Other
  }
}

impl CardKind {
  /// Resolution order for type lines that name more than one card type
  pub const PRIORITY: [CardKind; 8] = [
    CardKind::Creature,
    CardKind::Instant,
    CardKind::Sorcery,
    CardKind::Artifact,
    CardKind::Enchantment,
    CardKind::Planeswalker,
    CardKind::Land,
    CardKind::Other,
  ];

  fn keyword(self) -> Option<&'static str> {
    match self {
      Self::Creature => Some("creature"),
      Self::Instant => Some("instant"),
      Self::Sorcery => Some("sorcery"),
      Self::Artifact => Some("artifact"),
      Self::Enchantment => Some("enchantment"),
      Self::Planeswalker => Some("planeswalker"),
      Self::Land => Some("land"),
      Self::Other => None,
    }
  }

  /// Returns the first kind in `PRIORITY` whose keyword appears in the type line
  pub fn from_type_line(type_line: &str) -> Self {
    let lower = type_line.to_lowercase();
    Self::PRIORITY
      .iter()
      .copied()
      .find(|kind| kind.keyword().map_or(false, |k| lower.contains(k)))
      .unwrap_or(Self::Other)
  }
}

pub(crate) fn clamp_quantity(quantity: usize) -> usize {
  std::cmp::min(std::cmp::max(1, quantity), Card::MAX_QUANTITY)
}

pub(crate) fn normalize_id(name: &str) -> String {
  name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
  use crate::card::*;

  #[test]
  fn card_kind_priority() {
    assert_eq!(
      CardKind::from_type_line("Artifact Creature — Golem"),
      CardKind::Creature
    );
    assert_eq!(
      CardKind::from_type_line("Legendary Enchantment Artifact"),
      CardKind::Artifact
    );
    assert_eq!(CardKind::from_type_line("Artifact Land"), CardKind::Artifact);
    assert_eq!(
      CardKind::from_type_line("Kindred Instant — Elf"),
      CardKind::Instant
    );
    assert_eq!(
      CardKind::from_type_line("Legendary Planeswalker — Teferi"),
      CardKind::Planeswalker
    );
    assert_eq!(
      CardKind::from_type_line("Basic Land — Forest"),
      CardKind::Land
    );
    assert_eq!(CardKind::from_type_line("Battle — Siege"), CardKind::Other);
    assert_eq!(CardKind::from_type_line(""), CardKind::Other);
  }

  #[test]
  fn card_is_land_ignores_case() {
    assert!(Card::new("Forest", "Basic Land — Forest").is_land());
    assert!(Card::new("Dryad Arbor", "LAND CREATURE — Forest Dryad").is_land());
    assert!(!Card::new("Sol Ring", "Artifact").is_land());
  }

  #[test]
  fn card_with_mana_cost_derives_cmc() {
    let card = Card::new("Cryptic Command", "Instant").with_mana_cost("{1}{U}{U}{U}");
    assert_eq!(card.cmc, 4.0);
    assert_eq!(card.curve_bucket(), 4);
    let card = Card::new("Emrakul, the Aeons Torn", "Legendary Creature — Eldrazi")
      .with_mana_cost("{15}");
    assert_eq!(card.curve_bucket(), 7);
    let card = Card::new("Blasphemous Act", "Sorcery").with_cmc(-2.0);
    assert_eq!(card.curve_bucket(), 0);
  }

  #[test]
  fn card_equality_uses_id() {
    let a = Card::new("Sol Ring", "Artifact");
    let b = Card::new("  SOL RING ", "Artifact").with_quantity(3);
    assert_eq!(a, b);
    assert_eq!(b.quantity, 3);
    assert_eq!(Card::new("Sol Ring", "Artifact").with_quantity(0).quantity, 1);
  }

  #[test]
  fn quantity_is_clamped() {
    let card = Card::new("Relentless Rats", "Creature — Rat").with_quantity(usize::MAX);
    assert_eq!(card.quantity, Card::MAX_QUANTITY);
    assert_eq!(clamp_quantity(37), 37);
  }
}

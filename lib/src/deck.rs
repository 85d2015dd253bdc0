use crate::card::{clamp_quantity, Card};
use crate::scryfall::ScryfallDeck;
use std::collections::HashMap;

/// Deck is a snapshot of a commander deck: an optional commander plus the library cards.
/// Card ids are unique within `cards`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
  pub commander: Option<Card>,
  pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Default)]
pub struct DeckBuilder {
  commander: Option<Card>,
  cards: Vec<Card>,
  index: HashMap<String, usize>,
}

impl DeckBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds the card with its own quantity, merging with an earlier card of the same id
  pub fn insert(self, card: Card) -> Self {
    let count = card.quantity;
    self.insert_count(card, count)
  }

  /// Adds `count` copies of the card. Merged quantities are clamped to `Card::MAX_QUANTITY`
  pub fn insert_count(mut self, mut card: Card, count: usize) -> Self {
    if count == 0 {
      return self;
    }
    if let Some(&idx) = self.index.get(&card.id) {
      let merged = self.cards[idx].quantity.saturating_add(count);
      self.cards[idx].quantity = clamp_quantity(merged);
      return self;
    }
    card.quantity = clamp_quantity(count);
    self.index.insert(card.id.clone(), self.cards.len());
    self.cards.push(card);
    self
  }

  pub fn commander(mut self, card: Card) -> Self {
    self.commander = Some(card.with_quantity(1));
    self
  }

  pub fn build(self) -> Deck {
    Deck {
      commander: self.commander,
      cards: self.cards,
    }
  }
}

impl Deck {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_cards<I>(cards: I) -> Self
  where
    I: IntoIterator<Item = Card>,
  {
    let mut b = DeckBuilder::new();
    for card in cards {
      b = b.insert(card);
    }
    b.build()
  }

  /// Returns the commander (if any) followed by the library cards
  pub fn entries(&self, include_commander: bool) -> impl Iterator<Item = &Card> {
    let commander = if include_commander {
      self.commander.as_ref()
    } else {
      None
    };
    commander.into_iter().chain(self.cards.iter())
  }

  /// Returns the number of physical cards
  pub fn size(&self, include_commander: bool) -> usize {
    self
      .entries(include_commander)
      .fold(0usize, |accum, c| accum.saturating_add(c.quantity))
  }

  pub fn land_count(&self, include_commander: bool) -> usize {
    self
      .entries(include_commander)
      .filter(|c| c.is_land())
      .fold(0usize, |accum, c| accum.saturating_add(c.quantity))
  }

  pub fn is_empty(&self) -> bool {
    self.size(true) == 0
  }

  /// Returns the cards to draw opening hands from
  pub fn pool(&self, include_commander: bool) -> Vec<Card> {
    self.entries(include_commander).cloned().collect()
  }

  pub fn card_from_name(&self, name: &str) -> Option<&Card> {
    let name_lowercase = name.trim().to_lowercase();
    self
      .entries(true)
      .find(|c| c.name.to_lowercase() == name_lowercase)
  }
}

impl From<ScryfallDeck> for Deck {
  fn from(record: ScryfallDeck) -> Self {
    let mut b = DeckBuilder::new();
    if let Some(commander) = record.commander {
      b = b.commander(commander.into());
    }
    for card in record.cards {
      b = b.insert(card.into());
    }
    b.build()
  }
}

#[cfg(test)]
mod tests {
  use crate::card::{clamp_quantity, Card};
  use crate::deck::*;

  fn small_deck() -> Deck {
    DeckBuilder::new()
      .commander(Card::new("Omnath, Locus of Mana", "Legendary Creature — Elemental"))
      .insert(Card::new("Forest", "Basic Land — Forest").with_quantity(30))
      .insert(Card::new("Llanowar Elves", "Creature — Elf Druid"))
      .insert_count(Card::new("Forest", "Basic Land — Forest"), 5)
      .build()
  }

  #[test]
  fn builder_merges_duplicate_ids() {
    let deck = small_deck();
    assert_eq!(deck.cards.len(), 2);
    assert_eq!(deck.cards[0].quantity, 35);
    assert_eq!(deck.size(false), 36);
    assert_eq!(deck.size(true), 37);
    assert_eq!(deck.land_count(true), 35);
    assert!(!deck.is_empty());
  }

  #[test]
  fn pool_honors_commander_flag() {
    let deck = small_deck();
    assert_eq!(deck.pool(true).len(), 3);
    assert_eq!(deck.pool(true)[0].name, "Omnath, Locus of Mana");
    assert_eq!(deck.pool(false).len(), 2);
  }

  #[test]
  fn merged_quantity_is_clamped() {
    let deck = DeckBuilder::new()
      .insert_count(Card::new("Persistent Petitioners", "Creature — Human Advisor"), usize::MAX)
      .insert_count(Card::new("Persistent Petitioners", "Creature — Human Advisor"), usize::MAX)
      .build();
    assert_eq!(deck.cards[0].quantity, Card::MAX_QUANTITY);
    assert_eq!(deck.size(true), Card::MAX_QUANTITY);
  }

  #[test]
  fn zero_count_is_ignored() {
    let deck = DeckBuilder::new()
      .insert_count(Card::new("Island", "Basic Land — Island"), 0)
      .build();
    assert!(deck.is_empty());
    assert_eq!(deck.size(true), 0);
  }

  #[test]
  fn card_from_name_ignores_case() {
    let deck = small_deck();
    assert!(deck.card_from_name("llanowar elves").is_some());
    assert!(deck.card_from_name("omnath, locus of mana").is_some());
    assert!(deck.card_from_name("Sol Ring").is_none());
  }

  #[test]
  fn deck_from_json() {
    let json = r#"{
      "commander": { "name": "Atraxa, Praetors' Voice", "type_line": "Legendary Creature — Phyrexian Angel Horror", "mana_cost": "{G}{W}{U}{B}" },
      "cards": [
        { "name": "Plains", "type_line": "Basic Land — Plains", "quantity": 10 },
        { "name": "Sol Ring", "type_line": "Artifact", "mana_cost": "{1}", "oracle_text": "{T}: Add {C}{C}." }
      ]
    }"#;
    let record: ScryfallDeck = serde_json::from_str(json).unwrap();
    let deck: Deck = record.into();
    assert_eq!(deck.size(true), 12);
    assert_eq!(deck.commander.as_ref().map(|c| c.cmc), Some(4.0));
  }
}

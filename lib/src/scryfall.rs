//! # Plain card records
//!
//! Card data arrives from the catalog in the Scryfall card shape, with any field possibly
//! absent or null. `ScryfallCard` accepts that shape as-is and converts into a validated `Card`.
use crate::card::{mana_symbols_from_str, mana_value_of, normalize_id, Card, ColorSet};
use std::convert::TryFrom;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScryfallCard {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub mana_cost: Option<String>,
  #[serde(default)]
  pub cmc: Option<f32>,
  #[serde(default)]
  pub type_line: Option<String>,
  #[serde(default)]
  pub oracle_text: Option<String>,
  #[serde(default)]
  pub colors: Option<Vec<String>>,
  #[serde(default)]
  pub color_identity: Option<Vec<String>>,
  #[serde(default)]
  pub quantity: Option<i64>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub card_faces: Vec<ScryfallCard>,
}

/// A deck snapshot as plain card records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScryfallDeck {
  #[serde(default)]
  pub commander: Option<ScryfallCard>,
  #[serde(default)]
  pub cards: Vec<ScryfallCard>,
}

impl ScryfallCard {
  // Multi-faced cards keep their rules text (and sometimes their cost) on the faces only
  fn face_text(&self) -> String {
    self
      .card_faces
      .iter()
      .filter_map(|face| face.oracle_text.as_deref())
      .filter(|text| !text.is_empty())
      .collect::<Vec<_>>()
      .join("\n")
  }

  fn face_mana_cost(&self) -> String {
    self
      .card_faces
      .iter()
      .filter_map(|face| face.mana_cost.as_deref())
      .find(|cost| !cost.is_empty())
      .unwrap_or("")
      .to_string()
  }
}

fn color_set_from_letters(letters: &Option<Vec<String>>) -> ColorSet {
  letters
    .iter()
    .flatten()
    .map(|letter| ColorSet::from_letters(letter))
    .fold(ColorSet::new(), ColorSet::union)
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

impl From<ScryfallCard> for Card {
  fn from(record: ScryfallCard) -> Self {
    let name = record.name.clone().unwrap_or_default().trim().to_string();
    let id = non_empty(record.id.clone()).unwrap_or_else(|| normalize_id(&name));
    let mana_cost = non_empty(record.mana_cost.clone()).unwrap_or_else(|| record.face_mana_cost());
    let oracle_text = non_empty(record.oracle_text.clone()).unwrap_or_else(|| record.face_text());
    let type_line = record.type_line.clone().unwrap_or_default();
    let cmc = match record.cmc {
      Some(cmc) if cmc.is_finite() => cmc.max(0.0),
      _ => mana_value_of(&mana_symbols_from_str(&mana_cost)) as f32,
    };
    let mut color_identity = color_set_from_letters(&record.color_identity);
    if color_identity.is_empty() {
      color_identity = color_set_from_letters(&record.colors);
    }
    let quantity = record
      .quantity
      .unwrap_or(1)
      .max(1)
      .min(Card::MAX_QUANTITY as i64);
    let quantity = usize::try_from(quantity).unwrap_or(1);
    Card {
      id,
      name,
      mana_cost,
      cmc,
      type_line,
      oracle_text,
      color_identity,
      quantity,
    }
  }
}

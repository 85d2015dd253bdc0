use crate::card::{ColorSet, ManaColor};

/// ColorSourceCount tallies the cards able to produce each color of mana
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSourceCount {
  pub total: usize, // total number of sources counted
  pub w: usize,
  pub u: usize,
  pub b: usize,
  pub r: usize,
  pub g: usize,
  pub c: usize,
  pub multi: usize, // sources of two or more of the five colors
}

impl ColorSourceCount {
  pub fn new() -> Self {
    Self::default()
  }

  /// Counts `quantity` copies of a source producing `produces`.
  /// Empty sets are ignored
  pub fn count(&mut self, produces: &ColorSet, quantity: usize) {
    if produces.is_empty() {
      return;
    }
    self.total = self.total.saturating_add(quantity);
    for color in produces.colors() {
      let n = match color {
        ManaColor::White => &mut self.w,
        ManaColor::Blue => &mut self.u,
        ManaColor::Black => &mut self.b,
        ManaColor::Red => &mut self.r,
        ManaColor::Green => &mut self.g,
      };
      *n = n.saturating_add(quantity);
    }
    if produces.has_colorless() {
      self.c = self.c.saturating_add(quantity);
    }
    if produces.is_multicolor() {
      self.multi = self.multi.saturating_add(quantity);
    }
  }

  pub fn get(&self, color: ManaColor) -> usize {
    match color {
      ManaColor::White => self.w,
      ManaColor::Blue => self.u,
      ManaColor::Black => self.b,
      ManaColor::Red => self.r,
      ManaColor::Green => self.g,
    }
  }
}

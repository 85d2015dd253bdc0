use std::iter::{FromIterator, Sum};
use std::ops::{Add, AddAssign};

/// ManaColor represents one of the five [colors](https://mtg.gamepedia.com/Color)
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ManaColor {
  #[serde(rename = "W")]
  White,
  #[serde(rename = "U")]
  Blue,
  #[serde(rename = "B")]
  Black,
  #[serde(rename = "R")]
  Red,
  #[serde(rename = "G")]
  Green,
}

impl ManaColor {
  /// WUBRG order
  pub const ALL: [ManaColor; 5] = [
    ManaColor::White,
    ManaColor::Blue,
    ManaColor::Black,
    ManaColor::Red,
    ManaColor::Green,
  ];

  pub fn from_char(c: char) -> Option<Self> {
    match c.to_ascii_uppercase() {
      'W' => Some(Self::White),
      'U' => Some(Self::Blue),
      'B' => Some(Self::Black),
      'R' => Some(Self::Red),
      'G' => Some(Self::Green),
      _ => None,
    }
  }

  /// Returns the color for a single letter symbol such as "W", or None
  pub fn from_symbol(symbol: &str) -> Option<Self> {
    let mut chars = symbol.trim().chars();
    match (chars.next(), chars.next()) {
      (Some(c), None) => Self::from_char(c),
      _ => None,
    }
  }

  #[inline]
  pub fn bit(self) -> u8 {
    match self {
      Self::White => ColorSet::W_BITS,
      Self::Blue => ColorSet::U_BITS,
      Self::Black => ColorSet::B_BITS,
      Self::Red => ColorSet::R_BITS,
      Self::Green => ColorSet::G_BITS,
    }
  }
}

/// ColorSet is a compact set of the five colors plus colorless
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSet {
  pub bits: u8,
}

impl ColorSet {
  pub const W_BITS: u8 = 0b0000_0001;
  pub const U_BITS: u8 = 0b0000_0010;
  pub const B_BITS: u8 = 0b0000_0100;
  pub const R_BITS: u8 = 0b0000_1000;
  pub const G_BITS: u8 = 0b0001_0000;
  pub const C_BITS: u8 = 0b0010_0000;
  pub const COLORED_BITS: u8 = 0b0001_1111;

  pub fn new() -> Self {
    Self { bits: 0 }
  }

  /// Returns the set of all five colors
  pub fn all_colors() -> Self {
    Self {
      bits: Self::COLORED_BITS,
    }
  }

  pub fn colorless() -> Self {
    Self { bits: Self::C_BITS }
  }

  /// Parses a string of color letters such as "WUB", ignoring anything that
  /// is not one of W, U, B, R or G
  pub fn from_letters(letters: &str) -> Self {
    letters.chars().filter_map(ManaColor::from_char).collect()
  }

  #[inline]
  pub fn insert(&mut self, color: ManaColor) {
    self.bits |= color.bit();
  }

  #[inline]
  pub fn insert_colorless(&mut self) {
    self.bits |= Self::C_BITS;
  }

  #[inline]
  pub fn contains(&self, color: ManaColor) -> bool {
    self.bits & color.bit() != 0
  }

  #[inline]
  pub fn has_colorless(&self) -> bool {
    self.bits & Self::C_BITS != 0
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.bits == 0
  }

  /// Returns the number of the five colors in the set; colorless is not counted
  #[inline]
  pub fn colored_count(&self) -> u32 {
    (self.bits & Self::COLORED_BITS).count_ones()
  }

  #[inline]
  pub fn is_multicolor(&self) -> bool {
    self.colored_count() >= 2
  }

  pub fn union(self, other: Self) -> Self {
    Self {
      bits: self.bits | other.bits,
    }
  }

  /// Returns the colors in the set in WUBRG order
  pub fn colors(self) -> impl Iterator<Item = ManaColor> {
    ManaColor::ALL
      .iter()
      .copied()
      .filter(move |color| self.contains(*color))
  }
}

impl FromIterator<ManaColor> for ColorSet {
  fn from_iter<I: IntoIterator<Item = ManaColor>>(iter: I) -> Self {
    let mut set = Self::new();
    for color in iter {
      set.insert(color);
    }
    set
  }
}

/// Pips counts the colored [mana symbols](https://mtg.gamepedia.com/Mana_symbol) of a cost
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pips {
  pub w: usize,
  pub u: usize,
  pub b: usize,
  pub r: usize,
  pub g: usize,
}

impl Pips {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_wubrg(w: usize, u: usize, b: usize, r: usize, g: usize) -> Self {
    Self { w, u, b, r, g }
  }

  fn of(color: ManaColor) -> Self {
    let mut pips = Self::new();
    pips.add_color(color, 1);
    pips
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

  pub fn add_color(&mut self, color: ManaColor, count: usize) {
    match color {
      ManaColor::White => self.w += count,
      ManaColor::Blue => self.u += count,
      ManaColor::Black => self.b += count,
      ManaColor::Red => self.r += count,
      ManaColor::Green => self.g += count,
    }
  }

  #[inline]
  pub fn total(&self) -> usize {
    [self.w, self.u, self.b, self.r, self.g]
      .iter()
      .fold(0usize, |accum, n| accum.saturating_add(*n))
  }

  /// Returns the pips multiplied by a card quantity, saturating on overflow
  pub fn scaled(self, quantity: usize) -> Self {
    Self {
      w: self.w.saturating_mul(quantity),
      u: self.u.saturating_mul(quantity),
      b: self.b.saturating_mul(quantity),
      r: self.r.saturating_mul(quantity),
      g: self.g.saturating_mul(quantity),
    }
  }

  /// Returns the set of colors with at least one pip
  pub fn colors(&self) -> ColorSet {
    ManaColor::ALL
      .iter()
      .copied()
      .filter(|color| self.get(*color) > 0)
      .collect()
  }
}

impl Add for Pips {
  type Output = Self;

  fn add(self, other: Self) -> Self {
    Self {
      w: self.w.saturating_add(other.w),
      u: self.u.saturating_add(other.u),
      b: self.b.saturating_add(other.b),
      r: self.r.saturating_add(other.r),
      g: self.g.saturating_add(other.g),
    }
  }
}

impl AddAssign for Pips {
  fn add_assign(&mut self, other: Self) {
    *self = *self + other;
  }
}

impl Sum for Pips {
  fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
    iter.fold(Self::new(), |accum, pips| accum + pips)
  }
}

/// ManaSymbol is a single brace-delimited component of a mana cost
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManaSymbol {
  /// {W}
  Colored(ManaColor),
  /// {W/U}
  Hybrid(ManaColor, ManaColor),
  /// {2/W}
  GenericHybrid(u8, ManaColor),
  /// {W/P}
  Phyrexian(ManaColor),
  /// {W/U/P}
  PhyrexianHybrid(ManaColor, ManaColor),
  /// {3}
  Generic(u32),
  /// {X}, {Y} or {Z}
  Variable,
  /// {C}
  Colorless,
}

impl ManaSymbol {
  /// Returns the colored pips contributed by this symbol.
  /// Hybrid symbols count toward every color they name.
  pub fn pips(&self) -> Pips {
    match *self {
      Self::Colored(color) | Self::Phyrexian(color) | Self::GenericHybrid(_, color) => {
        Pips::of(color)
      }
      Self::Hybrid(a, b) | Self::PhyrexianHybrid(a, b) => Pips::of(a) + Pips::of(b),
      Self::Generic(_) | Self::Variable | Self::Colorless => Pips::new(),
    }
  }

  /// Returns the contribution of this symbol to the converted mana cost
  pub fn mana_value(&self) -> u32 {
    match *self {
      Self::Generic(n) => n,
      Self::GenericHybrid(n, _) => n as u32,
      Self::Variable => 0,
      _ => 1,
    }
  }
}

/// Returns the ordered symbols of a mana cost string such as "{2}{W}{U/B}".
/// Unrecognized tokens are skipped.
pub fn mana_symbols_from_str(mana_cost_str: &str) -> Vec<ManaSymbol> {
  let mut sigil = String::new();
  let mut symbols = Vec::new();
  let mut in_braces = false;
  for c in mana_cost_str.chars() {
    match c {
      '{' => {
        sigil.clear();
        in_braces = true;
      }
      '}' => {
        if in_braces {
          match symbol_from_token(&sigil) {
            Some(symbol) => symbols.push(symbol),
            None => trace!("Skipping unrecognized mana token {{{}}}", sigil),
          }
        }
        sigil.clear();
        in_braces = false;
      }
      c if in_braces => sigil.push(c),
      _ => {}
    }
  }
  symbols
}

/// Returns the total colored pips of a mana cost string
pub fn pips_from_str(mana_cost_str: &str) -> Pips {
  mana_symbols_from_str(mana_cost_str)
    .iter()
    .map(ManaSymbol::pips)
    .sum()
}

/// Returns the converted mana cost of a sequence of symbols, saturating at `u32::MAX`
pub fn mana_value_of(symbols: &[ManaSymbol]) -> u32 {
  symbols
    .iter()
    .map(ManaSymbol::mana_value)
    .fold(0, u32::saturating_add)
}

fn symbol_from_token(token: &str) -> Option<ManaSymbol> {
  let token = token.trim();
  if token.contains('/') {
    return hybrid_from_token(token);
  }
  if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
    return token.parse::<u32>().ok().map(ManaSymbol::Generic);
  }
  match token {
    "X" | "Y" | "Z" | "x" | "y" | "z" => Some(ManaSymbol::Variable),
    "C" | "c" => Some(ManaSymbol::Colorless),
    _ => ManaColor::from_symbol(token).map(ManaSymbol::Colored),
  }
}

fn hybrid_from_token(token: &str) -> Option<ManaSymbol> {
  let mut colors = Vec::with_capacity(2);
  let mut generic = None;
  let mut phyrexian = false;
  for part in token.split('/').map(str::trim) {
    if part.eq_ignore_ascii_case("p") {
      phyrexian = true;
    } else if let Some(color) = ManaColor::from_symbol(part) {
      colors.push(color);
    } else if let Ok(n) = part.parse::<u8>() {
      generic = Some(n);
    } else {
      return None;
    }
  }
  match (colors.as_slice(), generic, phyrexian) {
    ([a, b], None, false) => Some(ManaSymbol::Hybrid(*a, *b)),
    ([a, b], None, true) => Some(ManaSymbol::PhyrexianHybrid(*a, *b)),
    ([a], None, true) => Some(ManaSymbol::Phyrexian(*a)),
    ([a], Some(n), false) => Some(ManaSymbol::GenericHybrid(n, *a)),
    _ => None,
  }
}

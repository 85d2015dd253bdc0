//! # Classification rule tables
//!
//! `Rules` holds the keyword tables, the curated game changer list and the bracket
//! thresholds consulted by [`classify`](crate::classify) and [`bracket`](crate::bracket).
//! A `Rules` value is immutable once built and is always passed by shared reference.
use crate::bracket::BracketThresholds;
use crate::card::ManaColor;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

/// Curated list of high impact cards used for bracket classification
pub const GAME_CHANGERS: &[&str] = &[
  // White
  "Drannith Magistrate",
  "Enlightened Tutor",
  "Humility",
  "Serra's Sanctum",
  "Smothering Tithe",
  "Teferi's Protection",
  // Blue
  "Consecrated Sphinx",
  "Cyclonic Rift",
  "Expropriate",
  "Fierce Guardianship",
  "Force of Will",
  "Gifts Ungiven",
  "Intuition",
  "Jin-Gitaxias, Core Augur",
  "Mystical Tutor",
  "Narset, Parter of Veils",
  "Rhystic Study",
  "Sway of the Stars",
  "Thassa's Oracle",
  "Urza, Lord High Artificer",
  // Black
  "Bolas's Citadel",
  "Braids, Cabal Minion",
  "Demonic Tutor",
  "Imperial Seal",
  "Necropotence",
  "Opposition Agent",
  "Orcish Bowmasters",
  "Tergrid, God of Fright",
  "Vampiric Tutor",
  "Ad Nauseam",
  // Red
  "Deflecting Swat",
  "Gamble",
  "Jeska's Will",
  "Underworld Breach",
  // Green
  "Crop Rotation",
  "Food Chain",
  "Gaea's Cradle",
  "Natural Order",
  "Seedborn Muse",
  "Survival of the Fittest",
  "Vorinclex, Voice of Hunger",
  "Worldly Tutor",
  // Multicolor
  "Aura Shards",
  "Coalition Victory",
  "Grand Arbiter Augustin IV",
  "Kinnan, Bonder Prodigy",
  "Notion Thief",
  "Winota, Joiner of Forces",
  "Yuriko, the Tiger's Shadow",
  // Colorless
  "Ancient Tomb",
  "Chrome Mox",
  "Field of the Dead",
  "Glacial Chasm",
  "Grim Monolith",
  "Lion's Eye Diamond",
  "Mana Vault",
  "Mishra's Workshop",
  "Mox Diamond",
  "Panoptic Mirror",
  "The One Ring",
  "The Tabernacle at Pendrell Vale",
];

/// Basic land types and the color each one taps for
pub const BASIC_LAND_TYPES: &[(&str, ManaColor)] = &[
  ("plains", ManaColor::White),
  ("island", ManaColor::Blue),
  ("swamp", ManaColor::Black),
  ("mountain", ManaColor::Red),
  ("forest", ManaColor::Green),
];

/// Lower-case phrases marking a tutor
pub const TUTOR_PHRASES: &[&str] = &["search your library"];

/// Lower-case phrases marking a potential combo piece.
/// This is a coarse heuristic and not a combo detector
pub const COMBO_PHRASES: &[&str] = &["infinite", "untap", "create a copy"];

// Role patterns run over lower-cased rules text
pub const LAND_FETCH_PATTERN: &str = r"search your library for [^.]*\bbasic lands?\b";
pub const DRAW_PATTERN: &str = r"\bdraws? (?:a|two|three) cards?\b";
pub const MASS_LAND_DESTRUCTION_PATTERN: &str = r"\bdestroy (?:all|each) (?:[^.]*\W)?lands?\b";
pub const EXTRA_TURN_PATTERN: &str = r"\b(?:extra|additional) turns?\b";

#[derive(Error, Debug)]
pub enum RulesError {
  #[error("Invalid {role} pattern: {source}")]
  InvalidPattern {
    role: &'static str,
    source: regex::Error,
  },
}

/// Replacement role patterns, each a regular expression over lower-cased rules text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolePatternsConfig {
  #[serde(default)]
  pub land_fetch: Option<String>,
  #[serde(default)]
  pub draw: Option<String>,
  #[serde(default)]
  pub mass_land_destruction: Option<String>,
  #[serde(default)]
  pub extra_turn: Option<String>,
}

/// Overrides applied on top of the stock rule tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
  #[serde(default)]
  pub extra_game_changers: Vec<String>,
  #[serde(default)]
  pub removed_game_changers: Vec<String>,
  #[serde(default)]
  pub thresholds: Option<BracketThresholds>,
  #[serde(default)]
  pub role_patterns: RolePatternsConfig,
}

/// Compiled patterns for the text-detected functional roles
#[derive(Debug, Clone)]
pub struct RolePatterns {
  /// Marks a non-land card as ramp, alongside any mana ability
  pub land_fetch: Regex,
  pub draw: Regex,
  pub mass_land_destruction: Regex,
  pub extra_turn: Regex,
}

#[derive(Debug, Clone)]
pub struct Rules {
  basic_land_types: Vec<(String, ManaColor)>,
  tutor_phrases: Vec<String>,
  combo_phrases: Vec<String>,
  role_patterns: RolePatterns,
  // lower-cased names
  game_changers: HashSet<String>,
  thresholds: BracketThresholds,
}

lazy_static! {
  static ref STOCK_ROLE_PATTERNS: RolePatterns = RolePatterns {
    land_fetch: Regex::new(LAND_FETCH_PATTERN).expect("Failed to compile LAND_FETCH_PATTERN regex"),
    draw: Regex::new(DRAW_PATTERN).expect("Failed to compile DRAW_PATTERN regex"),
    mass_land_destruction: Regex::new(MASS_LAND_DESTRUCTION_PATTERN)
      .expect("Failed to compile MASS_LAND_DESTRUCTION_PATTERN regex"),
    extra_turn: Regex::new(EXTRA_TURN_PATTERN).expect("Failed to compile EXTRA_TURN_PATTERN regex"),
  };
  /// The stock rule tables
  pub static ref DEFAULT_RULES: Rules = Rules::default();
}

fn compile_override(
  role: &'static str,
  pattern: &Option<String>,
  stock: &Regex,
) -> Result<Regex, RulesError> {
  match pattern {
    Some(pattern) => Regex::new(pattern).map_err(|source| RulesError::InvalidPattern { role, source }),
    None => Ok(stock.clone()),
  }
}

impl RolePatterns {
  fn from_config(config: &RolePatternsConfig) -> Result<Self, RulesError> {
    let stock = &*STOCK_ROLE_PATTERNS;
    Ok(Self {
      land_fetch: compile_override("land fetch", &config.land_fetch, &stock.land_fetch)?,
      draw: compile_override("draw", &config.draw, &stock.draw)?,
      mass_land_destruction: compile_override(
        "mass land destruction",
        &config.mass_land_destruction,
        &stock.mass_land_destruction,
      )?,
      extra_turn: compile_override("extra turn", &config.extra_turn, &stock.extra_turn)?,
    })
  }
}

fn owned(phrases: &[&str]) -> Vec<String> {
  phrases.iter().map(|p| p.to_lowercase()).collect()
}

/// Key under which card names are compared, ignoring case and outer whitespace
pub(crate) fn name_key(name: &str) -> String {
  name.trim().to_lowercase()
}

impl Default for Rules {
  fn default() -> Self {
    Self {
      basic_land_types: BASIC_LAND_TYPES
        .iter()
        .map(|(land_type, color)| (land_type.to_string(), *color))
        .collect(),
      tutor_phrases: owned(TUTOR_PHRASES),
      combo_phrases: owned(COMBO_PHRASES),
      role_patterns: STOCK_ROLE_PATTERNS.clone(),
      game_changers: GAME_CHANGERS.iter().map(|name| name_key(name)).collect(),
      thresholds: BracketThresholds::default(),
    }
  }
}

impl Rules {
  /// Returns the stock rules with `config` applied.
  /// Fails only when a replacement role pattern does not compile
  pub fn from_config(config: &RulesConfig) -> Result<Self, RulesError> {
    let mut rules = Self::default();
    rules.role_patterns = RolePatterns::from_config(&config.role_patterns)?;
    for name in &config.extra_game_changers {
      rules.game_changers.insert(name_key(name));
    }
    for name in &config.removed_game_changers {
      rules.game_changers.remove(&name_key(name));
    }
    if let Some(thresholds) = config.thresholds {
      rules.thresholds = thresholds;
    }
    Ok(rules)
  }

  /// Returns true if `name` is on the game changer list, ignoring case
  pub fn is_game_changer(&self, name: &str) -> bool {
    self.game_changers.contains(&name_key(name))
  }

  pub fn game_changer_count(&self) -> usize {
    self.game_changers.len()
  }

  pub fn basic_land_types(&self) -> &[(String, ManaColor)] {
    &self.basic_land_types
  }

  pub fn tutor_phrases(&self) -> &[String] {
    &self.tutor_phrases
  }

  pub fn combo_phrases(&self) -> &[String] {
    &self.combo_phrases
  }

  pub fn role_patterns(&self) -> &RolePatterns {
    &self.role_patterns
  }

  pub fn thresholds(&self) -> &BracketThresholds {
    &self.thresholds
  }
}

mod card;
mod color_source_count;
mod mana_cost;

pub use card::*;
pub use color_source_count::*;
pub use mana_cost::*;

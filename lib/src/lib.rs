//! # Commander Deck Analysis Library
//!
//! deckscope analyzes Magic: The Gathering Commander decks. It parses mana costs, classifies
//! cards by the mana they make and the roles they fill, aggregates a deck into a mana curve,
//! color distribution and power bracket, and estimates opening hand land counts by Monte-Carlo
//! simulation on a background worker. It can be hosted in a browser through `wasm-bindgen`.

#[macro_use]
extern crate serde_derive;
extern crate serde;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate rand;
extern crate regex;
extern crate wasm_bindgen;

pub mod analysis;
pub mod bracket;
pub mod card;
pub mod classify;
pub mod deck;
pub mod interface;
pub mod rules;
pub mod scryfall;
pub mod simulation;
pub mod worker;

pub use crate::analysis::analyze;
pub use crate::simulation::run_simulation;
pub use crate::worker::MulliganWorker;

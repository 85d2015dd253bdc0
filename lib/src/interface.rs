//! # Caller interface
//!
//! Defines the two calls a host application makes, deck analysis and opening hand
//! simulation, over typed values, JSON text, and `wasm-bindgen` `JsValue`s.
//! Failures come back as an `ErrorResponse` value rather than an exception.
use crate::analysis::{analyze_with_rules, DeckAnalysis};
use crate::deck::{Deck, DeckBuilder};
use crate::rules::{Rules, RulesConfig, DEFAULT_RULES};
use crate::scryfall::{ScryfallCard, ScryfallDeck};
use crate::simulation::{
    run_simulation, ErrorResponse, SimulationConfig, SimulationError, SimulationRequest,
    SimulationResult,
};

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

/// Input for a deck analysis
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalyzeInput {
    #[serde(flatten)]
    pub deck: ScryfallDeck,
    /// Rule overrides, the stock rules are used when absent
    #[serde(default)]
    pub rules: Option<RulesConfig>,
}

/// Input for an opening hand simulation
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SimulateInput {
    #[serde(default)]
    pub deck_cards: Vec<ScryfallCard>,
    pub trial_count: usize,
    pub target_land_count: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub commander: Option<ScryfallCard>,
    /// Defaults to true
    #[serde(default)]
    pub include_commander_in_pool: Option<bool>,
}

impl SimulateInput {
    fn config(&self) -> SimulationConfig {
        let defaults = SimulationConfig::default();
        SimulationConfig {
            include_commander_in_pool: self
                .include_commander_in_pool
                .unwrap_or(defaults.include_commander_in_pool),
            seed: self.seed,
        }
    }
}

/// Analyzes a deck. Fails only when the rule overrides carry a role pattern that does not compile
pub fn run_analyze(input: AnalyzeInput) -> Result<DeckAnalysis, SimulationError> {
    let deck: Deck = input.deck.into();
    match input.rules {
        Some(config) => {
            let rules = Rules::from_config(&config)
                .map_err(|e| SimulationError::MalformedRequest(e.to_string()))?;
            Ok(analyze_with_rules(&deck, &rules))
        }
        None => Ok(analyze_with_rules(&deck, &DEFAULT_RULES)),
    }
}

pub fn run_simulate(input: SimulateInput) -> Result<SimulationResult, SimulationError> {
    let config = input.config();
    let mut b = DeckBuilder::new();
    if let Some(commander) = input.commander {
        b = b.commander(commander.into());
    }
    for card in input.deck_cards {
        b = b.insert(card.into());
    }
    let request = SimulationRequest::from_deck(
        &b.build(),
        input.trial_count,
        input.target_land_count,
        &config,
    );
    run_simulation(&request, &config)
}

fn malformed(e: impl std::fmt::Display) -> ErrorResponse {
    rejected(&SimulationError::MalformedRequest(e.to_string()))
}

fn rejected(e: &SimulationError) -> ErrorResponse {
    warn!("Rejected request: {}", e);
    ErrorResponse::from(e)
}

pub fn analyze_response(input: AnalyzeInput) -> Result<DeckAnalysis, ErrorResponse> {
    run_analyze(input).map_err(|e| rejected(&e))
}

/// Runs a simulation, converting any failure into the `ErrorResponse` shape
pub fn simulate_response(input: SimulateInput) -> Result<SimulationResult, ErrorResponse> {
    run_simulate(input).map_err(|e| rejected(&e))
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(
            r#"{{"error":"Failed to serialize output: {}","kind":"invalid_request"}}"#,
            e.to_string().replace('"', "'")
        )
    })
}

/// Runs an analysis over a JSON deck, returning the analysis or an `ErrorResponse` as JSON
pub fn analyze_json(input: &str) -> String {
    let input: AnalyzeInput = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(e) => return to_json(&malformed(e)),
    };
    match analyze_response(input) {
        Ok(analysis) => to_json(&analysis),
        Err(response) => to_json(&response),
    }
}

/// Runs a simulation over a JSON request, returning the result or an `ErrorResponse` as JSON
pub fn simulate_json(input: &str) -> String {
    let input: SimulateInput = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(e) => return to_json(&malformed(e)),
    };
    match simulate_response(input) {
        Ok(result) => to_json(&result),
        Err(response) => to_json(&response),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    JsValue::from_serde(value).unwrap_or(JsValue::NULL)
}

/// Analyzes a deck
/// # Example
///
///  ```js
///  const deck = { commander: {...}, cards: [...] };
///  const analysis = require('deckscope').deckscope_analyze(deck);
///  ```
#[wasm_bindgen]
pub fn deckscope_analyze(input: &JsValue) -> JsValue {
    let input: AnalyzeInput = match input.into_serde() {
        Ok(v) => v,
        Err(e) => return to_js(&malformed(e)),
    };
    match analyze_response(input) {
        Ok(analysis) => to_js(&analysis),
        Err(response) => to_js(&response),
    }
}

/// Runs an opening hand simulation on the calling thread, so hosts should call it from a
/// web worker. Returns a `SimulationResult` or an `{ error, kind }` object
#[wasm_bindgen]
pub fn deckscope_simulate(input: &JsValue) -> JsValue {
    let input: SimulateInput = match input.into_serde() {
        Ok(v) => v,
        Err(e) => return to_js(&malformed(e)),
    };
    match simulate_response(input) {
        Ok(result) => to_js(&result),
        Err(response) => to_js(&response),
    }
}

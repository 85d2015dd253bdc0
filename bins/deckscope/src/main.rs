extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;
extern crate deckscope;

use deckscope::analysis::DeckAnalysis;
use deckscope::deck::Deck;
use deckscope::scryfall::ScryfallDeck;
use deckscope::simulation::{
  SimulationConfig, SimulationError, SimulationRequest, SimulationResult,
};
use deckscope::{analyze, MulliganWorker};
use std::env;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

const DEFAULT_TRIALS: usize = 10_000;
const DEFAULT_TARGET: usize = 3;

#[derive(Debug)]
enum Error {
  Usage(String),
  Json(serde_json::Error),
  Io(std::io::Error),
  Simulation(SimulationError),
}

impl From<std::io::Error> for Error {
  fn from(error: std::io::Error) -> Self {
    Self::Io(error)
  }
}

impl From<serde_json::Error> for Error {
  fn from(error: serde_json::Error) -> Self {
    Self::Json(error)
  }
}

impl From<SimulationError> for Error {
  fn from(error: SimulationError) -> Self {
    Self::Simulation(error)
  }
}

#[derive(Debug, Serialize)]
struct Report {
  analysis: DeckAnalysis,
  simulation: SimulationResult,
}

fn parse_arg(args: &[String], index: usize, default: usize) -> Result<usize, Error> {
  match args.get(index) {
    None => Ok(default),
    Some(arg) => arg
      .parse()
      .map_err(|_| Error::Usage(format!("Expected a non-negative integer, got {}", arg))),
  }
}

fn main() -> Result<(), Error> {
  let _ = env_logger::try_init();
  let args: Vec<String> = env::args().collect();
  if args.len() < 2 {
    return Err(Error::Usage(
      "usage: deckscope <deck.json> [trials] [target]".to_string(),
    ));
  }
  let trials = parse_arg(&args, 2, DEFAULT_TRIALS)?;
  let target = parse_arg(&args, 3, DEFAULT_TARGET)?;

  let deck_path = Path::new(&args[1]);
  info!("Loading deck JSON file @ {}", deck_path.display());
  let mut json_file_contents = String::new();
  File::open(deck_path)?.read_to_string(&mut json_file_contents)?;
  let record: ScryfallDeck = serde_json::from_str(&json_file_contents)?;
  let deck: Deck = record.into();

  info!("Analyzing {} cards", deck.size(true));
  let analysis = analyze(&deck);

  let config = SimulationConfig::default();
  let worker = MulliganWorker::spawn(config)?;
  info!("Simulating {} opening hands", trials);
  let request = SimulationRequest::from_deck(&deck, trials, target, &config);
  let simulation = worker.submit(request)?.wait();
  worker.shutdown();

  let report = Report {
    analysis,
    simulation: simulation?,
  };
  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}

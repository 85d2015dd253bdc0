//! # Background simulation worker
//!
//! `MulliganWorker` owns a dedicated thread that runs opening hand simulations so a long
//! trial loop never blocks the caller. Requests and results travel over channels, one
//! request at a time. The worker lives until `shutdown` is called or it is dropped, and
//! tearing it down aborts whatever request is running.
use crate::simulation::{
  rng_from_config, simulate, SimulationConfig, SimulationError, SimulationRequest,
  SimulationResult,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

type Reply = Result<SimulationResult, SimulationError>;

struct Job {
  request: SimulationRequest,
  reply: Sender<Reply>,
}

#[derive(Debug)]
pub struct MulliganWorker {
  jobs: Option<Sender<Job>>,
  handle: Option<JoinHandle<()>>,
  busy: Arc<AtomicBool>,
  abort: Arc<AtomicBool>,
}

/// PendingSimulation is the caller's handle on a submitted request.
/// Collecting the reply consumes the handle
#[derive(Debug)]
pub struct PendingSimulation {
  result: Receiver<Reply>,
}

fn torn_down() -> SimulationError {
  SimulationError::WorkerUnavailable("the simulation worker has shut down".to_string())
}

impl MulliganWorker {
  /// Starts the worker thread
  pub fn spawn(config: SimulationConfig) -> Result<Self, SimulationError> {
    let (jobs, inbox) = mpsc::channel::<Job>();
    let busy = Arc::new(AtomicBool::new(false));
    let abort = Arc::new(AtomicBool::new(false));
    let worker_busy = Arc::clone(&busy);
    let worker_abort = Arc::clone(&abort);
    let handle = thread::Builder::new()
      .name("mulligan-worker".to_string())
      .spawn(move || run_worker(inbox, config, worker_busy, worker_abort))
      .map_err(|e| SimulationError::WorkerUnavailable(e.to_string()))?;
    info!("Started mulligan simulation worker");
    Ok(Self {
      jobs: Some(jobs),
      handle: Some(handle),
      busy,
      abort,
    })
  }

  /// Sends a request to the worker. Invalid requests are rejected here without reaching
  /// the worker, and a second request while one is outstanding fails with `Busy`
  pub fn submit(&self, request: SimulationRequest) -> Result<PendingSimulation, SimulationError> {
    self.enqueue(request).map_err(|e| {
      warn!("Rejected simulation request: {}", e);
      e
    })
  }

  fn enqueue(&self, request: SimulationRequest) -> Result<PendingSimulation, SimulationError> {
    request.validate()?;
    let jobs = self.jobs.as_ref().ok_or_else(torn_down)?;
    if self
      .busy
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_err()
    {
      return Err(SimulationError::Busy);
    }
    let (reply, result) = mpsc::channel();
    if jobs.send(Job { request, reply }).is_err() {
      self.busy.store(false, Ordering::Release);
      return Err(torn_down());
    }
    Ok(PendingSimulation { result })
  }

  /// Returns true while a request is running
  pub fn is_busy(&self) -> bool {
    self.busy.load(Ordering::Acquire)
  }

  /// Stops the worker, aborting any running request, and waits for the thread to exit
  pub fn shutdown(mut self) {
    self.teardown();
  }

  fn teardown(&mut self) {
    if self.handle.is_none() {
      return;
    }
    self.abort.store(true, Ordering::Release);
    // Closing the channel ends the worker loop once the current job returns
    self.jobs.take();
    if let Some(handle) = self.handle.take() {
      if handle.join().is_err() {
        warn!("Mulligan simulation worker panicked");
      }
    }
    self.busy.store(false, Ordering::Release);
    info!("Stopped mulligan simulation worker");
  }
}

impl Drop for MulliganWorker {
  fn drop(&mut self) {
    self.teardown();
  }
}

fn run_worker(
  inbox: Receiver<Job>,
  config: SimulationConfig,
  busy: Arc<AtomicBool>,
  abort: Arc<AtomicBool>,
) {
  let mut rng = rng_from_config(&config);
  for Job { request, reply } in inbox.iter() {
    let result = if abort.load(Ordering::Acquire) {
      Err(torn_down())
    } else {
      simulate(&request, &mut rng, &abort)
    };
    if let Err(e) = &result {
      debug!("Simulation request failed: {}", e);
    }
    // Cleared before replying so a caller holding the result can submit again at once
    busy.store(false, Ordering::Release);
    // The caller may have dropped its handle
    let _ = reply.send(result);
  }
}

impl PendingSimulation {
  /// Blocks until the worker replies
  pub fn wait(self) -> Result<SimulationResult, SimulationError> {
    self.result.recv().unwrap_or_else(|_| Err(torn_down()))
  }

  /// Returns the reply if it has arrived, without blocking. Otherwise hands the
  /// still pending handle back
  pub fn try_result(self) -> Result<Result<SimulationResult, SimulationError>, Self> {
    match self.result.try_recv() {
      Ok(reply) => Ok(reply),
      Err(TryRecvError::Empty) => Err(self),
      Err(TryRecvError::Disconnected) => Ok(Err(torn_down())),
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::card::Card;
  use crate::simulation::*;
  use crate::worker::*;
  use std::time::Duration;

  fn request(trials: usize, target: usize) -> SimulationRequest {
    SimulationRequest::new(
      vec![
        Card::new("Forest", "Basic Land — Forest").with_quantity(38),
        Card::new("Llanowar Elves", "Creature — Elf Druid").with_quantity(61),
      ],
      trials,
      target,
    )
  }

  fn seeded() -> SimulationConfig {
    SimulationConfig {
      seed: Some(11),
      ..SimulationConfig::default()
    }
  }

  #[test]
  fn round_trip() {
    let worker = MulliganWorker::spawn(seeded()).unwrap();
    let result = worker.submit(request(1000, 3)).unwrap().wait().unwrap();
    assert_eq!(result.trial_count, 1000);
    assert_eq!(result.target_land_count, 3);
    assert!(!worker.is_busy());
    worker.shutdown();
  }

  #[test]
  fn worker_is_reused_across_requests() {
    let worker = MulliganWorker::spawn(seeded()).unwrap();
    for target in 0..=7 {
      let result = worker.submit(request(200, target)).unwrap().wait().unwrap();
      assert_eq!(result.target_land_count, target);
    }
    worker.shutdown();
  }

  #[test]
  fn one_request_in_flight() {
    let worker = MulliganWorker::spawn(seeded()).unwrap();
    // Runs until shutdown aborts it
    let pending = worker.submit(request(1 << 40, 3)).unwrap();
    assert!(worker.is_busy());
    assert_eq!(
      worker.submit(request(10, 3)).unwrap_err(),
      SimulationError::Busy
    );
    assert_eq!(
      worker.submit(request(10, 3)).unwrap_err(),
      SimulationError::Busy
    );
    worker.shutdown();
    assert_eq!(pending.wait().unwrap_err().kind(), ErrorKind::WorkerUnavailable);
  }

  #[test]
  fn collected_result_frees_the_worker() {
    let worker = MulliganWorker::spawn(seeded()).unwrap();
    assert!(worker.submit(request(100, 3)).unwrap().wait().is_ok());
    assert!(!worker.is_busy());
    assert!(worker.submit(request(100, 3)).unwrap().wait().is_ok());
  }

  #[test]
  fn invalid_requests_never_reach_the_worker() {
    let worker = MulliganWorker::spawn(seeded()).unwrap();
    let err = worker.submit(request(0, 3)).unwrap_err();
    assert_eq!(err, SimulationError::InvalidTrialCount(0));
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert!(!worker.is_busy());
    let err = worker
      .submit(SimulationRequest::new(Vec::new(), 10, 3))
      .unwrap_err();
    assert_eq!(err, SimulationError::EmptyDeck);
  }

  #[test]
  fn shutdown_aborts_running_request() {
    let worker = MulliganWorker::spawn(seeded()).unwrap();
    let pending = worker.submit(request(1 << 40, 3)).unwrap();
    worker.shutdown();
    let err = pending.wait().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WorkerUnavailable);
  }

  #[test]
  fn try_result_polls_until_done() {
    let worker = MulliganWorker::spawn(seeded()).unwrap();
    let mut pending = worker.submit(request(5000, 2)).unwrap();
    let mut reply = None;
    for _ in 0..1000 {
      match pending.try_result() {
        Ok(r) => {
          reply = Some(r);
          break;
        }
        Err(still_pending) => pending = still_pending,
      }
      std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(reply.unwrap().unwrap().trial_count, 5000);
  }

  #[test]
  fn try_result_on_a_running_request_returns_the_handle() {
    let worker = MulliganWorker::spawn(seeded()).unwrap();
    let pending = worker.submit(request(1 << 40, 3)).unwrap();
    let pending = pending.try_result().unwrap_err();
    worker.shutdown();
    assert_eq!(pending.wait().unwrap_err().kind(), ErrorKind::WorkerUnavailable);
  }

  #[test]
  fn dropped_handle_frees_the_worker() {
    let worker = MulliganWorker::spawn(seeded()).unwrap();
    drop(worker.submit(request(1000, 3)).unwrap());
    for _ in 0..1000 {
      if !worker.is_busy() {
        break;
      }
      std::thread::sleep(Duration::from_millis(5));
    }
    assert!(!worker.is_busy());
    assert!(worker.submit(request(10, 3)).unwrap().wait().is_ok());
  }
}

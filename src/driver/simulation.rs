//! Background driver that steps a [`LifeEngine`] and publishes snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, SendTimeoutError, Sender, bounded};

use super::{Command, Snapshot};
use crate::compute::{Bounds, CellSet, LifeEngine};
use crate::schema::{ConfigError, DriverConfig};

/// Driver errors.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Invalid driver configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Engine state guarded by the driver lock.
struct Shared {
    engine: LifeEngine,
    /// Index of the most recently computed generation.
    generation: u64,
}

impl Shared {
    fn step(&mut self) -> Snapshot {
        self.engine.step(None, None);
        self.generation += 1;
        Snapshot {
            generation: self.generation,
            bounds: self.engine.bounds(),
            cells: self.engine.cells().clone(),
        }
    }
}

/// Runs generation stepping on its own thread.
///
/// The engine is only reachable through the driver; consumers receive
/// copies through a bounded channel. When the channel is full the stepping
/// thread blocks (without holding the engine lock) until a consumer drains it.
///
/// Usage:
/// ```ignore
/// let mut driver = SimulationDriver::new(engine, DriverConfig::default())?;
/// driver.start()?;
/// loop {
///     if let Some(snapshot) = driver.try_take_snapshot() {
///         render(&snapshot.cells);
///     }
/// }
/// ```
pub struct SimulationDriver {
    shared: Arc<Mutex<Shared>>,
    sender: Sender<Snapshot>,
    receiver: Receiver<Snapshot>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    config: DriverConfig,
}

impl SimulationDriver {
    /// Take ownership of `engine`. The driver starts idle.
    ///
    /// The engine keeps its own random source; `config.rng_seed` is applied
    /// by whoever builds the engine, before the initial board is seeded.
    pub fn new(engine: LifeEngine, config: DriverConfig) -> Result<Self, DriverError> {
        config.validate()?;

        let (sender, receiver) = bounded(config.queue_capacity);

        Ok(Self {
            shared: Arc::new(Mutex::new(Shared {
                engine,
                generation: 0,
            })),
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            config,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn the stepping loop. Returns `false` if it was already running.
    pub fn start(&mut self) -> Result<bool, DriverError> {
        if self.is_running() {
            return Ok(false);
        }
        self.join_worker();

        self.running.store(true, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let sender = self.sender.clone();
        let running = Arc::clone(&self.running);
        let timeout = Duration::from_millis(self.config.send_timeout_ms);

        let spawned = thread::Builder::new()
            .name("life-driver".into())
            .spawn(move || run_loop(&shared, &sender, &running, timeout));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                log::info!(
                    "Simulation driver started (queue capacity {})",
                    self.config.queue_capacity
                );
                Ok(true)
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                Err(DriverError::Spawn(e))
            }
        }
    }

    /// Ask the loop to stop and wait for it. A step already in progress
    /// completes first. Returns `false` if the driver was idle.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running.swap(false, Ordering::AcqRel);
        self.join_worker();
        if was_running {
            log::info!("Simulation driver stopped at generation {}", self.generation());
        }
        was_running
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Simulation thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.running.load(Ordering::Acquire)
    }

    /// Apply a mutation under the engine lock.
    ///
    /// Returns the snapshot produced by [`Command::Step`], `None` otherwise.
    pub fn apply(&self, command: Command) -> Option<Snapshot> {
        let mut shared = self.lock();
        match command {
            Command::Reseed(p) => {
                shared.engine.clear();
                let draws = shared.engine.seed_random(p);
                log::debug!("Reseeded board with {} draws", draws);
            }
            Command::AddRandom(p) => {
                if let Some(latest) = self.drain_latest() {
                    log::debug!("Restoring pending generation {}", latest.generation);
                    shared.engine.set_cells(latest.cells);
                }
                let draws = shared.engine.seed_random(p);
                log::debug!("Added {} random draws", draws);
            }
            Command::Clear => shared.engine.clear(),
            Command::Resize(bounds) => shared.engine.set_bounds(bounds),
            Command::Inject { cells, additive } => {
                if additive {
                    shared.engine.extend_cells(cells);
                } else {
                    shared.engine.set_cells(cells);
                }
            }
            Command::Step => return Some(shared.step()),
        }
        None
    }

    /// Clear the board, then seed with density or count `p`.
    pub fn reseed(&self, p: f64) {
        self.apply(Command::Reseed(p));
    }

    /// Fold the newest unconsumed snapshot back into the engine, then add
    /// random cells.
    ///
    /// Only the snapshot's cells are restored. The engine keeps its current
    /// bounds, so a [`resize`](Self::resize) issued after the snapshot was
    /// published still applies and the random cells land on the resized board.
    pub fn add_random(&self, p: f64) {
        self.apply(Command::AddRandom(p));
    }

    pub fn clear(&self) {
        self.apply(Command::Clear);
    }

    /// Board extent for subsequent steps.
    pub fn resize(&self, bounds: Bounds) {
        self.apply(Command::Resize(bounds));
    }

    /// Place cells on the board.
    pub fn inject(&self, cells: CellSet, additive: bool) {
        self.apply(Command::Inject { cells, additive });
    }

    /// Advance one generation on the calling thread. The snapshot is
    /// returned directly rather than published.
    pub fn step_once(&self) -> Snapshot {
        self.lock().step()
    }

    /// Oldest buffered snapshot, if any. Never blocks.
    pub fn try_take_snapshot(&self) -> Option<Snapshot> {
        self.receiver.try_recv().ok()
    }

    /// Drain the buffer and return only the newest snapshot.
    pub fn take_latest(&self) -> Option<Snapshot> {
        self.drain_latest()
    }

    fn drain_latest(&self) -> Option<Snapshot> {
        self.receiver.try_iter().last()
    }

    /// Discard every buffered snapshot. Returns how many were dropped.
    pub fn clear_pending(&self) -> usize {
        self.receiver.try_iter().count()
    }

    /// Number of buffered, unconsumed snapshots.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Another handle onto the snapshot channel. Each snapshot is delivered
    /// to exactly one receiver.
    pub fn subscribe(&self) -> Receiver<Snapshot> {
        self.receiver.clone()
    }

    /// Index of the most recently computed generation.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn bounds(&self) -> Bounds {
        self.lock().engine.bounds()
    }

    /// Copy of the engine's current live cells.
    pub fn live_cells(&self) -> CellSet {
        self.lock().engine.cells().clone()
    }
}

impl Drop for SimulationDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    shared: &Mutex<Shared>,
    sender: &Sender<Snapshot>,
    running: &AtomicBool,
    timeout: Duration,
) {
    while running.load(Ordering::Acquire) {
        let snapshot = shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .step();
        log::trace!(
            "Generation {}: {} live cells",
            snapshot.generation,
            snapshot.population()
        );

        if !publish(sender, snapshot, running, timeout) {
            break;
        }
    }
}

/// Blocking send that gives up once the run flag is cleared.
fn publish(
    sender: &Sender<Snapshot>,
    snapshot: Snapshot,
    running: &AtomicBool,
    timeout: Duration,
) -> bool {
    let mut pending = snapshot;
    loop {
        match sender.send_timeout(pending, timeout) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(snapshot)) => {
                if !running.load(Ordering::Acquire) {
                    return false;
                }
                pending = snapshot;
            }
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}

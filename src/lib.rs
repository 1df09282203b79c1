//! Sparse Life - Conway's Game of Life over a sparse live-cell set.
//!
//! This crate provides the simulation core of a Game of Life dashboard
//! panel: a bounded, non-wrapping engine whose state is only the set of
//! live cells, a small algebra of geometric transforms for placing seed
//! patterns, an RLE pattern decoder, and a background driver that steps
//! the engine and hands snapshots to a polling consumer.
//!
//! # Architecture
//!
//! - `schema`: Configuration and seeding types
//! - `compute`: Engine, pattern transforms, RLE decoding, pattern library
//! - `driver`: Background stepping thread and snapshot channel
//!
//! # Example
//!
//! ```rust,no_run
//! use sparse_life::{
//!     compute::{Bounds, LifeEngine, PatternLibrary, Transform},
//!     driver::SimulationDriver,
//!     schema::DriverConfig,
//! };
//!
//! let bounds = Bounds::new(80, 60);
//! let library = PatternLibrary::builtin();
//! let glider = library
//!     .get("glider")
//!     .unwrap()
//!     .place(&[Transform::HorizontalFlip], bounds, true)
//!     .unwrap();
//!
//! let mut engine = LifeEngine::with_bounds(bounds);
//! engine.set_cells(glider);
//!
//! let mut driver = SimulationDriver::new(engine, DriverConfig::default()).unwrap();
//! driver.start().unwrap();
//! while let Some(snapshot) = driver.try_take_snapshot() {
//!     println!("generation {}: {} cells", snapshot.generation, snapshot.population());
//! }
//! driver.stop();
//! ```

pub mod compute;
pub mod driver;
pub mod schema;

// Re-export commonly used types
pub use compute::{Bounds, Cell, CellSet, LifeEngine, Pattern, PatternLibrary, Transform};
pub use driver::{Command, SimulationDriver, Snapshot};
pub use schema::{DriverConfig, Seed, SimulationConfig};

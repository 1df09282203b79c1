//! Background simulation driver.
//!
//! A single thread repeatedly steps the engine and publishes each
//! generation into a bounded channel. Consumers poll at their own cadence
//! and may skip generations; a full channel blocks the stepping thread.
//!
//! ```text
//!              Command (reseed, add random, resize, ...)
//!   owner ───────────────────────────┐
//!                                    ▼
//!                          ┌───────────────────┐
//!                          │ Mutex<LifeEngine> │
//!                          └───────────────────┘
//!                                    │ step (lock held)
//!                                    ▼
//!   ┌──────────────┐   Snapshot   ┌────────────────────┐
//!   │ driver thread│ ───────────▶ │ bounded(capacity)  │ ──▶ try_take_snapshot
//!   └──────────────┘ (lock free)  └────────────────────┘
//! ```

mod simulation;
mod snapshot;

pub use simulation::{DriverError, SimulationDriver};
pub use snapshot::{Command, Snapshot};

//! Compute module - Generation stepping, pattern transforms and decoding.

mod engine;
mod library;
mod rle;
mod transform;

pub use engine::*;
pub use library::*;
pub use rle::*;
pub use transform::*;

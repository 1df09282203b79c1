//! Named seed patterns decoded from RLE.

use std::collections::BTreeMap;

use super::{Bounds, CellSet, Transform, TransformError, center_in, compose, decode_rle};

/// Built-in patterns as `(name, rle)` pairs.
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("block", "2o$2o!"),
    ("blinker", "3o!"),
    ("toad", "b3o$3o!"),
    ("beacon", "2o$2o$2b2o$2b2o!"),
    ("clock", "2bob$obob$bobo$bo!"),
    ("glider", "bo$2bo$3o!"),
    ("lwss", "bo2bo$o4b$o3bo$4o!"),
    ("r-pentomino", "b2o$2o$bo!"),
    ("acorn", "bo$3bo$2o2b3o!"),
    ("diehard", "6bob$2o6b$bo3b3o!"),
    (
        "pulsar",
        "2b3o3b3o2$o4bobo4bo$o4bobo4bo$o4bobo4bo$2b3o3b3o2$2b3o3b3o$\
         o4bobo4bo$o4bobo4bo$o4bobo4bo2$2b3o3b3o!",
    ),
    (
        "gosper-glider-gun",
        "24bo$22bobo$12b2o6b2o12b2o$11bo3bo4b2o12b2o$2o8bo5bo3b2o$\
         2o8bo3bob2o4bobo$10bo5bo7bo$11bo3bo$12b2o!",
    ),
];

/// Pattern library errors.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),
    #[error("Pattern {0} decodes to no live cells")]
    EmptyPattern(String),
    #[error("Pattern placement failed: {0}")]
    Transform(#[from] TransformError),
}

/// A named, immutable seed shape in its own coordinate frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub name: String,
    pub cells: CellSet,
}

impl Pattern {
    /// Decode a pattern from RLE text.
    pub fn from_rle(name: &str, rle: &str) -> Result<Self, LibraryError> {
        let cells = decode_rle(rle);
        if cells.is_empty() {
            return Err(LibraryError::EmptyPattern(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            cells,
        })
    }

    /// Move the pattern into board coordinates.
    ///
    /// `ops` run first, in the pattern's own frame; with `center` the result
    /// is then translated to the middle of `bounds`.
    pub fn place(
        &self,
        ops: &[Transform],
        bounds: Bounds,
        center: bool,
    ) -> Result<CellSet, TransformError> {
        let placed = compose(&self.cells, ops, false)?;
        if center {
            center_in(&placed, bounds)
        } else {
            Ok(placed)
        }
    }
}

/// Lookup table of named patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    patterns: BTreeMap<String, Pattern>,
}

impl PatternLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding the built-in patterns.
    pub fn builtin() -> Self {
        let mut library = Self::new();
        for &(name, rle) in BUILTIN_PATTERNS {
            // Built-in RLE is covered by tests; a bad entry is skipped, not fatal.
            if let Err(e) = library.insert_rle(name, rle) {
                log::warn!("Skipping built-in pattern: {}", e);
            }
        }
        library
    }

    /// Decode and add (or replace) a pattern.
    pub fn insert_rle(&mut self, name: &str, rle: &str) -> Result<&Pattern, LibraryError> {
        let pattern = Pattern::from_rle(name, rle)?;
        log::debug!("Loaded pattern {} ({} cells)", name, pattern.cells.len());
        self.patterns.insert(name.to_string(), pattern);
        self.get(name)
    }

    pub fn get(&self, name: &str) -> Result<&Pattern, LibraryError> {
        self.patterns
            .get(name)
            .ok_or_else(|| LibraryError::UnknownPattern(name.to_string()))
    }

    /// Pattern names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

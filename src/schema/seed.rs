//! Seed types for populating a board.

use serde::{Deserialize, Serialize};

use crate::compute::{Cell, LibraryError, LifeEngine, PatternLibrary, Transform};

/// Density used when the owner does not ask for anything else.
pub const DEFAULT_DENSITY: f64 = 0.2;

fn default_center() -> bool {
    true
}

/// How the initial live cells are chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Seed {
    /// Random cells: `p < 1` is a density, otherwise a count.
    Random { p: f64 },
    /// A named library pattern moved into place.
    Pattern {
        /// Library name.
        name: String,
        /// Operations applied in the pattern's own frame.
        #[serde(default)]
        transforms: Vec<Transform>,
        /// Center the result on the board after transforming.
        #[serde(default = "default_center")]
        center: bool,
    },
    /// Explicit board coordinates.
    Cells { cells: Vec<Cell> },
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Random {
            p: DEFAULT_DENSITY,
        }
    }
}

impl Seed {
    /// Add this seed's cells to the engine's live set.
    ///
    /// Returns the engine population afterwards.
    pub fn apply(
        &self,
        engine: &mut LifeEngine,
        library: &PatternLibrary,
    ) -> Result<usize, LibraryError> {
        match self {
            Seed::Random { p } => {
                engine.seed_random(*p);
            }
            Seed::Pattern {
                name,
                transforms,
                center,
            } => {
                let cells = library
                    .get(name)?
                    .place(transforms, engine.bounds(), *center)?;
                engine.extend_cells(cells);
            }
            Seed::Cells { cells } => {
                engine.extend_cells(cells.iter().copied());
            }
        }
        Ok(engine.population())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Bounds;

    #[test]
    fn test_default_is_random_density() {
        assert_eq!(Seed::default(), Seed::Random { p: 0.2 });
    }

    #[test]
    fn test_pattern_seed_centered() {
        let library = PatternLibrary::builtin();
        let mut engine = LifeEngine::with_bounds(Bounds::new(20, 20));
        let seed = Seed::Pattern {
            name: "blinker".into(),
            transforms: vec![Transform::Rotate { origin: (0, 0) }],
            center: true,
        };
        assert_eq!(seed.apply(&mut engine, &library).unwrap(), 3);
        assert!(engine.is_alive(10, 9));
        assert!(engine.is_alive(10, 10));
        assert!(engine.is_alive(10, 11));
    }

    #[test]
    fn test_unknown_pattern_seed() {
        let library = PatternLibrary::builtin();
        let mut engine = LifeEngine::new();
        let seed = Seed::Pattern {
            name: "missing".into(),
            transforms: vec![],
            center: true,
        };
        assert!(matches!(
            seed.apply(&mut engine, &library),
            Err(LibraryError::UnknownPattern(_))
        ));
    }

    #[test]
    fn test_seed_json() {
        let json = r#"{"type":"Pattern","name":"glider","transforms":[{"op":"VerticalFlip"}]}"#;
        let seed: Seed = serde_json::from_str(json).unwrap();
        assert_eq!(
            seed,
            Seed::Pattern {
                name: "glider".into(),
                transforms: vec![Transform::VerticalFlip],
                center: true,
            }
        );

        let cells: Seed = serde_json::from_str(r#"{"type":"Cells","cells":[[1,2],[3,4]]}"#).unwrap();
        let mut engine = LifeEngine::new();
        cells.apply(&mut engine, &PatternLibrary::new()).unwrap();
        assert!(engine.is_alive(1, 2) && engine.is_alive(3, 4));
    }
}

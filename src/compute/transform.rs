//! Geometric transforms over cell sets.
//!
//! All primitives are bijections on integer coordinates, so any sequence of
//! them can be undone with [`Transform::inverse_sequence`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Bounds, Cell, CellSet};

/// Errors raised by pattern transforms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("Invalid operation spec: {0:?}")]
    InvalidOperationSpec(String),
    #[error("Cannot {0} an empty cell set")]
    DegenerateInput(&'static str),
    #[error("Cannot {0}: result leaves the i32 coordinate range")]
    OutOfRange(&'static str),
}

/// A single placement operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Transform {
    /// Shift every cell by `(dx, dy)`.
    Translate { dx: i32, dy: i32 },
    /// Rotate 90 degrees about `origin`.
    Rotate { origin: Cell },
    /// Mirror x within the bounding box.
    HorizontalFlip,
    /// Mirror y within the bounding box.
    VerticalFlip,
}

impl Transform {
    /// Apply this operation without keeping the input cells.
    pub fn apply(&self, cells: &CellSet) -> Result<CellSet, TransformError> {
        match *self {
            Transform::Translate { dx, dy } => translate(cells, dx, dy, false),
            Transform::Rotate { origin } => rotate_90(cells, origin, false),
            Transform::HorizontalFlip => horizontal_flip(cells, false),
            Transform::VerticalFlip => vertical_flip(cells, false),
        }
    }

    /// Operations that undo `ops` when applied in order.
    ///
    /// Flips are their own inverse and a quarter turn is undone by three
    /// more quarter turns about the same origin.
    pub fn inverse_sequence(ops: &[Transform]) -> Vec<Transform> {
        let mut inverse = Vec::with_capacity(ops.len());
        for op in ops.iter().rev() {
            match *op {
                Transform::Translate { dx, dy } => {
                    inverse.push(Transform::Translate { dx: -dx, dy: -dy })
                }
                Transform::Rotate { origin } => {
                    inverse.extend(std::iter::repeat_n(Transform::Rotate { origin }, 3))
                }
                flip => inverse.push(flip),
            }
        }
        inverse
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Translate { dx, dy } => write!(f, "translate({},{})", dx, dy),
            Transform::Rotate { origin } => write!(f, "rotate({},{})", origin.0, origin.1),
            Transform::HorizontalFlip => write!(f, "hflip"),
            Transform::VerticalFlip => write!(f, "vflip"),
        }
    }
}

impl FromStr for Transform {
    type Err = TransformError;

    /// Parse `translate(dx,dy)`, `rotate(x,y)`, `hflip` or `vflip`
    /// (also `t(..)`, `r(..)`, `h`, `v`).
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || TransformError::InvalidOperationSpec(token.to_string());
        let token = token.trim();

        let (name, args) = match token.find('(') {
            Some(open) => {
                let args = token[open + 1..].strip_suffix(')').ok_or_else(invalid)?;
                (token[..open].trim(), Some(args))
            }
            None => (token, None),
        };

        let pair = |args: Option<&str>| -> Result<(i32, i32), TransformError> {
            let args = args.ok_or_else(invalid)?;
            let mut parts = args.split(',').map(str::trim);
            let a = parts.next().and_then(|s| s.parse().ok());
            let b = parts.next().and_then(|s| s.parse().ok());
            match (a, b, parts.next()) {
                (Some(a), Some(b), None) => Ok((a, b)),
                _ => Err(invalid()),
            }
        };

        match name {
            "translate" | "t" => {
                let (dx, dy) = pair(args)?;
                Ok(Transform::Translate { dx, dy })
            }
            "rotate" | "r" => Ok(Transform::Rotate {
                origin: pair(args)?,
            }),
            "hflip" | "h" if args.is_none() => Ok(Transform::HorizontalFlip),
            "vflip" | "v" if args.is_none() => Ok(Transform::VerticalFlip),
            _ => Err(invalid()),
        }
    }
}

/// Parse a whitespace- or semicolon-separated operation list. Separators
/// inside parentheses belong to the argument list.
pub fn parse_ops(text: &str) -> Result<Vec<Transform>, TransformError> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 && (c == ';' || c.is_whitespace()) => {
                tokens.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    tokens.push(&text[start..]);

    tokens
        .into_iter()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

fn union_if(result: CellSet, original: &CellSet, additive: bool) -> CellSet {
    if additive {
        let mut result = result;
        result.extend(original.iter().copied());
        result
    } else {
        result
    }
}

/// Smallest and largest corners of the cells, or `None` when empty.
pub fn bounding_box(cells: &CellSet) -> Option<(Cell, Cell)> {
    let mut iter = cells.iter();
    let &first = iter.next()?;
    Some(iter.fold((first, first), |((min_x, min_y), (max_x, max_y)), &(x, y)| {
        ((min_x.min(x), min_y.min(y)), (max_x.max(x), max_y.max(y)))
    }))
}

/// Narrow a coordinate computed in `i64` back to a cell.
fn to_cell(x: i64, y: i64, op: &'static str) -> Result<Cell, TransformError> {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        _ => Err(TransformError::OutOfRange(op)),
    }
}

/// Shift every cell by `(dx, dy)`.
pub fn translate(
    cells: &CellSet,
    dx: i32,
    dy: i32,
    additive: bool,
) -> Result<CellSet, TransformError> {
    let moved = cells
        .iter()
        .map(|&(x, y)| to_cell(x as i64 + dx as i64, y as i64 + dy as i64, "translate"))
        .collect::<Result<CellSet, _>>()?;
    Ok(union_if(moved, cells, additive))
}

/// Mirror x values within the bounding box: `x' = max_x + min_x - x`.
pub fn horizontal_flip(cells: &CellSet, additive: bool) -> Result<CellSet, TransformError> {
    let ((min_x, _), (max_x, _)) =
        bounding_box(cells).ok_or(TransformError::DegenerateInput("horizontally flip"))?;
    // The mirror of a cell stays inside the bounding box.
    let flipped = cells
        .iter()
        .map(|&(x, y)| ((max_x as i64 + min_x as i64 - x as i64) as i32, y))
        .collect();
    Ok(union_if(flipped, cells, additive))
}

/// Mirror y values within the bounding box: `y' = max_y + min_y - y`.
pub fn vertical_flip(cells: &CellSet, additive: bool) -> Result<CellSet, TransformError> {
    let ((_, min_y), (_, max_y)) =
        bounding_box(cells).ok_or(TransformError::DegenerateInput("vertically flip"))?;
    let flipped = cells
        .iter()
        .map(|&(x, y)| (x, (max_y as i64 + min_y as i64 - y as i64) as i32))
        .collect();
    Ok(union_if(flipped, cells, additive))
}

/// Rotate a quarter turn about `origin`.
pub fn rotate_90(
    cells: &CellSet,
    origin: Cell,
    additive: bool,
) -> Result<CellSet, TransformError> {
    let (ox, oy) = (origin.0 as i64, origin.1 as i64);
    let rotated = cells
        .iter()
        .map(|&(x, y)| to_cell(oy - y as i64 + ox, x as i64 - ox + oy, "rotate"))
        .collect::<Result<CellSet, _>>()?;
    Ok(union_if(rotated, cells, additive))
}

/// Apply `ops` in order. Intermediate results replace each other; only the
/// final result is unioned with the input when `additive_final` is set.
pub fn compose(
    cells: &CellSet,
    ops: &[Transform],
    additive_final: bool,
) -> Result<CellSet, TransformError> {
    let mut current = cells.clone();
    for op in ops {
        current = op.apply(&current)?;
    }
    Ok(union_if(current, cells, additive_final))
}

/// Like [`compose`] but reads the operations from text.
pub fn compose_str(
    cells: &CellSet,
    ops: &str,
    additive_final: bool,
) -> Result<CellSet, TransformError> {
    compose(cells, &parse_ops(ops)?, additive_final)
}

/// Translate the cells so their bounding box sits in the middle of the board.
pub fn center_in(cells: &CellSet, bounds: Bounds) -> Result<CellSet, TransformError> {
    let ((min_x, min_y), (max_x, max_y)) =
        bounding_box(cells).ok_or(TransformError::DegenerateInput("center"))?;
    let offset = |max: i32, min: i32, extent: i32| {
        let d = (extent as i64 - (max as i64 - min as i64)) / 2 - min as i64;
        i32::try_from(d).map_err(|_| TransformError::OutOfRange("center"))
    };
    let dx = offset(max_x, min_x, bounds.x_max)?;
    let dy = offset(max_y, min_y, bounds.y_max)?;
    translate(cells, dx, dy, false)
}

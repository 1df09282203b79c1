//! Run-length encoded pattern decoding.
//!
//! Tokens are an optional decimal run length followed by `b` (dead run),
//! `o` (live run) or `$` (end of row). The origin is the top-left cell of
//! the pattern, +x to the right and +y downward.
//!
//! Decoding is lenient: header lines (`x = ..`), comment lines (`#..`) and
//! any character outside the token grammar are skipped, and `!` ends the
//! pattern body. Runs that would move the cursor outside the `i32` range, or
//! live runs longer than [`MAX_LIVE_RUN`], are dropped the same way.

use super::CellSet;

/// Longest live run accepted in a single token.
pub const MAX_LIVE_RUN: i32 = 1 << 20;

/// Decode an RLE pattern body into live cell coordinates.
pub fn decode_rle(text: &str) -> CellSet {
    let mut cells = CellSet::new();
    let (mut x, mut y) = (0i32, 0i32);
    let mut run: Option<i32> = None;
    let mut skipped = 0usize;

    'lines: for line in text.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with("x ") || line.starts_with("x=") {
            continue;
        }

        for c in line.chars() {
            match c {
                '0'..='9' => {
                    let digit = c as i32 - '0' as i32;
                    run = Some(run.unwrap_or(0).saturating_mul(10).saturating_add(digit));
                }
                'b' => match x.checked_add(run.take().unwrap_or(1)) {
                    Some(next) => x = next,
                    None => skipped += 1,
                },
                'o' => {
                    let n = run.take().unwrap_or(1);
                    match x.checked_add(n) {
                        Some(end) if n <= MAX_LIVE_RUN => {
                            cells.extend((x..end).map(|cx| (cx, y)));
                            x = end;
                        }
                        _ => skipped += 1,
                    }
                }
                '$' => match y.checked_add(run.take().unwrap_or(1)) {
                    Some(next) => {
                        y = next;
                        x = 0;
                    }
                    None => skipped += 1,
                },
                '!' => break 'lines,
                c if c.is_whitespace() => {}
                _ => {
                    // A run length not followed by a token is dropped with it.
                    run = None;
                    skipped += 1;
                }
            }
        }
    }

    if skipped > 0 {
        log::debug!("RLE decode skipped {} unrecognised or out-of-range tokens", skipped);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Cell;

    fn set(cells: &[Cell]) -> CellSet {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_clock() {
        let cells = decode_rle("2bob$obob$bobo$bo!");
        assert_eq!(
            cells,
            set(&[(2, 0), (0, 1), (2, 1), (1, 2), (3, 2), (1, 3)])
        );
    }

    #[test]
    fn test_glider_with_header() {
        let cells = decode_rle("#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!");
        assert_eq!(cells, set(&[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]));
    }

    #[test]
    fn test_multi_row_skip() {
        let cells = decode_rle("o3$o!");
        assert_eq!(cells, set(&[(0, 0), (0, 3)]));
    }

    #[test]
    fn test_body_split_across_lines() {
        let cells = decode_rle("2o\n2o!");
        assert_eq!(cells, set(&[(0, 0), (1, 0), (2, 0), (3, 0)]));
    }

    #[test]
    fn test_lenient_skip() {
        // Unknown characters are ignored along with any pending run length.
        let cells = decode_rle("o5zo$?o!");
        assert_eq!(cells, set(&[(0, 0), (1, 0), (0, 1)]));
    }

    #[test]
    fn test_runs_past_coordinate_range_are_dropped() {
        // The cursor reaches i32::MAX; the following live run cannot fit.
        assert!(decode_rle("2147483647b2o!").is_empty());
        assert_eq!(
            decode_rle("3o2147483647b$o!"),
            set(&[(0, 0), (1, 0), (2, 0), (0, 1)])
        );
        assert_eq!(decode_rle("o$2147483647$o!"), set(&[(0, 0), (0, 1)]));
    }

    #[test]
    fn test_oversized_live_run_is_dropped() {
        assert!(decode_rle("2147483647o!").is_empty());
        assert_eq!(decode_rle("99999999ob2o!"), set(&[(1, 0), (2, 0)]));
        assert_eq!(decode_rle("4o!").len(), 4);
    }

    #[test]
    fn test_stops_at_terminator() {
        assert_eq!(decode_rle("o!ooo"), set(&[(0, 0)]));
    }

    #[test]
    fn test_empty() {
        assert!(decode_rle("").is_empty());
        assert!(decode_rle("3b2$!").is_empty());
    }
}

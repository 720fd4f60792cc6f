//! Shared utilities for two-player grid games
//!
//! Grids are stored row-major as `[[i8; W]; H]` with row 0 at the bottom.
//! A cell holds [`EMPTY`] or the index of the player occupying it. These
//! helpers cover what every such game needs: line detection, piece counts,
//! and conversion to and from the exchange and tensor forms.

use ndarray::Array2;

use crate::exchange::{DecodeError, ExchangeValue};
use crate::tensor::{ShapeSpec, Tensor};
use crate::typed::PlayerId;

/// Marker for an unoccupied cell
pub const EMPTY: i8 = -1;

/// Line directions: horizontal, vertical, and both diagonals
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Reward vector for a two-player zero-sum game
///
/// # Example
/// ```
/// use engine_core::game_utils::zero_sum_reward;
///
/// assert_eq!(zero_sum_reward(Some(0)), vec![1.0, -1.0]);
/// assert_eq!(zero_sum_reward(Some(1)), vec![-1.0, 1.0]);
/// assert_eq!(zero_sum_reward(None), vec![0.0, 0.0]);
/// ```
pub fn zero_sum_reward(winner: Option<PlayerId>) -> Vec<f32> {
    match winner {
        Some(0) => vec![1.0, -1.0],
        Some(_) => vec![-1.0, 1.0],
        None => vec![0.0, 0.0],
    }
}

/// Whether the piece at (row, col) is part of a line of at least `count`
pub fn line_through<const H: usize, const W: usize>(
    grid: &[[i8; W]; H],
    row: usize,
    col: usize,
    count: usize,
) -> bool {
    let piece = grid[row][col];
    if piece == EMPTY {
        return false;
    }

    let run = |dr: isize, dc: isize| -> usize {
        let mut length = 0;
        let (mut r, mut c) = (row as isize + dr, col as isize + dc);
        while r >= 0 && r < H as isize && c >= 0 && c < W as isize {
            if grid[r as usize][c as usize] != piece {
                break;
            }
            length += 1;
            r += dr;
            c += dc;
        }
        length
    };

    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| 1 + run(dr, dc) + run(-dr, -dc) >= count)
}

/// Which of the two players own at least one line of `count`
pub fn line_owners<const H: usize, const W: usize>(grid: &[[i8; W]; H], count: usize) -> [bool; 2] {
    let mut owners = [false; 2];
    for row in 0..H {
        for col in 0..W {
            match grid[row][col] {
                p @ (0 | 1) if !owners[p as usize] => {
                    owners[p as usize] = line_through(grid, row, col, count);
                }
                _ => {}
            }
        }
    }
    owners
}

/// Number of pieces each player has on the grid
pub fn count_pieces<const H: usize, const W: usize>(grid: &[[i8; W]; H]) -> [usize; 2] {
    let mut counts = [0; 2];
    for &cell in grid.iter().flatten() {
        if let 0 | 1 = cell {
            counts[cell as usize] += 1;
        }
    }
    counts
}

/// Player to move given piece counts, when player 0 always starts
pub fn player_from_counts(counts: [usize; 2]) -> Option<PlayerId> {
    match counts {
        [a, b] if a == b => Some(0),
        [a, b] if a == b + 1 => Some(1),
        _ => None,
    }
}

/// Grid as nested exchange arrays, bottom row first
pub fn grid_to_exchange<const H: usize, const W: usize>(grid: &[[i8; W]; H]) -> ExchangeValue {
    ExchangeValue::Array(grid.iter().map(|row| ExchangeValue::from(&row[..])).collect())
}

/// Parse nested exchange arrays into a grid, checking dimensions and cells
pub fn grid_from_exchange<const H: usize, const W: usize>(
    value: &ExchangeValue,
) -> Result<[[i8; W]; H], DecodeError> {
    let rows = value.decode::<Vec<Vec<i8>>>()?;
    if rows.len() != H {
        return Err(DecodeError::InvalidValue(format!(
            "expected {H} rows but got {}",
            rows.len()
        )));
    }

    let mut grid = [[EMPTY; W]; H];
    for (r, row) in rows.iter().enumerate() {
        if row.len() != W {
            return Err(DecodeError::InvalidValue(format!(
                "expected {W} cells but got {}",
                row.len()
            ))
            .at_index(r));
        }
        for (c, &cell) in row.iter().enumerate() {
            grid[r][c] = check_cell(cell).map_err(|e| e.at_index(c).at_index(r))?;
        }
    }
    Ok(grid)
}

/// Grid as an `int8` tensor of shape `[H, W]`
pub fn grid_to_tensor<const H: usize, const W: usize>(grid: &[[i8; W]; H]) -> Tensor<i8> {
    Tensor::from_array(Array2::from_shape_fn((H, W), |(r, c)| grid[r][c]).into_dyn())
}

/// Parse an `int8` tensor of shape `[H, W]` into a grid
pub fn grid_from_tensor<const H: usize, const W: usize>(
    tensor: &Tensor<i8>,
) -> Result<[[i8; W]; H], DecodeError> {
    ShapeSpec::fixed(&[H, W])
        .check(tensor.shape())
        .map_err(|e| DecodeError::InvalidValue(e.to_string()))?;

    let mut grid = [[EMPTY; W]; H];
    for (i, &cell) in tensor.array().iter().enumerate() {
        grid[i / W][i % W] = check_cell(cell).map_err(|e| e.at_index(i))?;
    }
    Ok(grid)
}

/// Check that no piece floats above an empty cell
pub fn check_gravity<const H: usize, const W: usize>(
    grid: &[[i8; W]; H],
) -> Result<(), DecodeError> {
    for col in 0..W {
        let mut seen_empty = false;
        for row in grid.iter() {
            if row[col] == EMPTY {
                seen_empty = true;
            } else if seen_empty {
                return Err(DecodeError::InvalidValue(format!(
                    "floating piece in column {col}"
                )));
            }
        }
    }
    Ok(())
}

fn check_cell(cell: i8) -> Result<i8, DecodeError> {
    match cell {
        EMPTY | 0 | 1 => Ok(cell),
        other => Err(DecodeError::InvalidValue(format!(
            "cell value {other} is not -1, 0 or 1"
        ))),
    }
}

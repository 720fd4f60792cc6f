//! Shared observation layout for two-player board games.
//!
//! The "planes" tensor mode of TicTacToe and Connect4 is built here so both
//! games present the same layout.

use ndarray::{Array1, Array3};

use crate::game_utils::EMPTY;
use crate::tensor::{Tensor, TensorValue};
use crate::typed::PlayerId;

/// Planes observation for two-player board games.
///
/// - `planes`: `float32[2, H, W]`; plane 0 marks the pieces of the player to
///   move, plane 1 those of the opponent
/// - `legal`: `uint8[num_actions]`; 1 where the action is legal
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPlayerObs {
    pub planes: Tensor<f32>,
    pub legal: Tensor<u8>,
}

impl TwoPlayerObs {
    /// Create observation from a grid, seen from `perspective`.
    ///
    /// `legal` yields the indices of the legal actions; indices at or past
    /// `num_actions` are ignored.
    pub fn from_grid<const H: usize, const W: usize>(
        grid: &[[i8; W]; H],
        legal: impl IntoIterator<Item = usize>,
        num_actions: usize,
        perspective: PlayerId,
    ) -> Self {
        let planes = Array3::from_shape_fn((2, H, W), |(plane, row, col)| {
            let cell = grid[row][col];
            let owner_plane = usize::from(cell as PlayerId != perspective);
            if cell != EMPTY && owner_plane == plane {
                1.0
            } else {
                0.0
            }
        });

        let mut mask = Array1::<u8>::zeros(num_actions);
        for index in legal {
            if let Some(slot) = mask.get_mut(index) {
                *slot = 1;
            }
        }

        Self {
            planes: Tensor::from_array(planes.into_dyn()),
            legal: Tensor::from_array(mask.into_dyn()),
        }
    }

    pub fn into_tensors(self) -> Vec<TensorValue> {
        vec![self.planes.into(), self.legal.into()]
    }
}

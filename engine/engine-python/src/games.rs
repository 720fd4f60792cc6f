//! Classes of the bundled games.

use engine_core::ExchangeValue;
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyTuple};

use crate::bind_game;
use crate::ops::action_from_exchange;
use crate::registrar::attach_game;

bind_game!(Connect4, Connect4State, Connect4Action,
    state {
        /// Cells as a tuple of rows, bottom row first
        #[getter]
        fn grid(&self, py: Python<'_>) -> Py<PyTuple> {
            grid_tuple(py, self.value.grid())
        }

        /// `{"height": ..., "width": ..., "count": ...}` of this board
        #[getter]
        fn config<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
            let config = Connect4::CONFIG;
            let dict = PyDict::new_bound(py);
            dict.set_item("height", config.height)?;
            dict.set_item("width", config.width)?;
            dict.set_item("count", config.count)?;
            Ok(dict)
        }

        /// The action dropping a disc in `column`
        fn action_at(
            slf: &Bound<'_, Self>,
            column: u8,
        ) -> PyResult<Py<Connect4Action>> {
            let value = ExchangeValue::object([("column", column.into())]);
            Ok(action_from_exchange::<Connect4Action>(slf, &value)?)
        }
    },
    action {
        #[getter]
        fn column(&self) -> u8 {
            self.value.column()
        }
    }
);

bind_game!(TicTacToe, TicTacToeState, TicTacToeAction,
    state {
        /// Cells as a tuple of rows, row `y = 0` first
        #[getter]
        fn grid(&self, py: Python<'_>) -> Py<PyTuple> {
            grid_tuple(py, &self.value.grid())
        }

        /// The action marking column `x` of row `y`
        fn action_at(
            slf: &Bound<'_, Self>,
            x: u8,
            y: u8,
        ) -> PyResult<Py<TicTacToeAction>> {
            let value = ExchangeValue::object([("x", x.into()), ("y", y.into())]);
            Ok(action_from_exchange::<TicTacToeAction>(slf, &value)?)
        }
    },
    action {
        #[getter]
        fn x(&self) -> u8 {
            self.value.x()
        }

        #[getter]
        fn y(&self) -> u8 {
            self.value.y()
        }
    }
);

fn grid_tuple<const H: usize, const W: usize>(py: Python<'_>, grid: &[[i8; W]; H]) -> Py<PyTuple> {
    let rows = grid.iter().map(|row| PyTuple::new_bound(py, row.iter().copied()));
    PyTuple::new_bound(py, rows).unbind()
}

/// A game that can be exposed by the module
pub struct GameBinding {
    pub env_id: &'static str,
    pub attach: fn(&Bound<'_, PyModule>, &str) -> PyResult<()>,
}

pub static BINDINGS: &[GameBinding] = &[
    GameBinding {
        env_id: "connect4",
        attach: attach_game::<Connect4State, Connect4Action>,
    },
    GameBinding {
        env_id: "tictactoe",
        attach: attach_game::<TicTacToeState, TicTacToeAction>,
    },
];

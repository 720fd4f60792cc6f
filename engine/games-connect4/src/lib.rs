//! Connect 4 game implementation
//!
//! Connect 4 is a two-player connection game where players drop discs into a
//! vertically suspended grid. The first to form a horizontal, vertical, or
//! diagonal line of four discs wins.
//!
//! The rules are generic over the board: `Connect<HEIGHT, WIDTH, COUNT>` plays
//! on a `WIDTH` x `HEIGHT` grid and needs a line of `COUNT`. The classic game
//! is [`Connect4`].
//!
//! # Board Layout
//!
//! The grid is stored row-major, with row 0 at the bottom. A cell holds -1
//! when empty, otherwise the index of the player owning it:
//! ```text
//! Row 5: [ . . . . . . . ]  <- Top
//! ...
//! Row 0: [ . . . . . . . ]  <- Bottom
//!         Col 0 ... 6
//! ```
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Game;
//! use games_connect4::{Action, Connect4, Connect4State};
//!
//! let mut state = Connect4State::default();
//! Connect4::initialize(&mut state).unwrap();
//! Connect4::apply(&mut state, &Action::drop(3)).unwrap();
//! assert_eq!(Connect4::player(&state), Some(1));
//! ```

use std::fmt;

use engine_core::game_utils::{
    check_gravity, count_pieces, grid_from_exchange, grid_from_tensor, grid_to_exchange,
    grid_to_tensor, line_owners, line_through, player_from_counts, zero_sum_reward, EMPTY,
};
use engine_core::{
    register_game, DecodeError, ExchangeValue, Game, GameError, GameMetadata, PlayerId,
    RegistryError, ShapeError, ShapeSpec, TensorValue, TwoPlayerObs,
};

/// Classic board: 6 rows, 7 columns, four in a row
pub type Connect4 = Connect<6, 7, 4>;

/// State of a [`Connect4`] game
pub type Connect4State = State<6, 7>;

/// Board dimensions of the classic game
pub const COLS: usize = 7;
pub const ROWS: usize = 6;

/// Register Connect4 with the global game registry
pub fn register_connect4() -> Result<(), RegistryError> {
    register_game(Connect4::metadata())
}

/// Connect game state
///
/// Represents the complete state of a game including the grid, the player
/// to move, and winner information.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State<const HEIGHT: usize, const WIDTH: usize> {
    /// Cells: -1=empty, 0/1=player index, row 0 at the bottom
    grid: [[i8; WIDTH]; HEIGHT],
    /// Number of discs in each column
    heights: [u8; WIDTH],
    /// Player who moves next (kept after the game ends)
    player: PlayerId,
    /// Winner, if any
    winner: Option<PlayerId>,
}

impl<const HEIGHT: usize, const WIDTH: usize> State<HEIGHT, WIDTH> {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            grid: [[EMPTY; WIDTH]; HEIGHT],
            heights: [0; WIDTH],
            player: 0,
            winner: None,
        }
    }

    pub fn grid(&self) -> &[[i8; WIDTH]; HEIGHT] {
        &self.grid
    }

    pub fn cell(&self, row: usize, col: usize) -> i8 {
        self.grid[row][col]
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&h| h as usize >= HEIGHT)
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }

    /// Whether a disc may be dropped in `column`
    pub fn is_legal(&self, column: usize) -> bool {
        !self.is_done() && column < WIDTH && (self.heights[column] as usize) < HEIGHT
    }

    /// Get legal moves (columns that are not full), in ascending order
    pub fn legal_moves(&self) -> impl Iterator<Item = u8> + '_ {
        (0..WIDTH)
            .filter(|&col| self.is_legal(col))
            .map(|col| col as u8)
    }

    pub fn moves_played(&self) -> usize {
        self.heights.iter().map(|&h| h as usize).sum()
    }
}

impl<const HEIGHT: usize, const WIDTH: usize> Default for State<HEIGHT, WIDTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const HEIGHT: usize, const WIDTH: usize> fmt::Display for State<HEIGHT, WIDTH> {
    /// Draws the grid top row first: `.` empty, `O` player 0, `X` player 1
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.grid.iter().rev().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<&str> = row
                .iter()
                .map(|&cell| match cell {
                    0 => "O",
                    1 => "X",
                    _ => ".",
                })
                .collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Connect action - drop a disc in a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Action {
    column: u8,
}

impl Action {
    pub fn drop(column: u8) -> Self {
        Self { column }
    }

    /// Get the column for this action
    pub fn column(&self) -> u8 {
        self.column
    }
}

/// Board dimensions and line length of a connect game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub height: usize,
    pub width: usize,
    pub count: usize,
}

/// Connect game rules
#[derive(Debug, Clone, Copy, Default)]
pub struct Connect<const HEIGHT: usize, const WIDTH: usize, const COUNT: usize>;

impl<const HEIGHT: usize, const WIDTH: usize, const COUNT: usize> Connect<HEIGHT, WIDTH, COUNT> {
    pub const CONFIG: Config = Config {
        height: HEIGHT,
        width: WIDTH,
        count: COUNT,
    };

    /// Drop a disc for the player to move; returns the row it landed on
    pub fn drop_piece(state: &mut State<HEIGHT, WIDTH>, column: u8) -> Result<usize, GameError> {
        let col = column as usize;
        if state.is_done() {
            return Err(GameError::InvalidAction("game has ended".to_string()));
        }
        if col >= WIDTH {
            return Err(GameError::InvalidAction(format!(
                "column {col} is outside the board"
            )));
        }
        let row = state.heights[col] as usize;
        if row >= HEIGHT {
            return Err(GameError::InvalidAction(format!("column {col} is full")));
        }

        state.grid[row][col] = state.player as i8;
        state.heights[col] += 1;
        if line_through(&state.grid, row, col, COUNT) {
            state.winner = Some(state.player);
        }
        state.player = 1 - state.player;
        Ok(row)
    }

    /// Rebuild a state from a grid, checking that it is reachable
    ///
    /// The player to move is inferred from disc counts and the winner is
    /// recomputed from the grid.
    pub fn state_from_grid(grid: [[i8; WIDTH]; HEIGHT]) -> Result<State<HEIGHT, WIDTH>, DecodeError> {
        check_gravity(&grid)?;

        let counts = count_pieces(&grid);
        let player = player_from_counts(counts).ok_or_else(|| {
            DecodeError::InvalidValue(format!(
                "disc counts {} and {} cannot occur in a game",
                counts[0], counts[1]
            ))
        })?;

        let winner = match line_owners(&grid, COUNT) {
            [true, true] => {
                return Err(DecodeError::InvalidValue(
                    "both players have a winning line".to_string(),
                ))
            }
            [true, false] => Some(0),
            [false, true] => Some(1),
            [false, false] => None,
        };
        if let Some(w) = winner {
            if player != 1 - w {
                return Err(DecodeError::InvalidValue(format!(
                    "player {w} has a line but did not move last"
                )));
            }
        }

        let mut heights = [0u8; WIDTH];
        for (col, height) in heights.iter_mut().enumerate() {
            *height = grid.iter().filter(|row| row[col] != EMPTY).count() as u8;
        }

        Ok(State {
            grid,
            heights,
            player,
            winner,
        })
    }

    fn env_id() -> String {
        if (HEIGHT, WIDTH, COUNT) == (ROWS, COLS, 4) {
            "connect4".to_string()
        } else {
            format!("connect{COUNT}_{WIDTH}x{HEIGHT}")
        }
    }
}

/// Optional integer field where -1 stands for "none"
fn optional_player(value: &ExchangeValue, key: &str) -> Result<Option<Option<PlayerId>>, DecodeError> {
    match value.optional_field::<i64>(key)? {
        None => Ok(None),
        Some(-1) => Ok(Some(None)),
        Some(p @ (0 | 1)) => Ok(Some(Some(p as PlayerId))),
        Some(other) => Err(DecodeError::InvalidValue(format!(
            "{other} is not a player index"
        ))
        .at_field(key)),
    }
}

fn player_to_exchange(player: Option<PlayerId>) -> ExchangeValue {
    ExchangeValue::from(player.map_or(-1i64, i64::from))
}

impl<const HEIGHT: usize, const WIDTH: usize, const COUNT: usize> Game
    for Connect<HEIGHT, WIDTH, COUNT>
{
    type State = State<HEIGHT, WIDTH>;
    type Action = Action;

    fn metadata() -> GameMetadata {
        GameMetadata::new(Self::env_id(), format!("Connect {COUNT}"))
            .with_board(WIDTH, HEIGHT)
            .with_actions(WIDTH)
            .with_players(
                2,
                vec!["Red".to_string(), "Yellow".to_string()],
                vec!['O', 'X'],
            )
            .with_tensor_modes(&["grid", "planes"])
            .with_description(format!("Drop discs to connect {COUNT} in a row!"))
            .with_board_type("drop_column")
    }

    fn initialize(state: &mut Self::State) -> Result<(), GameError> {
        *state = State::new();
        Ok(())
    }

    fn has_ended(state: &Self::State) -> bool {
        state.is_done()
    }

    fn player(state: &Self::State) -> Option<PlayerId> {
        (!state.is_done()).then_some(state.player)
    }

    fn winner(state: &Self::State) -> Option<PlayerId> {
        state.winner
    }

    fn reward(state: &Self::State) -> Vec<f32> {
        zero_sum_reward(state.winner)
    }

    fn tensors(state: &Self::State, mode: Option<&str>) -> Result<Vec<TensorValue>, GameError> {
        match mode.unwrap_or("grid") {
            "grid" => Ok(vec![grid_to_tensor(&state.grid).into()]),
            "planes" => Ok(TwoPlayerObs::from_grid(
                &state.grid,
                state.legal_moves().map(usize::from),
                WIDTH,
                state.player,
            )
            .into_tensors()),
            other => Err(GameError::UnsupportedMode(other.to_string())),
        }
    }

    fn actions(state: &Self::State, out: &mut Vec<Action>) -> Result<(), GameError> {
        out.extend(state.legal_moves().map(Action::drop));
        Ok(())
    }

    fn apply(state: &mut Self::State, action: &Action) -> Result<(), GameError> {
        Self::drop_piece(state, action.column).map(|_| ())
    }

    fn state_to_json(state: &Self::State) -> Result<ExchangeValue, GameError> {
        Ok(ExchangeValue::object([
            ("grid", grid_to_exchange(&state.grid)),
            ("player", player_to_exchange(Self::player(state))),
            ("winner", player_to_exchange(state.winner)),
        ]))
    }

    fn state_from_json(state: &mut Self::State, value: &ExchangeValue) -> Result<(), DecodeError> {
        let grid = value
            .as_object()?
            .get("grid")
            .ok_or_else(|| DecodeError::MissingField("grid".to_string()))
            .and_then(|grid| grid_from_exchange(grid).map_err(|e| e.at_field("grid")))?;
        let decoded = Self::state_from_grid(grid)?;

        if let Some(player) = optional_player(value, "player")? {
            if player != Self::player(&decoded) {
                return Err(DecodeError::InvalidValue(
                    "player does not match the grid".to_string(),
                )
                .at_field("player"));
            }
        }
        if let Some(winner) = optional_player(value, "winner")? {
            if winner != decoded.winner {
                return Err(DecodeError::InvalidValue(
                    "winner does not match the grid".to_string(),
                )
                .at_field("winner"));
            }
        }

        *state = decoded;
        Ok(())
    }

    fn action_to_json(_state: &Self::State, action: &Action) -> Result<ExchangeValue, GameError> {
        Ok(ExchangeValue::object([("column", action.column.into())]))
    }

    fn action_from_json(
        state: &Self::State,
        action: &mut Action,
        value: &ExchangeValue,
    ) -> Result<(), DecodeError> {
        let column: u8 = value.field("column")?;
        if !state.is_legal(column as usize) {
            return Err(DecodeError::InvalidValue(format!(
                "column {column} is not playable in this state"
            ))
            .at_field("column"));
        }
        *action = Action::drop(column);
        Ok(())
    }

    fn state_from_tensors(state: &mut Self::State, tensors: &[TensorValue]) -> Result<(), GameError> {
        let [grid] = tensors else {
            return Err(ShapeError::CountMismatch {
                expected: 1,
                actual: tensors.len(),
            }
            .into());
        };
        let grid = grid.expect_tensor::<i8>(&ShapeSpec::fixed(&[HEIGHT, WIDTH]))?;
        *state = Self::state_from_grid(grid_from_tensor(grid)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;

//! TicTacToe game implementation
//!
//! A small second domain for the binding layer: players alternate placing
//! marks on a 3x3 board and the first to complete a row, column or diagonal
//! wins.
//!
//! Positions are numbered 0-8, row-major. Row 0 holds positions 0-2.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Game;
//! use games_tictactoe::{Action, State, TicTacToe};
//!
//! let mut state = State::default();
//! TicTacToe::initialize(&mut state).unwrap();
//! TicTacToe::apply(&mut state, &Action::place(4)).unwrap();
//! assert_eq!(TicTacToe::player(&state), Some(1));
//! ```

use std::fmt;

use engine_core::game_utils::{
    count_pieces, grid_from_exchange, grid_from_tensor, grid_to_exchange, grid_to_tensor,
    player_from_counts, zero_sum_reward, EMPTY,
};
use engine_core::{
    register_game, DecodeError, ExchangeValue, Game, GameError, GameMetadata, PlayerId,
    RegistryError, ShapeError, ShapeSpec, TensorValue, TwoPlayerObs,
};

/// Board side length
pub const SIZE: usize = 3;

/// Number of cells, and of distinct actions
pub const CELLS: usize = SIZE * SIZE;

/// Winning positions (rows, columns, diagonals)
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Register TicTacToe with the global game registry
pub fn register_tictactoe() -> Result<(), RegistryError> {
    register_game(TicTacToe::metadata())
}

/// TicTacToe game state
///
/// Represents the complete state of a TicTacToe game including the board,
/// current player, and winner information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State {
    /// Board representation: -1=empty, 0=X, 1=O
    board: [i8; CELLS],
    /// Player who moves next: 0=X, 1=O
    player: PlayerId,
    /// Winner, if any
    winner: Option<PlayerId>,
}

impl State {
    /// Create a new initial game state
    pub fn new() -> Self {
        Self {
            board: [EMPTY; CELLS],
            player: 0, // X goes first
            winner: None,
        }
    }

    pub fn cell(&self, position: u8) -> i8 {
        self.board[position as usize]
    }

    /// Board as a 3x3 grid, row 0 first
    pub fn grid(&self) -> [[i8; SIZE]; SIZE] {
        let mut grid = [[EMPTY; SIZE]; SIZE];
        for (pos, &cell) in self.board.iter().enumerate() {
            grid[pos / SIZE][pos % SIZE] = cell;
        }
        grid
    }

    pub fn is_full(&self) -> bool {
        self.board.iter().all(|&cell| cell != EMPTY)
    }

    /// Check if the game is over
    pub fn is_done(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }

    pub fn is_legal(&self, position: usize) -> bool {
        !self.is_done() && position < CELLS && self.board[position] == EMPTY
    }

    /// Get legal moves (empty positions)
    pub fn legal_moves(&self) -> impl Iterator<Item = u8> + '_ {
        (0..CELLS)
            .filter(|&pos| self.is_legal(pos))
            .map(|pos| pos as u8)
    }

    /// Bit-mask representation of legal moves.
    ///
    /// Bits 0-8 correspond to board positions 0-8. When the game is finished
    /// the mask is zeroed.
    pub fn legal_moves_mask(&self) -> u64 {
        self.legal_moves().fold(0u64, |mask, pos| mask | (1u64 << pos))
    }

    pub fn moves_played(&self) -> usize {
        self.board.iter().filter(|&&cell| cell != EMPTY).count()
    }

    /// Make a move in place
    fn place(&mut self, position: u8) -> Result<(), GameError> {
        if self.is_done() {
            return Err(GameError::InvalidAction("game has ended".to_string()));
        }
        if !self.is_legal(position as usize) {
            return Err(GameError::InvalidAction(format!(
                "position {position} is not free"
            )));
        }

        self.board[position as usize] = self.player as i8;
        self.winner = Self::check_winner(&self.board);
        self.player = 1 - self.player;
        Ok(())
    }

    /// Check for winner on the board
    fn check_winner(board: &[i8; CELLS]) -> Option<PlayerId> {
        LINES.iter().find_map(|&[a, b, c]| {
            (board[a] != EMPTY && board[a] == board[b] && board[b] == board[c])
                .then_some(board[a] as PlayerId)
        })
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for State {
    /// Draws row 0 first: `.` empty, `X` player 0, `O` player 1
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.board.chunks(SIZE).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: String = row
                .iter()
                .map(|&cell| match cell {
                    0 => 'X',
                    1 => 'O',
                    _ => '.',
                })
                .collect();
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

/// TicTacToe action: place a mark on a cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Action {
    cell: u8,
}

impl Action {
    /// Place at a position (0-8)
    pub fn place(position: u8) -> Self {
        Self { cell: position }
    }

    /// Place at column `x`, row `y`
    pub fn at(x: u8, y: u8) -> Self {
        Self::place(y * SIZE as u8 + x)
    }

    /// Get the position for this action
    pub fn position(&self) -> u8 {
        self.cell
    }

    pub fn x(&self) -> u8 {
        self.cell % SIZE as u8
    }

    pub fn y(&self) -> u8 {
        self.cell / SIZE as u8
    }
}

/// TicTacToe game rules
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TicTacToe {
    /// Rebuild a state from a grid, checking that it is reachable
    pub fn state_from_grid(grid: [[i8; SIZE]; SIZE]) -> Result<State, DecodeError> {
        let counts = count_pieces(&grid);
        let player = player_from_counts(counts).ok_or_else(|| {
            DecodeError::InvalidValue(format!(
                "mark counts {} and {} cannot occur in a game",
                counts[0], counts[1]
            ))
        })?;

        let mut board = [EMPTY; CELLS];
        for (pos, slot) in board.iter_mut().enumerate() {
            *slot = grid[pos / SIZE][pos % SIZE];
        }

        let mut owners = [false; 2];
        for &[a, b, c] in &LINES {
            if board[a] != EMPTY && board[a] == board[b] && board[b] == board[c] {
                owners[board[a] as usize] = true;
            }
        }
        let winner = match owners {
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

        Ok(State {
            board,
            player,
            winner,
        })
    }
}

impl Game for TicTacToe {
    type State = State;
    type Action = Action;

    fn metadata() -> GameMetadata {
        GameMetadata::new("tictactoe", "Tic-Tac-Toe")
            .with_board(SIZE, SIZE)
            .with_actions(CELLS)
            .with_players(
                2,
                vec!["X".to_string(), "O".to_string()],
                vec!['X', 'O'],
            )
            .with_tensor_modes(&["grid", "planes"])
            .with_description("Get three in a row to win!")
    }

    fn initialize(state: &mut State) -> Result<(), GameError> {
        *state = State::new();
        Ok(())
    }

    fn has_ended(state: &State) -> bool {
        state.is_done()
    }

    fn player(state: &State) -> Option<PlayerId> {
        (!state.is_done()).then_some(state.player)
    }

    fn winner(state: &State) -> Option<PlayerId> {
        state.winner
    }

    fn reward(state: &State) -> Vec<f32> {
        zero_sum_reward(state.winner)
    }

    fn tensors(state: &State, mode: Option<&str>) -> Result<Vec<TensorValue>, GameError> {
        let grid = state.grid();
        match mode.unwrap_or("grid") {
            "grid" => Ok(vec![grid_to_tensor(&grid).into()]),
            "planes" => Ok(TwoPlayerObs::from_grid(
                &grid,
                state.legal_moves().map(usize::from),
                CELLS,
                state.player,
            )
            .into_tensors()),
            other => Err(GameError::UnsupportedMode(other.to_string())),
        }
    }

    fn actions(state: &State, out: &mut Vec<Action>) -> Result<(), GameError> {
        out.extend(state.legal_moves().map(Action::place));
        Ok(())
    }

    fn apply(state: &mut State, action: &Action) -> Result<(), GameError> {
        state.place(action.position())
    }

    fn state_to_json(state: &State) -> Result<ExchangeValue, GameError> {
        Ok(ExchangeValue::object([
            ("board", grid_to_exchange(&state.grid())),
            (
                "player",
                ExchangeValue::from(Self::player(state).map_or(-1i64, i64::from)),
            ),
        ]))
    }

    fn state_from_json(state: &mut State, value: &ExchangeValue) -> Result<(), DecodeError> {
        let board = value
            .as_object()?
            .get("board")
            .ok_or_else(|| DecodeError::MissingField("board".to_string()))
            .and_then(|board| grid_from_exchange(board).map_err(|e| e.at_field("board")))?;
        let decoded = Self::state_from_grid(board)?;

        if let Some(player) = value.optional_field::<i64>("player")? {
            let expected = Self::player(&decoded).map_or(-1, i64::from);
            if player != expected {
                return Err(DecodeError::InvalidValue(format!(
                    "player {player} does not match the board"
                ))
                .at_field("player"));
            }
        }

        *state = decoded;
        Ok(())
    }

    fn action_to_json(_state: &State, action: &Action) -> Result<ExchangeValue, GameError> {
        Ok(ExchangeValue::object([
            ("x", action.x().into()),
            ("y", action.y().into()),
        ]))
    }

    fn action_from_json(
        state: &State,
        action: &mut Action,
        value: &ExchangeValue,
    ) -> Result<(), DecodeError> {
        let x: u8 = value.field("x")?;
        let y: u8 = value.field("y")?;
        if x as usize >= SIZE || y as usize >= SIZE {
            return Err(DecodeError::OutOfRange {
                value: format!("({x}, {y})"),
                target: "board cell",
            });
        }

        let candidate = Action::at(x, y);
        if !state.is_legal(candidate.position() as usize) {
            return Err(DecodeError::InvalidValue(format!(
                "cell ({x}, {y}) is not playable in this state"
            )));
        }
        *action = candidate;
        Ok(())
    }

    fn state_from_tensors(state: &mut State, tensors: &[TensorValue]) -> Result<(), GameError> {
        let [grid] = tensors else {
            return Err(ShapeError::CountMismatch {
                expected: 1,
                actual: tensors.len(),
            }
            .into());
        };
        let grid = grid.expect_tensor::<i8>(&ShapeSpec::fixed(&[SIZE, SIZE]))?;
        *state = Self::state_from_grid(grid_from_tensor(grid)?)?;
        Ok(())
    }
}

//! Game metadata for hosts and configuration
//!
//! This module provides descriptive metadata about games that hosts can
//! query at runtime, without touching a state, to configure themselves.

use serde::{Deserialize, Serialize};

use crate::exchange::ExchangeValue;

/// Metadata about a game for display and configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// Environment identifier (e.g., "tictactoe", "connect4")
    pub env_id: String,

    /// Human-readable display name (e.g., "Tic-Tac-Toe", "Connect 4")
    pub display_name: String,

    /// Board width in cells
    pub board_width: usize,

    /// Board height in cells
    pub board_height: usize,

    /// Upper bound on the number of legal actions in any state
    pub num_actions: usize,

    /// Number of players (typically 2)
    pub player_count: usize,

    /// Display names for each player (e.g., ["X", "O"] or ["Red", "Yellow"])
    pub player_names: Vec<String>,

    /// Single-character symbols for each player
    pub player_symbols: Vec<char>,

    /// Tensor modes accepted by `get_tensors`, the first being the default
    pub tensor_modes: Vec<String>,

    /// Brief description of the game rules
    pub description: String,

    /// Board layout
    /// - "grid": pieces are placed directly on a cell (TicTacToe)
    /// - "drop_column": pieces drop to the lowest free cell of a column (Connect 4)
    pub board_type: String,
}

impl GameMetadata {
    /// Create a new GameMetadata with required fields
    pub fn new(env_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
            display_name: display_name.into(),
            board_width: 0,
            board_height: 0,
            num_actions: 0,
            player_count: 2,
            player_names: vec!["Player 1".to_string(), "Player 2".to_string()],
            player_symbols: vec!['1', '2'],
            tensor_modes: vec!["grid".to_string()],
            description: String::new(),
            board_type: "grid".to_string(),
        }
    }

    /// Builder method for board dimensions
    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    /// Builder method for action count
    pub fn with_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = num_actions;
        self
    }

    /// Builder method for player information
    pub fn with_players(mut self, count: usize, names: Vec<String>, symbols: Vec<char>) -> Self {
        self.player_count = count;
        self.player_names = names;
        self.player_symbols = symbols;
        self
    }

    /// Builder method for supported tensor modes
    pub fn with_tensor_modes(mut self, modes: &[&str]) -> Self {
        self.tensor_modes = modes.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Builder method for description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method for board type
    pub fn with_board_type(mut self, board_type: impl Into<String>) -> Self {
        self.board_type = board_type.into();
        self
    }

    /// Get the total number of board cells
    pub fn board_size(&self) -> usize {
        self.board_width * self.board_height
    }

    pub fn supports_mode(&self, mode: &str) -> bool {
        self.tensor_modes.iter().any(|m| m == mode)
    }

    /// Metadata as an exchange object
    pub fn to_exchange(&self) -> Result<ExchangeValue, serde_json::Error> {
        ExchangeValue::from_serialize(self)
    }
}

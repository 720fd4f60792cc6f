//! Core traits and types for exposing native games to host runtimes
//!
//! This crate provides the host-independent half of the binding layer:
//! - `Game`: Typed trait every game domain implements
//! - `ExchangeValue`: JSON-like structured exchange format
//! - `Tensor`: Dense arrays over a fixed element table
//! - `Relation` / `project_hash`: Comparison and hash projections
//! - `Registry`: Process-wide registration of game metadata

pub mod board_game;
pub mod compare;
pub mod exchange;
pub mod game_utils;
pub mod metadata;
pub mod registry;
pub mod tensor;
pub mod typed;

// Re-export main types for convenience
pub use board_game::TwoPlayerObs;
pub use compare::{hash_of, project_hash, Relation};
pub use exchange::{DecodeError, ExchangeMap, ExchangeValue, FromExchange};
pub use metadata::GameMetadata;
pub use registry::{
    clear_registry, game_metadata, is_registered, list_registered_games, register_game,
    RegistryError,
};
pub use tensor::{DType, Dim, Element, ShapeError, ShapeSpec, Tensor, TensorValue};
pub use typed::{Game, GameError, PlayerId};

//! Typed Game trait implemented by every game domain
//!
//! A game is a zero-sized type that names its `State` and `Action` value
//! types and provides the operations on them as associated functions.
//! Bindings are written once against this trait and never see the rules.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use crate::compare::hash_of;
use crate::exchange::{DecodeError, ExchangeValue};
use crate::metadata::GameMetadata;
use crate::tensor::TensorValue;

/// Player index (0-based)
pub type PlayerId = u8;

/// Main trait for game implementations
///
/// `State` and `Action` are plain values. Operations never mutate a value they
/// borrow immutably; `apply` is only ever handed a private copy.
///
/// # Example
///
/// ```rust
/// # use engine_core::exchange::{DecodeError, ExchangeValue};
/// # use engine_core::tensor::{Tensor, TensorValue};
/// # use engine_core::typed::{Game, GameError, PlayerId};
/// # use engine_core::GameMetadata;
/// #[derive(Debug)]
/// struct Countdown;
///
/// impl Game for Countdown {
///     type State = u8;
///     type Action = u8;
///
///     fn metadata() -> GameMetadata {
///         GameMetadata::new("countdown", "Countdown").with_actions(2)
///     }
///
///     fn initialize(state: &mut u8) -> Result<(), GameError> {
///         *state = 10;
///         Ok(())
///     }
///
///     fn has_ended(state: &u8) -> bool {
///         *state == 0
///     }
///
///     fn player(state: &u8) -> Option<PlayerId> {
///         (*state != 0).then_some(*state % 2)
///     }
///
///     fn winner(state: &u8) -> Option<PlayerId> {
///         (*state == 0).then_some(0)
///     }
///
///     fn reward(state: &u8) -> Vec<f32> {
///         if *state == 0 { vec![1.0, -1.0] } else { vec![0.0, 0.0] }
///     }
///
///     fn tensors(state: &u8, _mode: Option<&str>) -> Result<Vec<TensorValue>, GameError> {
///         Ok(vec![Tensor::new(vec![1], vec![*state]).map_err(GameError::from)?.into()])
///     }
///
///     fn actions(state: &u8, out: &mut Vec<u8>) -> Result<(), GameError> {
///         out.extend((1..=2).filter(|step| step <= state));
///         Ok(())
///     }
///
///     fn apply(state: &mut u8, action: &u8) -> Result<(), GameError> {
///         *state -= action;
///         Ok(())
///     }
///
///     fn state_to_json(state: &u8) -> Result<ExchangeValue, GameError> {
///         Ok((*state).into())
///     }
///
///     fn state_from_json(state: &mut u8, value: &ExchangeValue) -> Result<(), DecodeError> {
///         *state = value.decode()?;
///         Ok(())
///     }
///
///     fn action_to_json(_state: &u8, action: &u8) -> Result<ExchangeValue, GameError> {
///         Ok((*action).into())
///     }
///
///     fn action_from_json(
///         _state: &u8,
///         action: &mut u8,
///         value: &ExchangeValue,
///     ) -> Result<(), DecodeError> {
///         *action = value.decode()?;
///         Ok(())
///     }
/// }
///
/// let mut state = 0;
/// Countdown::initialize(&mut state).unwrap();
/// let mut actions = Vec::new();
/// Countdown::actions(&state, &mut actions).unwrap();
/// assert_eq!(actions, vec![1, 2]);
/// ```
pub trait Game: Send + Sync + Debug + 'static {
    /// Game state value
    type State: Clone + Default + Ord + Hash + Debug + Send + Sync + 'static;

    /// Action value, meaningful relative to the state it was produced from
    type Action: Clone + Default + Ord + Hash + Debug + Send + Sync + 'static;

    /// Display and configuration metadata
    fn metadata() -> GameMetadata;

    /// Turn a default-constructed state into the initial position
    fn initialize(state: &mut Self::State) -> Result<(), GameError>;

    fn has_ended(state: &Self::State) -> bool;

    /// Player to move, `None` once the game has ended
    fn player(state: &Self::State) -> Option<PlayerId>;

    /// Winning player, `None` while running or after a draw
    fn winner(state: &Self::State) -> Option<PlayerId>;

    /// One reward entry per player
    fn reward(state: &Self::State) -> Vec<f32>;

    /// Dense observation tensors, selected by an optional mode name
    fn tensors(state: &Self::State, mode: Option<&str>) -> Result<Vec<TensorValue>, GameError>;

    /// Append the legal actions of `state` to `out`
    fn actions(state: &Self::State, out: &mut Vec<Self::Action>) -> Result<(), GameError>;

    /// Advance `state` by `action`
    fn apply(state: &mut Self::State, action: &Self::Action) -> Result<(), GameError>;

    fn state_to_json(state: &Self::State) -> Result<ExchangeValue, GameError>;

    fn state_from_json(state: &mut Self::State, value: &ExchangeValue) -> Result<(), DecodeError>;

    fn action_to_json(
        state: &Self::State,
        action: &Self::Action,
    ) -> Result<ExchangeValue, GameError>;

    fn action_from_json(
        state: &Self::State,
        action: &mut Self::Action,
        value: &ExchangeValue,
    ) -> Result<(), DecodeError>;

    /// Rebuild a state from dense tensors
    fn state_from_tensors(
        _state: &mut Self::State,
        _tensors: &[TensorValue],
    ) -> Result<(), GameError> {
        Err(DecodeError::Unsupported(format!(
            "{} states cannot be built from tensors",
            Self::metadata().env_id
        ))
        .into())
    }

    fn compare_states(a: &Self::State, b: &Self::State) -> Ordering {
        a.cmp(b)
    }

    /// Actions compare by their originating state first
    fn compare_actions(
        state_a: &Self::State,
        a: &Self::Action,
        state_b: &Self::State,
        b: &Self::Action,
    ) -> Ordering {
        Self::compare_states(state_a, state_b).then_with(|| a.cmp(b))
    }

    fn hash_state(state: &Self::State) -> u64 {
        hash_of(state)
    }

    fn hash_action(state: &Self::State, action: &Self::Action) -> u64 {
        hash_of(&(state, action))
    }
}

/// Error type for game operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Unsupported tensor mode: {0}")]
    UnsupportedMode(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to encode: {0}")]
    Encoding(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Shape(#[from] crate::tensor::ShapeError),
}

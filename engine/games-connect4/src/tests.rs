use super::*;
use engine_core::{DType, Tensor};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn initial() -> Connect4State {
    let mut state = Connect4State::default();
    Connect4::initialize(&mut state).unwrap();
    state
}

fn legal_actions(state: &Connect4State) -> Vec<Action> {
    let mut actions = Vec::new();
    Connect4::actions(state, &mut actions).unwrap();
    actions
}

/// Plays the columns in order, alternating players from the given state
fn play(mut state: Connect4State, columns: &[u8]) -> Connect4State {
    for &col in columns {
        Connect4::apply(&mut state, &Action::drop(col)).unwrap();
    }
    state
}

/// Parses a drawing (top row first) into a grid
fn picture(rows: [&str; ROWS]) -> [[i8; COLS]; ROWS] {
    let mut grid = [[EMPTY; COLS]; ROWS];
    for (i, line) in rows.iter().enumerate() {
        for (col, ch) in line.split_whitespace().enumerate() {
            grid[ROWS - 1 - i][col] = match ch {
                "O" => 0,
                "X" => 1,
                _ => EMPTY,
            };
        }
    }
    grid
}

#[test]
fn test_initial_state() {
    let state = initial();
    assert_eq!(state.grid(), &[[EMPTY; COLS]; ROWS]);
    assert_eq!(Connect4::player(&state), Some(0));
    assert_eq!(Connect4::winner(&state), None);
    assert!(!Connect4::has_ended(&state));
    assert_eq!(Connect4::reward(&state), vec![0.0, 0.0]);
    assert_eq!(state.moves_played(), 0);
}

#[test]
fn test_legal_moves() {
    let state = initial();
    let legal = legal_actions(&state);
    assert_eq!(legal, (0..COLS as u8).map(Action::drop).collect::<Vec<_>>());
    assert!((0..COLS).all(|col| state.is_legal(col)));

    let state = play(state, &[3]);
    assert_eq!(legal_actions(&state).len(), 7);
}

#[test]
fn test_drop_piece() {
    let mut state = initial();
    let row = Connect4::drop_piece(&mut state, 3).unwrap();

    assert_eq!(row, 0);
    assert_eq!(state.cell(0, 3), 0);
    assert_eq!(Connect4::player(&state), Some(1));
    assert!(!state.is_done());
}

#[test]
fn test_stacking_pieces() {
    let mut state = initial();
    for i in 0..ROWS {
        assert_eq!(Connect4::drop_piece(&mut state, 0).unwrap(), i);
    }

    assert!(!state.legal_moves().any(|c| c == 0));
    assert!(!state.is_legal(0));
}

#[test]
fn test_invalid_moves_rejected() {
    let mut state = play(initial(), &[0, 0, 0, 0, 0, 0]);
    let before = state.clone();

    assert!(matches!(
        Connect4::apply(&mut state, &Action::drop(0)),
        Err(GameError::InvalidAction(_))
    ));
    assert!(matches!(
        Connect4::apply(&mut state, &Action::drop(7)),
        Err(GameError::InvalidAction(_))
    ));
    assert_eq!(state, before);
}

#[test]
fn test_horizontal_win() {
    // O: 0, 1, 2, 3 (bottom row); X: 0, 1, 2 (second row)
    let state = play(initial(), &[0, 0, 1, 1, 2, 2, 3]);

    assert!(Connect4::has_ended(&state));
    assert_eq!(Connect4::winner(&state), Some(0));
    assert_eq!(Connect4::player(&state), None);
    assert_eq!(Connect4::reward(&state), vec![1.0, -1.0]);
    assert!(legal_actions(&state).is_empty());
}

#[test]
fn test_vertical_win() {
    let state = play(initial(), &[0, 1, 0, 1, 0, 1, 6, 1]);
    assert_eq!(Connect4::winner(&state), Some(1));
    assert_eq!(Connect4::reward(&state), vec![-1.0, 1.0]);
}

#[test]
fn test_diagonal_win_ascending() {
    // O builds (0,0) (1,1) (2,2) (3,3)
    let state = play(initial(), &[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]);
    assert_eq!(
        state.to_string(),
        [
            ". . . . . . .",
            ". . . . . . .",
            ". . . O . . .",
            ". . O O . . .",
            ". O O X . . .",
            "O X X X . . X",
        ]
        .join("\n")
    );
    assert_eq!(Connect4::winner(&state), Some(0));
}

#[test]
fn test_diagonal_win_descending() {
    // X builds (6,0) (5,1) (4,2) (3,3)
    let state = play(initial(), &[0, 6, 5, 5, 4, 4, 3, 4, 3, 3, 0, 3]);
    assert_eq!(Connect4::winner(&state), Some(1));
}

#[test]
fn test_scripted_game() {
    let mut state = initial();
    assert_eq!(Connect4::player(&state), Some(0));
    assert_eq!(legal_actions(&state).len(), 7);

    // Picks by index into the current action list, as a host would
    for (i, index) in [3, 3, 2, 4, 3, 4, 1, 0, 2, 3, 3, 3].into_iter().enumerate() {
        assert_eq!(Connect4::player(&state), Some((i % 2) as u8));
        let action = legal_actions(&state)[index];
        Connect4::apply(&mut state, &action).unwrap();
    }

    assert_eq!(
        state.to_string(),
        [
            ". . . X . . .",
            ". . . O . . .",
            ". . . X . . .",
            ". . . O . . .",
            ". . O X X . .",
            "X O O O X . .",
        ]
        .join("\n")
    );
    assert_eq!(legal_actions(&state).len(), 6);

    for index in [2, 3, 2] {
        let action = legal_actions(&state)[index];
        Connect4::apply(&mut state, &action).unwrap();
    }

    assert_eq!(
        state.to_string(),
        [
            ". . . X . . .",
            ". . . O . . .",
            ". . O X . . .",
            ". . O O X . .",
            ". . O X X . .",
            "X O O O X . .",
        ]
        .join("\n")
    );
    assert!(Connect4::has_ended(&state));
    assert_eq!(Connect4::winner(&state), Some(0));
    assert_eq!(Connect4::reward(&state), vec![1.0, -1.0]);
    assert!(legal_actions(&state).is_empty());
}

#[test]
fn test_draw_game() {
    let grid = picture([
        "O X O X O X X",
        "O X O X O X O",
        "X O X O X O X",
        "X O X O X O X",
        "O X O X O X O",
        "O X O X O X O",
    ]);
    let state = Connect4::state_from_grid(grid).unwrap();

    assert!(state.is_full());
    assert!(Connect4::has_ended(&state));
    assert_eq!(Connect4::winner(&state), None);
    assert_eq!(Connect4::player(&state), None);
    assert_eq!(Connect4::reward(&state), vec![0.0, 0.0]);
}

#[test]
fn test_state_json_layout() {
    let state = play(initial(), &[3, 4]);
    let json = Connect4::state_to_json(&state).unwrap();

    let grid: Vec<Vec<i8>> = json.field("grid").unwrap();
    assert_eq!(grid.len(), ROWS);
    assert_eq!(grid[0], vec![-1, -1, -1, 0, 1, -1, -1]);
    assert_eq!(json.field::<i64>("player").unwrap(), 0);
    assert_eq!(json.field::<i64>("winner").unwrap(), -1);
}

#[test]
fn test_state_json_round_trip() {
    let state = play(initial(), &[3, 3, 2, 4, 1]);
    let json = Connect4::state_to_json(&state).unwrap();

    let mut decoded = Connect4State::default();
    Connect4::state_from_json(&mut decoded, &json).unwrap();
    assert_eq!(decoded, state);
}

#[test]
fn test_state_from_json_grid_only() {
    let json = ExchangeValue::from_json_str(
        r#"{"grid": [[0, 1, -1, -1, -1, -1, -1],
                     [-1, -1, -1, -1, -1, -1, -1],
                     [-1, -1, -1, -1, -1, -1, -1],
                     [-1, -1, -1, -1, -1, -1, -1],
                     [-1, -1, -1, -1, -1, -1, -1],
                     [-1, -1, -1, -1, -1, -1, -1]]}"#,
    )
    .unwrap();

    let mut state = Connect4State::default();
    Connect4::state_from_json(&mut state, &json).unwrap();
    assert_eq!(state, play(initial(), &[0, 1]));
}

#[test]
fn test_state_from_json_rejects_bad_input() {
    let mut state = initial();
    let untouched = state.clone();

    // Not an object
    let err = Connect4::state_from_json(&mut state, &ExchangeValue::from("grid")).unwrap_err();
    assert!(matches!(err, DecodeError::TypeMismatch { .. }));

    // Missing grid
    let err = Connect4::state_from_json(&mut state, &ExchangeValue::object([(
        "player",
        ExchangeValue::from(0),
    )]))
    .unwrap_err();
    assert_eq!(err, DecodeError::MissingField("grid".to_string()));

    // Floating disc
    let mut grid = [[EMPTY; COLS]; ROWS];
    grid[2][0] = 0;
    let json = ExchangeValue::object([("grid", grid_to_exchange(&grid))]);
    assert!(Connect4::state_from_json(&mut state, &json).is_err());

    // Player 1 has more discs than player 0
    let mut grid = [[EMPTY; COLS]; ROWS];
    grid[0][0] = 1;
    let json = ExchangeValue::object([("grid", grid_to_exchange(&grid))]);
    assert!(Connect4::state_from_json(&mut state, &json).is_err());

    // Winner disagrees with the grid
    let mut json = Connect4::state_to_json(&play(initial(), &[0])).unwrap();
    if let ExchangeValue::Object(map) = &mut json {
        map.insert("winner", 0);
    }
    let err = Connect4::state_from_json(&mut state, &json).unwrap_err();
    assert_eq!(err.path(), Some("winner"));

    assert_eq!(state, untouched);
}

#[test]
fn test_action_json() {
    let state = initial();
    let action = Action::drop(5);
    let json = Connect4::action_to_json(&state, &action).unwrap();
    assert_eq!(json.field::<u8>("column").unwrap(), 5);

    let mut decoded = Action::default();
    Connect4::action_from_json(&state, &mut decoded, &json).unwrap();
    assert_eq!(decoded, action);
}

#[test]
fn test_action_from_json_checks_state() {
    let full = play(initial(), &[2, 2, 2, 2, 2, 2]);
    let mut action = Action::default();

    let err = Connect4::action_from_json(
        &full,
        &mut action,
        &ExchangeValue::object([("column", ExchangeValue::from(2))]),
    )
    .unwrap_err();
    assert_eq!(err.path(), Some("column"));

    let err = Connect4::action_from_json(&full, &mut action, &ExchangeValue::from("column"))
        .unwrap_err();
    assert!(matches!(err, DecodeError::TypeMismatch { expected: "object", .. }));

    let err = Connect4::action_from_json(
        &full,
        &mut action,
        &ExchangeValue::object([("column", ExchangeValue::from(300))]),
    )
    .unwrap_err();
    assert!(matches!(err.root_cause(), DecodeError::OutOfRange { .. }));
}

#[test]
fn test_grid_tensor() {
    let state = play(initial(), &[3, 4]);
    let tensors = Connect4::tensors(&state, None).unwrap();
    assert_eq!(tensors.len(), 1);

    let grid = tensors[0].as_tensor::<i8>().unwrap();
    assert_eq!(grid.shape(), &[ROWS, COLS]);
    assert_eq!(grid.get(&[0, 3]), Some(0));
    assert_eq!(grid.get(&[0, 4]), Some(1));
    assert_eq!(grid.get(&[1, 3]), Some(EMPTY));

    assert_eq!(Connect4::tensors(&state, Some("grid")).unwrap(), tensors);
}

#[test]
fn test_planes_tensor() {
    let state = play(initial(), &[3, 4, 0, 0, 0, 0, 0, 0]);
    let tensors = Connect4::tensors(&state, Some("planes")).unwrap();
    assert_eq!(tensors.len(), 2);
    assert_eq!(tensors[0].dtype(), DType::F32);
    assert_eq!(tensors[0].shape(), &[2, ROWS, COLS]);
    assert_eq!(tensors[1].dtype(), DType::U8);

    // Player 0 to move: own disc at (0,3) on plane 0, opponent's at (0,4) on plane 1
    let planes = tensors[0].as_tensor::<f32>().unwrap();
    assert_eq!(planes.get(&[0, 0, 3]), Some(1.0));
    assert_eq!(planes.get(&[1, 0, 4]), Some(1.0));

    let legal = tensors[1].as_tensor::<u8>().unwrap();
    assert_eq!(legal.to_vec(), vec![0, 1, 1, 1, 1, 1, 1]);
}

#[test]
fn test_planes_tensor_on_wide_board() {
    type Wide = Connect<2, 70, 2>;
    let mut state = State::<2, 70>::default();
    Wide::initialize(&mut state).unwrap();
    Wide::apply(&mut state, &Action::drop(69)).unwrap();
    Wide::apply(&mut state, &Action::drop(69)).unwrap();

    let tensors = Wide::tensors(&state, Some("planes")).unwrap();
    let legal = tensors[1].as_tensor::<u8>().unwrap();
    assert_eq!(legal.shape(), &[70]);
    assert_eq!(legal.get(&[69]), Some(0));
    assert_eq!(legal.array().iter().filter(|&&flag| flag == 1).count(), 69);
    assert_eq!(legal.get(&[64]), Some(1));
}

#[test]
fn test_unknown_tensor_mode() {
    assert_eq!(
        Connect4::tensors(&initial(), Some("image")),
        Err(GameError::UnsupportedMode("image".to_string()))
    );
}

#[test]
fn test_state_from_tensors() {
    let state = play(initial(), &[3, 3, 4, 5]);
    let tensors = Connect4::tensors(&state, None).unwrap();

    let mut rebuilt = Connect4State::default();
    Connect4::state_from_tensors(&mut rebuilt, &tensors).unwrap();
    assert_eq!(rebuilt, state);

    let wrong_shape = vec![TensorValue::from(Tensor::<i8>::zeros(vec![COLS, ROWS]))];
    assert!(matches!(
        Connect4::state_from_tensors(&mut rebuilt, &wrong_shape),
        Err(GameError::Shape(ShapeError::ExtentMismatch { .. }))
    ));

    let wrong_dtype = vec![TensorValue::from(Tensor::<f32>::zeros(vec![ROWS, COLS]))];
    assert!(matches!(
        Connect4::state_from_tensors(&mut rebuilt, &wrong_dtype),
        Err(GameError::Shape(ShapeError::DTypeMismatch { .. }))
    ));

    assert!(matches!(
        Connect4::state_from_tensors(&mut rebuilt, &[]),
        Err(GameError::Shape(ShapeError::CountMismatch { .. }))
    ));

    // Zero-filled grid means player 0 owns every cell
    let bogus = vec![TensorValue::from(Tensor::<i8>::zeros(vec![ROWS, COLS]))];
    assert!(matches!(
        Connect4::state_from_tensors(&mut rebuilt, &bogus),
        Err(GameError::Decode(_))
    ));
    assert_eq!(rebuilt, state);
}

#[test]
fn test_comparison_and_hash() {
    let a = play(initial(), &[3]);
    let b = play(initial(), &[3]);
    let c = play(initial(), &[4]);

    assert_eq!(Connect4::compare_states(&a, &b), std::cmp::Ordering::Equal);
    assert_eq!(Connect4::hash_state(&a), Connect4::hash_state(&b));
    assert_ne!(Connect4::compare_states(&a, &c), std::cmp::Ordering::Equal);

    let x = Action::drop(1);
    assert_eq!(Connect4::hash_action(&a, &x), Connect4::hash_action(&b, &x));
    assert_ne!(
        Connect4::compare_actions(&a, &x, &c, &x),
        std::cmp::Ordering::Equal
    );
}

#[test]
fn test_metadata() {
    let meta = Connect4::metadata();
    assert_eq!(meta.env_id, "connect4");
    assert_eq!(meta.display_name, "Connect 4");
    assert_eq!(meta.board_width, COLS);
    assert_eq!(meta.board_height, ROWS);
    assert_eq!(meta.num_actions, COLS);
    assert_eq!(meta.board_type, "drop_column");
    assert!(meta.supports_mode("planes"));
}

#[test]
fn test_other_board_sizes() {
    type Connect3 = Connect<3, 4, 3>;
    let mut state = State::<3, 4>::default();
    Connect3::initialize(&mut state).unwrap();

    for col in [0, 0, 1, 1, 2] {
        Connect3::apply(&mut state, &Action::drop(col)).unwrap();
    }
    assert_eq!(Connect3::winner(&state), Some(0));
    assert_eq!(Connect3::metadata().env_id, "connect3_4x3");
}

#[test]
fn test_random_games_invariants() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xC0FFEE);

    for _ in 0..50 {
        let mut state = initial();
        let mut moves = 0;

        while !Connect4::has_ended(&state) {
            let actions = legal_actions(&state);
            assert!(!actions.is_empty());
            assert!(actions.windows(2).all(|w| w[0] < w[1]));

            let action = actions[rng.gen_range(0..actions.len())];
            let before = state.clone();
            let mut next = state.clone();
            Connect4::apply(&mut next, &action).unwrap();
            assert_eq!(state, before);

            // Every reachable state survives both exchange forms
            let json = Connect4::state_to_json(&next).unwrap();
            let mut from_json = Connect4State::default();
            Connect4::state_from_json(&mut from_json, &json).unwrap();
            assert_eq!(from_json, next);

            let tensors = Connect4::tensors(&next, None).unwrap();
            let mut from_tensors = Connect4State::default();
            Connect4::state_from_tensors(&mut from_tensors, &tensors).unwrap();
            assert_eq!(from_tensors, next);

            state = next;
            moves += 1;
        }

        assert_eq!(state.moves_played(), moves);
        assert!(moves <= ROWS * COLS);
        assert!(legal_actions(&state).is_empty());
        if Connect4::winner(&state).is_none() {
            assert!(state.is_full());
        }
    }
}

#[test]
fn test_config() {
    assert_eq!(
        Connect4::CONFIG,
        Config {
            height: ROWS,
            width: COLS,
            count: 4
        }
    );
    assert_eq!(Connect::<2, 70, 2>::CONFIG.width, 70);
}

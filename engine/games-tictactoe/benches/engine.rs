use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use engine_core::Game;
use games_tictactoe::{Action, State, TicTacToe};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn bench_initialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_initialize");
    group.bench_function("initialize", |b| {
        b.iter_batched(
            State::default,
            |mut state| {
                TicTacToe::initialize(&mut state).unwrap();
                state
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_apply");
    group.bench_function("apply_center", |b| {
        let base_state = State::new();
        b.iter_batched(
            || base_state,
            |mut state| {
                TicTacToe::apply(&mut state, &Action::place(4)).unwrap();
                state
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("random_playout", |b| {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut actions = Vec::with_capacity(9);
        b.iter(|| {
            let mut state = State::new();
            while !TicTacToe::has_ended(&state) {
                actions.clear();
                TicTacToe::actions(&state, &mut actions).unwrap();
                let action = actions[rng.gen_range(0..actions.len())];
                TicTacToe::apply(&mut state, &action).unwrap();
            }
            state
        });
    });
    group.finish();
}

fn bench_exchange(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_exchange");

    group.bench_function("state_json_roundtrip", |b| {
        let state = State::new();
        b.iter(|| {
            let json = TicTacToe::state_to_json(&state).unwrap();
            let mut decoded = State::default();
            TicTacToe::state_from_json(&mut decoded, &json).unwrap();
            decoded
        });
    });

    group.bench_function("planes_tensor", |b| {
        let state = State::new();
        b.iter(|| TicTacToe::tensors(&state, Some("planes")).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_initialize, bench_apply, bench_exchange);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use lycan::distribution::assign_roles;
use lycan::engine::Engine;
use lycan::game::{GameState, NightActions, Player, RoleKind, VoteBallot};
use lycan::resolve::{evaluate, night, tally};
use lycan::rules::TableRules;
use lycan::simulate::{play_game, SimulationConfig};

fn eight_seats() -> Vec<Player> {
    let roles = [
        RoleKind::Werewolf,
        RoleKind::Werewolf,
        RoleKind::Seer,
        RoleKind::Guard,
        RoleKind::Medium,
        RoleKind::Villager,
        RoleKind::Villager,
        RoleKind::Villager,
    ];
    roles
        .iter()
        .enumerate()
        .map(|(i, r)| Player::new(i, *r))
        .collect()
}

fn bench_assign_roles(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    c.bench_function("assign_roles_8", |b| {
        b.iter(|| assign_roles(black_box(8), &mut rng))
    });
}

fn bench_resolve_night(c: &mut Criterion) {
    let players = eight_seats();
    let actions = NightActions {
        wolf_target: Some(5),
        seer_target: Some(0),
        guard_target: Some(6),
    };
    c.bench_function("resolve_night_8", |b| {
        b.iter(|| night::resolve(black_box(&actions), black_box(&players)))
    });
}

fn bench_tally_tied(c: &mut Criterion) {
    let players = eight_seats();
    // Four-way tie: two ballots each on 0, 2, 4, 6.
    let ballots: VoteBallot = (0..8).map(|v| (v, ((v / 2) * 2 + 2) % 8)).collect();
    let mut rng = SmallRng::seed_from_u64(7);
    c.bench_function("tally_8_tied", |b| {
        b.iter(|| tally(black_box(&players), black_box(&ballots), &mut rng))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let players = eight_seats();
    c.bench_function("evaluate_8", |b| b.iter(|| evaluate(black_box(&players))));
}

fn bench_full_game(c: &mut Criterion) {
    let config = SimulationConfig {
        players: 8,
        threads: 1,
        seed: 42,
        ..Default::default()
    };
    let mut seed = 0u64;
    c.bench_function("simulate_game_8", |b| {
        b.iter(|| {
            seed += 1;
            play_game(black_box(&config), 0, seed)
        })
    });
}

fn bench_new_game(c: &mut Criterion) {
    let mut engine = Engine::with_rules(TableRules::default());
    c.bench_function("new_game_8", |b| {
        b.iter(|| {
            engine.reset();
            engine.new_game(black_box(8)).map(GameState::is_over)
        })
    });
}

criterion_group!(
    benches,
    bench_assign_roles,
    bench_resolve_night,
    bench_tally_tied,
    bench_evaluate,
    bench_full_game,
    bench_new_game,
);
criterion_main!(benches);

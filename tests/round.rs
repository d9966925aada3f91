use rand::rngs::StdRng;
use rand::SeedableRng;
use squares::config::{Config, Surface};
use squares::game::{Game, Rules, Tick};

fn new_game(seed: u64) -> Game<StdRng> {
    let config = Config::default();
    Game::new(
        Rules::from_config(&config),
        config.surface,
        StdRng::seed_from_u64(seed),
    )
    .unwrap()
}

#[test]
fn untouched_round_ends_on_thirty_first_tick() {
    let mut game = new_game(1);
    game.start_game();

    let state = game.state();
    assert_eq!((state.score, state.time_remaining, state.active), (0, 30, true));

    for n in 1..=30 {
        assert_eq!(
            game.on_tick(),
            Tick::Counted {
                time_remaining: 30 - n
            }
        );
        assert!(game.state().active);
    }
    assert_eq!(game.state().time_remaining, 0);
    assert_eq!(game.state().squares.len(), 30);

    assert_eq!(
        game.on_tick(),
        Tick::Ended {
            score: 0,
            high_score: 0
        }
    );
    assert!(!game.state().active);
    assert_eq!(game.state().squares.len(), 30);

    assert_eq!(game.on_tick(), Tick::Idle);
}

#[test]
fn tapping_squares_scores_and_survives_restart() {
    let mut game = new_game(2);
    game.start_game();

    for _ in 0..5 {
        game.on_tick();
    }
    let targets: Vec<_> = game.state().squares.iter().map(|s| s.position).collect();

    let mut hits = 0;
    for point in targets {
        if game.tap(point) {
            hits += 1;
        }
        assert!(game.state().high_score >= game.state().score);
    }
    assert!(hits >= 1);
    assert_eq!(game.state().score, hits);
    assert_eq!(game.state().squares.len(), 5 - hits as usize);

    while game.state().active {
        game.on_tick();
    }
    assert_eq!(game.state().high_score, hits);

    game.start_game();
    assert_eq!(game.state().score, 0);
    assert_eq!(game.state().high_score, hits);
    assert!(game.state().squares.is_empty());
}

#[test]
fn double_tap_scores_once() {
    let mut game = new_game(3);
    game.start_game();
    let id = game.spawn_square();
    let at = game.state().squares[0].position;

    assert_eq!(game.square_at(at), Some(id));
    assert!(game.remove_square(id));
    assert!(!game.remove_square(id));
    assert!(!game.tap(at));
    assert_eq!(game.state().score, 1);
}

#[test]
fn custom_rules_shorten_round() {
    let rules = Rules {
        round_seconds: 2,
        ..Rules::default()
    };
    let surface = Surface {
        width: 200,
        height: 200,
    };
    let mut game = Game::new(rules, surface, StdRng::seed_from_u64(4)).unwrap();
    game.start_game();

    let ticks = std::iter::from_fn(|| Some(game.on_tick()))
        .take_while(|t| !matches!(t, Tick::Ended { .. }))
        .count();
    assert_eq!(ticks, 2);
    assert!(!game.state().active);
}

use duotris::{
    Cell, DuelError, GameSettings, MarkerGrid, Outcome, Side, TickOutcome, Versus,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn standard(seed: u64) -> Versus<StdRng> {
    let markers = MarkerGrid::rect(0, 0, 9, 19);
    Versus::new(&markers, &markers, GameSettings::default(), StdRng::seed_from_u64(seed))
        .expect("duel starts")
}

fn lowest_falling_row(versus: &Versus<StdRng>) -> i32 {
    versus
        .frame()
        .player
        .falling
        .iter()
        .map(|c| c.y)
        .min()
        .expect("player piece present")
}

fn tick_until_advanced(versus: &mut Versus<StdRng>) -> (u32, TickOutcome) {
    for n in 1..=100 {
        match versus.tick() {
            TickOutcome::Waiting => continue,
            other => return (n, other),
        }
    }
    panic!("gravity never ran");
}

#[test]
fn missing_markers_are_reported_per_board() {
    let board = MarkerGrid::rect(0, 0, 9, 19);
    let result = Versus::new(&board, &MarkerGrid::new(), GameSettings::default(), StdRng::seed_from_u64(0));
    assert_eq!(
        result.err(),
        Some(DuelError::NoMarkers {
            side: Side::Opponent
        })
    );
}

#[test]
fn board_too_small_for_any_piece_is_fatal_at_start() {
    let tiny = MarkerGrid::rect(0, 0, 1, 0);
    let normal = MarkerGrid::rect(0, 0, 9, 19);
    let result = Versus::new(&tiny, &normal, GameSettings::default(), StdRng::seed_from_u64(0));
    assert_eq!(
        result.err(),
        Some(DuelError::NoValidStart { side: Side::Player })
    );
}

#[test]
fn invalid_settings_are_rejected() {
    let markers = MarkerGrid::rect(0, 0, 9, 19);
    let settings = GameSettings {
        gravity_frames: 0,
        ..GameSettings::default()
    };
    let result = Versus::new(&markers, &markers, settings, StdRng::seed_from_u64(0));
    assert!(matches!(result, Err(DuelError::InvalidSettings(_))));
}

#[test]
fn gravity_runs_on_the_first_frame_then_every_interval() {
    let mut versus = standard(1);
    let start = lowest_falling_row(&versus);

    assert!(matches!(versus.tick(), TickOutcome::Advanced { .. }));
    assert_eq!(lowest_falling_row(&versus), start - 1);

    let (frames, outcome) = tick_until_advanced(&mut versus);
    assert_eq!(frames, 10);
    assert!(matches!(outcome, TickOutcome::Advanced { .. }));
    assert_eq!(lowest_falling_row(&versus), start - 2);
}

#[test]
fn commands_move_the_player_piece_between_ticks() {
    let mut versus = standard(2);
    let before = versus.frame().player.falling;

    assert!(versus.move_left());
    let moved = versus.frame().player.falling;
    for (a, b) in before.iter().zip(moved.iter()) {
        assert_eq!(b.x, a.x - 1);
        assert_eq!(b.y, a.y);
    }

    assert!(versus.move_right());
    assert_eq!(versus.frame().player.falling, before);

    versus.rotate();
    assert_eq!(versus.frame().player.falling[0], before[0]);
}

#[test]
fn sliding_into_the_wall_stops_at_the_edge() {
    let mut versus = standard(3);
    let mut moves = 0;
    while versus.move_left() {
        moves += 1;
        assert!(moves < 10);
    }
    let falling = versus.frame().player.falling;
    assert_eq!(falling.iter().map(|c| c.x).min(), Some(0));
    assert!(!versus.move_left());
}

#[test]
fn hard_drop_rests_then_lands_on_the_next_gravity_step() {
    let mut versus = standard(4);
    assert!(versus.hard_drop());
    assert_eq!(lowest_falling_row(&versus), 0);
    assert!(versus.frame().player.landed.is_empty());

    versus.tick();
    let frame = versus.frame();
    assert_eq!(frame.player.landed.len(), 4);
    assert!(frame.player.falling.is_empty());

    // next frame spawns a fresh piece at the top
    versus.tick();
    let frame = versus.frame();
    assert_eq!(frame.player.falling.iter().map(|c| c.y).max(), Some(19));
}

#[test]
fn toggle_cell_ignores_taken_and_outside_cells() {
    let mut versus = standard(5);
    assert!(versus.toggle_cell(Cell::new(0, 0)));
    assert!(!versus.toggle_cell(Cell::new(0, 0)));
    assert!(!versus.toggle_cell(Cell::new(-1, 0)));
    assert!(!versus.toggle_cell(Cell::new(0, 20)));
    let falling = versus.frame().player.falling[0];
    assert!(!versus.toggle_cell(falling));
    assert_eq!(versus.frame().player.landed, vec![Cell::new(0, 0)]);
}

#[test]
fn player_clear_builds_a_streak_and_ramps_difficulty() {
    let mut versus = standard(6);
    for x in 0..10 {
        assert!(versus.toggle_cell(Cell::new(x, 0)));
    }

    let outcome = versus.tick();
    assert_eq!(
        outcome,
        TickOutcome::Advanced {
            player_cleared: Some(0),
            opponent_cleared: None
        }
    );
    assert_eq!(versus.streak(), 1);
    assert_eq!(versus.difficulty(), 0);

    // the clear is punished with one stray block low on the board
    let landed = versus.frame().player.landed;
    assert_eq!(landed.len(), 1);
    assert!(landed[0].x < 9 && landed[0].y < 9);

    let (_, outcome) = tick_until_advanced(&mut versus);
    assert!(matches!(
        outcome,
        TickOutcome::Advanced {
            player_cleared: None,
            ..
        }
    ));
    assert_eq!(versus.difficulty(), 1);
    assert_eq!(versus.gravity_frames(), 9);
    assert_eq!(versus.streak(), 0);
    assert_eq!(versus.score(), 0);
}

#[test]
fn angry_chunks_can_be_switched_off() {
    let markers = MarkerGrid::rect(0, 0, 9, 19);
    let settings = GameSettings {
        angry_chunks: false,
        ..GameSettings::default()
    };
    let mut versus = Versus::new(&markers, &markers, settings, StdRng::seed_from_u64(6)).unwrap();
    for x in 0..10 {
        versus.toggle_cell(Cell::new(x, 0));
    }
    versus.tick();
    assert!(versus.frame().player.landed.is_empty());
}

#[test]
fn render_pulls_only_when_dirty() {
    let mut versus = standard(7);
    assert!(versus.is_dirty());
    assert!(versus.take_frame().is_some());
    assert!(!versus.is_dirty());
    assert!(versus.take_frame().is_none());

    versus.move_right();
    assert!(versus.is_dirty());
    assert!(versus.take_frame().is_some());
    assert!(versus.take_frame().is_none());

    // first frame runs gravity
    versus.tick();
    assert!(versus.take_frame().is_some());
    assert_eq!(versus.tick(), TickOutcome::Waiting);
    assert!(versus.take_frame().is_none());
}

#[test]
fn idle_player_tops_out_and_the_duel_halts() {
    let player = MarkerGrid::rect(0, 0, 4, 1);
    let opponent = MarkerGrid::rect(0, 0, 9, 19);
    let settings = GameSettings {
        gravity_frames: 1,
        ..GameSettings::default()
    };
    let mut versus = Versus::new(&player, &opponent, settings, StdRng::seed_from_u64(8)).unwrap();

    let mut halted = false;
    for _ in 0..50 {
        if versus.tick() == TickOutcome::Halted {
            halted = true;
            break;
        }
    }
    assert!(halted);
    assert_eq!(versus.outcome(), Outcome::ToppedOut(Side::Player));
    assert_eq!(versus.tick(), TickOutcome::Halted);
    assert!(!versus.move_left());
    assert!(!versus.hard_drop());
    assert!(!versus.toggle_cell(Cell::new(4, 0)));
}

#[test]
fn opponent_pieces_always_stay_legal_while_running() {
    let mut versus = standard(9);
    for _ in 0..2_000 {
        if versus.tick() == TickOutcome::Halted {
            break;
        }
        let frame = versus.frame();
        if frame.outcome != Outcome::Running {
            break;
        }
        let bounds = frame.opponent.bounds;
        for cell in &frame.opponent.falling {
            assert!(cell.x >= bounds.min_x && cell.x <= bounds.max_x);
            assert!(cell.y >= bounds.min_y && cell.y <= bounds.max_y);
            assert!(!frame.opponent.landed.contains(cell));
        }
    }
}

#[test]
fn autopilot_keeps_the_player_alive_longer_than_idling() {
    let run = |autopilot: bool| {
        let mut versus = standard(10);
        versus.set_autopilot(autopilot);
        let mut steps = 0;
        for _ in 0..5_000 {
            match versus.tick() {
                TickOutcome::Halted => break,
                TickOutcome::Advanced { .. } => steps += 1,
                TickOutcome::Waiting => {}
            }
        }
        (steps, versus.outcome())
    };
    let (idle_steps, idle_outcome) = run(false);
    assert_eq!(idle_outcome, Outcome::ToppedOut(Side::Player));
    let (auto_steps, _) = run(true);
    assert!(auto_steps > idle_steps);
}

#[test]
fn same_seed_replays_the_same_duel() {
    let play = || {
        let mut versus = standard(11);
        for _ in 0..300 {
            versus.tick();
        }
        versus.frame()
    };
    assert_eq!(play(), play());
}

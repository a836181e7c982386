//! Rules engine behaviour across whole turns.
//!
//! Positions are set up with `place_token` and then driven through the
//! public roll/select/advance operations only.

use ludo_engine::board::{global_index, is_safe_index, start_offset, SAFE_INDICES};
use ludo_engine::core::{Color, GameConfig, PlayerCount, Position, TokenId};
use ludo_engine::rules::{is_legal_move, ForfeitReason, LudoEngine, TurnPhase};

fn four_player() -> LudoEngine {
    LudoEngine::new(GameConfig::new(PlayerCount::Four))
}

fn roll(engine: &mut LudoEngine, face: u8) {
    assert!(engine.request_roll(), "roll request rejected in {:?}", engine.phase());
    assert!(engine.resolve_roll(face));
}

fn id(color: Color, slot: u8) -> TokenId {
    TokenId::new(color, slot)
}

/// Relative position of `color` that sits on global cell `cell`.
fn relative(color: Color, cell: usize) -> Position {
    let offset = start_offset(color);
    Position::new(((cell + 52 - offset) % 52) as i8)
}

// === Scenarios ===

#[test]
fn test_three_sixes_forfeit() {
    let mut engine = four_player();

    roll(&mut engine, 6);
    engine.select_token(id(Color::Yellow, 0)).unwrap();
    roll(&mut engine, 6);
    engine.select_token(id(Color::Yellow, 0)).unwrap();
    let before = engine.export();

    roll(&mut engine, 6);

    assert_eq!(engine.phase(), TurnPhase::TurnForfeit(ForfeitReason::ThreeSixes));
    assert_eq!(engine.consecutive_sixes(), 0);
    assert!(engine.movable_tokens().is_empty());
    assert!(engine.select_token(id(Color::Yellow, 0)).is_none());
    assert_eq!(engine.export().tokens, before.tokens);

    assert_eq!(engine.advance_time(1.0), 1);
    assert_eq!(engine.current_turn(), Color::Red);
    assert_eq!(engine.phase(), TurnPhase::AwaitingRoll);
}

#[test]
fn test_overshoot_is_not_movable() {
    let mut engine = four_player();
    let token = id(Color::Yellow, 0);
    engine.place_token(token, Position::new(53));

    roll(&mut engine, 5);

    assert!(!engine.is_movable(token));
    assert_eq!(engine.phase(), TurnPhase::TurnForfeit(ForfeitReason::NoLegalMove));
    assert_eq!(engine.token(token).position, Position::new(53));

    engine.advance_time(0.5);
    assert_eq!(engine.current_turn(), Color::Yellow);
    engine.advance_time(0.5);
    assert_eq!(engine.current_turn(), Color::Red);
}

#[test]
fn test_capture_sends_defender_home_and_grants_roll() {
    let mut engine = LudoEngine::new(GameConfig::new(PlayerCount::Four).with_first_turn(Color::Red));
    let attacker = id(Color::Red, 0);
    let defender = id(Color::Yellow, 2);
    engine.place_token(attacker, Position::new(2));
    engine.place_token(defender, relative(Color::Yellow, 19));
    assert!(!is_safe_index(19));

    roll(&mut engine, 3);
    let outcome = engine.select_token(attacker).unwrap();

    assert_eq!(outcome.captured.as_slice(), &[defender]);
    assert!(outcome.extra_turn);
    assert_eq!(engine.token(defender).position, Position::BASE);
    assert_eq!(engine.current_turn(), Color::Red);
    assert_eq!(engine.phase(), TurnPhase::AwaitingRoll);

    let event = engine.latest_capture().unwrap();
    assert_eq!((event.attacker, event.defender), (attacker, defender));
    assert_eq!(engine.active_captures().count(), 1);
}

#[test]
fn test_win_locks_the_board() {
    let mut engine = LudoEngine::new(GameConfig::new(PlayerCount::Four).with_first_turn(Color::Green));
    for slot in 0..3 {
        engine.place_token(id(Color::Green, slot), Position::FINISHED);
    }
    let last = id(Color::Green, 3);
    engine.place_token(last, Position::new(50));

    roll(&mut engine, 6);
    let outcome = engine.select_token(last).unwrap();

    assert_eq!(outcome.winner, Some(Color::Green));
    assert_eq!(engine.winner(), Some(Color::Green));
    assert!(engine.is_game_over());

    assert!(!engine.request_roll());
    for token in TokenId::all() {
        assert!(engine.select_token(token).is_none());
    }
    assert!(!engine.next_turn());
    assert_eq!(engine.current_turn(), Color::Green);
}

// === Invariants ===

#[test]
fn test_exact_landing_table() {
    for raw in -1..=56 {
        let position = Position::new(raw);
        for face in 1..=6u8 {
            let expected = if raw == -1 {
                face == 6
            } else {
                raw < 56 && raw + face as i8 <= 56
            };
            assert_eq!(is_legal_move(position, face), expected, "position {raw}, face {face}");
        }
    }
}

#[test]
fn test_safe_cell_blocks_capture() {
    let mut engine = four_player();
    let mover = id(Color::Yellow, 0);
    let sitter = id(Color::Red, 1);
    // Global 8 is safe: Yellow reaches it at relative 7.
    engine.place_token(mover, Position::new(5));
    engine.place_token(sitter, relative(Color::Red, 8));

    roll(&mut engine, 2);
    let outcome = engine.select_token(mover).unwrap();

    assert_eq!(global_index(Color::Yellow, outcome.to), Some(8));
    assert!(outcome.captured.is_empty());
    assert!(!outcome.extra_turn);
    assert_eq!(engine.token(sitter).position, relative(Color::Red, 8));
    assert!(engine.latest_capture().is_none());
}

#[test]
fn test_capture_takes_every_opponent_on_cell_only() {
    let mut engine = four_player();
    let mover = id(Color::Yellow, 0);
    engine.place_token(mover, Position::new(10));
    let cell = 14 + 1; // Yellow relative 14
    assert!(!is_safe_index(cell));

    let red = id(Color::Red, 0);
    let blue = id(Color::Blue, 3);
    let bystander = id(Color::Green, 0);
    engine.place_token(red, relative(Color::Red, cell));
    engine.place_token(blue, relative(Color::Blue, cell));
    engine.place_token(bystander, relative(Color::Green, cell + 1));

    roll(&mut engine, 4);
    let outcome = engine.select_token(mover).unwrap();

    let mut captured = outcome.captured.to_vec();
    captured.sort();
    assert_eq!(captured, vec![red, blue]);
    assert_eq!(engine.token(red).position, Position::BASE);
    assert_eq!(engine.token(blue).position, Position::BASE);
    assert_eq!(engine.token(bystander).position, relative(Color::Green, cell + 1));
}

#[test]
fn test_own_tokens_never_captured() {
    let mut engine = four_player();
    let a = id(Color::Yellow, 0);
    let b = id(Color::Yellow, 1);
    engine.place_token(a, Position::new(10));
    engine.place_token(b, Position::new(13));

    roll(&mut engine, 3);
    let outcome = engine.select_token(a).unwrap();

    assert!(outcome.captured.is_empty());
    assert_eq!(engine.token(b).position, Position::new(13));
}

#[test]
fn test_home_stretch_is_private() {
    let mut engine = four_player();
    let yellow = id(Color::Yellow, 0);
    let red = id(Color::Red, 0);
    engine.place_token(yellow, Position::new(50));
    engine.place_token(red, Position::new(52));

    roll(&mut engine, 2);
    let outcome = engine.select_token(yellow).unwrap();

    assert_eq!(outcome.to, Position::new(52));
    assert!(outcome.captured.is_empty());
    assert_eq!(engine.token(red).position, Position::new(52));
}

#[test]
fn test_reaching_finish_grants_extra_roll() {
    let mut engine = four_player();
    let token = id(Color::Yellow, 0);
    engine.place_token(token, Position::new(53));

    roll(&mut engine, 3);
    let outcome = engine.select_token(token).unwrap();

    assert_eq!(outcome.to, Position::FINISHED);
    assert!(outcome.extra_turn);
    assert_eq!(engine.current_turn(), Color::Yellow);
    assert_eq!(engine.consecutive_sixes(), 0);
}

#[test]
fn test_finished_tokens_are_never_movable() {
    let mut engine = four_player();
    engine.place_token(id(Color::Yellow, 0), Position::FINISHED);

    roll(&mut engine, 6);

    assert!(!engine.is_movable(id(Color::Yellow, 0)));
    assert_eq!(engine.movable_tokens().len(), 3);
}

#[test]
fn test_two_player_skips_inactive_colors() {
    let mut engine = LudoEngine::default();
    assert_eq!(engine.active_colors().collect::<Vec<_>>(), vec![Color::Yellow, Color::Green]);

    roll(&mut engine, 1);
    engine.advance_time(1.0);
    assert_eq!(engine.current_turn(), Color::Green);

    roll(&mut engine, 1);
    engine.advance_time(1.0);
    assert_eq!(engine.current_turn(), Color::Yellow);
}

#[test]
fn test_six_streak_resets_on_other_face() {
    let mut engine = four_player();
    roll(&mut engine, 6);
    engine.select_token(id(Color::Yellow, 0)).unwrap();
    assert_eq!(engine.consecutive_sixes(), 1);

    roll(&mut engine, 2);
    assert_eq!(engine.consecutive_sixes(), 0);
}

// === Deferred hand-offs ===

#[test]
fn test_forfeit_ignores_other_input() {
    let mut engine = four_player();
    roll(&mut engine, 4);

    assert!(!engine.request_roll());
    assert!(!engine.resolve_roll(6));
    assert!(engine.select_token(id(Color::Yellow, 0)).is_none());
    assert_eq!(engine.current_turn(), Color::Yellow);
}

#[test]
fn test_manual_advance_makes_timer_harmless() {
    let mut engine = four_player();
    roll(&mut engine, 4);

    assert!(engine.next_turn());
    assert_eq!(engine.current_turn(), Color::Red);

    assert_eq!(engine.advance_time(5.0), 0);
    assert_eq!(engine.current_turn(), Color::Red);
}

#[test]
fn test_reset_drops_pending_forfeit() {
    let mut engine = four_player();
    roll(&mut engine, 4);
    engine.new_game();
    roll(&mut engine, 6);

    assert_eq!(engine.advance_time(3.0), 0);
    assert_eq!(engine.current_turn(), Color::Yellow);
    assert_eq!(engine.phase(), TurnPhase::MoveSelection);
}

#[test]
fn test_capture_window_expires() {
    let mut engine = LudoEngine::new(GameConfig::new(PlayerCount::Four).with_first_turn(Color::Red));
    let attacker = id(Color::Red, 0);
    engine.place_token(attacker, Position::new(2));
    engine.place_token(id(Color::Yellow, 0), relative(Color::Yellow, 19));

    roll(&mut engine, 3);
    engine.select_token(attacker).unwrap();
    assert_eq!(engine.active_captures().count(), 1);

    engine.advance_time(1.5);
    assert_eq!(engine.active_captures().count(), 1);
    engine.advance_time(1.0);
    assert_eq!(engine.active_captures().count(), 0);
    assert!(engine.latest_capture().is_some());
}

#[test]
fn test_safe_indices_table() {
    assert_eq!(SAFE_INDICES, [1, 8, 14, 21, 27, 34, 40, 47]);
    for color in Color::ROTATION {
        let entry = global_index(color, Position::START).unwrap();
        assert!(is_safe_index(entry), "{color} entry cell must be safe");
    }
}

//! Whole-game tests: GameService with both loops running against the
//! mock board, driven by holding and releasing buttons.

use std::sync::Arc;
use std::time::Duration;

use memgame::app::events::AppEvent;
use memgame::app::ports::PinMode;
use memgame::app::service::{GameService, RunningGame};
use memgame::config::{GameConfig, Pinout};
use memgame::game::GameOverReason;
use memgame::game::referee::Outcome;
use memgame::game::sequence::SequenceGenerator;
use memgame::pins::LED_OFF;

use crate::mock_hw::{channels, fast_config, wait_until, EventRecorder, MockBoard, MockLog};

const WAIT: Duration = Duration::from_secs(3);

struct Rig {
    board: Arc<MockBoard>,
    log: Arc<MockLog>,
    events: Arc<EventRecorder>,
    game: RunningGame,
}

fn start(config: GameConfig) -> Rig {
    let board = Arc::new(MockBoard::new());
    let log = Arc::new(MockLog::default());
    let events = Arc::new(EventRecorder::default());
    let game = GameService::new(
        Pinout::from_channels(channels()).unwrap(),
        config,
        board.clone(),
        log.clone(),
        events.clone(),
    )
    .with_generator(SequenceGenerator::seeded(11))
    .start()
    .unwrap();
    Rig {
        board,
        log,
        events,
        game,
    }
}

fn round_started(level: u32) -> impl Fn(&AppEvent) -> bool {
    move |e| matches!(e, AppEvent::RoundStarted { level: l, .. } if *l == level)
}

fn game_over(reason: GameOverReason) -> impl Fn(&AppEvent) -> bool {
    move |e| matches!(e, AppEvent::GameOver { reason: r, .. } if *r == reason)
}

/// Tap one button: hold until the sampler registers it, then let go and
/// give the sampler time to see the release.
fn tap(rig: &Rig, button: u8) {
    let presses = rig.events.count(|e| matches!(e, AppEvent::Press { .. }));
    rig.board.hold(button);
    assert!(rig.events.wait_for(presses + 1, WAIT, |e| matches!(e, AppEvent::Press { .. })));
    rig.board.let_go(button);
    std::thread::sleep(Duration::from_millis(10));
}

fn play_current_round(rig: &Rig) {
    for button in rig.game.state().snapshot().expected {
        tap(rig, button);
    }
}

#[test]
fn startup_configures_pins_and_presents_level_one() {
    let rig = start(fast_config());
    assert!(rig.events.wait_for(1, WAIT, round_started(1)));

    for ch in channels() {
        assert_eq!(rig.board.mode(ch.led), Some(PinMode::Output));
        assert_eq!(rig.board.mode(ch.button), Some(PinMode::InputPullUp));
        assert_eq!(rig.board.led(ch.led), Some(LED_OFF));
    }
    assert!(matches!(rig.events.all()[0], AppEvent::Started { channels: 4 }));
    assert_eq!(rig.log.levels(), vec![1]);
    assert_eq!(rig.game.state().snapshot().expected.len(), 1);
}

#[test]
fn clearing_a_round_advances_level() {
    let rig = start(fast_config());
    assert!(rig.events.wait_for(1, WAIT, round_started(1)));

    play_current_round(&rig);
    assert!(rig.events.wait_for(1, WAIT, round_started(2)));

    let state = rig.game.state();
    let snap = state.snapshot();
    assert_eq!(state.level(), 2);
    assert_eq!(snap.expected.len(), 2);
    assert!(snap.input.is_empty());
    assert_eq!(snap.outcome, Outcome::Pending);
    assert!(state.countdown_ms() > 4_000);
    assert_eq!(rig.log.levels(), vec![1, 2]);
}

#[test]
fn wrong_button_resets_to_level_one() {
    let rig = start(fast_config());
    assert!(rig.events.wait_for(1, WAIT, round_started(1)));
    play_current_round(&rig);
    assert!(rig.events.wait_for(1, WAIT, round_started(2)));

    let first = rig.game.state().snapshot().expected[0];
    let wrong = channels().into_iter().find(|c| c.button != first).unwrap().button;
    tap(&rig, wrong);

    assert!(rig.events.wait_for(1, WAIT, game_over(GameOverReason::WrongButton)));
    assert!(rig.events.wait_for(2, WAIT, round_started(1)));
    let state = rig.game.state();
    assert_eq!(state.level(), 1);
    assert!(!state.is_restarting());
    assert_eq!(rig.log.levels(), vec![1, 2, 1]);
}

#[test]
fn idle_player_times_out() {
    let rig = start(GameConfig {
        round_budget_ms: 40,
        ..fast_config()
    });
    assert!(rig.events.wait_for(1, WAIT, game_over(GameOverReason::Timeout)));
    assert!(rig.events.wait_for(2, WAIT, round_started(1)));
}

#[test]
fn clearing_the_last_level_ends_the_game() {
    let rig = start(GameConfig {
        max_level: 2,
        ..fast_config()
    });
    assert!(rig.events.wait_for(1, WAIT, round_started(1)));
    play_current_round(&rig);
    assert!(rig.events.wait_for(1, WAIT, round_started(2)));
    play_current_round(&rig);

    assert!(rig.events.wait_for(1, WAIT, game_over(GameOverReason::LevelCap)));
    assert_eq!(rig.events.count(round_started(3)), 0);
    assert!(rig.events.wait_for(2, WAIT, round_started(1)));
}

#[test]
fn shutdown_releases_board_and_closes_log_once() {
    let rig = start(fast_config());
    assert!(rig.events.wait_for(1, WAIT, round_started(1)));

    let Rig {
        board, log, events, game,
    } = rig;
    game.shutdown();

    assert_eq!(board.releases(), 1);
    assert!(log.is_closed());
    assert_eq!(events.count(|e| *e == AppEvent::Stopped), 1);
    assert_eq!(events.all().last(), Some(&AppEvent::Stopped));

    // Neither loop touches the board afterwards.
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(board.drives_after_release(), 0);
}

#[test]
fn dropping_the_handle_also_cleans_up() {
    let rig = start(fast_config());
    assert!(rig.events.wait_for(1, WAIT, round_started(1)));
    let board = rig.board.clone();
    drop(rig);
    assert!(wait_until(WAIT, || board.releases() == 1));
}

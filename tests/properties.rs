//! Lifecycle and session invariants under arbitrary input

use std::collections::HashMap;
use std::time::Duration;

use glam::Vec2;
use proptest::prelude::*;

use bubble_pop::sim::{
    Bubble, BubbleState, Frame, GameEvent, GameSession, Shrink, SpawnParams, SpawnRange, tick,
};
use bubble_pop::{Color, GameConfig, Scene};

/// One frame of scripted play
#[derive(Debug, Clone)]
enum Action {
    /// Tap the n-th tracked bubble (modulo the count)
    Tap(usize),
    /// Tap an id that never existed
    TapUnknown,
    TogglePause,
    Idle,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => any::<usize>().prop_map(Action::Tap),
        1 => Just(Action::TapUnknown),
        1 => Just(Action::TogglePause),
        6 => Just(Action::Idle),
    ]
}

fn new_session(seed: u64, height: f32) -> (GameSession, Scene) {
    let mut config = GameConfig::with_viewport(320.0, height);
    config.spawn_interval_ms = 250;
    config.spawn = SpawnParams {
        fall_speed: SpawnRange::new(2, 9),
        radius: SpawnRange::new(5, 30),
    };
    let scene = Scene::new(config.viewport);
    (GameSession::new(config, seed, Duration::ZERO), scene)
}

proptest! {
    #[test]
    fn active_bubbles_never_rise(
        speed in 0.0f32..20.0,
        deltas in prop::collection::vec(-5.0f32..10.0, 1..50),
    ) {
        let mut bubble = Bubble::new(1, 1, Vec2::new(50.0, -20.0), 20.0, speed, Color::WHITE);
        for delta in deltas {
            let before = bubble.pos.y;
            bubble.fall(delta);
            prop_assert!(bubble.pos.y >= before);
        }
    }

    #[test]
    fn shrink_is_monotone_until_negative(step in 0.01f32..0.6) {
        let mut bubble = Bubble::new(1, 1, Vec2::ZERO, 20.0, 1.0, Color::WHITE);
        prop_assert!(bubble.disable());
        prop_assert_eq!(bubble.state, BubbleState::Disabled);

        let mut last = bubble.scale;
        loop {
            match bubble.shrink(step) {
                Shrink::Scaled(scale) => {
                    prop_assert!(scale < last);
                    prop_assert!(scale >= 0.0);
                    last = scale;
                }
                Shrink::Expired => {
                    prop_assert!(bubble.scale < 0.0);
                    break;
                }
            }
        }
    }

    #[test]
    fn session_invariants_hold(
        seed in any::<u64>(),
        height in 80.0f32..600.0,
        actions in prop::collection::vec(action(), 50..400),
        frame_ms in 8u64..40,
    ) {
        let (mut session, mut scene) = new_session(seed, height);
        let initial_lives = session.state().lives;
        let mut last_y: HashMap<u32, f32> = HashMap::new();
        let mut lives = initial_lives;
        let mut popped = 0;
        let mut game_overs = 0;
        let mut now = 0;

        for action in actions {
            // What a tap should do, judged before the frame applies it
            let mut expect_pop = None;
            match action {
                Action::Tap(n) if !session.bubbles().is_empty() => {
                    let bubble = &session.bubbles()[n % session.bubbles().len()];
                    let id = bubble.id;
                    expect_pop = Some((id, session.state().is_running() && bubble.is_active()));
                    session.tap(id);
                }
                Action::TapUnknown => session.tap(u32::MAX),
                Action::TogglePause => session.toggle_pause(),
                _ => {}
            }

            let score_before = session.state().score;
            now += frame_ms;
            tick(
                &mut session,
                &mut scene,
                &Frame::new(Duration::from_millis(now), frame_ms as f32 / 16.0),
            );
            let events = session.drain_events();
            let state = session.state();

            // Score moves by one exactly when an active bubble was tapped while running
            let pops: Vec<_> = events
                .iter()
                .filter_map(|e| match e {
                    GameEvent::Popped { id, .. } => Some(*id),
                    _ => None,
                })
                .collect();
            match expect_pop {
                Some((id, true)) => prop_assert_eq!(&pops, &vec![id]),
                _ => prop_assert!(pops.is_empty()),
            }
            popped += pops.len() as u32;
            prop_assert_eq!(state.score, score_before + pops.len() as u32);
            prop_assert_eq!(state.score, popped);

            // Lives only go down and never wrap
            prop_assert!(state.lives <= lives);
            prop_assert!(state.lives <= initial_lives);
            lives = state.lives;

            game_overs += events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count();
            prop_assert!(game_overs <= 1);
            prop_assert_eq!(state.game_over, lives == 0);

            for bubble in session.bubbles() {
                if bubble.is_active() {
                    if let Some(prev) = last_y.get(&bubble.id) {
                        prop_assert!(bubble.pos.y >= *prev);
                    }
                    prop_assert!(!state.game_over);
                } else {
                    prop_assert!(bubble.scale >= 0.0);
                }
                last_y.insert(bubble.id, bubble.pos.y);
            }
            prop_assert_eq!(scene.sprite_count(), session.bubbles().len());
        }
    }
}

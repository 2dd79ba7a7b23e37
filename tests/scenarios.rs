//! End-to-end sessions driven at 16 ms frames against a retained scene

use std::time::Duration;

use bubble_pop::sim::{Frame, GameEvent, GameSession, SpawnParams, SpawnRange, tick};
use bubble_pop::{GameConfig, Scene};

const FRAME_MS: u64 = 16;

struct Harness {
    session: GameSession,
    scene: Scene,
    now_ms: u64,
}

impl Harness {
    fn new(width: f32, height: f32, fall_speed: i32, radius: i32) -> Self {
        let mut config = GameConfig::with_viewport(width, height);
        config.spawn = SpawnParams {
            fall_speed: SpawnRange::new(fall_speed, fall_speed),
            radius: SpawnRange::new(radius, radius),
        };
        Self::with_config(config, 7)
    }

    fn with_config(config: GameConfig, seed: u64) -> Self {
        let scene = Scene::new(config.viewport);
        Self {
            session: GameSession::new(config, seed, Duration::ZERO),
            scene,
            now_ms: 0,
        }
    }

    fn step(&mut self) -> Vec<GameEvent> {
        self.now_ms += FRAME_MS;
        tick(
            &mut self.session,
            &mut self.scene,
            &Frame::new(Duration::from_millis(self.now_ms), 1.0),
        );
        self.session.drain_events()
    }

    /// Run until `until_ms`, collecting every event
    fn run_until(&mut self, until_ms: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while self.now_ms + FRAME_MS <= until_ms {
            events.extend(self.step());
        }
        events
    }
}

fn spawned(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::Spawned { .. }))
        .count()
}

#[test]
fn five_taps_score_five() {
    let mut h = Harness::new(800.0, 600.0, 0, 20);
    let mut popped = Vec::new();

    while popped.len() < 5 && h.now_ms < 10_000 {
        for event in h.step() {
            match event {
                GameEvent::Spawned { id } => h.session.tap(id),
                GameEvent::Popped { score, .. } => popped.push(score),
                _ => {}
            }
        }
    }

    assert_eq!(popped, vec![1, 2, 3, 4, 5]);
    assert_eq!(h.session.state().score, 5);
    assert_eq!(h.session.state().lives, 3);
    assert!(!h.session.state().game_over);
}

#[test]
fn three_escapes_end_the_game() {
    // Each bubble leaves a 100 px field within a dozen frames
    let mut h = Harness::new(400.0, 100.0, 10, 10);
    let events = h.run_until(4_000);

    let escapes: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Escaped { lives, .. } => Some(*lives),
            _ => None,
        })
        .collect();
    assert_eq!(escapes, vec![2, 1, 0]);
    assert!(events.contains(&GameEvent::GameOver { final_score: 0 }));

    let state = h.session.state();
    assert!(state.game_over);
    assert_eq!(state.lives, 0);
    assert_eq!(state.final_score, Some(0));
    assert!(!h.session.is_spawning());

    // Nothing spawns afterwards and game over is announced once
    let later = h.run_until(9_000);
    assert_eq!(spawned(&later), 0);
    assert!(!later.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    assert_eq!(h.session.state().lives, 0);
    assert!(h.session.bubbles().is_empty());
    assert_eq!(h.scene.sprite_count(), 0);
}

#[test]
fn pause_freezes_clock_spawns_and_motion() {
    let mut h = Harness::new(800.0, 2_000.0, 0, 20);
    let before = h.run_until(2_500);
    assert_eq!(spawned(&before), 2);
    assert_eq!(h.session.state().elapsed_seconds, 2);

    let positions: Vec<_> = h.session.bubbles().iter().map(|b| b.pos).collect();
    h.session.toggle_pause();
    let paused = h.run_until(7_500);

    assert!(paused.contains(&GameEvent::PauseChanged { paused: true }));
    assert_eq!(spawned(&paused), 0);
    assert_eq!(h.session.state().elapsed_seconds, 2);
    let frozen: Vec<_> = h.session.bubbles().iter().map(|b| b.pos).collect();
    assert_eq!(frozen, positions);

    h.session.toggle_pause();
    let resumed = h.run_until(8_600);
    assert!(resumed.contains(&GameEvent::PauseChanged { paused: false }));
    assert_eq!(spawned(&resumed), 1);
    assert_eq!(h.session.state().elapsed_seconds, 3);
    assert!(h.session.bubbles()[0].pos.y > positions[0].y);
}

#[test]
fn difficulty_ratchets_after_ten_seconds() {
    // Tall field so nothing escapes before the ratchet
    let config = GameConfig::with_viewport(800.0, 4_000.0);
    let mut h = Harness::with_config(config, 42);

    let early = h.run_until(9_900);
    assert!(!early.iter().any(|e| matches!(e, GameEvent::DifficultyRaised { .. })));

    let events = h.run_until(10_100);
    let expected = SpawnParams {
        fall_speed: SpawnRange::new(1, 6),
        radius: SpawnRange::new(15, 65),
    };
    assert!(events.contains(&GameEvent::DifficultyRaised {
        level: 1,
        params: expected,
    }));
    assert_eq!(h.session.state().spawn_params, expected);
    assert_eq!(h.session.state().elapsed_seconds, 10);
    assert_eq!(h.session.difficulty_level(), 1);
    assert_eq!(h.session.state().lives, 3);

    // Later spawns use the tightened ranges
    h.run_until(12_100);
    let newest = h.session.bubbles().last().map(|b| (b.fall_speed, b.radius));
    assert!(matches!(newest, Some((speed, radius))
        if (1.0..=6.0).contains(&speed) && (15.0..=65.0).contains(&radius)));
}

#[test]
fn restart_releases_handles_and_resets_state() {
    let mut h = Harness::new(800.0, 600.0, 0, 20);
    h.run_until(3_100);
    assert_eq!(h.session.bubbles().len(), 3);
    assert_eq!(h.scene.sprite_count(), 3);

    let restart_at = Duration::from_millis(h.now_ms);
    h.session.restart(&mut h.scene, 99, restart_at);

    assert_eq!(h.scene.sprite_count(), 0);
    assert!(h.session.bubbles().is_empty());
    assert_eq!(h.session.state().score, 0);
    assert_eq!(h.session.state().elapsed_seconds, 0);
    assert_eq!(h.session.seed(), 99);

    // Cadence restarts from the restart time
    let events = h.run_until(h.now_ms + 1_100);
    assert_eq!(spawned(&events), 1);
}

#[test]
fn same_seed_same_game() {
    let run = |seed| {
        let mut h = Harness::with_config(GameConfig::with_viewport(800.0, 600.0), seed);
        h.run_until(5_100);
        h.session
            .bubbles()
            .iter()
            .map(|b| (b.pos.x, b.radius, b.fall_speed, b.color))
            .collect::<Vec<_>>()
    };
    let a = run(1234);
    assert!(!a.is_empty());
    assert_eq!(a, run(1234));
}

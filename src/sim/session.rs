//! Game session: the single owner of all simulation state

use std::collections::VecDeque;
use std::time::Duration;

use glam::Vec2;

use super::bubble::{Bubble, BubbleId};
use super::difficulty::DifficultyController;
use super::rng::RandomSource;
use super::spawn::{SpawnScheduler, SpawnStyle, spawn_bubble};
use super::state::{GameEvent, InputEvent, SessionState};
use crate::config::GameConfig;
use crate::surface::{DisplaySurface, HandleId};

/// One game from first spawn to game over
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) config: GameConfig,
    pub(crate) state: SessionState,
    /// Insertion-ordered; tick evaluates in this order
    pub(crate) bubbles: Vec<Bubble>,
    pub(crate) rng: RandomSource,
    pub(crate) spawner: SpawnScheduler,
    pub(crate) difficulty: DifficultyController,
    pub(crate) inputs: VecDeque<InputEvent>,
    pub(crate) events: Vec<GameEvent>,
    next_id: BubbleId,
}

impl GameSession {
    /// Create a session. `now` is the current monotonic time.
    pub fn new(config: GameConfig, seed: u64, now: Duration) -> Self {
        log::info!("New session (seed {})", seed);
        Self {
            state: SessionState::new(config.initial_lives, config.spawn),
            bubbles: Vec::new(),
            rng: RandomSource::new(seed),
            spawner: SpawnScheduler::new(config.spawn_interval(), now),
            difficulty: DifficultyController::new(
                config.difficulty,
                config.difficulty_interval(),
                now,
            ),
            inputs: VecDeque::new(),
            events: Vec::new(),
            next_id: 1,
            config,
        }
    }

    /// Full restart: release every display handle and reset all state
    pub fn restart<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S, seed: u64, now: Duration) {
        for bubble in self.bubbles.drain(..) {
            if !surface.destroy_handle(bubble.handle) {
                log::trace!("Handle {} already gone on restart", bubble.handle);
            }
        }
        *self = Self::new(self.config.clone(), seed, now);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Tracked bubbles in registration order
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    /// Resolve a hit-tested display handle to its bubble
    pub fn bubble_by_handle(&self, handle: HandleId) -> Option<BubbleId> {
        self.bubbles.iter().find(|b| b.handle == handle).map(|b| b.id)
    }

    pub fn difficulty_level(&self) -> u32 {
        self.difficulty.level()
    }

    pub fn is_spawning(&self) -> bool {
        !self.spawner.is_cancelled()
    }

    /// Queue input for the next tick
    pub fn queue_input(&mut self, input: InputEvent) {
        self.inputs.push_back(input);
    }

    pub fn tap(&mut self, id: BubbleId) {
        self.queue_input(InputEvent::Tap(id));
    }

    pub fn toggle_pause(&mut self) {
        self.queue_input(InputEvent::TogglePause);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Playfield resized
    pub fn resize(&mut self, viewport: Vec2) {
        self.config.viewport = viewport;
    }

    /// Restart timer cadence from `now` (display resumed after being hidden)
    pub fn resync_clock(&mut self, now: Duration) {
        self.spawner.resync(now);
        self.difficulty.resync(now);
    }

    // ------------------------------------------------------------------
    // Mutations applied from within tick
    // ------------------------------------------------------------------

    pub(crate) fn apply_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::Tap(id) => {
                self.apply_tap(id);
            }
            InputEvent::TogglePause => self.apply_toggle_pause(),
        }
    }

    /// Score a tap on an active bubble. Anything else is ignored.
    pub(crate) fn apply_tap(&mut self, id: BubbleId) -> bool {
        if !self.state.is_running() {
            log::trace!("Tap on {} ignored (paused or game over)", id);
            return false;
        }
        let Some(bubble) = self.bubbles.iter_mut().find(|b| b.id == id) else {
            log::trace!("Tap on unknown bubble {}", id);
            return false;
        };
        if !bubble.disable() {
            return false;
        }
        self.state.score += 1;
        self.events.push(GameEvent::Popped {
            id,
            score: self.state.score,
        });
        true
    }

    fn apply_toggle_pause(&mut self) {
        if self.state.game_over {
            return;
        }
        self.state.paused = !self.state.paused;
        log::info!("{}", if self.state.paused { "Paused" } else { "Resumed" });
        self.events.push(GameEvent::PauseChanged {
            paused: self.state.paused,
        });
    }

    pub(crate) fn spawn<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S) -> BubbleId {
        let id = self.next_id;
        self.next_id += 1;
        let style = SpawnStyle {
            colorful: self.config.colorful,
            shadow: self.config.display.shadows,
        };
        let bubble = spawn_bubble(
            id,
            &self.state.spawn_params,
            self.config.viewport,
            style,
            &mut self.rng,
            surface,
        );
        self.bubbles.push(bubble);
        self.events.push(GameEvent::Spawned { id });
        id
    }

    /// Enter game over once. Returns false if already over.
    pub(crate) fn end_game(&mut self) -> bool {
        if self.state.game_over {
            return false;
        }
        self.state.game_over = true;
        self.spawner.cancel();
        for bubble in &mut self.bubbles {
            bubble.disable();
        }
        let final_score = self.state.score;
        self.state.final_score = Some(final_score);
        log::info!(
            "Game over: score {} after {}s",
            final_score,
            self.state.elapsed_seconds
        );
        self.events.push(GameEvent::GameOver { final_score });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use crate::sim::bubble::BubbleState;

    fn session() -> (GameSession, Scene) {
        let config = GameConfig::default();
        let scene = Scene::new(config.viewport);
        (GameSession::new(config, 1, Duration::ZERO), scene)
    }

    #[test]
    fn test_new_session_from_config() {
        let (session, _) = session();
        assert_eq!(session.state().lives, 3);
        assert_eq!(session.state().score, 0);
        assert!(session.bubbles().is_empty());
        assert!(session.is_spawning());
    }

    #[test]
    fn test_spawn_assigns_unique_ids() {
        let (mut session, mut scene) = session();
        let a = session.spawn(&mut scene);
        let b = session.spawn(&mut scene);
        assert_ne!(a, b);
        let handle = session.bubble(b).map(|b| b.handle).expect("tracked");
        assert_eq!(session.bubble_by_handle(handle), Some(b));
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::Spawned { id: a }, GameEvent::Spawned { id: b }]
        );
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let (mut session, mut scene) = session();
        session.spawn(&mut scene);
        session.drain_events();

        assert!(session.end_game());
        assert!(!session.end_game());
        assert!(!session.is_spawning());
        assert!(session.bubbles().iter().all(|b| b.state == BubbleState::Disabled));
        assert_eq!(session.state().final_score, Some(0));
        assert_eq!(session.drain_events(), vec![GameEvent::GameOver { final_score: 0 }]);
    }

    #[test]
    fn test_pause_ignored_after_game_over() {
        let (mut session, _) = session();
        session.end_game();
        session.apply_input(InputEvent::TogglePause);
        assert!(!session.state().paused);
    }

    #[test]
    fn test_restart_releases_handles() {
        let (mut session, mut scene) = session();
        session.spawn(&mut scene);
        session.spawn(&mut scene);
        session.state.score = 7;
        session.end_game();

        session.restart(&mut scene, 2, Duration::from_secs(50));
        assert_eq!(scene.sprite_count(), 0);
        assert!(session.bubbles().is_empty());
        assert_eq!(session.state().score, 0);
        assert!(!session.state().game_over);
        assert!(session.is_spawning());
        assert_eq!(session.seed(), 2);
    }
}

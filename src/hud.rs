//! Status bar chrome: a strip across the top with lives, score and time

use glam::Vec2;

use crate::config::DisplayConfig;
use crate::sim::SessionState;
use crate::surface::{DisplaySurface, HandleId, Shape, ShapeStyle, TextStyle};

/// Left inset of the first label
const TEXT_INSET: f32 = 25.0;

/// HUD handles plus the last values pushed to them
#[derive(Debug, Clone)]
pub struct StatusBar {
    bar: HandleId,
    lives: HandleId,
    score: HandleId,
    time: HandleId,
    shown: (u32, u32, u32),
}

fn lives_label(lives: u32) -> String {
    format!("Lives: {}", lives)
}

fn score_label(score: u32) -> String {
    format!("Score: {}", score)
}

fn time_label(seconds: u32) -> String {
    format!("Time: {}s", seconds)
}

impl StatusBar {
    pub fn new<S: DisplaySurface + ?Sized>(
        surface: &mut S,
        display: &DisplayConfig,
        state: &SessionState,
    ) -> Self {
        let width = surface.viewport().x;
        let height = display.status_bar_height;
        let bar = surface.create_display_handle(
            Shape::Rect {
                size: Vec2::new(width, height),
            },
            Vec2::ZERO,
            ShapeStyle::filled(display.status_bar_color),
        );

        let style = TextStyle {
            font_family: display.text_font.clone(),
            font_size: display.text_size,
            bold: true,
            fill: display.text_color,
            stroke: display.text_stroke,
        };
        // Labels are vertically centred in the bar
        let y = height / 2.0;
        let lives = surface.create_text_handle(
            &lives_label(state.lives),
            style.clone(),
            Vec2::new(TEXT_INSET, y),
        );
        let score = surface.create_text_handle(
            &score_label(state.score),
            style.clone(),
            Vec2::new(width / 2.0 - TEXT_INSET * 3.0, y),
        );
        let time = surface.create_text_handle(
            &time_label(state.elapsed_seconds),
            style,
            Vec2::new(width - TEXT_INSET * 7.0, y),
        );

        Self {
            bar,
            lives,
            score,
            time,
            shown: (state.lives, state.score, state.elapsed_seconds),
        }
    }

    pub fn handles(&self) -> [HandleId; 4] {
        [self.bar, self.lives, self.score, self.time]
    }

    /// Push changed values to the surface
    pub fn refresh<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S, state: &SessionState) {
        let (lives, score, time) = self.shown;
        if lives != state.lives {
            surface.update_text_content(self.lives, &lives_label(state.lives));
        }
        if score != state.score {
            surface.update_text_content(self.score, &score_label(state.score));
        }
        if time != state.elapsed_seconds {
            surface.update_text_content(self.time, &time_label(state.elapsed_seconds));
        }
        self.shown = (state.lives, state.score, state.elapsed_seconds);
    }

    /// Release every HUD handle
    pub fn destroy<S: DisplaySurface + ?Sized>(self, surface: &mut S) {
        for handle in self.handles() {
            surface.destroy_handle(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use crate::sim::SpawnParams;

    #[test]
    fn test_initial_labels() {
        let mut scene = Scene::new(Vec2::new(800.0, 600.0));
        let state = SessionState::new(3, SpawnParams::default());
        let bar = StatusBar::new(&mut scene, &DisplayConfig::default(), &state);
        let [rect, lives, score, time] = bar.handles();

        assert!(matches!(
            scene.sprite(rect).map(|s| s.shape),
            Some(Shape::Rect { size }) if size == Vec2::new(800.0, 50.0)
        ));
        assert_eq!(scene.text(lives).map(|t| t.content.as_str()), Some("Lives: 3"));
        assert_eq!(scene.text(score).map(|t| t.content.as_str()), Some("Score: 0"));
        assert_eq!(scene.text(time).map(|t| t.content.as_str()), Some("Time: 0s"));
    }

    #[test]
    fn test_refresh_pushes_only_changes() {
        let mut scene = Scene::new(Vec2::new(800.0, 600.0));
        let mut state = SessionState::new(3, SpawnParams::default());
        let mut bar = StatusBar::new(&mut scene, &DisplayConfig::default(), &state);
        let [_, lives, score, _] = bar.handles();
        scene.take_text_updates();

        bar.refresh(&mut scene, &state);
        assert!(scene.take_text_updates().is_empty());

        state.score = 4;
        state.lose_life();
        bar.refresh(&mut scene, &state);
        assert_eq!(scene.take_text_updates(), vec![lives, score]);
        assert_eq!(scene.text(lives).map(|t| t.content.as_str()), Some("Lives: 2"));
        assert_eq!(scene.text(score).map(|t| t.content.as_str()), Some("Score: 4"));
    }

    #[test]
    fn test_destroy_releases_handles() {
        let mut scene = Scene::new(Vec2::new(800.0, 600.0));
        let state = SessionState::new(3, SpawnParams::default());
        let bar = StatusBar::new(&mut scene, &DisplayConfig::default(), &state);
        let handles = bar.handles();
        bar.destroy(&mut scene);
        assert_eq!(scene.sprite_count(), 0);
        assert!(handles.iter().all(|h| scene.text(*h).is_none()));
    }
}

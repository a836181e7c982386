//! Game session: the engine plus everything around a game that is not rules.
//!
//! A session tracks the menu/playing/finished status, player names, the
//! chosen environment and audio/graphics settings. It forwards gameplay
//! inputs to the engine only while a game is being played and produces the
//! `Snapshot` a persistence collaborator stores.

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::{Color, ColorMap, GameConfig, PlayerCount, TokenId};
use crate::rules::{LudoEngine, MoveOutcome};
use crate::snapshot::{Snapshot, SnapshotError};

/// Environment selected when none has been chosen.
pub const DEFAULT_ENVIRONMENT: &str = "park";

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Menu,
    Playing,
    Finished,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphicsQuality {
    Low,
    #[default]
    High,
}

/// Player-facing settings. Volumes are in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub master_volume: f32,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub graphics_quality: GraphicsQuality,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            music_volume: 0.5,
            sfx_volume: 1.0,
            graphics_quality: GraphicsQuality::High,
        }
    }
}

impl Settings {
    /// Is any sound audible at all?
    #[must_use]
    pub fn sound_enabled(&self) -> bool {
        self.master_volume > 0.0
    }
}

/// Partial settings update; `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub master_volume: Option<f32>,
    pub music_volume: Option<f32>,
    pub sfx_volume: Option<f32>,
    pub graphics_quality: Option<GraphicsQuality>,
}

fn default_names() -> ColorMap<String> {
    ColorMap::new(|color| format!("Player {}", color.index() + 1))
}

/// A game with its surrounding menu state.
#[derive(Clone, Debug)]
pub struct GameSession {
    engine: LudoEngine,
    player_names: ColorMap<String>,
    game_status: GameStatus,
    selected_environment: String,
    settings: Settings,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameSession {
    /// Create a session sitting in the menu.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            engine: LudoEngine::new(config),
            player_names: default_names(),
            game_status: GameStatus::Menu,
            selected_environment: DEFAULT_ENVIRONMENT.to_string(),
            settings: Settings::default(),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn engine(&self) -> &LudoEngine {
        &self.engine
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.game_status
    }

    #[must_use]
    pub fn player_names(&self) -> &ColorMap<String> {
        &self.player_names
    }

    #[must_use]
    pub fn player_name(&self, color: Color) -> &str {
        &self.player_names[color]
    }

    #[must_use]
    pub fn environment(&self) -> &str {
        &self.selected_environment
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn player_count(&self) -> PlayerCount {
        self.engine.config().player_count
    }

    // === Menu ===

    /// Choose how many seats play. Only allowed from the menu.
    pub fn set_player_count(&mut self, count: PlayerCount) -> bool {
        if self.game_status != GameStatus::Menu {
            return false;
        }
        let mut config = self.engine.config().clone();
        config.player_count = count;
        if !config.is_active(config.first_turn) {
            config.first_turn = Color::Yellow;
        }
        self.engine.reconfigure(config);
        true
    }

    pub fn set_player_names(&mut self, names: ColorMap<String>) {
        self.player_names = names;
    }

    /// Apply a partial settings update. Volumes are clamped to `[0, 1]`.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        let clamp = |v: f32| v.clamp(0.0, 1.0);
        if let Some(v) = patch.master_volume {
            self.settings.master_volume = clamp(v);
        }
        if let Some(v) = patch.music_volume {
            self.settings.music_volume = clamp(v);
        }
        if let Some(v) = patch.sfx_volume {
            self.settings.sfx_volume = clamp(v);
        }
        if let Some(q) = patch.graphics_quality {
            self.settings.graphics_quality = q;
        }
    }

    /// Leave the menu and play in `environment`.
    pub fn start_game(&mut self, environment: impl Into<String>) -> bool {
        if self.game_status != GameStatus::Menu {
            return false;
        }
        self.selected_environment = environment.into();
        self.game_status = GameStatus::Playing;
        info!(
            "starting {}-player game in {}",
            self.player_count().count(),
            self.selected_environment
        );
        true
    }

    /// Back to the menu with a fresh board, default names and 2 players.
    ///
    /// Settings and environment survive a reset.
    pub fn reset_game(&mut self) {
        let mut config = self.engine.config().clone();
        config.player_count = PlayerCount::Two;
        config.first_turn = Color::Yellow;
        self.engine.reconfigure(config);
        self.player_names = default_names();
        self.game_status = GameStatus::Menu;
    }

    // === Gameplay ===

    pub fn request_roll(&mut self) -> bool {
        self.game_status == GameStatus::Playing && self.engine.request_roll()
    }

    pub fn resolve_roll(&mut self, face: u8) -> bool {
        self.game_status == GameStatus::Playing && self.engine.resolve_roll(face)
    }

    pub fn select_token(&mut self, id: TokenId) -> Option<MoveOutcome> {
        if self.game_status != GameStatus::Playing {
            return None;
        }
        let outcome = self.engine.select_token(id)?;
        if outcome.winner.is_some() {
            self.game_status = GameStatus::Finished;
        }
        Some(outcome)
    }

    /// Forward frame time to the engine's deferred tasks.
    pub fn advance_time(&mut self, dt: f64) -> usize {
        self.engine.advance_time(dt)
    }

    // === Persistence ===

    /// Capture everything needed to resume this session.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.engine.export(),
            player_names: self.player_names.clone(),
            game_status: self.game_status,
            selected_environment: self.selected_environment.clone(),
            player_count: self.player_count(),
            settings: self.settings.clone(),
        }
    }

    /// Resume from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the board violates an invariant; the
    /// session is left unchanged in that case.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let mut config = self.engine.config().clone();
        config.player_count = snapshot.player_count;
        if !config.is_active(config.first_turn) {
            config.first_turn = Color::Yellow;
        }
        self.engine.restore(config, &snapshot.board)?;

        self.player_names = snapshot.player_names.clone();
        self.selected_environment = snapshot.selected_environment.clone();
        self.settings = snapshot.settings.clone();
        self.game_status = if self.engine.winner().is_some() {
            GameStatus::Finished
        } else {
            snapshot.game_status
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let session = GameSession::default();
        assert_eq!(session.status(), GameStatus::Menu);
        assert_eq!(session.player_name(Color::Yellow), "Player 1");
        assert_eq!(session.player_name(Color::Blue), "Player 4");
        assert_eq!(session.environment(), DEFAULT_ENVIRONMENT);
        assert_eq!(session.player_count(), PlayerCount::Two);
        assert!(session.settings().sound_enabled());
    }

    #[test]
    fn test_gameplay_requires_playing() {
        let mut session = GameSession::default();
        assert!(!session.request_roll());

        assert!(session.start_game("beach"));
        assert_eq!(session.environment(), "beach");
        assert!(session.request_roll());
    }

    #[test]
    fn test_player_count_only_in_menu() {
        let mut session = GameSession::default();
        assert!(session.set_player_count(PlayerCount::Four));
        assert_eq!(session.player_count(), PlayerCount::Four);

        session.start_game("park");
        assert!(!session.set_player_count(PlayerCount::Two));
        assert_eq!(session.player_count(), PlayerCount::Four);
    }

    #[test]
    fn test_settings_patch() {
        let mut session = GameSession::default();
        session.update_settings(SettingsPatch {
            master_volume: Some(0.0),
            sfx_volume: Some(3.0),
            ..SettingsPatch::default()
        });

        assert_eq!(session.settings().master_volume, 0.0);
        assert_eq!(session.settings().sfx_volume, 1.0);
        assert_eq!(session.settings().music_volume, 0.5);
        assert!(!session.settings().sound_enabled());
    }

    #[test]
    fn test_reset_game() {
        let mut session = GameSession::default();
        session.set_player_count(PlayerCount::Four);
        session.set_player_names(ColorMap::new(|c| c.name().to_string()));
        session.start_game("city");
        let epoch = session.engine().epoch();

        session.reset_game();

        assert_eq!(session.status(), GameStatus::Menu);
        assert_eq!(session.player_count(), PlayerCount::Two);
        assert_eq!(session.player_name(Color::Red), "Player 2");
        assert!(session.engine().epoch() > epoch);
    }
}

//! Chomp - a small chase game: eat every dot before the ghost catches you.
//!
//! The game is a set of scenes driven by `scene2d`'s scene machine. Build the
//! first scene with [`scenes::SceneState::build`] and hand it to a
//! `SceneMachine`.

pub mod config;
pub mod level;
pub mod locations;
pub mod scenes;
pub mod sprites;

pub use config::GameConfig;
pub use scenes::{SceneServices, SceneState};

/// Session key the score is carried under between scenes.
pub const SCORE_KEY: &str = "score";

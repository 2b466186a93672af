//! Built-in placement tables, one per scene.

use std::collections::HashMap;

use scene2d::{location_table, LocationTable, Placement};

use crate::scenes::SceneState;

pub fn preloader() -> LocationTable {
    location_table([
        ("background", Placement::from_center(0.0, 0.0)),
        ("progressBar", Placement::from_center(0.0, 0.0)),
    ])
}

pub fn main_menu() -> LocationTable {
    location_table([
        ("background", Placement::from_center(0.0, 0.0)),
        ("logo", Placement::from_center(0.0, -100.0).with_scale(1.0)),
        ("playButton", Placement::from_center(0.0, 50.0).with_scale(0.8)),
        ("settingsButton", Placement::from_center(0.0, 150.0).with_scale(0.8)),
    ])
}

pub fn game() -> LocationTable {
    location_table([
        ("background", Placement::from_center(0.0, 0.0)),
        ("player", Placement::from_center(0.0, 0.0).with_scale(1.0)),
        ("enemy", Placement::from_center(200.0, 0.0)),
        ("scoreText", Placement::at(80.0, 24.0)),
        ("pauseText", Placement::from_center(0.0, 0.0)),
    ])
}

pub fn game_over() -> LocationTable {
    location_table([
        ("background", Placement::from_center(0.0, 0.0)),
        ("gameOverText", Placement::from_center(0.0, -100.0)),
        ("finalScore", Placement::from_center(0.0, 0.0)),
        ("restartButton", Placement::from_center(0.0, 100.0).with_scale(0.8)),
    ])
}

pub fn win() -> LocationTable {
    location_table([
        ("background", Placement::from_center(0.0, 0.0)),
        ("title", Placement::from_center(0.0, -50.0)),
        ("finalScore", Placement::from_center(0.0, 50.0)),
        ("playAgainButton", Placement::from_center(0.0, 150.0)),
    ])
}

/// Built-in table for `scene` with any configured overrides laid on top.
pub fn table_for(scene: SceneState, overrides: &HashMap<String, LocationTable>) -> LocationTable {
    let mut table = match scene {
        SceneState::Boot => LocationTable::new(),
        SceneState::Preloader => preloader(),
        SceneState::MainMenu => main_menu(),
        SceneState::Game => game(),
        SceneState::GameOver => game_over(),
        SceneState::Win => win(),
    };
    if let Some(extra) = overrides.get(scene.key()) {
        table.extend(extra.iter().map(|(k, p)| (k.clone(), *p)));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene2d::{resolve, Viewport};

    #[test]
    fn menu_button_sits_below_center() {
        let table = main_menu();
        let pos = resolve(&table["playButton"], Viewport::new(1024.0, 768.0));
        assert_eq!((pos.x, pos.y, pos.scale), (512.0, 434.0, Some(0.8)));
    }

    #[test]
    fn overrides_replace_single_keys() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "Game".to_string(),
            location_table([("enemy", Placement::at(900.0, 100.0))]),
        );
        let table = table_for(SceneState::Game, &overrides);
        assert_eq!(table["enemy"], Placement::at(900.0, 100.0));
        assert!(table["player"].is_from_center());

        let untouched = table_for(SceneState::Win, &overrides);
        assert_eq!(untouched, win());
    }
}

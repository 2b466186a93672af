//! The six scenes and what they share.

mod boot;
mod game;
mod game_over;
mod main_menu;
mod preloader;
mod win;

pub use boot::Boot;
pub use game::Game;
pub use game_over::GameOver;
pub use main_menu::MainMenu;
pub use preloader::Preloader;
pub use win::Win;

use std::rc::Rc;

use scene2d::{
    ActionId, EngineContext, InputMap, KeyCode, LocationRegistry, NodeId, Placement,
    ResolvedPosition, Scene, SharedLocations,
};

use crate::config::GameConfig;
use crate::locations;

/// Every scene of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneState {
    Boot,
    Preloader,
    MainMenu,
    Game,
    GameOver,
    Win,
}

impl SceneState {
    pub fn key(self) -> &'static str {
        match self {
            SceneState::Boot => "Boot",
            SceneState::Preloader => "Preloader",
            SceneState::MainMenu => "MainMenu",
            SceneState::Game => "Game",
            SceneState::GameOver => "GameOver",
            SceneState::Win => "Win",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        [
            SceneState::Boot,
            SceneState::Preloader,
            SceneState::MainMenu,
            SceneState::Game,
            SceneState::GameOver,
            SceneState::Win,
        ]
        .into_iter()
        .find(|s| s.key() == key)
    }

    /// Construct a fresh controller for this scene.
    pub fn build(self, services: &SceneServices) -> Box<dyn Scene> {
        let services = services.clone();
        match self {
            SceneState::Boot => Box::new(Boot::new(services)),
            SceneState::Preloader => Box::new(Preloader::new(services)),
            SceneState::MainMenu => Box::new(MainMenu::new(services)),
            SceneState::Game => Box::new(Game::new(services)),
            SceneState::GameOver => Box::new(GameOver::new(services)),
            SceneState::Win => Box::new(Win::new(services)),
        }
    }
}

/// What every scene controller is constructed with.
#[derive(Clone)]
pub struct SceneServices {
    pub locations: SharedLocations,
    pub config: Rc<GameConfig>,
}

impl SceneServices {
    pub fn new(config: GameConfig) -> Self {
        Self {
            locations: LocationRegistry::shared(),
            config: Rc::new(config),
        }
    }

    /// Register the placement table of `scene`.
    pub(crate) fn register(&self, scene: SceneState) {
        let table = locations::table_for(scene, &self.config.locations);
        self.locations.borrow_mut().register(scene.key(), table);
    }

    /// Resolve `key` of `scene` against the live viewport.
    pub(crate) fn place(
        &self,
        ctx: &EngineContext,
        scene: SceneState,
        key: &str,
        fallback: Placement,
    ) -> ResolvedPosition {
        self.locations
            .borrow()
            .resolve_or(scene.key(), key, ctx.viewport(), fallback)
    }
}

/// "Go on" input shared by the menu-like scenes: Enter, Space, or a click on
/// `button`.
pub(crate) struct Confirm {
    keys: InputMap,
    action: ActionId,
}

impl Confirm {
    pub(crate) fn new() -> Self {
        let action = ActionId::new("confirm");
        let mut keys = InputMap::new();
        keys.bind_key(action.clone(), KeyCode::Enter);
        keys.bind_key(action.clone(), KeyCode::Space);
        Self { keys, action }
    }

    pub(crate) fn triggered(&self, ctx: &EngineContext, button: Option<NodeId>) -> bool {
        let clicked = ctx
            .input()
            .left_click()
            .and_then(|p| ctx.display().hit_test(p));
        (clicked.is_some() && clicked == button)
            || self.keys.action_pressed(ctx.input(), &self.action)
    }
}

/// Remove every node in `nodes` from the display list.
pub(crate) fn remove_nodes(ctx: &mut EngineContext, nodes: &mut Vec<NodeId>) {
    for node in nodes.drain(..) {
        ctx.display_mut().remove(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene2d::{Engine, EngineEvent, SceneMachine};

    use crate::SCORE_KEY;

    const DT: f32 = 1.0 / 60.0;

    fn quick_config() -> GameConfig {
        GameConfig {
            assets: Vec::new(),
            ..GameConfig::default()
        }
    }

    fn press_enter(ctx: &mut EngineContext) {
        ctx.begin_frame();
        ctx.input_mut().release_key(KeyCode::Enter);
        ctx.input_mut().press_key(KeyCode::Enter);
    }

    #[test]
    fn keys_round_trip() {
        for state in [
            SceneState::Boot,
            SceneState::Preloader,
            SceneState::MainMenu,
            SceneState::Game,
            SceneState::GameOver,
            SceneState::Win,
        ] {
            assert_eq!(SceneState::from_key(state.key()), Some(state));
        }
        assert_eq!(SceneState::from_key("Settings"), None);
    }

    #[test]
    fn boot_to_game_and_back_to_menu() {
        let services = SceneServices::new(quick_config());
        let mut ctx = Engine::new().with_size(1024, 768).context();
        let ready = ctx.events_mut().subscribe();
        let mut machine = SceneMachine::new(SceneState::Boot.build(&services));

        machine.start(&mut ctx).unwrap();
        assert_eq!(machine.current_key(), Some("Boot"));
        ctx.begin_frame();
        machine.tick(&mut ctx, DT).unwrap();
        assert_eq!(machine.current_key(), Some("Preloader"));
        ctx.begin_frame();
        machine.tick(&mut ctx, DT).unwrap();
        assert_eq!(machine.current_key(), Some("MainMenu"));
        assert!(ctx.display().find("playButton").is_some());
        assert!(ctx.display().find("progressBar").is_none());

        press_enter(&mut ctx);
        machine.tick(&mut ctx, DT).unwrap();
        assert_eq!(machine.current_key(), Some("Game"));
        assert!(ctx.display().find("playButton").is_none());
        assert!(ctx.display().find("player").is_some());

        // Nobody touches the keys; the enemy walks into the player.
        ctx.input_mut().release_key(KeyCode::Enter);
        for _ in 0..600 {
            ctx.begin_frame();
            machine.tick(&mut ctx, DT).unwrap();
            if machine.current_key() != Some("Game") {
                break;
            }
        }
        assert_eq!(machine.current_key(), Some("GameOver"));
        assert_eq!(ctx.physics().body_count(), 0);
        assert!(ctx.contacts().is_empty());
        assert!(ctx.display().find("player").is_none());
        assert!(ctx.display().find_all("dot").next().is_none());
        assert_eq!(ctx.display().find_all("floatingDot").count(), 10);
        let (score, _) = ctx.display().find("finalScore").unwrap();
        assert_eq!(ctx.display().text(score), Some("FINAL SCORE: 0"));

        press_enter(&mut ctx);
        machine.tick(&mut ctx, DT).unwrap();
        assert_eq!(machine.current_key(), Some("MainMenu"));

        let order: Vec<_> = ready
            .try_iter()
            .map(|EngineEvent::SceneReady { scene }| scene)
            .collect();
        assert_eq!(
            order,
            vec!["Boot", "Preloader", "MainMenu", "Game", "GameOver", "MainMenu"]
        );
    }

    #[test]
    fn clicking_start_game_starts_the_game() {
        let services = SceneServices::new(quick_config());
        let mut ctx = Engine::new().context();
        let mut machine = SceneMachine::new(SceneState::MainMenu.build(&services));
        machine.start(&mut ctx).unwrap();

        ctx.begin_frame();
        ctx.input_mut().click(10.0, 10.0);
        machine.tick(&mut ctx, DT).unwrap();
        assert_eq!(machine.current_key(), Some("MainMenu"));

        let (_, button) = ctx.display().find("playButton").unwrap();
        let at = button.position;
        ctx.begin_frame();
        ctx.input_mut().click(at.x, at.y);
        machine.tick(&mut ctx, DT).unwrap();
        assert_eq!(machine.current_key(), Some("Game"));
    }

    #[test]
    fn play_again_starts_from_zero() {
        let services = SceneServices::new(quick_config());
        let mut ctx = Engine::new().context();
        ctx.session_mut().set(SCORE_KEY, &50u32).unwrap();
        let mut machine = SceneMachine::new(SceneState::Win.build(&services));
        machine.start(&mut ctx).unwrap();

        let (score, _) = ctx.display().find("finalScore").unwrap();
        assert_eq!(ctx.display().text(score), Some("Final Score: 50"));

        press_enter(&mut ctx);
        machine.tick(&mut ctx, DT).unwrap();
        assert_eq!(machine.current_key(), Some("Game"));
        let (text, _) = ctx.display().find("scoreText").unwrap();
        assert_eq!(ctx.display().text(text), Some("Score: 0"));
        assert!(ctx.display().find("playAgainButton").is_none());
    }

    #[test]
    fn missing_score_reads_as_zero() {
        let services = SceneServices::new(quick_config());
        let mut ctx = Engine::new().context();
        let mut machine = SceneMachine::new(SceneState::GameOver.build(&services));
        machine.start(&mut ctx).unwrap();
        let (score, _) = ctx.display().find("finalScore").unwrap();
        assert_eq!(ctx.display().text(score), Some("FINAL SCORE: 0"));
    }

    #[test]
    fn preloader_waits_for_every_asset() {
        let config = GameConfig {
            assets: vec![
                crate::config::AssetEntry::new("a", "missing/a.png"),
                crate::config::AssetEntry::new("b", "missing/b.png"),
            ],
            ..GameConfig::default()
        };
        let services = SceneServices::new(config);
        let mut ctx = Engine::new().context();
        let mut machine = SceneMachine::new(SceneState::Preloader.build(&services));
        machine.start(&mut ctx).unwrap();

        let (fill, _) = ctx.display().find("progressFill").unwrap();
        let width = |ctx: &EngineContext| match &ctx.display().get(fill).unwrap().visual {
            scene2d::Visual::Rect { size, .. } => size.x,
            _ => unreachable!(),
        };
        assert_eq!(width(&ctx), 4.0);

        machine.tick(&mut ctx, DT).unwrap();
        assert_eq!(machine.current_key(), Some("Preloader"));
        assert_eq!(width(&ctx), 234.0);

        machine.tick(&mut ctx, DT).unwrap();
        assert_eq!(machine.current_key(), Some("MainMenu"));
    }

    #[test]
    fn registry_is_shared_and_filled_at_construction() {
        let services = SceneServices::new(quick_config());
        assert!(!services.locations.borrow().is_registered("Win"));
        let _win = SceneState::Win.build(&services);
        let registry = services.locations.borrow();
        assert!(registry.is_registered("Win"));
        assert!(registry.lookup("Win", "playAgainButton").is_some());
        assert!(registry.lookup("Win", "nope").is_none());
    }

    #[test]
    fn placements_follow_a_resized_viewport() {
        let services = SceneServices::new(quick_config());
        services.register(SceneState::Game);
        let mut ctx = Engine::new().with_size(1024, 768).context();
        let fallback = Placement::at(0.0, 0.0);

        let before = services.place(&ctx, SceneState::Game, "player", fallback);
        assert_eq!(before.point(), scene2d::Vec2::new(512.0, 384.0));

        ctx.resize(800.0, 600.0);
        let after = services.place(&ctx, SceneState::Game, "player", fallback);
        assert_eq!(after.point(), scene2d::Vec2::new(400.0, 300.0));
    }
}

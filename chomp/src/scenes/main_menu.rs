use anyhow::Result;
use scene2d::{centered, EngineContext, NodeId, Scene, SceneTransitions, Visual};

use super::{remove_nodes, Confirm, SceneServices, SceneState};

/// Title screen. Starts a game on Enter or a click on "Start Game".
pub struct MainMenu {
    services: SceneServices,
    confirm: Confirm,
    nodes: Vec<NodeId>,
    start_button: Option<NodeId>,
}

impl MainMenu {
    pub fn new(services: SceneServices) -> Self {
        services.register(SceneState::MainMenu);
        Self {
            services,
            confirm: Confirm::new(),
            nodes: Vec::new(),
            start_button: None,
        }
    }
}

impl Scene for MainMenu {
    fn key(&self) -> &'static str {
        SceneState::MainMenu.key()
    }

    fn on_enter(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let scene = SceneState::MainMenu;
        let bg = self.services.place(ctx, scene, "background", centered(0.0, 0.0));
        let logo = self.services.place(ctx, scene, "logo", centered(0.0, 0.0));
        let play = self.services.place(ctx, scene, "playButton", centered(0.0, 0.0));

        let display = ctx.display_mut();
        let bg = display.place("background", Visual::image("background"), bg);
        let title = display.place("logo", Visual::text("Chomp", 38.0), logo);
        display.set_depth(title, 100);
        let start = display.place("playButton", Visual::text("Start Game", 24.0), play);
        display.set_interactive(start, true);

        self.nodes.extend([bg, title, start]);
        self.start_button = Some(start);
        Ok(())
    }

    fn on_tick(
        &mut self,
        ctx: &mut EngineContext,
        _dt: f32,
        scenes: &mut dyn SceneTransitions,
    ) -> Result<()> {
        if self.confirm.triggered(ctx, self.start_button) {
            scenes.start(SceneState::Game.build(&self.services));
        }
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.start_button = None;
        remove_nodes(ctx, &mut self.nodes);
        Ok(())
    }
}

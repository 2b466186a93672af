use anyhow::Result;
use scene2d::{centered, EngineContext, NodeId, Scene, SceneTransitions, Visual};

use super::{remove_nodes, Confirm, SceneServices, SceneState};
use crate::SCORE_KEY;

/// Shown once every dot is eaten. "Play Again" starts a fresh game.
pub struct Win {
    services: SceneServices,
    confirm: Confirm,
    nodes: Vec<NodeId>,
    again_button: Option<NodeId>,
}

impl Win {
    pub fn new(services: SceneServices) -> Self {
        services.register(SceneState::Win);
        Self {
            services,
            confirm: Confirm::new(),
            nodes: Vec::new(),
            again_button: None,
        }
    }
}

impl Scene for Win {
    fn key(&self) -> &'static str {
        SceneState::Win.key()
    }

    fn on_enter(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let scene = SceneState::Win;
        let score: u32 = ctx.session().get_or_default(SCORE_KEY);

        let bg = self.services.place(ctx, scene, "background", centered(0.0, 0.0));
        let title = self.services.place(ctx, scene, "title", centered(0.0, -50.0));
        let final_score = self.services.place(ctx, scene, "finalScore", centered(0.0, 50.0));
        let again = self
            .services
            .place(ctx, scene, "playAgainButton", centered(0.0, 150.0));

        let display = ctx.display_mut();
        let bg = display.place("background", Visual::image("background"), bg);
        let title = display.place("title", Visual::text("Congratulations!", 48.0), title);
        let score_node = display.place(
            "finalScore",
            Visual::text(format!("Final Score: {score}"), 32.0),
            final_score,
        );
        let again = display.place("playAgainButton", Visual::text("Play Again", 32.0), again);
        display.set_interactive(again, true);

        self.nodes.extend([bg, title, score_node, again]);
        self.again_button = Some(again);
        log::info!("level cleared, final score {}", score);
        Ok(())
    }

    fn on_tick(
        &mut self,
        ctx: &mut EngineContext,
        _dt: f32,
        scenes: &mut dyn SceneTransitions,
    ) -> Result<()> {
        if self.confirm.triggered(ctx, self.again_button) {
            scenes.start(SceneState::Game.build(&self.services));
        }
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.again_button = None;
        remove_nodes(ctx, &mut self.nodes);
        Ok(())
    }
}

use anyhow::Result;
use scene2d::{
    align_to, centered, random_position, EngineContext, NodeId, Scene, SceneTransitions, Vec2,
    Visual,
};

use super::{remove_nodes, Confirm, SceneServices, SceneState};
use crate::SCORE_KEY;

const FLOATING_DOTS: usize = 10;
const FLOATING_PADDING: f32 = 50.0;

/// Shown when the enemy catches the player.
pub struct GameOver {
    services: SceneServices,
    confirm: Confirm,
    nodes: Vec<NodeId>,
    menu_button: Option<NodeId>,
}

impl GameOver {
    pub fn new(services: SceneServices) -> Self {
        services.register(SceneState::GameOver);
        Self {
            services,
            confirm: Confirm::new(),
            nodes: Vec::new(),
            menu_button: None,
        }
    }
}

impl Scene for GameOver {
    fn key(&self) -> &'static str {
        SceneState::GameOver.key()
    }

    fn on_enter(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let scene = SceneState::GameOver;
        let score: u32 = ctx.session().get_or_default(SCORE_KEY);

        let bg = self.services.place(ctx, scene, "background", centered(0.0, 0.0));
        let title = self.services.place(ctx, scene, "gameOverText", centered(0.0, 0.0));
        let button = self
            .services
            .place(ctx, scene, "restartButton", centered(0.0, 160.0));

        let viewport = ctx.viewport();
        let dots: Vec<Vec2> = (0..FLOATING_DOTS)
            .map(|_| random_position(viewport, FLOATING_PADDING, ctx.rng()))
            .collect();

        let display = ctx.display_mut();
        let bg = display.place("background", Visual::image("background"), bg);
        self.nodes.push(bg);
        for at in dots {
            let dot = display.add_named(
                "floatingDot",
                Visual::Circle {
                    radius: 3.0,
                    color: [1.0, 0.4, 0.4, 0.6],
                },
                at,
            );
            self.nodes.push(dot);
        }
        let title_node = display.place("gameOverText", Visual::text("GAME OVER", 56.0), title);
        display.set_depth(title_node, 100);
        // The score hangs below the title rather than using its own slot.
        let score_node = display.add_named(
            "finalScore",
            Visual::text(format!("FINAL SCORE: {score}"), 32.0),
            align_to(title.point(), 0.0, 80.0),
        );
        let menu = display.place("restartButton", Visual::text("BACK TO MENU", 28.0), button);
        display.set_interactive(menu, true);

        self.nodes.extend([title_node, score_node, menu]);
        self.menu_button = Some(menu);
        log::info!("game over, final score {}", score);
        Ok(())
    }

    fn on_tick(
        &mut self,
        ctx: &mut EngineContext,
        _dt: f32,
        scenes: &mut dyn SceneTransitions,
    ) -> Result<()> {
        if self.confirm.triggered(ctx, self.menu_button) {
            scenes.start(SceneState::MainMenu.build(&self.services));
        }
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.menu_button = None;
        remove_nodes(ctx, &mut self.nodes);
        Ok(())
    }
}

use anyhow::Result;
use scene2d::{EngineContext, Scene, SceneTransitions};

use super::{SceneServices, SceneState};

/// First scene. Hands over to the preloader on its first tick.
pub struct Boot {
    services: SceneServices,
}

impl Boot {
    pub fn new(services: SceneServices) -> Self {
        services.register(SceneState::Boot);
        Self { services }
    }
}

impl Scene for Boot {
    fn key(&self) -> &'static str {
        SceneState::Boot.key()
    }

    fn on_enter(&mut self, ctx: &mut EngineContext) -> Result<()> {
        log::debug!(
            "boot: viewport {}x{}",
            ctx.viewport().width,
            ctx.viewport().height
        );
        Ok(())
    }

    fn on_tick(
        &mut self,
        _ctx: &mut EngineContext,
        _dt: f32,
        scenes: &mut dyn SceneTransitions,
    ) -> Result<()> {
        scenes.start(SceneState::Preloader.build(&self.services));
        Ok(())
    }
}

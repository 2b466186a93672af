use anyhow::Result;
use scene2d::{centered, EngineContext, NodeId, Scene, SceneTransitions, Vec2, Visual};

use super::{remove_nodes, SceneServices, SceneState};

const BAR_WIDTH: f32 = 468.0;
const BAR_HEIGHT: f32 = 32.0;
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Width of the progress fill for `progress` in `0.0..=1.0`.
pub fn fill_width(progress: f32) -> f32 {
    4.0 + (BAR_WIDTH - 8.0) * progress.clamp(0.0, 1.0)
}

/// Loads the asset manifest one file per tick behind a progress bar.
pub struct Preloader {
    services: SceneServices,
    nodes: Vec<NodeId>,
    fill: Option<NodeId>,
    bar_left: f32,
}

impl Preloader {
    pub fn new(services: SceneServices) -> Self {
        services.register(SceneState::Preloader);
        Self {
            services,
            nodes: Vec::new(),
            fill: None,
            bar_left: 0.0,
        }
    }

    fn show_progress(&self, ctx: &mut EngineContext) {
        let Some(fill) = self.fill else {
            return;
        };
        let width = fill_width(ctx.assets().progress());
        let left = self.bar_left;
        if let Some(node) = ctx.display_mut().get_mut(fill) {
            if let Visual::Rect { size, .. } = &mut node.visual {
                size.x = width;
            }
            node.position.x = left + 2.0 + width / 2.0;
        }
    }
}

impl Scene for Preloader {
    fn key(&self) -> &'static str {
        SceneState::Preloader.key()
    }

    fn on_enter(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let scene = SceneState::Preloader;
        let bg = self.services.place(ctx, scene, "background", centered(0.0, 0.0));
        let bar = self.services.place(ctx, scene, "progressBar", centered(0.0, 0.0));
        self.bar_left = bar.x - BAR_WIDTH / 2.0;

        let display = ctx.display_mut();
        let bg = display.place("background", Visual::image("background"), bg);
        let outline = display.place(
            "progressBar",
            Visual::Rect {
                size: Vec2::new(BAR_WIDTH, BAR_HEIGHT),
                fill: None,
                stroke: Some(WHITE),
            },
            bar,
        );
        let fill = display.add_named(
            "progressFill",
            Visual::filled_rect(Vec2::new(fill_width(0.0), BAR_HEIGHT - 4.0), WHITE),
            bar.point(),
        );
        self.nodes.extend([bg, outline, fill]);
        self.fill = Some(fill);

        for asset in &self.services.config.assets {
            ctx.assets_mut().queue(asset.key.as_str(), asset.path.as_str());
        }
        self.show_progress(ctx);
        Ok(())
    }

    fn on_tick(
        &mut self,
        ctx: &mut EngineContext,
        _dt: f32,
        scenes: &mut dyn SceneTransitions,
    ) -> Result<()> {
        ctx.assets_mut().load_next();
        self.show_progress(ctx);

        if ctx.assets().is_complete() {
            log::info!(
                "assets loaded ({} unavailable)",
                ctx.assets().failed().len()
            );
            scenes.start(SceneState::MainMenu.build(&self.services));
        }
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.fill = None;
        remove_nodes(ctx, &mut self.nodes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_spans_padding_to_full() {
        assert_eq!(fill_width(0.0), 4.0);
        assert_eq!(fill_width(0.5), 234.0);
        assert_eq!(fill_width(1.0), 464.0);
    }
}

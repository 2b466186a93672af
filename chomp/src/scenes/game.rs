use std::collections::BTreeMap;

use anyhow::Result;
use scene2d::{
    centered, ActionId, ContactKind, EngineContext, EntityId, InputMap, KeyCode, ListenerId,
    NodeId, PhysicsEvent, Placement, Scene, SceneTransitions, Vec2, Visual,
};

use super::{remove_nodes, SceneServices, SceneState};
use crate::level;
use crate::sprites::{Dot, Enemy, Player, Wall};
use crate::SCORE_KEY;

/// The playable level.
///
/// Owns the score, the entities, and the two contact listeners: player
/// against enemy ends the game, player against a dot eats it.
pub struct Game {
    services: SceneServices,
    controls: InputMap,
    pause: ActionId,

    player: Option<Player>,
    enemy: Option<Enemy>,
    walls: Vec<Wall>,
    dots: BTreeMap<EntityId, Dot>,

    caught: Option<ListenerId>,
    eaten: Option<ListenerId>,

    nodes: Vec<NodeId>,
    score_text: Option<NodeId>,
    pause_overlay: Vec<NodeId>,

    score: u32,
    paused: bool,
    finished: bool,
}

impl Game {
    pub fn new(services: SceneServices) -> Self {
        services.register(SceneState::Game);
        let pause = ActionId::new("pause");
        let mut controls = InputMap::new();
        controls.bind_key(pause.clone(), KeyCode::KeyP);
        Self {
            services,
            controls,
            pause,
            player: None,
            enemy: None,
            walls: Vec::new(),
            dots: BTreeMap::new(),
            caught: None,
            eaten: None,
            nodes: Vec::new(),
            score_text: None,
            pause_overlay: Vec::new(),
            score: 0,
            paused: false,
            finished: false,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn dots_left(&self) -> usize {
        self.dots.len()
    }

    /// Entities of the dots still on the board, in placement order.
    pub fn dot_entities(&self) -> Vec<EntityId> {
        self.dots.keys().copied().collect()
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    fn spawn_level(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let config = self.services.config.clone();
        let scene = SceneState::Game;

        let player_at = self.services.place(ctx, scene, "player", centered(0.0, 0.0));
        let player = Player::spawn(
            ctx,
            player_at.point(),
            config.entity_size,
            config.player_speed,
        )?;

        let bg = self.services.place(ctx, scene, "background", centered(0.0, 0.0));
        let bg = ctx.display_mut().place(
            "background",
            Visual::Image {
                texture: "background".into(),
                alpha: 0.5,
            },
            bg,
        );
        ctx.display_mut().set_depth(bg, -10);
        self.nodes.push(bg);

        let enemy_at = self.services.place(ctx, scene, "enemy", centered(200.0, 0.0));
        let enemy = Enemy::spawn(
            ctx,
            enemy_at.point(),
            config.entity_size,
            config.enemy_speed,
        )?;

        for spec in &config.walls {
            self.walls.push(Wall::spawn(ctx, *spec, true)?);
        }
        for spec in level::boundary_walls(ctx.viewport(), config.boundary_thickness) {
            self.walls.push(Wall::spawn(ctx, spec, false)?);
        }

        let positions = level::dot_positions(
            ctx.viewport(),
            config.dot_spacing,
            config.dot_radius,
            &config.walls,
        );
        for at in positions {
            let dot = Dot::spawn(ctx, at, config.dot_radius)?;
            self.dots.insert(dot.handle().entity, dot);
        }

        let player_id = player.handle().entity;
        let enemy_id = enemy.handle().entity;
        let contacts = ctx.contacts_mut();
        let caught = contacts.register(ContactKind::Collide, [player_id], [enemy_id]);
        self.caught = Some(caught);
        self.eaten = Some(contacts.register(
            ContactKind::Overlap,
            [player_id],
            self.dots.keys().copied(),
        ));

        let score_at = self
            .services
            .place(ctx, scene, "scoreText", Placement::at(80.0, 24.0));
        let score_text = ctx
            .display_mut()
            .place("scoreText", Visual::text(score_label(0), 24.0), score_at);
        ctx.display_mut().set_depth(score_text, 50);
        self.nodes.push(score_text);
        self.score_text = Some(score_text);

        log::debug!(
            "level ready: {} walls, {} dots",
            self.walls.len(),
            self.dots.len()
        );
        self.player = Some(player);
        self.enemy = Some(enemy);
        Ok(())
    }

    fn toggle_pause(&mut self, ctx: &mut EngineContext) {
        self.paused = !self.paused;
        if self.paused {
            let at = self
                .services
                .place(ctx, SceneState::Game, "pauseText", centered(0.0, 0.0));
            let viewport = ctx.viewport();
            let display = ctx.display_mut();
            let dim = display.add_named(
                "pauseOverlay",
                Visual::filled_rect(
                    Vec2::new(viewport.width, viewport.height),
                    [0.0, 0.0, 0.0, 0.5],
                ),
                viewport.center(),
            );
            display.set_depth(dim, 200);
            let text = display.place("pauseText", Visual::text("PAUSED", 48.0), at);
            display.set_depth(text, 201);
            self.pause_overlay.extend([dim, text]);
        } else {
            remove_nodes(ctx, &mut self.pause_overlay);
        }
        log::debug!("paused: {}", self.paused);
    }

    fn advance(&self, ctx: &mut EngineContext, dt: f32) -> Result<()> {
        let (Some(player), Some(enemy)) = (&self.player, &self.enemy) else {
            return Ok(());
        };
        player.update(ctx)?;
        if let Some(target) = player.handle().position(ctx) {
            enemy.update(ctx, target);
        }
        ctx.physics_mut().step(dt);
        player.handle().sync(ctx);
        enemy.handle().sync(ctx);
        Ok(())
    }

    /// React to the physics events of this tick.
    pub fn apply_events(
        &mut self,
        ctx: &mut EngineContext,
        events: &[PhysicsEvent],
        scenes: &mut dyn SceneTransitions,
    ) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        let contacts = ctx.contacts().dispatch(events);
        for contact in contacts {
            if Some(contact.listener) == self.caught {
                log::info!("caught with score {}", self.score);
                return self.finish(ctx, scenes, SceneState::GameOver);
            }
            if Some(contact.listener) == self.eaten {
                self.eat(ctx, contact.second);
            }
        }
        if self.dots.is_empty() {
            return self.finish(ctx, scenes, SceneState::Win);
        }
        Ok(())
    }

    fn eat(&mut self, ctx: &mut EngineContext, dot: EntityId) {
        let Some(dot) = self.dots.remove(&dot) else {
            return;
        };
        dot.collect(ctx);
        self.score += self.services.config.dot_points;
        if let Some(text) = self.score_text {
            ctx.display_mut().set_text(text, score_label(self.score));
        }
        log::trace!("dot eaten, score {}, {} left", self.score, self.dots.len());
    }

    /// Store the score, then leave for `next`. Runs at most once.
    fn finish(
        &mut self,
        ctx: &mut EngineContext,
        scenes: &mut dyn SceneTransitions,
        next: SceneState,
    ) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        ctx.session_mut().set(SCORE_KEY, &self.score)?;
        scenes.start(next.build(&self.services));
        Ok(())
    }
}

fn score_label(score: u32) -> String {
    format!("Score: {score}")
}

impl Scene for Game {
    fn key(&self) -> &'static str {
        SceneState::Game.key()
    }

    fn on_enter(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.spawn_level(ctx)
    }

    fn on_tick(
        &mut self,
        ctx: &mut EngineContext,
        dt: f32,
        scenes: &mut dyn SceneTransitions,
    ) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        if self.controls.action_pressed(ctx.input(), &self.pause) {
            self.toggle_pause(ctx);
        }
        if !self.paused {
            self.advance(ctx, dt)?;
        }
        let events = ctx.physics_mut().drain_events();
        self.apply_events(ctx, &events, scenes)
    }

    fn on_exit(&mut self, ctx: &mut EngineContext) -> Result<()> {
        for id in [self.caught.take(), self.eaten.take()].into_iter().flatten() {
            ctx.contacts_mut().unregister(id);
        }
        if let Some(player) = self.player.take() {
            player.handle().despawn(ctx);
        }
        if let Some(enemy) = self.enemy.take() {
            enemy.handle().despawn(ctx);
        }
        for wall in self.walls.drain(..) {
            wall.handle().despawn(ctx);
        }
        for (_, dot) in std::mem::take(&mut self.dots) {
            dot.collect(ctx);
        }
        self.score_text = None;
        remove_nodes(ctx, &mut self.pause_overlay);
        remove_nodes(ctx, &mut self.nodes);
        Ok(())
    }
}

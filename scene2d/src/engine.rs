use anyhow::Result;

use crate::{
    assets::AssetLoader,
    contacts::ContactListeners,
    display::DisplayList,
    events::{EngineEvent, EventBus},
    input::InputState,
    math::Viewport,
    physics::PhysicsWorld,
    registry::SessionRegistry,
    state::SceneMachine,
    world::Entities,
};

/// Configuration values for the viewport and runtime behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Whether the host provides a keyboard.
    pub keyboard: bool,
    /// Seconds advanced per frame.
    pub fixed_dt: f32,
    /// Seed for the context's random generator.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Scene2D Game".into(),
            width: 1024,
            height: 768,
            keyboard: true,
            fixed_dt: 1.0 / 60.0,
            seed: 0x5eed,
        }
    }
}

/// Main entrypoint for running a game without a window.
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create a new engine instance with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Override the title reported in logs.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Override the viewport size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    #[must_use]
    pub fn with_keyboard(mut self, keyboard: bool) -> Self {
        self.config.keyboard = keyboard;
        self
    }

    #[must_use]
    pub fn with_fixed_dt(mut self, dt: f32) -> Self {
        self.config.fixed_dt = dt;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a fresh context from the configuration.
    pub fn context(&self) -> EngineContext {
        EngineContext::new(&self.config)
    }

    /// Run `game` frame by frame until `driver` returns false.
    ///
    /// Each frame the engine clears per-frame input, hands the context to
    /// `driver` (which feeds input and inspects state), then updates the game.
    /// The context is returned so callers can inspect the final state.
    pub fn run_headless<G, F>(self, game: G, driver: F) -> Result<EngineContext>
    where
        G: Game,
        F: FnMut(&mut EngineContext) -> bool,
    {
        let ctx = self.context();
        self.run_with(ctx, game, driver)
    }

    /// Like [`Engine::run_headless`], on a context the caller prepared
    /// (for example with event subscriptions already in place).
    pub fn run_with<G, F>(
        self,
        mut ctx: EngineContext,
        mut game: G,
        mut driver: F,
    ) -> Result<EngineContext>
    where
        G: Game,
        F: FnMut(&mut EngineContext) -> bool,
    {
        log::info!(
            "starting {} ({}x{})",
            self.config.title,
            self.config.width,
            self.config.height
        );
        game.init(&mut ctx)?;

        loop {
            ctx.begin_frame();
            if !driver(&mut ctx) {
                break;
            }
            game.update(&mut ctx)?;
        }

        log::info!("stopped after {} frames", ctx.frame());
        Ok(ctx)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a scene can touch while it runs.
pub struct EngineContext {
    viewport: Viewport,
    delta: f32,
    elapsed: f32,
    frame: u64,

    input: InputState,
    physics: PhysicsWorld,
    display: DisplayList,
    contacts: ContactListeners,
    events: EventBus,
    session: SessionRegistry,
    assets: AssetLoader,
    entities: Entities,
    rng: fastrand::Rng,
}

impl EngineContext {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            viewport: Viewport::new(config.width as f32, config.height as f32),
            delta: config.fixed_dt,
            elapsed: 0.0,
            frame: 0,
            input: InputState::new(config.keyboard),
            physics: PhysicsWorld::new(),
            display: DisplayList::new(),
            contacts: ContactListeners::new(),
            events: EventBus::new(),
            session: SessionRegistry::new(),
            assets: AssetLoader::new(),
            entities: Entities::new(),
            rng: fastrand::Rng::with_seed(config.seed),
        }
    }

    /// Start a new frame: clear input edges and advance the clock.
    pub fn begin_frame(&mut self) {
        self.input.begin_frame();
        self.frame += 1;
        self.elapsed += self.delta;
    }

    /// Seconds per frame.
    pub fn delta_time(&self) -> f32 {
        self.delta
    }

    /// Seconds since the context was created.
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The host canvas changed size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayList {
        &mut self.display
    }

    pub fn contacts(&self) -> &ContactListeners {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut ContactListeners {
        &mut self.contacts
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn session(&self) -> &SessionRegistry {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionRegistry {
        &mut self.session
    }

    pub fn assets(&self) -> &AssetLoader {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetLoader {
        &mut self.assets
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut Entities {
        &mut self.entities
    }

    pub fn rng(&mut self) -> &mut fastrand::Rng {
        &mut self.rng
    }

    /// Tell subscribers that `scene` is active.
    pub fn announce_ready(&mut self, scene: &'static str) {
        let delivered = self.events.emit(EngineEvent::SceneReady { scene });
        log::debug!("{} ready ({} subscribers)", scene, delivered);
    }

    /// Drop whatever a scene left behind after its `on_exit`.
    pub fn release_scene_resources(&mut self, scene: &str) {
        let leftovers = (
            self.display.len(),
            self.contacts.len(),
            self.physics.body_count(),
        );
        if leftovers != (0, 0, 0) {
            log::warn!(
                "scene {} left {} nodes, {} listeners, {} bodies behind",
                scene,
                leftovers.0,
                leftovers.1,
                leftovers.2
            );
        }
        self.display.clear();
        self.contacts.clear();
        self.physics.clear();
        self.entities.clear();
    }
}

/// Trait implemented by user code to hook into the engine lifecycle.
pub trait Game {
    /// Called once before the first frame.
    fn init(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    /// Update game state. Called once per frame.
    fn update(&mut self, ctx: &mut EngineContext) -> Result<()>;
}

/// Adapter to use SceneMachine as a Game.
impl Game for SceneMachine {
    fn init(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.start(ctx)
    }

    fn update(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let dt = ctx.delta_time();
        self.tick(ctx, dt)
    }
}

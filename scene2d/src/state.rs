use anyhow::Result;

use crate::engine::EngineContext;
use crate::error::EngineError;

/// Lets a scene request the next scene without holding the machine.
pub trait SceneTransitions {
    /// Replace the active scene once the current tick returns.
    fn start(&mut self, scene: Box<dyn Scene>);
}

/// A screen of the game: menu, level, results and so on.
///
/// Exactly one scene is active at a time. A scene sets itself up in
/// `on_enter`, reacts to input in `on_tick`, and gives back what it created
/// in `on_exit`.
pub trait Scene {
    /// Stable identifier, also used as the location table key.
    fn key(&self) -> &'static str;

    fn on_enter(&mut self, ctx: &mut EngineContext) -> Result<()>;

    /// Called once per frame while the scene is active.
    fn on_tick(
        &mut self,
        ctx: &mut EngineContext,
        dt: f32,
        scenes: &mut dyn SceneTransitions,
    ) -> Result<()>;

    fn on_exit(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }
}

/// Internal helper to allow scenes to queue transitions without borrow conflicts.
struct PendingStart<'a> {
    pending: &'a mut Option<Box<dyn Scene>>,
}

impl SceneTransitions for PendingStart<'_> {
    fn start(&mut self, scene: Box<dyn Scene>) {
        *self.pending = Some(scene);
    }
}

/// Runs one scene at a time and swaps scenes on request.
///
/// Transitions are deferred: a scene that calls `start` keeps running until
/// its tick returns, then it is exited, its leftovers are swept from the
/// context, and the new scene is entered.
pub struct SceneMachine {
    current: Option<Box<dyn Scene>>,
    pending: Option<Box<dyn Scene>>,
}

impl SceneMachine {
    /// Create a machine that will enter `initial` on [`SceneMachine::start`].
    pub fn new(initial: Box<dyn Scene>) -> Self {
        Self {
            current: None,
            pending: Some(initial),
        }
    }

    /// Key of the active scene.
    pub fn current_key(&self) -> Option<&'static str> {
        self.current.as_ref().map(|s| s.key())
    }

    /// Enter the initial scene.
    pub fn start(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.apply_transitions(ctx)
    }

    /// Tick the active scene, then apply whatever it requested.
    pub fn tick(&mut self, ctx: &mut EngineContext, dt: f32) -> Result<()> {
        self.apply_transitions(ctx)?;

        let scene = self.current.as_mut().ok_or(EngineError::NoActiveScene)?;
        let mut helper = PendingStart {
            pending: &mut self.pending,
        };
        scene.on_tick(ctx, dt, &mut helper)?;

        self.apply_transitions(ctx)
    }

    /// Apply a pending transition, if any.
    pub fn apply_transitions(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let Some(mut next) = self.pending.take() else {
            return Ok(());
        };

        if let Some(mut old) = self.current.take() {
            log::info!("scene {} -> {}", old.key(), next.key());
            old.on_exit(ctx)?;
            ctx.release_scene_resources(old.key());
        } else {
            log::info!("entering scene {}", next.key());
        }

        next.on_enter(ctx)?;
        ctx.announce_ready(next.key());
        self.current = Some(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Visual;
    use crate::engine::Engine;
    use crate::events::EngineEvent;
    use crate::math::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Places one node, counts ticks, and moves on after `ticks_before_next`.
    struct Step {
        key: &'static str,
        log: Log,
        ticks_before_next: Option<u32>,
        next: Option<&'static str>,
        ticks: u32,
        clean_exit: bool,
    }

    impl Step {
        fn boxed(
            key: &'static str,
            log: &Log,
            after: Option<u32>,
            next: Option<&'static str>,
        ) -> Box<dyn Scene> {
            Box::new(Step {
                key,
                log: log.clone(),
                ticks_before_next: after,
                next,
                ticks: 0,
                clean_exit: true,
            })
        }
    }

    impl Scene for Step {
        fn key(&self) -> &'static str {
            self.key
        }

        fn on_enter(&mut self, ctx: &mut EngineContext) -> Result<()> {
            self.log.borrow_mut().push(format!("enter {}", self.key));
            ctx.display_mut()
                .add_named(self.key, Visual::text(self.key, 16.0), Vec2::ZERO);
            Ok(())
        }

        fn on_tick(
            &mut self,
            _ctx: &mut EngineContext,
            _dt: f32,
            scenes: &mut dyn SceneTransitions,
        ) -> Result<()> {
            self.ticks += 1;
            self.log.borrow_mut().push(format!("tick {}", self.key));
            if let (Some(after), Some(next)) = (self.ticks_before_next, self.next) {
                if self.ticks >= after {
                    scenes.start(Step::boxed(next, &self.log, None, None));
                }
            }
            Ok(())
        }

        fn on_exit(&mut self, ctx: &mut EngineContext) -> Result<()> {
            self.log.borrow_mut().push(format!("exit {}", self.key));
            if self.clean_exit {
                ctx.display_mut().clear();
            }
            Ok(())
        }
    }

    #[test]
    fn transitions_are_deferred_until_the_tick_returns() {
        let log: Log = Rc::default();
        let mut ctx = Engine::new().context();
        let mut machine = SceneMachine::new(Step::boxed("A", &log, Some(2), Some("B")));

        machine.start(&mut ctx).unwrap();
        machine.tick(&mut ctx, 0.016).unwrap();
        assert_eq!(machine.current_key(), Some("A"));
        machine.tick(&mut ctx, 0.016).unwrap();
        assert_eq!(machine.current_key(), Some("B"));

        assert_eq!(
            *log.borrow(),
            vec!["enter A", "tick A", "tick A", "exit A", "enter B"]
        );
    }

    #[test]
    fn ready_is_announced_per_entered_scene() {
        let log: Log = Rc::default();
        let mut ctx = Engine::new().context();
        let ready = ctx.events_mut().subscribe();
        let mut machine = SceneMachine::new(Step::boxed("A", &log, Some(1), Some("B")));

        machine.start(&mut ctx).unwrap();
        machine.tick(&mut ctx, 0.016).unwrap();
        machine.tick(&mut ctx, 0.016).unwrap();

        let seen: Vec<_> = ready.try_iter().collect();
        assert_eq!(
            seen,
            vec![
                EngineEvent::SceneReady { scene: "A" },
                EngineEvent::SceneReady { scene: "B" },
            ]
        );
    }

    #[test]
    fn leftovers_are_swept_on_exit() {
        let log: Log = Rc::default();
        let mut ctx = Engine::new().context();
        let mut machine = SceneMachine::new(Box::new(Step {
            key: "A",
            log: log.clone(),
            ticks_before_next: Some(1),
            next: Some("B"),
            ticks: 0,
            clean_exit: false,
        }));

        machine.start(&mut ctx).unwrap();
        machine.tick(&mut ctx, 0.016).unwrap();

        assert_eq!(ctx.display().len(), 1);
        assert!(ctx.display().find("B").is_some());
        assert!(ctx.display().find("A").is_none());
    }

    #[test]
    fn ticking_before_start_enters_the_initial_scene() {
        let log: Log = Rc::default();
        let mut ctx = Engine::new().context();
        let mut machine = SceneMachine::new(Step::boxed("A", &log, None, None));
        machine.tick(&mut ctx, 0.016).unwrap();
        assert_eq!(*log.borrow(), vec!["enter A", "tick A"]);
    }
}

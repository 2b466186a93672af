use anyhow::Result;
use scene2d::{ColliderShape, EngineContext, RigidBodyType, Vec2, Visual};

use super::Handle;

const DOT_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

/// A collectible pellet.
pub struct Dot {
    handle: Handle,
}

impl Dot {
    pub fn spawn(ctx: &mut EngineContext, at: Vec2, radius: f32) -> Result<Self> {
        let entity = ctx.entities_mut().spawn();
        let physics = ctx.physics_mut();
        physics.create_body(entity, RigidBodyType::Fixed, at);
        physics.add_sensor(entity, ColliderShape::Circle { radius })?;
        let node = ctx.display_mut().add_named(
            "dot",
            Visual::Circle {
                radius,
                color: DOT_COLOR,
            },
            at,
        );
        Ok(Self {
            handle: Handle {
                entity,
                node: Some(node),
            },
        })
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Take the dot off the board.
    pub fn collect(self, ctx: &mut EngineContext) {
        self.handle.despawn(ctx);
    }
}

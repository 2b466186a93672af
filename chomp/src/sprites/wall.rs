use anyhow::Result;
use scene2d::{ColliderShape, EngineContext, Material, RigidBodyType, Visual};

use super::Handle;
use crate::level::WallSpec;

const WALL_COLOR: [f32; 4] = [0.2, 0.2, 0.8, 1.0];

/// Immovable obstacle. Invisible walls have no node.
pub struct Wall {
    handle: Handle,
}

impl Wall {
    pub fn spawn(ctx: &mut EngineContext, spec: WallSpec, visible: bool) -> Result<Self> {
        let entity = ctx.entities_mut().spawn();
        let physics = ctx.physics_mut();
        physics.create_body(entity, RigidBodyType::Fixed, spec.center());
        physics.add_collider(
            entity,
            ColliderShape::Box {
                hx: spec.width / 2.0,
                hy: spec.height / 2.0,
            },
            Material::default(),
        )?;
        let node = visible.then(|| {
            ctx.display_mut().add_named(
                "wall",
                Visual::filled_rect(spec.size(), WALL_COLOR),
                spec.center(),
            )
        });
        Ok(Self {
            handle: Handle { entity, node },
        })
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }
}

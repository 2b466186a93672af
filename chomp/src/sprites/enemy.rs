use anyhow::Result;
use scene2d::{ColliderShape, EngineContext, Material, RigidBodyType, Vec2, Visual};

use super::Handle;

const ENEMY_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Chases a target at constant speed.
pub struct Enemy {
    handle: Handle,
    speed: f32,
}

impl Enemy {
    pub fn spawn(ctx: &mut EngineContext, at: Vec2, size: f32, speed: f32) -> Result<Self> {
        let entity = ctx.entities_mut().spawn();
        let physics = ctx.physics_mut();
        physics.create_body(entity, RigidBodyType::Dynamic, at);
        physics.add_collider(
            entity,
            ColliderShape::Box {
                hx: size / 2.0,
                hy: size / 2.0,
            },
            Material {
                restitution: 1.0,
                ..Material::default()
            },
        )?;
        let node = ctx.display_mut().add_named(
            "enemy",
            Visual::filled_rect(Vec2::new(size, size), ENEMY_COLOR),
            at,
        );
        Ok(Self {
            handle: Handle {
                entity,
                node: Some(node),
            },
            speed,
        })
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Head straight for `target`.
    pub fn update(&self, ctx: &mut EngineContext, target: Vec2) {
        let Some(from) = self.handle.position(ctx) else {
            return;
        };
        let velocity = pursuit_velocity(from, target, self.speed);
        ctx.physics_mut()
            .set_linear_velocity(self.handle.entity, velocity);
    }
}

/// Velocity of length `speed` pointing from `from` to `to`.
pub fn pursuit_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    Vec2::from_angle(from.angle_to(to)) * speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn points_at_the_target() {
        let v = pursuit_velocity(Vec2::new(712.0, 384.0), Vec2::new(512.0, 384.0), 100.0);
        assert!((v.x + 100.0).abs() < 1e-3);
        assert!(v.y.abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn speed_is_constant(
            fx in -1000.0f32..1000.0, fy in -1000.0f32..1000.0,
            tx in -1000.0f32..1000.0, ty in -1000.0f32..1000.0,
        ) {
            let v = pursuit_velocity(Vec2::new(fx, fy), Vec2::new(tx, ty), 100.0);
            prop_assert!((v.length() - 100.0).abs() < 1e-2);
        }
    }
}

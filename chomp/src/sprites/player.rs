use anyhow::Result;
use scene2d::{
    ActionId, ColliderShape, EngineContext, InputMap, InputState, KeyCode, Material,
    RigidBodyType, Vec2, Visual,
};

use super::Handle;

const PLAYER_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// The keyboard-driven square.
pub struct Player {
    handle: Handle,
    speed: f32,
    controls: InputMap,
    left: ActionId,
    right: ActionId,
    up: ActionId,
    down: ActionId,
}

impl Player {
    /// Spawn the player at `at`.
    ///
    /// Fails with `EngineError::KeyboardUnavailable` before touching anything
    /// when the host has no keyboard.
    pub fn spawn(ctx: &mut EngineContext, at: Vec2, size: f32, speed: f32) -> Result<Self> {
        ctx.input().keyboard()?;

        let entity = ctx.entities_mut().spawn();
        let physics = ctx.physics_mut();
        physics.create_body(entity, RigidBodyType::Dynamic, at);
        physics.add_collider(
            entity,
            ColliderShape::Box {
                hx: size / 2.0,
                hy: size / 2.0,
            },
            Material::default(),
        )?;
        let node = ctx.display_mut().add_named(
            "player",
            Visual::filled_rect(Vec2::new(size, size), PLAYER_COLOR),
            at,
        );

        let (left, right, up, down) = (
            ActionId::new("left"),
            ActionId::new("right"),
            ActionId::new("up"),
            ActionId::new("down"),
        );
        let mut controls = InputMap::new();
        controls.bind_key(left.clone(), KeyCode::ArrowLeft);
        controls.bind_key(right.clone(), KeyCode::ArrowRight);
        controls.bind_key(up.clone(), KeyCode::ArrowUp);
        controls.bind_key(down.clone(), KeyCode::ArrowDown);

        Ok(Self {
            handle: Handle {
                entity,
                node: Some(node),
            },
            speed,
            controls,
            left,
            right,
            up,
            down,
        })
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Set the body velocity from the held arrow keys.
    pub fn update(&self, ctx: &mut EngineContext) -> Result<()> {
        let velocity = self.wanted_velocity(ctx.input().keyboard()?);
        ctx.physics_mut()
            .set_linear_velocity(self.handle.entity, velocity);
        Ok(())
    }

    fn wanted_velocity(&self, keys: &InputState) -> Vec2 {
        let held = |action: &ActionId| self.controls.action_down(keys, action);
        movement_velocity(
            held(&self.left),
            held(&self.right),
            held(&self.up),
            held(&self.down),
            self.speed,
        )
    }
}

/// Velocity for the held directions.
///
/// Left wins over right and up wins over down. Diagonals are scaled back to
/// `speed`.
pub fn movement_velocity(left: bool, right: bool, up: bool, down: bool, speed: f32) -> Vec2 {
    let x = if left {
        -speed
    } else if right {
        speed
    } else {
        0.0
    };
    let y = if up {
        -speed
    } else if down {
        speed
    } else {
        0.0
    };
    let v = Vec2::new(x, y);
    if x != 0.0 && y != 0.0 {
        v.normalized() * speed
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene2d::{Engine, EngineError};

    #[test]
    fn opposite_keys_resolve_to_left_and_up() {
        let horizontal = movement_velocity(true, true, false, false, 200.0);
        assert_eq!(horizontal, Vec2::new(-200.0, 0.0));
        let vertical = movement_velocity(false, false, true, true, 200.0);
        assert_eq!(vertical, Vec2::new(0.0, -200.0));
        let idle = movement_velocity(false, false, false, false, 200.0);
        assert_eq!(idle, Vec2::ZERO);
    }

    #[test]
    fn diagonals_keep_full_speed() {
        let v = movement_velocity(false, true, false, true, 200.0);
        assert!((v.length() - 200.0).abs() < 1e-3);
        assert!(v.x > 0.0 && v.y > 0.0);
    }

    #[test]
    fn spawning_without_keyboard_fails_cleanly() {
        let mut ctx = Engine::new().with_keyboard(false).context();
        let err = Player::spawn(&mut ctx, Vec2::new(10.0, 10.0), 32.0, 200.0)
            .err()
            .expect("player needs a keyboard");
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::KeyboardUnavailable)
        ));
        assert_eq!(ctx.physics().body_count(), 0);
        assert!(ctx.display().is_empty());
    }

    #[test]
    fn held_keys_drive_the_body() {
        let mut ctx = Engine::new().context();
        let player = Player::spawn(&mut ctx, Vec2::new(100.0, 100.0), 32.0, 200.0).unwrap();
        ctx.input_mut().press_key(KeyCode::ArrowRight);
        player.update(&mut ctx).unwrap();
        assert_eq!(
            ctx.physics().linear_velocity(player.handle().entity),
            Some(Vec2::new(200.0, 0.0))
        );
    }
}

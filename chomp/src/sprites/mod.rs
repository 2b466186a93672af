//! Gameplay entities. Each one pairs a physics body with a display node.

mod dot;
mod enemy;
mod player;
mod wall;

pub use dot::Dot;
pub use enemy::{pursuit_velocity, Enemy};
pub use player::{movement_velocity, Player};
pub use wall::Wall;

use scene2d::{EngineContext, EntityId, NodeId, Vec2};

/// A body in the physics world and the node that shows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handle {
    pub entity: EntityId,
    pub node: Option<NodeId>,
}

impl Handle {
    pub fn position(&self, ctx: &EngineContext) -> Option<Vec2> {
        ctx.physics().body_position(self.entity)
    }

    /// Move the node to where the body ended up.
    pub fn sync(&self, ctx: &mut EngineContext) {
        let (Some(node), Some(pos)) = (self.node, self.position(ctx)) else {
            return;
        };
        ctx.display_mut().set_position(node, pos);
    }

    /// Remove body, node, and listener membership.
    pub fn despawn(&self, ctx: &mut EngineContext) {
        ctx.physics_mut().remove_body(self.entity);
        ctx.contacts_mut().remove_entity(self.entity);
        ctx.entities_mut().despawn(self.entity);
        if let Some(node) = self.node {
            ctx.display_mut().remove(node);
        }
    }
}

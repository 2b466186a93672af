//! Scene2D - a small headless 2D scene framework.
//!
//! Scenes place visual nodes through a location registry, register physics
//! bodies and contact listeners, and hand control to each other through a
//! scene machine. Nothing is drawn; a host walks the display list.

pub mod assets;
pub mod contacts;
pub mod display;
pub mod engine;
pub mod error;
pub mod events;
pub mod input;
pub mod locator;
pub mod math;
pub mod physics;
pub mod registry;
pub mod state;
pub mod world;

pub use crate::assets::AssetLoader;
pub use crate::contacts::{Contact, ContactKind, ContactListeners, ListenerId};
pub use crate::display::{DisplayList, Node, NodeId, Visual};
pub use crate::engine::{Engine, EngineConfig, EngineContext, Game};
pub use crate::error::EngineError;
pub use crate::events::{EngineEvent, EventBus};
pub use crate::input::{ActionId, InputMap, InputState};
pub use crate::locator::{
    align_to, centered, create_grid, grid_position, location_table, random_position, resolve,
    LocationRegistry, LocationTable, Placement, Relative, ResolvedPosition, SharedLocations,
};
pub use crate::math::{Aabb, Vec2, Viewport};
pub use crate::physics::{ColliderShape, Material, PhysicsEvent, PhysicsWorld, RigidBodyType};
pub use crate::registry::SessionRegistry;
pub use crate::state::{Scene, SceneMachine, SceneTransitions};
pub use crate::world::{Entities, EntityId};
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

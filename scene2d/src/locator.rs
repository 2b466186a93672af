//! Object placement: a registry of named placement rules per scene and the
//! pure resolver that turns a rule into absolute coordinates.
//!
//! Scene controllers register their table once, at construction, and resolve
//! against the live viewport every time they place something. Nothing here is
//! cached, so a resized viewport is picked up on the next resolution.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::math::{Vec2, Viewport};

/// Placement relative to the viewport center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relative {
    #[serde(default)]
    pub from_center: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<f32>,
}

/// Where an object should go.
///
/// When `relative.from_center` is set, `x`/`y` are ignored and the position
/// is recomputed from the viewport center plus the offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<Relative>,
}

impl Placement {
    /// Fixed position, used verbatim.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            scale: None,
            relative: None,
        }
    }

    /// Viewport center plus an offset.
    pub fn from_center(offset_x: f32, offset_y: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: None,
            relative: Some(Relative {
                from_center: true,
                offset_x: (offset_x != 0.0).then_some(offset_x),
                offset_y: (offset_y != 0.0).then_some(offset_y),
            }),
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn is_from_center(&self) -> bool {
        self.relative.map(|r| r.from_center).unwrap_or(false)
    }
}

/// Absolute pixel position produced by [`resolve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPosition {
    pub x: f32,
    pub y: f32,
    pub scale: Option<f32>,
}

impl ResolvedPosition {
    pub fn point(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Scale with the usual default of 1.
    pub fn scale_or_one(&self) -> f32 {
        self.scale.unwrap_or(1.0)
    }
}

/// Object key -> placement rule for one scene.
pub type LocationTable = HashMap<String, Placement>;

/// Build a [`LocationTable`] from `(key, placement)` pairs.
pub fn location_table<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, Placement)>,
) -> LocationTable {
    entries.into_iter().map(|(k, p)| (k.into(), p)).collect()
}

/// Scene id -> location table.
///
/// One instance is created by the host and shared by every scene controller.
/// Tables are replaced wholesale on re-registration; nothing is ever removed.
#[derive(Debug, Default)]
pub struct LocationRegistry {
    scenes: HashMap<String, LocationTable>,
}

/// Handle scene controllers keep to the shared registry.
pub type SharedLocations = Rc<RefCell<LocationRegistry>>;

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry wrapped for sharing between scene controllers.
    pub fn shared() -> SharedLocations {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Store (or replace) the full table for a scene. Last write wins.
    pub fn register(&mut self, scene: impl Into<String>, table: LocationTable) {
        let scene = scene.into();
        log::debug!("registered {} locations for scene {}", table.len(), scene);
        self.scenes.insert(scene, table);
    }

    /// Look up a rule. Unknown scenes and unknown keys both yield `None`.
    pub fn lookup(&self, scene: &str, key: &str) -> Option<&Placement> {
        self.scenes.get(scene)?.get(key)
    }

    /// Look up a rule and resolve it, resolving `fallback` on a miss.
    pub fn resolve_or(
        &self,
        scene: &str,
        key: &str,
        viewport: Viewport,
        fallback: Placement,
    ) -> ResolvedPosition {
        let rule = self.lookup(scene, key).copied().unwrap_or(fallback);
        resolve(&rule, viewport)
    }

    pub fn is_registered(&self, scene: &str) -> bool {
        self.scenes.contains_key(scene)
    }
}

/// Turn a rule into absolute coordinates for the given viewport.
pub fn resolve(rule: &Placement, viewport: Viewport) -> ResolvedPosition {
    match rule.relative {
        Some(rel) if rel.from_center => ResolvedPosition {
            x: viewport.width / 2.0 + rel.offset_x.unwrap_or(0.0),
            y: viewport.height / 2.0 + rel.offset_y.unwrap_or(0.0),
            scale: rule.scale,
        },
        _ => ResolvedPosition {
            x: rule.x,
            y: rule.y,
            scale: rule.scale,
        },
    }
}

/// Standard fallback rule: the viewport center, optionally offset.
///
/// The offsets are kept inside `relative` so that resolving the rule later
/// still honors them.
pub fn centered(offset_x: f32, offset_y: f32) -> Placement {
    Placement::from_center(offset_x, offset_y)
}

/// Center of the cell at `(row, col)` in a grid of `cell_w` x `cell_h` cells.
pub fn grid_position(
    row: u32,
    col: u32,
    cell_w: f32,
    cell_h: f32,
    offset_x: f32,
    offset_y: f32,
) -> Vec2 {
    Vec2::new(
        col as f32 * cell_w + cell_w / 2.0 + offset_x,
        row as f32 * cell_h + cell_h / 2.0 + offset_y,
    )
}

/// Row-major list of cell centers for a `rows` x `cols` grid.
pub fn create_grid(
    rows: u32,
    cols: u32,
    cell_w: f32,
    cell_h: f32,
    offset_x: f32,
    offset_y: f32,
) -> Vec<Vec2> {
    (0..rows)
        .flat_map(|row| {
            (0..cols).map(move |col| grid_position(row, col, cell_w, cell_h, offset_x, offset_y))
        })
        .collect()
}

/// Random whole-pixel position at least `padding` away from every edge.
///
/// The caller owns the generator, so a seeded `Rng` gives repeatable layouts.
pub fn random_position(viewport: Viewport, padding: f32, rng: &mut fastrand::Rng) -> Vec2 {
    let pick = |rng: &mut fastrand::Rng, extent: f32| {
        let lo = padding.round() as i32;
        let hi = (extent - padding).round() as i32;
        if hi <= lo {
            lo as f32
        } else {
            rng.i32(lo..=hi) as f32
        }
    };
    let x = pick(rng, viewport.width);
    let y = pick(rng, viewport.height);
    Vec2::new(x, y)
}

/// Position of `target` shifted by an offset.
pub fn align_to(target: Vec2, offset_x: f32, offset_y: f32) -> Vec2 {
    Vec2::new(target.x + offset_x, target.y + offset_y)
}

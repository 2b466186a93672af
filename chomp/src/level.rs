//! Level geometry: wall layout and the dot grid that avoids it.

use scene2d::{create_grid, Aabb, Vec2, Viewport};
use serde::{Deserialize, Serialize};

/// A wall rectangle, positioned by its center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl WallSpec {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.center(), self.size())
    }
}

/// Maze for a 1024x768 viewport.
pub fn default_walls() -> Vec<WallSpec> {
    vec![
        WallSpec::new(200.0, 150.0, 200.0, 20.0),
        WallSpec::new(824.0, 150.0, 200.0, 20.0),
        WallSpec::new(200.0, 618.0, 200.0, 20.0),
        WallSpec::new(824.0, 618.0, 200.0, 20.0),
        WallSpec::new(512.0, 230.0, 20.0, 120.0),
        WallSpec::new(512.0, 538.0, 20.0, 120.0),
        WallSpec::new(100.0, 384.0, 20.0, 160.0),
        WallSpec::new(924.0, 384.0, 20.0, 160.0),
    ]
}

/// Walls hugging the viewport from the outside, keeping bodies on screen.
pub fn boundary_walls(viewport: Viewport, thickness: f32) -> [WallSpec; 4] {
    let Viewport { width, height } = viewport;
    let half = thickness / 2.0;
    let (span_x, span_y) = (width + 2.0 * thickness, height + 2.0 * thickness);
    [
        WallSpec::new(width / 2.0, -half, span_x, thickness),
        WallSpec::new(width / 2.0, height + half, span_x, thickness),
        WallSpec::new(-half, height / 2.0, thickness, span_y),
        WallSpec::new(width + half, height / 2.0, thickness, span_y),
    ]
}

/// Dot positions: one per grid cell of `spacing`, minus cells whose dot would
/// touch a wall.
///
/// The result depends only on the inputs, in row-major order.
pub fn dot_positions(
    viewport: Viewport,
    spacing: f32,
    dot_radius: f32,
    walls: &[WallSpec],
) -> Vec<Vec2> {
    if spacing <= 0.0 {
        return Vec::new();
    }
    let cols = (viewport.width / spacing).floor() as u32;
    let rows = (viewport.height / spacing).floor() as u32;
    let dot_size = Vec2::new(dot_radius * 2.0, dot_radius * 2.0);

    create_grid(rows, cols, spacing, spacing, 0.0, 0.0)
        .into_iter()
        .filter(|&p| {
            let dot = Aabb::from_center_size(p, dot_size);
            let blocked = walls.iter().any(|w| w.bounds().intersects(&dot));
            if blocked {
                log::trace!("dot at ({}, {}) overlaps a wall, skipped", p.x, p.y);
            }
            !blocked
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 1024.0,
        height: 768.0,
    };

    #[test]
    fn open_level_fills_the_grid() {
        let dots = dot_positions(VIEW, 64.0, 4.0, &[]);
        assert_eq!(dots.len(), 16 * 12);
        assert_eq!(dots[0], Vec2::new(32.0, 32.0));
        assert_eq!(dots[16], Vec2::new(32.0, 96.0));
    }

    #[test]
    fn dots_never_touch_walls() {
        let walls = default_walls();
        let dots = dot_positions(VIEW, 64.0, 4.0, &walls);
        assert!(dots.len() < 16 * 12);
        for p in &dots {
            let dot = Aabb::from_center_size(*p, Vec2::new(8.0, 8.0));
            assert!(walls.iter().all(|w| !w.bounds().intersects(&dot)));
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let walls = default_walls();
        assert_eq!(
            dot_positions(VIEW, 64.0, 4.0, &walls),
            dot_positions(VIEW, 64.0, 4.0, &walls)
        );
    }

    #[test]
    fn boundary_walls_stay_outside_the_view() {
        for wall in boundary_walls(VIEW, 32.0) {
            let b = wall.bounds();
            let outside = b.max().x <= 0.0
                || b.min().x >= VIEW.width
                || b.max().y <= 0.0
                || b.min().y >= VIEW.height;
            assert!(outside, "{wall:?}");
        }
    }

    #[test]
    fn spawn_points_are_clear_of_walls() {
        let center = VIEW.center();
        for spawn in [center, center + Vec2::new(200.0, 0.0)] {
            let body = Aabb::from_center_size(spawn, Vec2::new(32.0, 32.0));
            assert!(default_walls().iter().all(|w| !w.bounds().intersects(&body)));
        }
    }
}

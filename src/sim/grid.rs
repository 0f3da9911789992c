//! Uniform spatial grid over the arena
//!
//! Tiles are indexed row-major from the top-left corner. The grid backs the
//! field-of-view queries: which tiles a viewer can see past the obstacles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, Rect, line_vs_circle};

/// Fixed-size tiling of the arena rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: usize,
    pub rows: usize,
    pub tile_width: f32,
    pub tile_height: f32,
}

impl Grid {
    /// Tile an arena of the given size, rounding partial tiles up
    pub fn new(width: f32, height: f32, tile_width: f32, tile_height: f32) -> Self {
        let tile_width = tile_width.max(1.0);
        let tile_height = tile_height.max(1.0);
        Self {
            cols: (width.max(0.0) / tile_width).ceil() as usize,
            rows: (height.max(0.0) / tile_height).ceil() as usize,
            tile_width,
            tile_height,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_width, self.tile_height)
    }

    /// Top-left corner of a tile in arena space
    pub fn tile_origin(&self, index: usize) -> Vec2 {
        let col = index % self.cols.max(1);
        let row = index / self.cols.max(1);
        Vec2::new(col as f32 * self.tile_width, row as f32 * self.tile_height)
    }

    pub fn tile_center(&self, index: usize) -> Vec2 {
        self.tile_origin(index) + self.tile_size() * 0.5
    }

    pub fn tile_rect(&self, index: usize) -> Rect {
        let origin = self.tile_origin(index);
        Rect::new(origin.x, origin.y, self.tile_width, self.tile_height)
    }

    /// Tile containing a point, if the point is on the grid
    pub fn tile_at(&self, point: Vec2) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let col = (point.x / self.tile_width) as usize;
        let row = (point.y / self.tile_height) as usize;
        (col < self.cols && row < self.rows).then_some(row * self.cols + col)
    }

    /// Every tile whose bounds intersect `rect`, in ascending index order
    pub fn overlap_tiles(&self, rect: &Rect) -> Vec<usize> {
        if self.is_empty() || rect.width < 0.0 || rect.height < 0.0 {
            return Vec::new();
        }

        let last_col = self.cols as f32 - 1.0;
        let last_row = self.rows as f32 - 1.0;
        let min = rect.min();
        let max = rect.max();
        if max.x < 0.0 || max.y < 0.0 || min.x > self.cols as f32 * self.tile_width
            || min.y > self.rows as f32 * self.tile_height
        {
            return Vec::new();
        }

        let col0 = (min.x / self.tile_width).floor().clamp(0.0, last_col) as usize;
        let col1 = (max.x / self.tile_width).floor().clamp(0.0, last_col) as usize;
        let row0 = (min.y / self.tile_height).floor().clamp(0.0, last_row) as usize;
        let row1 = (max.y / self.tile_height).floor().clamp(0.0, last_row) as usize;

        let mut tiles = Vec::with_capacity((col1 - col0 + 1) * (row1 - row0 + 1));
        for row in row0..=row1 {
            for col in col0..=col1 {
                tiles.push(row * self.cols + col);
            }
        }
        tiles
    }

    /// Candidate tiles the viewer can see
    ///
    /// A tile is visible when its center lies within `radius` of the viewer
    /// and the segment from the viewer to that center clears every obstacle.
    /// Output keeps the order of `candidates`.
    pub fn visible_tiles(
        &self,
        viewer: Circle,
        radius: f32,
        obstacles: &[Circle],
        candidates: &[usize],
    ) -> Vec<usize> {
        let radius_sq = radius * radius;
        candidates
            .iter()
            .copied()
            .filter(|&index| index < self.len())
            .filter(|&index| {
                let center = self.tile_center(index);
                center.distance_squared(viewer.position) <= radius_sq
                    && has_line_of_sight(viewer.position, center, obstacles)
            })
            .collect()
    }
}

/// True if no obstacle blocks the segment `from -> to`
pub fn has_line_of_sight(from: Vec2, to: Vec2, obstacles: &[Circle]) -> bool {
    obstacles
        .iter()
        .all(|&obstacle| line_vs_circle(from, to, obstacle).is_none())
}

//! Spatial Index Module
//!
//! A static uniform grid over the level's horizontal bounds. Each cell lists
//! the walls and planes whose bounding boxes touch it, so collision and
//! height queries only look at nearby geometry.
//!
//! The grid has a fixed number of cells per axis regardless of level size:
//! more partitions cost memory, fewer leave more candidates per cell. The
//! index is built once per level and never mutated afterwards.
//!
//! ## Sentinels
//! Height queries that find nothing return [`NO_FLOOR`] (very low) or
//! [`NO_CEILING`] (very high) so callers can compare against them directly.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3Swizzles;
use tracing::{debug, warn};

use crate::error::LevelError;
use crate::physics::plane::HorizontalPlane;
use crate::physics::types::{Aabb, Vec2, Vec3};
use crate::physics::wall::WallSegment;
use crate::world::config::CollisionConfig;
use crate::world::level::{GridLevel, LevelDescription, LevelGeometry};

/// Height reported when no floor supports the queried disk.
pub const NO_FLOOR: f32 = -1000.0;

/// Height reported when no ceiling blocks the queried cylinder.
pub const NO_CEILING: f32 = 100_000.0;

static NEXT_INDEX_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Default)]
struct Cell {
    walls: Vec<usize>,
    planes: Vec<usize>,
}

/// Inclusive rectangle of cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    x0: usize,
    x1: usize,
    z0: usize,
    z1: usize,
}

/// Number of cells and cell size along one axis.
fn axis_cells(extent: f32, partitions: usize) -> (usize, f32) {
    if extent <= f32::EPSILON {
        (1, 1.0)
    } else {
        (partitions, extent / partitions as f32)
    }
}

/// Static grid of wall and plane candidates.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    id: u64,
    walls: Vec<WallSegment>,
    planes: Vec<HorizontalPlane>,
    cells: Vec<Cell>,
    bounds: Aabb,
    cells_x: usize,
    cells_z: usize,
    cell_size: Vec2,
    config: CollisionConfig,
}

impl SpatialIndex {
    /// Builds the index over already validated geometry.
    ///
    /// A level without geometry yields a single empty cell.
    pub fn build(
        walls: Vec<WallSegment>,
        planes: Vec<HorizontalPlane>,
        config: CollisionConfig,
    ) -> Self {
        let bounds = walls
            .iter()
            .map(|w| *w.bounds())
            .chain(planes.iter().map(|p| *p.bounds()))
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| {
                warn!("building spatial index for a level without geometry");
                Aabb::default()
            });

        let partitions = config.partitions.max(1);
        let extent = bounds.extent();
        let (cells_x, size_x) = axis_cells(extent.x, partitions);
        let (cells_z, size_z) = axis_cells(extent.z, partitions);

        let mut index = Self {
            id: NEXT_INDEX_ID.fetch_add(1, Ordering::Relaxed),
            walls,
            planes,
            cells: vec![Cell::default(); cells_x * cells_z],
            bounds,
            cells_x,
            cells_z,
            cell_size: Vec2::new(size_x, size_z),
            config,
        };

        for i in 0..index.walls.len() {
            let b = *index.walls[i].bounds();
            if let Some(range) = index.cell_range(b.min.xz(), b.max.xz()) {
                index.for_each_cell_mut(range, |cell| cell.walls.push(i));
            }
        }

        for i in 0..index.planes.len() {
            let b = *index.planes[i].bounds();
            if let Some(range) = index.cell_range(b.min.xz(), b.max.xz()) {
                index.for_each_cell_mut(range, |cell| cell.planes.push(i));
            }
        }

        debug!(
            id = index.id,
            walls = index.walls.len(),
            planes = index.planes.len(),
            cells_x,
            cells_z,
            min = ?index.bounds.min,
            max = ?index.bounds.max,
            "built spatial index"
        );

        index
    }

    /// Builds the index from a validated level.
    pub fn from_geometry(geometry: LevelGeometry, config: CollisionConfig) -> Self {
        Self::build(geometry.walls, geometry.planes, config)
    }

    /// Validates an explicit wall/plane description and builds the index.
    pub fn from_description(
        description: &LevelDescription,
        config: CollisionConfig,
    ) -> Result<Self, LevelError> {
        Ok(Self::from_geometry(description.build()?, config))
    }

    /// Converts a tile grid into geometry and builds the index.
    pub fn from_grid(grid: &GridLevel, config: CollisionConfig) -> Result<Self, LevelError> {
        Ok(Self::from_geometry(grid.to_geometry()?, config))
    }

    /// Process-unique identifier of this index.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Union of every wall and plane bounding box.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn walls(&self) -> &[WallSegment] {
        &self.walls
    }

    pub fn planes(&self) -> &[HorizontalPlane] {
        &self.planes
    }

    pub fn wall(&self, index: usize) -> Option<&WallSegment> {
        self.walls.get(index)
    }

    pub fn plane(&self, index: usize) -> Option<&HorizontalPlane> {
        self.planes.get(index)
    }

    /// Number of cells along X and Z.
    pub fn cell_counts(&self) -> (usize, usize) {
        (self.cells_x, self.cells_z)
    }

    /// Cell size along X and Z.
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Cell rectangle covering the horizontal box `min`..`max`, or `None`
    /// when the box lies entirely outside the indexed bounds.
    fn cell_range(&self, min: Vec2, max: Vec2) -> Option<CellRange> {
        let b = &self.bounds;
        if max.x < b.min.x || min.x > b.max.x || max.y < b.min.z || min.y > b.max.z {
            return None;
        }

        let origin = b.min.xz();
        let to_cell = |v: f32, origin: f32, size: f32, count: usize| -> usize {
            let cell = ((v - origin) / size).floor();
            cell.clamp(0.0, (count - 1) as f32) as usize
        };

        Some(CellRange {
            x0: to_cell(min.x, origin.x, self.cell_size.x, self.cells_x),
            x1: to_cell(max.x, origin.x, self.cell_size.x, self.cells_x),
            z0: to_cell(min.y, origin.y, self.cell_size.y, self.cells_z),
            z1: to_cell(max.y, origin.y, self.cell_size.y, self.cells_z),
        })
    }

    fn for_each_cell_mut(&mut self, range: CellRange, mut f: impl FnMut(&mut Cell)) {
        for z in range.z0..=range.z1 {
            for x in range.x0..=range.x1 {
                f(&mut self.cells[z * self.cells_x + x]);
            }
        }
    }

    /// Unique candidates from every cell in `range`, in ascending order.
    fn candidates(&self, range: CellRange, pick: impl Fn(&Cell) -> &[usize]) -> Vec<usize> {
        let mut found = Vec::new();
        for z in range.z0..=range.z1 {
            for x in range.x0..=range.x1 {
                found.extend_from_slice(pick(&self.cells[z * self.cells_x + x]));
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Indices of all walls that overlap `bounds`, confirmed by the exact
    /// box/segment test.
    pub fn overlapping_wall_indices(&self, bounds: &Aabb) -> Vec<usize> {
        let Some(range) = self.cell_range(bounds.min.xz(), bounds.max.xz()) else {
            return Vec::new();
        };

        let step_height = self.config.wall_step_height;
        let mut found = self.candidates(range, |cell| cell.walls.as_slice());
        found.retain(|&i| self.walls[i].overlaps_box(bounds, step_height));
        found
    }

    /// All walls that overlap `bounds`.
    pub fn overlapping_walls(&self, bounds: &Aabb) -> Vec<&WallSegment> {
        self.overlapping_wall_indices(bounds)
            .into_iter()
            .map(|i| &self.walls[i])
            .collect()
    }

    /// Indices of all planes whose cells touch the disk's bounding box.
    ///
    /// Candidates only; the exact test is the plane's own height query.
    pub fn overlapping_plane_indices(&self, position: Vec3, radius: f32) -> Vec<usize> {
        let center = position.xz();
        let reach = Vec2::splat(radius);
        match self.cell_range(center - reach, center + reach) {
            Some(range) => self.candidates(range, |cell| cell.planes.as_slice()),
            None => Vec::new(),
        }
    }

    /// All candidate planes under the disk.
    pub fn overlapping_planes(&self, position: Vec3, radius: f32) -> Vec<&HorizontalPlane> {
        self.overlapping_plane_indices(position, radius)
            .into_iter()
            .map(|i| &self.planes[i])
            .collect()
    }

    /// Highest plane under the disk that is still at or below
    /// `position.y + step_tolerance`, or [`NO_FLOOR`].
    pub fn highest_plane(&self, position: Vec3, radius: f32) -> f32 {
        let limit = position.y + self.config.step_tolerance;
        self.overlapping_planes(position, radius)
            .into_iter()
            .filter_map(|plane| plane.y_at_point(position, radius))
            .filter(|&y| y <= limit)
            .fold(NO_FLOOR, f32::max)
    }

    /// Lowest plane over the cylinder that is strictly above its top
    /// (`position.y + height`), or [`NO_CEILING`].
    pub fn lowest_plane(&self, position: Vec3, height: f32, radius: f32) -> f32 {
        let top = position.y + height;
        self.overlapping_planes(position, radius)
            .into_iter()
            .filter_map(|plane| plane.y_at_point(position, radius))
            .filter(|&y| y > top)
            .fold(NO_CEILING, f32::min)
    }
}

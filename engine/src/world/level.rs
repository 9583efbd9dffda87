//! Level Description Module
//!
//! Two ways to describe a level's solid geometry, both loadable from JSON:
//!
//! - [`LevelDescription`]: explicit lists of walls and plane corners.
//! - [`GridLevel`]: a tile dungeon. Each map cell references a [`Tile`]
//!   and the grid is converted into walls and planes automatically.
//!
//! Both produce a validated [`LevelGeometry`] ready for the spatial index.
//!
//! ## Grid coordinates
//! Tile `(x, z)` covers `[x, x + 1] x [z, z + 1]` in world units. `map[z][x]`
//! holds a 1-based tile id; 0 marks void, which is treated as solid rock.
//!
//! ```text
//!        North (z - 1)
//!   tl(x,z) ---- tr(x+1,z)
//!     |             |
//!  West           East
//!     |             |
//!   bl(x,z+1) -- br(x+1,z+1)
//!        South (z + 1)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, LevelError};
use crate::physics::plane::{HorizontalPlane, PlaneCorners};
use crate::physics::types::{Vec2, Vec3};
use crate::physics::wall::{WallEndpoint, WallSegment};

/// Height differences smaller than this produce no step or lintel wall.
const MIN_WALL_HEIGHT: f32 = 0.001;

/// Default floor rise across a sloped tile.
pub const DEFAULT_SLOPE_RISE: f32 = 0.5;

/// Validated walls and planes of one level.
#[derive(Debug, Clone, Default)]
pub struct LevelGeometry {
    pub walls: Vec<WallSegment>,
    pub planes: Vec<HorizontalPlane>,
}

impl LevelGeometry {
    /// Builds and appends a wall; errors carry the index it would have had.
    fn push_wall(&mut self, start: WallEndpoint, end: WallEndpoint) -> Result<(), LevelError> {
        let index = self.walls.len();
        let wall = WallSegment::new(start, end).map_err(|error| LevelError::Wall { index, error })?;
        self.walls.push(wall);
        Ok(())
    }

    fn push_plane(&mut self, corners: PlaneCorners) -> Result<(), LevelError> {
        let index = self.planes.len();
        let plane =
            HorizontalPlane::new(corners).map_err(|error| LevelError::Plane { index, error })?;
        self.planes.push(plane);
        Ok(())
    }
}

// ============================================================================
// Explicit descriptions
// ============================================================================

/// A wall as stored in level files.
///
/// `y` is the bottom and `h` the height at each endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallDescription {
    pub x1: f32,
    pub y1: f32,
    pub h1: f32,
    pub z1: f32,
    pub x2: f32,
    pub y2: f32,
    pub h2: f32,
    pub z2: f32,
    /// Explicit outward normal (x, z); derived from the direction when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<Vec2>,
}

impl WallDescription {
    pub fn build(&self) -> Result<WallSegment, GeometryError> {
        let start = WallEndpoint::new(self.x1, self.y1, self.h1, self.z1);
        let end = WallEndpoint::new(self.x2, self.y2, self.h2, self.z2);
        match self.normal {
            Some(normal) => WallSegment::with_normal(start, end, normal),
            None => WallSegment::new(start, end),
        }
    }
}

/// Explicit wall and plane lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDescription {
    pub walls: Vec<WallDescription>,
    pub planes: Vec<PlaneCorners>,
}

impl LevelDescription {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates every wall and plane. The first malformed one aborts the build.
    pub fn build(&self) -> Result<LevelGeometry, LevelError> {
        let walls = self
            .walls
            .iter()
            .enumerate()
            .map(|(index, wall)| wall.build().map_err(|error| LevelError::Wall { index, error }))
            .collect::<Result<Vec<_>, _>>()?;

        let planes = self
            .planes
            .iter()
            .enumerate()
            .map(|(index, corners)| {
                HorizontalPlane::new(*corners).map_err(|error| LevelError::Plane { index, error })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LevelGeometry { walls, planes })
    }
}

// ============================================================================
// Tile grids
// ============================================================================

/// Corner of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Tl,
    Tr,
    Bl,
    Br,
}

impl Corner {
    /// The two tile edges that meet at this corner.
    pub fn edges(self) -> [Direction; 2] {
        match self {
            Corner::Tl => [Direction::North, Direction::West],
            Corner::Tr => [Direction::North, Direction::East],
            Corner::Bl => [Direction::South, Direction::West],
            Corner::Br => [Direction::South, Direction::East],
        }
    }
}

/// Compass direction on the grid. North is -Z, East is +X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "w")]
    West,
    #[serde(rename = "e")]
    East,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Grid offset to the neighbouring tile.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Local corners of this edge, ordered so the derived wall normal points
    /// out of the tile toward the neighbour in this direction.
    fn edge(self) -> (Vec2, Vec2) {
        match self {
            Direction::North => (Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0)),
            Direction::South => (Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)),
            Direction::West => (Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0)),
            Direction::East => (Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)),
        }
    }
}

fn default_rise() -> f32 {
    DEFAULT_SLOPE_RISE
}

/// A tile type referenced from the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Floor height (lowest point for sloped floors)
    pub y: f32,
    /// Floor to ceiling distance
    pub height: f32,
    /// Solid rock block
    #[serde(default)]
    pub solid: bool,
    /// Solid corner of a half-blocked tile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagonal: Option<Corner>,
    /// Direction the floor rises toward
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope: Option<Direction>,
    #[serde(default = "default_rise")]
    pub rise: f32,
}

impl Tile {
    pub fn floor(y: f32, height: f32) -> Self {
        Self {
            y,
            height,
            solid: false,
            diagonal: None,
            slope: None,
            rise: DEFAULT_SLOPE_RISE,
        }
    }

    pub fn rock() -> Self {
        Self {
            solid: true,
            ..Self::floor(0.0, 0.0)
        }
    }

    /// Whether a character can stand anywhere on this tile.
    pub fn is_walkable(&self) -> bool {
        !self.solid || self.diagonal.is_some()
    }

    /// Whether the edge in `direction` blocks movement from outside.
    fn closes(&self, direction: Direction) -> bool {
        match self.diagonal {
            Some(corner) => corner.edges().contains(&direction),
            None => self.solid,
        }
    }

    /// Floor height at a local position (0..1 on both axes).
    pub fn floor_at(&self, local: Vec2) -> f32 {
        let fraction = match self.slope {
            None => 0.0,
            Some(Direction::East) => local.x,
            Some(Direction::West) => 1.0 - local.x,
            Some(Direction::South) => local.y,
            Some(Direction::North) => 1.0 - local.y,
        };
        self.y + self.rise * fraction
    }

    pub fn ceiling(&self) -> f32 {
        self.y + self.height
    }
}

/// A tile dungeon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLevel {
    pub tiles: Vec<Tile>,
    /// `map[z][x]`: 1-based tile id, 0 for void
    pub map: Vec<Vec<u32>>,
}

impl GridLevel {
    pub fn new(tiles: Vec<Tile>, map: Vec<Vec<u32>>) -> Self {
        Self { tiles, map }
    }

    /// Parses and validates a grid.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let grid: GridLevel = serde_json::from_str(json)?;
        grid.validate()?;
        Ok(grid)
    }

    /// Checks the map is a non-empty rectangle of known tile ids.
    pub fn validate(&self) -> Result<(), LevelError> {
        let width = self.map.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(LevelError::EmptyGrid);
        }

        for (z, row) in self.map.iter().enumerate() {
            if row.len() != width {
                return Err(LevelError::RaggedGrid { row: z });
            }
            for (x, &id) in row.iter().enumerate() {
                if id as usize > self.tiles.len() {
                    return Err(LevelError::UnknownTile { x, z, id });
                }
            }
        }

        Ok(())
    }

    /// Number of tiles along X and Z.
    pub fn size(&self) -> (usize, usize) {
        (self.map.first().map_or(0, Vec::len), self.map.len())
    }

    /// The tile at a grid position, `None` for void or outside the map.
    pub fn tile(&self, x: i64, z: i64) -> Option<&Tile> {
        if x < 0 || z < 0 {
            return None;
        }
        let id = *self.map.get(z as usize)?.get(x as usize)?;
        if id == 0 {
            return None;
        }
        self.tiles.get(id as usize - 1)
    }

    /// Center of the first plain walkable tile in row-major order, standing
    /// on its floor.
    pub fn first_walkable(&self) -> Option<Vec3> {
        let (width, depth) = self.size();
        (0..depth as i64)
            .flat_map(|z| (0..width as i64).map(move |x| (x, z)))
            .find_map(|(x, z)| {
                let tile = self.tile(x, z)?;
                if tile.is_walkable() && tile.diagonal.is_none() {
                    let y = tile.floor_at(Vec2::splat(0.5));
                    Some(Vec3::new(x as f32 + 0.5, y, z as f32 + 0.5))
                } else {
                    None
                }
            })
    }

    /// Converts the grid into walls and planes.
    pub fn to_geometry(&self) -> Result<LevelGeometry, LevelError> {
        self.validate()?;

        let mut geometry = LevelGeometry::default();
        let (width, depth) = self.size();

        for z in 0..depth as i64 {
            for x in 0..width as i64 {
                let Some(tile) = self.tile(x, z) else {
                    continue;
                };
                if !tile.is_walkable() {
                    continue;
                }

                let origin = Vec2::new(x as f32, z as f32);
                self.push_planes(&mut geometry, tile, origin)?;

                if let Some(corner) = tile.diagonal {
                    push_diagonal_wall(&mut geometry, tile, corner, origin)?;
                }

                for direction in Direction::ALL {
                    if tile.closes(direction) {
                        continue;
                    }
                    let (dx, dz) = direction.offset();
                    let neighbour = self.tile(x + dx, z + dz);
                    push_edge_walls(&mut geometry, tile, neighbour, direction, origin)?;
                }
            }
        }

        Ok(geometry)
    }

    fn push_planes(
        &self,
        geometry: &mut LevelGeometry,
        tile: &Tile,
        origin: Vec2,
    ) -> Result<(), LevelError> {
        let corner = |local: Vec2, y: f32| Vec3::new(origin.x + local.x, y, origin.y + local.y);
        let local = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];

        let floor = local.map(|l| corner(l, tile.floor_at(l)));
        let ceiling = local.map(|l| corner(l, tile.ceiling()));

        for [tl, tr, bl, br] in [floor, ceiling] {
            geometry.push_plane(PlaneCorners::new(tl, tr, bl, br))?;
        }

        Ok(())
    }
}

/// Wall across a diagonal tile, facing away from its solid corner.
fn push_diagonal_wall(
    geometry: &mut LevelGeometry,
    tile: &Tile,
    corner: Corner,
    origin: Vec2,
) -> Result<(), LevelError> {
    let (a, b) = match corner {
        Corner::Tl => (Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)),
        Corner::Tr => (Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)),
        Corner::Bl => (Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0)),
        Corner::Br => (Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)),
    };

    let ceiling = tile.ceiling();
    let endpoint = |local: Vec2| {
        let bottom = tile.floor_at(local);
        let p = origin + local;
        WallEndpoint::new(p.x, bottom, ceiling - bottom, p.y)
    };

    geometry.push_wall(endpoint(a), endpoint(b))
}

/// Walls on one edge of a walkable tile.
///
/// A closed neighbour gets a full-height wall facing into the tile. An open
/// neighbour gets a step wall when its floor is lower and a lintel when its
/// ceiling is lower, each built from the side that is taller so every edge
/// is emitted at most once.
fn push_edge_walls(
    geometry: &mut LevelGeometry,
    tile: &Tile,
    neighbour: Option<&Tile>,
    direction: Direction,
    origin: Vec2,
) -> Result<(), LevelError> {
    let (a, b) = direction.edge();
    let (dx, dz) = direction.offset();
    let across = Vec2::new(dx as f32, dz as f32);
    // Same world point in the neighbour's local coordinates
    let in_neighbour = |local: Vec2| local - across;

    let blocked = neighbour.is_none_or(|n| n.closes(direction.opposite()));
    if blocked {
        // Reversed so the normal faces into this tile
        let ceiling = tile.ceiling();
        let endpoint = |local: Vec2| {
            let bottom = tile.floor_at(local);
            let p = origin + local;
            WallEndpoint::new(p.x, bottom, ceiling - bottom, p.y)
        };
        return geometry.push_wall(endpoint(b), endpoint(a));
    }

    let Some(neighbour) = neighbour else {
        return Ok(());
    };

    // Step down into the neighbour, facing it
    let step = |local: Vec2| {
        let low = neighbour.floor_at(in_neighbour(local));
        (low, (tile.floor_at(local) - low).max(0.0))
    };
    let (bottom_a, height_a) = step(a);
    let (bottom_b, height_b) = step(b);
    if height_a.max(height_b) > MIN_WALL_HEIGHT {
        let pa = origin + a;
        let pb = origin + b;
        geometry.push_wall(
            WallEndpoint::new(pa.x, bottom_a, height_a, pa.y),
            WallEndpoint::new(pb.x, bottom_b, height_b, pb.y),
        )?;
    }

    // Lintel hanging from the neighbour's lower ceiling, facing this tile
    let lintel = tile.ceiling() - neighbour.ceiling();
    if lintel > MIN_WALL_HEIGHT {
        let bottom = neighbour.ceiling();
        let pa = origin + a;
        let pb = origin + b;
        geometry.push_wall(
            WallEndpoint::new(pb.x, bottom, lintel, pb.y),
            WallEndpoint::new(pa.x, bottom, lintel, pa.y),
        )?;
    }

    Ok(())
}

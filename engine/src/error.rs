//! Level construction errors
//!
//! Queries and resolvers never fail; the only fatal condition is malformed
//! level geometry, which is rejected when the level is built.

/// Why a single wall or plane could not be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// Wall whose endpoints coincide in the horizontal plane.
    DegenerateWall,
    /// Explicit wall normal with zero horizontal length.
    ZeroNormal,
    /// Plane with fewer than four distinct corners.
    DegeneratePlane,
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::DegenerateWall => write!(f, "wall has zero horizontal length"),
            GeometryError::ZeroNormal => write!(f, "wall normal has zero length"),
            GeometryError::DegeneratePlane => {
                write!(f, "plane has fewer than four distinct corners")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Errors that can occur while loading or building a level.
#[derive(Debug)]
pub enum LevelError {
    /// Wall at `index` in the level description is malformed.
    Wall { index: usize, error: GeometryError },
    /// Plane at `index` in the level description is malformed.
    Plane { index: usize, error: GeometryError },
    /// Tile grid without any rows or columns.
    EmptyGrid,
    /// Tile grid row whose width differs from the first row.
    RaggedGrid { row: usize },
    /// Tile grid cell referencing a tile that does not exist.
    UnknownTile { x: usize, z: usize, id: u32 },
    /// JSON deserialization error.
    Json(serde_json::Error),
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::Wall { index, error } => write!(f, "wall {index}: {error}"),
            LevelError::Plane { index, error } => write!(f, "plane {index}: {error}"),
            LevelError::EmptyGrid => write!(f, "tile grid is empty"),
            LevelError::RaggedGrid { row } => {
                write!(f, "tile grid row {row} differs in width from row 0")
            }
            LevelError::UnknownTile { x, z, id } => {
                write!(f, "tile id {id} at ({x}, {z}) is not defined")
            }
            LevelError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Wall { error, .. } | LevelError::Plane { error, .. } => Some(error),
            LevelError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Json(e)
    }
}

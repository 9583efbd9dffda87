//! Level Tests - Tile Grids and Character Movement
//!
//! Tests for grid-to-geometry conversion and for a character walking
//! through it: ramps, steps, drop-offs, low ceilings and diagonal walls.

use approx::assert_abs_diff_eq;
use glam::{Vec2, Vec3};
use stygian_engine::LevelError;
use stygian_engine::player::CharacterController;
use stygian_engine::world::{
    CharacterShape, CollisionConfig, Corner, Direction, GridLevel, SpatialIndex, Tile,
};

const COURTYARD: &str = include_str!("../../assets/levels/courtyard.json");

const EAST: Vec2 = Vec2::new(1.0, 0.0);
const WEST: Vec2 = Vec2::new(-1.0, 0.0);

fn index_for(grid: &GridLevel) -> SpatialIndex {
    SpatialIndex::from_grid(grid, CollisionConfig::default()).unwrap()
}

fn controller_at(x: f32, y: f32, z: f32) -> CharacterController {
    CharacterController::new(Vec3::new(x, y, z), CharacterShape::default())
}

/// Walks `frames` ticks in `direction`, running gravity after each step.
fn walk(
    controller: &mut CharacterController,
    index: &SpatialIndex,
    direction: Vec2,
    frames: usize,
) {
    for _ in 0..frames {
        controller.walk(index, direction);
        controller.tick(index);
    }
}

fn settle(controller: &mut CharacterController, index: &SpatialIndex) {
    for _ in 0..200 {
        if controller.is_grounded() && controller.vertical_speed() == 0.0 {
            break;
        }
        controller.tick(index);
    }
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_courtyard_loads() {
    let grid = GridLevel::from_json(COURTYARD).unwrap();
    assert_eq!(grid.size(), (8, 7));

    let index = index_for(&grid);
    assert!(!index.walls().is_empty());
    assert_eq!(index.cell_counts(), (4, 4));

    // (1, 1) is the diagonal tile; (2, 1) is the first plain floor
    assert_eq!(grid.first_walkable(), Some(Vec3::new(2.5, 0.0, 1.5)));
}

#[test]
fn test_malformed_grids_are_rejected() {
    assert!(matches!(
        GridLevel::from_json(r#"{ "tiles": [], "map": [] }"#),
        Err(LevelError::EmptyGrid)
    ));
    assert!(matches!(
        GridLevel::from_json(r#"{ "tiles": [ { "y": 0, "height": 2 } ], "map": [[1, 3]] }"#),
        Err(LevelError::UnknownTile { id: 3, .. })
    ));
    assert!(matches!(
        GridLevel::from_json(r#"{ "tiles": "#),
        Err(LevelError::Json(_))
    ));
}

#[test]
fn test_courtyard_walk_stays_inside() {
    let grid = GridLevel::from_json(COURTYARD).unwrap();
    let index = index_for(&grid);
    let spawn = grid.first_walkable().unwrap();
    let mut controller = CharacterController::new(spawn, CharacterShape::default());

    let headings = [EAST, Vec2::new(0.0, 1.0), WEST, Vec2::new(0.0, -1.0)];
    for (leg, heading) in headings.iter().cycle().take(16).enumerate() {
        if leg % 3 == 0 {
            controller.jump(&index);
        }
        walk(&mut controller, &index, *heading, 40);

        let p = controller.position();
        assert!((1.0..=7.0).contains(&p.x), "left the courtyard at {p:?}");
        assert!((1.0..=6.0).contains(&p.z), "left the courtyard at {p:?}");
        assert!(p.y >= -1.0 - 1e-4, "fell through the floor at {p:?}");
    }
}

// ============================================================================
// Floors
// ============================================================================

#[test]
fn test_ramp_carries_character_up() {
    let ramp = Tile {
        slope: Some(Direction::East),
        rise: 0.5,
        ..Tile::floor(0.0, 2.0)
    };
    let grid = GridLevel::new(
        vec![Tile::floor(0.0, 2.0), ramp, Tile::floor(0.5, 1.5)],
        vec![vec![1, 2, 3]],
    );
    let index = index_for(&grid);
    let mut controller = controller_at(0.5, 0.0, 0.5);

    let mut previous = 0.0;
    for _ in 0..25 {
        walk(&mut controller, &index, EAST, 1);
        let y = controller.position().y;
        assert!(controller.is_grounded());
        assert!(y >= previous, "went down on a ramp going up");
        previous = y;
    }

    assert_abs_diff_eq!(controller.position().y, 0.5, epsilon = 1e-4);
    assert!(controller.position().x > 2.5);
}

#[test]
fn test_small_step_is_climbed() {
    let grid = GridLevel::new(
        vec![Tile::floor(0.0, 2.0), Tile::floor(0.15, 1.85)],
        vec![vec![1, 2]],
    );
    let index = index_for(&grid);
    let mut controller = controller_at(0.5, 0.0, 0.5);

    walk(&mut controller, &index, EAST, 20);

    assert!(controller.position().x > 1.5);
    assert_abs_diff_eq!(controller.position().y, 0.15, epsilon = 1e-4);
    assert!(controller.is_grounded());
}

#[test]
fn test_tall_step_blocks() {
    let grid = GridLevel::new(
        vec![Tile::floor(0.0, 2.0), Tile::floor(0.5, 1.5)],
        vec![vec![1, 2]],
    );
    let index = index_for(&grid);
    let mut controller = controller_at(0.5, 0.0, 0.5);

    walk(&mut controller, &index, EAST, 20);

    assert!(controller.position().x <= 0.71, "x = {}", controller.position().x);
    assert_eq!(controller.position().y, 0.0);
}

#[test]
fn test_drop_off_falls_and_lands() {
    let pit = Tile::floor(-1.0, 3.0);
    let grid = GridLevel::new(vec![Tile::floor(0.0, 2.0), pit], vec![vec![1, 2]]);
    let index = index_for(&grid);
    let mut controller = controller_at(0.5, 0.0, 0.5);

    let mut was_airborne = false;
    for _ in 0..20 {
        walk(&mut controller, &index, EAST, 1);
        was_airborne |= !controller.is_grounded();
    }
    settle(&mut controller, &index);

    assert!(was_airborne);
    assert!(controller.is_grounded());
    assert_eq!(controller.position().y, -1.0);
    assert_eq!(controller.floor_height(&index), -1.0);

    // The ledge is too tall to walk back up
    walk(&mut controller, &index, WEST, 20);
    assert!(controller.position().x >= 1.29, "x = {}", controller.position().x);
    assert_eq!(controller.position().y, -1.0);
}

// ============================================================================
// Ceilings and Diagonals
// ============================================================================

#[test]
fn test_low_passage_blocks_tall_character() {
    let grid = GridLevel::new(
        vec![Tile::floor(0.0, 2.0), Tile::floor(0.0, 0.5)],
        vec![vec![1, 2]],
    );
    let index = index_for(&grid);
    let mut controller = controller_at(0.5, 0.0, 0.5);

    walk(&mut controller, &index, EAST, 20);
    assert!(controller.position().x <= 0.71, "x = {}", controller.position().x);
}

#[test]
fn test_lintel_above_head_height_lets_character_pass() {
    let grid = GridLevel::new(
        vec![Tile::floor(0.0, 2.0), Tile::floor(0.0, 1.0)],
        vec![vec![1, 2]],
    );
    let index = index_for(&grid);
    let mut controller = controller_at(0.5, 0.0, 0.5);

    walk(&mut controller, &index, EAST, 20);
    assert!(controller.position().x > 1.5);
}

#[test]
fn test_jump_under_low_ceiling_is_clamped() {
    let grid = GridLevel::new(vec![Tile::floor(0.0, 1.0)], vec![vec![1]]);
    let index = index_for(&grid);
    let mut controller = controller_at(0.5, 0.0, 0.5);

    assert!(controller.jump(&index));
    let mut apex: f32 = 0.0;
    for _ in 0..100 {
        controller.tick(&index);
        apex = apex.max(controller.position().y);
    }

    assert!(apex + controller.shape().height < 1.0);
    assert!(apex > 0.35);
    assert!(controller.is_grounded());
}

#[test]
fn test_diagonal_wall_blocks_from_open_side() {
    let diagonal = Tile {
        solid: true,
        diagonal: Some(Corner::Tl),
        ..Tile::floor(0.0, 2.0)
    };
    let grid = GridLevel::new(
        vec![diagonal, Tile::floor(0.0, 2.0)],
        vec![vec![1, 2], vec![2, 2]],
    );
    let index = index_for(&grid);
    let mut controller = controller_at(1.5, 0.0, 1.5);

    walk(&mut controller, &index, Vec2::new(-1.0, -1.0), 30);

    let p = controller.position();
    let distance = (p.x + p.z - 1.0) / std::f32::consts::SQRT_2;
    assert!(distance >= 0.29, "ended at {p:?}");
    assert!(distance < 0.5, "ended at {p:?}");
}

#[test]
fn test_diagonal_closed_edges_block_neighbours() {
    let diagonal = Tile {
        solid: true,
        diagonal: Some(Corner::Tl),
        ..Tile::floor(0.0, 2.0)
    };
    // Diagonal tile east of the floor: its west edge is solid
    let grid = GridLevel::new(vec![Tile::floor(0.0, 2.0), diagonal], vec![vec![1, 2]]);
    let index = index_for(&grid);
    let mut controller = controller_at(0.5, 0.0, 0.5);

    walk(&mut controller, &index, EAST, 20);
    assert!(controller.position().x <= 0.71, "x = {}", controller.position().x);
}

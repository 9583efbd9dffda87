//! Vertical movement
//!
//! Gravity, jumping, landing and ceiling bumps for a character standing on
//! the level's horizontal planes. Two states:
//!
//! - **Grounded**: standing on a floor. Stays grounded as long as a floor is
//!   within step tolerance below the feet.
//! - **Airborne**: jumping or falling. Gravity accumulates every tick until
//!   the character lands on a floor or bumps a ceiling.
//!
//! Horizontal movement does not run this state machine. After a horizontal
//! move the controller calls [`place_on_floor`], which follows slopes and
//! small steps while leaving real drop-offs to the next [`step_vertical`].

use tracing::trace;

use crate::physics::types::Vec3;
use crate::world::config::CharacterShape;
use crate::world::spatial_index::SpatialIndex;

/// Gap kept between the character's head and a ceiling it bumped into.
pub const CEILING_CLEARANCE: f32 = 0.001;

/// Vertical state of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalState {
    #[default]
    Grounded,
    Airborne,
}

/// Position and vertical motion of one character.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharacterState {
    /// Base center of the character's cylinder
    pub position: Vec3,
    /// Vertical speed per tick (positive = upward)
    pub vertical_speed: f32,
    pub state: VerticalState,
}

impl CharacterState {
    /// A character at rest, grounded at `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            vertical_speed: 0.0,
            state: VerticalState::Grounded,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.state == VerticalState::Grounded
    }
}

/// Advances the vertical state machine by one tick and returns the new state.
pub fn step_vertical(
    index: &SpatialIndex,
    character: &mut CharacterState,
    shape: &CharacterShape,
) -> VerticalState {
    let config = index.config();

    if character.state == VerticalState::Grounded && character.vertical_speed <= 0.0 {
        let floor = index.highest_plane(character.position, shape.radius);
        if character.position.y - floor > config.step_tolerance {
            trace!(y = character.position.y, floor, "floor dropped away");
            character.state = VerticalState::Airborne;
        } else {
            return character.state;
        }
    }

    character.vertical_speed -= config.gravity;
    let next_y = character.position.y + character.vertical_speed;

    if character.vertical_speed > 0.0 {
        let ceiling = index.lowest_plane(character.position, shape.height, shape.radius);
        if next_y + shape.height >= ceiling {
            trace!(ceiling, "bumped ceiling");
            character.position.y = ceiling - shape.height - CEILING_CLEARANCE;
            character.vertical_speed = 0.0;
        } else {
            character.position.y = next_y;
        }
    } else {
        let floor = index.highest_plane(character.position, shape.radius);
        if next_y < floor {
            trace!(floor, "landed");
            character.position.y = floor;
            character.vertical_speed = 0.0;
            character.state = VerticalState::Grounded;
        } else {
            character.position.y = next_y;
        }
    }

    character.state
}

/// Snaps a character at vertical rest onto the floor beneath it.
///
/// Only acts when the vertical speed is exactly zero and the highest floor
/// is within step tolerance of the feet (above or below). Returns whether
/// the character was moved.
pub fn place_on_floor(
    index: &SpatialIndex,
    character: &mut CharacterState,
    shape: &CharacterShape,
) -> bool {
    if character.vertical_speed != 0.0 {
        return false;
    }

    let floor = index.highest_plane(character.position, shape.radius);
    if (floor - character.position.y).abs() > index.config().step_tolerance {
        return false;
    }

    character.position.y = floor;
    true
}

/// Starts a jump with upward `speed`. Only grounded characters can jump.
pub fn jump(character: &mut CharacterState, speed: f32) -> bool {
    if !character.is_grounded() {
        return false;
    }

    character.vertical_speed = speed;
    character.state = VerticalState::Airborne;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::plane::{HorizontalPlane, PlaneCorners};
    use crate::world::config::{CollisionConfig, GRAVITY, JUMP_SPEED};

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn flat(y: f32) -> HorizontalPlane {
        HorizontalPlane::new(PlaneCorners::new(
            Vec3::new(0.0, y, 0.0),
            Vec3::new(10.0, y, 0.0),
            Vec3::new(0.0, y, 10.0),
            Vec3::new(10.0, y, 10.0),
        ))
        .unwrap()
    }

    /// Floor at 0, ceiling at 2.
    fn room() -> SpatialIndex {
        SpatialIndex::build(Vec::new(), vec![flat(0.0), flat(2.0)], CollisionConfig::default())
    }

    #[test]
    fn test_grounded_character_stays_put() {
        let index = room();
        let mut character = CharacterState::new(Vec3::new(5.0, 0.0, 5.0));
        for _ in 0..10 {
            assert_eq!(
                step_vertical(&index, &mut character, &CharacterShape::default()),
                VerticalState::Grounded
            );
        }
        assert_eq!(character.position.y, 0.0);
        assert_eq!(character.vertical_speed, 0.0);
    }

    #[test]
    fn test_small_drop_stays_grounded() {
        let index = room();
        let mut character = CharacterState::new(Vec3::new(5.0, 0.15, 5.0));
        let state = step_vertical(&index, &mut character, &CharacterShape::default());
        assert_eq!(state, VerticalState::Grounded);
        assert_eq!(character.position.y, 0.15);
    }

    #[test]
    fn test_falls_and_lands() {
        let index = room();
        let shape = CharacterShape::default();
        let mut character = CharacterState::new(Vec3::new(5.0, 1.0, 5.0));

        assert_eq!(step_vertical(&index, &mut character, &shape), VerticalState::Airborne);
        assert!(approx_eq(character.vertical_speed, -GRAVITY));
        assert!(approx_eq(character.position.y, 1.0 - GRAVITY));

        let mut ticks = 1;
        while !character.is_grounded() {
            step_vertical(&index, &mut character, &shape);
            ticks += 1;
            assert!(ticks < 1000, "never landed");
        }
        assert_eq!(character.position.y, 0.0);
        assert_eq!(character.vertical_speed, 0.0);
    }

    #[test]
    fn test_jump_arc_returns_to_floor() {
        let index = SpatialIndex::build(Vec::new(), vec![flat(0.0)], CollisionConfig::default());
        let shape = CharacterShape::default();
        let mut character = CharacterState::new(Vec3::new(5.0, 0.0, 5.0));

        assert!(jump(&mut character, JUMP_SPEED));
        assert!(!jump(&mut character, JUMP_SPEED), "no double jump");

        let mut apex: f32 = 0.0;
        for _ in 0..200 {
            step_vertical(&index, &mut character, &shape);
            apex = apex.max(character.position.y);
            if character.is_grounded() {
                break;
            }
        }

        assert!(character.is_grounded());
        assert_eq!(character.position.y, 0.0);
        // Sum of 0.057 + 0.054 + ... down to 0
        assert!(apex > 0.5 && apex < 0.65, "apex {apex}");
    }

    #[test]
    fn test_ceiling_clamps_jump() {
        // Ceiling at 0.65 leaves 5cm above a 0.6 tall character
        let index = SpatialIndex::build(
            Vec::new(),
            vec![flat(0.0), flat(0.65)],
            CollisionConfig::default(),
        );
        let shape = CharacterShape::default();
        let mut character = CharacterState::new(Vec3::new(5.0, 0.0, 5.0));

        jump(&mut character, JUMP_SPEED);
        step_vertical(&index, &mut character, &shape);

        assert_eq!(character.vertical_speed, 0.0);
        assert!(approx_eq(character.position.y, 0.65 - 0.6 - CEILING_CLEARANCE));
        assert!(character.position.y + shape.height < 0.65);

        // Falls back down afterwards
        for _ in 0..50 {
            step_vertical(&index, &mut character, &shape);
        }
        assert!(character.is_grounded());
        assert_eq!(character.position.y, 0.0);
    }

    #[test]
    fn test_no_floor_falls_forever() {
        let index = SpatialIndex::build(Vec::new(), Vec::new(), CollisionConfig::default());
        let shape = CharacterShape::default();
        let mut character = CharacterState::new(Vec3::ZERO);
        for _ in 0..100 {
            step_vertical(&index, &mut character, &shape);
        }
        assert!(!character.is_grounded());
        assert!(character.position.y < -1.0);
    }

    #[test]
    fn test_place_on_floor() {
        let index = room();
        let shape = CharacterShape::default();

        let mut character = CharacterState::new(Vec3::new(5.0, 0.1, 5.0));
        assert!(place_on_floor(&index, &mut character, &shape));
        assert_eq!(character.position.y, 0.0);

        // Drop-offs are left to gravity
        let mut character = CharacterState::new(Vec3::new(5.0, 0.5, 5.0));
        assert!(!place_on_floor(&index, &mut character, &shape));
        assert_eq!(character.position.y, 0.5);

        // Moving vertically
        let mut character = CharacterState::new(Vec3::new(5.0, 0.1, 5.0));
        character.vertical_speed = -0.01;
        assert!(!place_on_floor(&index, &mut character, &shape));
    }
}

//! Parametric room builder
//!
//! A room is a regular-polygon floor slab with the ceiling and walls hung
//! off it as anchored children, so moving or rotating the floor carries
//! the whole room with it.

use vmfgen_core::{
    gen_polygon, Anchor, Entity, GeometryError, OptionValue, Point2, Point3, Shape,
};

/// Parameters for [`make_room`]
#[derive(Debug, Clone, PartialEq)]
pub struct RoomParams {
    /// Number of sides of the floor polygon
    pub sides: usize,
    /// Apothem of the room interior
    pub radius: f64,
    /// Clear height between floor top and ceiling bottom
    pub height: f64,
    pub wall_thickness: f64,
    pub wall_material: String,
    pub floor_material: String,
    pub ceiling_material: String,
    /// `false` skips the wall on that side
    ///
    /// Sides past the end of the mask get a wall, so an empty mask builds
    /// every wall rather than none.
    pub wall_mask: Vec<bool>,
}

impl Default for RoomParams {
    fn default() -> Self {
        Self {
            sides: 8,
            radius: 256.0,
            height: 128.0,
            wall_thickness: 16.0,
            wall_material: "brick/brickwall026f".to_string(),
            floor_material: "concrete/concretefloor033a".to_string(),
            ceiling_material: "concrete/concretefloor033a".to_string(),
            wall_mask: Vec::new(),
        }
    }
}

impl RoomParams {
    fn builds_wall(&self, side: usize) -> bool {
        self.wall_mask.get(side).copied().unwrap_or(true)
    }
}

/// Build a room as a shape tree rooted at the floor
///
/// The floor's top face sits at z = 0. Floor and ceiling polygons are
/// grown by half the wall thickness so the walls' centerlines lie on
/// their edges.
pub fn make_room(params: &RoomParams) -> Result<Shape, GeometryError> {
    let half = params.wall_thickness / 2.0;
    let polygon = gen_polygon(params.sides, params.radius + half);

    let mut floor = Shape::new(polygon.clone(), params.wall_thickness)?
        .with_pos(Point3::new(0.0, 0.0, -half))
        .with_material(params.floor_material.clone());

    // Offset from the floor's center, so it includes the floor's half
    let ceiling = Shape::new(polygon.clone(), params.wall_thickness)?
        .with_pos(Point3::new(0.0, 0.0, params.height + params.wall_thickness))
        .with_material(params.ceiling_material.clone());
    floor.add_child_shape(ceiling, Anchor::Origin)?;

    let edge = polygon[1] - polygon[0];
    let half_width = edge.length() / 2.0 + half;
    let top = params.height + params.wall_thickness;
    let wall = vec![
        Point2::new(-half_width, top),
        Point2::new(half_width, top),
        Point2::new(half_width, 0.0),
        Point2::new(-half_width, 0.0),
    ];

    let mut walls = 0;
    for side in (0..polygon.len()).filter(|&i| params.builds_wall(i)) {
        let shape = Shape::new(wall.clone(), params.wall_thickness)?
            .with_material(params.wall_material.clone());
        floor.add_child_shape(shape, Anchor::Side(side))?;
        walls += 1;
    }

    log::debug!("Built {}-sided room with {} walls", params.sides, walls);
    Ok(floor)
}

/// Put an `info_player_start` just above the floor's top face
pub fn add_player_start(floor: &mut Shape) -> Result<(), GeometryError> {
    let start = Entity::new("info_player_start", Point3::new(0.0, 0.0, 10.0))?
        .with_options([("angles", OptionValue::Point(Point3::ZERO))])?;
    floor.add_child_entity(start, Anchor::Top)
}

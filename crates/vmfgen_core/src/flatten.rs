//! Shape tree flattening
//!
//! Walks a shape tree depth-first with an explicit stack, accumulating each
//! anchor's offset and orientation, and produces one global-space record per
//! shape and entity. Emission order is: a shape's brush, then its child
//! entities, then each child shape's subtree in the order they were added.

use vmfgen_math::Point3;

use crate::entity::Entity;
use crate::error::GeometryError;
use crate::record::{EntityRecord, Flattened};
use crate::shape::Shape;

/// One level of the traversal
struct Frame<'a> {
    shape: &'a Shape,
    /// Index of the next child shape to visit
    next_child: usize,
    /// Accumulated transform of the frame `shape` is placed in
    pos: Point3,
    angle: Point3,
}

/// Flatten a shape tree rooted in the world frame
pub fn flatten(root: &Shape) -> Result<Flattened, GeometryError> {
    let mut out = Flattened::default();
    flatten_into(root, Point3::ZERO, Point3::ZERO, &mut out)?;
    Ok(out)
}

/// Flatten a shape tree placed in the given frame, appending to `out`
///
/// On error `out` may hold records from the part of the tree visited so far.
pub fn flatten_into(
    root: &Shape,
    pos: Point3,
    angle: Point3,
    out: &mut Flattened,
) -> Result<(), GeometryError> {
    emit_shape(root, pos, angle, out)?;

    let mut stack = vec![Frame { shape: root, next_child: 0, pos, angle }];
    while let Some(frame) = stack.last_mut() {
        let parent = frame.shape;
        let Some((anchor, child)) = parent.child_shapes().get(frame.next_child) else {
            // Siblings of the popped frame resume from their own frame's
            // accumulation, never from the finished branch
            stack.pop();
            continue;
        };
        frame.next_child += 1;

        let (offset, turn) = parent.child_offset(*anchor)?;
        let child_pos = frame.pos + offset;
        let child_angle = frame.angle + turn;

        emit_shape(child, child_pos, child_angle, out)?;
        stack.push(Frame {
            shape: child,
            next_child: 0,
            pos: child_pos,
            angle: child_angle,
        });
    }

    log::debug!(
        "Flattened tree: {} solids, {} entities so far",
        out.solids.len(),
        out.entities.len()
    );
    Ok(())
}

/// Build an entity's record placed at `pos`, appending it to `out`
///
/// The entity's own solids keep world coordinates, independent of where
/// the entity is attached. Entities owned by those solids follow it in
/// `out.entities`.
pub fn emit_entity(
    entity: &Entity,
    pos: Point3,
    out: &mut Flattened,
) -> Result<(), GeometryError> {
    let origin = pos + entity.origin();

    let mut owned = Flattened::default();
    for solid in entity.solids() {
        flatten_into(solid, Point3::ZERO, Point3::ZERO, &mut owned)?;
    }

    out.entities.push(EntityRecord {
        classname: entity.classname().to_string(),
        origin,
        options: entity.option_fields(),
        solids: owned.solids,
    });
    out.entities.extend(owned.entities);
    Ok(())
}

/// Emit one shape's brush followed by its child entities
fn emit_shape(shape: &Shape, pos: Point3, angle: Point3, out: &mut Flattened) -> Result<(), GeometryError> {
    out.solids.push(shape.to_brush_record(pos, angle)?);

    for (anchor, entity) in shape.child_entities() {
        let (offset, _) = shape.child_offset(*anchor)?;
        emit_entity(entity, pos + offset, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Anchor;
    use vmfgen_math::{gen_polygon, Point2};

    fn square(half: f64) -> Vec<Point2> {
        vec![
            Point2::new(half, -half),
            Point2::new(-half, -half),
            Point2::new(-half, half),
            Point2::new(half, half),
        ]
    }

    /// A shape whose top face sits at `z + 1` in its own frame
    fn marker(z: f64) -> Shape {
        Shape::new(square(1.0), 2.0).unwrap().with_pos(Point3::new(0.0, 0.0, z))
    }

    fn top_z(out: &Flattened, index: usize) -> f64 {
        out.solids[index].sides[0].plane[0].z
    }

    #[test]
    fn test_leaf_emits_one_brush() {
        let shape = Shape::new(gen_polygon(5, 10.0), 4.0).unwrap();
        let out = flatten(&shape).unwrap();
        assert_eq!(out.solids.len(), 1);
        assert_eq!(out.solids[0].sides.len(), 7);
        assert!(out.entities.is_empty());
    }

    #[test]
    fn test_side_child_and_top_entity() {
        let mut root = Shape::new(square(8.0), 16.0)
            .unwrap()
            .with_pos(Point3::new(10.0, 20.0, 30.0));
        root.add_child_shape(Shape::new(square(2.0), 2.0).unwrap(), Anchor::Side(0)).unwrap();
        root.add_child_entity(
            Entity::new("info_player_start", Point3::new(0.0, 0.0, 10.0)).unwrap(),
            Anchor::Top,
        )
        .unwrap();

        let out = flatten(&root).unwrap();
        assert_eq!(out.solids.len(), 2);
        assert_eq!(out.entities.len(), 1);
        // Root first: its top face is at 30 + 8
        assert_eq!(top_z(&out, 0), 38.0);
        assert_eq!(out.entities[0].origin, Point3::new(10.0, 20.0, 48.0));
    }

    #[test]
    fn test_depth_first_order() {
        // root -> (a -> (a1, a2), b)
        let mut a = marker(10.0);
        a.add_child_shape(marker(100.0), Anchor::Origin).unwrap();
        a.add_child_shape(marker(200.0), Anchor::Origin).unwrap();
        let mut root = marker(0.0);
        root.add_child_shape(a, Anchor::Origin).unwrap();
        root.add_child_shape(marker(1000.0), Anchor::Origin).unwrap();

        let out = flatten(&root).unwrap();
        let zs: Vec<f64> = (0..out.solids.len()).map(|i| top_z(&out, i)).collect();
        // a1 = root + a + a1, a2 likewise; b must not pick up a's offset
        assert_eq!(zs, vec![1.0, 11.0, 111.0, 211.0, 1001.0]);
    }

    #[test]
    fn test_offsets_accumulate_through_anchors() {
        // Each level stacks on the parent's top face
        let mut mid = Shape::new(square(4.0), 4.0).unwrap();
        mid.add_child_shape(Shape::new(square(4.0), 4.0).unwrap(), Anchor::Top).unwrap();
        let mut root = Shape::new(square(4.0), 4.0).unwrap().with_pos(Point3::new(0.0, 0.0, 50.0));
        root.add_child_shape(mid, Anchor::Top).unwrap();

        let out = flatten(&root).unwrap();
        // root top 52; mid centered at 52, top 54; leaf centered at 54, top 56
        assert_eq!(top_z(&out, 0), 52.0);
        assert_eq!(top_z(&out, 1), 54.0);
        assert_eq!(top_z(&out, 2), 56.0);
    }

    #[test]
    fn test_child_entities_follow_their_shape() {
        let mut child = marker(5.0);
        child
            .add_child_entity(Entity::new("info_player_start", Point3::ZERO).unwrap(), Anchor::Origin)
            .unwrap();
        let mut root = marker(0.0);
        root.add_child_entity(Entity::new("info_player_start", Point3::ZERO).unwrap(), Anchor::Origin)
            .unwrap();
        root.add_child_shape(child, Anchor::Origin).unwrap();

        let out = flatten(&root).unwrap();
        assert_eq!(out.entities.len(), 2);
        assert_eq!(out.entities[0].origin, Point3::ZERO);
        // child frame is root's origin anchor, plus the child's own pos
        assert_eq!(out.entities[1].origin, Point3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_brush_entity_solids_keep_world_coordinates() {
        let mut door = Entity::from_def(crate::EntityDef::new("func_door", Vec::new()), Point3::new(0.0, 0.0, 64.0));
        door.add_solid(marker(0.0));
        let mut root = marker(0.0);
        root.add_child_entity(door, Anchor::Origin).unwrap();

        let out = flatten(&root).unwrap();
        assert_eq!(out.solids.len(), 1);
        assert_eq!(out.entities.len(), 1);
        assert_eq!(out.entities[0].solids.len(), 1);
        assert_eq!(out.entities[0].origin, Point3::new(0.0, 0.0, 64.0));
        assert_eq!(out.entities[0].solids[0].sides[0].plane[0].z, 1.0);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut shape = marker(1.0);
        for _ in 0..2_000 {
            let mut parent = marker(1.0);
            parent.add_child_shape(shape, Anchor::Origin).unwrap();
            shape = parent;
        }
        let out = flatten(&shape).unwrap();
        assert_eq!(out.solids.len(), 2_001);
        // Innermost shape sits 2001 levels of +1 up, top face 1 above that
        assert_eq!(top_z(&out, 2_000), 2_002.0);
    }
}

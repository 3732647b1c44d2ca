//! Map template validation
//!
//! Checks a [`MapTemplate`] for problems before anything is built, and
//! reports every problem found rather than stopping at the first one.

use thiserror::Error;

use crate::entity::Entity;
use crate::shape::Anchor;
use crate::template::{EntityTemplate, MapTemplate, ShapeTemplate};

/// Validation problem found in a map template
///
/// `path` locates the offending item, e.g. `shapes[0].children[2]`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Map has no shapes and no entities
    #[error("Map has no shapes or entities")]
    EmptyMap,
    /// Polygon has fewer than 3 points
    #[error("{path}: polygon has {count} points (need at least 3)")]
    TooFewPoints { path: String, count: usize },
    /// Thickness is zero, negative or not finite
    #[error("{path}: thickness {thickness} is not positive")]
    NonPositiveThickness { path: String, thickness: f64 },
    /// Side anchor beyond the parent's side count
    #[error("{path}: anchored to side {side} but the parent has {sides} sides")]
    AnchorOutOfRange { path: String, side: usize, sides: usize },
    /// Explicit per-face list of the wrong length
    #[error("{path}: {what} has {actual} entries, expected {expected}")]
    FaceArity {
        path: String,
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Entity class or options rejected by the schema
    #[error("{path}: {message}")]
    InvalidEntity { path: String, message: String },
}

/// Static checks on map templates
pub struct MapValidator;

impl MapValidator {
    /// Validate a map template, returning all problems found
    ///
    /// Returns an empty vector if no problems are detected.
    pub fn validate(map: &MapTemplate) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if map.shapes.is_empty() && map.entities.is_empty() {
            errors.push(ValidationError::EmptyMap);
        }

        let mut shapes: Vec<(String, &ShapeTemplate)> = map
            .shapes
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("shapes[{}]", i), s))
            .collect();
        for (i, entity) in map.entities.iter().enumerate() {
            let path = format!("entities[{}]", i);
            Self::check_entity(&path, entity, &mut errors);
            push_solids(&path, entity, &mut shapes);
        }

        while let Some((path, shape)) = shapes.pop() {
            let sides = Self::check_shape(&path, shape, &mut errors);

            for (i, child) in shape.entities.iter().enumerate() {
                let child_path = format!("{}.entities[{}]", path, i);
                Self::check_anchor(&child_path, child.anchor, sides, &mut errors);
                Self::check_entity(&child_path, &child.entity, &mut errors);
                push_solids(&child_path, &child.entity, &mut shapes);
            }
            for (i, child) in shape.children.iter().enumerate() {
                let child_path = format!("{}.children[{}]", path, i);
                Self::check_anchor(&child_path, child.anchor, sides, &mut errors);
                shapes.push((child_path, &child.shape));
            }
        }

        errors
    }

    /// Check one shape's own fields; returns its side count
    fn check_shape(path: &str, shape: &ShapeTemplate, errors: &mut Vec<ValidationError>) -> usize {
        let sides = shape.polygon.points().len();
        if sides < 3 {
            errors.push(ValidationError::TooFewPoints { path: path.to_string(), count: sides });
        }
        if !(shape.thickness > 0.0 && shape.thickness.is_finite()) {
            errors.push(ValidationError::NonPositiveThickness {
                path: path.to_string(),
                thickness: shape.thickness,
            });
        }

        let faces = sides + 2;
        if let Some(materials) = &shape.materials {
            if materials.len() != faces {
                errors.push(ValidationError::FaceArity {
                    path: path.to_string(),
                    what: "materials",
                    expected: faces,
                    actual: materials.len(),
                });
            }
        }
        if let Some(uvs) = &shape.uvs {
            if uvs.len() != faces {
                errors.push(ValidationError::FaceArity {
                    path: path.to_string(),
                    what: "uvs",
                    expected: faces,
                    actual: uvs.len(),
                });
            }
        }
        sides
    }

    fn check_anchor(path: &str, anchor: Anchor, sides: usize, errors: &mut Vec<ValidationError>) {
        if let Anchor::Side(side) = anchor {
            if side >= sides {
                errors.push(ValidationError::AnchorOutOfRange { path: path.to_string(), side, sides });
            }
        }
    }

    fn check_entity(path: &str, entity: &EntityTemplate, errors: &mut Vec<ValidationError>) {
        let result = Entity::new(&entity.classname, entity.origin).and_then(|e| match &entity.options {
            Some(options) => e.with_options(options.iter().map(|(k, v)| (k.clone(), v.clone()))),
            None => Ok(e),
        });
        if let Err(e) = result {
            errors.push(ValidationError::InvalidEntity { path: path.to_string(), message: e.to_string() });
        }
    }
}

fn push_solids<'a>(path: &str, entity: &'a EntityTemplate, shapes: &mut Vec<(String, &'a ShapeTemplate)>) {
    for (i, solid) in entity.solids.iter().enumerate() {
        shapes.push((format!("{}.solids[{}]", path, i), solid));
    }
}

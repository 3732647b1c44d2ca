//! Errors raised while building or generating brush geometry

use thiserror::Error;
use crate::entity::OptionKind;

/// Error type for shape and entity construction
///
/// Every variant is fatal for the object being built; nothing is emitted
/// for a tree that produces one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The polygon, thickness, face plane or anchor cannot form a valid brush
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// An explicit per-face list does not have one entry per face
    #[error("{what} has {actual} entries but the shape has {expected} faces")]
    ArityMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// An entity option value does not match the type of its default
    #[error("option '{option}' of '{classname}' is {actual} but should be {expected}")]
    SchemaMismatch {
        classname: String,
        option: String,
        expected: OptionKind,
        actual: OptionKind,
    },
    /// No entity definition exists for the class name
    #[error("unknown entity class '{0}'")]
    UnknownEntityClass(String),
    /// The option is not part of the entity's schema
    #[error("entity class '{classname}' has no option '{option}'")]
    UnknownOption { classname: String, option: String },
}

impl GeometryError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GeometryError::InvalidGeometry(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_geometry_display() {
        let err = GeometryError::invalid("polygon needs at least 3 points, got 2");
        let msg = err.to_string();
        assert!(msg.contains("invalid geometry"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn test_arity_display() {
        let err = GeometryError::ArityMismatch { what: "materials", expected: 6, actual: 5 };
        assert_eq!(err.to_string(), "materials has 5 entries but the shape has 6 faces");
    }

    #[test]
    fn test_schema_display() {
        let err = GeometryError::SchemaMismatch {
            classname: "info_player_start".to_string(),
            option: "angles".to_string(),
            expected: OptionKind::Point,
            actual: OptionKind::Text,
        };
        let msg = err.to_string();
        assert!(msg.contains("angles"));
        assert!(msg.contains("point"));
        assert!(msg.contains("text"));
    }
}

//! Entities and their option schemas
//!
//! Each entity class has a fixed set of options, each with a typed default.
//! Values supplied for an entity must have the same type as the default.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Deserialize};
use vmfgen_math::{Point3, PRECISION};

use crate::error::GeometryError;
use crate::shape::Shape;

/// A typed entity option value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    Point(Point3),
    Float(f64),
    Int(i64),
    Text(String),
}

/// The type of an [`OptionValue`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Point,
    Float,
    Int,
    Text,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::Point => "point",
            OptionKind::Float => "float",
            OptionKind::Int => "int",
            OptionKind::Text => "text",
        };
        f.write_str(name)
    }
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Point(_) => OptionKind::Point,
            OptionValue::Float(_) => OptionKind::Float,
            OptionValue::Int(_) => OptionKind::Int,
            OptionValue::Text(_) => OptionKind::Text,
        }
    }

    /// Value as written to an entity block
    pub fn to_vmf_string(&self) -> String {
        match self {
            OptionValue::Point(p) => p.to_string(),
            OptionValue::Float(v) => format!("{:.p$}", v, p = PRECISION),
            OptionValue::Int(v) => v.to_string(),
            OptionValue::Text(s) => s.clone(),
        }
    }
}

/// One option in an entity class schema
#[derive(Clone, Debug, PartialEq)]
pub struct OptionDef {
    pub name: String,
    pub default: OptionValue,
}

impl OptionDef {
    pub fn new(name: impl Into<String>, default: OptionValue) -> Self {
        Self { name: name.into(), default }
    }
}

/// An entity class: its name and ordered option schema
#[derive(Clone, Debug, PartialEq)]
pub struct EntityDef {
    pub classname: String,
    pub options: Vec<OptionDef>,
}

impl EntityDef {
    pub fn new(classname: impl Into<String>, options: Vec<OptionDef>) -> Self {
        Self { classname: classname.into(), options }
    }

    /// Look up one of the built-in entity classes
    pub fn builtin(classname: &str) -> Option<Self> {
        match classname {
            "info_player_start" => Some(Self::new(
                "info_player_start",
                vec![OptionDef::new("angles", OptionValue::Point(Point3::ZERO))],
            )),
            _ => None,
        }
    }

    fn option(&self, name: &str) -> Option<&OptionDef> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// An entity placed in the map
///
/// Entities are leaves of the shape tree. A brush entity may additionally
/// own solids, which stay in world coordinates wherever the entity is
/// attached.
#[derive(Clone, Debug)]
pub struct Entity {
    def: EntityDef,
    origin: Point3,
    /// `None` writes no option fields at all; `Some` writes every schema
    /// option, falling back to defaults for missing ones
    options: Option<HashMap<String, OptionValue>>,
    solids: Vec<Shape>,
}

impl Entity {
    /// Create an entity of a built-in class
    pub fn new(classname: &str, origin: Point3) -> Result<Self, GeometryError> {
        let def = EntityDef::builtin(classname)
            .ok_or_else(|| GeometryError::UnknownEntityClass(classname.to_string()))?;
        Ok(Self::from_def(def, origin))
    }

    /// Create an entity of a caller-defined class
    pub fn from_def(def: EntityDef, origin: Point3) -> Self {
        Self {
            def,
            origin,
            options: None,
            solids: Vec::new(),
        }
    }

    /// Set option values, checking each against the class schema
    pub fn with_options<K, I>(mut self, options: I) -> Result<Self, GeometryError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, OptionValue)>,
    {
        let mut values = HashMap::new();
        for (name, value) in options {
            let name = name.into();
            let def = self.def.option(&name).ok_or_else(|| GeometryError::UnknownOption {
                classname: self.def.classname.clone(),
                option: name.clone(),
            })?;
            if def.default.kind() != value.kind() {
                return Err(GeometryError::SchemaMismatch {
                    classname: self.def.classname.clone(),
                    option: name,
                    expected: def.default.kind(),
                    actual: value.kind(),
                });
            }
            values.insert(name, value);
        }
        self.options = Some(values);
        Ok(self)
    }

    /// Give this entity a brush
    pub fn add_solid(&mut self, shape: Shape) {
        self.solids.push(shape);
    }

    pub fn classname(&self) -> &str {
        &self.def.classname
    }

    pub fn def(&self) -> &EntityDef {
        &self.def
    }

    /// Origin relative to the frame the entity is attached in
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn solids(&self) -> &[Shape] {
        &self.solids
    }

    /// Formatted option fields in schema order
    pub fn option_fields(&self) -> Vec<(String, String)> {
        let Some(values) = &self.options else {
            return Vec::new();
        };
        self.def
            .options
            .iter()
            .map(|def| {
                let value = values.get(&def.name).unwrap_or(&def.default);
                (def.name.clone(), value.to_vmf_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_player_start() {
        let entity = Entity::new("info_player_start", Point3::new(0.0, 0.0, 10.0)).unwrap();
        assert_eq!(entity.classname(), "info_player_start");
        assert_eq!(entity.origin(), Point3::new(0.0, 0.0, 10.0));
        assert!(entity.option_fields().is_empty());
    }

    #[test]
    fn test_unknown_class() {
        let err = Entity::new("npc_nonexistent", Point3::ZERO).unwrap_err();
        assert_eq!(err, GeometryError::UnknownEntityClass("npc_nonexistent".to_string()));
    }

    #[test]
    fn test_options_written_in_schema_order_with_defaults() {
        let def = EntityDef::new(
            "light",
            vec![
                OptionDef::new("_light", OptionValue::Text("255 255 255 200".to_string())),
                OptionDef::new("_fifty_percent_distance", OptionValue::Float(0.0)),
                OptionDef::new("style", OptionValue::Int(0)),
            ],
        );
        let entity = Entity::from_def(def, Point3::ZERO)
            .with_options([("style", OptionValue::Int(5))])
            .unwrap();
        assert_eq!(
            entity.option_fields(),
            vec![
                ("_light".to_string(), "255 255 255 200".to_string()),
                ("_fifty_percent_distance".to_string(), "0.000".to_string()),
                ("style".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_point_option_formatting() {
        let entity = Entity::new("info_player_start", Point3::ZERO)
            .unwrap()
            .with_options([("angles", OptionValue::Point(Point3::new(0.0, 90.0, 0.0)))])
            .unwrap();
        assert_eq!(
            entity.option_fields(),
            vec![("angles".to_string(), "0.000 90.000 0.000".to_string())]
        );
    }

    #[test]
    fn test_schema_mismatch() {
        let err = Entity::new("info_player_start", Point3::ZERO)
            .unwrap()
            .with_options([("angles", OptionValue::Float(90.0))])
            .unwrap_err();
        match err {
            GeometryError::SchemaMismatch { option, expected, actual, .. } => {
                assert_eq!(option, "angles");
                assert_eq!(expected, OptionKind::Point);
                assert_eq!(actual, OptionKind::Float);
            }
            other => panic!("Expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_option() {
        let err = Entity::new("info_player_start", Point3::ZERO)
            .unwrap()
            .with_options([("health", OptionValue::Int(100))])
            .unwrap_err();
        assert!(matches!(err, GeometryError::UnknownOption { .. }));
    }

    #[test]
    fn test_empty_options_write_defaults() {
        let entity = Entity::new("info_player_start", Point3::ZERO)
            .unwrap()
            .with_options(Vec::<(String, OptionValue)>::new())
            .unwrap();
        assert_eq!(
            entity.option_fields(),
            vec![("angles".to_string(), "0.000 0.000 0.000".to_string())]
        );
    }
}

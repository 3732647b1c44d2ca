//! Serializable map templates
//!
//! A [`MapTemplate`] describes a map as data: shape trees with their
//! anchored children, plus standalone entities. Templates are stored as RON
//! and turned into a [`Vmf`] with [`MapTemplate::to_vmf`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;
use vmfgen_math::{gen_polygon, Point2, Point3};

use crate::entity::{Entity, OptionValue};
use crate::error::GeometryError;
use crate::shape::{Anchor, Shape};
use crate::uv::UVFace;
use crate::vmf::Vmf;

/// Cross-section of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PolygonTemplate {
    /// Regular polygon from [`gen_polygon`]; `radius` is the apothem
    Regular { sides: usize, radius: f64 },
    /// Explicit clockwise points starting at minimum Y
    Points(Vec<Point2>),
}

impl PolygonTemplate {
    pub fn points(&self) -> Vec<Point2> {
        match self {
            PolygonTemplate::Regular { sides, radius } => gen_polygon(*sides, *radius),
            PolygonTemplate::Points(points) => points.clone(),
        }
    }
}

/// Serializable shape with its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeTemplate {
    pub polygon: PolygonTemplate,
    pub thickness: f64,
    #[serde(default)]
    pub pos: Point3,
    #[serde(default)]
    pub angle: Point3,
    #[serde(default)]
    pub top_slope: f64,
    #[serde(default)]
    pub bottom_slope: f64,
    /// One material for every face
    #[serde(default)]
    pub material: Option<String>,
    /// Per-face materials (top, bottom, sides); wins over `material`
    #[serde(default)]
    pub materials: Option<Vec<String>>,
    #[serde(default)]
    pub uvs: Option<Vec<UVFace>>,
    #[serde(default)]
    pub children: Vec<ChildShapeTemplate>,
    #[serde(default)]
    pub entities: Vec<ChildEntityTemplate>,
}

/// A child shape and the parent face it is anchored to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildShapeTemplate {
    pub anchor: Anchor,
    pub shape: ShapeTemplate,
}

/// A child entity and the parent face it is anchored to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildEntityTemplate {
    pub anchor: Anchor,
    pub entity: EntityTemplate,
}

/// Serializable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub classname: String,
    #[serde(default)]
    pub origin: Point3,
    /// `None` writes no option fields
    #[serde(default)]
    pub options: Option<BTreeMap<String, OptionValue>>,
    /// Brushes for a brush entity, in world coordinates
    #[serde(default)]
    pub solids: Vec<ShapeTemplate>,
}

impl ShapeTemplate {
    /// Shape template with default placement, materials and no children
    pub fn new(polygon: PolygonTemplate, thickness: f64) -> Self {
        Self {
            polygon,
            thickness,
            pos: Point3::ZERO,
            angle: Point3::ZERO,
            top_slope: 0.0,
            bottom_slope: 0.0,
            material: None,
            materials: None,
            uvs: None,
            children: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Build the shape and all its children
    pub fn to_shape(&self) -> Result<Shape, GeometryError> {
        let mut shape = Shape::new(self.polygon.points(), self.thickness)?
            .with_pos(self.pos)
            .with_angle(self.angle)
            .with_top_slope(self.top_slope)
            .with_bottom_slope(self.bottom_slope);

        if let Some(material) = &self.material {
            shape = shape.with_material(material.clone());
        }
        if let Some(materials) = &self.materials {
            shape = shape.with_materials(materials.clone())?;
        }
        if let Some(uvs) = &self.uvs {
            shape = shape.with_uvs(uvs.clone())?;
        }

        for child in &self.entities {
            shape.add_child_entity(child.entity.to_entity()?, child.anchor)?;
        }
        for child in &self.children {
            shape.add_child_shape(child.shape.to_shape()?, child.anchor)?;
        }
        Ok(shape)
    }
}

impl EntityTemplate {
    pub fn new(classname: impl Into<String>, origin: Point3) -> Self {
        Self {
            classname: classname.into(),
            origin,
            options: None,
            solids: Vec::new(),
        }
    }

    /// Build the entity, checking its options against the class schema
    pub fn to_entity(&self) -> Result<Entity, GeometryError> {
        let mut entity = Entity::new(&self.classname, self.origin)?;
        if let Some(options) = &self.options {
            entity = entity.with_options(options.iter().map(|(k, v)| (k.clone(), v.clone())))?;
        }
        for solid in &self.solids {
            entity.add_solid(solid.to_shape()?);
        }
        Ok(entity)
    }
}

/// A serializable map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapTemplate {
    /// Map name (for display/debugging)
    pub name: String,
    #[serde(default)]
    pub prefab: bool,
    #[serde(default)]
    pub shapes: Vec<ShapeTemplate>,
    #[serde(default)]
    pub entities: Vec<EntityTemplate>,
}

impl MapTemplate {
    /// Create a new empty map template
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefab: false,
            shapes: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Load a map template from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a map template from RON text
    pub fn from_ron(contents: &str) -> Result<Self, MapLoadError> {
        Ok(ron::from_str(contents)?)
    }

    /// Save a map template to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MapSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn add_shape(&mut self, shape: ShapeTemplate) {
        self.shapes.push(shape);
    }

    pub fn add_entity(&mut self, entity: EntityTemplate) {
        self.entities.push(entity);
    }

    /// Build every shape and entity into a map
    pub fn to_vmf(&self) -> Result<Vmf, GeometryError> {
        let mut vmf = Vmf::new(self.prefab);
        for shape in &self.shapes {
            vmf.add_shape(shape.to_shape()?);
        }
        for entity in &self.entities {
            vmf.add_entity(entity.to_entity()?);
        }
        Ok(vmf)
    }
}

/// Error loading a map template
#[derive(Debug, Error)]
pub enum MapLoadError {
    /// IO error (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Parse error (invalid RON syntax or structure)
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Error saving a map template
#[derive(Debug, Error)]
pub enum MapSaveError {
    /// IO error (permission denied, disk full, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Serialization error
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_template() -> MapTemplate {
        let mut floor = ShapeTemplate::new(PolygonTemplate::Regular { sides: 6, radius: 128.0 }, 16.0);
        floor.material = Some("concrete/concretefloor033a".to_string());
        floor.children.push(ChildShapeTemplate {
            anchor: Anchor::Side(0),
            shape: ShapeTemplate::new(
                PolygonTemplate::Points(vec![
                    Point2::new(-64.0, 128.0),
                    Point2::new(64.0, 128.0),
                    Point2::new(64.0, 0.0),
                    Point2::new(-64.0, 0.0),
                ]),
                16.0,
            ),
        });
        let mut start = EntityTemplate::new("info_player_start", Point3::new(0.0, 0.0, 10.0));
        start.options = Some(BTreeMap::from([(
            "angles".to_string(),
            OptionValue::Point(Point3::ZERO),
        )]));
        floor.entities.push(ChildEntityTemplate { anchor: Anchor::Top, entity: start });

        let mut map = MapTemplate::new("Test Room");
        map.add_shape(floor);
        map
    }

    #[test]
    fn test_ron_round_trip() {
        let map = room_template();
        let text = ron::ser::to_string_pretty(&map, ron::ser::PrettyConfig::new()).unwrap();
        let back = MapTemplate::from_ron(&text).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_minimal_ron_uses_defaults() {
        let text = r#"(
            name: "Box",
            shapes: [
                (
                    polygon: Regular(sides: 4, radius: 32.0),
                    thickness: 8.0,
                ),
            ],
        )"#;
        let map = MapTemplate::from_ron(text).unwrap();
        assert!(!map.prefab);
        assert_eq!(map.shapes[0].pos, Point3::ZERO);
        assert!(map.shapes[0].children.is_empty());
        assert!(map.entities.is_empty());
    }

    #[test]
    fn test_to_vmf() {
        let vmf = room_template().to_vmf().unwrap();
        let document = vmf.build_document().unwrap();
        assert_eq!(document.world.solids.len(), 2);
        assert_eq!(document.entities.len(), 1);
        assert_eq!(document.entities[0].origin, Point3::new(0.0, 0.0, 18.0));
        assert_eq!(document.world.solids[0].sides[0].material, "concrete/concretefloor033a");
    }

    #[test]
    fn test_to_vmf_reports_bad_option() {
        let mut map = room_template();
        map.shapes[0].entities[0].entity.options = Some(BTreeMap::from([(
            "angles".to_string(),
            OptionValue::Text("0 0 0".to_string()),
        )]));
        let err = map.to_vmf().unwrap_err();
        assert!(matches!(err, GeometryError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = MapTemplate::from_ron("(name: ").unwrap_err();
        assert!(matches!(err, MapLoadError::Parse(_)));
    }
}

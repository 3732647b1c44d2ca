//! Top-level map container

use vmfgen_math::Point3;

use crate::entity::Entity;
use crate::error::GeometryError;
use crate::flatten::{emit_entity, flatten_into};
use crate::record::{Document, Flattened, VersionInfo, WorldRecord};
use crate::shape::Shape;
use crate::writer::VmfWriter;

/// A map made of root shapes and standalone entities
///
/// # Example
/// ```
/// use vmfgen_core::{gen_polygon, Shape, Vmf};
///
/// let mut vmf = Vmf::new(false);
/// vmf.add_shape(Shape::new(gen_polygon(8, 256.0), 16.0).unwrap());
/// let text = vmf.generate().unwrap();
/// assert!(text.starts_with("versioninfo\n"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Vmf {
    shapes: Vec<Shape>,
    entities: Vec<Entity>,
    prefab: bool,
}

impl Vmf {
    /// Create an empty map; `prefab` marks it as a prefab in `versioninfo`
    pub fn new(prefab: bool) -> Self {
        Self {
            shapes: Vec::new(),
            entities: Vec::new(),
            prefab,
        }
    }

    /// Add a root shape (and everything attached to it)
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Add an entity placed directly in world space
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn is_prefab(&self) -> bool {
        self.prefab
    }

    /// Flatten every tree into one document
    ///
    /// Tree entities come first, in tree order, followed by standalone ones.
    pub fn build_document(&self) -> Result<Document, GeometryError> {
        let mut flat = Flattened::default();
        for shape in &self.shapes {
            flatten_into(shape, Point3::ZERO, Point3::ZERO, &mut flat)?;
        }
        for entity in &self.entities {
            emit_entity(entity, Point3::ZERO, &mut flat)?;
        }

        log::debug!(
            "Built document: {} root shapes -> {} solids, {} entities",
            self.shapes.len(),
            flat.solids.len(),
            flat.entities.len()
        );

        Ok(Document {
            version_info: VersionInfo {
                prefab: self.prefab,
                ..VersionInfo::default()
            },
            world: WorldRecord {
                solids: flat.solids,
                ..WorldRecord::default()
            },
            entities: flat.entities,
        })
    }

    /// Generate the VMF text
    ///
    /// Either the whole document is produced or an error is returned; a
    /// failing tree never yields partial text.
    pub fn generate(&self) -> Result<String, GeometryError> {
        let document = self.build_document()?;
        Ok(VmfWriter::new().write_document(&document))
    }
}

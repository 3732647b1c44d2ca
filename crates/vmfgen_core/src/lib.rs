//! Core types for generating Valve Map Format (VMF) files
//!
//! This crate turns a tree of extruded-polygon brushes into VMF text:
//!
//! - [`UVFace`] - Texture projection for one brush face
//! - [`Shape`] - A convex brush with face-anchored children
//! - [`Anchor`] - Which face of a parent a child is placed against
//! - [`Entity`] - A point (or brush) entity with a typed option schema
//! - [`flatten`] - Walks a shape tree into global-space records
//! - [`Vmf`] - Container that generates the final document
//! - [`KvNode`] - Generic reader/writer for KeyValues text
//! - [`MapTemplate`] - Serializable (RON) description of a map
//! - [`MapValidator`] - Static checks on map templates

mod error;
mod uv;
mod shape;
mod entity;
pub mod record;
pub mod flatten;
pub mod writer;
mod vmf;
pub mod keyvalues;
mod template;
mod validator;

pub use error::GeometryError;
pub use uv::UVFace;
pub use shape::{Shape, Anchor, DEFAULT_MATERIAL, TOP_FACE, BOTTOM_FACE, FIRST_SIDE_FACE};
pub use entity::{Entity, EntityDef, OptionDef, OptionKind, OptionValue};
pub use record::{Document, EntityRecord, Flattened, SideRecord, SolidRecord, VersionInfo, WorldRecord};
pub use flatten::flatten;
pub use writer::{IdAllocator, VmfWriter};
pub use vmf::Vmf;
pub use keyvalues::{KvEntry, KvNode, KeyValuesError};
pub use template::{
    ChildEntityTemplate, ChildShapeTemplate, EntityTemplate, MapLoadError, MapSaveError,
    MapTemplate, PolygonTemplate, ShapeTemplate,
};
pub use validator::{MapValidator, ValidationError};

// Re-export the geometry primitives for convenience
pub use vmfgen_math::{gen_polygon, Point2, Point3, PRECISION};

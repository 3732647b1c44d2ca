//! Flattened, global-space records ready for serialization
//!
//! Records carry no IDs. IDs are handed out by the writer as each block is
//! emitted, so a record tree can be written any number of times and always
//! produce the same text.

use vmfgen_math::Point3;
use crate::uv::UVFace;

/// One face of a brush: a plane through three points plus its surface
#[derive(Clone, Debug, PartialEq)]
pub struct SideRecord {
    /// Three points on the face plane, wound so the normal points outward
    pub plane: [Point3; 3],
    pub material: String,
    /// Projection already rotated into world space
    pub uv: UVFace,
}

/// A brush (`solid` block)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolidRecord {
    pub sides: Vec<SideRecord>,
}

/// An `entity` block
#[derive(Clone, Debug, PartialEq)]
pub struct EntityRecord {
    pub classname: String,
    pub origin: Point3,
    /// Option key/value pairs in schema order, already formatted
    pub options: Vec<(String, String)>,
    /// Brushes owned by a brush entity
    pub solids: Vec<SolidRecord>,
}

/// The `versioninfo` block
#[derive(Clone, Debug, PartialEq)]
pub struct VersionInfo {
    pub editor_version: u32,
    pub editor_build: u32,
    pub map_version: u32,
    pub format_version: u32,
    pub prefab: bool,
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            editor_version: 400,
            editor_build: 8870,
            map_version: 0,
            format_version: 100,
            prefab: false,
        }
    }
}

/// The `world` block and the brushes it holds
#[derive(Clone, Debug, PartialEq)]
pub struct WorldRecord {
    pub map_version: u32,
    pub classname: String,
    pub detail_material: String,
    pub detail_vbsp: String,
    pub max_prop_screen_width: i32,
    pub sky_name: String,
    pub solids: Vec<SolidRecord>,
}

impl Default for WorldRecord {
    fn default() -> Self {
        Self {
            map_version: 1,
            classname: "worldspawn".to_string(),
            detail_material: "detail/detailsprites".to_string(),
            detail_vbsp: "detail.vbsp".to_string(),
            max_prop_screen_width: -1,
            sky_name: "sky_day01_01".to_string(),
            solids: Vec::new(),
        }
    }
}

/// Output of flattening one or more trees: brushes and entities in emission order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flattened {
    pub solids: Vec<SolidRecord>,
    pub entities: Vec<EntityRecord>,
}

impl Flattened {
    /// Append another flattened tree after this one
    pub fn extend(&mut self, other: Flattened) {
        self.solids.extend(other.solids);
        self.entities.extend(other.entities);
    }
}

/// A complete VMF document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub version_info: VersionInfo,
    pub world: WorldRecord,
    pub entities: Vec<EntityRecord>,
}

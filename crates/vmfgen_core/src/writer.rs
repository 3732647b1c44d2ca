//! VMF text writer
//!
//! Each record type has its own write function. IDs come from one counter
//! that every block shares, taken in the order blocks are written, so a
//! class always gets its ID before any block nested inside it.

use vmfgen_math::Point3;

use crate::record::{Document, EntityRecord, SideRecord, SolidRecord, VersionInfo, WorldRecord};

/// First ID handed out in a document
pub const FIRST_ID: u64 = 1;

/// Monotonic ID source for one document
#[derive(Debug)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: FIRST_ID }
    }

    /// Return the current ID and advance
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of IDs handed out so far
    pub fn issued(&self) -> u64 {
        self.next - FIRST_ID
    }
}

/// Writes records as tab-indented VMF text
pub struct VmfWriter {
    out: String,
    depth: usize,
    ids: IdAllocator,
}

impl Default for VmfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VmfWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
            ids: IdAllocator::new(),
        }
    }

    /// Write a whole document and return the text
    pub fn write_document(mut self, document: &Document) -> String {
        self.write_version_info(&document.version_info);
        self.write_world(&document.world);
        for entity in &document.entities {
            self.write_entity(entity);
        }
        log::debug!("Wrote VMF document with {} ids", self.ids.issued());
        self.out
    }

    /// Text written so far
    pub fn finish(self) -> String {
        self.out
    }

    pub fn write_version_info(&mut self, info: &VersionInfo) {
        self.open_class("versioninfo");
        self.property("editorversion", &info.editor_version.to_string());
        self.property("editorbuild", &info.editor_build.to_string());
        self.property("mapversion", &info.map_version.to_string());
        self.property("formatversion", &info.format_version.to_string());
        self.property("prefab", if info.prefab { "1" } else { "0" });
        self.close_class();
    }

    pub fn write_world(&mut self, world: &WorldRecord) {
        self.open_class("world");
        self.id_property();
        self.property("mapversion", &world.map_version.to_string());
        self.property("classname", &world.classname);
        self.property("detailmaterial", &world.detail_material);
        self.property("detailvbsp", &world.detail_vbsp);
        self.property("maxpropscreenwidth", &world.max_prop_screen_width.to_string());
        self.property("skyname", &world.sky_name);
        for solid in &world.solids {
            self.write_solid(solid);
        }
        self.close_class();
    }

    pub fn write_solid(&mut self, solid: &SolidRecord) {
        self.open_class("solid");
        self.id_property();
        for side in &solid.sides {
            self.write_side(side);
        }
        self.close_class();
    }

    pub fn write_side(&mut self, side: &SideRecord) {
        self.open_class("side");
        self.id_property();
        self.property("plane", &plane_string(&side.plane));
        self.property("material", &side.material);
        self.property("uaxis", &side.uv.u_str());
        self.property("vaxis", &side.uv.v_str());
        self.property("rotation", "0");
        self.property("lightmapscale", "16");
        self.property("smoothing_groups", "0");
        self.close_class();
    }

    pub fn write_entity(&mut self, entity: &EntityRecord) {
        self.open_class("entity");
        self.id_property();
        self.property("classname", &entity.classname);
        self.property("origin", &entity.origin.to_string());
        for (key, value) in &entity.options {
            self.property(key, value);
        }
        for solid in &entity.solids {
            self.write_solid(solid);
        }
        self.close_class();
    }

    fn id_property(&mut self) {
        let id = self.ids.next_id();
        self.property("id", &id.to_string());
    }

    fn open_class(&mut self, name: &str) {
        self.indent();
        self.out.push_str(name);
        self.out.push('\n');
        self.indent();
        self.out.push_str("{\n");
        self.depth += 1;
    }

    fn close_class(&mut self) {
        self.depth -= 1;
        self.indent();
        self.out.push_str("}\n");
    }

    fn property(&mut self, key: &str, value: &str) {
        self.indent();
        self.out.push('"');
        self.out.push_str(key);
        self.out.push_str("\" \"");
        self.out.push_str(value);
        self.out.push_str("\"\n");
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }
}

/// `(x y z) (x y z) (x y z)`
fn plane_string(plane: &[Point3; 3]) -> String {
    format!("({}) ({}) ({})", plane[0], plane[1], plane[2])
}

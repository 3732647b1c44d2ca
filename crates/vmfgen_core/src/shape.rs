//! Extruded-polygon brushes
//!
//! A [`Shape`] is a convex polygon on its local XY plane extruded along
//! local Z, centered on the shape origin. The top and bottom faces may be
//! tilted along Y by a slope, which is how ramps and wedges are built.
//!
//! Faces are indexed the same way everywhere: [`TOP_FACE`], [`BOTTOM_FACE`],
//! then one side per polygon edge starting at [`FIRST_SIDE_FACE`]. Side `i`
//! is the edge from `points[i]` to `points[i + 1]`.

use std::f64::consts::FRAC_PI_2;

use serde::{Serialize, Deserialize};
use vmfgen_math::{Point2, Point3};

use crate::entity::Entity;
use crate::error::GeometryError;
use crate::record::{SideRecord, SolidRecord};
use crate::uv::UVFace;

/// Material applied to faces when none is given
pub const DEFAULT_MATERIAL: &str = "BLACK_OUTLINE";

/// Face index of the top face
pub const TOP_FACE: usize = 0;
/// Face index of the bottom face
pub const BOTTOM_FACE: usize = 1;
/// Face index of side 0
pub const FIRST_SIDE_FACE: usize = 2;

/// Relative cross-product magnitude below which three points count as collinear
const COLLINEAR_EPSILON: f64 = 1e-9;

/// Where on a parent shape a child is attached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    /// The parent's own position and orientation
    Origin,
    /// Center of the top face, tilted with the top slope
    Top,
    /// Center of the bottom face, tilted with the bottom slope
    Bottom,
    /// Midpoint of side `i`, oriented flat against that side
    Side(usize),
}

/// A convex brush built from an extruded polygon
#[derive(Clone, Debug)]
pub struct Shape {
    points: Vec<Point2>,
    thickness: f64,
    pos: Point3,
    angle: Point3,
    materials: Vec<String>,
    uvs: Vec<UVFace>,
    custom_uvs: bool,
    top_slope: f64,
    bottom_slope: f64,
    child_shapes: Vec<(Anchor, Shape)>,
    child_entities: Vec<(Anchor, Entity)>,
}

impl Shape {
    /// Create a shape from a clockwise polygon starting at its minimum-Y vertex
    ///
    /// Every face gets [`DEFAULT_MATERIAL`]. Top and bottom get the default
    /// projection; each side projects along its own edge.
    pub fn new(points: Vec<Point2>, thickness: f64) -> Result<Self, GeometryError> {
        validate_polygon(&points)?;
        if !(thickness > 0.0 && thickness.is_finite()) {
            return Err(GeometryError::invalid(format!(
                "thickness must be positive and finite, got {}",
                thickness
            )));
        }

        let uvs = default_uvs(&points)?;
        let materials = vec![DEFAULT_MATERIAL.to_string(); points.len() + 2];

        let shape = Self {
            points,
            thickness,
            pos: Point3::ZERO,
            angle: Point3::ZERO,
            materials,
            uvs,
            custom_uvs: false,
            top_slope: 0.0,
            bottom_slope: 0.0,
            child_shapes: Vec::new(),
            child_entities: Vec::new(),
        };
        shape.check_face_planes()?;
        Ok(shape)
    }

    /// Set the position relative to whatever this shape is attached to
    pub fn with_pos(mut self, pos: Point3) -> Self {
        self.pos = pos;
        self
    }

    /// Set the orientation relative to whatever this shape is attached to
    pub fn with_angle(mut self, angle: Point3) -> Self {
        self.angle = angle;
        self
    }

    /// Tilt the top face by `slope` units of Z per unit of Y
    pub fn with_top_slope(mut self, slope: f64) -> Self {
        self.top_slope = slope;
        self
    }

    /// Tilt the bottom face by `slope` units of Z per unit of Y
    pub fn with_bottom_slope(mut self, slope: f64) -> Self {
        self.bottom_slope = slope;
        self
    }

    /// Use one material on every face
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.set_all_materials(material);
        self
    }

    /// Use an explicit material per face (top, bottom, then sides)
    pub fn with_materials(mut self, materials: Vec<String>) -> Result<Self, GeometryError> {
        self.check_arity("materials", materials.len())?;
        self.materials = materials;
        Ok(self)
    }

    /// Use an explicit projection per face (top, bottom, then sides)
    pub fn with_uvs(mut self, uvs: Vec<UVFace>) -> Result<Self, GeometryError> {
        self.check_arity("uvs", uvs.len())?;
        self.uvs = uvs;
        self.custom_uvs = true;
        Ok(self)
    }

    // --- Accessors ---

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn pos(&self) -> Point3 {
        self.pos
    }

    pub fn angle(&self) -> Point3 {
        self.angle
    }

    pub fn top_slope(&self) -> f64 {
        self.top_slope
    }

    pub fn bottom_slope(&self) -> f64 {
        self.bottom_slope
    }

    pub fn materials(&self) -> &[String] {
        &self.materials
    }

    pub fn uvs(&self) -> &[UVFace] {
        &self.uvs
    }

    pub fn child_shapes(&self) -> &[(Anchor, Shape)] {
        &self.child_shapes
    }

    pub fn child_entities(&self) -> &[(Anchor, Entity)] {
        &self.child_entities
    }

    /// Number of faces (polygon edges plus top and bottom)
    #[inline]
    pub fn face_count(&self) -> usize {
        self.points.len() + 2
    }

    // --- Mutation ---

    /// Replace the polygon
    ///
    /// Default projections are derived again for the new edges. Side
    /// materials are truncated, or extended with side 0's material. A shape
    /// with caller-supplied projections only accepts a polygon with the same
    /// number of points.
    pub fn set_points(&mut self, points: Vec<Point2>) -> Result<(), GeometryError> {
        validate_polygon(&points)?;
        let face_count = points.len() + 2;

        let uvs = if self.custom_uvs {
            if self.uvs.len() != face_count {
                return Err(GeometryError::ArityMismatch {
                    what: "uvs",
                    expected: face_count,
                    actual: self.uvs.len(),
                });
            }
            self.uvs.clone()
        } else {
            default_uvs(&points)?
        };

        let fill = self.materials[FIRST_SIDE_FACE].clone();
        let mut materials = self.materials.clone();
        materials.resize(face_count, fill);

        let previous = std::mem::replace(&mut self.points, points);
        if let Err(e) = self.check_face_planes() {
            self.points = previous;
            return Err(e);
        }
        self.uvs = uvs;
        self.materials = materials;
        Ok(())
    }

    /// Set the material of one face by face index
    pub fn set_one_material(&mut self, index: usize, material: impl Into<String>) -> Result<(), GeometryError> {
        let slot = self.materials.get_mut(index).ok_or_else(|| {
            GeometryError::invalid(format!("face index {} out of range", index))
        })?;
        *slot = material.into();
        Ok(())
    }

    /// Set the material of every face
    pub fn set_all_materials(&mut self, material: impl Into<String>) {
        self.materials = vec![material.into(); self.face_count()];
    }

    pub fn set_top_material(&mut self, material: impl Into<String>) {
        self.materials[TOP_FACE] = material.into();
    }

    pub fn set_bottom_material(&mut self, material: impl Into<String>) {
        self.materials[BOTTOM_FACE] = material.into();
    }

    /// Set the material of side `side` (not a face index)
    pub fn set_side_material(&mut self, side: usize, material: impl Into<String>) -> Result<(), GeometryError> {
        if side >= self.points.len() {
            return Err(GeometryError::invalid(format!(
                "side {} out of range for {} sides",
                side,
                self.points.len()
            )));
        }
        self.materials[FIRST_SIDE_FACE + side] = material.into();
        Ok(())
    }

    /// Set the material of every side face
    pub fn set_all_side_materials(&mut self, material: impl Into<String>) {
        let material = material.into();
        for slot in &mut self.materials[FIRST_SIDE_FACE..] {
            *slot = material.clone();
        }
    }

    /// Attach a child shape against one of this shape's faces
    pub fn add_child_shape(&mut self, shape: Shape, anchor: Anchor) -> Result<(), GeometryError> {
        self.check_anchor(anchor)?;
        self.child_shapes.push((anchor, shape));
        Ok(())
    }

    /// Attach a child entity against one of this shape's faces
    pub fn add_child_entity(&mut self, entity: Entity, anchor: Anchor) -> Result<(), GeometryError> {
        self.check_anchor(anchor)?;
        self.child_entities.push((anchor, entity));
        Ok(())
    }

    // --- Geometry ---

    /// Offset and orientation handed to a child attached at `anchor`
    ///
    /// Both are relative to the frame this shape itself was placed in, and
    /// already include this shape's own `pos` and `angle`.
    pub fn child_offset(&self, anchor: Anchor) -> Result<(Point3, Point3), GeometryError> {
        self.check_anchor(anchor)?;
        let y_origin = self.points[0].y;

        match anchor {
            Anchor::Origin => Ok((self.pos, self.angle)),
            Anchor::Top => {
                let offset = Point3::new(0.0, 0.0, self.thickness / 2.0 + self.top_slope * -y_origin);
                Ok((
                    offset.rotate(self.angle) + self.pos,
                    Point3::new(self.angle.x + self.top_slope.atan2(1.0), self.angle.y, self.angle.z),
                ))
            }
            Anchor::Bottom => {
                let offset = Point3::new(0.0, 0.0, -self.thickness / 2.0 + self.bottom_slope * -y_origin);
                Ok((
                    offset.rotate(self.angle) + self.pos,
                    Point3::new(self.angle.x - self.bottom_slope.atan2(1.0), self.angle.y, self.angle.z),
                ))
            }
            Anchor::Side(side) => {
                let a = self.points[side];
                let b = self.points[(side + 1) % self.points.len()];
                let ra = a.y - y_origin;
                let rb = b.y - y_origin;
                // Average of both endpoints' top and bottom slope offsets
                let z = (ra * self.top_slope + ra * self.bottom_slope + rb * self.top_slope + rb * self.bottom_slope)
                    / 4.0;
                let side_angle = (b.x - a.x).atan2(b.y - a.y);
                let mid = Point3::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, z);
                Ok((
                    mid.rotate(self.angle) + self.pos,
                    Point3::new(self.angle.x + side_angle, self.angle.y + FRAC_PI_2, self.angle.z + FRAC_PI_2),
                ))
            }
        }
    }

    /// Build this shape's brush in global space
    ///
    /// `frame_pos`/`frame_angle` are the accumulated transform of the frame
    /// this shape is attached in; the shape's own `pos`/`angle` are added.
    pub fn to_brush_record(&self, frame_pos: Point3, frame_angle: Point3) -> Result<SolidRecord, GeometryError> {
        let pos = frame_pos + self.pos;
        let angle = frame_angle + self.angle;
        let place = |p: Point3| p.rotate(angle) + pos;

        let mut sides = Vec::with_capacity(self.face_count());
        for (face, plane) in self.local_planes().into_iter().enumerate() {
            check_plane(&plane, face)?;
            sides.push(SideRecord {
                plane: plane.map(place),
                material: self.materials[face].clone(),
                uv: self.uvs[face].rotate(angle),
            });
        }

        Ok(SolidRecord { sides })
    }

    /// Height of the top face above `p`
    fn top_height(&self, p: Point2) -> f64 {
        self.thickness / 2.0 + self.top_slope * (p.y - self.points[0].y)
    }

    /// Height of the bottom face below `p`
    fn bottom_height(&self, p: Point2) -> f64 {
        -self.thickness / 2.0 + self.bottom_slope * (p.y - self.points[0].y)
    }

    /// Three local-space points per face, in face index order
    fn local_planes(&self) -> Vec<[Point3; 3]> {
        let top = |p: Point2| Point3::new(p.x, p.y, self.top_height(p));
        let bottom = |p: Point2| Point3::new(p.x, p.y, self.bottom_height(p));
        // Side faces are vertical, so slopes never move their planes
        let half = self.thickness / 2.0;
        let upper = |p: Point2| Point3::new(p.x, p.y, half);
        let lower = |p: Point2| Point3::new(p.x, p.y, -half);
        let pts = &self.points;
        let n = pts.len();

        let mut planes = Vec::with_capacity(n + 2);
        planes.push([top(pts[0]), top(pts[1]), top(pts[2])]);
        planes.push([bottom(pts[2]), bottom(pts[1]), bottom(pts[0])]);
        for i in 0..n {
            let next = pts[(i + 1) % n];
            planes.push([upper(next), upper(pts[i]), lower(pts[i])]);
        }
        planes
    }

    fn check_face_planes(&self) -> Result<(), GeometryError> {
        for (face, plane) in self.local_planes().iter().enumerate() {
            check_plane(plane, face)?;
        }
        Ok(())
    }

    fn check_arity(&self, what: &'static str, actual: usize) -> Result<(), GeometryError> {
        if actual != self.face_count() {
            return Err(GeometryError::ArityMismatch {
                what,
                expected: self.face_count(),
                actual,
            });
        }
        Ok(())
    }

    fn check_anchor(&self, anchor: Anchor) -> Result<(), GeometryError> {
        if self.points.is_empty() {
            return Err(GeometryError::invalid("cannot anchor to a shape with no points"));
        }
        match anchor {
            Anchor::Side(side) if side >= self.points.len() => Err(GeometryError::invalid(format!(
                "side anchor {} out of range for {} sides",
                side,
                self.points.len()
            ))),
            _ => Ok(()),
        }
    }
}

fn validate_polygon(points: &[Point2]) -> Result<(), GeometryError> {
    if points.len() < 3 {
        return Err(GeometryError::invalid(format!(
            "polygon needs at least 3 points, got {}",
            points.len()
        )));
    }
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(GeometryError::invalid("polygon has a non-finite coordinate"));
    }
    Ok(())
}

fn default_uvs(points: &[Point2]) -> Result<Vec<UVFace>, GeometryError> {
    let n = points.len();
    let mut uvs = Vec::with_capacity(n + 2);
    uvs.push(UVFace::default());
    uvs.push(UVFace::default());
    for i in 0..n {
        let uv = UVFace::for_edge(points[i], points[(i + 1) % n])
            .ok_or_else(|| GeometryError::invalid(format!("side {} has zero length", i)))?;
        uvs.push(uv);
    }
    Ok(uvs)
}

fn check_plane(plane: &[Point3; 3], face: usize) -> Result<(), GeometryError> {
    let ab = plane[1] - plane[0];
    let ac = plane[2] - plane[0];
    let scale = ab.length() * ac.length();
    if !(ab.cross(ac).length() > COLLINEAR_EPSILON * scale) {
        return Err(GeometryError::invalid(format!(
            "face {} has collinear plane points",
            face
        )));
    }
    Ok(())
}

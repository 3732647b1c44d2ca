//! Geometry primitives for brush generation
//!
//! This crate provides the small set of value types the brush builder works in.
//!
//! ## Core Types
//!
//! - [`Point2`] - A point in a shape's cross-section plane
//! - [`Point3`] - A 3D position or direction, with Euler rotation
//!
//! ## Polygons
//!
//! - [`gen_polygon`] - Closed-form regular polygon, clockwise from minimum Y

mod point2;
mod point3;
pub mod polygon;

pub use point2::Point2;
pub use point3::Point3;
pub use polygon::gen_polygon;

/// Number of decimal places used whenever a coordinate is written as text
pub const PRECISION: usize = 3;

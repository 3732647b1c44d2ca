//! vmfgen - procedural VMF map generation
//!
//! The geometry and serialization live in `vmfgen_core`; this crate adds
//! the application layer: layered configuration and a parametric room
//! builder used by the `vmfgen` binary.

pub mod config;
pub mod room;

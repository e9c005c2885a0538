//! Core alignment building blocks: quad geometry, resize, reflective padding,
//! filters, the quad warp and the end-to-end alignment pipeline. These are
//! internal primitives consumed by the high-level `api` module.
pub mod params;
pub mod processing;

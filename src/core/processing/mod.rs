pub mod filters;
pub mod padding;
pub mod pipeline;
pub mod quad;
pub mod resize;
pub mod transform;

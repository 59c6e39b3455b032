//! Collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays and bounding spheres
//! - [`bounding_box`] - Axis-aligned bounding boxes and their intersection queries
//!
//! # Key Types
//!
//! - [`BoundingBox`] - Box kept as both center/half-extents and min/max corners
//! - [`Ray`], [`BoundingSphere`] - Shapes a box is queried against

pub mod primitives;
pub mod bounding_box;

// Re-export commonly used types
pub use primitives::{Ray, BoundingSphere};
pub use bounding_box::{BoundingBox, BoundsError};

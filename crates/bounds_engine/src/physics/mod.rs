//! Physics module for collision geometry
//!
//! Provides the bounding volumes used by culling, picking and broad-phase
//! collision tests.

pub mod collision;

pub use collision::{
    BoundingBox,
    BoundingSphere,
    BoundsError,
    Ray,
};

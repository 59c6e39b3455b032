//! # Bounds Engine
//!
//! Axis-aligned bounding volumes for a real-time 3D engine.
//!
//! ## Features
//!
//! - **Dual representation**: boxes readable as center/half-extents or min/max
//! - **Ray queries**: slab method with hit point, or a faster hit-only test
//! - **Sphere, point and box overlap tests**
//! - **Derivation**: merging, affine re-bounding and fitting vertex buffers
//! - **Configuration**: TOML and RON loading for probe descriptions
//!
//! ## Quick Start
//!
//! ```rust
//! use bounds_engine::prelude::*;
//!
//! let aabb = BoundingBox::new(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5));
//! let ray = Ray::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
//!
//! let mut hit = Vec3::zeros();
//! assert!(aabb.intersects_ray(&ray, Some(&mut hit)));
//! assert!((hit.x + 0.5).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod physics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat},
        foundation::math::{Vec3, Mat4, Transform},
        physics::{BoundingBox, BoundingSphere, BoundsError, Ray},
    };
}

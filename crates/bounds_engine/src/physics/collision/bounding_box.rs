//! Axis-aligned bounding box
//!
//! A box is kept in two equivalent forms at once: center plus half-extents,
//! and the min/max corners. Every mutator updates both, so either form can be
//! read at any time.
//!
//! # Ray queries
//!
//! Two ray tests are offered:
//! - [`BoundingBox::ray_intersection_point`] runs the slab method and reports
//!   where the ray enters the box.
//! - [`BoundingBox::fast_intersects_ray`] only classifies hit/miss using
//!   separating axes and requires a unit-length direction.
//!
//! [`BoundingBox::intersects_ray`] picks between them depending on whether the
//! caller asks for the hit point.

use thiserror::Error;

use super::primitives::{BoundingSphere, Ray};
use crate::foundation::math::{Mat4, Vec3};

/// Errors raised when a box cannot be built from the given input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    /// No vertices to enclose
    #[error("Vertex buffer is empty")]
    EmptyVertexBuffer,

    /// Interleaved xyz buffer with a dangling component
    #[error("Vertex buffer length {0} is not a multiple of 3")]
    VertexBufferLength(usize),

    /// A min corner component exceeds the matching max component
    #[error("Inverted bounds: min {min:?} exceeds max {max:?}")]
    InvertedBounds {
        /// Offending min corner
        min: [f32; 3],
        /// Offending max corner
        max: [f32; 3],
    },
}

/// Axis-Aligned Bounding Box for culling, collision and picking queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    center: Vec3,
    half_extents: Vec3,
    min: Vec3,
    max: Vec3,
}

impl Default for BoundingBox {
    /// Unit box centered on the origin
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5))
    }
}

impl BoundingBox {
    /// Create a box from its center and half the distance across each axis
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        let mut aabb = Self {
            center,
            half_extents,
            min: Vec3::zeros(),
            max: Vec3::zeros(),
        };
        aabb.sync_min_max();
        aabb
    }

    /// Create a box from its two corners
    pub fn from_min_max(min: impl Into<Vec3>, max: impl Into<Vec3>) -> Result<Self, BoundsError> {
        let mut aabb = Self::default();
        aabb.set_min_max(min, max)?;
        Ok(aabb)
    }

    /// Create the tightest box around an interleaved `x, y, z` vertex buffer
    pub fn from_vertices(vertices: &[f32]) -> Result<Self, BoundsError> {
        let mut aabb = Self::default();
        aabb.compute(vertices)?;
        Ok(aabb)
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Half the distance across the box in each axis
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// Minimum corner of the box
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner of the box
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Move the box, keeping its size
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
        self.sync_min_max();
    }

    /// Resize the box around its current center
    pub fn set_half_extents(&mut self, half_extents: Vec3) {
        if half_extents.iter().any(|h| *h < 0.0) {
            log::warn!("Negative half extents {:?} produce an inverted box", half_extents.as_slice());
        }
        self.half_extents = half_extents;
        self.sync_min_max();
    }

    /// Replace the minimum corner
    pub fn set_min(&mut self, min: Vec3) {
        self.min = min;
        self.sync_center_half_extents();
    }

    /// Replace the maximum corner
    pub fn set_max(&mut self, max: Vec3) {
        self.max = max;
        self.sync_center_half_extents();
    }

    /// Replace both corners at once
    ///
    /// Accepts vectors or `[f32; 3]` arrays. Inverted corners are rejected and
    /// leave the box unchanged.
    pub fn set_min_max(&mut self, min: impl Into<Vec3>, max: impl Into<Vec3>) -> Result<(), BoundsError> {
        let (min, max) = (min.into(), max.into());
        if min.iter().zip(max.iter()).any(|(lo, hi)| lo > hi) {
            log::debug!("Rejecting inverted bounds min={:?} max={:?}", min.as_slice(), max.as_slice());
            return Err(BoundsError::InvertedBounds {
                min: [min.x, min.y, min.z],
                max: [max.x, max.y, max.z],
            });
        }
        self.min = min;
        self.max = max;
        self.sync_center_half_extents();
        Ok(())
    }

    /// Copy every field of `src` into this box
    pub fn copy_from(&mut self, src: &Self) {
        *self = *src;
    }

    /// Grow this box so it also encloses `other`
    pub fn add(&mut self, other: &Self) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
        self.sync_center_half_extents();
    }

    /// Test if a point lies inside the box (faces included)
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Test if two boxes overlap; touching faces count as overlap
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Test if a sphere overlaps, envelops or sits inside the box
    pub fn intersects_bounding_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.distance_to_bounding_sphere_sq(sphere) <= sphere.radius * sphere.radius
    }

    /// Squared distance from the sphere center to the closest point of the box
    pub fn distance_to_bounding_sphere_sq(&self, sphere: &BoundingSphere) -> f32 {
        (0..3)
            .map(|axis| {
                let p = sphere.center[axis];
                let gap = if p < self.min[axis] {
                    self.min[axis] - p
                } else if p > self.max[axis] {
                    p - self.max[axis]
                } else {
                    0.0
                };
                gap * gap
            })
            .sum()
    }

    /// Test if a ray hits the box
    ///
    /// When `point` is given the slab method runs and the entry point is
    /// written there on a hit. Otherwise the cheaper separating-axis test runs,
    /// which needs a normalized ray direction.
    pub fn intersects_ray(&self, ray: &Ray, point: Option<&mut Vec3>) -> bool {
        match point {
            Some(out) => match self.ray_intersection_point(ray) {
                Some(hit) => {
                    *out = hit;
                    true
                }
                None => false,
            },
            None => self.fast_intersects_ray(ray),
        }
    }

    /// Slab-method ray test returning the point where the ray enters the box
    ///
    /// Boxes lying entirely behind the origin are missed. When the origin is
    /// inside the box the returned point is the entry behind the origin.
    pub fn ray_intersection_point(&self, ray: &Ray) -> Option<Vec3> {
        let to_min = self.min - ray.origin;
        let to_max = self.max - ray.origin;

        let mut latest_entry = f32::MIN;
        let mut earliest_exit = f32::MAX;
        for axis in 0..3 {
            let t_min = slab_distance(to_min[axis], ray.direction[axis]);
            let t_max = slab_distance(to_max[axis], ray.direction[axis]);
            latest_entry = latest_entry.max(t_min.min(t_max));
            earliest_exit = earliest_exit.min(t_min.max(t_max));
        }

        if latest_entry <= earliest_exit && earliest_exit >= 0.0 {
            log::trace!("Ray enters at t={latest_entry}, exits at t={earliest_exit}");
            Some(ray.point_at(latest_entry))
        } else {
            None
        }
    }

    /// Separating-axis ray test that skips computing the hit point
    pub fn fast_intersects_ray(&self, ray: &Ray) -> bool {
        if !ray.is_normalized(1e-4) {
            log::debug!("Fast ray test given a non-unit direction {:?}", ray.direction.as_slice());
        }

        let h = self.half_extents;
        let dir = ray.direction;
        let diff = ray.origin - self.center;
        let abs_diff = diff.abs();
        let heading = diff.component_mul(&dir);

        // Origin outside a slab and heading further out
        for axis in 0..3 {
            if abs_diff[axis] > h[axis] && heading[axis] >= 0.0 {
                return false;
            }
        }

        let abs_dir = dir.abs();
        let cross = dir.cross(&diff).abs();

        if cross.x > h.y * abs_dir.z + h.z * abs_dir.y {
            return false;
        }
        if cross.y > h.x * abs_dir.z + h.z * abs_dir.x {
            return false;
        }
        if cross.z > h.x * abs_dir.y + h.y * abs_dir.x {
            return false;
        }

        true
    }

    /// Set this box to enclose `aabb` after it is transformed by `matrix`
    ///
    /// The result bounds the transformed box but is not tight for rotations.
    pub fn set_from_transformed_aabb(&mut self, aabb: &Self, matrix: &Mat4) {
        let m = matrix.as_slice();
        let ac = aabb.center;
        let ar = aabb.half_extents;

        let (mx0, mx1, mx2) = (m[0], m[4], m[8]);
        let (my0, my1, my2) = (m[1], m[5], m[9]);
        let (mz0, mz1, mz2) = (m[2], m[6], m[10]);

        self.center = Vec3::new(
            m[12] + mx0 * ac.x + mx1 * ac.y + mx2 * ac.z,
            m[13] + my0 * ac.x + my1 * ac.y + my2 * ac.z,
            m[14] + mz0 * ac.x + mz1 * ac.y + mz2 * ac.z,
        );

        self.half_extents = Vec3::new(
            mx0.abs() * ar.x + mx1.abs() * ar.y + mx2.abs() * ar.z,
            my0.abs() * ar.x + my1.abs() * ar.y + my2.abs() * ar.z,
            mz0.abs() * ar.x + mz1.abs() * ar.y + mz2.abs() * ar.z,
        );

        self.sync_min_max();
    }

    /// Copy of this box transformed by `matrix`
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let mut out = Self::default();
        out.set_from_transformed_aabb(self, matrix);
        out
    }

    /// Set this box to the tightest fit around an interleaved `x, y, z` buffer
    pub fn compute(&mut self, vertices: &[f32]) -> Result<(), BoundsError> {
        if vertices.len() % 3 != 0 {
            return Err(BoundsError::VertexBufferLength(vertices.len()));
        }

        let mut points = vertices
            .chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]));
        let Some(first) = points.next() else {
            return Err(BoundsError::EmptyVertexBuffer);
        };

        let (min, max) = points.fold((first, first), |(lo, hi), p| (lo.inf(&p), hi.sup(&p)));
        log::debug!("Computed bounds over {} vertices", vertices.len() / 3);
        self.set_min_max(min, max)
    }

    fn sync_min_max(&mut self) {
        self.min = self.center - self.half_extents;
        self.max = self.center + self.half_extents;
    }

    fn sync_center_half_extents(&mut self) {
        self.center = (self.max + self.min) * 0.5;
        self.half_extents = (self.max - self.min) * 0.5;
    }
}

/// Parametric distance to a slab plane along one axis
///
/// A zero direction component never reaches the plane; the sign of `offset`
/// decides which side of the ray the plane sits on. A zero offset counts as
/// ahead, so a ray lying in a min-face plane misses while one lying in the
/// matching max-face plane hits.
#[allow(clippy::float_cmp)]
fn slab_distance(offset: f32, direction: f32) -> f32 {
    if direction == 0.0 {
        if offset < 0.0 { -f32::MAX } else { f32::MAX }
    } else {
        offset / direction
    }
}

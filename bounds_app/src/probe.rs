//! Probe descriptions and the queries run against them
//!
//! A probe file lists named boxes plus rays, spheres and points. Every query
//! shape is tested against every box and the results are gathered into a
//! [`ProbeReport`].

use bounds_engine::config::{Config, ConfigError};
use bounds_engine::foundation::math::{Transform, Vec3};
use bounds_engine::physics::{BoundingBox, BoundingSphere, BoundsError, Ray};
use serde::{Deserialize, Serialize};

/// Errors raised while turning a probe description into boxes
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    /// Probe file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A box description was rejected by the bounds engine
    #[error("Box '{name}' is invalid: {source}")]
    Bounds {
        /// Box name from the probe file
        name: String,
        /// Underlying bounds error
        #[source]
        source: BoundsError,
    },

    /// A box was described in more than one way
    #[error("Box '{0}' mixes vertices, min/max and center/half_extents")]
    AmbiguousBox(String),
}

/// Root of a probe file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Boxes to query
    pub boxes: Vec<BoxSpec>,
    /// Rays tested against every box
    pub rays: Vec<RaySpec>,
    /// Spheres tested against every box
    pub spheres: Vec<SphereSpec>,
    /// Points tested against every box
    pub points: Vec<[f32; 3]>,
}

impl Config for ProbeConfig {}

/// One named box, described by vertices, corners, or center and half-extents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxSpec {
    /// Name used in reports
    pub name: String,
    /// Box center
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<[f32; 3]>,
    /// Half the size along each axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_extents: Option<[f32; 3]>,
    /// Minimum corner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<[f32; 3]>,
    /// Maximum corner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<[f32; 3]>,
    /// Interleaved `x, y, z` buffer to fit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<f32>>,
    /// Transform applied after the box is built
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformSpec>,
}

/// Affine transform applied to a box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSpec {
    /// Translation
    pub translation: [f32; 3],
    /// Euler angles in degrees (roll, pitch, yaw)
    pub rotation_degrees: [f32; 3],
    /// Per-axis scale
    pub scale: [f32; 3],
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation_degrees: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl TransformSpec {
    /// Engine transform for this description
    pub fn to_transform(&self) -> Transform {
        Transform::from_position(Vec3::from(self.translation))
            .with_rotation_degrees(Vec3::from(self.rotation_degrees))
            .with_scale(Vec3::from(self.scale))
    }
}

/// Ray query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaySpec {
    /// Ray origin
    pub origin: [f32; 3],
    /// Ray direction, normalized on load
    pub direction: [f32; 3],
}

/// Sphere query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SphereSpec {
    /// Sphere center
    pub center: [f32; 3],
    /// Sphere radius
    pub radius: f32,
}

impl BoxSpec {
    /// Build the engine box described by these fields
    pub fn build(&self) -> Result<BoundingBox, ProbeError> {
        let has_corners = self.min.is_some() || self.max.is_some();
        let has_center = self.center.is_some() || self.half_extents.is_some();
        let descriptions = [self.vertices.is_some(), has_corners, has_center];
        if descriptions.iter().filter(|d| **d).count() > 1 {
            return Err(ProbeError::AmbiguousBox(self.name.clone()));
        }

        let bounds_error = |source| ProbeError::Bounds { name: self.name.clone(), source };
        let unit = BoundingBox::default();

        let aabb = if let Some(vertices) = &self.vertices {
            BoundingBox::from_vertices(vertices).map_err(bounds_error)?
        } else if has_corners {
            BoundingBox::from_min_max(
                self.min.map_or(unit.min(), Vec3::from),
                self.max.map_or(unit.max(), Vec3::from),
            )
            .map_err(bounds_error)?
        } else {
            BoundingBox::new(
                self.center.map_or(unit.center(), Vec3::from),
                self.half_extents.map_or(unit.half_extents(), Vec3::from),
            )
        };

        Ok(match &self.transform {
            Some(transform) => aabb.transformed(&transform.to_transform().to_matrix()),
            None => aabb,
        })
    }
}

/// A built box and its name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedBox {
    /// Name from the probe file
    pub name: String,
    /// Resulting bounds
    pub bounds: BoundingBox,
}

/// A ray that entered a box
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// Index of the ray in the probe file
    pub ray: usize,
    /// Box that was hit
    pub name: String,
    /// Entry point reported by the slab test
    pub point: Vec3,
    /// Whether the hit-only test agreed
    pub fast_hit: bool,
}

/// Everything a probe run found
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    /// Built boxes in file order
    pub boxes: Vec<NamedBox>,
    /// Pairs of overlapping boxes
    pub overlaps: Vec<(String, String)>,
    /// Ray hits
    pub ray_hits: Vec<RayHit>,
    /// (sphere index, box name) pairs that overlap
    pub sphere_hits: Vec<(usize, String)>,
    /// (point index, box name) pairs where the point lies inside
    pub point_hits: Vec<(usize, String)>,
    /// Union of every box, if there are any
    pub scene_bounds: Option<BoundingBox>,
}

/// Build every box and run every query against it
pub fn run(config: &ProbeConfig) -> Result<ProbeReport, ProbeError> {
    let boxes = config
        .boxes
        .iter()
        .map(|spec| Ok(NamedBox { name: spec.name.clone(), bounds: spec.build()? }))
        .collect::<Result<Vec<_>, ProbeError>>()?;

    let mut report = ProbeReport::default();

    for (i, a) in boxes.iter().enumerate() {
        for b in &boxes[i + 1..] {
            if a.bounds.intersects(&b.bounds) {
                report.overlaps.push((a.name.clone(), b.name.clone()));
            }
        }
    }

    for (index, spec) in config.rays.iter().enumerate() {
        let Some(direction) = Vec3::from(spec.direction).try_normalize(f32::EPSILON) else {
            log::warn!("Ray {index} has a zero direction, skipping");
            continue;
        };
        let ray = Ray::from_normalized(Vec3::from(spec.origin), direction);
        for named in &boxes {
            let mut point = Vec3::zeros();
            let slab_hit = named.bounds.intersects_ray(&ray, Some(&mut point));
            let fast_hit = named.bounds.intersects_ray(&ray, None);
            if slab_hit != fast_hit {
                log::warn!("Ray {index} grazes '{}': slab={slab_hit} fast={fast_hit}", named.name);
            }
            if slab_hit {
                report.ray_hits.push(RayHit { ray: index, name: named.name.clone(), point, fast_hit });
            }
        }
    }

    for (index, spec) in config.spheres.iter().enumerate() {
        let sphere = BoundingSphere::new(Vec3::from(spec.center), spec.radius);
        for named in boxes.iter().filter(|named| named.bounds.intersects_bounding_sphere(&sphere)) {
            report.sphere_hits.push((index, named.name.clone()));
        }
    }

    for (index, point) in config.points.iter().enumerate() {
        let point = Vec3::from(*point);
        for named in boxes.iter().filter(|named| named.bounds.contains_point(point)) {
            report.point_hits.push((index, named.name.clone()));
        }
    }

    report.scene_bounds = boxes.iter().map(|named| named.bounds).reduce(|mut acc, aabb| {
        acc.add(&aabb);
        acc
    });
    report.boxes = boxes;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bounds_engine::config::ConfigFormat;

    const SAMPLE: &str = include_str!("../probe.toml");

    fn sample_report() -> ProbeReport {
        let config = ProbeConfig::from_str_with_format(SAMPLE, ConfigFormat::Toml).unwrap();
        run(&config).unwrap()
    }

    #[test]
    fn test_sample_probe_builds_every_box() {
        let report = sample_report();
        let names: Vec<_> = report.boxes.iter().map(|b| b.name.as_str()).collect();

        assert_eq!(names, ["crate", "ramp", "debris"]);
        assert_eq!(report.boxes[2].bounds.min(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(report.boxes[2].bounds.max(), Vec3::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn test_sample_probe_queries() {
        let report = sample_report();

        let crate_hit = report
            .ray_hits
            .iter()
            .find(|hit| hit.ray == 0 && hit.name == "crate")
            .unwrap();
        assert_relative_eq!(crate_hit.point, Vec3::new(-0.5, 0.0, 0.0), epsilon = 1e-6);
        assert!(crate_hit.fast_hit);
        assert!(report.ray_hits.iter().all(|hit| hit.ray != 1));

        assert!(report.sphere_hits.contains(&(0, "crate".to_string())));
        assert!(report.point_hits.contains(&(0, "crate".to_string())));
        assert_eq!(report.point_hits.iter().filter(|(i, _)| *i == 1).count(), 1);
        assert!(report.overlaps.contains(&("crate".to_string(), "debris".to_string())));
    }

    #[test]
    fn test_scene_bounds_enclose_all_boxes() {
        let report = sample_report();
        let scene = report.scene_bounds.unwrap();

        for named in &report.boxes {
            assert!(scene.contains_point(named.bounds.min()));
            assert!(scene.contains_point(named.bounds.max()));
        }
        assert_eq!(scene.min(), Vec3::new(-1.0, -0.5, -2.0));
    }

    #[test]
    fn test_ron_round_trip() {
        let config = ProbeConfig::from_str_with_format(SAMPLE, ConfigFormat::Toml).unwrap();
        let text = config.to_string_with_format(ConfigFormat::Ron).unwrap();
        let parsed = ProbeConfig::from_str_with_format(&text, ConfigFormat::Ron).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_ambiguous_box_is_rejected() {
        let spec = BoxSpec {
            name: "both".to_string(),
            center: Some([0.0; 3]),
            min: Some([0.0; 3]),
            ..Default::default()
        };
        assert!(matches!(spec.build(), Err(ProbeError::AmbiguousBox(name)) if name == "both"));
    }

    #[test]
    fn test_inverted_corners_are_reported_with_name() {
        let spec = BoxSpec {
            name: "inside-out".to_string(),
            min: Some([1.0, 0.0, 0.0]),
            max: Some([0.0, 1.0, 1.0]),
            ..Default::default()
        };
        match spec.build() {
            Err(ProbeError::Bounds { name, source: BoundsError::InvertedBounds { .. } }) => {
                assert_eq!(name, "inside-out");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zero_direction_ray_is_skipped() {
        let config = ProbeConfig {
            boxes: vec![BoxSpec { name: "unit".to_string(), ..Default::default() }],
            rays: vec![
                RaySpec { origin: [0.0; 3], direction: [0.0; 3] },
                RaySpec { origin: [-2.0, 0.0, 0.0], direction: [4.0, 0.0, 0.0] },
            ],
            ..Default::default()
        };
        let report = run(&config).unwrap();

        assert_eq!(report.ray_hits.len(), 1);
        assert_eq!(report.ray_hits[0].ray, 1);
        assert!(report.ray_hits[0].fast_hit);
        assert_relative_eq!(report.ray_hits[0].point, Vec3::new(-0.5, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_empty_spec_is_unit_box() {
        assert_eq!(BoxSpec::default().build().unwrap(), BoundingBox::default());
    }
}

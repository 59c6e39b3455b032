//! Bounding box probe
//!
//! Loads a TOML or RON probe file, builds the boxes it describes and logs the
//! result of every ray, sphere, point and box overlap query.
//!
//! Usage: `bounds_probe [probe-file]` (defaults to `probe.toml`).

mod probe;

use bounds_engine::config::Config;
use bounds_engine::foundation::logging;
use probe::{ProbeConfig, ProbeError};

const DEFAULT_PROBE_PATH: &str = "probe.toml";

/// Name to print in usage messages
fn program_name(args: &[String]) -> &str {
    args.first().map_or("bounds_probe", String::as_str)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(logging::LevelFilter::Info);

    let args: Vec<String> = std::env::args().collect();
    let path = match args.as_slice() {
        [_] => {
            log::warn!("No probe file given, using {DEFAULT_PROBE_PATH}");
            DEFAULT_PROBE_PATH
        }
        [_, path] => path.as_str(),
        _ => {
            log::error!("Usage: {} [probe-file]", program_name(&args));
            std::process::exit(1);
        }
    };

    log::info!("Loading probe from {path}...");
    let config = ProbeConfig::load_from_file(path).map_err(ProbeError::from)?;
    let report = probe::run(&config).map_err(|e| {
        log::error!("Probe failed: {e}");
        e
    })?;

    for named in &report.boxes {
        let (min, max) = (named.bounds.min(), named.bounds.max());
        log::info!(
            "box '{}': min=({:.3}, {:.3}, {:.3}) max=({:.3}, {:.3}, {:.3})",
            named.name, min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
    for (a, b) in &report.overlaps {
        log::info!("boxes '{a}' and '{b}' overlap");
    }
    for hit in &report.ray_hits {
        log::info!(
            "ray {} enters '{}' at ({:.3}, {:.3}, {:.3})",
            hit.ray, hit.name, hit.point.x, hit.point.y, hit.point.z
        );
    }
    for (sphere, name) in &report.sphere_hits {
        log::info!("sphere {sphere} touches '{name}'");
    }
    for (point, name) in &report.point_hits {
        log::info!("point {point} lies inside '{name}'");
    }
    if let Some(scene) = report.scene_bounds {
        let (center, half) = (scene.center(), scene.half_extents());
        log::info!(
            "scene bounds: center=({:.3}, {:.3}, {:.3}) half_extents=({:.3}, {:.3}, {:.3})",
            center.x, center.y, center.z, half.x, half.y, half.z
        );
    }

    log::info!("Finished probe.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_without_args() {
        assert_eq!(program_name(&[]), "bounds_probe");
        assert_eq!(program_name(&["/usr/bin/bounds".to_string()]), "/usr/bin/bounds");
    }
}

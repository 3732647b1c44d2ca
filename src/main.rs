//! vmfgen - procedural VMF map generator
//!
//! Builds either the configured room or a RON map template and writes the
//! resulting VMF text to a file or stdout.
//!
//! Usage: `vmfgen [map.ron]`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vmfgen::config::AppConfig;
use vmfgen::room::{add_player_start, make_room};
use vmfgen_core::{MapTemplate, MapValidator, Vmf};

fn main() -> Result<()> {
    let config = AppConfig::load();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        config
            .as_ref()
            .map(|c| c.debug.log_level.as_str())
            .unwrap_or("info"),
    ))
    .init();

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let template = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.map.template.clone());

    let vmf = match template {
        Some(path) => build_from_template(&path)?,
        None => build_room(&config)?,
    };

    let text = vmf.generate().context("Failed to generate map")?;

    match &config.output.path {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} bytes to {}", text.len(), path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn build_from_template(path: &Path) -> Result<Vmf> {
    let template = MapTemplate::load(path)
        .with_context(|| format!("Failed to load map '{}'", path.display()))?;

    let problems = MapValidator::validate(&template);
    for problem in &problems {
        log::warn!("{}: {}", template.name, problem);
    }
    if !problems.is_empty() {
        anyhow::bail!("Map '{}' has {} problem(s)", template.name, problems.len());
    }

    log::info!(
        "Loaded map '{}' with {} shapes and {} entities",
        template.name,
        template.shapes.len(),
        template.entities.len()
    );
    Ok(template.to_vmf()?)
}

fn build_room(config: &AppConfig) -> Result<Vmf> {
    let mut room = make_room(&config.room.to_room_params()).context("Failed to build room")?;
    if config.room.player_start {
        add_player_start(&mut room)?;
    }

    let mut vmf = Vmf::new(config.output.prefab);
    vmf.add_shape(room);
    log::info!("Built {}-sided room", config.room.sides);
    Ok(vmf)
}

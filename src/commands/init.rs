//! Init command: detect the project and write components.json

use std::path::PathBuf;

use crate::cli::InitArgs;
use crate::config::resolve::synthesize_raw_config;
use crate::config::{resolve_config_paths, CONFIG_FILE_NAME};
use crate::error::{GlacialError, Result};
use crate::project;
use crate::ui;

pub fn run(cwd: Option<PathBuf>, args: InitArgs) -> Result<()> {
    let cwd = super::resolve_cwd(cwd)?;
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists. Use --force to recreate it.",
            ui::info("ℹ"),
            CONFIG_FILE_NAME
        );
        return Ok(());
    }

    let info = project::project_info(&cwd);
    let Some(raw) = synthesize_raw_config(&info) else {
        return Err(GlacialError::ProjectNotDetected {
            path: cwd.display().to_string(),
        });
    };

    // Resolve eagerly so a broken alias setup surfaces before we write
    // anything.
    resolve_config_paths(&cwd, raw.clone())?;

    let rendered = serde_json::to_string_pretty(&raw).map_err(|e| GlacialError::ConfigInvalid {
        message: e.to_string(),
    })?;
    std::fs::write(&config_path, format!("{rendered}\n"))
        .map_err(|e| GlacialError::write(&config_path, e))?;

    println!(
        "{} Created {} for a {} project.",
        ui::success("✔"),
        CONFIG_FILE_NAME,
        info.framework.label()
    );

    Ok(())
}

//! Add command: materialize registry items into the project

use std::path::PathBuf;

use crate::cli::AddArgs;
use crate::config::{Config, DEFAULT_STYLE};
use crate::error::{GlacialError, Result};
use crate::installer::{update_files, UpdateOptions, UpdateSummary};
use crate::registry::{LocalRegistry, RegistrySource};
use crate::transform::Transformer;
use crate::ui::{self, InquireConfirm};

pub fn run(cwd: Option<PathBuf>, args: AddArgs) -> Result<()> {
    let cwd = super::resolve_cwd(cwd)?;

    let Some(config) = Config::load(&cwd)? else {
        return Err(GlacialError::ConfigNotFound {
            path: cwd.display().to_string(),
        });
    };

    let registry_root = if args.registry.is_absolute() {
        args.registry.clone()
    } else {
        cwd.join(&args.registry)
    };
    let registry = LocalRegistry::new(registry_root);

    let style = if config.style.is_empty() {
        DEFAULT_STYLE
    } else {
        config.style.as_str()
    };

    // Base color and icon table are best-effort registry payloads; the
    // stages consuming them degrade to no-ops without them.
    let base_color = (!config.tailwind.base_color.is_empty())
        .then(|| registry.base_color(&config.tailwind.base_color).ok())
        .flatten();
    let icons = registry.icons().unwrap_or_default();

    let transformer = Transformer::new(icons);
    let mut prompt = InquireConfirm;

    let options = UpdateOptions {
        overwrite: args.overwrite,
        force: args.yes,
        silent: args.silent,
        is_remote: false,
        is_workspace: false,
        path: args.path.clone(),
    };

    let mut total = UpdateSummary::default();
    let mut dependencies: Vec<String> = Vec::new();

    for name in &args.components {
        let item = registry.item(name, style)?;

        let summary = update_files(
            &item.files,
            &config,
            &transformer,
            &mut prompt,
            &options,
            base_color.as_ref(),
        )?;
        total.merge(summary);

        for dependency in item.dependencies.iter().chain(&item.dev_dependencies) {
            if !dependencies.contains(dependency) {
                dependencies.push(dependency.clone());
            }
        }
    }

    // Dependency installation happens through the project's own package
    // manager; surface what the items need.
    if !dependencies.is_empty() && !args.silent {
        println!(
            "{} Install the required dependencies: {}",
            ui::info("ℹ"),
            dependencies.join(", ")
        );
    }

    Ok(())
}

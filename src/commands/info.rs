//! Info command: print detected project information

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::project::{self, TailwindVersion};
use crate::ui;

pub fn run(cwd: Option<PathBuf>) -> Result<()> {
    let cwd = super::resolve_cwd(cwd)?;
    let info = project::project_info(&cwd);

    println!("{}", ui::info("Project"));
    println!("  framework:       {}", info.framework.label());
    println!("  typescript:      {}", info.typescript);
    println!("  src directory:   {}", info.is_src_dir);
    println!(
        "  tailwind:        {}",
        match info.tailwind_version {
            Some(TailwindVersion::V3) => "v3",
            Some(TailwindVersion::V4) => "v4",
            None => "not detected",
        }
    );
    println!(
        "  tailwind css:    {}",
        info.tailwind_css_file.as_deref().unwrap_or("not detected")
    );
    println!(
        "  tailwind config: {}",
        info.tailwind_config_file
            .as_deref()
            .unwrap_or("not detected")
    );
    println!(
        "  alias prefix:    {}",
        info.alias_prefix.as_deref().unwrap_or("not detected")
    );

    match Config::load(&cwd)? {
        Some(config) => {
            println!();
            println!("{}", ui::info("Configuration"));
            println!("  style:           {}", config.style);
            println!(
                "  icon library:    {}",
                config.icon_library.as_deref().unwrap_or("default")
            );
            println!(
                "  components:      {}",
                config.resolved_paths.components.display()
            );
            println!("  ui:              {}", config.resolved_paths.ui.display());

            // Aliases owned by other workspace packages resolve against
            // those packages' own configs.
            if let Some(workspace) = crate::config::workspace_config(&config)? {
                let foreign: Vec<String> = workspace
                    .members
                    .iter()
                    .filter(|(_, member)| member.resolved_paths.cwd != config.resolved_paths.cwd)
                    .map(|(key, member)| {
                        format!("{key} → {}", member.resolved_paths.cwd.display())
                    })
                    .collect();
                if !foreign.is_empty() {
                    println!();
                    println!("{}", ui::info("Workspace"));
                    for line in foreign {
                        println!("  {line}");
                    }
                }
            }
        }
        None => {
            println!();
            println!(
                "{} No components.json found. Run 'glacial init' to create one.",
                ui::warn("⚠")
            );
        }
    }

    Ok(())
}

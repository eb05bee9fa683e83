//! File reconciliation
//!
//! This module handles:
//! - Planning, transforming and writing each file of a registry item
//! - The create/update/skip/merge decision per destination
//! - Env-file key merging
//! - The post-write import-alias resolution pass
//!
//! Files are processed in their declared order; the common-root computation
//! and custom-path assignment depend on position. The overwrite prompt is a
//! genuine suspension point.

pub mod compare;
pub mod env;
pub mod imports;

use std::path::Path;

use crate::config::Config;
use crate::error::{GlacialError, Result};
use crate::paths::{self, is_safe_target, PlanOptions};
use crate::project;
use crate::registry::{BaseColor, RegistryFile};
use crate::transform::{TransformContext, Transformer};
use crate::ui::{self, ConfirmPrompt, Reporter};

/// Flags controlling one update run
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Overwrite differing files without asking
    pub overwrite: bool,
    /// Treat every prompt as answered yes
    pub force: bool,
    pub silent: bool,
    /// Item came from a remote (non-registry) source
    pub is_remote: bool,
    /// Item came from another workspace package; import-line differences
    /// are not treated as content changes
    pub is_workspace: bool,
    /// Custom output path override
    pub path: Option<String>,
}

/// Per-item outcome, merged into a command-level summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSummary {
    pub files_created: Vec<String>,
    pub files_updated: Vec<String>,
    pub files_skipped: Vec<String>,
    pub env_vars_added: Vec<String>,
    pub env_file: Option<String>,
}

impl UpdateSummary {
    /// Fold another item's outcome into this one, dropping duplicates
    pub fn merge(&mut self, other: UpdateSummary) {
        for (into, from) in [
            (&mut self.files_created, other.files_created),
            (&mut self.files_updated, other.files_updated),
            (&mut self.files_skipped, other.files_skipped),
            (&mut self.env_vars_added, other.env_vars_added),
        ] {
            for entry in from {
                if !into.contains(&entry) {
                    into.push(entry);
                }
            }
        }
        if other.env_file.is_some() {
            self.env_file = other.env_file;
        }
    }
}

/// Reconcile one registry item's files against the project
pub fn update_files(
    files: &[RegistryFile],
    config: &Config,
    transformer: &Transformer,
    prompt: &mut dyn ConfirmPrompt,
    options: &UpdateOptions,
    base_color: Option<&BaseColor>,
) -> Result<UpdateSummary> {
    let mut summary = UpdateSummary::default();
    if files.is_empty() {
        return Ok(summary);
    }

    let reporter = Reporter::new("Updating files.", options.silent);
    let cwd = &config.resolved_paths.cwd;
    let info = project::project_info(cwd);
    let all_paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();

    for (index, file) in files.iter().enumerate() {
        let Some(content) = file.content.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };

        let plan_options = PlanOptions {
            common_root: paths::find_common_root(&all_paths, &file.path),
            framework: Some(info.framework),
            path: options.path.clone(),
            file_index: index,
        };

        let Some(mut destination) = paths::resolve_file_path(file, config, &plan_options) else {
            continue;
        };

        // Externally influenced destinations are validated before any
        // write.
        for external in [options.path.as_deref(), file.target.as_deref()]
            .into_iter()
            .flatten()
        {
            if !is_safe_target(external, cwd) {
                reporter.stop();
                return Err(GlacialError::PathSafetyViolation {
                    path: external.to_string(),
                });
            }
        }

        if !config.typescript {
            destination = paths::fix_extension_for_js(destination);
        }

        let is_env = env::is_env_file(&destination);
        if is_env && !destination.exists() {
            if let Some(alternative) = destination.parent().and_then(env::find_existing_env_file) {
                destination = alternative;
            }
        }

        let existing = destination.exists();
        if existing && destination.is_dir() {
            reporter.stop();
            return Err(GlacialError::DirectoryConflict {
                path: destination.display().to_string(),
            });
        }

        // Env files bypass transformation to keep key=value lines exact.
        let new_content = if is_env {
            content.to_string()
        } else {
            let ctx = TransformContext {
                filename: file.path.clone(),
                raw: content.to_string(),
                config,
                base_color,
                is_remote: options.is_remote,
                tailwind_version: info.tailwind_version,
            };
            transformer.transform(&ctx)?
        };

        let relative = relative_display(cwd, &destination);

        if existing && !is_env {
            let existing_content = std::fs::read_to_string(&destination)
                .map_err(|e| GlacialError::read(&destination, e))?;

            if compare::is_content_same(&existing_content, &new_content, options.is_workspace) {
                summary.files_skipped.push(relative);
                continue;
            }

            if !options.overwrite && !options.force {
                reporter.pause();
                let shown = relative_display(&config.resolved_paths.ui, &destination);
                let confirmed = prompt.confirm(&format!(
                    "The file {} already exists. Would you like to overwrite?",
                    ui::info(&shown)
                ))?;
                reporter.resume("Updating files.");

                if !confirmed {
                    summary.files_skipped.push(relative);
                    continue;
                }
            }
        }

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GlacialError::write(parent, e))?;
        }

        if is_env && existing {
            let existing_content = std::fs::read_to_string(&destination)
                .map_err(|e| GlacialError::read(&destination, e))?;

            let added = env::new_env_keys(&existing_content, &new_content);
            summary.env_file = Some(relative.clone());

            if added.is_empty() {
                summary.files_skipped.push(relative);
                continue;
            }

            let merged = env::merge_env_content(&existing_content, &new_content);
            std::fs::write(&destination, merged)
                .map_err(|e| GlacialError::write(&destination, e))?;
            summary.env_vars_added = added;
            summary.files_updated.push(relative);
            continue;
        }

        std::fs::write(&destination, &new_content)
            .map_err(|e| GlacialError::write(&destination, e))?;

        if existing {
            summary.files_updated.push(relative);
        } else {
            if is_env {
                summary.env_vars_added = env::parse_env_content(&new_content)
                    .into_iter()
                    .map(|(key, _)| key)
                    .collect();
                summary.env_file = Some(relative.clone());
            }
            summary.files_created.push(relative);
        }
    }

    // Post-write pass: rewrite imports across everything the item touched.
    let mut touched = summary.files_created.clone();
    touched.extend(summary.files_updated.clone());
    touched.extend(summary.files_skipped.clone());

    let rewritten = imports::resolve_imports(&touched, config, &reporter)?;
    summary.files_updated.extend(rewritten);

    // A file both created and updated reports only as created.
    let created = summary.files_created.clone();
    summary.files_updated.retain(|f| !created.contains(f));

    dedup(&mut summary.files_created);
    dedup(&mut summary.files_updated);
    dedup(&mut summary.files_skipped);

    report(&reporter, &summary);

    Ok(summary)
}

fn dedup(entries: &mut Vec<String>) {
    let mut seen = std::collections::BTreeSet::new();
    entries.retain(|e| seen.insert(e.clone()));
}

fn relative_display(base: &Path, path: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) => paths::to_forward_slashes(relative),
        Err(_) => paths::to_forward_slashes(path),
    }
}

fn report(reporter: &Reporter, summary: &UpdateSummary) {
    if summary.files_created.is_empty()
        && summary.files_updated.is_empty()
        && summary.files_skipped.is_empty()
    {
        reporter.finish_info("No files updated.");
        return;
    }

    if summary.files_created.is_empty() {
        reporter.stop();
    } else {
        reporter.succeed(&format!(
            "Created {} {}:",
            summary.files_created.len(),
            plural(summary.files_created.len())
        ));
        for file in &summary.files_created {
            reporter.log(&format!("  - {file}"));
        }
    }

    if !summary.files_updated.is_empty() {
        reporter.log(&format!(
            "Updated {} {}:",
            summary.files_updated.len(),
            plural(summary.files_updated.len())
        ));
        for file in &summary.files_updated {
            reporter.log(&format!("  - {file}"));
        }
    }

    if !summary.files_skipped.is_empty() {
        reporter.log(&format!(
            "Skipped {} {}: (files might be identical, use --overwrite to overwrite)",
            summary.files_skipped.len(),
            plural(summary.files_skipped.len())
        ));
        for file in &summary.files_skipped {
            reporter.log(&format!("  - {file}"));
        }
    }

    if let (false, Some(env_file)) = (summary.env_vars_added.is_empty(), &summary.env_file) {
        reporter.log(&format!(
            "Added the following variables to {}:",
            ui::info(env_file)
        ));
        for key in &summary.env_vars_added {
            reporter.log(&format!("  {} {key}", ui::success("+")));
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "file" } else { "files" }
}

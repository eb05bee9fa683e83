//! Terminal presentation layer
//!
//! This module handles:
//! - Styled output helpers (info/success/warning highlighting)
//! - Spinner-based progress reporting during file updates
//! - The overwrite confirmation prompt
//!
//! All interactive confirmation goes through the [`ConfirmPrompt`] trait so
//! the installer can be driven by a preset answer in tests instead of a
//! terminal.

use std::collections::VecDeque;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{GlacialError, Result};

/// Style a fragment as informational (cyan)
pub fn info(text: &str) -> String {
    style(text).cyan().to_string()
}

/// Style a fragment as a success marker (green)
pub fn success(text: &str) -> String {
    style(text).green().to_string()
}

/// Style a fragment as a warning (yellow)
pub fn warn(text: &str) -> String {
    style(text).yellow().to_string()
}

/// Style a fragment as an error (red)
pub fn error(text: &str) -> String {
    style(text).red().to_string()
}

/// Spinner wrapper used while files are being written
///
/// Silent mode produces no output at all; used for `--silent` and for unit
/// tests that drive the installer directly.
pub struct Reporter {
    spinner: Option<ProgressBar>,
    silent: bool,
}

impl Reporter {
    /// Create a reporter and start the spinner unless silent
    pub fn new(message: &str, silent: bool) -> Self {
        if silent {
            return Self {
                spinner: None,
                silent,
            };
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));

        Self {
            spinner: Some(spinner),
            silent,
        }
    }

    /// Pause the spinner (before handing the terminal to a prompt)
    pub fn pause(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.disable_steady_tick();
            spinner.set_message(String::new());
        }
    }

    /// Resume the spinner after a prompt
    pub fn resume(&self, message: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(message.to_string());
            spinner.enable_steady_tick(Duration::from_millis(80));
        }
    }

    /// Finish the spinner with a success line
    pub fn succeed(&self, message: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
        if !self.silent {
            println!("{} {}", success("✔"), message);
        }
    }

    /// Finish the spinner with an informational line
    pub fn finish_info(&self, message: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
        if !self.silent {
            println!("{} {}", info("ℹ"), message);
        }
    }

    /// Stop the spinner without a closing line
    pub fn stop(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }

    /// Plain output line, suppressed in silent mode
    pub fn log(&self, message: &str) {
        if !self.silent {
            println!("{message}");
        }
    }

    /// Warning line, suppressed in silent mode
    pub fn warn(&self, message: &str) {
        if !self.silent {
            eprintln!("{} {}", warn("⚠"), message);
        }
    }
}

/// Yes/no confirmation collaborator
///
/// The installer suspends on this when a destination file exists with
/// different content and no force flag was given.
pub trait ConfirmPrompt {
    /// Ask the user to confirm `message`, defaulting to "no"
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// Interactive prompt backed by `inquire`
pub struct InquireConfirm;

impl ConfirmPrompt for InquireConfirm {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        inquire::Confirm::new(message)
            .with_default(false)
            .prompt()
            .map_err(|e| GlacialError::PromptFailed {
                reason: e.to_string(),
            })
    }
}

/// Preset answers for non-interactive use and tests
///
/// Answers are consumed in order; when exhausted, `fallback` is returned.
pub struct PresetConfirm {
    answers: VecDeque<bool>,
    fallback: bool,
}

impl PresetConfirm {
    pub fn new(answers: Vec<bool>, fallback: bool) -> Self {
        Self {
            answers: answers.into(),
            fallback,
        }
    }

    /// A prompt that always answers `answer`
    pub fn always(answer: bool) -> Self {
        Self::new(Vec::new(), answer)
    }
}

impl ConfirmPrompt for PresetConfirm {
    fn confirm(&mut self, _message: &str) -> Result<bool> {
        Ok(self.answers.pop_front().unwrap_or(self.fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_confirm_order() {
        let mut prompt = PresetConfirm::new(vec![true, false], false);
        assert!(prompt.confirm("first?").unwrap());
        assert!(!prompt.confirm("second?").unwrap());
        // Exhausted, falls back
        assert!(!prompt.confirm("third?").unwrap());
    }

    #[test]
    fn test_preset_confirm_always() {
        let mut prompt = PresetConfirm::always(true);
        assert!(prompt.confirm("?").unwrap());
        assert!(prompt.confirm("?").unwrap());
    }

    #[test]
    fn test_silent_reporter_has_no_spinner() {
        let reporter = Reporter::new("Updating files.", true);
        assert!(reporter.spinner.is_none());
        reporter.succeed("done");
        reporter.stop();
    }
}

//! Source transform pipeline
//!
//! A fixed, ordered sequence of source-to-source rewrites applied to one
//! file's text before it is written:
//!
//! 1. structural single-file-component normalization (pluggable, identity
//!    by default)
//! 2. import-alias rewriting
//! 3. CSS custom-property injection (pluggable, identity by default)
//! 4. Tailwind prefix injection
//! 5. icon-library substitution
//!
//! Every stage is a pure function of `(source, context)` returning a new
//! string plus a mutation count used only for diagnostics. No state is
//! shared across files.

pub mod icons;
pub mod imports;
pub mod prefix;

use crate::config::Config;
use crate::error::Result;
use crate::project::TailwindVersion;
use crate::registry::{BaseColor, IconTranslations};

/// Per-file input to the pipeline
#[derive(Debug, Clone)]
pub struct TransformContext<'a> {
    /// Registry-relative filename, used to decide template handling
    pub filename: String,
    /// Original file content as fetched
    pub raw: String,
    pub config: &'a Config,
    pub base_color: Option<&'a BaseColor>,
    /// Whether the item came from a remote (non-registry-namespaced) source
    pub is_remote: bool,
    /// Target project's Tailwind major version, probed once per item
    pub tailwind_version: Option<TailwindVersion>,
}

/// One rewrite stage; pure in `(source, context)`
pub trait TransformStage {
    fn name(&self) -> &'static str;

    /// Apply the stage, returning the new source and a mutation count
    fn apply(&self, ctx: &TransformContext, source: &str) -> Result<(String, usize)>;
}

/// Structural SFC normalization placeholder
///
/// The real normalizer is supplied by the embedding tool; the default
/// passes sources through untouched.
pub struct StructuralNormalize;

impl TransformStage for StructuralNormalize {
    fn name(&self) -> &'static str {
        "structural-normalize"
    }

    fn apply(&self, _ctx: &TransformContext, source: &str) -> Result<(String, usize)> {
        Ok((source.to_string(), 0))
    }
}

/// CSS custom-property injection placeholder
///
/// Consumes the resolved base color; the default passes sources through
/// untouched.
pub struct CssVarsInject;

impl TransformStage for CssVarsInject {
    fn name(&self) -> &'static str {
        "css-vars"
    }

    fn apply(&self, _ctx: &TransformContext, source: &str) -> Result<(String, usize)> {
        Ok((source.to_string(), 0))
    }
}

/// The fixed-order pipeline
pub struct Transformer {
    stages: Vec<Box<dyn TransformStage>>,
}

impl Transformer {
    /// Build the default pipeline with the given icon translation table
    pub fn new(icons: IconTranslations) -> Self {
        Self {
            stages: vec![
                Box::new(StructuralNormalize),
                Box::new(imports::ImportRewrite),
                Box::new(CssVarsInject),
                Box::new(prefix::TailwindPrefix),
                Box::new(icons::IconSubstitute::new(icons)),
            ],
        }
    }

    /// Swap in an externally supplied structural normalization stage
    pub fn with_structural_stage(mut self, stage: Box<dyn TransformStage>) -> Self {
        self.stages[0] = stage;
        self
    }

    /// Swap in an externally supplied CSS-variable stage
    pub fn with_css_vars_stage(mut self, stage: Box<dyn TransformStage>) -> Self {
        self.stages[2] = stage;
        self
    }

    /// Run every stage in order over the context's raw source
    pub fn transform(&self, ctx: &TransformContext) -> Result<String> {
        let mut source = ctx.raw.clone();

        for stage in &self.stages {
            let (next, _mutations) = stage.apply(ctx, &source)?;
            source = next;
        }

        Ok(source)
    }
}

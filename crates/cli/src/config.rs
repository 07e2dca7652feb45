#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Args;
use ns_core::{GenerationOptions, LabelFormat, Slide, SplitLevel};
use std::fs;
use std::path::{Path, PathBuf};

/// Generation knobs shared by `generate` and `plan`. Flags win over the `--config` file, which
/// wins over built-in defaults.
#[derive(Args, Clone, Debug, Default)]
pub struct OptionFlags {
    /// JSON file with generation options.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// 1 whole, 2 paragraph, 3 line, 4 sentence (names accepted too).
    #[arg(long)]
    pub split_level: Option<SplitLevel>,
    #[arg(long)]
    pub label_format: Option<LabelFormat>,
    #[arg(long)]
    pub max_label_length: Option<usize>,
    /// Page layout id to populate; repeat to select several. Default is every layout.
    #[arg(long = "layout")]
    pub layouts: Vec<i64>,
    /// New friendly name for the pageset.
    #[arg(long)]
    pub title: Option<String>,
}

impl OptionFlags {
    pub fn resolve(&self) -> Result<GenerationOptions> {
        let base = match &self.config {
            Some(path) => load_options(path)?,
            None => GenerationOptions::default(),
        };
        let options = self.apply(base);
        options.validate()?;
        Ok(options)
    }

    fn apply(&self, mut options: GenerationOptions) -> GenerationOptions {
        if let Some(level) = self.split_level {
            options.split_level = level;
        }
        if let Some(format) = self.label_format {
            options.label_format = format;
        }
        if let Some(length) = self.max_label_length {
            options.max_label_length = length;
        }
        if !self.layouts.is_empty() {
            options.layouts = Some(self.layouts.clone());
        }
        if let Some(title) = &self.title {
            options.title = Some(title.clone());
        }
        options
    }
}

pub fn load_options(path: &Path) -> Result<GenerationOptions> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config '{}'", path.display()))
}

/// Slides as a JSON array of `{ "index", "title", "notes" }`.
pub fn load_slides(path: &Path) -> Result<Vec<Slide>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read slides '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid slides file '{}'", path.display()))
}

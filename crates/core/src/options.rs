#![forbid(unsafe_code)]

use crate::{CoreError, DEFAULT_LABEL_LENGTH, LabelFormat, SplitLevel, validate_label_length};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Knobs for one generation run. Per-slide overrides are keyed by 1-based slide index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationOptions {
    pub split_level: SplitLevel,
    pub split_overrides: BTreeMap<u32, SplitLevel>,
    pub label_format: LabelFormat,
    pub max_label_length: usize,
    pub label_length_overrides: BTreeMap<u32, usize>,
    /// Restrict placement to these page layout ids. `None` places on every layout.
    pub layouts: Option<Vec<i64>>,
    /// New friendly name for the pageset. `None` keeps the current one.
    pub title: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            split_level: SplitLevel::default(),
            split_overrides: BTreeMap::new(),
            label_format: LabelFormat::default(),
            max_label_length: DEFAULT_LABEL_LENGTH,
            label_length_overrides: BTreeMap::new(),
            layouts: None,
            title: None,
        }
    }
}

impl GenerationOptions {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_label_length(self.max_label_length)?;
        for (slide, length) in &self.label_length_overrides {
            validate_label_length(*length).map_err(|err| match err {
                CoreError::InvalidOption(message) => {
                    CoreError::InvalidOption(format!("slide {slide}: {message}"))
                }
                other => other,
            })?;
        }
        if self
            .split_overrides
            .keys()
            .chain(self.label_length_overrides.keys())
            .any(|slide| *slide == 0)
        {
            return Err(CoreError::InvalidOption(
                "per-slide overrides use 1-based slide indices".to_string(),
            ));
        }
        if let Some(layouts) = &self.layouts
            && layouts.is_empty()
        {
            return Err(CoreError::InvalidOption(
                "layout selection must name at least one layout".to_string(),
            ));
        }
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err(CoreError::InvalidOption(
                "pageset title must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    pub fn split_level_for(&self, slide_index: u32) -> SplitLevel {
        self.split_overrides
            .get(&slide_index)
            .copied()
            .unwrap_or(self.split_level)
    }

    pub fn label_length_for(&self, slide_index: u32) -> usize {
        self.label_length_overrides
            .get(&slide_index)
            .copied()
            .unwrap_or(self.max_label_length)
    }
}

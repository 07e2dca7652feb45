#![forbid(unsafe_code)]

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One slide as yielded by the presentation reader: 1-based index, title, raw speaker notes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub index: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub notes: String,
}

impl Slide {
    pub fn new(index: u32, title: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            notes: notes.into(),
        }
    }

    /// Trimmed title, or `Slide {index}` when the slide has none.
    pub fn display_title(&self) -> Cow<'_, str> {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            Cow::Owned(format!("Slide {}", self.index))
        } else {
            Cow::Borrowed(trimmed)
        }
    }
}

/// A unit of note text destined to become one button message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub slide_index: u32,
    pub chunk_index: usize,
    pub text: String,
}

pub fn validate_slides(slides: &[Slide]) -> Result<(), CoreError> {
    let mut previous: Option<u32> = None;
    for slide in slides {
        if slide.index == 0 {
            return Err(CoreError::InputFormat(
                "slide indices are 1-based; found index 0".to_string(),
            ));
        }
        if let Some(prev) = previous
            && slide.index <= prev
        {
            return Err(CoreError::InputFormat(format!(
                "slide indices must be strictly increasing (slide {} follows slide {prev})",
                slide.index
            )));
        }
        previous = Some(slide.index);
    }
    Ok(())
}

/// Collapse every line break into a single space so the text fits a single-line field.
///
/// Returns the normalized text and whether anything was replaced.
pub fn single_line(text: &str) -> (Cow<'_, str>, bool) {
    if !text.contains(['\n', '\r']) {
        return (Cow::Borrowed(text), false);
    }
    let normalized = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
    (Cow::Owned(normalized), true)
}

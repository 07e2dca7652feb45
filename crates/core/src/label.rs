#![forbid(unsafe_code)]

use crate::{CoreError, single_line};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MIN_LABEL_LENGTH: usize = 10;
pub const MAX_LABEL_LENGTH: usize = 60;
pub const DEFAULT_LABEL_LENGTH: usize = 30;
pub const ELLIPSIS: &str = "...";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFormat {
    /// `{title} (Part {chunk})`
    #[default]
    TitlePart,
    /// `Slide {slide}: {content}`
    SlideContent,
    /// `{content}`
    ContentOnly,
    /// `{slide} - {title}`
    NumTitle,
    /// `{slide}.{chunk}: {content}`
    NumPartContent,
}

impl LabelFormat {
    pub const ALL: [LabelFormat; 5] = [
        LabelFormat::TitlePart,
        LabelFormat::SlideContent,
        LabelFormat::ContentOnly,
        LabelFormat::NumTitle,
        LabelFormat::NumPartContent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TitlePart => "title_part",
            Self::SlideContent => "slide_content",
            Self::ContentOnly => "content_only",
            Self::NumTitle => "num_title",
            Self::NumPartContent => "num_part_content",
        }
    }
}

impl FromStr for LabelFormat {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| CoreError::InvalidOption(format!("unknown label format: {raw}")))
    }
}

pub fn validate_label_length(max_length: usize) -> Result<usize, CoreError> {
    if (MIN_LABEL_LENGTH..=MAX_LABEL_LENGTH).contains(&max_length) {
        Ok(max_length)
    } else {
        Err(CoreError::InvalidOption(format!(
            "max label length must be {MIN_LABEL_LENGTH}-{MAX_LABEL_LENGTH}, got {max_length}"
        )))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LabelInput<'a> {
    pub slide_index: u32,
    pub title: &'a str,
    pub chunk_index: usize,
    pub chunk_count: usize,
    pub content: &'a str,
}

/// Render a button label no longer than `max_length` characters.
///
/// A label that does not fit is cut to `max_length - 3` characters and ends in [`ELLIPSIS`],
/// whatever decoration the format adds. For `title_part` the part number is cut first.
pub fn format_label(input: &LabelInput<'_>, format: LabelFormat, max_length: usize) -> String {
    let multipart = input.chunk_count > 1;
    let (prefix, body, suffix) = match format {
        LabelFormat::TitlePart => {
            let suffix = if multipart {
                format!(" (Part {})", input.chunk_index)
            } else {
                String::new()
            };
            (String::new(), input.title, suffix)
        }
        LabelFormat::SlideContent => (
            format!("Slide {}: ", input.slide_index),
            input.content,
            String::new(),
        ),
        LabelFormat::ContentOnly => (String::new(), input.content, String::new()),
        LabelFormat::NumTitle => (
            format!("{} - ", input.slide_index),
            input.title,
            String::new(),
        ),
        LabelFormat::NumPartContent => {
            let prefix = if multipart {
                format!("{}.{}: ", input.slide_index, input.chunk_index)
            } else {
                format!("{}: ", input.slide_index)
            };
            (prefix, input.content, String::new())
        }
    };

    let (body, _) = single_line(body.trim());
    let rendered = format!("{prefix}{body}{suffix}");
    if rendered.chars().count() <= max_length {
        return rendered;
    }

    let kept = truncate_chars(&rendered, max_length.saturating_sub(ELLIPSIS.len()));
    format!("{}{ELLIPSIS}", kept.trim_end())
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

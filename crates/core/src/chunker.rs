#![forbid(unsafe_code)]

use crate::{Chunk, CoreError, Slide};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s+").expect("sentence end pattern"));

/// Granularity used to cut a slide's notes into button messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SplitLevel {
    Whole = 1,
    #[default]
    Paragraph = 2,
    Line = 3,
    Sentence = 4,
}

impl SplitLevel {
    pub const ALL: [SplitLevel; 4] = [
        SplitLevel::Whole,
        SplitLevel::Paragraph,
        SplitLevel::Line,
        SplitLevel::Sentence,
    ];

    pub fn level(self) -> u8 {
        self as u8
    }

    /// Separator that re-joins this level's chunks into the (whitespace-normalized) source.
    pub fn delimiter(self) -> &'static str {
        match self {
            Self::Whole => "",
            Self::Paragraph => "\n\n",
            Self::Line => "\n",
            Self::Sentence => " ",
        }
    }
}

impl TryFrom<u8> for SplitLevel {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Whole),
            2 => Ok(Self::Paragraph),
            3 => Ok(Self::Line),
            4 => Ok(Self::Sentence),
            other => Err(CoreError::InvalidOption(format!(
                "split level must be 1-4, got {other}"
            ))),
        }
    }
}

impl From<SplitLevel> for u8 {
    fn from(value: SplitLevel) -> Self {
        value.level()
    }
}

impl FromStr for SplitLevel {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "whole" => Ok(Self::Whole),
            "paragraph" | "paragraphs" => Ok(Self::Paragraph),
            "line" | "lines" => Ok(Self::Line),
            "sentence" | "sentences" => Ok(Self::Sentence),
            other => other
                .parse::<u8>()
                .map_err(|_| CoreError::InvalidOption(format!("unknown split level: {raw}")))
                .and_then(Self::try_from),
        }
    }
}

/// Split raw notes into ordered, trimmed, non-empty chunk texts.
pub fn split_notes(notes: &str, level: SplitLevel) -> Vec<String> {
    let notes = notes.trim();
    if notes.is_empty() {
        return Vec::new();
    }

    let pieces: Vec<&str> = match level {
        SplitLevel::Whole => vec![notes],
        SplitLevel::Paragraph => PARAGRAPH_BREAK.split(notes).collect(),
        SplitLevel::Line => notes.split('\n').collect(),
        SplitLevel::Sentence => split_sentences(notes),
    };

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

// The period stays with the sentence it terminates.
fn split_sentences(notes: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for found in SENTENCE_END.find_iter(notes) {
        out.push(&notes[start..found.start() + 1]);
        start = found.end();
    }
    out.push(&notes[start..]);
    out
}

pub fn chunk_slide(slide: &Slide, level: SplitLevel) -> Vec<Chunk> {
    split_notes(&slide.notes, level)
        .into_iter()
        .enumerate()
        .map(|(position, text)| Chunk {
            slide_index: slide.index,
            chunk_index: position + 1,
            text,
        })
        .collect()
}

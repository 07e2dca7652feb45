#![forbid(unsafe_code)]

use crate::{
    CoreError, GenerationOptions, LabelInput, Slide, chunk_slide, format_label, single_line,
    slide_color, validate_slides,
};

/// Everything needed to write one content button, before ids or cells are assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonSpec {
    pub slide_index: u32,
    pub chunk_index: usize,
    pub label: String,
    pub message: String,
    pub color: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonPlan {
    pub buttons: Vec<ButtonSpec>,
    /// Messages whose line breaks were folded into spaces.
    pub normalized_messages: usize,
    /// Slides that produced no chunks.
    pub empty_slides: Vec<u32>,
}

impl ButtonPlan {
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Buttons grouped by source slide, in slide order.
    pub fn slide_batches(&self) -> impl Iterator<Item = &[ButtonSpec]> {
        self.buttons
            .chunk_by(|a, b| a.slide_index == b.slide_index)
    }
}

/// Chunk, label and color every slide, preserving slide then chunk order.
pub fn plan_buttons(slides: &[Slide], options: &GenerationOptions) -> Result<ButtonPlan, CoreError> {
    options.validate()?;
    validate_slides(slides)?;

    let mut plan = ButtonPlan::default();
    for slide in slides {
        let chunks = chunk_slide(slide, options.split_level_for(slide.index));
        if chunks.is_empty() {
            plan.empty_slides.push(slide.index);
            continue;
        }

        let title = slide.display_title();
        let color = slide_color(slide.index);
        let max_length = options.label_length_for(slide.index);
        let chunk_count = chunks.len();
        for chunk in chunks {
            let label = format_label(
                &LabelInput {
                    slide_index: slide.index,
                    title: &title,
                    chunk_index: chunk.chunk_index,
                    chunk_count,
                    content: &chunk.text,
                },
                options.label_format,
                max_length,
            );
            let (message, normalized) = single_line(&chunk.text);
            if normalized {
                plan.normalized_messages += 1;
            }
            plan.buttons.push(ButtonSpec {
                slide_index: slide.index,
                chunk_index: chunk.chunk_index,
                label,
                message: message.into_owned(),
                color,
            });
        }
    }
    Ok(plan)
}

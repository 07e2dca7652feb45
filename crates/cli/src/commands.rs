#![forbid(unsafe_code)]

use crate::config::{OptionFlags, load_slides};
use anyhow::{Context, Result, bail};
use ns_core::{ButtonPlan, GenerationOptions, plan_buttons};
use ns_storage::{GenerateRequest, PagesetStore, ProgressEvent, ReferenceTemplate, RunObserver};
use serde::Serialize;
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;
use tracing::{debug, info, warn};

/// Logs generation progress; never asks the run to stop.
struct LogObserver;

impl RunObserver for LogObserver {
    fn on_progress(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Planned { buttons, layouts } => {
                info!(buttons, layouts, "placement planned");
            }
            ProgressEvent::HomeButtonCopied => info!("home button copied from reference"),
            ProgressEvent::HomeButtonPresent => debug!("home button already present"),
            ProgressEvent::ButtonsWritten { written, total } => {
                debug!(written, total, "buttons written");
            }
            ProgressEvent::Finalized => debug!("pageset committed"),
        }
    }
}

fn build_plan(slides_path: &Path, flags: &OptionFlags) -> Result<(ButtonPlan, GenerationOptions)> {
    let options = flags.resolve()?;
    let slides = load_slides(slides_path)?;
    let plan = plan_buttons(&slides, &options)
        .with_context(|| format!("cannot plan buttons for '{}'", slides_path.display()))?;
    for slide in &plan.empty_slides {
        warn!(slide, "slide has no speaker notes; no buttons");
    }
    if plan.normalized_messages > 0 {
        debug!(
            count = plan.normalized_messages,
            "line breaks in messages folded into spaces"
        );
    }
    Ok((plan, options))
}

pub fn generate(
    slides: &Path,
    pageset: &Path,
    output: &Path,
    reference: &Path,
    flags: &OptionFlags,
) -> Result<()> {
    let (plan, options) = build_plan(slides, flags)?;
    if plan.is_empty() {
        bail!("no slide in '{}' has speaker notes", slides.display());
    }
    let reference = ReferenceTemplate::load(reference)
        .with_context(|| format!("cannot load reference '{}'", reference.display()))?;

    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = tempfile::Builder::new()
        .prefix(".notesnap-")
        .suffix(".spb")
        .tempfile_in(output_dir)
        .with_context(|| format!("cannot stage output in '{}'", output_dir.display()))?;
    fs::copy(pageset, staged.path())
        .with_context(|| format!("cannot copy pageset '{}'", pageset.display()))?;

    let outcome = {
        let mut store = PagesetStore::open(staged.path())
            .with_context(|| format!("cannot open pageset '{}'", pageset.display()))?;
        let existing = store.existing_buttons()?;
        if existing.count > 0 {
            warn!(
                count = existing.count,
                samples = ?existing.sample_labels,
                "pageset already has buttons; appending"
            );
        }
        store.generate(
            GenerateRequest {
                plan,
                reference,
                layouts: options.layouts,
                title: options.title,
            },
            &mut LogObserver,
        )?
    };

    staged
        .persist(output)
        .map_err(|err| err.error)
        .with_context(|| format!("cannot write output '{}'", output.display()))?;
    info!(
        output = %output.display(),
        buttons = outcome.buttons_written,
        placements = outcome.placements_written,
        layouts = ?outcome.layout_ids,
        "pageset written"
    );
    Ok(())
}

pub fn inspect(pageset: &Path) -> Result<()> {
    let store = PagesetStore::open_read_only(pageset)
        .with_context(|| format!("cannot open pageset '{}'", pageset.display()))?;
    let capacity = store.capacity()?;
    let existing = store.existing_buttons()?;

    let mut out = io::stdout().lock();
    writeln!(out, "content page: {}", capacity.page_id)?;
    for layout in &capacity.layouts {
        writeln!(
            out,
            "layout {}: {}x{} ({} cells/page), reserved {}, occupied {}, free {}",
            layout.layout_id,
            layout.columns,
            layout.rows,
            layout.cells_per_page,
            layout.reserved_cells,
            layout.occupied_cells,
            layout.available_cells
        )?;
    }
    match capacity.limiting_layout() {
        Some(layout_id) => writeln!(
            out,
            "room for {} buttons (limited by layout {layout_id})",
            capacity.available_cells()
        )?,
        None => writeln!(out, "no layouts")?,
    }
    writeln!(out, "existing buttons: {}", existing.count)?;
    for label in &existing.sample_labels {
        writeln!(out, "  {label}")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct PlannedButton<'a> {
    slide: u32,
    chunk: usize,
    label: &'a str,
    message: &'a str,
    color: String,
}

fn hex_color(color: u32) -> String {
    format!("#{color:08X}")
}

pub fn plan(slides: &Path, flags: &OptionFlags, json: bool) -> Result<()> {
    let (plan, _) = build_plan(slides, flags)?;
    let mut out = io::stdout().lock();

    if json {
        let rows: Vec<PlannedButton<'_>> = plan
            .buttons
            .iter()
            .map(|button| PlannedButton {
                slide: button.slide_index,
                chunk: button.chunk_index,
                label: &button.label,
                message: &button.message,
                color: hex_color(button.color),
            })
            .collect();
        serde_json::to_writer_pretty(&mut out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }

    for button in &plan.buttons {
        writeln!(
            out,
            "{:>3}.{:<2} {} {:<32} {}",
            button.slide_index,
            button.chunk_index,
            hex_color(button.color),
            button.label,
            button.message
        )?;
    }
    writeln!(out, "{} buttons", plan.len())?;
    Ok(())
}

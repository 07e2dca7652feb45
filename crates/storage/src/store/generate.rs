#![forbid(unsafe_code)]

use super::geometry::{content_page_id, layout_slots, page_layouts, select_layouts};
use super::home::{copy_home_button_tx, home_reference_id, place_home_button_tx};
use super::schema::{
    BUTTON, COMMAND_SEQUENCE, ELEMENT_PLACEMENT, ELEMENT_REFERENCE, RECORD_TABLES,
    SYNCHRONIZATION, table_exists,
};
use super::sequence::{persist_ids_tx, seed_ids};
use super::*;
use ns_core::{ButtonSpec, IdAllocator, PlacementPlan, SlotPlacement, single_line};
use rusqlite::{Transaction, params};
use tracing::{debug, info, info_span, warn};

const BORDER_COLOR: i64 = -132_102;
const FOREGROUND_COLOR: i64 = -14_934_754;
const GRID_SPAN: &str = "1,1";
/// Image/label ownership flag for content the pageset owns itself.
const OWNED: i64 = 3;
const COMMAND_FLAGS: i64 = 8;
const CONTENT_TYPE: i64 = 6;

fn speak_message_commands() -> String {
    serde_json::json!({
        "$type": "1",
        "$values": [{ "$type": "3", "MessageAction": 0 }],
    })
    .to_string()
}

fn insert_button_tx(
    tx: &Transaction<'_>,
    button_id: i64,
    reference_id: i64,
    spec: &ButtonSpec,
) -> Result<(), StoreError> {
    let (message, _) = single_line(&spec.message);
    let (label, _) = single_line(&spec.label);
    tx.execute(
        r#"
        INSERT INTO Button (
            Id, Label, Message, ImageOwnership, BorderColor, BorderThickness, LabelOwnership,
            CommandFlags, ContentType, UniqueId, ElementReferenceId, ActiveContentType,
            LibrarySymbolId, PageSetImageId, SymbolColorDataId, MessageRecordingId
        )
        VALUES (?1, ?2, ?3, 0, ?4, 0.0, ?5, ?6, ?7, ?8, ?9, 0, NULL, 0, 0, 0)
        "#,
        params![
            button_id,
            &*label,
            &*message,
            BORDER_COLOR,
            OWNED,
            COMMAND_FLAGS,
            CONTENT_TYPE,
            uuid::Uuid::new_v4().to_string(),
            reference_id,
        ],
    )?;
    Ok(())
}

fn insert_element_reference_tx(
    tx: &Transaction<'_>,
    reference_id: i64,
    page_id: i64,
    color: u32,
) -> Result<(), StoreError> {
    tx.execute(
        r#"
        INSERT INTO ElementReference (
            Id, ElementType, ForegroundColor, BackgroundColor, AudioCueRecordingId, PageId
        )
        VALUES (?1, 0, ?2, ?3, 0, ?4)
        "#,
        params![reference_id, FOREGROUND_COLOR, i64::from(color), page_id],
    )?;
    Ok(())
}

fn insert_speak_command_tx(
    tx: &Transaction<'_>,
    command_id: i64,
    button_id: i64,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO CommandSequence (Id, SerializedCommands, ButtonId) VALUES (?1, ?2, ?3)",
        params![command_id, speak_message_commands(), button_id],
    )?;
    Ok(())
}

fn insert_placements_tx(
    tx: &Transaction<'_>,
    ids: &mut IdAllocator,
    reference_id: i64,
    placement: &SlotPlacement,
) -> Result<usize, StoreError> {
    for (layout_id, cell) in &placement.cells {
        tx.execute(
            r#"
            INSERT INTO ElementPlacement (
                Id, GridPosition, GridSpan, Visible, ElementReferenceId, PageLayoutId
            )
            VALUES (?1, ?2, ?3, 1, ?4, ?5)
            "#,
            params![
                ids.next(ELEMENT_PLACEMENT)?,
                cell.to_string(),
                GRID_SPAN,
                reference_id,
                layout_id
            ],
        )?;
    }
    Ok(placement.cells.len())
}

/// Button, element reference, speak command, then one placement per layout.
fn write_button_tx(
    tx: &Transaction<'_>,
    ids: &mut IdAllocator,
    page_id: i64,
    spec: &ButtonSpec,
    placement: &SlotPlacement,
) -> Result<usize, StoreError> {
    let button_id = ids.next(BUTTON)?;
    let reference_id = ids.next(ELEMENT_REFERENCE)?;
    insert_button_tx(tx, button_id, reference_id, spec)?;
    insert_element_reference_tx(tx, reference_id, page_id, spec.color)?;
    insert_speak_command_tx(tx, ids.next(COMMAND_SEQUENCE)?, button_id)?;
    insert_placements_tx(tx, ids, reference_id, placement)
}

fn finalize_tx(
    tx: &Transaction<'_>,
    page_id: i64,
    title: Option<&str>,
    ticks: i64,
) -> Result<(), StoreError> {
    if let Some(title) = title {
        let renamed = tx.execute(
            "UPDATE PageSetProperties SET FriendlyName=?1 WHERE Id=1",
            params![title],
        )?;
        if renamed == 0 {
            return Err(StoreError::integrity("PageSetProperties has no row with Id 1"));
        }
        tx.execute("UPDATE Page SET Title=?1 WHERE Id=?2", params![title, page_id])?;
    }

    let stamped = tx.execute("UPDATE PageSetProperties SET TimeStamp=?1", params![ticks])?;
    if stamped == 0 {
        return Err(StoreError::integrity("PageSetProperties is empty"));
    }
    tx.execute("UPDATE Page SET TimeStamp=?1", params![ticks])?;
    if table_exists(tx, SYNCHRONIZATION)? {
        tx.execute(
            "UPDATE Synchronization SET PageSetTimestamp=?1",
            params![ticks],
        )?;
    }
    Ok(())
}

fn check_abort(observer: &dyn RunObserver) -> Result<(), StoreError> {
    if observer.should_abort() {
        warn!("abort requested, rolling back");
        return Err(StoreError::Aborted);
    }
    Ok(())
}

impl PagesetStore {
    /// Write every planned button into the pageset in one transaction.
    ///
    /// Nothing is committed unless the whole run succeeds: capacity shortfalls, integrity
    /// problems, SQL errors and observer aborts all leave the file untouched.
    pub fn generate(
        &mut self,
        request: GenerateRequest,
        observer: &mut dyn RunObserver,
    ) -> Result<GenerateOutcome, StoreError> {
        let span = info_span!("generate", pageset = %self.path.display());
        let _entered = span.enter();

        let tx = self.conn.transaction()?;

        let page_id = content_page_id(&tx)?;
        let all_layouts = page_layouts(&tx, page_id)?;
        let layouts = select_layouts(all_layouts.clone(), request.layouts.as_deref())?;
        let layout_ids: Vec<i64> = layouts.iter().map(|layout| layout.layout_id).collect();

        let mut slots = Vec::with_capacity(layouts.len());
        for geometry in &layouts {
            slots.push(layout_slots(&tx, *geometry)?);
        }
        let total = request.plan.len();
        let mut placement_plan = PlacementPlan::new(slots, total)?;
        info!(
            buttons = total,
            layouts = layouts.len(),
            capacity = placement_plan.capacity(),
            "placement planned"
        );
        observer.on_progress(ProgressEvent::Planned {
            buttons: total,
            layouts: layouts.len(),
        });

        let mut ids = seed_ids(&tx, &RECORD_TABLES)?;

        check_abort(observer)?;
        let (home_reference, home_button_added) = match home_reference_id(&tx)? {
            Some(reference_id) => {
                observer.on_progress(ProgressEvent::HomeButtonPresent);
                (reference_id, false)
            }
            None => {
                let reference_id =
                    copy_home_button_tx(&tx, &request.reference, &mut ids, page_id)?;
                debug!(commands = request.reference.command_count(), "home button copied");
                observer.on_progress(ProgressEvent::HomeButtonCopied);
                (reference_id, true)
            }
        };
        // Home goes on every layout of the page, selected for this run or not.
        let mut placements_written = place_home_button_tx(
            &tx,
            &request.reference,
            &mut ids,
            home_reference,
            &all_layouts,
        )?;
        if placements_written > 0 {
            debug!(placements = placements_written, "home button placed");
        }

        let mut written = 0;
        for batch in request.plan.slide_batches() {
            check_abort(observer)?;
            for spec in batch {
                let placement = placement_plan.claim()?;
                placements_written += write_button_tx(&tx, &mut ids, page_id, spec, &placement)?;
                written += 1;
            }
            debug!(
                slide = batch[0].slide_index,
                buttons = batch.len(),
                "slide written"
            );
            observer.on_progress(ProgressEvent::ButtonsWritten { written, total });
        }

        persist_ids_tx(&tx, &ids)?;
        let timestamp_ticks = now_ticks();
        finalize_tx(&tx, page_id, request.title.as_deref(), timestamp_ticks)?;
        check_abort(observer)?;
        tx.commit()?;
        observer.on_progress(ProgressEvent::Finalized);

        info!(
            buttons = written,
            placements = placements_written,
            home_button_added,
            "pageset committed"
        );
        Ok(GenerateOutcome {
            page_id,
            layout_ids,
            buttons_written: written,
            placements_written,
            home_button_added,
            timestamp_ticks,
        })
    }
}

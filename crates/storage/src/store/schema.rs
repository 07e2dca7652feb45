#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::{Connection, OptionalExtension, params};

pub(in crate::store) const BUTTON: &str = "Button";
pub(in crate::store) const ELEMENT_REFERENCE: &str = "ElementReference";
pub(in crate::store) const ELEMENT_PLACEMENT: &str = "ElementPlacement";
pub(in crate::store) const COMMAND_SEQUENCE: &str = "CommandSequence";
pub(in crate::store) const PAGE: &str = "Page";
pub(in crate::store) const PAGE_LAYOUT: &str = "PageLayout";
pub(in crate::store) const PAGE_SET_PROPERTIES: &str = "PageSetProperties";
pub(in crate::store) const SYNCHRONIZATION: &str = "Synchronization";
pub(in crate::store) const SEQUENCE_TABLE: &str = "sqlite_sequence";

/// Tables that receive new rows, in write order. Each gets ids from the allocator.
pub(in crate::store) const RECORD_TABLES: [&str; 4] =
    [BUTTON, ELEMENT_REFERENCE, COMMAND_SEQUENCE, ELEMENT_PLACEMENT];

pub(in crate::store) const PAGESET_TABLES: &[&str] = &[
    BUTTON,
    ELEMENT_REFERENCE,
    ELEMENT_PLACEMENT,
    COMMAND_SEQUENCE,
    PAGE,
    PAGE_LAYOUT,
    PAGE_SET_PROPERTIES,
];

pub(in crate::store) const TEMPLATE_TABLES: &[&str] =
    &[BUTTON, ELEMENT_REFERENCE, ELEMENT_PLACEMENT, COMMAND_SEQUENCE];

pub(in crate::store) fn table_exists(conn: &Connection, table: &str) -> Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1",
            params![table],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub(in crate::store) fn require_tables(
    conn: &Connection,
    tables: &[&str],
    what: &str,
) -> Result<(), StoreError> {
    let mut missing = Vec::new();
    for table in tables {
        if !table_exists(conn, table)? {
            missing.push(*table);
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(StoreError::integrity(format!(
            "{what} is missing tables: {}",
            missing.join(", ")
        )))
    }
}

pub(in crate::store) fn table_columns(
    conn: &Connection,
    table: &str,
) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let mut rows = stmt.query(params![table])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(row.get(0)?);
    }
    Ok(out)
}

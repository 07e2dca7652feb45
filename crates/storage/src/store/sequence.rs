#![forbid(unsafe_code)]

use super::StoreError;
use super::schema::{SEQUENCE_TABLE, table_exists};
use ns_core::IdAllocator;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Transaction, params};

/// Seed an allocator for `tables` from the larger of the recorded sequence and the real
/// `MAX(Id)`, so ids never collide with rows written behind the sequence's back.
pub(in crate::store) fn seed_ids(
    conn: &Connection,
    tables: &[&str],
) -> Result<IdAllocator, StoreError> {
    if !table_exists(conn, SEQUENCE_TABLE)? {
        return Err(StoreError::integrity(
            "pageset has no sqlite_sequence table",
        ));
    }

    let mut ids = IdAllocator::new();
    for table in tables {
        let recorded = recorded_sequence(conn, table)?;
        let max_id: Option<i64> =
            conn.query_row(&format!("SELECT MAX(Id) FROM \"{table}\""), [], |row| {
                row.get(0)
            })?;
        ids.seed(table, recorded.max(max_id.unwrap_or(0)));
    }
    Ok(ids)
}

fn recorded_sequence(conn: &Connection, table: &str) -> Result<i64, StoreError> {
    let value: Option<Value> = conn
        .query_row(
            "SELECT seq FROM sqlite_sequence WHERE name=?1",
            params![table],
            |row| row.get(0),
        )
        .optional()?;
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Integer(seq)) if seq >= 0 => Ok(seq),
        Some(other) => Err(StoreError::integrity(format!(
            "sqlite_sequence entry for {table} is corrupt: {other:?}"
        ))),
    }
}

/// Record the allocator's high-water marks so later runs start above them.
pub(in crate::store) fn persist_ids_tx(
    tx: &Transaction<'_>,
    ids: &IdAllocator,
) -> Result<(), StoreError> {
    for (table, last) in ids.tables() {
        let changed = tx.execute(
            "UPDATE sqlite_sequence SET seq = MAX(seq, ?2) WHERE name=?1",
            params![table, last],
        )?;
        if changed == 0 {
            tx.execute(
                "INSERT INTO sqlite_sequence(name, seq) VALUES (?1, ?2)",
                params![table, last],
            )?;
        }
    }
    Ok(())
}

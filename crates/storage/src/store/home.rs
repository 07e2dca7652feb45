#![forbid(unsafe_code)]

use super::schema::{
    BUTTON, COMMAND_SEQUENCE, ELEMENT_PLACEMENT, ELEMENT_REFERENCE, TEMPLATE_TABLES,
    require_tables, table_columns,
};
use super::StoreError;
use super::geometry::occupied_cells;
use ns_core::{IdAllocator, LayoutGeometry};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Params, Row, Transaction, params};
use std::path::Path;

const HOME_LABEL: &str = "Home";

/// One row copied verbatim from the template, addressed by column name.
#[derive(Clone, Debug, PartialEq)]
struct TemplateRow {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl TemplateRow {
    fn read(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<Self> {
        let mut values = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            values.push(row.get::<_, Value>(index)?);
        }
        Ok(Self {
            columns: columns.to_vec(),
            values,
        })
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|name| name.eq_ignore_ascii_case(column))
    }

    fn integer(&self, column: &str) -> Option<i64> {
        match self.position(column).map(|index| &self.values[index]) {
            Some(Value::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    fn set(&mut self, column: &str, value: Value) {
        match self.position(column) {
            Some(index) => self.values[index] = value,
            None => {
                self.columns.push(column.to_string());
                self.values.push(value);
            }
        }
    }

    /// Write the columns the target table also has; template-only columns are dropped.
    fn insert_tx(&self, tx: &Transaction<'_>, table: &str) -> Result<(), StoreError> {
        let target = table_columns(tx, table)?;
        let mut names = Vec::new();
        let mut values = Vec::new();
        for (name, value) in self.columns.iter().zip(&self.values) {
            if target.iter().any(|column| column.eq_ignore_ascii_case(name)) {
                names.push(format!("\"{name}\""));
                values.push(value);
            }
        }
        let placeholders = (1..=values.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO \"{table}\" ({}) VALUES ({placeholders})",
            names.join(", ")
        );
        tx.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(())
    }
}

fn read_rows<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<TemplateRow>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut rows = stmt.query(params)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(TemplateRow::read(row, &columns)?);
    }
    Ok(out)
}

/// The home button subgraph of a read-only reference pageset, held in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceTemplate {
    button: TemplateRow,
    element_reference: TemplateRow,
    commands: Vec<TemplateRow>,
    placement: TemplateRow,
}

impl ReferenceTemplate {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("reference template not found: {}", path.display()),
            )));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        require_tables(&conn, TEMPLATE_TABLES, "reference template")?;
        Self::read(&conn)
    }

    fn read(conn: &Connection) -> Result<Self, StoreError> {
        let button = read_rows(
            conn,
            "SELECT * FROM Button WHERE Label=?1 ORDER BY Id ASC LIMIT 1",
            params![HOME_LABEL],
        )?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::integrity("reference template has no Home button"))?;

        let (Some(button_id), Some(reference_id)) =
            (button.integer("Id"), button.integer("ElementReferenceId"))
        else {
            return Err(StoreError::integrity(
                "reference Home button lacks Id or ElementReferenceId",
            ));
        };

        let element_reference = read_rows(
            conn,
            "SELECT * FROM ElementReference WHERE Id=?1",
            params![reference_id],
        )?
        .into_iter()
        .next()
        .ok_or_else(|| {
            StoreError::integrity(format!(
                "reference template has no ElementReference {reference_id}"
            ))
        })?;

        let commands = read_rows(
            conn,
            "SELECT * FROM CommandSequence WHERE ButtonId=?1 ORDER BY Id ASC",
            params![button_id],
        )?;

        let placement = read_rows(
            conn,
            "SELECT * FROM ElementPlacement WHERE ElementReferenceId=?1 ORDER BY Id ASC LIMIT 1",
            params![reference_id],
        )?
        .into_iter()
        .next()
        .ok_or_else(|| {
            StoreError::integrity("reference Home button has no ElementPlacement")
        })?;

        Ok(Self {
            button,
            element_reference,
            commands,
            placement,
        })
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

/// Element reference of the target's Home button, or `None` when it has no Home button.
pub(in crate::store) fn home_reference_id(conn: &Connection) -> Result<Option<i64>, StoreError> {
    let found: Option<(i64, Option<i64>)> = conn
        .query_row(
            "SELECT Id, ElementReferenceId FROM Button WHERE Label=?1 ORDER BY Id ASC LIMIT 1",
            params![HOME_LABEL],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    match found {
        None => Ok(None),
        Some((_, Some(reference_id))) => Ok(Some(reference_id)),
        Some((button_id, None)) => Err(StoreError::integrity(format!(
            "Home button {button_id} has no ElementReferenceId"
        ))),
    }
}

/// Copy the template's home button, element reference and commands into the pageset with
/// fresh ids, bound to `page_id`. Returns the new element reference id; placements are
/// written by [`place_home_button_tx`].
pub(in crate::store) fn copy_home_button_tx(
    tx: &Transaction<'_>,
    template: &ReferenceTemplate,
    ids: &mut IdAllocator,
    page_id: i64,
) -> Result<i64, StoreError> {
    let button_id = ids.next(BUTTON)?;
    let reference_id = ids.next(ELEMENT_REFERENCE)?;

    let mut button = template.button.clone();
    button.set("Id", Value::Integer(button_id));
    button.set("ElementReferenceId", Value::Integer(reference_id));
    if button.position("UniqueId").is_some() {
        button.set("UniqueId", Value::Text(uuid::Uuid::new_v4().to_string()));
    }
    button.insert_tx(tx, BUTTON)?;

    let mut element_reference = template.element_reference.clone();
    element_reference.set("Id", Value::Integer(reference_id));
    element_reference.set("PageId", Value::Integer(page_id));
    element_reference.insert_tx(tx, ELEMENT_REFERENCE)?;

    for command in &template.commands {
        let mut command = command.clone();
        command.set("Id", Value::Integer(ids.next(COMMAND_SEQUENCE)?));
        command.set("ButtonId", Value::Integer(button_id));
        command.insert_tx(tx, COMMAND_SEQUENCE)?;
    }

    Ok(reference_id)
}

/// Show the home button on the reserved home cell of every layout that lacks it.
///
/// A home cell already covered by some other element is an integrity error.
pub(in crate::store) fn place_home_button_tx(
    tx: &Transaction<'_>,
    template: &ReferenceTemplate,
    ids: &mut IdAllocator,
    reference_id: i64,
    layouts: &[LayoutGeometry],
) -> Result<usize, StoreError> {
    let mut written = 0;
    for layout in layouts {
        let placed = tx
            .query_row(
                "SELECT 1 FROM ElementPlacement WHERE PageLayoutId=?1 AND ElementReferenceId=?2 LIMIT 1",
                params![layout.layout_id, reference_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if placed {
            continue;
        }

        let home = layout.home_cell();
        if occupied_cells(tx, layout)?.contains(&home) {
            return Err(StoreError::integrity(format!(
                "layout {}: home cell {home} is taken by another element",
                layout.layout_id
            )));
        }

        let mut placement = template.placement.clone();
        placement.set("Id", Value::Integer(ids.next(ELEMENT_PLACEMENT)?));
        placement.set("ElementReferenceId", Value::Integer(reference_id));
        placement.set("PageLayoutId", Value::Integer(layout.layout_id));
        placement.set("GridPosition", Value::Text(home.to_string()));
        placement.insert_tx(tx, ELEMENT_PLACEMENT)?;
        written += 1;
    }
    Ok(written)
}

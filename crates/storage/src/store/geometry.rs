#![forbid(unsafe_code)]

use super::*;
use ns_core::{CoreError, GridCell, GridSpan, LayoutGeometry, LayoutSlots};
use rusqlite::{Connection, params};
use std::collections::BTreeSet;

/// System pages that share the Page table with the one content page.
const SYSTEM_PAGE_TITLES: [&str; 2] = ["Dashboard", "Message Bar"];

pub(in crate::store) fn content_page_id(conn: &Connection) -> Result<i64, StoreError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT Id, Title
        FROM Page
        WHERE Title NOT IN (?1, ?2)
        ORDER BY Id ASC
        "#,
    )?;
    let mut rows = stmt.query(params![SYSTEM_PAGE_TITLES[0], SYSTEM_PAGE_TITLES[1]])?;
    let mut pages = Vec::<(i64, String)>::new();
    while let Some(row) = rows.next()? {
        pages.push((row.get(0)?, row.get::<_, Option<String>>(1)?.unwrap_or_default()));
    }

    match pages.as_slice() {
        [] => Err(StoreError::integrity("pageset has no content page")),
        [(id, _)] => Ok(*id),
        many => Err(StoreError::integrity(format!(
            "pageset has multiple content pages: {}",
            many.iter()
                .map(|(_, title)| title.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// `PageLayoutSetting` starts with `"cols,rows"`; anything after is ignored.
fn parse_layout_setting(layout_id: i64, setting: &str) -> Result<LayoutGeometry, StoreError> {
    let invalid = || {
        StoreError::integrity(format!(
            "page layout {layout_id} has unreadable setting {setting:?}"
        ))
    };
    let mut fields = setting.split(',').map(str::trim);
    let columns = fields
        .next()
        .and_then(|raw| raw.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    let rows = fields
        .next()
        .and_then(|raw| raw.parse::<u32>().ok())
        .ok_or_else(invalid)?;
    LayoutGeometry::try_new(layout_id, columns, rows).map_err(|err| match err {
        CoreError::InputFormat(message) => StoreError::integrity(message),
        other => StoreError::Core(other),
    })
}

pub(in crate::store) fn page_layouts(
    conn: &Connection,
    page_id: i64,
) -> Result<Vec<LayoutGeometry>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT Id, PageLayoutSetting FROM PageLayout WHERE PageId=?1 ORDER BY Id ASC",
    )?;
    let mut rows = stmt.query(params![page_id])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let layout_id: i64 = row.get(0)?;
        let setting: Option<String> = row.get(1)?;
        out.push(parse_layout_setting(
            layout_id,
            setting.as_deref().unwrap_or_default(),
        )?);
    }
    if out.is_empty() {
        return Err(StoreError::integrity(format!(
            "content page {page_id} has no page layouts"
        )));
    }
    Ok(out)
}

/// Keep the layouts named in `selection`, in store order. Unknown ids are an error.
pub(in crate::store) fn select_layouts(
    layouts: Vec<LayoutGeometry>,
    selection: Option<&[i64]>,
) -> Result<Vec<LayoutGeometry>, StoreError> {
    let Some(selection) = selection else {
        return Ok(layouts);
    };
    if let Some(unknown) = selection
        .iter()
        .find(|id| !layouts.iter().any(|layout| layout.layout_id == **id))
    {
        return Err(CoreError::InvalidOption(format!("unknown page layout id {unknown}")).into());
    }
    Ok(layouts
        .into_iter()
        .filter(|layout| selection.contains(&layout.layout_id))
        .collect())
}

/// Every cell of the layout covered by an existing placement, spans included.
pub(in crate::store) fn occupied_cells(
    conn: &Connection,
    geometry: &LayoutGeometry,
) -> Result<BTreeSet<GridCell>, StoreError> {
    let layout_id = geometry.layout_id;
    let mut stmt =
        conn.prepare("SELECT GridPosition, GridSpan FROM ElementPlacement WHERE PageLayoutId=?1")?;
    let mut rows = stmt.query(params![layout_id])?;
    let mut occupied = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let position: Option<String> = row.get(0)?;
        let span: Option<String> = row.get(1)?;
        let origin = position
            .as_deref()
            .unwrap_or_default()
            .parse::<GridCell>()
            .map_err(|err| StoreError::integrity(format!("layout {layout_id}: {err}")))?;
        let span = match span.as_deref().map(str::trim) {
            None | Some("") => GridSpan::default(),
            Some(raw) => raw
                .parse::<GridSpan>()
                .map_err(|err| StoreError::integrity(format!("layout {layout_id}: {err}")))?,
        };
        occupied.extend(geometry.covered_cells(origin, span));
    }
    Ok(occupied)
}

pub(in crate::store) fn layout_slots(
    conn: &Connection,
    geometry: LayoutGeometry,
) -> Result<LayoutSlots, StoreError> {
    let occupied = occupied_cells(conn, &geometry)?;
    Ok(LayoutSlots::enumerate(geometry, &occupied))
}

impl PagesetStore {
    pub fn content_page_id(&self) -> Result<i64, StoreError> {
        content_page_id(&self.conn)
    }

    pub fn layouts(&self) -> Result<Vec<LayoutGeometry>, StoreError> {
        let page_id = content_page_id(&self.conn)?;
        page_layouts(&self.conn, page_id)
    }

    pub fn capacity(&self) -> Result<CapacityReport, StoreError> {
        let page_id = content_page_id(&self.conn)?;
        let mut layouts = Vec::new();
        for geometry in page_layouts(&self.conn, page_id)? {
            let occupied = occupied_cells(&self.conn, &geometry)?;
            let slots = LayoutSlots::enumerate(geometry, &occupied);
            layouts.push(LayoutCapacity {
                layout_id: geometry.layout_id,
                columns: geometry.columns,
                rows: geometry.rows,
                cells_per_page: geometry.cells_per_page(),
                reserved_cells: geometry.reserved_cells().len(),
                occupied_cells: occupied.len(),
                available_cells: slots.len(),
            });
        }
        Ok(CapacityReport { page_id, layouts })
    }

    pub fn existing_buttons(&self) -> Result<ExistingButtons, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Button", [], |row| row.get(0))?;
        let mut stmt = self.conn.prepare(
            "SELECT Label FROM Button WHERE Label IS NOT NULL AND Label <> '' ORDER BY Id ASC LIMIT 3",
        )?;
        let mut rows = stmt.query([])?;
        let mut sample_labels = Vec::new();
        while let Some(row) = rows.next()? {
            sample_labels.push(row.get(0)?);
        }
        Ok(ExistingButtons {
            count,
            sample_labels,
        })
    }
}

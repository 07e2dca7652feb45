#![allow(dead_code)]

use ns_core::{ButtonPlan, GenerationOptions, Slide, plan_buttons};
use ns_storage::{GenerateRequest, ReferenceTemplate};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

const SCHEMA: &str = r#"
CREATE TABLE PageSetProperties (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    FriendlyName TEXT,
    TimeStamp INTEGER
);
CREATE TABLE Page (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    Title TEXT,
    TimeStamp INTEGER,
    GridDimension TEXT
);
CREATE TABLE PageLayout (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    PageId INTEGER,
    PageLayoutSetting TEXT
);
CREATE TABLE Button (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    Label TEXT,
    Message TEXT,
    ImageOwnership INTEGER,
    BorderColor INTEGER,
    BorderThickness REAL,
    LabelOwnership INTEGER,
    CommandFlags INTEGER,
    ContentType INTEGER,
    UniqueId TEXT,
    ElementReferenceId INTEGER,
    ActiveContentType INTEGER,
    LibrarySymbolId INTEGER,
    PageSetImageId INTEGER,
    SymbolColorDataId INTEGER,
    MessageRecordingId INTEGER
);
CREATE TABLE ElementReference (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    ElementType INTEGER,
    ForegroundColor INTEGER,
    BackgroundColor INTEGER,
    AudioCueRecordingId INTEGER,
    PageId INTEGER
);
CREATE TABLE ElementPlacement (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    GridPosition TEXT,
    GridSpan TEXT,
    Visible INTEGER,
    ElementReferenceId INTEGER,
    PageLayoutId INTEGER,
    UNIQUE (PageLayoutId, GridPosition)
);
CREATE TABLE CommandSequence (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    SerializedCommands TEXT,
    ButtonId INTEGER
);
CREATE TABLE Synchronization (
    Id INTEGER PRIMARY KEY,
    PageSetTimestamp INTEGER
);
"#;

pub const HOME_COMMANDS: &str = r#"{"$type":"1","$values":[{"$type":"11","NavigateHome":true}]}"#;

pub fn create_schema(path: &Path) -> Connection {
    let conn = Connection::open(path).expect("fixture db must open");
    conn.execute_batch(SCHEMA).expect("fixture schema");
    conn
}

/// A blank pageset with one content page and the given `(layout_id, setting)` layouts.
pub fn blank_pageset(dir: &Path, layouts: &[(i64, &str)]) -> PathBuf {
    let path = dir.join("blank.spb");
    let conn = create_schema(&path);
    conn.execute_batch(
        r#"
        INSERT INTO PageSetProperties (Id, FriendlyName, TimeStamp) VALUES (1, 'Blank', 0);
        INSERT INTO Page (Id, Title, TimeStamp) VALUES (1, 'Dashboard', 0);
        INSERT INTO Page (Id, Title, TimeStamp) VALUES (2, 'Message Bar', 0);
        INSERT INTO Page (Id, Title, TimeStamp) VALUES (3, 'Untitled', 0);
        INSERT INTO PageLayout (Id, PageId, PageLayoutSetting) VALUES (90, 1, '1,1,0');
        INSERT INTO Synchronization (Id, PageSetTimestamp) VALUES (1, 0);
        "#,
    )
    .expect("fixture rows");
    for (layout_id, setting) in layouts {
        conn.execute(
            "INSERT INTO PageLayout (Id, PageId, PageLayoutSetting) VALUES (?1, 3, ?2)",
            params![layout_id, setting],
        )
        .expect("fixture layout");
    }
    path
}

pub fn reference_template(dir: &Path) -> PathBuf {
    let path = dir.join("home_button_ref.spb");
    if path.exists() {
        return path;
    }
    let conn = create_schema(&path);
    conn.execute(
        r#"
        INSERT INTO Button (Id, Label, Message, ImageOwnership, BorderColor, BorderThickness,
            LabelOwnership, CommandFlags, ContentType, UniqueId, ElementReferenceId,
            ActiveContentType, LibrarySymbolId, PageSetImageId, SymbolColorDataId,
            MessageRecordingId)
        VALUES (5, 'Home', NULL, 3, -1, 1.5, 3, 0, 6, 'template-uuid', 7, 0, 1234, 0, 0, 0)
        "#,
        [],
    )
    .expect("template button");
    conn.execute(
        r#"
        INSERT INTO ElementReference (Id, ElementType, ForegroundColor, BackgroundColor,
            AudioCueRecordingId, PageId)
        VALUES (7, 0, -1, -2, 0, 99)
        "#,
        [],
    )
    .expect("template reference");
    conn.execute(
        "INSERT INTO CommandSequence (Id, SerializedCommands, ButtonId) VALUES (3, ?1, 5)",
        params![HOME_COMMANDS],
    )
    .expect("template command");
    conn.execute(
        r#"
        INSERT INTO ElementPlacement (Id, GridPosition, GridSpan, Visible, ElementReferenceId,
            PageLayoutId)
        VALUES (4, '9,9', '1,1', 1, 7, 42)
        "#,
        [],
    )
    .expect("template placement");
    path
}

pub fn load_reference(dir: &Path) -> ReferenceTemplate {
    ReferenceTemplate::load(reference_template(dir)).expect("reference template")
}

pub fn plan(slides: &[Slide], options: &GenerationOptions) -> ButtonPlan {
    plan_buttons(slides, options).expect("button plan")
}

pub fn request(plan: ButtonPlan, reference: ReferenceTemplate) -> GenerateRequest {
    GenerateRequest {
        plan,
        reference,
        layouts: None,
        title: None,
    }
}

/// `count` single-line slides, one chunk each.
pub fn numbered_slides(count: u32) -> Vec<Slide> {
    (1..=count)
        .map(|index| Slide::new(index, format!("Slide title {index}"), format!("Note {index}.")))
        .collect()
}

pub fn row_count(path: &Path, table: &str) -> i64 {
    let conn = Connection::open(path).expect("open for count");
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
        row.get(0)
    })
    .expect("count rows")
}

pub fn row_counts(path: &Path) -> Vec<i64> {
    [
        "Button",
        "ElementReference",
        "ElementPlacement",
        "CommandSequence",
    ]
    .iter()
    .map(|table| row_count(path, table))
    .collect()
}

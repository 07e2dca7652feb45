#![forbid(unsafe_code)]

mod error;
mod generate;
mod geometry;
mod home;
mod observer;
mod schema;
mod sequence;
mod ticks;
mod types;

pub use error::StoreError;
pub use home::ReferenceTemplate;
pub use observer::*;
pub use ticks::{dotnet_ticks, now_ticks};
pub use types::*;

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// An open pageset file (an SQLite database in the destination runtime's format).
#[derive(Debug)]
pub struct PagesetStore {
    conn: Connection,
    path: PathBuf,
}

impl PagesetStore {
    /// Open an existing pageset for writing. The file is never created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(path.as_ref(), OpenFlags::SQLITE_OPEN_READ_WRITE)
    }

    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(path.as_ref(), OpenFlags::SQLITE_OPEN_READ_ONLY)
    }

    fn open_with(path: &Path, mode: OpenFlags) -> Result<Self, StoreError> {
        if !path.is_file() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("pageset not found: {}", path.display()),
            )));
        }
        let conn = Connection::open_with_flags(path, mode | OpenFlags::SQLITE_OPEN_NO_MUTEX)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::require_tables(&conn, schema::PAGESET_TABLES, "pageset")?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

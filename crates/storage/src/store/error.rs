#![forbid(unsafe_code)]

use ns_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("store integrity: {0}")]
    StoreIntegrity(String),
    #[error("run aborted before commit")]
    Aborted,
}

impl StoreError {
    pub(in crate::store) fn integrity(message: impl Into<String>) -> Self {
        Self::StoreIntegrity(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQL",
            Self::Core(err) => err.code(),
            Self::StoreIntegrity(_) => "STORE_INTEGRITY",
            Self::Aborted => "ABORTED",
        }
    }
}

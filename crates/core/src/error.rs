#![forbid(unsafe_code)]

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("input format: {0}")]
    InputFormat(String),
    #[error(
        "not enough grid space (required={required}, available={available}, limited by layout {limiting_layout})"
    )]
    CapacityExhausted {
        required: usize,
        available: usize,
        limiting_layout: i64,
    },
    #[error("no id sequence seeded for table {0}")]
    UnknownSequence(String),
}

impl CoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidOption(_) => "INVALID_OPTION",
            Self::InputFormat(_) => "INPUT_FORMAT",
            Self::CapacityExhausted { .. } => "CAPACITY_EXHAUSTED",
            Self::UnknownSequence(_) => "STORE_INTEGRITY",
        }
    }
}

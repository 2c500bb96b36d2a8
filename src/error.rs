use thiserror::Error;

pub use color_eyre::eyre::eyre;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Bad config error: {0}")]
    BadConfigError(String),

    #[error("Keyword not supported: {0}")]
    KeywordNotSupported(String),

    #[error("The requested value '{value}' is not valid for key '{key}'")]
    InvalidConnectionStringValue { value: String, key: String },

    #[error("'{0}' is an illegal value for a boolean option")]
    InvalidBoolean(String),

    #[error("Unknown field type: 0x{0:02X}")]
    UnknownFieldType(u8),

    #[error("Command type mismatch: expected {expected}, found {found}")]
    CommandTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Row update failed: {0}")]
    RowUpdateFailed(String),

    #[error("Invalid packet")]
    InvalidPacket,

    #[error("Library bug: {0}")]
    LibraryBug(color_eyre::Report),
}

impl From<std::convert::Infallible> for Error {
    fn from(err: std::convert::Infallible) -> Self {
        match err {}
    }
}

pub type Result<T> = std::result::Result<T, Error>;

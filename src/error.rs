// Error types shared by the library modules. The UI and the binary wrap
// these in `anyhow` where they only need to be reported.

use std::path::PathBuf;

/// Rejected PMID entry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PmidError {
    #[error("no PMID entered")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// PMIDs have at most 8 digits.
    #[error("'{0}' has more than 8 digits")]
    TooLong(String),
}

/// Errors from the Entrez lookup.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Transport error (connection, DNS, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Entrez answered with a non-success status.
    #[error("Entrez returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not well-formed XML.
    #[error("malformed efetch response: {0}")]
    Parse(String),
}

/// Errors from building or writing the spreadsheet.
#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    #[error("invalid sheet name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Errors reading or writing the saved user profile.
#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("profile I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt profile: {0}")]
    Json(#[from] serde_json::Error),
}

//! Error types for the fixed header
//!
//! None of these reach the host page: the controller logs them and carries
//! on, leaving the table exactly as it was.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixedHeaderError {
    /// No source table is bound to the controller
    #[error("no table bound to the fixed header")]
    Unbound,

    /// `getElementById` found nothing for the given id
    #[error("table not found: #{0}")]
    TableNotFound(String),

    /// The source table has no `<thead>` to mirror
    #[error("table has no header section")]
    MissingHeader,

    /// A DOM call failed in the host
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

pub type Result<T> = std::result::Result<T, FixedHeaderError>;

use std::error::Error;
use std::fmt;

/* Ledger operations fail in exactly three caller-facing ways:
- Validation: the transaction is missing required fields for its type (422-equivalent)
- NotFound: the transaction/owner is absent or belongs to another user (404-equivalent)
- Conflict: a uniqueness rule was broken, e.g. a duplicate owner name (409-equivalent)

Anything that fails inside a mutation rolls the whole operation back; there is
no partial-apply state to report. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    Validation(String),
    NotFound(String),
    Conflict(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LedgerError::Validation(msg) => write!(f, "validation error: {msg}"),
            LedgerError::NotFound(msg) => write!(f, "not found: {msg}"),
            LedgerError::Conflict(msg) => write!(f, "conflict: {msg}"),
        }
    }
}

impl Error for LedgerError {}

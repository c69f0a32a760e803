use std::error::Error;
use std::fmt;

/* A CSV row that could not be turned into a transaction draft */
#[derive(Debug)]
pub enum ImportError {
    Read(String),
    Row { line: u64, error: String },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImportError::Read(e) => write!(f, "could not read import file: {e}"),
            ImportError::Row { line, error } => write!(f, "bad row at line {line}: {error}"),
        }
    }
}

impl Error for ImportError {}

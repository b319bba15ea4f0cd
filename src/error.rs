//! Error types for export-list extraction.
//!
//! This module provides structured error handling using thiserror. Parse
//! failures are deterministic for a given input, so none of these are
//! retryable; callers decide whether one bad input aborts a whole run.

use std::path::PathBuf;
use thiserror::Error;

use crate::coff::types::CoffError;

/// Main error type for defgen operations.
#[derive(Debug, Error)]
pub enum DefgenError {
    /// The input file could not be opened or mapped
    #[error("couldn't read '{}': {source}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is a linked executable image, not an object file
    #[error("'{}' is an executable image; only unlinked object files are supported", .path.display())]
    ExecutableImage { path: PathBuf },

    /// The leading machine field is not in the supported allow-list
    #[error("unrecognized file format in '{}' (machine {machine:#06x})", .path.display())]
    UnsupportedMachine { path: PathBuf, machine: u16 },

    /// A computed offset or length fell outside the object's buffer
    #[error("corrupt or truncated object '{}': {source}", .path.display())]
    TruncatedOrCorrupt {
        path: PathBuf,
        #[source]
        source: CoffError,
    },

    /// The external symbol dumper exited non-zero or produced output
    /// that does not match the expected line shape
    #[error("{tool} failed on '{}': {message}", .path.display())]
    ExternalToolFailure {
        tool: String,
        path: PathBuf,
        message: String,
    },

    /// A line in a pre-existing export-list file had an unexpected shape
    #[error("malformed line {line_number} in export list '{}': {line:?}", .path.display())]
    MalformedExportListLine {
        path: PathBuf,
        line_number: usize,
        line: String,
    },

    /// File I/O errors outside of input mapping
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for defgen operations
pub type Result<T> = std::result::Result<T, DefgenError>;

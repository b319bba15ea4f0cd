//! defgen: module-definition export lists from compiled object files.
//!
//! Reads classic COFF objects, big-object COFF, and (through an external
//! dumper) LLVM bitcode, and produces a deduplicated `.def` EXPORTS list
//! with each symbol classified as code or DATA.

/// COFF header classification and symbol-table decoding
pub mod coff;
/// Crate error types
pub mod error;
/// Name normalization, export decisions, set accumulation, .def writing
pub mod export;
/// Per-file extraction pipeline
pub mod extract;
/// Mapped input buffers
pub mod io;
/// Tracing setup
pub mod logging;
/// External symbol dumper integration
pub mod nm;

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

pub use crate::error::{DefgenError, Result};
pub use crate::export::{ExportDecision, ExportSet};
pub use crate::extract::extract_object;

/// Accumulates exports across object files and writes the final list.
///
/// The builder owns one [`ExportSet`] and the configured dumper path;
/// inputs are added one at a time and the list is written once at the end.
pub struct DefFileBuilder {
    set: ExportSet,
    nm_path: String,
}

impl DefFileBuilder {
    pub fn new() -> Self {
        Self {
            set: ExportSet::new(),
            nm_path: nm::DEFAULT_NM.to_string(),
        }
    }

    /// Configure the external symbol dumper used for bitcode inputs.
    pub fn set_nm_path<S: Into<String>>(&mut self, nm_path: S) {
        self.nm_path = nm_path.into();
    }

    /// Extract and accumulate the exports of one object file.
    pub fn add_object_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        extract_object(path.as_ref(), &self.nm_path, &mut self.set)
    }

    /// Merge names from an existing hand-written export-list file.
    pub fn add_definition_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DefgenError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.set
            .ingest_definition_file(BufReader::new(file), path)
    }

    /// Write the accumulated export list.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        export::write_def(&self.set, out)
    }

    /// The accumulated exports so far.
    pub fn export_set(&self) -> &ExportSet {
        &self.set
    }
}

impl Default for DefFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

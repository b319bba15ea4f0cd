//! Accumulation of classified export names.
//!
//! Two ordered string sets, one for code symbols and one for DATA symbols.
//! BTreeSet keeps enumeration lexicographic and stable, so regenerating a
//! .def file from the same inputs is byte-identical.

use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DefgenError, Result};
use crate::export::classify::ExportDecision;

/// The DATA qualifier separator recognized in existing export lists.
const DATA_MARKER: &str = " \t DATA";

/// Deduplicated code and data export names for one run.
///
/// A name never appears in both sets: the first classification wins, and a
/// later insertion into the other set is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSet {
    code: BTreeSet<String>,
    data: BTreeSet<String>,
}

impl ExportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a code symbol. Idempotent; skipped when the name is already
    /// classified as data.
    pub fn insert_code(&mut self, name: String) {
        if self.data.contains(&name) {
            debug!("{name} already classified as data, keeping first classification");
            return;
        }
        self.code.insert(name);
    }

    /// Insert a data symbol. Idempotent; skipped when the name is already
    /// classified as code.
    pub fn insert_data(&mut self, name: String) {
        if self.code.contains(&name) {
            debug!("{name} already classified as code, keeping first classification");
            return;
        }
        self.data.insert(name);
    }

    /// Apply one classification decision.
    pub fn apply(&mut self, decision: ExportDecision) {
        match decision {
            ExportDecision::Excluded => {}
            ExportDecision::Code(name) => self.insert_code(name),
            ExportDecision::Data(name) => self.insert_data(name),
        }
    }

    /// Code symbol names in lexicographic order.
    pub fn code(&self) -> impl Iterator<Item = &str> {
        self.code.iter().map(String::as_str)
    }

    /// Data symbol names in lexicographic order.
    pub fn data(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.code.len() + self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.data.is_empty()
    }

    /// Merge names from a hand-written module-definition file.
    ///
    /// `LIBRARY` and `EXPORTS` header lines are skipped; each remaining
    /// line is a name, optionally followed by the ` \t DATA` qualifier.
    /// Blank lines are ignored.
    pub fn ingest_definition_file<R: BufRead>(&mut self, reader: R, path: &Path) -> Result<()> {
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.starts_with("LIBRARY") || line.starts_with("EXPORTS") {
                continue;
            }
            if let Some(pos) = line.find(DATA_MARKER) {
                let name = line[..pos].trim_start_matches([' ', '\t']);
                if name.is_empty() {
                    return Err(DefgenError::MalformedExportListLine {
                        path: path.to_path_buf(),
                        line_number: idx + 1,
                        line,
                    });
                }
                self.insert_data(name.to_string());
            } else {
                let name = line.trim_start_matches([' ', '\t']);
                if name.is_empty() {
                    continue;
                }
                self.insert_code(name.to_string());
            }
        }
        Ok(())
    }
}

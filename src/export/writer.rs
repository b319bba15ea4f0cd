//! Module-definition export list serialization.

use std::io::{self, Write};

use crate::export::set::ExportSet;

/// Write the accumulated exports as a .def EXPORTS block.
///
/// Data symbols come first with the DATA qualifier, then code symbols.
/// The exact byte shape (including the header's trailing space) matches
/// what the Microsoft tools accept and what ingestion reads back.
pub fn write_def<W: Write>(set: &ExportSet, out: &mut W) -> io::Result<()> {
    writeln!(out, "EXPORTS ")?;
    for name in set.data() {
        writeln!(out, "\t{name} \t DATA")?;
    }
    for name in set.code() {
        writeln!(out, "\t{name}")?;
    }
    Ok(())
}

//! Symbol name normalization and export classification.
//!
//! Turns one raw symbol-table entry into a decision: exclude it, export it
//! as DATA, or export it as code. The rules mirror MSVC linker conventions
//! for what a .def file may safely name.

use tracing::trace;

use crate::coff::sections::section_for_symbol;
use crate::coff::types::{RawSymbol, Result, SectionHeader};

/// Final classification of one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDecision {
    Excluded,
    Code(String),
    Data(String),
}

/// Scalar deleting destructor; exporting one breaks deletion across DLLs.
const SCALAR_DELETING_DTOR: &str = "??_G";
/// Vector deleting destructor, same hazard.
const VECTOR_DELETING_DTOR: &str = "??_E";

/// Strip compiler decoration from a raw symbol name.
///
/// Leading whitespace goes first. A `_`-prefixed name is truncated at its
/// first `@` (stdcall suffixes like `_Func@8`), and on 32-bit x86 exactly
/// one leading underscore is removed. Already-clean names pass through
/// unchanged.
pub fn normalize_name(raw: &str, is_i386: bool) -> String {
    let mut name = raw
        .trim_start_matches(|c: char| c.is_ascii_whitespace())
        .to_string();

    if name.starts_with('_') {
        if let Some(at) = name.find('@') {
            name.truncate(at);
        }
    }
    if is_i386 && name.starts_with('_') {
        name.remove(0);
    }
    name
}

fn is_managed_code_marker(name: &str) -> bool {
    name == "__t2m" || name == "__m2mep" || name == "__mep" || name.contains("$$F") || name.contains("$$J")
}

/// Classify one export-candidate symbol against its section.
///
/// `sections` is the object's full section-header array; the symbol's
/// 1-based section number indexes it, and an index past the array is a
/// parse error rather than a panic.
pub fn classify_symbol(
    sym: &RawSymbol,
    sections: &[SectionHeader],
    is_i386: bool,
) -> Result<ExportDecision> {
    let name = normalize_name(&sym.name, is_i386);

    if name.is_empty() {
        return Ok(ExportDecision::Excluded);
    }
    if name.starts_with(SCALAR_DELETING_DTOR) || name.starts_with(VECTOR_DELETING_DTOR) {
        trace!("excluding deleting destructor {name}");
        return Ok(ExportDecision::Excluded);
    }
    // Dotted names are compiler-internal artifacts.
    if name.contains('.') {
        return Ok(ExportDecision::Excluded);
    }
    if is_managed_code_marker(&name) {
        trace!("excluding managed-code symbol {name}");
        return Ok(ExportDecision::Excluded);
    }

    let section = section_for_symbol(sections, sym.section_number)?;

    if !sym.is_function() && section.is_writable() {
        // Mutable globals are exported with the DATA qualifier; read-only
        // constants are not exported at all.
        return Ok(ExportDecision::Data(name));
    }
    if sym.is_function() || !section.is_readable() || section.is_executable() {
        return Ok(ExportDecision::Code(name));
    }
    Ok(ExportDecision::Excluded)
}

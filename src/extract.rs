//! Per-file extraction pipeline.
//!
//! One call takes one input file from classification through accumulation:
//! COFF shapes go through the native walker and classifier, bitcode goes
//! through the external dumper, and everything else is refused.

use std::path::Path;

use tracing::{debug, info};

use crate::coff::classify;
use crate::coff::sections::parse_section_headers;
use crate::coff::symtab::SymbolWalker;
use crate::coff::types::{FileFormat, SymbolTableLayout};
use crate::error::{DefgenError, Result};
use crate::export::classify::classify_symbol;
use crate::export::set::ExportSet;
use crate::io::ObjectFile;
use crate::nm::dump_with_nm;

/// Extract the exportable symbols of one object file into `set`.
///
/// A failure leaves `set` without that file's contribution but does not
/// disturb names accumulated from earlier files; whether the run continues
/// with remaining inputs is the caller's policy.
pub fn extract_object(path: &Path, nm_path: &str, set: &mut ExportSet) -> Result<()> {
    let obj = ObjectFile::open(path)?;
    let data = obj.data();

    let format = classify(data).map_err(|source| DefgenError::TruncatedOrCorrupt {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        FileFormat::PlainCoff(layout) | FileFormat::BigObject(layout) => {
            walk_coff(&obj, layout, set)
        }
        FileFormat::Bitcode => {
            debug!("{} is bitcode, delegating to {nm_path}", path.display());
            dump_with_nm(nm_path, path, set)
        }
        FileFormat::Executable => Err(DefgenError::ExecutableImage {
            path: path.to_path_buf(),
        }),
        FileFormat::Unrecognized { machine } => Err(DefgenError::UnsupportedMachine {
            path: path.to_path_buf(),
            machine,
        }),
    }
}

fn walk_coff(obj: &ObjectFile, layout: SymbolTableLayout, set: &mut ExportSet) -> Result<()> {
    let data = obj.data();
    let corrupt = |source| DefgenError::TruncatedOrCorrupt {
        path: obj.path().to_path_buf(),
        source,
    };

    let sections = parse_section_headers(data, &layout).map_err(corrupt)?;
    let is_i386 = layout.is_i386();

    // Stage decisions locally so a parse failure partway through the table
    // contributes nothing from this file.
    let mut staged = ExportSet::new();
    for sym in SymbolWalker::new(data, layout) {
        let sym = sym.map_err(corrupt)?;
        let decision = classify_symbol(&sym, &sections, is_i386).map_err(corrupt)?;
        staged.apply(decision);
    }

    info!(
        "{}: {} exportable symbols",
        obj.path().display(),
        staged.len()
    );
    for name in staged.data() {
        set.insert_data(name.to_string());
    }
    for name in staged.code() {
        set.insert_code(name.to_string());
    }
    Ok(())
}

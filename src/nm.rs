//! External symbol dumper integration.
//!
//! Formats the walker cannot decode (LLVM bitcode) are handed to an
//! `llvm-nm`-compatible tool. Only defined, non-weak symbols are requested,
//! in the posix line format, so the output grammar stays fixed.

use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::error::{DefgenError, Result};
use crate::export::set::ExportSet;

/// Default dumper binary when the caller configures none.
pub const DEFAULT_NM: &str = "llvm-nm";

/// Run the external dumper over one file and accumulate its symbols.
pub fn dump_with_nm(nm_path: &str, file: &Path, set: &mut ExportSet) -> Result<()> {
    debug!("running {nm_path} on {}", file.display());
    let output = Command::new(nm_path)
        .args(["--no-weak", "--defined-only", "--format=posix"])
        .arg(file)
        .output()
        .map_err(|source| DefgenError::ExternalToolFailure {
            tool: nm_path.to_string(),
            path: file.to_path_buf(),
            message: format!("couldn't launch: {source}"),
        })?;

    if !output.status.success() {
        let mut message = String::from_utf8_lossy(&output.stdout).into_owned();
        message.push_str(&String::from_utf8_lossy(&output.stderr));
        warn!("{nm_path} exited with {}", output.status);
        return Err(DefgenError::ExternalToolFailure {
            tool: nm_path.to_string(),
            path: file.to_path_buf(),
            message: message.trim().to_string(),
        });
    }

    // Stage locally so a malformed line contributes nothing from this file.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut staged = ExportSet::new();
    parse_nm_output(&stdout, &mut staged).map_err(|bad_line| {
        DefgenError::ExternalToolFailure {
            tool: nm_path.to_string(),
            path: file.to_path_buf(),
            message: format!("couldn't parse output line: {bad_line}"),
        }
    })?;
    for name in staged.data() {
        set.insert_data(name.to_string());
    }
    for name in staged.code() {
        set.insert_code(name.to_string());
    }
    Ok(())
}

/// Parse posix-format dumper output into the export set.
///
/// Each line is `<name> <kind> ...`; the single character after the first
/// space decides the set: `D` data, `T` code, anything else dropped.
/// Returns the offending line on a shape violation.
pub fn parse_nm_output<'a>(
    output: &'a str,
    set: &mut ExportSet,
) -> std::result::Result<(), &'a str> {
    for line in output.lines() {
        if line.is_empty() {
            continue;
        }
        let Some(sym_end) = line.find(' ') else {
            return Err(line);
        };
        let Some(kind) = line[sym_end + 1..].chars().next() else {
            return Err(line);
        };
        let name = &line[..sym_end];
        match kind {
            'D' => set.insert_data(name.to_string()),
            'T' => set.insert_code(name.to_string()),
            _ => {}
        }
    }
    Ok(())
}

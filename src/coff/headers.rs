//! Object file header classification.
//!
//! Decides which on-disk encoding an input buffer carries and, for the two
//! COFF shapes, extracts the offsets needed to locate the symbol table.

use tracing::debug;

use crate::coff::types::*;
use crate::coff::utils::ReadExt;

/// Classify the leading bytes of one object file.
///
/// The decision order mirrors the linker's: refuse linked images first,
/// then probe for a plain COFF header, then the big-object shape, then the
/// two bitcode signatures. Fields are read as unaligned little-endian.
pub fn classify(data: &[u8]) -> Result<FileFormat> {
    let magic = data.read_u16_le_at(0).ok_or(CoffError::Truncated {
        offset: 0,
        what: "file magic",
    })?;

    if magic == DOS_SIGNATURE {
        return Ok(FileFormat::Executable);
    }

    // The first field doubles as the COFF machine and the big-object Sig1.
    let machine = magic;
    if SUPPORTED_MACHINES.contains(&machine) {
        let characteristics = data.read_u16_le_at(18).ok_or(CoffError::Truncated {
            offset: 18,
            what: "COFF characteristics",
        })?;
        // Characteristics zero marks an unlinked object rather than an image.
        if characteristics == 0 {
            return plain_coff_layout(data, machine).map(FileFormat::PlainCoff);
        }
    }

    let sig2 = data.read_u16_le_at(2).ok_or(CoffError::Truncated {
        offset: 2,
        what: "header signature",
    })?;

    if magic == BIGOBJ_SIG1 && sig2 == BIGOBJ_SIG2 {
        return bigobj_layout(data).map(FileFormat::BigObject);
    }

    if (magic, sig2) == BITCODE_SIG || (magic, sig2) == BITCODE_WRAPPER_SIG {
        return Ok(FileFormat::Bitcode);
    }

    debug!("unrecognized leading machine field {machine:#06x}");
    Ok(FileFormat::Unrecognized { machine })
}

fn plain_coff_layout(data: &[u8], machine: u16) -> Result<SymbolTableLayout> {
    if data.len() < COFF_HEADER_SIZE {
        return Err(CoffError::Truncated {
            offset: data.len(),
            what: "COFF file header",
        });
    }
    let section_count = data.read_u16_le_at(2).unwrap() as u32;
    let symbol_table_offset = data.read_u32_le_at(8).unwrap() as usize;
    let symbol_count = data.read_u32_le_at(12).unwrap();
    let optional_header_size = data.read_u16_le_at(16).unwrap() as usize;

    Ok(SymbolTableLayout {
        machine,
        width: RecordWidth::Narrow,
        symbol_table_offset,
        symbol_count,
        // Unlinked objects declare a zero-size optional header, but the
        // declared size is honored either way.
        section_header_offset: COFF_HEADER_SIZE + optional_header_size,
        section_count,
    })
}

fn bigobj_layout(data: &[u8]) -> Result<SymbolTableLayout> {
    if data.len() < BIGOBJ_HEADER_SIZE {
        return Err(CoffError::Truncated {
            offset: data.len(),
            what: "big-object header",
        });
    }
    let machine = data.read_u16_le_at(6).unwrap();
    let section_count = data.read_u32_le_at(44).unwrap();
    let symbol_table_offset = data.read_u32_le_at(48).unwrap() as usize;
    let symbol_count = data.read_u32_le_at(52).unwrap();

    Ok(SymbolTableLayout {
        machine,
        width: RecordWidth::Wide,
        symbol_table_offset,
        symbol_count,
        section_header_offset: BIGOBJ_HEADER_SIZE,
        section_count,
    })
}

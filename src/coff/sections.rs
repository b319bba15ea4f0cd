//! Section header array parsing.

use crate::coff::types::*;
use crate::coff::utils::{short_name_to_string, ReadExt};

/// Parse the section header array described by `layout`.
///
/// Symbols index this array 1-based through their section number; the
/// whole array is decoded up front so each lookup is a bounds-checked
/// slice index.
pub fn parse_section_headers(data: &[u8], layout: &SymbolTableLayout) -> Result<Vec<SectionHeader>> {
    let mut sections = Vec::with_capacity(layout.section_count as usize);
    for i in 0..layout.section_count as usize {
        let base = layout
            .section_header_offset
            .checked_add(i * SECTION_HEADER_SIZE)
            .ok_or(CoffError::Truncated {
                offset: usize::MAX,
                what: "section header",
            })?;
        let raw = data
            .read_slice_at(base, SECTION_HEADER_SIZE)
            .ok_or(CoffError::Truncated {
                offset: base,
                what: "section header",
            })?;
        let name = short_name_to_string(&raw[0..8]);
        let characteristics =
            SectionFlags::from_bits_retain(raw.read_u32_le_at(36).unwrap());
        sections.push(SectionHeader {
            name,
            characteristics,
        });
    }
    Ok(sections)
}

/// Look up the section a defined symbol lives in (1-based section number).
pub fn section_for_symbol<'a>(
    sections: &'a [SectionHeader],
    section_number: i64,
) -> Result<&'a SectionHeader> {
    if section_number < 1 || section_number as usize > sections.len() {
        return Err(CoffError::SectionOutOfRange {
            section: section_number,
            count: sections.len() as u32,
        });
    }
    Ok(&sections[section_number as usize - 1])
}

//! Symbol table walking.
//!
//! One walker serves both COFF shapes; the layout tells it the record
//! width and where the table lives. The walk is a single forward pass:
//! auxiliary records are skipped by advancing the cursor, never decoded.

use tracing::trace;

use crate::coff::types::*;
use crate::coff::utils::{read_cstr_at, short_name_to_string, ReadExt};

/// Lazy iterator over one object's export-candidate symbols.
///
/// Yields only defined external symbols of function type (0x20) or
/// non-function type (0); everything else in the table is skipped. The
/// first out-of-bounds read ends the walk with an error.
pub struct SymbolWalker<'a> {
    data: &'a [u8],
    layout: SymbolTableLayout,
    string_table_offset: usize,
    /// Physical records consumed so far, aux records included
    index: u32,
    failed: bool,
}

impl<'a> SymbolWalker<'a> {
    pub fn new(data: &'a [u8], layout: SymbolTableLayout) -> Self {
        let string_table_offset = layout.string_table_offset();
        Self {
            data,
            layout,
            string_table_offset,
            index: 0,
            failed: false,
        }
    }

    /// Decode the record at the current cursor. Returns the decoded fields
    /// whether or not the record is an export candidate; the caller filters.
    fn decode_record(&self, base: usize) -> Result<RawSymbol> {
        let width = self.layout.width;
        let raw = self
            .data
            .read_slice_at(base, width.record_size())
            .ok_or(CoffError::Truncated {
                offset: base,
                what: "symbol record",
            })?;

        let (section_number, type_off, class_off, aux_off) = match width {
            RecordWidth::Narrow => (raw.read_i16_le_at(12).unwrap() as i64, 14, 16, 17),
            RecordWidth::Wide => (raw.read_i32_le_at(12).unwrap() as i64, 16, 18, 19),
        };
        let type_code = raw.read_u16_le_at(type_off).unwrap();
        let storage_class = raw.read_u8_at(class_off).unwrap();
        let aux_count = raw.read_u8_at(aux_off).unwrap();

        Ok(RawSymbol {
            name: String::new(),
            section_number,
            type_code,
            storage_class,
            aux_count,
        })
    }

    /// Resolve the record's name: 8 inline bytes when the leading dword is
    /// nonzero, otherwise a null-terminated string-table entry.
    fn decode_name(&self, base: usize) -> Result<String> {
        let name_field = self.data.read_slice_at(base, 8).unwrap();
        let short = name_field.read_u32_le_at(0).unwrap();
        if short != 0 {
            return Ok(short_name_to_string(name_field));
        }
        let long_offset = name_field.read_u32_le_at(4).unwrap() as usize;
        let offset = self
            .string_table_offset
            .checked_add(long_offset)
            .ok_or(CoffError::UnterminatedString { offset: usize::MAX })?;
        let bytes = read_cstr_at(self.data, offset)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

impl Iterator for SymbolWalker<'_> {
    type Item = Result<RawSymbol>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while self.index < self.layout.symbol_count {
            let base = self.layout.symbol_table_offset
                + self.index as usize * self.layout.width.record_size();

            let mut sym = match self.decode_record(base) {
                Ok(sym) => sym,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };

            // Consume this logical symbol and its trailing aux records.
            self.index += 1 + sym.aux_count as u32;

            let candidate = sym.section_number > 0
                && (sym.type_code == 0 || sym.type_code == SYM_TYPE_FUNCTION)
                && sym.storage_class == IMAGE_SYM_CLASS_EXTERNAL;
            if !candidate {
                continue;
            }

            match self.decode_name(base) {
                Ok(name) => sym.name = name,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
            trace!(
                "symbol {} section {} type {:#x}",
                sym.name,
                sym.section_number,
                sym.type_code
            );
            return Some(Ok(sym));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Append one narrow symbol record.
    fn push_narrow(
        table: &mut Vec<u8>,
        name: [u8; 8],
        section: i16,
        type_code: u16,
        class: u8,
        aux: u8,
    ) {
        table.extend_from_slice(&name);
        table.extend_from_slice(&0u32.to_le_bytes()); // value
        table.extend_from_slice(&section.to_le_bytes());
        table.extend_from_slice(&type_code.to_le_bytes());
        table.push(class);
        table.push(aux);
    }

    fn short(name: &[u8]) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..name.len()].copy_from_slice(name);
        out
    }

    fn long(offset: u32) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[4..8].copy_from_slice(&offset.to_le_bytes());
        out
    }

    fn layout_for(count: u32, width: RecordWidth) -> SymbolTableLayout {
        SymbolTableLayout {
            machine: IMAGE_FILE_MACHINE_AMD64,
            width,
            symbol_table_offset: 0,
            symbol_count: count,
            section_header_offset: 0,
            section_count: 1,
        }
    }

    #[test]
    fn test_walk_short_and_long_names() {
        let mut data = Vec::new();
        push_narrow(&mut data, short(b"_main"), 1, 0x20, IMAGE_SYM_CLASS_EXTERNAL, 0);
        push_narrow(&mut data, long(4), 1, 0, IMAGE_SYM_CLASS_EXTERNAL, 0);
        // String table: 4-byte size field, then strings at their offsets.
        data.extend_from_slice(&12u32.to_le_bytes());
        data.extend_from_slice(b"a_rather_long_symbol\0");

        let syms: Vec<_> = SymbolWalker::new(&data, layout_for(2, RecordWidth::Narrow))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(syms.len(), 2);
        assert_eq!(syms[0].name, "_main");
        assert!(syms[0].is_function());
        assert_eq!(syms[1].name, "a_rather_long_symbol");
        assert!(!syms[1].is_function());
    }

    #[test]
    fn test_walk_skips_aux_records() {
        let mut data = Vec::new();
        // One symbol carrying two aux records; the aux bytes deliberately
        // look like valid external symbols and must never be decoded.
        push_narrow(&mut data, short(b"real"), 1, 0, IMAGE_SYM_CLASS_EXTERNAL, 2);
        push_narrow(&mut data, short(b"fake1"), 1, 0, IMAGE_SYM_CLASS_EXTERNAL, 0);
        push_narrow(&mut data, short(b"fake2"), 1, 0, IMAGE_SYM_CLASS_EXTERNAL, 0);
        push_narrow(&mut data, short(b"after"), 1, 0, IMAGE_SYM_CLASS_EXTERNAL, 0);

        let syms: Vec<_> = SymbolWalker::new(&data, layout_for(4, RecordWidth::Narrow))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        let names: Vec<_> = syms.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["real", "after"]);
    }

    #[test]
    fn test_walk_filters_non_candidates() {
        let mut data = Vec::new();
        push_narrow(&mut data, short(b"undef"), 0, 0, IMAGE_SYM_CLASS_EXTERNAL, 0);
        push_narrow(&mut data, short(b"absol"), -1, 0, IMAGE_SYM_CLASS_EXTERNAL, 0);
        push_narrow(&mut data, short(b"static"), 1, 0, 3, 0);
        push_narrow(&mut data, short(b"odd_ty"), 1, 0x40, IMAGE_SYM_CLASS_EXTERNAL, 0);
        push_narrow(&mut data, short(b"keep"), 1, 0x20, IMAGE_SYM_CLASS_EXTERNAL, 0);

        let syms: Vec<_> = SymbolWalker::new(&data, layout_for(5, RecordWidth::Narrow))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(syms.len(), 1);
        assert_eq!(syms[0].name, "keep");
    }

    #[test]
    fn test_walk_wide_records() {
        let mut data = Vec::new();
        data.extend_from_slice(&short(b"bigsym"));
        data.extend_from_slice(&0u32.to_le_bytes()); // value
        data.extend_from_slice(&70000i32.to_le_bytes()); // section, beyond i16
        data.extend_from_slice(&0x20u16.to_le_bytes());
        data.push(IMAGE_SYM_CLASS_EXTERNAL);
        data.push(0);

        let syms: Vec<_> = SymbolWalker::new(&data, layout_for(1, RecordWidth::Wide))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(syms.len(), 1);
        assert_eq!(syms[0].section_number, 70000);
    }

    #[test]
    fn test_walk_truncated_table_errors() {
        let mut data = Vec::new();
        push_narrow(&mut data, short(b"one"), 1, 0, IMAGE_SYM_CLASS_EXTERNAL, 0);
        // Count claims two records but the buffer holds one.
        let mut walker = SymbolWalker::new(&data, layout_for(2, RecordWidth::Narrow));
        assert!(walker.next().unwrap().is_ok());
        assert!(walker.next().unwrap().is_err());
        assert!(walker.next().is_none());
    }

    #[test]
    fn test_walk_unterminated_long_name_errors() {
        let mut data = Vec::new();
        push_narrow(&mut data, long(4), 1, 0, IMAGE_SYM_CLASS_EXTERNAL, 0);
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(b"no-terminator");

        let mut walker = SymbolWalker::new(&data, layout_for(1, RecordWidth::Narrow));
        assert!(matches!(
            walker.next().unwrap(),
            Err(CoffError::UnterminatedString { .. })
        ));
    }
}

//! Shared test fixtures: synthetic COFF object construction.
//!
//! Builds byte-exact plain and big-object COFF buffers in memory so the
//! extraction pipeline can be exercised without compiler-produced samples.

// Not every integration test uses every helper.
#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const MACHINE_I386: u16 = 0x014C;
pub const MACHINE_AMD64: u16 = 0x8664;

pub const SCN_TEXT: u32 = 0x2000_0020 | 0x4000_0000; // code, exec, read
pub const SCN_DATA: u32 = 0x4000_0000 | 0x8000_0000; // read, write
pub const SCN_RDATA: u32 = 0x4000_0000; // read only

pub const CLASS_EXTERNAL: u8 = 2;
pub const CLASS_STATIC: u8 = 3;
pub const TYPE_FUNCTION: u16 = 0x20;
pub const TYPE_NONE: u16 = 0;

pub struct SymbolSpec {
    pub name: String,
    pub section: i32,
    pub type_code: u16,
    pub storage_class: u8,
    pub aux: u8,
}

/// Builder for synthetic COFF object buffers.
pub struct CoffFixture {
    machine: u16,
    sections: Vec<(String, u32)>,
    symbols: Vec<SymbolSpec>,
}

impl CoffFixture {
    pub fn new(machine: u16) -> Self {
        Self {
            machine,
            sections: Vec::new(),
            symbols: Vec::new(),
        }
    }

    pub fn section(mut self, name: &str, characteristics: u32) -> Self {
        self.sections.push((name.to_string(), characteristics));
        self
    }

    pub fn symbol(mut self, name: &str, section: i32, type_code: u16, storage_class: u8) -> Self {
        self.symbols.push(SymbolSpec {
            name: name.to_string(),
            section,
            type_code,
            storage_class,
            aux: 0,
        });
        self
    }

    /// Names longer than eight bytes go through the string table, exactly
    /// as a compiler would emit them.
    fn name_field(name: &str, strtab: &mut Vec<u8>) -> [u8; 8] {
        let mut field = [0u8; 8];
        if name.len() <= 8 {
            field[..name.len()].copy_from_slice(name.as_bytes());
        } else {
            let offset = strtab.len() as u32;
            strtab.extend_from_slice(name.as_bytes());
            strtab.push(0);
            field[4..8].copy_from_slice(&offset.to_le_bytes());
        }
        field
    }

    fn section_headers(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, characteristics) in &self.sections {
            let mut raw = [0u8; 40];
            let n = name.len().min(8);
            raw[..n].copy_from_slice(&name.as_bytes()[..n]);
            raw[36..40].copy_from_slice(&characteristics.to_le_bytes());
            out.extend_from_slice(&raw);
        }
        out
    }

    /// Serialize as a classic COFF object (18-byte symbol records).
    pub fn build(&self) -> Vec<u8> {
        let section_bytes = self.section_headers();
        let symtab_offset = 20 + section_bytes.len();

        // String table offsets are relative to its start, which holds a
        // 4-byte length field before the first string.
        let mut strtab = vec![0u8; 4];
        let mut symtab = Vec::new();
        for sym in &self.symbols {
            let name = Self::name_field(&sym.name, &mut strtab);
            symtab.extend_from_slice(&name);
            symtab.extend_from_slice(&0u32.to_le_bytes()); // value
            symtab.extend_from_slice(&(sym.section as i16).to_le_bytes());
            symtab.extend_from_slice(&sym.type_code.to_le_bytes());
            symtab.push(sym.storage_class);
            symtab.push(sym.aux);
        }
        let len = strtab.len() as u32;
        strtab[0..4].copy_from_slice(&len.to_le_bytes());

        let mut out = Vec::new();
        out.extend_from_slice(&self.machine.to_le_bytes());
        out.extend_from_slice(&(self.sections.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // timestamp
        out.extend_from_slice(&(symtab_offset as u32).to_le_bytes());
        out.extend_from_slice(&(self.symbols.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // optional header size
        out.extend_from_slice(&0u16.to_le_bytes()); // characteristics
        out.extend_from_slice(&section_bytes);
        out.extend_from_slice(&symtab);
        out.extend_from_slice(&strtab);
        out
    }

    /// Serialize as a big-object COFF (20-byte symbol records).
    pub fn build_bigobj(&self) -> Vec<u8> {
        let section_bytes = self.section_headers();
        let symtab_offset = 56 + section_bytes.len();

        let mut strtab = vec![0u8; 4];
        let mut symtab = Vec::new();
        for sym in &self.symbols {
            let name = Self::name_field(&sym.name, &mut strtab);
            symtab.extend_from_slice(&name);
            symtab.extend_from_slice(&0u32.to_le_bytes()); // value
            symtab.extend_from_slice(&sym.section.to_le_bytes());
            symtab.extend_from_slice(&sym.type_code.to_le_bytes());
            symtab.push(sym.storage_class);
            symtab.push(sym.aux);
        }
        let len = strtab.len() as u32;
        strtab[0..4].copy_from_slice(&len.to_le_bytes());

        let mut out = vec![0u8; 56];
        out[2..4].copy_from_slice(&0xFFFFu16.to_le_bytes()); // sig2
        out[4..6].copy_from_slice(&2u16.to_le_bytes()); // version
        out[6..8].copy_from_slice(&self.machine.to_le_bytes());
        out[44..48].copy_from_slice(&(self.sections.len() as u32).to_le_bytes());
        out[48..52].copy_from_slice(&(symtab_offset as u32).to_le_bytes());
        out[52..56].copy_from_slice(&(self.symbols.len() as u32).to_le_bytes());
        out.extend_from_slice(&section_bytes);
        out.extend_from_slice(&symtab);
        out.extend_from_slice(&strtab);
        out
    }
}

/// Write bytes to a fresh temp file and return its handle.
pub fn temp_file_with(content: &[u8]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(content).unwrap();
    tmp.flush().unwrap();
    tmp
}

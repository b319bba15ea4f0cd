//! COFF object decoding.
//!
//! Explicit, bounds-checked decoding of the two COFF header shapes and
//! their shared symbol-table layout. No typed views are ever aliased onto
//! the raw buffer; every field is reconstructed from little-endian bytes.

pub mod headers;
pub mod sections;
pub mod symtab;
pub mod types;
pub mod utils;

pub use headers::classify;
pub use sections::parse_section_headers;
pub use symtab::SymbolWalker;
pub use types::{FileFormat, RawSymbol, SectionHeader, SymbolTableLayout};

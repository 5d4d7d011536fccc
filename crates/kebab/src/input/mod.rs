//! Input parsing and raw row handling.

mod parser;
mod table;

pub use parser::{Parser, ParserConfig, format_name};
pub use table::{RawRow, RawTable, SourceMetadata, is_null_value, normalize_header};

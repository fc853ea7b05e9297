//! Delimited-text reading with an explicit header row.

mod header;
mod reader;

pub use header::normalize_header;
pub use reader::{
    Delimiter, parse_delimited_table, read_delimited_table, read_header_row, read_source_bytes,
};

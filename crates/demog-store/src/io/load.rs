//! Reading persisted tables back.

use std::path::Path;

use polars::prelude::DataFrame;

use crate::csv::{Delimiter, read_delimited_table};
use crate::error::Result;

/// Reads a table written by [`super::save_table`].
pub fn load_table(path: &Path) -> Result<DataFrame> {
    read_delimited_table(path, 0, Delimiter::Comma)
}

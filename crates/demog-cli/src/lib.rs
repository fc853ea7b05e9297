//! Library components of the `demog` command-line tool.

pub mod logging;
pub mod render;

//! On-disk layout of the store directory.

mod hash;
mod load;
mod save;

pub use hash::hash_bytes;
pub use load::load_table;
pub use save::{save_bytes, save_table, write_atomic};

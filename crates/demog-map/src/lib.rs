//! Country code crosswalk and the join that attaches ISO3 codes to
//! UN-keyed tables.

pub mod crosswalk;
pub mod error;
pub mod join;

pub use crosswalk::{Crosswalk, LOCATIONS_TABLE};
pub use error::{MapError, Result};
pub use join::{JoinReport, join_by_country_code, un_keyed_tables};

//! Export core modules shared by the report writers.

#[cfg(feature = "excel")]
pub mod excel_core;

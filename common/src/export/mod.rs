//! Export core modules shared across frontends.

#[cfg(feature = "excel")]
pub mod excel_core;

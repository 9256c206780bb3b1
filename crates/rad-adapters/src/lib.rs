//! rad-adapters: del documento de definición y las tablas del archivo a los
//! tipos del motor.
pub mod catalog;
pub mod definition;

pub use catalog::{catalog_from_json, catalog_from_rows, AssessorRow, CatalogError, ScanRow};
pub use definition::{load_processor_spec, DefinitionError};

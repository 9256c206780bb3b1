//! Modelos neutrales del motor (catálogo congelado, specs de entrada,
//! combinaciones resueltas, descriptores de tarea).

pub mod catalog;
pub mod input_set;
pub mod input_spec;
pub mod processor;
pub mod task;

pub use catalog::{split_artefact_path, ProjectCatalog};
pub use input_set::InputSet;
pub use input_spec::{ArtefactKind, FileMatch, InputSpec, KeepMultis, MultiPolicy, ResourceKind, ResourceSpec};
pub use processor::ProcessorSpec;
pub use task::{FileTransfer, TaskDescriptor};

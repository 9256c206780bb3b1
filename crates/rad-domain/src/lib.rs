// rad-domain library entry point
pub mod artefact;
pub mod error;
pub mod status;

pub use artefact::{Assessor, Scan};
pub use error::DomainError;
pub use status::ProcStatus;

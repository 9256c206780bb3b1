//! rad-core: Motor de resolución de entradas y admisión de tareas
pub mod archive;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod hashing;
pub mod model;
pub mod pattern;
pub mod queue;

pub use archive::{Archive, InMemoryArchive};
pub use engine::{parse_session, BuildEngine, BuildSummary, ProcessorRegistry, SessionOutcome};
pub use engine::resolve::{Resolution, ResolvedInputs};
pub use errors::{ArchiveError, CoreBuildError, NotReady, QueueError};
pub use model::{ArtefactKind, FileMatch, FileTransfer, InputSet, InputSpec, KeepMultis, MultiPolicy,
                ProcessorSpec, ProjectCatalog, ResourceKind, ResourceSpec, TaskDescriptor};
pub use queue::{InMemoryTaskQueue, TaskQueue};

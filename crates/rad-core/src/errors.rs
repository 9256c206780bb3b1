//! Errores del core de construcción.
//!
//! `NotReady` no es un error del programa: es la señal esperada de "esta
//! combinación aún no se puede construir" y siempre termina en una
//! transición de estado, nunca en un abort. `CoreBuildError` sí aborta la
//! pasada del procesador.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Señal tipada de no-listo, con el motivo legible atado al slot que falla.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum NotReady {
    /// Faltan entradas o aún no pasaron QC; reintentable en pasadas futuras.
    #[error("{0}")]
    NeedsInputs(String),
    /// La sesión no va a satisfacer este procesador tal como está definido.
    #[error("{0}")]
    NoData(String),
}

impl NotReady {
    /// Motivo que se guarda como estado de QC del assessor (canal lateral).
    pub fn reason(&self) -> &str {
        match self {
            NotReady::NeedsInputs(r) | NotReady::NoData(r) => r,
        }
    }
}

/// Error de lectura/escritura contra el archivo. Se propaga sin capturar:
/// el llamador decide si salta la sesión o aborta la pasada.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ArchiveError {
    #[error("archive i/o: {0}")]
    Io(String),
    #[error("unknown assessor: {0}")]
    UnknownAssessor(String),
}

/// Error al entregar un descriptor a la cola externa.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QueueError {
    #[error("queue rejected task: {0}")]
    Rejected(String),
}

/// Errores fatales para la pasada completa de un procesador.
#[derive(Debug, Error)]
pub enum CoreBuildError {
    /// Definición de procesamiento malformada (espec §7: aborta, no se traga).
    #[error("invalid processor: {0}")]
    InvalidProcessor(String),
    /// Se agotó el lazo de generación de IDs únicos de assessor.
    #[error("failed to find unique assessor id after {0} attempts")]
    UniqueIdExhausted(u32),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Domain(#[from] rad_domain::DomainError),
    #[error("internal: {0}")]
    Internal(String),
}

//! Vocabulario de estados del archivo de imágenes.
//!
//! Las formas textuales están fijadas por la convención del archivo: los
//! registros existentes ya las contienen y el ejecutor externo las escribe
//! de vuelta, así que no se renombran aquí.
use serde::{Deserialize, Serialize};

/// Estado de procesamiento de un assessor (conjunto cerrado).
///
/// Transiciones que realiza este núcleo:
/// - `NeedInputs` -> `JobRunning` (build exitoso)
/// - `NeedInputs` -> `NeedInputs` (entradas aún incompletas)
/// - `NeedInputs` -> `NoData` (la sesión nunca va a satisfacer el procesador)
///
/// `Complete`/`JobFailed` los escribe el ejecutor externo, nunca este núcleo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcStatus {
    NeedInputs,
    NeedToRun,
    JobRunning,
    JobFailed,
    ReadyToComplete,
    ReadyToUpload,
    Uploading,
    Complete,
    NoData,
}

impl ProcStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedInputs => "NEED_INPUTS",
            Self::NeedToRun => "NEED_TO_RUN",
            Self::JobRunning => "JOB_RUNNING",
            Self::JobFailed => "JOB_FAILED",
            Self::ReadyToComplete => "READY_TO_COMPLETE",
            Self::ReadyToUpload => "READY_TO_UPLOAD",
            Self::Uploading => "UPLOADING",
            Self::Complete => "COMPLETE",
            Self::NoData => "NO_DATA",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "NEED_INPUTS" => Some(Self::NeedInputs),
            "NEED_TO_RUN" => Some(Self::NeedToRun),
            "JOB_RUNNING" => Some(Self::JobRunning),
            "JOB_FAILED" => Some(Self::JobFailed),
            "READY_TO_COMPLETE" => Some(Self::ReadyToComplete),
            "READY_TO_UPLOAD" => Some(Self::ReadyToUpload),
            "UPLOADING" => Some(Self::Uploading),
            "COMPLETE" => Some(Self::Complete),
            "NO_DATA" => Some(Self::NoData),
            _ => None,
        }
    }

    /// Estados abiertos/en curso: el assessor todavía está en manos del
    /// ejecutor y no puede usarse como entrada de otro procesador.
    pub fn is_open(&self) -> bool {
        matches!(self,
                 Self::NeedToRun | Self::Uploading | Self::JobRunning | Self::ReadyToComplete | Self::JobFailed)
    }
}

impl std::fmt::Display for ProcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literales conocidos del estado de QC. El campo es una cadena abierta:
/// el build guarda en él los motivos de `NeedsInputs` como canal lateral.
pub mod qc {
    pub const JOB_PENDING: &str = "Job Pending";
    pub const NEEDS_QA: &str = "Needs QA";
    pub const GOOD: &str = "Good";
    pub const PASSED_QA: &str = "Passed QA";
    pub const FAILED: &str = "Failed";
    pub const FAILED_NEEDS_REPROC: &str = "Failed-needs reprocessing";
    pub const RERUN: &str = "Rerun";
    pub const REPROC: &str = "Reproc";

    /// Marcadores de mal QC por defecto; se comparan sin mayúsculas contra
    /// el primer token del estado.
    pub const DEFAULT_BAD_MARKERS: &[&str] = &["bad", "fail", "poor"];
}

/// Literales de calidad de scan.
pub mod quality {
    pub const USABLE: &str = "usable";
    pub const QUESTIONABLE: &str = "questionable";
    pub const UNUSABLE: &str = "unusable";
}

/// Tipos de sesión del archivo (columna XSITYPE de las tablas del catálogo).
pub mod xsi {
    pub const MR_SESSION: &str = "xnat:mrSessionData";
    pub const PET_SESSION: &str = "xnat:petSessionData";
    pub const GENERIC_ASSESSOR: &str = "proc:genProcData";
}

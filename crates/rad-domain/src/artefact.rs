use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::status::{quality, ProcStatus};
use crate::DomainError;
use std::fmt;

/// Un scan del catálogo: instantánea inmutable de una fila de la tabla de
/// scans del archivo. Se construye una vez por pasada y no se vuelve a leer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    project: String,
    subject: String,
    session: String,
    scan_id: String,
    scan_type: String,
    quality: String,
    xsi_type: String,
    date: Option<NaiveDate>,
    tracer: Option<String>,
    full_path: String,
}

impl Scan {
    pub fn new(project: &str,
               subject: &str,
               session: &str,
               scan_id: &str,
               scan_type: &str,
               quality: &str,
               xsi_type: &str,
               date: Option<NaiveDate>,
               tracer: Option<&str>)
               -> Result<Self, DomainError> {
        for (field, value) in [("project", project), ("subject", subject), ("session", session), ("scan_id", scan_id)] {
            if value.trim().is_empty() {
                return Err(DomainError::ValidationError(format!("scan {field} must not be empty")));
            }
        }
        let full_path = format!("/projects/{project}/subjects/{subject}/experiments/{session}/scans/{scan_id}");
        Ok(Scan { project: project.to_string(),
                  subject: subject.to_string(),
                  session: session.to_string(),
                  scan_id: scan_id.to_string(),
                  scan_type: scan_type.to_string(),
                  quality: quality.to_string(),
                  xsi_type: xsi_type.to_string(),
                  date,
                  tracer: tracer.map(|t| t.to_string()),
                  full_path })
    }

    pub fn project(&self) -> &str { &self.project }
    pub fn subject(&self) -> &str { &self.subject }
    pub fn session(&self) -> &str { &self.session }
    pub fn scan_id(&self) -> &str { &self.scan_id }
    pub fn scan_type(&self) -> &str { &self.scan_type }
    pub fn quality(&self) -> &str { &self.quality }
    pub fn xsi_type(&self) -> &str { &self.xsi_type }
    pub fn date(&self) -> Option<NaiveDate> { self.date }
    pub fn tracer(&self) -> Option<&str> { self.tracer.as_deref() }
    pub fn full_path(&self) -> &str { &self.full_path }

    /// Calidad `unusable`, comparada sin mayúsculas como hace el archivo.
    pub fn is_unusable(&self) -> bool {
        self.quality.eq_ignore_ascii_case(quality::UNUSABLE)
    }
}

impl fmt::Display for Scan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<scan: {}/{} {}>", self.session, self.scan_id, self.scan_type)
    }
}

/// Un assessor del catálogo: instantánea de una fila de la tabla de
/// assessors. `inputs` guarda el InputSet serializado con el que se creó el
/// registro; es la identidad usada para deduplicar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessor {
    project: String,
    subject: String,
    session: String,
    label: String,
    proctype: String,
    procstatus: ProcStatus,
    qcstatus: String,
    inputs: String,
    date: Option<NaiveDate>,
    full_path: String,
}

impl Assessor {
    pub fn new(project: &str,
               subject: &str,
               session: &str,
               label: &str,
               proctype: &str,
               procstatus: ProcStatus,
               qcstatus: &str,
               inputs: &str,
               date: Option<NaiveDate>)
               -> Result<Self, DomainError> {
        for (field, value) in [("project", project), ("subject", subject), ("session", session), ("label", label), ("proctype", proctype)] {
            if value.trim().is_empty() {
                return Err(DomainError::ValidationError(format!("assessor {field} must not be empty")));
            }
        }
        let full_path = format!("/projects/{project}/subjects/{subject}/experiments/{session}/assessors/{label}");
        Ok(Assessor { project: project.to_string(),
                      subject: subject.to_string(),
                      session: session.to_string(),
                      label: label.to_string(),
                      proctype: proctype.to_string(),
                      procstatus,
                      qcstatus: qcstatus.to_string(),
                      inputs: inputs.to_string(),
                      date,
                      full_path })
    }

    pub fn project(&self) -> &str { &self.project }
    pub fn subject(&self) -> &str { &self.subject }
    pub fn session(&self) -> &str { &self.session }
    pub fn label(&self) -> &str { &self.label }
    pub fn proctype(&self) -> &str { &self.proctype }
    pub fn procstatus(&self) -> ProcStatus { self.procstatus }
    pub fn qcstatus(&self) -> &str { &self.qcstatus }
    pub fn inputs(&self) -> &str { &self.inputs }
    pub fn date(&self) -> Option<NaiveDate> { self.date }
    pub fn full_path(&self) -> &str { &self.full_path }

    /// Copia con estados actualizados; los registros del catálogo son
    /// inmutables, el estado nuevo vive en una copia local.
    pub fn with_status(&self, procstatus: ProcStatus, qcstatus: &str) -> Self {
        let mut updated = self.clone();
        updated.procstatus = procstatus;
        updated.qcstatus = qcstatus.to_string();
        updated
    }
}

impl fmt::Display for Assessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<assr: {} {}>", self.label, self.procstatus)
    }
}

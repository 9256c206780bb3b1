//! Constructores del catálogo a partir de filas de tabla del archivo.
//!
//! Las columnas siguen la convención del proveedor externo (SESSION,
//! SUBJECT, SCANID, ...); este módulo las traduce a los tipos validados del
//! dominio y congela el resultado en un `ProjectCatalog`.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use rad_core::model::ProjectCatalog;
use rad_domain::{Assessor, DomainError, ProcStatus, Scan};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("row {0}: unknown procstatus {1}")]
    UnknownStatus(String, String),
}

/// Fila de la tabla de scans del proveedor.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRow {
    #[serde(rename = "SESSION")]
    pub session: String,
    #[serde(rename = "SUBJECT")]
    pub subject: String,
    #[serde(rename = "SCANID")]
    pub scan_id: String,
    #[serde(rename = "SCANTYPE")]
    pub scan_type: String,
    #[serde(rename = "QUALITY")]
    pub quality: String,
    #[serde(rename = "XSITYPE")]
    pub xsi_type: String,
    #[serde(rename = "DATE", default)]
    pub date: Option<String>,
    #[serde(rename = "TRACER", default)]
    pub tracer: Option<String>,
}

/// Fila de la tabla de assessors del proveedor.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessorRow {
    #[serde(rename = "SESSION")]
    pub session: String,
    #[serde(rename = "SUBJECT")]
    pub subject: String,
    #[serde(rename = "ASSR")]
    pub label: String,
    #[serde(rename = "PROCTYPE")]
    pub proctype: String,
    #[serde(rename = "PROCSTATUS")]
    pub procstatus: String,
    #[serde(rename = "QCSTATUS")]
    pub qcstatus: String,
    #[serde(rename = "INPUTS", default)]
    pub inputs: String,
    #[serde(rename = "DATE", default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogDoc {
    name: String,
    #[serde(default)]
    scans: Vec<ScanRow>,
    #[serde(default)]
    assessors: Vec<AssessorRow>,
}

/// Congela las filas de ambas tablas en un catálogo del proyecto.
pub fn catalog_from_rows(name: &str,
                         scan_rows: &[ScanRow],
                         assessor_rows: &[AssessorRow])
                         -> Result<ProjectCatalog, CatalogError> {
    let mut scans = Vec::with_capacity(scan_rows.len());
    for row in scan_rows {
        scans.push(Scan::new(name,
                             &row.subject,
                             &row.session,
                             &row.scan_id,
                             &row.scan_type,
                             &row.quality,
                             &row.xsi_type,
                             parse_date(row.date.as_deref()),
                             row.tracer.as_deref())?);
    }

    let mut assessors = Vec::with_capacity(assessor_rows.len());
    for row in assessor_rows {
        let procstatus = ProcStatus::from_str(&row.procstatus)
            .ok_or_else(|| CatalogError::UnknownStatus(row.label.clone(), row.procstatus.clone()))?;
        assessors.push(Assessor::new(name,
                                     &row.subject,
                                     &row.session,
                                     &row.label,
                                     &row.proctype,
                                     procstatus,
                                     &row.qcstatus,
                                     &row.inputs,
                                     parse_date(row.date.as_deref()))?);
    }

    Ok(ProjectCatalog::new(name, scans, assessors))
}

/// Catálogo desde un documento JSON `{name, scans, assessors}`.
pub fn catalog_from_json(text: &str) -> Result<ProjectCatalog, CatalogError> {
    let doc: CatalogDoc = serde_json::from_str(text)?;
    catalog_from_rows(&doc.name, &doc.scans, &doc.assessors)
}

fn parse_date(date: Option<&str>) -> Option<NaiveDate> {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

//! Verificador de readiness de un InputSet candidato.
//!
//! Recorre los artefactos referidos y corta al primer bloqueo; la falla es
//! de la combinación entera, no se resuelve parcial. Una referencia que ya
//! no existe en el catálogo es dato faltante (`NoData`), no un artefacto
//! inmaduro.

use log::debug;

use crate::errors::NotReady;
use crate::model::{split_artefact_path, ArtefactKind, InputSet, ProcessorSpec, ProjectCatalog};
use rad_domain::status::{qc, quality};
use rad_domain::ProcStatus;

/// Chequea procesamiento y QC de cada artefacto del InputSet.
///
/// El orden de los chequeos es contractual: por artefacto gana la primera
/// falla aplicable (Not Usable / Not Ready / Needs QC / Bad QC).
pub fn verify_input_set(spec: &ProcessorSpec,
                        input_set: &InputSet,
                        catalog: &ProjectCatalog,
                        bad_qc_markers: &[String])
                        -> Result<(), NotReady> {
    debug!("checking status of each artefact");
    for (slot, paths) in input_set.iter() {
        let Some(input) = spec.inputs.get(slot) else {
            // Registro viejo con un slot que la definición ya no declara.
            return Err(NotReady::NoData(format!("{slot}: No Data")));
        };

        if input.kind != ArtefactKind::Assessor && !input.needs_qc {
            // Scan sin needs_qc: no se chequea nada.
            continue;
        }

        for path in paths {
            let Some((session, id)) = split_artefact_path(path) else {
                return Err(NotReady::NoData(format!("{slot}: No Data")));
            };

            match input.kind {
                ArtefactKind::Scan | ArtefactKind::PetScan => {
                    let Some(scan_quality) = catalog.scan_quality(session, id) else {
                        return Err(NotReady::NoData(format!("{slot}: No Data")));
                    };
                    if scan_quality.eq_ignore_ascii_case(quality::UNUSABLE) {
                        return Err(NotReady::NeedsInputs(format!("{slot}: Not Usable")));
                    }
                }
                ArtefactKind::Assessor => {
                    let Some((pstatus, qstatus)) = catalog.assessor_status(session, id) else {
                        return Err(NotReady::NoData(format!("{slot}: No Data")));
                    };
                    check_assessor(slot, input.needs_qc, pstatus, qstatus, bad_qc_markers)?;
                }
            }
        }
    }
    Ok(())
}

fn check_assessor(slot: &str,
                  needs_qc: bool,
                  pstatus: ProcStatus,
                  qstatus: &str,
                  bad_qc_markers: &[String])
                  -> Result<(), NotReady> {
    if pstatus.is_open() || pstatus == ProcStatus::NeedInputs {
        return Err(NotReady::NeedsInputs(format!("{slot}: Not Ready")));
    }

    if [qc::JOB_PENDING, qc::REPROC, qc::RERUN].contains(&qstatus) {
        return Err(NotReady::NeedsInputs(format!("{slot}: Not Ready")));
    }

    if !needs_qc {
        // Sin needs_qc el estado de QC no se mira más.
        return Ok(());
    }

    if [qc::FAILED_NEEDS_REPROC, qc::NEEDS_QA].contains(&qstatus) {
        return Err(NotReady::NeedsInputs(format!("{slot}: Needs QC")));
    }

    // Primer token del estado contra los marcadores configurados.
    let first_token = qstatus.split_whitespace().next().unwrap_or("").to_lowercase();
    for marker in bad_qc_markers {
        if first_token.contains(&marker.to_lowercase()) {
            return Err(NotReady::NeedsInputs(format!("{slot}: Bad QC")));
        }
    }

    Ok(())
}

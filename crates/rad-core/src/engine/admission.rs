//! Admisión de tareas: deduplicación, alta de assessors y transición de
//! estados.
//!
//! Estados por (sesión, proctype, identidad de inputs):
//! `NONE -> NEED_INPUTS -> RUNNING -> {COMPLETE | FAILED}`, con `NO_DATA`
//! absorbente cuando la verificación señala dato faltante. Los estados
//! terminales los escribe el ejecutor externo.

use log::{debug, info};
use uuid::Uuid;

use crate::archive::Archive;
use crate::constants::{ENGINE_VERSION, GUID_LABEL_CHARS, LABEL_SEPARATOR, MAX_LABEL_ATTEMPTS};
use crate::engine::resolve::{find_inputs, Resolution};
use crate::errors::{CoreBuildError, NotReady};
use crate::model::{InputSet, ProcessorSpec, ProjectCatalog, TaskDescriptor};
use crate::queue::TaskQueue;
use rad_domain::status::qc;
use rad_domain::{Assessor, ProcStatus};

/// Busca un assessor existente con la misma identidad (sesión + proctype +
/// inputs serializados); si no hay, crea uno nuevo en estado pendiente.
pub fn get_or_create_assessor<A: Archive>(spec: &ProcessorSpec,
                                          session: &str,
                                          input_set: &InputSet,
                                          catalog: &ProjectCatalog,
                                          archive: &mut A)
                                          -> Result<Assessor, CoreBuildError> {
    let serialized = input_set.canonical_string();

    if let Some(existing) = catalog.assessors()
                                   .iter()
                                   .find(|a| {
                                       a.session() == session
                                       && a.proctype() == spec.proctype
                                       && a.inputs() == serialized
                                   })
    {
        debug!("matches existing:{}", existing.label());
        return Ok(existing.clone());
    }

    debug!("no existing assessors found, creating a new one");
    create_assessor(spec, session, &serialized, catalog, archive)
}

fn create_assessor<A: Archive>(spec: &ProcessorSpec,
                               session: &str,
                               serialized_inputs: &str,
                               catalog: &ProjectCatalog,
                               archive: &mut A)
                               -> Result<Assessor, CoreBuildError> {
    let subject = catalog.subject_of_session(session)
                         .ok_or_else(|| CoreBuildError::Internal(format!("no subject for session:{session}")))?
                         .to_string();

    // El espacio de etiquetas es compartido entre corridas: generar y
    // re-chequear hasta encontrar un ID libre, con tope.
    let mut guid = None;
    for _ in 0..MAX_LABEL_ATTEMPTS {
        let candidate = Uuid::new_v4().to_string();
        if !archive.assessor_exists(&candidate)? {
            guid = Some(candidate);
            break;
        }
    }
    let guid = guid.ok_or(CoreBuildError::UniqueIdExhausted(MAX_LABEL_ATTEMPTS))?;

    let label = [catalog.name(), subject.as_str(), session, spec.proctype.as_str(), &guid[..GUID_LABEL_CHARS]]
        .join(LABEL_SEPARATOR);
    let today = chrono::Utc::now().date_naive();

    let record = Assessor::new(catalog.name(),
                               &subject,
                               session,
                               &label,
                               &spec.proctype,
                               ProcStatus::NeedInputs,
                               qc::JOB_PENDING,
                               serialized_inputs,
                               Some(today))?;

    info!("creating session assessor:{}:{}", label, spec.xsi_type);
    archive.create_assessor(&guid, &record)?;

    Ok(record)
}

/// Construye la tarea de un assessor pendiente y transiciona su estado.
///
/// Sólo se escribe al archivo lo que realmente cambió; el motivo de un
/// bloqueo queda como estado de QC (canal lateral de visibilidad).
pub fn build_task<A: Archive, Q: TaskQueue>(spec: &ProcessorSpec,
                                            assessor: &Assessor,
                                            catalog: &ProjectCatalog,
                                            archive: &mut A,
                                            queue: &mut Q,
                                            bad_qc_markers: &[String])
                                            -> Result<Assessor, CoreBuildError> {
    let old_proc = assessor.procstatus();
    let old_qc = assessor.qcstatus().to_string();

    let input_set = InputSet::from_canonical(assessor.inputs())?;

    let resolution = find_inputs(spec, &input_set, catalog, archive, bad_qc_markers)?;
    let (new_proc, new_qc) = match resolution {
        Resolution::Ready(resolved) => {
            let mut var2val = resolved.var2val;
            for (k, v) in &spec.user_overrides {
                var2val.insert(k.clone(), v.clone());
            }
            for (k, v) in &spec.extra_user_overrides {
                var2val.insert(k.clone(), v.clone());
            }
            var2val.insert("assessor".to_string(), assessor.label().to_string());

            queue.submit(TaskDescriptor { assessor_label: assessor.label().to_string(),
                                          session: assessor.session().to_string(),
                                          proctype: spec.proctype.clone(),
                                          version: spec.version.clone(),
                                          engine_version: ENGINE_VERSION.to_string(),
                                          input_list: resolved.input_list,
                                          var2val,
                                          walltime: spec.walltime.clone(),
                                          memory: spec.memory.clone(),
                                          ppn: spec.ppn })?;

            (ProcStatus::JobRunning, qc::JOB_PENDING.to_string())
        }
        Resolution::Blocked(NotReady::NeedsInputs(reason)) => (ProcStatus::NeedInputs, reason),
        Resolution::Blocked(NotReady::NoData(reason)) => (ProcStatus::NoData, reason),
    };

    if new_proc != old_proc {
        archive.set_procstatus(assessor.label(), new_proc)?;
    }
    if new_qc != old_qc {
        archive.set_qcstatus(assessor.label(), &new_qc)?;
    }

    debug!("status:{}:{}", assessor.label(), new_proc);
    Ok(assessor.with_status(new_proc, &new_qc))
}

//! Motor de construcción de tareas por sesión.
//!
//! Orquesta la cadena emparejar -> combinar -> verificar -> resolver ->
//! admitir sobre una instantánea congelada del proyecto. Sin hilos, sin
//! reintentos: una pasada secuencial en orden determinista de sesión.

pub mod admission;
pub mod matcher;
pub mod matrix;
pub mod resolve;
pub mod verify;

use indexmap::IndexMap;
use log::debug;

use crate::archive::Archive;
use crate::errors::CoreBuildError;
use crate::model::{InputSet, ProcessorSpec, ProjectCatalog};
use crate::pattern;
use crate::queue::TaskQueue;
use rad_domain::status::qc;
use rad_domain::ProcStatus;

/// Qué pasó con una combinación candidata durante la pasada.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Tarea emitida; el assessor quedó corriendo.
    Built(String),
    /// Sigue esperando entradas; el motivo quedó en el estado de QC.
    Pending(String),
    /// La sesión no va a satisfacer el procesador.
    NoData(String),
    /// Ya estaba construido; cero escrituras.
    AlreadyBuilt(String),
}

/// Resumen de una pasada completa de un procesador sobre un proyecto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildSummary {
    pub sessions: usize,
    pub outcomes: Vec<SessionOutcome>,
}

impl BuildSummary {
    pub fn built(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, SessionOutcome::Built(_))).count()
    }

    pub fn pending(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, SessionOutcome::Pending(_))).count()
    }

    pub fn no_data(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, SessionOutcome::NoData(_))).count()
    }

    pub fn already_built(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, SessionOutcome::AlreadyBuilt(_))).count()
    }
}

/// Motor de pasadas: dueño de los puertos hacia archivo y cola.
#[derive(Debug)]
pub struct BuildEngine<A, Q>
    where A: Archive,
          Q: TaskQueue
{
    archive: A,
    queue: Q,
    bad_qc_markers: Vec<String>,
}

impl<A, Q> BuildEngine<A, Q>
    where A: Archive,
          Q: TaskQueue
{
    pub fn new(archive: A, queue: Q) -> Self {
        Self { archive,
               queue,
               bad_qc_markers: qc::DEFAULT_BAD_MARKERS.iter().map(|m| m.to_string()).collect() }
    }

    /// Reemplaza los marcadores de mal QC configurados.
    pub fn with_bad_qc_markers(mut self, markers: &[&str]) -> Self {
        self.bad_qc_markers = markers.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn into_parts(self) -> (A, Q) {
        (self.archive, self.queue)
    }

    /// Pasada completa: todas las sesiones del catálogo en orden, opcional
    /// filtro de inclusión por glob de etiqueta.
    pub fn build_processor(&mut self,
                           spec: &ProcessorSpec,
                           catalog: &ProjectCatalog,
                           include_filters: &[String])
                           -> Result<BuildSummary, CoreBuildError> {
        spec.validate()?;

        let all_sessions = catalog.sessions();
        let sessions = if include_filters.is_empty() {
            all_sessions
        } else {
            filter_labels(&all_sessions, include_filters)
        };
        debug!("include sessions={sessions:?}");

        let mut summary = BuildSummary::default();
        for session in &sessions {
            summary.sessions += 1;
            let outcomes = self.build_session(spec, session, catalog)?;
            summary.outcomes.extend(outcomes);
        }
        Ok(summary)
    }

    /// Construye una sesión: cada combinación candidata se deduplica contra
    /// el catálogo y, si está pendiente, se intenta construir.
    pub fn build_session(&mut self,
                         spec: &ProcessorSpec,
                         session: &str,
                         catalog: &ProjectCatalog)
                         -> Result<Vec<SessionOutcome>, CoreBuildError> {
        debug!("{}:{}", session, spec.proctype);
        let input_sets = parse_session(spec, session, catalog);

        let mut outcomes = Vec::new();
        for input_set in &input_sets {
            if input_set.is_empty() {
                // Procesador sin entradas declaradas: nada que construir.
                return Ok(outcomes);
            }

            let assessor = admission::get_or_create_assessor(spec, session, input_set, catalog, &mut self.archive)?;

            if matches!(assessor.procstatus(), ProcStatus::NeedToRun | ProcStatus::NeedInputs) {
                debug!("building task:{}", assessor.label());
                let updated = admission::build_task(spec,
                                                    &assessor,
                                                    catalog,
                                                    &mut self.archive,
                                                    &mut self.queue,
                                                    &self.bad_qc_markers)?;
                outcomes.push(match updated.procstatus() {
                                  ProcStatus::JobRunning => SessionOutcome::Built(updated.label().to_string()),
                                  ProcStatus::NoData => SessionOutcome::NoData(updated.label().to_string()),
                                  _ => SessionOutcome::Pending(updated.label().to_string()),
                              });
            } else {
                debug!("already built:{}", assessor.label());
                outcomes.push(SessionOutcome::AlreadyBuilt(assessor.label().to_string()));
            }
        }
        Ok(outcomes)
    }
}

/// Determina qué combinaciones de entrada *deberían* existir para esta
/// sesión: emparejar y después armar la matriz.
pub fn parse_session(spec: &ProcessorSpec, session: &str, catalog: &ProjectCatalog) -> Vec<InputSet> {
    debug!("parsing session:{session}");
    let artefacts_by_input = matcher::map_inputs(spec, session, catalog);
    debug!("artefacts_by_input={artefacts_by_input:?}");
    matrix::generate_parameter_matrix(spec, &artefacts_by_input)
}

/// Filtra etiquetas por una lista de globs de inclusión; salida ordenada y
/// sin repetidos para mantener la pasada determinista.
pub fn filter_labels(labels: &[String], filters: &[String]) -> Vec<String> {
    let mut filtered: Vec<String> = labels.iter()
                                          .filter(|l| pattern::matches_any(filters, l.as_str()))
                                          .cloned()
                                          .collect();
    filtered.sort();
    filtered.dedup();
    filtered
}

/// Registro explícito de procesadores por proctype; reemplaza la carga
/// dinámica de módulos del sistema original.
#[derive(Debug, Default)]
pub struct ProcessorRegistry {
    specs: IndexMap<String, ProcessorSpec>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: ProcessorSpec) {
        self.specs.insert(spec.proctype.clone(), spec);
    }

    pub fn get(&self, proctype: &str) -> Option<&ProcessorSpec> {
        self.specs.get(proctype)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessorSpec> {
        self.specs.values()
    }

    /// Corre todos los procesadores registrados sobre el mismo catálogo.
    pub fn build_all<A, Q>(&self,
                           engine: &mut BuildEngine<A, Q>,
                           catalog: &ProjectCatalog,
                           include_filters: &[String])
                           -> Result<Vec<(String, BuildSummary)>, CoreBuildError>
        where A: Archive,
              Q: TaskQueue
    {
        let mut results = Vec::with_capacity(self.specs.len());
        for spec in self.specs.values() {
            let summary = engine.build_processor(spec, catalog, include_filters)?;
            results.push((spec.proctype.clone(), summary));
        }
        Ok(results)
    }
}

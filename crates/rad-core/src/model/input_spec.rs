//! Requisitos declarativos de entrada de un procesador.
//!
//! Cada slot nombrado de la definición se vuelve un `InputSpec`; cada
//! recurso a transferir, un `ResourceSpec`. El estado que el sistema
//! original llevaba en dicts ad hoc acá es explícito en enums.

use serde::{Deserialize, Serialize};

/// Clase de artefacto contra la que matchea un slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtefactKind {
    Scan,
    PetScan,
    Assessor,
}

/// Cuántos candidatos emparejados conserva el slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeepMultis {
    /// Todos los matches, en orden de catálogo.
    #[default]
    All,
    /// Sólo el primero (orden de catálogo tras el filtro de calidad).
    First,
}

/// Qué pasa cuando un glob de recurso matchea más de un archivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MultiPolicy {
    /// Ambigüedad es falla: señal `NeedsInputs("multiple files")`.
    #[default]
    Reject,
    /// Usar el primero en orden de lista, sin avisar.
    First,
}

/// Naturaleza del recurso transferido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResourceKind {
    #[default]
    File,
    Directory,
}

/// Cómo se elige el archivo dentro del recurso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMatch {
    /// Filtrar la lista de archivos por glob.
    Glob(String),
    /// Ruta exacta dentro del recurso, sin enumerar.
    Exact(String),
    /// Transferir el recurso completo (nivel directorio).
    Whole,
}

/// Un recurso declarado de un slot: qué archivo tomar y con qué nombre
/// dejarlo en el destino.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub resource: String,
    pub kind: ResourceKind,
    pub file_match: FileMatch,
    pub multi: MultiPolicy,
    /// Nombre destino; default el nombre base del origen.
    pub fdest: Option<String>,
    /// Subdirectorio destino; default la raíz de la tarea.
    pub ddest: Option<String>,
    /// Variable del comando que se liga al archivo resuelto.
    pub varname: Option<String>,
}

impl ResourceSpec {
    /// Recurso de tipo archivo; sin glob declarado filtra con `*`.
    pub fn file(resource: &str) -> Self {
        Self { resource: resource.to_string(),
               kind: ResourceKind::File,
               file_match: FileMatch::Glob("*".to_string()),
               multi: MultiPolicy::default(),
               fdest: None,
               ddest: None,
               varname: None }
    }

    /// Recurso transferido entero, a nivel directorio.
    pub fn directory(resource: &str) -> Self {
        Self { resource: resource.to_string(),
               kind: ResourceKind::Directory,
               file_match: FileMatch::Whole,
               multi: MultiPolicy::default(),
               fdest: None,
               ddest: None,
               varname: None }
    }

    pub fn with_fmatch(mut self, fmatch: &str) -> Self {
        self.file_match = FileMatch::Glob(fmatch.to_string());
        self
    }

    pub fn with_filepath(mut self, filepath: &str) -> Self {
        self.file_match = FileMatch::Exact(filepath.to_string());
        self
    }

    pub fn with_multi(mut self, multi: MultiPolicy) -> Self {
        self.multi = multi;
        self
    }

    pub fn with_fdest(mut self, fdest: &str) -> Self {
        self.fdest = Some(fdest.to_string());
        self
    }

    pub fn with_ddest(mut self, ddest: &str) -> Self {
        self.ddest = Some(ddest.to_string());
        self
    }

    pub fn with_varname(mut self, varname: &str) -> Self {
        self.varname = Some(varname.to_string());
        self
    }
}

/// Un slot de entrada: contra qué artefactos matchea y qué recursos
/// transfiere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    pub kind: ArtefactKind,
    /// Patrones glob de tipo de scan / proctype; el primero que matchea gana.
    pub types: Vec<String>,
    /// Patrones glob de tracer; sólo PET.
    pub tracers: Vec<String>,
    pub required: bool,
    pub needs_qc: bool,
    pub skip_unusable: bool,
    pub keep_multis: KeepMultis,
    /// Fuente de iteración con la que se agrupa 1:1; `None` = fuente propia.
    pub iterate_with: Option<String>,
    pub resources: Vec<ResourceSpec>,
}

impl InputSpec {
    pub fn scan(name: &str, types: &[&str]) -> Self {
        Self { name: name.to_string(),
               kind: ArtefactKind::Scan,
               types: types.iter().map(|t| t.to_string()).collect(),
               tracers: Vec::new(),
               required: true,
               needs_qc: false,
               skip_unusable: false,
               keep_multis: KeepMultis::default(),
               iterate_with: None,
               resources: Vec::new() }
    }

    /// PET siempre excluye scans `unusable`, declare lo que declare.
    pub fn pet(name: &str, types: &[&str], tracers: &[&str]) -> Self {
        Self { name: name.to_string(),
               kind: ArtefactKind::PetScan,
               types: types.iter().map(|t| t.to_string()).collect(),
               tracers: tracers.iter().map(|t| t.to_string()).collect(),
               required: true,
               needs_qc: false,
               skip_unusable: true,
               keep_multis: KeepMultis::default(),
               iterate_with: None,
               resources: Vec::new() }
    }

    pub fn assessor(name: &str, types: &[&str]) -> Self {
        Self { name: name.to_string(),
               kind: ArtefactKind::Assessor,
               types: types.iter().map(|t| t.to_string()).collect(),
               tracers: Vec::new(),
               required: true,
               needs_qc: false,
               skip_unusable: false,
               keep_multis: KeepMultis::default(),
               iterate_with: None,
               resources: Vec::new() }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_needs_qc(mut self) -> Self {
        self.needs_qc = true;
        self
    }

    pub fn with_skip_unusable(mut self) -> Self {
        self.skip_unusable = true;
        self
    }

    pub fn with_keep_first(mut self) -> Self {
        self.keep_multis = KeepMultis::First;
        self
    }

    pub fn iterate_with(mut self, source: &str) -> Self {
        self.iterate_with = Some(source.to_string());
        self
    }

    pub fn with_resource(mut self, resource: ResourceSpec) -> Self {
        self.resources.push(resource);
        self
    }
}

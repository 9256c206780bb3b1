//! Definición de un procesador ya resuelta a tipos del motor.
//!
//! El documento externo (YAML) se parsea en un adapter; acá sólo viven los
//! campos que participan de la lógica del core. Los slots conservan el
//! orden de declaración: ese orden fija las fuentes de iteración y por lo
//! tanto el orden reproducible del producto cartesiano.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MEMORY, DEFAULT_PPN, DEFAULT_WALLTIME};
use crate::errors::CoreBuildError;
use crate::model::input_spec::InputSpec;
use rad_domain::status::xsi;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorSpec {
    /// Tipo de procesador; identifica la familia de assessors producida.
    pub proctype: String,
    pub version: String,
    pub walltime: String,
    pub memory: String,
    pub ppn: u32,
    /// Tipo de registro creado en el archivo.
    pub xsi_type: String,
    /// Ruta del contenedor primario ya resuelta por el adapter.
    pub container_path: String,
    /// Slots de entrada, en orden de declaración.
    pub inputs: IndexMap<String, InputSpec>,
    /// Variables que aparecen en el template del comando.
    pub user_overrides: IndexMap<String, String>,
    /// Variables extra que no aparecen en el template.
    pub extra_user_overrides: IndexMap<String, String>,
}

impl ProcessorSpec {
    pub fn new(proctype: &str, version: &str) -> Self {
        Self { proctype: proctype.to_string(),
               version: version.to_string(),
               walltime: DEFAULT_WALLTIME.to_string(),
               memory: DEFAULT_MEMORY.to_string(),
               ppn: DEFAULT_PPN,
               xsi_type: xsi::GENERIC_ASSESSOR.to_string(),
               container_path: String::new(),
               inputs: IndexMap::new(),
               user_overrides: IndexMap::new(),
               extra_user_overrides: IndexMap::new() }
    }

    pub fn add_input(&mut self, input: InputSpec) -> &mut Self {
        self.inputs.insert(input.name.clone(), input);
        self
    }

    pub fn with_input(mut self, input: InputSpec) -> Self {
        self.add_input(input);
        self
    }

    /// Fuentes de iteración en orden de declaración: todo slot que no se
    /// agrupa con otro es su propia fuente.
    pub fn iteration_sources(&self) -> Vec<&str> {
        self.inputs
            .values()
            .filter(|i| i.iterate_with.is_none())
            .map(|i| i.name.as_str())
            .collect()
    }

    /// Miembros del grupo de una fuente: la fuente primero, después los
    /// slots que declararon iterar con ella, en orden de declaración.
    pub fn group_members(&self, source: &str) -> Vec<&InputSpec> {
        let mut members = Vec::new();
        if let Some(primary) = self.inputs.get(source) {
            members.push(primary);
        }
        members.extend(self.inputs
                           .values()
                           .filter(|i| i.iterate_with.as_deref() == Some(source)));
        members
    }

    /// Chequeos fatales de la definición (espec de errores: configuración
    /// malformada aborta la pasada entera).
    pub fn validate(&self) -> Result<(), CoreBuildError> {
        if self.proctype.trim().is_empty() {
            return Err(CoreBuildError::InvalidProcessor("empty proctype".to_string()));
        }
        for input in self.inputs.values() {
            if input.types.is_empty() {
                return Err(CoreBuildError::InvalidProcessor(
                    format!("input {} declares no type patterns", input.name)));
            }
            if let Some(src) = &input.iterate_with {
                let Some(target) = self.inputs.get(src) else {
                    return Err(CoreBuildError::InvalidProcessor(
                        format!("input {} iterates with unknown source {}", input.name, src)));
                };
                if target.iterate_with.is_some() {
                    return Err(CoreBuildError::InvalidProcessor(
                        format!("input {} iterates with {} which is not a source", input.name, src)));
                }
            }
        }
        Ok(())
    }
}

//! Descriptor de tarea emitido a la cola externa.
//!
//! Se crea una sola vez por combinación admitida y no se muta después; el
//! transporte hacia el scheduler es problema del consumidor.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::input_spec::ResourceKind;

/// Una entrada de la lista de transferencia: de dónde baja el archivo y con
/// qué nombre queda en el área de trabajo de la tarea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTransfer {
    /// Nombre destino del archivo (o del directorio del recurso).
    pub fdest: String,
    pub kind: ResourceKind,
    /// URI de origen en el archivo.
    pub fpath: String,
    /// Subdirectorio destino; vacío = raíz del área de trabajo.
    pub ddest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub assessor_label: String,
    /// Sesión (o sujeto) dueña del job.
    pub session: String,
    pub proctype: String,
    pub version: String,
    /// Versión del motor que produjo el descriptor.
    pub engine_version: String,
    pub input_list: Vec<FileTransfer>,
    pub var2val: IndexMap<String, String>,
    pub walltime: String,
    pub memory: String,
    pub ppn: u32,
}

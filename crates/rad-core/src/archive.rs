//! Puerto hacia el archivo de imágenes.
//!
//! El core nunca habla red: este trait es la superficie mínima que necesita
//! (enumerar archivos de un recurso, crear assessors, escribir estados
//! escalares). La implementación en memoria sirve para tests y para la
//! validación local; el cliente real vive fuera de este workspace.

use indexmap::IndexMap;

use crate::errors::ArchiveError;
use rad_domain::{Assessor, ProcStatus};

pub trait Archive {
    /// Host base para construir URIs de descarga.
    fn host(&self) -> &str;

    /// Rutas relativas de los archivos del recurso de un artefacto; lista
    /// vacía si el recurso no existe (no-encontrado esperado, no error).
    fn resource_files(&self, artefact_path: &str, resource: &str) -> Result<Vec<String>, ArchiveError>;

    /// ¿Existe ya un registro con este ID generado?
    fn assessor_exists(&self, id: &str) -> Result<bool, ArchiveError>;

    /// Alta de un assessor con su conjunto fijo de atributos iniciales.
    fn create_assessor(&mut self, id: &str, record: &Assessor) -> Result<(), ArchiveError>;

    /// Escrituras escalares de estado, por etiqueta.
    fn set_procstatus(&mut self, label: &str, value: ProcStatus) -> Result<(), ArchiveError>;
    fn set_qcstatus(&mut self, label: &str, value: &str) -> Result<(), ArchiveError>;

    /// URI completa de una ruta de recurso de un artefacto.
    fn file_uri(&self, artefact_path: &str, res_path: &str) -> String {
        format!("{}/data{}/resources/{}", self.host(), artefact_path, res_path)
    }
}

/// Una escritura de atributo registrada por el archivo en memoria; los
/// tests cuentan escrituras para verificar idempotencia.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrWrite {
    pub label: String,
    pub attr: String,
    pub value: String,
}

#[derive(Debug, Default)]
pub struct InMemoryArchive {
    host: String,
    resources: IndexMap<(String, String), Vec<String>>,
    created: IndexMap<String, Assessor>,
    created_ids: Vec<String>,
    attr_log: Vec<AttrWrite>,
}

impl InMemoryArchive {
    pub fn new() -> Self {
        Self { host: "xnat://archive".to_string(),
               ..Default::default() }
    }

    /// Carga los archivos de un recurso de un artefacto.
    pub fn add_resource(&mut self, artefact_path: &str, resource: &str, files: &[&str]) {
        self.resources.insert((artefact_path.to_string(), resource.to_string()),
                              files.iter().map(|f| f.to_string()).collect());
    }

    /// Marca un ID como ya tomado (para ejercitar el lazo de unicidad).
    pub fn reserve_id(&mut self, id: &str) {
        self.created_ids.push(id.to_string());
    }

    pub fn created(&self) -> impl Iterator<Item = &Assessor> {
        self.created.values()
    }

    pub fn find_created(&self, label: &str) -> Option<&Assessor> {
        self.created.get(label)
    }

    pub fn attr_log(&self) -> &[AttrWrite] {
        &self.attr_log
    }

    /// Total de escrituras efectuadas (altas + atributos).
    pub fn write_count(&self) -> usize {
        self.created.len() + self.attr_log.len()
    }
}

impl Archive for InMemoryArchive {
    fn host(&self) -> &str {
        &self.host
    }

    fn resource_files(&self, artefact_path: &str, resource: &str) -> Result<Vec<String>, ArchiveError> {
        Ok(self.resources
               .get(&(artefact_path.to_string(), resource.to_string()))
               .cloned()
               .unwrap_or_default())
    }

    fn assessor_exists(&self, id: &str) -> Result<bool, ArchiveError> {
        Ok(self.created_ids.iter().any(|known| known == id))
    }

    fn create_assessor(&mut self, id: &str, record: &Assessor) -> Result<(), ArchiveError> {
        self.created_ids.push(id.to_string());
        self.created.insert(record.label().to_string(), record.clone());
        Ok(())
    }

    fn set_procstatus(&mut self, label: &str, value: ProcStatus) -> Result<(), ArchiveError> {
        self.attr_log.push(AttrWrite { label: label.to_string(),
                                       attr: "procstatus".to_string(),
                                       value: value.as_str().to_string() });
        if let Some(record) = self.created.get(label) {
            let updated = record.with_status(value, record.qcstatus());
            self.created.insert(label.to_string(), updated);
        }
        Ok(())
    }

    fn set_qcstatus(&mut self, label: &str, value: &str) -> Result<(), ArchiveError> {
        self.attr_log.push(AttrWrite { label: label.to_string(),
                                       attr: "validation/status".to_string(),
                                       value: value.to_string() });
        if let Some(record) = self.created.get(label) {
            let updated = record.with_status(record.procstatus(), value);
            self.created.insert(label.to_string(), updated);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_resource_is_empty_not_error() {
        let archive = InMemoryArchive::new();
        let files = archive.resource_files("/projects/P/subjects/S/experiments/E/scans/1", "NIFTI").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn file_uri_includes_host_and_resource_path() {
        let archive = InMemoryArchive::new();
        let uri = archive.file_uri("/projects/P/subjects/S/experiments/E/scans/1", "NIFTI/files/t1.nii.gz");
        assert_eq!(uri, "xnat://archive/data/projects/P/subjects/S/experiments/E/scans/1/resources/NIFTI/files/t1.nii.gz");
    }
}

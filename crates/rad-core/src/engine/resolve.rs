//! Resolutor de recursos: de un InputSet verificado a archivos concretos.
//!
//! El resultado es un tipo suma explícito: o la combinación quedó lista
//! (variables ligadas + lista de transferencia), o quedó bloqueada con la
//! señal tipada. Errores de I/O del archivo se propagan aparte, sin
//! capturar.

use indexmap::IndexMap;
use log::debug;

use crate::archive::Archive;
use crate::errors::{CoreBuildError, NotReady};
use crate::model::{FileMatch, FileTransfer, InputSet, MultiPolicy, ProcessorSpec, ProjectCatalog, ResourceSpec};
use crate::pattern;

/// Variables ligadas y lista de transferencia de una combinación lista.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedInputs {
    pub var2val: IndexMap<String, String>,
    pub input_list: Vec<FileTransfer>,
}

/// Resultado de resolver una combinación candidata.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Ready(ResolvedInputs),
    Blocked(NotReady),
}

/// Verifica readiness y después ubica cada recurso declarado de cada slot.
///
/// Toda falla esperada (recurso vacío, glob sin matches, ambigüedad sin
/// política) devuelve `Blocked`; el llamador la convierte en transición de
/// estado, nunca en crash.
pub fn find_inputs<A: Archive>(spec: &ProcessorSpec,
                               input_set: &InputSet,
                               catalog: &ProjectCatalog,
                               archive: &A,
                               bad_qc_markers: &[String])
                               -> Result<Resolution, CoreBuildError> {
    if let Err(blocked) = super::verify::verify_input_set(spec, input_set, catalog, bad_qc_markers) {
        return Ok(Resolution::Blocked(blocked));
    }

    let mut resolved = ResolvedInputs::default();

    debug!("mapping params to artefact resources");
    for (name, input) in &spec.inputs {
        let paths = input_set.paths(name);
        for res in &input.resources {
            for (vnum, artefact_path) in paths.iter().enumerate() {
                let located = match locate_file(archive, artefact_path, res)? {
                    Ok(located) => located,
                    Err(blocked) => return Ok(Resolution::Blocked(blocked)),
                };

                let fdest = match &res.fdest {
                    None => located.fname,
                    Some(d) if paths.len() > 1 => format!("{vnum}{d}"),
                    Some(d) => d.clone(),
                };
                let ddest = res.ddest.clone().unwrap_or_default();
                let uri = archive.file_uri(artefact_path, &located.res_path);

                resolved.input_list.push(FileTransfer { fdest: fdest.clone(),
                                                        kind: res.kind,
                                                        fpath: uri,
                                                        ddest });

                // La variable apunta al nombre local tras la transferencia.
                if let Some(var) = &res.varname {
                    resolved.var2val.insert(var.clone(), fdest);
                }
            }
        }
    }
    debug!("finished mapping params to artefact resources");

    Ok(Resolution::Ready(resolved))
}

struct Located {
    /// Ruta relativa dentro del artefacto (`<recurso>/files[/archivo]`).
    res_path: String,
    /// Nombre base para el destino por defecto.
    fname: String,
}

fn locate_file<A: Archive>(archive: &A,
                           artefact_path: &str,
                           res: &ResourceSpec)
                           -> Result<Result<Located, NotReady>, CoreBuildError> {
    let file_list = archive.resource_files(artefact_path, &res.resource)?;
    if file_list.is_empty() {
        debug!("empty or missing resource:{}", res.resource);
        return Ok(Err(NotReady::NeedsInputs("No Resource".to_string())));
    }

    let located = match &res.file_match {
        FileMatch::Exact(fpath) => Located { res_path: format!("{}/files/{}", res.resource, fpath),
                                             fname: basename(fpath) },
        FileMatch::Glob(fmatch) => {
            let matches: Vec<&String> = file_list.iter()
                                                 .filter(|f| pattern::glob_match(fmatch, f))
                                                 .collect();
            if matches.is_empty() {
                debug!("no matching files found on resource:{}", res.resource);
                return Ok(Err(NotReady::NeedsInputs("No Files".to_string())));
            }
            if matches.len() > 1 {
                if res.multi == MultiPolicy::First {
                    debug!("multiple files, policy takes first found");
                } else {
                    debug!("multiple files, no policy set");
                    return Ok(Err(NotReady::NeedsInputs("multiple files".to_string())));
                }
            }
            Located { res_path: format!("{}/files/{}", res.resource, matches[0]),
                      fname: basename(matches[0]) }
        }
        FileMatch::Whole => Located { res_path: format!("{}/files", res.resource),
                                      fname: res.resource.clone() },
    };

    Ok(Ok(located))
}

fn basename(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_strips_directories() {
        assert_eq!(basename("a/b/t1.nii.gz"), "t1.nii.gz");
        assert_eq!(basename("t1.nii.gz"), "t1.nii.gz");
    }
}

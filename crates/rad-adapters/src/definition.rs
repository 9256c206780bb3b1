//! Parser del documento de definición de procesador (YAML).
//!
//! El motor trata la definición como configuración opaca: acá se extraen
//! sólo los campos que participan de la lógica (slots, recursos, vars,
//! requisitos, contenedor primario) y el resto se ignora. Los errores de
//! este módulo son fatales para la pasada del procesador.

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use rad_core::errors::CoreBuildError;
use rad_core::model::{FileMatch, InputSpec, KeepMultis, MultiPolicy, ProcessorSpec, ResourceKind, ResourceSpec};

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid definition: {0}")]
    Invalid(String),
    #[error("multiple containers requires a primary to be set")]
    NoPrimaryContainer,
}

impl From<DefinitionError> for CoreBuildError {
    fn from(e: DefinitionError) -> Self {
        CoreBuildError::InvalidProcessor(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ProcessorDoc {
    #[serde(default)]
    #[allow(dead_code)]
    procyamlversion: Option<String>,
    #[serde(default)]
    containers: Vec<ContainerDoc>,
    #[serde(default)]
    requirements: Option<RequirementsDoc>,
    command: CommandDoc,
    inputs: InputsDoc,
    // outputs / jobtemplate / attrs: consumidos por el ejecutor, no acá.
}

#[derive(Debug, Deserialize)]
struct ContainerDoc {
    name: String,
    path: String,
}

#[derive(Debug, Deserialize)]
struct RequirementsDoc {
    #[serde(default)]
    walltime: Option<serde_yaml::Value>,
    #[serde(default)]
    memory: Option<serde_yaml::Value>,
    #[serde(default)]
    ppn: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CommandDoc {
    #[serde(default)]
    container: Option<String>,
    #[serde(default)]
    args: String,
}

#[derive(Debug, Deserialize)]
struct InputsDoc {
    #[serde(default)]
    vars: IndexMap<String, serde_yaml::Value>,
    xnat: XnatInputsDoc,
}

#[derive(Debug, Deserialize)]
struct XnatInputsDoc {
    #[serde(default)]
    scans: Vec<ScanInputDoc>,
    #[serde(default)]
    assessors: Vec<AssessorInputDoc>,
    #[serde(default)]
    petscans: Vec<PetInputDoc>,
}

#[derive(Debug, Deserialize)]
struct ScanInputDoc {
    name: String,
    types: String,
    #[serde(default)]
    needs_qc: bool,
    #[serde(default)]
    skip_unusable: bool,
    #[serde(default)]
    keep_multis: Option<String>,
    #[serde(default)]
    nifti: Option<String>,
    #[serde(default)]
    edat: Option<String>,
    #[serde(default)]
    resources: Vec<ResourceDoc>,
}

#[derive(Debug, Deserialize)]
struct AssessorInputDoc {
    name: String,
    #[serde(default)]
    types: Option<String>,
    #[serde(default)]
    proctypes: Option<String>,
    #[serde(default)]
    needs_qc: bool,
    #[serde(default)]
    required: Option<bool>,
    #[serde(default)]
    resources: Vec<ResourceDoc>,
}

#[derive(Debug, Deserialize)]
struct PetInputDoc {
    name: String,
    #[serde(default)]
    types: Option<String>,
    #[serde(default)]
    scantypes: Option<String>,
    tracer: String,
    #[serde(default)]
    needs_qc: bool,
    #[serde(default)]
    nifti: Option<String>,
    #[serde(default)]
    resources: Vec<ResourceDoc>,
}

#[derive(Debug, Deserialize)]
struct ResourceDoc {
    resource: String,
    #[serde(default)]
    ftype: Option<String>,
    #[serde(default)]
    fmatch: Option<String>,
    #[serde(default)]
    filepath: Option<String>,
    #[serde(default)]
    fmulti: Option<String>,
    #[serde(default)]
    fdest: Option<String>,
    #[serde(default)]
    ddest: Option<String>,
    #[serde(default)]
    varname: Option<String>,
}

/// Parsea el YAML de un procesador y lo resuelve a un `ProcessorSpec`.
///
/// `filename` aporta proctype y versión por la convención
/// `<nombre>_v<versión>.yaml`; `imagedir` prefija rutas relativas de
/// contenedores.
pub fn load_processor_spec(yaml_text: &str,
                           filename: &str,
                           imagedir: Option<&str>)
                           -> Result<ProcessorSpec, DefinitionError> {
    debug!("reading processor definition:{filename}");
    let doc: ProcessorDoc = serde_yaml::from_str(yaml_text)?;

    let (proctype, version) = proctype_from_filename(filename)?;
    let mut spec = ProcessorSpec::new(&proctype, &version);

    if let Some(reqs) = &doc.requirements {
        if let Some(w) = reqs.walltime.as_ref().and_then(yaml_scalar_to_string) {
            spec.walltime = w;
        }
        if let Some(m) = reqs.memory.as_ref().and_then(yaml_scalar_to_string) {
            spec.memory = m;
        }
        if let Some(ppn) = reqs.ppn {
            spec.ppn = ppn;
        }
    }

    spec.container_path = resolve_primary_container(&doc, imagedir)?;
    split_vars(&doc, &mut spec);

    for s in &doc.inputs.xnat.scans {
        let mut input = InputSpec::scan(&s.name, &split_types(&s.types));
        input.needs_qc = s.needs_qc;
        input.skip_unusable = s.skip_unusable;
        if s.keep_multis.as_deref() == Some("first") {
            input.keep_multis = KeepMultis::First;
        }
        input.resources = s.resources.iter().map(resource_from_doc).collect::<Result<_, _>>()?;
        push_dest_sugar(&mut input.resources, "NIFTI", s.nifti.as_deref());
        push_dest_sugar(&mut input.resources, "EDAT", s.edat.as_deref());
        spec.add_input(input);
    }

    for a in &doc.inputs.xnat.assessors {
        let types = a.types
                     .as_deref()
                     .or(a.proctypes.as_deref())
                     .ok_or_else(|| DefinitionError::Invalid(format!("assessor input {} has no types", a.name)))?;
        let mut input = InputSpec::assessor(&a.name, &split_types(types));
        input.needs_qc = a.needs_qc;
        if let Some(required) = a.required {
            input.required = required;
        }
        input.resources = a.resources.iter().map(resource_from_doc).collect::<Result<_, _>>()?;
        spec.add_input(input);
    }

    for p in &doc.inputs.xnat.petscans {
        let types = p.types
                     .as_deref()
                     .or(p.scantypes.as_deref())
                     .ok_or_else(|| DefinitionError::Invalid(format!("pet input {} has no types", p.name)))?;
        let mut input = InputSpec::pet(&p.name, &split_types(types), &split_types(&p.tracer));
        input.needs_qc = p.needs_qc;
        input.resources = p.resources.iter().map(resource_from_doc).collect::<Result<_, _>>()?;
        push_dest_sugar(&mut input.resources, "NIFTI", p.nifti.as_deref());
        spec.add_input(input);
    }

    Ok(spec)
}

/// `FS7_v1.0.2.yaml` -> proctype `FS7_v1`, versión `1.0.2`.
fn proctype_from_filename(filename: &str) -> Result<(String, String), DefinitionError> {
    let stem = filename.rsplit('/')
                       .next()
                       .unwrap_or(filename)
                       .trim_end_matches(".yaml")
                       .trim_end_matches(".yml");
    let Some((name, version)) = stem.rsplit_once("_v") else {
        return Err(DefinitionError::Invalid(format!("cannot derive proctype from filename:{filename}")));
    };
    if name.is_empty() || version.is_empty() {
        return Err(DefinitionError::Invalid(format!("cannot derive proctype from filename:{filename}")));
    }
    let major = version.split('.').next().unwrap_or(version);
    Ok((format!("{name}_v{major}"), version.to_string()))
}

/// Separa listas `a,b,c` recortando espacios.
fn split_types(types: &str) -> Vec<&str> {
    types.split(',').map(|t| t.trim()).filter(|t| !t.is_empty()).collect()
}

/// Las vars cuyo nombre aparece como `{key}` en el template del comando son
/// overrides; un booleano `true` se vuelve extra sin valor; `None` se
/// descarta.
fn split_vars(doc: &ProcessorDoc, spec: &mut ProcessorSpec) {
    for (key, value) in &doc.inputs.vars {
        let k_str = format!("{{{key}}}");
        if doc.command.args.contains(&k_str) {
            if let Some(v) = yaml_scalar_to_string(value) {
                spec.user_overrides.insert(key.clone(), v);
            }
        } else if value.as_bool() == Some(true) {
            spec.extra_user_overrides.insert(key.clone(), String::new());
        } else if let Some(v) = yaml_scalar_to_string(value) {
            if !v.is_empty() && v != "None" {
                spec.extra_user_overrides.insert(key.clone(), v);
            }
        }
    }
}

/// `command.container` nombra el primario; sin nombre, un único contenedor
/// declarado sirve de default y más de uno es error fatal.
fn resolve_primary_container(doc: &ProcessorDoc, imagedir: Option<&str>) -> Result<String, DefinitionError> {
    let full_path = |path: &str| -> String {
        match imagedir {
            Some(dir) if !path.starts_with('/') => format!("{dir}/{path}"),
            _ => path.to_string(),
        }
    };

    if let Some(primary) = &doc.command.container {
        if let Some(c) = doc.containers.iter().find(|c| &c.name == primary) {
            return Ok(full_path(&c.path));
        }
    }
    match doc.containers.as_slice() {
        [only] => Ok(full_path(&only.path)),
        _ => Err(DefinitionError::NoPrimaryContainer),
    }
}

fn resource_from_doc(doc: &ResourceDoc) -> Result<ResourceSpec, DefinitionError> {
    let kind = match doc.ftype.as_deref() {
        None | Some("FILE") => ResourceKind::File,
        Some("DIRECTORY") | Some("DIR") => ResourceKind::Directory,
        Some(other) => {
            return Err(DefinitionError::Invalid(format!("resource {} has unknown ftype:{other}", doc.resource)));
        }
    };

    let file_match = if let Some(filepath) = &doc.filepath {
        FileMatch::Exact(filepath.clone())
    } else if let Some(fmatch) = &doc.fmatch {
        FileMatch::Glob(fmatch.clone())
    } else {
        match kind {
            ResourceKind::File => FileMatch::Glob("*".to_string()),
            ResourceKind::Directory => FileMatch::Whole,
        }
    };

    let multi = match doc.fmulti.as_deref() {
        Some("any1") => MultiPolicy::First,
        _ => MultiPolicy::Reject,
    };

    Ok(ResourceSpec { resource: doc.resource.clone(),
                      kind,
                      file_match,
                      multi,
                      fdest: doc.fdest.clone(),
                      ddest: doc.ddest.clone(),
                      varname: doc.varname.clone() })
}

/// Azúcar `nifti:`/`edat:`: agrega el recurso con ese nombre destino.
fn push_dest_sugar(resources: &mut Vec<ResourceSpec>, resource: &str, fdest: Option<&str>) {
    if let Some(dest) = fdest {
        resources.push(ResourceSpec::file(resource).with_fdest(dest));
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proctype_comes_from_filename_convention() {
        let (proctype, version) = proctype_from_filename("/defs/FS7_v1.0.2.yaml").unwrap();
        assert_eq!(proctype, "FS7_v1");
        assert_eq!(version, "1.0.2");
        assert!(proctype_from_filename("noversion.yaml").is_err());
    }

    #[test]
    fn types_split_trims_whitespace() {
        assert_eq!(split_types("T1*, MPRAGE ,FLAIR"), vec!["T1*", "MPRAGE", "FLAIR"]);
    }
}

//! Emparejador de entradas: artefactos del catálogo contra slots declarados.
//!
//! Devuelve, por slot, la lista ordenada de rutas candidatas. Lista vacía
//! no es error acá: el armador de matriz decide si eso corta la sesión.

use indexmap::IndexMap;
use log::debug;

use crate::model::{ArtefactKind, InputSpec, KeepMultis, ProcessorSpec, ProjectCatalog};
use crate::pattern;
use rad_domain::Scan;

/// Matchea la sesión contra todos los slots del procesador.
///
/// Orden de candidatos por slot = orden de catálogo. El primer patrón de
/// tipo que matchea gana y el resto de los patrones ya no se prueba para
/// ese artefacto.
pub fn map_inputs(spec: &ProcessorSpec, session: &str, catalog: &ProjectCatalog) -> IndexMap<String, Vec<String>> {
    let scans = catalog.scans_for_session(session);
    let assessors = catalog.assessors_for_session(session);

    // Los PET del sujeto sólo entran si esta es su primera sesión MR.
    let petscans: Vec<&Scan> = if spec.inputs.values().any(|i| i.kind == ArtefactKind::PetScan)
                                  && catalog.is_first_mr_session(session)
    {
        debug!("first mr session, adding pets:{session}");
        catalog.pet_scans_for_session_subject(session)
    } else {
        Vec::new()
    };

    let mut artefacts_by_input: IndexMap<String, Vec<String>> = IndexMap::new();
    for (name, input) in &spec.inputs {
        let mut matched: Vec<String> = Vec::new();
        match input.kind {
            ArtefactKind::PetScan => {
                for pet in &petscans {
                    if match_pet(input, pet) {
                        matched.push(pet.full_path().to_string());
                    }
                }
            }
            ArtefactKind::Scan => {
                for scan in &scans {
                    if pattern::first_match(&input.types, scan.scan_type()).is_none() {
                        continue;
                    }
                    if input.skip_unusable && scan.is_unusable() {
                        debug!("excluding unusable scan:{}", scan.scan_id());
                        continue;
                    }
                    matched.push(scan.full_path().to_string());
                }
            }
            ArtefactKind::Assessor => {
                for assr in &assessors {
                    if pattern::first_match(&input.types, assr.proctype()).is_some() {
                        matched.push(assr.full_path().to_string());
                    }
                }
            }
        }
        if input.keep_multis == KeepMultis::First {
            matched.truncate(1);
        }
        debug!("matched {}:{}:{}", session, name, matched.len());
        artefacts_by_input.insert(name.clone(), matched);
    }

    artefacts_by_input
}

/// Un PET tiene que pasar primero el filtro de tracer y después el de tipo;
/// los `unusable` quedan fuera siempre.
fn match_pet(input: &InputSpec, pet: &Scan) -> bool {
    let Some(tracer) = pet.tracer() else {
        return false;
    };
    if !pattern::matches_any(&input.tracers, tracer) {
        return false;
    }
    if pattern::first_match(&input.types, pet.scan_type()).is_none() {
        return false;
    }
    if pet.is_unusable() {
        debug!("excluding unusable pet scan:{}", pet.scan_id());
        return false;
    }
    true
}

//! Integración punta a punta: definición YAML -> catálogo -> pasada ->
//! segunda pasada idempotente.

use chrono::NaiveDate;
use rad_adapters::{catalog_from_json, load_processor_spec};
use rad_core::{BuildEngine, InMemoryArchive, InMemoryTaskQueue, ProjectCatalog, SessionOutcome};
use rad_domain::{Assessor, ProcStatus};

const SEG_YAML: &str = r#"
containers:
  - name: SEG
    path: segmenter_v2.1.0.sif
requirements:
  walltime: 0-4
  memory: 8G
command:
  container: SEG
  args: --t1 {scan_t1} --out {assessor}
inputs:
  vars:
    threshold: 0.5
  xnat:
    scans:
      - name: scan_t1
        types: T1w
        skip_unusable: true
        resources:
          - resource: NIFTI
            fmatch: "*.nii.gz"
            varname: scan_t1
"#;

const CATALOG_JSON: &str = r#"{
    "name": "P1",
    "scans": [
        {"SESSION": "S1_MR1", "SUBJECT": "SUBJ01", "SCANID": "301",
         "SCANTYPE": "T1w", "QUALITY": "usable",
         "XSITYPE": "xnat:mrSessionData", "DATE": "2024-01-05"},
        {"SESSION": "S1_MR1", "SUBJECT": "SUBJ01", "SCANID": "302",
         "SCANTYPE": "T1w", "QUALITY": "unusable",
         "XSITYPE": "xnat:mrSessionData", "DATE": "2024-01-05"},
        {"SESSION": "S2_MR1", "SUBJECT": "SUBJ02", "SCANID": "301",
         "SCANTYPE": "FLAIR", "QUALITY": "usable",
         "XSITYPE": "xnat:mrSessionData", "DATE": "2024-01-09"}
    ],
    "assessors": []
}"#;

#[test]
fn yaml_definition_drives_a_full_pass() {
    let spec = load_processor_spec(SEG_YAML, "SEG_v2.1.0.yaml", None).expect("definition parses");
    let catalog = catalog_from_json(CATALOG_JSON).expect("catalog parses");

    let mut archive = InMemoryArchive::new();
    archive.add_resource("/projects/P1/subjects/SUBJ01/experiments/S1_MR1/scans/301",
                         "NIFTI",
                         &["t1.nii.gz"]);

    let mut engine = BuildEngine::new(archive, InMemoryTaskQueue::new());
    let summary = engine.build_processor(&spec, &catalog, &[]).expect("pass ok");

    // S1_MR1 construye con el T1 usable; S2_MR1 no tiene T1w y corta sin
    // error.
    assert_eq!(summary.sessions, 2);
    assert_eq!(summary.built(), 1);
    assert_eq!(summary.outcomes.len(), 1);

    let (archive, queue) = engine.into_parts();
    assert_eq!(queue.len(), 1);
    let task = &queue.submitted()[0];
    assert_eq!(task.proctype, "SEG_v2");
    assert_eq!(task.walltime, "0-4");
    assert_eq!(task.memory, "8G");
    assert_eq!(task.var2val["scan_t1"], "t1.nii.gz");
    assert_eq!(task.var2val["threshold"], "0.5");
    assert!(task.input_list[0].fpath.ends_with("NIFTI/files/t1.nii.gz"));

    let created: Vec<&Assessor> = archive.created().collect();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].procstatus(), ProcStatus::JobRunning);
}

#[test]
fn second_pass_over_refreshed_catalog_is_a_no_op() {
    let spec = load_processor_spec(SEG_YAML, "SEG_v2.1.0.yaml", None).expect("definition parses");
    let catalog = catalog_from_json(CATALOG_JSON).expect("catalog parses");

    let mut archive = InMemoryArchive::new();
    archive.add_resource("/projects/P1/subjects/SUBJ01/experiments/S1_MR1/scans/301",
                         "NIFTI",
                         &["t1.nii.gz"]);
    let mut engine = BuildEngine::new(archive, InMemoryTaskQueue::new());
    engine.build_processor(&spec, &catalog, &[]).expect("first pass ok");

    // La próxima pasada ve el assessor recién creado en el catálogo, como
    // lo devolvería el proveedor tras un refresh.
    let (archive, _) = engine.into_parts();
    let mut assessors: Vec<Assessor> = catalog.assessors().to_vec();
    assessors.extend(archive.created().cloned());
    let refreshed = ProjectCatalog::new(catalog.name(), catalog.scans().to_vec(), assessors);

    let writes_before = archive.write_count();
    let mut engine = BuildEngine::new(archive, InMemoryTaskQueue::new());
    let summary = engine.build_processor(&spec, &refreshed, &[]).expect("second pass ok");

    assert_eq!(summary.already_built(), 1);
    assert!(matches!(summary.outcomes[0], SessionOutcome::AlreadyBuilt(_)));
    let (archive, queue) = engine.into_parts();
    assert_eq!(archive.write_count(), writes_before, "second pass must not write");
    assert!(queue.is_empty());
}

#[test]
fn include_filters_restrict_sessions_by_glob() {
    let spec = load_processor_spec(SEG_YAML, "SEG_v2.1.0.yaml", None).expect("definition parses");
    let catalog = catalog_from_json(CATALOG_JSON).expect("catalog parses");

    let mut engine = BuildEngine::new(InMemoryArchive::new(), InMemoryTaskQueue::new());
    let summary = engine.build_processor(&spec, &catalog, &["S2*".to_string()]).expect("pass ok");

    assert_eq!(summary.sessions, 1);
    assert!(summary.outcomes.is_empty(), "S2_MR1 has no T1w so nothing to admit");
}

#[test]
fn dates_survive_catalog_parsing() {
    let catalog = catalog_from_json(CATALOG_JSON).expect("catalog parses");
    let first = &catalog.scans()[0];
    assert_eq!(first.date(), NaiveDate::parse_from_str("2024-01-05", "%Y-%m-%d").ok());
}

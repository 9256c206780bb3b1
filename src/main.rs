use chrono::NaiveDate;
use rad_adapters::load_processor_spec;
use rad_core::{parse_session, BuildEngine, InMemoryArchive, InMemoryTaskQueue, InputSpec, ProcessorSpec,
               ProjectCatalog, ResourceSpec, SessionOutcome};
use rad_domain::status::{qc, xsi};
use rad_domain::{Assessor, ProcStatus, Scan};

fn date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Catálogo de demostración: un sujeto con dos sesiones MR, una PET y un
/// assessor previo completo.
fn demo_catalog() -> ProjectCatalog {
    let scans = vec![
        Scan::new("DEMO", "SUBJ01", "SUBJ01_MR1", "301", "T1w", "usable", xsi::MR_SESSION,
                  date("2024-01-05"), None).expect("scan ok"),
        Scan::new("DEMO", "SUBJ01", "SUBJ01_MR1", "302", "T1w", "unusable", xsi::MR_SESSION,
                  date("2024-01-05"), None).expect("scan ok"),
        Scan::new("DEMO", "SUBJ01", "SUBJ01_MR1", "401", "FLAIR", "usable", xsi::MR_SESSION,
                  date("2024-01-05"), None).expect("scan ok"),
        Scan::new("DEMO", "SUBJ01", "SUBJ01_MR2", "301", "T1w", "usable", xsi::MR_SESSION,
                  date("2024-06-20"), None).expect("scan ok"),
        Scan::new("DEMO", "SUBJ01", "SUBJ01_PET1", "601", "PET_AC", "usable", xsi::PET_SESSION,
                  date("2024-02-01"), Some("PIB-12")).expect("scan ok"),
    ];
    let assessors = vec![
        Assessor::new("DEMO", "SUBJ01", "SUBJ01_MR1", "DEMO-x-SUBJ01-x-SUBJ01_MR1-x-FS7_v1-x-aaaa1111",
                      "FS7_v1", ProcStatus::Complete, qc::PASSED_QA,
                      r#"{"scan_t1":"/projects/DEMO/subjects/SUBJ01/experiments/SUBJ01_MR1/scans/301"}"#,
                      date("2024-01-10")).expect("assessor ok"),
    ];
    ProjectCatalog::new("DEMO", scans, assessors)
}

/// Definición de demostración, en el formato YAML del proveedor.
const DEMO_YAML: &str = r#"
procyamlversion: 3.0.0-dev.0
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
        types: T1w,MPRAGE
        skip_unusable: true
        resources:
          - resource: NIFTI
            fmatch: "*.nii.gz"
            varname: scan_t1
"#;

/// [M1] Emparejado y matriz: la sesión con un T1 usable produce exactamente
/// una combinación; el T1 inusable queda afuera.
fn run_matching_validation(catalog: &ProjectCatalog, spec: &ProcessorSpec) {
    println!("[M1] parse_session sobre SUBJ01_MR1");
    let input_sets = parse_session(spec, "SUBJ01_MR1", catalog);
    println!("[M1] combinaciones: {}", input_sets.len());
    for set in &input_sets {
        println!("[M1]   inputs={} fp={}", set.canonical_string(), &set.fingerprint()[..12]);
    }
}

/// [P1] Regla PET: el tracer matchea sólo en la primera sesión MR del
/// sujeto.
fn run_pet_validation(catalog: &ProjectCatalog) {
    let spec = ProcessorSpec::new("AMYLOID_v1", "1.0.0")
        .with_input(InputSpec::pet("pet_pib", &["PET*"], &["PIB*"])
                        .with_resource(ResourceSpec::file("NIFTI").with_fdest("pet.nii.gz")));

    for session in ["SUBJ01_MR1", "SUBJ01_MR2"] {
        let sets = parse_session(&spec, session, catalog);
        println!("[P1] {session}: combinaciones={}", sets.len());
    }
}

/// [B1] Pasada completa con puertos en memoria, dos veces: la segunda no
/// escribe nada porque el assessor recién creado ya corre.
fn run_build_validation(catalog: &ProjectCatalog, spec: &ProcessorSpec) {
    let mut archive = InMemoryArchive::new();
    // El NIFTI del T1 usable existe en el archivo.
    archive.add_resource("/projects/DEMO/subjects/SUBJ01/experiments/SUBJ01_MR1/scans/301",
                         "NIFTI",
                         &["t1.nii.gz"]);
    archive.add_resource("/projects/DEMO/subjects/SUBJ01/experiments/SUBJ01_MR2/scans/301",
                         "NIFTI",
                         &["t1.nii.gz"]);

    let mut engine = BuildEngine::new(archive, InMemoryTaskQueue::new());
    let summary = engine.build_processor(spec, catalog, &[]).expect("first pass");
    println!("[B1] primera pasada: sessions={} built={} pending={}",
             summary.sessions,
             summary.built(),
             summary.pending());
    for outcome in &summary.outcomes {
        match outcome {
            SessionOutcome::Built(label) => println!("[B1]   RUNNING {label}"),
            SessionOutcome::Pending(label) => println!("[B1]   PENDING {label}"),
            SessionOutcome::NoData(label) => println!("[B1]   NO_DATA {label}"),
            SessionOutcome::AlreadyBuilt(label) => println!("[B1]   BUILT   {label}"),
        }
    }

    // Reconstruir el catálogo como lo vería la próxima pasada: los
    // assessors creados ya están en el archivo con su estado nuevo.
    let (archive, queue) = engine.into_parts();
    println!("[B1] tasks encoladas: {}", queue.len());
    if let Some(task) = queue.submitted().first() {
        println!("[B1] task[0]: {}", serde_json::to_string(task).unwrap_or_default());
    }
    let mut assessors: Vec<Assessor> = catalog.assessors().to_vec();
    assessors.extend(archive.created().cloned());
    let next_catalog = ProjectCatalog::new(catalog.name(), catalog.scans().to_vec(), assessors);

    let mut engine = BuildEngine::new(archive, InMemoryTaskQueue::new());
    let writes_before = engine.archive().write_count();
    let summary = engine.build_processor(spec, &next_catalog, &[]).expect("second pass");
    let writes_after = engine.archive().write_count();
    println!("[B1] segunda pasada: already_built={} escrituras nuevas={}",
             summary.already_built(),
             writes_after - writes_before);
}

fn main() {
    // Cargar variables de entorno desde .env si existe
    let _ = dotenvy::dotenv();

    let catalog = demo_catalog();
    let spec = load_processor_spec(DEMO_YAML, "SEG_v2.1.0.yaml", None).expect("demo definition parses");
    println!("procesador: {} v{}", spec.proctype, spec.version);

    run_matching_validation(&catalog, &spec);
    run_pet_validation(&catalog);
    run_build_validation(&catalog, &spec);
}

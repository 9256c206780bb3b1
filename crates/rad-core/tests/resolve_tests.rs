use chrono::NaiveDate;
use rad_core::engine::resolve::{find_inputs, Resolution};
use rad_core::{InMemoryArchive, InputSet, InputSpec, MultiPolicy, NotReady, ProcessorSpec, ProjectCatalog,
               ResourceKind, ResourceSpec};
use rad_domain::status::{qc, xsi};
use rad_domain::{Assessor, ProcStatus, Scan};

const T1_PATH: &str = "/projects/P1/subjects/SUBJ01/experiments/S1/scans/301";

fn catalog() -> ProjectCatalog {
    let scans = vec![Scan::new("P1", "SUBJ01", "S1", "301", "T1w", "usable", xsi::MR_SESSION,
                               NaiveDate::parse_from_str("2024-01-05", "%Y-%m-%d").ok(), None).expect("scan ok")];
    ProjectCatalog::new("P1", scans, vec![])
}

fn markers() -> Vec<String> {
    qc::DEFAULT_BAD_MARKERS.iter().map(|m| m.to_string()).collect()
}

fn t1_set() -> InputSet {
    let mut set = InputSet::new();
    set.insert("scan_t1", T1_PATH);
    set
}

fn spec_with_resource(resource: ResourceSpec) -> ProcessorSpec {
    ProcessorSpec::new("proc_v1", "1.0.0").with_input(InputSpec::scan("scan_t1", &["T1w"]).with_resource(resource))
}

#[test]
fn empty_resource_blocks_with_no_resource() {
    let spec = spec_with_resource(ResourceSpec::file("NIFTI").with_fmatch("*.nii.gz"));
    let archive = InMemoryArchive::new();

    let res = find_inputs(&spec, &t1_set(), &catalog(), &archive, &markers()).expect("no archive error");
    assert_eq!(res, Resolution::Blocked(NotReady::NeedsInputs("No Resource".to_string())));
}

#[test]
fn glob_without_matches_blocks_with_no_files() {
    let spec = spec_with_resource(ResourceSpec::file("NIFTI").with_fmatch("*.json"));
    let mut archive = InMemoryArchive::new();
    archive.add_resource(T1_PATH, "NIFTI", &["t1.nii.gz"]);

    let res = find_inputs(&spec, &t1_set(), &catalog(), &archive, &markers()).expect("no archive error");
    assert_eq!(res, Resolution::Blocked(NotReady::NeedsInputs("No Files".to_string())));
}

#[test]
fn two_matches_without_policy_block_with_multiple_files() {
    let spec = spec_with_resource(ResourceSpec::file("NIFTI").with_fmatch("*.nii.gz"));
    let mut archive = InMemoryArchive::new();
    archive.add_resource(T1_PATH, "NIFTI", &["a.nii.gz", "b.nii.gz"]);

    let res = find_inputs(&spec, &t1_set(), &catalog(), &archive, &markers()).expect("no archive error");
    assert_eq!(res, Resolution::Blocked(NotReady::NeedsInputs("multiple files".to_string())));
}

#[test]
fn multi_policy_first_takes_listed_first_silently() {
    let spec = spec_with_resource(ResourceSpec::file("NIFTI").with_fmatch("*.nii.gz")
                                                             .with_multi(MultiPolicy::First)
                                                             .with_varname("t1_file"));
    let mut archive = InMemoryArchive::new();
    archive.add_resource(T1_PATH, "NIFTI", &["a.nii.gz", "b.nii.gz"]);

    let res = find_inputs(&spec, &t1_set(), &catalog(), &archive, &markers()).expect("no archive error");
    let Resolution::Ready(resolved) = res else {
        panic!("expected ready, got {res:?}");
    };
    assert_eq!(resolved.input_list.len(), 1);
    assert!(resolved.input_list[0].fpath.ends_with("NIFTI/files/a.nii.gz"));
    assert_eq!(resolved.input_list[0].fdest, "a.nii.gz");
    // La variable queda ligada al nombre local, no a la URI.
    assert_eq!(resolved.var2val["t1_file"], "a.nii.gz");
}

#[test]
fn exact_filepath_binds_without_globbing() {
    let spec = spec_with_resource(ResourceSpec::file("STATS").with_filepath("stats/summary.csv"));
    let mut archive = InMemoryArchive::new();
    archive.add_resource(T1_PATH, "STATS", &["whatever.txt"]);

    let res = find_inputs(&spec, &t1_set(), &catalog(), &archive, &markers()).expect("no archive error");
    let Resolution::Ready(resolved) = res else {
        panic!("expected ready, got {res:?}");
    };
    assert!(resolved.input_list[0].fpath.ends_with("STATS/files/stats/summary.csv"));
    assert_eq!(resolved.input_list[0].fdest, "summary.csv");
}

#[test]
fn whole_resource_transfers_directory_level() {
    let spec = spec_with_resource(ResourceSpec::directory("DICOM"));
    let mut archive = InMemoryArchive::new();
    archive.add_resource(T1_PATH, "DICOM", &["1.dcm", "2.dcm"]);

    let res = find_inputs(&spec, &t1_set(), &catalog(), &archive, &markers()).expect("no archive error");
    let Resolution::Ready(resolved) = res else {
        panic!("expected ready, got {res:?}");
    };
    assert_eq!(resolved.input_list[0].kind, ResourceKind::Directory);
    assert!(resolved.input_list[0].fpath.ends_with("DICOM/files"));
    assert_eq!(resolved.input_list[0].fdest, "DICOM");
}

#[test]
fn multiple_artefacts_prefix_dest_with_index() {
    let spec = ProcessorSpec::new("proc_v1", "1.0.0")
        .with_input(InputSpec::scan("scan_t1", &["T1w"])
                        .with_resource(ResourceSpec::file("NIFTI").with_fmatch("*.nii.gz").with_fdest("t1.nii.gz")));
    let second = "/projects/P1/subjects/SUBJ01/experiments/S1/scans/302";
    let scans = vec![Scan::new("P1", "SUBJ01", "S1", "301", "T1w", "usable", xsi::MR_SESSION, None, None).expect("scan ok"),
                     Scan::new("P1", "SUBJ01", "S1", "302", "T1w", "usable", xsi::MR_SESSION, None, None).expect("scan ok")];
    let catalog = ProjectCatalog::new("P1", scans, vec![]);

    let mut archive = InMemoryArchive::new();
    archive.add_resource(T1_PATH, "NIFTI", &["a.nii.gz"]);
    archive.add_resource(second, "NIFTI", &["b.nii.gz"]);

    let mut set = InputSet::new();
    set.insert_many("scan_t1", vec![T1_PATH.to_string(), second.to_string()]);

    let res = find_inputs(&spec, &set, &catalog, &archive, &markers()).expect("no archive error");
    let Resolution::Ready(resolved) = res else {
        panic!("expected ready, got {res:?}");
    };
    let dests: Vec<&str> = resolved.input_list.iter().map(|t| t.fdest.as_str()).collect();
    assert_eq!(dests, vec!["0t1.nii.gz", "1t1.nii.gz"]);
}

#[test]
fn unusable_scan_with_needs_qc_blocks_before_resources() {
    let scans = vec![Scan::new("P1", "SUBJ01", "S1", "301", "T1w", "unusable", xsi::MR_SESSION, None, None).expect("scan ok")];
    let catalog = ProjectCatalog::new("P1", scans, vec![]);
    let spec = ProcessorSpec::new("proc_v1", "1.0.0")
        .with_input(InputSpec::scan("scan_t1", &["T1w"]).with_needs_qc()
                        .with_resource(ResourceSpec::file("NIFTI")));
    let archive = InMemoryArchive::new();

    let res = find_inputs(&spec, &t1_set(), &catalog, &archive, &markers()).expect("no archive error");
    assert_eq!(res, Resolution::Blocked(NotReady::NeedsInputs("scan_t1: Not Usable".to_string())));
}

#[test]
fn assessor_input_still_running_blocks_whole_set() {
    let assr = Assessor::new("P1", "SUBJ01", "S1", "P1-x-SUBJ01-x-S1-x-FS7_v1-x-aaaa1111", "FS7_v1",
                             ProcStatus::JobRunning, qc::JOB_PENDING, "{}", None).expect("assessor ok");
    let assr_path = assr.full_path().to_string();
    let scans = vec![Scan::new("P1", "SUBJ01", "S1", "301", "T1w", "usable", xsi::MR_SESSION, None, None).expect("scan ok")];
    let catalog = ProjectCatalog::new("P1", scans, vec![assr]);

    let spec = ProcessorSpec::new("proc_v1", "1.0.0")
        .with_input(InputSpec::scan("scan_t1", &["T1w"])
                        .with_resource(ResourceSpec::file("NIFTI").with_fmatch("*.nii.gz")))
        .with_input(InputSpec::assessor("assr_fs", &["FS7_v1"]));
    let mut archive = InMemoryArchive::new();
    archive.add_resource(T1_PATH, "NIFTI", &["t1.nii.gz"]);

    let mut set = t1_set();
    set.insert("assr_fs", &assr_path);

    let res = find_inputs(&spec, &set, &catalog, &archive, &markers()).expect("no archive error");
    assert_eq!(res, Resolution::Blocked(NotReady::NeedsInputs("assr_fs: Not Ready".to_string())));
}

#[test]
fn vanished_artefact_blocks_as_no_data() {
    let spec = ProcessorSpec::new("proc_v1", "1.0.0")
        .with_input(InputSpec::scan("scan_t1", &["T1w"]).with_needs_qc()
                        .with_resource(ResourceSpec::file("NIFTI")));
    let empty_catalog = ProjectCatalog::new("P1", vec![], vec![]);
    let archive = InMemoryArchive::new();

    let res = find_inputs(&spec, &t1_set(), &empty_catalog, &archive, &markers()).expect("no archive error");
    assert_eq!(res, Resolution::Blocked(NotReady::NoData("scan_t1: No Data".to_string())));
}

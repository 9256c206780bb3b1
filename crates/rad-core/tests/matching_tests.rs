use chrono::NaiveDate;
use rad_core::engine::matcher::map_inputs;
use rad_core::{InputSpec, ProcessorSpec, ProjectCatalog};
use rad_domain::status::xsi;
use rad_domain::Scan;

fn mr_scan(session: &str, id: &str, scan_type: &str, quality: &str) -> Scan {
    Scan::new("P1", "SUBJ01", session, id, scan_type, quality, xsi::MR_SESSION,
              NaiveDate::parse_from_str("2024-01-05", "%Y-%m-%d").ok(), None).expect("scan ok")
}

#[test]
fn glob_matching_is_case_sensitive_and_anchored() {
    let catalog = ProjectCatalog::new("P1",
                                      vec![mr_scan("S1", "1", "T1w", "usable"),
                                           mr_scan("S1", "2", "T1_MPRAGE", "usable"),
                                           mr_scan("S1", "3", "t1w", "usable"),
                                           mr_scan("S1", "4", "xT1w", "usable")],
                                      vec![]);
    let spec = ProcessorSpec::new("proc_v1", "1.0.0").with_input(InputSpec::scan("scan_t1", &["T1*"]));

    let matched = map_inputs(&spec, "S1", &catalog);
    let paths = &matched["scan_t1"];
    assert_eq!(paths.len(), 2, "only T1w and T1_MPRAGE should match");
    assert!(paths[0].ends_with("/scans/1"));
    assert!(paths[1].ends_with("/scans/2"));
}

#[test]
fn first_pattern_match_wins_no_duplicates() {
    // Un scan cuyo tipo matchea dos patrones entra una sola vez.
    let catalog = ProjectCatalog::new("P1", vec![mr_scan("S1", "1", "T1w", "usable")], vec![]);
    let spec = ProcessorSpec::new("proc_v1", "1.0.0").with_input(InputSpec::scan("scan_t1", &["T1*", "T1w"]));

    let matched = map_inputs(&spec, "S1", &catalog);
    assert_eq!(matched["scan_t1"].len(), 1);
}

#[test]
fn skip_unusable_excludes_without_failing_the_slot() {
    let catalog = ProjectCatalog::new("P1",
                                      vec![mr_scan("S1", "1", "T1w", "usable"),
                                           mr_scan("S1", "2", "T1w", "unusable"),
                                           mr_scan("S1", "3", "FLAIR", "usable")],
                                      vec![]);
    let spec = ProcessorSpec::new("proc_v1", "1.0.0")
        .with_input(InputSpec::scan("scan_t1", &["T1w"]).with_skip_unusable());

    let matched = map_inputs(&spec, "S1", &catalog);
    assert_eq!(matched["scan_t1"].len(), 1);
    assert!(matched["scan_t1"][0].ends_with("/scans/1"));
}

#[test]
fn all_unusable_leaves_slot_empty_not_error() {
    let catalog = ProjectCatalog::new("P1", vec![mr_scan("S1", "1", "T1w", "unusable")], vec![]);
    let spec = ProcessorSpec::new("proc_v1", "1.0.0")
        .with_input(InputSpec::scan("scan_t1", &["T1w"]).with_skip_unusable());

    let matched = map_inputs(&spec, "S1", &catalog);
    assert!(matched["scan_t1"].is_empty());
}

#[test]
fn keep_multis_first_truncates_candidates() {
    let catalog = ProjectCatalog::new("P1",
                                      vec![mr_scan("S1", "1", "T1w", "usable"),
                                           mr_scan("S1", "2", "T1w", "usable")],
                                      vec![]);
    let spec = ProcessorSpec::new("proc_v1", "1.0.0")
        .with_input(InputSpec::scan("scan_t1", &["T1w"]).with_keep_first());

    let matched = map_inputs(&spec, "S1", &catalog);
    assert_eq!(matched["scan_t1"].len(), 1);
    assert!(matched["scan_t1"][0].ends_with("/scans/1"));
}

#[test]
fn candidates_preserve_catalog_order() {
    let catalog = ProjectCatalog::new("P1",
                                      vec![mr_scan("S1", "9", "T1w", "usable"),
                                           mr_scan("S1", "2", "T1w", "usable"),
                                           mr_scan("S1", "5", "T1w", "usable")],
                                      vec![]);
    let spec = ProcessorSpec::new("proc_v1", "1.0.0").with_input(InputSpec::scan("scan_t1", &["T1w"]));

    let matched = map_inputs(&spec, "S1", &catalog);
    let ids: Vec<&str> = matched["scan_t1"].iter().map(|p| p.rsplit('/').next().unwrap()).collect();
    assert_eq!(ids, vec!["9", "2", "5"]);
}

#[test]
fn assessor_inputs_match_proctype_by_glob() {
    use rad_domain::status::qc;
    use rad_domain::{Assessor, ProcStatus};

    let assr = Assessor::new("P1", "SUBJ01", "S1", "P1-x-SUBJ01-x-S1-x-FS7_v1-x-aaaa1111", "FS7_v1",
                             ProcStatus::Complete, qc::PASSED_QA, "{}", None).expect("assessor ok");
    let catalog = ProjectCatalog::new("P1", vec![mr_scan("S1", "1", "T1w", "usable")], vec![assr]);
    let spec = ProcessorSpec::new("proc_v1", "1.0.0").with_input(InputSpec::assessor("assr_fs", &["FS7_v*"]));

    let matched = map_inputs(&spec, "S1", &catalog);
    assert_eq!(matched["assr_fs"].len(), 1);
    assert!(matched["assr_fs"][0].ends_with("/assessors/P1-x-SUBJ01-x-S1-x-FS7_v1-x-aaaa1111"));
}

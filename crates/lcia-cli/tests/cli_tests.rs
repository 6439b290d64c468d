use lcia_cli::{build_cli, run, EXIT_OK};
use lcia_core::{CustomMethodsImporter, ImporterConfig};
use lcia_store::FileProject;
use lcia_test_utils::{sample_workbook, BIOSPHERE, WORKBOOK_NAME};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::tempdir;

fn run_args(args: &[&str]) -> (anyhow::Result<i32>, String) {
    let matches = build_cli().try_get_matches_from(args).unwrap();
    let mut out = Vec::new();
    let result = run(&matches, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn seed_project(dir: &Path) {
    let project = FileProject::open(dir).unwrap();
    CustomMethodsImporter::new(&project)
        .with_config(ImporterConfig::default().with_report_dir(dir))
        .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
        .unwrap();
}

#[test]
fn test_flows_lists_reconciled_nodes() {
    let dir = tempdir().unwrap();
    seed_project(dir.path());
    let project = dir.path().to_str().unwrap();

    let (result, out) = run_args(&["lcia", "flows", "--biosphere", BIOSPHERE, "--project", project]);

    assert_eq!(result.unwrap(), EXIT_OK);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"Carbon dioxide-('air',)\tCarbon dioxide\t('air',)\tkilogram"));
}

#[test]
fn test_methods_json_output() {
    let dir = tempdir().unwrap();
    seed_project(dir.path());
    let project = dir.path().to_str().unwrap();

    let (result, out) = run_args(&["lcia", "methods", "--project", project, "--json"]);

    assert_eq!(result.unwrap(), EXIT_OK);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
}

#[test]
fn test_unknown_database_lists_nothing() {
    let dir = tempdir().unwrap();
    let project = dir.path().to_str().unwrap();

    let (result, out) = run_args(&["lcia", "flows", "--biosphere", "missing", "--project", project]);

    assert_eq!(result.unwrap(), EXIT_OK);
    assert!(out.is_empty());
}

#[test]
fn test_missing_workbook_is_fatal() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("project");
    let workbook = dir.path().join("absent.xlsx");

    let (result, _) = run_args(&[
        "lcia",
        "import",
        workbook.to_str().unwrap(),
        "--biosphere",
        BIOSPHERE,
        "--project",
        project.to_str().unwrap(),
    ]);

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("absent.xlsx"));
}

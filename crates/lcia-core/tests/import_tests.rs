use lcia_core::{custom_methods_importer, CustomMethodsImporter, ImportError, ImporterConfig, ReconcileMode};
use lcia_ingress::{IngressError, SchemaError};
use lcia_model::{Categories, FlowKey, FlowNode};
use lcia_store::{FileProject, FlowDatabase, MemoryProject, MethodStore, StoreError};
use lcia_strategy::{LinkField, StrategyError};
use lcia_test_utils::{
    cf_row, climate_change, flow, init_tracing, method, sample_workbook, seed_nodes, workbook_fixture,
    WorkbookBuilder, BIOSPHERE, WORKBOOK_NAME,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::tempdir;

fn config(report_dir: &Path) -> ImporterConfig {
    ImporterConfig::default().with_report_dir(report_dir)
}

#[test]
fn test_second_run_creates_nothing() {
    init_tracing();
    let dir = tempdir().unwrap();
    let project_dir = dir.path().join("project");

    {
        let project = FileProject::open(&project_dir).unwrap();
        let summary = CustomMethodsImporter::new(&project)
            .with_config(config(dir.path()))
            .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
            .unwrap();
        assert_eq!(summary.reconcile.created.len(), 3);
        assert!(summary.reconcile.existing.is_empty());
    }

    let project = FileProject::open(&project_dir).unwrap();
    let summary = CustomMethodsImporter::new(&project)
        .with_config(config(dir.path()).with_overwrite(true))
        .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
        .unwrap();

    assert!(summary.reconcile.created.is_empty());
    assert_eq!(summary.reconcile.existing.len(), 3);
    assert_eq!(project.nodes(BIOSPHERE).unwrap().len(), 3);
    assert_eq!(summary.write.replaced.len(), 2);
    assert!(summary.is_complete());
}

#[test]
fn test_duplicate_flow_across_methods_reconciled_once() {
    let dir = tempdir().unwrap();
    let project = MemoryProject::new();
    let mut source = WorkbookBuilder::new()
        .cf(cf_row("climate change", "Carbon dioxide", "air", None, 1.0))
        .cf(cf_row("climate change, long term", "Carbon dioxide", "air", Some("unspecified"), 0.9))
        .unit("climate change", "kg CO2-Eq")
        .unit("climate change, long term", "kg CO2-Eq")
        .build();

    let summary = CustomMethodsImporter::new(&project)
        .with_config(config(dir.path()))
        .run_source(&mut source, WORKBOOK_NAME, BIOSPHERE)
        .unwrap();

    assert_eq!(summary.reconcile.created, vec![flow("Carbon dioxide", "air", None)]);
    assert_eq!(summary.stats.methods, 2);
    assert_eq!(summary.stats.unlinked, 0);
}

#[test]
fn test_subcompartment_yields_distinct_node() {
    let dir = tempdir().unwrap();
    let project = MemoryProject::new();
    let mut source = WorkbookBuilder::new()
        .cf(cf_row("climate change", "Carbon dioxide", "air", Some("unspecified"), 1.0))
        .cf(cf_row("climate change", "Carbon dioxide", "air", Some("urban air close to ground"), 1.0))
        .unit("climate change", "kg CO2-Eq")
        .build();

    CustomMethodsImporter::new(&project)
        .with_config(config(dir.path()))
        .run_source(&mut source, WORKBOOK_NAME, BIOSPHERE)
        .unwrap();

    let mut codes: Vec<String> = project
        .nodes(BIOSPHERE)
        .unwrap()
        .into_iter()
        .map(|n| n.code)
        .collect();
    codes.sort();
    assert_eq!(
        codes,
        vec![
            "Carbon dioxide-('air', 'urban air close to ground')".to_string(),
            "Carbon dioxide-('air',)".to_string(),
        ]
    );
}

#[test]
fn test_blank_subcompartment_links_to_compartment_node() {
    let dir = tempdir().unwrap();
    let project = MemoryProject::new();
    let mut source = WorkbookBuilder::new()
        .cf(cf_row("climate change", "Methane", "air", Some(""), 27.0))
        .unit("climate change", "kg CO2-Eq")
        .build();

    let summary = CustomMethodsImporter::new(&project)
        .with_config(config(dir.path()))
        .run_source(&mut source, WORKBOOK_NAME, BIOSPHERE)
        .unwrap();

    let codes: Vec<String> = project
        .nodes(BIOSPHERE)
        .unwrap()
        .into_iter()
        .map(|n| n.code)
        .collect();
    assert_eq!(codes, vec!["Methane-('air',)".to_string()]);
    assert_eq!(summary.stats.unlinked, 0);
    assert!(summary.degraded.is_empty());
    assert!(summary.error_report.is_none());
}

#[test]
fn test_existing_nodes_are_linked_not_recreated() {
    let dir = tempdir().unwrap();
    let project = MemoryProject::new();
    let co2 = FlowKey::new("Carbon dioxide", Categories::compartment("air"));
    seed_nodes(&project, BIOSPHERE, &[co2.clone()]);

    let summary = CustomMethodsImporter::new(&project)
        .with_config(config(dir.path()))
        .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
        .unwrap();

    assert_eq!(summary.reconcile.existing, vec![co2]);
    assert_eq!(summary.reconcile.created.len(), 2);
}

#[test]
fn test_overwrite_conflict_reported() {
    let dir = tempdir().unwrap();
    let project = MemoryProject::new();
    let runner = CustomMethodsImporter::new(&project).with_config(config(dir.path()));

    runner
        .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
        .unwrap();
    let second = runner
        .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
        .unwrap();

    assert!(second.write.written.is_empty());
    assert_eq!(second.write.conflicts.len(), 2);
    assert!(second.write.conflicts.contains(&climate_change()));
    assert!(!second.is_complete());
}

#[test]
fn test_unlinked_factor_written_to_report() {
    let dir = tempdir().unwrap();
    let project = MemoryProject::new();
    let mut source = sample_workbook()
        .cf(cf_row("climate change", "Nitrous oxide", "air", Some("(unspecified)"), 273.0))
        .build();

    let summary = CustomMethodsImporter::new(&project)
        .with_config(config(dir.path()))
        .run_source(&mut source, WORKBOOK_NAME, BIOSPHERE)
        .unwrap();

    let report = summary.error_report.clone().unwrap();
    assert_eq!(report, dir.path().join("errors_custom_lcia.json"));
    let value: serde_json::Value = serde_json::from_slice(&std::fs::read(&report).unwrap()).unwrap();
    assert_eq!(value["source_file"], WORKBOOK_NAME);
    assert_eq!(value["unlinked"][0]["name"], "Nitrous oxide");

    assert_eq!(summary.degraded.len(), 1);
    assert_eq!(summary.degraded[0].method, climate_change());
    assert_eq!(summary.degraded[0].unlinked, 1);

    let stored = project.get_method(&climate_change()).unwrap().unwrap();
    assert_eq!(stored.num_cfs(), 2);
}

#[test]
fn test_units_attached_to_methods() {
    let dir = tempdir().unwrap();
    let project = MemoryProject::new();
    let mut source = sample_workbook()
        .cf(cf_row("water use", "Water", "water", None, 1.0))
        .build();

    CustomMethodsImporter::new(&project)
        .with_config(config(dir.path()))
        .run_source(&mut source, WORKBOOK_NAME, BIOSPHERE)
        .unwrap();

    let climate = project.get_method(&climate_change()).unwrap().unwrap();
    assert_eq!(climate.unit.as_deref(), Some("kg CO2-Eq"));
    let water = project.get_method(&method("water use")).unwrap().unwrap();
    assert_eq!(water.unit, None);
}

#[test]
fn test_duplicate_nodes_abort_without_writing() {
    let dir = tempdir().unwrap();
    let project = MemoryProject::new();
    let co2 = FlowKey::new("Carbon dioxide", Categories::compartment("air"));
    let mut twin = FlowNode::emission(BIOSPHERE, &co2);
    twin.code = "co2-legacy".to_string();
    project.create_node(twin).unwrap();
    project.create_node(FlowNode::emission(BIOSPHERE, &co2)).unwrap();

    let err = CustomMethodsImporter::new(&project)
        .with_config(config(dir.path()))
        .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
        .unwrap_err();

    assert!(matches!(
        err,
        ImportError::Store(StoreError::MultipleResults { count: 2, .. })
    ));
    assert!(project.method_keys().unwrap().is_empty());
}

#[test]
fn test_ambiguous_link_candidates_abort_without_writing() {
    let dir = tempdir().unwrap();
    let project = MemoryProject::new();
    let mut first = FlowNode::emission(BIOSPHERE, &FlowKey::new("Carbon dioxide", Categories::compartment("air")));
    first.code = "co2-air".to_string();
    let mut second = FlowNode::emission(BIOSPHERE, &FlowKey::new("Carbon dioxide", Categories::compartment("water")));
    second.code = "co2-water".to_string();
    // same name; only categories differ
    project.create_node(first).unwrap();
    project.create_node(second).unwrap();

    let config = config(dir.path()).with_link_fields(vec![LinkField::Name]);
    let err = CustomMethodsImporter::new(&project)
        .with_config(config)
        .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
        .unwrap_err();

    assert!(matches!(
        err,
        ImportError::Strategy(StrategyError::AmbiguousCandidates { count: 2, .. })
    ));
    assert!(project.method_keys().unwrap().is_empty());
}

#[test]
fn test_parallel_reconcile_matches_sequential() {
    let dir = tempdir().unwrap();
    let sequential = MemoryProject::new();
    let parallel = MemoryProject::new();

    let a = CustomMethodsImporter::new(&sequential)
        .with_config(config(dir.path()))
        .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
        .unwrap();
    let b = CustomMethodsImporter::new(&parallel)
        .with_config(config(dir.path()).with_reconcile(ReconcileMode::Parallel { workers: 3 }))
        .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
        .unwrap();

    assert_eq!(a.reconcile, b.reconcile);
    assert_eq!(a.write, b.write);
    assert_eq!(sequential.snapshot().databases, parallel.snapshot().databases);
}

#[test]
fn test_invalid_config_rejected_before_import() {
    let project = MemoryProject::new();
    let config = ImporterConfig::default().with_reconcile(ReconcileMode::Parallel { workers: 0 });

    let err = CustomMethodsImporter::new(&project)
        .with_config(config)
        .run_source(&mut sample_workbook().build(), WORKBOOK_NAME, BIOSPHERE)
        .unwrap_err();

    assert!(matches!(err, ImportError::Config(_)));
    assert!(project.databases().unwrap().is_empty());
}

#[test]
fn test_import_from_xlsx_file() {
    let project = MemoryProject::new();

    let summary = custom_methods_importer(&project, workbook_fixture("lcia.xlsx"), BIOSPHERE, false).unwrap();

    assert_eq!(summary.file, "lcia.xlsx");
    assert_eq!(summary.reconcile.created.len(), 4);
    assert_eq!(summary.stats.methods, 2);
    assert_eq!(summary.stats.cfs, 4);
    assert!(summary.is_complete());
    assert!(summary.error_report.is_none());

    let acidification = project.get_method(&method("acidification")).unwrap().unwrap();
    assert_eq!(acidification.unit.as_deref(), Some("kg SO2-Eq"));
    assert_eq!(acidification.num_cfs(), 2);
    assert!(project
        .nodes(BIOSPHERE)
        .unwrap()
        .iter()
        .any(|n| n.code == "Sulfur dioxide-('air',)"));
}

#[test]
fn test_xlsx_without_indicators_sheet_changes_nothing() {
    let project = MemoryProject::new();

    let err = custom_methods_importer(&project, workbook_fixture("lcia_no_indicators.xlsx"), BIOSPHERE, false)
        .unwrap_err();

    assert!(matches!(
        err,
        ImportError::Ingress(IngressError::Schema(SchemaError::MissingSheet { .. }))
    ));
    assert!(project.nodes(BIOSPHERE).unwrap().is_empty());
    assert!(project.method_keys().unwrap().is_empty());
}

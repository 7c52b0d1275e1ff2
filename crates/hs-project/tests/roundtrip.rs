use hs_economics::{ProjectionYear, ReplacementPolicy, Technology};
use hs_project::{
    ProjectFile, load_json, load_project_series, load_yaml, resolve_timeseries_path, save_json,
    save_yaml, validate_project,
};
use std::path::Path;

fn priced_project(name: &str) -> ProjectFile {
    let mut project = ProjectFile::new(name, "series.csv");
    for (tech, price) in Technology::ALL.into_iter().zip([850.0, 1200.0, 1500.0, 500.0, 900.0, 1300.0]) {
        project.economics.prices.insert(tech, ProjectionYear::Y2030, price);
    }
    project.economics.projection_year = ProjectionYear::Y2030;
    project.economics.replacement_policy = ReplacementPolicy::Extrapolated;
    project
}

#[test]
fn roundtrip_yaml() {
    let project = priced_project("yaml site");
    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("hs_project_roundtrip.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json() {
    let mut project = priced_project("json site");
    project.optimizer.seed = 42;
    project.optimizer.workers = Some(4);

    let path = std::env::temp_dir().join("hs_project_roundtrip.json");
    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn save_rejects_invalid_project() {
    let project = ProjectFile::new("unpriced", "series.csv");
    let path = std::env::temp_dir().join("hs_project_unpriced.yaml");
    assert!(save_yaml(&path, &project).is_err());
}

#[test]
fn relative_series_path_follows_project_file() {
    let dir = std::env::temp_dir().join("hs_project_series");
    std::fs::create_dir_all(&dir).unwrap();
    let csv = "date,wind_power,PV_power,load,temperature\n\
               2019-01-01 00:00:00,300,40,120,4\n\
               2019-01-01 00:01:00,310,41,118,4\n\
               2019-01-01 00:02:00,305,42,119,4.1\n";
    std::fs::write(dir.join("series.csv"), csv).unwrap();

    let project = priced_project("series site");
    let project_path = dir.join("project.yaml");
    save_yaml(&project_path, &project).unwrap();

    let loaded = load_yaml(&project_path).unwrap();
    assert_eq!(resolve_timeseries_path(&project_path, &loaded), dir.join("series.csv"));
    let series = load_project_series(&project_path, &loaded).unwrap();
    assert_eq!(series.series.len(), 3);
    assert_eq!(series.series.load_kw[1], 118.0);
}

#[test]
fn demo_project_loads() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let path = root.join("project.yaml");
    let project = load_yaml(&path).unwrap_or_else(|e| panic!("Failed to load demo project: {}", e));
    let series = load_project_series(&path, &project).unwrap();
    assert!(!series.series.is_empty());
}

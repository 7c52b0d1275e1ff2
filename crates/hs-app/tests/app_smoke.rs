use hs_app::*;
use hs_economics::{EconomicsConfig, ProjectionYear, Technology};
use hs_sim::{PlantConstants, PlantSizing, SearchSpace, SimOptions, TimeSeries};
use std::path::{Path, PathBuf};

fn priced_economics() -> EconomicsConfig {
    let mut economics = EconomicsConfig::default();
    for (tech, price) in Technology::ALL
        .into_iter()
        .zip([300_000.0, 700.0, 1400.0, 500.0, 650.0, 1250.0])
    {
        economics.prices.insert(tech, ProjectionYear::Y2020, price);
    }
    economics
}

fn evaluator() -> Evaluator {
    // Two days of steady wind against a slightly larger load at night.
    let mut series = TimeSeries::constant(2 * 24 * 60, 350.0, 0.0, 300.0, 12.0);
    for i in 0..series.len() {
        if (i / 60) % 24 < 8 {
            series.wind_kw[i] = 150.0;
        }
    }
    Evaluator {
        series,
        constants: PlantConstants::default(),
        options: SimOptions::default(),
        search: SearchSpace::default(),
        economics: priced_economics(),
    }
}

#[test]
fn evaluation_produces_horizon_rows_and_finite_lcore() {
    let eval = evaluator();
    let sizing = PlantSizing {
        electrolyzer_cells: 10,
        fuel_cell_stacks: 5,
        battery_kwh: 500.0,
        high_pressure_tank_kg: 200.0,
        pv_increments: 0,
    };
    let out = eval.evaluate_sizing(&sizing).unwrap();
    assert_eq!(out.run.rows.len(), 20);
    assert_eq!(out.lcore.capex.len(), 21);
    assert!(out.lcore.lcore.is_finite() && out.lcore.lcore > 0.0);
}

#[test]
fn objective_maps_failures_to_infinity() {
    let eval = evaluator();
    // Battery step 0 is below the one-module minimum.
    assert_eq!(eval.objective(&[1, 1, 0, 1, 0]), f64::INFINITY);
    assert_eq!(eval.objective(&[1, 1]), f64::INFINITY);

    let mut unpriced = evaluator();
    unpriced.economics = EconomicsConfig::default();
    assert_eq!(unpriced.objective(&[1, 1, 4, 1, 0]), f64::INFINITY);
}

#[test]
fn objective_matches_lcore_of_decoded_sizing() {
    let eval = evaluator();
    let x = [2, 1, 10, 2, 4];
    let sizing = eval.search.decode(&x).unwrap();
    let direct = eval.evaluate_sizing(&sizing).unwrap().lcore.lcore;
    assert_eq!(eval.objective(&x), direct);
}

fn demo_project_copy(dir_name: &str) -> PathBuf {
    let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let dir = std::env::temp_dir().join(dir_name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::copy(demos.join("series.csv"), dir.join("series.csv")).unwrap();
    std::fs::copy(demos.join("project.yaml"), dir.join("project.yaml")).unwrap();
    dir.join("project.yaml")
}

#[test]
fn simulate_run_is_cached() {
    let project_path = demo_project_copy("hs_app_simulate");
    let sizing = PlantSizing {
        electrolyzer_cells: 10,
        fuel_cell_stacks: 5,
        battery_kwh: 400.0,
        high_pressure_tank_kg: 100.0,
        pv_increments: 16,
    };
    let request = RunRequest {
        project_path: &project_path,
        mode: RunMode::Simulate { sizing },
        options: RunOptions::default(),
    };

    let mut stages = Vec::new();
    let mut cb = |e: RunProgressEvent| stages.push(e.stage);
    let first = ensure_run_with_progress(&request, Some(&mut cb)).unwrap();
    assert!(!first.loaded_from_cache);
    assert!(stages.contains(&RunStage::SimulatingFirstYear));
    assert_eq!(stages.last(), Some(&RunStage::Completed));

    let second = ensure_run(&request).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(second.run_id, first.run_id);
    assert_eq!(second.report, first.report);

    let runs = list_runs(&project_path).unwrap();
    assert_eq!(runs.len(), 1);
}

#[test]
fn evaluate_run_reports_lcore() {
    let project_path = demo_project_copy("hs_app_evaluate");
    let sizing = PlantSizing {
        electrolyzer_cells: 10,
        fuel_cell_stacks: 5,
        battery_kwh: 400.0,
        high_pressure_tank_kg: 100.0,
        pv_increments: 16,
    };
    let request = RunRequest {
        project_path: &project_path,
        mode: RunMode::Evaluate { sizing },
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
    };
    let response = ensure_run(&request).unwrap();
    assert_eq!(response.report.rows.len(), 20);
    assert!(response.report.lcore_per_mwh().unwrap() > 0.0);
    let (manifest, _) = load_run(&project_path, &response.run_id).unwrap();
    assert_eq!(manifest.sizing, sizing);
}

#[test]
fn optimize_appends_summary() {
    let project_path = demo_project_copy("hs_app_optimize");
    let mut project = hs_project::load_yaml(&project_path).unwrap();
    project.search.electrolyzer_cells.max = 10.0;
    project.search.fuel_cell_stacks.max = 10.0;
    project.search.battery_kwh.max = 500.0;
    project.search.high_pressure_tank_kg.max = 200.0;
    project.search.pv_increments.max = 10.0;
    project.optimizer.population_multiplier = 1;
    project.optimizer.max_generations = 2;
    hs_project::save_yaml(&project_path, &project).unwrap();

    let summary_path = project_path.with_file_name("summary.csv");
    let request = RunRequest {
        project_path: &project_path,
        mode: RunMode::Optimize,
        options: RunOptions {
            summary_path: Some(summary_path.clone()),
            seed: Some(4),
            ..RunOptions::default()
        },
    };
    let response = ensure_run(&request).unwrap();
    let outcome = response.optimizer.unwrap();
    assert!(outcome.generations <= 2);

    let records = hs_results::read_summaries(&summary_path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].lcore, outcome.best_value);
    assert_eq!(records[0].electrolyzer_cells, response.manifest.sizing.electrolyzer_cells);
}

use clap::{Args, Parser, Subcommand};
use hs_app::{
    AppError, AppResult, RunMode, RunOptions, RunProgressEvent, RunRequest, RunResponse, RunStage,
    project_service, run_service,
};
use hs_sim::PlantSizing;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "hs-cli")]
#[command(about = "Hybrid renewable and storage plant sizing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project file and its time series
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Simulate one year of a fixed sizing
    Simulate {
        project_path: PathBuf,
        #[command(flatten)]
        sizing: SizingArgs,
        /// Keep the per-step dispatch record (written to trace.csv)
        #[arg(long)]
        trace: bool,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Simulate the project lifetime of a fixed sizing and compute its LCORE
    Evaluate {
        project_path: PathBuf,
        #[command(flatten)]
        sizing: SizingArgs,
        #[arg(long)]
        no_cache: bool,
    },
    /// Search the sizing space for the lowest LCORE
    Optimize {
        project_path: PathBuf,
        /// Summary CSV to append the result to
        #[arg(short, long, default_value = "summary.csv")]
        summary: PathBuf,
        /// Override the project's optimizer seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List cached runs for a project
    Runs { project_path: PathBuf },
    /// Show details of a cached run
    ShowRun { project_path: PathBuf, run_id: String },
}

#[derive(Args)]
struct SizingArgs {
    /// Decision vector in resolution steps: EL,FC,BESS,Tank,PV
    #[arg(long, value_delimiter = ',', num_args = 5, conflicts_with_all = ["electrolyzer_cells", "fuel_cell_stacks", "battery_kwh", "tank_kg", "pv_increments"])]
    vector: Option<Vec<i64>>,
    #[arg(long, default_value_t = 0)]
    electrolyzer_cells: u32,
    #[arg(long, default_value_t = 0)]
    fuel_cell_stacks: u32,
    #[arg(long, default_value_t = 0.0)]
    battery_kwh: f64,
    #[arg(long, default_value_t = 0.0)]
    tank_kg: f64,
    #[arg(long, default_value_t = 0)]
    pv_increments: u32,
}

impl SizingArgs {
    fn resolve(&self, project_path: &Path) -> AppResult<PlantSizing> {
        if let Some(vector) = &self.vector {
            let project = project_service::load_project_file(project_path)?;
            return Ok(project.search.decode(vector)?);
        }
        let sizing = PlantSizing {
            electrolyzer_cells: self.electrolyzer_cells,
            fuel_cell_stacks: self.fuel_cell_stacks,
            battery_kwh: self.battery_kwh,
            high_pressure_tank_kg: self.tank_kg,
            pv_increments: self.pv_increments,
        };
        sizing.validate()?;
        Ok(sizing)
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Simulate {
            project_path,
            sizing,
            trace,
            no_cache,
        } => {
            let sizing = sizing.resolve(&project_path)?;
            let options = RunOptions {
                use_cache: !no_cache,
                record_trace: trace,
                ..RunOptions::default()
            };
            cmd_run(&project_path, RunMode::Simulate { sizing }, options)
        }
        Commands::Evaluate {
            project_path,
            sizing,
            no_cache,
        } => {
            let sizing = sizing.resolve(&project_path)?;
            let options = RunOptions {
                use_cache: !no_cache,
                ..RunOptions::default()
            };
            cmd_run(&project_path, RunMode::Evaluate { sizing }, options)
        }
        Commands::Optimize {
            project_path,
            summary,
            seed,
        } => {
            let options = RunOptions {
                summary_path: Some(summary),
                seed,
                ..RunOptions::default()
            };
            cmd_run(&project_path, RunMode::Optimize, options)
        }
        Commands::Runs { project_path } => cmd_runs(&project_path),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let loaded = project_service::load_project(project_path)?;
    let summary = project_service::summarize(&loaded);
    println!("✓ Project is valid");
    println!("  Name: {}", summary.name);
    println!(
        "  Time series: {} steps at {} per hour{}",
        summary.steps,
        summary.timestep_per_hour,
        summary
            .first_timestamp
            .map(|t| format!(", starting {t}"))
            .unwrap_or_default()
    );
    println!("  Search space: {} configurations", summary.search_points);
    Ok(())
}

fn cmd_run(project_path: &Path, mode: RunMode, options: RunOptions) -> AppResult<()> {
    tracing::debug!(project = %project_path.display(), ?mode, "starting run");
    let request = RunRequest {
        project_path,
        mode,
        options,
    };

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let emit_now = last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Run completed: {} ({:.2} s)", response.run_id, response.total_time_s);
    }
    print_response(&response);
    Ok(())
}

fn print_sizing(sizing: &PlantSizing) {
    println!(
        "  Sizing: EL {} cells, FC {} stacks, BESS {} kWh, tank {} kg, PV +{} increments",
        sizing.electrolyzer_cells,
        sizing.fuel_cell_stacks,
        sizing.battery_kwh,
        sizing.high_pressure_tank_kg,
        sizing.pv_increments
    );
}

fn print_response(response: &RunResponse) {
    print_sizing(&response.manifest.sizing);
    let first = &response.report.first_year;
    let e = &first.energy;
    println!("\nFirst year:");
    println!("  Renewable: {:.2} MWh  Load: {:.2} MWh", e.renewable, e.load);
    println!(
        "  Self-consumption: RES {:.1} %  +BESS {:.1} %  +H2 {:.1} %",
        e.renewable_self_consumption(),
        e.battery_self_consumption(),
        e.hydrogen_self_consumption()
    );
    println!("  Unmet: {:.2} MWh  Surplus: {:.2} MWh", e.deficit, e.excess);
    println!(
        "  Hydrogen: produced {:.2} kg, compressed {:.2} kg, consumed {:.2} kg",
        first.hydrogen.produced_kg, first.hydrogen.compressed_kg, first.hydrogen.consumed_kg
    );
    println!("  Final SOH: {:.4}", first.final_soh);

    if let Some(projection) = &response.report.projection {
        let l = projection.lifetimes;
        println!(
            "\nLifetimes: battery {} y, electrolyzer {} y, fuel cell {} y{}",
            l.battery,
            l.electrolyzer,
            l.fuel_cell,
            if projection.nominal_factors { " (nominal)" } else { "" }
        );
    }
    if let Some(lcore) = response.report.lcore_per_mwh() {
        println!("LCORE: {:.2} per MWh", lcore);
    }
    if let Some(outcome) = &response.optimizer {
        println!(
            "\nOptimizer: {} generations, {} evaluations, converged = {}",
            outcome.generations, outcome.evaluations, outcome.converged
        );
    }
    if let Some(summary) = &response.summary {
        println!(
            "Summary: EL {} FC {} BESS {} Tank {} PV {:.1} kWp LCORE {:.2} time {:.1} s",
            summary.electrolyzer_cells,
            summary.fuel_cell_stacks,
            summary.battery_kwh,
            summary.high_pressure_tank_kg,
            summary.pv_kwp,
            summary.lcore,
            summary.elapsed_s
        );
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.optimizer) {
        (RunStage::Optimizing, Some(o)) => {
            let width = 28usize;
            let fraction = (o.generation as f64 / o.max_generations.max(1) as f64).min(1.0);
            let filled = ((fraction * width as f64).round() as usize).min(width);
            print!(
                "\r[{}{}] gen {}/{}  best={:.3}  evals={}  elapsed={:.1}s",
                "#".repeat(filled),
                "-".repeat(width - filled),
                o.generation,
                o.max_generations,
                o.best_value,
                o.evaluations,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            print!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
        }
    }
    let _ = io::stdout().flush();
}

fn cmd_runs(project_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(project_path)?;

    if runs.is_empty() {
        println!("No cached runs found");
    } else {
        println!("Cached runs:");
        for manifest in runs {
            println!(
                "  {} ({}, {:?})",
                manifest.run_id, manifest.timestamp, manifest.run_kind
            );
        }
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);
    let (manifest, report) = run_service::load_run(project_path, run_id)?;
    println!("  Project: {}", manifest.project_name);
    println!("  Created: {}", manifest.timestamp);
    print_sizing(&manifest.sizing);
    if !report.rows.is_empty() {
        println!("\nYear  Capacity[kWh]  EL[kg/MWh]  FC[kg/MWh]  Unmet[MWh]");
        for row in &report.rows {
            println!(
                "{:>4}  {:>13.1}  {:>10.3}  {:>10.3}  {:>10.3}",
                row.year,
                row.battery_capacity_kwh,
                row.electrolyzer_factor_kg_per_mwh,
                row.fuel_cell_factor_kg_per_mwh,
                row.energy.deficit
            );
        }
    }
    if let Some(lcore) = report.lcore_per_mwh() {
        println!("LCORE: {:.2} per MWh", lcore);
    }
    let json = serde_json::to_string_pretty(&report.first_year.energy)
        .map_err(|e| AppError::Results(e.to_string()))?;
    println!("\nFirst-year energy balance:\n{json}");
    Ok(())
}

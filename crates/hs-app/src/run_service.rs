//! Run execution and caching service.

use std::path::{Path, PathBuf};
use std::time::Instant;

use hs_results::{RunKind, RunManifest, RunReport, RunStore, SummaryRecord, append_summary, compute_run_id};
use hs_sim::{PlantSizing, run_full_year};
use tracing::info;

use crate::error::AppResult;
use crate::optimizer::{DeConfig, DeOutcome, GenerationEvent, differential_evolution};
use crate::progress::{OptimizerProgress, RunProgressEvent, RunStage};
use crate::project_service::{self, LoadedProject};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunMode {
    /// One full-fidelity year of a fixed sizing
    Simulate { sizing: PlantSizing },
    /// Lifetime run and LCORE of a fixed sizing
    Evaluate { sizing: PlantSizing },
    /// Search the project's sizing space for the lowest LCORE
    Optimize,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    /// Keep the per-step dispatch record of the first year
    pub record_trace: bool,
    /// Summary CSV that optimization results are appended to
    pub summary_path: Option<PathBuf>,
    /// Overrides the project's optimizer seed
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            record_trace: false,
            summary_path: None,
            seed: None,
        }
    }
}

pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub mode: RunMode,
    pub options: RunOptions,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub report: RunReport,
    pub loaded_from_cache: bool,
    pub total_time_s: f64,
    pub optimizer: Option<DeOutcome>,
    pub summary: Option<SummaryRecord>,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    mode: RunMode,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    optimizer: Option<OptimizerProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            mode,
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            optimizer,
        });
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mode = request.mode;

    emit_progress(
        &mut progress_cb,
        mode,
        RunStage::LoadingProject,
        started,
        Some("Loading project".to_string()),
        None,
    );
    let loaded = project_service::load_project(request.project_path)?;
    let store = RunStore::for_project(request.project_path)?;

    let response = match mode {
        RunMode::Simulate { sizing } | RunMode::Evaluate { sizing } => {
            run_fixed(&loaded, &store, request, sizing, &mut progress_cb, started)?
        }
        RunMode::Optimize => run_optimize(&loaded, &store, request, &mut progress_cb, started)?,
    };

    emit_progress(
        &mut progress_cb,
        mode,
        RunStage::Completed,
        started,
        Some(if response.loaded_from_cache {
            "Loaded cached run".to_string()
        } else {
            "Run completed".to_string()
        }),
        None,
    );
    Ok(response)
}

fn run_kind(mode: RunMode, loaded: &LoadedProject) -> RunKind {
    match mode {
        RunMode::Simulate { .. } => RunKind::Simulate,
        _ => RunKind::Evaluate {
            horizon_years: loaded.project.economics.horizon_years as usize,
        },
    }
}

fn run_fixed(
    loaded: &LoadedProject,
    store: &RunStore,
    request: &RunRequest,
    sizing: PlantSizing,
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    started: Instant,
) -> AppResult<RunResponse> {
    let mode = request.mode;
    sizing.validate()?;
    let mut evaluator = loaded.evaluator();
    evaluator.options.record_trace = request.options.record_trace;

    let kind = run_kind(mode, loaded);
    let run_id = compute_run_id(&sizing, &evaluator.options, &kind);

    emit_progress(
        progress_cb,
        mode,
        RunStage::CheckingCache,
        started,
        Some("Checking run cache".to_string()),
        None,
    );
    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            progress_cb,
            mode,
            RunStage::LoadingCachedResult,
            started,
            None,
            None,
        );
        return Ok(RunResponse {
            manifest: store.load_manifest(&run_id)?,
            report: store.load_report(&run_id)?,
            run_id,
            loaded_from_cache: true,
            total_time_s: started.elapsed().as_secs_f64(),
            optimizer: None,
            summary: None,
        });
    }

    emit_progress(
        progress_cb,
        mode,
        RunStage::SimulatingFirstYear,
        started,
        None,
        None,
    );
    let report = match mode {
        RunMode::Simulate { .. } => RunReport {
            first_year: run_full_year(
                &evaluator.series,
                &sizing,
                &evaluator.constants,
                &evaluator.options,
            )?,
            projection: None,
            rows: Vec::new(),
            lcore: None,
        },
        _ => {
            emit_progress(
                progress_cb,
                mode,
                RunStage::ExtrapolatingLifetime,
                started,
                None,
                None,
            );
            let evaluation = evaluator.evaluate_sizing(&sizing)?;
            RunReport {
                first_year: evaluation.run.first_year,
                projection: Some(evaluation.run.projection),
                rows: evaluation.run.rows,
                lcore: Some(evaluation.lcore),
            }
        }
    };

    emit_progress(progress_cb, mode, RunStage::SavingResults, started, None, None);
    let manifest = RunManifest::new(run_id.clone(), loaded.project.name.clone(), kind, sizing);
    store.save_run(&manifest, &report)?;

    Ok(RunResponse {
        run_id,
        manifest,
        report,
        loaded_from_cache: false,
        total_time_s: started.elapsed().as_secs_f64(),
        optimizer: None,
        summary: None,
    })
}

fn run_optimize(
    loaded: &LoadedProject,
    store: &RunStore,
    request: &RunRequest,
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    started: Instant,
) -> AppResult<RunResponse> {
    let mode = request.mode;
    let evaluator = loaded.evaluator();
    let mut config = DeConfig::from(&loaded.project.optimizer);
    if let Some(seed) = request.options.seed {
        config.seed = seed;
    }
    let bounds = loaded.project.search.bounds();

    let max_generations = config.max_generations;
    let mut on_generation = |event: GenerationEvent| {
        emit_progress(
            progress_cb,
            mode,
            RunStage::Optimizing,
            started,
            None,
            Some(OptimizerProgress {
                generation: event.generation,
                max_generations,
                best_value: event.best_value,
                best: event.best,
                evaluations: event.evaluations,
            }),
        );
    };
    let outcome = differential_evolution(
        &bounds,
        &config,
        |x| evaluator.objective(x),
        Some(&mut on_generation),
    )?;

    let sizing = loaded.project.search.decode(&outcome.best)?;
    info!(
        lcore = outcome.best_value,
        config = ?outcome.best,
        generations = outcome.generations,
        converged = outcome.converged,
        "optimization finished"
    );

    // The memo keeps only scores; rebuild the full record of the winner.
    let mut evaluator = evaluator;
    evaluator.options.record_trace = request.options.record_trace;
    let evaluation = evaluator.evaluate_sizing(&sizing)?;
    let elapsed_s = started.elapsed().as_secs_f64();

    emit_progress(progress_cb, mode, RunStage::SavingResults, started, None, None);
    let kind = RunKind::Optimize {
        generations: outcome.generations,
        evaluations: outcome.evaluations,
        elapsed_s,
    };
    let run_id = compute_run_id(&sizing, &evaluator.options, &kind);
    let manifest = RunManifest::new(run_id.clone(), loaded.project.name.clone(), kind, sizing);
    let report = RunReport {
        first_year: evaluation.run.first_year,
        projection: Some(evaluation.run.projection),
        rows: evaluation.run.rows,
        lcore: Some(evaluation.lcore),
    };
    store.save_run(&manifest, &report)?;

    let summary = SummaryRecord::new(&sizing, &loaded.project.plant, outcome.best_value, elapsed_s);
    if let Some(path) = &request.options.summary_path {
        append_summary(path, &summary)?;
    }

    Ok(RunResponse {
        run_id,
        manifest,
        report,
        loaded_from_cache: false,
        total_time_s: started.elapsed().as_secs_f64(),
        optimizer: Some(outcome),
        summary: Some(summary),
    })
}

/// Stored runs of the project at `project_path`.
pub fn list_runs(project_path: &Path) -> AppResult<Vec<RunManifest>> {
    let project = project_service::load_project_file(project_path)?;
    let store = RunStore::for_project(project_path)?;
    Ok(store.list_runs(&project.name)?)
}

pub fn load_run(project_path: &Path, run_id: &str) -> AppResult<(RunManifest, RunReport)> {
    let store = RunStore::for_project(project_path)?;
    Ok((store.load_manifest(run_id)?, store.load_report(run_id)?))
}

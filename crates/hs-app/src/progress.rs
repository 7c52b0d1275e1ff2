use crate::run_service::RunMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingProject,
    CheckingCache,
    LoadingCachedResult,
    SimulatingFirstYear,
    ExtrapolatingLifetime,
    Optimizing,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::LoadingProject => "loading project",
            RunStage::CheckingCache => "checking cache",
            RunStage::LoadingCachedResult => "loading cached run",
            RunStage::SimulatingFirstYear => "simulating first year",
            RunStage::ExtrapolatingLifetime => "extrapolating lifetime",
            RunStage::Optimizing => "optimizing",
            RunStage::SavingResults => "saving results",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizerProgress {
    pub generation: usize,
    pub max_generations: usize,
    pub best_value: f64,
    pub best: Vec<i64>,
    pub evaluations: usize,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub mode: RunMode,
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub optimizer: Option<OptimizerProgress>,
}

impl RunProgressEvent {
    pub fn stage(mode: RunMode, stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            mode,
            stage,
            elapsed_wall_s,
            message,
            optimizer: None,
        }
    }
}

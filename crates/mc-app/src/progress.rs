//! Progress events streamed to frontends while a run executes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Validating,
    CheckingCache,
    LoadingCachedResult,
    BuildingModel,
    Integrating,
    Recording,
    SavingResults,
    Completed,
    Failed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::Validating => "validating",
            RunStage::CheckingCache => "checking-cache",
            RunStage::LoadingCachedResult => "loading-cache",
            RunStage::BuildingModel => "building",
            RunStage::Integrating => "integrating",
            RunStage::Recording => "recording",
            RunStage::SavingResults => "saving",
            RunStage::Completed => "completed",
            RunStage::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransientProgress {
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
    pub outputs_done: usize,
    pub outputs_total: usize,
    pub internal_steps: usize,
    pub rhs_evals: usize,
    pub order: usize,
    pub step_size_s: f64,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub transient: Option<TransientProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            transient: None,
        }
    }
}

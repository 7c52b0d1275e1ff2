//! Content-based hashing for run IDs.

use crate::types::RunKind;
use hs_sim::{PlantSizing, SimOptions};
use sha2::{Digest, Sha256};

/// Identical sizing, options and run kind give the same id.
pub fn compute_run_id(sizing: &PlantSizing, options: &SimOptions, run_kind: &RunKind) -> String {
    let mut hasher = Sha256::new();

    let sizing_json = serde_json::to_string(sizing).unwrap_or_default();
    hasher.update(sizing_json.as_bytes());

    let options_json = serde_json::to_string(options).unwrap_or_default();
    hasher.update(options_json.as_bytes());

    // Optimizer statistics vary run to run; only the kind tag is hashed.
    let tag = match run_kind {
        RunKind::Simulate => "simulate".to_string(),
        RunKind::Evaluate { horizon_years } => format!("evaluate-{horizon_years}"),
        RunKind::Optimize { .. } => "optimize".to_string(),
    };
    hasher.update(tag.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

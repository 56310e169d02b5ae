use promptlab_core::{
    DiffLine, DiffSummary, EvalCase, ParameterMap, ReconciliationReport, ReferencePrompt,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Recover a template from rendered text
#[derive(Debug, Deserialize, Validate)]
pub struct ReconstructRequest {
    pub rendered_text: String,
    #[serde(default)]
    pub parameters: ParameterMap,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReconstructResponse {
    pub template: String,
}

/// Compare a reconstructed template and case parameters with a reference
#[derive(Debug, Deserialize, Validate)]
pub struct CompareRequest {
    pub reconstructed_template: String,
    pub reference_template: String,
    #[serde(default)]
    pub case_parameters: ParameterMap,
    #[serde(default)]
    pub reference_parameters: Vec<String>,
}

/// Line diff between two templates
#[derive(Debug, Deserialize, Validate)]
pub struct DiffRequest {
    pub old_text: String,
    pub new_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiffResponse {
    pub lines: Vec<DiffLine>,
    pub summary: DiffSummary,
}

/// Reconcile one case against the active prompt
#[derive(Debug, Deserialize, Validate)]
pub struct ReconcileCaseRequest {
    pub case: EvalCase,
    pub reference: ReferencePrompt,
    #[serde(default)]
    pub include_diff: bool,
}

/// Reconcile a list of cases against the active prompt, without diffs
#[derive(Debug, Deserialize, Validate)]
pub struct ReconcileBatchRequest {
    #[validate(length(min = 1))]
    pub cases: Vec<EvalCase>,
    pub reference: ReferencePrompt,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReconcileBatchResponse {
    pub reports: Vec<ReconciliationReport>,
    /// Number of reports flagged as outdated
    pub outdated: usize,
}

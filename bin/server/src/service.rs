use promptlab_core::{
    compare, diff_lines, reconcile, reconcile_all, reconstruct_template,
    template::summarize, types::validate_parameter_names, Comparison, EvalCase, ParameterMap,
    PromptLabResult, ReconcileOptions, ReconciliationReport, ReferencePrompt,
};
use tracing::debug;

use crate::{config::Settings, dto::DiffResponse};

/// Service layer that applies server-wide policy around the reconciliation core
pub struct ReconcileService {
    options: ReconcileOptions,
}

impl ReconcileService {
    /// Create a new ReconcileService
    pub fn new(settings: &Settings) -> Self {
        Self {
            options: settings.reconcile_options(),
        }
    }

    /// Recover the template a case was rendered from
    pub fn reconstruct(&self, rendered_text: &str, parameters: &ParameterMap) -> PromptLabResult<String> {
        validate_parameter_names(parameters)?;
        Ok(reconstruct_template(rendered_text, parameters))
    }

    /// Compare a reconstructed template against the reference
    pub fn compare(
        &self,
        reconstructed: &str,
        reference_template: &str,
        case_parameters: &ParameterMap,
        reference_parameters: &[String],
    ) -> PromptLabResult<Comparison> {
        validate_parameter_names(case_parameters)?;
        Ok(compare(
            reconstructed,
            reference_template,
            case_parameters,
            reference_parameters,
        ))
    }

    /// Whether the configured line cap allows diffing these texts
    pub fn can_diff(&self, old_text: &str, new_text: &str) -> bool {
        self.options.within_diff_limit(old_text, new_text)
    }

    pub fn max_diff_lines(&self) -> Option<usize> {
        self.options.max_diff_lines
    }

    /// Diff two templates. Callers check `can_diff` first.
    pub fn diff(&self, old_text: &str, new_text: &str) -> DiffResponse {
        let lines = diff_lines(old_text, new_text);
        let summary = summarize(&lines);
        debug!(?summary, "Computed template diff");
        DiffResponse { lines, summary }
    }

    /// Reconcile one case, with a diff when requested and within the line cap
    pub fn reconcile_case(
        &self,
        case: &EvalCase,
        reference: &ReferencePrompt,
        include_diff: bool,
    ) -> PromptLabResult<ReconciliationReport> {
        validate_parameter_names(&case.parameters)?;
        reference.validate()?;

        let options = self.options.clone().with_diff(include_diff);
        Ok(reconcile(case, reference, &options))
    }

    /// Reconcile many cases against one reference. Diffs are never computed here.
    pub fn reconcile_batch(
        &self,
        cases: &[EvalCase],
        reference: &ReferencePrompt,
    ) -> PromptLabResult<Vec<ReconciliationReport>> {
        for case in cases {
            validate_parameter_names(&case.parameters)?;
        }
        reference.validate()?;

        let options = self.options.clone().with_diff(false);
        Ok(reconcile_all(cases, reference, &options))
    }
}

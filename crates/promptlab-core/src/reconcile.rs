/*
Copyright 2024, Zep Software, Inc.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Case-versus-active-prompt reconciliation
//!
//! Runs reconstruction, comparison and (on request) diffing for a case
//! against the prompt lab's active prompt. Nothing is cached; every call
//! recomputes from its inputs.

use serde::{Deserialize, Serialize};

use crate::template::compare::is_metadata_key;
use crate::template::{compare, diff_lines, reconstruct_template, strip_metadata, Comparison, DiffLine};
use crate::types::{EvalCase, ParameterMap, ReferencePrompt};

/// Controls how much work a reconciliation does
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    /// Compute a line diff when the templates disagree
    pub include_diff: bool,
    /// Skip the diff when either template has more lines than this
    pub max_diff_lines: Option<usize>,
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diff(mut self, include_diff: bool) -> Self {
        self.include_diff = include_diff;
        self
    }

    pub fn with_max_diff_lines(mut self, max_diff_lines: Option<usize>) -> Self {
        self.max_diff_lines = max_diff_lines;
        self
    }

    /// Whether a diff between these two texts fits under the line cap
    pub fn within_diff_limit(&self, old_text: &str, new_text: &str) -> bool {
        match self.max_diff_lines {
            Some(max) => line_count(old_text) <= max && line_count(new_text) <= max,
            None => true,
        }
    }
}

fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Result of reconciling one case against the active prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    pub reconstructed_template: String,
    #[serde(flatten)]
    pub comparison: Comparison,
    /// Case parameter names, sorted, without metadata keys
    pub case_parameters: Vec<String>,
    /// Reference parameter names, sorted
    pub reference_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<Vec<DiffLine>>,
    /// The diff was requested but the templates exceeded the line cap
    #[serde(default)]
    pub diff_skipped: bool,
}

impl ReconciliationReport {
    /// The case was built from a prompt other than the active one
    pub fn is_outdated(&self) -> bool {
        !self.comparison.is_consistent()
    }

    /// Reference parameters the case has no value for
    pub fn missing_parameters(&self) -> Vec<&str> {
        self.reference_parameters
            .iter()
            .filter(|name| !self.case_parameters.contains(name))
            .map(String::as_str)
            .collect()
    }

    /// Case parameters the reference no longer uses
    pub fn extra_parameters(&self) -> Vec<&str> {
        self.case_parameters
            .iter()
            .filter(|name| !self.reference_parameters.contains(name))
            .map(String::as_str)
            .collect()
    }
}

/// Reconcile a single case against the reference prompt.
///
/// Metadata parameters are never rendered into a template, so they are held
/// back from reconstruction as well as from the parameter comparison.
pub fn reconcile(
    case: &EvalCase,
    reference: &ReferencePrompt,
    options: &ReconcileOptions,
) -> ReconciliationReport {
    let template_parameters: ParameterMap = case
        .parameters
        .iter()
        .filter(|(name, _)| !is_metadata_key(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    let reconstructed = reconstruct_template(&case.input, &template_parameters);
    let comparison = compare(
        &reconstructed,
        &reference.template,
        &case.parameters,
        &reference.parameters,
    );

    let wants_diff = options.include_diff && !comparison.templates_match;
    let fits = options.within_diff_limit(&reconstructed, &reference.template);
    let diff = (wants_diff && fits).then(|| diff_lines(&reconstructed, &reference.template));

    let mut reference_parameters = reference.parameters.clone();
    reference_parameters.sort();

    ReconciliationReport {
        case_id: case.id.clone(),
        case_parameters: strip_metadata(case.parameters.keys().map(String::as_str)),
        reference_parameters,
        reconstructed_template: reconstructed,
        comparison,
        diff,
        diff_skipped: wants_diff && !fits,
    }
}

/// Reconcile each case independently against the same reference
pub fn reconcile_all(
    cases: &[EvalCase],
    reference: &ReferencePrompt,
    options: &ReconcileOptions,
) -> Vec<ReconciliationReport> {
    cases
        .iter()
        .map(|case| reconcile(case, reference, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::DiffKind;
    use crate::types::{DraftPromotion, ParameterMap};
    use serde_json::json;

    fn support_case() -> EvalCase {
        let mut parameters = ParameterMap::new();
        parameters.insert("customer_name".to_string(), json!("Bob Wilson"));
        parameters.insert("issue_type".to_string(), json!("billing"));
        parameters.insert("emotion".to_string(), json!("frustrated"));
        EvalCase::new(
            "Customer Bob Wilson is asking about billing. They are frustrated.",
            parameters,
        )
        .with_id("case-1")
    }

    fn params() -> Vec<String> {
        vec![
            "customer_name".to_string(),
            "issue_type".to_string(),
            "emotion".to_string(),
        ]
    }

    #[test]
    fn test_matching_case() {
        let reference = ReferencePrompt::new(
            "Customer {{customer_name}} is asking about {{issue_type}}. They are {{emotion}}.",
            params(),
        );

        let report = reconcile(&support_case(), &reference, &ReconcileOptions::new().with_diff(true));

        assert_eq!(report.case_id.as_deref(), Some("case-1"));
        assert_eq!(report.reconstructed_template.trim(), reference.template.trim());
        assert!(report.comparison.templates_match);
        assert!(report.comparison.parameters_match);
        assert!(!report.is_outdated());
        assert!(report.diff.is_none());
        assert!(!report.diff_skipped);
    }

    #[test]
    fn test_outdated_case_with_diff() {
        let reference = ReferencePrompt::new(
            "Customer {{customer_name}} needs help with {{issue_type}}.",
            vec!["customer_name".to_string(), "issue_type".to_string()],
        );

        let report = reconcile(&support_case(), &reference, &ReconcileOptions::new().with_diff(true));

        assert!(report.is_outdated());
        assert!(!report.comparison.templates_match);
        assert!(!report.comparison.parameters_match);
        assert_eq!(report.extra_parameters(), vec!["emotion"]);
        assert!(report.missing_parameters().is_empty());

        let diff = report.diff.expect("diff requested");
        assert_eq!(diff.len(), 2);
        assert_eq!(diff[0].kind, DiffKind::Removed);
        assert_eq!(
            diff[0].content,
            "Customer {{customer_name}} is asking about {{issue_type}}. They are {{emotion}}."
        );
        assert_eq!(diff[1].kind, DiffKind::Added);
        assert_eq!(diff[1].content, reference.template);
    }

    #[test]
    fn test_diff_not_computed_unless_requested() {
        let reference = ReferencePrompt::new("Something else", params());
        let report = reconcile(&support_case(), &reference, &ReconcileOptions::new());
        assert!(report.is_outdated());
        assert!(report.diff.is_none());
        assert!(!report.diff_skipped);
    }

    #[test]
    fn test_diff_skipped_over_line_cap() {
        let reference = ReferencePrompt::new("one\ntwo\nthree", params());
        let options = ReconcileOptions::new()
            .with_diff(true)
            .with_max_diff_lines(Some(2));

        let report = reconcile(&support_case(), &reference, &options);
        assert!(report.diff.is_none());
        assert!(report.diff_skipped);
    }

    #[test]
    fn test_promoted_case_metadata_ignored() {
        let mut parameters = ParameterMap::new();
        parameters.insert("EMAIL".to_string(), json!("Refund please"));
        let promotion = DraftPromotion {
            draft_id: 5,
            selected_variation_index: Some(0),
            used_custom_output: true,
        };
        let case = EvalCase::promoted_from_draft("Reply to: Refund please", parameters, &promotion);
        let reference = ReferencePrompt::from_template("Reply to: {{EMAIL}}");

        let report = reconcile(&case, &reference, &ReconcileOptions::default());
        assert_eq!(report.case_parameters, vec!["EMAIL".to_string()]);
        assert!(!report.is_outdated());
    }

    #[test]
    fn test_metadata_values_not_substituted() {
        let mut parameters = ParameterMap::new();
        parameters.insert("AMOUNT".to_string(), json!("$250"));
        let promotion = DraftPromotion {
            draft_id: 1,
            selected_variation_index: Some(0),
            used_custom_output: false,
        };
        let case = EvalCase::promoted_from_draft("Refund $250 within 10 days", parameters, &promotion);
        let reference = ReferencePrompt::from_template("Refund {{AMOUNT}} within 10 days");

        let report = reconcile(&case, &reference, &ReconcileOptions::default());
        assert_eq!(report.reconstructed_template, "Refund {{AMOUNT}} within 10 days");
        assert!(!report.is_outdated());
    }

    #[test]
    fn test_reconcile_all_is_per_case() {
        let reference = ReferencePrompt::from_template("Hi {{name}}");
        let mut bob = ParameterMap::new();
        bob.insert("name".to_string(), json!("Bob"));
        let mut ann = ParameterMap::new();
        ann.insert("name".to_string(), json!("Ann"));

        let cases = vec![
            EvalCase::new("Hi Bob", bob),
            EvalCase::new("Hello Ann", ann),
        ];
        let reports = reconcile_all(&cases, &reference, &ReconcileOptions::default());

        assert_eq!(reports.len(), 2);
        assert!(!reports[0].is_outdated());
        assert!(reports[1].is_outdated());
        assert_eq!(reports[1].reconstructed_template, "Hello {{name}}");
    }

    #[test]
    fn test_report_serializes_flat_comparison() {
        let reference = ReferencePrompt::from_template("Hi {{name}}");
        let case = EvalCase::new("Hi {{name}}", ParameterMap::new());
        let report = reconcile(&case, &reference, &ReconcileOptions::default());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["templates_match"], json!(true));
        assert_eq!(value["parameters_match"], json!(false));
        assert!(value.get("diff").is_none());
    }
}

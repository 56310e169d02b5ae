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

//! # Prompt Lab Core
//!
//! Template reconciliation for prompt lab evaluation cases.
//!
//! An evaluation case stores the text a prompt template rendered to and the
//! parameter values that went into it. When the lab's active prompt changes,
//! this crate recovers the case's template from that text, checks it and the
//! case's parameters against the active prompt, and diffs the two templates
//! line by line so the drift can be reviewed.
//!
//! All operations are pure and synchronous; they may be called concurrently
//! without coordination.

pub mod errors;
pub mod reconcile;
pub mod template;
pub mod types;

// Re-export commonly used types
pub use errors::{PromptLabError, PromptLabResult};
pub use reconcile::{reconcile, reconcile_all, ReconcileOptions, ReconciliationReport};
pub use template::{
    compare, diff_lines, reconstruct_template, Comparison, DiffKind, DiffLine, DiffSummary,
    METADATA_KEYS,
};
pub use types::{DraftPromotion, EvalCase, ParameterMap, ReferencePrompt};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exports() {
        // The three core operations are reachable from the crate root
        let parameters = ParameterMap::new();
        let template = reconstruct_template("text", &parameters);
        let _comparison: Comparison = compare(&template, "text", &parameters, &[]);
        let _lines: Vec<DiffLine> = diff_lines(&template, "text");
        let _options = ReconcileOptions::default();
    }
}

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

//! Consistency checks between a case and the active prompt

use serde::{Deserialize, Serialize};

use crate::types::{ParameterMap, PROMOTED_FROM_DRAFT, SELECTED_VARIATION_INDEX, USED_CUSTOM_OUTPUT};

/// Bookkeeping keys stored with case parameters that never appear in templates
pub const METADATA_KEYS: [&str; 3] = [
    PROMOTED_FROM_DRAFT,
    SELECTED_VARIATION_INDEX,
    USED_CUSTOM_OUTPUT,
];

/// Outcome of comparing a case against a reference prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub templates_match: bool,
    pub parameters_match: bool,
}

impl Comparison {
    /// Both the template and the parameter set agree with the reference
    pub fn is_consistent(&self) -> bool {
        self.templates_match && self.parameters_match
    }
}

pub fn is_metadata_key(name: &str) -> bool {
    METADATA_KEYS.contains(&name)
}

/// Sorted parameter names with metadata keys removed
pub fn strip_metadata<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut names: Vec<String> = names
        .into_iter()
        .filter(|name| !is_metadata_key(name))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

/// Compare a reconstructed template and a case's parameters against the reference.
///
/// Templates are equal when they match exactly after trimming surrounding
/// whitespace. Parameter sets are compared as sorted name lists, with metadata
/// keys dropped from the case side only.
pub fn compare(
    reconstructed: &str,
    reference_template: &str,
    case_parameters: &ParameterMap,
    reference_parameters: &[String],
) -> Comparison {
    let templates_match = reconstructed.trim() == reference_template.trim();

    let case_params = strip_metadata(case_parameters.keys().map(String::as_str));
    let mut active_params: Vec<&str> = reference_parameters.iter().map(String::as_str).collect();
    active_params.sort_unstable();

    Comparison {
        templates_match,
        parameters_match: case_params == active_params,
    }
}

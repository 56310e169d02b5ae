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

//! Recover a template from rendered text and the parameters that produced it

use std::cmp::Reverse;

use super::{contains_placeholder, placeholder};
use crate::types::{parameter_value_to_string, ParameterMap};

/// Replace each parameter's rendered value in `rendered_text` with its placeholder.
///
/// Values are substituted longest first so that a value nested inside a longer
/// one (`"Bob"` inside `"Bob Wilson"`) cannot split the longer occurrence. Equal
/// lengths are ordered by parameter name. Values that are already the
/// parameter's own placeholder, that contain a placeholder, or that render to
/// the empty string are left alone.
///
/// This is a heuristic: a value that coincidentally matches literal template
/// text is replaced as well.
pub fn reconstruct_template(rendered_text: &str, parameters: &ParameterMap) -> String {
    let mut entries: Vec<(&str, String)> = parameters
        .iter()
        .map(|(key, value)| (key.as_str(), parameter_value_to_string(value)))
        .collect();
    entries.sort_by_key(|(key, value)| (Reverse(value.chars().count()), *key));

    let mut result = rendered_text.to_string();
    for (key, value) in entries {
        let token = placeholder(key);
        if value.is_empty() || value == token || contains_placeholder(&value) {
            continue;
        }
        result = result.replace(&value, &token);
    }
    result
}

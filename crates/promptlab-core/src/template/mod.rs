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

//! Template reconciliation
//!
//! Templates carry `{{name}}` placeholders. This module reverses rendering
//! (recovering a template from rendered text and its parameters), checks a
//! recovered template against the active one, and produces a line diff for
//! review when they disagree.

pub mod compare;
pub mod diff;
pub mod reconstruct;

use once_cell::sync::Lazy;
use regex::Regex;

pub use compare::{compare, strip_metadata, Comparison, METADATA_KEYS};
pub use diff::{diff_lines, render_diff, summarize, DiffKind, DiffLine, DiffSummary};
pub use reconstruct::reconstruct_template;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid regex"));

/// Placeholder token for a parameter name
pub fn placeholder(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// Whether `text` contains at least one `{{...}}` token
pub fn contains_placeholder(text: &str) -> bool {
    PLACEHOLDER_RE.is_match(text)
}

/// Distinct placeholder names in order of first appearance
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for captures in PLACEHOLDER_RE.captures_iter(template) {
        let name = &captures[1];
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        assert_eq!(placeholder("customer_name"), "{{customer_name}}");
    }

    #[test]
    fn test_contains_placeholder() {
        assert!(contains_placeholder("Value: {{x}}"));
        assert!(contains_placeholder("{{a}} and {{b}}"));
        assert!(!contains_placeholder("plain text"));
        assert!(!contains_placeholder("{{}}"));
        assert!(!contains_placeholder("{single}"));
        assert!(!contains_placeholder("{{unterminated"));
    }

    #[test]
    fn test_extract_placeholders() {
        assert_eq!(
            extract_placeholders("{{b}} then {{a}} then {{b}}"),
            vec!["b".to_string(), "a".to_string()]
        );
        assert!(extract_placeholders("no placeholders").is_empty());
    }
}

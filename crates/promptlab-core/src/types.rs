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

//! Case and reference prompt models shared by the reconciliation pipeline

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{PromptLabError, PromptLabResult};
use crate::template::{compare::is_metadata_key, extract_placeholders};

/// Parameter values recorded for a case, keyed by parameter name
pub type ParameterMap = HashMap<String, Value>;

/// Metadata key recording the draft a case was promoted from
pub const PROMOTED_FROM_DRAFT: &str = "promoted_from_draft";
/// Metadata key recording which output variation was chosen
pub const SELECTED_VARIATION_INDEX: &str = "selected_variation_index";
/// Metadata key recording whether the user supplied a custom output
pub const USED_CUSTOM_OUTPUT: &str = "used_custom_output";

/// Coerce a parameter value to the text it was rendered as.
///
/// Strings are used verbatim and `null` becomes the empty string. Numbers and
/// booleans use their JSON text; arrays and objects use compact JSON.
pub fn parameter_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Reject parameter maps containing empty or whitespace-only names
pub fn validate_parameter_names(parameters: &ParameterMap) -> PromptLabResult<()> {
    match parameters.keys().find(|name| name.trim().is_empty()) {
        Some(name) => Err(PromptLabError::InvalidParameterName { name: name.clone() }),
        None => Ok(()),
    }
}

/// An evaluation case: rendered input text plus the parameters used to render it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "rendered_text")]
    pub input: String,
    #[serde(default)]
    pub parameters: ParameterMap,
}

impl EvalCase {
    pub fn new(input: impl Into<String>, parameters: ParameterMap) -> Self {
        Self {
            id: None,
            input: input.into(),
            parameters,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Build a case from a rated draft, recording the promotion metadata
    /// alongside the template parameters.
    pub fn promoted_from_draft(
        input: impl Into<String>,
        mut parameters: ParameterMap,
        promotion: &DraftPromotion,
    ) -> Self {
        parameters.insert(PROMOTED_FROM_DRAFT.to_string(), Value::from(promotion.draft_id));
        if let Some(index) = promotion.selected_variation_index {
            parameters.insert(SELECTED_VARIATION_INDEX.to_string(), Value::from(index));
        }
        parameters.insert(
            USED_CUSTOM_OUTPUT.to_string(),
            Value::Bool(promotion.used_custom_output),
        );
        Self::new(input, parameters)
    }

    /// Parse a case as exported by the prompt lab and check its parameter names
    pub fn from_json(json: &str) -> PromptLabResult<Self> {
        let case: EvalCase = serde_json::from_str(json)?;
        validate_parameter_names(&case.parameters)?;
        Ok(case)
    }

    /// Whether this case was created by promoting a draft
    pub fn is_promoted(&self) -> bool {
        self.parameters.contains_key(PROMOTED_FROM_DRAFT)
    }
}

/// Bookkeeping captured when a draft response is promoted to an evaluation case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPromotion {
    pub draft_id: i64,
    pub selected_variation_index: Option<usize>,
    pub used_custom_output: bool,
}

/// The prompt lab's currently active prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePrompt {
    pub template: String,
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl ReferencePrompt {
    pub fn new(template: impl Into<String>, parameters: Vec<String>) -> Self {
        Self {
            template: template.into(),
            parameters,
        }
    }

    /// Build a reference whose parameter list is read off the template's placeholders
    pub fn from_template(template: impl Into<String>) -> Self {
        let template = template.into();
        let parameters = extract_placeholders(&template);
        Self { template, parameters }
    }

    /// Reference parameters must be named and must not include metadata keys
    pub fn validate(&self) -> PromptLabResult<()> {
        for name in &self.parameters {
            if name.trim().is_empty() {
                return Err(PromptLabError::InvalidParameterName { name: name.clone() });
            }
            if is_metadata_key(name) {
                return Err(PromptLabError::Validation {
                    message: format!("{name} is a metadata key and cannot be a reference parameter"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_value_coercion() {
        assert_eq!(parameter_value_to_string(&json!("Bob")), "Bob");
        assert_eq!(parameter_value_to_string(&json!(null)), "");
        assert_eq!(parameter_value_to_string(&json!(5)), "5");
        assert_eq!(parameter_value_to_string(&json!(2.5)), "2.5");
        assert_eq!(parameter_value_to_string(&json!(true)), "true");
        assert_eq!(parameter_value_to_string(&json!(["a", 1])), r#"["a",1]"#);
        assert_eq!(parameter_value_to_string(&json!({"k": "v"})), r#"{"k":"v"}"#);
    }

    #[test]
    fn test_validate_parameter_names() {
        let mut parameters = ParameterMap::new();
        parameters.insert("EMAIL".to_string(), json!("a"));
        assert!(validate_parameter_names(&parameters).is_ok());

        parameters.insert("  ".to_string(), json!("b"));
        assert!(matches!(
            validate_parameter_names(&parameters),
            Err(PromptLabError::InvalidParameterName { .. })
        ));
    }

    #[test]
    fn test_promoted_from_draft_records_metadata() {
        let mut parameters = ParameterMap::new();
        parameters.insert("EMAIL".to_string(), json!("hello"));
        let promotion = DraftPromotion {
            draft_id: 42,
            selected_variation_index: Some(1),
            used_custom_output: false,
        };

        let case = EvalCase::promoted_from_draft("hello", parameters, &promotion);

        assert!(case.is_promoted());
        assert_eq!(case.parameters[PROMOTED_FROM_DRAFT], json!(42));
        assert_eq!(case.parameters[SELECTED_VARIATION_INDEX], json!(1));
        assert_eq!(case.parameters[USED_CUSTOM_OUTPUT], json!(false));
        assert_eq!(case.parameters["EMAIL"], json!("hello"));
    }

    #[test]
    fn test_case_from_json() {
        let case = EvalCase::from_json(
            r#"{"id": "c1", "rendered_text": "Hi Bob", "parameters": {"name": "Bob"}}"#,
        )
        .unwrap();
        assert_eq!(case.id.as_deref(), Some("c1"));
        assert_eq!(case.input, "Hi Bob");
        assert_eq!(case.parameters["name"], json!("Bob"));
        assert!(!case.is_promoted());

        assert!(matches!(
            EvalCase::from_json("not json"),
            Err(PromptLabError::Serialization(_))
        ));
        assert!(matches!(
            EvalCase::from_json(r#"{"input": "x", "parameters": {"": 1}}"#),
            Err(PromptLabError::InvalidParameterName { .. })
        ));
    }

    #[test]
    fn test_reference_from_template() {
        let reference = ReferencePrompt::from_template("Dear {{name}}, re: {{topic}}. Bye {{name}}");
        assert_eq!(reference.parameters, vec!["name", "topic"]);
        assert!(reference.validate().is_ok());
    }

    #[test]
    fn test_reference_rejects_metadata_parameters() {
        let reference = ReferencePrompt::new("x", vec![PROMOTED_FROM_DRAFT.to_string()]);
        assert!(matches!(
            reference.validate(),
            Err(PromptLabError::Validation { .. })
        ));
    }
}

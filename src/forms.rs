//! Form documents handed to the rendering layer: blank, pre-filled, or bound with errors.

use crate::config::FieldSpec;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Field name -> human-readable messages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FormView {
    /// Path the form posts to.
    pub action: String,
    pub fields: Vec<FieldView>,
    /// Surrounding record the form belongs to (e.g. the book a comment is for).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl FormView {
    pub fn blank(action: impl Into<String>, fields: &[FieldSpec]) -> Self {
        Self::bound(action, fields, &HashMap::new(), &FieldErrors::new())
    }

    /// Pre-filled with the current values of a record being edited.
    pub fn initial(action: impl Into<String>, fields: &[FieldSpec], values: &HashMap<String, String>) -> Self {
        Self::bound(action, fields, values, &FieldErrors::new())
    }

    /// Submitted values echoed back with their errors. Values for unknown fields are dropped.
    pub fn bound(
        action: impl Into<String>,
        fields: &[FieldSpec],
        values: &HashMap<String, String>,
        errors: &FieldErrors,
    ) -> Self {
        let fields = fields
            .iter()
            .map(|f| FieldView {
                name: f.name,
                label: f.label,
                kind: f.kind.as_str(),
                required: f.required,
                max_length: f.max_length,
                value: values.get(f.name).cloned().unwrap_or_default(),
                errors: errors.get(f.name).to_vec(),
            })
            .collect();
        FormView {
            action: action.into(),
            fields,
            context: None,
        }
    }

    pub fn with_context<T: Serialize>(mut self, context: &T) -> Self {
        self.context = serde_json::to_value(context).ok();
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| !f.errors.is_empty())
    }
}

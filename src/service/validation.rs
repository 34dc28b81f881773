//! Form validation driven by the static field tables.

use crate::config::{FieldKind, FieldSpec, AUTHOR_FIELDS, BOOK_FIELDS, COMMENT_FIELDS, PUBLISHER_FIELDS};
use crate::forms::FieldErrors;
use crate::models::{NewAuthor, NewPublisher};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_DATE: &str = "Enter a valid date.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").unwrap_or_else(|e| panic!("email pattern: {}", e))
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Id(i64),
    Date(NaiveDate),
}

/// Typed values of the fields that passed validation. Optional fields left blank are absent.
#[derive(Clone, Debug, Default)]
pub struct CleanedData {
    values: HashMap<&'static str, FieldValue>,
}

impl CleanedData {
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        match self.values.remove(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn take_id(&mut self, name: &str) -> Option<i64> {
        match self.values.remove(name) {
            Some(FieldValue::Id(n)) => Some(n),
            _ => None,
        }
    }

    pub fn take_date(&mut self, name: &str) -> Option<NaiveDate> {
        match self.values.remove(name) {
            Some(FieldValue::Date(d)) => Some(d),
            _ => None,
        }
    }
}

/// Book fields before foreign keys are checked and the photo path is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author_id: i64,
    pub publisher_id: i64,
    pub publication_date: NaiveDate,
    /// Raw submitted photo reference, if any.
    pub post_photo: Option<String>,
}

pub struct FormValidator;

impl FormValidator {
    /// Validate raw form values against a field table. Keys not in the table are ignored.
    pub fn validate(raw: &HashMap<String, String>, fields: &[FieldSpec]) -> Result<CleanedData, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut cleaned = CleanedData::default();
        for spec in fields {
            let value = raw.get(spec.name).map(|v| v.trim()).unwrap_or("");
            if value.is_empty() {
                if spec.required {
                    errors.add(spec.name, REQUIRED);
                }
                continue;
            }
            match validate_field(spec, value) {
                Ok(v) => {
                    cleaned.values.insert(spec.name, v);
                }
                Err(msg) => errors.add(spec.name, msg),
            }
        }
        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }

    pub fn book(raw: &HashMap<String, String>) -> Result<BookFields, FieldErrors> {
        let mut c = Self::validate(raw, BOOK_FIELDS)?;
        Ok(BookFields {
            title: required(c.take_text("title"), "title")?,
            author_id: required(c.take_id("author"), "author")?,
            publisher_id: required(c.take_id("publisher"), "publisher")?,
            publication_date: required(c.take_date("publication_date"), "publication_date")?,
            post_photo: c.take_text("post_photo"),
        })
    }

    /// Comment text. The author is never taken from the form.
    pub fn comment(raw: &HashMap<String, String>) -> Result<String, FieldErrors> {
        let mut c = Self::validate(raw, COMMENT_FIELDS)?;
        required(c.take_text("text"), "text")
    }

    pub fn author(raw: &HashMap<String, String>) -> Result<NewAuthor, FieldErrors> {
        let mut c = Self::validate(raw, AUTHOR_FIELDS)?;
        Ok(NewAuthor {
            name: required(c.take_text("name"), "name")?,
            email: required(c.take_text("email"), "email")?,
        })
    }

    pub fn publisher(raw: &HashMap<String, String>) -> Result<NewPublisher, FieldErrors> {
        let mut c = Self::validate(raw, PUBLISHER_FIELDS)?;
        Ok(NewPublisher {
            name: required(c.take_text("name"), "name")?,
            address: required(c.take_text("address"), "address")?,
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, FieldErrors> {
    value.ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.add(field, REQUIRED);
        errors
    })
}

fn validate_field(spec: &FieldSpec, value: &str) -> Result<FieldValue, String> {
    if let Some(max) = spec.max_length {
        let len = value.chars().count();
        if len > max {
            return Err(format!(
                "Ensure this value has at most {} characters (it has {}).",
                max, len
            ));
        }
    }
    match spec.kind {
        FieldKind::Text | FieldKind::TextArea | FieldKind::Photo => Ok(FieldValue::Text(value.to_string())),
        FieldKind::Email => {
            if email_regex().is_match(value) {
                Ok(FieldValue::Text(value.to_string()))
            } else {
                Err(INVALID_EMAIL.to_string())
            }
        }
        FieldKind::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(FieldValue::Date)
            .map_err(|_| INVALID_DATE.to_string()),
        FieldKind::Reference(_) => value
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .map(FieldValue::Id)
            .ok_or_else(|| INVALID_CHOICE.to_string()),
    }
}

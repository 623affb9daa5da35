//! Field-level validation errors and cross-field rules.
//!
//! Field constraints (lengths, email format, non-negative cost) live on the
//! DTOs as `validator` derive attributes. This module owns the error shape
//! the API reports: a map from field name to messages, so clients can
//! highlight exactly the inputs that need correcting. Cross-field rules the
//! derive cannot express (project date ordering) are implemented here and
//! attach their error to a specific field.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::types::Day;

/// Exact error text for a project whose start date falls after its finish
/// date. Kept verbatim for client compatibility.
pub const DATE_ORDER_MESSAGE: &str = "Started_at can't be bigger then finished_at";

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fold another error set into this one, keeping both sides' messages.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Re-key every field under `prefix` (e.g. `phones[0].phone`), used to
    /// report sub-form errors in the aggregate workflow.
    pub fn prefixed(self, prefix: &str) -> FieldErrors {
        FieldErrors(
            self.0
                .into_iter()
                .map(|(field, messages)| (format!("{prefix}.{field}"), messages))
                .collect(),
        )
    }

    /// First message for a field, if any. Test helper mostly.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field)?.first().map(String::as_str)
    }
}

impl From<ValidationErrors> for FieldErrors {
    /// Flatten `validator` derive output into field -> message lists.
    ///
    /// Goes through the serialized form, which is stable across validator
    /// releases: a map from field name to a list of `{code, message}`.
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        if let Ok(Value::Object(map)) = serde_json::to_value(&errors) {
            for (field, entry) in map {
                if let Value::Array(list) = entry {
                    for item in list {
                        let message = item
                            .get("message")
                            .and_then(Value::as_str)
                            .or_else(|| item.get("code").and_then(Value::as_str))
                            .unwrap_or("invalid value");
                        out.add(&field, message);
                    }
                }
            }
        }
        out
    }
}

/// Run a DTO's derive-level validation, flattening failures to [`FieldErrors`].
pub fn check<T: Validate>(input: &T) -> Result<(), FieldErrors> {
    input.validate().map_err(FieldErrors::from)
}

/// Reject a project whose `started_at` is later than its `finished_at`.
///
/// The error is reported against the `started_at` field, not as a generic
/// form error. A missing `finished_at` always passes.
pub fn validate_project_dates(started_at: Day, finished_at: Option<Day>) -> Result<(), FieldErrors> {
    if let Some(finished) = finished_at {
        if started_at > finished {
            let mut errors = FieldErrors::new();
            errors.add("started_at", DATE_ORDER_MESSAGE);
            return Err(errors);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> Day {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn start_after_finish_is_rejected_on_started_at() {
        let errors = validate_project_dates(day(2023, 6, 21), Some(day(2021, 6, 21))).unwrap_err();
        assert_eq!(
            errors.first("started_at"),
            Some(DATE_ORDER_MESSAGE),
            "message must match verbatim and sit on started_at"
        );
    }

    #[test]
    fn equal_dates_pass() {
        assert!(validate_project_dates(day(2022, 1, 1), Some(day(2022, 1, 1))).is_ok());
    }

    #[test]
    fn open_ended_project_passes() {
        assert!(validate_project_dates(day(2022, 1, 1), None).is_ok());
    }

    #[test]
    fn merge_unions_fields() {
        let mut a = FieldErrors::new();
        a.add("name", "too long");

        let b = validate_project_dates(day(2023, 1, 2), Some(day(2023, 1, 1))).unwrap_err();
        a.merge(b);

        assert!(a.first("name").is_some());
        assert!(a.first("started_at").is_some());
    }

    #[test]
    fn prefixed_rekeys_fields() {
        let mut errors = FieldErrors::new();
        errors.add("phone", "required");
        let prefixed = errors.prefixed("phones[1]");
        assert_eq!(prefixed.first("phones[1].phone"), Some("required"));
    }

    #[test]
    fn derive_errors_flatten_to_messages() {
        #[derive(Validate)]
        struct Probe {
            #[validate(length(max = 3, message = "too long"))]
            name: String,
        }

        let probe = Probe {
            name: "abcdef".to_string(),
        };
        let errors = check(&probe).unwrap_err();
        assert_eq!(errors.first("name"), Some("too long"));
    }
}

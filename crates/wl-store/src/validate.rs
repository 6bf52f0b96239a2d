//! Dataset validation: the input contract every store snapshot satisfies.

use std::collections::HashSet;

use crate::schema::Dataset;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Empty label on meter {id}")]
    EmptyLabel { id: String },

    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid reading: {label} {month} = {value} ({reason})")]
    InvalidReading {
        label: String,
        month: String,
        value: f64,
        reason: String,
    },
}

pub fn validate_dataset(dataset: &Dataset) -> Result<(), ValidationError> {
    let mut months = HashSet::new();
    for month in &dataset.months {
        if !months.insert(month.trim()) {
            return Err(ValidationError::DuplicateId {
                id: month.clone(),
                context: "months".to_string(),
            });
        }
    }

    let mut ids = HashSet::new();
    let mut labels = HashSet::new();
    for record in &dataset.records {
        let label = record.label.trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel {
                id: record.id.clone(),
            });
        }
        if !labels.insert(label) {
            return Err(ValidationError::DuplicateId {
                id: label.to_string(),
                context: "meter labels".to_string(),
            });
        }
        if !ids.insert(record.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: record.id.clone(),
                context: "meter ids".to_string(),
            });
        }

        let mut record_months = HashSet::new();
        for (month, &value) in &record.monthly_consumption {
            // Keys are trimmed on load; two that trim alike would overwrite each other.
            if !record_months.insert(month.trim()) {
                return Err(ValidationError::DuplicateId {
                    id: month.trim().to_string(),
                    context: format!("{label} months"),
                });
            }
            if !value.is_finite() {
                return Err(ValidationError::InvalidReading {
                    label: label.to_string(),
                    month: month.clone(),
                    value,
                    reason: "must be finite".to_string(),
                });
            }
            if value < 0.0 {
                return Err(ValidationError::InvalidReading {
                    label: label.to_string(),
                    month: month.clone(),
                    value,
                    reason: "must be non-negative".to_string(),
                });
            }
        }
    }

    Ok(())
}

//! Hierarchy-specific error types.

use wl_core::WlError;

pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// Hierarchy construction errors. Both are input-contract violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// Two records share a label, so parent links would be ambiguous.
    DuplicateLabel { label: String },

    /// Parent links loop back on themselves. Labels are listed in chain order.
    Cycle { labels: Vec<String> },
}

impl std::fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HierarchyError::DuplicateLabel { label } => {
                write!(f, "Label '{}' is used by more than one meter", label)
            }
            HierarchyError::Cycle { labels } => {
                write!(f, "Parent links form a cycle: {}", labels.join(" -> "))
            }
        }
    }
}

impl std::error::Error for HierarchyError {}

impl From<HierarchyError> for WlError {
    fn from(err: HierarchyError) -> Self {
        WlError::Invariant {
            what: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_chain() {
        let err = HierarchyError::Cycle {
            labels: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "Parent links form a cycle: A -> B -> A");
    }

    #[test]
    fn converts_into_core_error() {
        let err: WlError = HierarchyError::DuplicateLabel { label: "X".into() }.into();
        assert!(matches!(err, WlError::Invariant { .. }));
    }
}

use thiserror::Error;

use crate::{data_type::ConstructorTag, runtime_value::ValueKind};

/// A broken internal-consistency guarantee.
///
/// Code generated against this runtime never triggers any of these. Checked operations hand them
/// back so callers can inspect them, unchecked operations [`raise`](InvariantViolation::raise)
/// them right away.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("expected a value of kind {expected}, found {found}")]
    KindMismatch { expected: ValueKind, found: ValueKind },
    #[error("data type {data_type} has no constructor {tag}")]
    UnknownTag {
        data_type: &'static str,
        tag: ConstructorTag,
    },
    #[error("expected a constructor of {expected}, found one of {found}")]
    DataTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("constructor {constructor} takes {expected} field(s), got {found}")]
    ArityMismatch {
        constructor: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("expected a dictionary of {expected}, found one of {found}")]
    ClassMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("class {class} has no operation {operation:?}")]
    UnknownOperation { class: &'static str, operation: String },
    #[error("operation {operation} of {class} is supplied more than once")]
    DuplicateOperation {
        class: &'static str,
        operation: &'static str,
    },
    #[error("instance {instance} of {class} does not supply operation {operation}")]
    MissingOperation {
        class: &'static str,
        instance: String,
        operation: &'static str,
    },
    #[error("operation {operation} of {class} takes {expected} argument(s), implementation takes {found}")]
    OperationArityMismatch {
        class: &'static str,
        operation: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("function takes {expected} argument(s), applied to {found}")]
    ArgumentCountMismatch { expected: usize, found: usize },
    #[error("class {class} has no superclass {superclass}")]
    SuperclassMismatch {
        class: &'static str,
        superclass: &'static str,
    },
    #[error("superclass {superclass} of {class} is supplied more than once")]
    DuplicateSuperclass {
        class: &'static str,
        superclass: &'static str,
    },
    #[error("instance {instance} of {class} is missing its {superclass} superclass dictionary")]
    MissingSuperclass {
        class: &'static str,
        instance: String,
        superclass: &'static str,
    },
}

impl InvariantViolation {
    /// Aborts the current thread.
    ///
    /// Invariant violations are bugs in the runtime or in the code generated against it, so they
    /// must never be handled and silently continued from.
    #[track_caller]
    pub fn raise(self) -> ! {
        log::error!("invariant violation: {self}");
        panic!("invariant violation: {self}")
    }
}

use std::{cmp::Ordering, fmt, sync::Arc};

use crate::error::InvariantViolation;

use super::{RuntimeString, RuntimeValue, ValueKind};

#[derive(Clone, Debug, Default, Eq)]
pub(super) enum StringImpl {
    #[default]
    Empty,
    NonEmpty(Arc<str>),
}

impl StringImpl {
    pub fn as_str(&self) -> &str {
        match self {
            StringImpl::Empty => "",
            StringImpl::NonEmpty(string) => string,
        }
    }
}

impl std::hash::Hash for StringImpl {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialEq for StringImpl {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for StringImpl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StringImpl {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl RuntimeString {
    pub fn new(string: &str) -> Self {
        if string.is_empty() {
            Self::default()
        } else {
            Self {
                string: StringImpl::NonEmpty(string.into()),
            }
        }
    }

    pub fn as_str(&self) -> &str {
        self.string.as_str()
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.string, StringImpl::Empty)
    }

    /// Returns a new string with `other` appended, leaving both operands untouched.
    ///
    /// Appending to or from an empty string shares the other operand instead of copying it.
    pub fn concat(&self, other: &Self) -> Self {
        match (&self.string, &other.string) {
            (StringImpl::Empty, _) => other.clone(),
            (_, StringImpl::Empty) => self.clone(),
            (StringImpl::NonEmpty(lhs), StringImpl::NonEmpty(rhs)) => {
                let mut string = String::with_capacity(lhs.len() + rhs.len());
                string.push_str(lhs);
                string.push_str(rhs);
                Self::from(string)
            }
        }
    }

    pub(super) fn same_instance(&self, other: &Self) -> bool {
        match (&self.string, &other.string) {
            (StringImpl::Empty, StringImpl::Empty) => true,
            (StringImpl::NonEmpty(lhs), StringImpl::NonEmpty(rhs)) => Arc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

impl fmt::Display for RuntimeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RuntimeString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RuntimeString {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Self::default()
        } else {
            Self {
                string: StringImpl::NonEmpty(value.into()),
            }
        }
    }
}

impl From<RuntimeString> for RuntimeValue {
    fn from(value: RuntimeString) -> Self {
        Self::String(value)
    }
}

impl From<&str> for RuntimeValue {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for RuntimeValue {
    fn from(value: String) -> Self {
        Self::String(value.into())
    }
}

impl TryFrom<RuntimeValue> for RuntimeString {
    type Error = RuntimeValue;

    fn try_from(value: RuntimeValue) -> Result<Self, Self::Error> {
        match value {
            RuntimeValue::String(value) => Ok(value),
            _ => Err(value),
        }
    }
}

impl<'a> TryFrom<&'a RuntimeValue> for &'a str {
    type Error = &'a RuntimeValue;

    fn try_from(value: &'a RuntimeValue) -> Result<Self, Self::Error> {
        match value {
            RuntimeValue::String(value) => Ok(value.as_str()),
            _ => Err(value),
        }
    }
}

/// Wraps literal text into a value.
pub fn make_text(literal: &str) -> RuntimeValue {
    RuntimeValue::String(literal.into())
}

/// Concatenates two text values into a new one.
///
/// Panics with an invariant violation if either operand is not text.
pub fn concat(lhs: &RuntimeValue, rhs: &RuntimeValue) -> RuntimeValue {
    match (lhs, rhs) {
        (RuntimeValue::String(lhs), RuntimeValue::String(rhs)) => lhs.concat(rhs).into(),
        (RuntimeValue::String(_), other) | (other, _) => InvariantViolation::KindMismatch {
            expected: ValueKind::String,
            found: other.kind(),
        }
        .raise(),
    }
}

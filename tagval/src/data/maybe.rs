//! The optional-value type.
//!
//! [`MAYBE`] declares the runtime encoding used by generated code, [`Maybe`] mirrors it as a
//! closed Rust enum so that consumers can match on it exhaustively.

use crate::{
    data_type::{ConstructorDecl, ConstructorTag, DataType},
    error::InvariantViolation,
    runtime_value::RuntimeValue,
};

pub static MAYBE: DataType = DataType::new(
    "Maybe",
    &[ConstructorDecl::new("Nothing", 0), ConstructorDecl::new("Just", 1)],
);

pub const NOTHING: ConstructorTag = ConstructorTag::new(0);
pub const JUST: ConstructorTag = ConstructorTag::new(1);

/// The empty variant.
///
/// Never allocates, so every call returns the same instance.
pub fn nothing() -> RuntimeValue {
    MAYBE.nullary(NOTHING)
}

pub fn just(value: RuntimeValue) -> RuntimeValue {
    MAYBE
        .construct(JUST, vec![value])
        .unwrap_or_else(|violation| violation.raise())
}

/// Decodes a runtime value into a [`Maybe`] borrowing its payload.
pub fn decode(value: &RuntimeValue) -> Result<Maybe<&RuntimeValue>, InvariantViolation> {
    let constructor = value.try_constructor()?;
    let data_type = constructor.data_type();
    if !data_type.is(&MAYBE) {
        return Err(InvariantViolation::DataTypeMismatch {
            expected: MAYBE.name(),
            found: data_type.name(),
        });
    }

    match (constructor.tag(), constructor.fields()) {
        (NOTHING, []) => Ok(Maybe::Nothing),
        (JUST, [payload]) => Ok(Maybe::Just(payload)),
        (tag, _) => Err(InvariantViolation::UnknownTag {
            data_type: MAYBE.name(),
            tag,
        }),
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Maybe<T> {
    Nothing,
    Just(T),
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Self::Nothing
    }
}

impl<T> Maybe<T> {
    pub fn is_just(&self) -> bool {
        matches!(self, Self::Just(_))
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    pub fn as_ref(&self) -> Maybe<&T> {
        match self {
            Self::Nothing => Maybe::Nothing,
            Self::Just(value) => Maybe::Just(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Maybe<U> {
        match self {
            Self::Nothing => Maybe::Nothing,
            Self::Just(value) => Maybe::Just(f(value)),
        }
    }

    /// Returns the payload, or `default` for [`Maybe::Nothing`].
    pub fn from_maybe(self, default: T) -> T {
        match self {
            Self::Nothing => default,
            Self::Just(value) => value,
        }
    }

    /// Maps the payload with `f`, or returns `default` for [`Maybe::Nothing`].
    pub fn maybe<U>(self, default: U, f: impl FnOnce(T) -> U) -> U {
        match self {
            Self::Nothing => default,
            Self::Just(value) => f(value),
        }
    }
}

impl<T: Clone> Maybe<&T> {
    pub fn cloned(self) -> Maybe<T> {
        self.map(T::clone)
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            None => Self::Nothing,
            Some(value) => Self::Just(value),
        }
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(value: Maybe<T>) -> Self {
        match value {
            Maybe::Nothing => None,
            Maybe::Just(value) => Some(value),
        }
    }
}

impl<T: Into<RuntimeValue>> From<Maybe<T>> for RuntimeValue {
    fn from(value: Maybe<T>) -> Self {
        match value {
            Maybe::Nothing => nothing(),
            Maybe::Just(value) => just(value.into()),
        }
    }
}

impl<'a> TryFrom<&'a RuntimeValue> for Maybe<&'a RuntimeValue> {
    type Error = InvariantViolation;

    fn try_from(value: &'a RuntimeValue) -> Result<Self, Self::Error> {
        decode(value)
    }
}

impl TryFrom<RuntimeValue> for Maybe<RuntimeValue> {
    type Error = InvariantViolation;

    fn try_from(value: RuntimeValue) -> Result<Self, Self::Error> {
        decode(&value).map(Maybe::cloned)
    }
}

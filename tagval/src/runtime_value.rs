mod constructor;
mod function;
mod primitives;
mod string;

use std::fmt;

use derive_more::Display;
use ordered_float::OrderedFloat;

use crate::{data_type::ConstructorTag, error::InvariantViolation};

pub use self::{
    function::app,
    string::{concat, make_text},
};

/// A type that can store any runtime value.
///
/// Values are immutable once constructed. Everything that lives on the heap is reference counted,
/// so cloning a value shares it rather than copying it.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub enum RuntimeValue {
    #[default]
    Unit,
    Boolean(bool),
    Integer(i64),
    Number(OrderedFloat<f64>),
    Char(char),
    String(RuntimeString),
    Constructor(RuntimeConstructor),
    Function(RuntimeFunction),
}

impl RuntimeValue {
    /// Returns the discriminant of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Unit => ValueKind::Unit,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::Number(_) => ValueKind::Number,
            Self::Char(_) => ValueKind::Char,
            Self::String(_) => ValueKind::String,
            Self::Constructor(_) => ValueKind::Constructor,
            Self::Function(_) => ValueKind::Function,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Returns whether both values are not only equal, but the very same instance.
    ///
    /// Immediate values have no identity of their own, so they fall back to equality. Nullary
    /// constructors are never allocated and are therefore always the same instance as any other
    /// occurrence of the same constructor.
    pub fn same_instance(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(lhs), Self::String(rhs)) => lhs.same_instance(rhs),
            (Self::Constructor(lhs), Self::Constructor(rhs)) => lhs.same_instance(rhs),
            (Self::Function(lhs), Self::Function(rhs)) => lhs == rhs,
            (lhs, rhs) => lhs == rhs,
        }
    }

    /// Splits a constructor application into its tag and fields.
    ///
    /// Panics with an invariant violation if this value is not a constructor.
    pub fn inspect_constructor(&self) -> (ConstructorTag, &[RuntimeValue]) {
        let constructor = self.expect_constructor();
        (constructor.tag(), constructor.fields())
    }

    fn kind_mismatch(&self, expected: ValueKind) -> InvariantViolation {
        InvariantViolation::KindMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("unit"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Char(value) => write!(f, "{value:?}"),
            Self::String(value) => write!(f, "{:?}", value.as_str()),
            Self::Constructor(value) => write!(f, "{value}"),
            Self::Function(value) => write!(f, "<function/{}>", value.arity()),
        }
    }
}

#[derive(Clone, Copy, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValueKind {
    Unit,
    Boolean,
    Integer,
    Number,
    Char,
    String,
    Constructor,
    Function,
}

/// An immutable piece of text.
///
/// The empty string does not allocate.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RuntimeString {
    string: string::StringImpl,
}

/// A constructor of a [`DataType`](crate::data_type::DataType) applied to its fields.
#[derive(Clone)]
pub struct RuntimeConstructor {
    constructor: constructor::Impl,
}

/// A function value that can be applied to a fixed number of arguments.
///
/// Compared and hashed by identity.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct RuntimeFunction {
    arity: usize,
    function: function::DynFn,
}

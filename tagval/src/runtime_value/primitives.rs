use ordered_float::OrderedFloat;
use paste::paste;

use crate::error::InvariantViolation;

use super::{RuntimeConstructor, RuntimeFunction, RuntimeString, RuntimeValue, ValueKind};

macro_rules! impl_copy_accessors {
    ( $( $Kind:ident: $ty:ty, )* ) => { paste! { $(
        impl From<$ty> for RuntimeValue {
            fn from(value: $ty) -> Self {
                Self::$Kind(value)
            }
        }

        impl RuntimeValue {
            pub fn [<as_ $Kind:snake>](&self) -> Option<$ty> {
                match self {
                    Self::$Kind(value) => Some(*value),
                    _ => None,
                }
            }

            pub fn [<try_ $Kind:snake>](&self) -> Result<$ty, InvariantViolation> {
                self.[<as_ $Kind:snake>]()
                    .ok_or_else(|| self.kind_mismatch(ValueKind::$Kind))
            }

            /// Panics with an invariant violation if this value is of a different kind.
            pub fn [<expect_ $Kind:snake>](&self) -> $ty {
                self.[<try_ $Kind:snake>]()
                    .unwrap_or_else(|violation| violation.raise())
            }
        }
    )* } };
}

impl_copy_accessors! {
    Boolean: bool,
    Integer: i64,
    Char: char,
}

macro_rules! impl_ref_accessors {
    ( $( $Kind:ident: $ty:ty, )* ) => { paste! { $(
        impl RuntimeValue {
            pub fn [<as_ $Kind:snake>](&self) -> Option<&$ty> {
                match self {
                    Self::$Kind(value) => Some(value),
                    _ => None,
                }
            }

            pub fn [<try_ $Kind:snake>](&self) -> Result<&$ty, InvariantViolation> {
                self.[<as_ $Kind:snake>]()
                    .ok_or_else(|| self.kind_mismatch(ValueKind::$Kind))
            }

            /// Panics with an invariant violation if this value is of a different kind.
            pub fn [<expect_ $Kind:snake>](&self) -> &$ty {
                self.[<try_ $Kind:snake>]()
                    .unwrap_or_else(|violation| violation.raise())
            }
        }
    )* } };
}

impl_ref_accessors! {
    String: RuntimeString,
    Constructor: RuntimeConstructor,
    Function: RuntimeFunction,
}

impl From<()> for RuntimeValue {
    fn from((): ()) -> Self {
        Self::Unit
    }
}

impl From<f64> for RuntimeValue {
    fn from(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }
}

impl RuntimeValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(value.into_inner()),
            _ => None,
        }
    }

    pub fn try_number(&self) -> Result<f64, InvariantViolation> {
        self.as_number()
            .ok_or_else(|| self.kind_mismatch(ValueKind::Number))
    }

    /// Panics with an invariant violation if this value is not a number.
    pub fn expect_number(&self) -> f64 {
        self.try_number()
            .unwrap_or_else(|violation| violation.raise())
    }
}

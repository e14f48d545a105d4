use std::{fmt, slice, sync::Arc};

use crate::error::InvariantViolation;

use super::{RuntimeFunction, RuntimeValue};

pub(super) type DynFunction = Arc<dyn Fn(&[RuntimeValue]) -> RuntimeValue + Send + Sync>;

#[derive(Clone)]
pub(super) struct DynFn(pub(super) DynFunction);

impl fmt::Debug for DynFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", self.0)
    }
}

impl std::hash::Hash for DynFn {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // strip metadata to match PartialEq
        (Arc::as_ptr(&self.0) as *const ()).hash(state);
    }
}

impl PartialEq for DynFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for DynFn {}

impl RuntimeFunction {
    /// Wraps a closure taking exactly `arity` arguments.
    ///
    /// The closure is only ever called with a slice of length `arity`.
    pub fn new(
        arity: usize,
        function: impl Fn(&[RuntimeValue]) -> RuntimeValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            arity,
            function: DynFn(Arc::new(function)),
        }
    }

    pub fn unary(function: impl Fn(&RuntimeValue) -> RuntimeValue + Send + Sync + 'static) -> Self {
        Self::new(1, move |arguments| function(&arguments[0]))
    }

    pub fn binary(
        function: impl Fn(&RuntimeValue, &RuntimeValue) -> RuntimeValue + Send + Sync + 'static,
    ) -> Self {
        Self::new(2, move |arguments| function(&arguments[0], &arguments[1]))
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Applies the function to exactly [`Self::arity`] arguments.
    pub fn apply(&self, arguments: &[RuntimeValue]) -> Result<RuntimeValue, InvariantViolation> {
        if arguments.len() != self.arity {
            return Err(InvariantViolation::ArgumentCountMismatch {
                expected: self.arity,
                found: arguments.len(),
            });
        }
        Ok((self.function.0)(arguments))
    }

    /// Like [`Self::apply`], but panics with an invariant violation instead of returning it.
    pub fn call(&self, arguments: &[RuntimeValue]) -> RuntimeValue {
        self.apply(arguments)
            .unwrap_or_else(|violation| violation.raise())
    }
}

impl From<RuntimeFunction> for RuntimeValue {
    fn from(value: RuntimeFunction) -> Self {
        Self::Function(value)
    }
}

/// Applies a function value to a single argument.
///
/// Panics with an invariant violation if `function` is not a unary function.
pub fn app(function: &RuntimeValue, argument: &RuntimeValue) -> RuntimeValue {
    function
        .expect_function()
        .call(slice::from_ref(argument))
}

use std::{fmt, ptr};

use derive_more::{Display, From, Into};

use crate::{
    error::InvariantViolation,
    runtime_value::{RuntimeConstructor, RuntimeValue},
};

/// Identifies a constructor by its index in the declaration list of its [`DataType`].
#[derive(Clone, Copy, Debug, Display, From, Into, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[display(fmt = "#{}", _0)]
pub struct ConstructorTag(usize);

impl ConstructorTag {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// The name and number of fields of a single constructor.
#[derive(Debug, PartialEq, Eq)]
pub struct ConstructorDecl {
    name: &'static str,
    arity: usize,
}

impl ConstructorDecl {
    pub const fn new(name: &'static str, arity: usize) -> Self {
        Self { name, arity }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn arity(&self) -> usize {
        self.arity
    }
}

/// A closed sum type with a fixed list of constructors.
///
/// Data types are compared by identity and are meant to be declared as `static`s, so that every
/// [`RuntimeConstructor`] can refer back to its type without any reference counting.
pub struct DataType {
    name: &'static str,
    constructors: &'static [ConstructorDecl],
}

impl DataType {
    pub const fn new(name: &'static str, constructors: &'static [ConstructorDecl]) -> Self {
        Self { name, constructors }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn constructors(&self) -> &'static [ConstructorDecl] {
        self.constructors
    }

    pub fn decl(&self, tag: ConstructorTag) -> Option<&'static ConstructorDecl> {
        self.constructors.get(tag.index())
    }

    /// Looks up a constructor by name.
    pub fn tag(&self, name: &str) -> Option<ConstructorTag> {
        self.constructors
            .iter()
            .position(|decl| decl.name == name)
            .map(ConstructorTag::new)
    }

    pub fn tags(&self) -> impl Iterator<Item = ConstructorTag> {
        (0..self.constructors.len()).map(ConstructorTag::new)
    }

    /// Whether both refer to the very same declaration.
    pub fn is(&self, other: &DataType) -> bool {
        ptr::eq(self, other)
    }

    /// Applies the constructor identified by `tag` to `fields`.
    ///
    /// Nullary constructors are not allocated, so constructing them repeatedly always yields the
    /// same instance.
    pub fn construct(
        &'static self,
        tag: ConstructorTag,
        fields: Vec<RuntimeValue>,
    ) -> Result<RuntimeValue, InvariantViolation> {
        let decl = self.decl(tag).ok_or(InvariantViolation::UnknownTag {
            data_type: self.name,
            tag,
        })?;

        if fields.len() != decl.arity {
            return Err(InvariantViolation::ArityMismatch {
                constructor: decl.name,
                expected: decl.arity,
                found: fields.len(),
            });
        }

        let constructor = if fields.is_empty() {
            RuntimeConstructor::nullary(self, tag)
        } else {
            RuntimeConstructor::applied(self, tag, fields.into_boxed_slice())
        };
        Ok(constructor.into())
    }

    /// Returns the shared value of a constructor without fields.
    ///
    /// Panics with an invariant violation if the constructor does not exist or takes fields.
    pub fn nullary(&'static self, tag: ConstructorTag) -> RuntimeValue {
        self.construct(tag, Vec::new())
            .unwrap_or_else(|violation| violation.raise())
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DataType").field(&self.name).finish()
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for DataType {}

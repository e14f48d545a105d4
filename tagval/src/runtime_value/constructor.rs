use std::{fmt, ptr, sync::Arc};

use crate::data_type::{ConstructorDecl, ConstructorTag, DataType};

use super::{RuntimeConstructor, RuntimeValue};

#[derive(Clone)]
pub(super) enum Impl {
    /// Constructors without fields carry nothing that would need an allocation.
    Nullary {
        data_type: &'static DataType,
        tag: ConstructorTag,
    },
    Applied(Arc<Applied>),
}

pub(super) struct Applied {
    data_type: &'static DataType,
    tag: ConstructorTag,
    /// Never empty.
    fields: Box<[RuntimeValue]>,
}

impl RuntimeConstructor {
    /// Expects `tag` to be a valid nullary constructor of `data_type`.
    pub(crate) fn nullary(data_type: &'static DataType, tag: ConstructorTag) -> Self {
        Self {
            constructor: Impl::Nullary { data_type, tag },
        }
    }

    /// Expects `fields` to match the arity of the constructor `tag` of `data_type`.
    pub(crate) fn applied(
        data_type: &'static DataType,
        tag: ConstructorTag,
        fields: Box<[RuntimeValue]>,
    ) -> Self {
        Self {
            constructor: Impl::Applied(Arc::new(Applied {
                data_type,
                tag,
                fields,
            })),
        }
    }

    pub fn data_type(&self) -> &'static DataType {
        match &self.constructor {
            Impl::Nullary { data_type, .. } => *data_type,
            Impl::Applied(applied) => applied.data_type,
        }
    }

    pub fn tag(&self) -> ConstructorTag {
        match &self.constructor {
            Impl::Nullary { tag, .. } => *tag,
            Impl::Applied(applied) => applied.tag,
        }
    }

    pub fn fields(&self) -> &[RuntimeValue] {
        match &self.constructor {
            Impl::Nullary { .. } => &[],
            Impl::Applied(applied) => &applied.fields,
        }
    }

    pub fn decl(&self) -> &'static ConstructorDecl {
        let tag = self.tag();
        &self.data_type().constructors()[tag.index()]
    }

    pub fn name(&self) -> &'static str {
        self.decl().name()
    }

    pub(super) fn same_instance(&self, other: &Self) -> bool {
        match (&self.constructor, &other.constructor) {
            (
                Impl::Nullary { data_type, tag },
                Impl::Nullary {
                    data_type: other_data_type,
                    tag: other_tag,
                },
            ) => ptr::eq(*data_type, *other_data_type) && tag == other_tag,
            (Impl::Applied(lhs), Impl::Applied(rhs)) => Arc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

impl From<RuntimeConstructor> for RuntimeValue {
    fn from(value: RuntimeConstructor) -> Self {
        Self::Constructor(value)
    }
}

impl std::hash::Hash for RuntimeConstructor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // data types compare by identity, but their names are a good enough hash
        self.data_type().name().hash(state);
        self.tag().hash(state);
        self.fields().hash(state);
    }
}

impl PartialEq for RuntimeConstructor {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
            || (self.data_type().is(other.data_type())
                && self.tag() == other.tag()
                && self.fields() == other.fields())
    }
}

impl Eq for RuntimeConstructor {}

impl fmt::Debug for RuntimeConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple(self.name());
        for field in self.fields() {
            tuple.field(field);
        }
        tuple.finish()
    }
}

impl fmt::Display for RuntimeConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields().is_empty() {
            return f.write_str(self.name());
        }

        write!(f, "({}", self.name())?;
        for field in self.fields() {
            write!(f, " {field}")?;
        }
        f.write_str(")")
    }
}

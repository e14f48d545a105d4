use std::{fmt, ptr, slice, sync::Arc};

use crate::{
    error::InvariantViolation,
    runtime_value::{RuntimeFunction, RuntimeValue},
};

/// An operation a class requires every instance to supply.
#[derive(Debug, PartialEq, Eq)]
pub struct OperationDecl {
    name: &'static str,
    /// Includes the value that is dispatched on.
    arity: usize,
}

impl OperationDecl {
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

/// The capability contract of a typeclass.
///
/// Like [`DataType`](crate::data_type::DataType)s, classes are compared by identity and meant to
/// be declared as `static`s.
pub struct ClassDecl {
    name: &'static str,
    operations: &'static [OperationDecl],
    superclasses: &'static [&'static ClassDecl],
}

impl ClassDecl {
    pub const fn new(
        name: &'static str,
        operations: &'static [OperationDecl],
        superclasses: &'static [&'static ClassDecl],
    ) -> Self {
        Self {
            name,
            operations,
            superclasses,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn operations(&self) -> &'static [OperationDecl] {
        self.operations
    }

    pub const fn superclasses(&self) -> &'static [&'static ClassDecl] {
        self.superclasses
    }

    pub fn operation_index(&self, name: &str) -> Option<usize> {
        self.operations.iter().position(|decl| decl.name == name)
    }

    pub fn is(&self, other: &ClassDecl) -> bool {
        ptr::eq(self, other)
    }

    fn superclass_index(&self, superclass: &ClassDecl) -> Option<usize> {
        self.superclasses
            .iter()
            .position(|decl| decl.is(superclass))
    }
}

impl fmt::Debug for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassDecl").field(&self.name).finish()
    }
}

/// One instance of a class for one concrete type.
///
/// Holds a function value for every operation of its class. Dictionaries are immutable and cheap
/// to clone, so a single dictionary can be shared by every call site (and thread) that needs it.
#[derive(Clone)]
pub struct Dictionary {
    dictionary: Arc<DictionaryImpl>,
}

struct DictionaryImpl {
    class: &'static ClassDecl,
    instance: String,
    /// In the same order as [`ClassDecl::operations`].
    operations: Box<[RuntimeFunction]>,
    /// In the same order as [`ClassDecl::superclasses`].
    superclasses: Box<[Dictionary]>,
    /// The dictionaries this instance was composed from, e.g. `Show a` for `Show (Maybe a)`.
    parameters: Box<[Dictionary]>,
}

impl Dictionary {
    pub fn builder(class: &'static ClassDecl, instance: impl Into<String>) -> DictionaryBuilder {
        DictionaryBuilder {
            class,
            instance: instance.into(),
            operations: vec![None; class.operations.len()],
            superclasses: vec![None; class.superclasses.len()],
            parameters: Vec::new(),
            violation: None,
        }
    }

    pub fn class(&self) -> &'static ClassDecl {
        self.dictionary.class
    }

    /// A label for the type this is an instance for, e.g. `Maybe Integer`.
    pub fn instance(&self) -> &str {
        &self.dictionary.instance
    }

    pub fn operation(&self, name: &str) -> Option<&RuntimeFunction> {
        let index = self.class().operation_index(name)?;
        Some(&self.dictionary.operations[index])
    }

    /// Finds the dictionary of a (possibly indirect) superclass.
    pub fn superclass(&self, class: &ClassDecl) -> Option<&Dictionary> {
        self.dictionary
            .superclasses
            .iter()
            .find(|superclass| superclass.class().is(class))
            .or_else(|| {
                self.dictionary
                    .superclasses
                    .iter()
                    .find_map(|superclass| superclass.superclass(class))
            })
    }

    pub fn parameters(&self) -> &[Dictionary] {
        &self.dictionary.parameters
    }

    pub fn is_instance_of(&self, class: &ClassDecl) -> bool {
        self.class().is(class)
    }

    /// Fails unless this is a dictionary of `class`.
    pub fn ensure_instance_of(&self, class: &ClassDecl) -> Result<(), InvariantViolation> {
        if self.is_instance_of(class) {
            Ok(())
        } else {
            Err(InvariantViolation::ClassMismatch {
                expected: class.name,
                found: self.class().name,
            })
        }
    }

    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.dictionary, &other.dictionary)
    }

    /// Applies the operation `name` to `value` followed by `extra` arguments.
    pub fn try_dispatch(
        &self,
        name: &str,
        value: &RuntimeValue,
        extra: &[RuntimeValue],
    ) -> Result<RuntimeValue, InvariantViolation> {
        let operation = self
            .operation(name)
            .ok_or_else(|| InvariantViolation::UnknownOperation {
                class: self.class().name,
                operation: name.into(),
            })?;

        log::trace!(
            "dispatching {}.{name} for {}",
            self.class().name,
            self.instance()
        );

        if extra.is_empty() {
            operation.apply(slice::from_ref(value))
        } else {
            let mut arguments = Vec::with_capacity(1 + extra.len());
            arguments.push(value.clone());
            arguments.extend_from_slice(extra);
            operation.apply(&arguments)
        }
    }

    /// Like [`Self::try_dispatch`], but panics with an invariant violation instead of returning
    /// it.
    pub fn dispatch(
        &self,
        name: &str,
        value: &RuntimeValue,
        extra: &[RuntimeValue],
    ) -> RuntimeValue {
        self.try_dispatch(name, value, extra)
            .unwrap_or_else(|violation| violation.raise())
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("class", &self.class().name)
            .field("instance", &self.instance())
            .finish_non_exhaustive()
    }
}

/// Looks up `name` in `dictionary` and applies it to `value` and `extra`.
///
/// Panics with an invariant violation if the operation does not exist or the number of arguments
/// does not match.
pub fn dispatch(
    dictionary: &Dictionary,
    name: &str,
    value: &RuntimeValue,
    extra: &[RuntimeValue],
) -> RuntimeValue {
    dictionary.dispatch(name, value, extra)
}

/// Assembles a [`Dictionary`], validating it against its class.
///
/// The first violation is remembered and reported by [`DictionaryBuilder::build`].
#[derive(Debug)]
pub struct DictionaryBuilder {
    class: &'static ClassDecl,
    instance: String,
    operations: Vec<Option<RuntimeFunction>>,
    superclasses: Vec<Option<Dictionary>>,
    parameters: Vec<Dictionary>,
    violation: Option<InvariantViolation>,
}

impl DictionaryBuilder {
    pub fn operation(mut self, name: &str, function: RuntimeFunction) -> Self {
        if self.violation.is_none() {
            self.violation = self.insert_operation(name, function).err();
        }
        self
    }

    pub fn superclass(mut self, dictionary: Dictionary) -> Self {
        if self.violation.is_none() {
            self.violation = self.insert_superclass(dictionary).err();
        }
        self
    }

    pub fn parameter(mut self, dictionary: Dictionary) -> Self {
        self.parameters.push(dictionary);
        self
    }

    pub fn build(self) -> Result<Dictionary, InvariantViolation> {
        if let Some(violation) = self.violation {
            return Err(violation);
        }

        let class = self.class;
        let instance = self.instance;

        let operations = self
            .operations
            .into_iter()
            .zip(class.operations)
            .map(|(operation, decl)| {
                operation.ok_or_else(|| InvariantViolation::MissingOperation {
                    class: class.name,
                    instance: instance.clone(),
                    operation: decl.name,
                })
            })
            .collect::<Result<_, _>>()?;

        let superclasses = self
            .superclasses
            .into_iter()
            .zip(class.superclasses)
            .map(|(superclass, decl)| {
                superclass.ok_or_else(|| InvariantViolation::MissingSuperclass {
                    class: class.name,
                    instance: instance.clone(),
                    superclass: decl.name,
                })
            })
            .collect::<Result<_, _>>()?;

        log::trace!("built dictionary {} {instance}", class.name);

        Ok(Dictionary {
            dictionary: Arc::new(DictionaryImpl {
                class,
                instance,
                operations,
                superclasses,
                parameters: self.parameters.into(),
            }),
        })
    }

    fn insert_operation(
        &mut self,
        name: &str,
        function: RuntimeFunction,
    ) -> Result<(), InvariantViolation> {
        let class = self.class;
        let index =
            class
                .operation_index(name)
                .ok_or_else(|| InvariantViolation::UnknownOperation {
                    class: class.name,
                    operation: name.into(),
                })?;
        let decl = &class.operations[index];

        if function.arity() != decl.arity {
            return Err(InvariantViolation::OperationArityMismatch {
                class: class.name,
                operation: decl.name,
                expected: decl.arity,
                found: function.arity(),
            });
        }

        let slot = &mut self.operations[index];
        if slot.is_some() {
            return Err(InvariantViolation::DuplicateOperation {
                class: class.name,
                operation: decl.name,
            });
        }
        *slot = Some(function);
        Ok(())
    }

    fn insert_superclass(&mut self, dictionary: Dictionary) -> Result<(), InvariantViolation> {
        let class = self.class;
        let superclass = dictionary.class();
        let index = class.superclass_index(superclass).ok_or(
            InvariantViolation::SuperclassMismatch {
                class: class.name,
                superclass: superclass.name,
            },
        )?;

        let slot = &mut self.superclasses[index];
        if slot.is_some() {
            return Err(InvariantViolation::DuplicateSuperclass {
                class: class.name,
                superclass: superclass.name,
            });
        }
        *slot = Some(dictionary);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    static EQ: ClassDecl = ClassDecl::new("Eq", &[OperationDecl::new("eq", 2)], &[]);

    static ORD: ClassDecl = ClassDecl::new(
        "Ord",
        &[OperationDecl::new("compare", 2), OperationDecl::new("max", 2)],
        &[&EQ],
    );

    static SEMIGROUP: ClassDecl =
        ClassDecl::new("Semigroup", &[OperationDecl::new("append", 2)], &[]);

    /// Only used as a superclass of a superclass.
    static BOUNDED_ORD: ClassDecl = ClassDecl::new("BoundedOrd", &[], &[&ORD]);

    fn eq_integer() -> Dictionary {
        Dictionary::builder(&EQ, "Integer")
            .operation(
                "eq",
                RuntimeFunction::binary(|lhs, rhs| {
                    (lhs.expect_integer() == rhs.expect_integer()).into()
                }),
            )
            .build()
            .unwrap()
    }

    fn compare_integer() -> RuntimeFunction {
        RuntimeFunction::binary(|lhs, rhs| {
            (lhs.expect_integer().cmp(&rhs.expect_integer()) as i64).into()
        })
    }

    fn max_integer() -> RuntimeFunction {
        RuntimeFunction::binary(|lhs, rhs| lhs.expect_integer().max(rhs.expect_integer()).into())
    }

    fn ord_integer() -> Dictionary {
        Dictionary::builder(&ORD, "Integer")
            .operation("compare", compare_integer())
            .operation("max", max_integer())
            .superclass(eq_integer())
            .build()
            .unwrap()
    }

    #[test]
    fn dispatch_with_extra_arguments() {
        let dictionary = eq_integer();

        let equal = dispatch(
            &dictionary,
            "eq",
            &RuntimeValue::Integer(4),
            &[RuntimeValue::Integer(4)],
        );
        let not_equal = dictionary.dispatch(
            "eq",
            &RuntimeValue::Integer(4),
            &[RuntimeValue::Integer(5)],
        );

        assert_eq!(equal, RuntimeValue::Boolean(true));
        assert_eq!(not_equal, RuntimeValue::Boolean(false));
    }

    #[test]
    fn dispatch_unknown_operation() {
        let result = eq_integer().try_dispatch(
            "neq",
            &RuntimeValue::Integer(1),
            &[RuntimeValue::Integer(2)],
        );

        assert_eq!(
            result,
            Err(InvariantViolation::UnknownOperation {
                class: "Eq",
                operation: "neq".into(),
            })
        );
    }

    #[test]
    fn dispatch_with_missing_arguments() {
        let result = eq_integer().try_dispatch("eq", &RuntimeValue::Integer(1), &[]);

        assert_eq!(
            result,
            Err(InvariantViolation::ArgumentCountMismatch {
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    fn unchecked_dispatch_unknown_operation() {
        eq_integer().dispatch("show", &RuntimeValue::Integer(1), &[]);
    }

    #[test]
    fn build_missing_operation() {
        let result = Dictionary::builder(&ORD, "Integer")
            .operation("compare", compare_integer())
            .superclass(eq_integer())
            .build();

        assert_eq!(
            result.err(),
            Some(InvariantViolation::MissingOperation {
                class: "Ord",
                instance: "Integer".into(),
                operation: "max",
            })
        );
    }

    #[test]
    fn build_unknown_operation() {
        let result = Dictionary::builder(&EQ, "Integer")
            .operation("compare", compare_integer())
            .build();

        assert_eq!(
            result.err(),
            Some(InvariantViolation::UnknownOperation {
                class: "Eq",
                operation: "compare".into(),
            })
        );
    }

    #[test]
    fn build_duplicate_operation() {
        let result = Dictionary::builder(&SEMIGROUP, "Integer")
            .operation("append", max_integer())
            .operation("append", max_integer())
            .build();

        assert_eq!(
            result.err(),
            Some(InvariantViolation::DuplicateOperation {
                class: "Semigroup",
                operation: "append",
            })
        );
    }

    #[test]
    fn build_operation_with_wrong_arity() {
        let result = Dictionary::builder(&SEMIGROUP, "Integer")
            .operation("append", RuntimeFunction::unary(RuntimeValue::clone))
            .build();

        assert_eq!(
            result.err(),
            Some(InvariantViolation::OperationArityMismatch {
                class: "Semigroup",
                operation: "append",
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn build_reports_first_violation() {
        let result = Dictionary::builder(&SEMIGROUP, "Integer")
            .operation("prepend", max_integer())
            .operation("append", RuntimeFunction::unary(RuntimeValue::clone))
            .build();

        assert!(matches!(
            result,
            Err(InvariantViolation::UnknownOperation { .. })
        ));
    }

    #[test]
    fn build_missing_superclass() {
        let result = Dictionary::builder(&ORD, "Integer")
            .operation("compare", compare_integer())
            .operation("max", max_integer())
            .build();

        assert_eq!(
            result.err(),
            Some(InvariantViolation::MissingSuperclass {
                class: "Ord",
                instance: "Integer".into(),
                superclass: "Eq",
            })
        );
    }

    #[test]
    fn build_unrelated_superclass() {
        let semigroup = Dictionary::builder(&SEMIGROUP, "Integer")
            .operation("append", max_integer())
            .build()
            .unwrap();

        let result = Dictionary::builder(&ORD, "Integer")
            .superclass(semigroup)
            .build();

        assert_eq!(
            result.err(),
            Some(InvariantViolation::SuperclassMismatch {
                class: "Ord",
                superclass: "Semigroup",
            })
        );
    }

    #[test]
    fn build_duplicate_superclass() {
        let result = Dictionary::builder(&ORD, "Integer")
            .superclass(eq_integer())
            .superclass(eq_integer())
            .build();

        assert_eq!(
            result.err(),
            Some(InvariantViolation::DuplicateSuperclass {
                class: "Ord",
                superclass: "Eq",
            })
        );
    }

    #[test]
    fn superclass_lookup_is_transitive() {
        let eq = eq_integer();
        let ord = Dictionary::builder(&ORD, "Integer")
            .operation("compare", compare_integer())
            .operation("max", max_integer())
            .superclass(eq.clone())
            .build()
            .unwrap();
        let bounded_ord = Dictionary::builder(&BOUNDED_ORD, "Integer")
            .superclass(ord.clone())
            .build()
            .unwrap();

        assert!(bounded_ord.superclass(&ORD).unwrap().same_instance(&ord));
        assert!(bounded_ord.superclass(&EQ).unwrap().same_instance(&eq));
        assert!(bounded_ord.superclass(&SEMIGROUP).is_none());

        let is_equal = bounded_ord.superclass(&EQ).unwrap().dispatch(
            "eq",
            &RuntimeValue::Integer(3),
            &[RuntimeValue::Integer(3)],
        );
        assert_eq!(is_equal, RuntimeValue::Boolean(true));
    }

    #[test]
    fn parameters_are_kept_in_order() {
        let eq = eq_integer();
        let ord = ord_integer();

        let composed = Dictionary::builder(&SEMIGROUP, "Pair Integer Integer")
            .operation("append", max_integer())
            .parameter(eq.clone())
            .parameter(ord.clone())
            .build()
            .unwrap();

        assert_eq!(composed.parameters().len(), 2);
        assert!(composed.parameters()[0].same_instance(&eq));
        assert!(composed.parameters()[1].same_instance(&ord));
    }

    #[test]
    fn ensure_instance_of_class() {
        let ord = ord_integer();

        assert_eq!(ord.ensure_instance_of(&ORD), Ok(()));
        assert_eq!(
            ord.ensure_instance_of(&EQ),
            Err(InvariantViolation::ClassMismatch {
                expected: "Eq",
                found: "Ord",
            })
        );
    }

    #[test]
    fn dictionaries_are_shared_between_threads() {
        let ord = ord_integer();

        let handles: Vec<_> = (0..4_i64)
            .map(|index| {
                let ord = ord.clone();
                thread::spawn(move || {
                    ord.dispatch(
                        "max",
                        &RuntimeValue::Integer(index),
                        &[RuntimeValue::Integer(2)],
                    )
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap().expect_integer())
            .collect();
        assert_eq!(results, [2, 2, 2, 3]);
    }
}

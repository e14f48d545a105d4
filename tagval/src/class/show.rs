//! Rendering values as text.
//!
//! The class comes in two flavors that share the same instances:
//!
//! - [`Show`] is the typed capability. Instances are ordinary values implementing the trait, so
//!   the compiler checks that every operation is supplied.
//! - [`SHOW`] is the runtime class. Its [`Dictionary`]s render uniformly typed [`RuntimeValue`]s
//!   and are what generated code passes around.
//!
//! Every [`Dictionary`] of [`SHOW`] is itself a `Show<RuntimeValue>`, which is how typed instances
//! such as [`ShowMaybe`] delegate to runtime dictionaries for their payload.

pub mod maybe;

use std::fmt::Write;

use lazy_static::lazy_static;

use crate::{
    dictionary::{ClassDecl, Dictionary, OperationDecl},
    error::InvariantViolation,
    runtime_value::{RuntimeFunction, RuntimeString, RuntimeValue, ValueKind},
};

pub use self::maybe::{show_maybe, ShowMaybe};

pub const SHOW_OPERATION: &str = "show";

pub static SHOW: ClassDecl = ClassDecl::new("Show", &[OperationDecl::new(SHOW_OPERATION, 1)], &[]);

/// Renders values of type `T` as text.
pub trait Show<T: ?Sized> {
    fn show(&self, value: &T) -> RuntimeString;
}

/// Returns the `show` operation of a [`SHOW`] dictionary.
///
/// Panics with an invariant violation if `dictionary` is an instance of a different class.
pub fn show(dictionary: &Dictionary) -> &RuntimeFunction {
    dictionary
        .ensure_instance_of(&SHOW)
        .and_then(|()| {
            dictionary
                .operation(SHOW_OPERATION)
                .ok_or_else(|| InvariantViolation::UnknownOperation {
                    class: SHOW.name(),
                    operation: SHOW_OPERATION.into(),
                })
        })
        .unwrap_or_else(|violation| violation.raise())
}

impl Show<RuntimeValue> for Dictionary {
    fn show(&self, value: &RuntimeValue) -> RuntimeString {
        self.ensure_instance_of(&SHOW)
            .unwrap_or_else(|violation| violation.raise());

        self.dispatch(SHOW_OPERATION, value, &[])
            .try_into()
            .unwrap_or_else(|rendered: RuntimeValue| {
                InvariantViolation::KindMismatch {
                    expected: ValueKind::String,
                    found: rendered.kind(),
                }
                .raise()
            })
    }
}

/// Builds a runtime dictionary of [`SHOW`] out of a typed instance.
///
/// `parameters` are the dictionaries `typed` was composed from, e.g. `Show a` for `Show (Maybe a)`.
pub fn dictionary<D>(
    instance: impl Into<String>,
    typed: D,
    parameters: &[Dictionary],
) -> Dictionary
where
    D: Show<RuntimeValue> + Send + Sync + 'static,
{
    let instance = instance.into();
    log::debug!("deriving Show dictionary for {instance}");

    parameters
        .iter()
        .cloned()
        .fold(Dictionary::builder(&SHOW, instance), |builder, parameter| {
            builder.parameter(parameter)
        })
        .operation(
            SHOW_OPERATION,
            RuntimeFunction::unary(move |value| typed.show(value).into()),
        )
        .build()
        .unwrap_or_else(|violation| violation.raise())
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ShowUnit;

#[derive(Clone, Copy, Debug, Default)]
pub struct ShowBoolean;

#[derive(Clone, Copy, Debug, Default)]
pub struct ShowInteger;

#[derive(Clone, Copy, Debug, Default)]
pub struct ShowNumber;

#[derive(Clone, Copy, Debug, Default)]
pub struct ShowChar;

#[derive(Clone, Copy, Debug, Default)]
pub struct ShowString;

lazy_static! {
    pub static ref SHOW_UNIT: Dictionary = dictionary("Unit", ShowUnit, &[]);
    pub static ref SHOW_BOOLEAN: Dictionary = dictionary("Boolean", ShowBoolean, &[]);
    pub static ref SHOW_INTEGER: Dictionary = dictionary("Integer", ShowInteger, &[]);
    pub static ref SHOW_NUMBER: Dictionary = dictionary("Number", ShowNumber, &[]);
    pub static ref SHOW_CHAR: Dictionary = dictionary("Char", ShowChar, &[]);
    pub static ref SHOW_STRING: Dictionary = dictionary("String", ShowString, &[]);
}

impl Show<()> for ShowUnit {
    fn show(&self, (): &()) -> RuntimeString {
        "unit".into()
    }
}

impl Show<RuntimeValue> for ShowUnit {
    fn show(&self, value: &RuntimeValue) -> RuntimeString {
        if !value.is_unit() {
            InvariantViolation::KindMismatch {
                expected: ValueKind::Unit,
                found: value.kind(),
            }
            .raise();
        }
        self.show(&())
    }
}

impl Show<bool> for ShowBoolean {
    fn show(&self, value: &bool) -> RuntimeString {
        let text = if *value { "true" } else { "false" };
        text.into()
    }
}

impl Show<RuntimeValue> for ShowBoolean {
    fn show(&self, value: &RuntimeValue) -> RuntimeString {
        self.show(&value.expect_boolean())
    }
}

impl Show<i64> for ShowInteger {
    fn show(&self, value: &i64) -> RuntimeString {
        value.to_string().into()
    }
}

impl Show<RuntimeValue> for ShowInteger {
    fn show(&self, value: &RuntimeValue) -> RuntimeString {
        self.show(&value.expect_integer())
    }
}

impl Show<f64> for ShowNumber {
    fn show(&self, value: &f64) -> RuntimeString {
        if value.is_nan() {
            return "NaN".into();
        }
        if value.is_infinite() {
            let text = if value.is_sign_positive() { "Infinity" } else { "-Infinity" };
            return text.into();
        }

        let mut text = value.to_string();
        if !text.contains('.') {
            text.push_str(".0");
        }
        text.into()
    }
}

impl Show<RuntimeValue> for ShowNumber {
    fn show(&self, value: &RuntimeValue) -> RuntimeString {
        self.show(&value.expect_number())
    }
}

impl Show<char> for ShowChar {
    fn show(&self, value: &char) -> RuntimeString {
        let mut text = String::with_capacity(3);
        text.push('\'');
        push_escaped(&mut text, *value, '\'');
        text.push('\'');
        text.into()
    }
}

impl Show<RuntimeValue> for ShowChar {
    fn show(&self, value: &RuntimeValue) -> RuntimeString {
        self.show(&value.expect_char())
    }
}

impl Show<str> for ShowString {
    fn show(&self, value: &str) -> RuntimeString {
        let mut text = String::with_capacity(value.len() + 2);
        text.push('"');
        for char in value.chars() {
            push_escaped(&mut text, char, '"');
        }
        text.push('"');
        text.into()
    }
}

impl Show<RuntimeString> for ShowString {
    fn show(&self, value: &RuntimeString) -> RuntimeString {
        self.show(value.as_str())
    }
}

impl Show<RuntimeValue> for ShowString {
    fn show(&self, value: &RuntimeValue) -> RuntimeString {
        self.show(value.expect_string())
    }
}

fn push_escaped(text: &mut String, char: char, quote: char) {
    match char {
        '\\' => text.push_str("\\\\"),
        '\n' => text.push_str("\\n"),
        '\r' => text.push_str("\\r"),
        '\t' => text.push_str("\\t"),
        char if char == quote => {
            text.push('\\');
            text.push(char);
        }
        // control characters all fit into two hex digits
        char if char.is_control() => {
            let _ = write!(text, "\\x{:02x}", char as u32);
        }
        char => text.push(char),
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    static EQ: ClassDecl = ClassDecl::new("Eq", &[OperationDecl::new("eq", 2)], &[]);

    #[test]
    fn show_primitives() {
        assert_eq!(ShowUnit.show(&()).as_str(), "unit");
        assert_eq!(ShowBoolean.show(&true).as_str(), "true");
        assert_eq!(ShowInteger.show(&-3_i64).as_str(), "-3");
        assert_eq!(ShowInteger.show(&42_i64).as_str(), "42");
        assert_eq!(ShowChar.show(&'a').as_str(), "'a'");
        assert_eq!(ShowChar.show(&'\'').as_str(), "'\\''");
        assert_eq!(ShowString.show("text").as_str(), "\"text\"");
    }

    #[test]
    fn show_numbers() {
        assert_eq!(ShowNumber.show(&1.0_f64).as_str(), "1.0");
        assert_eq!(ShowNumber.show(&0.5_f64).as_str(), "0.5");
        assert_eq!(ShowNumber.show(&-2.25_f64).as_str(), "-2.25");
        assert_eq!(ShowNumber.show(&f64::NAN).as_str(), "NaN");
        assert_eq!(ShowNumber.show(&f64::INFINITY).as_str(), "Infinity");
        assert_eq!(ShowNumber.show(&f64::NEG_INFINITY).as_str(), "-Infinity");
    }

    #[test]
    fn show_escaped_strings() {
        assert_eq!(
            ShowString.show("say \"hi\"\n").as_str(),
            "\"say \\\"hi\\\"\\n\""
        );
        assert_eq!(ShowString.show("a\\b").as_str(), "\"a\\\\b\"");
        assert_eq!(ShowString.show("\u{7}").as_str(), "\"\\x07\"");
        assert_eq!(ShowString.show("it's").as_str(), "\"it's\"");
    }

    #[test]
    fn static_dictionaries_dispatch() {
        let _ = env_logger::builder().is_test(true).try_init();

        assert_eq!(
            SHOW_INTEGER.dispatch(SHOW_OPERATION, &RuntimeValue::Integer(42), &[]),
            RuntimeValue::from("42")
        );
        assert_eq!(SHOW_BOOLEAN.show(&RuntimeValue::Boolean(false)).as_str(), "false");
        assert_eq!(SHOW_NUMBER.show(&RuntimeValue::from(1.5_f64)).as_str(), "1.5");
        assert_eq!(SHOW_CHAR.show(&RuntimeValue::Char('x')).as_str(), "'x'");
        assert_eq!(SHOW_STRING.show(&RuntimeValue::from("x")).as_str(), "\"x\"");
        assert_eq!(SHOW_UNIT.show(&RuntimeValue::Unit).as_str(), "unit");
    }

    #[test]
    fn static_dictionaries_are_built_once() {
        assert!(SHOW_INTEGER.same_instance(&SHOW_INTEGER.clone()));

        let from_threads: Vec<_> = (0..4)
            .map(|_| thread::spawn(|| SHOW_INTEGER.clone()))
            .map(|handle| handle.join().unwrap())
            .collect();
        assert!(from_threads
            .iter()
            .all(|dictionary| dictionary.same_instance(&SHOW_INTEGER)));
    }

    #[test]
    fn dictionary_keeps_its_parameters() {
        let composed = dictionary("Boxed Integer", ShowInteger, &[SHOW_INTEGER.clone()]);

        assert!(composed.is_instance_of(&SHOW));
        assert_eq!(composed.instance(), "Boxed Integer");
        assert_eq!(composed.parameters().len(), 1);
        assert!(composed.parameters()[0].same_instance(&SHOW_INTEGER));
        assert_eq!(composed.show(&RuntimeValue::Integer(5)).as_str(), "5");
        assert!(SHOW_INTEGER.parameters().is_empty());
    }

    #[test]
    fn show_accessor_returns_operation() {
        let rendered = show(&SHOW_INTEGER).call(&[RuntimeValue::Integer(7)]);

        assert_eq!(rendered, RuntimeValue::from("7"));
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    fn show_accessor_rejects_other_classes() {
        let eq = Dictionary::builder(&EQ, "Unit")
            .operation("eq", RuntimeFunction::binary(|_, _| true.into()))
            .build()
            .unwrap();

        show(&eq);
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    fn show_rejects_mismatched_kind() {
        SHOW_INTEGER.show(&RuntimeValue::from("42"));
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    fn show_rejects_non_text_results() {
        let broken = Dictionary::builder(&SHOW, "Integer")
            .operation(SHOW_OPERATION, RuntimeFunction::unary(RuntimeValue::clone))
            .build()
            .unwrap();

        broken.show(&RuntimeValue::Integer(1));
    }
}

use std::slice;

use lazy_static::lazy_static;

use crate::{
    data::maybe::{self, Maybe},
    dictionary::Dictionary,
    runtime_value::{RuntimeString, RuntimeValue},
};

use super::{Show, SHOW};

lazy_static! {
    static ref JUST_PREFIX: RuntimeString = "(Just ".into();
    static ref JUST_SUFFIX: RuntimeString = ")".into();
    static ref NOTHING_TEXT: RuntimeString = "(Nothing)".into();
}

/// Renders [`Maybe`]s, delegating the payload to `D`.
///
/// `Just x` renders as `(Just x)` and `Nothing` as `(Nothing)`, regardless of how `D` renders.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShowMaybe<D>(pub D);

impl<T, D: Show<T>> Show<Maybe<T>> for ShowMaybe<D> {
    fn show(&self, value: &Maybe<T>) -> RuntimeString {
        render(value.as_ref(), &self.0)
    }
}

impl<D: Show<RuntimeValue>> Show<RuntimeValue> for ShowMaybe<D> {
    fn show(&self, value: &RuntimeValue) -> RuntimeString {
        let value = maybe::decode(value).unwrap_or_else(|violation| violation.raise());
        render(value, &self.0)
    }
}

fn render<T: ?Sized>(value: Maybe<&T>, payload: &impl Show<T>) -> RuntimeString {
    match value {
        Maybe::Nothing => NOTHING_TEXT.clone(),
        Maybe::Just(value) => JUST_PREFIX
            .concat(&payload.show(value))
            .concat(&JUST_SUFFIX),
    }
}

/// Derives the `Show (Maybe a)` dictionary from a `Show a` dictionary.
///
/// Panics with an invariant violation if `dict_show` is not a dictionary of [`SHOW`].
pub fn show_maybe(dict_show: &Dictionary) -> Dictionary {
    dict_show
        .ensure_instance_of(&SHOW)
        .unwrap_or_else(|violation| violation.raise());

    let payload = dict_show.instance();
    let instance = if payload.contains(' ') {
        format!("Maybe ({payload})")
    } else {
        format!("Maybe {payload}")
    };

    super::dictionary(
        instance,
        ShowMaybe(dict_show.clone()),
        slice::from_ref(dict_show),
    )
}

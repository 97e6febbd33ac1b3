//! Required-parameter validation.

use crate::{HateoasError, HateoasResult, LinkSet, ParamValue};
use serde_json::Value;

/// Whether a value counts as supplied.
///
/// Empty strings, `None`, JSON nulls and empty containers count as missing.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        self.as_str().is_present()
    }
}

impl<T: Presence + ?Sized> Presence for &T {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

impl<T> Presence for [T] {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for Value {
    fn is_present(&self) -> bool {
        match self {
            Value::Null => false,
            Value::String(s) => s.is_present(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        }
    }
}

impl Presence for ParamValue {
    fn is_present(&self) -> bool {
        match self {
            ParamValue::Null => false,
            ParamValue::Text(text) | ParamValue::Resource(text) => text.is_present(),
            ParamValue::List(items) => !items.is_empty(),
        }
    }
}

impl Presence for LinkSet {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

macro_rules! always_present {
    ($($ty:ty),*) => {
        $(impl Presence for $ty {
            fn is_present(&self) -> bool {
                true
            }
        })*
    };
}

always_present!(bool, u32, u64, i32, i64, usize);

/// Checks every named parameter and reports all missing ones in one error.
///
/// ```
/// use hateoas_types::assert_present;
///
/// let name = "";
/// let id: Option<String> = None;
/// let err = assert_present(&[("resourceName", &name), ("id", &id)]).unwrap_err();
/// assert!(err.to_string().contains("'resourceName', 'id'"));
/// ```
pub fn assert_present(params: &[(&str, &dyn Presence)]) -> HateoasResult<()> {
    let missing: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_present())
        .map(|(name, _)| format!("'{name}'"))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(HateoasError::InvalidParam(format!(
        "passed param(s) {} are not valid: null, undefined or empty",
        missing.join(", ")
    )))
}

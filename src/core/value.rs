//! Value types a field can hold.
//!
//! A field is agnostic of what it stores. The value type supplies the three
//! primitives the engine needs: an emptiness check, a display conversion and
//! a parser for text coming back from a display binding.

use crate::error::ParseError;
use std::fmt::Debug;

/// Trait for values held by a [`Field`](crate::Field).
///
/// # Required Traits
///
/// - `Clone`: `get()` hands out owned copies
/// - `PartialEq`: setting an equal value is a no-op
/// - `Debug`: values show up in diagnostics
///
/// # Example
///
/// ```rust
/// use fieldwise::core::FieldValue;
/// use fieldwise::ParseError;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Tags(Vec<String>);
///
/// impl FieldValue for Tags {
///     fn is_empty(&self) -> bool {
///         self.0.is_empty()
///     }
///
///     fn to_display_string(&self) -> String {
///         self.0.join(", ")
///     }
///
///     fn parse(text: &str) -> Result<Self, ParseError> {
///         Ok(Tags(text.split(',').map(|t| t.trim().to_string()).collect()))
///     }
/// }
///
/// assert!(Tags(vec![]).is_empty());
/// assert_eq!(Tags::parse("a, b").unwrap().to_display_string(), "a, b");
/// ```
pub trait FieldValue: Clone + PartialEq + Debug + 'static {
    /// Check whether the value counts as empty.
    ///
    /// Only consulted when the field allows empty values.
    fn is_empty(&self) -> bool;

    /// Render the value as display text.
    fn to_display_string(&self) -> String;

    /// Parse display text into a value.
    fn parse(text: &str) -> Result<Self, ParseError>;

    /// Identity used to detect no-op updates and by verify validators.
    ///
    /// Defaults to `==`. Floats override it so that `NaN` is the same value
    /// as itself.
    fn same_value(&self, other: &Self) -> bool {
        self == other
    }

    /// Parse display text coming from a binding.
    ///
    /// Blank text clears the field. Text types override this so that an
    /// empty string stays a value.
    fn parse_display(text: &str) -> Result<Option<Self>, ParseError> {
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Self::parse(text).map(Some)
        }
    }
}

impl FieldValue for String {
    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }

    fn to_display_string(&self) -> String {
        self.clone()
    }

    fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(text.to_string())
    }

    fn parse_display(text: &str) -> Result<Option<Self>, ParseError> {
        Ok(Some(text.to_string()))
    }
}

crate::parsed_field_value!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
crate::parsed_field_value!(float: f32, f64);

/// Both missing, or both present and the same value.
pub(crate) fn same_option<V: FieldValue>(a: Option<&V>, b: Option<&V>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.same_value(b),
        (None, None) => true,
        _ => false,
    }
}

/// Display text for an optional value; a missing value renders as "".
pub(crate) fn display_text<V: FieldValue>(value: Option<&V>) -> String {
    value.map(FieldValue::to_display_string).unwrap_or_default()
}

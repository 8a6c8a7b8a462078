//! Macros for declaring field value types.

/// Implement [`FieldValue`](crate::core::FieldValue) for types that already
/// implement `Display` and `FromStr`.
///
/// Such values are never empty; display text is their `Display` output and
/// parsing goes through `FromStr` on the trimmed text. Prefix the list with
/// `float:` for types with a `to_bits` method, so that `NaN` counts as the
/// same value as itself.
///
/// # Example
///
/// ```
/// use fieldwise::core::FieldValue;
/// use fieldwise::parsed_field_value;
/// use std::fmt;
/// use std::str::FromStr;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Percent(u8);
///
/// impl fmt::Display for Percent {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}%", self.0)
///     }
/// }
///
/// impl FromStr for Percent {
///     type Err = std::num::ParseIntError;
///
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.trim_end_matches('%').parse().map(Percent)
///     }
/// }
///
/// parsed_field_value!(Percent);
///
/// assert_eq!(Percent::parse("40%").unwrap(), Percent(40));
/// assert_eq!(Percent(40).to_display_string(), "40%");
/// ```
#[macro_export]
macro_rules! parsed_field_value {
    (@impl $ty:ty, $same:expr) => {
        impl $crate::core::FieldValue for $ty {
            fn is_empty(&self) -> bool {
                false
            }

            fn to_display_string(&self) -> String {
                ::std::string::ToString::to_string(self)
            }

            fn parse(text: &str) -> ::std::result::Result<Self, $crate::ParseError> {
                text.trim().parse::<$ty>().map_err(|err| $crate::ParseError::Invalid {
                    input: text.to_string(),
                    target: stringify!($ty),
                    reason: err.to_string(),
                })
            }

            fn same_value(&self, other: &Self) -> bool {
                ($same)(self, other)
            }
        }
    };
    (float: $($ty:ty),+ $(,)?) => {
        $(
            $crate::parsed_field_value!(@impl $ty, |a: &$ty, b: &$ty| a.to_bits() == b.to_bits());
        )+
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::parsed_field_value!(@impl $ty, |a: &$ty, b: &$ty| a == b);
        )+
    };
}

//! Validator predicates over field values.
//!
//! Validators are pure boolean functions that decide whether a value is
//! acceptable. A validator carries an identity so a field can recognise it
//! when it is registered a second time.

use super::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Identity of a validator. Clones of a validator share it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatorId(Uuid);

impl ValidatorId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pure predicate that decides whether a field value is valid.
///
/// The predicate receives `None` when the field holds no value and empty
/// values are not allowed, so "required" rules are ordinary validators.
///
/// # Example
///
/// ```rust
/// use fieldwise::core::Validator;
///
/// let non_blank = Validator::new(|v: Option<&String>| v.is_some_and(|s| !s.trim().is_empty()));
///
/// assert!(non_blank.check(Some(&"abc".to_string())));
/// assert!(!non_blank.check(Some(&"  ".to_string())));
/// assert!(!non_blank.check(None));
/// ```
pub struct Validator<V: FieldValue> {
    id: ValidatorId,
    predicate: Rc<dyn Fn(Option<&V>) -> bool>,
}

impl<V: FieldValue> Validator<V> {
    /// Create a validator from a pure predicate over an optional value.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(Option<&V>) -> bool + 'static,
    {
        Validator {
            id: ValidatorId::generate(),
            predicate: Rc::new(predicate),
        }
    }

    /// Create a validator over present values. A missing value fails.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fieldwise::core::Validator;
    ///
    /// let positive = Validator::on_value(|n: &i64| *n > 0);
    ///
    /// assert!(positive.check(Some(&3)));
    /// assert!(!positive.check(Some(&-1)));
    /// assert!(!positive.check(None));
    /// ```
    pub fn on_value<F>(predicate: F) -> Self
    where
        F: Fn(&V) -> bool + 'static,
    {
        Self::new(move |value: Option<&V>| value.is_some_and(&predicate))
    }

    pub fn id(&self) -> ValidatorId {
        self.id
    }

    /// Evaluate the predicate against a value.
    pub fn check(&self, value: Option<&V>) -> bool {
        (self.predicate)(value)
    }
}

impl<V: FieldValue> Clone for Validator<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<V: FieldValue> fmt::Debug for Validator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_accepts_matching_values() {
        let short = Validator::on_value(|s: &String| s.len() <= 3);

        assert!(short.check(Some(&"abc".to_string())));
        assert!(!short.check(Some(&"abcd".to_string())));
    }

    #[test]
    fn validator_sees_missing_values() {
        let optional = Validator::new(|v: Option<&i32>| v.is_none_or(|n| *n < 10));

        assert!(optional.check(None));
        assert!(optional.check(Some(&9)));
        assert!(!optional.check(Some(&10)));
    }

    #[test]
    fn validator_is_deterministic() {
        let even = Validator::on_value(|n: &u32| n % 2 == 0);
        let value = 4;

        assert_eq!(even.check(Some(&value)), even.check(Some(&value)));
    }

    #[test]
    fn clones_share_identity() {
        let v = Validator::on_value(|n: &u8| *n > 0);
        let cloned = v.clone();

        assert_eq!(v.id(), cloned.id());
    }

    #[test]
    fn separate_validators_have_distinct_identity() {
        let a = Validator::on_value(|n: &u8| *n > 0);
        let b = Validator::on_value(|n: &u8| *n > 0);

        assert_ne!(a.id(), b.id());
    }
}

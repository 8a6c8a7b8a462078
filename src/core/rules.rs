//! Ordered validator sets and the pure evaluation step.

use super::status::ErrorState;
use super::validator::Validator;
use super::value::FieldValue;

/// A validator paired with the message reported when it fails.
pub struct Rule<V: FieldValue> {
    pub validator: Validator<V>,
    pub message: Option<String>,
}

impl<V: FieldValue> Clone for Rule<V> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
            message: self.message.clone(),
        }
    }
}

/// Validators of a field in evaluation order.
///
/// Inserting a validator that is already present keeps its position and
/// only replaces its message.
pub struct RuleSet<V: FieldValue> {
    rules: Vec<Rule<V>>,
}

impl<V: FieldValue> RuleSet<V> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a validator, or update the message of one already present.
    pub fn insert(&mut self, validator: Validator<V>, message: Option<String>) {
        match self
            .rules
            .iter_mut()
            .find(|rule| rule.validator.id() == validator.id())
        {
            Some(existing) => existing.message = message,
            None => self.rules.push(Rule { validator, message }),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<V>> {
        self.rules.iter()
    }

    /// Evaluate a value against the rules (pure).
    ///
    /// When empty values are allowed and the value is missing or empty, the
    /// outcome is valid without running any validator. Otherwise the first
    /// failing validator decides the outcome and later ones never run.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fieldwise::core::{ErrorState, RuleSet, Validator};
    ///
    /// let mut rules = RuleSet::new();
    /// rules.insert(
    ///     Validator::on_value(|s: &String| s.len() >= 3),
    ///     Some("too short".to_string()),
    /// );
    ///
    /// let short = "ab".to_string();
    /// assert_eq!(
    ///     rules.evaluate(Some(&short), false),
    ///     ErrorState::invalid(Some("too short".to_string()))
    /// );
    /// assert_eq!(rules.evaluate(Some(&String::new()), true), ErrorState::valid());
    /// ```
    pub fn evaluate(&self, value: Option<&V>, empty_allowed: bool) -> ErrorState {
        if empty_allowed && value.is_none_or(FieldValue::is_empty) {
            return ErrorState::valid();
        }

        self.rules
            .iter()
            .find(|rule| !rule.validator.check(value))
            .map_or_else(ErrorState::valid, |failed| {
                ErrorState::invalid(failed.message.clone())
            })
    }
}

impl<V: FieldValue> Default for RuleSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: FieldValue> Clone for RuleSet<V> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

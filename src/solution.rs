//! The solution returned by the external solver.

use crate::variable::Variable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the solver reported for one variable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SolvedValue {
    /// The solved numeric value.
    Value(f64),
    /// The variable was not part of the solved subsystem; leave it untouched.
    NotConsidered,
}

/// A flat mapping from variable names to solved values.
///
/// Produced by the external solver, typically as a JSON
/// body, hence the serde derives. Variables absent from the mapping are
/// reported as [`SolvedValue::NotConsidered`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Solution {
    #[serde(flatten)]
    values: HashMap<String, f64>,
}

impl Solution {
    /// An empty solution; every lookup reports
    /// [`SolvedValue::NotConsidered`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a solved value for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Looks up the solved value for `variable` by its unique name.
    pub fn value(&self, variable: &Variable) -> SolvedValue {
        match self.values.get(variable.name()) {
            Some(&v) => SolvedValue::Value(v),
            None => SolvedValue::NotConsidered,
        }
    }

    /// Number of variables the solution covers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the solution covers no variables at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for Solution {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

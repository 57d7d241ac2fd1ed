//! Satisfying assignments read back from solver output

use crate::error::{EncodingError, Result};
use log::debug;

/// A (possibly partial) truth assignment indexed by variable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    values: Vec<Option<bool>>,
}

impl Model {
    /// Build a model from signed literals; `0` terminators are ignored
    pub fn from_literals<I: IntoIterator<Item = i32>>(literals: I) -> Self {
        let mut model = Self::default();
        for literal in literals {
            model.assign(literal);
        }
        model
    }

    /// Parse solver output.
    ///
    /// Accepts the competition format (`s SATISFIABLE` plus `v` lines), the
    /// MiniSat result file (`SAT` followed by literals) and bare literal lists.
    /// Comment lines starting with `c` are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut model = Self::default();
        let mut assigned = 0usize;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('c') {
                continue;
            }

            if let Some(status) = line.strip_prefix("s ") {
                match status.trim() {
                    "SATISFIABLE" => continue,
                    "UNSATISFIABLE" => return Err(EncodingError::Unsatisfiable),
                    other => {
                        return Err(EncodingError::InvalidModel(format!(
                            "solver reported {}",
                            other
                        )))
                    }
                }
            }
            match line {
                "SAT" => continue,
                "UNSAT" => return Err(EncodingError::Unsatisfiable),
                _ => {}
            }

            let body = line.strip_prefix('v').unwrap_or(line);
            for token in body.split_whitespace() {
                let literal: i32 = token.parse().map_err(|_| {
                    EncodingError::InvalidModel(format!(
                        "line {}: '{}' is not a literal",
                        line_no + 1,
                        token
                    ))
                })?;
                if literal != 0 {
                    model.assign(literal);
                    assigned += 1;
                }
            }
        }

        if assigned == 0 {
            return Err(EncodingError::InvalidModel(
                "no assignment found in solver output".to_string(),
            ));
        }
        debug!("Parsed model with {} literals over {} variables", assigned, model.max_variable());
        Ok(model)
    }

    fn assign(&mut self, literal: i32) {
        if literal == 0 {
            return;
        }
        let var = literal.unsigned_abs() as usize;
        if self.values.len() <= var {
            self.values.resize(var + 1, None);
        }
        self.values[var] = Some(literal > 0);
    }

    /// Value of a variable, `None` when the model leaves it unassigned
    pub fn value(&self, var: usize) -> Option<bool> {
        self.values.get(var).copied().flatten()
    }

    /// Whether a signed literal holds; unassigned variables count as false
    pub fn holds(&self, literal: i32) -> bool {
        let value = self
            .value(literal.unsigned_abs() as usize)
            .unwrap_or(false);
        if literal > 0 {
            value
        } else {
            !value
        }
    }

    /// Highest variable mentioned
    pub fn max_variable(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    pub fn assigned_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

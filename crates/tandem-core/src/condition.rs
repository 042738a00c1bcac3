//! Screening conditions: `"<field> <operator> <value>"`.
//!
//! ```text
//! Q1 == yes
//! Age >= 18
//! Comment does not contain spam
//! ```
//!
//! Operators are recognized only as whitespace-delimited tokens, and exactly
//! one operator may appear. Evaluation selects rows and never mutates the
//! table.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::{ConditionError, EvaluationError};
use crate::table::{ColumnKind, RespondentTable, Selection};

// ── Operator ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Gte,
    Lte,
    Contains,
    NotContains,
}

impl Operator {
    /// Every operator, in the order tokens are scanned.
    pub const ALL: [Self; 6] = [
        Self::Eq,
        Self::Ne,
        Self::Gte,
        Self::Lte,
        Self::NotContains,
        Self::Contains,
    ];

    /// The token that spells this operator in a condition string.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Contains => "contains",
            Self::NotContains => "does not contain",
        }
    }

    /// Whether the operator only makes sense on text columns.
    #[must_use]
    pub const fn is_text_only(self) -> bool {
        matches!(self, Self::Contains | Self::NotContains)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ── Condition ──────────────────────────────────────────────────────

/// A single parsed screening predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: String,
}

impl Condition {
    /// Parse `"<field> <operator> <value>"`.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError`] if no operator, more than one operator, or
    /// no field name is present.
    pub fn parse(input: &str) -> Result<Self, ConditionError> {
        let padded = format!(" {} ", input.trim());

        let found: Vec<(Operator, usize)> = Operator::ALL
            .iter()
            .flat_map(|&op| {
                token_positions(&padded, op.token())
                    .into_iter()
                    .map(move |pos| (op, pos))
            })
            .collect();

        let (operator, position) = match found.as_slice() {
            [] => {
                return Err(ConditionError::NoOperator {
                    condition: input.to_string(),
                });
            }
            [single] => *single,
            many => {
                return Err(ConditionError::AmbiguousOperator {
                    condition: input.to_string(),
                    found: many.iter().map(|(op, _)| op.token().to_string()).collect(),
                });
            }
        };

        let field = padded[..position].trim();
        let value = padded[position + operator.token().len()..].trim();
        if field.is_empty() {
            return Err(ConditionError::MissingField {
                condition: input.to_string(),
            });
        }

        Ok(Self {
            field: field.to_string(),
            operator,
            value: value.to_string(),
        })
    }

    /// Select the rows of `table` that satisfy this condition.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::UnknownField`] if the table has no such
    /// column, and [`EvaluationError::TextOperatorOnNonText`] if a text
    /// operator is applied to a numeric column.
    pub fn select(&self, table: &RespondentTable) -> Result<Selection, EvaluationError> {
        let kind = table
            .column_kind(&self.field)
            .ok_or_else(|| EvaluationError::UnknownField {
                field: self.field.clone(),
            })?;

        if self.operator.is_text_only() && kind == ColumnKind::Numeric {
            return Err(EvaluationError::TextOperatorOnNonText {
                field: self.field.clone(),
                operator: self.operator.token().to_string(),
            });
        }

        let numeric_value = match kind {
            ColumnKind::Numeric => self.value.parse::<f64>().ok(),
            ColumnKind::Text => None,
        };

        let positions = table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| self.matches(row.field(&self.field).unwrap_or(""), numeric_value))
            .map(|(i, _)| i)
            .collect();

        Ok(Selection::from_sorted(positions))
    }

    fn matches(&self, cell: &str, numeric_value: Option<f64>) -> bool {
        let ordering = || match numeric_value {
            Some(rhs) => cell.trim().parse::<f64>().ok().and_then(|lhs| lhs.partial_cmp(&rhs)),
            None => Some(cell.cmp(self.value.as_str())),
        };

        match self.operator {
            Operator::Eq => ordering() == Some(Ordering::Equal),
            Operator::Ne => ordering() != Some(Ordering::Equal),
            Operator::Gte => matches!(ordering(), Some(Ordering::Greater | Ordering::Equal)),
            Operator::Lte => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
            Operator::Contains => cell.contains(self.value.as_str()),
            Operator::NotContains => !cell.contains(self.value.as_str()),
        }
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Byte offsets of `token` in `padded` where it stands between whitespace.
fn token_positions(padded: &str, token: &str) -> Vec<usize> {
    padded
        .match_indices(token)
        .filter(|(pos, _)| {
            let before = padded[..*pos].chars().next_back();
            let after = padded[pos + token.len()..].chars().next();
            before.is_some_and(char::is_whitespace) && after.is_some_and(char::is_whitespace)
        })
        .map(|(pos, _)| pos)
        .collect()
}

/// Apply every condition and intersect the results in the order given.
///
/// An empty condition list selects every row.
///
/// # Errors
///
/// Returns the first [`EvaluationError`] encountered.
pub fn select_all(
    conditions: &[Condition],
    table: &RespondentTable,
) -> Result<Selection, EvaluationError> {
    let mut selected = Selection::all(table.len());
    for condition in conditions {
        selected = selected.intersect(&condition.select(table)?);
    }
    Ok(selected)
}

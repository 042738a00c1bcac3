//! Apply screening conditions to the aggregated stage-one table.

use serde::Serialize;

use crate::condition::Condition;
use crate::errors::{ConditionError, EvaluationError};
use crate::table::{RespondentTable, Selection};

/// The registered screening conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screener {
    conditions: Vec<Condition>,
}

/// Everyone who answered the screener, and everyone who passed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningOutcome {
    all: RespondentTable,
    qualified: RespondentTable,
}

impl Screener {
    #[must_use]
    pub const fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// Parse every condition string up front.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConditionError`]; no conditions are registered
    /// when any of them is malformed.
    pub fn parse<S: AsRef<str>>(conditions: &[S]) -> Result<Self, ConditionError> {
        let conditions = conditions
            .iter()
            .map(|c| Condition::parse(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { conditions })
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Filter `table` by every condition.
    ///
    /// Each condition is evaluated on its own against the full table and the
    /// resulting selections are reduced pairwise by row membership, so
    /// conditions over unrelated fields combine as a plain AND.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvaluationError`] raised by a condition.
    pub fn screen(&self, table: RespondentTable) -> Result<ScreeningOutcome, EvaluationError> {
        let selections = self
            .conditions
            .iter()
            .map(|condition| condition.select(&table))
            .collect::<Result<Vec<_>, _>>()?;

        let qualified = match selections.split_first() {
            None => table.clone(),
            Some((first, rest)) => {
                let selected: Selection = rest.iter().fold(first.clone(), |acc, next| acc.intersect(next));
                table.select(&selected)
            }
        };

        tracing::info!(
            respondents = table.len(),
            qualified = qualified.len(),
            conditions = self.conditions.len(),
            "screened responses"
        );

        Ok(ScreeningOutcome {
            all: table,
            qualified,
        })
    }
}

impl ScreeningOutcome {
    /// The unfiltered table.
    #[must_use]
    pub const fn all(&self) -> &RespondentTable {
        &self.all
    }

    /// Rows that passed every condition.
    #[must_use]
    pub const fn qualified(&self) -> &RespondentTable {
        &self.qualified
    }

    /// Everyone who answered the screener, deduplicated.
    #[must_use]
    pub fn all_respondents(&self) -> Vec<String> {
        self.all.respondent_ids()
    }

    /// Everyone who passed every condition, deduplicated.
    #[must_use]
    pub fn qualified_respondents(&self) -> Vec<String> {
        self.qualified.respondent_ids()
    }

    #[must_use]
    pub fn into_qualified(self) -> RespondentTable {
        self.qualified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::row;
    use pretty_assertions::assert_eq;

    fn table() -> RespondentTable {
        let mut table = RespondentTable::new(vec!["Q1".into(), "Q2".into(), "Q3".into()]);
        table.push(row("T1", "R1", "A1", &[("Q1", "yes"), ("Q2", "5"), ("Q3", "red")]));
        table.push(row("T1", "R2", "A2", &[("Q1", "no"), ("Q2", "9"), ("Q3", "blue")]));
        table.push(row("T1", "R3", "A3", &[("Q1", "yes"), ("Q2", "2"), ("Q3", "blue")]));
        table.push(row("T2", "R4", "B1", &[("Q1", "yes"), ("Q2", "7"), ("Q3", "green")]));
        table
    }

    #[test]
    fn no_conditions_qualifies_everyone() {
        let outcome = Screener::default().screen(table()).unwrap();
        assert_eq!(outcome.qualified_respondents(), outcome.all_respondents());
        assert_eq!(outcome.all_respondents(), vec!["R1", "R2", "R3", "R4"]);
    }

    #[test]
    fn conditions_intersect() {
        let screener = Screener::parse(&["Q1 == yes", "Q2 >= 5"]).unwrap();
        let outcome = screener.screen(table()).unwrap();
        assert_eq!(outcome.qualified_respondents(), vec!["R1", "R4"]);
        assert_eq!(outcome.all().len(), 4);
    }

    #[test]
    fn order_of_conditions_does_not_matter() {
        let forward = Screener::parse(&["Q1 == yes", "Q2 >= 5", "Q3 != red"]).unwrap();
        let backward = Screener::parse(&["Q3 != red", "Q2 >= 5", "Q1 == yes"]).unwrap();
        assert_eq!(
            forward.screen(table()).unwrap().qualified_respondents(),
            backward.screen(table()).unwrap().qualified_respondents()
        );
    }

    #[test]
    fn screening_is_idempotent() {
        let screener = Screener::parse(&["Q3 contains e", "Q2 <= 7"]).unwrap();
        let once = screener.screen(table()).unwrap();
        let twice = screener.screen(once.qualified().clone()).unwrap();
        assert_eq!(once.qualified(), twice.qualified());

        let again = screener.screen(table()).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn screening_is_idempotent_on_mixed_columns() {
        let mut mixed = RespondentTable::new(vec!["Q1".into(), "Q2".into()]);
        mixed.push(row("T1", "R1", "A1", &[("Q1", "yes"), ("Q2", "5")]));
        mixed.push(row("T1", "R2", "A2", &[("Q1", "no"), ("Q2", "n/a")]));

        let screener = Screener::parse(&["Q1 == yes", "Q2 >= 10"]).unwrap();
        let once = screener.screen(mixed).unwrap();
        let twice = screener.screen(once.qualified().clone()).unwrap();
        assert_eq!(once.qualified_respondents(), vec!["R1"]);
        assert_eq!(twice.qualified_respondents(), once.qualified_respondents());
    }

    #[test]
    fn text_operator_still_applies_after_filtering_out_text_values() {
        let mut mixed = RespondentTable::new(vec!["Q1".into(), "Q2".into()]);
        mixed.push(row("T1", "R1", "A1", &[("Q1", "yes"), ("Q2", "15")]));
        mixed.push(row("T1", "R2", "A2", &[("Q1", "no"), ("Q2", "n/a")]));

        let screener = Screener::parse(&["Q1 == yes", "Q2 contains 5"]).unwrap();
        let once = screener.screen(mixed).unwrap();
        let twice = screener.screen(once.qualified().clone()).unwrap();
        assert_eq!(once.qualified_respondents(), vec!["R1"]);
        assert_eq!(twice.qualified_respondents(), vec!["R1"]);
    }

    #[test]
    fn malformed_condition_registers_nothing() {
        let err = Screener::parse(&["Q1 == yes", "Q2 ~ 5"]).unwrap_err();
        assert!(matches!(err, ConditionError::NoOperator { .. }));
    }

    #[test]
    fn evaluation_errors_surface() {
        let screener = Screener::parse(&["Q2 contains 5"]).unwrap();
        assert!(matches!(
            screener.screen(table()),
            Err(EvaluationError::TextOperatorOnNonText { .. })
        ));
    }
}

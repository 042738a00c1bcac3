//! Row-per-respondent tables built from stage-one submissions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Column name under which conditions can address the task identifier.
pub const TASK_ID: &str = "task_id";
/// Column name under which conditions can address the respondent identifier.
pub const RESPONDENT_ID: &str = "respondent_id";
/// Column name under which conditions can address the submission identifier.
pub const SUBMISSION_ID: &str = "submission_id";

const IDENTITY_COLUMNS: [&str; 3] = [TASK_ID, RESPONDENT_ID, SUBMISSION_ID];

// ── Rows ───────────────────────────────────────────────────────────

/// Identity of a single submission: `(task, respondent, submission)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowKey {
    pub task_id: String,
    pub respondent_id: String,
    pub submission_id: String,
}

/// One respondent's submission with the answers to every requested question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRow {
    pub task_id: String,
    pub respondent_id: String,
    pub submission_id: String,
    pub answers: BTreeMap<String, String>,
}

impl ResponseRow {
    #[must_use]
    pub fn key(&self) -> RowKey {
        RowKey {
            task_id: self.task_id.clone(),
            respondent_id: self.respondent_id.clone(),
            submission_id: self.submission_id.clone(),
        }
    }

    /// Look up a field by column name, including the identity columns.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            TASK_ID => Some(&self.task_id),
            RESPONDENT_ID => Some(&self.respondent_id),
            SUBMISSION_ID => Some(&self.submission_id),
            question => self.answers.get(question).map(String::as_str),
        }
    }
}

// ── Column kinds ───────────────────────────────────────────────────

/// How the values of a column compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Numeric,
}

// ── Selection ──────────────────────────────────────────────────────

/// Ascending, duplicate-free row positions into a [`RespondentTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Vec<usize>);

impl Selection {
    /// Every row of a table with `len` rows.
    #[must_use]
    pub fn all(len: usize) -> Self {
        Self((0..len).collect())
    }

    pub(crate) fn from_sorted(positions: Vec<usize>) -> Self {
        debug_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        Self(positions)
    }

    /// Keep only the positions that are also in `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let keep: HashSet<usize> = other.0.iter().copied().collect();
        Self(self.0.iter().copied().filter(|i| keep.contains(i)).collect())
    }

    #[must_use]
    pub fn contains(&self, position: usize) -> bool {
        self.0.binary_search(&position).is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

// ── Table ──────────────────────────────────────────────────────────

/// Ordered rows with the union of all question columns.
///
/// Column kinds are settled as rows are pushed and travel with the table
/// through [`select`](Self::select), so filtering never reclassifies a column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RespondentTable {
    questions: Vec<String>,
    rows: Vec<ResponseRow>,
    #[serde(skip)]
    keys: HashSet<RowKey>,
    #[serde(skip)]
    kinds: BTreeMap<String, ColumnKind>,
}

impl RespondentTable {
    /// An empty table with the given question columns.
    #[must_use]
    pub fn new(questions: Vec<String>) -> Self {
        Self {
            questions,
            ..Self::default()
        }
    }

    /// Append a row. Questions the table has not seen yet become columns.
    ///
    /// Rows whose identity key is already present are ignored, so the table
    /// never holds two rows for the same submission.
    pub fn push(&mut self, row: ResponseRow) -> bool {
        if !self.keys.insert(row.key()) {
            return false;
        }
        for (question, value) in &row.answers {
            if !self.questions.iter().any(|q| q == question) {
                self.questions.push(question.clone());
            }
            let kind = classify(value);
            self.kinds
                .entry(question.clone())
                .and_modify(|existing| {
                    if kind == ColumnKind::Text {
                        *existing = ColumnKind::Text;
                    }
                })
                .or_insert(kind);
        }
        self.rows.push(row);
        true
    }

    /// Stack tables on top of each other (union, not join).
    ///
    /// Rows go through [`push`](Self::push), so a submission present in
    /// more than one table is kept once.
    #[must_use]
    pub fn concat(tables: impl IntoIterator<Item = Self>) -> Self {
        let mut merged = Self::default();
        for table in tables {
            for question in table.questions {
                if !merged.questions.contains(&question) {
                    merged.questions.push(question);
                }
            }
            for row in table.rows {
                merged.push(row);
            }
            for (question, kind) in table.kinds {
                if kind == ColumnKind::Text {
                    merged.kinds.insert(question, kind);
                }
            }
        }
        merged
    }

    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    #[must_use]
    pub fn rows(&self) -> &[ResponseRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `name` is an identity column or a question column.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        IDENTITY_COLUMNS.contains(&name) || self.questions.iter().any(|q| q == name)
    }

    /// Classify a column. A question column is numeric when it had at least
    /// one value and every value pushed so far parsed as a finite number.
    /// Identity columns are text.
    #[must_use]
    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        if !self.has_column(name) {
            return None;
        }
        if IDENTITY_COLUMNS.contains(&name) {
            return Some(ColumnKind::Text);
        }
        Some(self.kinds.get(name).copied().unwrap_or(ColumnKind::Text))
    }

    /// Copy the selected rows into a new table with the same columns and
    /// column kinds.
    #[must_use]
    pub fn select(&self, selection: &Selection) -> Self {
        let rows: Vec<ResponseRow> = selection
            .iter()
            .filter_map(|i| self.rows.get(i).cloned())
            .collect();
        Self {
            questions: self.questions.clone(),
            keys: rows.iter().map(ResponseRow::key).collect(),
            kinds: self.kinds.clone(),
            rows,
        }
    }

    /// Respondent identifiers in first-seen order, without duplicates.
    #[must_use]
    pub fn respondent_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|row| seen.insert(row.respondent_id.as_str()))
            .map(|row| row.respondent_id.clone())
            .collect()
    }
}

fn classify(value: &str) -> ColumnKind {
    if value.trim().parse::<f64>().is_ok_and(f64::is_finite) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

#[cfg(test)]
pub(crate) fn row(task: &str, respondent: &str, submission: &str, answers: &[(&str, &str)]) -> ResponseRow {
    ResponseRow {
        task_id: task.to_string(),
        respondent_id: respondent.to_string(),
        submission_id: submission.to_string(),
        answers: answers
            .iter()
            .map(|(q, a)| ((*q).to_string(), (*a).to_string()))
            .collect(),
    }
}

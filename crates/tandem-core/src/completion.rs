//! Stage-two completion data.

use serde::Serialize;
use std::path::PathBuf;

use crate::collaborators::CompletionSource;
use crate::errors::CompletionError;

/// A header row plus string rows, as read from a form-response sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletionTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CompletionTable {
    /// Build from raw cell values; the first row is the header.
    ///
    /// Short rows are padded with empty cells and cells beyond the header
    /// width are dropped, so every row has exactly one cell per header.
    #[must_use]
    pub fn from_values(values: Vec<Vec<String>>) -> Self {
        let mut values = values.into_iter();
        let Some(headers) = values.next() else {
            return Self::default();
        };

        let width = headers.len();
        let rows = values
            .map(|mut row| {
                if row.len() > width {
                    tracing::debug!(cells = row.len(), width, "dropping cells beyond header width");
                }
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { headers, rows }
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
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

    /// Position of a header, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Every value in the named column, in row order.
    ///
    /// A table without a header row yields no values.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::MissingColumn`] if the header row exists
    /// but does not contain `name`.
    pub fn column(&self, name: &str) -> Result<Vec<&str>, CompletionError> {
        if self.headers.is_empty() {
            return Ok(Vec::new());
        }
        let index = self
            .column_index(name)
            .ok_or_else(|| CompletionError::MissingColumn {
                column: name.to_string(),
            })?;
        Ok(self.rows.iter().map(|row| row[index].as_str()).collect())
    }
}

// ── CSV provider ───────────────────────────────────────────────────

/// Completion data exported from a form provider as a CSV file with a
/// header row.
#[derive(Debug, Clone)]
pub struct CsvCompletionSource {
    path: PathBuf,
}

impl CsvCompletionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<CompletionTable, CompletionError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| CompletionError::Unavailable(format!("{}: {e}", self.path.display())))?;

        let mut values = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CompletionError::Malformed(e.to_string()))?;
            values.push(record.iter().map(str::to_string).collect());
        }
        Ok(CompletionTable::from_values(values))
    }
}

impl CompletionSource for CsvCompletionSource {
    async fn fetch_completions(&self) -> Result<CompletionTable, CompletionError> {
        let table = self.read()?;
        tracing::debug!(path = %self.path.display(), rows = table.len(), "read completion CSV");
        Ok(table)
    }
}

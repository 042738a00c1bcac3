//! Join screener rows with stage-two responses and export them as CSV.

use serde::Serialize;
use std::path::Path;

use crate::completion::CompletionTable;
use crate::errors::{CompletionError, ExportError};
use crate::table::{RESPONDENT_ID, RespondentTable, SUBMISSION_ID, TASK_ID};

/// Appended to stage-two column names that clash with screener columns.
pub const COLLISION_SUFFIX: &str = "_completion";

/// Screener rows joined with their stage-two responses, keyed by respondent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MergedTable {
    /// Inner-join `qualified` with `completions` on
    /// `respondent_id == completions[respondent_column]`.
    ///
    /// The join column itself is dropped and `respondent_id` leads every row.
    /// A respondent with several stage-two rows appears once per row.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::MissingColumn`] if the completion table has
    /// a header row without `respondent_column`.
    pub fn join(
        qualified: &RespondentTable,
        completions: &CompletionTable,
        respondent_column: &str,
    ) -> Result<Self, CompletionError> {
        let mut headers: Vec<String> = [RESPONDENT_ID, TASK_ID, SUBMISSION_ID]
            .iter()
            .map(|h| (*h).to_string())
            .collect();
        headers.extend(qualified.questions().iter().cloned());

        if completions.headers().is_empty() {
            tracing::warn!("no data found in completion source; merged table is empty");
            return Ok(Self {
                headers,
                rows: Vec::new(),
            });
        }

        let join_index = completions
            .column_index(respondent_column)
            .ok_or_else(|| CompletionError::MissingColumn {
                column: respondent_column.to_string(),
            })?;

        let kept: Vec<usize> = (0..completions.headers().len())
            .filter(|&i| i != join_index)
            .collect();
        for &i in &kept {
            let name = &completions.headers()[i];
            if headers.contains(name) {
                headers.push(format!("{name}{COLLISION_SUFFIX}"));
            } else {
                headers.push(name.clone());
            }
        }

        let mut rows = Vec::new();
        for row in qualified.rows() {
            for completion in completions
                .rows()
                .iter()
                .filter(|c| c[join_index] == row.respondent_id)
            {
                let mut merged = vec![
                    row.respondent_id.clone(),
                    row.task_id.clone(),
                    row.submission_id.clone(),
                ];
                merged.extend(
                    qualified
                        .questions()
                        .iter()
                        .map(|q| row.field(q).unwrap_or_default().to_string()),
                );
                merged.extend(kept.iter().map(|&i| completion[i].clone()));
                rows.push(merged);
            }
        }

        tracing::info!(rows = rows.len(), columns = headers.len(), "merged screener and completion data");
        Ok(Self { headers, rows })
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

    /// The leading `respondent_id` of every row.
    #[must_use]
    pub fn respondent_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row[0].as_str()).collect()
    }

    /// Write the table as CSV with a header row.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the file cannot be created or written.
    pub fn write_csv(&self, path: &Path) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        tracing::info!(path = %path.display(), rows = self.rows.len(), "exported merged table");
        Ok(())
    }

    /// Read back a file written by [`write_csv`](Self::write_csv).
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the file cannot be read or parsed.
    pub fn read_csv(path: &Path) -> Result<Self, ExportError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()?;
        Ok(Self { headers, rows })
    }
}

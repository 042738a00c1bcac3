//! Paginated listing of submitted assignments.

use tandem_core::collaborators::{Assignment, QuestionAnswer};

use crate::{MarketClient, error::MarketClientError, http::check_response};

#[derive(serde::Deserialize)]
struct AssignmentsResponse {
    #[serde(default)]
    assignments: Vec<AssignmentInfo>,
}

#[derive(serde::Deserialize)]
struct AssignmentInfo {
    assignment_id: String,
    worker_id: String,
    #[serde(default)]
    answers: Vec<AnswerInfo>,
}

#[derive(serde::Deserialize)]
struct AnswerInfo {
    question_id: String,
    #[serde(default)]
    fields: Vec<String>,
}

impl AssignmentInfo {
    fn into_assignment(self, task_id: &str) -> Assignment {
        Assignment {
            assignment_id: self.assignment_id,
            worker_id: self.worker_id,
            task_id: task_id.to_string(),
            answers: self
                .answers
                .into_iter()
                .map(|a| QuestionAnswer {
                    question_id: a.question_id,
                    fields: a.fields,
                })
                .collect(),
        }
    }
}

impl MarketClient {
    /// One page of submitted assignments for `task_id`. Pages start at 1.
    ///
    /// # Errors
    ///
    /// Returns [`MarketClientError`] if the request fails, the gateway returns
    /// a non-success status, or the page cannot be parsed.
    pub async fn assignments_page(
        &self,
        task_id: &str,
        page_size: u32,
        page_number: u32,
    ) -> Result<Vec<Assignment>, MarketClientError> {
        let path = format!(
            "/v1/tasks/{}/assignments?page_size={page_size}&page_number={page_number}",
            urlencoding::encode(task_id)
        );
        let resp = check_response(self.get(&path).send().await?).await?;

        let data: AssignmentsResponse = resp.json().await?;
        tracing::debug!(
            task_id,
            page = page_number,
            count = data.assignments.len(),
            "fetched assignment page"
        );
        Ok(data
            .assignments
            .into_iter()
            .map(|a| a.into_assignment(task_id))
            .collect())
    }
}

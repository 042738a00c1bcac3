//! Fetch paginated submissions and join them into one row per respondent.

use std::collections::{HashMap, HashSet};

use crate::collaborators::{Assignment, Marketplace};
use crate::errors::MarketplaceError;
use crate::table::{RespondentTable, ResponseRow, RowKey};

/// Assignments requested per page.
pub const PAGE_SIZE: u32 = 100;

/// Fetch every submitted assignment for a task.
///
/// Pages are requested from 1 upwards until the marketplace returns an empty
/// page. There is no page cap: an upstream that never returns an empty page
/// will keep this loop running.
///
/// # Errors
///
/// Returns the first [`MarketplaceError`] from any page request.
pub async fn fetch_all_assignments<M: Marketplace>(
    market: &M,
    task_id: &str,
) -> Result<Vec<Assignment>, MarketplaceError> {
    let mut assignments = Vec::new();
    let mut page = 1;
    loop {
        let batch = market.list_assignments(task_id, PAGE_SIZE, page).await?;
        if batch.is_empty() {
            break;
        }
        tracing::debug!(task_id, page, count = batch.len(), "fetched assignment page");
        assignments.extend(batch);
        page += 1;
    }
    Ok(assignments)
}

/// The answers to a single question, keyed by submission, in fetch order.
fn question_answers(task_id: &str, question: &str, assignments: &[Assignment]) -> Vec<(RowKey, String)> {
    let mut seen = HashSet::new();
    assignments
        .iter()
        .filter_map(|assignment| {
            let answer = assignment.answer(question)?;
            let key = RowKey {
                task_id: task_id.to_string(),
                respondent_id: assignment.worker_id.clone(),
                submission_id: assignment.assignment_id.clone(),
            };
            seen.insert(key.clone()).then(|| (key, answer.to_string()))
        })
        .collect()
}

/// Inner-join per-question answers on `(task, respondent, submission)`.
///
/// A submission missing an answer to any requested question is dropped.
/// No questions, or nothing surviving the join, yields an empty table and a
/// warning rather than an error.
#[must_use]
pub fn merge_answers(task_id: &str, questions: &[String], assignments: &[Assignment]) -> RespondentTable {
    let mut table = RespondentTable::new(questions.to_vec());

    let Some((first, rest)) = questions.split_first() else {
        tracing::warn!(task_id, "no questions requested; there are no results");
        return table;
    };

    let mut joined: Vec<(RowKey, Vec<(String, String)>)> = question_answers(task_id, first, assignments)
        .into_iter()
        .map(|(key, answer)| (key, vec![(first.clone(), answer)]))
        .collect();

    for question in rest {
        let mut answers: HashMap<RowKey, String> =
            question_answers(task_id, question, assignments).into_iter().collect();
        joined.retain_mut(|(key, row)| match answers.remove(key) {
            Some(answer) => {
                row.push((question.clone(), answer));
                true
            }
            None => false,
        });
    }

    for (key, answers) in joined {
        table.push(ResponseRow {
            task_id: key.task_id,
            respondent_id: key.respondent_id,
            submission_id: key.submission_id,
            answers: answers.into_iter().collect(),
        });
    }

    if table.is_empty() {
        tracing::warn!(
            task_id,
            assignments = assignments.len(),
            "no submissions answered every requested question; there are no results"
        );
    }
    table
}

/// Fetch and join the responses for one task.
///
/// # Errors
///
/// Propagates [`MarketplaceError`] from pagination.
pub async fn aggregate_task<M: Marketplace>(
    market: &M,
    task_id: &str,
    questions: &[String],
) -> Result<RespondentTable, MarketplaceError> {
    let assignments = fetch_all_assignments(market, task_id).await?;
    tracing::info!(task_id, assignments = assignments.len(), "fetched submissions");
    Ok(merge_answers(task_id, questions, &assignments))
}

/// Fetch and join every task, then stack the per-task tables.
///
/// A task id listed more than once is fetched once.
///
/// # Errors
///
/// Propagates [`MarketplaceError`] from pagination.
pub async fn aggregate_tasks<M: Marketplace>(
    market: &M,
    task_ids: &[String],
    questions: &[String],
) -> Result<RespondentTable, MarketplaceError> {
    let mut seen = HashSet::new();
    let mut tables = Vec::with_capacity(task_ids.len());
    for task_id in task_ids.iter().filter(|id| seen.insert(id.as_str())) {
        tables.push(aggregate_task(market, task_id, questions).await?);
    }
    Ok(RespondentTable::concat(tables))
}

// File: ./src/scheduler.rs
//! Walks the day's task trees and stages every due task with the sink.
//!
//! Traversal is depth-first, parent before children, children in
//! declaration order, and strictly sequential: a child needs the
//! identifier its parent was assigned, and the sink is one shared
//! rate-limited resource. A submission failure abandons the failed
//! node's subtree only; its siblings continue, at every depth.
//! Configuration errors discovered mid-walk abort the run before
//! anything is committed.

use crate::client::{SubmissionRequest, SubmissionSink, SubmissionTarget};
use crate::data::Schedule;
use crate::error::ScheduleError;
use crate::model::semester::WeekStatus;
use crate::model::task::Task;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

/// What one run did, grouped by subject code for reporting.
#[derive(Debug)]
pub struct RunReport {
    /// Weekday name of the run, e.g. "Tuesday".
    pub today: String,
    pub week: WeekStatus,
    /// Subject code to human-readable descriptions, in submission order.
    pub added: BTreeMap<String, Vec<String>>,
    /// One entry per abandoned subtree, attributable by subject code.
    pub failures: Vec<String>,
}

impl RunReport {
    fn new(today: NaiveDate, week: WeekStatus) -> Self {
        Self {
            today: today.format("%A").to_string(),
            week,
            added: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn total_added(&self) -> usize {
        self.added.values().map(Vec::len).sum()
    }
}

/// Runs one scheduling pass for `today` and commits the staged batch.
///
/// Out-of-semester and break days are normal terminal outcomes: the report
/// comes back empty and nothing is sent, not even an empty commit.
pub async fn run<S: SubmissionSink>(
    schedule: &mut Schedule,
    sink: &mut S,
    today: NaiveDate,
    timezone: &str,
) -> Result<RunReport, ScheduleError> {
    let week = schedule.semester.current_week(today);
    let mut report = RunReport::new(today, week);

    let current_week = match week {
        WeekStatus::OutOfSemester => {
            log::info!("{today} is outside the semester; no tasks staged");
            return Ok(report);
        }
        WeekStatus::MidsemBreak => {
            log::info!("{today} falls in the midsemester break; no tasks staged");
            return Ok(report);
        }
        WeekStatus::Teaching(n) => n,
    };
    log::info!("teaching week {current_week}, {}", report.today);

    if let Some(roots) = schedule.tasks.get_mut(&today.weekday()) {
        for task in roots.iter_mut() {
            let outcome =
                submit_tree(task, sink, current_week, today, timezone, None, &mut report).await;
            match outcome {
                Ok(()) => {}
                Err(e @ ScheduleError::Submission(_)) => {
                    log::warn!("abandoning '{}' task tree: {e}", task.subject.code);
                    report.failures.push(format!("{}: {e}", task.subject.code));
                }
                // Configuration errors are fatal; nothing has been committed.
                Err(e) => return Err(e),
            }
        }
    }

    sink.commit().await?;
    Ok(report)
}

// Boxed return type because the traversal recurses through an async call.
fn submit_tree<'a, S: SubmissionSink>(
    task: &'a mut Task,
    sink: &'a mut S,
    current_week: u32,
    today: NaiveDate,
    timezone: &'a str,
    parent_id: Option<&'a str>,
    report: &'a mut RunReport,
) -> Pin<Box<dyn Future<Output = Result<(), ScheduleError>> + 'a>> {
    Box::pin(async move {
        if !task.is_in_week(current_week) {
            log::debug!(
                "'{}' not due in week {current_week}; skipped",
                task.subject.code
            );
            return Ok(());
        }

        let name = task.resolve_name(current_week, today)?;
        if name.is_empty() {
            // Blank curriculum slot this cycle. Subtasks are only meaningful
            // under a task that exists, so the whole subtree is skipped.
            log::debug!("'{}' has no session this cycle; skipped", task.subject.code);
            return Ok(());
        }

        let target = match parent_id {
            Some(id) => SubmissionTarget::Parent(id.to_string()),
            None => SubmissionTarget::Project(task.subject.project_id),
        };
        let request = SubmissionRequest {
            name: name.clone(),
            priority: task.priority,
            due_string: task.due_string(),
            timezone: timezone.to_string(),
            target,
            section_id: task.section_id,
        };

        let assigned = sink.submit(&request).await?;
        task.set_external_id(assigned.clone());
        report
            .added
            .entry(task.subject.code.clone())
            .or_default()
            .push(format!("'{}' due {}", name, task.due_string()));

        for subtask in task.subtasks.iter_mut() {
            let outcome = submit_tree(
                subtask,
                sink,
                current_week,
                today,
                timezone,
                Some(&assigned),
                report,
            )
            .await;
            match outcome {
                Ok(()) => {}
                Err(e @ ScheduleError::Submission(_)) => {
                    log::warn!(
                        "abandoning subtask tree under '{}': {e}",
                        subtask.subject.code
                    );
                    report.failures.push(format!("{}: {e}", subtask.subject.code));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    })
}

// File: ./src/client/sink.rs
//! The boundary between the scheduler and the external task service.

use crate::error::ScheduleError;

/// Where a staged task attaches in the external system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionTarget {
    /// Root tasks land in their subject's project.
    Project(u64),
    /// Subtasks attach to the identifier their parent was assigned.
    Parent(String),
}

/// Everything the external service needs to create one task.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub name: String,
    pub priority: u8,
    pub due_string: String,
    pub timezone: String,
    pub target: SubmissionTarget,
    pub section_id: Option<u64>,
}

/// A stateful, rate-limited remote resource. Submissions are staged one at
/// a time (parents strictly before their children, since children reference
/// the parent's identifier) and flushed as a single batch by `commit`,
/// invoked once per run after all trees are walked.
#[allow(async_fn_in_trait)]
pub trait SubmissionSink {
    /// Stages one task; returns the identifier subtasks should attach to.
    async fn submit(&mut self, request: &SubmissionRequest) -> Result<String, ScheduleError>;

    /// Finalizes the staged batch.
    async fn commit(&mut self) -> Result<(), ScheduleError>;
}

/// Sink that only logs what would be sent. Backs `--dry-run`.
#[derive(Debug, Default)]
pub struct DryRunSink {
    staged: usize,
}

impl SubmissionSink for DryRunSink {
    async fn submit(&mut self, request: &SubmissionRequest) -> Result<String, ScheduleError> {
        self.staged += 1;
        log::info!(
            "[dry-run] would stage '{}' (priority {}, due {}, target {:?})",
            request.name,
            request.priority,
            request.due_string,
            request.target
        );
        Ok(format!("dry-{}", self.staged))
    }

    async fn commit(&mut self) -> Result<(), ScheduleError> {
        log::info!("[dry-run] {} task(s) staged, nothing sent", self.staged);
        Ok(())
    }
}

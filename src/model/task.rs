// File: ./src/model/task.rs
use crate::error::ScheduleError;
use crate::model::namegen::NameGenerator;
use crate::model::subject::Subject;
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

/// One recurring schedule entry, possibly owning a tree of subtasks.
///
/// Subtasks are owned by their parent's `subtasks` vector, which makes the
/// hierarchy a tree by construction: a child moves into exactly one parent
/// and cannot be shared or reattached. The parent's assigned identifier is
/// threaded down to children during submission.
#[derive(Debug, Clone)]
pub struct Task {
    pub subject: Arc<Subject>,
    /// Free-text day label, e.g. "Today" or "Next Monday".
    pub due_day: String,
    /// Free-text time-of-day label, e.g. "2:15pm".
    pub time: String,
    /// 1 (lowest) to 4 (highest).
    pub priority: u8,
    /// Literal name. Ignored when `name_gen` is set.
    pub name: String,
    pub name_gen: Option<Arc<NameGenerator>>,
    /// Week allowlist, or blocklist when `exclude_weeks`. Empty = every week.
    pub weeks: Vec<u32>,
    pub exclude_weeks: bool,
    pub section_id: Option<u64>,
    pub subtasks: Vec<Task>,
    /// Identifier assigned by the sink when this task is staged. Write-once.
    pub external_id: Option<String>,
}

impl Task {
    pub fn new(subject: Arc<Subject>, time: &str) -> Self {
        Self {
            subject,
            due_day: "Today".to_string(),
            time: time.to_string(),
            priority: 1,
            name: String::new(),
            name_gen: None,
            weeks: Vec::new(),
            exclude_weeks: false,
            section_id: None,
            subtasks: Vec::new(),
            external_id: None,
        }
    }

    /// Clamps into the valid priority range rather than rejecting.
    pub fn set_priority(&mut self, priority: i64) {
        self.priority = priority.clamp(1, 4) as u8;
    }

    pub fn add_subtask(&mut self, subtask: Task) {
        self.subtasks.push(subtask);
    }

    /// Whether this task is due in the given teaching week (always >= 1 by
    /// the time this runs; break and out-of-semester days never get here).
    pub fn is_in_week(&self, current_week: u32) -> bool {
        if self.weeks.is_empty() {
            return true;
        }
        let member = self.weeks.contains(&current_week);
        if self.exclude_weeks { !member } else { member }
    }

    /// Resolves the display name for this week.
    ///
    /// A generator takes precedence and may yield an empty string, meaning
    /// the slot is blank and the task is skipped this cycle. Literal names
    /// fall back to "Class" and carry today's date when due "Today".
    pub fn resolve_name(&self, current_week: u32, today: NaiveDate) -> Result<String, ScheduleError> {
        if let Some(generator) = &self.name_gen {
            let hint = self.due_day.replace("Today", "");
            return generator.generate(current_week, today, &hint);
        }
        let mut name = if self.name.is_empty() {
            "Class".to_string()
        } else {
            self.name.clone()
        };
        if self.due_day == "Today" {
            name.push_str(&today.format(", %a %d %B").to_string());
        }
        Ok(name)
    }

    /// The due string handed to the external service, e.g. "Next Monday 2:15pm".
    pub fn due_string(&self) -> String {
        format!("{} {}", self.due_day, self.time)
    }

    pub(crate) fn set_external_id(&mut self, id: String) {
        debug_assert!(self.external_id.is_none(), "external_id is write-once");
        self.external_id = Some(id);
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task: {} due {}", self.subject.code, self.due_string())?;
        if !self.weeks.is_empty() {
            write!(
                f,
                " ({} weeks {:?})",
                if self.exclude_weeks { "not in" } else { "in" },
                self.weeks
            )?;
        }
        Ok(())
    }
}

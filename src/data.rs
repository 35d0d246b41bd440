// File: ./src/data.rs
//! On-disk schedule definitions and their resolution into the model.
//!
//! Two TOML files describe a run: `semester.toml` (the calendar window)
//! and `schedule.toml` (subjects, name generators, and the day-keyed task
//! definitions). References between them resolve here, before scheduling
//! begins, so a dangling subject code or generator name fails the run
//! without touching the network.

use crate::error::{ReferenceKind, ScheduleError};
use crate::model::namegen::{NameGenerator, parse_weekday};
use crate::model::semester::Semester;
use crate::model::subject::Subject;
use crate::model::task::Task;
use chrono::{NaiveDate, Weekday};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub const SEMESTER_FILE: &str = "semester.toml";
pub const SCHEDULE_FILE: &str = "schedule.toml";

// --- On-disk records ---

/// ```toml
/// start = "2020-08-03"
/// end = "2020-11-01"
/// [break]
/// start = "2020-10-05"
/// end = "2020-10-11"
/// ```
#[derive(Debug, Deserialize)]
pub struct SemesterFile {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(rename = "break")]
    pub midsem: BreakWindow,
}

#[derive(Debug, Deserialize)]
pub struct BreakWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleFile {
    pub subjects: Vec<SubjectDef>,
    #[serde(default)]
    pub generators: HashMap<String, GeneratorDef>,
    /// Weekday name to the root task definitions anchored on that day.
    #[serde(default)]
    pub tasks: HashMap<String, Vec<TaskDef>>,
}

#[derive(Debug, Deserialize)]
pub struct SubjectDef {
    pub code: String,
    pub name: String,
    pub project_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct GeneratorDef {
    #[serde(default)]
    pub prefix: String,
    /// Ordered session titles; empty strings are placeholder slots.
    pub list: Vec<String>,
    pub days_of_week: Vec<String>,
    #[serde(default)]
    pub num_after_prefix: bool,
    #[serde(default)]
    pub use_date: bool,
}

fn default_priority() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct TaskDef {
    /// Subject code. Optional on subtasks, which inherit the parent's.
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub due_day: Option<String>,
    #[serde(default)]
    pub weeks: Vec<u32>,
    #[serde(default)]
    pub exclude_weeks: bool,
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub name_generator: Option<String>,
    #[serde(default)]
    pub section_id: Option<u64>,
    #[serde(default)]
    pub subtasks: Vec<TaskDef>,
}

// --- Resolved schedule ---

/// Everything one run needs, fully cross-referenced.
#[derive(Debug)]
pub struct Schedule {
    pub semester: Arc<Semester>,
    pub subjects: HashMap<String, Arc<Subject>>,
    pub tasks: HashMap<Weekday, Vec<Task>>,
}

impl Schedule {
    /// Reads and resolves `semester.toml` + `schedule.toml` from a directory.
    pub fn load(dir: &Path) -> Result<Self, ScheduleError> {
        let semester_raw = read_file(&dir.join(SEMESTER_FILE))?;
        let schedule_raw = read_file(&dir.join(SCHEDULE_FILE))?;
        Self::from_strs(&semester_raw, &schedule_raw)
    }

    pub fn from_strs(semester_toml: &str, schedule_toml: &str) -> Result<Self, ScheduleError> {
        let semester_file: SemesterFile = parse_toml(SEMESTER_FILE, semester_toml)?;
        let schedule_file: ScheduleFile = parse_toml(SCHEDULE_FILE, schedule_toml)?;
        Self::resolve(semester_file, schedule_file)
    }

    /// Cross-references the raw definitions into the model.
    pub fn resolve(
        semester_file: SemesterFile,
        schedule_file: ScheduleFile,
    ) -> Result<Self, ScheduleError> {
        let semester = Arc::new(Semester::new(
            semester_file.start,
            semester_file.end,
            semester_file.midsem.start,
            semester_file.midsem.end,
        )?);

        let mut generators: HashMap<String, Arc<NameGenerator>> = HashMap::new();
        for (name, def) in schedule_file.generators {
            let days = def
                .days_of_week
                .iter()
                .map(|d| parse_weekday(d))
                .collect::<Result<Vec<_>, _>>()?;
            let generator =
                NameGenerator::new(&def.prefix, def.list, days, def.num_after_prefix, def.use_date)?;
            generators.insert(name, Arc::new(generator));
        }

        let mut subjects: HashMap<String, Arc<Subject>> = HashMap::new();
        for def in &schedule_file.subjects {
            let subject = Subject::new(&def.code, &def.name, def.project_id, semester.clone());
            subjects.insert(subject.code.clone(), Arc::new(subject));
        }

        let mut tasks: HashMap<Weekday, Vec<Task>> = HashMap::new();
        for (day_name, defs) in schedule_file.tasks {
            let day = parse_weekday(&day_name)?;
            let resolved = defs
                .into_iter()
                .map(|def| resolve_task(def, None, &subjects, &generators))
                .collect::<Result<Vec<_>, _>>()?;
            tasks.entry(day).or_default().extend(resolved);
        }

        Ok(Self {
            semester,
            subjects,
            tasks,
        })
    }

    pub fn tasks_for(&self, day: Weekday) -> &[Task] {
        self.tasks.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn resolve_task(
    def: TaskDef,
    inherited_subject: Option<Arc<Subject>>,
    subjects: &HashMap<String, Arc<Subject>>,
    generators: &HashMap<String, Arc<NameGenerator>>,
) -> Result<Task, ScheduleError> {
    let subject = match &def.subject {
        Some(code) => subjects
            .get(&code.to_lowercase())
            .cloned()
            .ok_or_else(|| ScheduleError::UnknownReference {
                kind: ReferenceKind::Subject,
                name: code.clone(),
            })?,
        None => inherited_subject.ok_or_else(|| {
            ScheduleError::Configuration("root task definition is missing a subject".to_string())
        })?,
    };

    let mut task = Task::new(subject.clone(), &def.time);
    if let Some(due_day) = def.due_day
        && !due_day.is_empty()
    {
        task.due_day = due_day;
    }
    if let Some(name) = def.name {
        task.name = name;
    }
    if let Some(generator_name) = &def.name_generator {
        let generator = generators.get(generator_name).cloned().ok_or_else(|| {
            ScheduleError::UnknownReference {
                kind: ReferenceKind::Generator,
                name: generator_name.clone(),
            }
        })?;
        task.name_gen = Some(generator);
    }
    task.set_priority(def.priority);
    task.weeks = def.weeks;
    task.exclude_weeks = def.exclude_weeks;
    task.section_id = def.section_id;

    for subtask_def in def.subtasks {
        let subtask = resolve_task(subtask_def, Some(subject.clone()), subjects, generators)?;
        task.add_subtask(subtask);
    }
    Ok(task)
}

fn read_file(path: &Path) -> Result<String, ScheduleError> {
    std::fs::read_to_string(path).map_err(|e| ScheduleError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn parse_toml<T: serde::de::DeserializeOwned>(name: &str, raw: &str) -> Result<T, ScheduleError> {
    toml::from_str(raw).map_err(|e| ScheduleError::Parse {
        path: name.to_string(),
        message: e.to_string(),
    })
}

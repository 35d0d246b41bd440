// File: tests/submission_tree.rs
//! Orchestrator behavior: traversal order, partial failure, aggregation.

use chrono::{NaiveDate, Weekday};
use semtask::client::{SubmissionRequest, SubmissionSink, SubmissionTarget};
use semtask::data::Schedule;
use semtask::error::ScheduleError;
use semtask::model::{NameGenerator, Semester, Subject, Task, WeekStatus};
use semtask::scheduler;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Sink double that records the exact call sequence and can be told to
/// reject specific task names.
#[derive(Default)]
struct RecordingSink {
    calls: Vec<String>,
    targets: Vec<SubmissionTarget>,
    fail_on: HashSet<String>,
    commit_count: usize,
    counter: usize,
}

impl SubmissionSink for RecordingSink {
    async fn submit(&mut self, request: &SubmissionRequest) -> Result<String, ScheduleError> {
        if self.fail_on.contains(&request.name) {
            return Err(ScheduleError::Submission(format!(
                "rejected '{}'",
                request.name
            )));
        }
        self.calls.push(request.name.clone());
        self.targets.push(request.target.clone());
        self.counter += 1;
        Ok(format!("id-{}", self.counter))
    }

    async fn commit(&mut self) -> Result<(), ScheduleError> {
        self.commit_count += 1;
        Ok(())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A Tuesday in teaching week 3 of the fixture semester.
fn week3_tuesday() -> NaiveDate {
    date(2020, 8, 18)
}

fn fixture_semester() -> Arc<Semester> {
    Arc::new(
        Semester::new(
            date(2020, 8, 3),
            date(2020, 11, 1),
            date(2020, 10, 5),
            date(2020, 10, 11),
        )
        .unwrap(),
    )
}

fn fixture_subjects(semester: &Arc<Semester>) -> (Arc<Subject>, Arc<Subject>) {
    let swen = Arc::new(Subject::new("SWEN20003", "OOSD", 101, semester.clone()));
    let comp = Arc::new(Subject::new("COMP10002", "Algorithms", 102, semester.clone()));
    (swen, comp)
}

/// A named task due on a fixed day label, so no date suffix sneaks in.
fn named_task(subject: &Arc<Subject>, name: &str) -> Task {
    let mut task = Task::new(subject.clone(), "2:15pm");
    task.due_day = "Friday".to_string();
    task.name = name.to_string();
    task
}

fn schedule_with_roots(roots: Vec<Task>) -> Schedule {
    let semester = fixture_semester();
    let (swen, comp) = fixture_subjects(&semester);
    let mut subjects = HashMap::new();
    subjects.insert(swen.code.clone(), swen);
    subjects.insert(comp.code.clone(), comp);
    let mut tasks = HashMap::new();
    tasks.insert(Weekday::Tue, roots);
    Schedule {
        semester,
        subjects,
        tasks,
    }
}

#[tokio::test]
async fn test_sibling_subtask_order_preserved() {
    let semester = fixture_semester();
    let (swen, _) = fixture_subjects(&semester);
    let mut parent = named_task(&swen, "Lecture");
    parent.add_subtask(named_task(&swen, "Read slides"));
    parent.add_subtask(named_task(&swen, "Attempt worksheet"));
    parent.add_subtask(named_task(&swen, "Post questions"));
    let mut schedule = schedule_with_roots(vec![parent]);

    let mut sink = RecordingSink::default();
    let report = scheduler::run(&mut schedule, &mut sink, week3_tuesday(), "UTC")
        .await
        .unwrap();

    assert_eq!(
        sink.calls,
        vec!["Lecture", "Read slides", "Attempt worksheet", "Post questions"]
    );
    assert_eq!(sink.targets[0], SubmissionTarget::Project(101));
    for target in &sink.targets[1..] {
        assert_eq!(*target, SubmissionTarget::Parent("id-1".to_string()));
    }
    assert_eq!(report.week, WeekStatus::Teaching(3));
    assert_eq!(report.total_added(), 4);
    assert_eq!(sink.commit_count, 1);

    // The parent's assigned identifier was stored on the task itself.
    let parent = &schedule.tasks[&Weekday::Tue][0];
    assert_eq!(parent.external_id.as_deref(), Some("id-1"));
}

#[tokio::test]
async fn test_failed_parent_never_submits_subtasks() {
    let semester = fixture_semester();
    let (swen, comp) = fixture_subjects(&semester);
    let mut doomed = named_task(&swen, "Doomed lecture");
    doomed.add_subtask(named_task(&swen, "Orphan one"));
    doomed.add_subtask(named_task(&swen, "Orphan two"));
    let sibling = named_task(&comp, "Healthy workshop");
    let mut schedule = schedule_with_roots(vec![doomed, sibling]);

    let mut sink = RecordingSink::default();
    sink.fail_on.insert("Doomed lecture".to_string());
    let report = scheduler::run(&mut schedule, &mut sink, week3_tuesday(), "UTC")
        .await
        .unwrap();

    // No orphan was attempted, and the sibling root still went through.
    assert_eq!(sink.calls, vec!["Healthy workshop"]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].contains("swen20003"));
    assert_eq!(report.total_added(), 1);
    assert_eq!(sink.commit_count, 1);
}

#[tokio::test]
async fn test_failed_subtask_prunes_only_its_own_subtree() {
    let semester = fixture_semester();
    let (swen, _) = fixture_subjects(&semester);
    let mut parent = named_task(&swen, "Lecture");
    parent.add_subtask(named_task(&swen, "First"));
    let mut failing = named_task(&swen, "Second");
    failing.add_subtask(named_task(&swen, "Grandchild"));
    parent.add_subtask(failing);
    parent.add_subtask(named_task(&swen, "Third"));
    let mut schedule = schedule_with_roots(vec![parent]);

    let mut sink = RecordingSink::default();
    sink.fail_on.insert("Second".to_string());
    let report = scheduler::run(&mut schedule, &mut sink, week3_tuesday(), "UTC")
        .await
        .unwrap();

    assert_eq!(sink.calls, vec!["Lecture", "First", "Third"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(sink.commit_count, 1);
}

#[tokio::test]
async fn test_aggregation_groups_by_subject_code_not_tree_shape() {
    let semester = fixture_semester();
    let (swen, comp) = fixture_subjects(&semester);
    // A subtask may carry a different subject than its parent.
    let mut parent = named_task(&swen, "Joint session");
    parent.add_subtask(named_task(&comp, "Algorithms half"));
    let second_root = named_task(&swen, "Review");
    let mut schedule = schedule_with_roots(vec![parent, second_root]);

    let mut sink = RecordingSink::default();
    let report = scheduler::run(&mut schedule, &mut sink, week3_tuesday(), "UTC")
        .await
        .unwrap();

    assert_eq!(report.added["swen20003"].len(), 2);
    assert_eq!(report.added["comp10002"].len(), 1);
    assert_eq!(
        report.added["comp10002"][0],
        "'Algorithms half' due Friday 2:15pm"
    );
}

#[tokio::test]
async fn test_week_filtering_skips_the_whole_subtree() {
    let semester = fixture_semester();
    let (swen, _) = fixture_subjects(&semester);
    let mut off_week = named_task(&swen, "Week 5 and 7 only");
    off_week.weeks = vec![5, 7];
    off_week.add_subtask(named_task(&swen, "Hidden subtask"));
    let mut schedule = schedule_with_roots(vec![off_week]);

    let mut sink = RecordingSink::default();
    let report = scheduler::run(&mut schedule, &mut sink, week3_tuesday(), "UTC")
        .await
        .unwrap();

    assert!(sink.calls.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(report.total_added(), 0);
    assert_eq!(sink.commit_count, 1);
}

#[tokio::test]
async fn test_blank_generator_slot_skips_just_that_subtask() {
    let semester = fixture_semester();
    let (swen, _) = fixture_subjects(&semester);
    // Week 3 lands on the blank slot of this curriculum list.
    let generator = Arc::new(
        NameGenerator::new(
            "Lec",
            vec!["A".into(), "B".into(), "".into(), "D".into()],
            vec![Weekday::Fri],
            true,
            false,
        )
        .unwrap(),
    );
    let mut parent = named_task(&swen, "Lecture");
    let mut blank_subtask = Task::new(swen.clone(), "6pm");
    blank_subtask.due_day = "Friday".to_string();
    blank_subtask.name_gen = Some(generator);
    parent.add_subtask(blank_subtask);
    parent.add_subtask(named_task(&swen, "Survivor"));
    let mut schedule = schedule_with_roots(vec![parent]);

    let mut sink = RecordingSink::default();
    let report = scheduler::run(&mut schedule, &mut sink, week3_tuesday(), "UTC")
        .await
        .unwrap();

    assert_eq!(sink.calls, vec!["Lecture", "Survivor"]);
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_configuration_error_aborts_before_commit() {
    let semester = fixture_semester();
    let (swen, _) = fixture_subjects(&semester);
    // Curriculum list far too short for week 3.
    let generator = Arc::new(
        NameGenerator::new("Lec", vec!["A".into()], vec![Weekday::Fri], true, false).unwrap(),
    );
    let fine = named_task(&swen, "Fine");
    let mut broken = Task::new(swen.clone(), "6pm");
    broken.due_day = "Friday".to_string();
    broken.name_gen = Some(generator);
    let mut schedule = schedule_with_roots(vec![fine, broken]);

    let mut sink = RecordingSink::default();
    let err = scheduler::run(&mut schedule, &mut sink, week3_tuesday(), "UTC").await;

    assert!(matches!(err, Err(ScheduleError::Configuration(_))));
    assert_eq!(sink.commit_count, 0, "nothing may be committed");
}

#[tokio::test]
async fn test_out_of_semester_and_break_days_add_nothing() {
    let mut sink = RecordingSink::default();

    let mut schedule = schedule_with_roots(vec![]);
    let report = scheduler::run(&mut schedule, &mut sink, date(2020, 7, 1), "UTC")
        .await
        .unwrap();
    assert_eq!(report.week, WeekStatus::OutOfSemester);

    // 2020-10-06 is a Tuesday inside the break.
    let report = scheduler::run(&mut schedule, &mut sink, date(2020, 10, 6), "UTC")
        .await
        .unwrap();
    assert_eq!(report.week, WeekStatus::MidsemBreak);

    assert!(sink.calls.is_empty());
    assert_eq!(sink.commit_count, 0);
}

#[tokio::test]
async fn test_rerun_duplicates_submissions_by_design() {
    // The engine is stateless per invocation: nothing remembers what a
    // previous run staged, so running the same day twice duplicates tasks.
    let semester = fixture_semester();
    let (swen, _) = fixture_subjects(&semester);
    let mut sink = RecordingSink::default();

    for _ in 0..2 {
        let mut schedule = schedule_with_roots(vec![named_task(&swen, "Lecture")]);
        scheduler::run(&mut schedule, &mut sink, week3_tuesday(), "UTC")
            .await
            .unwrap();
    }

    assert_eq!(sink.calls, vec!["Lecture", "Lecture"]);
    assert_eq!(sink.commit_count, 2);
}

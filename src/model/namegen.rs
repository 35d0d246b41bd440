// File: ./src/model/namegen.rs
//! Curriculum-list name generation.
//!
//! A generator walks an ordered list of session titles, one slot per
//! scheduled weekday per teaching week. Two indices are at play and they
//! deliberately disagree: the raw slot index (`idx`) counts every slot,
//! blanks included, because it drives the list lookup; the user-facing
//! class number skips blank slots, so a cancelled or revision session does
//! not consume an ordinal.

use crate::error::ScheduleError;
use chrono::{Datelike, NaiveDate, Weekday};
use std::str::FromStr;

/// A stateless name generator bound to its curriculum configuration.
/// Shared across tasks via `Arc`; evaluation is a pure function of
/// `(current_week, today, due_day_hint)`.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    pub prefix: String,
    pub list: Vec<String>,
    pub days_of_week: Vec<Weekday>,
    pub num_after_prefix: bool,
    pub use_date: bool,
}

impl NameGenerator {
    pub fn new(
        prefix: &str,
        list: Vec<String>,
        days_of_week: Vec<Weekday>,
        num_after_prefix: bool,
        use_date: bool,
    ) -> Result<Self, ScheduleError> {
        if days_of_week.is_empty() {
            return Err(ScheduleError::Configuration(format!(
                "name generator '{}' has an empty days_of_week list",
                prefix
            )));
        }
        Ok(Self {
            prefix: prefix.to_string(),
            list,
            days_of_week,
            num_after_prefix,
            use_date,
        })
    }

    /// Derives the task name for a given week, or an empty string when the
    /// slot is a blank placeholder (the caller skips the task that cycle).
    ///
    /// The hint is the task's due-day label with any "Today" stripped; a
    /// "next" qualifier, or a target weekday that today has already reached,
    /// shifts the lookup one week forward since the next occurrence of that
    /// weekday falls in the following cycle.
    pub fn generate(
        &self,
        current_week: u32,
        today: NaiveDate,
        due_day_hint: &str,
    ) -> Result<String, ScheduleError> {
        let hint = due_day_hint.to_lowercase();
        let target_name = hint.replace("next", "");
        let target_name = target_name.trim();

        let target = if target_name.is_empty() {
            today.weekday()
        } else {
            parse_weekday(target_name)?
        };

        let due_next_week = hint.contains("next")
            || today.weekday().num_days_from_sunday() >= target.num_days_from_sunday();

        let incr = self
            .days_of_week
            .iter()
            .position(|d| *d == target)
            .unwrap_or(0);

        let idx = (current_week as usize - 1 + usize::from(due_next_week))
            * self.days_of_week.len()
            + incr;

        let Some(label) = self.list.get(idx) else {
            // The curriculum list is too short for the semester; truncating
            // silently would submit tasks with the wrong names.
            return Err(ScheduleError::Configuration(format!(
                "curriculum list for '{}' has {} entries but week {} needs slot {}",
                self.prefix,
                self.list.len(),
                current_week,
                idx + 1
            )));
        };
        if label.is_empty() {
            return Ok(String::new());
        }

        // Blanks before this slot were consumed but never numbered.
        let class_number = idx + 1 - self.list[..idx].iter().filter(|l| l.is_empty()).count();

        let mut name = self.prefix.trim().to_string();
        if self.num_after_prefix {
            name.push_str(&format!(" {class_number}"));
        }
        name.push_str(&format!(" - {label}"));
        if self.use_date {
            name.push_str(&today.format(", %a %d %B").to_string());
        }
        Ok(name)
    }
}

/// Parses a human weekday name ("monday", "Wed") into a `chrono::Weekday`.
pub fn parse_weekday(name: &str) -> Result<Weekday, ScheduleError> {
    Weekday::from_str(name)
        .map_err(|_| ScheduleError::Configuration(format!("unrecognized weekday name '{name}'")))
}

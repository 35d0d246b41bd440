// File: ./src/model/semester.rs
use crate::error::ScheduleError;
use chrono::NaiveDate;
use std::fmt;

/// Where a date falls relative to the teaching calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekStatus {
    /// Before the semester starts or after it ends.
    OutOfSemester,
    /// Inside the midsemester break. Week numbering pauses here.
    MidsemBreak,
    /// A 1-indexed teaching week.
    Teaching(u32),
}

impl WeekStatus {
    pub fn teaching_week(&self) -> Option<u32> {
        match self {
            WeekStatus::Teaching(n) => Some(*n),
            _ => None,
        }
    }
}

/// One semester of the university year.
///
/// All dates are inclusive: starts should be Mondays and ends should be
/// Sundays. The break window sits inside the semester and does not consume
/// a week number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Semester {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub break_start: NaiveDate,
    pub break_end: NaiveDate,
}

impl Semester {
    /// Builds a semester, rejecting windows where
    /// `start <= break_start <= break_end <= end` does not hold.
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        break_start: NaiveDate,
        break_end: NaiveDate,
    ) -> Result<Self, ScheduleError> {
        if start > end {
            return Err(ScheduleError::Configuration(format!(
                "semester starts {start} but ends {end}"
            )));
        }
        if break_start > break_end || break_start < start || break_end > end {
            return Err(ScheduleError::Configuration(format!(
                "break window {break_start}..{break_end} does not fit inside {start}..{end}"
            )));
        }
        Ok(Self {
            start,
            end,
            break_start,
            break_end,
        })
    }

    /// Number of teaching weeks, excluding the midsemester break.
    pub fn num_weeks(&self) -> i64 {
        ((self.end - self.start) - (self.break_end - self.break_start)).num_days() / 7
    }

    pub fn in_midsem_break(&self, day: NaiveDate) -> bool {
        self.break_start <= day && day <= self.break_end
    }

    /// Maps a date to its 1-indexed teaching week.
    ///
    /// Dates after the break keep counting from where the break interrupted,
    /// so the week immediately after the break continues the sequence.
    pub fn current_week(&self, today: NaiveDate) -> WeekStatus {
        if today < self.start || today > self.end {
            return WeekStatus::OutOfSemester;
        }
        if self.in_midsem_break(today) {
            return WeekStatus::MidsemBreak;
        }
        let mut week = (today - self.start).num_days() / 7 + 1;
        if today >= self.break_start {
            week -= 1;
        }
        WeekStatus::Teaching(week as u32)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_date = "%b %d %Y";
        write!(
            f,
            "Semester, {}wks: {} to {} (break: {} to {})",
            self.num_weeks(),
            self.start.format(fmt_date),
            self.end.format(fmt_date),
            self.break_start.format(fmt_date),
            self.break_end.format(fmt_date),
        )
    }
}

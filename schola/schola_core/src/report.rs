//! Run summaries.
//!
//! A `RunSummary` is computed purely from the final student and teacher
//! records after every actor thread has been joined. It carries no
//! synchronization of its own.

use serde::Serialize;
use std::fmt;

use crate::types::{StudentDeparture, StudentRecord, TeacherDeparture, TeacherRecord};
use crate::utils::SimulationConfig;

/// Aggregate figures for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Lessons required of every actor
    pub required_lessons: u32,

    /// Student population
    pub students_total: usize,

    /// Students that attended every required lesson
    pub students_completed: usize,

    /// Students that left because no teacher remained
    pub students_stranded: usize,

    /// Teacher population
    pub teachers_total: usize,

    /// Teachers that taught every required lesson
    pub teachers_completed: usize,

    /// Teachers that left early because nobody could join their classroom
    pub teachers_dismissed: usize,

    /// `attendance_histogram[n]` is the number of students that attended `n` lessons
    pub attendance_histogram: Vec<usize>,

    /// Student attendances per classroom, indexed by classroom
    pub classroom_attendance: Vec<usize>,

    /// Lessons taught across all teachers
    pub lessons_taught: u32,

    /// Lessons started below quorum
    pub degraded_lessons: u32,
}

impl RunSummary {
    /// Summarize the final records of a run.
    pub fn from_records(
        config: &SimulationConfig,
        students: &[StudentRecord],
        teachers: &[TeacherRecord],
    ) -> Self {
        let required = config.required_lessons;

        let mut attendance_histogram = vec![0; required as usize + 1];
        let mut classroom_attendance = vec![0; config.classrooms];
        for student in students {
            let bucket = (student.lessons_attended as usize).min(required as usize);
            attendance_histogram[bucket] += 1;
            for classroom in &student.history {
                if let Some(total) = classroom_attendance.get_mut(classroom.index()) {
                    *total += 1;
                }
            }
        }

        Self {
            required_lessons: required,
            students_total: students.len(),
            students_completed: students
                .iter()
                .filter(|s| s.lessons_attended >= required)
                .count(),
            students_stranded: students
                .iter()
                .filter(|s| s.departure == StudentDeparture::NoTeachersRemaining)
                .count(),
            teachers_total: teachers.len(),
            teachers_completed: teachers
                .iter()
                .filter(|t| t.lessons_taught >= required)
                .count(),
            teachers_dismissed: teachers
                .iter()
                .filter(|t| t.departure == TeacherDeparture::Dismissed)
                .count(),
            attendance_histogram,
            classroom_attendance,
            lessons_taught: teachers.iter().map(|t| t.lessons_taught).sum(),
            degraded_lessons: teachers.iter().map(|t| t.degraded_lessons).sum(),
        }
    }

    /// Share of students that completed, in percent.
    pub fn student_completion(&self) -> f64 {
        percentage(self.students_completed, self.students_total)
    }

    /// Share of teachers that completed, in percent.
    pub fn teacher_completion(&self) -> f64 {
        percentage(self.teachers_completed, self.teachers_total)
    }

    /// Whether every actor met its quota.
    pub fn fully_completed(&self) -> bool {
        self.students_completed == self.students_total
            && self.teachers_completed == self.teachers_total
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Simulation Summary =====")?;
        writeln!(
            f,
            "Students who completed all lessons: {}/{} ({:.1}%)",
            self.students_completed,
            self.students_total,
            self.student_completion()
        )?;
        writeln!(
            f,
            "Teachers who completed all lessons: {}/{} ({:.1}%)",
            self.teachers_completed,
            self.teachers_total,
            self.teacher_completion()
        )?;
        writeln!(
            f,
            "Lessons taught: {} ({} below quorum)",
            self.lessons_taught, self.degraded_lessons
        )?;
        if self.students_stranded > 0 || self.teachers_dismissed > 0 {
            writeln!(
                f,
                "Early departures: {} students without teachers, {} teachers dismissed",
                self.students_stranded, self.teachers_dismissed
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Lesson attendance distribution:")?;
        for (lessons, count) in self.attendance_histogram.iter().enumerate() {
            writeln!(f, "  Students who attended {} lessons: {}", lessons, count)?;
        }

        writeln!(f)?;
        writeln!(f, "Attendance per classroom:")?;
        for (classroom, count) in self.classroom_attendance.iter().enumerate() {
            writeln!(f, "  Classroom {}: {}", classroom, count)?;
        }
        Ok(())
    }
}

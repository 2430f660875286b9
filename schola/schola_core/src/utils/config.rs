//! Simulation configuration.
//!
//! The four population parameters (classrooms, students per classroom,
//! quorum and required lessons) plus the timing knobs for lessons and
//! bounded waits. Values come from defaults, a TOML file, and command-line
//! overrides, in that order of precedence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

fn default_classrooms() -> usize {
    5
}

fn default_students_per_classroom() -> usize {
    20
}

fn default_quorum() -> usize {
    10
}

fn default_required_lessons() -> u32 {
    3
}

fn default_lesson_duration_ms() -> u64 {
    2
}

fn default_wait_timeout_ms() -> u64 {
    20
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of classrooms, and therefore of teachers
    #[serde(default = "default_classrooms")]
    pub classrooms: usize,

    /// Students per classroom; the student population is `classrooms * students_per_classroom`
    #[serde(default = "default_students_per_classroom")]
    pub students_per_classroom: usize,

    /// Enrolled students needed for a regular lesson start
    #[serde(default = "default_quorum")]
    pub quorum: usize,

    /// Lessons every actor must complete
    #[serde(default = "default_required_lessons")]
    pub required_lessons: u32,

    /// Length of a lesson (milliseconds)
    #[serde(default = "default_lesson_duration_ms")]
    pub lesson_duration_ms: u64,

    /// Break between ending a lesson and resetting the classroom (milliseconds)
    #[serde(default)]
    pub recess_ms: u64,

    /// Upper bound on every blocking wait before its predicate is re-checked (milliseconds)
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            classrooms: default_classrooms(),
            students_per_classroom: default_students_per_classroom(),
            quorum: default_quorum(),
            required_lessons: default_required_lessons(),
            lesson_duration_ms: default_lesson_duration_ms(),
            recess_ms: 0,
            wait_timeout_ms: default_wait_timeout_ms(),
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.classrooms == 0 {
            return Err(ConfigError::Invalid {
                field: "classrooms",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.students_per_classroom == 0 {
            return Err(ConfigError::Invalid {
                field: "students_per_classroom",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.quorum == 0 || self.quorum > self.total_students() {
            return Err(ConfigError::Invalid {
                field: "quorum",
                reason: format!(
                    "must be between 1 and the student population ({})",
                    self.total_students()
                ),
            });
        }
        if self.required_lessons == 0 {
            return Err(ConfigError::Invalid {
                field: "required_lessons",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.wait_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "wait_timeout_ms",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Number of teachers, one per classroom.
    pub fn teachers(&self) -> usize {
        self.classrooms
    }

    /// Size of the student population.
    pub fn total_students(&self) -> usize {
        self.classrooms.saturating_mul(self.students_per_classroom)
    }

    /// Whether a student can complete its quota at all.
    ///
    /// Students never attend a classroom twice, so more required lessons
    /// than classrooms can never be satisfied.
    pub fn quota_attainable(&self) -> bool {
        self.required_lessons as usize <= self.classrooms
    }

    /// Lesson length as a `Duration`.
    pub fn lesson_duration(&self) -> Duration {
        Duration::from_millis(self.lesson_duration_ms)
    }

    /// Recess length as a `Duration`.
    pub fn recess(&self) -> Duration {
        Duration::from_millis(self.recess_ms)
    }

    /// Bound on every blocking wait.
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_population() {
        let config = SimulationConfig::default();
        assert_eq!(config.classrooms, 5);
        assert_eq!(config.students_per_classroom, 20);
        assert_eq!(config.total_students(), 100);
        assert_eq!(config.teachers(), 5);
        assert_eq!(config.quorum, 10);
        assert_eq!(config.required_lessons, 3);
        assert!(config.validate().is_ok());
        assert!(config.quota_attainable());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimulationConfig::from_toml_str("quorum = 4\nclassrooms = 2\n").unwrap();
        assert_eq!(config.quorum, 4);
        assert_eq!(config.classrooms, 2);
        assert_eq!(config.students_per_classroom, 20);
        assert_eq!(config.wait_timeout(), Duration::from_millis(20));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SimulationConfig::from_toml_str("classes = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_quorum_bounds() {
        let config = SimulationConfig {
            classrooms: 2,
            students_per_classroom: 3,
            quorum: 7,
            ..SimulationConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "quorum", .. }));

        let config = SimulationConfig {
            quorum: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_parameters_rejected() {
        for config in [
            SimulationConfig {
                classrooms: 0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                students_per_classroom: 0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                required_lessons: 0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                wait_timeout_ms: 0,
                ..SimulationConfig::default()
            },
        ] {
            assert!(config.validate().is_err(), "{:?} should be invalid", config);
        }
    }

    #[test]
    fn test_unattainable_quota_is_valid() {
        let config = SimulationConfig {
            classrooms: 2,
            students_per_classroom: 2,
            quorum: 1,
            required_lessons: 3,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!(!config.quota_attainable());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SimulationConfig {
            quorum: 6,
            recess_ms: 5,
            ..SimulationConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(SimulationConfig::from_toml_str(&text).unwrap(), config);
    }
}

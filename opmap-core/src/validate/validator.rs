use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::types::OperationsMap;

use super::rules;

pub(crate) static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-]+(\.[A-Za-z0-9_\-]+)*$").expect("valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The map cannot be used to build requests.
    Error,
    /// Requests can still be built, but probably not the intended ones.
    Warning,
}

/// A single finding addressed by its dot path inside the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every finding for one map, in the order the rules produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.of(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.of(Severity::Warning)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Keep only the errors; warnings never fail a load.
    pub fn into_result(self) -> Result<(), ValidationError> {
        let errors: Vec<Violation> = self
            .violations
            .into_iter()
            .filter(|v| v.severity == Severity::Error)
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(errors))
        }
    }

    fn of(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.severity == severity)
    }
}

/// Collector handed to the rules.
pub(crate) struct Validator {
    report: ValidationReport,
}

impl Validator {
    pub(crate) fn run(map: &OperationsMap) -> ValidationReport {
        let mut v = Self {
            report: ValidationReport::default(),
        };
        rules::check_map(&mut v, map);
        v.report
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, path.into(), message.into());
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, path.into(), message.into());
    }

    fn push(&mut self, severity: Severity, path: String, message: String) {
        self.report.violations.push(Violation {
            severity,
            path,
            message,
        });
    }
}

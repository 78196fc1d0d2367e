//! Structural checks over a parsed map.
//!
//! Errors make the map unusable and fail [`load_map_str`](crate::load_map_str).
//! Warnings flag shapes that still produce requests, just rarely the intended ones.

mod rules;
mod validator;

pub use validator::{Severity, ValidationReport, Violation};

use crate::error::ValidationError;
use crate::types::OperationsMap;

/// Run every rule and collect the findings of both severities.
pub fn check_map(map: &OperationsMap) -> ValidationReport {
    validator::Validator::run(map)
}

impl OperationsMap {
    /// Fails with the error-severity findings only.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_map(self).into_result()
    }
}

use thiserror::Error;

use crate::validate::Violation;

/// Why an operation map could not be loaded.
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unable to auto-detect operation map format (neither valid JSON nor valid YAML)")]
    UnknownFormat,
}

/// The error-severity findings of a map, at least one.
#[derive(Debug, Error)]
#[error("operation map failed validation: {}", first_and_rest(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

fn first_and_rest(violations: &[Violation]) -> String {
    match violations {
        [] => "no violations".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

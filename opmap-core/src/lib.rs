#![forbid(unsafe_code)]

pub mod error;
pub mod parser;
pub mod template;
pub mod types;
pub mod validate;

pub use crate::error::{MapError, ParseError, ValidationError};
pub use crate::parser::{load_map_str, parse_map_str, MapFormat, ParsedMap};
pub use crate::template::{substitute, substitute_str, unresolved_placeholders, TemplateParams};
pub use crate::types::{AuthMode, HttpMethod, OperationDefinition, OperationsMap};
pub use crate::validate::{check_map, Severity, ValidationReport, Violation};

use std::path::Path;

use opmap_core::{check_map, parse_map_str, MapFormat};
use serde::Serialize;

use crate::args::OutputArgs;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};

#[derive(Serialize)]
struct ValidateResult {
    valid: bool,
    format: String,
    operations: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

pub async fn validate_cmd(path: &Path, output: &OutputArgs) -> i32 {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(v) => v,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to read {}: {e}", path.display()),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let parsed = match parse_map_str(&content, MapFormat::Auto) {
        Ok(p) => p,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let report = check_map(&parsed.map);
    let errors: Vec<String> = report.errors().map(ToString::to_string).collect();
    let warnings: Vec<String> = report.warnings().map(ToString::to_string).collect();
    let valid = errors.is_empty();

    if output.format == OutputFormat::Text && !output.quiet {
        for w in &warnings {
            eprintln!("warning: {w}");
        }
        if valid {
            println!(
                "ok: valid operation map ({:?}, {} operations)",
                parsed.format,
                parsed.map.len()
            );
        } else {
            eprintln!("error: validation failed");
            for e in &errors {
                eprintln!("- {e}");
            }
        }
    } else {
        let result = ValidateResult {
            valid,
            format: format!("{:?}", parsed.format),
            operations: parsed.map.len(),
            errors,
            warnings,
        };
        print_result(output.format, output.quiet, &result);
    }

    if valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::VALIDATION_FAILED
    }
}

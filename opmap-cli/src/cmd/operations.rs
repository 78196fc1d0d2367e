use opmap_exec::DispatchError;
use serde::Serialize;

use crate::args::GlobalArgs;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::utils::{exit_code_for, registry};

#[derive(Serialize)]
struct OperationRow {
    key: String,
    method: String,
    path: String,
    bearer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

pub async fn operations_cmd(global: &GlobalArgs) -> i32 {
    let output = &global.output;
    let map = match registry(&global.paths).map().await {
        Ok(m) => m,
        Err(e) => {
            let e = DispatchError::from(e);
            print_error(output.format, output.quiet, &e.to_string());
            return exit_code_for(&e);
        }
    };

    let rows: Vec<OperationRow> = map
        .operations
        .iter()
        .map(|(key, def)| OperationRow {
            key: key.clone(),
            method: def.method.to_string(),
            path: format!("{}{}", map.base_path, def.path),
            bearer: def.requires_bearer(),
            description: def.description.clone(),
        })
        .collect();

    if output.format == OutputFormat::Text {
        if !output.quiet {
            let width = rows.iter().map(|r| r.key.len()).max().unwrap_or(0);
            for r in &rows {
                println!("{:<width$}  {:<6}  {}", r.key, r.method, r.path);
            }
        }
    } else {
        print_result(output.format, output.quiet, &rows);
    }
    exit_codes::SUCCESS
}

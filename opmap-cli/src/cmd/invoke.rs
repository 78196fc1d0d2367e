use opmap_exec::{redact_request, unwrap_result};
use serde_json::json;

use crate::args::{CallArgs, GlobalArgs};
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::utils::{build_dispatcher, exit_code_for};

pub async fn invoke_cmd(
    key: &str,
    call: &CallArgs,
    unwrap: bool,
    metrics: bool,
    dry_run: bool,
    global: &GlobalArgs,
) -> i32 {
    let output = &global.output;
    let dispatcher = match build_dispatcher(global) {
        Ok(d) => d,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let params = call.params();
    let options = call.options();

    if dry_run {
        return match dispatcher.build_request(key, &params, &options).await {
            Ok(req) => {
                print_result(output.format, output.quiet, &redact_request(&req));
                exit_codes::SUCCESS
            }
            Err(e) => {
                print_error(output.format, output.quiet, &e.to_string());
                exit_code_for(&e)
            }
        };
    }

    let result = dispatcher.invoke(key, &params, &options).await;
    if metrics && !output.quiet {
        let snapshot = dispatcher.metrics().snapshot().await.to_json();
        let rendered = match output.format {
            OutputFormat::Text => serde_json::to_string_pretty(&snapshot),
            OutputFormat::Json => serde_json::to_string(&json!({ "metrics": snapshot })),
        };
        if let Ok(s) = rendered {
            eprintln!("{s}");
        }
    }

    match result {
        Ok(value) => {
            let value = if unwrap { unwrap_result(value) } else { value };
            print_result(output.format, output.quiet, &value);
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_code_for(&e)
        }
    }
}

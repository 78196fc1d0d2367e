use std::io::BufRead;

use opmap_exec::{SecretValue, TokenSource};
use serde::Serialize;

use crate::args::GlobalArgs;
use crate::commands::TokenCommand;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::utils::{auth_provider, open_settings};

#[derive(Serialize)]
struct TokenStatus {
    source: Option<TokenSource>,
    env_var: String,
    secret_store: bool,
}

pub async fn token_cmd(command: TokenCommand, global: &GlobalArgs) -> i32 {
    let output = &global.output;
    let settings = match open_settings(&global.paths) {
        Ok(s) => s,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let auth = auth_provider(settings, &global.paths);

    match command {
        TokenCommand::Set { token } => {
            let token = match token {
                Some(t) => t,
                None => match read_stdin_line() {
                    Ok(t) => t,
                    Err(e) => {
                        print_error(output.format, output.quiet, &format!("failed to read token: {e}"));
                        return exit_codes::RUNTIME_ERROR;
                    }
                },
            };
            match auth.set_token(SecretValue::new(token)).await {
                Ok(source) => {
                    print_result(output.format, output.quiet, &serde_json::json!({ "stored_in": source }));
                    exit_codes::SUCCESS
                }
                Err(e) => {
                    print_error(output.format, output.quiet, &e.to_string());
                    exit_codes::RUNTIME_ERROR
                }
            }
        }
        TokenCommand::Remove => match auth.remove_token().await {
            Ok(removed) => {
                print_result(output.format, output.quiet, &serde_json::json!({ "removed_from": removed }));
                exit_codes::SUCCESS
            }
            Err(e) => {
                print_error(output.format, output.quiet, &e.to_string());
                exit_codes::RUNTIME_ERROR
            }
        },
        TokenCommand::Status => {
            let status = TokenStatus {
                source: auth.token_source().await,
                env_var: auth.env_var().to_string(),
                secret_store: global.paths.secrets_dir.is_some(),
            };
            if output.format == OutputFormat::Text && !output.quiet {
                match status.source {
                    Some(source) => println!("token: available ({})", source_label(source)),
                    None => println!("token: not configured"),
                }
            } else {
                print_result(output.format, output.quiet, &status);
            }
            exit_codes::SUCCESS
        }
    }
}

fn source_label(source: TokenSource) -> &'static str {
    match source {
        TokenSource::SecretStore => "secret store",
        TokenSource::Environment => "environment",
        TokenSource::Settings => "settings, plain text",
    }
}

fn read_stdin_line() -> std::io::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

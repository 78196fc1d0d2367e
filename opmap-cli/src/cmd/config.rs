use crate::args::GlobalArgs;
use crate::commands::ConfigCommand;
use crate::exit_codes;
use crate::output::{print_error, print_result};
use crate::utils::{open_settings, parse_setting_value};

pub fn config_cmd(command: ConfigCommand, global: &GlobalArgs) -> i32 {
    let output = &global.output;
    let settings = match open_settings(&global.paths) {
        Ok(s) => s,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let result = match command {
        ConfigCommand::Get { key: None } => Ok(settings.snapshot()),
        ConfigCommand::Get { key: Some(key) } => match settings.get(&key) {
            Some(v) => Ok(v),
            None => {
                print_error(output.format, output.quiet, &format!("`{key}` is not set"));
                return exit_codes::CALL_FAILED;
            }
        },
        ConfigCommand::Set { key, value } => {
            let value = parse_setting_value(&value);
            settings
                .set(&key, value.clone())
                .map(|()| serde_json::json!({ "set": key, "value": value }))
        }
        ConfigCommand::Unset { key } => settings
            .remove(&key)
            .map(|old| serde_json::json!({ "unset": key, "removed": old.is_some() })),
    };

    match result {
        Ok(v) => {
            print_result(output.format, output.quiet, &v);
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::RUNTIME_ERROR
        }
    }
}

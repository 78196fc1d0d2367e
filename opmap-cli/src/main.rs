use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;
mod utils;

use args::GlobalArgs;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "opmap", version, about = "Invoke REST operations described by an operation map")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command, cli.global));
    std::process::exit(exit_code);
}

/// Diagnostics go to stderr so stdout stays machine-readable. `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run_command(command: Command, global: GlobalArgs) -> i32 {
    match command {
        Command::Invoke {
            key,
            call,
            unwrap,
            metrics,
            dry_run,
        } => cmd::invoke::invoke_cmd(&key, &call, unwrap, metrics, dry_run, &global).await,
        Command::Paginate {
            key,
            call,
            batch_size,
            max_records,
            records,
        } => {
            cmd::paginate::paginate_cmd(&key, &call, batch_size, max_records, &records, &global)
                .await
        }
        Command::Operations => cmd::operations::operations_cmd(&global).await,
        Command::Validate { path } => {
            let path = path.unwrap_or_else(|| global.paths.map.clone());
            cmd::validate::validate_cmd(&path, &global.output).await
        }
        Command::Token { command } => cmd::token::token_cmd(command, &global).await,
        Command::Config { command } => cmd::config::config_cmd(command, &global),
    }
}

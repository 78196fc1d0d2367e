use futures_util::StreamExt;
use opmap_exec::Paginator;

use crate::args::{CallArgs, GlobalArgs};
use crate::exit_codes;
use crate::output::{print_error, print_line};
use crate::utils::{build_dispatcher, exit_code_for};

pub async fn paginate_cmd(
    key: &str,
    call: &CallArgs,
    batch_size: u64,
    max_records: Option<u64>,
    record_pointer: &str,
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

    let paginator = Paginator::new(&dispatcher).with_record_pointer(record_pointer);
    let mut records = paginator.paginate(key, &call.params(), &call.options(), batch_size, max_records);

    let mut count = 0u64;
    while let Some(item) = records.next().await {
        match item {
            Ok(record) => {
                count += 1;
                print_line(output.quiet, &record);
            }
            Err(e) => {
                print_error(output.format, output.quiet, &e.to_string());
                tracing::info!(key, records = count, "paging stopped on error");
                return exit_code_for(&e);
            }
        }
    }
    tracing::info!(key, records = count, "paging finished");
    exit_codes::SUCCESS
}

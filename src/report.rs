//! Test progress output and the process exit status of a suite driver
//!
//! Progress lines are classified by the name prefix of the step being run:
//! `ts_` suites, `td_` documentation steps, `tc_` test cases.
//!
//! ```ignore
//! fn main() -> ExitCode {
//!     let runtime = tokio::runtime::Runtime::new().unwrap();
//!     report::finish(runtime.block_on(ts_users(&ctx, &mut dc)))
//! }
//! ```

use std::process::ExitCode;
use std::sync::OnceLock;

use regex::Regex;

use crate::constants::{
    SEPARATOR_WIDTH, TEST_CASE_PREFIX, TEST_DOCUMENTATION_PREFIX, TEST_SUITE_PREFIX,
};
use crate::rest::Context;

/// Converts `camelCase` step names to `snake_case`
fn snake_case(name: &str) -> String {
    static CAMEL_BOUNDARY: OnceLock<Regex> = OnceLock::new();
    let re = CAMEL_BOUNDARY.get_or_init(|| Regex::new("([a-z0-9])([A-Z])").unwrap());
    re.replace_all(name.trim(), "${1}_${2}").to_lowercase()
}

/// Formats the progress line of a step, without the trailing newline
///
/// Test case lines carry the user name and are meant to be completed by
/// [`ok`] on the same line.
pub fn progress_line(ctx: &Context, name: &str) -> String {
    let name = snake_case(name);
    let text = if name.starts_with(TEST_SUITE_PREFIX) {
        format!(" >> {}", name)
    } else if name.starts_with(TEST_DOCUMENTATION_PREFIX) {
        format!("  > {}", name)
    } else if name.starts_with(TEST_CASE_PREFIX) {
        format!("    - {} [{}]", name, ctx.user_name)
    } else {
        format!(">>> {}", name)
    };
    format!("{:<width$}{:<5}", text, ctx.version, width = SEPARATOR_WIDTH)
}

/// Prints the progress line of a step
pub fn display(ctx: &Context, name: &str) {
    let line = progress_line(ctx, name);
    if snake_case(name).starts_with(TEST_CASE_PREFIX) {
        print!("{}", line);
    } else {
        println!("{}", line);
    }
    tracing::debug!(step = %name, "Running");
}

/// Completes a test case line
pub fn ok() {
    println!("OK");
}

/// Turns the outcome of a suite into the process exit status
///
/// Failures are printed with their diagnostic and end with a failure code.
pub fn finish(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Test suite failed: {:#}", err);
            println!("\n{:#}", err);
            ExitCode::FAILURE
        }
    }
}

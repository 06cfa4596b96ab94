/*!

`agent-utils` is a collection of functions shared by provisioning harnesses: test logger setup,
JSON display of configuration types and conversion of child process output into provider errors.

!*/

use constants::{DEFAULT_LEVEL_FILTER, LOGGED_CRATES};
use env_logger::Builder;
use log::LevelFilter;
use provisioner::provider::{ProviderError, ProviderResult, Resources};
use std::env;
use std::process::Output;

pub mod constants;

/// Extract the value of `RUST_LOG` if it exists, otherwise log `test_crate` and our own crates at
/// `DEFAULT_LEVEL_FILTER`. Safe to call from every test in a binary; the output is captured by the
/// test harness and only shown for failing tests.
pub fn init_test_logger(test_crate: &str) {
    let mut builder = match env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        // RUST_LOG exists; env_logger will use it.
        Some(_) => Builder::from_default_env(),
        None => {
            let mut builder = Builder::new();
            // Set log level to Error for crates other than our own.
            builder.filter_level(LevelFilter::Error);
            builder.filter(Some(test_crate), DEFAULT_LEVEL_FILTER);
            for name in LOGGED_CRATES {
                builder.filter(Some(name), DEFAULT_LEVEL_FILTER);
            }
            builder
        }
    };
    let _ = builder.is_test(true).try_init();
}

/// Implement `Display` using `serde_json` `to_string_pretty` for types that implement Serialize.
#[macro_export]
macro_rules! impl_display_as_json {
    ($i:ident) => {
        impl std::fmt::Display for $i {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = serde_json::to_string_pretty(self)
                    .unwrap_or_else(|e| format!("Serialization failed: {}", e));
                std::fmt::Display::fmt(&s, f)
            }
        }
    };
}

/// If the command was successful (exit code zero), returns the command's `stdout`. Otherwise
/// returns a provider error carrying the exit code, `stderr` and `stdout`.
/// - `output`: the `Output` object from a `std::process::Command`
/// - `hint`: the command that was executed, e.g. `terraform apply`
/// - `resources`: what may be left behind if this command failed
pub fn provider_error_for_cmd_output(
    output: Output,
    hint: &str,
    resources: Resources,
) -> ProviderResult<String> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    if output.status.success() {
        Ok(stdout.to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // `None` when the process was killed by a signal.
        let code = output.status.code().unwrap_or(-1);
        Err(ProviderError::new_with_context(
            resources,
            format!(
                "Error running '{}', exit code {}\nstderr:\n{}\nstdout:\n{}",
                hint, code, stderr, stdout
            ),
        ))
    }
}

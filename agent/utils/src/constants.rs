use log::LevelFilter;

pub const DEFAULT_LEVEL_FILTER: LevelFilter = LevelFilter::Info;

/// The crates whose log records are shown at the default level when `RUST_LOG` is not set.
pub const LOGGED_CRATES: &[&str] = &["agent_utils", "provisioner", "terraform_harness"];

#![allow(unused)]

use std::path::PathBuf;

/// The terraform definitions of the EMR cluster scenario.
pub fn emr_cluster_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.join("demos/emr-cluster")
}

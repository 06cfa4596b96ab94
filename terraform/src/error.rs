use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display(
        "Terraform directory '{}' does not exist or is not a directory",
        path.display()
    ))]
    MissingDirectory { path: PathBuf },

    #[snafu(display("No terraform definitions (*.tf, *.tf.json) found in '{}'", path.display()))]
    NoDefinitions { path: PathBuf },

    #[snafu(display("Unable to parse terraform outputs: {}", source))]
    OutputParse { source: serde_json::Error },

    #[snafu(display("Unable to read terraform directory '{}': {}", path.display(), source))]
    ReadDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to read settings from the environment: {}", source))]
    Settings { source: envy::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

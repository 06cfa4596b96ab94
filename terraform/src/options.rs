use crate::error::{self, Result};
use agent_utils::impl_display_as_json;
use provisioner::Configuration;
use serde::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The configuration for one terraform run: where the definitions are and how to apply them. It is
/// passed unchanged to both the apply and the destroy step.
///
/// # Example
///
/// ```
/// use terraform_harness::Options;
///
/// let options = Options::new("../demos/emr-cluster")
///     .upgrade(true)
///     .var("name", "harness-emr");
/// assert!(options.upgrade);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// The directory containing the terraform definitions.
    pub terraform_dir: PathBuf,

    /// Whether `terraform init` should upgrade providers and modules to the newest allowed
    /// versions.
    #[serde(default)]
    pub upgrade: bool,

    /// Input variables passed as `-var key=value`.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// Variable files passed as `-var-file=path`.
    #[serde(default)]
    pub var_files: Vec<PathBuf>,

    /// Extra environment variables for the terraform process, e.g. `AWS_PROFILE`.
    #[serde(default)]
    pub env_vars: BTreeMap<String, String>,

    /// Whether terraform should lock the state. When `false`, `-lock=false` is passed to `apply`
    /// and `destroy`.
    #[serde(default)]
    pub lock: bool,

    /// Overrides the `no_color` setting for this run.
    pub no_color: Option<bool>,

    /// Overrides the terraform binary from the settings for this run.
    pub binary: Option<PathBuf>,
}

impl Configuration for Options {}
impl_display_as_json!(Options);

impl Options {
    pub fn new<P: Into<PathBuf>>(terraform_dir: P) -> Self {
        Self {
            terraform_dir: terraform_dir.into(),
            ..Default::default()
        }
    }

    pub fn upgrade(mut self, upgrade: bool) -> Self {
        self.upgrade = upgrade;
        self
    }

    pub fn var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn var_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.var_files.push(path.into());
        self
    }

    pub fn env_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn no_color(mut self, no_color: bool) -> Self {
        self.no_color = Some(no_color);
        self
    }

    pub fn binary<P: Into<PathBuf>>(mut self, binary: P) -> Self {
        self.binary = Some(binary.into());
        self
    }

    /// Checks that `terraform_dir` is a directory holding at least one `*.tf` or `*.tf.json`
    /// file. Whether the definitions are valid is left to terraform.
    pub fn validate(&self) -> Result<()> {
        let path = &self.terraform_dir;
        ensure!(
            path.is_dir(),
            error::MissingDirectorySnafu { path: path.clone() }
        );
        let mut has_definitions = false;
        for entry in path
            .read_dir()
            .context(error::ReadDirectorySnafu { path: path.clone() })?
        {
            let entry = entry.context(error::ReadDirectorySnafu { path: path.clone() })?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.ends_with(".tf") || name.ends_with(".tf.json") {
                has_definitions = true;
                break;
            }
        }
        ensure!(
            has_definitions,
            error::NoDefinitionsSnafu { path: path.clone() }
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use std::fs;

    #[test]
    fn builder() {
        let options = Options::new("defs")
            .upgrade(true)
            .var("region", "us-west-2")
            .var_file("prod.tfvars")
            .env_var("AWS_PROFILE", "testing")
            .no_color(false);
        assert_eq!(options.terraform_dir, PathBuf::from("defs"));
        assert!(options.upgrade);
        assert!(!options.lock);
        assert_eq!(options.vars["region"], "us-west-2");
        assert_eq!(options.var_files, vec![PathBuf::from("prod.tfvars")]);
        assert_eq!(options.env_vars["AWS_PROFILE"], "testing");
        assert_eq!(options.no_color, Some(false));
        assert_eq!(options.binary, None);
    }

    #[test]
    fn deserialize_with_defaults() {
        let options: Options =
            serde_json::from_str(r#"{"terraformDir": "../demos/emr-cluster", "upgrade": true}"#)
                .unwrap();
        assert_eq!(options, Options::new("../demos/emr-cluster").upgrade(true));
    }

    #[test]
    fn validate_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let options = Options::new(dir.path().join("nope"));
        assert!(matches!(
            options.validate(),
            Err(Error::MissingDirectory { .. })
        ));
    }

    #[test]
    fn validate_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "nothing to see").unwrap();
        let options = Options::new(dir.path());
        assert!(matches!(
            options.validate(),
            Err(Error::NoDefinitions { .. })
        ));
    }

    #[test]
    fn validate_definitions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.tf.json"), "{}").unwrap();
        assert!(Options::new(dir.path()).validate().is_ok());
    }
}

use crate::error::{self, Result};
use serde::Deserialize;
use snafu::ResultExt;

/// The prefix of the environment variables read by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "TERRAFORM_HARNESS_";

/// Settings provide a way to send arguments into the Rust tests using environment variables.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Settings {
    /// The path to the [terraform] binary. Defaults to `terraform` (i.e. by default the terraform
    /// binary is expected to be found via `$PATH`).
    ///
    /// # Example
    ///
    /// ```text
    /// TERRAFORM_HARNESS_TERRAFORM_PATH=/opt/terraform/1.5.7/terraform
    /// ```
    ///
    /// [terraform]: https://developer.hashicorp.com/terraform/cli
    #[serde(default = "terraform")]
    pub terraform_path: String,

    /// Whether `-no-color` is passed to terraform commands unless the options say otherwise.
    /// Colored output is unreadable in captured test logs.
    #[serde(default = "yes")]
    pub no_color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            terraform_path: terraform(),
            no_color: yes(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_iter(std::env::vars())
    }

    fn from_iter<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Settings>(vars)
            .context(error::SettingsSnafu)
    }
}

/// We need these to provide defaults for serde.
fn terraform() -> String {
    String::from("terraform")
}

fn yes() -> bool {
    true
}

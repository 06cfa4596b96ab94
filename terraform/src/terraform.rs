use crate::error::Result;
use crate::outputs::{parse_outputs, AppliedInfrastructure};
use crate::settings::Settings;
use crate::Options;
use agent_utils::provider_error_for_cmd_output;
use log::{debug, info, trace, warn};
use provisioner::provider::{IntoProviderError, ProviderResult, Resources};
use provisioner::{Create, Destroy, DestroyGuard};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

/// Drives the terraform CLI. `Terraform` implements both [`Create`] (`init` then `apply`) and
/// [`Destroy`] (`destroy`), so it can be handed to a [`provisioner::Lifecycle`] as both.
#[derive(Clone, Debug)]
pub struct Terraform {
    binary: PathBuf,
    no_color: bool,
}

impl Default for Terraform {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Terraform {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            binary: PathBuf::from(&settings.terraform_path),
            no_color: settings.no_color,
        }
    }

    /// Creates a `Terraform` from the `TERRAFORM_HARNESS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_settings(&Settings::from_env()?))
    }

    /// Registers `destroy` for `options` to run when the returned guard goes out of scope.
    pub fn destroy_on_drop<'a>(&'a self, options: &'a Options) -> DestroyGuard<'a, Self> {
        DestroyGuard::new(self, options)
    }

    /// Runs `terraform init` and `terraform apply`, failing the calling test on any error.
    #[track_caller]
    pub fn init_and_apply(&self, options: &Options) -> AppliedInfrastructure {
        match self.create(options) {
            Ok(applied) => applied,
            Err(e) => panic!("terraform init and apply failed: {}", e),
        }
    }

    pub fn init(&self, options: &Options) -> ProviderResult<String> {
        self.run(options, self.init_args(options), Resources::Clear)
    }

    pub fn apply(&self, options: &Options) -> ProviderResult<String> {
        self.run(options, self.apply_args(options), Resources::Unknown)
    }

    /// Runs `terraform destroy`. Unlike [`Destroy::destroy`] this does not need a resource.
    pub fn destroy_all(&self, options: &Options) -> ProviderResult<String> {
        self.run(options, self.destroy_args(options), Resources::Remaining)
    }

    pub fn outputs(&self, options: &Options) -> ProviderResult<BTreeMap<String, Value>> {
        let stdout = self.run(options, self.output_args(options), Resources::Remaining)?;
        parse_outputs(&stdout).context(Resources::Remaining, "Unable to read terraform outputs")
    }

    fn run(
        &self,
        options: &Options,
        args: Vec<String>,
        failure_resources: Resources,
    ) -> ProviderResult<String> {
        let binary = options.binary.as_ref().unwrap_or(&self.binary);
        let hint = format!("terraform {}", args.join(" "));
        info!("Running '{}' in '{}'", hint, options.terraform_dir.display());
        let output = Command::new(binary)
            .args(&args)
            .current_dir(&options.terraform_dir)
            .envs(&options.env_vars)
            .env("TF_IN_AUTOMATION", "1")
            .output()
            .context(
                failure_resources,
                format!("Unable to start '{}' using '{}'", hint, binary.display()),
            )?;
        trace!("'{}' stderr:\n{}", hint, String::from_utf8_lossy(&output.stderr));
        let stdout = provider_error_for_cmd_output(output, &hint, failure_resources)?;
        debug!("'{}' stdout:\n{}", hint, stdout);
        Ok(stdout)
    }

    fn no_color(&self, options: &Options) -> bool {
        options.no_color.unwrap_or(self.no_color)
    }

    pub(crate) fn init_args(&self, options: &Options) -> Vec<String> {
        let mut args = vec![
            "init".to_string(),
            format!("-upgrade={}", options.upgrade),
            "-input=false".to_string(),
        ];
        if self.no_color(options) {
            args.push("-no-color".to_string());
        }
        args
    }

    pub(crate) fn apply_args(&self, options: &Options) -> Vec<String> {
        let mut args = vec![
            "apply".to_string(),
            "-input=false".to_string(),
            "-auto-approve".to_string(),
        ];
        args.extend(self.variable_args(options));
        args
    }

    pub(crate) fn destroy_args(&self, options: &Options) -> Vec<String> {
        let mut args = vec![
            "destroy".to_string(),
            "-auto-approve".to_string(),
            "-input=false".to_string(),
        ];
        args.extend(self.variable_args(options));
        args
    }

    pub(crate) fn output_args(&self, options: &Options) -> Vec<String> {
        let mut args = vec!["output".to_string(), "-json".to_string()];
        if self.no_color(options) {
            args.push("-no-color".to_string());
        }
        args
    }

    /// The arguments shared by `apply` and `destroy`.
    fn variable_args(&self, options: &Options) -> Vec<String> {
        let mut args = Vec::new();
        if !options.lock {
            args.push("-lock=false".to_string());
        }
        for var_file in &options.var_files {
            args.push(format!("-var-file={}", var_file.display()));
        }
        for (key, value) in &options.vars {
            args.push("-var".to_string());
            args.push(format!("{}={}", key, value));
        }
        if self.no_color(options) {
            args.push("-no-color".to_string());
        }
        args
    }
}

impl Create for Terraform {
    type Config = Options;
    type Resource = AppliedInfrastructure;

    fn create(&self, options: &Options) -> ProviderResult<AppliedInfrastructure> {
        debug!("Options:\n{}", options);
        options.validate().context(
            Resources::Clear,
            "The terraform directory cannot be applied",
        )?;
        self.init(options)?;
        self.apply(options)?;
        info!("Apply complete");
        // The apply has succeeded at this point; missing outputs must not fail the run.
        let outputs = match self.outputs(options) {
            Ok(outputs) => outputs,
            Err(e) => {
                warn!("Unable to read terraform outputs after apply: {}", e);
                BTreeMap::new()
            }
        };
        let applied = AppliedInfrastructure { outputs };
        debug!("AppliedInfrastructure:\n{}", applied);
        Ok(applied)
    }
}

impl Destroy for Terraform {
    type Config = Options;
    type Resource = AppliedInfrastructure;

    fn destroy(
        &self,
        options: &Options,
        _resource: Option<&AppliedInfrastructure>,
    ) -> ProviderResult<()> {
        self.destroy_all(options)?;
        info!("Destroy complete");
        Ok(())
    }
}

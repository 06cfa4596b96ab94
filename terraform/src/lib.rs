/*!

`terraform-harness` runs terraform from Rust tests. A test declares [`Options`] pointing at a
directory of terraform definitions, applies them, asserts on the result and destroys everything on
the way out.

The preferred form is a [`provisioner::Lifecycle`], which records the outcome of both steps:

```no_run
use provisioner::Lifecycle;
use terraform_harness::{Options, Terraform};

let terraform = Terraform::from_env().unwrap();
let options = Options::new("../demos/emr-cluster").upgrade(true);
let outcome = Lifecycle::new(terraform.clone(), terraform, options).run();
let applied = outcome.unwrap_applied();
println!("{}", applied);
```

The free functions mirror the same steps for tests that prefer a scoped guard:

```no_run
use terraform_harness::{Options, Terraform};

let terraform = Terraform::from_env().unwrap();
let options = Options::new("../demos/emr-cluster").upgrade(true);
let _destroy = terraform.destroy_on_drop(&options);
terraform.init_and_apply(&options);
```

The terraform binary and default flags are read from `TERRAFORM_HARNESS_*` environment variables,
see [`Settings`].

!*/

pub mod error;
mod options;
mod outputs;
mod settings;
mod terraform;

pub use options::Options;
pub use outputs::AppliedInfrastructure;
pub use settings::{Settings, ENV_PREFIX};
pub use terraform::Terraform;

use log::error;
use provisioner::provider::{IntoProviderError, ProviderError, ProviderResult, Resources};
use provisioner::{Create, Destroy};

fn terraform() -> ProviderResult<Terraform> {
    Terraform::from_env().context(Resources::Clear, "Unable to configure terraform")
}

/// Runs `terraform init` and `terraform apply` and returns the outputs.
pub fn try_init_and_apply(options: &Options) -> ProviderResult<AppliedInfrastructure> {
    terraform()?.create(options)
}

/// Runs `terraform init` and `terraform apply`, failing the calling test if there are any errors.
#[track_caller]
pub fn init_and_apply(options: &Options) -> AppliedInfrastructure {
    match try_init_and_apply(options) {
        Ok(applied) => applied,
        Err(e) => panic!("terraform init and apply failed: {}", e),
    }
}

/// Runs `terraform destroy`.
pub fn try_destroy(options: &Options) -> ProviderResult<()> {
    terraform()?.destroy(options, None)
}

/// Runs `terraform destroy`, logging rather than failing on error. Meant for cleanup paths.
pub fn destroy(options: &Options) {
    if let Err(e) = try_destroy(options) {
        error!(
            "Unable to destroy '{}': {}",
            options.terraform_dir.display(),
            e
        );
    }
}

/// Returns the value of output `name` from the current terraform state.
pub fn output(options: &Options, name: &str) -> ProviderResult<serde_json::Value> {
    terraform()?
        .outputs(options)?
        .remove(name)
        .context(Resources::Remaining, format!("Output '{}' not found", name))
}

/// Returns the value of output `name` if it is a string.
pub fn output_string(options: &Options, name: &str) -> ProviderResult<String> {
    match output(options, name)? {
        serde_json::Value::String(value) => Ok(value),
        other => Err(ProviderError::new_with_context(
            Resources::Remaining,
            format!("Output '{}' is not a string: {}", name, other),
        )),
    }
}

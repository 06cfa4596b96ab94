mod error;

pub use self::error::{IntoProviderError, ProviderError, ProviderResult, Resources};
use crate::Configuration;

/// You implement the [`Create`] trait to provision infrastructure, for example by running
/// `terraform init` and `terraform apply` against a directory of definitions. The type is then
/// handed to a [`Lifecycle`](crate::Lifecycle) which calls `create` once per run.
///
/// ## Custom Types
///
/// - `Config` is the information needed to provision the infrastructure, e.g. the path to the
///   definitions and whether provider plugins should be upgraded first.
///
/// - `Resource` is the information you provide back to the test about what was provisioned, e.g.
///   the outputs of the apply.
///
pub trait Create {
    type Config: Configuration;
    type Resource: Configuration;

    /// Provision the infrastructure described by `config`. This call blocks until the
    /// provisioning tool has finished. Any error is fatal to the run; no retries are attempted by
    /// the caller.
    fn create(&self, config: &Self::Config) -> ProviderResult<Self::Resource>;
}

/// You implement the [`Destroy`] trait to tear down infrastructure that a [`Create`]
/// implementation provisioned. It is called exactly once per run, whether or not `create`
/// succeeded.
pub trait Destroy {
    type Config: Configuration;
    type Resource: Configuration;

    /// Destroy the infrastructure described by `config`. If `create` failed or panicked, then
    /// `resource` is `None` and the implementation should still attempt to clean up anything that
    /// may have been left behind.
    fn destroy(&self, config: &Self::Config, resource: Option<&Self::Resource>)
        -> ProviderResult<()>;
}

use crate::provider::{Destroy, ProviderResult};
use log::{error, info};

/// Destroys provisioned infrastructure when it goes out of scope. Create the guard before
/// provisioning so that cleanup happens on every exit path, including a panicking test.
///
/// The destroy operation runs at most once: either explicitly through [`DestroyGuard::destroy`],
/// which returns the result to the caller, or when the guard is dropped, in which case a failure
/// is logged.
///
/// # Example
///
/// ```
/// use provisioner::provider::ProviderResult;
/// use provisioner::{Destroy, DestroyGuard};
///
/// struct Noop;
///
/// impl Destroy for Noop {
///     type Config = ();
///     type Resource = ();
///
///     fn destroy(&self, _: &(), _: Option<&()>) -> ProviderResult<()> {
///         Ok(())
///     }
/// }
///
/// let _guard = DestroyGuard::new(&Noop, &());
/// // Provision and assert here. `Noop::destroy` runs when `_guard` is dropped.
/// ```
#[must_use = "the infrastructure is destroyed as soon as the guard is dropped"]
pub struct DestroyGuard<'a, D>
where
    D: Destroy,
{
    destroyer: &'a D,
    config: &'a D::Config,
    armed: bool,
}

impl<'a, D> DestroyGuard<'a, D>
where
    D: Destroy,
{
    pub fn new(destroyer: &'a D, config: &'a D::Config) -> Self {
        Self {
            destroyer,
            config,
            armed: true,
        }
    }

    /// Destroy now and return the result instead of logging it. `resource` is whatever the
    /// create step returned, if it succeeded.
    pub fn destroy(mut self, resource: Option<&D::Resource>) -> ProviderResult<()> {
        self.armed = false;
        self.destroyer.destroy(self.config, resource)
    }
}

impl<'a, D> Drop for DestroyGuard<'a, D>
where
    D: Destroy,
{
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        info!("Destroying infrastructure on scope exit");
        if let Err(e) = self.destroyer.destroy(self.config, None) {
            error!("Unable to destroy infrastructure: {}", e);
        }
    }
}
